//! Headless day-cycle demo.
//!
//! Usage: `sky_viewer [config.json] [frames]`
//!
//! Runs the frame scheduler against a logging backend with a fixed 60 Hz
//! clock. The flamingo is a procedural stand-in served from memory, so the
//! demo needs no files on disk.

use std::sync::Arc;

use glam::{Quat, Vec3};
use skydome::animation::{AnimationClip, InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData, TrackMeta};
use skydome::assets::{AssetLoader, AssetNode, AssetPayload, MemoryAssetSource, completion_channel};
use skydome::scene::{GeometryDesc, MaterialDesc, MeshDesc};
use skydome::{FixedClock, FrameScheduler, HeadlessBackend, ViewerConfig};

const DEFAULT_FRAMES: u64 = 600;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            println!("Loading config from: {path}");
            ViewerConfig::load(&path)?
        }
        None => ViewerConfig::stock(),
    };
    let frames = match args.next() {
        Some(n) => n.parse()?,
        None => DEFAULT_FRAMES,
    };

    let mut source = MemoryAssetSource::new();
    for character in &config.characters {
        source.insert(character.uri.clone(), flamingo(&character.uri));
    }

    let (sender, completions) = completion_channel();
    let loader = AssetLoader::new(Arc::new(source), sender)?;

    let mut scheduler = FrameScheduler::new(config)
        .with_clock(FixedClock::sixty_hz())
        .with_completions(completions);
    scheduler.assemble();
    let requests = scheduler.request_assets(&loader);
    println!("Requested {} character assets", requests.len());

    let mut backend = HeadlessBackend::new();
    scheduler.start(&mut backend)?;

    for _ in 0..frames {
        let report = scheduler.tick(&mut backend)?;
        if report.integrated_assets > 0 {
            println!("Frame {}: {} asset(s) attached", report.frame, report.integrated_assets);
        }
        if let Some(fps) = report.fps {
            println!(
                "Frame {} | azimuth {:.4} | sun ({:.3}, {:.3}, {:.3}) | {} animated | {fps:.1} FPS",
                report.frame,
                report.azimuth,
                report.sun_direction.x,
                report.sun_direction.y,
                report.sun_direction.z,
                report.animated_bindings,
            );
        }
        if !report.submitted {
            break;
        }
    }

    if let Some(err) = scheduler.last_asset_error() {
        println!("Last asset error: {err}");
    }
    println!(
        "Rendered {} frames, {} simulated seconds, final azimuth {:.4}",
        backend.frames,
        scheduler.stats().elapsed,
        scheduler.time_of_day().azimuth
    );

    scheduler.stop();
    Ok(())
}

/// A body with two flapping wings and a one-second flight cycle.
fn flamingo(uri: &str) -> AssetPayload {
    let mesh = |name: &str| {
        MeshDesc::new(
            GeometryDesc::Asset {
                uri: uri.to_string(),
                mesh: name.to_string(),
            },
            MaterialDesc::Asset,
        )
    };

    let flap = |node: &str, sign: f32| Track {
        meta: TrackMeta {
            node_name: node.to_string(),
            target: TargetPath::Rotation,
        },
        data: TrackData::Quaternion(KeyframeTrack::new(
            vec![0.0, 0.3, 0.6],
            vec![
                Quat::from_rotation_z(sign * 0.5),
                Quat::from_rotation_z(-sign * 0.4),
                Quat::from_rotation_z(sign * 0.5),
            ],
            InterpolationMode::Linear,
        )),
    };

    let bob = Track {
        meta: TrackMeta {
            node_name: "body".to_string(),
            target: TargetPath::Translation,
        },
        data: TrackData::Vector3(KeyframeTrack::new(
            vec![0.0, 0.3, 0.6],
            vec![Vec3::ZERO, Vec3::new(0.0, 4.0, 0.0), Vec3::ZERO],
            InterpolationMode::Linear,
        )),
    };

    AssetPayload {
        nodes: vec![
            AssetNode::new("body").with_mesh(mesh("body")),
            AssetNode::new("left_wing")
                .with_parent(0)
                .with_position(Vec3::new(-20.0, 10.0, 0.0))
                .with_mesh(mesh("left_wing")),
            AssetNode::new("right_wing")
                .with_parent(0)
                .with_position(Vec3::new(20.0, 10.0, 0.0))
                .with_mesh(mesh("right_wing")),
        ],
        clips: vec![Arc::new(AnimationClip::new(
            "flamingo_flyA_",
            vec![flap("left_wing", 1.0), flap("right_wing", -1.0), bob],
        ))],
    }
}
