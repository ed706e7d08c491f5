//! Scene Graph & Assembly Tests
//!
//! Tests for:
//! - Node insertion, re-parenting, removal and lookup
//! - World matrix propagation through the hierarchy
//! - Static scene assembly (sky, ground, fog, helpers)
//! - Asset attachment, including rejection of malformed payloads
//! - Teardown issuing a fresh scene identity

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::{Quat, Vec3};

use skydome::animation::{
    AnimationClip, AnimationPlayer, InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData, TrackMeta,
};
use skydome::assets::{AssetNode, AssetPayload};
use skydome::config::{CharacterConfig, ViewerConfig};
use skydome::errors::{AssetError, Error};
use skydome::lighting::LightingRig;
use skydome::scene::{GeometryDesc, MaterialDesc, MeshDesc, Node, Renderable, Scene, SceneAssembler, Side, Transform};
use skydome::sky::{SkyStrategy, TimeOfDayState, compute_sun};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-4;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

fn assembled(config: &ViewerConfig) -> SceneAssembler {
    let sun = compute_sun(&TimeOfDayState::default());
    let mut rig = LightingRig::new(&config.lighting);
    rig.sync(&sun, 0.5);

    let mut assembler = SceneAssembler::new();
    assembler.assemble(config, rig.state(), &sun, &mut AnimationPlayer::new());
    assembler
}

fn bird_payload() -> AssetPayload {
    let body_mesh = MeshDesc::new(
        GeometryDesc::Asset {
            uri: "bird.glb".into(),
            mesh: "body".into(),
        },
        MaterialDesc::Asset,
    );
    let flap = Track {
        meta: TrackMeta {
            node_name: "wing".into(),
            target: TargetPath::Rotation,
        },
        data: TrackData::Quaternion(KeyframeTrack::new(
            vec![0.0, 0.5],
            vec![Quat::IDENTITY, Quat::from_rotation_z(0.8)],
            InterpolationMode::Linear,
        )),
    };

    AssetPayload {
        nodes: vec![
            AssetNode::new("body").with_mesh(body_mesh),
            AssetNode::new("wing").with_parent(0).with_position(Vec3::new(1.0, 0.0, 0.0)),
        ],
        clips: vec![Arc::new(AnimationClip::new("flap", vec![flap]))],
    }
}

fn placement() -> CharacterConfig {
    CharacterConfig {
        uri: "bird.glb".into(),
        ..CharacterConfig::default()
    }
}

// ============================================================================
// Node Management
// ============================================================================

#[test]
fn add_and_find_nodes() {
    let mut scene = Scene::new();
    let root = scene.create_node_with_name("root");
    let child = scene.add_to_parent(Node::with_name("child"), root);
    let grandchild = scene.add_to_parent(Node::with_name("grandchild"), child);

    assert_eq!(scene.node_count(), 3);
    assert_eq!(scene.root_nodes(), &[root]);
    assert_eq!(scene.get_node(grandchild).unwrap().parent(), Some(child));
    assert_eq!(scene.find_node_by_name(root, "grandchild"), Some(grandchild));
    assert_eq!(scene.find_node_by_name(child, "root"), None);
    assert_eq!(scene.collect_subtree(root), vec![root, child, grandchild]);
}

#[test]
fn removing_a_node_removes_its_subtree() {
    let mut scene = Scene::new();
    let root = scene.create_node_with_name("root");
    let child = scene.add_to_parent(Node::with_name("child"), root);
    let leaf = scene.add_to_parent(Node::with_name("leaf"), child);

    scene.remove_node(child);
    assert!(scene.contains(root));
    assert!(!scene.contains(child));
    assert!(!scene.contains(leaf));
    assert!(scene.get_node(root).unwrap().children().is_empty());
}

#[test]
fn attach_refuses_cycles() {
    let mut scene = Scene::new();
    let a = scene.create_node_with_name("a");
    let b = scene.add_to_parent(Node::with_name("b"), a);

    scene.attach(a, b);
    assert_eq!(scene.get_node(a).unwrap().parent(), None);
    assert_eq!(scene.get_node(b).unwrap().parent(), Some(a));
}

#[test]
fn world_matrices_follow_the_hierarchy() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::with_name("parent").with_transform(Transform::from_trs(
        Vec3::new(10.0, 0.0, 0.0),
        Quat::IDENTITY,
        Vec3::splat(2.0),
    )));
    let child = scene.add_to_parent(
        Node::with_name("child").with_transform(Transform::from_trs(Vec3::new(0.0, 1.0, 0.0), Quat::IDENTITY, Vec3::ONE)),
        parent,
    );

    scene.update_world_matrices();
    let world = Vec3::from(scene.get_node(child).unwrap().world_matrix().translation);
    assert!(vec3_approx(world, Vec3::new(10.0, 2.0, 0.0)));

    scene.get_node_mut(parent).unwrap().transform.position = Vec3::new(0.0, 0.0, -5.0);
    scene.update_world_matrices();
    let world = Vec3::from(scene.get_node(child).unwrap().world_matrix().translation);
    assert!(vec3_approx(world, Vec3::new(0.0, 2.0, -5.0)));
}

#[test]
fn hidden_nodes_are_not_rendered() {
    let mut scene = Scene::new();
    let node = scene.create_node_with_name("box");
    scene.set_renderable(
        node,
        Renderable::Mesh(MeshDesc::new(GeometryDesc::Cube { size: 1.0 }, MaterialDesc::Basic { color: Vec3::ONE })),
    );
    assert_eq!(scene.renderables().count(), 1);
    scene.get_node_mut(node).unwrap().visible = false;
    assert_eq!(scene.renderables().count(), 0);
}

// ============================================================================
// Static Assembly
// ============================================================================

#[test]
fn assembly_builds_sky_ground_and_helpers() {
    let config = ViewerConfig::default();
    let assembler = assembled(&config);
    let scene = assembler.scene();

    assert!(assembler.is_assembled());
    assert_eq!(scene.node_count(), 5);

    let ground = assembler.ground().unwrap();
    let ground_node = scene.get_node(ground).unwrap();
    assert_eq!(ground_node.name, "ground");
    assert!(vec3_approx(ground_node.transform.position, Vec3::new(0.0, -33.0, 0.0)));
    let expected = Quat::from_rotation_x(-FRAC_PI_2);
    assert!(ground_node.transform.rotation.dot(expected).abs() > 0.9999);
    match scene.renderable(ground) {
        Some(Renderable::Mesh(mesh)) => {
            assert!(mesh.receive_shadow);
            assert!(!mesh.cast_shadow);
            assert_eq!(
                mesh.geometry,
                GeometryDesc::Plane {
                    width: 10_000.0,
                    height: 10_000.0
                }
            );
        }
        other => panic!("unexpected ground renderable: {other:?}"),
    }

    let fog = scene.fog.unwrap();
    assert_eq!(fog.near, 1.0);
    assert_eq!(fog.far, 5000.0);
    assert!(vec3_approx(scene.background, Vec3::ONE));

    let helpers = assembler.helpers();
    assert!(helpers.axes.is_some());
    assert!(helpers.hemisphere.is_some());
    assert!(helpers.directional.is_some());
}

#[test]
fn atmospheric_sky_is_a_scaled_back_faced_box() {
    let assembler = assembled(&ViewerConfig::default());
    let sky = assembler.sky_node().unwrap();
    let node = assembler.scene().get_node(sky).unwrap();
    assert!(vec3_approx(node.transform.scale, Vec3::splat(450_000.0)));

    match assembler.scene().renderable(sky) {
        Some(Renderable::Mesh(mesh)) => {
            assert_eq!(mesh.side, Side::Back);
            assert!(matches!(mesh.material, MaterialDesc::Atmosphere(_)));
        }
        other => panic!("unexpected sky renderable: {other:?}"),
    }
}

#[test]
fn gradient_sky_is_a_back_faced_dome() {
    let mut config = ViewerConfig::default();
    config.sky.strategy = SkyStrategy::Gradient;
    let assembler = assembled(&config);
    assert!(!assembler.sky().is_dynamic());

    let sky = assembler.sky_node().unwrap();
    match assembler.scene().renderable(sky) {
        Some(Renderable::Mesh(mesh)) => {
            assert_eq!(mesh.side, Side::Back);
            assert!(matches!(mesh.geometry, GeometryDesc::Sphere { radius, .. } if radius == 4000.0));
            assert!(matches!(mesh.material, MaterialDesc::SkyGradient(_)));
        }
        other => panic!("unexpected sky renderable: {other:?}"),
    }
}

#[test]
fn helpers_can_be_disabled() {
    let mut config = ViewerConfig::default();
    config.environment.show_helpers = false;
    let assembler = assembled(&config);
    assert_eq!(assembler.scene().node_count(), 2);
    assert!(assembler.helpers().directional.is_none());
}

// ============================================================================
// Asset Attachment
// ============================================================================

#[test]
fn attach_asset_places_the_root() {
    let mut assembler = assembled(&ViewerConfig::default());
    let before = assembler.scene().node_count();

    let root = assembler.attach_asset(&bird_payload(), &placement()).unwrap();
    let scene = assembler.scene();
    assert_eq!(scene.node_count(), before + 3);
    assert_eq!(assembler.characters(), &[root]);

    let root_node = scene.get_node(root).unwrap();
    assert!(vec3_approx(root_node.transform.scale, Vec3::splat(0.35)));
    assert!(vec3_approx(root_node.transform.position, Vec3::new(0.0, 50.0, 0.0)));

    let body = scene.find_node_by_name(root, "body").unwrap();
    let wing = scene.find_node_by_name(root, "wing").unwrap();
    assert_eq!(scene.get_node(wing).unwrap().parent(), Some(body));

    match scene.renderable(body) {
        Some(Renderable::Mesh(mesh)) => {
            assert!(mesh.cast_shadow);
            assert!(mesh.receive_shadow);
        }
        other => panic!("unexpected body renderable: {other:?}"),
    }
}

#[test]
fn malformed_asset_leaves_the_scene_untouched() {
    let mut assembler = assembled(&ViewerConfig::default());
    let before = assembler.scene().node_count();

    let mut payload = bird_payload();
    payload.nodes[0].parent = Some(1);
    let err = assembler.attach_asset(&payload, &placement()).unwrap_err();
    assert!(matches!(err, Error::Asset(AssetError::InvalidData(_))));

    let empty = AssetPayload::default();
    assert!(assembler.attach_asset(&empty, &placement()).is_err());

    let out_of_range = CharacterConfig {
        clip_index: 4,
        ..placement()
    };
    let err = assembler.attach_asset(&bird_payload(), &out_of_range).unwrap_err();
    assert!(matches!(
        err,
        Error::Asset(AssetError::ClipIndexOutOfBounds { index: 4, count: 1, .. })
    ));

    assert_eq!(assembler.scene().node_count(), before);
    assert!(assembler.characters().is_empty());
}

#[test]
fn integrate_asset_starts_the_clip() {
    let mut assembler = assembled(&ViewerConfig::default());
    let mut player = AnimationPlayer::new();

    assembler
        .integrate_asset(&bird_payload(), &placement(), &mut player)
        .unwrap();
    assert_eq!(player.len(), 1);

    let (_, binding) = player.iter().next().unwrap();
    assert_eq!(binding.properties().len(), 1);
    // 0.5 s clip stretched to the configured 1 s
    assert!((binding.playback_rate - 0.5).abs() < 1e-6);
}

#[test]
fn teardown_clears_scene_and_bindings() {
    let mut assembler = assembled(&ViewerConfig::default());
    let mut player = AnimationPlayer::new();
    assembler
        .integrate_asset(&bird_payload(), &placement(), &mut player)
        .unwrap();
    let old_id = assembler.scene_id();

    assembler.teardown(&mut player);
    assert!(!assembler.is_assembled());
    assert_eq!(assembler.scene().node_count(), 0);
    assert!(player.is_empty());
    assert_ne!(assembler.scene_id(), old_id);
}

#[test]
fn reassembly_drops_character_bindings() {
    let config = ViewerConfig::default();
    let mut assembler = assembled(&config);
    let mut player = AnimationPlayer::new();
    assembler
        .integrate_asset(&bird_payload(), &placement(), &mut player)
        .unwrap();
    assert_eq!(player.len(), 1);
    let old_id = assembler.scene_id();

    let sun = compute_sun(&TimeOfDayState::default());
    let rig = LightingRig::new(&config.lighting);
    assembler.assemble(&config, rig.state(), &sun, &mut player);

    assert!(assembler.is_assembled());
    assert!(player.is_empty());
    assert!(assembler.characters().is_empty());
    assert_eq!(assembler.scene().node_count(), 5);
    assert_ne!(assembler.scene_id(), old_id);
}
