use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::{AnimationClipBinding, AnimationPlayer, Binder};
use crate::assets::{AssetLoader, AssetPayload};
use crate::config::{CharacterConfig, SkyConfig, ViewerConfig};
use crate::errors::{AssetError, Result};
use crate::lighting::LightState;
use crate::scene::geometry::{Fog, GeometryDesc, HelperKind, MaterialDesc, MeshDesc, Renderable};
use crate::scene::node::Node;
use crate::scene::scene::{Scene, SceneId};
use crate::scene::transform::Transform;
use crate::scene::NodeHandle;
use crate::sky::{AtmosphericSky, GradientSky, GradientSkyUniforms, SkyModel, SkyStrategy, SkyUniforms, SunSample};
use crate::utils::color::hsl_array;

/// Debug helper nodes, present when helpers are enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelperNodes {
    pub axes: Option<NodeHandle>,
    pub hemisphere: Option<NodeHandle>,
    pub directional: Option<NodeHandle>,
}

/// Builds the static scene once and attaches character assets as they load.
pub struct SceneAssembler {
    scene: Scene,
    sky: SkyModel,
    sky_node: Option<NodeHandle>,
    ground: Option<NodeHandle>,
    helpers: HelperNodes,
    characters: Vec<NodeHandle>,
    assembled: bool,
}

impl Default for SceneAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneAssembler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            sky: SkyModel::Atmospheric(AtmosphericSky { scale: 450_000.0 }),
            sky_node: None,
            ground: None,
            helpers: HelperNodes::default(),
            characters: Vec::new(),
            assembled: false,
        }
    }

    /// Creates the sky, ground, background, fog and helper nodes.
    ///
    /// Re-assembling an assembled scene tears it down first, dropping the
    /// clip bindings of its characters.
    pub fn assemble(
        &mut self,
        config: &ViewerConfig,
        lights: &LightState,
        sun: &SunSample,
        player: &mut AnimationPlayer,
    ) {
        if self.assembled {
            log::warn!("Scene already assembled; rebuilding");
            self.teardown(player);
        }

        let env = &config.environment;
        self.scene.background = hsl_array(env.background_hsl);

        self.sky = build_sky_model(&config.sky, lights);
        let (sky_mesh, sky_scale) = self.sky.mesh(sun);
        let sky_node = self.scene.add_node(
            Node::with_name("sky").with_transform(Transform::from_trs(Vec3::ZERO, Quat::IDENTITY, Vec3::splat(sky_scale))),
        );
        self.scene.set_renderable(sky_node, Renderable::Mesh(sky_mesh));
        self.sky_node = Some(sky_node);

        self.scene.fog = Some(Fog {
            color: Vec3::from_array(config.sky.gradient.bottom_color),
            near: env.fog_near,
            far: env.fog_far,
        });

        let ground_cfg = &config.ground;
        let ground = self.scene.add_node(Node::with_name("ground").with_transform(Transform::from_trs(
            Vec3::new(0.0, ground_cfg.elevation, 0.0),
            Quat::from_rotation_x(-FRAC_PI_2),
            Vec3::ONE,
        )));
        self.scene.set_renderable(
            ground,
            Renderable::Mesh(
                MeshDesc::new(
                    GeometryDesc::Plane {
                        width: ground_cfg.size,
                        height: ground_cfg.size,
                    },
                    MaterialDesc::Lambert {
                        color: hsl_array(ground_cfg.color_hsl),
                    },
                )
                .with_shadows(false, true),
            ),
        );
        self.ground = Some(ground);

        if env.show_helpers {
            self.helpers = HelperNodes {
                axes: Some(self.add_helper("axes_helper", Vec3::ZERO, HelperKind::Axes { size: env.axes_size })),
                hemisphere: Some(self.add_helper(
                    "hemisphere_light_helper",
                    lights.ambient.position,
                    HelperKind::HemisphereLight {
                        size: env.light_helper_size,
                    },
                )),
                directional: Some(self.add_helper(
                    "directional_light_helper",
                    lights.directional.position,
                    HelperKind::DirectionalLight {
                        size: env.light_helper_size,
                    },
                )),
            };
            self.sync_helpers(lights);
        }

        self.assembled = true;
        log::info!(
            "Scene assembled ({:?} sky, {} nodes)",
            self.sky.strategy(),
            self.scene.node_count()
        );
    }

    fn add_helper(&mut self, name: &str, position: Vec3, kind: HelperKind) -> NodeHandle {
        let mut node = Node::with_name(name);
        node.transform.position = position;
        let handle = self.scene.add_node(node);
        self.scene.set_renderable(handle, Renderable::Helper(kind));
        handle
    }

    /// Issues one load per configured character against the current scene.
    pub fn request_characters(&self, config: &ViewerConfig, loader: &AssetLoader) -> Vec<u64> {
        config
            .characters
            .iter()
            .map(|character| loader.load(self.scene.id(), character.clone()))
            .collect()
    }

    /// Adds a loaded asset beneath a new placement root.
    ///
    /// The payload is validated before anything is inserted, so a rejected
    /// asset leaves the scene untouched.
    pub fn attach_asset(&mut self, payload: &AssetPayload, placement: &CharacterConfig) -> Result<NodeHandle> {
        payload.validate()?;
        if !payload.clips.is_empty() && placement.clip_index >= payload.clips.len() {
            return Err(AssetError::ClipIndexOutOfBounds {
                uri: placement.uri.clone(),
                index: placement.clip_index,
                count: payload.clips.len(),
            }
            .into());
        }

        let root = self.scene.add_node(Node::with_name(format!("{}#root", placement.uri)).with_transform(
            Transform::from_trs(
                placement.position(),
                Quat::from_rotation_y(placement.rotation_y),
                Vec3::splat(placement.scale),
            ),
        ));

        let mut handles = Vec::with_capacity(payload.nodes.len());
        for asset_node in &payload.nodes {
            let parent = asset_node.parent.and_then(|i| handles.get(i).copied()).unwrap_or(root);
            let node = Node::with_name(asset_node.name.clone()).with_transform(Transform::from_trs(
                asset_node.position,
                asset_node.rotation,
                asset_node.scale,
            ));
            let handle = self.scene.add_to_parent(node, parent);
            if let Some(mesh) = &asset_node.mesh {
                let mesh = mesh.clone().with_shadows(placement.cast_shadow, placement.receive_shadow);
                self.scene.set_renderable(handle, Renderable::Mesh(mesh));
            }
            handles.push(handle);
        }

        self.characters.push(root);
        Ok(root)
    }

    /// Attaches a loaded asset and starts its configured clip on `player`.
    pub fn integrate_asset(
        &mut self,
        payload: &AssetPayload,
        placement: &CharacterConfig,
        player: &mut AnimationPlayer,
    ) -> Result<NodeHandle> {
        let root = self.attach_asset(payload, placement)?;

        if let Some(clip) = payload.clip(placement.clip_index) {
            let properties = Binder::bind(&self.scene, root, clip);
            let mut binding = AnimationClipBinding::new(root, Arc::clone(clip), properties)
                .with_loop_mode(placement.loop_mode);
            if let Some(seconds) = placement.clip_duration {
                binding = binding.with_duration(seconds);
            }
            log::info!(
                "Playing clip '{}' on '{}' at rate {:.3}",
                clip.name,
                placement.uri,
                binding.playback_rate
            );
            player.add(binding);
        }

        log::info!("Integrated asset '{}' ({} nodes)", placement.uri, payload.nodes.len());
        Ok(root)
    }

    /// Refreshes per-frame sky shader inputs on the sky node.
    pub fn refresh_sky(&mut self, sun: &SunSample) -> SkyUniforms {
        let uniforms = self.sky.uniforms(sun);
        if let (SkyUniforms::Atmosphere(params), Some(node)) = (uniforms, self.sky_node)
            && let Some(Renderable::Mesh(mesh)) = self.scene.renderable_mut(node)
        {
            mesh.material = MaterialDesc::Atmosphere(params);
        }
        uniforms
    }

    /// Moves the directional light helper onto the light.
    pub fn sync_helpers(&mut self, lights: &LightState) {
        let Some(handle) = self.helpers.directional else {
            return;
        };
        if let Some(node) = self.scene.get_node_mut(handle) {
            node.transform.position = lights.directional.position;
            node.transform.rotation = lights.directional.orientation;
        }
    }

    /// Drops the whole scene and every animation binding on `player`.
    ///
    /// The scene gets a new [`SceneId`], so loads still in flight for the
    /// old one are discarded on arrival.
    pub fn teardown(&mut self, player: &mut AnimationPlayer) {
        self.scene.clear();
        player.clear();
        self.reset_handles();
        self.assembled = false;
        log::info!("Scene torn down");
    }

    fn reset_handles(&mut self) {
        self.sky_node = None;
        self.ground = None;
        self.helpers = HelperNodes::default();
        self.characters.clear();
    }

    #[inline]
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    #[must_use]
    pub fn scene_id(&self) -> SceneId {
        self.scene.id()
    }

    #[must_use]
    pub fn sky(&self) -> &SkyModel {
        &self.sky
    }

    #[must_use]
    pub fn is_assembled(&self) -> bool {
        self.assembled
    }

    #[must_use]
    pub fn sky_node(&self) -> Option<NodeHandle> {
        self.sky_node
    }

    #[must_use]
    pub fn ground(&self) -> Option<NodeHandle> {
        self.ground
    }

    #[must_use]
    pub fn helpers(&self) -> HelperNodes {
        self.helpers
    }

    #[must_use]
    pub fn characters(&self) -> &[NodeHandle] {
        &self.characters
    }
}

fn build_sky_model(config: &SkyConfig, lights: &LightState) -> SkyModel {
    match config.strategy {
        SkyStrategy::Gradient => {
            let g = &config.gradient;
            SkyModel::Gradient(GradientSky {
                radius: g.radius,
                width_segments: g.width_segments,
                height_segments: g.height_segments,
                uniforms: GradientSkyUniforms {
                    top_color: g.top_color.map_or(lights.ambient.sky_color, Vec3::from_array),
                    offset: g.offset,
                    bottom_color: Vec3::from_array(g.bottom_color),
                    exponent: g.exponent,
                },
            })
        }
        SkyStrategy::Atmospheric => SkyModel::Atmospheric(AtmosphericSky {
            scale: config.atmospheric.scale,
        }),
    }
}
