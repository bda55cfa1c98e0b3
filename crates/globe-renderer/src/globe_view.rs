//! Per-frame globe orchestration
//!
//! [`GlobeView`] owns the earth mesh, its per-shading materials, the
//! displacement engine, the layer compositor, the view control bridge and
//! the light rig, and runs each of them from [`GlobeView::render`].

use uuid::Uuid;

use globe_core::constants::EARTH_RADIUS_SHRINK;
use globe_core::{GlobeModel, GlobeOptions, Shading, TextureRef};

use crate::compositor::{CompositeReport, LayerCompositor, LayerTarget};
use crate::constants::{defines, uniforms};
use crate::coord_sys::GlobeCoordinateSystem;
use crate::displacement::DisplacementEngine;
use crate::host::HostApi;
use crate::light::LightRig;
use crate::scene::{
    Group, Material, Mesh, ShaderKind, ShaderStage, SharedGroup, SharedMaterial, SharedMesh,
    UniformValue,
};
use crate::texture::TextureOptions;
use crate::view_control::ViewControlBridge;

/// What one render pass did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Whether the sphere was displaced this frame
    pub displaced: bool,
    /// Layer compositing summary
    pub layers: CompositeReport,
}

/// Globe component view
pub struct GlobeView {
    id: Uuid,
    group: SharedGroup,
    earth_mesh: SharedMesh,
    /// One material per shading model, indexed in `Shading::ALL` order
    materials: [SharedMaterial; 3],
    displacement: DisplacementEngine,
    compositor: LayerCompositor,
    view_control: ViewControlBridge,
    lights: LightRig,
}

impl Default for GlobeView {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobeView {
    /// Create the view with its material table, sphere and lights
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        let materials = Shading::ALL.map(|shading| Material::new(ShaderKind::from(shading)).shared());

        let displacement = DisplacementEngine::new();
        let mut earth = Mesh::new("earth");
        earth.geometry = Some(displacement.geometry().clone());
        earth.render_normal = true;
        let earth_mesh = earth.shared();

        let mut group = Group::new("globe");
        group.add(&earth_mesh);

        tracing::info!("Created globe view {}", id);
        Self {
            id,
            group: group.shared(),
            earth_mesh,
            materials,
            displacement,
            compositor: LayerCompositor::new(),
            view_control: ViewControlBridge::new(id),
            lights: LightRig::new(),
        }
    }

    /// Run a full render pass for `model`
    pub fn render(
        &mut self,
        model: &GlobeModel,
        coord_sys: &mut GlobeCoordinateSystem,
        host: &HostApi,
    ) -> FrameReport {
        let options = &model.options;

        coord_sys.scene.add_group(self.lights.root());
        if options.show {
            coord_sys.scene.add_group(&self.group);
        } else {
            coord_sys.scene.remove_group(&self.group);
        }
        coord_sys.scene.set_post_effect(
            options.post_effect.enable,
            options.temporal_super_sampling.enable,
        );

        let material = self.material(options.shading).clone();
        {
            let mut earth = self.earth_mesh.lock();
            earth.geometry = Some(self.displacement.geometry().clone());
            earth.material = Some(material.clone());
            earth.set_uniform_scale(coord_sys.radius * EARTH_RADIUS_SHRINK);

            let mut material = material.lock();
            apply_material_options(&mut material, options);
            set_texture_image(
                &mut material,
                &mut earth,
                uniforms::DIFFUSE_MAP,
                options.base_texture.as_ref(),
                host,
            );
            set_texture_image(
                &mut material,
                &mut earth,
                uniforms::BUMP_MAP,
                options.height_texture.as_ref(),
                host,
            );
            if options.post_effect.enable {
                material.shader.define(ShaderStage::Fragment, defines::SRGB_DECODE);
            } else {
                material.shader.undefine(ShaderStage::Fragment, defines::SRGB_DECODE);
            }
        }

        let earth_position = self.earth_mesh.lock().world_position();
        self.lights
            .update(&options.light, host.sun.as_ref(), earth_position);

        let displaced = self.update_displacement(options, coord_sys);

        self.view_control.bind(coord_sys.camera.clone());
        self.view_control.sync_from_model(
            &options.view_control,
            coord_sys.radius,
            &model.id,
            &host.actions,
        );

        let target = LayerTarget {
            base_mesh: &self.earth_mesh,
            group: &self.group,
            base_radius: coord_sys.radius,
        };
        let layers =
            self.compositor
                .composite(&options.layers, &options.debug.wireframe, &target, host);

        FrameReport { displaced, layers }
    }

    /// Re-run displacement only, after the coordinate system's height
    /// data changed
    pub fn update_layout(&mut self, model: &GlobeModel, coord_sys: &mut GlobeCoordinateSystem) -> bool {
        self.update_displacement(&model.options, coord_sys)
    }

    /// Empty the globe group and release the controller
    pub fn dispose(&mut self) {
        self.group.lock().clear();
        self.view_control.dispose();
        tracing::debug!("Disposed globe view {}", self.id);
    }

    fn update_displacement(
        &mut self,
        options: &GlobeOptions,
        coord_sys: &mut GlobeCoordinateSystem,
    ) -> bool {
        if let Err(e) = coord_sys.apply_displacement_scale(options.displacement_scale) {
            tracing::warn!("Height image rejected: {}", e);
        }
        self.displacement.update(
            options.displacement_quality,
            options.wireframe_enabled(),
            coord_sys.height_field(),
        )
    }

    fn material(&self, shading: Shading) -> &SharedMaterial {
        &self.materials[shading as usize]
    }

    /// Instance id reported in emitted actions
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Group holding the earth and overlay meshes
    pub fn group(&self) -> &SharedGroup {
        &self.group
    }

    /// The base sphere mesh
    pub fn earth_mesh(&self) -> &SharedMesh {
        &self.earth_mesh
    }

    /// Material used for `shading`
    pub fn shading_material(&self, shading: Shading) -> &SharedMaterial {
        self.material(shading)
    }

    /// Displacement engine
    pub fn displacement(&self) -> &DisplacementEngine {
        &self.displacement
    }

    /// Layer compositor
    pub fn compositor(&self) -> &LayerCompositor {
        &self.compositor
    }

    /// Light rig
    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    /// View control, for feeding user input
    pub fn view_control_mut(&mut self) -> &mut ViewControlBridge {
        &mut self.view_control
    }
}

fn apply_material_options(material: &mut Material, options: &GlobeOptions) {
    if options.shading == Shading::Realistic {
        material.set(
            uniforms::ROUGHNESS,
            UniformValue::Float(options.realistic_material.roughness),
        );
        material.set(
            uniforms::METALNESS,
            UniformValue::Float(options.realistic_material.metalness),
        );
    }
    material.set(uniforms::COLOR, UniformValue::Color(options.base_color));
}

/// Bind `source` to a texture slot, or clear the slot when absent
fn set_texture_image(
    material: &mut Material,
    mesh: &mut Mesh,
    slot: &str,
    source: Option<&TextureRef>,
    host: &HostApi,
) {
    match source {
        Some(source) => {
            let texture = host.textures.load(source, TextureOptions::globe(), None);
            texture.attach_surface_to(mesh);
            material.set(slot, UniformValue::Texture(texture));
            material.shader.enable_texture(slot);
        }
        None => {
            material.remove(slot);
            material.shader.disable_texture(slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use approx::assert_relative_eq;

    use globe_core::{GlobeAction, HeightField, LayerOptions, Quality};

    use super::*;
    use crate::coord_sys::HeightImage;
    use crate::texture::QueuedTextureLoader;

    struct Harness {
        loader: Arc<QueuedTextureLoader>,
        host: HostApi,
        coord_sys: GlobeCoordinateSystem,
        view: GlobeView,
        model: GlobeModel,
    }

    impl Harness {
        fn new(options: GlobeOptions) -> Self {
            let loader = Arc::new(QueuedTextureLoader::new());
            Self {
                host: HostApi::new(loader.clone()),
                loader,
                coord_sys: GlobeCoordinateSystem::new(100.0),
                view: GlobeView::new(),
                model: GlobeModel::new("globe0", options),
            }
        }

        fn frame(&mut self) -> FrameReport {
            self.view.render(&self.model, &mut self.coord_sys, &self.host)
        }
    }

    fn quiet_options() -> GlobeOptions {
        let mut options = GlobeOptions::default();
        options.displacement_quality = Quality::Low;
        options.view_control.auto_rotate = false;
        options.view_control.damping = 0.0;
        options
    }

    #[test]
    fn test_render_attaches_groups_and_scales_earth() {
        let mut h = Harness::new(quiet_options());
        h.frame();

        assert!(h.coord_sys.scene.contains_group(h.view.group()));
        assert!(h.coord_sys.scene.contains_group(h.view.lights().root()));
        let earth = h.view.earth_mesh().lock();
        assert_relative_eq!(earth.scale.x, 99.0, epsilon = 1e-4);
        assert!(earth.uses_material(h.view.shading_material(Shading::Lambert)));
    }

    #[test]
    fn test_hidden_globe_keeps_lights() {
        let mut options = quiet_options();
        options.show = false;
        let mut h = Harness::new(options);
        h.frame();
        assert!(!h.coord_sys.scene.contains_group(h.view.group()));
        assert!(h.coord_sys.scene.contains_group(h.view.lights().root()));
    }

    #[test]
    fn test_shading_selects_material_from_table() {
        let mut options = quiet_options();
        options.shading = Shading::Realistic;
        options.realistic_material.roughness = 0.8;
        let mut h = Harness::new(options);
        h.frame();

        let realistic = h.view.shading_material(Shading::Realistic).clone();
        assert!(h.view.earth_mesh().lock().uses_material(&realistic));
        let material = realistic.lock();
        assert_eq!(material.float(uniforms::ROUGHNESS), Some(0.8));
        assert_eq!(material.color(uniforms::COLOR), Some([1.0; 4]));
        assert_eq!(material.shader.kind(), ShaderKind::Realistic);
    }

    #[test]
    fn test_base_and_height_textures() {
        let mut options = quiet_options();
        options.base_texture = Some(TextureRef::path("earth.jpg"));
        options.height_texture = Some(TextureRef::surface("height"));
        options.post_effect.enable = true;
        let mut h = Harness::new(options);
        h.frame();

        let material = h.view.shading_material(Shading::Lambert).lock();
        let diffuse = material.texture(uniforms::DIFFUSE_MAP).unwrap();
        assert_eq!(diffuse.source(), Some(&TextureRef::path("earth.jpg")));
        assert_eq!(diffuse.options(), TextureOptions::globe());
        assert!(material.shader.is_texture_enabled(uniforms::BUMP_MAP));
        assert!(material.shader.is_defined(ShaderStage::Fragment, defines::SRGB_DECODE));
        assert_eq!(h.view.earth_mesh().lock().surfaces().len(), 1);
        assert!(h.coord_sys.scene.post_effect_enabled);
    }

    #[test]
    fn test_displacement_runs_only_on_change() {
        let mut h = Harness::new(quiet_options());
        assert!(h.frame().displaced);
        assert!(!h.frame().displaced);

        h.coord_sys
            .set_height_field(Some(HeightField::new(2, 2, vec![0.1; 4]).unwrap()));
        assert!(h.view.update_layout(&h.model, &mut h.coord_sys));
        assert!(!h.frame().displaced);

        h.model.options.displacement_quality = Quality::High;
        assert!(h.frame().displaced);
        assert_eq!(h.view.displacement().geometry().read().vertex_count(), 401 * 201);
    }

    #[test]
    fn test_displacement_scale_drives_height_image() {
        let mut options = quiet_options();
        options.displacement_scale = 0.1;
        let mut h = Harness::new(options);
        h.coord_sys.set_height_image(Some(HeightImage {
            pixels: vec![255; 16],
            width: 4,
            height: 4,
            stride: 1,
        }));
        assert!(h.frame().displaced);
        let scaled = h.view.displacement().geometry().read().positions().to_vec();
        let pristine = h.view.displacement().pristine_positions().unwrap().to_vec();
        let i = pristine.iter().position(|p| p[1].abs() > 0.5).unwrap();
        assert_relative_eq!(scaled[i][1], pristine[i][1] * 1.1, epsilon = 1e-5);
        assert!(!h.frame().displaced);

        h.model.options.displacement_scale = 0.3;
        assert!(h.frame().displaced);
        let rescaled = h.view.displacement().geometry().read().positions().to_vec();
        assert_relative_eq!(rescaled[i][1], pristine[i][1] * 1.3, epsilon = 1e-5);
    }

    #[test]
    fn test_layers_composited_each_frame() {
        let mut options = quiet_options();
        options.layers = vec![
            LayerOptions::overlay("clouds", "clouds.png").with_distance(5.0),
            LayerOptions::blend("night.png"),
        ];
        let mut h = Harness::new(options);
        let report = h.frame();
        assert_eq!(report.layers.overlay_radii, vec![("clouds".to_string(), 105.0)]);
        assert_eq!(report.layers.diffuse_layers, 1);
        assert_eq!(h.view.group().lock().meshes().len(), 2);

        h.loader.pump();
        assert!(h.host.redraw.take());
    }

    #[test]
    fn test_camera_action_round_trip() {
        let mut options = quiet_options();
        options.view_control.target_coord = Some([30.0, 10.0]);
        let mut h = Harness::new(options);
        h.frame();
        h.frame();
        assert!(h.host.actions.is_empty());

        h.view.view_control_mut().control_mut().rotate(20.0, 0.0);
        let actions = h.host.actions.drain();
        assert_eq!(actions.len(), 1);
        let GlobeAction::ChangeCamera(change) = &actions[0];
        assert_eq!(change.from, h.view.id());
        assert_relative_eq!(change.distance, 150.0, epsilon = 1e-3);
        assert_relative_eq!(change.beta, 116.0, epsilon = 1e-4);

        assert!(h.model.apply_action(&actions[0]));
        assert_eq!(h.model.options.view_control.target_coord, None);
        h.frame();
        let state = h.view.view_control_mut().control().state();
        assert_relative_eq!(state.beta, 116.0, epsilon = 1e-4);
        assert!(h.host.actions.is_empty());
    }

    #[test]
    fn test_inertia_survives_frames() {
        let mut options = quiet_options();
        options.view_control.damping = 0.8;
        let mut h = Harness::new(options);
        h.frame();

        h.view.view_control_mut().control_mut().rotate(-100.0, 0.0);
        for action in h.host.actions.drain() {
            h.model.apply_action(&action);
        }
        let mut betas = vec![h.view.view_control_mut().control().state().beta];

        for _ in 0..5 {
            h.frame();
            h.view.view_control_mut().control_mut().tick(1.0 / 60.0);
            for action in h.host.actions.drain() {
                h.model.apply_action(&action);
            }
            betas.push(h.view.view_control_mut().control().state().beta);
        }

        assert_relative_eq!(betas[0], 20.0, epsilon = 1e-4);
        assert_relative_eq!(betas[1], 36.0, epsilon = 1e-3);
        assert!(betas.windows(2).all(|w| w[1] > w[0]));
        assert_relative_eq!(h.model.options.view_control.beta, betas[5], epsilon = 1e-4);
    }

    #[test]
    fn test_dispose_empties_group() {
        let mut options = quiet_options();
        options.layers = vec![LayerOptions::overlay("a", "a.png")];
        let mut h = Harness::new(options);
        h.frame();
        h.view.dispose();
        assert!(h.view.group().lock().meshes().is_empty());
        h.view.view_control_mut().control_mut().rotate(5.0, 5.0);
        assert!(h.host.actions.is_empty());
    }
}
