//! Layer compositing.
//!
//! Each layer descriptor is either blended into the base surface shader
//! (albedo or emission arrays) or drawn as a transparent overlay shell at a
//! radius stacked on top of the previous overlay. Overlay meshes and their
//! materials live in a registry keyed by layer id and survive across
//! passes; the blend arrays are rebuilt on every pass.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use globe_core::constants::{LAYER_SPACING_DIVISOR, OVERLAY_HEIGHT_SEGMENTS, OVERLAY_WIDTH_SEGMENTS};
use globe_core::options::WireframeOptions;
use globe_core::{BlendTarget, LayerKind, LayerOptions, OverlayShading, SphereGeometry, TextureRef};

use crate::constants::{PLACEHOLDER_COLOR, defines, uniforms};
use crate::host::HostApi;
use crate::scene::{
    Material, Mesh, ShaderKind, ShaderStage, SharedGeometry, SharedGroup, SharedMaterial,
    SharedMesh, UniformValue,
};
use crate::texture::{Texture, TextureHandle, TextureOptions};

/// Where composited layers go
pub struct LayerTarget<'a> {
    /// Mesh whose material receives the blend arrays
    pub base_mesh: &'a SharedMesh,
    /// Group overlay meshes are attached to
    pub group: &'a SharedGroup,
    /// Radius of the globe; the first overlay stacks on top of it
    pub base_radius: f32,
}

/// Summary of one compositing pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeReport {
    /// Layers blended into the albedo
    pub diffuse_layers: usize,
    /// Layers blended into the emission
    pub emissive_layers: usize,
    /// `(id, radius)` of each overlay in declaration order
    pub overlay_radii: Vec<(String, f32)>,
}

/// Blend arrays collected during one pass
#[derive(Default)]
struct BlendAccumulators {
    diffuse_maps: Vec<TextureHandle>,
    diffuse_intensities: Vec<f32>,
    emissive_maps: Vec<TextureHandle>,
    emission_intensities: Vec<f32>,
}

impl BlendAccumulators {
    fn push(&mut self, target: BlendTarget, texture: TextureHandle, intensity: f32) {
        match target {
            BlendTarget::Emission => {
                self.emissive_maps.push(texture);
                self.emission_intensities.push(intensity);
            }
            BlendTarget::Albedo => {
                self.diffuse_maps.push(texture);
                self.diffuse_intensities.push(intensity);
            }
        }
    }

    /// Bind the arrays and size the shader's array directives from them
    fn apply_to(self, material: &mut Material) {
        material.shader.define_value(
            ShaderStage::Fragment,
            defines::LAYER_DIFFUSEMAP_COUNT,
            self.diffuse_maps.len(),
        );
        material.shader.define_value(
            ShaderStage::Fragment,
            defines::LAYER_EMISSIVEMAP_COUNT,
            self.emissive_maps.len(),
        );
        material.set(
            uniforms::LAYER_DIFFUSE_MAP,
            UniformValue::TextureArray(self.diffuse_maps),
        );
        material.set(
            uniforms::LAYER_DIFFUSE_INTENSITY,
            UniformValue::FloatArray(self.diffuse_intensities),
        );
        material.set(
            uniforms::LAYER_EMISSIVE_MAP,
            UniformValue::TextureArray(self.emissive_maps),
        );
        material.set(
            uniforms::LAYER_EMISSION_INTENSITY,
            UniformValue::FloatArray(self.emission_intensities),
        );
    }
}

/// Registry entry of one overlay layer
struct OverlayEntry {
    mesh: SharedMesh,
    lambert: Option<SharedMaterial>,
    color: Option<SharedMaterial>,
}

impl OverlayEntry {
    fn new(key: &str, geometry: SharedGeometry) -> Self {
        let mut mesh = Mesh::new(format!("overlay:{key}"));
        mesh.geometry = Some(geometry);
        mesh.cast_shadow = false;
        mesh.ignore_picking = true;
        Self {
            mesh: mesh.shared(),
            lambert: None,
            color: None,
        }
    }

    /// The entry's material for `shading`, created on first use
    fn material(&mut self, shading: OverlayShading) -> SharedMaterial {
        let slot = match shading {
            OverlayShading::Lambert => &mut self.lambert,
            OverlayShading::Color => &mut self.color,
        };
        slot.get_or_insert_with(|| Material::transparent(ShaderKind::from(shading)).shared())
            .clone()
    }
}

/// Classifies layers and maintains the overlay registry
pub struct LayerCompositor {
    overlays: HashMap<String, OverlayEntry>,
    overlay_geometry: SharedGeometry,
    placeholder: TextureHandle,
}

impl Default for LayerCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerCompositor {
    /// Create an empty compositor
    pub fn new() -> Self {
        let geometry = SphereGeometry::new(OVERLAY_WIDTH_SEGMENTS, OVERLAY_HEIGHT_SEGMENTS);
        Self {
            overlays: HashMap::new(),
            overlay_geometry: Arc::new(RwLock::new(geometry)),
            placeholder: Texture::blank(PLACEHOLDER_COLOR),
        }
    }

    /// Composite `layers` in declaration order, then apply the debug
    /// wireframe directives to the base material.
    pub fn composite(
        &mut self,
        layers: &[LayerOptions],
        wireframe: &WireframeOptions,
        target: &LayerTarget<'_>,
        host: &HostApi,
    ) -> CompositeReport {
        let mut blend = BlendAccumulators::default();
        let mut report = CompositeReport::default();
        let mut last_radius = target.base_radius;

        for layer in layers {
            match layer.kind {
                LayerKind::Blend => {
                    let Some(source) = &layer.texture else {
                        tracing::warn!("Blend layer without texture skipped");
                        continue;
                    };
                    let texture = host.textures.load(source, TextureOptions::globe(), None);
                    texture.attach_surface_to(&mut target.base_mesh.lock());
                    blend.push(layer.blend_to, texture, layer.resolved_intensity());
                }
                LayerKind::Overlay => {
                    let radius = last_radius
                        + layer
                            .distance
                            .unwrap_or(target.base_radius / LAYER_SPACING_DIVISOR);
                    last_radius = radius;
                    self.update_overlay(layer, radius, target.group, host);
                    report
                        .overlay_radii
                        .push((layer.overlay_key().to_string(), radius));
                }
            }
        }

        report.diffuse_layers = blend.diffuse_maps.len();
        report.emissive_layers = blend.emissive_maps.len();

        let base_material = target.base_mesh.lock().material.clone();
        match base_material {
            Some(material) => {
                let mut material = material.lock();
                blend.apply_to(&mut material);
                apply_wireframe(&mut material, wireframe);
            }
            None => tracing::warn!("Base mesh has no material, blend layers not applied"),
        }

        tracing::debug!(
            "Composited {} layer(s): {} albedo, {} emission, {} overlay",
            layers.len(),
            report.diffuse_layers,
            report.emissive_layers,
            report.overlay_radii.len()
        );
        report
    }

    fn update_overlay(
        &mut self,
        layer: &LayerOptions,
        radius: f32,
        group: &SharedGroup,
        host: &HostApi,
    ) {
        let key = layer.overlay_key();
        if layer.id.is_none() {
            tracing::warn!("Overlay layer without id shares the unnamed registry slot");
        }
        let geometry = &self.overlay_geometry;
        let entry = self.overlays.entry(key.to_string()).or_insert_with(|| {
            tracing::info!("Created overlay mesh '{}'", key);
            OverlayEntry::new(key, geometry.clone())
        });

        let material = entry.material(layer.shading);
        let mesh = entry.mesh.clone();
        {
            let mut mesh = mesh.lock();
            mesh.material = Some(material.clone());
            mesh.set_uniform_scale(radius);
        }

        {
            let mut m = material.lock();
            m.shader.enable_texture(uniforms::DIFFUSE_MAP);
            let resolved = m
                .texture(uniforms::DIFFUSE_MAP)
                .is_some_and(|bound| is_resolved(bound, layer.texture.as_ref()));
            if !resolved {
                m.set(
                    uniforms::DIFFUSE_MAP,
                    UniformValue::Texture(self.placeholder.clone()),
                );
            }
        }

        if let Some(source) = &layer.texture {
            let mesh = mesh.clone();
            let material = material.clone();
            let redraw = host.redraw.clone();
            host.textures.load(
                source,
                TextureOptions::globe(),
                Some(Box::new(move |texture: TextureHandle| {
                    texture.attach_surface_to(&mut mesh.lock());
                    material
                        .lock()
                        .set(uniforms::DIFFUSE_MAP, UniformValue::Texture(texture));
                    redraw.request();
                })),
            );
        }

        let mut group = group.lock();
        if layer.show {
            group.add(&mesh);
        } else {
            group.remove(&mesh);
        }
    }

    /// Overlay mesh registered under `id`
    pub fn overlay_mesh(&self, id: &str) -> Option<&SharedMesh> {
        self.overlays.get(id).map(|entry| &entry.mesh)
    }

    /// Overlay material for `shading`, if it was ever created
    pub fn overlay_material(&self, id: &str, shading: OverlayShading) -> Option<&SharedMaterial> {
        let entry = self.overlays.get(id)?;
        match shading {
            OverlayShading::Lambert => entry.lambert.as_ref(),
            OverlayShading::Color => entry.color.as_ref(),
        }
    }

    /// Number of registered overlays
    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Transparent texture bound while overlay textures load
    pub fn placeholder(&self) -> &TextureHandle {
        &self.placeholder
    }

    /// Detach every overlay from `group` and drop the registry
    pub fn clear(&mut self, group: &SharedGroup) {
        let mut group = group.lock();
        for entry in self.overlays.values() {
            group.remove(&entry.mesh);
        }
        self.overlays.clear();
    }
}

fn is_resolved(bound: &TextureHandle, source: Option<&TextureRef>) -> bool {
    !bound.is_blank() && bound.source() == source
}

fn apply_wireframe(material: &mut Material, wireframe: &WireframeOptions) {
    if wireframe.show {
        material
            .shader
            .define(ShaderStage::Both, defines::WIREFRAME_TRIANGLE);
        material.set(
            uniforms::WIREFRAME_LINE_WIDTH,
            UniformValue::Float(wireframe.line_style.resolved_width()),
        );
        material.set(
            uniforms::WIREFRAME_LINE_COLOR,
            UniformValue::Color(wireframe.line_style.resolved_color()),
        );
    } else {
        material
            .shader
            .undefine(ShaderStage::Both, defines::WIREFRAME_TRIANGLE);
    }
}
