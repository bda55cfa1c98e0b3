//! Scene-graph mesh node

use std::sync::Arc;

use glam::Vec3;
use parking_lot::{Mutex, RwLock};

use globe_core::SphereGeometry;

use crate::scene::SharedMaterial;
use crate::texture::SurfaceId;

/// Geometry shared between a mesh and the component that edits it
pub type SharedGeometry = Arc<RwLock<SphereGeometry>>;

/// Shared handle to a mesh
pub type SharedMesh = Arc<Mutex<Mesh>>;

/// A renderable node: geometry, material and transform
#[derive(Debug)]
pub struct Mesh {
    /// Debug name
    pub name: String,
    /// Geometry drawn by this mesh
    pub geometry: Option<SharedGeometry>,
    /// Material currently bound
    pub material: Option<SharedMaterial>,
    /// Local translation
    pub position: Vec3,
    /// Local scale
    pub scale: Vec3,
    /// Whether the mesh casts shadows
    pub cast_shadow: bool,
    /// Whether picking skips the mesh
    pub ignore_picking: bool,
    /// Whether a normal pass renders the mesh
    pub render_normal: bool,
    surfaces: Vec<SurfaceId>,
}

impl Mesh {
    /// Create an empty mesh at the origin
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            geometry: None,
            material: None,
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            cast_shadow: true,
            ignore_picking: false,
            render_normal: true,
            surfaces: Vec::new(),
        }
    }

    /// Set geometry and material
    pub fn with_parts(mut self, geometry: SharedGeometry, material: SharedMaterial) -> Self {
        self.geometry = Some(geometry);
        self.material = Some(material);
        self
    }

    /// Wrap in a shared handle
    pub fn shared(self) -> SharedMesh {
        Arc::new(Mutex::new(self))
    }

    /// Scale all three axes by `scale`
    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.scale = Vec3::splat(scale);
    }

    /// Attach a texture surface; attaching twice is a no-op
    pub fn attach_surface(&mut self, surface: SurfaceId) {
        if !self.surfaces.contains(&surface) {
            self.surfaces.push(surface);
        }
    }

    /// Surfaces attached to this mesh
    pub fn surfaces(&self) -> &[SurfaceId] {
        &self.surfaces
    }

    /// World-space position (meshes are direct children of a root group)
    pub fn world_position(&self) -> Vec3 {
        self.position
    }

    /// Whether `material` is the one currently bound
    pub fn uses_material(&self, material: &SharedMaterial) -> bool {
        self.material
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, material))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Material, ShaderKind};

    #[test]
    fn test_uniform_scale() {
        let mut mesh = Mesh::new("overlay");
        mesh.set_uniform_scale(11.0);
        assert_eq!(mesh.scale, Vec3::splat(11.0));
    }

    #[test]
    fn test_uses_material_by_identity() {
        let a = Material::new(ShaderKind::Color).shared();
        let b = Material::new(ShaderKind::Color).shared();
        let geometry = Arc::new(RwLock::new(SphereGeometry::new(4, 2)));
        let mesh = Mesh::new("m").with_parts(geometry, a.clone());
        assert!(mesh.uses_material(&a));
        assert!(!mesh.uses_material(&b));
    }
}
