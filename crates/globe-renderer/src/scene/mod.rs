//! In-memory scene graph the globe attaches to
//!
//! The host renders this graph; the globe only adds, removes and edits
//! nodes through shared handles.

mod material;
mod mesh;

pub use material::{Material, Shader, ShaderKind, ShaderStage, SharedMaterial, UniformValue};
pub use mesh::{Mesh, SharedGeometry, SharedMesh};

use std::sync::Arc;

use parking_lot::Mutex;

use crate::light::SharedLight;

/// Shared handle to a group
pub type SharedGroup = Arc<Mutex<Group>>;

/// Flat node container
#[derive(Debug, Default)]
pub struct Group {
    /// Debug name
    pub name: String,
    meshes: Vec<SharedMesh>,
    lights: Vec<SharedLight>,
}

impl Group {
    /// Create an empty group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Wrap in a shared handle
    pub fn shared(self) -> SharedGroup {
        Arc::new(Mutex::new(self))
    }

    /// Add a mesh unless it is already a child
    pub fn add(&mut self, mesh: &SharedMesh) {
        if !self.contains(mesh) {
            self.meshes.push(mesh.clone());
        }
    }

    /// Remove a mesh if present
    pub fn remove(&mut self, mesh: &SharedMesh) {
        self.meshes.retain(|m| !Arc::ptr_eq(m, mesh));
    }

    /// Whether the mesh is a child
    pub fn contains(&self, mesh: &SharedMesh) -> bool {
        self.meshes.iter().any(|m| Arc::ptr_eq(m, mesh))
    }

    /// Add a light unless it is already a child
    pub fn add_light(&mut self, light: &SharedLight) {
        if !self.lights.iter().any(|l| Arc::ptr_eq(l, light)) {
            self.lights.push(light.clone());
        }
    }

    /// Child meshes in insertion order
    pub fn meshes(&self) -> &[SharedMesh] {
        &self.meshes
    }

    /// Child lights in insertion order
    pub fn lights(&self) -> &[SharedLight] {
        &self.lights
    }

    /// Remove every child
    pub fn clear(&mut self) {
        self.meshes.clear();
        self.lights.clear();
    }
}

/// Root of the scene graph plus frame-wide render settings
#[derive(Debug, Default)]
pub struct Scene {
    groups: Vec<SharedGroup>,
    /// Post effect chain enabled
    pub post_effect_enabled: bool,
    /// Temporal super sampling enabled
    pub temporal_super_sampling: bool,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a group unless it is already attached
    pub fn add_group(&mut self, group: &SharedGroup) {
        if !self.contains_group(group) {
            self.groups.push(group.clone());
        }
    }

    /// Detach a group if attached
    pub fn remove_group(&mut self, group: &SharedGroup) {
        self.groups.retain(|g| !Arc::ptr_eq(g, group));
    }

    /// Whether a group is attached
    pub fn contains_group(&self, group: &SharedGroup) -> bool {
        self.groups.iter().any(|g| Arc::ptr_eq(g, group))
    }

    /// Attached groups
    pub fn groups(&self) -> &[SharedGroup] {
        &self.groups
    }

    /// Apply post effect settings. Temporal super sampling follows the
    /// post effect flag unless set explicitly.
    pub fn set_post_effect(&mut self, enable: bool, temporal_super_sampling: Option<bool>) {
        self.post_effect_enabled = enable;
        self.temporal_super_sampling = temporal_super_sampling.unwrap_or(enable);
    }

    /// Total number of meshes across attached groups
    pub fn mesh_count(&self) -> usize {
        self.groups.iter().map(|g| g.lock().meshes().len()).sum()
    }
}
