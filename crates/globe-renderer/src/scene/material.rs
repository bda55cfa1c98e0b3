//! Materials: a shader program description plus uniform values.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::Mutex;

use globe_core::{OverlayShading, Shading};

use crate::texture::TextureHandle;

/// Shared handle to a material.
///
/// Texture callbacks write through this handle after the compositing pass
/// that created it has returned.
pub type SharedMaterial = Arc<Mutex<Material>>;

/// Shader program family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    /// Unlit flat color.
    Color,
    /// Diffuse-only lighting.
    Lambert,
    /// Physically based lighting.
    Realistic,
}

impl From<Shading> for ShaderKind {
    fn from(shading: Shading) -> Self {
        match shading {
            Shading::Color => ShaderKind::Color,
            Shading::Lambert => ShaderKind::Lambert,
            Shading::Realistic => ShaderKind::Realistic,
        }
    }
}

impl From<OverlayShading> for ShaderKind {
    fn from(shading: OverlayShading) -> Self {
        match shading {
            OverlayShading::Lambert => ShaderKind::Lambert,
            OverlayShading::Color => ShaderKind::Color,
        }
    }
}

/// Shader stage a directive applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex stage only.
    Vertex,
    /// Fragment stage only.
    Fragment,
    /// Both stages.
    Both,
}

/// Shader description: program family, preprocessor directives and enabled
/// texture slots.
#[derive(Debug, Clone)]
pub struct Shader {
    kind: ShaderKind,
    vertex_defines: BTreeMap<String, Option<usize>>,
    fragment_defines: BTreeMap<String, Option<usize>>,
    enabled_textures: BTreeSet<String>,
}

impl Shader {
    /// Creates a shader with no directives.
    pub fn new(kind: ShaderKind) -> Self {
        Self {
            kind,
            vertex_defines: BTreeMap::new(),
            fragment_defines: BTreeMap::new(),
            enabled_textures: BTreeSet::new(),
        }
    }

    /// Program family.
    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    fn stage_maps(&mut self, stage: ShaderStage) -> Vec<&mut BTreeMap<String, Option<usize>>> {
        match stage {
            ShaderStage::Vertex => vec![&mut self.vertex_defines],
            ShaderStage::Fragment => vec![&mut self.fragment_defines],
            ShaderStage::Both => vec![&mut self.vertex_defines, &mut self.fragment_defines],
        }
    }

    /// Defines a valueless directive.
    pub fn define(&mut self, stage: ShaderStage, name: &str) {
        for map in self.stage_maps(stage) {
            map.insert(name.to_string(), None);
        }
    }

    /// Defines a directive with a numeric value (e.g. an array size).
    pub fn define_value(&mut self, stage: ShaderStage, name: &str, value: usize) {
        for map in self.stage_maps(stage) {
            map.insert(name.to_string(), Some(value));
        }
    }

    /// Removes a directive.
    pub fn undefine(&mut self, stage: ShaderStage, name: &str) {
        for map in self.stage_maps(stage) {
            map.remove(name);
        }
    }

    /// Returns true if the directive is defined on the stage (on both for [`ShaderStage::Both`]).
    pub fn is_defined(&self, stage: ShaderStage, name: &str) -> bool {
        match stage {
            ShaderStage::Vertex => self.vertex_defines.contains_key(name),
            ShaderStage::Fragment => self.fragment_defines.contains_key(name),
            ShaderStage::Both => {
                self.vertex_defines.contains_key(name) && self.fragment_defines.contains_key(name)
            }
        }
    }

    /// Numeric value of a directive on a single stage.
    pub fn define_value_of(&self, stage: ShaderStage, name: &str) -> Option<usize> {
        let map = match stage {
            ShaderStage::Vertex => &self.vertex_defines,
            ShaderStage::Fragment | ShaderStage::Both => &self.fragment_defines,
        };
        map.get(name).copied().flatten()
    }

    /// Enables sampling from a texture slot.
    pub fn enable_texture(&mut self, name: &str) {
        self.enabled_textures.insert(name.to_string());
    }

    /// Disables sampling from a texture slot.
    pub fn disable_texture(&mut self, name: &str) {
        self.enabled_textures.remove(name);
    }

    /// Returns true if the texture slot is enabled.
    pub fn is_texture_enabled(&self, name: &str) -> bool {
        self.enabled_textures.contains(name)
    }
}

/// Value bound to a uniform.
#[derive(Debug, Clone)]
pub enum UniformValue {
    /// Scalar.
    Float(f32),
    /// RGBA color.
    Color([f32; 4]),
    /// Single texture.
    Texture(TextureHandle),
    /// Texture array.
    TextureArray(Vec<TextureHandle>),
    /// Scalar array.
    FloatArray(Vec<f32>),
}

/// Shader plus uniform bindings and blend state.
#[derive(Debug, Clone)]
pub struct Material {
    /// Shader description.
    pub shader: Shader,
    /// Whether the material is alpha blended.
    pub transparent: bool,
    /// Whether the material writes depth.
    pub depth_mask: bool,
    uniforms: HashMap<String, UniformValue>,
}

impl Material {
    /// Creates an opaque material.
    pub fn new(kind: ShaderKind) -> Self {
        Self {
            shader: Shader::new(kind),
            transparent: false,
            depth_mask: true,
            uniforms: HashMap::new(),
        }
    }

    /// Creates an alpha blended material that does not write depth.
    pub fn transparent(kind: ShaderKind) -> Self {
        Self {
            transparent: true,
            depth_mask: false,
            ..Self::new(kind)
        }
    }

    /// Wraps the material in a shared handle.
    pub fn shared(self) -> SharedMaterial {
        Arc::new(Mutex::new(self))
    }

    /// Binds a uniform value.
    pub fn set(&mut self, name: &str, value: UniformValue) {
        self.uniforms.insert(name.to_string(), value);
    }

    /// Returns the value bound to a uniform.
    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.uniforms.get(name)
    }

    /// Unbinds a uniform.
    pub fn remove(&mut self, name: &str) -> Option<UniformValue> {
        self.uniforms.remove(name)
    }

    /// Returns the texture bound to a uniform, if it holds a single texture.
    pub fn texture(&self, name: &str) -> Option<&TextureHandle> {
        match self.uniforms.get(name) {
            Some(UniformValue::Texture(texture)) => Some(texture),
            _ => None,
        }
    }

    /// Returns the textures bound to an array uniform.
    pub fn texture_array(&self, name: &str) -> Option<&[TextureHandle]> {
        match self.uniforms.get(name) {
            Some(UniformValue::TextureArray(textures)) => Some(textures),
            _ => None,
        }
    }

    /// Returns the scalars bound to an array uniform.
    pub fn float_array(&self, name: &str) -> Option<&[f32]> {
        match self.uniforms.get(name) {
            Some(UniformValue::FloatArray(values)) => Some(values),
            _ => None,
        }
    }

    /// Returns the scalar bound to a uniform.
    pub fn float(&self, name: &str) -> Option<f32> {
        match self.uniforms.get(name) {
            Some(UniformValue::Float(value)) => Some(*value),
            _ => None,
        }
    }

    /// Returns the color bound to a uniform.
    pub fn color(&self, name: &str) -> Option<[f32; 4]> {
        match self.uniforms.get(name) {
            Some(UniformValue::Color(color)) => Some(*color),
            _ => None,
        }
    }
}
