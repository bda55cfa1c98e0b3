//! Shader vocabulary and renderer-wide constants

/// Uniform names understood by the globe shaders
pub mod uniforms {
    /// Base surface / overlay texture
    pub const DIFFUSE_MAP: &str = "diffuseMap";
    /// Height texture used for bump shading
    pub const BUMP_MAP: &str = "bumpMap";
    /// Base color (RGBA)
    pub const COLOR: &str = "color";
    /// Realistic shading roughness
    pub const ROUGHNESS: &str = "roughness";
    /// Realistic shading metalness
    pub const METALNESS: &str = "metalness";
    /// Albedo blend layer textures
    pub const LAYER_DIFFUSE_MAP: &str = "layerDiffuseMap";
    /// Albedo blend layer weights
    pub const LAYER_DIFFUSE_INTENSITY: &str = "layerDiffuseIntensity";
    /// Emissive blend layer textures
    pub const LAYER_EMISSIVE_MAP: &str = "layerEmissiveMap";
    /// Emissive blend layer weights
    pub const LAYER_EMISSION_INTENSITY: &str = "layerEmissionIntensity";
    /// Debug wireframe line width
    pub const WIREFRAME_LINE_WIDTH: &str = "wireframeLineWidth";
    /// Debug wireframe line color (RGBA)
    pub const WIREFRAME_LINE_COLOR: &str = "wireframeLineColor";
}

/// Preprocessor directives toggled on the globe shaders
pub mod defines {
    /// Size of the albedo blend layer arrays
    pub const LAYER_DIFFUSEMAP_COUNT: &str = "LAYER_DIFFUSEMAP_COUNT";
    /// Size of the emissive blend layer arrays
    pub const LAYER_EMISSIVEMAP_COUNT: &str = "LAYER_EMISSIVEMAP_COUNT";
    /// Barycentric triangle wireframe
    pub const WIREFRAME_TRIANGLE: &str = "WIREFRAME_TRIANGLE";
    /// Decode sRGB textures to linear (post effects enabled)
    pub const SRGB_DECODE: &str = "SRGB_DECODE";
}

/// Orbit controller tuning
pub mod orbit {
    /// Degrees of rotation per pixel of drag at sensitivity 1
    pub const ROTATE_DEGREES_PER_PIXEL: f32 = 0.2;
    /// Fractional distance change per zoom step at sensitivity 1
    pub const ZOOM_STEP: f32 = 0.1;
    /// World units per pixel of pan, relative to the orbit distance
    pub const PAN_SCALE: f32 = 0.002;
    /// Inertial velocities below this (degrees per frame) stop
    pub const VELOCITY_EPSILON: f32 = 1e-3;
    /// Tolerance when matching configured placements against the current state
    pub const STATE_EPSILON: f32 = 1e-3;
}

/// Color of the placeholder bound to overlays whose texture has not arrived
pub const PLACEHOLDER_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.0];
