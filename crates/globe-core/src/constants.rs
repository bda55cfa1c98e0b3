//! Global constants for globe-core

/// Width segments used when the quality tier name is not recognised
pub const DEFAULT_WIDTH_SEGMENTS: u32 = 200;

/// Width segments of the shared overlay shell geometry
pub const OVERLAY_WIDTH_SEGMENTS: u32 = 80;

/// Height segments of the shared overlay shell geometry
pub const OVERLAY_HEIGHT_SEGMENTS: u32 = 40;

/// The earth mesh is scaled to `radius * EARTH_RADIUS_SHRINK` so overlays never z-fight with it
pub const EARTH_RADIUS_SHRINK: f32 = 0.99;

/// Overlay layers without an explicit distance sit `radius / LAYER_SPACING_DIVISOR` above the previous one
pub const LAYER_SPACING_DIVISOR: f32 = 100.0;

/// Blend layer intensity when none is given
pub const DEFAULT_LAYER_INTENSITY: f32 = 1.0;

/// Wireframe line color when the debug line style has none (RGBA)
pub const DEFAULT_WIREFRAME_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 0.5];

/// Wireframe line width when the debug line style has none
pub const DEFAULT_WIREFRAME_WIDTH: f32 = 1.0;

/// Default base color of the globe surface (RGBA)
pub const DEFAULT_BASE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Anisotropic filtering level requested for every globe texture
pub const TEXTURE_ANISOTROPY: u8 = 8;

/// Offset added to a target longitude to obtain the orbit azimuth (degrees)
pub const TARGET_LONGITUDE_OFFSET: f32 = 90.0;
