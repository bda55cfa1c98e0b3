//! Globe option schema
//!
//! Options are read from RON or JSON documents. Every struct is
//! `#[serde(default)]`, so partial documents load and missing fields take the
//! documented defaults. Name-valued enums never fail to parse: unknown names
//! fall back to a default and log a warning.

mod layer;
mod view_control;

pub use layer::{BlendTarget, LayerKind, LayerOptions, OverlayShading, TextureRef};
pub use view_control::{AutoRotateDirection, ViewControlOptions};

use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE_COLOR, DEFAULT_WIDTH_SEGMENTS, DEFAULT_WIREFRAME_COLOR, DEFAULT_WIREFRAME_WIDTH,
};

/// Option loading errors
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported options file extension: {0}")]
    UnsupportedFormat(String),
}

/// Displacement mesh resolution tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Quality {
    Low,
    #[default]
    Medium,
    High,
    Ultra,
}

impl Quality {
    /// Parse a tier name, `None` if unrecognised
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "low" => Some(Quality::Low),
            "medium" => Some(Quality::Medium),
            "high" => Some(Quality::High),
            "ultra" => Some(Quality::Ultra),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Quality::Low => "low",
            Quality::Medium => "medium",
            Quality::High => "high",
            Quality::Ultra => "ultra",
        }
    }

    /// Longitude segments of the displaced sphere
    pub fn width_segments(self) -> u32 {
        match self {
            Quality::Low => 100,
            Quality::Medium => DEFAULT_WIDTH_SEGMENTS,
            Quality::High => 400,
            Quality::Ultra => 800,
        }
    }

    /// Latitude segments, always half the width
    pub fn height_segments(self) -> u32 {
        self.width_segments() / 2
    }
}

impl From<String> for Quality {
    fn from(name: String) -> Self {
        Quality::from_name(&name).unwrap_or_else(|| {
            tracing::warn!("Unknown displacement quality '{}', using medium", name);
            Quality::Medium
        })
    }
}

impl From<Quality> for String {
    fn from(quality: Quality) -> Self {
        quality.name().to_string()
    }
}

/// Shading model of the base surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Shading {
    /// Unlit flat color
    Color,
    #[default]
    Lambert,
    /// Physically based (roughness / metalness)
    Realistic,
}

impl Shading {
    /// All shading models, in material table order
    pub const ALL: [Shading; 3] = [Shading::Color, Shading::Lambert, Shading::Realistic];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "color" => Some(Shading::Color),
            "lambert" => Some(Shading::Lambert),
            "realistic" => Some(Shading::Realistic),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Shading::Color => "color",
            Shading::Lambert => "lambert",
            Shading::Realistic => "realistic",
        }
    }
}

impl From<String> for Shading {
    fn from(name: String) -> Self {
        Shading::from_name(&name).unwrap_or_else(|| {
            tracing::warn!("Unknown shading '{}', using lambert", name);
            Shading::Lambert
        })
    }
}

impl From<Shading> for String {
    fn from(shading: Shading) -> Self {
        shading.name().to_string()
    }
}

/// Material parameters for realistic shading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealisticMaterialOptions {
    pub roughness: f32,
    pub metalness: f32,
}

impl Default for RealisticMaterialOptions {
    fn default() -> Self {
        Self {
            roughness: 0.5,
            metalness: 0.0,
        }
    }
}

/// Line style of the debug wireframe
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    pub color: Option<[f32; 4]>,
    pub width: Option<f32>,
}

impl LineStyle {
    pub fn resolved_color(&self) -> [f32; 4] {
        self.color.unwrap_or(DEFAULT_WIREFRAME_COLOR)
    }

    pub fn resolved_width(&self) -> f32 {
        self.width.unwrap_or(DEFAULT_WIREFRAME_WIDTH)
    }
}

/// Triangle wireframe drawn over the displaced surface
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WireframeOptions {
    pub show: bool,
    pub line_style: LineStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugOptions {
    pub wireframe: WireframeOptions,
}

/// Sun light settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainLightOptions {
    /// Milliseconds since the Unix epoch; the current time when absent
    pub time: Option<u64>,
    pub intensity: f32,
    pub color: [f32; 4],
    pub shadow: bool,
}

impl Default for MainLightOptions {
    fn default() -> Self {
        Self {
            time: None,
            intensity: 1.0,
            color: [1.0; 4],
            shadow: false,
        }
    }
}

impl MainLightOptions {
    /// Moment used to position the sun
    pub fn resolved_time(&self) -> SystemTime {
        match self.time {
            Some(ms) => UNIX_EPOCH + Duration::from_millis(ms),
            None => SystemTime::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientLightOptions {
    pub intensity: f32,
    pub color: [f32; 4],
}

impl Default for AmbientLightOptions {
    fn default() -> Self {
        Self {
            intensity: 0.2,
            color: [1.0; 4],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightOptions {
    pub main: MainLightOptions,
    pub ambient: AmbientLightOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostEffectOptions {
    pub enable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalSuperSamplingOptions {
    /// Follows the post effect setting when absent
    pub enable: Option<bool>,
}

/// Complete option set of one globe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobeOptions {
    pub show: bool,
    pub shading: Shading,
    pub base_color: [f32; 4],
    pub base_texture: Option<TextureRef>,
    pub height_texture: Option<TextureRef>,
    /// Multiplier applied to height texture samples
    pub displacement_scale: f32,
    pub displacement_quality: Quality,
    pub realistic_material: RealisticMaterialOptions,
    pub layers: Vec<LayerOptions>,
    pub view_control: ViewControlOptions,
    pub light: LightOptions,
    pub post_effect: PostEffectOptions,
    pub temporal_super_sampling: TemporalSuperSamplingOptions,
    pub debug: DebugOptions,
}

impl Default for GlobeOptions {
    fn default() -> Self {
        Self {
            show: true,
            shading: Shading::Lambert,
            base_color: DEFAULT_BASE_COLOR,
            base_texture: None,
            height_texture: None,
            displacement_scale: 0.0,
            displacement_quality: Quality::Medium,
            realistic_material: RealisticMaterialOptions::default(),
            layers: Vec::new(),
            view_control: ViewControlOptions::default(),
            light: LightOptions::default(),
            post_effect: PostEffectOptions::default(),
            temporal_super_sampling: TemporalSuperSamplingOptions::default(),
            debug: DebugOptions::default(),
        }
    }
}

impl GlobeOptions {
    /// Parse options from a RON document
    pub fn from_ron_str(source: &str) -> Result<Self, OptionsError> {
        Ok(ron::from_str(source)?)
    }

    /// Parse options from a JSON document
    pub fn from_json_str(source: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Load options from a `.ron` or `.json` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("ron") => Self::from_ron_str(&source),
            Some("json") => Self::from_json_str(&source),
            other => Err(OptionsError::UnsupportedFormat(
                other.unwrap_or("none").to_string(),
            )),
        }
    }

    /// Serialize to pretty RON
    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Whether the debug wireframe is enabled
    pub fn wireframe_enabled(&self) -> bool {
        self.debug.wireframe.show
    }
}
