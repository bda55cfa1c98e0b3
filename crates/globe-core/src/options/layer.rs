//! Layer descriptors stacked on top of the globe surface

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_LAYER_INTENSITY;

/// Reference to a texture source, resolved by the host's texture loader
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextureRef {
    /// Image path or URL
    Path(String),
    /// An offscreen surface rendered by the host (e.g. another chart)
    Surface { surface: String },
}

impl TextureRef {
    pub fn path(path: impl Into<String>) -> Self {
        TextureRef::Path(path.into())
    }

    pub fn surface(name: impl Into<String>) -> Self {
        TextureRef::Surface {
            surface: name.into(),
        }
    }
}

impl From<&str> for TextureRef {
    fn from(path: &str) -> Self {
        TextureRef::Path(path.to_string())
    }
}

/// How a layer is composited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LayerKind {
    /// Blended into the base surface shader
    Blend,
    /// Separate shell mesh above the surface
    #[default]
    Overlay,
}

impl From<String> for LayerKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "blend" => LayerKind::Blend,
            _ => LayerKind::Overlay,
        }
    }
}

impl From<LayerKind> for String {
    fn from(kind: LayerKind) -> Self {
        match kind {
            LayerKind::Blend => "blend",
            LayerKind::Overlay => "overlay",
        }
        .to_string()
    }
}

/// Which surface channel a blend layer contributes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlendTarget {
    #[default]
    Albedo,
    Emission,
}

impl From<String> for BlendTarget {
    fn from(name: String) -> Self {
        match name.as_str() {
            "emission" => BlendTarget::Emission,
            _ => BlendTarget::Albedo,
        }
    }
}

impl From<BlendTarget> for String {
    fn from(target: BlendTarget) -> Self {
        match target {
            BlendTarget::Albedo => "albedo",
            BlendTarget::Emission => "emission",
        }
        .to_string()
    }
}

/// Shading of an overlay shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OverlayShading {
    Lambert,
    /// Unlit flat color
    #[default]
    Color,
}

impl From<String> for OverlayShading {
    fn from(name: String) -> Self {
        match name.as_str() {
            "lambert" => OverlayShading::Lambert,
            _ => OverlayShading::Color,
        }
    }
}

impl From<OverlayShading> for String {
    fn from(shading: OverlayShading) -> Self {
        match shading {
            OverlayShading::Lambert => "lambert",
            OverlayShading::Color => "color",
        }
        .to_string()
    }
}

fn default_show() -> bool {
    true
}

/// Declarative description of one globe layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerOptions {
    /// Stable key of an overlay layer
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: LayerKind,
    #[serde(default)]
    pub texture: Option<TextureRef>,
    #[serde(default)]
    pub shading: OverlayShading,
    /// Radial offset from the previous overlay shell
    #[serde(default)]
    pub distance: Option<f32>,
    /// Blend weight
    #[serde(default)]
    pub intensity: Option<f32>,
    #[serde(default = "default_show")]
    pub show: bool,
    #[serde(default)]
    pub blend_to: BlendTarget,
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            id: None,
            kind: LayerKind::Overlay,
            texture: None,
            shading: OverlayShading::Color,
            distance: None,
            intensity: None,
            show: true,
            blend_to: BlendTarget::Albedo,
        }
    }
}

impl LayerOptions {
    /// An overlay shell keyed by `id`
    pub fn overlay(id: impl Into<String>, texture: impl Into<TextureRef>) -> Self {
        Self {
            id: Some(id.into()),
            texture: Some(texture.into()),
            ..Self::default()
        }
    }

    /// A layer blended into the base surface's albedo
    pub fn blend(texture: impl Into<TextureRef>) -> Self {
        Self {
            kind: LayerKind::Blend,
            texture: Some(texture.into()),
            ..Self::default()
        }
    }

    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = Some(intensity);
        self
    }

    pub fn with_shading(mut self, shading: OverlayShading) -> Self {
        self.shading = shading;
        self
    }

    pub fn with_blend_to(mut self, target: BlendTarget) -> Self {
        self.blend_to = target;
        self
    }

    pub fn with_show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }

    /// Blend weight, defaulting to 1.0
    pub fn resolved_intensity(&self) -> f32 {
        self.intensity.unwrap_or(DEFAULT_LAYER_INTENSITY)
    }

    /// Registry key of an overlay layer. Layers without an id share the empty key.
    pub fn overlay_key(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_json() {
        let layer: LayerOptions = serde_json::from_str(r#"{"id":"clouds","texture":"clouds.png"}"#).unwrap();
        assert_eq!(layer.kind, LayerKind::Overlay);
        assert_eq!(layer.shading, OverlayShading::Color);
        assert_eq!(layer.blend_to, BlendTarget::Albedo);
        assert!(layer.show);
        assert_eq!(layer.resolved_intensity(), 1.0);
        assert_eq!(layer.texture, Some(TextureRef::path("clouds.png")));
    }

    #[test]
    fn test_unknown_names_fall_back() {
        let layer: LayerOptions = serde_json::from_str(
            r#"{"type":"mystery","shading":"phong","blendTo":"specular"}"#,
        )
        .unwrap();
        assert_eq!(layer.kind, LayerKind::Overlay);
        assert_eq!(layer.shading, OverlayShading::Color);
        assert_eq!(layer.blend_to, BlendTarget::Albedo);
    }

    #[test]
    fn test_blend_emission_layer() {
        let layer: LayerOptions = serde_json::from_str(
            r#"{"type":"blend","blendTo":"emission","intensity":0.4,"texture":{"surface":"night"}}"#,
        )
        .unwrap();
        assert_eq!(layer.kind, LayerKind::Blend);
        assert_eq!(layer.blend_to, BlendTarget::Emission);
        assert_eq!(layer.resolved_intensity(), 0.4);
        assert_eq!(layer.texture, Some(TextureRef::surface("night")));
    }

    #[test]
    fn test_overlay_key() {
        assert_eq!(LayerOptions::overlay("a", "a.png").overlay_key(), "a");
        assert_eq!(LayerOptions::default().overlay_key(), "");
    }

    #[test]
    fn test_serialize_uses_names() {
        let layer = LayerOptions::blend("x.png").with_blend_to(BlendTarget::Emission);
        let json = serde_json::to_value(&layer).unwrap();
        assert_eq!(json["type"], "blend");
        assert_eq!(json["blendTo"], "emission");
    }
}
