//! Globe data model
//!
//! Option schema, height fields and sphere geometry shared by the globe
//! renderer and its hosts.
//!
//! - [`options`] - Declarative globe, layer and view control options
//! - [`height_field`] - Displacement grid sampled by UV
//! - [`geometry`] - Sphere tessellation, normals, bounds and barycentrics
//! - [`action`] - Outbound camera-change actions
//! - [`model`] - Options addressed by globe id

pub mod action;
pub mod constants;
pub mod geometry;
pub mod height_field;
pub mod model;
pub mod options;

pub use action::{CameraChange, GlobeAction};
pub use geometry::{BoundingBox, SphereGeometry};
pub use height_field::{HeightField, HeightFieldError};
pub use model::GlobeModel;
pub use options::{
    BlendTarget, GlobeOptions, LayerKind, LayerOptions, OptionsError, OverlayShading, Quality,
    Shading, TextureRef, ViewControlOptions,
};
