//! Sun and ambient lighting of the globe.

use std::sync::Arc;
use std::time::SystemTime;

use glam::Vec3;
use parking_lot::Mutex;

use globe_core::options::LightOptions;

use crate::scene::{Group, SharedGroup};

/// Shared handle to a light
pub type SharedLight = Arc<Mutex<Light>>;

/// Sun position in horizontal coordinates at the globe's reference point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    /// Azimuth in radians
    pub azimuth: f32,
    /// Altitude in radians
    pub altitude: f32,
}

/// Astronomical sun position source
pub trait SunCalculator: Send + Sync {
    /// Sun position at `time`
    fn position(&self, time: SystemTime) -> SunPosition;
}

/// Sun that ignores the time and stays put
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedSun(
    /// Position reported for every time
    pub SunPosition,
);

impl Default for FixedSun {
    fn default() -> Self {
        Self(SunPosition {
            azimuth: 0.0,
            altitude: 0.0,
        })
    }
}

impl SunCalculator for FixedSun {
    fn position(&self, _time: SystemTime) -> SunPosition {
        self.0
    }
}

/// Unit vector from the globe center towards the sun
pub fn sun_light_position(sun: SunPosition) -> Vec3 {
    Vec3::new(
        sun.altitude.sin(),
        -sun.altitude.cos() * sun.azimuth.cos(),
        sun.altitude.cos() * sun.azimuth.sin(),
    )
}

/// Light type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    /// Parallel rays from `position` towards `target`
    Directional,
    /// Uniform light from every direction
    Ambient,
}

/// A light node
#[derive(Debug, Clone)]
pub struct Light {
    /// Light type
    pub kind: LightKind,
    /// Position of a directional light
    pub position: Vec3,
    /// Point a directional light looks at
    pub target: Vec3,
    /// RGBA color
    pub color: [f32; 4],
    /// Intensity multiplier
    pub intensity: f32,
    /// Whether the light casts shadows
    pub cast_shadow: bool,
}

impl Light {
    /// Create a white light of unit intensity
    pub fn new(kind: LightKind) -> Self {
        Self {
            kind,
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            color: [1.0; 4],
            intensity: 1.0,
            cast_shadow: false,
        }
    }

    /// Point the light at `target`
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Direction the light travels in
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }
}

/// Main (sun) and ambient light under one root group
#[derive(Debug)]
pub struct LightRig {
    root: SharedGroup,
    main: SharedLight,
    ambient: SharedLight,
}

impl Default for LightRig {
    fn default() -> Self {
        Self::new()
    }
}

impl LightRig {
    /// Create both lights and the root group holding them
    pub fn new() -> Self {
        let main = Arc::new(Mutex::new(Light::new(LightKind::Directional)));
        let ambient = Arc::new(Mutex::new(Light::new(LightKind::Ambient)));
        let mut root = Group::new("globe-lights");
        root.add_light(&main);
        root.add_light(&ambient);
        Self {
            root: root.shared(),
            main,
            ambient,
        }
    }

    /// Group to attach to the scene
    pub fn root(&self) -> &SharedGroup {
        &self.root
    }

    /// Sun light
    pub fn main(&self) -> &SharedLight {
        &self.main
    }

    /// Ambient light
    pub fn ambient(&self) -> &SharedLight {
        &self.ambient
    }

    /// Apply light options and place the sun for the configured time,
    /// looking at `earth_position`.
    pub fn update(&self, options: &LightOptions, sun: &dyn SunCalculator, earth_position: Vec3) {
        let position = sun.position(options.main.resolved_time());
        {
            let mut main = self.main.lock();
            main.intensity = options.main.intensity;
            main.color = options.main.color;
            main.cast_shadow = options.main.shadow;
            main.position = sun_light_position(position);
            main.look_at(earth_position);
        }
        {
            let mut ambient = self.ambient.lock();
            ambient.intensity = options.ambient.intensity;
            ambient.color = options.ambient.color;
        }
    }
}
