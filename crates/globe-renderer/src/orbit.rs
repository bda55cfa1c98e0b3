//! Orbit controller around the globe center.
//!
//! Angles are in degrees. `alpha` is the elevation above the equator plane
//! and `beta` the azimuth around the Y axis. The controller's distance is
//! measured from the center; option distances are surface-relative and get
//! the base distance (the globe radius) added when applied.

use glam::Vec3;

use globe_core::options::{AutoRotateDirection, ViewControlOptions};

use crate::camera::SharedCamera;
use crate::constants::orbit::{
    PAN_SCALE, ROTATE_DEGREES_PER_PIXEL, STATE_EPSILON, VELOCITY_EPSILON, ZOOM_STEP,
};

/// Camera placement produced by the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    /// Elevation in degrees
    pub alpha: f32,
    /// Azimuth in degrees
    pub beta: f32,
    /// Distance from `center`
    pub distance: f32,
    /// Pivot point
    pub center: Vec3,
}

impl OrbitState {
    /// Whether two states place the camera at the same spot, within
    /// floating point noise from surface-relative round trips
    pub fn approx_eq(&self, other: &OrbitState) -> bool {
        (self.alpha - other.alpha).abs() <= STATE_EPSILON
            && (self.beta - other.beta).abs() <= STATE_EPSILON
            && (self.distance - other.distance).abs() <= STATE_EPSILON
            && self.center.abs_diff_eq(other.center, STATE_EPSILON)
    }

    /// Eye position for this state
    pub fn eye(&self) -> Vec3 {
        let alpha = self.alpha.to_radians();
        let beta = self.beta.to_radians();
        let r = self.distance;
        self.center
            + Vec3::new(
                r * alpha.cos() * beta.sin(),
                r * alpha.sin(),
                r * alpha.cos() * beta.cos(),
            )
    }
}

impl Default for OrbitState {
    fn default() -> Self {
        Self {
            alpha: 0.0,
            beta: 0.0,
            distance: 1.0,
            center: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct OrbitLimits {
    min_alpha: f32,
    max_alpha: f32,
    min_beta: f32,
    max_beta: f32,
    min_distance: f32,
    max_distance: f32,
}

impl OrbitLimits {
    fn clamp(&self, state: &mut OrbitState) {
        state.alpha = state.alpha.clamp(self.min_alpha, self.max_alpha);
        state.beta = state.beta.clamp(self.min_beta, self.max_beta);
        state.distance = state.distance.clamp(self.min_distance, self.max_distance);
    }
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            min_alpha: -90.0,
            max_alpha: 90.0,
            min_beta: f32::NEG_INFINITY,
            max_beta: f32::INFINITY,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct OrbitSettings {
    rotate_sensitivity: f32,
    zoom_sensitivity: f32,
    pan_sensitivity: f32,
    damping: f32,
    auto_rotate: bool,
    auto_rotate_direction: AutoRotateDirection,
    auto_rotate_speed: f32,
    auto_rotate_after_still: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            rotate_sensitivity: 1.0,
            zoom_sensitivity: 1.0,
            pan_sensitivity: 0.0,
            damping: 0.0,
            auto_rotate: false,
            auto_rotate_direction: AutoRotateDirection::Cw,
            auto_rotate_speed: 0.0,
            auto_rotate_after_still: 0.0,
        }
    }
}

/// Listener fired after each interactive update
pub type UpdateListener = Box<dyn FnMut(&OrbitState) + Send>;

/// Interactive orbit camera controller
#[derive(Default)]
pub struct OrbitControl {
    state: OrbitState,
    limits: OrbitLimits,
    settings: OrbitSettings,
    base_distance: f32,
    camera: Option<SharedCamera>,
    listener: Option<UpdateListener>,
    /// Inertial (alpha, beta) change per tick
    velocity: (f32, f32),
    /// Seconds since the last user interaction
    still_time: f32,
    /// Options and base distance of the last `configure`
    applied: Option<(ViewControlOptions, f32)>,
}

impl OrbitControl {
    /// Create an unbound controller
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive `camera` from now on
    pub fn set_camera(&mut self, camera: SharedCamera) {
        self.camera = Some(camera);
        self.write_camera();
    }

    /// Camera currently driven
    pub fn camera(&self) -> Option<&SharedCamera> {
        self.camera.as_ref()
    }

    /// Current state
    pub fn state(&self) -> OrbitState {
        self.state
    }

    /// Distance added to surface-relative option distances
    pub fn base_distance(&self) -> f32 {
        self.base_distance
    }

    /// Apply view control options. Never fires the update listener.
    ///
    /// Options equal to the last applied ones are skipped. A placement that
    /// matches the current state (the echo of an emitted camera change) keeps
    /// the state and its inertia. Returns whether the state was overwritten.
    pub fn configure(&mut self, options: &ViewControlOptions, base_distance: f32) -> bool {
        let inputs = (options.clone(), base_distance);
        if self.applied.as_ref() == Some(&inputs) {
            return false;
        }

        self.base_distance = base_distance;
        self.settings = OrbitSettings {
            rotate_sensitivity: options.rotate_sensitivity,
            zoom_sensitivity: options.zoom_sensitivity,
            pan_sensitivity: options.pan_sensitivity,
            damping: options.damping.clamp(0.0, 0.999),
            auto_rotate: options.auto_rotate,
            auto_rotate_direction: options.auto_rotate_direction,
            auto_rotate_speed: options.auto_rotate_speed,
            auto_rotate_after_still: options.auto_rotate_after_still,
        };
        self.limits = OrbitLimits {
            min_alpha: options.min_alpha,
            max_alpha: options.max_alpha.max(options.min_alpha),
            min_beta: options.min_beta.unwrap_or(f32::NEG_INFINITY),
            max_beta: options.max_beta.unwrap_or(f32::INFINITY),
            min_distance: options.min_distance + base_distance,
            max_distance: (options.max_distance + base_distance)
                .max(options.min_distance + base_distance),
        };
        self.applied = Some(inputs);

        let mut placement = OrbitState {
            alpha: options.alpha,
            beta: options.beta,
            distance: options.distance + base_distance,
            center: Vec3::from(options.center),
        };
        self.limits.clamp(&mut placement);
        if placement.approx_eq(&self.state) {
            return false;
        }
        self.state = placement;
        self.velocity = (0.0, 0.0);
        self.write_camera();
        true
    }

    /// Register the update listener, replacing any previous one
    pub fn on_update(&mut self, listener: UpdateListener) {
        self.listener = Some(listener);
    }

    /// Remove the update listener
    pub fn off_update(&mut self) {
        self.listener = None;
    }

    /// Whether a listener is registered
    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    /// Drag rotation by a pixel delta
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        let scale = ROTATE_DEGREES_PER_PIXEL * self.settings.rotate_sensitivity;
        let d_alpha = dy * scale;
        let d_beta = -dx * scale;
        self.still_time = 0.0;
        self.velocity = (d_alpha, d_beta);
        self.interact(|state| {
            state.alpha += d_alpha;
            state.beta += d_beta;
        });
    }

    /// Wheel zoom; positive steps move closer
    pub fn zoom(&mut self, steps: f32) {
        let factor = 1.0 - steps * ZOOM_STEP * self.settings.zoom_sensitivity;
        self.still_time = 0.0;
        self.interact(|state| state.distance *= factor.max(0.0));
    }

    /// Pan the pivot by a pixel delta. Disabled at zero pan sensitivity.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        if self.settings.pan_sensitivity == 0.0 {
            return;
        }
        let eye = self.state.eye();
        let forward = (self.state.center - eye).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();
        let scale = self.state.distance * PAN_SCALE * self.settings.pan_sensitivity;
        self.still_time = 0.0;
        self.interact(|state| {
            state.center += right * (-dx * scale) + up * (dy * scale);
        });
    }

    /// Advance inertia and auto rotation by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        self.still_time += dt;
        let (d_alpha, d_beta) = self.velocity;

        if self.settings.damping > 0.0
            && (d_alpha.abs() > VELOCITY_EPSILON || d_beta.abs() > VELOCITY_EPSILON)
        {
            let damping = self.settings.damping;
            self.velocity = (d_alpha * damping, d_beta * damping);
            self.interact(|state| {
                state.alpha += d_alpha * damping;
                state.beta += d_beta * damping;
            });
            return;
        }
        self.velocity = (0.0, 0.0);

        if self.settings.auto_rotate && self.still_time >= self.settings.auto_rotate_after_still {
            let d_beta = self.settings.auto_rotate_direction.sign()
                * self.settings.auto_rotate_speed
                * dt;
            self.interact(|state| state.beta += d_beta);
        }
    }

    /// Drop the listener and the camera
    pub fn dispose(&mut self) {
        self.listener = None;
        self.camera = None;
        self.velocity = (0.0, 0.0);
        self.applied = None;
    }

    fn interact(&mut self, apply: impl FnOnce(&mut OrbitState)) {
        let before = self.state;
        apply(&mut self.state);
        self.limits.clamp(&mut self.state);
        if self.state == before {
            return;
        }
        self.write_camera();
        if let Some(listener) = self.listener.as_mut() {
            listener(&self.state);
        }
    }

    fn write_camera(&self) {
        if let Some(camera) = &self.camera {
            camera.write().look_from(self.state.eye(), self.state.center);
        }
    }
}
