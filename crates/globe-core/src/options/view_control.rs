//! Orbit view control options

use serde::{Deserialize, Serialize};

use crate::action::CameraChange;

/// Direction of automatic rotation around the globe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoRotateDirection {
    /// Clockwise seen from above
    #[default]
    Cw,
    /// Counter-clockwise seen from above
    Ccw,
}

impl AutoRotateDirection {
    /// Sign applied to the azimuth change
    pub fn sign(self) -> f32 {
        match self {
            AutoRotateDirection::Cw => 1.0,
            AutoRotateDirection::Ccw => -1.0,
        }
    }
}

/// View control settings.
///
/// Distances are measured from the globe surface; the controller adds the
/// globe radius to obtain distances from the center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewControlOptions {
    /// `[longitude, latitude]` to look at, overriding `alpha` and `beta`
    pub target_coord: Option<[f32; 2]>,
    /// Elevation angle in degrees
    pub alpha: f32,
    /// Azimuth angle in degrees
    pub beta: f32,
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_alpha: f32,
    pub max_alpha: f32,
    /// Lower azimuth bound, unbounded when absent
    pub min_beta: Option<f32>,
    /// Upper azimuth bound, unbounded when absent
    pub max_beta: Option<f32>,
    pub center: [f32; 3],
    pub rotate_sensitivity: f32,
    pub zoom_sensitivity: f32,
    pub pan_sensitivity: f32,
    /// Fraction of inertial velocity kept per frame, 0 disables inertia
    pub damping: f32,
    pub auto_rotate: bool,
    pub auto_rotate_direction: AutoRotateDirection,
    /// Degrees per second
    pub auto_rotate_speed: f32,
    /// Seconds of inactivity before auto rotation resumes
    pub auto_rotate_after_still: f32,
}

impl Default for ViewControlOptions {
    fn default() -> Self {
        Self {
            target_coord: None,
            alpha: 0.0,
            beta: 0.0,
            distance: 150.0,
            min_distance: 40.0,
            max_distance: 400.0,
            min_alpha: -90.0,
            max_alpha: 90.0,
            min_beta: None,
            max_beta: None,
            center: [0.0; 3],
            rotate_sensitivity: 1.0,
            zoom_sensitivity: 1.0,
            pan_sensitivity: 0.0,
            damping: 0.8,
            auto_rotate: true,
            auto_rotate_direction: AutoRotateDirection::Cw,
            auto_rotate_speed: 10.0,
            auto_rotate_after_still: 3.0,
        }
    }
}

impl ViewControlOptions {
    /// Write a camera change back into the options.
    ///
    /// The explicit target coordinate is cleared so the stored angles win
    /// on the next sync.
    pub fn apply_camera_change(&mut self, change: &CameraChange) {
        self.alpha = change.alpha;
        self.beta = change.beta;
        self.distance = change.distance;
        self.center = change.center;
        self.target_coord = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_partial_options_keep_defaults() {
        let opts: ViewControlOptions =
            serde_json::from_str(r#"{"targetCoord":[30,10],"autoRotate":false}"#).unwrap();
        assert_eq!(opts.target_coord, Some([30.0, 10.0]));
        assert!(!opts.auto_rotate);
        assert_eq!(opts.distance, 150.0);
        assert_eq!(opts.min_beta, None);
    }

    #[test]
    fn test_apply_camera_change() {
        let mut opts = ViewControlOptions {
            target_coord: Some([1.0, 2.0]),
            ..Default::default()
        };
        let change = CameraChange {
            alpha: 12.0,
            beta: 34.0,
            distance: 56.0,
            center: [1.0, 0.0, 0.0],
            from: Uuid::nil(),
            globe_id: "g".into(),
        };
        opts.apply_camera_change(&change);
        assert_eq!(opts.alpha, 12.0);
        assert_eq!(opts.beta, 34.0);
        assert_eq!(opts.distance, 56.0);
        assert_eq!(opts.center, [1.0, 0.0, 0.0]);
        assert_eq!(opts.target_coord, None);
    }

    #[test]
    fn test_direction_names() {
        let dir: AutoRotateDirection = serde_json::from_str(r#""ccw""#).unwrap();
        assert_eq!(dir, AutoRotateDirection::Ccw);
        assert_eq!(dir.sign(), -1.0);
    }
}
