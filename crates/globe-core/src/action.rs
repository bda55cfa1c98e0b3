//! Outbound actions emitted by the globe view

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Camera state reported after a user interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraChange {
    /// Elevation angle in degrees
    pub alpha: f32,
    /// Azimuth angle in degrees
    pub beta: f32,
    /// Distance from the globe surface
    pub distance: f32,
    pub center: [f32; 3],
    /// Instance of the view that emitted the change
    pub from: Uuid,
    /// Globe the change applies to
    pub globe_id: String,
}

/// Actions dispatched back to the host model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GlobeAction {
    #[serde(rename = "globeChangeCamera")]
    ChangeCamera(CameraChange),
}

impl GlobeAction {
    /// Id of the globe this action targets
    pub fn globe_id(&self) -> &str {
        match self {
            GlobeAction::ChangeCamera(change) => &change.globe_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_json_shape() {
        let action = GlobeAction::ChangeCamera(CameraChange {
            alpha: 10.0,
            beta: 120.0,
            distance: 50.0,
            center: [0.0, 0.0, 0.0],
            from: Uuid::nil(),
            globe_id: "globe0".into(),
        });
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "globeChangeCamera");
        assert_eq!(json["globeId"], "globe0");
        assert_eq!(json["beta"], 120.0);

        let back: GlobeAction = serde_json::from_value(json).unwrap();
        assert_eq!(back, action);
        assert_eq!(back.globe_id(), "globe0");
    }
}
