//! Globe model: options addressed by a stable id

use serde::{Deserialize, Serialize};

use crate::action::GlobeAction;
use crate::options::GlobeOptions;

/// A globe component as seen by the view: its id plus current options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobeModel {
    pub id: String,
    #[serde(default)]
    pub options: GlobeOptions,
}

impl GlobeModel {
    pub fn new(id: impl Into<String>, options: GlobeOptions) -> Self {
        Self {
            id: id.into(),
            options,
        }
    }

    /// Apply an action addressed to this globe.
    ///
    /// Returns `false` and leaves the model untouched when the action targets
    /// another globe.
    pub fn apply_action(&mut self, action: &GlobeAction) -> bool {
        if action.globe_id() != self.id {
            return false;
        }
        match action {
            GlobeAction::ChangeCamera(change) => {
                self.options.view_control.apply_camera_change(change);
            }
        }
        true
    }
}
