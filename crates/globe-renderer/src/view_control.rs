//! Bridge between the orbit controller and the host's action dispatch

use uuid::Uuid;

use globe_core::constants::TARGET_LONGITUDE_OFFSET;
use globe_core::{CameraChange, GlobeAction, ViewControlOptions};

use crate::camera::SharedCamera;
use crate::host::ActionQueue;
use crate::orbit::{OrbitControl, OrbitState};

/// Controller angles `(alpha, beta)` looking at `[longitude, latitude]`
pub fn target_angles(coord: [f32; 2]) -> (f32, f32) {
    let [longitude, latitude] = coord;
    (latitude, longitude + TARGET_LONGITUDE_OFFSET)
}

/// Camera change reported for a controller state. Distance is relative to
/// the globe surface.
pub fn camera_change(
    state: &OrbitState,
    base_radius: f32,
    from: Uuid,
    globe_id: &str,
) -> CameraChange {
    CameraChange {
        alpha: state.alpha,
        beta: state.beta,
        distance: state.distance - base_radius,
        center: state.center.to_array(),
        from,
        globe_id: globe_id.to_string(),
    }
}

/// Keeps the orbit controller in sync with view control options and turns
/// its updates into [`GlobeAction::ChangeCamera`] actions.
pub struct ViewControlBridge {
    control: OrbitControl,
    instance_id: Uuid,
}

impl ViewControlBridge {
    /// Create a bridge reporting as `instance_id`
    pub fn new(instance_id: Uuid) -> Self {
        Self {
            control: OrbitControl::new(),
            instance_id,
        }
    }

    /// Drive the coordinate system's camera
    pub fn bind(&mut self, camera: SharedCamera) {
        let already_bound = self
            .control
            .camera()
            .is_some_and(|current| std::sync::Arc::ptr_eq(current, &camera));
        if !already_bound {
            self.control.set_camera(camera);
        }
    }

    /// Apply `options` and (re)register the update listener.
    ///
    /// A target coordinate overrides `alpha` and `beta`. The previous
    /// listener is replaced, so each controller update emits exactly one
    /// action however often this runs.
    pub fn sync_from_model(
        &mut self,
        options: &ViewControlOptions,
        base_radius: f32,
        globe_id: &str,
        actions: &ActionQueue,
    ) {
        let mut resolved = options.clone();
        if let Some(coord) = options.target_coord {
            let (alpha, beta) = target_angles(coord);
            resolved.alpha = alpha;
            resolved.beta = beta;
        }
        self.control.configure(&resolved, base_radius);

        let from = self.instance_id;
        let globe_id = globe_id.to_string();
        let actions = actions.clone();
        self.control.on_update(Box::new(move |state| {
            actions.push(GlobeAction::ChangeCamera(camera_change(
                state,
                base_radius,
                from,
                &globe_id,
            )));
        }));
    }

    /// The underlying controller, for feeding user input
    pub fn control(&self) -> &OrbitControl {
        &self.control
    }

    /// Mutable access to the controller
    pub fn control_mut(&mut self) -> &mut OrbitControl {
        &mut self.control
    }

    /// Detach the listener and camera
    pub fn dispose(&mut self) {
        self.control.dispose();
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::camera::Camera;

    fn options() -> ViewControlOptions {
        ViewControlOptions {
            auto_rotate: false,
            damping: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_target_angles() {
        assert_eq!(target_angles([30.0, 10.0]), (10.0, 120.0));
    }

    #[test]
    fn test_target_coord_overrides_angles() {
        let mut bridge = ViewControlBridge::new(Uuid::new_v4());
        let opts = ViewControlOptions {
            target_coord: Some([30.0, 10.0]),
            alpha: 45.0,
            beta: 45.0,
            ..options()
        };
        bridge.sync_from_model(&opts, 100.0, "globe0", &ActionQueue::new());
        let state = bridge.control().state();
        assert_eq!((state.alpha, state.beta), (10.0, 120.0));
        assert_eq!(state.distance, 250.0);
    }

    #[test]
    fn test_emits_once_per_update_after_repeated_syncs() {
        let id = Uuid::new_v4();
        let mut bridge = ViewControlBridge::new(id);
        bridge.bind(Camera::new().shared());
        let actions = ActionQueue::new();
        for _ in 0..3 {
            bridge.sync_from_model(&options(), 100.0, "globe0", &actions);
        }
        assert!(actions.is_empty());

        bridge.control_mut().rotate(10.0, 5.0);
        let emitted = actions.drain();
        assert_eq!(emitted.len(), 1);

        let GlobeAction::ChangeCamera(change) = &emitted[0];
        let state = bridge.control().state();
        assert_eq!(change.from, id);
        assert_eq!(change.globe_id, "globe0");
        assert_relative_eq!(change.distance, state.distance - 100.0);
        assert_eq!(change.alpha, state.alpha);
        assert_eq!(change.beta, state.beta);
    }

    #[test]
    fn test_round_trip_keeps_camera() {
        let mut bridge = ViewControlBridge::new(Uuid::new_v4());
        let actions = ActionQueue::new();
        let mut opts = options();
        bridge.sync_from_model(&opts, 100.0, "g", &actions);
        bridge.control_mut().zoom(1.0);

        let GlobeAction::ChangeCamera(change) = actions.drain().remove(0);
        opts.apply_camera_change(&change);
        let before = bridge.control().state();
        bridge.sync_from_model(&opts, 100.0, "g", &actions);
        let after = bridge.control().state();

        assert_relative_eq!(after.distance, before.distance, epsilon = 1e-4);
        assert_eq!(after.alpha, before.alpha);
        assert!(actions.is_empty());
    }

    #[test]
    fn test_dispose_stops_emission() {
        let mut bridge = ViewControlBridge::new(Uuid::new_v4());
        let actions = ActionQueue::new();
        bridge.sync_from_model(&options(), 10.0, "g", &actions);
        bridge.dispose();
        bridge.control_mut().rotate(10.0, 0.0);
        assert!(actions.is_empty());
    }
}
