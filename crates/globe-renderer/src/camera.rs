//! Camera driven by the orbit controller

use std::sync::Arc;

use glam::Vec3;
use parking_lot::RwLock;

/// Shared handle to the coordinate system's camera
pub type SharedCamera = Arc<RwLock<Camera>>;

/// Y-up camera placement read by the host's render pass
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye position
    pub position: Vec3,
    /// Look-at point
    pub target: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Create a camera looking at the origin from +Z
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 250.0),
            target: Vec3::ZERO,
        }
    }

    /// Wrap in a shared handle
    pub fn shared(self) -> SharedCamera {
        Arc::new(RwLock::new(self))
    }

    /// Move the eye and look at `target`
    pub fn look_from(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.target = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_look_from() {
        let camera = Camera::new().shared();
        camera.write().look_from(Vec3::new(0.0, 10.0, 0.0), Vec3::ONE);
        let camera = camera.read();
        assert_eq!(camera.position, Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(camera.target, Vec3::ONE);
    }
}
