//! Services the host hands to the globe each frame

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use globe_core::GlobeAction;

use crate::light::{FixedSun, SunCalculator};
use crate::texture::TextureLoader;

/// Outbound actions waiting for the host's dispatcher
#[derive(Debug, Clone, Default)]
pub struct ActionQueue(Arc<Mutex<Vec<GlobeAction>>>);

impl ActionQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an action
    pub fn push(&self, action: GlobeAction) {
        self.0.lock().push(action);
    }

    /// Take every queued action in emission order
    pub fn drain(&self) -> Vec<GlobeAction> {
        std::mem::take(&mut *self.0.lock())
    }

    /// Number of queued actions
    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }
}

/// Redraw requests raised outside the render pass (e.g. by texture callbacks)
#[derive(Debug, Clone, Default)]
pub struct RedrawSignal(Arc<AtomicU64>);

impl RedrawSignal {
    /// Create a signal with no pending request
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the host to draw another frame
    pub fn request(&self) {
        self.0.fetch_add(1, Ordering::AcqRel);
    }

    /// Consume pending requests, returning whether any were raised
    pub fn take(&self) -> bool {
        self.0.swap(0, Ordering::AcqRel) > 0
    }

    /// Number of requests since the last [`take`](Self::take)
    pub fn requests(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }
}

/// Host capabilities the globe calls into
#[derive(Clone)]
pub struct HostApi {
    /// Texture loading and caching
    pub textures: Arc<dyn TextureLoader>,
    /// Outbound action queue
    pub actions: ActionQueue,
    /// Redraw requests
    pub redraw: RedrawSignal,
    /// Sun position source
    pub sun: Arc<dyn SunCalculator>,
}

impl HostApi {
    /// Create host services around a texture loader, with a fixed sun
    pub fn new(textures: Arc<dyn TextureLoader>) -> Self {
        Self {
            textures,
            actions: ActionQueue::new(),
            redraw: RedrawSignal::new(),
            sun: Arc::new(FixedSun::default()),
        }
    }

    /// Replace the sun position source
    pub fn with_sun(mut self, sun: Arc<dyn SunCalculator>) -> Self {
        self.sun = sun;
        self
    }
}
