//! Texture handles and the asynchronous loader boundary
//!
//! Decoding and caching image data belongs to the host. The renderer only
//! sees [`TextureHandle`]s and completion callbacks, which a
//! [`TextureLoader`] must never invoke from inside [`TextureLoader::load`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use globe_core::TextureRef;
use globe_core::constants::TEXTURE_ANISOTROPY;

use crate::scene::Mesh;

/// Name of an offscreen surface the host renders into a texture
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceId(
    /// Surface name
    pub String,
);

/// Sampling options requested with a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureOptions {
    /// Flip rows on upload
    pub flip_y: bool,
    /// Anisotropic filtering level
    pub anisotropic: u8,
}

impl TextureOptions {
    /// Options used for every globe texture: no flip, 8x anisotropy
    pub fn globe() -> Self {
        Self {
            flip_y: false,
            anisotropic: TEXTURE_ANISOTROPY,
        }
    }
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self::globe()
    }
}

/// Shared texture handle
pub type TextureHandle = Arc<Texture>;

/// A texture known to the renderer: either an image source or a solid color
#[derive(Debug, Clone)]
pub struct Texture {
    id: Uuid,
    source: Option<TextureRef>,
    color: Option<[f32; 4]>,
    surface: Option<SurfaceId>,
    options: TextureOptions,
}

impl Texture {
    /// Texture backed by an image or surface source
    pub fn image(source: TextureRef, options: TextureOptions) -> TextureHandle {
        let surface = match &source {
            TextureRef::Surface { surface } => Some(SurfaceId(surface.clone())),
            TextureRef::Path(_) => None,
        };
        Arc::new(Self {
            id: Uuid::new_v4(),
            source: Some(source),
            color: None,
            surface,
            options,
        })
    }

    /// 1x1 solid color texture
    pub fn blank(color: [f32; 4]) -> TextureHandle {
        Arc::new(Self {
            id: Uuid::new_v4(),
            source: None,
            color: Some(color),
            surface: None,
            options: TextureOptions::default(),
        })
    }

    /// Unique id of this texture
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Image source, `None` for blank textures
    pub fn source(&self) -> Option<&TextureRef> {
        self.source.as_ref()
    }

    /// Fill color of a blank texture
    pub fn color(&self) -> Option<[f32; 4]> {
        self.color
    }

    /// True for solid color textures
    pub fn is_blank(&self) -> bool {
        self.source.is_none()
    }

    /// Surface wrapper that must be attached to the mesh sampling this texture
    pub fn surface(&self) -> Option<&SurfaceId> {
        self.surface.as_ref()
    }

    /// Sampling options
    pub fn options(&self) -> TextureOptions {
        self.options
    }

    /// Attach this texture's surface (if any) to `mesh` so the host routes
    /// pointer events and redraws through it.
    pub fn attach_surface_to(&self, mesh: &mut Mesh) {
        if let Some(surface) = &self.surface {
            mesh.attach_surface(surface.clone());
        }
    }
}

/// Completion callback fired once a texture's data is available
pub type TextureCallback = Box<dyn FnOnce(TextureHandle) + Send>;

/// Host-side texture loading and caching.
///
/// `load` returns a handle immediately. The callback, if any, fires on a
/// later turn of the host's event loop once the data has arrived, and never
/// if loading fails.
pub trait TextureLoader: Send + Sync {
    /// Request a texture
    fn load(
        &self,
        source: &TextureRef,
        options: TextureOptions,
        on_load: Option<TextureCallback>,
    ) -> TextureHandle;
}

#[derive(Default)]
struct QueueState {
    cache: HashMap<TextureRef, TextureHandle>,
    ready: HashSet<TextureRef>,
    failed: HashSet<TextureRef>,
    pending: Vec<(TextureRef, TextureCallback)>,
}

/// Texture loader whose completions run when the host calls [`pump`](Self::pump).
///
/// Used by headless hosts, where "the next turn of the event loop" is the
/// next frame.
#[derive(Default)]
pub struct QueuedTextureLoader {
    state: Mutex<QueueState>,
}

impl QueuedTextureLoader {
    /// Create an empty loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every queued request, invoking callbacks outside the lock.
    ///
    /// Returns the number of callbacks fired.
    pub fn pump(&self) -> usize {
        let completions: Vec<(TextureHandle, TextureCallback)> = {
            let mut state = self.state.lock();
            let pending = std::mem::take(&mut state.pending);
            let mut completions = Vec::with_capacity(pending.len());
            for (source, callback) in pending {
                if state.failed.contains(&source) {
                    continue;
                }
                if let Some(handle) = state.cache.get(&source).cloned() {
                    state.ready.insert(source);
                    completions.push((handle, callback));
                }
            }
            completions
        };

        let fired = completions.len();
        for (handle, callback) in completions {
            callback(handle);
        }
        if fired > 0 {
            tracing::debug!("Resolved {} texture request(s)", fired);
        }
        fired
    }

    /// Mark a source as unloadable. Its callbacks are dropped and never fire.
    pub fn fail(&self, source: &TextureRef) {
        let mut state = self.state.lock();
        state.failed.insert(source.clone());
        state.pending.retain(|(pending, _)| pending != source);
        tracing::warn!("Texture {:?} failed to load", source);
    }

    /// Number of callbacks waiting for the next pump
    pub fn pending_count(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Whether a source has resolved at least once
    pub fn is_ready(&self, source: &TextureRef) -> bool {
        self.state.lock().ready.contains(source)
    }
}

impl TextureLoader for QueuedTextureLoader {
    fn load(
        &self,
        source: &TextureRef,
        options: TextureOptions,
        on_load: Option<TextureCallback>,
    ) -> TextureHandle {
        let mut state = self.state.lock();
        let handle = state
            .cache
            .entry(source.clone())
            .or_insert_with(|| Texture::image(source.clone(), options))
            .clone();

        if let Some(callback) = on_load {
            if !state.failed.contains(source) {
                state.pending.push((source.clone(), callback));
            }
        }
        handle
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_callbacks_fire_on_pump_only() {
        let loader = QueuedTextureLoader::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();

        let source = TextureRef::path("clouds.png");
        let handle = loader.load(
            &source,
            TextureOptions::globe(),
            Some(Box::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })),
        );

        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(!loader.is_ready(&source));
        assert_eq!(handle.source(), Some(&source));

        assert_eq!(loader.pump(), 1);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(loader.is_ready(&source));
        assert_eq!(loader.pump(), 0);
    }

    #[test]
    fn test_same_source_shares_handle() {
        let loader = QueuedTextureLoader::new();
        let a = loader.load(&"a.png".into(), TextureOptions::globe(), None);
        let b = loader.load(&"a.png".into(), TextureOptions::globe(), None);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.options().anisotropic, 8);
        assert!(!a.options().flip_y);
    }

    #[test]
    fn test_failed_source_never_fires() {
        let loader = QueuedTextureLoader::new();
        let source = TextureRef::path("missing.png");
        loader.load(&source, TextureOptions::globe(), Some(Box::new(|_| panic!("fired"))));
        loader.fail(&source);
        assert_eq!(loader.pending_count(), 0);
        assert_eq!(loader.pump(), 0);

        loader.load(&source, TextureOptions::globe(), Some(Box::new(|_| panic!("fired"))));
        assert_eq!(loader.pump(), 0);
    }

    #[test]
    fn test_surface_texture() {
        let texture = Texture::image(TextureRef::surface("chart"), TextureOptions::globe());
        assert_eq!(texture.surface(), Some(&SurfaceId("chart".into())));

        let mut mesh = Mesh::new("earth");
        texture.attach_surface_to(&mut mesh);
        texture.attach_surface_to(&mut mesh);
        assert_eq!(mesh.surfaces().len(), 1);
    }

    #[test]
    fn test_blank_texture() {
        let texture = Texture::blank([1.0, 1.0, 1.0, 0.0]);
        assert!(texture.is_blank());
        assert_eq!(texture.color(), Some([1.0, 1.0, 1.0, 0.0]));
        assert!(texture.surface().is_none());
    }
}
