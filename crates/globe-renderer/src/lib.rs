//! Globe renderer
//!
//! Displaceable globe with stacked blend and overlay layers, driven by an
//! orbit camera.
//!
//! # Architecture
//!
//! - [`globe_view::GlobeView`] - Per-frame entry point owning everything below
//! - [`displacement::DisplacementEngine`] - Height-field displacement of the base sphere
//! - [`compositor::LayerCompositor`] - Blend arrays and overlay shell registry
//! - [`view_control::ViewControlBridge`] - Orbit controller to camera-change actions
//! - [`light::LightRig`] - Sun and ambient light placement
//! - [`scene`] - Mesh, material and group handles the host renders
//! - [`texture`] - Texture handles and the asynchronous loader boundary
//! - [`gpu`] - Vertex buffer upload of dirty geometry
//!
//! # Module Structure
//!
//! ```text
//! globe-renderer/
//! ├── scene/           # Scene graph boundary (Scene, Group, Mesh, Material)
//! ├── texture.rs       # TextureLoader trait, QueuedTextureLoader
//! ├── host.rs          # Host services (loader, action queue, redraw, sun)
//! ├── camera.rs        # Camera placement
//! ├── orbit.rs         # Orbit controller
//! ├── coord_sys.rs     # Radius, height field, camera, scene root
//! ├── displacement.rs  # DisplacementEngine
//! ├── compositor.rs    # LayerCompositor
//! ├── view_control.rs  # ViewControlBridge
//! ├── light.rs         # Light rig
//! ├── globe_view.rs    # GlobeView orchestrator
//! ├── vertex.rs        # GPU vertex format
//! └── gpu.rs           # GPU geometry buffers
//! ```

pub mod camera;
pub mod compositor;
pub mod constants;
pub mod coord_sys;
pub mod displacement;
pub mod globe_view;
pub mod gpu;
pub mod host;
pub mod light;
pub mod orbit;
pub mod scene;
pub mod texture;
pub mod vertex;
pub mod view_control;

pub use camera::{Camera, SharedCamera};
pub use compositor::{CompositeReport, LayerCompositor, LayerTarget};
pub use coord_sys::{GlobeCoordinateSystem, HeightImage};
pub use displacement::DisplacementEngine;
pub use globe_view::{FrameReport, GlobeView};
pub use host::{ActionQueue, HostApi, RedrawSignal};
pub use light::{FixedSun, LightRig, SunCalculator, SunPosition};
pub use orbit::{OrbitControl, OrbitState};
pub use scene::{Group, Material, Mesh, Scene, ShaderKind, ShaderStage};
pub use texture::{QueuedTextureLoader, Texture, TextureHandle, TextureLoader, TextureOptions};
pub use view_control::ViewControlBridge;
pub use vertex::GlobeVertex;
