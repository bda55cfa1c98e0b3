//! Headless globe viewer
//!
//! Loads globe options, renders frames into the in-memory scene, simulates a
//! drag on the first frame and prints every emitted action as JSON before
//! feeding it back into the model.
//!
//! ```text
//! globe-viewer [options.(ron|json)] [--height-field field.json | --height-image heights.png]
//!              [--frames N] [--gpu]
//! ```
//!
//! Without either height flag, a `heightTexture` path in the options is
//! loaded relative to the options file and scaled by `displacementScale`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use globe_core::{GlobeModel, GlobeOptions, HeightField, OptionsError, TextureRef};
use globe_renderer::gpu::{GpuGeometry, request_headless_device};
use globe_renderer::{
    GlobeCoordinateSystem, GlobeView, HeightImage, HostApi, QueuedTextureLoader,
};

const GLOBE_RADIUS: f32 = 100.0;
const FRAME_SECONDS: f32 = 1.0 / 60.0;

#[derive(Debug, thiserror::Error)]
enum ViewerError {
    #[error(transparent)]
    Options(#[from] OptionsError),
    #[error("Failed to read height field: {0}")]
    HeightFieldIo(#[from] std::io::Error),
    #[error("Invalid height field: {0}")]
    HeightFieldJson(#[from] serde_json::Error),
    #[error("Failed to decode height image: {0}")]
    HeightImage(#[from] image::ImageError),
    #[error("{0}")]
    Usage(String),
}

#[derive(Debug)]
struct Args {
    options: Option<PathBuf>,
    height_field: Option<PathBuf>,
    height_image: Option<PathBuf>,
    frames: u32,
    gpu: bool,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, ViewerError> {
        let mut parsed = Args {
            options: None,
            height_field: None,
            height_image: None,
            frames: 3,
            gpu: false,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--height-field" => {
                    let path = args
                        .next()
                        .ok_or_else(|| ViewerError::Usage("--height-field needs a path".into()))?;
                    parsed.height_field = Some(PathBuf::from(path));
                }
                "--height-image" => {
                    let path = args
                        .next()
                        .ok_or_else(|| ViewerError::Usage("--height-image needs a path".into()))?;
                    parsed.height_image = Some(PathBuf::from(path));
                }
                "--frames" => {
                    let count = args
                        .next()
                        .and_then(|n| n.parse().ok())
                        .ok_or_else(|| ViewerError::Usage("--frames needs a number".into()))?;
                    parsed.frames = count;
                }
                "--gpu" => parsed.gpu = true,
                flag if flag.starts_with("--") => {
                    return Err(ViewerError::Usage(format!("Unknown flag {flag}")));
                }
                path => parsed.options = Some(PathBuf::from(path)),
            }
        }
        if parsed.height_field.is_some() && parsed.height_image.is_some() {
            return Err(ViewerError::Usage(
                "--height-field and --height-image are exclusive".into(),
            ));
        }
        Ok(parsed)
    }
}

/// Decode an image and keep its luminance as displacement source
fn load_height_image(path: &Path) -> Result<HeightImage, ViewerError> {
    let luma = image::open(path)?.to_luma8();
    let (width, height) = luma.dimensions();
    Ok(HeightImage {
        pixels: luma.into_raw(),
        width: width as usize,
        height: height as usize,
        stride: 1,
    })
}

/// `heightTexture` as a file path next to the options file
fn height_texture_path(options: &GlobeOptions, options_path: Option<&Path>) -> Option<PathBuf> {
    let TextureRef::Path(path) = options.height_texture.as_ref()? else {
        return None;
    };
    let base = options_path.and_then(Path::parent).unwrap_or(Path::new(""));
    Some(base.join(path))
}

fn main() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "globe_viewer=debug,globe_renderer=debug,globe_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run() {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), ViewerError> {
    let args = Args::parse(std::env::args().skip(1))?;
    tracing::info!("Starting globe viewer");

    let options = match &args.options {
        Some(path) => GlobeOptions::load(path)?,
        None => GlobeOptions::default(),
    };
    let mut model = GlobeModel::new("globe0", options);

    let mut coord_sys = GlobeCoordinateSystem::new(GLOBE_RADIUS);
    if let Some(path) = &args.height_field {
        let field: HeightField = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        tracing::info!("Loaded {}x{} height field", field.width(), field.height());
        coord_sys.set_height_field(Some(field));
    } else if let Some(path) = &args.height_image {
        coord_sys.set_height_image(Some(load_height_image(path)?));
    } else if let Some(path) = height_texture_path(&model.options, args.options.as_deref()) {
        match load_height_image(&path) {
            Ok(height_image) => {
                tracing::info!("Loaded height texture {}", path.display());
                coord_sys.set_height_image(Some(height_image));
            }
            Err(e) => tracing::warn!("Height texture {} not loaded: {}", path.display(), e),
        }
    }

    let loader = Arc::new(QueuedTextureLoader::new());
    let host = HostApi::new(loader.clone());
    let mut view = GlobeView::new();

    let gpu = if args.gpu {
        let device = pollster::block_on(request_headless_device());
        if device.is_none() {
            tracing::warn!("No GPU adapter available, skipping uploads");
        }
        device
    } else {
        None
    };
    let mut gpu_geometry: Option<GpuGeometry> = None;

    for frame in 0..args.frames {
        let report = view.render(&model, &mut coord_sys, &host);
        tracing::debug!(
            "Frame {}: displaced={} overlays={:?} albedo={} emission={}",
            frame,
            report.displaced,
            report.layers.overlay_radii,
            report.layers.diffuse_layers,
            report.layers.emissive_layers
        );

        if let Some((device, queue)) = &gpu {
            let geometry = view.displacement().geometry().clone();
            let mut geometry = geometry.write();
            match gpu_geometry.as_mut() {
                Some(buffers) => {
                    if buffers.sync(device, queue, &mut geometry) {
                        tracing::debug!("Uploaded {} vertices", buffers.vertex_count());
                    }
                }
                None => gpu_geometry = Some(GpuGeometry::new(device, &mut geometry)),
            }
        }

        let control = view.view_control_mut().control_mut();
        if frame == 1 {
            control.rotate(40.0, -15.0);
            control.zoom(1.0);
        }
        control.tick(FRAME_SECONDS);

        for action in host.actions.drain() {
            match serde_json::to_string(&action) {
                Ok(json) => println!("{json}"),
                Err(e) => tracing::warn!("Failed to serialize action: {}", e),
            }
            model.apply_action(&action);
        }

        let resolved = loader.pump();
        if host.redraw.take() {
            tracing::debug!("Redraw requested after {} texture(s) resolved", resolved);
        }
    }

    tracing::info!(
        "Rendered {} frame(s): {} mesh(es) in scene, {} overlay(s), {} vertices",
        args.frames,
        coord_sys.scene.mesh_count(),
        view.compositor().overlay_count(),
        view.displacement().geometry().read().vertex_count()
    );
    view.dispose();
    Ok(())
}
