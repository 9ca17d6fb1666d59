//! Interactive visualization of the wavegrid sphere field
//!
//! This crate ties the wave updater to a window:
//! - Sphere grid scene laid out on the `xz` plane
//! - Orbit camera with rotate, pan and zoom
//! - Pointer tracking in normalized device coordinates
//! - A winit-driven viewer that steps the wave once per frame

pub mod camera;
pub mod input;
pub mod scene;
pub mod viewer;

pub use camera::*;
pub use input::*;
pub use scene::*;
pub use viewer::*;

use wavegrid_core::{Result, SimplexField, WaveConfig};

/// Open a viewer for `config` with simplex noise seeded from its `noise` section
pub fn run_viewer(config: WaveConfig) -> Result<()> {
    let noise = SimplexField::from_seed(config.noise.seed);
    tracing::info!(seed = noise.seed(), "noise field ready");
    WaveViewer::new(config, noise)?.run()
}
