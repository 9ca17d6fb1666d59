//! # wavegrid GPU
//!
//! wgpu rendering for the wavegrid sphere field: one UV sphere mesh drawn once
//! per grid cell with instancing, lit by an ambient term and a single spot
//! light.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wavegrid_gpu::{InstanceRaw, SphereMesh, SphereRenderConfig, SphereRenderer};
//!
//! async fn example(window: Arc<winit::window::Window>) -> wavegrid_core::Result<()> {
//!     let mesh = SphereMesh::uv_sphere(0.07, 50, 50);
//!     let mut renderer = SphereRenderer::new(window, &mesh, SphereRenderConfig::default()).await?;
//!     renderer.update_instances(&[InstanceRaw { translation: [0.0, 0.0, 0.0] }]);
//!     renderer.render()?;
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod renderer;
pub mod sphere;

// Re-export commonly used items
pub use device::GpuContext;
pub use renderer::{
    CameraUniform, InstanceRaw, LightingUniform, MaterialUniform, SphereRenderConfig, SphereRenderer, SpotLight,
};
pub use sphere::{SphereMesh, SphereVertex};
