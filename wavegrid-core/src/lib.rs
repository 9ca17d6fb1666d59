//! Core data structures and the wave displacement updater for wavegrid
//!
//! This crate is GPU-free. It provides the fixed-size [`Grid`], the
//! [`NoiseField`] abstraction with a seeded simplex implementation, the
//! per-frame updater in [`wave`], and the TOML [`config`] shared by the
//! renderer and the binary.

pub mod config;
pub mod error;
pub mod grid;
pub mod math;
pub mod noise_field;
pub mod traits;
pub mod wave;

pub use config::*;
pub use error::*;
pub use grid::*;
pub use math::*;
pub use noise_field::*;
pub use traits::*;
pub use wave::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix4, Point3, Vector2, Vector3};

/// Common result type for wavegrid operations
pub type Result<T> = std::result::Result<T, Error>;
