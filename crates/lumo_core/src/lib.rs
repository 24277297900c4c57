//! Lumo Core - volume data and shading configuration.
//!
//! This crate provides:
//!
//! - **Volume data**: `VoxelGrid` (the scalar lattice) and `Volume`, which
//!   places the lattice in world space and answers point, gradient and
//!   gradient-magnitude queries
//! - **Transfer functions**: piecewise-linear scalar and color functions
//!   mapping voxel intensity to opacity and albedo
//! - **Color**: tristimulus aliases and XYZ/linear sRGB conversion
//! - **Volume property**: the serializable shading configuration consumed by
//!   the renderer
//!
//! # Example
//!
//! ```ignore
//! use lumo_core::{GradientMode, Volume, VoxelGrid};
//! use lumo_math::{UVec3, Vec3};
//!
//! let grid = VoxelGrid::from_fn(UVec3::splat(32), |v| (v.x * 100) as u16)?;
//! let volume = Volume::new(grid, Vec3::ONE, true)?;
//! let n = volume.normalized_gradient(Vec3::ZERO, GradientMode::CentralDifferences);
//! ```

pub mod color;
pub mod property;
pub mod transfer;
pub mod volume;
pub mod voxels;

// Re-export commonly used types
pub use color::{luminance, rgb_to_xyz, xyz_to_rgb, ColorRgb, ColorXyz, ColorXyza};
pub use property::{ShadingMode, VolumeProperty};
pub use transfer::{
    ColorNode, ColorTransferFunction1D, PiecewiseLinearFunction, ScalarNode,
    ScalarTransferFunction1D, TransferFunctionError, TransferResult, MAX_NODES,
};
pub use volume::{GradientMode, Volume};
pub use voxels::{VolumeError, VolumeResult, VoxelGrid};
