//! Scalar voxel lattice.

use lumo_math::{IVec3, UVec3};
use thiserror::Error;

/// Errors that can occur while building volume data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VolumeError {
    #[error("Volume resolution must be non-zero on every axis, got {0}")]
    EmptyResolution(UVec3),

    #[error("Expected {expected} voxels for the given resolution, got {actual}")]
    VoxelCountMismatch { expected: usize, actual: usize },

    #[error("Voxel spacing must be finite and positive, got {0}")]
    InvalidSpacing(lumo_math::Vec3),
}

pub type VolumeResult<T> = Result<T, VolumeError>;

/// A dense 3D lattice of 16-bit intensities, x varying fastest.
///
/// Lookups outside the lattice are clamped to the nearest border voxel.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    resolution: UVec3,
    voxels: Vec<u16>,
}

impl VoxelGrid {
    /// Create a lattice from raw voxel data.
    pub fn new(resolution: UVec3, voxels: Vec<u16>) -> VolumeResult<Self> {
        if resolution.cmpeq(UVec3::ZERO).any() {
            return Err(VolumeError::EmptyResolution(resolution));
        }

        let expected = resolution.x as usize * resolution.y as usize * resolution.z as usize;
        if voxels.len() != expected {
            return Err(VolumeError::VoxelCountMismatch {
                expected,
                actual: voxels.len(),
            });
        }

        Ok(Self { resolution, voxels })
    }

    /// Create a lattice by evaluating `f` at every voxel index.
    pub fn from_fn(resolution: UVec3, mut f: impl FnMut(UVec3) -> u16) -> VolumeResult<Self> {
        let count = resolution.x as usize * resolution.y as usize * resolution.z as usize;
        let mut voxels = Vec::with_capacity(count);

        for z in 0..resolution.z {
            for y in 0..resolution.y {
                for x in 0..resolution.x {
                    voxels.push(f(UVec3::new(x, y, z)));
                }
            }
        }

        Self::new(resolution, voxels)
    }

    pub fn resolution(&self) -> UVec3 {
        self.resolution
    }

    /// Fetch the voxel at `index`, clamping each component into range.
    #[inline]
    pub fn get(&self, index: IVec3) -> u16 {
        let max = self.resolution.as_ivec3() - IVec3::ONE;
        let i = index.clamp(IVec3::ZERO, max).as_uvec3();
        let offset = i.x as usize
            + i.y as usize * self.resolution.x as usize
            + i.z as usize * self.resolution.x as usize * self.resolution.y as usize;
        self.voxels[offset]
    }

    /// Smallest and largest intensity in the lattice.
    pub fn range(&self) -> (u16, u16) {
        self.voxels
            .iter()
            .fold((u16::MAX, u16::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }
}
