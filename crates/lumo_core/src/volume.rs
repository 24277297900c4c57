//! World-space scalar field over a voxel lattice.
//!
//! A `Volume` centers its lattice at the origin and answers intensity and
//! gradient queries at world-space points. Gradient taps are offset by the
//! smallest voxel spacing along each axis.

use lumo_math::{BoundingBox, IVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::voxels::{VolumeError, VolumeResult, VoxelGrid};

/// How gradients of the scalar field are estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GradientMode {
    /// One reference tap plus one tap per axis.
    ///
    /// Components are `reference - offset`, i.e. the estimate points down the
    /// intensity slope, opposite to the central-difference estimate. Shading
    /// code built on this mode relies on that sign.
    ForwardDifferences,
    /// Two taps per axis.
    #[default]
    CentralDifferences,
    /// Central differences blended over the center and eight diagonal
    /// neighbours.
    Filtered,
}

/// A scalar volume placed in world space.
#[derive(Debug, Clone)]
pub struct Volume {
    voxels: VoxelGrid,
    bounding_box: BoundingBox,
    spacing: Vec3,
    inv_spacing: Vec3,
    size: Vec3,
    inv_size: Vec3,
    min_step: f32,
    gradient_delta: [Vec3; 3],
}

impl Volume {
    /// Build a volume from a lattice and its physical voxel spacing.
    ///
    /// With `normalize_size` the spacing is scaled so the longest physical
    /// axis measures 1; otherwise the spacing is used as given.
    pub fn new(voxels: VoxelGrid, source_spacing: Vec3, normalize_size: bool) -> VolumeResult<Self> {
        if !source_spacing.is_finite() || source_spacing.cmple(Vec3::ZERO).any() {
            return Err(VolumeError::InvalidSpacing(source_spacing));
        }

        let resolution = voxels.resolution().as_vec3();

        let scale = if normalize_size {
            1.0 / (resolution * source_spacing).max_element()
        } else {
            1.0
        };

        let spacing = scale * source_spacing;
        let size = resolution * spacing;
        let min_step = spacing.min_element();

        log::debug!(
            "Volume {} voxels, spacing {}, size {}, min step {}",
            voxels.resolution(),
            spacing,
            size,
            min_step
        );

        Ok(Self {
            voxels,
            bounding_box: BoundingBox::centered(size),
            spacing,
            inv_spacing: Vec3::ONE / spacing,
            size,
            inv_size: Vec3::ONE / size,
            min_step,
            gradient_delta: [
                Vec3::new(min_step, 0.0, 0.0),
                Vec3::new(0.0, min_step, 0.0),
                Vec3::new(0.0, 0.0, min_step),
            ],
        })
    }

    pub fn voxels(&self) -> &VoxelGrid {
        &self.voxels
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    pub fn spacing(&self) -> Vec3 {
        self.spacing
    }

    pub fn inv_spacing(&self) -> Vec3 {
        self.inv_spacing
    }

    pub fn size(&self) -> Vec3 {
        self.size
    }

    pub fn inv_size(&self) -> Vec3 {
        self.inv_size
    }

    pub fn min_step(&self) -> f32 {
        self.min_step
    }

    pub fn gradient_delta(&self) -> [Vec3; 3] {
        self.gradient_delta
    }

    /// Intensity of the voxel containing `p`.
    ///
    /// Points are expected inside the bounding box; the lattice clamps
    /// anything outside to its border.
    #[inline]
    pub fn sample(&self, p: Vec3) -> f32 {
        let offset = p - self.bounding_box.min();
        let local = offset * self.inv_size * self.voxels.resolution().as_vec3();
        self.voxels.get(IVec3::new(local.x as i32, local.y as i32, local.z as i32)) as f32
    }

    /// Gradient estimate at `p` using `mode`.
    pub fn gradient(&self, p: Vec3, mode: GradientMode) -> Vec3 {
        match mode {
            GradientMode::ForwardDifferences => self.gradient_forward(p),
            GradientMode::CentralDifferences => self.gradient_central(p),
            GradientMode::Filtered => self.gradient_filtered(p),
        }
    }

    /// Unit gradient at `p`, or `None` where the gradient vanishes.
    pub fn normalized_gradient(&self, p: Vec3, mode: GradientMode) -> Option<Vec3> {
        self.gradient(p, mode).try_normalize()
    }

    /// Euclidean norm of the central-difference partial derivatives,
    /// each divided by twice the spacing along its axis.
    pub fn gradient_magnitude(&self, p: Vec3) -> f32 {
        let mut sum = 0.0;

        for (axis, delta) in self.gradient_delta.iter().enumerate() {
            let d = (self.sample(p - *delta) - self.sample(p + *delta)) * (0.5 / self.spacing[axis]);
            sum += d * d;
        }

        sum.sqrt()
    }

    fn gradient_forward(&self, p: Vec3) -> Vec3 {
        let reference = self.sample(p);
        let [dx, dy, dz] = self.gradient_delta;

        Vec3::new(
            reference - self.sample(p + dx),
            reference - self.sample(p + dy),
            reference - self.sample(p + dz),
        )
    }

    fn gradient_central(&self, p: Vec3) -> Vec3 {
        let [dx, dy, dz] = self.gradient_delta;
        let scale = 0.5 / self.min_step;

        Vec3::new(
            self.sample(p + dx) - self.sample(p - dx),
            self.sample(p + dy) - self.sample(p - dy),
            self.sample(p + dz) - self.sample(p - dz),
        ) * scale
    }

    fn gradient_filtered(&self, p: Vec3) -> Vec3 {
        let o = Vec3::splat(self.min_step);
        let g = |sx: f32, sy: f32, sz: f32| self.gradient_central(p + o * Vec3::new(sx, sy, sz));

        let g0 = self.gradient_central(p);
        let g1 = g(-1.0, -1.0, -1.0);
        let g2 = g(1.0, 1.0, 1.0);
        let g3 = g(-1.0, 1.0, -1.0);
        let g4 = g(1.0, -1.0, 1.0);
        let g5 = g(-1.0, -1.0, 1.0);
        let g6 = g(1.0, 1.0, -1.0);
        let g7 = g(-1.0, 1.0, 1.0);
        let g8 = g(1.0, -1.0, -1.0);

        let l0 = g1.lerp(g2, 0.5).lerp(g3.lerp(g4, 0.5), 0.5);
        let l1 = g5.lerp(g6, 0.5).lerp(g7.lerp(g8, 0.5), 0.5);

        // Weighted towards the un-offset estimate.
        l0.lerp(l1, 0.5).lerp(g0, 0.75)
    }
}
