//! Progressive per-pixel accumulation.

use crate::rng::PixelRng;
use crate::tonemap::tone_map;
use lumo_core::ColorXyza;
use lumo_math::UVec2;
use rayon::prelude::*;

/// Running mean of every pixel's estimate plus the pixel's persistent seed
/// pair.
///
/// Each frame contributes exactly one sample per pixel. Pixels never read
/// each other's state, so rows are handed to rayon independently.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    master_seed: u64,
    estimate: Vec<ColorXyza>,
    seeds: Vec<[u32; 2]>,
    frame_count: u32,
}

impl FrameBuffer {
    /// Create an empty buffer. Pixel seeds are derived from `master_seed`.
    pub fn new(width: u32, height: u32, master_seed: u64) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            master_seed,
            estimate: vec![ColorXyza::ZERO; count],
            seeds: PixelRng::seed_pairs(master_seed, count),
            frame_count: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of frames accumulated since the last reset.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Running means in row-major order, row 0 at the top.
    pub fn estimate(&self) -> &[ColorXyza] {
        &self.estimate
    }

    /// Get the running mean at (x, y).
    pub fn get(&self, x: u32, y: u32) -> ColorXyza {
        self.estimate[(y * self.width + x) as usize]
    }

    /// Get the seed pair at (x, y).
    pub fn seeds(&self, x: u32, y: u32) -> [u32; 2] {
        self.seeds[(y * self.width + x) as usize]
    }

    /// Discard all accumulated samples and restart every pixel's random
    /// stream from the master seed.
    pub fn reset(&mut self) {
        self.estimate.fill(ColorXyza::ZERO);
        self.seeds = PixelRng::seed_pairs(self.master_seed, self.seeds.len());
        self.frame_count = 0;
    }

    /// Add one sample per pixel from `sample` and fold it into the running
    /// mean. Each pixel's random stream is resumed from its stored seeds and
    /// the advanced state is written back.
    pub fn accumulate<F>(&mut self, sample: F)
    where
        F: Fn(UVec2, &mut PixelRng) -> ColorXyza + Sync,
    {
        let width = self.width as usize;
        if width == 0 {
            return;
        }

        let weight = 1.0 / (self.frame_count + 1) as f32;

        self.estimate
            .par_chunks_mut(width)
            .zip(self.seeds.par_chunks_mut(width))
            .enumerate()
            .for_each(|(y, (estimate_row, seed_row))| {
                for (x, (estimate, seeds)) in estimate_row.iter_mut().zip(seed_row.iter_mut()).enumerate() {
                    let mut rng = PixelRng::new(*seeds);
                    let value = sample(UVec2::new(x as u32, y as u32), &mut rng);
                    *estimate += (value - *estimate) * weight;
                    *seeds = rng.seeds();
                }
            });

        self.frame_count += 1;
    }

    /// Tone-mapped RGBA pixels in row-major order.
    pub fn to_rgba(&self, exposure: f32, inv_gamma: f32) -> Vec<[u8; 4]> {
        self.estimate
            .par_iter()
            .map(|&xyza| tone_map(xyza, exposure, inv_gamma))
            .collect()
    }
}
