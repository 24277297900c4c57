//! Strategies for picking the light used by next-event estimation.

use crate::scene::Scene;
use serde::{Deserialize, Serialize};

/// Picks one active light per shading point.
pub trait LightSampler: Send + Sync {
    /// Choose a light for the uniform sample `u` in [0, 1).
    ///
    /// Returns the light's index in the scene and the probability it was
    /// chosen with, or `None` when there is nothing to pick.
    fn pick(&self, scene: &Scene, u: f32) -> Option<(usize, f32)>;
}

/// Every active light is equally likely.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformLightSampler;

impl LightSampler for UniformLightSampler {
    fn pick(&self, scene: &Scene, u: f32) -> Option<(usize, f32)> {
        let ids = scene.light_ids();
        if ids.is_empty() {
            return None;
        }

        let count = ids.len();
        let index = ((u * count as f32) as usize).min(count - 1);
        Some((ids[index], 1.0 / count as f32))
    }
}

/// Lights are picked in proportion to their emitted power.
///
/// Built for a fixed scene; rebuild it when lights change.
#[derive(Debug, Clone, Default)]
pub struct PowerLightSampler {
    ids: Vec<usize>,
    cdf: Vec<f32>,
    pmf: Vec<f32>,
}

impl PowerLightSampler {
    pub fn new(scene: &Scene) -> Self {
        let ids = scene.light_ids().to_vec();
        let power: Vec<f32> = ids.iter().map(|&id| scene.lights()[id].power()).collect();
        let total: f32 = power.iter().sum();

        if !(total > 0.0) || !total.is_finite() {
            if !ids.is_empty() {
                log::warn!("Lights carry no usable power, falling back to uniform selection");
            }
            let pmf = vec![1.0 / ids.len().max(1) as f32; ids.len()];
            return Self::from_pmf(ids, pmf);
        }

        let pmf = power.iter().map(|p| p / total).collect();
        Self::from_pmf(ids, pmf)
    }

    fn from_pmf(ids: Vec<usize>, pmf: Vec<f32>) -> Self {
        let cdf = pmf
            .iter()
            .scan(0.0, |sum, p| {
                *sum += p;
                Some(*sum)
            })
            .collect();
        Self { ids, cdf, pmf }
    }
}

impl LightSampler for PowerLightSampler {
    fn pick(&self, _scene: &Scene, u: f32) -> Option<(usize, f32)> {
        if self.ids.is_empty() {
            return None;
        }

        let index = self
            .cdf
            .partition_point(|&c| c <= u)
            .min(self.ids.len() - 1);
        Some((self.ids[index], self.pmf[index]))
    }
}

/// Configurable choice of light selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LightSelection {
    #[default]
    Uniform,
    Power,
}

impl LightSelection {
    pub fn build(&self, scene: &Scene) -> Box<dyn LightSampler> {
        match self {
            LightSelection::Uniform => Box::new(UniformLightSampler),
            LightSelection::Power => Box::new(PowerLightSampler::new(scene)),
        }
    }
}
