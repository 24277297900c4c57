//! Piecewise-linear transfer functions.
//!
//! Transfer functions map a voxel intensity to an optical property. Scalar
//! functions drive opacity; color functions carry one scalar function per
//! XYZ channel.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::{rgb_to_xyz, ColorRgb, ColorXyz};

/// Maximum number of nodes a single piecewise-linear function may hold.
pub const MAX_NODES: usize = 64;

/// Errors that can occur while editing or baking transfer functions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferFunctionError {
    #[error("Can't discretize a transfer function with zero samples")]
    ZeroSamples,

    #[error("Transfer function already holds the maximum of {0} nodes")]
    TooManyNodes(usize),

    #[error("Transfer function node must be finite, got ({position}, {value})")]
    InvalidNode { position: f32, value: f32 },
}

pub type TransferResult<T> = Result<T, TransferFunctionError>;

/// A single control point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalarNode {
    pub position: f32,
    pub value: f32,
}

/// Piecewise-linear function over sorted nodes.
///
/// Outside the node range the function holds the first/last value. An empty
/// function evaluates to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ScalarNode>", into = "Vec<ScalarNode>")]
pub struct PiecewiseLinearFunction {
    nodes: Vec<ScalarNode>,
}

impl TryFrom<Vec<ScalarNode>> for PiecewiseLinearFunction {
    type Error = TransferFunctionError;

    fn try_from(nodes: Vec<ScalarNode>) -> TransferResult<Self> {
        Self::from_nodes(nodes.into_iter().map(|node| (node.position, node.value)))
    }
}

impl From<PiecewiseLinearFunction> for Vec<ScalarNode> {
    fn from(function: PiecewiseLinearFunction) -> Self {
        function.nodes
    }
}

/// Opacity-style transfer function.
pub type ScalarTransferFunction1D = PiecewiseLinearFunction;

impl PiecewiseLinearFunction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a function from `(position, value)` pairs in any order.
    pub fn from_nodes(nodes: impl IntoIterator<Item = (f32, f32)>) -> TransferResult<Self> {
        let mut function = Self::new();
        for (position, value) in nodes {
            function.add_node(position, value)?;
        }
        Ok(function)
    }

    /// Insert a node, keeping nodes sorted by position.
    pub fn add_node(&mut self, position: f32, value: f32) -> TransferResult<()> {
        if !position.is_finite() || !value.is_finite() {
            return Err(TransferFunctionError::InvalidNode { position, value });
        }
        if self.nodes.len() >= MAX_NODES {
            return Err(TransferFunctionError::TooManyNodes(MAX_NODES));
        }

        self.insert(ScalarNode { position, value });
        Ok(())
    }

    /// Sorted insert without the finiteness and capacity checks.
    pub(crate) fn insert(&mut self, node: ScalarNode) {
        let index = self.nodes.partition_point(|other| other.position <= node.position);
        self.nodes.insert(index, node);
    }

    pub fn reset(&mut self) {
        self.nodes.clear();
    }

    pub fn nodes(&self) -> &[ScalarNode] {
        &self.nodes
    }

    /// Position of the first and last node.
    pub fn range(&self) -> Option<(f32, f32)> {
        Some((self.nodes.first()?.position, self.nodes.last()?.position))
    }

    pub fn evaluate(&self, x: f32) -> f32 {
        let (first, last) = match (self.nodes.first(), self.nodes.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };

        if x <= first.position {
            return first.value;
        }
        if x >= last.position {
            return last.value;
        }

        // first.position < x < last.position, so both neighbours exist.
        let upper = self.nodes.partition_point(|node| node.position <= x);
        let a = self.nodes[upper - 1];
        let b = self.nodes[upper];

        let width = b.position - a.position;
        if width <= 0.0 {
            return b.value;
        }

        let t = (x - a.position) / width;
        a.value + t * (b.value - a.value)
    }

    /// Evaluate at `samples` evenly spaced positions across the node range.
    pub fn discretize(&self, samples: usize) -> TransferResult<Vec<f32>> {
        sample_positions(self.range(), samples).map(|positions| positions.map(|x| self.evaluate(x)).collect())
    }
}

fn sample_positions(
    range: Option<(f32, f32)>,
    samples: usize,
) -> TransferResult<impl Iterator<Item = f32>> {
    if samples == 0 {
        return Err(TransferFunctionError::ZeroSamples);
    }

    let (min, max) = range.unwrap_or((0.0, 0.0));
    let step = if samples > 1 {
        (max - min) / (samples - 1) as f32
    } else {
        0.0
    };

    Ok((0..samples).map(move |i| min + step * i as f32))
}

/// A control point of a color transfer function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorNode {
    pub position: f32,
    pub xyz: ColorXyz,
}

impl ColorNode {
    /// Node from a linear sRGB color, clamped to `[0, 1]` in XYZ.
    pub fn from_rgb(position: f32, rgb: ColorRgb) -> Self {
        Self::from_xyz(position, rgb_to_xyz(rgb).clamp(ColorXyz::ZERO, ColorXyz::ONE))
    }

    pub fn from_xyz(position: f32, xyz: ColorXyz) -> Self {
        Self { position, xyz }
    }
}

/// One piecewise-linear function per XYZ channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorTransferFunction1D {
    channels: [PiecewiseLinearFunction; 3],
}

impl ColorTransferFunction1D {
    pub fn new() -> Self {
        Self::default()
    }

    /// A function returning `xyz` for every intensity.
    pub fn constant(xyz: ColorXyz) -> Self {
        let mut function = Self::new();
        for (channel, value) in function.channels.iter_mut().zip(xyz.to_array()) {
            channel.insert(ScalarNode { position: 0.0, value });
        }
        function
    }

    /// Insert `node` into every channel, or into none if any would reject it.
    pub fn add_node(&mut self, node: ColorNode) -> TransferResult<()> {
        for value in node.xyz.to_array() {
            if !node.position.is_finite() || !value.is_finite() {
                return Err(TransferFunctionError::InvalidNode {
                    position: node.position,
                    value,
                });
            }
        }
        // Deserialized channels may differ in length.
        if self.channels.iter().any(|channel| channel.nodes().len() >= MAX_NODES) {
            return Err(TransferFunctionError::TooManyNodes(MAX_NODES));
        }

        for (channel, value) in self.channels.iter_mut().zip(node.xyz.to_array()) {
            channel.insert(ScalarNode {
                position: node.position,
                value,
            });
        }
        Ok(())
    }

    pub fn channels(&self) -> &[PiecewiseLinearFunction; 3] {
        &self.channels
    }

    pub fn reset(&mut self) {
        self.channels.iter_mut().for_each(PiecewiseLinearFunction::reset);
    }

    pub fn evaluate(&self, intensity: f32) -> ColorXyz {
        ColorXyz::new(
            self.channels[0].evaluate(intensity),
            self.channels[1].evaluate(intensity),
            self.channels[2].evaluate(intensity),
        )
    }

    pub fn discretize(&self, samples: usize) -> TransferResult<Vec<ColorXyz>> {
        sample_positions(self.channels[0].range(), samples)
            .map(|positions| positions.map(|x| self.evaluate(x)).collect())
    }
}
