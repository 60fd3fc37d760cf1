//! Single dense layer with genetic operators.

use ndarray::{Array1, Array2, ArrayViewMut2, Axis, s};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::simulation::error::BrainError;

/// How bias vectors are recombined by [`Mlp::crossover`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiasCrossover {
    /// One contiguous slice from each parent, like the weight columns.
    Split,
    /// Every entry picked independently from either parent.
    PerElement,
}

/// A single layer of a multi-layer perceptron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mlp {
    /// Weight matrix (`output_size` × `input_size`).
    weights: Array2<f32>,
    /// Bias vector (`output_size`).
    biases: Array1<f32>,
}

impl Mlp {
    /// Creates a new layer with weights and biases drawn uniformly from `[-1, 1]`.
    pub fn new_random<R: Rng + ?Sized>(input_size: usize, output_size: usize, rng: &mut R) -> Self {
        Self {
            weights: Array2::from_shape_simple_fn((output_size, input_size), || {
                rng.random_range(-1.0..=1.0)
            }),
            biases: Array1::from_shape_simple_fn(output_size, || rng.random_range(-1.0..=1.0)),
        }
    }

    /// Builds a layer from explicit parameters.
    pub fn from_parts(weights: Array2<f32>, biases: Array1<f32>) -> Result<Self, BrainError> {
        if weights.nrows() != biases.len() {
            return Err(BrainError::BiasMismatch {
                index: 0,
                rows: weights.nrows(),
                biases: biases.len(),
            });
        }
        Ok(Self { weights, biases })
    }

    /// Weight matrix (`output_size` × `input_size`).
    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    /// Bias vector (`output_size`).
    pub fn biases(&self) -> &Array1<f32> {
        &self.biases
    }

    /// Number of inputs the layer consumes.
    pub fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Number of outputs the layer produces.
    pub fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    /// Performs forward pass with tanh activation.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = self.weights.dot(inputs);
        output += &self.biases;
        output.mapv_inplace(f32::tanh);
        output
    }

    /// Creates a child layer from two parents of the same shape.
    ///
    /// Weights are split at a random column; a coin flip decides which parent
    /// supplies the columns left of the split. Biases follow `bias_mode`.
    /// Parents are left untouched.
    pub fn crossover<R: Rng + ?Sized>(
        parent1: &Mlp,
        parent2: &Mlp,
        bias_mode: BiasCrossover,
        rng: &mut R,
    ) -> Self {
        let split = split_point(parent1.weights.ncols(), rng);
        let weights = crossover_columns(&parent1.weights, &parent2.weights, split, rng.random());

        let biases = match bias_mode {
            BiasCrossover::Split => {
                let split = split_point(parent1.biases.len(), rng);
                crossover_rows(&parent1.biases, &parent2.biases, split, rng.random())
            }
            BiasCrossover::PerElement => crossover_elements(&parent1.biases, &parent2.biases, rng),
        };

        Self { weights, biases }
    }

    /// Perturbs one random entry in roughly half of the rows of every parameter array.
    ///
    /// See [`mutate_rows`] for the perturbation rule. Biases are treated as a
    /// column, so each bias entry is its own row.
    pub fn mutate<R: Rng + ?Sized>(
        &mut self,
        weight_amount: f32,
        bias_amount: f32,
        std_floor: f32,
        rng: &mut R,
    ) {
        mutate_rows(self.weights.view_mut(), weight_amount, std_floor, rng);
        mutate_rows(
            self.biases.view_mut().insert_axis(Axis(1)),
            bias_amount,
            std_floor,
            rng,
        );
    }
}

/// Picks a split index for an axis of length `len`.
///
/// Long axes split strictly inside (`1..len - 1`) so both parents contribute.
/// Axes of length 2 split in the middle; length 0 or 1 returns 0, which makes
/// the child a copy of whichever parent supplies the right-hand side.
pub fn split_point<R: Rng + ?Sized>(len: usize, rng: &mut R) -> usize {
    if len >= 3 {
        rng.random_range(1..len - 1)
    } else {
        len / 2
    }
}

/// Copies `a`, then overwrites one side of column `split` with `b`.
///
/// With `b_takes_left` the columns `..split` come from `b`, otherwise the
/// columns `split..` do.
pub fn crossover_columns(a: &Array2<f32>, b: &Array2<f32>, split: usize, b_takes_left: bool) -> Array2<f32> {
    let mut child = a.clone();
    let split = split.min(a.ncols());
    if b_takes_left {
        child.slice_mut(s![.., ..split]).assign(&b.slice(s![.., ..split]));
    } else {
        child.slice_mut(s![.., split..]).assign(&b.slice(s![.., split..]));
    }
    child
}

/// Same as [`crossover_columns`] for a vector, splitting by row.
pub fn crossover_rows(a: &Array1<f32>, b: &Array1<f32>, split: usize, b_takes_left: bool) -> Array1<f32> {
    let mut child = a.clone();
    let split = split.min(a.len());
    if b_takes_left {
        child.slice_mut(s![..split]).assign(&b.slice(s![..split]));
    } else {
        child.slice_mut(s![split..]).assign(&b.slice(s![split..]));
    }
    child
}

/// Picks every entry from either parent with equal probability.
pub fn crossover_elements<R: Rng + ?Sized>(a: &Array1<f32>, b: &Array1<f32>, rng: &mut R) -> Array1<f32> {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| if rng.random_bool(0.5) { y } else { x })
        .collect()
}

/// With probability one half per row, adds
/// `amount * max(row_std, std_floor) * U(-1, 1)` to one random entry of the row.
pub fn mutate_rows<R: Rng + ?Sized>(mut matrix: ArrayViewMut2<'_, f32>, amount: f32, std_floor: f32, rng: &mut R) {
    for mut row in matrix.rows_mut() {
        if row.is_empty() || !rng.random_bool(0.5) {
            continue;
        }
        let pos = rng.random_range(0..row.len());
        let std = row.std(0.0).max(std_floor);
        row[pos] += amount * std * rng.random_range(-1.0..=1.0);
    }
}
