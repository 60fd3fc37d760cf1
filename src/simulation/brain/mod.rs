//! Neural network controller for car brains.
//!
//! A fixed three-layer perceptron with tanh activation maps sensor readings to
//! a throttle and a turn command. Topology never changes; genetic operators
//! only touch parameter values.

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::BrainError;

pub mod mlp;

pub use mlp::{BiasCrossover, Mlp};

/// Number of controller outputs: throttle and turn.
pub const OUTPUT_SIZE: usize = 2;

/// Controller output, both components in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    /// Positive accelerates, negative brakes.
    pub throttle: f32,
    /// Positive turns toward +y (clockwise on screen).
    pub turn: f32,
}

/// Three-layer perceptron driving one car.
///
/// Layer shapes are `(hidden, inputs)`, `(hidden, hidden)` and `(2, hidden)`,
/// where `inputs = sensor_count + 1` and `hidden = sensor_count - 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brain {
    layers: [Mlp; 3],
}

impl Brain {
    /// Layer shapes `(outputs, inputs)` for a given number of range sensors.
    pub fn topology(sensor_count: usize) -> [(usize, usize); 3] {
        let inputs = sensor_count + 1;
        let hidden = sensor_count.saturating_sub(1);
        [(hidden, inputs), (hidden, hidden), (OUTPUT_SIZE, hidden)]
    }

    /// Creates a brain whose parameters are all drawn uniformly from `[-1, 1]`.
    pub fn random_init<R: Rng + ?Sized>(sensor_count: usize, rng: &mut R) -> Self {
        let layers = Self::topology(sensor_count).map(|(outputs, inputs)| Mlp::new_random(inputs, outputs, rng));
        Self { layers }
    }

    /// Builds a brain from explicit layers, checking that they chain into two outputs.
    pub fn from_layers(layers: [Mlp; 3]) -> Result<Self, BrainError> {
        let brain = Self { layers };
        let inputs = brain.layers[0].input_size();
        brain.validate(inputs.saturating_sub(1))?;
        Ok(brain)
    }

    /// Checks every layer against the topology for `sensor_count` sensors.
    pub fn validate(&self, sensor_count: usize) -> Result<(), BrainError> {
        for (index, (layer, expected)) in self.layers.iter().zip(Self::topology(sensor_count)).enumerate() {
            let actual = (layer.output_size(), layer.input_size());
            if actual != expected {
                return Err(BrainError::ShapeMismatch {
                    index,
                    expected,
                    actual,
                });
            }
            if layer.biases().len() != layer.output_size() {
                return Err(BrainError::BiasMismatch {
                    index,
                    rows: layer.output_size(),
                    biases: layer.biases().len(),
                });
            }
        }
        Ok(())
    }

    /// Ordered layers from input to output.
    pub fn layers(&self) -> &[Mlp; 3] {
        &self.layers
    }

    /// Number of inputs expected by [`Brain::think`].
    pub fn input_size(&self) -> usize {
        self.layers[0].input_size()
    }

    /// Runs a forward pass through all layers.
    #[inline]
    pub fn think(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let [first, rest @ ..] = &self.layers;
        rest.iter().fold(first.forward(inputs), |output, layer| layer.forward(&output))
    }

    /// Maps a sensor reading to a steering command.
    pub fn infer(&self, inputs: &Array1<f32>) -> Steering {
        let output = self.think(inputs);
        Steering {
            throttle: output[0],
            turn: output[1],
        }
    }

    /// Creates a child brain from two parents.
    ///
    /// Hidden layers cross their biases by contiguous split; the two output
    /// biases are picked independently since a split of two entries is trivial.
    pub fn crossover<R: Rng + ?Sized>(parent1: &Brain, parent2: &Brain, rng: &mut R) -> Self {
        let last = parent1.layers.len() - 1;
        let layers = std::array::from_fn(|index| {
            let mode = if index == last {
                BiasCrossover::PerElement
            } else {
                BiasCrossover::Split
            };
            Mlp::crossover(&parent1.layers[index], &parent2.layers[index], mode, rng)
        });
        Self { layers }
    }

    /// Mutates all layers in the brain.
    pub fn mutate<R: Rng + ?Sized>(&mut self, weight_amount: f32, bias_amount: f32, std_floor: f32, rng: &mut R) {
        for layer in &mut self.layers {
            layer.mutate(weight_amount, bias_amount, std_floor, rng);
        }
    }

    /// Calculates the Euclidean distance between the parameters of two brains.
    pub fn distance(brain1: &Brain, brain2: &Brain) -> f32 {
        let mut sum_sq = 0.0;
        for (layer1, layer2) in brain1.layers.iter().zip(&brain2.layers) {
            for (w1, w2) in layer1.weights().iter().zip(layer2.weights().iter()) {
                let diff = w1 - w2;
                sum_sq += diff * diff;
            }
            for (b1, b2) in layer1.biases().iter().zip(layer2.biases().iter()) {
                let diff = b1 - b2;
                sum_sq += diff * diff;
            }
        }
        sum_sq.sqrt()
    }
}
