//! Error types.
//!
//! Per-tick simulation never fails; only configuration, controller construction
//! and persistence return these.

use thiserror::Error;

/// Rejected simulation parameters.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// At least two sensors are needed to spread rays across the field of view.
    #[error("sensor_count must be at least 2, got {0}")]
    TooFewSensors(usize),
    /// A quantity that must be strictly positive was not.
    #[error("{name} must be positive, got {value}")]
    NonPositive {
        /// Name of the offending parameter.
        name: &'static str,
        /// Value that was supplied.
        value: f32,
    },
    /// Cars never drive backwards.
    #[error("min_speed must not be negative, got {0}")]
    NegativeSpeed(f32),
    /// Damping must keep speed positive without amplifying it.
    #[error("damping must be in (0, 1], got {0}")]
    Damping(f32),
    /// Speed limits are inverted.
    #[error("min_speed {min} exceeds max_speed {max}")]
    SpeedRange {
        /// Configured minimum speed.
        min: f32,
        /// Configured maximum speed.
        max: f32,
    },
    /// The first generation needs at least one car.
    #[error("initial_cars must be at least 1")]
    NoCars,
    /// Selection needs at least one parent.
    #[error("parent_count must be at least 1")]
    NoParents,
    /// The simulated area has no pixels.
    #[error("area {width}x{height} is empty")]
    EmptyArea {
        /// Area width in pixels.
        width: usize,
        /// Area height in pixels.
        height: usize,
    },
}

/// A controller whose layers do not chain together.
#[derive(Debug, Error, PartialEq)]
pub enum BrainError {
    /// Weight matrix and bias vector disagree on the number of outputs.
    #[error("layer {index}: weights have {rows} rows but biases have {biases} entries")]
    BiasMismatch {
        /// Layer index, input side first.
        index: usize,
        /// Rows of the weight matrix.
        rows: usize,
        /// Length of the bias vector.
        biases: usize,
    },
    /// Layer does not have the expected `(outputs, inputs)` shape.
    #[error("layer {index}: expected shape {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Layer index, input side first.
        index: usize,
        /// Expected `(outputs, inputs)`.
        expected: (usize, usize),
        /// Actual `(outputs, inputs)`.
        actual: (usize, usize),
    },
}

/// Failure to save or restore a snapshot or a parameter file.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Underlying file I/O failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON (de)serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// A stored controller does not fit the configured topology.
    #[error("incompatible controller: {0}")]
    Brain(#[from] BrainError),
    /// Stored parameters are invalid.
    #[error("invalid parameters: {0}")]
    Config(#[from] ConfigError),
    /// The snapshot contains no controllers.
    #[error("snapshot contains no controllers")]
    Empty,
}
