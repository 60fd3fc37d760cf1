use serde::{Deserialize, Serialize};

use super::brain::Brain;
use super::error::{ConfigError, PersistError};

/// Simulation parameters that control the track, the cars and evolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Simulated area width in pixels.
    pub area_width: usize,
    /// Simulated area height in pixels.
    pub area_height: usize,
    /// Distance between neighbouring hexagon centers (twice the inner radius).
    pub cell_distance: f32,
    /// Number of cars in the first generation.
    pub initial_cars: usize,
    /// Start position shared by every car.
    pub start_pos: [f32; 2],
    /// Start heading (normalized on use).
    pub start_direction: [f32; 2],
    /// Lower speed clamp; also the start speed.
    pub min_speed: f32,
    /// Upper speed clamp.
    pub max_speed: f32,
    /// Maximum turn rate in radians per second.
    pub max_turn_rate: f32,
    /// Speed gained per second at full positive throttle.
    pub acceleration: f32,
    /// Speed lost per second at full negative throttle.
    pub braking: f32,
    /// Speed multiplier applied once per `integrate` call.
    pub damping: f32,
    /// Maximum distance a range finder reports.
    pub sensor_range: f32,
    /// Number of range finder rays.
    pub sensor_count: usize,
    /// Field of view covered by the rays, in radians.
    pub sensor_fov: f32,
    /// Generation ends after this many simulated seconds.
    pub generation_time_limit: f32,
    /// Parents sampled per generation.
    pub parent_count: usize,
    /// Mutated clones appended per generation.
    pub mutation_count: usize,
    /// Mutation amount for weight matrices.
    pub weight_mutation: f32,
    /// Mutation amount for bias vectors.
    pub bias_mutation: f32,
    /// Lower bound on the per-row standard deviation used by mutation.
    pub mutation_std_floor: f32,
    /// RNG seed; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            area_width: 800,
            area_height: 600,
            cell_distance: 50.0,
            initial_cars: 50,
            start_pos: [80.0, 70.0],
            start_direction: [1.0, 0.0],
            min_speed: 10.0,
            max_speed: 600.0,
            max_turn_rate: std::f32::consts::FRAC_PI_2,
            acceleration: 100.0,
            braking: 200.0,
            damping: 0.98,
            sensor_range: 100.0,
            sensor_count: 5,
            sensor_fov: std::f32::consts::FRAC_PI_2,
            generation_time_limit: 20.0,
            parent_count: 5,
            mutation_count: 10,
            weight_mutation: 0.5,
            bias_mutation: 0.1,
            mutation_std_floor: 0.1,
            seed: None,
        }
    }
}

impl Params {
    /// Number of controller inputs: one per ray plus the speed.
    pub fn input_size(&self) -> usize {
        Brain::topology(self.sensor_count)[0].1
    }

    /// Width of both hidden layers.
    pub fn hidden_size(&self) -> usize {
        Brain::topology(self.sensor_count)[0].0
    }

    /// Checks the invariants the rest of the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sensor_count < 2 {
            return Err(ConfigError::TooFewSensors(self.sensor_count));
        }
        if self.area_width == 0 || self.area_height == 0 {
            return Err(ConfigError::EmptyArea {
                width: self.area_width,
                height: self.area_height,
            });
        }
        for (name, value) in [
            ("cell_distance", self.cell_distance),
            ("max_speed", self.max_speed),
            ("sensor_range", self.sensor_range),
            ("generation_time_limit", self.generation_time_limit),
            ("mutation_std_floor", self.mutation_std_floor),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if self.damping.is_nan() || self.damping <= 0.0 || self.damping > 1.0 {
            return Err(ConfigError::Damping(self.damping));
        }
        if self.min_speed.is_nan() || self.min_speed < 0.0 {
            return Err(ConfigError::NegativeSpeed(self.min_speed));
        }
        if self.min_speed > self.max_speed {
            return Err(ConfigError::SpeedRange {
                min: self.min_speed,
                max: self.max_speed,
            });
        }
        if self.initial_cars == 0 {
            return Err(ConfigError::NoCars);
        }
        if self.parent_count == 0 {
            return Err(ConfigError::NoParents);
        }
        Ok(())
    }

    /// Loads parameters from a JSON file; missing fields take their defaults.
    pub fn load_from_file(path: &str) -> Result<Self, PersistError> {
        let json = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }
}
