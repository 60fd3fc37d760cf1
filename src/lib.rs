//! # Neurodrive - Neuroevolution of Self-Driving Cars
//!
//! A population of cars learns to drive around a hexagonal track. Each car is
//! steered by a small feed-forward neural network, and a genetic algorithm
//! breeds the controllers of the cars that drove furthest.
//!
//! ## Features
//!
//! - Hexagonal occupancy grid with a pixel-resolution collision bitmap
//! - Ray-cast distance sensors plus a speedometer
//! - Three-layer tanh controller with fixed topology
//! - Fitness-proportional selection, elitism, split crossover and row mutation
//! - Editable track (cells can be toggled between ticks)
//! - Save/load of controller snapshots
//!
//! ## Core Modules
//!
//! - [`simulation::track`] - Occupancy grid and collision queries
//! - [`simulation::car`] - Car kinematics and sensors
//! - [`simulation::brain`] - Neural network controller
//! - [`simulation::evolution`] - Genetic operators
//! - [`simulation::population`] - Generation loop

/// Core simulation logic and data structures.
pub mod simulation {
    /// Neural network controller for cars.
    pub mod brain;
    /// Car kinematics, sensors, and lifecycle.
    pub mod car;
    /// Error types for configuration, controllers and persistence.
    pub mod error;
    /// Genetic algorithm: selection, crossover and mutation.
    pub mod evolution;
    /// Geometric helpers for hexagons and rotations.
    pub mod geometric_utils;
    /// Simulation parameters.
    pub mod params;
    /// Generation state machine driving a population of cars.
    pub mod population;
    /// Hexagonal occupancy grid with a collision bitmap.
    pub mod track;
}
