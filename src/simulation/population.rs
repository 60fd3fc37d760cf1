//! Generation loop: simulates a population of cars until an end condition and
//! then swaps in the next generation.
//!
//! The simulation alternates between two phases. While [`Phase::Running`],
//! every [`Simulation::step`] advances each car by one tick. When the time
//! limit runs out, every car has crashed, or an end was requested, the step
//! switches to [`Phase::Evolving`], replaces the whole population in one go and
//! returns to running before it returns.

use geo::Coord;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::brain::Brain;
use super::car::{Car, Origin, Perception, Pose};
use super::error::{ConfigError, PersistError};
use super::evolution::EvolutionEngine;
use super::params::Params;
use super::track::{Cell, HexGrid};

/// Phase of the generation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Cars are driving and accumulating distance.
    Running,
    /// The next generation is being built.
    Evolving,
}

/// Why a generation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// An external trigger asked for the end.
    Requested,
    /// No car is still driving.
    AllCrashed,
    /// The generation time limit elapsed.
    TimeLimit,
}

/// Statistics of a finished generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationSummary {
    /// Number of the generation that just ended (starting at 1).
    pub generation: u32,
    /// Why it ended.
    pub reason: EndReason,
    /// Simulated seconds the generation lasted.
    pub elapsed: f32,
    /// Best distance traveled.
    pub best_distance: f32,
    /// Mean distance traveled.
    pub mean_distance: f32,
    /// Cars still driving when it ended.
    pub survivors: usize,
    /// Size of the population that was evaluated.
    pub population: usize,
    /// Size of the next generation.
    pub next_population: usize,
    /// Mean parameter distance of the next generation to its elite.
    pub diversity: f32,
}

/// Controllers of a population, for saving and restoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Generation the controllers belong to.
    pub generation: u32,
    /// One controller per car, in population order.
    pub brains: Vec<Brain>,
}

impl Snapshot {
    /// Saves the snapshot as pretty-printed JSON.
    pub fn save_to_file(&self, path: &str) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads a snapshot from a JSON file.
    pub fn load_from_file(path: &str) -> Result<Self, PersistError> {
        let json = std::fs::read_to_string(path)?;
        let snapshot = serde_json::from_str(&json)?;
        Ok(snapshot)
    }
}

/// A track, a population of cars and the generation bookkeeping.
pub struct Simulation {
    params: Params,
    track: HexGrid,
    cars: Vec<Car>,
    perception: Perception,
    engine: EvolutionEngine,
    rng: StdRng,
    generation: u32,
    elapsed: f32,
    phase: Phase,
    end_requested: bool,
}

impl Simulation {
    /// Creates a simulation with the default track and `initial_cars` random controllers.
    pub fn new(params: Params) -> Result<Self, ConfigError> {
        params.validate()?;
        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let start = Pose::from_params(&params);
        let cars = (0..params.initial_cars)
            .map(|_| Car::new(start, Brain::random_init(params.sensor_count, &mut rng), Origin::Random))
            .collect();
        let track = HexGrid::new(params.cell_distance, params.area_width, params.area_height);

        Ok(Self::assemble(params, track, cars, rng, 1))
    }

    /// Restores a population from saved controllers.
    pub fn from_snapshot(params: Params, snapshot: Snapshot) -> Result<Self, PersistError> {
        params.validate()?;
        if snapshot.brains.is_empty() {
            return Err(PersistError::Empty);
        }
        for brain in &snapshot.brains {
            brain.validate(params.sensor_count)?;
        }
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let start = Pose::from_params(&params);
        let cars = snapshot
            .brains
            .into_iter()
            .map(|brain| Car::new(start, brain, Origin::Restored))
            .collect();
        let track = HexGrid::new(params.cell_distance, params.area_width, params.area_height);

        Ok(Self::assemble(params, track, cars, rng, snapshot.generation.max(1)))
    }

    /// Replaces the generated track, e.g. with a hand-made layout.
    pub fn with_track(mut self, track: HexGrid) -> Self {
        self.track = track;
        self
    }

    fn assemble(params: Params, track: HexGrid, cars: Vec<Car>, rng: StdRng, generation: u32) -> Self {
        Self {
            engine: EvolutionEngine::new(&params),
            perception: Perception::default(),
            params,
            track,
            cars,
            rng,
            generation,
            elapsed: 0.0,
            phase: Phase::Running,
            end_requested: false,
        }
    }

    /// Simulation parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The track being driven.
    pub fn track(&self) -> &HexGrid {
        &self.track
    }

    /// Cars of the current generation.
    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    /// Current generation number, starting at 1.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Senses shared by every car.
    pub fn perception(&self) -> &Perception {
        &self.perception
    }

    /// Simulated seconds since the current generation started.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Current phase of the generation state machine.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of cars that have not crashed.
    pub fn alive_count(&self) -> usize {
        self.cars.iter().filter(|car| !car.is_crashed()).count()
    }

    /// Edits the track between ticks. Returns `true` if a cell changed.
    pub fn set_cell(&mut self, point: Coord<f32>, cell: Cell) -> bool {
        self.track.set_cell(point, cell)
    }

    /// Asks for the current generation to end at the next tick boundary.
    pub fn request_end(&mut self) {
        self.end_requested = true;
    }

    /// Returns why the current generation should end, if it should.
    pub fn end_condition(&self) -> Option<EndReason> {
        if self.end_requested {
            Some(EndReason::Requested)
        } else if self.alive_count() == 0 {
            Some(EndReason::AllCrashed)
        } else if self.elapsed >= self.params.generation_time_limit {
            Some(EndReason::TimeLimit)
        } else {
            None
        }
    }

    /// Advances every car by one tick, then evolves if the generation is over.
    ///
    /// # Returns
    ///
    /// The summary of the finished generation if this tick ended one.
    pub fn step(&mut self, dt: f32) -> Option<GenerationSummary> {
        for car in &mut self.cars {
            car.integrate(&self.track, &self.params, dt);
            car.update(&self.perception, &self.track, &self.params, dt);
        }
        self.elapsed += dt;

        let reason = self.end_condition()?;
        Some(self.evolve(reason))
    }

    /// Ends the current generation and replaces the population with the next one.
    pub fn evolve(&mut self, reason: EndReason) -> GenerationSummary {
        self.phase = Phase::Evolving;

        let population = self.cars.len();
        let survivors = self.alive_count();
        let best_distance = self
            .cars
            .iter()
            .map(Car::distance_traveled)
            .fold(0.0, f32::max);
        let mean_distance = if population > 0 {
            self.cars.iter().map(Car::distance_traveled).sum::<f32>() / population as f32
        } else {
            0.0
        };

        let next = self.engine.evolve(&self.cars, &mut self.rng);
        let diversity = match next.first() {
            Some(elite) if next.len() > 1 => {
                next[1..]
                    .iter()
                    .map(|car| Brain::distance(&elite.brain, &car.brain))
                    .sum::<f32>()
                    / (next.len() - 1) as f32
            }
            _ => 0.0,
        };

        let summary = GenerationSummary {
            generation: self.generation,
            reason,
            elapsed: self.elapsed,
            best_distance,
            mean_distance,
            survivors,
            population,
            next_population: next.len(),
            diversity,
        };
        info!(
            generation = summary.generation,
            reason = ?summary.reason,
            best = summary.best_distance,
            mean = summary.mean_distance,
            survivors = summary.survivors,
            next = summary.next_population,
            diversity = summary.diversity,
            "generation finished"
        );

        self.cars = next;
        self.generation += 1;
        self.elapsed = 0.0;
        self.end_requested = false;
        self.phase = Phase::Running;
        summary
    }

    /// Captures the controllers of the current population.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            generation: self.generation,
            brains: self.cars.iter().map(|car| car.brain.clone()).collect(),
        }
    }

    /// Saves the current controllers to a JSON file.
    pub fn save_to_file(&self, path: &str) -> Result<(), PersistError> {
        self.snapshot().save_to_file(path)
    }
}
