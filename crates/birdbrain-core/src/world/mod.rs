pub mod lifecycle;
pub mod metrics;
#[cfg(test)]
mod tests;

pub use lifecycle::{StepReport, TickInput};
pub use metrics::*;

use crate::agent::Bird;
use crate::config::{SimConfig, SimConfigError};
use crate::course::Course;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::{error::Error, fmt};

/// The whole simulation: one population of birds, one obstacle course,
/// one seeded random source. Mutated exclusively by `step`; everything
/// else is read-only.
pub struct World {
    pub birds: Vec<Bird>,
    pub(crate) course: Course,
    pub(crate) config: SimConfig,
    pub(crate) rng: ChaCha12Rng,
    pub(crate) epoch: u32,
    pub(crate) step_index: usize,
    pub(crate) epoch_steps: usize,
    pub(crate) best_fitness_ever: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorldInitError {
    Config(SimConfigError),
}

impl fmt::Display for WorldInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldInitError::Config(e) => write!(f, "{}", e),
        }
    }
}

impl From<SimConfigError> for WorldInitError {
    fn from(err: SimConfigError) -> Self {
        WorldInitError::Config(err)
    }
}

impl Error for WorldInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WorldInitError::Config(e) => Some(e),
        }
    }
}

impl World {
    pub fn new(config: SimConfig) -> Self {
        Self::try_new(config).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_new(config: SimConfig) -> Result<Self, WorldInitError> {
        config.validate()?;
        let mut rng = ChaCha12Rng::seed_from_u64(config.seed);
        let birds = (0..config.population_size)
            .map(|_| Bird::random(&config.layer_sizes, &mut rng))
            .collect();
        let course = Course::generate(&config, &mut rng);
        Ok(Self {
            birds,
            course,
            config,
            rng,
            epoch: 0,
            step_index: 0,
            epoch_steps: 0,
            best_fitness_ever: 0.0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// X position of the bird furthest along the course, dead or alive.
    /// Camera anchor and wall-recycling reference.
    pub fn leader_x(&self) -> f64 {
        self.birds
            .iter()
            .map(|b| b.x)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn alive_count(&self) -> usize {
        self.birds.iter().filter(|b| !b.dead).count()
    }

    pub fn population_stats(&self) -> PopulationStats {
        PopulationStats {
            population_size: self.birds.len(),
            alive_count: self.alive_count(),
            epoch: self.epoch,
            leader_x: self.leader_x(),
            best_fitness_ever: self.best_fitness_ever,
        }
    }
}
