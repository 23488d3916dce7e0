use super::lifecycle::TickInput;
use super::World;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// One finished generation.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct EpochSummary {
    pub epoch: u32,
    /// Ticks the generation lasted.
    pub steps: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub fitness_std: f64,
}

fn default_schema_version() -> u32 {
    1
}

/// Whole-run record produced by `run_evolution`, stable enough to persist
/// as JSON and compare across runs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub epochs: usize,
    pub total_steps: usize,
    pub best_fitness: f64,
    /// Generations cut off by the per-epoch step cap.
    #[serde(default)]
    pub capped_epochs: usize,
    pub epoch_summaries: Vec<EpochSummary>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct PopulationStats {
    pub population_size: usize,
    pub alive_count: usize,
    pub epoch: u32,
    pub leader_x: f64,
    pub best_fitness_ever: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvolutionError {
    ZeroEpochs,
    TooManyEpochs { max: usize, actual: usize },
}

impl fmt::Display for EvolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvolutionError::ZeroEpochs => write!(f, "epochs must be positive"),
            EvolutionError::TooManyEpochs { max, actual } => {
                write!(f, "epochs ({actual}) exceed supported maximum ({max})")
            }
        }
    }
}

impl Error for EvolutionError {}

impl World {
    pub const MAX_EPOCHS: usize = 10_000;
    /// A generation that outlives this many ticks is forcibly ended: the
    /// original loops forever once a bird stops dying, which a headless
    /// trainer cannot afford.
    pub const MAX_EPOCH_STEPS: usize = 1_000_000;

    pub fn run_evolution(&mut self, epochs: usize) -> RunSummary {
        self.try_run_evolution(epochs)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Step the world with no external input until `epochs` generations
    /// have completed, collecting one summary per generation.
    pub fn try_run_evolution(&mut self, epochs: usize) -> Result<RunSummary, EvolutionError> {
        if epochs == 0 {
            return Err(EvolutionError::ZeroEpochs);
        }
        if epochs > Self::MAX_EPOCHS {
            return Err(EvolutionError::TooManyEpochs {
                max: Self::MAX_EPOCHS,
                actual: epochs,
            });
        }

        let mut epoch_summaries = Vec::with_capacity(epochs);
        let mut total_steps = 0usize;
        let mut capped_epochs = 0usize;
        let mut best_fitness = 0.0f64;

        while epoch_summaries.len() < epochs {
            if self.epoch_steps >= Self::MAX_EPOCH_STEPS {
                self.kill_remaining();
                capped_epochs += 1;
            }
            let report = self.step(TickInput::none());
            total_steps += 1;
            if let Some(summary) = report.epoch_ended {
                best_fitness = best_fitness.max(summary.best_fitness);
                epoch_summaries.push(summary);
            }
        }

        Ok(RunSummary {
            schema_version: 1,
            epochs,
            total_steps,
            best_fitness,
            capped_epochs,
            epoch_summaries,
        })
    }
}
