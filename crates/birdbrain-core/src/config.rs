use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Width of the network input layer: one sensed value per tick,
/// the vertical offset from the bird to the next gap.
pub const SENSE_WIDTH: usize = 1;
/// Width of the network output layer: one scalar, interpreted as
/// "jump if > 0".
pub const DECISION_WIDTH: usize = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimConfig {
    /// Deterministic seed for reproducible runs.
    pub seed: u64,
    /// Width of the drawing surface in world units (pixels).
    pub canvas_width: f64,
    /// Height of the drawing surface in world units (pixels).
    pub canvas_height: f64,
    /// Y coordinate of the ground line. Birds die at `y + bird_size >= ground_y`.
    pub ground_y: f64,
    /// Downward acceleration added to vertical velocity each non-jump tick.
    pub gravity: f64,
    /// Constant horizontal speed, uniform across all birds.
    pub speed: f64,
    /// Side length of a bird's square bounding box.
    pub bird_size: f64,
    /// Vertical velocity set (not added) on a jump tick. Negative is up.
    pub jump_impulse: f64,
    /// Horizontal screen position the camera pins the leading bird to.
    pub camera_x: f64,
    /// Number of walls kept alive in the scrolling field.
    pub wall_count: usize,
    /// Minimum solid wall height above and below the gap.
    pub min_wall_height: f64,
    /// Vertical extent of the passable gap in each wall.
    pub gap_height: f64,
    /// Horizontal thickness of each wall.
    pub wall_width: f64,
    /// X coordinate of the first wall at the start of an epoch.
    pub wall_start_x: f64,
    /// Horizontal distance between consecutive walls.
    pub wall_spacing: f64,
    /// Target population size, held constant across epochs.
    pub population_size: usize,
    /// Number of fittest birds retained at each epoch boundary.
    pub keep_count: usize,
    /// Mutated network clones produced per retained bird.
    pub clones_per_survivor: usize,
    /// Network layer widths. First must equal `SENSE_WIDTH`, last `DECISION_WIDTH`.
    pub layer_sizes: Vec<usize>,
    /// Half-width of the uniform perturbation applied per weight/bias on mutation.
    pub mutation_range: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            canvas_width: 800.0,
            canvas_height: 800.0,
            ground_y: 700.0,
            gravity: 0.05,
            speed: 1.0,
            bird_size: 30.0,
            jump_impulse: -3.0,
            camera_x: 300.0,
            wall_count: 3,
            min_wall_height: 30.0,
            gap_height: 200.0,
            wall_width: 200.0,
            wall_start_x: 500.0,
            wall_spacing: 400.0,
            population_size: 1000,
            keep_count: 20,
            clones_per_survivor: 30,
            layer_sizes: vec![1, 5, 5, 5, 1],
            mutation_range: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimConfigError {
    EmptyPopulation,
    KeepCountZero,
    KeepCountExceedsPopulation { keep: usize, population: usize },
    TooFewLayers { actual: usize },
    ZeroWidthLayer { index: usize },
    InputLayerWidthMismatch { expected: usize, actual: usize },
    OutputLayerWidthMismatch { expected: usize, actual: usize },
    NoWalls,
    GapBandEmpty,
    NonPositiveWallWidth,
    WallSpacingTooSmall { spacing: f64, width: f64 },
    NonPositiveBirdSize,
    NonPositiveSpeed,
    NegativeGravity,
    NegativeMutationRange,
    GroundBelowCanvas { ground_y: f64, canvas_height: f64 },
}

impl fmt::Display for SimConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimConfigError::EmptyPopulation => write!(f, "population_size must be at least 1"),
            SimConfigError::KeepCountZero => write!(f, "keep_count must be at least 1"),
            SimConfigError::KeepCountExceedsPopulation { keep, population } => write!(
                f,
                "keep_count ({keep}) must not exceed population_size ({population})"
            ),
            SimConfigError::TooFewLayers { actual } => {
                write!(f, "layer_sizes needs at least 2 layers, got {actual}")
            }
            SimConfigError::ZeroWidthLayer { index } => {
                write!(f, "layer_sizes[{index}] must be at least 1")
            }
            SimConfigError::InputLayerWidthMismatch { expected, actual } => write!(
                f,
                "input layer width ({actual}) must match the number of sensed values ({expected})"
            ),
            SimConfigError::OutputLayerWidthMismatch { expected, actual } => write!(
                f,
                "output layer width ({actual}) must match the decision width ({expected})"
            ),
            SimConfigError::NoWalls => write!(f, "wall_count must be at least 1"),
            SimConfigError::GapBandEmpty => write!(
                f,
                "2 * min_wall_height + gap_height must be less than ground_y"
            ),
            SimConfigError::NonPositiveWallWidth => write!(f, "wall_width must be positive"),
            SimConfigError::WallSpacingTooSmall { spacing, width } => write!(
                f,
                "wall_spacing ({spacing}) must exceed wall_width ({width})"
            ),
            SimConfigError::NonPositiveBirdSize => write!(f, "bird_size must be positive"),
            SimConfigError::NonPositiveSpeed => write!(f, "speed must be positive"),
            SimConfigError::NegativeGravity => write!(f, "gravity must not be negative"),
            SimConfigError::NegativeMutationRange => {
                write!(f, "mutation_range must not be negative")
            }
            SimConfigError::GroundBelowCanvas {
                ground_y,
                canvas_height,
            } => write!(
                f,
                "ground_y ({ground_y}) must lie within the canvas (height {canvas_height})"
            ),
        }
    }
}

impl Error for SimConfigError {}

impl SimConfig {
    /// Fail-fast startup validation. Everything downstream assumes a
    /// validated config, so simulation code can use plain indexing and
    /// asserts instead of re-checking.
    pub fn validate(&self) -> Result<(), SimConfigError> {
        if self.population_size == 0 {
            return Err(SimConfigError::EmptyPopulation);
        }
        if self.keep_count == 0 {
            return Err(SimConfigError::KeepCountZero);
        }
        if self.keep_count > self.population_size {
            return Err(SimConfigError::KeepCountExceedsPopulation {
                keep: self.keep_count,
                population: self.population_size,
            });
        }
        if self.layer_sizes.len() < 2 {
            return Err(SimConfigError::TooFewLayers {
                actual: self.layer_sizes.len(),
            });
        }
        if let Some(index) = self.layer_sizes.iter().position(|&w| w == 0) {
            return Err(SimConfigError::ZeroWidthLayer { index });
        }
        if self.layer_sizes[0] != SENSE_WIDTH {
            return Err(SimConfigError::InputLayerWidthMismatch {
                expected: SENSE_WIDTH,
                actual: self.layer_sizes[0],
            });
        }
        let last = *self.layer_sizes.last().expect("checked non-empty above");
        if last != DECISION_WIDTH {
            return Err(SimConfigError::OutputLayerWidthMismatch {
                expected: DECISION_WIDTH,
                actual: last,
            });
        }
        if self.wall_count == 0 {
            return Err(SimConfigError::NoWalls);
        }
        if !(2.0 * self.min_wall_height + self.gap_height < self.ground_y)
            || self.min_wall_height < 0.0
        {
            return Err(SimConfigError::GapBandEmpty);
        }
        if self.wall_width <= 0.0 {
            return Err(SimConfigError::NonPositiveWallWidth);
        }
        if self.wall_spacing <= self.wall_width {
            return Err(SimConfigError::WallSpacingTooSmall {
                spacing: self.wall_spacing,
                width: self.wall_width,
            });
        }
        if self.bird_size <= 0.0 {
            return Err(SimConfigError::NonPositiveBirdSize);
        }
        if self.speed <= 0.0 {
            return Err(SimConfigError::NonPositiveSpeed);
        }
        if self.gravity < 0.0 {
            return Err(SimConfigError::NegativeGravity);
        }
        if self.mutation_range < 0.0 {
            return Err(SimConfigError::NegativeMutationRange);
        }
        if self.ground_y >= self.canvas_height {
            return Err(SimConfigError::GroundBelowCanvas {
                ground_y: self.ground_y,
                canvas_height: self.canvas_height,
            });
        }
        Ok(())
    }

    /// Exclusive upper bound of the random `gap_top` band.
    pub fn gap_top_max(&self) -> f64 {
        self.ground_y - self.gap_height - self.min_wall_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_input_layer_width_mismatch() {
        let config = SimConfig {
            layer_sizes: vec![2, 5, 1],
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SimConfigError::InputLayerWidthMismatch {
                expected: SENSE_WIDTH,
                actual: 2
            })
        );
    }

    #[test]
    fn rejects_keep_count_above_population() {
        let config = SimConfig {
            population_size: 5,
            keep_count: 6,
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SimConfigError::KeepCountExceedsPopulation {
                keep: 6,
                population: 5
            })
        );
    }

    #[test]
    fn rejects_gap_band_that_does_not_fit() {
        let config = SimConfig {
            ground_y: 250.0,
            canvas_height: 300.0,
            gap_height: 200.0,
            min_wall_height: 30.0,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(SimConfigError::GapBandEmpty));
    }

    #[test]
    fn rejects_zero_width_layer() {
        let config = SimConfig {
            layer_sizes: vec![1, 0, 1],
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SimConfigError::ZeroWidthLayer { index: 1 })
        );
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = SimConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: SimConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.population_size, config.population_size);
        assert_eq!(back.layer_sizes, config.layer_sizes);
        assert_eq!(back.validate(), Ok(()));
    }
}
