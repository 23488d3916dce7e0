use super::metrics::EpochSummary;
use super::World;
use crate::agent::Bird;
use crate::course::Course;
use rayon::prelude::*;

/// Per-tick external input. `jump_override` substitutes the key-driven
/// jump decision for every live bird (the human-controlled variant, meant
/// for a population of one); `None` lets each bird's network decide.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickInput {
    pub jump_override: Option<bool>,
}

impl TickInput {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn human(jump: bool) -> Self {
        Self {
            jump_override: Some(jump),
        }
    }
}

/// What one tick did, for callers that drive rendering or training.
#[derive(Clone, Debug)]
pub struct StepReport {
    pub step: usize,
    pub alive_count: usize,
    pub leader_x: f64,
    /// Present on the tick that ended a generation.
    pub epoch_ended: Option<EpochSummary>,
}

impl World {
    /// Advance the simulation one tick: decide, move, collide, recycle
    /// walls, and run the generation turnover once the whole population
    /// is dead. One call runs to completion before the next; there is no
    /// other mutation path.
    pub fn step(&mut self, input: TickInput) -> StepReport {
        self.step_index = self.step_index.saturating_add(1);
        self.epoch_steps = self.epoch_steps.saturating_add(1);

        let jumps = self.step_decision_phase(input);
        self.step_physics_phase(&jumps);
        self.step_course_phase();

        let alive_count = self.alive_count();
        let epoch_ended = if alive_count == 0 {
            Some(self.advance_epoch())
        } else {
            None
        };

        StepReport {
            step: self.step_index,
            alive_count,
            leader_x: self.leader_x(),
            epoch_ended,
        }
    }

    /// Every live bird senses the vertical offset to its next gap and asks
    /// its network for a jump decision (`output > 0` means jump), unless an
    /// override is supplied. Networks are independent, so this runs across
    /// the population in parallel.
    fn step_decision_phase(&mut self, input: TickInput) -> Vec<bool> {
        if let Some(jump) = input.jump_override {
            return self.birds.iter().map(|b| !b.dead && jump).collect();
        }
        let course = &self.course;
        let wall_width = self.config.wall_width;
        self.birds
            .par_iter_mut()
            .map(|bird| {
                if bird.dead {
                    return false;
                }
                let wall = course.next_wall(bird.x, wall_width);
                let offset = (wall.gap_top - bird.y) as f32;
                bird.network.evaluate(&[offset])[0] > 0.0
            })
            .collect()
    }

    /// Gravity or jump impulse, then position update, then collision.
    /// Dead birds never move again.
    fn step_physics_phase(&mut self, jumps: &[bool]) {
        let course = &self.course;
        let config = &self.config;
        for (bird, &jump) in self.birds.iter_mut().zip(jumps) {
            if bird.dead {
                continue;
            }
            if jump {
                bird.y_velocity = config.jump_impulse;
            } else {
                bird.y_velocity += config.gravity;
            }
            bird.y += bird.y_velocity;
            bird.x += config.speed;

            if bird.y + config.bird_size >= config.ground_y
                || course.collides(bird.x, bird.y, config)
            {
                bird.dead = true;
            }
        }
    }

    /// Recycle walls relative to the leading bird, once per tick.
    fn step_course_phase(&mut self) {
        let leader_x = self.leader_x();
        self.course.recycle(leader_x, &self.config, &mut self.rng);
    }

    /// Generation turnover: sort by fitness, keep the best, reset them,
    /// refill with mutated clones, pad with fresh birds, rebuild the
    /// course. Population size is invariant across this boundary.
    fn advance_epoch(&mut self) -> EpochSummary {
        self.birds.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));

        let summary = self.epoch_summary_from_sorted();
        self.best_fitness_ever = self.best_fitness_ever.max(summary.best_fitness);

        let target = self.config.population_size;
        self.birds.truncate(self.config.keep_count);
        for bird in &mut self.birds {
            bird.reset();
        }

        let survivor_count = self.birds.len();
        for i in 0..survivor_count {
            for _ in 0..self.config.clones_per_survivor {
                let mut network = self.birds[i].network.clone();
                network.mutate(self.config.mutation_range, &mut self.rng);
                self.birds.push(Bird::new(network));
            }
        }

        // On overshoot, drop oldest-added first; otherwise pad with fresh
        // randomized birds up to the target.
        if self.birds.len() > target {
            let excess = self.birds.len() - target;
            self.birds.drain(..excess);
        }
        while self.birds.len() < target {
            self.birds
                .push(Bird::random(&self.config.layer_sizes, &mut self.rng));
        }

        self.course = Course::generate(&self.config, &mut self.rng);
        self.epoch = self.epoch.saturating_add(1);
        self.epoch_steps = 0;
        summary
    }

    /// Summary of the generation that just ended. Requires `birds` sorted
    /// descending by fitness.
    fn epoch_summary_from_sorted(&self) -> EpochSummary {
        let best_fitness = self.birds[0].fitness();
        let mean_fitness =
            self.birds.iter().map(|b| b.fitness()).sum::<f64>() / self.birds.len() as f64;
        let fitness_std = if self.birds.len() < 2 {
            0.0
        } else {
            let var = self
                .birds
                .iter()
                .map(|b| (b.fitness() - mean_fitness).powi(2))
                .sum::<f64>()
                / (self.birds.len() - 1) as f64;
            var.sqrt()
        };
        EpochSummary {
            epoch: self.epoch,
            steps: self.epoch_steps,
            best_fitness,
            mean_fitness,
            fitness_std,
        }
    }

    /// Kill every remaining bird where it stands. Used by the evolution
    /// driver to cut off a runaway generation.
    pub(crate) fn kill_remaining(&mut self) {
        for bird in &mut self.birds {
            bird.dead = true;
        }
    }
}
