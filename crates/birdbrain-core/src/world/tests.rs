use super::*;
use crate::config::SimConfig;
use crate::nn::{Network, Neuron};

/// [1, 1] network whose output is the constant `bias`, so the jump
/// decision (`output > 0`) is fixed regardless of what the bird senses.
fn constant_net(bias: f32) -> Network {
    Network {
        layers: vec![
            vec![Neuron::input()],
            vec![Neuron {
                weights: vec![0.0],
                bias,
                value: 0.0,
                is_input: false,
            }],
        ],
    }
}

fn small_config(population_size: usize, keep_count: usize, clones: usize) -> SimConfig {
    SimConfig {
        population_size,
        keep_count,
        clones_per_survivor: clones,
        layer_sizes: vec![1, 3, 1],
        ..SimConfig::default()
    }
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let config = SimConfig {
        population_size: 0,
        ..SimConfig::default()
    };
    assert!(matches!(
        World::try_new(config),
        Err(WorldInitError::Config(_))
    ));
}

#[test]
fn population_size_is_invariant_across_epochs() {
    let mut world = World::new(small_config(10, 3, 2));
    for _ in 0..3 {
        world.kill_remaining();
        let report = world.step(TickInput::none());
        assert!(report.epoch_ended.is_some());
        assert_eq!(world.birds.len(), 10);
        assert_eq!(world.alive_count(), 10);
    }
    assert_eq!(world.epoch(), 3);
}

#[test]
fn one_survivor_one_clone_pads_to_three() {
    // 1 retained + 1 mutated clone + 1 fresh bird = target of 3.
    let mut world = World::new(small_config(3, 1, 1));
    world.birds[0].x = 10.0;
    world.birds[1].x = 30.0;
    world.birds[2].x = 20.0;
    world.kill_remaining();

    let report = world.step(TickInput::none());
    let summary = report.epoch_ended.expect("all birds dead ends the epoch");
    assert_eq!(world.birds.len(), 3);
    assert_eq!(summary.best_fitness, 30.0);
    assert_eq!(summary.mean_fitness, 20.0);
    assert!(world.birds.iter().all(|b| !b.dead && b.x == 0.0 && b.y == 0.0));
}

#[test]
fn overshoot_drops_oldest_added_first() {
    // 2 survivors + 4 clones overshoot a target of 3; the 3 oldest-added
    // (both survivors and the first clone) are dropped.
    let mut world = World::new(small_config(3, 2, 2));
    world.kill_remaining();
    world.step(TickInput::none());
    assert_eq!(world.birds.len(), 3);
}

#[test]
fn survivors_keep_their_networks_through_the_boundary() {
    let mut world = World::new(small_config(2, 2, 0));
    world.birds[0].network = constant_net(7.0);
    world.birds[0].x = 100.0;
    world.birds[1].x = 1.0;
    world.kill_remaining();

    world.step(TickInput::none());
    // Sorted descending by fitness, so the marked network leads.
    assert_eq!(world.birds[0].network, constant_net(7.0));
}

#[test]
fn epoch_boundary_rebuilds_the_course() {
    let mut world = World::new(small_config(4, 2, 0));
    let wall_start_x = world.config().wall_start_x;
    let wall_count = world.config().wall_count;
    world.kill_remaining();
    world.step(TickInput::none());

    assert_eq!(world.course().walls.len(), wall_count);
    assert_eq!(world.course().walls[0].x, wall_start_x);
}

#[test]
fn falling_bird_dies_on_the_ground_and_freezes() {
    let mut world = World::new(small_config(2, 1, 0));
    world.birds[0].network = constant_net(-1.0); // never jumps
    world.birds[0].y = world.config().ground_y - world.config().bird_size;
    world.birds[1].network = constant_net(1.0); // always jumps, stays alive

    world.step(TickInput::none());
    assert!(world.birds[0].dead);
    assert!(world.birds[0].y + world.config().bird_size >= world.config().ground_y);

    let (x, y) = (world.birds[0].x, world.birds[0].y);
    for _ in 0..10 {
        let report = world.step(TickInput::none());
        assert_eq!(report.alive_count, 1);
    }
    assert_eq!((world.birds[0].x, world.birds[0].y), (x, y));
}

#[test]
fn jump_sets_velocity_instead_of_adding_to_it() {
    let mut world = World::new(small_config(1, 1, 0));
    world.birds[0].y_velocity = 5.0;
    world.step(TickInput::human(true));
    assert_eq!(world.birds[0].y_velocity, world.config().jump_impulse);
    assert_eq!(world.birds[0].y, world.config().jump_impulse);

    let gravity = world.config().gravity;
    world.step(TickInput::human(false));
    assert_eq!(
        world.birds[0].y_velocity,
        world.config().jump_impulse + gravity
    );
}

#[test]
fn birds_advance_at_uniform_horizontal_speed() {
    let mut world = World::new(small_config(3, 1, 0));
    for bird in &mut world.birds {
        bird.network = constant_net(1.0);
    }
    for _ in 0..5 {
        world.step(TickInput::none());
    }
    for bird in &world.birds {
        assert_eq!(bird.x, 5.0 * world.config().speed);
    }
}

#[test]
fn flying_into_a_wall_above_the_gap_kills() {
    let mut world = World::new(small_config(1, 1, 0));
    // Always jumping drives the bird far above every gap; it dies in the
    // first wall's horizontal span. The tick that kills the last bird
    // also turns the epoch over, so the death position is read from the
    // epoch summary.
    world.birds[0].network = constant_net(1.0);
    let wall_x = world.course().walls[0].x;
    let size = world.config().bird_size;

    let mut death_x = None;
    for _ in 0..10_000 {
        if let Some(summary) = world.step(TickInput::none()).epoch_ended {
            death_x = Some(summary.best_fitness);
            break;
        }
    }
    let death_x = death_x.expect("bird should have hit the first wall");
    assert!(death_x + size >= wall_x);
    assert!(death_x <= wall_x + world.config().wall_width);
}

#[test]
fn identical_seeds_give_identical_runs() {
    let config = small_config(30, 5, 3);
    let mut a = World::new(config.clone());
    let mut b = World::new(config);
    for _ in 0..500 {
        a.step(TickInput::none());
        b.step(TickInput::none());
    }
    assert_eq!(a.step_index(), b.step_index());
    assert_eq!(a.epoch(), b.epoch());
    for (ba, bb) in a.birds.iter().zip(&b.birds) {
        assert_eq!((ba.x, ba.y, ba.dead), (bb.x, bb.y, bb.dead));
    }
    assert_eq!(a.course().walls, b.course().walls);
}

/// A course nearly as tall as the bird, so no generation survives long and
/// evolution-driver tests finish quickly.
fn harsh_config(population_size: usize, keep_count: usize, clones: usize) -> SimConfig {
    SimConfig {
        gap_height: 40.0,
        ..small_config(population_size, keep_count, clones)
    }
}

#[test]
fn run_evolution_collects_one_summary_per_epoch() {
    let mut world = World::new(harsh_config(20, 4, 2));
    let summary = world.run_evolution(3);
    assert_eq!(summary.schema_version, 1);
    assert_eq!(summary.epochs, 3);
    assert_eq!(summary.epoch_summaries.len(), 3);
    assert!(summary.total_steps > 0);
    for (i, epoch) in summary.epoch_summaries.iter().enumerate() {
        assert_eq!(epoch.epoch, i as u32);
        assert!(epoch.best_fitness >= epoch.mean_fitness);
    }
    assert_eq!(summary.best_fitness, world.population_stats().best_fitness_ever);
}

#[test]
fn run_evolution_rejects_bad_epoch_counts() {
    let mut world = World::new(small_config(5, 1, 1));
    assert_eq!(
        world.try_run_evolution(0).unwrap_err(),
        EvolutionError::ZeroEpochs
    );
    assert_eq!(
        world.try_run_evolution(World::MAX_EPOCHS + 1).unwrap_err(),
        EvolutionError::TooManyEpochs {
            max: World::MAX_EPOCHS,
            actual: World::MAX_EPOCHS + 1,
        }
    );
}

#[test]
fn run_summary_round_trips_through_json() {
    let mut world = World::new(harsh_config(10, 2, 1));
    let summary = world.run_evolution(2);
    let json = serde_json::to_string(&summary).unwrap();
    let back: RunSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(back.epochs, summary.epochs);
    assert_eq!(back.epoch_summaries.len(), summary.epoch_summaries.len());
    assert_eq!(back.best_fitness, summary.best_fitness);
}
