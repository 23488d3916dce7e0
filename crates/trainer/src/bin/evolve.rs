use anyhow::{Context, Result};
use birdbrain_core::config::SimConfig;
use birdbrain_core::world::{RunSummary, World};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

/// Headless neuroevolution run: evolve a population of birds for a number
/// of generations and emit a JSON run summary.
#[derive(Parser, Debug)]
#[command(name = "evolve")]
struct Args {
    /// Generations to evolve.
    #[arg(long, default_value_t = 50)]
    epochs: usize,
    /// RNG seed.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Population size override.
    #[arg(long)]
    population: Option<usize>,
    /// Mutation range override.
    #[arg(long)]
    mutation_range: Option<f32>,
    /// Write the JSON summary here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = SimConfig {
        seed: args.seed,
        ..SimConfig::default()
    };
    if let Some(population) = args.population {
        config.population_size = population;
    }
    if let Some(range) = args.mutation_range {
        config.mutation_range = range;
    }

    let mut world = World::try_new(config.clone()).context("invalid configuration")?;
    eprintln!(
        "Evolving {} birds ({} layers, {} params each) for {} epochs, seed {}",
        config.population_size,
        config.layer_sizes.len(),
        world.birds[0].network.parameter_count(),
        args.epochs,
        config.seed,
    );

    let start = Instant::now();
    let mut summary = RunSummary {
        schema_version: 1,
        epochs: args.epochs,
        total_steps: 0,
        best_fitness: 0.0,
        capped_epochs: 0,
        epoch_summaries: Vec::with_capacity(args.epochs),
    };
    for _ in 0..args.epochs {
        let chunk = world
            .try_run_evolution(1)
            .context("evolution run failed")?;
        summary.total_steps += chunk.total_steps;
        summary.capped_epochs += chunk.capped_epochs;
        summary.best_fitness = summary.best_fitness.max(chunk.best_fitness);
        for epoch in chunk.epoch_summaries {
            eprintln!(
                "epoch {:>4}: {:>7} steps, best {:>8.1}, mean {:>8.1} (std {:.1})",
                epoch.epoch, epoch.steps, epoch.best_fitness, epoch.mean_fitness, epoch.fitness_std,
            );
            summary.epoch_summaries.push(epoch);
        }
    }
    let elapsed = start.elapsed();
    eprintln!(
        "{} epochs / {} steps in {:?} ({:?} per epoch), best fitness {:.1}",
        summary.epochs,
        summary.total_steps,
        elapsed,
        elapsed / summary.epochs.max(1) as u32,
        summary.best_fitness,
    );
    if summary.capped_epochs > 0 {
        eprintln!(
            "{} epoch(s) hit the step cap and were cut off",
            summary.capped_epochs
        );
    }

    let json = serde_json::to_string_pretty(&summary)?;
    match args.out {
        Some(path) => {
            fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?
        }
        None => println!("{json}"),
    }
    Ok(())
}
