use trailfinder::algorithm::PathFinder;
use trailfinder::config::{Cli, Config, Mode};
use trailfinder::interactive::run_interactive;
use trailfinder::map::Map;
use trailfinder::render::render;
use trailfinder::scenario::{write_results_json, Scenario};

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)
            .with_context(|| format!("cannot read config file: {config_file}"))?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        info!("No config file specified, using default config");
        Config::default()
    }
    .override_from_command_line(&cli)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut map = if let Some(map_path) = &config.map_path {
        Map::from_file(map_path)?
    } else if let Some(random) = &config.random_map {
        Map::random(random.height, random.width, random.obstacle_ratio, &mut rng)?
    } else {
        Map::default_forest()
    };
    info!("map {}x{}", map.height, map.width);

    let finder = match config.max_expansions {
        Some(limit) => PathFinder::with_max_expansions(limit),
        None => PathFinder::new(),
    };

    match config.mode() {
        Mode::Interactive => {
            let stdin = io::stdin();
            run_interactive(&mut map, &finder, stdin.lock(), io::stdout())?;
        }
        Mode::Single { start, goal } => {
            let outcome = finder.search(&map, start, goal)?;
            outcome.stats.print();
            if outcome.is_found() {
                println!("Route found (cost {}):", outcome.cost);
                print!("{}", render(&map, Some(&outcome.path)));
            } else {
                println!("No valid route found.");
            }
            if let Some(output_path) = &config.output_path {
                serde_json::to_writer_pretty(
                    std::fs::File::create(output_path)
                        .with_context(|| format!("failed to create {output_path}"))?,
                    &outcome,
                )?;
            }
        }
        Mode::Batch => {
            let scenario = match &config.scenario_path {
                Some(path) => Scenario::load_from_file(path)?,
                None => {
                    let scenario = Scenario::random(&map, config.random_queries, &mut rng)?;
                    if let Some(scenario_out) = &config.scenario_out {
                        scenario.write_to_yaml(scenario_out)?;
                        info!("saved random queries to {scenario_out}");
                    }
                    scenario
                }
            };
            let results = scenario.run(&map, &finder);
            let found = results.iter().filter(|result| result.found).count();
            info!("{found}/{} queries found a route", results.len());
            if found < results.len() {
                warn!("{} queries without a route", results.len() - found);
            }
            if let Some(output_path) = &config.output_path {
                write_results_json(output_path, &results)?;
            }
        }
    }

    Ok(())
}
