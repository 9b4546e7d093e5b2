use anyhow::{anyhow, Context};
use clap::Parser;
use serde::Deserialize;

use crate::common::Coordinate;

#[derive(Parser, Debug)]
#[command(
    name = "trailfinder",
    about = "Lowest-cost routes across a forest grid of open ground, walls, water and fallen trees.",
    version = "0.1"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Path to the map file; the built-in 5x5 forest is used otherwise")]
    pub map_path: Option<String>,

    #[arg(long, help = "Rows of a randomly generated map")]
    pub random_height: Option<usize>,

    #[arg(long, help = "Columns of a randomly generated map")]
    pub random_width: Option<usize>,

    #[arg(long, help = "Share of obstacle cells in a randomly generated map")]
    pub obstacle_ratio: Option<f64>,

    #[arg(long, help = "Start cell as X,Y", value_delimiter = ',')]
    pub start: Option<Vec<usize>>,

    #[arg(long, help = "Goal cell as X,Y", value_delimiter = ',')]
    pub goal: Option<Vec<usize>>,

    #[arg(long, help = "Path to a YAML scenario with a batch of queries")]
    pub scenario_path: Option<String>,

    #[arg(long, help = "Number of random queries to run")]
    pub random_queries: Option<usize>,

    #[arg(long, help = "Save the randomly generated queries as a YAML scenario")]
    pub scenario_out: Option<String>,

    #[arg(long, help = "Seed for the random number generator")]
    pub seed: Option<u64>,

    #[arg(long, help = "Write search results as JSON to this file")]
    pub output_path: Option<String>,

    #[arg(long, help = "Give up a search after this many node expansions")]
    pub max_expansions: Option<usize>,

    #[arg(
        long,
        help = "Run the interactive route/obstacle loop",
        default_value_t = false
    )]
    pub interactive: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RandomMapConfig {
    pub height: usize,
    pub width: usize,
    #[serde(default = "default_obstacle_ratio")]
    pub obstacle_ratio: f64,
}

fn default_obstacle_ratio() -> f64 {
    0.2
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub map_path: Option<String>,
    pub random_map: Option<RandomMapConfig>,
    pub start: Option<[usize; 2]>,
    pub goal: Option<[usize; 2]>,
    pub scenario_path: Option<String>,
    pub random_queries: usize,
    pub scenario_out: Option<String>,
    pub seed: u64,
    pub output_path: Option<String>,
    pub max_expansions: Option<usize>,
    pub interactive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Interactive,
    Single { start: Coordinate, goal: Coordinate },
    Batch,
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if let Some(map_path) = &cli.map_path {
            self.map_path = Some(map_path.clone());
        }

        if cli.random_height.is_some() || cli.random_width.is_some() || cli.obstacle_ratio.is_some() {
            let base = self.random_map.take();
            let height = cli
                .random_height
                .or(base.as_ref().map(|random| random.height))
                .ok_or_else(|| anyhow!("--random-height is required for a random map"))?;
            let width = cli
                .random_width
                .or(base.as_ref().map(|random| random.width))
                .ok_or_else(|| anyhow!("--random-width is required for a random map"))?;
            let obstacle_ratio = cli
                .obstacle_ratio
                .or(base.as_ref().map(|random| random.obstacle_ratio))
                .unwrap_or_else(default_obstacle_ratio);
            self.random_map = Some(RandomMapConfig {
                height,
                width,
                obstacle_ratio,
            });
        }

        if let Some(start) = &cli.start {
            self.start = Some(parse_pair(start).context("invalid --start")?);
        }
        if let Some(goal) = &cli.goal {
            self.goal = Some(parse_pair(goal).context("invalid --goal")?);
        }
        if let Some(scenario_path) = &cli.scenario_path {
            self.scenario_path = Some(scenario_path.clone());
        }
        if let Some(random_queries) = cli.random_queries {
            self.random_queries = random_queries;
        }
        if let Some(scenario_out) = &cli.scenario_out {
            self.scenario_out = Some(scenario_out.clone());
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if let Some(output_path) = &cli.output_path {
            self.output_path = Some(output_path.clone());
        }
        if let Some(max_expansions) = cli.max_expansions {
            self.max_expansions = Some(max_expansions);
        }
        self.interactive |= cli.interactive;

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.map_path.is_some() && self.random_map.is_some() {
            return Err(anyhow!("map_path and random_map are mutually exclusive"));
        }

        if let Some(random) = &self.random_map {
            if random.height == 0 || random.width == 0 {
                return Err(anyhow!(
                    "Random map needs at least one row and one column, got {}x{}",
                    random.height,
                    random.width
                ));
            }
            if !(0.0..=1.0).contains(&random.obstacle_ratio) {
                return Err(anyhow!(
                    "Obstacle ratio must be within [0, 1], got {}",
                    random.obstacle_ratio
                ));
            }
        }

        if self.start.is_some() != self.goal.is_some() {
            return Err(anyhow!("start and goal must be given together"));
        }

        if self.max_expansions == Some(0) {
            return Err(anyhow!("max_expansions must be at least 1"));
        }

        let single = self.start.is_some();
        let batch = self.scenario_path.is_some() || self.random_queries > 0;
        let modes = [self.interactive, single, batch]
            .into_iter()
            .filter(|&on| on)
            .count();
        if modes > 1 {
            return Err(anyhow!(
                "choose one of interactive mode, a single start/goal query or a batch scenario"
            ));
        }
        if self.scenario_path.is_some() && self.random_queries > 0 {
            return Err(anyhow!("scenario_path and random_queries are mutually exclusive"));
        }
        if self.scenario_out.is_some() && self.random_queries == 0 {
            return Err(anyhow!("scenario_out only applies to random_queries"));
        }

        Ok(())
    }

    pub fn mode(&self) -> Mode {
        match (self.start, self.goal) {
            (Some(start), Some(goal)) => Mode::Single {
                start: (start[0], start[1]),
                goal: (goal[0], goal[1]),
            },
            _ if self.scenario_path.is_some() || self.random_queries > 0 => Mode::Batch,
            _ => Mode::Interactive,
        }
    }
}

fn parse_pair(values: &[usize]) -> anyhow::Result<[usize; 2]> {
    match values {
        &[x, y] => Ok([x, y]),
        _ => Err(anyhow!("expected X,Y, got {} values", values.len())),
    }
}
