use anyhow::{anyhow, Context, Result};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, Write};
use tracing::{info, warn};

use crate::algorithm::PathFinder;
use crate::common::{Coordinate, Path};
use crate::map::Map;
use crate::stat::Stats;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    pub start: [usize; 2],
    pub goal: [usize; 2],
}

impl Query {
    pub fn start(&self) -> Coordinate {
        (self.start[0], self.start[1])
    }

    pub fn goal(&self) -> Coordinate {
        (self.goal[0], self.goal[1])
    }
}

/// A batch of start/goal queries run against one map.
///
/// ```yaml
/// queries:
///   - start: [0, 0]
///     goal: [0, 4]
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Scenario {
    pub queries: Vec<Query>,
}

#[derive(Debug, Serialize, Clone)]
pub struct QueryResult {
    pub query: Query,
    pub found: bool,
    pub cost: Option<usize>,
    pub path: Path,
    pub error: Option<String>,
    pub stats: Stats,
}

impl Scenario {
    pub fn load_from_file(path: &str) -> Result<Scenario> {
        let file = File::open(path).with_context(|| format!("failed to open scenario {path}"))?;
        let reader = BufReader::new(file);
        let scenario = serde_yaml::from_reader(reader)
            .with_context(|| format!("failed to parse scenario {path}"))?;
        Ok(scenario)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Scenario> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Draws `num_queries` queries whose endpoints are passable cells of `map`.
    pub fn random<R: Rng + ?Sized>(map: &Map, num_queries: usize, rng: &mut R) -> Result<Scenario> {
        let passable: Vec<Coordinate> = (0..map.height)
            .flat_map(|x| (0..map.width).map(move |y| (x, y)))
            .filter(|&position| map.is_passable(position))
            .collect();

        if passable.is_empty() && num_queries > 0 {
            return Err(anyhow!("map has no passable cell to place queries on"));
        }

        let mut queries = Vec::with_capacity(num_queries);
        for _ in 0..num_queries {
            let start = passable
                .choose(rng)
                .ok_or_else(|| anyhow!("failed to choose a random start"))?;
            let goal = passable
                .choose(rng)
                .ok_or_else(|| anyhow!("failed to choose a random goal"))?;
            queries.push(Query {
                start: [start.0, start.1],
                goal: [goal.0, goal.1],
            });
        }

        info!("Generate scen: {queries:?}");
        Ok(Scenario { queries })
    }

    /// Runs every query in order. A failing query is recorded in its result and does
    /// not stop the batch.
    pub fn run(&self, map: &Map, finder: &PathFinder) -> Vec<QueryResult> {
        self.queries
            .iter()
            .map(|query| match finder.search(map, query.start(), query.goal()) {
                Ok(outcome) => {
                    outcome.stats.print();
                    QueryResult {
                        query: *query,
                        found: outcome.is_found(),
                        cost: outcome.is_found().then_some(outcome.cost),
                        path: outcome.path,
                        error: None,
                        stats: outcome.stats,
                    }
                }
                Err(err) => {
                    warn!("query {query:?} failed: {err}");
                    QueryResult {
                        query: *query,
                        found: false,
                        cost: None,
                        path: Vec::new(),
                        error: Some(err.to_string()),
                        stats: Stats::default(),
                    }
                }
            })
            .collect()
    }

    /// Saves the queries in the format [`Scenario::load_from_file`] reads, so a random
    /// batch can be replayed.
    pub fn write_to_yaml(&self, path: &str) -> Result<()> {
        let file = File::create(path).with_context(|| format!("failed to create {path}"))?;
        let mut writer = io::BufWriter::new(file);
        let yaml_data = serde_yaml::to_string(self)?;
        writer.write_all(yaml_data.as_bytes())?;

        Ok(())
    }
}

pub fn write_results_json(path: &str, results: &[QueryResult]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {path}"))?;
    let mut writer = io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, results)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    Ok(())
}
