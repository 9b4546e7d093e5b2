use super::{construct_path, heuristic, OpenEntry, SearchNode};
use crate::common::{Coordinate, SearchOutcome};
use crate::error::SearchError;
use crate::map::Map;
use crate::stat::Stats;

use std::collections::{BinaryHeap, HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, instrument, trace};

/// Weighted A* over a [`Map`].
///
/// Holds no state between searches; every call owns its frontier, best-cost table and
/// closed set, so one finder can be shared by concurrent searches over the same map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathFinder {
    max_expansions: Option<usize>,
}

impl PathFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop a search with [`SearchError::ExpansionLimitReached`] once `limit` nodes
    /// have been expanded without reaching the goal.
    ///
    /// Popping the goal never counts against the limit, so a limit of 0 still answers
    /// `start == goal` with the single-cell path.
    pub fn with_max_expansions(limit: usize) -> Self {
        PathFinder {
            max_expansions: Some(limit),
        }
    }

    pub fn max_expansions(&self) -> Option<usize> {
        self.max_expansions
    }

    /// Lowest-cost 4-directional path from `start` to `goal`.
    ///
    /// An unreachable goal is not an error: the returned outcome carries an empty path.
    /// Both endpoints must lie inside the map.
    #[instrument(skip_all, name = "a_star", fields(start = format!("{start:?}"), goal = format!("{goal:?}")), level = "debug")]
    pub fn search(
        &self,
        map: &Map,
        start: Coordinate,
        goal: Coordinate,
    ) -> Result<SearchOutcome, SearchError> {
        map.check_bounds(start)?;
        map.check_bounds(goal)?;

        let timer = Instant::now();
        let mut stats = Stats::default();

        if !map.is_passable(start) || !map.is_passable(goal) {
            debug!("start or goal is a wall");
            return Ok(SearchOutcome::unreachable(stats));
        }

        let start_h_cost = heuristic(start, goal);
        let mut nodes = vec![SearchNode {
            position: start,
            g_cost: 0,
            h_cost: start_h_cost,
            parent: None,
        }];
        let mut open_list = BinaryHeap::new();
        open_list.push(OpenEntry {
            f_cost: start_h_cost,
            h_cost: start_h_cost,
            index: 0,
        });
        let mut best_cost = HashMap::from([(start, 0)]);
        let mut closed_list = HashSet::new();
        stats.generated_nodes = 1;

        while let Some(entry) = open_list.pop() {
            let current = nodes[entry.index].clone();

            // A cheaper copy of this cell was expanded earlier.
            if !closed_list.insert(current.position) {
                stats.stale_skipped += 1;
                continue;
            }

            if current.position == goal {
                stats.expanded_nodes += 1;
                let path = construct_path(&nodes, entry.index);
                stats.cost = current.g_cost;
                stats.time_us = timer.elapsed().as_micros() as usize;
                debug!("found path of cost {} over {} cells", current.g_cost, path.len());
                return Ok(SearchOutcome {
                    path,
                    cost: current.g_cost,
                    stats,
                });
            }

            if let Some(limit) = self.max_expansions {
                if stats.expanded_nodes >= limit {
                    debug!("expansion limit {limit} reached");
                    return Err(SearchError::ExpansionLimitReached { start, goal, limit });
                }
            }
            stats.expanded_nodes += 1;
            trace!("expand node: {current:?}");

            for neighbor in map.get_neighbors(current.position.0, current.position.1) {
                if closed_list.contains(&neighbor) {
                    continue;
                }

                // Walls have no step cost.
                let Some(step_cost) = map.cell(neighbor).step_cost() else {
                    continue;
                };

                let tentative_g_cost = current.g_cost + step_cost;
                if best_cost
                    .get(&neighbor)
                    .is_some_and(|&known| tentative_g_cost >= known)
                {
                    continue;
                }
                best_cost.insert(neighbor, tentative_g_cost);

                let h_cost = heuristic(neighbor, goal);
                nodes.push(SearchNode {
                    position: neighbor,
                    g_cost: tentative_g_cost,
                    h_cost,
                    parent: Some(entry.index),
                });
                open_list.push(OpenEntry {
                    f_cost: tentative_g_cost + h_cost,
                    h_cost,
                    index: nodes.len() - 1,
                });
                stats.generated_nodes += 1;
            }
        }

        debug!("cannot find path");
        stats.time_us = timer.elapsed().as_micros() as usize;
        Ok(SearchOutcome::unreachable(stats))
    }
}
