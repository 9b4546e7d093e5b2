mod astar;

pub use astar::PathFinder;

use std::cmp::Ordering;

use crate::common::{Coordinate, Path};
use crate::map::MIN_STEP_COST;

/// Arena entry. `parent` indexes the predecessor in the same arena, so the
/// stored nodes form a tree rooted at the start node.
#[derive(Debug, Clone)]
pub(crate) struct SearchNode {
    pub(crate) position: Coordinate,
    pub(crate) g_cost: usize,
    pub(crate) h_cost: usize,
    pub(crate) parent: Option<usize>,
}

impl SearchNode {
    pub(crate) fn f_cost(&self) -> usize {
        self.g_cost + self.h_cost
    }
}

// Frontier entry pointing into the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OpenEntry {
    pub(crate) f_cost: usize,
    pub(crate) h_cost: usize,
    pub(crate) index: usize,
}

// BinaryHeap is a max-heap, so every comparison is inverted.
impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_cost
            .cmp(&self.f_cost)
            // Closer to the goal first
            .then_with(|| other.h_cost.cmp(&self.h_cost))
            // Earlier insertion first
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Manhattan distance scaled by the cheapest step, admissible for 4-connected grids.
pub fn heuristic(position: Coordinate, goal: Coordinate) -> usize {
    (position.0.abs_diff(goal.0) + position.1.abs_diff(goal.1)) * MIN_STEP_COST
}

fn construct_path(nodes: &[SearchNode], mut current: usize) -> Path {
    let mut path = vec![nodes[current].position];
    while let Some(parent) = nodes[current].parent {
        path.push(nodes[parent].position);
        current = parent;
    }
    path.reverse();
    path
}
