use serde::Serialize;

use crate::stat::Stats;

/// Grid cell as `(row, column)`.
pub type Coordinate = (usize, usize);

/// Ordered cells from start to goal, both inclusive.
pub type Path = Vec<Coordinate>;

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub path: Path, // Empty when the goal cannot be reached
    pub cost: usize,
    pub stats: Stats,
}

impl SearchOutcome {
    pub(crate) fn unreachable(stats: Stats) -> Self {
        SearchOutcome {
            path: Vec::new(),
            cost: 0,
            stats,
        }
    }

    pub fn is_found(&self) -> bool {
        !self.path.is_empty()
    }
}
