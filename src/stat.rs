use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub cost: usize,
    pub time_us: usize,
    pub expanded_nodes: usize,
    pub generated_nodes: usize,
    pub stale_skipped: usize,
}

impl Stats {
    pub fn print(&self) {
        info!(
            "Cost {:?} Time(microseconds) {:?} Expanded nodes: {:?} Generated nodes: {:?} Stale entries skipped: {:?}",
            self.cost, self.time_us, self.expanded_nodes, self.generated_nodes, self.stale_skipped
        );
    }
}
