pub mod algorithm;
pub mod common;
pub mod config;
pub mod error;
pub mod interactive;
pub mod map;
pub mod render;
pub mod scenario;
pub mod stat;

pub use algorithm::PathFinder;
pub use common::{Coordinate, Path, SearchOutcome};
pub use error::{MapError, SearchError};
pub use map::{CellKind, Map};
