use thiserror::Error;

use crate::common::Coordinate;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("coordinate ({x}, {y}) is outside the {rows}x{cols} map")]
    InvalidCoordinate {
        x: usize,
        y: usize,
        rows: usize,
        cols: usize,
    },

    #[error("unknown cell code {0}, expected 0 (open), 1 (wall), 2 (water) or 3 (fallen tree)")]
    InvalidCellCode(u8),

    #[error("unknown cell glyph {0:?}")]
    InvalidGlyph(char),

    #[error("map must have at least one row and one column")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("malformed map header: {0}")]
    Header(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error(transparent)]
    InvalidCoordinate(#[from] MapError),

    #[error("search from {start:?} to {goal:?} stopped after {limit} expansions")]
    ExpansionLimitReached {
        start: Coordinate,
        goal: Coordinate,
        limit: usize,
    },
}
