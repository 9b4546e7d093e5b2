use std::fs;
use std::str::FromStr;

use anyhow::Context;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::common::Coordinate;
use crate::error::MapError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Open,
    Wall,
    Water,
    FallenTree,
}

impl CellKind {
    pub fn from_code(code: u8) -> Result<Self, MapError> {
        match code {
            0 => Ok(CellKind::Open),
            1 => Ok(CellKind::Wall),
            2 => Ok(CellKind::Water),
            3 => Ok(CellKind::FallenTree),
            other => Err(MapError::InvalidCellCode(other)),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            CellKind::Open => 0,
            CellKind::Wall => 1,
            CellKind::Water => 2,
            CellKind::FallenTree => 3,
        }
    }

    /// Cost of stepping onto a cell of this kind, `None` if it cannot be entered.
    pub fn step_cost(self) -> Option<usize> {
        match self {
            CellKind::Open => Some(1),
            CellKind::Wall => None,
            CellKind::Water => Some(5),
            CellKind::FallenTree => Some(10),
        }
    }

    pub fn is_passable(self) -> bool {
        self.step_cost().is_some()
    }

    pub fn glyph(self) -> char {
        match self {
            CellKind::Open => '.',
            CellKind::Wall => '|',
            CellKind::Water => '~',
            CellKind::FallenTree => '\\',
        }
    }

    pub fn from_glyph(glyph: char) -> Result<Self, MapError> {
        match glyph {
            '.' => Ok(CellKind::Open),
            '|' | '@' => Ok(CellKind::Wall),
            '~' => Ok(CellKind::Water),
            '\\' => Ok(CellKind::FallenTree),
            other => Err(MapError::InvalidGlyph(other)),
        }
    }
}

/// Cheapest step any passable cell can charge. Scales the heuristic.
pub const MIN_STEP_COST: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    pub height: usize,
    pub width: usize,
    pub grid: Vec<Vec<CellKind>>,
}

impl Map {
    pub fn from_codes(codes: &[Vec<u8>]) -> Result<Self, MapError> {
        let height = codes.len();
        let width = codes.first().map_or(0, |row| row.len());
        if height == 0 || width == 0 {
            return Err(MapError::Empty);
        }

        let mut grid = Vec::with_capacity(height);
        for (row_index, row) in codes.iter().enumerate() {
            if row.len() != width {
                return Err(MapError::RaggedRow {
                    row: row_index,
                    expected: width,
                    found: row.len(),
                });
            }
            let cells = row
                .iter()
                .map(|&code| CellKind::from_code(code))
                .collect::<Result<Vec<_>, _>>()?;
            grid.push(cells);
        }

        Ok(Map {
            height,
            width,
            grid,
        })
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("failed to read map file {path}"))?;
        content
            .parse::<Map>()
            .with_context(|| format!("failed to parse map file {path}"))
    }

    /// The 5x5 forest with two wall columns used by the interactive mode.
    pub fn default_forest() -> Self {
        let (o, w) = (CellKind::Open, CellKind::Wall);
        Map {
            height: 5,
            width: 5,
            grid: vec![
                vec![o, o, o, o, o],
                vec![o, w, o, w, o],
                vec![o, w, o, w, o],
                vec![o, o, o, o, o],
                vec![o, o, o, o, o],
            ],
        }
    }

    /// Open map where each cell becomes an obstacle of a random kind with probability
    /// `obstacle_ratio`.
    pub fn random<R: Rng + ?Sized>(
        height: usize,
        width: usize,
        obstacle_ratio: f64,
        rng: &mut R,
    ) -> Result<Self, MapError> {
        if height == 0 || width == 0 {
            return Err(MapError::Empty);
        }
        let ratio = obstacle_ratio.clamp(0.0, 1.0);
        let grid = (0..height)
            .map(|_| {
                (0..width)
                    .map(|_| {
                        if !rng.gen_bool(ratio) {
                            return CellKind::Open;
                        }
                        match rng.gen_range(0..3) {
                            0 => CellKind::Wall,
                            1 => CellKind::Water,
                            _ => CellKind::FallenTree,
                        }
                    })
                    .collect()
            })
            .collect();

        Ok(Map {
            height,
            width,
            grid,
        })
    }

    pub fn in_bounds(&self, (x, y): Coordinate) -> bool {
        x < self.height && y < self.width
    }

    pub fn check_bounds(&self, position: Coordinate) -> Result<(), MapError> {
        if self.in_bounds(position) {
            Ok(())
        } else {
            Err(MapError::InvalidCoordinate {
                x: position.0,
                y: position.1,
                rows: self.height,
                cols: self.width,
            })
        }
    }

    pub fn cell(&self, (x, y): Coordinate) -> CellKind {
        self.grid[x][y]
    }

    pub fn is_passable(&self, position: Coordinate) -> bool {
        self.in_bounds(position) && self.cell(position).is_passable()
    }

    /// Axis-aligned neighbours inside the map, walls included.
    pub fn get_neighbors(&self, x: usize, y: usize) -> Vec<Coordinate> {
        let directions = [(-1, 0), (1, 0), (0, -1), (0, 1)]; // Up, down, left, right
        let mut neighbors = Vec::with_capacity(directions.len());

        for &(dx, dy) in &directions {
            let new_x = x as isize + dx;
            let new_y = y as isize + dy;
            if new_x >= 0
                && new_y >= 0
                && (new_x as usize) < self.height
                && (new_y as usize) < self.width
            {
                neighbors.push((new_x as usize, new_y as usize));
            }
        }

        neighbors
    }

    /// Grid editor entry point. Rejects out-of-bounds coordinates before touching the grid.
    pub fn set_cell(&mut self, position: Coordinate, kind: CellKind) -> Result<(), MapError> {
        self.check_bounds(position)?;
        self.grid[position.0][position.1] = kind;
        Ok(())
    }

    /// Total step cost of walking `path`, not counting the first cell.
    ///
    /// Returns `None` if the path leaves the map, enters a wall or contains a move
    /// that is not a single axis-aligned step.
    pub fn path_cost(&self, path: &[Coordinate]) -> Option<usize> {
        let first = *path.first()?;
        if !self.is_passable(first) {
            return None;
        }

        let mut cost = 0;
        for step in path.windows(2) {
            let (from, to) = (step[0], step[1]);
            if from.0.abs_diff(to.0) + from.1.abs_diff(to.1) != 1 || !self.in_bounds(to) {
                return None;
            }
            cost += self.cell(to).step_cost()?;
        }
        Some(cost)
    }
}

impl FromStr for Map {
    type Err = MapError;

    /// Parses the text format:
    ///
    /// ```text
    /// type grid
    /// height 2
    /// width 3
    /// map
    /// .~|
    /// \..
    /// ```
    ///
    /// Walls may also be written `@`, the MovingAI obstacle glyph, so maps from that
    /// benchmark set load unchanged. Rendering always uses `|`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines();

        let _type = lines
            .next()
            .ok_or_else(|| MapError::Header("missing type line".to_string()))?;
        let height = parse_dimension(lines.next(), "height")?;
        let width = parse_dimension(lines.next(), "width")?;
        match lines.next().map(str::trim) {
            Some("map") => {}
            other => return Err(MapError::Header(format!("expected `map`, got {other:?}"))),
        }
        if height == 0 || width == 0 {
            return Err(MapError::Empty);
        }

        let mut grid = Vec::with_capacity(height);
        for (row, line) in lines.take(height).enumerate() {
            let cells = line
                .trim_end()
                .chars()
                .map(CellKind::from_glyph)
                .collect::<Result<Vec<_>, _>>()?;
            if cells.len() != width {
                return Err(MapError::RaggedRow {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
            grid.push(cells);
        }
        if grid.len() != height {
            return Err(MapError::Header(format!(
                "declared {height} rows, found {}",
                grid.len()
            )));
        }

        Ok(Map {
            height,
            width,
            grid,
        })
    }
}

fn parse_dimension(line: Option<&str>, key: &str) -> Result<usize, MapError> {
    let line = line.ok_or_else(|| MapError::Header(format!("missing {key} line")))?;
    let mut parts = line.split_whitespace();
    if parts.next() != Some(key) {
        return Err(MapError::Header(format!("expected `{key} <n>`, got {line:?}")));
    }
    parts
        .next()
        .and_then(|value| value.parse::<usize>().ok())
        .ok_or_else(|| MapError::Header(format!("invalid {key} in {line:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_read_map() {
        let map = Map::from_file("map_file/test/test.map").unwrap();

        assert_eq!(map.height, 4);
        assert_eq!(map.width, 5);

        assert_eq!(map.cell((0, 0)), CellKind::Open);
        assert_eq!(map.cell((0, 2)), CellKind::Wall);
        assert_eq!(map.cell((1, 1)), CellKind::Water);
        assert_eq!(map.cell((2, 3)), CellKind::FallenTree);
        assert!(!map.is_passable((0, 2)));
        assert!(map.is_passable((1, 1)));
    }

    #[test]
    fn test_neighbors() {
        let map = Map::default_forest();

        let corner = map.get_neighbors(0, 0);
        assert_eq!(corner, vec![(1, 0), (0, 1)]);

        // Walls are still neighbours; passability is the search's business.
        let inner = map.get_neighbors(1, 2);
        assert_eq!(inner, vec![(0, 2), (2, 2), (1, 1), (1, 3)]);
    }

    #[test]
    fn test_from_codes_rejects_bad_input() {
        assert_eq!(Map::from_codes(&[]), Err(MapError::Empty));
        assert_eq!(Map::from_codes(&[vec![]]), Err(MapError::Empty));
        assert_eq!(
            Map::from_codes(&[vec![0, 0], vec![0]]),
            Err(MapError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            Map::from_codes(&[vec![0, 4]]),
            Err(MapError::InvalidCellCode(4))
        );
    }

    #[test]
    fn test_parse_accepts_moving_ai_walls() {
        let map = "type octile\nheight 2\nwidth 2\nmap\n.@\n|.\n"
            .parse::<Map>()
            .unwrap();
        assert_eq!(map.cell((0, 1)), CellKind::Wall);
        assert_eq!(map.cell((1, 0)), CellKind::Wall);
        assert_eq!(CellKind::Wall.glyph(), '|');
    }

    #[test]
    fn test_parse_rejects_bad_header() {
        let missing_map = "type grid\nheight 1\nwidth 1\n.\n";
        assert!(matches!(
            missing_map.parse::<Map>(),
            Err(MapError::Header(_))
        ));

        let short = "type grid\nheight 2\nwidth 2\nmap\n..\n";
        assert!(matches!(short.parse::<Map>(), Err(MapError::Header(_))));

        let bad_glyph = "type grid\nheight 1\nwidth 2\nmap\n.#\n";
        assert_eq!(bad_glyph.parse::<Map>(), Err(MapError::InvalidGlyph('#')));
    }

    #[test]
    fn test_set_cell() {
        let mut map = Map::default_forest();
        map.set_cell((4, 4), CellKind::Water).unwrap();
        assert_eq!(map.cell((4, 4)), CellKind::Water);

        let err = map.set_cell((5, 0), CellKind::Wall).unwrap_err();
        assert_eq!(
            err,
            MapError::InvalidCoordinate {
                x: 5,
                y: 0,
                rows: 5,
                cols: 5
            }
        );
    }

    #[test]
    fn test_path_cost() {
        let mut map = Map::default_forest();
        map.set_cell((0, 1), CellKind::Water).unwrap();
        map.set_cell((0, 2), CellKind::FallenTree).unwrap();

        assert_eq!(map.path_cost(&[(0, 0)]), Some(0));
        assert_eq!(map.path_cost(&[(0, 0), (0, 1), (0, 2), (0, 3)]), Some(16));
        // Through a wall.
        assert_eq!(map.path_cost(&[(0, 1), (1, 1)]), None);
        // Diagonal jump.
        assert_eq!(map.path_cost(&[(0, 0), (1, 1)]), None);
        assert_eq!(map.path_cost(&[]), None);
    }

    #[test]
    fn test_random_map_is_reproducible() {
        let first = Map::random(8, 6, 0.3, &mut StdRng::seed_from_u64(7)).unwrap();
        let second = Map::random(8, 6, 0.3, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.height, 8);
        assert_eq!(first.width, 6);

        let open = Map::random(3, 3, 0.0, &mut StdRng::seed_from_u64(1)).unwrap();
        assert!(open.grid.iter().flatten().all(|&cell| cell == CellKind::Open));
    }
}
