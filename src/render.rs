use std::collections::HashSet;

use crate::common::Coordinate;
use crate::map::Map;

pub const PATH_GLYPH: char = '*';

/// Draws the map one row per line, marking `path` cells with [`PATH_GLYPH`].
pub fn render(map: &Map, path: Option<&[Coordinate]>) -> String {
    let on_path: HashSet<Coordinate> = path.unwrap_or_default().iter().copied().collect();
    let mut out = String::with_capacity((map.width * 2 + 1) * map.height + 1);

    for (x, row) in map.grid.iter().enumerate() {
        for (y, cell) in row.iter().enumerate() {
            let glyph = if on_path.contains(&(x, y)) {
                PATH_GLYPH
            } else {
                cell.glyph()
            };
            out.push(glyph);
            out.push(' ');
        }
        out.push('\n');
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::CellKind;

    #[test]
    fn test_render_without_path() {
        let mut map = Map::default_forest();
        map.set_cell((4, 0), CellKind::Water).unwrap();
        map.set_cell((4, 1), CellKind::FallenTree).unwrap();

        let expected = ". . . . . \n\
                        . | . | . \n\
                        . | . | . \n\
                        . . . . . \n\
                        ~ \\ . . . \n\n";
        assert_eq!(render(&map, None), expected);
    }

    #[test]
    fn test_render_marks_path() {
        let map = Map::from_codes(&[vec![0, 1], vec![0, 0]]).unwrap();
        let path = [(0, 0), (1, 0), (1, 1)];
        assert_eq!(render(&map, Some(&path)), "* | \n* * \n\n");
    }
}
