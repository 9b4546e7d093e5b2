use anyhow::Result;
use std::io::{BufRead, Lines, Write};
use tracing::{debug, info};

use crate::algorithm::PathFinder;
use crate::common::Coordinate;
use crate::map::{CellKind, Map};
use crate::render::render;

enum Input<T> {
    Value(T),
    Invalid(String),
    Eof,
}

struct Console<R, W> {
    lines: Lines<R>,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        match self.lines.next() {
            Some(line) => Ok(Some(line?.trim().to_string())),
            None => Ok(None),
        }
    }

    fn ask_number(&mut self, prompt: &str) -> Result<Input<usize>> {
        Ok(match self.ask(prompt)? {
            None => Input::Eof,
            Some(answer) => match answer.parse::<usize>() {
                Ok(value) => Input::Value(value),
                Err(_) => Input::Invalid(format!("{answer:?} is not a valid coordinate")),
            },
        })
    }

    fn ask_coordinate(&mut self, name: &str) -> Result<Input<Coordinate>> {
        let x = match self.ask_number(&format!("Enter the X coordinate of the {name}: "))? {
            Input::Value(x) => x,
            Input::Invalid(message) => return Ok(Input::Invalid(message)),
            Input::Eof => return Ok(Input::Eof),
        };
        let y = match self.ask_number(&format!("Enter the Y coordinate of the {name}: "))? {
            Input::Value(y) => y,
            Input::Invalid(message) => return Ok(Input::Invalid(message)),
            Input::Eof => return Ok(Input::Eof),
        };
        Ok(Input::Value((x, y)))
    }

    fn ask_yes(&mut self, prompt: &str) -> Result<bool> {
        Ok(self
            .ask(prompt)?
            .is_some_and(|answer| matches!(answer.to_lowercase().as_str(), "y" | "yes" | "s")))
    }
}

/// Interactive session: ask for a route, show it, optionally place an obstacle, repeat.
///
/// Malformed answers print a message and restart the round. The session ends when the
/// user declines another search or the input runs out.
pub fn run_interactive<R: BufRead, W: Write>(
    map: &mut Map,
    finder: &PathFinder,
    input: R,
    output: W,
) -> Result<()> {
    let mut console = Console {
        lines: input.lines(),
        output,
    };

    loop {
        console.say("Current map:")?;
        console.say(&render(map, None))?;

        let mut endpoints = Vec::with_capacity(2);
        for name in ["start point", "end point"] {
            match console.ask_coordinate(name)? {
                Input::Value(position) => endpoints.push(position),
                Input::Invalid(message) => {
                    console.say(&format!("Coordinate error: {message}. Please try again."))?;
                    break;
                }
                Input::Eof => return Ok(()),
            }
        }
        let &[start, goal] = endpoints.as_slice() else {
            continue;
        };

        if let Err(err) = map.check_bounds(start).and(map.check_bounds(goal)) {
            console.say(&format!("Coordinate error: {err}. Please try again."))?;
            continue;
        }

        let outcome = finder.search(map, start, goal);
        match outcome {
            Ok(outcome) if outcome.is_found() => {
                info!("route {start:?} -> {goal:?} costs {}", outcome.cost);
                outcome.stats.print();
                console.say(&format!("Route found (cost {}):", outcome.cost))?;
                console.say(&render(map, Some(&outcome.path)))?;
            }
            Ok(_) => console.say("No valid route found.")?,
            Err(err) => console.say(&format!("Search failed: {err}"))?,
        }

        if console.ask_yes("Add an obstacle? (y/n): ")? {
            let position = match console.ask_coordinate("obstacle")? {
                Input::Value(position) => position,
                Input::Invalid(message) => {
                    console.say(&format!("Invalid coordinate format: {message}. Please try again."))?;
                    continue;
                }
                Input::Eof => return Ok(()),
            };

            let kind = match console
                .ask("Enter the obstacle type (wall=1, water=2, fallen tree=3): ")?
                .as_deref()
            {
                Some("1") => CellKind::Wall,
                Some("2") => CellKind::Water,
                Some("3") => CellKind::FallenTree,
                Some(_) => {
                    console.say("Invalid obstacle type. Please try again.")?;
                    continue;
                }
                None => return Ok(()),
            };

            match map.set_cell(position, kind) {
                Ok(()) => debug!("placed {kind:?} at {position:?}"),
                Err(err) => console.say(&format!("Obstacle not placed: {err}."))?,
            }
        }

        if !console.ask_yes("Search another route? (y/n): ")? {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_script(map: &mut Map, script: &str) -> String {
        let mut output = Vec::new();
        run_interactive(map, &PathFinder::new(), script.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_single_route_then_quit() {
        let mut map = Map::default_forest();
        let output = run_script(&mut map, "0\n0\n0\n4\nn\nn\n");

        assert!(output.contains("Route found (cost 4):"));
        assert!(output.contains("* * * * * \n. | . | . \n"));
        assert_eq!(map, Map::default_forest());
    }

    #[test]
    fn test_obstacle_changes_next_route() {
        let mut map = Map::default_forest();
        let script = "0\n0\n0\n4\ny\n0\n2\n1\ny\n0\n0\n0\n4\nn\nn\n";
        let output = run_script(&mut map, script);

        assert_eq!(map.cell((0, 2)), CellKind::Wall);
        assert!(output.contains("Route found (cost 4):"));
        // Row 0 is cut, so the second route goes through row 3.
        assert!(output.contains("Route found (cost 10):"));
    }

    #[test]
    fn test_bad_input_retries() {
        let mut map = Map::default_forest();
        let script = "abc\n0\n0\n0\n9\n0\n0\n1\n1\nn\ny\n";
        let output = run_script(&mut map, script);

        assert!(output.contains("\"abc\" is not a valid coordinate"));
        assert!(output.contains("outside the 5x5 map"));
        assert!(output.contains("No valid route found."));
        // Input ran out while asking for the next start point.
        assert_eq!(output.matches("Current map:").count(), 4);
    }

    #[test]
    fn test_invalid_obstacle_type() {
        let mut map = Map::default_forest();
        let script = "0\n0\n0\n1\ny\n4\n4\n7\n0\n0\n0\n1\ny\n9\n9\n2\nn\n";
        let output = run_script(&mut map, script);

        assert!(output.contains("Invalid obstacle type."));
        assert!(output.contains("Obstacle not placed"));
        assert_eq!(map, Map::default_forest());
    }
}
