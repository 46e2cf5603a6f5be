use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::EngineError,
    grid::{Grid, Position},
    line::slide_and_merge,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// How lines are read so that sliding always goes toward index 0.
    fn orientation(self) -> (Axis, bool) {
        match self {
            Direction::Left => (Axis::Row, false),
            Direction::Right => (Axis::Row, true),
            Direction::Up => (Axis::Column, false),
            Direction::Down => (Axis::Column, true),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        })
    }
}

impl FromStr for Direction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(EngineError::InvalidDirection(s.to_owned())),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Axis {
    Row,
    Column,
}

impl Axis {
    /// Cell `i` of lane `lane`, before any reversal.
    fn position(self, lane: usize, i: usize) -> Position {
        match self {
            Axis::Row => Position::new(lane, i),
            Axis::Column => Position::new(i, lane),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub moved: bool,
    pub grid: Grid,
    pub score_delta: u64,
    pub merged: Vec<Position>,
}

/// Resolve a move over every line of `grid`. The input grid is left alone;
/// the outcome carries a new one.
pub fn resolve(grid: &Grid, direction: Direction) -> MoveOutcome {
    let n = grid.size();
    let (axis, reversed) = direction.orientation();
    // index along the oriented line -> index along the lane
    let remap = |i: usize| if reversed { n - 1 - i } else { i };

    let mut out = grid.clone();
    let mut moved = false;
    let mut score_delta = 0;
    let mut merged = Vec::new();

    for lane in 0..n {
        let line: Vec<u32> = (0..n)
            .map(|i| grid.get(axis.position(lane, remap(i))))
            .collect();

        let resolved = slide_and_merge(&line);
        moved |= resolved.moved;
        score_delta += resolved.score;

        for (i, v) in resolved.line.iter().enumerate() {
            out.set(axis.position(lane, remap(i)), *v);
        }
        merged.extend(
            resolved
                .merged
                .iter()
                .map(|i| axis.position(lane, remap(*i))),
        );
    }

    MoveOutcome {
        moved,
        grid: out,
        score_delta,
        merged,
    }
}

pub fn can_move(grid: &Grid, direction: Direction) -> bool {
    resolve(grid, direction).moved
}

/// No direction changes the grid.
pub fn is_stuck(grid: &Grid) -> bool {
    Direction::ALL.iter().all(|d| !can_move(grid, *d))
}

#[cfg(test)]
mod test {
    use super::{can_move, is_stuck, resolve, Direction};
    use crate::{
        error::EngineError,
        grid::{Grid, Position},
    };

    #[test]
    fn right_reverses_and_maps_back() {
        let g = Grid::from_rows(&[[2, 2, 4, 4], [0; 4], [0; 4], [0; 4]]).unwrap();
        let out = resolve(&g, Direction::Right);
        assert_eq!(out.grid.rows().next().unwrap(), &[0, 0, 4, 8]);
        assert_eq!(out.score_delta, 12);
        assert_eq!(out.merged, vec![Position::new(0, 3), Position::new(0, 2)]);
    }

    #[test]
    fn up_and_down_use_columns() {
        let g = Grid::from_rows(&[[2, 0, 0], [2, 4, 0], [0, 4, 8]]).unwrap();

        let up = resolve(&g, Direction::Up);
        assert_eq!(
            up.grid,
            Grid::from_rows(&[[4, 8, 8], [0, 0, 0], [0, 0, 0]]).unwrap()
        );
        assert_eq!(up.merged, vec![Position::new(0, 0), Position::new(0, 1)]);

        let down = resolve(&g, Direction::Down);
        assert_eq!(
            down.grid,
            Grid::from_rows(&[[0, 0, 0], [0, 0, 0], [4, 8, 8]]).unwrap()
        );
        assert_eq!(down.merged, vec![Position::new(2, 0), Position::new(2, 1)]);
    }

    #[test]
    fn left_keeps_rows() {
        let g = Grid::from_rows(&[[0, 2, 2, 2], [4, 0, 0, 4], [0; 4], [8, 16, 32, 64]]).unwrap();
        let out = resolve(&g, Direction::Left);
        assert_eq!(
            out.grid,
            Grid::from_rows(&[[4, 2, 0, 0], [8, 0, 0, 0], [0; 4], [8, 16, 32, 64]]).unwrap()
        );
        assert_eq!(out.merged, vec![Position::new(0, 0), Position::new(1, 0)]);
        assert_eq!(out.score_delta, 12);
    }

    #[test]
    fn resolve_leaves_input_untouched() {
        let g = Grid::from_rows(&[[2, 2], [0, 0]]).unwrap();
        let before = g.clone();
        let out = resolve(&g, Direction::Left);
        assert!(out.moved);
        assert_eq!(g, before);
    }

    #[test]
    fn no_move_when_packed() {
        let g = Grid::from_rows(&[[2, 4, 0, 0], [8, 0, 0, 0], [0; 4], [0; 4]]).unwrap();
        assert!(!can_move(&g, Direction::Left));
        assert!(!can_move(&g, Direction::Up));
        assert!(can_move(&g, Direction::Right));
        assert!(can_move(&g, Direction::Down));
    }

    #[test]
    fn stuck_grid() {
        let g = Grid::from_rows(&[[2, 4], [4, 2]]).unwrap();
        assert!(is_stuck(&g));
        let g = Grid::from_rows(&[[2, 2], [4, 8]]).unwrap();
        assert!(!is_stuck(&g));
    }

    #[test]
    fn parses_directions() {
        assert_eq!("Up".parse::<Direction>(), Ok(Direction::Up));
        assert_eq!(" right ".parse::<Direction>(), Ok(Direction::Right));
        assert_eq!(
            "sideways".parse::<Direction>(),
            Err(EngineError::InvalidDirection("sideways".into()))
        );
        for d in Direction::ALL {
            assert_eq!(d.to_string().parse::<Direction>(), Ok(d));
        }
    }
}
