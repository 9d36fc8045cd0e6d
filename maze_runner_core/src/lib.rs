use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod game;
pub mod maze;
pub mod player;
pub mod tools;

/// Represents a 2D coordinate in the maze.
///
/// Positions carry no bounds knowledge of their own; the [`maze::Maze`]
/// decides whether a position is inside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }
}

/// Component-wise addition, used to apply direction offsets.
impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The four cardinal movement directions.
///
/// Raw direction strings are parsed exactly once at the text boundary
/// ([`FromStr`], case-insensitive); the engine itself only ever handles
/// this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Error returned when a direction string is not one of the four tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid direction: '{token}'. Valid directions: up, down, left, right")]
pub struct ParseDirectionError {
    pub token: String,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The unit offset this direction applies to a position.
    pub const fn offset(self) -> Position {
        match self {
            Direction::Up => Position::new(0, -1),
            Direction::Down => Position::new(0, 1),
            Direction::Left => Position::new(-1, 0),
            Direction::Right => Position::new(1, 0),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(ParseDirectionError {
                token: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_addition_is_component_wise() {
        let pos = Position::new(3, 4) + Position::new(-1, 2);
        assert_eq!(pos, Position::new(2, 6));
    }

    #[test]
    fn position_equality_and_hashing_by_value() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(Position::new(1, 1));
        assert!(set.contains(&Position::new(1, 1)));
        assert!(!set.contains(&Position::new(1, 2)));
    }

    #[test]
    fn direction_offsets_match_table() {
        assert_eq!(Direction::Up.offset(), Position::new(0, -1));
        assert_eq!(Direction::Down.offset(), Position::new(0, 1));
        assert_eq!(Direction::Left.offset(), Position::new(-1, 0));
        assert_eq!(Direction::Right.offset(), Position::new(1, 0));
    }

    #[test]
    fn direction_parsing_is_case_insensitive() {
        assert_eq!("up".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("UP".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("Right".parse::<Direction>().unwrap(), Direction::Right);
    }

    #[test]
    fn direction_parsing_rejects_unknown_tokens() {
        let err = "north".parse::<Direction>().unwrap_err();
        assert_eq!(err.token, "north");
        assert!(err.to_string().contains("up, down, left, right"));
    }
}
