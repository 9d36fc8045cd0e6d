use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Direction, Position};

/// The movable entity in a maze session.
///
/// Tracks the current position, cumulative move and key counters, and
/// every position ever occupied. The visited set always contains the
/// current position and only shrinks on [`Player::reset_to`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    position: Position,
    moves_made: u32,
    keys_collected: u32,
    visited: HashSet<Position>,
}

impl Player {
    pub fn new(start: Position) -> Self {
        Player {
            position: start,
            moves_made: 0,
            keys_collected: 0,
            visited: HashSet::from([start]),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn moves_made(&self) -> u32 {
        self.moves_made
    }

    pub fn keys_collected(&self) -> u32 {
        self.keys_collected
    }

    pub fn has_visited(&self, pos: Position) -> bool {
        self.visited.contains(&pos)
    }

    /// Where the player would land moving in `direction`.
    ///
    /// Pure: no state changes. The orchestrator validates the returned
    /// destination against the maze before committing anything.
    pub fn tentative_move(&self, direction: Direction) -> Position {
        self.position + direction.offset()
    }

    /// Moves to the given position, counting the move and recording it in
    /// the visited set.
    pub fn commit_move(&mut self, position: Position) {
        self.position = position;
        self.moves_made += 1;
        self.visited.insert(position);
    }

    pub fn collect_key(&mut self) {
        self.keys_collected += 1;
    }

    /// Returns the player to a fresh state at the given start position.
    pub fn reset_to(&mut self, start: Position) {
        self.position = start;
        self.moves_made = 0;
        self.keys_collected = 0;
        self.visited = HashSet::from([start]);
    }
}
