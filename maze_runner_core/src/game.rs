use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::maze::{CellKind, Maze, MazeError, PLAYER_MARKER};
use crate::player::Player;
use crate::{Direction, Position};

/// Fixed visibility radius used by fog-of-war rendering.
pub const FOG_RADIUS: i32 = 2;
/// Marker for cells visited earlier but outside the current window.
pub const VISITED_MARKER: char = '·';
/// Marker for cells never seen.
pub const UNKNOWN_MARKER: char = '?';

/// Overall status of a game session.
///
/// `Lost` is reserved for forward compatibility; no current rule produces
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameStatus::Playing => "playing",
            GameStatus::Won => "won",
            GameStatus::Lost => "lost",
        })
    }
}

/// Result of a movement attempt.
///
/// Rejected moves (bad direction, wall, game over) are reported here as
/// unsuccessful results, never as errors: they are normal negative
/// outcomes and leave all state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_position: Option<Position>,
    pub key_collected: bool,
    pub reached_exit: bool,
}

impl MoveResult {
    fn failure(message: String) -> Self {
        MoveResult {
            success: false,
            message,
            new_position: None,
            key_collected: false,
            reached_exit: false,
        }
    }
}

/// Positions of visible cells, bucketed by cell kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleCells {
    pub walls: Vec<Position>,
    pub empty: Vec<Position>,
    pub keys: Vec<Position>,
    pub exit: Vec<Position>,
    pub start: Vec<Position>,
}

/// Information about the player's surroundings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookAround {
    pub current_position: Position,
    pub visible_cells: VisibleCells,
    pub available_moves: Vec<Direction>,
}

/// Player half of a [`GameState`] snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Position,
    pub keys_collected: u32,
    pub moves_made: u32,
}

/// Maze half of a [`GameState`] snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeState {
    pub width: i32,
    pub height: i32,
    pub total_keys: usize,
    pub keys_remaining: usize,
}

/// Complete snapshot of a game session. Taking one never mutates the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub status: GameStatus,
    pub player: PlayerState,
    pub maze: MazeState,
    pub exit_position: Position,
}

/// A turn-based maze session: one maze, one player, and the win state.
///
/// `total_keys` is fixed at construction so "keys remaining / total" stays
/// meaningful as keys are consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    maze: Maze,
    player: Player,
    status: GameStatus,
    total_keys: usize,
}

impl Default for Game {
    /// The default 7x7 session.
    fn default() -> Self {
        Game::with_maze(Maze::build_default(7, 7))
    }
}

impl Game {
    /// Creates a game over the default maze layout.
    pub fn new(width: i32, height: i32) -> Result<Self, MazeError> {
        Ok(Game::with_maze(Maze::create_default(width, height)?))
    }

    /// Creates a game from an explicit string layout.
    pub fn from_layout<S: AsRef<str>>(layout: &[S]) -> Result<Self, MazeError> {
        Ok(Game::with_maze(Maze::from_layout(layout)?))
    }

    fn with_maze(maze: Maze) -> Self {
        let player = Player::new(maze.start_position());
        let total_keys = maze.key_count();
        Game {
            maze,
            player,
            status: GameStatus::Playing,
            total_keys,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Attempts to move the player in a direction given as text.
    ///
    /// The pipeline is strictly ordered: status gate, direction parse,
    /// tentative destination, walkability check, and only then the commit
    /// with key pickup and win detection. Every failure path returns
    /// before any state changes.
    pub fn move_player(&mut self, direction: &str) -> MoveResult {
        if self.status != GameStatus::Playing {
            return MoveResult::failure(format!("Game is over. Status: {}", self.status));
        }

        let direction = match direction.parse::<Direction>() {
            Ok(direction) => direction,
            Err(err) => return MoveResult::failure(err.to_string()),
        };

        let destination = self.player.tentative_move(direction);

        if !self.maze.is_walkable(destination) {
            return MoveResult {
                success: false,
                message: format!("Cannot move {direction}: there's a wall!"),
                new_position: Some(self.player.position()),
                key_collected: false,
                reached_exit: false,
            };
        }

        self.player.commit_move(destination);
        debug!(%direction, x = destination.x, y = destination.y, "move committed");

        let key_collected = self.maze.remove_key(destination);
        if key_collected {
            self.player.collect_key();
            debug!(keys = self.player.keys_collected(), "key collected");
        }

        let reached_exit = self.maze.is_exit(destination);
        if reached_exit {
            self.status = GameStatus::Won;
            info!(moves = self.player.moves_made(), "player reached the exit");
        }

        let mut message = format!("Moved {direction} to position {destination}.");
        if key_collected {
            message.push_str(" You collected a key!");
        }
        if reached_exit {
            message.push_str(" Congratulations! You reached the exit!");
        }

        MoveResult {
            success: true,
            message,
            new_position: Some(destination),
            key_collected,
            reached_exit,
        }
    }

    /// Directions whose destination is currently walkable, regardless of
    /// whether moving there would collect a key or win.
    pub fn available_moves(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&direction| self.maze.is_walkable(self.player.tentative_move(direction)))
            .collect()
    }

    /// Reports the player's surroundings within the given radius.
    ///
    /// Performs no clamping of the radius; callers are expected to keep it
    /// in a sane range.
    pub fn look_around(&self, radius: i32) -> LookAround {
        let mut visible_cells = VisibleCells::default();
        for (pos, kind) in self.maze.visible_cells(self.player.position(), radius) {
            let bucket = match kind {
                CellKind::Wall => &mut visible_cells.walls,
                CellKind::Key => &mut visible_cells.keys,
                CellKind::Exit => &mut visible_cells.exit,
                CellKind::Start => &mut visible_cells.start,
                CellKind::Empty => &mut visible_cells.empty,
            };
            bucket.push(pos);
        }
        // Row-major order for deterministic output.
        for bucket in [
            &mut visible_cells.walls,
            &mut visible_cells.empty,
            &mut visible_cells.keys,
            &mut visible_cells.exit,
            &mut visible_cells.start,
        ] {
            bucket.sort_by_key(|pos| (pos.y, pos.x));
        }

        LookAround {
            current_position: self.player.position(),
            visible_cells,
            available_moves: self.available_moves(),
        }
    }

    /// Snapshot of the complete game state.
    pub fn state(&self) -> GameState {
        GameState {
            status: self.status,
            player: PlayerState {
                position: self.player.position(),
                keys_collected: self.player.keys_collected(),
                moves_made: self.player.moves_made(),
            },
            maze: MazeState {
                width: self.maze.width(),
                height: self.maze.height(),
                total_keys: self.total_keys,
                keys_remaining: self.maze.key_count(),
            },
            exit_position: self.maze.exit_position(),
        }
    }

    /// Renders the maze as text, one character per cell.
    ///
    /// With fog of war, only cells within the fixed visibility window show
    /// their true character; previously visited cells render dimmed and
    /// everything else is unknown. The player's own cell always shows the
    /// player marker.
    pub fn render_maze(&self, fog_of_war: bool) -> String {
        if !fog_of_war {
            return self.maze.render(self.player.position());
        }

        let visible = self.maze.visible_cells(self.player.position(), FOG_RADIUS);
        let mut lines = Vec::with_capacity(self.maze.height() as usize);
        for y in 0..self.maze.height() {
            let mut row = String::with_capacity(self.maze.width() as usize);
            for x in 0..self.maze.width() {
                let pos = Position::new(x, y);
                if pos == self.player.position() {
                    row.push(PLAYER_MARKER);
                } else if let Some(kind) = visible.get(&pos) {
                    row.push(kind.to_char());
                } else if self.player.has_visited(pos) {
                    row.push(VISITED_MARKER);
                } else {
                    row.push(UNKNOWN_MARKER);
                }
            }
            lines.push(row);
        }
        lines.join("\n")
    }

    /// Resets the session: a fresh default-layout maze at the same
    /// dimensions (restoring all keys and walls), the player back at its
    /// start, and status back to playing.
    pub fn reset(&mut self) {
        self.maze = Maze::build_default(self.maze.width(), self.maze.height());
        self.player.reset_to(self.maze.start_position());
        self.total_keys = self.maze.key_count();
        self.status = GameStatus::Playing;
        info!(
            width = self.maze.width(),
            height = self.maze.height(),
            "game reset"
        );
    }
}
