//! Tool-style action surface for hosting layers (conversational agents,
//! web handlers).
//!
//! Instead of a process-wide "current game" global, hosting layers own an
//! explicit [`GameSession`]. Mutating actions take `&mut self`, so a
//! session has exactly one writer at a time; callers that share one
//! session across concurrent callers must serialize access themselves.

use serde::{Deserialize, Serialize};

use crate::Position;
use crate::game::{Game, GameState, GameStatus, LookAround};
use crate::maze::MazeError;

/// Smallest look-around radius accepted by the tool surface.
pub const MIN_VISIBILITY: i32 = 1;
/// Largest look-around radius accepted by the tool surface.
pub const MAX_VISIBILITY: i32 = 5;

/// Response shape for the `move` action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    pub success: bool,
    pub message: String,
    pub key_collected: bool,
    pub reached_exit: bool,
    pub game_status: GameStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_position: Option<Position>,
}

/// One playable session exposed as named actions with flat, serializable
/// results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    game: Game,
}

impl GameSession {
    /// Starts a session over the default maze layout.
    pub fn new(width: i32, height: i32) -> Result<Self, MazeError> {
        Ok(GameSession {
            game: Game::new(width, height)?,
        })
    }

    /// Starts a session from an explicit string layout.
    pub fn from_layout<S: AsRef<str>>(layout: &[S]) -> Result<Self, MazeError> {
        Ok(GameSession {
            game: Game::from_layout(layout)?,
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Moves the player in a cardinal direction ('up', 'down', 'left' or
    /// 'right').
    pub fn move_player(&mut self, direction: &str) -> MoveResponse {
        let result = self.game.move_player(direction);
        MoveResponse {
            success: result.success,
            message: result.message,
            key_collected: result.key_collected,
            reached_exit: result.reached_exit,
            game_status: self.game.status(),
            new_position: result.new_position,
        }
    }

    /// Looks around the current position. The radius is clamped to
    /// [`MIN_VISIBILITY`]..=[`MAX_VISIBILITY`] here; the engine itself
    /// never clamps.
    pub fn look_around(&self, radius: i32) -> LookAround {
        self.game
            .look_around(radius.clamp(MIN_VISIBILITY, MAX_VISIBILITY))
    }

    /// The complete current game state.
    pub fn game_state(&self) -> GameState {
        self.game.state()
    }

    /// An ASCII rendering of the maze, optionally under fog of war.
    pub fn maze_display(&self, fog_of_war: bool) -> String {
        self.game.render_maze(fog_of_war)
    }

    /// Resets the session to a fresh maze and returns a confirmation
    /// message.
    pub fn reset_game(&mut self) -> String {
        self.game.reset();
        "Game has been reset. A new maze is ready!".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn default_session_is_the_default_seven_by_seven_game() {
        let session = GameSession::default();
        let state = session.game_state();
        assert_eq!(state.maze.width, 7);
        assert_eq!(state.maze.height, 7);
        assert_eq!(state.status, GameStatus::Playing);
    }

    #[test]
    fn move_response_carries_status_and_position() {
        let mut session =
            GameSession::from_layout(&["#####", "#SK.#", "#...#", "#..E#", "#####"]).unwrap();
        let response = session.move_player("right");

        assert!(response.success);
        assert!(response.key_collected);
        assert_eq!(response.game_status, GameStatus::Playing);
        assert_eq!(response.new_position, Some(Position::new(2, 1)));
    }

    #[test]
    fn move_response_serializes_to_stable_shape() {
        let mut session = GameSession::default();
        let response = session.move_player("down");
        let json = serde_json::to_value(&response).unwrap();

        let object = json.as_object().unwrap();
        for field in [
            "success",
            "message",
            "key_collected",
            "reached_exit",
            "game_status",
            "new_position",
        ] {
            assert!(object.contains_key(field), "missing field {field}");
        }
        assert_eq!(json["game_status"], Value::from("playing"));
        assert_eq!(json["new_position"]["x"], Value::from(1));
    }

    #[test]
    fn failed_move_response_omits_new_position() {
        let mut session = GameSession::default();
        let response = session.move_player("north");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], Value::from(false));
        assert!(!json.as_object().unwrap().contains_key("new_position"));
    }

    #[test]
    fn look_around_clamps_radius() {
        let session = GameSession::default();
        // A huge radius behaves as the maximum; a non-positive one as the
        // minimum.
        assert_eq!(session.look_around(99), session.look_around(MAX_VISIBILITY));
        assert_eq!(session.look_around(-3), session.look_around(MIN_VISIBILITY));
    }

    #[test]
    fn state_serializes_with_nested_player_and_maze() {
        let session = GameSession::default();
        let json = serde_json::to_value(session.game_state()).unwrap();

        assert_eq!(json["status"], Value::from("playing"));
        assert_eq!(json["player"]["moves_made"], Value::from(0));
        assert_eq!(json["maze"]["width"], Value::from(7));
        assert!(json["exit_position"]["x"].is_number());
    }

    #[test]
    fn reset_returns_confirmation_and_restores_state() {
        let mut session = GameSession::default();
        session.move_player("down");
        let message = session.reset_game();

        assert!(message.contains("reset"));
        assert_eq!(session.game_state().player.moves_made, 0);
    }
}
