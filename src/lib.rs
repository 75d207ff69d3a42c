//! Othello rules engine.
//!
//! [`game::Game`] is the entry point for native embedders; [`session`] and
//! [`wasm`] expose the same engine through handles for a browser front end.

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod rules;
pub mod session;
pub mod types;
pub mod wasm;

pub use board::Board;
pub use config::GameParameters;
pub use error::{BoardParseError, CellParseError, GameError, SessionError};
pub use game::{Game, GameStatus, Placement, Skip, TurnRecord};
pub use types::{Cell, Direction, GameResult, GameState, Outcome, Player, Score, Side};
