use crate::types::{Cell, Player};

/// Errors raised by the rules engine.
///
/// Every variant is recoverable: the caller retries with different input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("cell {cell} is outside the {rows}x{cols} board")]
    OutOfBounds { cell: Cell, rows: usize, cols: usize },

    #[error("cell {0} is already occupied")]
    OccupiedCell(Cell),

    #[error("placing at {0} captures nothing")]
    NoCapture(Cell),

    #[error("{0} cannot skip while a legal move is available")]
    SkipWhileMoveAvailable(Player),

    #[error("invalid board dimensions {rows}x{cols}: both must be even and at least 4, with at most 26 columns and 65536 cells")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("invalid number of players: {0} (expected 1 or 2)")]
    InvalidPlayerCount(u8),

    #[error("the game is already finished")]
    OperationAfterGameFinished,

    #[error("it is {expected}'s turn, not {actual}'s")]
    OutOfTurn { expected: Player, actual: Player },
}

impl GameError {
    /// True for the rejections a player sees as "not a legal move".
    pub fn is_illegal_move(&self) -> bool {
        matches!(self, GameError::OccupiedCell(_) | GameError::NoCapture(_))
    }

    /// Stable machine-readable reason used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::OutOfBounds { .. } => "out_of_bounds",
            GameError::OccupiedCell(_) => "occupied_cell",
            GameError::NoCapture(_) => "no_capture",
            GameError::SkipWhileMoveAvailable(_) => "skip_while_move_available",
            GameError::InvalidDimensions { .. } => "invalid_dimensions",
            GameError::InvalidPlayerCount(_) => "invalid_player_count",
            GameError::OperationAfterGameFinished => "operation_after_game_finished",
            GameError::OutOfTurn { .. } => "out_of_turn",
        }
    }
}

/// Errors from parsing a cell label such as `"D3"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CellParseError {
    #[error("empty cell label")]
    Empty,

    #[error("invalid column letter '{0}'")]
    InvalidColumn(char),

    #[error("invalid row number '{0}'")]
    InvalidRow(String),
}

/// Errors from parsing a board diagram.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardParseError {
    #[error("unexpected character '{ch}' at row {row}, column {col}")]
    UnexpectedChar { ch: char, row: usize, col: usize },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("board diagram is empty")]
    Empty,
}

/// Errors from the session registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("unknown session {0}")]
    UnknownSession(u32),

    #[error("every session handle is in use")]
    Exhausted,

    #[error(transparent)]
    Game(#[from] GameError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_error_display() {
        let err = GameError::OutOfBounds {
            cell: Cell::new(8, 0),
            rows: 8,
            cols: 8,
        };
        assert_eq!(err.to_string(), "cell A9 is outside the 8x8 board");

        let err = GameError::OutOfTurn {
            expected: Player::Black,
            actual: Player::White,
        };
        assert_eq!(err.to_string(), "it is Black's turn, not White's");
    }

    #[test]
    fn occupied_and_no_capture_are_both_illegal_moves() {
        assert!(GameError::OccupiedCell(Cell::new(3, 3)).is_illegal_move());
        assert!(GameError::NoCapture(Cell::new(0, 0)).is_illegal_move());
        assert!(!GameError::OperationAfterGameFinished.is_illegal_move());
        assert!(!GameError::SkipWhileMoveAvailable(Player::Black).is_illegal_move());
    }

    #[test]
    fn session_error_wraps_game_error_transparently() {
        let err: SessionError = GameError::OperationAfterGameFinished.into();
        assert_eq!(err.to_string(), "the game is already finished");
        assert_eq!(
            SessionError::UnknownSession(7).to_string(),
            "unknown session 7"
        );
        assert_eq!(
            SessionError::Exhausted.to_string(),
            "every session handle is in use"
        );
    }
}
