use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::board::Board;
use crate::config::GameParameters;
use crate::error::GameError;
use crate::rules;
use crate::types::{Cell, GameResult, GameState, Player, Score, Side};

/// Where the game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum GameStatus {
    AwaitingMove(Player),
    Finished(GameResult),
}

impl GameStatus {
    /// Side to move, `None` once finished.
    pub fn next_to_move(&self) -> Option<Player> {
        match self {
            GameStatus::AwaitingMove(player) => Some(*player),
            GameStatus::Finished(_) => None,
        }
    }

    pub fn result(&self) -> Option<GameResult> {
        match self {
            GameStatus::AwaitingMove(_) => None,
            GameStatus::Finished(result) => Some(*result),
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, GameStatus::Finished(_))
    }
}

/// Per-side pass flags. A flag is set by a validated skip and cleared by
/// that side's next move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnRecord {
    black_passed: bool,
    white_passed: bool,
}

impl TurnRecord {
    pub fn has_passed(&self, player: Player) -> bool {
        match player {
            Player::Black => self.black_passed,
            Player::White => self.white_passed,
        }
    }

    pub fn both_passed(&self) -> bool {
        self.black_passed && self.white_passed
    }

    fn set(&mut self, player: Player, passed: bool) {
        match player {
            Player::Black => self.black_passed = passed,
            Player::White => self.white_passed = passed,
        }
    }
}

/// An accepted placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub player: Player,
    pub placed: Cell,
    pub flipped: BTreeSet<Cell>,
    pub status: GameStatus,
}

/// An accepted skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skip {
    pub player: Player,
    pub status: GameStatus,
}

/// One game session: the board plus the turn state machine.
#[derive(Debug, Clone)]
pub struct Game {
    params: GameParameters,
    board: Board,
    status: GameStatus,
    passes: TurnRecord,
    is_pass: bool,
    flipped: Vec<Cell>,
}

impl Game {
    /// Starts a seeded game with Black to move.
    #[instrument]
    pub fn new(params: GameParameters) -> Result<Self, GameError> {
        params.validate()?;
        info!(
            rows = params.number_of_rows,
            cols = params.number_of_columns,
            players = params.number_of_players,
            "new game"
        );
        Ok(Self {
            params,
            board: Board::seeded(params.number_of_rows, params.number_of_columns),
            status: GameStatus::AwaitingMove(Player::Black),
            passes: TurnRecord::default(),
            is_pass: false,
            flipped: Vec::new(),
        })
    }

    pub fn with_dimensions(rows: usize, cols: usize) -> Result<Self, GameError> {
        Self::new(GameParameters::new(rows, cols))
    }

    pub fn params(&self) -> &GameParameters {
        &self.params
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn next_to_move(&self) -> Option<Player> {
        self.status.next_to_move()
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn passes(&self) -> TurnRecord {
        self.passes
    }

    /// Recomputed from the board on every call.
    pub fn score(&self) -> Score {
        self.board.score()
    }

    pub fn result(&self) -> Option<GameResult> {
        self.status.result()
    }

    /// Legal targets for the side to move; empty once finished.
    pub fn legal_moves(&self) -> Vec<Cell> {
        self.next_to_move()
            .map(|player| rules::legal_moves(&self.board, player))
            .unwrap_or_default()
    }

    pub fn has_legal_moves_for_current(&self) -> bool {
        self.next_to_move()
            .is_some_and(|player| rules::has_legal_move(&self.board, player))
    }

    /// Places a disk for `player` and flips every captured run.
    ///
    /// A rejected placement leaves the game untouched.
    #[instrument(skip(self))]
    pub fn place(&mut self, cell: Cell, player: Player) -> Result<Placement, GameError> {
        let to_move = self.expect_turn(player)?;
        let flipped = rules::validate(&self.board, cell, to_move).inspect_err(|err| {
            debug!(%cell, %player, reason = err.code(), "placement rejected");
        })?;

        let side = Side::from(to_move);
        self.board.set(cell, side)?;
        for &captured in &flipped {
            self.board.set(captured, side)?;
        }

        self.passes.set(to_move, false);
        self.is_pass = false;
        self.flipped = flipped.iter().copied().collect();
        debug!(%cell, %player, flipped = flipped.len(), "placement accepted");

        self.advance(to_move.opponent());
        Ok(Placement {
            player: to_move,
            placed: cell,
            flipped,
            status: self.status,
        })
    }

    /// Forfeits the turn. Only allowed when `player` has no legal move.
    #[instrument(skip(self))]
    pub fn skip(&mut self, player: Player) -> Result<Skip, GameError> {
        let to_move = self.expect_turn(player)?;
        if rules::has_legal_move(&self.board, to_move) {
            debug!(%player, "skip rejected: a legal move exists");
            return Err(GameError::SkipWhileMoveAvailable(to_move));
        }

        self.passes.set(to_move, true);
        self.is_pass = true;
        self.flipped.clear();
        debug!(%player, "turn skipped");

        self.advance(to_move.opponent());
        Ok(Skip {
            player: to_move,
            status: self.status,
        })
    }

    pub fn to_game_state(&self) -> GameState {
        let score = self.board.score();
        GameState {
            rows: self.board.rows(),
            cols: self.board.cols(),
            board: self.board.to_vec(),
            current_player: self.next_to_move(),
            black_count: score.black,
            white_count: score.white,
            is_game_over: self.is_finished(),
            is_pass: self.is_pass,
            flipped: self.flipped.clone(),
            result: self.result(),
        }
    }

    fn expect_turn(&self, player: Player) -> Result<Player, GameError> {
        match self.status {
            GameStatus::Finished(_) => Err(GameError::OperationAfterGameFinished),
            GameStatus::AwaitingMove(expected) if expected != player => Err(GameError::OutOfTurn {
                expected,
                actual: player,
            }),
            GameStatus::AwaitingMove(expected) => Ok(expected),
        }
    }

    fn advance(&mut self, next: Player) {
        self.status = if self.passes.both_passed() {
            let result = GameResult::from_score(self.board.score());
            info!(
                black = result.score.black,
                white = result.score.white,
                winner = ?result.winner(),
                "game finished"
            );
            GameStatus::Finished(result)
        } else {
            GameStatus::AwaitingMove(next)
        };
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board, next: Player) {
        self.board = board;
        self.status = GameStatus::AwaitingMove(next);
        self.passes = TurnRecord::default();
        self.is_pass = false;
        self.flipped.clear();
    }
}

impl Default for Game {
    fn default() -> Self {
        Self {
            params: GameParameters::default(),
            board: Board::default(),
            status: GameStatus::AwaitingMove(Player::Black),
            passes: TurnRecord::default(),
            is_pass: false,
            flipped: Vec::new(),
        }
    }
}
