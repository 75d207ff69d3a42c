//! Capture detection: the direction scanner and the move validator.
//!
//! Everything here is a pure function of the board; applying a move is the
//! job of [`Game`](crate::game::Game).

use std::collections::BTreeSet;

use crate::board::Board;
use crate::error::GameError;
use crate::types::{Cell, Direction, Player, Side};

/// A closed line of opponent disks that flips when the mover places at the
/// origin. Cells are ordered outward from the origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRun {
    pub direction: Direction,
    pub cells: Vec<Cell>,
}

/// Walks from `origin` along `direction` and returns the opponent disks
/// bracketed by a `mover` disk. Runs that reach an empty cell or the edge
/// before closing capture nothing.
pub fn scan(board: &Board, origin: Cell, direction: Direction, mover: Player) -> Option<CaptureRun> {
    let me = Side::from(mover);
    let opp = Side::from(mover.opponent());

    let mut cells = Vec::new();
    let mut cursor = board.neighbor(origin, direction);

    while let Some(cell) = cursor {
        let side = board.get(cell).ok()?;
        if side == opp {
            cells.push(cell);
        } else if side == me {
            return (!cells.is_empty()).then_some(CaptureRun { direction, cells });
        } else {
            return None;
        }
        cursor = board.neighbor(cell, direction);
    }

    None
}

/// Returns every disk that placing `player` at `cell` would flip.
///
/// The origin itself is not part of the result. Occupied targets are
/// rejected before any direction is scanned.
pub fn validate(board: &Board, cell: Cell, player: Player) -> Result<BTreeSet<Cell>, GameError> {
    if !board.get(cell)?.is_empty() {
        return Err(GameError::OccupiedCell(cell));
    }

    let flips: BTreeSet<Cell> = Direction::ALL
        .into_iter()
        .filter_map(|direction| scan(board, cell, direction, player))
        .flat_map(|run| run.cells)
        .collect();

    if flips.is_empty() {
        return Err(GameError::NoCapture(cell));
    }
    Ok(flips)
}

pub fn is_legal(board: &Board, cell: Cell, player: Player) -> bool {
    validate(board, cell, player).is_ok()
}

/// Legal targets for `player` in row-major order.
pub fn legal_moves(board: &Board, player: Player) -> Vec<Cell> {
    board
        .cells()
        .filter(|&cell| is_legal(board, cell, player))
        .collect()
}

pub fn has_legal_move(board: &Board, player: Player) -> bool {
    board.cells().any(|cell| is_legal(board, cell, player))
}
