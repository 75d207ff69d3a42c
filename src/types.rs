use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CellParseError;

/// Widest board a game accepts: columns `A` through `Z`.
pub const MAX_LABELLED_COLUMNS: usize = 26;

/// Contents of one board cell.
///
/// Wire encoding: 0 = empty, 1 = black, 2 = white.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Side {
    #[default]
    Empty = 0,
    Black = 1,
    White = 2,
}

impl Side {
    /// Returns the owning player, or `None` for an empty cell.
    pub fn player(self) -> Option<Player> {
        match self {
            Side::Empty => None,
            Side::Black => Some(Player::Black),
            Side::White => Some(Player::White),
        }
    }

    /// Opposite colour. Empty has no opposite.
    pub fn opposite(self) -> Option<Side> {
        self.player().map(|p| p.opponent().into())
    }

    pub fn is_empty(self) -> bool {
        self == Side::Empty
    }

    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// A side that can move. Black always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// Wire code shared with [`Side`]: 1 = black, 2 = white.
    pub fn code(self) -> u8 {
        Side::from(self).to_u8()
    }

    pub fn from_code(code: u8) -> Option<Player> {
        match code {
            1 => Some(Player::Black),
            2 => Some(Player::White),
            _ => None,
        }
    }
}

impl From<Player> for Side {
    fn from(player: Player) -> Self {
        match player {
            Player::Black => Side::Black,
            Player::White => Side::White,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Black => f.write_str("Black"),
            Player::White => f.write_str("White"),
        }
    }
}

/// A zero-based board coordinate.
///
/// The human-readable label is the column letters followed by the
/// one-based row number: `Cell::new(2, 3)` is `D3`. Columns past `Z`
/// continue spreadsheet-style with `AA`, `AB`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Parses a label such as `"d3"` or `"D3"`.
    pub fn parse_label(label: &str) -> Result<Self, CellParseError> {
        label.parse()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut letters = Vec::new();
        let mut n = self.col + 1;
        while n > 0 {
            n -= 1;
            letters.push(char::from(b'A' + (n % 26) as u8));
            n /= 26;
        }
        let column: String = letters.into_iter().rev().collect();
        write!(f, "{column}{}", self.row + 1)
    }
}

impl FromStr for Cell {
    type Err = CellParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let first = s.chars().next().ok_or(CellParseError::Empty)?;
        let split = s
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(s.len());
        let (letters, digits) = s.split_at(split);
        if letters.is_empty() {
            return Err(CellParseError::InvalidColumn(first));
        }

        // Bijective base 26: A = 1, Z = 26, AA = 27.
        let col = letters
            .bytes()
            .try_fold(0usize, |acc, b| {
                let digit = (b.to_ascii_uppercase() - b'A') as usize + 1;
                acc.checked_mul(26)?.checked_add(digit)
            })
            .ok_or(CellParseError::InvalidColumn(first))?
            - 1;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CellParseError::InvalidRow(digits.to_string()));
        }
        let row: usize = digits
            .parse()
            .map_err(|_| CellParseError::InvalidRow(digits.to_string()))?;
        if row == 0 {
            return Err(CellParseError::InvalidRow(digits.to_string()));
        }

        Ok(Cell::new(row - 1, col))
    }
}

/// Disk counts derived from a board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    pub black: usize,
    pub white: usize,
    pub empty: usize,
}

impl Score {
    pub fn of(&self, player: Player) -> usize {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }

    /// Player with strictly more disks, `None` on a tie.
    pub fn leader(&self) -> Option<Player> {
        use std::cmp::Ordering;
        match self.black.cmp(&self.white) {
            Ordering::Greater => Some(Player::Black),
            Ordering::Less => Some(Player::White),
            Ordering::Equal => None,
        }
    }
}

/// How a finished game ended. A tie is not a win for either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "winner", rename_all = "snake_case")]
pub enum Outcome {
    Win(Player),
    Tie,
}

/// Final result after game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub outcome: Outcome,
    pub score: Score,
}

impl GameResult {
    pub fn from_score(score: Score) -> Self {
        let outcome = match score.leader() {
            Some(player) => Outcome::Win(player),
            None => Outcome::Tie,
        };
        Self { outcome, score }
    }

    pub fn winner(&self) -> Option<Player> {
        match self.outcome {
            Outcome::Win(player) => Some(player),
            Outcome::Tie => None,
        }
    }
}

/// Snapshot handed to the front end after every action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    pub rows: usize,
    pub cols: usize,
    /// Row-major cell codes: 0 = empty, 1 = black, 2 = white.
    pub board: Vec<u8>,
    /// `None` once the game is over.
    pub current_player: Option<Player>,
    pub black_count: usize,
    pub white_count: usize,
    pub is_game_over: bool,
    /// Contract:
    /// - `true` when the previous action was a pass.
    /// - `false` after a normal move or at the start of the game.
    pub is_pass: bool,
    /// Contract:
    /// - Normal move: cells flipped by that move, placed cell excluded.
    /// - Pass or new game: empty.
    pub flipped: Vec<Cell>,
    pub result: Option<GameResult>,
}

/// The eight compass directions a capture run can follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Left,
        Direction::TopLeft,
        Direction::Top,
        Direction::TopRight,
        Direction::Right,
        Direction::BottomRight,
        Direction::Bottom,
        Direction::BottomLeft,
    ];

    /// Returns `(d_row, d_col)`; rows grow downwards.
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Direction::Left => (0, -1),
            Direction::TopLeft => (-1, -1),
            Direction::Top => (-1, 0),
            Direction::TopRight => (-1, 1),
            Direction::Right => (0, 1),
            Direction::BottomRight => (1, 1),
            Direction::Bottom => (1, 0),
            Direction::BottomLeft => (1, -1),
        }
    }
}
