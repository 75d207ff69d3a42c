use std::fmt;
use std::str::FromStr;

use crate::error::{BoardParseError, GameError};
use crate::types::{Cell, Direction, Score, Side};

/// Rectangular grid of cells stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Side>,
}

impl Board {
    /// Creates an all-empty board. Dimensions are validated by
    /// [`GameParameters`](crate::config::GameParameters), not here.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Side::Empty; rows * cols],
        }
    }

    /// Creates the starting position: the centre 2x2 block holds
    /// white/black on the top row and black/white on the bottom row
    /// (d4=white, e4=black, d5=black, e5=white on 8x8).
    pub fn seeded(rows: usize, cols: usize) -> Self {
        let mut board = Self::empty(rows, cols);
        let (r, c) = (rows / 2, cols / 2);
        if r >= 1 && c >= 1 {
            board.cells[(r - 1) * cols + (c - 1)] = Side::White;
            board.cells[(r - 1) * cols + c] = Side::Black;
            board.cells[r * cols + (c - 1)] = Side::Black;
            board.cells[r * cols + c] = Side::White;
        }
        board
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    pub fn get(&self, cell: Cell) -> Result<Side, GameError> {
        self.index(cell).map(|idx| self.cells[idx])
    }

    /// Overwrites the cell unconditionally; used for placing and flipping.
    pub fn set(&mut self, cell: Cell, side: Side) -> Result<(), GameError> {
        let idx = self.index(cell)?;
        self.cells[idx] = side;
        Ok(())
    }

    /// Returns the adjacent cell in `direction`, or `None` past the edge.
    pub fn neighbor(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        let (dr, dc) = direction.delta();
        let row = cell.row.checked_add_signed(dr)?;
        let col = cell.col.checked_add_signed(dc)?;
        let next = Cell::new(row, col);
        self.contains(next).then_some(next)
    }

    /// All coordinates in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Cell::new(row, col)))
    }

    pub fn score(&self) -> Score {
        let mut score = Score::default();
        for side in &self.cells {
            match side {
                Side::Empty => score.empty += 1,
                Side::Black => score.black += 1,
                Side::White => score.white += 1,
            }
        }
        score
    }

    /// Converts board to row-major codes where 0=empty, 1=black, 2=white.
    pub fn to_vec(&self) -> Vec<u8> {
        self.cells.iter().map(|side| side.to_u8()).collect()
    }

    fn index(&self, cell: Cell) -> Result<usize, GameError> {
        if !self.contains(cell) {
            return Err(GameError::OutOfBounds {
                cell,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(cell.row * self.cols + cell.col)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::seeded(8, 8)
    }
}

fn side_char(side: Side) -> char {
    match side {
        Side::Empty => '.',
        Side::Black => 'B',
        Side::White => 'W',
    }
}

/// One line per row: `.` empty, `B` black, `W` white.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.cols.max(1)).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for side in row {
                write!(f, "{}", side_char(*side))?;
            }
        }
        Ok(())
    }
}

/// Parses the [`Display`](fmt::Display) form. Blank lines and surrounding
/// whitespace are ignored.
impl FromStr for Board {
    type Err = BoardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let cols = lines.first().ok_or(BoardParseError::Empty)?.chars().count();

        let mut cells = Vec::with_capacity(lines.len() * cols);
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(BoardParseError::RaggedRow {
                    row,
                    expected: cols,
                    found,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                cells.push(match ch {
                    '.' => Side::Empty,
                    'B' | 'b' => Side::Black,
                    'W' | 'w' => Side::White,
                    _ => return Err(BoardParseError::UnexpectedChar { ch, row, col }),
                });
            }
        }

        Ok(Self {
            rows: lines.len(),
            cols,
            cells,
        })
    }
}
