use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::types::MAX_LABELLED_COLUMNS;

pub const DEFAULT_ROWS: usize = 8;
pub const DEFAULT_COLUMNS: usize = 8;
pub const MIN_DIMENSION: usize = 4;
/// Upper bound on `rows * cols`; keeps the grid allocation bounded on
/// 32-bit targets.
pub const MAX_CELLS: usize = 1 << 16;

/// Setup parameters for a new game, loadable from any serde source.
///
/// `number_of_players` is informational for the front end (one player means
/// White is driven from outside the engine); the rules are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameParameters {
    pub number_of_rows: usize,
    pub number_of_columns: usize,
    pub number_of_players: u8,
}

impl Default for GameParameters {
    fn default() -> Self {
        GameParameters {
            number_of_rows: DEFAULT_ROWS,
            number_of_columns: DEFAULT_COLUMNS,
            number_of_players: 2,
        }
    }
}

impl GameParameters {
    pub fn new(number_of_rows: usize, number_of_columns: usize) -> Self {
        GameParameters {
            number_of_rows,
            number_of_columns,
            ..Self::default()
        }
    }

    /// Rejects layouts without a symmetric centre, grids past [`MAX_CELLS`]
    /// and unsupported player counts.
    pub fn validate(&self) -> Result<(), GameError> {
        let valid_dimension = |n: usize| n >= MIN_DIMENSION && n % 2 == 0;
        if !valid_dimension(self.number_of_rows)
            || !valid_dimension(self.number_of_columns)
            || self.number_of_columns > MAX_LABELLED_COLUMNS
            || self
                .number_of_rows
                .checked_mul(self.number_of_columns)
                .is_none_or(|cells| cells > MAX_CELLS)
        {
            return Err(GameError::InvalidDimensions {
                rows: self.number_of_rows,
                cols: self.number_of_columns,
            });
        }
        if !(1..=2).contains(&self.number_of_players) {
            return Err(GameError::InvalidPlayerCount(self.number_of_players));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;

    #[test]
    fn default_is_standard_two_player_board() {
        let params = GameParameters::default();
        assert_eq!(params.number_of_rows, 8);
        assert_eq!(params.number_of_columns, 8);
        assert_eq!(params.number_of_players, 2);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn odd_or_small_dimensions_are_rejected() {
        for (rows, cols) in [(7, 8), (8, 7), (2, 8), (8, 2), (0, 0), (5, 5), (8, 28)] {
            assert_eq!(
                GameParameters::new(rows, cols).validate(),
                Err(GameError::InvalidDimensions { rows, cols }),
                "{rows}x{cols}"
            );
        }
    }

    #[test]
    fn oversized_row_counts_are_rejected_without_overflow() {
        for rows in [usize::MAX - 1, usize::MAX / 2 + 1, MAX_CELLS] {
            assert_eq!(
                GameParameters::new(rows, 26).validate(),
                Err(GameError::InvalidDimensions { rows, cols: 26 }),
                "{rows}x26"
            );
        }
        assert!(Game::with_dimensions(usize::MAX - 1, 4).is_err());
        assert!(GameParameters::new(MAX_CELLS / 4, 4).validate().is_ok());
    }

    #[test]
    fn rectangular_even_boards_are_accepted() {
        for (rows, cols) in [(4, 4), (4, 10), (12, 6), (30, 26)] {
            assert!(GameParameters::new(rows, cols).validate().is_ok());
        }
    }

    #[test]
    fn player_count_must_be_one_or_two() {
        let mut params = GameParameters::default();
        params.number_of_players = 3;
        assert_eq!(params.validate(), Err(GameError::InvalidPlayerCount(3)));
        params.number_of_players = 0;
        assert_eq!(params.validate(), Err(GameError::InvalidPlayerCount(0)));
        params.number_of_players = 1;
        assert!(params.validate().is_ok());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let params: GameParameters =
            serde_json::from_str(r#"{"number_of_rows": 6}"#).expect("valid json");
        assert_eq!(params, GameParameters::new(6, 8));
    }
}
