//! Session handles for front ends that cannot hold a [`Game`] directly.
//!
//! Games live in a process-wide registry. Every call locks the registry,
//! so actions against one session are applied strictly one after another.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, PoisonError};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::GameParameters;
use crate::error::{GameError, SessionError};
use crate::game::{Game, GameStatus, Placement, Skip};
use crate::types::{Cell, GameResult, GameState, Player, Score};

static SESSIONS: Lazy<Mutex<SessionRegistry>> = Lazy::new(|| Mutex::new(SessionRegistry::new()));

/// Opaque identifier of a running game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionHandle(u32);

impl SessionHandle {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Why an action was refused, in a form the front end can show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub reason: &'static str,
    pub message: String,
}

impl From<GameError> for Rejection {
    fn from(err: GameError) -> Self {
        Self {
            reason: err.code(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlaceResponse {
    Accepted {
        flipped: BTreeSet<Cell>,
        next_to_move: Option<Player>,
        result: Option<GameResult>,
    },
    Rejected(Rejection),
}

impl From<Result<Placement, GameError>> for PlaceResponse {
    fn from(outcome: Result<Placement, GameError>) -> Self {
        match outcome {
            Ok(placement) => PlaceResponse::Accepted {
                flipped: placement.flipped,
                next_to_move: placement.status.next_to_move(),
                result: placement.status.result(),
            },
            Err(err) => PlaceResponse::Rejected(err.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SkipResponse {
    Accepted {
        next_to_move: Option<Player>,
        result: Option<GameResult>,
    },
    Rejected(Rejection),
}

impl From<Result<Skip, GameError>> for SkipResponse {
    fn from(outcome: Result<Skip, GameError>) -> Self {
        match outcome {
            Ok(skip) => SkipResponse::Accepted {
                next_to_move: skip.status.next_to_move(),
                result: skip.status.result(),
            },
            Err(err) => SkipResponse::Rejected(err.into()),
        }
    }
}

/// Owns every live game, keyed by handle.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    next_id: u32,
    games: HashMap<SessionHandle, Game>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(skip(self))]
    pub fn create(&mut self, params: GameParameters) -> Result<SessionHandle, SessionError> {
        let game = Game::new(params)?;
        let handle = self.allocate_handle()?;
        self.games.insert(handle, game);
        debug!(session = handle.0, live = self.games.len(), "session created");
        Ok(handle)
    }

    /// Next id after the last one handed out that no live game holds.
    /// Ids wrap, so a long-lived registry reuses ids of ended sessions.
    fn allocate_handle(&mut self) -> Result<SessionHandle, SessionError> {
        if self.games.len() > u32::MAX as usize {
            return Err(SessionError::Exhausted);
        }
        loop {
            self.next_id = self.next_id.wrapping_add(1);
            let handle = SessionHandle(self.next_id);
            if !self.games.contains_key(&handle) {
                return Ok(handle);
            }
        }
    }

    pub fn game(&self, handle: SessionHandle) -> Result<&Game, SessionError> {
        self.games
            .get(&handle)
            .ok_or(SessionError::UnknownSession(handle.0))
    }

    fn game_mut(&mut self, handle: SessionHandle) -> Result<&mut Game, SessionError> {
        self.games
            .get_mut(&handle)
            .ok_or(SessionError::UnknownSession(handle.0))
    }

    /// Rule rejections come back inside the response; only an unknown
    /// handle is an error.
    pub fn try_place(
        &mut self,
        handle: SessionHandle,
        cell: Cell,
        player: Player,
    ) -> Result<PlaceResponse, SessionError> {
        Ok(self.game_mut(handle)?.place(cell, player).into())
    }

    pub fn try_skip(
        &mut self,
        handle: SessionHandle,
        player: Player,
    ) -> Result<SkipResponse, SessionError> {
        Ok(self.game_mut(handle)?.skip(player).into())
    }

    pub fn is_finished(&self, handle: SessionHandle) -> Result<bool, SessionError> {
        Ok(self.game(handle)?.is_finished())
    }

    pub fn scores(&self, handle: SessionHandle) -> Result<Score, SessionError> {
        Ok(self.game(handle)?.score())
    }

    pub fn status(&self, handle: SessionHandle) -> Result<GameStatus, SessionError> {
        Ok(self.game(handle)?.status())
    }

    pub fn state(&self, handle: SessionHandle) -> Result<GameState, SessionError> {
        Ok(self.game(handle)?.to_game_state())
    }

    pub fn legal_moves(&self, handle: SessionHandle) -> Result<Vec<Cell>, SessionError> {
        Ok(self.game(handle)?.legal_moves())
    }

    /// Discards a session. Returns `false` if it did not exist.
    pub fn end(&mut self, handle: SessionHandle) -> bool {
        let removed = self.games.remove(&handle).is_some();
        if removed {
            debug!(session = handle.0, "session ended");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

/// Runs `f` with exclusive access to the process-wide registry.
pub fn with_sessions<R>(f: impl FnOnce(&mut SessionRegistry) -> R) -> R {
    // `Game` validates before it writes, so a poisoned lock still guards
    // consistent games.
    let mut registry = SESSIONS.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut registry)
}

pub fn new_game(rows: usize, cols: usize) -> Result<SessionHandle, SessionError> {
    new_game_with(GameParameters::new(rows, cols))
}

pub fn new_game_with(params: GameParameters) -> Result<SessionHandle, SessionError> {
    with_sessions(|sessions| sessions.create(params))
}

pub fn try_place(handle: SessionHandle, cell: Cell, player: Player) -> Result<PlaceResponse, SessionError> {
    with_sessions(|sessions| sessions.try_place(handle, cell, player))
}

pub fn try_skip(handle: SessionHandle, player: Player) -> Result<SkipResponse, SessionError> {
    with_sessions(|sessions| sessions.try_skip(handle, player))
}

pub fn is_finished(handle: SessionHandle) -> Result<bool, SessionError> {
    with_sessions(|sessions| sessions.is_finished(handle))
}

pub fn scores(handle: SessionHandle) -> Result<Score, SessionError> {
    with_sessions(|sessions| sessions.scores(handle))
}

pub fn state(handle: SessionHandle) -> Result<GameState, SessionError> {
    with_sessions(|sessions| sessions.state(handle))
}

pub fn legal_moves(handle: SessionHandle) -> Result<Vec<Cell>, SessionError> {
    with_sessions(|sessions| sessions.legal_moves(handle))
}

pub fn end_game(handle: SessionHandle) -> bool {
    with_sessions(|sessions| sessions.end(handle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(s: &str) -> Cell {
        s.parse().expect("valid label")
    }

    #[test]
    fn create_rejects_invalid_dimensions() {
        let mut registry = SessionRegistry::new();

        assert_eq!(
            registry.create(GameParameters::new(7, 8)),
            Err(SessionError::Game(GameError::InvalidDimensions { rows: 7, cols: 8 }))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn handles_are_distinct_and_independent() {
        let mut registry = SessionRegistry::new();
        let first = registry.create(GameParameters::default()).unwrap();
        let second = registry.create(GameParameters::new(6, 6)).unwrap();

        assert_ne!(first, second);
        registry.try_place(first, label("D3"), Player::Black).unwrap();

        assert_eq!(registry.scores(first).unwrap().black, 4);
        assert_eq!(registry.scores(second).unwrap().black, 2);
        assert_eq!(registry.state(second).unwrap().rows, 6);
    }

    #[test]
    fn wrapped_ids_skip_live_sessions() {
        let mut registry = SessionRegistry::new();
        let first = registry.create(GameParameters::default()).unwrap();
        registry.try_place(first, label("D3"), Player::Black).unwrap();

        registry.next_id = u32::MAX;
        let wrapped = registry.create(GameParameters::new(6, 6)).unwrap();
        let after = registry.create(GameParameters::new(4, 4)).unwrap();

        assert_eq!(wrapped.raw(), 0);
        assert_ne!(after, first);
        assert_eq!(after.raw(), 2);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.scores(first).unwrap().black, 4);
        assert_eq!(registry.state(after).unwrap().rows, 4);
    }

    #[test]
    fn accepted_placement_reports_flips_and_next_side() {
        let mut registry = SessionRegistry::new();
        let handle = registry.create(GameParameters::default()).unwrap();

        let response = registry.try_place(handle, label("D3"), Player::Black).unwrap();

        assert_eq!(
            response,
            PlaceResponse::Accepted {
                flipped: BTreeSet::from([label("D4")]),
                next_to_move: Some(Player::White),
                result: None,
            }
        );
    }

    #[test]
    fn rejections_carry_reason_codes() {
        let mut registry = SessionRegistry::new();
        let handle = registry.create(GameParameters::default()).unwrap();

        let PlaceResponse::Rejected(rejection) =
            registry.try_place(handle, label("E4"), Player::Black).unwrap()
        else {
            panic!("placing on an occupied cell must be rejected");
        };
        assert_eq!(rejection.reason, "occupied_cell");
        assert_eq!(rejection.message, "cell E4 is already occupied");

        let SkipResponse::Rejected(rejection) = registry.try_skip(handle, Player::Black).unwrap()
        else {
            panic!("skip with moves available must be rejected");
        };
        assert_eq!(rejection.reason, "skip_while_move_available");
    }

    #[test]
    fn unknown_handles_are_errors() {
        let mut registry = SessionRegistry::new();
        let stray = SessionHandle::from_raw(42);

        assert_eq!(
            registry.try_place(stray, label("D3"), Player::Black),
            Err(SessionError::UnknownSession(42))
        );
        assert_eq!(registry.is_finished(stray), Err(SessionError::UnknownSession(42)));
        assert!(!registry.end(stray));
    }

    #[test]
    fn ended_session_is_gone() {
        let mut registry = SessionRegistry::new();
        let handle = registry.create(GameParameters::default()).unwrap();

        assert!(registry.end(handle));
        assert_eq!(
            registry.scores(handle),
            Err(SessionError::UnknownSession(handle.raw()))
        );
    }

    #[test]
    fn responses_serialize_with_status_tag() {
        let accepted = PlaceResponse::Accepted {
            flipped: BTreeSet::from([Cell::new(3, 3)]),
            next_to_move: Some(Player::White),
            result: None,
        };
        assert_eq!(
            serde_json::to_value(&accepted).unwrap(),
            serde_json::json!({
                "status": "accepted",
                "flipped": [{"row": 3, "col": 3}],
                "next_to_move": "white",
                "result": null,
            })
        );

        let rejected = SkipResponse::from(Err(GameError::OperationAfterGameFinished));
        assert_eq!(
            serde_json::to_value(&rejected).unwrap(),
            serde_json::json!({
                "status": "rejected",
                "reason": "operation_after_game_finished",
                "message": "the game is already finished",
            })
        );
    }

    #[test]
    fn global_registry_runs_a_session_end_to_end() {
        let handle = new_game(8, 8).unwrap();

        assert!(!is_finished(handle).unwrap());
        assert!(matches!(
            try_place(handle, label("D3"), Player::Black).unwrap(),
            PlaceResponse::Accepted { .. }
        ));
        assert_eq!(state(handle).unwrap().current_player, Some(Player::White));
        assert_eq!(legal_moves(handle).unwrap().len(), 3);
        assert_eq!(scores(handle).unwrap(), scores(handle).unwrap());
        assert!(matches!(
            try_skip(handle, Player::White).unwrap(),
            SkipResponse::Rejected(_)
        ));
        assert!(end_game(handle));
        assert_eq!(is_finished(handle), Err(SessionError::UnknownSession(handle.raw())));
    }

    #[test]
    fn global_registry_rejects_bad_setup() {
        assert_eq!(
            new_game(5, 8),
            Err(SessionError::Game(GameError::InvalidDimensions { rows: 5, cols: 8 }))
        );
    }
}
