//! JavaScript bindings over the session registry.
//!
//! Players are passed as 1 = black, 2 = white. Rule rejections come back as
//! `{ status: "rejected", reason, message }` objects; thrown errors mean the
//! caller sent a bad handle or malformed input.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::GameParameters;
use crate::session::{self, SessionHandle};
use crate::types::{Cell, Player};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

#[wasm_bindgen]
pub fn new_game(rows: u32, cols: u32) -> Result<u32, JsError> {
    let handle = session::new_game(rows as usize, cols as usize)?;
    Ok(handle.raw())
}

/// Accepts `{ number_of_rows, number_of_columns, number_of_players }`;
/// missing fields take their defaults.
#[wasm_bindgen]
pub fn new_game_with_params(params: JsValue) -> Result<u32, JsError> {
    let params: GameParameters = if params.is_undefined() || params.is_null() {
        GameParameters::default()
    } else {
        serde_wasm_bindgen::from_value(params)?
    };
    let handle = session::new_game_with(params)?;
    Ok(handle.raw())
}

#[wasm_bindgen]
pub fn try_place(session: u32, row: u32, col: u32, player: u8) -> Result<JsValue, JsError> {
    let cell = Cell::new(row as usize, col as usize);
    let response = session::try_place(SessionHandle::from_raw(session), cell, parse_player(player)?)?;
    to_js(&response)
}

#[wasm_bindgen]
pub fn try_place_label(session: u32, label: &str, player: u8) -> Result<JsValue, JsError> {
    let cell = Cell::parse_label(label)?;
    let response = session::try_place(SessionHandle::from_raw(session), cell, parse_player(player)?)?;
    to_js(&response)
}

#[wasm_bindgen]
pub fn try_skip(session: u32, player: u8) -> Result<JsValue, JsError> {
    let response = session::try_skip(SessionHandle::from_raw(session), parse_player(player)?)?;
    to_js(&response)
}

#[wasm_bindgen]
pub fn is_finished(session: u32) -> Result<bool, JsError> {
    Ok(session::is_finished(SessionHandle::from_raw(session))?)
}

#[wasm_bindgen]
pub fn scores(session: u32) -> Result<JsValue, JsError> {
    to_js(&session::scores(SessionHandle::from_raw(session))?)
}

#[wasm_bindgen]
pub fn game_state(session: u32) -> Result<JsValue, JsError> {
    to_js(&session::state(SessionHandle::from_raw(session))?)
}

#[wasm_bindgen]
pub fn legal_moves(session: u32) -> Result<JsValue, JsError> {
    to_js(&session::legal_moves(SessionHandle::from_raw(session))?)
}

#[wasm_bindgen]
pub fn end_game(session: u32) -> bool {
    session::end_game(SessionHandle::from_raw(session))
}

fn parse_player(code: u8) -> Result<Player, JsError> {
    Player::from_code(code)
        .ok_or_else(|| JsError::new(&format!("invalid player code {code} (expected 1 or 2)")))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    Ok(serde_wasm_bindgen::to_value(value)?)
}
