//! Error types for level parsing, session transitions and the settings store.
//!
//! The per-tick simulation never fails; these only cover building a level,
//! refusing a `start()` and reading/writing the settings file.

use thiserror::Error;

use crate::session::GameState;

/// Raised while turning an ASCII layout into a [`Level`](crate::level::Level).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    #[error("layout has no rows")]
    Empty,

    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown glyph {glyph:?} at ({x}, {y})")]
    UnknownGlyph { glyph: char, x: usize, y: usize },

    #[error("tunnel row {row} outside a maze of height {height}")]
    TunnelOutOfRange { row: usize, height: usize },

    #[error("{what} at ({x}, {y}) lies outside the {width}x{height} grid")]
    OutOfBounds {
        what: &'static str,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("{what} at ({x}, {y}) sits on a wall")]
    Blocked { what: &'static str, x: usize, y: usize },
}

/// Raised when a session refuses a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("review quota outstanding: {remaining} card(s) left")]
    QuotaOutstanding { remaining: u32 },

    #[error("cannot start a game while {from:?}")]
    InvalidTransition { from: GameState },
}

/// Raised by [`SettingsStore`](crate::ledger::SettingsStore) writes.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
