//! Maze-chase simulation core with a review-quota gate.
//!
//! [`Session`] is driven by an external scheduler through [`Session::tick`];
//! the host reads a [`Snapshot`] every tick for drawing and drains
//! [`Outcome`]s into a [`QuotaLedger`], which in turn gates the next
//! [`Session::start`].

pub mod collision;
pub mod config;
pub mod error;
pub mod ghost;
pub mod ledger;
pub mod level;
pub mod maze;
pub mod motion;
pub mod pellet;
pub mod session;

pub use config::{HostConfig, SessionConfig};
pub use error::{MazeError, SessionError, StoreError};
pub use ghost::{Ghost, GhostKind, GhostMode};
pub use ledger::{QuotaLedger, SettingsStore};
pub use level::{Level, Spawn};
pub use maze::{Cell, Dir, Maze, Pos};
pub use motion::Actor;
pub use pellet::PelletCycle;
pub use session::{
    quota_for_score, GameState, OpenGate, Outcome, PlayGate, Session, Snapshot,
};
