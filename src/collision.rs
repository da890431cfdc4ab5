use crate::ghost::{Ghost, GhostMode};
use crate::motion::Actor;

/// What a detected contact means for the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capture {
    /// Frightened ghost caught by the player.
    GhostEaten,
    /// Normal ghost caught the player.
    PlayerCaught,
}

/// Contact after both actors moved: same cell, or the two swapped cells
/// during the step.
pub fn collides(player: &Actor, ghost: &Ghost) -> bool {
    ghost.pos == player.pos || (ghost.prev_pos == player.pos && player.prev_pos == ghost.pos)
}

/// Classifies a contact. Eaten ghosts pass through the player harmlessly.
pub fn resolve(player: &Actor, ghost: &Ghost) -> Option<Capture> {
    if !collides(player, ghost) {
        return None;
    }
    match ghost.mode() {
        GhostMode::Frightened => Some(Capture::GhostEaten),
        GhostMode::Normal => Some(Capture::PlayerCaught),
        GhostMode::Eaten => None,
    }
}
