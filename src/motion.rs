//! Grid movement shared by the player and the ghosts.

use crate::level::Spawn;
use crate::maze::{Dir, Maze, Pos};

/// The player-controlled actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Actor {
    pub pos: Pos,
    pub prev_pos: Pos,
    pub dir: Dir,
    pub intended: Dir,
}

impl Actor {
    pub fn spawn(spawn: Spawn) -> Self {
        Self {
            pos: spawn.pos,
            prev_pos: spawn.pos,
            dir: spawn.dir,
            intended: spawn.dir,
        }
    }

    /// One movement step: latch the previous cell, take the intended turn if
    /// it is open, then advance.
    pub fn advance(&mut self, maze: &Maze) -> bool {
        self.prev_pos = self.pos;
        if self.intended != self.dir && maze.can_enter(self.pos, self.intended) {
            self.dir = self.intended;
        }
        step_in_place(maze, &mut self.pos, self.dir)
    }
}

/// Moves `pos` one cell in `dir`, wrapping through the tunnel row. Returns
/// false and leaves `pos` alone when blocked.
pub fn step_in_place(maze: &Maze, pos: &mut Pos, dir: Dir) -> bool {
    match maze.step(*pos, dir) {
        Some(next) => {
            *pos = next;
            true
        }
        None => false,
    }
}
