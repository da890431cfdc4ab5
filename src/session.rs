//! The tick-driven game session: owns the maze and actors, runs one movement
//! step every `move_every` ticks and reports outcomes to the host.

use rand::Rng;
use tracing::{debug, info};

use crate::collision::{resolve, Capture};
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::ghost::{Ghost, GhostKind, GhostMode};
use crate::level::Level;
use crate::maze::{Cell, Dir, Maze, Pos};
use crate::motion::Actor;
use crate::pellet::PelletCycle;

pub const STARTING_LIVES: u32 = 3;
pub const GHOST_SCORE: u32 = 200;

const MOUTH_FRAME_TICKS: u64 = 8;
const BLINK_TICKS: u64 = 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Stopped,
    Running,
    Paused,
    GameOver,
}

/// Terminal results, handed to the host exactly once each.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    GameOver { final_score: u32, quota: u32 },
    GameWon { final_score: u32 },
}

impl Outcome {
    pub fn final_score(&self) -> u32 {
        match *self {
            Outcome::GameOver { final_score, .. } | Outcome::GameWon { final_score } => final_score,
        }
    }

    /// Review cards owed after this outcome. Winning owes nothing.
    pub fn quota(&self) -> u32 {
        match *self {
            Outcome::GameOver { quota, .. } => quota,
            Outcome::GameWon { .. } => 0,
        }
    }
}

/// Review cards owed after losing with `score`.
pub fn quota_for_score(score: u32) -> u32 {
    match score {
        0..=499 => 20,
        500..=999 => 30,
        _ => 40,
    }
}

/// Host capability consulted when a game is started.
pub trait PlayGate {
    fn can_play(&self) -> bool;

    /// Cards still owed, reported when play is refused.
    fn outstanding(&self) -> u32 {
        0
    }
}

/// Gate that never refuses.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenGate;

impl PlayGate for OpenGate {
    fn can_play(&self) -> bool {
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActorView {
    pub pos: Pos,
    pub dir: Dir,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GhostView {
    pub kind: GhostKind,
    pub pos: Pos,
    pub dir: Dir,
    pub mode: GhostMode,
}

/// Read-only view for the renderer, valid between ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub state: GameState,
    pub score: u32,
    pub lives: u32,
    pub dots_left: usize,
    pub player: ActorView,
    pub ghosts: [GhostView; 4],
    pub power_steps_left: u32,
    pub flashing: bool,
    pub respawning: bool,
    pub mouth_frame: u8,
    pub blink: bool,
}

pub struct Session<R> {
    config: SessionConfig,
    level: Level,
    maze: Maze,
    player: Actor,
    ghosts: [Ghost; 4],
    pellets: PelletCycle,
    state: GameState,
    score: u32,
    lives: u32,
    move_counter: u32,
    respawn_pause: u32,
    anim_ticks: u64,
    outcomes: Vec<Outcome>,
    rng: R,
}

impl<R: Rng> Session<R> {
    /// A stopped session on a fresh copy of `level`.
    pub fn new(level: Level, config: SessionConfig, rng: R) -> Self {
        let maze = level.maze().clone();
        let player = Actor::spawn(level.player_spawn());
        let ghosts = spawn_ghosts(&level);
        Self {
            config,
            level,
            maze,
            player,
            ghosts,
            pellets: PelletCycle::default(),
            state: GameState::Stopped,
            score: 0,
            lives: STARTING_LIVES,
            move_counter: 0,
            respawn_pause: 0,
            anim_ticks: 0,
            outcomes: Vec::new(),
            rng,
        }
    }

    /// Resets score, lives, maze and actors and begins play.
    pub fn start(&mut self, gate: &impl PlayGate) -> Result<(), SessionError> {
        if matches!(self.state, GameState::Running | GameState::Paused) {
            return Err(SessionError::InvalidTransition { from: self.state });
        }
        if !gate.can_play() {
            return Err(SessionError::QuotaOutstanding {
                remaining: gate.outstanding(),
            });
        }

        self.maze = self.level.maze().clone();
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.pellets.reset();
        self.move_counter = 0;
        self.respawn_pause = 0;
        self.anim_ticks = 0;
        self.reset_actors();
        self.state = GameState::Running;
        info!(dots = self.maze.dots_remaining(), "game started");
        Ok(())
    }

    /// Toggles between running and paused; ignored in any other state.
    pub fn pause(&mut self) {
        self.state = match self.state {
            GameState::Running => GameState::Paused,
            GameState::Paused => GameState::Running,
            other => {
                debug!(state = ?other, "pause ignored");
                return;
            }
        };
        info!(state = ?self.state, "pause toggled");
    }

    /// Latches the direction the player wants to go; applied on the next
    /// movement step when that way is open.
    pub fn set_intended_direction(&mut self, dir: Dir) {
        self.player.intended = dir;
    }

    /// Advances one tick. Does nothing unless running.
    pub fn tick(&mut self) {
        if self.state != GameState::Running {
            return;
        }
        if self.respawn_pause > 0 {
            self.respawn_pause -= 1;
            return;
        }

        self.anim_ticks += 1;
        self.move_counter += 1;
        if self.move_counter >= self.config.move_every.max(1) {
            self.move_counter = 0;
            self.movement_step();
        }
    }

    /// Hands over outcomes produced since the last call.
    pub fn drain_outcomes(&mut self) -> Vec<Outcome> {
        std::mem::take(&mut self.outcomes)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            score: self.score,
            lives: self.lives,
            dots_left: self.maze.dots_remaining(),
            player: ActorView {
                pos: self.player.pos,
                dir: self.player.dir,
            },
            ghosts: self.ghosts.each_ref().map(|ghost| GhostView {
                kind: ghost.kind,
                pos: ghost.pos,
                dir: ghost.dir,
                mode: ghost.mode(),
            }),
            power_steps_left: self.pellets.remaining(),
            flashing: self.pellets.is_flashing(),
            respawning: self.respawn_pause > 0,
            mouth_frame: ((self.anim_ticks / MOUTH_FRAME_TICKS) % 4) as u8,
            blink: (self.anim_ticks / BLINK_TICKS) % 2 == 1,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn dots_left(&self) -> usize {
        self.maze.dots_remaining()
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn player(&self) -> &Actor {
        &self.player
    }

    pub fn ghosts(&self) -> &[Ghost; 4] {
        &self.ghosts
    }

    fn movement_step(&mut self) {
        if self.pellets.decay() {
            self.ghosts.iter_mut().for_each(Ghost::calm);
            debug!("power pellet expired");
        }

        self.player.advance(&self.maze);
        self.eat_at_player();

        let target = self.player.pos;
        let house = self.level.ghost_house();
        for idx in 0..self.ghosts.len() {
            let ghost = &mut self.ghosts[idx];
            if ghost.advance(&self.maze, target, house, &mut self.rng) {
                debug!(ghost = ?ghost.kind, "ghost back in the house");
            }

            match resolve(&self.player, &self.ghosts[idx]) {
                Some(Capture::GhostEaten) => {
                    self.ghosts[idx].eat();
                    self.score += GHOST_SCORE;
                    debug!(ghost = ?self.ghosts[idx].kind, score = self.score, "ghost eaten");
                }
                Some(Capture::PlayerCaught) => {
                    self.lose_life();
                    break;
                }
                None => {}
            }
        }

        // Clearing the maze wins even when the same step took the last life.
        if self.maze.dots_remaining() == 0 {
            self.win();
        }
    }

    fn eat_at_player(&mut self) {
        let pos = self.player.pos;
        let cell = self.maze.cell_at(pos);
        let Some(delta) = self.maze.consume(pos) else {
            return;
        };
        self.score += delta;
        debug!(?pos, score = self.score, dots = self.maze.dots_remaining(), "ate {:?}", cell);

        if cell == Cell::PowerPellet {
            self.pellets.activate();
            self.ghosts.iter_mut().for_each(Ghost::frighten);
        }
    }

    fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            let quota = quota_for_score(self.score);
            self.state = GameState::GameOver;
            self.outcomes.push(Outcome::GameOver {
                final_score: self.score,
                quota,
            });
            info!(score = self.score, quota, "game over");
            return;
        }

        self.reset_actors();
        self.pellets.reset();
        self.move_counter = 0;
        self.respawn_pause = self.config.respawn_pause_ticks;
        info!(lives = self.lives, score = self.score, "life lost");
    }

    fn win(&mut self) {
        if self.state == GameState::GameOver {
            if let Some(Outcome::GameOver { .. }) = self.outcomes.last() {
                self.outcomes.pop();
            }
        }
        self.state = GameState::Stopped;
        self.outcomes.push(Outcome::GameWon {
            final_score: self.score,
        });
        info!(score = self.score, "maze cleared");
    }

    fn reset_actors(&mut self) {
        self.player = Actor::spawn(self.level.player_spawn());
        self.ghosts = spawn_ghosts(&self.level);
    }
}

fn spawn_ghosts(level: &Level) -> [Ghost; 4] {
    let spawns = level.ghost_spawns();
    GhostKind::ALL.map(|kind| Ghost::spawn(kind, spawns[kind.index()]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn classic() -> Session<StdRng> {
        Session::new(
            Level::classic(),
            SessionConfig::default(),
            StdRng::seed_from_u64(11),
        )
    }

    #[test]
    fn quota_thresholds() {
        assert_eq!(quota_for_score(0), 20);
        assert_eq!(quota_for_score(499), 20);
        assert_eq!(quota_for_score(500), 30);
        assert_eq!(quota_for_score(750), 30);
        assert_eq!(quota_for_score(999), 30);
        assert_eq!(quota_for_score(1000), 40);
        assert_eq!(quota_for_score(1499), 40);
        assert_eq!(quota_for_score(1500), 40);
        assert_eq!(quota_for_score(u32::MAX), 40);
    }

    #[test]
    fn new_session_is_stopped_and_inert() {
        let mut session = classic();
        let before = session.snapshot();
        for _ in 0..100 {
            session.tick();
        }
        assert_eq!(session.state(), GameState::Stopped);
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn movement_waits_for_the_divisor() {
        let mut session = classic();
        session.start(&OpenGate).unwrap();
        let spawn = session.player().pos;
        for _ in 0..SessionConfig::default().move_every - 1 {
            session.tick();
        }
        assert_eq!(session.player().pos, spawn);
        session.tick();
        assert_ne!(session.player().pos, spawn);
    }

    #[test]
    fn animation_counters_advance_per_tick() {
        let mut session = classic();
        session.start(&OpenGate).unwrap();
        assert_eq!(session.snapshot().mouth_frame, 0);
        for _ in 0..MOUTH_FRAME_TICKS {
            session.tick();
        }
        assert_eq!(session.snapshot().mouth_frame, 1);
        assert!(!session.snapshot().blink);
        for _ in MOUTH_FRAME_TICKS..BLINK_TICKS {
            session.tick();
        }
        assert!(session.snapshot().blink);
    }

    #[test]
    fn outcomes_drain_once() {
        let mut session = classic();
        session.outcomes.push(Outcome::GameWon { final_score: 5 });
        assert_eq!(session.drain_outcomes(), vec![Outcome::GameWon { final_score: 5 }]);
        assert!(session.drain_outcomes().is_empty());
    }
}
