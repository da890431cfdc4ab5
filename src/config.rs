//! Session tuning and host settings loaded from the environment.

use std::env;
use std::path::PathBuf;

use directories::ProjectDirs;

const DEFAULT_TICK_MS: u64 = 22;
const DEFAULT_MOVE_EVERY: u32 = 8;
const DEFAULT_RESPAWN_PAUSE_MS: u64 = 1000;
const SETTINGS_FILE: &str = "pacman_settings.json";

/// Timing knobs of the simulation core, in ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// A movement step fires once every `move_every` ticks.
    pub move_every: u32,
    /// Ticks the session sits idle after a non-final life loss.
    pub respawn_pause_ticks: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            move_every: DEFAULT_MOVE_EVERY,
            respawn_pause_ticks: ticks_for(DEFAULT_RESPAWN_PAUSE_MS, DEFAULT_TICK_MS),
        }
    }
}

/// Everything the terminal host needs to drive a session.
#[derive(Clone, Debug)]
pub struct HostConfig {
    pub tick_ms: u64,
    pub session: SessionConfig,
    pub seed: Option<u64>,
    pub settings_path: PathBuf,
    pub log_dir: PathBuf,
}

impl HostConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `PACMAN_TICK_MS` - Milliseconds per tick (default: 22)
    /// - `PACMAN_MOVE_EVERY` - Ticks per movement step (default: 8)
    /// - `PACMAN_RESPAWN_PAUSE_MS` - Pause after losing a life (default: 1000)
    /// - `PACMAN_SEED` - Fixed seed for ghost AI (default: entropy)
    /// - `PACMAN_SETTINGS` - Settings file (default: platform data dir)
    pub fn from_env() -> Self {
        let tick_ms = read_env::<u64>("PACMAN_TICK_MS")
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_TICK_MS);
        let move_every = read_env::<u32>("PACMAN_MOVE_EVERY")
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_MOVE_EVERY);
        let pause_ms =
            read_env::<u64>("PACMAN_RESPAWN_PAUSE_MS").unwrap_or(DEFAULT_RESPAWN_PAUSE_MS);

        let dirs = ProjectDirs::from("", "", "pacman-quota");
        let settings_path = env::var_os("PACMAN_SETTINGS")
            .map(PathBuf::from)
            .unwrap_or_else(|| match &dirs {
                Some(dirs) => dirs.data_dir().join(SETTINGS_FILE),
                None => PathBuf::from(SETTINGS_FILE),
            });
        let log_dir = match &dirs {
            Some(dirs) => dirs.cache_dir().join("logs"),
            None => PathBuf::from("logs"),
        };

        Self {
            tick_ms,
            session: SessionConfig {
                move_every,
                respawn_pause_ticks: ticks_for(pause_ms, tick_ms),
            },
            seed: read_env::<u64>("PACMAN_SEED"),
            settings_path,
            log_dir,
        }
    }
}

fn ticks_for(ms: u64, tick_ms: u64) -> u32 {
    u32::try_from(ms / tick_ms.max(1)).unwrap_or(u32::MAX)
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
