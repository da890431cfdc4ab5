//! Review-quota bookkeeping kept by the host between games, and its JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::session::{Outcome, PlayGate};

/// Persistent player record: best score and the review cards owed before
/// another game may start.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotaLedger {
    pub high_score: u32,
    pub cards_quota: u32,
    pub cards_completed: u32,
    pub last_game_score: u32,
    pub can_play: bool,
    pub selected_deck_id: Option<i64>,
}

impl Default for QuotaLedger {
    fn default() -> Self {
        Self {
            high_score: 0,
            cards_quota: 0,
            cards_completed: 0,
            last_game_score: 0,
            can_play: true,
            selected_deck_id: None,
        }
    }
}

impl QuotaLedger {
    /// Folds a finished game into the record.
    pub fn apply(&mut self, outcome: &Outcome) {
        let score = outcome.final_score();
        self.last_game_score = score;
        self.high_score = self.high_score.max(score);
        self.cards_quota = outcome.quota();
        self.cards_completed = 0;
        self.can_play = matches!(outcome, Outcome::GameWon { .. });
        info!(
            score,
            quota = self.cards_quota,
            can_play = self.can_play,
            "ledger updated"
        );
    }

    /// Credits reviewed cards; play reopens once the quota is met.
    pub fn record_reviews(&mut self, count: u32) {
        self.cards_completed = self.cards_completed.saturating_add(count);
        if self.cards_completed >= self.cards_quota {
            self.can_play = true;
        }
    }

    pub fn remaining(&self) -> u32 {
        self.cards_quota.saturating_sub(self.cards_completed)
    }

    fn is_first_run(&self) -> bool {
        self.high_score == 0 && self.last_game_score == 0
    }
}

impl PlayGate for QuotaLedger {
    fn can_play(&self) -> bool {
        self.can_play
    }

    fn outstanding(&self) -> u32 {
        self.remaining()
    }
}

/// JSON file holding a [`QuotaLedger`].
#[derive(Clone, Debug)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the ledger. A missing or unreadable file yields a fresh,
    /// playable ledger; a record with no games played is always playable.
    pub fn load(&self) -> QuotaLedger {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) => {
                if self.path.exists() {
                    warn!(path = %self.path.display(), %err, "settings unreadable, using defaults");
                }
                return QuotaLedger::default();
            }
        };

        let mut ledger = match serde_json::from_str::<QuotaLedger>(&raw) {
            Ok(ledger) => ledger,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "settings malformed, using defaults");
                return QuotaLedger::default();
            }
        };

        if ledger.is_first_run() {
            ledger.can_play = true;
            ledger.cards_quota = 0;
            ledger.cards_completed = 0;
        }
        ledger
    }

    pub fn save(&self, ledger: &QuotaLedger) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(ledger)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, SettingsStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = SettingsStore::new(temp_dir.path().join("nested").join("settings.json"));
        (temp_dir, store)
    }

    #[test]
    fn game_over_closes_play_until_quota_met() {
        let mut ledger = QuotaLedger::default();
        ledger.apply(&Outcome::GameOver {
            final_score: 750,
            quota: 30,
        });
        assert!(!ledger.can_play());
        assert_eq!(ledger.remaining(), 30);
        assert_eq!(ledger.high_score, 750);
        assert_eq!(ledger.last_game_score, 750);

        ledger.record_reviews(29);
        assert!(!ledger.can_play());
        assert_eq!(ledger.outstanding(), 1);
        ledger.record_reviews(1);
        assert!(ledger.can_play());
        assert_eq!(ledger.remaining(), 0);
    }

    #[test]
    fn win_clears_quota_and_keeps_best_score() {
        let mut ledger = QuotaLedger {
            high_score: 2000,
            cards_quota: 40,
            cards_completed: 5,
            can_play: false,
            ..QuotaLedger::default()
        };
        ledger.apply(&Outcome::GameWon { final_score: 1900 });
        assert!(ledger.can_play);
        assert_eq!(ledger.cards_quota, 0);
        assert_eq!(ledger.cards_completed, 0);
        assert_eq!(ledger.high_score, 2000);
        assert_eq!(ledger.last_game_score, 1900);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let (_temp, store) = setup();
        assert_eq!(store.load(), QuotaLedger::default());
    }

    #[test]
    fn malformed_file_loads_defaults() {
        let (_temp, store) = setup();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();
        assert!(store.load().can_play);
    }

    #[test]
    fn save_then_load_keeps_outstanding_quota() {
        let (_temp, store) = setup();
        let mut ledger = QuotaLedger::default();
        ledger.apply(&Outcome::GameOver {
            final_score: 120,
            quota: 20,
        });
        ledger.record_reviews(3);
        store.save(&ledger).unwrap();

        let loaded = store.load();
        assert_eq!(loaded, ledger);
        assert_eq!(loaded.remaining(), 17);
    }

    #[test]
    fn missing_keys_take_defaults_and_first_run_is_playable() {
        let (_temp, store) = setup();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"cards_quota": 20, "can_play": false}"#).unwrap();

        let loaded = store.load();
        assert!(loaded.can_play);
        assert_eq!(loaded.cards_quota, 0);
        assert_eq!(loaded.selected_deck_id, None);
    }
}
