mod render;

use std::io::{self, Stdout};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use pacman_quota::{Dir, HostConfig, Level, Outcome, QuotaLedger, Session, SettingsStore};
use render::Renderer;

const RENDER_FPS: u64 = 60;

fn main() -> Result<()> {
    let config = HostConfig::from_env();
    let _guard = setup_logging(&config)?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &config);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

/// Logs go to a file; the terminal belongs to the game.
fn setup_logging(config: &HostConfig) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&config.log_dir)?;
    let file_appender = tracing_appender::rolling::never(&config.log_dir, "pacman.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    info!(log_dir = %config.log_dir.display(), "logging initialized");
    Ok(guard)
}

fn run(stdout: &mut Stdout, config: &HostConfig) -> Result<()> {
    let store = SettingsStore::new(config.settings_path.clone());
    let mut ledger = store.load();
    info!(
        path = %store.path().display(),
        can_play = ledger.can_play,
        outstanding = ledger.remaining(),
        "settings loaded"
    );

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = Session::new(Level::classic(), config.session, rng);
    let mut renderer = Renderer::new(session.maze().width(), session.maze().height());
    let tick = Duration::from_millis(config.tick_ms);
    let frame_time = Duration::from_micros(1_000_000 / RENDER_FPS);
    let mut last_tick = Instant::now();
    let mut last_outcome: Option<Outcome> = None;
    let mut notice: Option<String> = None;

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                continue;
            }
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char('p') => session.pause(),
                KeyCode::Char(' ') => match session.start(&ledger) {
                    Ok(()) => {
                        notice = None;
                        last_outcome = None;
                    }
                    Err(err) => {
                        info!(%err, "start refused");
                        notice = Some(err.to_string());
                    }
                },
                KeyCode::Char('c') => {
                    ledger.record_reviews(1);
                    notice = None;
                    persist(&store, &ledger);
                }
                code => {
                    if let Some(dir) = dir_for_key(code) {
                        session.set_intended_direction(dir);
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick {
            last_tick = Instant::now();
            session.tick();
            for outcome in session.drain_outcomes() {
                ledger.apply(&outcome);
                persist(&store, &ledger);
                last_outcome = Some(outcome);
            }
        }

        renderer.draw(
            stdout,
            session.maze(),
            &session.snapshot(),
            &ledger,
            last_outcome,
            notice.as_deref(),
        )?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn persist(store: &SettingsStore, ledger: &QuotaLedger) {
    if let Err(err) = store.save(ledger) {
        warn!(%err, path = %store.path().display(), "failed to save settings");
    }
}

fn dir_for_key(code: KeyCode) -> Option<Dir> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some(Dir::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Dir::Down),
        KeyCode::Left | KeyCode::Char('h') => Some(Dir::Left),
        KeyCode::Right | KeyCode::Char('l') => Some(Dir::Right),
        _ => None,
    }
}
