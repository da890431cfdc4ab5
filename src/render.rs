use std::io::{self, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use pacman_quota::{
    Cell, Dir, GameState, GhostKind, GhostMode, Maze, Outcome, Pos, QuotaLedger, Snapshot,
};

const CELL_W: usize = 2;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player(Dir, u8),
    Ghost,
    Frightened,
    Eyes,
    Wall,
    Empty,
    Dot,
    Power(bool),
}

#[derive(Clone, Copy, PartialEq)]
struct ScreenCell {
    glyph: Glyph,
    color: Color,
}

/// Diffing terminal renderer: only cells that changed since the last frame
/// are redrawn.
pub struct Renderer {
    last: Vec<ScreenCell>,
    last_hud: String,
    last_banner: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            last: vec![
                ScreenCell {
                    glyph: Glyph::Empty,
                    color: Color::Reset,
                };
                width * height
            ],
            last_hud: String::new(),
            last_banner: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }

    pub fn draw(
        &mut self,
        stdout: &mut Stdout,
        maze: &Maze,
        snap: &Snapshot,
        ledger: &QuotaLedger,
        last_outcome: Option<Outcome>,
        notice: Option<&str>,
    ) -> io::Result<()> {
        let needed_h = (maze.height() + 2) as u16;
        let needed_w = (maze.width() * CELL_W) as u16;

        stdout.queue(MoveTo(0, 0))?;

        let (term_w, term_h) = terminal::size()?;
        if term_w < needed_w || term_h < needed_h {
            stdout.queue(Clear(ClearType::All))?;
            let msg = format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            );
            stdout.queue(Print(msg))?;
            stdout.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
            stdout.queue(Clear(ClearType::All))?;
        }

        let hud = format!(
            "Score: {}  High: {}  Lives: {}  Dots: {}",
            snap.score,
            ledger.high_score.max(snap.score),
            snap.lives,
            snap.dots_left
        );
        self.draw_line(stdout, self.origin_y - 1, &hud, Color::White, LineSlot::Hud)?;

        for y in 0..maze.height() {
            for x in 0..maze.width() {
                let cell = cell_for(maze, snap, Pos::new(x, y));
                let idx = y * maze.width() + x;
                if self.needs_full || cell != self.last[idx] {
                    self.last[idx] = cell;
                    self.draw_cell(stdout, x, y, cell)?;
                }
            }
        }

        let banner = banner_for(snap, ledger, last_outcome, notice);
        let banner_y = self.origin_y + maze.height() as u16;
        self.draw_line(stdout, banner_y, &banner, Color::Yellow, LineSlot::Banner)?;
        self.needs_full = false;

        stdout.flush()
    }

    fn draw_line(
        &mut self,
        stdout: &mut Stdout,
        y: u16,
        text: &str,
        color: Color,
        slot: LineSlot,
    ) -> io::Result<()> {
        let last = match slot {
            LineSlot::Hud => &mut self.last_hud,
            LineSlot::Banner => &mut self.last_banner,
        };
        if !self.needs_full && text == last.as_str() {
            return Ok(());
        }
        stdout.queue(MoveTo(self.origin_x, y))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(SetForegroundColor(color))?;
        stdout.queue(Print(text))?;
        stdout.queue(ResetColor)?;
        *last = text.to_string();
        Ok(())
    }

    fn draw_cell(
        &self,
        stdout: &mut Stdout,
        x: usize,
        y: usize,
        cell: ScreenCell,
    ) -> io::Result<()> {
        let text = match cell.glyph {
            Glyph::Player(dir, frame) => player_text(dir, frame),
            Glyph::Ghost => "ᗣ ",
            Glyph::Frightened => "ᗣ ",
            Glyph::Eyes => "¨ ",
            Glyph::Wall => "██",
            Glyph::Empty => "  ",
            Glyph::Dot => "· ",
            Glyph::Power(true) => "● ",
            Glyph::Power(false) => "• ",
        };
        let x_pos = self.origin_x + (x * CELL_W) as u16;
        let y_pos = self.origin_y + y as u16;
        stdout.queue(MoveTo(x_pos, y_pos))?;
        stdout.queue(SetForegroundColor(cell.color))?;
        stdout.queue(Print(text))?;
        let w = UnicodeWidthStr::width(text);
        if w < CELL_W {
            for _ in 0..(CELL_W - w) {
                stdout.queue(Print(' '))?;
            }
        }
        stdout.queue(ResetColor)?;
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum LineSlot {
    Hud,
    Banner,
}

fn cell_for(maze: &Maze, snap: &Snapshot, pos: Pos) -> ScreenCell {
    if pos == snap.player.pos {
        return ScreenCell {
            glyph: Glyph::Player(snap.player.dir, snap.mouth_frame),
            color: Color::Yellow,
        };
    }
    if let Some(ghost) = snap.ghosts.iter().find(|g| g.pos == pos) {
        return match ghost.mode {
            GhostMode::Eaten => ScreenCell {
                glyph: Glyph::Eyes,
                color: Color::White,
            },
            GhostMode::Frightened => ScreenCell {
                glyph: Glyph::Frightened,
                color: if snap.flashing && snap.blink {
                    Color::White
                } else {
                    Color::Blue
                },
            },
            GhostMode::Normal => ScreenCell {
                glyph: Glyph::Ghost,
                color: ghost_color(ghost.kind),
            },
        };
    }
    match maze.cell_at(pos) {
        Cell::Wall => ScreenCell {
            glyph: Glyph::Wall,
            color: Color::DarkBlue,
        },
        Cell::Empty => ScreenCell {
            glyph: Glyph::Empty,
            color: Color::Reset,
        },
        Cell::Dot => ScreenCell {
            glyph: Glyph::Dot,
            color: Color::White,
        },
        Cell::PowerPellet => ScreenCell {
            glyph: Glyph::Power(snap.blink),
            color: Color::White,
        },
    }
}

fn ghost_color(kind: GhostKind) -> Color {
    match kind {
        GhostKind::Blinky => Color::Red,
        GhostKind::Pinky => Color::Magenta,
        GhostKind::Inky => Color::Cyan,
        GhostKind::Clyde => Color::DarkYellow,
    }
}

fn player_text(dir: Dir, frame: u8) -> &'static str {
    if frame % 2 == 1 {
        return "● ";
    }
    match dir {
        Dir::Up => "ᗢ ",
        Dir::Down => "ᗥ ",
        Dir::Left => "ᗤ ",
        Dir::Right => "ᗧ ",
    }
}

fn banner_for(
    snap: &Snapshot,
    ledger: &QuotaLedger,
    last_outcome: Option<Outcome>,
    notice: Option<&str>,
) -> String {
    if let Some(notice) = notice {
        return notice.to_string();
    }
    match snap.state {
        GameState::Running if snap.respawning => "Get ready...".to_string(),
        GameState::Running => "arrows/hjkl move  p pause  q quit".to_string(),
        GameState::Paused => "PAUSED - press p to resume".to_string(),
        GameState::Stopped if !ledger.can_play => format!(
            "Review {} more card(s) to play (c credits one)",
            ledger.remaining()
        ),
        GameState::Stopped => match last_outcome {
            Some(Outcome::GameWon { final_score }) => {
                format!("You won! Score: {}  SPACE to play again", final_score)
            }
            _ => "SPACE to start  q quit".to_string(),
        },
        GameState::GameOver => format!(
            "GAME OVER - Score: {}  Review {} card(s) before playing again",
            snap.score,
            ledger.remaining()
        ),
    }
}
