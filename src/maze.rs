//! Grid cells, directions and the mutable maze with its dot bookkeeping.

use crate::error::MazeError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Wall,
    Empty,
    Dot,
    PowerPellet,
}

impl Cell {
    fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '#' => Some(Cell::Wall),
            ' ' => Some(Cell::Empty),
            '.' => Some(Cell::Dot),
            'o' => Some(Cell::PowerPellet),
            _ => None,
        }
    }

    pub fn is_edible(self) -> bool {
        matches!(self, Cell::Dot | Cell::PowerPellet)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn manhattan(self, other: Pos) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    /// Fixed enumeration order; also the tie-break order for ghost targeting.
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// Points awarded for one consumption.
pub type ScoreDelta = u32;

pub const DOT_SCORE: ScoreDelta = 10;
pub const PELLET_SCORE: ScoreDelta = 50;

/// The playfield. Rows outside `tunnel_row` clamp at the border; the tunnel
/// row wraps horizontally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    width: usize,
    height: usize,
    grid: Vec<Vec<Cell>>,
    tunnel_row: usize,
    dots_left: usize,
}

impl Maze {
    /// Parses `#`, `.`, `o` and space glyphs into a maze.
    pub fn parse(rows: &[&str], tunnel_row: usize) -> Result<Self, MazeError> {
        let first = rows.first().ok_or(MazeError::Empty)?;
        let width = first.chars().count();
        if width == 0 {
            return Err(MazeError::Empty);
        }

        let mut grid = Vec::with_capacity(rows.len());
        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(MazeError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            let mut cells = Vec::with_capacity(width);
            for (x, glyph) in row.chars().enumerate() {
                let cell =
                    Cell::from_glyph(glyph).ok_or(MazeError::UnknownGlyph { glyph, x, y })?;
                cells.push(cell);
            }
            grid.push(cells);
        }

        let height = grid.len();
        if tunnel_row >= height {
            return Err(MazeError::TunnelOutOfRange {
                row: tunnel_row,
                height,
            });
        }

        let dots_left = grid
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| cell.is_edible())
            .count();

        Ok(Maze {
            width,
            height,
            grid,
            tunnel_row,
            dots_left,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tunnel_row(&self) -> usize {
        self.tunnel_row
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Out-of-grid positions read as walls.
    pub fn cell_at(&self, pos: Pos) -> Cell {
        if !self.contains(pos) {
            return Cell::Wall;
        }
        self.grid[pos.y][pos.x]
    }

    pub fn is_passable(&self, pos: Pos) -> bool {
        self.cell_at(pos) != Cell::Wall
    }

    pub fn dots_remaining(&self) -> usize {
        self.dots_left
    }

    /// Clears a dot or power pellet and reports its score. Empty and wall
    /// cells are left untouched.
    pub fn consume(&mut self, pos: Pos) -> Option<ScoreDelta> {
        let delta = match self.cell_at(pos) {
            Cell::Dot => DOT_SCORE,
            Cell::PowerPellet => PELLET_SCORE,
            Cell::Empty | Cell::Wall => return None,
        };
        self.grid[pos.y][pos.x] = Cell::Empty;
        self.dots_left -= 1;
        Some(delta)
    }

    /// In-grid neighbour of `pos`, without any passability check.
    pub fn offset(&self, pos: Pos, dir: Dir) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        let nx = pos.x as isize + dx;
        let ny = pos.y as isize + dy;
        if nx < 0 || ny < 0 {
            return None;
        }
        let next = Pos::new(nx as usize, ny as usize);
        self.contains(next).then_some(next)
    }

    /// True when the in-grid neighbour in `dir` is passable. Tunnel exits do
    /// not count.
    pub fn can_enter(&self, pos: Pos, dir: Dir) -> bool {
        self.offset(pos, dir)
            .is_some_and(|next| self.is_passable(next))
    }

    /// Where one step from `pos` in `dir` lands, or `None` when blocked.
    pub fn step(&self, pos: Pos, dir: Dir) -> Option<Pos> {
        if let Some(next) = self.offset(pos, dir) {
            return self.is_passable(next).then_some(next);
        }
        if pos.y != self.tunnel_row {
            return None;
        }
        match dir {
            Dir::Left if pos.x == 0 => Some(Pos::new(self.width - 1, pos.y)),
            Dir::Right if pos.x + 1 == self.width => Some(Pos::new(0, pos.y)),
            _ => None,
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.grid.iter().map(Vec::as_slice)
    }
}
