use crate::error::MazeError;
use crate::maze::{Dir, Maze, Pos};

const CLASSIC_LAYOUT: [&str; 22] = [
    "###################",
    "#........#........#",
    "#o##.###.#.###.##o#",
    "#.##.###.#.###.##.#",
    "#.................#",
    "#.##.#.#####.#.##.#",
    "#....#...#...#....#",
    "####.### # ###.####",
    "####.#       #.####",
    "####.# ## ## #.####",
    "    .  #   #  .    ",
    "####.# ##### #.####",
    "####.#       #.####",
    "####.# ##### #.####",
    "#........#........#",
    "#.##.###.#.###.##.#",
    "#o.#...........#.o#",
    "##.#.#.#####.#.#.##",
    "#....#...#...#....#",
    "#.######.#.######.#",
    "#.................#",
    "###################",
];
const CLASSIC_TUNNEL_ROW: usize = 10;

/// Where an actor appears at game start and after every lost life.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spawn {
    pub pos: Pos,
    pub dir: Dir,
}

impl Spawn {
    pub const fn new(x: usize, y: usize, dir: Dir) -> Self {
        Self {
            pos: Pos::new(x, y),
            dir,
        }
    }
}

/// A maze together with its fixed spawn table and ghost house.
#[derive(Clone, Debug)]
pub struct Level {
    maze: Maze,
    player_spawn: Spawn,
    ghost_spawns: [Spawn; 4],
    ghost_house: Pos,
}

impl Level {
    pub fn new(
        maze: Maze,
        player_spawn: Spawn,
        ghost_spawns: [Spawn; 4],
        ghost_house: Pos,
    ) -> Result<Self, MazeError> {
        check_open(&maze, "player spawn", player_spawn.pos)?;
        for spawn in &ghost_spawns {
            check_open(&maze, "ghost spawn", spawn.pos)?;
        }
        check_open(&maze, "ghost house", ghost_house)?;
        Ok(Self {
            maze,
            player_spawn,
            ghost_spawns,
            ghost_house,
        })
    }

    /// Builds a level from an ASCII layout.
    pub fn parse(
        rows: &[&str],
        tunnel_row: usize,
        player_spawn: Spawn,
        ghost_spawns: [Spawn; 4],
        ghost_house: Pos,
    ) -> Result<Self, MazeError> {
        let maze = Maze::parse(rows, tunnel_row)?;
        Self::new(maze, player_spawn, ghost_spawns, ghost_house)
    }

    /// The 19x22 arcade map with its tunnel on row 10.
    pub fn classic() -> Self {
        Self::parse(
            &CLASSIC_LAYOUT,
            CLASSIC_TUNNEL_ROW,
            Spawn::new(9, 16, Dir::Left),
            [
                Spawn::new(9, 9, Dir::Left),
                Spawn::new(10, 8, Dir::Up),
                Spawn::new(8, 8, Dir::Down),
                Spawn::new(11, 8, Dir::Right),
            ],
            Pos::new(9, 9),
        )
        .expect("classic layout is well-formed")
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn player_spawn(&self) -> Spawn {
        self.player_spawn
    }

    pub fn ghost_spawns(&self) -> [Spawn; 4] {
        self.ghost_spawns
    }

    pub fn ghost_house(&self) -> Pos {
        self.ghost_house
    }
}

fn check_open(maze: &Maze, what: &'static str, pos: Pos) -> Result<(), MazeError> {
    if !maze.contains(pos) {
        return Err(MazeError::OutOfBounds {
            what,
            x: pos.x,
            y: pos.y,
            width: maze.width(),
            height: maze.height(),
        });
    }
    if !maze.is_passable(pos) {
        return Err(MazeError::Blocked {
            what,
            x: pos.x,
            y: pos.y,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_level_matches_arcade_dimensions() {
        let level = Level::classic();
        let maze = level.maze();
        assert_eq!((maze.width(), maze.height()), (19, 22));
        assert_eq!(maze.tunnel_row(), 10);
        assert_eq!(level.ghost_house(), Pos::new(9, 9));
        assert_eq!(level.ghost_spawns()[0].pos, level.ghost_house());
    }

    #[test]
    fn classic_dot_count_matches_layout() {
        let counted = CLASSIC_LAYOUT
            .iter()
            .flat_map(|row| row.chars())
            .filter(|c| *c == '.' || *c == 'o')
            .count();
        assert_eq!(Level::classic().maze().dots_remaining(), counted);
    }

    #[test]
    fn rejects_spawn_on_wall() {
        let err = Level::parse(
            &["###", "# #", "###"],
            1,
            Spawn::new(0, 0, Dir::Left),
            [Spawn::new(1, 1, Dir::Left); 4],
            Pos::new(1, 1),
        )
        .unwrap_err();
        assert_eq!(
            err,
            MazeError::Blocked {
                what: "player spawn",
                x: 0,
                y: 0
            }
        );
    }

    #[test]
    fn rejects_house_outside_grid() {
        let err = Level::parse(
            &["###", "# #", "###"],
            1,
            Spawn::new(1, 1, Dir::Left),
            [Spawn::new(1, 1, Dir::Left); 4],
            Pos::new(7, 1),
        )
        .unwrap_err();
        assert!(matches!(err, MazeError::OutOfBounds { what: "ghost house", .. }));
    }
}
