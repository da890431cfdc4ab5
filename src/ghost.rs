use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::level::Spawn;
use crate::maze::{Dir, Maze, Pos};
use crate::motion::step_in_place;

/// Chance that a normal ghost steers toward the player instead of wandering.
const CHASE_CHANCE: f32 = 0.4;
/// Upper bound on return-path search iterations.
const RETURN_PATH_LIMIT: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GhostKind {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostKind {
    /// Spawn-table order; also the order collisions are resolved in.
    pub const ALL: [GhostKind; 4] = [
        GhostKind::Blinky,
        GhostKind::Pinky,
        GhostKind::Inky,
        GhostKind::Clyde,
    ];

    pub fn index(self) -> usize {
        match self {
            GhostKind::Blinky => 0,
            GhostKind::Pinky => 1,
            GhostKind::Inky => 2,
            GhostKind::Clyde => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GhostMode {
    Normal,
    Frightened,
    Eaten,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ghost {
    pub kind: GhostKind,
    pub pos: Pos,
    pub prev_pos: Pos,
    pub dir: Dir,
    mode: GhostMode,
    return_path: VecDeque<Pos>,
}

impl Ghost {
    pub fn spawn(kind: GhostKind, spawn: Spawn) -> Self {
        Self {
            kind,
            pos: spawn.pos,
            prev_pos: spawn.pos,
            dir: spawn.dir,
            mode: GhostMode::Normal,
            return_path: VecDeque::new(),
        }
    }

    pub fn mode(&self) -> GhostMode {
        self.mode
    }

    /// Remaining cells of the trip home; empty unless eaten.
    pub fn return_path(&self) -> &VecDeque<Pos> {
        &self.return_path
    }

    /// Power pellet broadcast. Eaten ghosts ignore it.
    pub fn frighten(&mut self) {
        if self.mode != GhostMode::Eaten {
            self.mode = GhostMode::Frightened;
        }
    }

    /// Pellet expiry broadcast. Eaten ghosts ignore it.
    pub fn calm(&mut self) {
        if self.mode == GhostMode::Frightened {
            self.mode = GhostMode::Normal;
        }
    }

    /// Captured while frightened.
    pub fn eat(&mut self) {
        self.mode = GhostMode::Eaten;
        self.return_path.clear();
    }

    /// One movement step under the current mode. Returns true when an eaten
    /// ghost made it back to the house on this step.
    pub fn advance(&mut self, maze: &Maze, player: Pos, house: Pos, rng: &mut impl Rng) -> bool {
        self.prev_pos = self.pos;

        if self.mode == GhostMode::Eaten {
            return self.head_home(maze, house);
        }

        if let Some(dir) = self.choose_dir(maze, player, rng) {
            self.dir = dir;
        }
        if !step_in_place(maze, &mut self.pos, self.dir) {
            self.dir = Dir::ALL[rng.gen_range(0..Dir::ALL.len())];
        }
        false
    }

    fn head_home(&mut self, maze: &Maze, house: Pos) -> bool {
        if let Some(next) = self.return_path.pop_front() {
            self.pos = next;
        } else {
            self.return_path = return_path(maze, self.pos, house);
            if !self.return_path.is_empty() {
                return false;
            }
        }

        if self.pos == house {
            self.mode = GhostMode::Normal;
            self.return_path.clear();
            return true;
        }
        false
    }

    fn choose_dir(&self, maze: &Maze, player: Pos, rng: &mut impl Rng) -> Option<Dir> {
        let frightened = self.mode == GhostMode::Frightened;
        let reverse = self.dir.opposite();
        let options: Vec<Dir> = Dir::ALL
            .into_iter()
            .filter(|dir| frightened || *dir != reverse)
            .filter(|dir| maze.can_enter(self.pos, *dir))
            .collect();
        if options.is_empty() {
            return None;
        }

        if !frightened && rng.gen::<f32>() < CHASE_CHANCE {
            return options.iter().copied().min_by_key(|dir| {
                maze.offset(self.pos, *dir)
                    .map_or(usize::MAX, |next| next.manhattan(player))
            });
        }
        options.choose(rng).copied()
    }
}

/// Greedy walk from `start` toward `house`: close the horizontal gap first,
/// then the vertical one, sidestepping in `Dir::ALL` order when the greedy
/// cell is a wall. Not a shortest path and may stop short of the house.
pub fn return_path(maze: &Maze, start: Pos, house: Pos) -> VecDeque<Pos> {
    let mut path = VecDeque::new();
    let mut cur = start;

    for _ in 0..RETURN_PATH_LIMIT {
        if cur == house {
            break;
        }
        let toward = if cur.x < house.x {
            Dir::Right
        } else if cur.x > house.x {
            Dir::Left
        } else if cur.y < house.y {
            Dir::Down
        } else {
            Dir::Up
        };

        let open = |dir: Dir| maze.offset(cur, dir).filter(|next| maze.is_passable(*next));
        let Some(next) = open(toward).or_else(|| Dir::ALL.into_iter().find_map(open)) else {
            break;
        };
        path.push_back(next);
        cur = next;
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn open_room() -> Maze {
        Maze::parse(&["#######", "#     #", "#     #", "#     #", "#######"], 2).unwrap()
    }

    #[test]
    fn mode_broadcasts_skip_eaten_ghosts() {
        let mut ghost = Ghost::spawn(GhostKind::Blinky, Spawn::new(1, 1, Dir::Left));
        ghost.frighten();
        assert_eq!(ghost.mode(), GhostMode::Frightened);
        ghost.eat();
        ghost.frighten();
        assert_eq!(ghost.mode(), GhostMode::Eaten);
        ghost.calm();
        assert_eq!(ghost.mode(), GhostMode::Eaten);
    }

    #[test]
    fn return_path_is_greedy_horizontal_first() {
        let maze = open_room();
        let path: Vec<Pos> = return_path(&maze, Pos::new(1, 1), Pos::new(3, 3)).into();
        assert_eq!(
            path,
            vec![
                Pos::new(2, 1),
                Pos::new(3, 1),
                Pos::new(3, 2),
                Pos::new(3, 3)
            ]
        );
    }

    #[test]
    fn return_path_terminates_when_walled_in() {
        let maze = Maze::parse(&["###", "# #", "###"], 1).unwrap();
        assert!(return_path(&maze, Pos::new(1, 1), Pos::new(5, 5)).is_empty());

        let maze = Maze::parse(&["#####", "#   #", "#####"], 1).unwrap();
        let path = return_path(&maze, Pos::new(1, 1), Pos::new(3, 3));
        assert!(path.len() <= RETURN_PATH_LIMIT);
    }

    #[test]
    fn eaten_ghost_plans_then_walks_home_and_revives() {
        let maze = open_room();
        let mut rng = StdRng::seed_from_u64(7);
        let house = Pos::new(3, 1);
        let mut ghost = Ghost::spawn(GhostKind::Pinky, Spawn::new(1, 1, Dir::Left));
        ghost.eat();

        assert!(!ghost.advance(&maze, Pos::new(5, 3), house, &mut rng));
        assert_eq!(ghost.pos, Pos::new(1, 1));
        assert_eq!(ghost.return_path().len(), 2);

        assert!(!ghost.advance(&maze, Pos::new(5, 3), house, &mut rng));
        assert_eq!(ghost.pos, Pos::new(2, 1));
        assert!(ghost.advance(&maze, Pos::new(5, 3), house, &mut rng));
        assert_eq!(ghost.pos, house);
        assert_eq!(ghost.mode(), GhostMode::Normal);
        assert!(ghost.return_path().is_empty());
    }

    #[test]
    fn eaten_ghost_already_home_revives_immediately() {
        let maze = open_room();
        let mut rng = StdRng::seed_from_u64(1);
        let mut ghost = Ghost::spawn(GhostKind::Inky, Spawn::new(3, 2, Dir::Up));
        ghost.eat();
        assert!(ghost.advance(&maze, Pos::new(1, 1), Pos::new(3, 2), &mut rng));
        assert_eq!(ghost.mode(), GhostMode::Normal);
    }

    #[test]
    fn normal_ghost_never_reverses_when_it_has_a_choice() {
        let maze = open_room();
        let mut rng = StdRng::seed_from_u64(42);
        let mut ghost = Ghost::spawn(GhostKind::Clyde, Spawn::new(3, 2, Dir::Right));
        for _ in 0..500 {
            let before = ghost.dir;
            let has_forward_option = Dir::ALL
                .into_iter()
                .any(|dir| dir != before.opposite() && maze.can_enter(ghost.pos, dir));
            ghost.advance(&maze, Pos::new(1, 1), Pos::new(3, 2), &mut rng);
            if has_forward_option {
                assert_ne!(ghost.dir, before.opposite());
            }
        }
    }

    #[test]
    fn frightened_ghost_can_double_back() {
        let maze = Maze::parse(&["#####", "#   #", "#####"], 1).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let mut reversed = false;
        for _ in 0..64 {
            let mut ghost = Ghost::spawn(GhostKind::Blinky, Spawn::new(2, 1, Dir::Right));
            ghost.frighten();
            ghost.advance(&maze, Pos::new(1, 1), Pos::new(2, 1), &mut rng);
            if ghost.dir == Dir::Left && ghost.pos == Pos::new(1, 1) {
                reversed = true;
                break;
            }
        }
        assert!(reversed);
    }

    /// All-zero draws always take the chase branch.
    fn always_chase() -> StepRng {
        StepRng::new(0, 0)
    }

    #[test]
    fn chasing_ghost_takes_the_nearest_cell() {
        let maze = open_room();
        let mut ghost = Ghost::spawn(GhostKind::Blinky, Spawn::new(3, 2, Dir::Right));
        ghost.advance(&maze, Pos::new(3, 3), Pos::new(1, 1), &mut always_chase());
        assert_eq!(ghost.dir, Dir::Down);
        assert_eq!(ghost.pos, Pos::new(3, 3));
    }

    #[test]
    fn chase_ties_break_in_direction_order() {
        let maze = open_room();
        // Up lands on (3,1) and Right on (4,2), both two cells from (5,1).
        let mut ghost = Ghost::spawn(GhostKind::Pinky, Spawn::new(3, 2, Dir::Right));
        ghost.advance(&maze, Pos::new(5, 1), Pos::new(1, 1), &mut always_chase());
        assert_eq!(ghost.dir, Dir::Up);
        assert_eq!(ghost.pos, Pos::new(3, 1));

        // Down and Right tie toward (5,3); Down comes first.
        let mut ghost = Ghost::spawn(GhostKind::Inky, Spawn::new(3, 2, Dir::Right));
        ghost.advance(&maze, Pos::new(5, 3), Pos::new(1, 1), &mut always_chase());
        assert_eq!(ghost.dir, Dir::Down);
    }

    #[test]
    fn boxed_in_ghost_stays_put() {
        let maze = Maze::parse(&["###", "# #", "###"], 1).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let mut ghost = Ghost::spawn(GhostKind::Blinky, Spawn::new(1, 1, Dir::Up));
        for _ in 0..20 {
            ghost.advance(&maze, Pos::new(1, 1), Pos::new(1, 1), &mut rng);
            assert_eq!(ghost.pos, Pos::new(1, 1));
        }
    }
}
