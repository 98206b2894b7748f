// maze map: grid, carving and item placement
use std::collections::VecDeque;

use env::rand::seq::{IndexedRandom, SliceRandom};
use env::rand::Rng;

use crate::error::{GameError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileType {
    Wall,
    Open,
}

/// Largest accepted side, in cells.
pub const MAX_SIDE: usize = 1001;

/// Grid size that the stride-two carver can fill: both sides odd, 3..=MAX_SIDE.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    rows: usize,
    cols: usize,
}

impl Dimensions {
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let valid = |side: usize| (3..=MAX_SIDE).contains(&side) && side % 2 == 1;
        if !valid(rows) || !valid(cols) {
            return Err(GameError::InvalidDimensions { rows, cols });
        }
        Ok(Dimensions { rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of open interior cells every maze of this size has.
    ///
    /// A perfect maze over `r * c` rooms has `r * c - 1` corridors; entrance
    /// and exit sit on the border and are not counted.
    pub fn item_capacity(&self) -> usize {
        let rooms = (self.rows / 2) * (self.cols / 2);
        2 * rooms - 1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Up, Action::Right, Action::Down, Action::Left];

    pub fn delta(&self) -> (isize, isize) {
        match self {
            Action::Up => (0, -1),
            Action::Down => (0, 1),
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeMap {
    pub width: usize,
    pub height: usize,
    pub grid: Vec<Vec<TileType>>,
}

/// One level of the depth-first walk: the room being expanded, its shuffled
/// directions and how many of them have been tried.
struct Frame {
    at: Position,
    dirs: [Action; 4],
    next: usize,
}

impl Frame {
    fn enter<R: Rng + ?Sized>(at: Position, rng: &mut R) -> Self {
        let mut dirs = Action::ALL;
        dirs.shuffle(rng);
        Frame { at, dirs, next: 0 }
    }
}

impl MazeMap {
    /// Carves a perfect maze with a randomized depth-first backtracker.
    ///
    /// Rooms sit on odd coordinates and the walk jumps two cells at a time,
    /// opening the wall in between. The walk starts at `(1, 1)`; afterwards
    /// the entrance `(0, 1)` and exit `(cols - 1, rows - 2)` are forced open.
    pub fn generate<R: Rng + ?Sized>(dims: Dimensions, rng: &mut R) -> Self {
        let (width, height) = (dims.cols(), dims.rows());
        let mut maze = MazeMap {
            width,
            height,
            grid: vec![vec![TileType::Wall; width]; height],
        };

        let seed = Position::new(1, 1);
        maze.open(seed);
        let mut stack = vec![Frame::enter(seed, rng)];

        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.dirs.len() {
                stack.pop();
                continue;
            }
            let dir = frame.dirs[frame.next];
            frame.next += 1;
            let from = frame.at;

            let Some(wall) = maze.step(from, dir) else {
                continue;
            };
            let Some(target) = maze.step(wall, dir) else {
                continue;
            };
            if maze.tile(target) == TileType::Wall {
                maze.open(wall);
                maze.open(target);
                stack.push(Frame::enter(target, rng));
            }
        }

        let (entrance, exit) = (maze.entrance(), maze.exit());
        maze.open(entrance);
        maze.open(exit);
        maze
    }

    pub fn entrance(&self) -> Position {
        Position::new(0, 1)
    }

    pub fn exit(&self) -> Position {
        Position::new(self.width - 1, self.height - 2)
    }

    pub fn tile(&self, pos: Position) -> TileType {
        self.grid[pos.y][pos.x]
    }

    pub fn is_open(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height && self.tile(pos) == TileType::Open
    }

    fn open(&mut self, pos: Position) {
        self.grid[pos.y][pos.x] = TileType::Open;
    }

    /// The neighbor one cell away in `dir`, if it is inside the grid.
    pub fn step(&self, pos: Position, dir: Action) -> Option<Position> {
        let (dx, dy) = dir.delta();
        let nx = pos.x.checked_add_signed(dx)?;
        let ny = pos.y.checked_add_signed(dy)?;
        (nx < self.width && ny < self.height).then_some(Position::new(nx, ny))
    }

    /// Directions from `pos` that lead onto an open cell.
    pub fn open_neighbors(&self, pos: Position) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|&dir| self.step(pos, dir).is_some_and(|next| self.is_open(next)))
            .collect()
    }

    pub fn open_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.grid.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &tile)| tile == TileType::Open)
                .map(move |(x, _)| Position::new(x, y))
        })
    }

    pub fn is_interior(&self, pos: Position) -> bool {
        pos.x >= 1 && pos.y >= 1 && pos.x + 1 < self.width && pos.y + 1 < self.height
    }

    /// Breadth-first shortest path from `from` to `to` over open cells.
    ///
    /// Returns the moves to make, empty when `from == to`, or `None` if `to`
    /// cannot be reached.
    pub fn shortest_path(&self, from: Position, to: Position) -> Option<Vec<Action>> {
        if !self.is_open(from) || !self.is_open(to) {
            return None;
        }
        let mut came_from: Vec<Vec<Option<(Position, Action)>>> =
            vec![vec![None; self.width]; self.height];
        let mut seen = vec![vec![false; self.width]; self.height];
        let mut queue = VecDeque::from([from]);
        seen[from.y][from.x] = true;

        while let Some(pos) = queue.pop_front() {
            if pos == to {
                let mut path = Vec::new();
                let mut cur = pos;
                while let Some((prev, dir)) = came_from[cur.y][cur.x] {
                    path.push(dir);
                    cur = prev;
                }
                path.reverse();
                return Some(path);
            }
            for dir in self.open_neighbors(pos) {
                let Some(next) = self.step(pos, dir) else {
                    continue;
                };
                if !seen[next.y][next.x] {
                    seen[next.y][next.x] = true;
                    came_from[next.y][next.x] = Some((pos, dir));
                    queue.push_back(next);
                }
            }
        }
        None
    }
}

/// Picks `count` distinct open interior cells, none of them `player`.
///
/// Every candidate is enumerated up front and sampled without replacement, so
/// a maze that is too small yields [`GameError::NotEnoughRoom`] instead of
/// retrying forever.
pub fn place_items<R: Rng + ?Sized>(
    maze: &MazeMap,
    player: Position,
    count: usize,
    rng: &mut R,
) -> Result<Vec<Position>> {
    let candidates: Vec<Position> = maze
        .open_cells()
        .filter(|&pos| maze.is_interior(pos) && pos != player)
        .collect();

    if candidates.len() < count {
        return Err(GameError::NotEnoughRoom {
            requested: count,
            available: candidates.len(),
        });
    }
    Ok(candidates.choose_multiple(rng, count).copied().collect())
}
