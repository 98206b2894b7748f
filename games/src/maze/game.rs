use env::{seeded_rng, Env, GameRng};
use tracing::{debug, error, info};

use super::light::LightMap;
use super::map::{place_items, Action, Dimensions, MazeMap, Position};
use crate::config::GameConfig;
use crate::error::Result;

pub const EFFECT_MAX_RADIUS: f32 = 50.0;
pub const EFFECT_MAX_ALPHA: f32 = 200.0;

/// Movement keys held during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    pub const NONE: HeldKeys = HeldKeys {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    pub fn only(action: Action) -> Self {
        let mut keys = HeldKeys::NONE;
        keys.hold(action);
        keys
    }

    pub fn hold(&mut self, action: Action) {
        match action {
            Action::Up => self.up = true,
            Action::Down => self.down = true,
            Action::Left => self.left = true,
            Action::Right => self.right = true,
        }
    }

    /// The one direction applied this tick: up, then down, then left, then right.
    pub fn direction(&self) -> Option<Action> {
        if self.up {
            Some(Action::Up)
        } else if self.down {
            Some(Action::Down)
        } else if self.left {
            Some(Action::Left)
        } else if self.right {
            Some(Action::Right)
        } else {
            None
        }
    }
}

/// Cosmetic feedback for a pickup. Nothing in the game logic reads it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollectionEffect {
    pub at: Position,
    pub remaining: f32,
    pub duration: f32,
}

impl CollectionEffect {
    // 0 when it starts, 1 when it ends
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (1.0 - self.remaining / self.duration).clamp(0.0, 1.0)
    }

    pub fn radius(&self) -> f32 {
        EFFECT_MAX_RADIUS * self.progress()
    }

    pub fn alpha(&self) -> u8 {
        (EFFECT_MAX_ALPHA * (1.0 - self.progress())).round() as u8
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickEvents {
    pub moved: bool,
    pub collected: Option<Position>,
    pub escaped: bool,
}

pub struct GameState {
    config: GameConfig,
    dims: Dimensions,
    rng: GameRng,
    seed: u64,
    maze: MazeMap,
    player: Position,
    items: Vec<Position>,
    score: u32,
    light_on: bool,
    effect: Option<CollectionEffect>,
    moves: u32,
    escapes: u32,
    elapsed: f32,
}

impl GameState {
    /// Validates `config`, seeds the random source and lays out the first maze.
    pub fn new(config: GameConfig) -> Result<Self> {
        let dims = config.validate()?;
        let (mut rng, seed) = seeded_rng(config.seed);
        let maze = MazeMap::generate(dims, &mut rng);
        let player = maze.entrance();
        let items = place_items(&maze, player, config.item_count, &mut rng)?;
        info!(
            seed,
            rows = dims.rows(),
            cols = dims.cols(),
            items = items.len(),
            "new maze game"
        );

        Ok(GameState {
            config,
            dims,
            rng,
            seed,
            maze,
            player,
            items,
            score: 0,
            light_on: true,
            effect: None,
            moves: 0,
            escapes: 0,
            elapsed: 0.0,
        })
    }

    /// Advances one tick: move, collect, decay the pickup effect, then check
    /// for the exit.
    pub fn update(&mut self, keys: HeldKeys, dt: f32) -> TickEvents {
        let mut events = TickEvents::default();
        let dt = dt.max(0.0);

        if let Some(action) = keys.direction() {
            events.moved = self.try_move(action);
        }

        if let Some(index) = self.items.iter().position(|&item| item == self.player) {
            let at = self.items.remove(index);
            self.score = self.score.saturating_add(self.config.item_reward);
            self.effect = Some(CollectionEffect {
                at,
                remaining: self.config.effect_duration,
                duration: self.config.effect_duration,
            });
            events.collected = Some(at);
            debug!(x = at.x, y = at.y, score = self.score, "item collected");
        }

        if let Some(effect) = self.effect.as_mut() {
            effect.remaining -= dt;
        }
        if self.effect.is_some_and(|effect| effect.remaining <= 0.0) {
            self.effect = None;
        }

        self.elapsed += dt;

        if self.player == self.maze.exit() {
            self.score = self.score.saturating_add(self.config.exit_bonus);
            self.escapes = self.escapes.saturating_add(1);
            events.escaped = true;
            info!(
                score = self.score,
                escapes = self.escapes,
                moves = self.moves,
                seconds = self.elapsed,
                "reached the exit"
            );
            self.next_episode();
        }

        events
    }

    fn try_move(&mut self, action: Action) -> bool {
        match self.maze.step(self.player, action) {
            Some(next) if self.maze.is_open(next) => {
                self.player = next;
                self.moves = self.moves.saturating_add(1);
                true
            }
            _ => false,
        }
    }

    /// Starts over from scratch: new maze, score and escape count back to zero.
    pub fn reset(&mut self) {
        self.score = 0;
        self.escapes = 0;
        self.next_episode();
        debug!("game reset");
    }

    pub fn toggle_light(&mut self) {
        self.light_on = !self.light_on;
        debug!(light_on = self.light_on, "light toggled");
    }

    fn next_episode(&mut self) {
        self.maze = MazeMap::generate(self.dims, &mut self.rng);
        self.player = self.maze.entrance();
        // item_count was checked against the maze size in `new`, so every
        // maze of these dimensions has room
        let placed = place_items(
            &self.maze,
            self.player,
            self.config.item_count,
            &mut self.rng,
        );
        debug_assert!(placed.is_ok(), "item placement failed: {placed:?}");
        self.items = placed.unwrap_or_else(|err| {
            error!(error = %err, "item placement failed");
            Vec::new()
        });
        self.effect = None;
        self.moves = 0;
        self.elapsed = 0.0;
    }

    pub fn light_map(&self) -> LightMap {
        if !self.light_on {
            return LightMap::full(self.maze.width, self.maze.height);
        }
        LightMap::around(
            self.maze.width,
            self.maze.height,
            self.config.cell_size,
            self.config.light_radius,
            self.player,
            &self.items,
            self.maze.exit(),
        )
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn maze(&self) -> &MazeMap {
        &self.maze
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn items(&self) -> &[Position] {
        &self.items
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn light_on(&self) -> bool {
        self.light_on
    }

    pub fn effect(&self) -> Option<&CollectionEffect> {
        self.effect.as_ref()
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn escapes(&self) -> u32 {
        self.escapes
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[cfg(test)]
    pub(crate) fn place_player(&mut self, at: Position) {
        self.player = at;
    }

    #[cfg(test)]
    pub(crate) fn set_items(&mut self, items: Vec<Position>) {
        self.items = items;
    }
}

impl Env for GameState {
    type State = Position;
    type Action = Action;
    type Input = HeldKeys;
    type Status = TickEvents;

    fn reset(&mut self) -> Self::State {
        GameState::reset(self);
        self.player
    }

    fn step(&mut self, input: HeldKeys, dt: f32) -> (Self::State, Self::Status) {
        let events = self.update(input, dt);
        (self.player, events)
    }

    fn current_state(&self) -> Self::State {
        self.player
    }

    fn legal_actions(&self) -> Vec<Self::Action> {
        self.maze.open_neighbors(self.player)
    }
}
