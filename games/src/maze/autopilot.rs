use super::game::{GameState, HeldKeys};

/// Walks the player to the exit along the shortest path, one key per tick.
///
/// The path is recomputed every tick, so it follows along through resets
/// and manual moves without any bookkeeping.
#[derive(Debug, Default, Clone, Copy)]
pub struct Autopilot;

impl Autopilot {
    pub fn new() -> Self {
        Self
    }

    pub fn keys(&self, game: &GameState) -> HeldKeys {
        let maze = game.maze();
        maze.shortest_path(game.player(), maze.exit())
            .and_then(|path| path.first().copied())
            .map(HeldKeys::only)
            .unwrap_or(HeldKeys::NONE)
    }
}
