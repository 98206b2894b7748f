//! Lantern maze: a small real-time maze game.
//!
//! [`maze::game::GameState`] owns everything that changes while playing and is
//! advanced once per tick with [`maze::game::GameState::update`]. Drawing lives
//! in [`maze::view`]; input polling is left to the caller.

pub mod config;
pub mod error;
pub mod maze;

pub use crossterm;
pub use ratatui;

pub use config::GameConfig;
pub use error::GameError;
