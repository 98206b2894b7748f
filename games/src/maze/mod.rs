pub mod autopilot;
pub mod game;
pub mod light;
pub mod map;
pub mod view;
