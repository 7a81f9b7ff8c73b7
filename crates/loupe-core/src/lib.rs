pub mod assets;
pub mod config;
pub mod error;
pub mod events;
pub mod geometry;
pub mod lifecycle;
pub mod target;
