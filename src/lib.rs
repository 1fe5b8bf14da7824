// Library surface for the binary, headless runs and integration tests.
// Keep this free of terminal UI types; those live in main.rs.
pub mod app_dirs;
pub mod audio;
pub mod clock;
pub mod config;
pub mod feed;
pub mod game;
pub mod geometry;
pub mod hand;
pub mod hit;
pub mod logging;
pub mod pose;
pub mod runtime;
pub mod score;
pub mod session;
pub mod sprite;
pub mod surface;
pub mod target;
