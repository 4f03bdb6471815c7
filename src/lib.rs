//! A single-screen arcade shooter.
//!
//! The simulation (`compute`, `game`) is pure and host-agnostic; `display`
//! and `input` adapt it to a crossterm terminal.

pub mod assets;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod game;
pub mod input;
pub mod scheduler;
