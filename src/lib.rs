//! Arcade Snake - a grid snake game with particle effects and smooth movement
//!
//! This library provides:
//! - Core simulation (game module): movement automaton, food placement,
//!   particle pool, and the interpolation adapter for a faster render clock
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - Session statistics (metrics module)
//! - The interactive terminal mode (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
