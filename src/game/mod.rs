//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies:
//! the movement automaton, food placement, the particle pool, and the
//! interpolation adapter that smooths discrete moves for a faster render clock.

pub mod action;
pub mod board;
pub mod config;
pub mod engine;
pub mod interpolation;
pub mod particles;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use board::Board;
pub use config::{GameConfig, ParticleConfig, Rgb};
pub use engine::{GameEngine, TickOutcome};
pub use interpolation::Interpolator;
pub use particles::{Particle, ParticleEngine};
pub use session::{FrameSnapshot, GameSession, ParticleView};
pub use state::{CollisionType, EndReason, GameState, Position, Snake};
