//! Single owner of simulation and presentation state
//!
//! The host drives a session from two clocks on one thread:
//! [`GameSession::simulation_tick`] at the engine's current tick interval and
//! [`GameSession::render_tick`] at the fixed render interval. Both take
//! `&mut self`, so callbacks are serialized by construction.

use glam::Vec2;
use std::time::Duration;

use super::{
    action::{Command, Direction},
    config::{GameConfig, Rgb},
    engine::{GameEngine, TickOutcome},
    interpolation::Interpolator,
    state::{EndReason, GameState, Position},
};

/// Particle data needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleView {
    /// Position in presentation pixels
    pub pos: Vec2,
    pub fade: f32,
    pub size_fraction: f32,
    pub color: Rgb,
}

/// Everything a presenter needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    /// Interpolated segment positions in cell units, head first
    pub segments: Vec<Vec2>,
    pub heading: Direction,
    pub food: Option<Position>,
    pub pulse_phase: f32,
    pub pulse_scale: f32,
    pub particles: Vec<ParticleView>,
    pub score: u32,
    pub state: GameState,
    pub end_reason: Option<EndReason>,
    pub speed_ms: u64,
    pub grid_width: usize,
    pub grid_height: usize,
    pub cell_size: u32,
}

pub struct GameSession {
    engine: GameEngine,
    interpolator: Interpolator,
    render_interval: Duration,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Self {
        Self::from_engine(GameEngine::new(config))
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::from_engine(GameEngine::with_seed(config, seed))
    }

    pub fn from_engine(engine: GameEngine) -> Self {
        let config = engine.config();
        let render_interval = config.render_interval();
        let mut interpolator = Interpolator::new(config.pulse_step);
        interpolator.reset(&engine);

        Self {
            engine,
            interpolator,
            render_interval,
        }
    }

    /// Feed one input command to the game
    pub fn handle(&mut self, command: Command) {
        let was_over = self.engine.state() == GameState::Over;
        self.engine.apply(command);

        if was_over && self.engine.state() == GameState::Running {
            // Restarted: presentation state belongs to the old round.
            self.interpolator.reset(&self.engine);
        }
    }

    /// Simulation clock callback
    pub fn simulation_tick(&mut self) -> TickOutcome {
        let outcome = self.engine.tick();
        self.interpolator.sync(&self.engine);
        outcome
    }

    /// Render clock callback; runs in every state
    pub fn render_tick(&mut self) {
        self.engine.advance_particles();
        self.interpolator
            .advance(self.render_interval, self.engine.tick_interval());
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    #[cfg(test)]
    pub(crate) fn engine_mut(&mut self) -> &mut GameEngine {
        &mut self.engine
    }

    pub fn interpolator(&self) -> &Interpolator {
        &self.interpolator
    }

    pub fn state(&self) -> GameState {
        self.engine.state()
    }

    pub fn tick_interval(&self) -> Duration {
        self.engine.tick_interval()
    }

    pub fn render_interval(&self) -> Duration {
        self.render_interval
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let engine = &self.engine;
        let config = engine.config();

        let particles = engine
            .particles()
            .particles()
            .iter()
            .map(|p| {
                let mut p = p.clone();
                p.sanitize();
                ParticleView {
                    pos: p.pos,
                    fade: p.fade(),
                    size_fraction: p.size_fraction(),
                    color: p.color,
                }
            })
            .collect();

        FrameSnapshot {
            segments: self.interpolator.display_positions(engine),
            heading: engine.snake().direction,
            food: engine.food(),
            pulse_phase: self.interpolator.phase(),
            pulse_scale: self.interpolator.pulse_scale(),
            particles,
            score: engine.score(),
            state: engine.state(),
            end_reason: engine.end_reason(),
            speed_ms: engine.speed_ms(),
            grid_width: config.grid_width,
            grid_height: config.grid_height,
            cell_size: config.cell_size,
        }
    }
}
