//! Presentation adapter between the simulation clock and the render clock
//!
//! The simulation moves the snake one whole cell per tick. The render clock
//! runs faster, and on every render tick this adapter advances `progress`
//! by `render_interval / tick_interval` so the snake glides from its previous
//! cells to its current ones and arrives just as the next tick is due. It
//! only ever reads from the engine.

use glam::Vec2;
use std::f32::consts::TAU;
use std::time::Duration;

use super::engine::GameEngine;
use super::state::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct Interpolator {
    progress: f32,
    phase: f32,
    pulse_step: f32,
    /// Engine move count at the last reset of `progress`
    seen_moves: u64,
}

impl Interpolator {
    pub fn new(pulse_step: f32) -> Self {
        Self {
            progress: 1.0,
            phase: 0.0,
            pulse_step,
            seen_moves: 0,
        }
    }

    /// Fraction of the way from the previous cells to the current ones
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Cosmetic phase angle in `[0, 2π)`
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Size multiplier for the pulsing food marker
    pub fn pulse_scale(&self) -> f32 {
        0.9 + 0.06 * self.phase.sin()
    }

    /// Restart interpolation if the engine has moved since the last sync
    pub fn sync(&mut self, engine: &GameEngine) {
        if engine.moves() != self.seen_moves {
            self.seen_moves = engine.moves();
            self.progress = 0.0;
        }
    }

    /// Back to the at-rest state used at the start of a round
    pub fn reset(&mut self, engine: &GameEngine) {
        self.progress = 1.0;
        self.phase = 0.0;
        self.seen_moves = engine.moves();
    }

    /// One render-clock step
    pub fn advance(&mut self, render_interval: Duration, tick_interval: Duration) {
        if self.progress < 1.0 {
            let tick_secs = tick_interval.as_secs_f32();
            let step = if tick_secs > 0.0 {
                render_interval.as_secs_f32() / tick_secs
            } else {
                1.0
            };
            self.progress = (self.progress + step).clamp(0.0, 1.0);
        }

        self.phase = (self.phase + self.pulse_step).rem_euclid(TAU);
        // rem_euclid can round up to exactly TAU for tiny negative inputs
        if !self.phase.is_finite() || self.phase >= TAU {
            self.phase = 0.0;
        }
    }

    /// Interpolated cell coordinates of one body segment.
    ///
    /// A segment that did not exist before the last move (fresh growth)
    /// sits still at its current cell.
    pub fn display_position(&self, engine: &GameEngine, index: usize) -> Option<Vec2> {
        let current = engine.snake().segment(index)?;
        let previous = engine
            .previous_body()
            .get(index)
            .copied()
            .unwrap_or(current);
        Some(lerp_cells(previous, current, self.progress))
    }

    /// Interpolated coordinates of every segment, head first
    pub fn display_positions(&self, engine: &GameEngine) -> Vec<Vec2> {
        (0..engine.snake().len())
            .filter_map(|i| self.display_position(engine, i))
            .collect()
    }
}

fn lerp_cells(from: Position, to: Position, t: f32) -> Vec2 {
    let a = Vec2::new(from.x as f32, from.y as f32);
    let b = Vec2::new(to.x as f32, to.y as f32);
    a.lerp(b, t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig, Snake};

    fn setup() -> (GameEngine, Interpolator) {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 77);
        engine.place(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            Some(Position::new(0, 0)),
        );
        let interp = Interpolator::new(0.12);
        (engine, interp)
    }

    #[test]
    fn test_starts_at_rest() {
        let (engine, interp) = setup();
        assert_eq!(interp.progress(), 1.0);
        assert_eq!(interp.display_position(&engine, 0), Some(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_sync_resets_after_move() {
        let (mut engine, mut interp) = setup();
        engine.tick();
        interp.sync(&engine);
        assert_eq!(interp.progress(), 0.0);
        assert_eq!(interp.display_position(&engine, 0), Some(Vec2::new(5.0, 5.0)));

        // A second sync without a move keeps progress
        interp.advance(Duration::from_millis(16), Duration::from_millis(160));
        interp.sync(&engine);
        assert!((interp.progress() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_progress_reaches_one_by_next_tick() {
        let (mut engine, mut interp) = setup();
        engine.tick();
        interp.sync(&engine);

        let render = Duration::from_millis(16);
        let tick = Duration::from_millis(64);
        for _ in 0..3 {
            interp.advance(render, tick);
        }
        assert!((interp.progress() - 0.75).abs() < 1e-6);
        let head = interp.display_position(&engine, 0).unwrap();
        assert!((head.x - 5.75).abs() < 1e-5);

        interp.advance(render, tick);
        interp.advance(render, tick);
        assert_eq!(interp.progress(), 1.0);
        assert_eq!(interp.display_position(&engine, 0), Some(Vec2::new(6.0, 5.0)));
    }

    #[test]
    fn test_phase_wraps() {
        let mut interp = Interpolator::new(2.0);
        for _ in 0..10 {
            interp.advance(Duration::from_millis(16), Duration::from_millis(150));
            assert!(interp.phase() >= 0.0 && interp.phase() < TAU);
        }
    }

    #[test]
    fn test_new_growth_segment_stays_put() {
        let (mut engine, mut interp) = setup();
        engine.place(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            Some(Position::new(6, 5)),
        );
        engine.tick();
        interp.sync(&engine);

        assert_eq!(engine.snake().len(), 4);
        assert_eq!(interp.display_position(&engine, 3), Some(Vec2::new(3.0, 5.0)));
        assert_eq!(interp.display_positions(&engine).len(), 4);
        assert_eq!(interp.display_position(&engine, 4), None);
    }

    #[test]
    fn test_zero_tick_interval_snaps() {
        let mut interp = Interpolator::new(0.1);
        interp.progress = 0.0;
        interp.advance(Duration::from_millis(16), Duration::ZERO);
        assert_eq!(interp.progress(), 1.0);
    }

    #[test]
    fn test_phase_stays_below_full_turn() {
        let mut interp = Interpolator::new(-1e-8);
        interp.advance(Duration::from_millis(16), Duration::from_millis(150));
        assert!((0.0..TAU).contains(&interp.phase()));
    }
}
