//! Bounded pool of short-lived eat-burst particles
//!
//! Particles are purely cosmetic. They advance on the render clock, not the
//! simulation clock, so they keep animating while the game is paused.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use std::f32::consts::TAU;

use super::config::{ParticleConfig, Rgb};

const FALLBACK_COLOR: Rgb = Rgb(255, 200, 80);

/// A single particle with ballistic motion
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining render ticks
    pub life: u32,
    /// Lifetime at spawn, used for fading
    pub max_life: u32,
    pub color: Rgb,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, life: u32, color: Rgb) -> Self {
        let mut particle = Self {
            pos,
            vel,
            life,
            max_life: life.max(1),
            color,
        };
        particle.sanitize();
        particle
    }

    /// One physics step. Returns false once the particle has expired.
    pub fn step(&mut self, gravity: f32) -> bool {
        self.pos += self.vel;
        self.vel.y += gravity;
        self.life = self.life.saturating_sub(1);
        self.sanitize();
        self.is_alive()
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Remaining life as a fraction in `[0, 1]`, drives alpha
    pub fn fade(&self) -> f32 {
        (self.life as f32 / self.max_life as f32).clamp(0.0, 1.0)
    }

    /// Size multiplier in `[0, 1]`; shrinks with the same curve as alpha
    pub fn size_fraction(&self) -> f32 {
        self.fade()
    }

    /// Reset any non-finite component to zero
    pub fn sanitize(&mut self) {
        for v in [&mut self.pos, &mut self.vel] {
            if !v.x.is_finite() {
                v.x = 0.0;
            }
            if !v.y.is_finite() {
                v.y = 0.0;
            }
        }
    }
}

/// Owns every live particle and enforces the pool cap
#[derive(Debug, Clone)]
pub struct ParticleEngine {
    config: ParticleConfig,
    particles: Vec<Particle>,
}

impl ParticleEngine {
    pub fn new(config: ParticleConfig) -> Self {
        let particles = Vec::with_capacity(config.max_particles);
        Self { config, particles }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn capacity_left(&self) -> usize {
        self.config.max_particles.saturating_sub(self.particles.len())
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Spawn up to `requested` particles around `center`.
    ///
    /// The request is truncated to the free space in the pool; a full pool
    /// spawns nothing. Returns how many particles were added.
    pub fn spawn_burst<R: Rng + ?Sized>(
        &mut self,
        center: Vec2,
        requested: usize,
        rng: &mut R,
    ) -> usize {
        let count = requested.min(self.capacity_left());
        if count < requested {
            log::trace!("particle burst truncated: {} of {} spawned", count, requested);
        }

        let cfg = &self.config;
        for _ in 0..count {
            let angle = rng.gen_range(0.0..TAU);
            let speed = rng.gen_range(cfg.min_speed..=cfg.max_speed);
            let lift = rng.gen_range(cfg.min_lift..=cfg.max_lift);
            let vel = Vec2::new(angle.cos() * speed, angle.sin() * speed - lift);

            let offset = if cfg.jitter > 0.0 {
                Vec2::new(
                    rng.gen_range(-cfg.jitter..=cfg.jitter),
                    rng.gen_range(-cfg.jitter..=cfg.jitter),
                )
            } else {
                Vec2::ZERO
            };

            let life = rng.gen_range(cfg.min_lifetime..=cfg.max_lifetime);
            let color = cfg.palette.choose(rng).copied().unwrap_or(FALLBACK_COLOR);

            self.particles
                .push(Particle::new(center + offset, vel, life, color));
        }

        count
    }

    /// Step every particle once and drop the expired ones
    pub fn advance_all(&mut self) {
        let gravity = self.config.gravity;
        self.particles.retain_mut(|p| p.step(gravity));
    }
}
