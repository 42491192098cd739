use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// RGB color used for particles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Tuning for the eat-burst particle effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Hard cap on live particles
    pub max_particles: usize,
    /// Particles requested per food eaten
    pub burst_size: usize,
    /// Initial speed range, in pixels per render tick
    pub min_speed: f32,
    pub max_speed: f32,
    /// Lifetime range, in render ticks
    pub min_lifetime: u32,
    pub max_lifetime: u32,
    /// Upward kick subtracted from the initial vertical velocity
    pub min_lift: f32,
    pub max_lift: f32,
    /// Spawn position jitter around the burst centre, in pixels
    pub jitter: f32,
    /// Downward acceleration applied every render tick
    pub gravity: f32,
    /// Colors a particle may be given
    pub palette: Vec<Rgb>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            max_particles: 60,
            burst_size: 18,
            min_speed: 1.0,
            max_speed: 2.6,
            min_lifetime: 10,
            max_lifetime: 24,
            min_lift: 0.6,
            max_lift: 1.4,
            jitter: 3.0,
            gravity: 0.08,
            palette: vec![
                Rgb(255, 200, 80),
                Rgb(255, 140, 80),
                Rgb(255, 90, 90),
                Rgb(255, 220, 120),
            ],
        }
    }
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Size of one cell in presentation pixels
    pub cell_size: u32,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    // Speed (tick interval, milliseconds)
    /// Tick interval at the start of a round
    pub initial_speed_ms: u64,
    /// Amount the interval shrinks each time the score threshold is hit
    pub speed_step_ms: u64,
    /// Score multiple that triggers a speed-up
    pub speed_up_every: u32,
    /// Shortest allowed tick interval
    pub min_speed_ms: u64,
    /// Longest allowed tick interval (manual slow-down)
    pub max_speed_ms: u64,
    /// Step used by the manual speed commands
    pub manual_speed_step_ms: u64,

    // Presentation clock
    /// Render clock period
    pub render_interval_ms: u64,
    /// Phase advance per render tick for the food pulse, in radians
    pub pulse_step: f32,

    pub particles: ParticleConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 30,
            grid_height: 20,
            cell_size: 20,
            initial_snake_length: 3,
            initial_speed_ms: 150,
            speed_step_ms: 10,
            speed_up_every: 3,
            min_speed_ms: 30,
            max_speed_ms: 400,
            manual_speed_step_ms: 20,
            render_interval_ms: 16,
            pulse_step: 0.12,
            particles: ParticleConfig::default(),
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Load a configuration from a JSON file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        config
            .validate()
            .map_err(|msg| anyhow::anyhow!("Invalid config {:?}: {}", path, msg))?;
        Ok(config)
    }

    pub fn render_interval(&self) -> Duration {
        Duration::from_millis(self.render_interval_ms)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.initial_snake_length < 3 {
            return Err("initial_snake_length must be at least 3".to_string());
        }
        // The snake starts at the centre and extends left from it.
        if self.grid_width / 2 + 1 < self.initial_snake_length || self.grid_height == 0 {
            return Err(format!(
                "a {}x{} grid cannot hold a snake of length {}",
                self.grid_width, self.grid_height, self.initial_snake_length
            ));
        }
        if self.grid_width * self.grid_height <= self.initial_snake_length {
            return Err("grid must have room for food".to_string());
        }
        if self.cell_size == 0 {
            return Err("cell_size must be positive".to_string());
        }
        if self.min_speed_ms == 0 || self.render_interval_ms == 0 {
            return Err("intervals must be positive".to_string());
        }
        if self.min_speed_ms > self.initial_speed_ms || self.initial_speed_ms > self.max_speed_ms {
            return Err(format!(
                "initial_speed_ms ({}) must lie within [{}, {}]",
                self.initial_speed_ms, self.min_speed_ms, self.max_speed_ms
            ));
        }
        if self.render_interval_ms >= self.min_speed_ms {
            return Err(format!(
                "render_interval_ms ({}) must be shorter than min_speed_ms ({})",
                self.render_interval_ms, self.min_speed_ms
            ));
        }
        if self.speed_up_every == 0 {
            return Err("speed_up_every must be positive".to_string());
        }
        if !self.pulse_step.is_finite() || self.pulse_step < 0.0 {
            return Err("pulse_step must be finite and non-negative".to_string());
        }
        self.particles.validate()
    }
}

impl ParticleConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.min_lifetime == 0 || self.min_lifetime > self.max_lifetime {
            return Err(format!(
                "particle lifetime range [{}, {}] is invalid",
                self.min_lifetime, self.max_lifetime
            ));
        }
        let ranges = [
            ("speed", self.min_speed, self.max_speed),
            ("lift", self.min_lift, self.max_lift),
        ];
        for (name, lo, hi) in ranges {
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(format!("particle {} range [{}, {}] is invalid", name, lo, hi));
            }
        }
        if !self.jitter.is_finite() || self.jitter < 0.0 || !self.gravity.is_finite() {
            return Err("particle jitter and gravity must be finite".to_string());
        }
        if self.palette.is_empty() {
            return Err("particle palette must not be empty".to_string());
        }
        Ok(())
    }
}
