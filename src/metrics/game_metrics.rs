use std::time::{Duration, Instant};

/// Per-session statistics shown alongside the board
pub struct GameMetrics {
    round_start: Instant,
    /// Paused time accumulated this round
    paused_total: Duration,
    paused_since: Option<Instant>,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub rounds_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            round_start: Instant::now(),
            paused_total: Duration::ZERO,
            paused_since: None,
            elapsed_time: Duration::ZERO,
            high_score: 0,
            rounds_played: 0,
        }
    }

    /// Refresh `elapsed_time`; paused spans are not counted
    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    fn update_at(&mut self, now: Instant) {
        let open_pause = self
            .paused_since
            .map(|since| now.saturating_duration_since(since))
            .unwrap_or(Duration::ZERO);
        self.elapsed_time = now
            .saturating_duration_since(self.round_start)
            .saturating_sub(self.paused_total + open_pause);
    }

    pub fn on_round_start(&mut self) {
        self.round_start = Instant::now();
        self.paused_total = Duration::ZERO;
        self.paused_since = None;
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_pause(&mut self) {
        if self.paused_since.is_none() {
            self.paused_since = Some(Instant::now());
        }
    }

    pub fn on_resume(&mut self) {
        if let Some(since) = self.paused_since.take() {
            self.paused_total += since.elapsed();
        }
    }

    pub fn on_round_over(&mut self, final_score: u32) {
        self.update();
        self.rounds_played += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
