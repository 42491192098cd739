use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};

use crate::game::{Command, GameConfig, GameSession, GameState};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

pub struct HumanMode {
    session: GameSession,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Self {
        let session = match seed {
            Some(seed) => GameSession::with_seed(config, seed),
            None => GameSession::new(config),
        };

        Self {
            session,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Simulation clock: follows the engine's current speed
        let mut armed_interval = self.session.tick_interval();
        let mut tick_timer = sim_timer(armed_interval);

        // Render clock: fixed rate, keeps running while paused
        let mut render_timer = interval(self.session.render_interval());
        render_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let running = self.session.state() == GameState::Running;

            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = tick_timer.tick(), if running => {
                    let before = self.session.state();
                    let outcome = self.session.simulation_tick();
                    log::trace!("tick: {:?}", outcome);
                    self.track_transition(before);
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.session.render_tick();
                    self.metrics.update();
                    let snapshot = self.session.snapshot();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }

            // Re-arm the simulation clock when the speed changes or play resumes
            let now_running = self.session.state() == GameState::Running;
            let current = self.session.tick_interval();
            if current != armed_interval || (now_running && !running) {
                armed_interval = current;
                tick_timer = sim_timer(armed_interval);
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Game(command) => self.apply_command(command),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    fn apply_command(&mut self, command: Command) {
        let before = self.session.state();
        self.session.handle(command);
        self.track_transition(before);
    }

    /// Keep session metrics in step with state changes
    fn track_transition(&mut self, before: GameState) {
        let after = self.session.state();
        match (before, after) {
            (GameState::Running, GameState::Paused) => self.metrics.on_pause(),
            (GameState::Paused, GameState::Running) => self.metrics.on_resume(),
            (GameState::Running, GameState::Over) => {
                self.metrics.on_round_over(self.session.engine().score())
            }
            (GameState::Over, GameState::Running) => self.metrics.on_round_start(),
            _ => {}
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// An interval whose first tick is one full period away
fn sim_timer(period: Duration) -> Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}
