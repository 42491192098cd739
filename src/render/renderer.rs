use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Clear, Paragraph,
        canvas::{Canvas, Circle, Context, Points},
    },
};

use crate::game::{CollisionType, Direction, EndReason, FrameSnapshot, GameState, Rgb};
use crate::metrics::GameMetrics;

const HEAD_COLOR: Color = Color::Rgb(120, 220, 120);
const BODY_COLOR: Color = Color::Rgb(60, 160, 60);
const FOOD_COLOR: Color = Color::Rgb(200, 60, 60);
const EYE_COLOR: Color = Color::Rgb(10, 10, 10);

/// Segments are drawn slightly smaller than a cell so they read as blocks
const SEGMENT_INSET: f64 = 0.1;
/// Lattice spacing used to fill shapes with braille dots
const FILL_STEP: f64 = 0.1;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &FrameSnapshot, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(snapshot, metrics);
        frame.render_widget(stats, chunks[0]);

        // Center the board horizontally
        let game_area = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match snapshot.state {
            GameState::Over => {
                let game_over = self.render_game_over(snapshot, metrics);
                frame.render_widget(game_over, game_area);
            }
            GameState::Running | GameState::Paused => {
                self.render_board(frame, game_area, snapshot);
                if snapshot.state == GameState::Paused {
                    let overlay = centered(game_area, 20, 3);
                    frame.render_widget(Clear, overlay);
                    frame.render_widget(self.render_paused(), overlay);
                }
            }
        }

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    fn render_board(&self, frame: &mut Frame, area: Rect, snapshot: &FrameSnapshot) {
        let width = snapshot.grid_width as f64;
        let height = snapshot.grid_height as f64;

        let canvas = Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .marker(Marker::Braille)
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(|ctx| {
                // Canvas y grows upward, the board's grows downward.
                let flip = |y: f64| height - y;

                if let Some(food) = snapshot.food {
                    let radius = 0.45 * snapshot.pulse_scale as f64;
                    let cx = food.x as f64 + 0.5;
                    let cy = flip(food.y as f64 + 0.5);
                    fill_disc(ctx, cx, cy, radius, FOOD_COLOR);
                    ctx.draw(&Circle {
                        x: cx,
                        y: cy,
                        radius,
                        color: FOOD_COLOR,
                    });
                }

                ctx.layer();

                for (i, seg) in snapshot.segments.iter().enumerate().rev() {
                    let color = if i == 0 { HEAD_COLOR } else { BODY_COLOR };
                    let x = seg.x as f64 + SEGMENT_INSET;
                    let y = flip(seg.y as f64 + 1.0 - SEGMENT_INSET);
                    let size = 1.0 - 2.0 * SEGMENT_INSET;
                    fill_rect(ctx, x, y, size, size, color);
                }

                if let Some(head) = snapshot.segments.first() {
                    let (dx, dy) = eye_offset(snapshot.heading);
                    let ex = head.x as f64 + 0.5 + dx;
                    let ey = flip(head.y as f64 + 0.5 + dy);
                    ctx.draw(&Points {
                        coords: &[(ex, ey)],
                        color: EYE_COLOR,
                    });
                }

                ctx.layer();

                let cell = snapshot.cell_size.max(1) as f64;
                for p in &snapshot.particles {
                    let x = p.pos.x as f64 / cell;
                    let y = flip(p.pos.y as f64 / cell);
                    let color = faded(p.color, p.fade);
                    if p.size_fraction > 0.5 {
                        fill_disc(ctx, x, y, 0.1 * p.size_fraction as f64, color);
                    } else {
                        ctx.draw(&Points {
                            coords: &[(x, y)],
                            color,
                        });
                    }
                }
            });

        frame.render_widget(canvas, area);
    }

    fn render_stats(&self, snapshot: &FrameSnapshot, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(snapshot.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(format!("{}ms", snapshot.speed_ms), value),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
            Span::raw("    "),
            Span::styled("State: ", label),
            Span::styled(snapshot.state.label(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_paused(&self) -> Paragraph<'_> {
        Paragraph::new(Line::from(Span::styled(
            "PAUSED",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
    }

    fn render_game_over(&self, snapshot: &FrameSnapshot, metrics: &GameMetrics) -> Paragraph<'_> {
        let reason = match snapshot.end_reason {
            Some(EndReason::Collision(CollisionType::Wall)) => "You hit the wall",
            Some(EndReason::Collision(CollisionType::SelfCollision)) => "You bit yourself",
            Some(EndReason::BoardFull) => "Board cleared!",
            None => "",
        };

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(reason, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("Rounds: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    metrics.rounds_played.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("+/-", Style::default().fg(Color::Cyan)),
            Span::raw(" speed | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Offset of the eye dot from the head centre, in board units
fn eye_offset(heading: Direction) -> (f64, f64) {
    match heading {
        Direction::Up => (0.0, -0.25),
        Direction::Down => (0.0, 0.25),
        Direction::Left => (-0.25, 0.0),
        Direction::Right => (0.25, 0.0),
    }
}

fn faded(color: Rgb, fade: f32) -> Color {
    let f = fade.clamp(0.0, 1.0);
    let scale = |c: u8| (c as f32 * f).round() as u8;
    Color::Rgb(scale(color.0), scale(color.1), scale(color.2))
}

fn fill_rect(ctx: &mut Context, x: f64, y: f64, width: f64, height: f64, color: Color) {
    let cols = (width / FILL_STEP).ceil() as usize;
    let rows = (height / FILL_STEP).ceil() as usize;
    let coords: Vec<(f64, f64)> = (0..=rows)
        .flat_map(|r| (0..=cols).map(move |c| (x + c as f64 * FILL_STEP, y + r as f64 * FILL_STEP)))
        .filter(|&(px, py)| px <= x + width && py <= y + height)
        .collect();
    ctx.draw(&Points {
        coords: &coords,
        color,
    });
}

fn fill_disc(ctx: &mut Context, cx: f64, cy: f64, radius: f64, color: Color) {
    let steps = (radius / FILL_STEP).ceil() as i32;
    let coords: Vec<(f64, f64)> = (-steps..=steps)
        .flat_map(|r| (-steps..=steps).map(move |c| (c as f64 * FILL_STEP, r as f64 * FILL_STEP)))
        .filter(|&(dx, dy)| dx * dx + dy * dy <= radius * radius)
        .map(|(dx, dy)| (cx + dx, cy + dy))
        .collect();
    ctx.draw(&Points {
        coords: &coords,
        color,
    });
}

/// A `width` x `height` rect centred in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
