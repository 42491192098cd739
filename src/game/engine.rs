use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;

use super::{
    action::{Command, Direction},
    board::Board,
    config::GameConfig,
    particles::ParticleEngine,
    state::{CollisionType, EndReason, GameState, Position, Snake},
};

/// What a call to [`GameEngine::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing changed
    Idle,
    /// The snake advanced one cell
    Moved,
    /// The snake advanced onto food and grew
    Ate,
    /// The round ended this tick
    Ended(EndReason),
}

impl TickOutcome {
    /// True when the body advanced this tick
    pub fn moved(&self) -> bool {
        matches!(self, TickOutcome::Moved | TickOutcome::Ate)
    }
}

/// Authoritative movement and collision automaton.
///
/// Owns everything that lives for one round: snake, food, score, speed and
/// state, plus the particle pool that eat events feed.
pub struct GameEngine {
    config: GameConfig,
    board: Board,
    rng: StdRng,
    snake: Snake,
    pending_direction: Direction,
    /// Body as it was before the last move, for interpolation
    previous_body: Vec<Position>,
    food: Option<Position>,
    score: u32,
    speed_ms: u64,
    state: GameState,
    end_reason: Option<EndReason>,
    /// Number of completed moves this round
    moves: u64,
    particles: ParticleEngine,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine whose food placement and particles are reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let board = Board::new(config.grid_width, config.grid_height);
        let snake = Self::initial_snake(&config);
        let particles = ParticleEngine::new(config.particles.clone());

        let mut engine = Self {
            board,
            rng,
            pending_direction: snake.direction,
            previous_body: snake.to_vec(),
            snake,
            food: None,
            score: 0,
            speed_ms: config.initial_speed_ms,
            state: GameState::Running,
            end_reason: None,
            moves: 0,
            particles,
            config,
        };
        engine.reset_round();
        engine
    }

    fn initial_snake(config: &GameConfig) -> Snake {
        let center_x = (config.grid_width / 2) as i32;
        let center_y = (config.grid_height / 2) as i32;

        Snake::new(
            Position::new(center_x, center_y),
            Direction::Right,
            config.initial_snake_length,
        )
    }

    /// Reinitialize all per-round state
    fn reset_round(&mut self) {
        self.snake = Self::initial_snake(&self.config);
        self.pending_direction = self.snake.direction;
        self.previous_body = self.snake.to_vec();
        self.score = 0;
        self.speed_ms = self.config.initial_speed_ms;
        self.state = GameState::Running;
        self.end_reason = None;
        self.moves = 0;
        self.particles.clear();
        self.food = self.board.allocate_food(self.snake.occupied(), &mut self.rng);

        log::info!(
            "round started: {}x{} board, speed {}ms, food at {:?}",
            self.board.width,
            self.board.height,
            self.speed_ms,
            self.food
        );
    }

    /// Apply a command from the input layer
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Move(direction) => self.set_pending_direction(direction),
            Command::TogglePause => match self.state {
                GameState::Running => self.pause(),
                GameState::Paused => self.resume(),
                GameState::Over => {}
            },
            Command::Restart => self.restart(),
            Command::SpeedUp => self.adjust_speed(-(self.config.manual_speed_step_ms as i64)),
            Command::SlowDown => self.adjust_speed(self.config.manual_speed_step_ms as i64),
        }
    }

    /// Buffer a heading for the next tick.
    ///
    /// Ignored when not running or when `direction` reverses the current
    /// heading.
    pub fn set_pending_direction(&mut self, direction: Direction) {
        if self.state != GameState::Running || self.snake.direction.is_opposite(direction) {
            return;
        }
        self.pending_direction = direction;
    }

    pub fn pause(&mut self) {
        if self.state == GameState::Running {
            self.state = GameState::Paused;
            log::info!("paused at score {}", self.score);
        }
    }

    pub fn resume(&mut self) {
        if self.state == GameState::Paused {
            self.state = GameState::Running;
            log::info!("resumed");
        }
    }

    /// Start a new round. Only valid once the current round is over.
    pub fn restart(&mut self) {
        if self.state == GameState::Over {
            log::info!("restarting after score {}", self.score);
            self.reset_round();
        }
    }

    /// Advance the simulation by exactly one step
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != GameState::Running {
            return TickOutcome::Idle;
        }

        self.snake.direction = self.pending_direction;
        let new_head = self.snake.head().moved_in_direction(self.snake.direction);

        if let Some(collision) = self.check_collision(new_head) {
            return self.end_round(EndReason::Collision(collision));
        }

        let ate_food = self.food == Some(new_head);

        self.previous_body = self.snake.to_vec();
        self.snake.advance(new_head, ate_food);

        if ate_food {
            self.on_food_eaten(new_head);
        }

        self.moves += 1;

        if ate_food && self.food.is_none() {
            return self.end_round(EndReason::BoardFull);
        }

        if ate_food {
            TickOutcome::Ate
        } else {
            TickOutcome::Moved
        }
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, pos: Position) -> Option<CollisionType> {
        if !self.board.contains(pos) {
            return Some(CollisionType::Wall);
        }

        let growing = self.food == Some(pos);
        if self.snake.would_collide(pos, growing) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    fn on_food_eaten(&mut self, cell: Position) {
        self.score += 1;
        if self.score % self.config.speed_up_every == 0 {
            self.adjust_speed(-(self.config.speed_step_ms as i64));
        }

        let center = self.board.cell_center(cell, self.config.cell_size);
        self.particles
            .spawn_burst(center, self.config.particles.burst_size, &mut self.rng);

        self.food = self.board.allocate_food(self.snake.occupied(), &mut self.rng);
        log::debug!("score {}, next food at {:?}", self.score, self.food);
    }

    fn adjust_speed(&mut self, delta_ms: i64) {
        if self.state == GameState::Over {
            return;
        }
        let speed = (self.speed_ms as i64 + delta_ms).clamp(
            self.config.min_speed_ms as i64,
            self.config.max_speed_ms as i64,
        ) as u64;
        if speed != self.speed_ms {
            log::debug!("tick interval {}ms -> {}ms", self.speed_ms, speed);
            self.speed_ms = speed;
        }
    }

    fn end_round(&mut self, reason: EndReason) -> TickOutcome {
        self.state = GameState::Over;
        self.end_reason = Some(reason);
        log::info!(
            "round over: {:?} with score {} after {} moves",
            reason,
            self.score,
            self.moves
        );
        TickOutcome::Ended(reason)
    }

    /// Step the particle pool; called from the render clock
    pub fn advance_particles(&mut self) {
        self.particles.advance_all();
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn previous_body(&self) -> &[Position] {
        &self.previous_body
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Current tick interval in milliseconds
    pub fn speed_ms(&self) -> u64 {
        self.speed_ms
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.speed_ms)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn moves(&self) -> u64 {
        self.moves
    }

    pub fn particles(&self) -> &ParticleEngine {
        &self.particles
    }

    #[cfg(test)]
    pub(crate) fn particles_mut(&mut self) -> &mut ParticleEngine {
        &mut self.particles
    }

    /// Replace the snake and food, for setting up test positions.
    ///
    /// Food must be on the board and off the snake.
    #[cfg(test)]
    pub(crate) fn place(&mut self, snake: Snake, food: Option<Position>) {
        assert!(
            snake.to_vec().iter().all(|&cell| self.board.contains(cell)),
            "snake must lie on the board"
        );
        if let Some(food) = food {
            assert!(self.board.contains(food), "food must lie on the board");
            assert!(!snake.contains(food), "food must not overlap the snake");
        }
        self.pending_direction = snake.direction;
        self.previous_body = snake.to_vec();
        self.snake = snake;
        self.food = food;
    }

    /// Raise the score, for setting up test positions
    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: u32) {
        assert!(score >= self.score, "score never decreases");
        self.score = score;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(config: GameConfig) -> GameEngine {
        GameEngine::with_seed(config, 1234)
    }

    fn snake(cells: &[(i32, i32)], direction: Direction) -> Snake {
        let cells = cells.iter().map(|&(x, y)| Position::new(x, y)).collect();
        Snake::from_segments(cells, direction).unwrap()
    }

    #[test]
    fn test_reset() {
        let engine = engine(GameConfig::default());

        assert_eq!(engine.state(), GameState::Running);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.moves(), 0);
        assert_eq!(engine.snake().len(), 3);
        assert_eq!(engine.snake().head(), Position::new(15, 10));
        assert_eq!(engine.speed_ms(), 150);
        let food = engine.food().unwrap();
        assert!(!engine.snake().contains(food));
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine(GameConfig::small());
        engine.place(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            Some(Position::new(0, 0)),
        );

        let outcome = engine.tick();

        assert_eq!(outcome, TickOutcome::Moved);
        assert_eq!(engine.moves(), 1);
        assert_eq!(engine.snake().head(), Position::new(6, 5));
        assert_eq!(engine.snake().len(), 3);
        assert_eq!(
            engine.previous_body(),
            &[Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)]
        );
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine(GameConfig::small());
        engine.place(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            Some(Position::new(6, 5)),
        );

        let outcome = engine.tick();

        assert_eq!(outcome, TickOutcome::Ate);
        assert_eq!(engine.score(), 1);
        assert_eq!(engine.snake().len(), 4);
        assert_eq!(engine.particles().len(), 18);
        let food = engine.food().unwrap();
        assert!(!engine.snake().contains(food));
    }

    #[test]
    fn test_wall_collision_at_right_edge() {
        let mut engine = engine(GameConfig::new(30, 20));
        engine.place(
            snake(&[(29, 10), (28, 10), (27, 10)], Direction::Right),
            Some(Position::new(0, 0)),
        );
        let body_before = engine.snake().to_vec();

        let outcome = engine.tick();

        assert_eq!(outcome, TickOutcome::Ended(EndReason::Collision(CollisionType::Wall)));
        assert_eq!(engine.state(), GameState::Over);
        assert_eq!(engine.snake().to_vec(), body_before);
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine(GameConfig::small());
        engine.place(
            Snake::new(Position::new(5, 5), Direction::Right, 5),
            Some(Position::new(9, 9)),
        );

        // Right: (6,5) (5,5) (4,5) (3,5) (2,5)
        engine.tick();
        engine.set_pending_direction(Direction::Down);
        engine.tick();
        engine.set_pending_direction(Direction::Left);
        engine.tick();
        engine.set_pending_direction(Direction::Up);
        // (5,5) is still occupied mid-body
        let outcome = engine.tick();

        assert_eq!(
            outcome,
            TickOutcome::Ended(EndReason::Collision(CollisionType::SelfCollision))
        );
        assert_eq!(engine.state(), GameState::Over);
    }

    #[test]
    fn test_following_own_tail_is_safe() {
        let mut engine = engine(GameConfig::small());
        // A 2x2 loop: the head moves into the cell the tail is vacating.
        engine.place(
            snake(&[(5, 5), (5, 6), (6, 6), (6, 5)], Direction::Up),
            Some(Position::new(0, 0)),
        );
        engine.set_pending_direction(Direction::Right);

        assert_eq!(engine.tick(), TickOutcome::Moved);
        assert_eq!(engine.snake().head(), Position::new(6, 5));
        assert_eq!(engine.snake().occupied().len(), engine.snake().len());
        assert!(engine.snake().contains(engine.snake().head()));
    }

    #[test]
    fn test_food_avoids_head_after_tail_chase() {
        let config = GameConfig {
            grid_width: 3,
            grid_height: 2,
            ..GameConfig::default()
        };
        let mut engine = engine(config);
        // Loop around the left 2x2 block, then eat in the free column.
        engine.place(
            snake(&[(0, 0), (0, 1), (1, 1), (1, 0)], Direction::Up),
            Some(Position::new(2, 1)),
        );
        engine.set_pending_direction(Direction::Right);
        assert_eq!(engine.tick(), TickOutcome::Moved);
        assert_eq!(engine.snake().head(), Position::new(1, 0));

        engine.set_pending_direction(Direction::Down);
        assert_eq!(engine.tick(), TickOutcome::Moved);
        engine.set_pending_direction(Direction::Right);
        assert_eq!(engine.tick(), TickOutcome::Ate);

        assert_eq!(engine.snake().occupied().len(), engine.snake().len());
        let food = engine.food().unwrap();
        assert!(!engine.snake().contains(food));
    }

    #[test]
    #[should_panic(expected = "food must not overlap the snake")]
    fn test_place_rejects_food_on_body() {
        let mut engine = engine(GameConfig::small());
        engine.place(
            snake(&[(5, 5), (5, 6), (6, 6), (6, 5)], Direction::Up),
            Some(Position::new(6, 5)),
        );
    }

    #[test]
    #[should_panic(expected = "score never decreases")]
    fn test_set_score_cannot_lower() {
        let mut engine = engine(GameConfig::small());
        engine.set_score(4);
        engine.set_score(1);
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = engine(GameConfig::small());
        assert_eq!(engine.snake().direction, Direction::Right);

        engine.set_pending_direction(Direction::Left);
        engine.tick();

        assert_eq!(engine.snake().direction, Direction::Right);
    }

    #[test]
    fn test_quick_double_turn_cannot_reverse() {
        let mut engine = engine(GameConfig::small());
        engine.set_pending_direction(Direction::Up);
        // Still heading right until the tick commits Up
        engine.set_pending_direction(Direction::Left);
        engine.tick();

        assert_eq!(engine.snake().direction, Direction::Up);
    }

    #[test]
    fn test_speed_up_on_threshold() {
        let mut engine = engine(GameConfig::default());
        engine.place(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            Some(Position::new(6, 5)),
        );
        engine.set_score(2);

        assert_eq!(engine.tick(), TickOutcome::Ate);

        assert_eq!(engine.score(), 3);
        assert_eq!(engine.speed_ms(), 140);
        assert_eq!(engine.snake().len(), 4);
        let food = engine.food().unwrap();
        assert!(!engine.snake().contains(food));
    }

    #[test]
    fn test_speed_floor() {
        let config = GameConfig {
            initial_speed_ms: 35,
            ..GameConfig::default()
        };
        let mut engine = engine(config);
        engine.place(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            Some(Position::new(6, 5)),
        );
        engine.set_score(2);

        engine.tick();
        assert_eq!(engine.speed_ms(), 30);
    }

    #[test]
    fn test_manual_speed_commands() {
        let mut engine = engine(GameConfig::default());
        engine.apply(Command::SpeedUp);
        assert_eq!(engine.speed_ms(), 130);
        engine.apply(Command::SlowDown);
        engine.apply(Command::SlowDown);
        assert_eq!(engine.speed_ms(), 170);

        for _ in 0..50 {
            engine.apply(Command::SpeedUp);
        }
        assert_eq!(engine.speed_ms(), 30);
        for _ in 0..50 {
            engine.apply(Command::SlowDown);
        }
        assert_eq!(engine.speed_ms(), 400);
    }

    #[test]
    fn test_board_full_ends_round() {
        let config = GameConfig {
            grid_width: 4,
            grid_height: 1,
            ..GameConfig::default()
        };
        let mut engine = engine(config);
        engine.place(
            snake(&[(2, 0), (1, 0), (0, 0)], Direction::Right),
            Some(Position::new(3, 0)),
        );

        assert_eq!(engine.tick(), TickOutcome::Ended(EndReason::BoardFull));
        assert_eq!(engine.state(), GameState::Over);
        assert_eq!(engine.snake().len(), 4);
        assert_eq!(engine.food(), None);
        assert_eq!(engine.score(), 1);
    }

    #[test]
    fn test_pause_resume() {
        let mut engine = engine(GameConfig::small());
        engine.resume();
        assert_eq!(engine.state(), GameState::Running);

        engine.apply(Command::TogglePause);
        assert_eq!(engine.state(), GameState::Paused);
        let body = engine.snake().to_vec();
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.snake().to_vec(), body);

        // Direction input is ignored while paused
        engine.set_pending_direction(Direction::Up);
        assert_eq!(engine.pending_direction(), Direction::Right);

        engine.apply(Command::TogglePause);
        assert_eq!(engine.state(), GameState::Running);
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = engine(GameConfig::small());
        engine.place(Snake::new(Position::new(9, 5), Direction::Right, 3), None);
        engine.tick();
        assert_eq!(engine.state(), GameState::Over);
        let moves_before = engine.moves();

        assert_eq!(engine.tick(), TickOutcome::Idle);
        engine.pause();
        assert_eq!(engine.state(), GameState::Over);
        assert_eq!(engine.moves(), moves_before);
    }

    #[test]
    fn test_restart_only_from_over() {
        let mut engine = engine(GameConfig::small());
        engine.tick();
        engine.restart();
        assert_eq!(engine.moves(), 1);

        engine.place(
            Snake::new(Position::new(9, 5), Direction::Right, 3),
            Some(Position::new(8, 8)),
        );
        engine.set_score(4);
        engine.apply(Command::SpeedUp);
        let mut rng = StdRng::seed_from_u64(0);
        engine.particles_mut().spawn_burst(glam::Vec2::ZERO, 5, &mut rng);
        engine.tick();
        assert_eq!(engine.state(), GameState::Over);

        engine.apply(Command::Restart);
        assert_eq!(engine.state(), GameState::Running);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.moves(), 0);
        assert_eq!(engine.speed_ms(), 150);
        assert_eq!(engine.snake().len(), 3);
        assert!(engine.particles().is_empty());
        assert_eq!(engine.end_reason(), None);
    }
}
