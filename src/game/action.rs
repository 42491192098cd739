/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// The exact reverse of this direction
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Discrete command fed into the game by the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Request a heading change for the next tick
    Move(Direction),
    /// Pause when running, resume when paused
    TogglePause,
    /// Start a new round (only honoured after game over)
    Restart,
    /// Shorten the tick interval by the manual step
    SpeedUp,
    /// Lengthen the tick interval by the manual step
    SlowDown,
}

impl From<Direction> for Command {
    fn from(direction: Direction) -> Self {
        Command::Move(direction)
    }
}
