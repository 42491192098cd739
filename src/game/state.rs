use std::collections::{HashSet, VecDeque};

use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
///
/// The body is stored head first. `occupied` mirrors the body so that
/// membership checks do not scan the whole snake.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
    occupied: HashSet<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let body: VecDeque<Position> = (0..length as i32)
            .map(|i| head.moved_by(-dx * i, -dy * i))
            .collect();
        let occupied = body.iter().copied().collect();

        Self {
            body,
            occupied,
            direction,
        }
    }

    /// Build a snake from explicit segments, head first.
    ///
    /// Returns `None` if the segments are empty or overlap.
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Option<Self> {
        let occupied: HashSet<Position> = segments.iter().copied().collect();
        if segments.is_empty() || occupied.len() != segments.len() {
            return None;
        }
        Some(Self {
            body: segments.into(),
            occupied,
            direction,
        })
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn segment(&self, index: usize) -> Option<Position> {
        self.body.get(index).copied()
    }

    pub fn occupied(&self) -> &HashSet<Position> {
        &self.occupied
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.occupied.contains(&pos)
    }

    /// Check whether moving the head onto `pos` would hit the body.
    ///
    /// When the snake is not growing the tail moves out of the way this
    /// tick, so its cell does not count.
    pub fn would_collide(&self, pos: Position, growing: bool) -> bool {
        if !self.contains(pos) {
            return false;
        }
        growing || pos != self.tail()
    }

    /// Move the head onto `head`, growing by one segment if `grow` is set.
    ///
    /// The tail is dropped before the head is added, so a head entering the
    /// cell the tail just left stays in `occupied`.
    pub fn advance(&mut self, head: Position, grow: bool) {
        if !grow {
            self.pop_tail();
        }
        self.push_head(head);
    }

    fn push_head(&mut self, pos: Position) {
        self.body.push_front(pos);
        self.occupied.insert(pos);
    }

    fn pop_tail(&mut self) -> Option<Position> {
        let tail = self.body.pop_back()?;
        self.occupied.remove(&tail);
        Some(tail)
    }

    pub fn to_vec(&self) -> Vec<Position> {
        self.body.iter().copied().collect()
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Collision(CollisionType),
    /// The snake covers every cell, nowhere left for food
    BoardFull,
}

/// Lifecycle state of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Running,
    Paused,
    Over,
}

impl GameState {
    pub fn label(&self) -> &'static str {
        match self {
            GameState::Running => "Running",
            GameState::Paused => "Paused",
            GameState::Over => "Game Over",
        }
    }
}
