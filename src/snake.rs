use std::collections::VecDeque;
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::field::{Field, Position};
use crate::log;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    pub fn axis(self) -> Axis {
        match self {
            Up | Down => Axis::Vertical,
            Left | Right => Axis::Horizontal,
        }
    }

    /// Neighbouring cell in this direction, not yet wrapped onto the field.
    pub fn apply(self, pos: Position) -> Position {
        match self {
            Up => Position::new(pos.x, pos.y - 1),
            Down => Position::new(pos.x, pos.y + 1),
            Left => Position::new(pos.x - 1, pos.y),
            Right => Position::new(pos.x + 1, pos.y),
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&Right)
    }

    pub fn glyph(self) -> char {
        match self {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

/// Buffers the direction commands received between two ticks and resolves
/// them to a single heading per tick.
///
/// Commands on the same axis as the current heading (repeats and reversals)
/// never take effect. When several valid commands are queued, the most recent
/// one wins and is consumed together with everything queued before it; the
/// commands queued after it stay for the following ticks.
#[derive(Clone, Debug)]
pub struct DirectionQueue {
    current: Direction,
    pending: Vec<Direction>,
}

impl DirectionQueue {
    pub fn new(current: Direction) -> Self {
        DirectionQueue { current, pending: vec![] }
    }

    pub fn current(&self) -> Direction {
        self.current
    }

    #[cfg(test)]
    pub(crate) fn pending(&self) -> &[Direction] {
        &self.pending
    }

    pub fn push(&mut self, dir: Direction) {
        self.pending.push(dir);
    }

    pub fn pop(&mut self) -> Direction {
        let axis = self.current.axis();

        if let Some(idx) = self.pending.iter().rposition(|dir| dir.axis() != axis) {
            self.current = self.pending[idx];
            self.pending.drain(..=idx);
        }

        self.current
    }
}

impl fmt::Display for DirectionQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ current: {:?}, pending: {:?} }}", self.current, self.pending)
    }
}

pub struct Snake {
    field: Field,
    body: VecDeque<Position>,
    dir_queue: DirectionQueue,
    alive: bool,
}

impl Snake {
    /// Spawns a one-cell snake in the middle of the field with a random heading.
    pub fn new<R: Rng + ?Sized>(field: Field, rng: &mut R) -> Self {
        Self::with_heading(field, Direction::random(rng))
    }

    pub fn with_heading(field: Field, heading: Direction) -> Self {
        let mut body = VecDeque::new();
        body.push_back(field.center());

        let snake = Snake { field, body, dir_queue: DirectionQueue::new(heading), alive: true };
        log!("Snake created: {}", snake);
        snake
    }

    pub fn change_direction(&mut self, dir: Direction) {
        if self.alive {
            self.dir_queue.push(dir);
        }
    }

    /// Advances the snake one cell. The tail is kept when the new head lands
    /// on `food`. Self-collision is checked after the tail has moved, so
    /// following the tail closely is allowed. Does nothing once dead.
    pub fn move_towards(&mut self, food: Position) {
        if !self.alive {
            return;
        }

        let new_head = self.field.wrap(self.dir_queue.pop().apply(self.head()));

        self.body.push_front(new_head);
        if new_head != food {
            self.body.pop_back();
        }

        if self.body.iter().skip(1).any(|pos| *pos == new_head) {
            self.alive = false;
            log!("Snake collided with itself at {}", new_head);
        }
    }

    pub fn head(&self) -> Position {
        // The body is never empty: it starts with one cell and every move
        // pushes before it pops.
        self.body[0]
    }

    pub fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    pub fn heading(&self) -> Direction {
        self.dir_queue.current()
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }
}

impl fmt::Display for Snake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ body: [")?;
        for (i, pos) in self.body.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", pos)?;
        }
        write!(f, "], dir_queue: {}, alive: {} }}", self.dir_queue, self.alive)
    }
}

#[cfg(test)]
impl Snake {
    pub(crate) fn from_body(field: Field, body: &[Position], heading: Direction) -> Self {
        Snake {
            field,
            body: body.iter().copied().collect(),
            dir_queue: DirectionQueue::new(heading),
            alive: true,
        }
    }
}
