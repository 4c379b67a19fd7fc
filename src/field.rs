use std::fmt;

use rand::Rng;

/// A cell on the playing field. Coordinates are signed so a step off the
/// edge can be represented before it is wrapped back onto the torus.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Square toroidal grid. Moving past one edge re-enters at the opposite one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Field {
    size: u16,
}

impl Field {
    pub fn new(size: u16) -> Option<Self> {
        if size == 0 {
            None
        } else {
            Some(Field { size })
        }
    }

    pub fn size(&self) -> u16 {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        self.size as usize * self.size as usize
    }

    pub fn center(&self) -> Position {
        let half = (self.size / 2) as i32;
        Position::new(half, half)
    }

    pub fn contains(&self, pos: Position) -> bool {
        let size = self.size as i32;
        (0..size).contains(&pos.x) && (0..size).contains(&pos.y)
    }

    /// Reduces both coordinates modulo the field size. Always lands in `[0, size)`.
    pub fn wrap(&self, pos: Position) -> Position {
        let size = self.size as i32;
        Position::new(pos.x.rem_euclid(size), pos.y.rem_euclid(size))
    }

    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let size = self.size as i32;
        Position::new(rng.gen_range(0..size), rng.gen_range(0..size))
    }
}
