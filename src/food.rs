use rand::Rng;

use crate::field::{Field, Position};
use crate::log;
use crate::snake::Snake;

pub struct Food {
    position: Position,
}

impl Food {
    /// Places the first piece of food somewhere the snake is not.
    pub fn spawn<R: Rng + ?Sized>(field: &Field, snake: &Snake, rng: &mut R) -> Self {
        let mut food = Food { position: snake.head() };
        food.respawn(field, snake, rng);
        food
    }

    #[cfg(test)]
    pub(crate) fn at(position: Position) -> Self {
        Food { position }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Samples random cells until one is free of the snake.
    ///
    /// # Panics
    ///
    /// If the snake covers the whole field, since no free cell exists.
    pub fn respawn<R: Rng + ?Sized>(&mut self, field: &Field, snake: &Snake, rng: &mut R) {
        assert!(
            snake.len() < field.cell_count(),
            "no free cell left for food: snake length {} on {} cells",
            snake.len(),
            field.cell_count()
        );

        let mut pos = field.random_position(rng);
        while snake.occupies(pos) {
            pos = field.random_position(rng);
        }

        debug_assert!(field.contains(pos));
        self.position = pos;
        log!("Food respawned at: {}", self.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_avoids_snake() {
        let field = Field::new(3).unwrap();
        let snake = Snake::with_heading(field, Direction::Right);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let food = Food::spawn(&field, &snake, &mut rng);
            assert!(!snake.occupies(food.position()));
            assert!(field.contains(food.position()));
        }
    }

    #[test]
    fn test_respawn_finds_the_only_free_cell() {
        let field = Field::new(2).unwrap();
        let body = [Position::new(0, 0), Position::new(1, 0), Position::new(1, 1)];
        let snake = Snake::from_body(field, &body, Direction::Down);
        let mut rng = StdRng::seed_from_u64(7);

        let mut food = Food::at(Position::new(1, 1));
        food.respawn(&field, &snake, &mut rng);
        assert_eq!(food.position(), Position::new(0, 1));
    }

    #[test]
    #[should_panic(expected = "no free cell left for food")]
    fn test_respawn_on_full_field_panics() {
        let field = Field::new(1).unwrap();
        let snake = Snake::with_heading(field, Direction::Up);
        let mut rng = StdRng::seed_from_u64(1);
        Food::spawn(&field, &snake, &mut rng);
    }
}
