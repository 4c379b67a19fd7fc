use std::time::Duration;

use clap::ValueEnum;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::SnakeError;
use crate::field::Field;
use crate::food::Food;
use crate::log;
use crate::snake::{Direction, Snake};

/// Difficulty. The multiplier speeds up the ticks and scales the score.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

impl Default for Level {
    fn default() -> Self {
        Level::Easy
    }
}

impl Level {
    pub fn multiplier(self) -> u32 {
        match self {
            Level::Easy => 1,
            Level::Medium => 2,
            Level::Hard => 4,
        }
    }

    pub fn tick_interval(self, base: Duration) -> Duration {
        base / self.multiplier()
    }

    pub fn next(self) -> Self {
        match self {
            Level::Easy => Level::Medium,
            Level::Medium => Level::Hard,
            Level::Hard => Level::Easy,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Level::Easy => "Easy",
            Level::Medium => "Medium",
            Level::Hard => "Hard",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// `(length - 1) * multiplier`: the spawn segment is not counted.
    GrowthOnly,
    /// `length * multiplier`.
    FullLength,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        ScoringPolicy::GrowthOnly
    }
}

impl ScoringPolicy {
    pub fn score(self, snake_len: usize, level: Level) -> u64 {
        let counted = match self {
            ScoringPolicy::GrowthOnly => snake_len.saturating_sub(1),
            ScoringPolicy::FullLength => snake_len,
        };
        counted as u64 * level.multiplier() as u64
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game was already over, nothing moved.
    Idle,
    Moved,
    Ate,
    Died,
    /// The snake ate the last piece of food that fit on the field.
    FieldFilled,
}

/// One game: the field, the snake, the food and the running score.
pub struct Game {
    field: Field,
    snake: Snake,
    food: Food,
    level: Level,
    scoring: ScoringPolicy,
    score: u64,
    won: bool,
}

impl Game {
    pub fn new<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Result<Self, SnakeError> {
        // The spawned snake takes one cell, food needs another
        let field = Field::new(config.grid_size)
            .filter(|field| field.cell_count() >= 2)
            .ok_or(SnakeError::InvalidField(config.grid_size))?;
        let snake = Snake::new(field, rng);
        let food = Food::spawn(&field, &snake, rng);

        Ok(Self::from_parts(field, snake, food, config.level, config.scoring))
    }

    pub fn from_parts(field: Field, snake: Snake, food: Food, level: Level, scoring: ScoringPolicy) -> Self {
        let score = scoring.score(snake.len(), level);
        Game { field, snake, food, level, scoring, score, won: false }
    }

    pub fn change_direction(&mut self, dir: Direction) {
        self.snake.change_direction(dir);
    }

    /// Runs one simulation step.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Idle;
        }

        self.snake.move_towards(self.food.position());

        let ate = self.snake.head() == self.food.position();
        if ate {
            self.score = self.scoring.score(self.snake.len(), self.level);

            if self.snake.len() < self.field.cell_count() {
                self.food.respawn(&self.field, &self.snake, rng);
            } else if self.snake.is_alive() {
                self.won = true;
                log!("Field filled, final score {}", self.score);
                return TickOutcome::FieldFilled;
            }
        }

        if !self.snake.is_alive() {
            log!("Game over: {}, score {}", self.snake, self.score);
            TickOutcome::Died
        } else if ate {
            TickOutcome::Ate
        } else {
            TickOutcome::Moved
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn is_running(&self) -> bool {
        self.snake.is_alive() && !self.won
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn level(&self) -> Level {
        self.level
    }
}
