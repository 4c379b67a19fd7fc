use std::process::exit;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;

use crate::config::GameConfig;
use crate::error::SnakeError;
use crate::field::Position;
use crate::game::{Game, Level, TickOutcome};
use crate::high_score::{HighScore, HighScoreStore};
use crate::log;
use crate::snake::Direction::{self, *};
use crate::term::{TermCoords, TermManager};

const INPUT_POLL: Duration = Duration::from_millis(20);
const HUD_ROWS: u16 = 1;

const SNAKE_BODY_CELL: [char; 2] = ['█', '█'];
const FOOD_CELL: [char; 2] = ['(', ')'];
const DEAD_SNAKE_CELL: [char; 2] = ['X', 'X'];
const EMPTY_CELL: [char; 2] = [' ', ' '];

/// Terminal front end: intro screen, input mapping, timed ticks, game over
/// screen and the high-score table.
pub struct SnakeApp {
    term: TermManager,
    config: GameConfig,
    store: HighScoreStore,
    rng: StdRng,
    paused: bool,
    origin: TermCoords,
    session_best: u64,
}

impl SnakeApp {
    pub fn new(config: GameConfig, store: HighScoreStore, rng: StdRng) -> Result<Self, SnakeError> {
        Ok(SnakeApp {
            term: TermManager::new()?,
            config,
            store,
            rng,
            paused: false,
            origin: (0, HUD_ROWS),
            session_best: 0,
        })
    }

    pub fn initialize(&mut self) -> Result<(), SnakeError> {
        let grid = self.config.grid_size;
        let needed = (grid * 2 + 2, grid + 2 + HUD_ROWS);
        let available = self.term.size();
        if needed.0 > available.0 || needed.1 > available.1 {
            return Err(SnakeError::TerminalTooSmall { needed, available });
        }

        self.origin = ((available.0 - needed.0) / 2, (available.1 - needed.1) / 2 + HUD_ROWS);
        self.store.create_user(&self.config.player_name)?;
        self.term.setup()?;
        Ok(())
    }

    pub fn show_intro(&mut self) -> Result<(), SnakeError> {
        loop {
            let level_line = format!("Level: {}  (1/2/3 or Tab to change)", self.config.level.name());
            self.term.show_message(&[
                "Arrow keys or WASD to move",
                "Esc to pause",
                "CTRL+C to quit",
                "",
                level_line.as_str(),
                "H to show high scores",
                "",
                "Press any other key to begin",
            ])?;

            let key = self.term.read_key_blocking()?;
            if is_ctrl_c(&key) {
                self.clean_exit();
            }

            match key.code {
                KeyCode::Char('1') => self.config.level = Level::Easy,
                KeyCode::Char('2') => self.config.level = Level::Medium,
                KeyCode::Char('3') => self.config.level = Level::Hard,
                KeyCode::Tab => self.config.level = self.config.level.next(),
                KeyCode::Char('h') | KeyCode::Char('H') => self.show_high_scores()?,
                _ => break,
            }
        }

        self.term.hide_message()?;
        Ok(())
    }

    pub fn play(&mut self) -> Result<(), SnakeError> {
        self.term.clear()?;
        let size = self.config.grid_size;
        self.term.draw_borders(
            (self.origin.0, self.origin.1),
            (size * 2 + 2, size + 2),
        )?;

        let mut game = Game::new(&self.config, &mut self.rng)?;
        let interval = game.level().tick_interval(self.config.base_interval());
        let mut next_tick = Instant::now() + interval;

        log!("New game: level {:?}, tick every {:?}", game.level(), interval);
        self.draw_game(&game)?;

        loop {
            let wait = next_tick.saturating_duration_since(Instant::now()).min(INPUT_POLL);

            for key_ev in self.term.read_key_events_queue(wait)? {
                if is_ctrl_c(&key_ev) {
                    self.clean_exit();
                }

                if key_ev.code == KeyCode::Esc {
                    self.toggle_pause()?;
                } else if let Some(dir) = key_direction(key_ev.code) {
                    if !self.paused {
                        game.change_direction(dir);
                    }
                }
            }

            if self.paused {
                next_tick = Instant::now() + interval;
                continue;
            }

            let now = Instant::now();
            if now < next_tick {
                continue;
            }
            next_tick = next_deadline(next_tick, now, interval);

            let outcome = game.tick(&mut self.rng);
            self.draw_game(&game)?;

            if matches!(outcome, TickOutcome::Died | TickOutcome::FieldFilled) {
                self.game_over(&game)?;
                break;
            }
        }

        // Quit if the user CTRL+C's after the game
        if is_ctrl_c(&self.term.read_key_blocking()?) {
            self.clean_exit();
        }

        Ok(())
    }

    pub fn restore_terminal(&mut self) {
        let _ = self.term.restore();
    }

    ///////////////////////////////////////////////////////////////////////////

    fn clean_exit(&mut self) -> ! {
        self.restore_terminal();
        log!("Application exited");
        exit(0);
    }

    fn game_over(&mut self, game: &Game) -> Result<(), SnakeError> {
        let score = game.score();
        self.session_best = self.session_best.max(score);
        self.store.update_highest_score(&self.config.player_name, score)?;

        let title = if game.is_won() {"You won!"} else {"Game over!"};
        let score_line = format!("Score: {}", score);
        let best_line = format!("Best: {}", self.best_score());

        let mut lines: Vec<String> = vec![title.to_string(), score_line, best_line, String::new()];
        let table = self.store.highest_scores(self.config.high_score_limit);
        if !table.is_empty() {
            lines.extend(high_score_lines(&table));
            lines.push(String::new());
        }
        lines.push("Press any key to play again,".to_string());
        lines.push("or CTRL+C to quit.".to_string());

        let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
        self.term.show_message(&refs)?;
        Ok(())
    }

    fn show_high_scores(&mut self) -> Result<(), SnakeError> {
        let table = self.store.highest_scores(self.config.high_score_limit);
        let mut lines = high_score_lines(&table);
        lines.push(String::new());
        lines.push("Press any key to go back".to_string());

        let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
        self.term.show_message(&refs)?;

        if is_ctrl_c(&self.term.read_key_blocking()?) {
            self.clean_exit();
        }
        Ok(())
    }

    fn draw_game(&mut self, game: &Game) -> Result<(), SnakeError> {
        let snake = game.snake();
        let size = game.field().size() as i32;

        for y in 0..size {
            for x in 0..size {
                let pos = Position::new(x, y);
                let cell = if pos == snake.head() {
                    let glyph = snake.heading().glyph();
                    [glyph, glyph]
                } else if snake.occupies(pos) {
                    SNAKE_BODY_CELL
                } else if pos == game.food().position() {
                    FOOD_CELL
                } else {
                    EMPTY_CELL
                };
                self.print_cell(pos, cell)?;
            }
        }

        if !snake.is_alive() {
            for pos in snake.body().iter() {
                self.print_cell(*pos, DEAD_SNAKE_CELL)?;
            }
        }

        let hud = format!(
            "Score: {:<6} Level: {:<7} Best: {}",
            game.score(),
            game.level().name(),
            self.best_score().max(game.score()),
        );
        self.term.print_str_at((self.origin.0, self.origin.1 - HUD_ROWS), &hud)?;
        self.term.flush()?;
        Ok(())
    }

    fn print_cell(&mut self, pos: Position, cell: [char; 2]) -> Result<(), SnakeError> {
        let x = self.origin.0 + 1 + pos.x as u16 * 2;
        let y = self.origin.1 + 1 + pos.y as u16;
        self.term.print_at((x, y), cell[0])?;
        self.term.print_at((x + 1, y), cell[1])?;
        Ok(())
    }

    fn best_score(&self) -> u64 {
        self.store
            .highest_score(&self.config.player_name)
            .unwrap_or(0)
            .max(self.session_best)
    }

    fn toggle_pause(&mut self) -> Result<(), SnakeError> {
        if !self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or Ctrl+C to quit"])?;
        } else {
            self.term.hide_message()?;
        }

        self.paused = !self.paused;
        Ok(())
    }
}

/// Deadline of the tick after the one firing at `now`. A tick that fires late
/// pushes the schedule back instead of queueing catch-up ticks.
fn next_deadline(deadline: Instant, now: Instant, interval: Duration) -> Instant {
    deadline.max(now) + interval
}

fn high_score_lines(table: &[HighScore]) -> Vec<String> {
    let mut lines = vec!["High scores".to_string()];
    if table.is_empty() {
        lines.push("No scores yet".to_string());
    }
    lines.extend(table.iter().map(|entry| entry.to_string()));
    lines
}

/// Maps arrow keys and WASD to directions.
pub fn key_direction(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Up),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Left),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Right),
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(key_direction(KeyCode::Up), Some(Up));
        assert_eq!(key_direction(KeyCode::Char('a')), Some(Left));
        assert_eq!(key_direction(KeyCode::Char('S')), Some(Down));
        assert_eq!(key_direction(KeyCode::Right), Some(Right));
        assert_eq!(key_direction(KeyCode::Char('x')), None);
        assert_eq!(key_direction(KeyCode::Esc), None);
    }

    #[test]
    fn test_late_tick_does_not_queue_catch_up_ticks() {
        let interval = Duration::from_millis(250);
        let start = Instant::now();
        let deadline = start + interval;

        let on_time = next_deadline(deadline, deadline, interval);
        assert_eq!(on_time, deadline + interval);

        // A one second stall: the following tick is a full interval away
        let late = deadline + Duration::from_secs(1);
        let next = next_deadline(deadline, late, interval);
        assert_eq!(next, late + interval);
        assert!(next > late);
    }

    #[test]
    fn test_high_score_lines() {
        assert_eq!(high_score_lines(&[]), vec!["High scores", "No scores yet"]);

        let table = vec![
            HighScore { rank: 1, name: "ana".to_string(), score: 9 },
            HighScore { rank: 2, name: "bo".to_string(), score: 4 },
        ];
        assert_eq!(high_score_lines(&table), vec!["High scores", "1. ana: 9", "2. bo: 4"]);
    }

    #[test]
    fn test_ctrl_c_detection() {
        let ctrl_c = KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL };
        let plain_c = KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::NONE };
        assert!(is_ctrl_c(&ctrl_c));
        assert!(!is_ctrl_c(&plain_c));
    }
}
