use std::io::{Stdout, Write, stdout};
use std::time::Duration;

use crossterm::{cursor, execute, queue, style, terminal, Result};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

pub type TermCoords = (u16, u16);

pub struct TermManager {
    width: u16,
    height: u16,
    stdout: Stdout,
    screen: Vec<char>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: TermCoords,
    width: u16,
    height: u16,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size()?;
        let stdout = stdout();
        let screen = vec![' '; width as usize * height as usize];
        Ok(TermManager { width, height, stdout, screen, current_msg: None })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(ev);
            }
        }
    }

    /// Collects the key presses that arrive within `timeout`.
    pub fn read_key_events_queue(&self, timeout: Duration) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];
        let mut wait = timeout;

        while poll(wait)? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
            wait = Duration::from_millis(0);
        }

        Ok(events)
    }

    pub fn size(&self) -> TermCoords {
        (self.width, self.height)
    }

    pub fn draw_borders(&mut self, top_left: TermCoords, size: TermCoords) -> Result<()> {
        let (left, top) = top_left;
        let (width, height) = size;
        let right = left + width - 1;
        let bottom = top + height - 1;

        for x in left..=right {
            let ch = if x == left || x == right {'+'} else {'-'};
            self.print_at((x, top), ch)?;
            self.print_at((x, bottom), ch)?;
        }

        for y in top + 1..bottom {
            self.print_at((left, y), '|')?;
            self.print_at((right, y), '|')?;
        }

        Ok(())
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as u16;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as u16;
        let center = (self.width / 2, self.height / 2);
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        // Blank padding rows above and below the text
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ')?;
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as u16 + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as u16, y), ch)?;
            }
        }

        self.current_msg = Some(Message { top_left, width: msg_width, height: msg_height });
        self.flush()
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        // Put back whatever the message was covering
        for y_diff in 0..msg.height {
            for x_diff in 0..msg.width {
                let (x, y) = (msg.top_left.0 + x_diff, msg.top_left.1 + y_diff);
                if let Some(ch) = self.screen_char((x, y)) {
                    self.print_at_no_save((x, y), ch)?;
                }
            }
        }

        self.flush()
    }

    pub fn print_at(&mut self, pos: TermCoords, ch: char) -> Result<()> {
        self.print_at_no_save(pos, ch)?;
        if let Some(idx) = self.screen_index(pos) {
            self.screen[idx] = ch;
        }
        Ok(())
    }

    pub fn print_str_at(&mut self, pos: TermCoords, text: &str) -> Result<()> {
        for (i, ch) in text.chars().enumerate() {
            self.print_at((pos.0 + i as u16, pos.1), ch)?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.screen = vec![' '; self.width as usize * self.height as usize];
        self.current_msg = None;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn print_at_no_save(&mut self, pos: TermCoords, ch: char) -> Result<()> {
        // Messages skip the screen buffer so hiding them can restore what was below
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))
    }

    fn screen_index(&self, pos: TermCoords) -> Option<usize> {
        if pos.0 < self.width && pos.1 < self.height {
            Some(self.width as usize * pos.1 as usize + pos.0 as usize)
        } else {
            None
        }
    }

    fn screen_char(&self, pos: TermCoords) -> Option<char> {
        self.screen_index(pos).map(|idx| self.screen[idx])
    }
}
