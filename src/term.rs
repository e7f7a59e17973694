use crate::{Coords, TermInt};
use crate::config::GameConfig;
use crate::geometry::Rect;
use crate::input::Intent;
use crate::session::Drawable;
use crate::snake::Direction;
use std::{io::{self, Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags, poll, read,
};
use tracing::{debug, info};

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const SCORE_RULE_CHAR: char = '─';

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<char>,
    enhanced_keys: bool,
}

impl TermManager {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let stdout = stdout();
        let screen = vec![' '; width as usize * height as usize];
        Ok(TermManager { width, height, stdout, screen, enhanced_keys: false })
    }

    pub fn setup(&mut self) -> io::Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking, terminal::Clear(ClearType::All))?;

        // Key release events need the kitty keyboard protocol.
        self.enhanced_keys = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.enhanced_keys {
            execute!(self.stdout, PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))?;
        }

        info!(width = self.width, height = self.height, release_events = self.enhanced_keys, "terminal ready");
        Ok(())
    }

    pub fn restore(&mut self) -> io::Result<()> {
        if self.enhanced_keys {
            execute!(self.stdout, PopKeyboardEnhancementFlags)?;
        }
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }

    pub fn reports_releases(&self) -> bool {
        self.enhanced_keys
    }

    /// Drains pending terminal events without blocking.
    pub fn read_intents(&mut self) -> io::Result<Vec<Intent>> {
        let mut intents = vec![];

        while poll(Duration::ZERO)? {
            match read()? {
                Event::Key(ev) => intents.extend(decode_key(&ev)),
                Event::Resize(w, h) => self.resize(w, h)?,
                _ => {}
            }
        }

        Ok(intents)
    }

    /// Draws the scene, writing only the cells that changed since the last frame.
    pub fn render(&mut self, scene: &[Drawable], config: &GameConfig) -> io::Result<()> {
        if self.width < 3 || self.height < 3 {
            return Ok(());
        }

        let view = Viewport::new(config, self.width, self.height);
        let mut frame = Frame::new(self.width, self.height);
        frame.draw_borders();

        for item in scene {
            match item {
                Drawable::Body { segments, heading } => {
                    for seg in segments.iter().rev() {
                        frame.fill(view.cells(seg), SNAKE_BODY_CHAR);
                    }
                    if let Some(head) = segments.front() {
                        frame.fill(view.cells(head), head_char(*heading));
                    }
                }
                Drawable::FoodMarker(food) => frame.fill(view.cells(food), FOOD_CHAR),
                Drawable::ScoreLine { baseline, score } => {
                    let row = view.row(*baseline);
                    for x in 1..self.width - 1 {
                        frame.put((x, row), SCORE_RULE_CHAR);
                    }
                    let below = (row + 1).min(self.height - 2);
                    frame.text((2, below), &format!("Score: {}", score));
                }
                Drawable::Text { anchor, text } => {
                    let half = (text.chars().count() / 2) as TermInt;
                    let x = view.col(anchor.x).saturating_sub(half).max(1);
                    frame.text((x, view.row(anchor.y)), text);
                }
            }
        }

        for (i, (&new, old)) in frame.cells.iter().zip(self.screen.iter_mut()).enumerate() {
            if new != *old {
                let pos = ((i % self.width as usize) as TermInt, (i / self.width as usize) as TermInt);
                queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(new))?;
                *old = new;
            }
        }

        self.stdout.flush()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn resize(&mut self, width: TermInt, height: TermInt) -> io::Result<()> {
        debug!(width, height, "terminal resized");
        self.width = width;
        self.height = height;
        self.screen = vec![' '; width as usize * height as usize];
        execute!(self.stdout, terminal::Clear(ClearType::All))
    }
}

/// Maps a key event to zero or more intents. Space means start on the splash
/// screen and restart after a game over; the session ignores whichever does
/// not apply.
pub fn decode_key(ev: &KeyEvent) -> Vec<Intent> {
    let released = ev.kind == KeyEventKind::Release;

    let direction = match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Some(Direction::North),
        KeyCode::Char('a') | KeyCode::Left => Some(Direction::West),
        KeyCode::Char('s') | KeyCode::Down => Some(Direction::South),
        KeyCode::Char('d') | KeyCode::Right => Some(Direction::East),
        _ => None,
    };

    if let Some(dir) = direction {
        return if released { vec![Intent::DirectionReleased(dir)] } else { vec![Intent::DirectionPressed(dir)] };
    }

    if released {
        return vec![];
    }

    match ev.code {
        KeyCode::Char('c') if ev.modifiers.contains(KeyModifiers::CONTROL) => vec![Intent::Quit],
        KeyCode::Char('q') => vec![Intent::Quit],
        KeyCode::Char(' ') => vec![Intent::Start, Intent::Restart],
        KeyCode::Char('p') => vec![Intent::Pause],
        KeyCode::Char('u') => vec![Intent::Resume],
        _ => vec![],
    }
}

pub fn head_char(heading: Direction) -> char {
    match heading {
        Direction::North => '^',
        Direction::South => 'v',
        Direction::West => '<',
        Direction::East => '>',
    }
}

/// Scales playfield pixels (including the score bar) onto the cells inside
/// the border.
struct Viewport {
    scale_x: f64,
    scale_y: f64,
    inner_w: TermInt,
    inner_h: TermInt,
}

impl Viewport {
    fn new(config: &GameConfig, width: TermInt, height: TermInt) -> Self {
        let inner_w = width - 2;
        let inner_h = height - 2;
        Viewport {
            scale_x: inner_w as f64 / config.width,
            scale_y: inner_h as f64 / (config.height + config.header_offset),
            inner_w,
            inner_h,
        }
    }

    fn col(&self, x: f64) -> TermInt {
        1 + clamp_cell(x * self.scale_x, self.inner_w)
    }

    fn row(&self, y: f64) -> TermInt {
        1 + clamp_cell(y * self.scale_y, self.inner_h)
    }

    /// Every cell the rectangle touches, as half-open column and row ranges.
    fn cells(&self, rect: &Rect) -> (std::ops::Range<TermInt>, std::ops::Range<TermInt>) {
        let x0 = self.col(rect.upper_left.x);
        let y0 = self.row(rect.upper_left.y);
        let x1 = (1 + clamp_cell((rect.lower_right.x * self.scale_x).ceil() - 1.0, self.inner_w)).max(x0);
        let y1 = (1 + clamp_cell((rect.lower_right.y * self.scale_y).ceil() - 1.0, self.inner_h)).max(y0);
        (x0..x1 + 1, y0..y1 + 1)
    }
}

fn clamp_cell(v: f64, cells: TermInt) -> TermInt {
    v.floor().clamp(0.0, (cells - 1) as f64) as TermInt
}

/// One full screen of characters.
struct Frame {
    width: TermInt,
    height: TermInt,
    cells: Vec<char>,
}

impl Frame {
    fn new(width: TermInt, height: TermInt) -> Self {
        Frame { width, height, cells: vec![' '; width as usize * height as usize] }
    }

    fn put(&mut self, pos: Coords, ch: char) {
        if pos.0 < self.width && pos.1 < self.height {
            self.cells[self.width as usize * pos.1 as usize + pos.0 as usize] = ch;
        }
    }

    fn fill(&mut self, (cols, rows): (std::ops::Range<TermInt>, std::ops::Range<TermInt>), ch: char) {
        for y in rows {
            for x in cols.clone() {
                self.put((x, y), ch);
            }
        }
    }

    fn text(&mut self, pos: Coords, s: &str) {
        for (i, ch) in s.chars().enumerate() {
            let x = pos.0 + i as TermInt;
            if x >= self.width - 1 {
                break;
            }
            self.put((x, pos.1), ch);
        }
    }

    fn draw_borders(&mut self) {
        let end_x = self.width - 1;
        let end_y = self.height - 1;

        for x in 0..self.width {
            let ch = if x == 0 || x == end_x {'+'} else {'-'};
            self.put((x, 0), ch);
            self.put((x, end_y), ch);
        }

        for y in 1..end_y {
            self.put((0, y), '|');
            self.put((end_x, y), '|');
        }
    }
}
