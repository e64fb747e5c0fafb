use std::io::{self, Write};
use log::{error, info};
use crossterm::{
    cursor::MoveTo,
    execute,
    style::{Color, ResetColor, SetForegroundColor},
};
use rand::Rng;
use rand::rngs::ThreadRng;

use crate::assets::Assets;
use crate::constants::*;
use crate::game_state::DrawCommand;
use crate::types::Rect;

// --- ScreenBuffer for simulated rendering ---
pub struct ScreenBuffer {
    pub buffer: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
    pub cursor_x: u16,
    pub cursor_y: u16,
}

impl ScreenBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        ScreenBuffer {
            buffer: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
            cursor_x: 0,
            cursor_y: 0,
        }
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    pub fn write_char(&mut self, c: char) {
        if self.cursor_y < self.height && self.cursor_x < self.width {
            self.buffer[self.cursor_y as usize][self.cursor_x as usize] = c;
        }
    }

    pub fn write_str(&mut self, s: &str) {
        for c in s.chars() {
            self.write_char(c);
            self.cursor_x = self.cursor_x.saturating_add(1);
        }
    }

    #[cfg(test)]
    pub fn row(&self, y: u16) -> String {
        self.buffer.get(y as usize).map(|row| row.iter().collect()).unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.buffer = vec![vec![' '; self.width as usize]; self.height as usize];
        self.cursor_x = 0;
        self.cursor_y = 0;
    }

    pub fn print_to_log(&self) {
        info!("--- Screen Buffer ---");
        for row in &self.buffer {
            info!("{}", row.iter().collect::<String>());
        }
        info!("---------------------");
    }
}

impl Write for ScreenBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = String::from_utf8_lossy(buf);
        self.write_str(&s);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// --- OutputTarget enum to handle stdout or ScreenBuffer ---
pub enum OutputTarget {
    Stdout(io::Stdout),
    ScreenBuffer(ScreenBuffer),
}

impl OutputTarget {
    pub fn execute_move_to(&mut self, command: MoveTo) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            OutputTarget::ScreenBuffer(sb) => {
                sb.move_to(command.0, command.1);
                Ok(())
            },
        }
    }

    pub fn execute_other_command(&mut self, command: impl crossterm::Command) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            OutputTarget::ScreenBuffer(_) => Ok(()), // Ignore in debug mode
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputTarget::Stdout(s) => s.write(buf),
            OutputTarget::ScreenBuffer(sb) => sb.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => s.flush(),
            OutputTarget::ScreenBuffer(sb) => sb.flush(),
        }
    }
}

// --- GameGrid: one frame of coloured terminal cells ---
pub struct GameGrid {
    pub grid: Vec<Vec<(char, Color)>>,
    pub width: u16,
    pub height: u16,
}

impl GameGrid {
    pub fn new(width: u16, height: u16) -> Self {
        GameGrid {
            grid: vec![vec![(' ', Color::Reset); width as usize]; height as usize],
            width,
            height,
        }
    }

    /// Out-of-range coordinates (including negative ones) are ignored.
    pub fn set_cell(&mut self, x: i32, y: i32, c: char, color: Color) {
        if x >= 0 && y >= 0 && (y as u16) < self.height && (x as u16) < self.width {
            self.grid[y as usize][x as usize] = (c, color);
        }
    }

    #[cfg(test)]
    pub fn char_at(&self, x: u16, y: u16) -> Option<char> {
        self.grid.get(y as usize)?.get(x as usize).map(|&(c, _)| c)
    }

    pub fn clear(&mut self) {
        self.grid = vec![vec![(' ', Color::Reset); self.width as usize]; self.height as usize];
    }

    /// Writes each row as runs of same-coloured characters.
    pub fn render(&self, stdout: &mut OutputTarget) -> io::Result<()> {
        for (y, row) in self.grid.iter().enumerate() {
            stdout.execute_move_to(MoveTo(0, y as u16))?;
            let mut run = String::new();
            let mut run_color = Color::Reset;
            for &(c, color) in row {
                if color != run_color && !run.is_empty() {
                    stdout.execute_other_command(SetForegroundColor(run_color))?;
                    write!(stdout, "{}", run)?;
                    run.clear();
                }
                run_color = color;
                run.push(c);
            }
            if !run.is_empty() {
                stdout.execute_other_command(SetForegroundColor(run_color))?;
                write!(stdout, "{}", run)?;
            }
        }
        stdout.execute_other_command(ResetColor)?;
        Ok(())
    }

    pub fn clear_screen_manual(&self, stdout: &mut OutputTarget) -> io::Result<()> {
        for y in 0..self.height {
            stdout.execute_move_to(MoveTo(0, y))?;
            write!(stdout, "{}", " ".repeat(self.width as usize))?;
        }
        stdout.execute_move_to(MoveTo(0, 0))?;
        Ok(())
    }
}

/// Maps the fixed playfield onto a terminal-sized grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn to_cell(&self, x: i32, y: i32) -> (i32, i32) {
        let cx = (x as i64 * self.cols as i64).div_euclid(SCREEN_WIDTH as i64);
        let cy = (y as i64 * self.rows as i64).div_euclid(SCREEN_HEIGHT as i64);
        (cx as i32, cy as i32)
    }

    /// Number of cells a `width` x `height` box covers, at least one each way.
    pub fn footprint(&self, width: i32, height: i32) -> (usize, usize) {
        let ceil_div = |a: i64, b: i64| (a + b - 1) / b;
        let cols = ceil_div(width.max(0) as i64 * self.cols as i64, SCREEN_WIDTH as i64).max(1);
        let rows = ceil_div(height.max(0) as i64 * self.rows as i64, SCREEN_HEIGHT as i64).max(1);
        (cols as usize, rows as usize)
    }
}

pub trait Renderer {
    fn begin_frame(&mut self);
    fn draw(&mut self, commands: &[DrawCommand]);
    /// `position` is in playfield units.
    fn draw_text(&mut self, text: &str, position: (i32, i32), color: Color);
    fn draw_text_centered(&mut self, text: &str, y: i32, color: Color);
    fn present(&mut self) -> io::Result<()>;
    fn resize(&mut self, width: u16, height: u16);
}

pub struct TerminalRenderer {
    target: OutputTarget,
    grid: GameGrid,
    viewport: Viewport,
    assets: Assets,
    rng: ThreadRng,
}

impl TerminalRenderer {
    pub fn new(target: OutputTarget, width: u16, height: u16, assets: Assets) -> Self {
        TerminalRenderer {
            target,
            grid: GameGrid::new(width, height),
            viewport: Viewport { cols: width, rows: height },
            assets,
            rng: rand::thread_rng(),
        }
    }

    #[cfg(test)]
    pub fn target(&self) -> &OutputTarget {
        &self.target
    }

    #[cfg(test)]
    pub fn grid(&self) -> &GameGrid {
        &self.grid
    }

    pub fn clear_screen(&mut self) -> io::Result<()> {
        self.grid.clear_screen_manual(&mut self.target)?;
        self.target.flush()
    }

    fn draw_sprite(&mut self, command: &DrawCommand) {
        let sprite = self.assets.get(command.kind);
        // Sprites are centred on the hitbox; fallback art may be smaller than it.
        let rect = Rect::new(
            command.rect.x + (command.rect.width - sprite.width) / 2,
            command.rect.y + (command.rect.height - sprite.height) / 2,
            sprite.width,
            sprite.height,
        );
        let (origin_x, origin_y) = self.viewport.to_cell(rect.x, rect.y);
        let (foot_cols, foot_rows) = self.viewport.footprint(rect.width, rect.height);
        for row in 0..foot_rows {
            for col in 0..foot_cols {
                if let Some(cell) = sprite.sample(col, row, foot_cols, foot_rows) {
                    self.grid.set_cell(origin_x + col as i32, origin_y + row as i32, cell.ch, cell.color);
                }
            }
        }
    }

    fn put_text(&mut self, text: &str, cell_x: i32, cell_y: i32, color: Color) {
        for (i, c) in text.chars().enumerate() {
            self.grid.set_cell(cell_x + i as i32, cell_y, c, color);
        }
    }
}

impl Renderer for TerminalRenderer {
    fn begin_frame(&mut self) {
        self.grid.clear();
        for _ in 0..BACKGROUND_STAR_COUNT {
            let x = self.rng.gen_range(0..self.grid.width.max(1)) as i32;
            let y = self.rng.gen_range(0..self.grid.height.max(1)) as i32;
            self.grid.set_cell(x, y, '.', Color::White);
        }
    }

    fn draw(&mut self, commands: &[DrawCommand]) {
        for command in commands {
            self.draw_sprite(command);
        }
    }

    fn draw_text(&mut self, text: &str, position: (i32, i32), color: Color) {
        let (cell_x, cell_y) = self.viewport.to_cell(position.0, position.1);
        self.put_text(text, cell_x, cell_y, color);
    }

    fn draw_text_centered(&mut self, text: &str, y: i32, color: Color) {
        let (_, cell_y) = self.viewport.to_cell(0, y);
        let cell_x = (self.grid.width as i32 - text.chars().count() as i32) / 2;
        self.put_text(text, cell_x.max(0), cell_y, color);
    }

    fn present(&mut self) -> io::Result<()> {
        if let OutputTarget::ScreenBuffer(sb) = &mut self.target {
            // Copy GameGrid to ScreenBuffer for logging
            sb.clear();
            for (y, row) in self.grid.grid.iter().enumerate() {
                sb.move_to(0, y as u16);
                for &(c, _) in row {
                    sb.write_char(c);
                    sb.cursor_x += 1;
                }
            }
            sb.print_to_log();
            return Ok(());
        }

        self.grid.render(&mut self.target).map_err(|e| { error!("Failed to render game grid: {}", e); e })?;
        self.target.flush().map_err(|e| { error!("Failed to flush stdout after rendering: {}", e); e })?;
        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) {
        info!("Terminal resized to {}x{}", width, height);
        self.grid = GameGrid::new(width, height);
        self.viewport = Viewport { cols: width, rows: height };
        if let OutputTarget::ScreenBuffer(sb) = &mut self.target {
            *sb = ScreenBuffer::new(width, height);
        }
    }
}
