use std::fs;
use std::path::Path;

use anyhow::{Context, bail};
use crossterm::style::Color;
use log::{info, warn};

use crate::entities::EntityKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
}

/// Character art plus the playfield size it is stretched over.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub width: i32,
    pub height: i32,
    pub cells: Vec<Vec<Option<Cell>>>, // Rows of art; `None` is transparent
    pub fallback: bool,
}

impl Sprite {
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.iter().map(|row| row.len()).max().unwrap_or(0)
    }

    /// Nearest-neighbour lookup of footprint cell (`col`, `row`) when the art is
    /// stretched over `foot_cols` x `foot_rows` screen cells.
    pub fn sample(&self, col: usize, row: usize, foot_cols: usize, foot_rows: usize) -> Option<Cell> {
        if foot_cols == 0 || foot_rows == 0 || self.rows() == 0 {
            return None;
        }
        let art_row = row * self.rows() / foot_rows;
        let art_col = col * self.cols() / foot_cols;
        self.cells.get(art_row)?.get(art_col).copied().flatten()
    }
}

// Art file per entity kind, relative to the assets directory.
fn file_name(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Player => "spaceship_user.txt",
        EntityKind::Enemy => "spaceship.txt",
        EntityKind::Projectile => "missile.txt",
    }
}

fn art_color(kind: EntityKind) -> Color {
    match kind {
        EntityKind::Player => Color::Cyan,
        EntityKind::Enemy => Color::Magenta,
        EntityKind::Projectile => Color::Yellow,
    }
}

/// Sprite lookup table, one entry per `EntityKind`.
pub struct Assets {
    sprites: [Sprite; 3],
}

impl Assets {
    /// Never fails: a kind whose art cannot be read gets its fallback shape.
    pub fn load(dir: &Path) -> Self {
        let sprites = EntityKind::ALL.map(|kind| {
            let path = dir.join(file_name(kind));
            match load_sprite(&path, kind) {
                Ok(sprite) => {
                    info!("Loaded {} sprite from {}", kind.name(), path.display());
                    sprite
                }
                Err(e) => {
                    warn!("Cannot load {} image: {:#}. Using fallback shape.", kind.name(), e);
                    fallback_sprite(kind)
                }
            }
        });
        let from_art = sprites.iter().filter(|sprite| !sprite.fallback).count();
        info!("Sprites ready: {} of {} from art files", from_art, sprites.len());
        Assets { sprites }
    }

    #[cfg(test)]
    pub fn fallback() -> Self {
        Assets { sprites: EntityKind::ALL.map(fallback_sprite) }
    }

    pub fn get(&self, kind: EntityKind) -> &Sprite {
        match kind {
            EntityKind::Player => &self.sprites[0],
            EntityKind::Enemy => &self.sprites[1],
            EntityKind::Projectile => &self.sprites[2],
        }
    }
}

pub fn load_sprite(path: &Path, kind: EntityKind) -> anyhow::Result<Sprite> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let color = art_color(kind);
    let cells: Vec<Vec<Option<Cell>>> = text
        .lines()
        .map(|line| {
            line.chars()
                .map(|ch| if ch.is_whitespace() { None } else { Some(Cell { ch, color }) })
                .collect()
        })
        .collect();

    if cells.iter().flatten().all(Option::is_none) {
        bail!("{} has no drawable characters", path.display());
    }

    let (width, height) = kind.nominal_size();
    Ok(Sprite { width, height, cells, fallback: false })
}

// --- Fallback shapes ---

fn point_in_triangle(p: (f64, f64), a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> bool {
    let cross = |o: (f64, f64), u: (f64, f64), v: (f64, f64)| (u.0 - o.0) * (v.1 - o.1) - (u.1 - o.1) * (v.0 - o.0);
    let d1 = cross(a, b, p);
    let d2 = cross(b, c, p);
    let d3 = cross(c, a, p);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Filled rectangle of `fill`, with an optional white triangle drawn over it.
/// Triangle vertices are in sprite-local playfield units.
fn shape(
    width: i32,
    height: i32,
    cols: usize,
    rows: usize,
    fill: Color,
    triangle: Option<[(f64, f64); 3]>,
) -> Sprite {
    let cell_w = width as f64 / cols as f64;
    let cell_h = height as f64 / rows as f64;
    let cells = (0..rows)
        .map(|row| {
            (0..cols)
                .map(|col| {
                    let center = ((col as f64 + 0.5) * cell_w, (row as f64 + 0.5) * cell_h);
                    let in_triangle = triangle.is_some_and(|[a, b, c]| point_in_triangle(center, a, b, c));
                    if in_triangle {
                        Some(Cell { ch: '▒', color: Color::White })
                    } else {
                        Some(Cell { ch: '█', color: fill })
                    }
                })
                .collect()
        })
        .collect();
    Sprite { width, height, cells, fallback: true }
}

pub fn fallback_sprite(kind: EntityKind) -> Sprite {
    match kind {
        EntityKind::Player => shape(50, 30, 10, 3, Color::Blue, Some([(0.0, 15.0), (50.0, 0.0), (50.0, 30.0)])),
        EntityKind::Enemy => shape(80, 80, 16, 8, Color::Red, Some([(0.0, 0.0), (80.0, 40.0), (0.0, 80.0)])),
        EntityKind::Projectile => shape(10, 5, 2, 1, Color::Green, None),
    }
}
