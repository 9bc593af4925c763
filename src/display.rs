//! Rendering layer: all terminal output lives here.
//!
//! The simulation draws into a `TerminalSurface`, a character-cell buffer
//! that maps the fixed world-unit viewport onto whatever terminal size is
//! available.  `present` then writes the whole buffer out in one go.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Attribute, Color, Print},
    QueueableCommand,
};
use glam::Vec2;
use survival_shooter::geometry::{Direction8, Rect};
use survival_shooter::platform::{Assets, Sprite, SpriteId, Surface, TextSize, TextStyle, Tint};

/// World units shown across the terminal, whatever its size.
pub const VIEWPORT: Vec2 = Vec2::new(1600.0, 900.0);

// ── Colour palette ────────────────────────────────────────────────────────────

const C_FLOOR: Color = Color::DarkGrey;
const C_PLAYER: Color = Color::White;
const C_PLAYER_HURT: Color = Color::Red;
const C_PLAYER_DOWN: Color = Color::DarkRed;
const C_PLAYER_CLEARED: Color = Color::Yellow;
const C_ZOMBIE: Color = Color::Green;
const C_BOSS: Color = Color::Magenta;
const C_BULLET: Color = Color::Red;
const C_FLAME: Color = Color::DarkYellow;

/// Spacing of the floor dots inside a background tile, in cells.
const FLOOR_DOT_COLS: i32 = 8;
const FLOOR_DOT_ROWS: i32 = 4;

fn tint_color(tint: Tint) -> Color {
    match tint {
        Tint::Red => Color::Red,
        Tint::Green => Color::Green,
        Tint::Blue => Color::Blue,
    }
}

fn glyph(id: SpriteId) -> (char, Color) {
    match id {
        SpriteId::Player(dir) => {
            let arrow = match dir {
                Direction8::Right => '→',
                Direction8::UpRight => '↗',
                Direction8::Up => '↑',
                Direction8::UpLeft => '↖',
                Direction8::Left => '←',
                Direction8::DownLeft => '↙',
                Direction8::Down => '↓',
                Direction8::DownRight => '↘',
            };
            (arrow, C_PLAYER)
        }
        SpriteId::PlayerHurt => ('#', C_PLAYER_HURT),
        SpriteId::PlayerDown => ('x', C_PLAYER_DOWN),
        SpriteId::PlayerCleared => ('★', C_PLAYER_CLEARED),
        SpriteId::Zombie(1) => ('z', C_ZOMBIE),
        SpriteId::Zombie(2) => ('Z', C_ZOMBIE),
        SpriteId::Zombie(_) => ('%', C_ZOMBIE),
        SpriteId::Boss => ('█', C_BOSS),
        SpriteId::Bullet => ('•', C_BULLET),
        SpriteId::Flame => ('≈', C_FLAME),
        SpriteId::Background => ('·', C_FLOOR),
    }
}

// ── Assets ────────────────────────────────────────────────────────────────────

/// Built-in image table: every image is a glyph fill of a fixed size.
pub struct TerminalAssets;

impl Assets for TerminalAssets {
    fn load_image(&self, id: SpriteId) -> Sprite {
        let size = match id {
            SpriteId::Player(_)
            | SpriteId::PlayerHurt
            | SpriteId::PlayerDown
            | SpriteId::PlayerCleared => Vec2::new(60.0, 60.0),
            SpriteId::Zombie(_) => Vec2::new(120.0, 120.0),
            SpriteId::Boss => Vec2::new(50.0, 50.0),
            SpriteId::Bullet => Vec2::new(20.0, 10.0),
            SpriteId::Flame => Vec2::new(40.0, 40.0),
            SpriteId::Background => Vec2::new(800.0, 450.0),
        };
        Sprite::new(id, size)
    }
}

// ── Cell buffer ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    color: Color,
    bold: bool,
}

const BLANK: Cell = Cell {
    ch: ' ',
    color: Color::Reset,
    bold: false,
};

pub struct TerminalSurface {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl TerminalSurface {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![BLANK; cols as usize * rows as usize],
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        *self = Self::new(cols, rows);
    }

    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    /// World units covered by one cell.
    pub fn cell_size(&self) -> Vec2 {
        VIEWPORT / Vec2::new(self.cols.max(1) as f32, self.rows.max(1) as f32)
    }

    fn put(&mut self, col: i32, row: i32, cell: Cell) {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return;
        }
        self.cells[row as usize * self.cols as usize + col as usize] = cell;
    }

    /// Cell span covered by `rect`; always at least one cell wide and tall.
    fn span(&self, rect: Rect) -> (i32, i32, i32, i32) {
        let cell = self.cell_size();
        let min = (rect.min() / cell).floor();
        let max = (rect.max() / cell).ceil();
        let (c0, r0) = (min.x as i32, min.y as i32);
        let c1 = (max.x as i32).max(c0 + 1);
        let r1 = (max.y as i32).max(r0 + 1);
        (c0, r0, c1, r1)
    }

    /// Write the buffer to the terminal.
    pub fn present<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let mut current: Option<(Color, bool)> = None;
        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, row))?;
            let start = row as usize * self.cols as usize;
            for cell in &self.cells[start..start + self.cols as usize] {
                if current != Some((cell.color, cell.bold)) {
                    out.queue(style::SetAttribute(Attribute::Reset))?;
                    out.queue(style::SetForegroundColor(cell.color))?;
                    if cell.bold {
                        out.queue(style::SetAttribute(Attribute::Bold))?;
                    }
                    current = Some((cell.color, cell.bold));
                }
                out.queue(Print(cell.ch))?;
            }
        }
        out.queue(style::ResetColor)?;
        out.flush()
    }
}

impl Surface for TerminalSurface {
    fn blit(&mut self, sprite: &Sprite, rect: Rect) {
        let (ch, color) = glyph(sprite.id);
        let (c0, r0, c1, r1) = self.span(rect);
        let cell = Cell {
            ch,
            color,
            bold: false,
        };
        for row in r0..r1 {
            for col in c0..c1 {
                // the floor is mostly empty space with a dot lattice
                if sprite.id == SpriteId::Background
                    && ((col - c0) % FLOOR_DOT_COLS != 0 || (row - r0) % FLOOR_DOT_ROWS != 0)
                {
                    continue;
                }
                self.put(col, row, cell);
            }
        }
    }

    fn draw_text(&mut self, text: &str, center: Vec2, style: TextStyle) {
        let text = match style.size {
            TextSize::Normal => text.to_string(),
            TextSize::Banner => text
                .chars()
                .map(|c| c.to_uppercase().to_string())
                .collect::<Vec<_>>()
                .join(" "),
        };
        let cell_size = self.cell_size();
        let width = text.chars().count() as i32;
        let col0 = (center.x / cell_size.x) as i32 - width / 2;
        let row = (center.y / cell_size.y) as i32;
        let cell = Cell {
            ch: ' ',
            color: tint_color(style.tint),
            bold: style.size == TextSize::Banner,
        };
        for (i, ch) in text.chars().enumerate() {
            self.put(col0 + i as i32, row, Cell { ch, ..cell });
        }
    }

    fn width(&self) -> f32 {
        VIEWPORT.x
    }

    fn height(&self) -> f32 {
        VIEWPORT.y
    }
}
