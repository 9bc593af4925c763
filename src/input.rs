//! Terminal input.
//!
//! Terminals report key presses, not key state.  Instead of acting on each
//! event we keep a `key_frame` map that records the frame number of the last
//! press/repeat event for every movement key.  A key counts as held while its
//! entry is fresh (within `HOLD_WINDOW` frames), which lets several movement
//! keys be held at once.
//!
//! * **Keyboard-enhancement capable** terminals (Ghostty, kitty, ...) send
//!   real `Release` events, so keys drop out immediately.
//! * **Classic terminals** only repeat `Press`; keys expire after
//!   `HOLD_WINDOW` frames of silence, shorter than the OS repeat interval.

use std::collections::{HashMap, HashSet};
use std::sync::mpsc;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use glam::Vec2;
use survival_shooter::platform::{InputSource, MoveKey};

const HOLD_WINDOW: u64 = 4;

/// Requests that act on the session rather than the simulation.
#[derive(Debug, PartialEq)]
pub enum Control {
    Quit,
    SlowerFrames,
    FasterFrames,
    Resize(u16, u16),
}

fn move_key(code: &KeyCode) -> Option<MoveKey> {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(MoveKey::W),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(MoveKey::A),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(MoveKey::S),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(MoveKey::D),
        _ => None,
    }
}

pub struct TerminalInput {
    key_frame: HashMap<MoveKey, u64>,
    frame: u64,
    pointer: Vec2,
    cell_size: Vec2,
}

impl TerminalInput {
    pub fn new(cell_size: Vec2, pointer: Vec2) -> Self {
        Self {
            key_frame: HashMap::new(),
            frame: 0,
            pointer,
            cell_size,
        }
    }

    pub fn set_cell_size(&mut self, cell_size: Vec2) {
        self.cell_size = cell_size;
    }

    /// Drain all pending events without blocking; starts a new input frame.
    pub fn drain(&mut self, rx: &mpsc::Receiver<Event>) -> Vec<Control> {
        self.frame += 1;
        let mut controls = Vec::new();
        while let Ok(event) = rx.try_recv() {
            match event {
                Event::Key(key) => controls.extend(self.on_key(key)),
                Event::Mouse(mouse) => self.on_mouse(mouse),
                Event::Resize(cols, rows) => controls.push(Control::Resize(cols, rows)),
                _ => {}
            }
        }
        controls
    }

    fn on_key(&mut self, KeyEvent { code, kind, modifiers, .. }: KeyEvent) -> Option<Control> {
        match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if let Some(key) = move_key(&code) {
                    self.key_frame.insert(key, self.frame);
                    return None;
                }
                if kind == KeyEventKind::Repeat {
                    return None;
                }
                match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Control::Quit),
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        Some(Control::Quit)
                    }
                    KeyCode::Char('[') => Some(Control::SlowerFrames),
                    KeyCode::Char(']') => Some(Control::FasterFrames),
                    _ => None,
                }
            }
            KeyEventKind::Release => {
                if let Some(key) = move_key(&code) {
                    self.key_frame.remove(&key);
                }
                None
            }
        }
    }

    fn on_mouse(&mut self, MouseEvent { kind, column, row, .. }: MouseEvent) {
        match kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_) => {
                // aim at the middle of the cell under the pointer
                self.pointer = (Vec2::new(column as f32, row as f32) + 0.5) * self.cell_size;
            }
            _ => {}
        }
    }
}

impl InputSource for TerminalInput {
    fn pressed_keys(&self) -> HashSet<MoveKey> {
        self.key_frame
            .iter()
            .filter(|&(_, &last)| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .map(|(&key, _)| key)
            .collect()
    }

    fn pointer_position(&self) -> Vec2 {
        self.pointer
    }
}
