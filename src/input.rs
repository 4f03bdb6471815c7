//! Input latch and terminal control mapping.
//!
//! The simulation only ever sees an [`InputLatch`]: three booleans that are
//! set by press events and cleared by release events.  [`Controls`] turns raw
//! crossterm keyboard and mouse events into that latch plus a few one-shot
//! [`Action`]s (click-to-fire, the end-of-round answer, quitting).

use std::collections::HashMap;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::game::RoundChoice;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events.
/// Once OS key-repeat is running (≥ 15 Hz) the 8-frame window (≈133 ms at
/// 60 FPS) stays refreshed, but the initial repeat delay is usually longer,
/// so a held key lapses briefly after its first press.
pub const HOLD_WINDOW: u64 = 8;

// ── Latch ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    Left,
    Right,
    Fire,
}

/// Held-state flags read by the simulation every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputLatch {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

impl InputLatch {
    pub fn press(&mut self, control: Control) {
        *self.flag(control) = true;
    }

    pub fn release(&mut self, control: Control) {
        *self.flag(control) = false;
    }

    fn flag(&mut self, control: Control) -> &mut bool {
        match control {
            Control::Left => &mut self.left,
            Control::Right => &mut self.right,
            Control::Fire => &mut self.fire,
        }
    }
}

// ── On-screen buttons ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zone {
    Left,
    Fire,
    Right,
}

impl Zone {
    pub const ALL: [Zone; 3] = [Zone::Left, Zone::Fire, Zone::Right];

    pub fn label(self) -> &'static str {
        match self {
            Zone::Left => "◀  LEFT",
            Zone::Fire => "FIRE",
            Zone::Right => "RIGHT  ▶",
        }
    }
}

/// The bottom terminal row, split into three equal clickable zones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonBar {
    pub row: u16,
    pub width: u16,
}

impl ButtonBar {
    pub fn new(cols: u16, rows: u16) -> Self {
        ButtonBar {
            row: rows.saturating_sub(1),
            width: cols,
        }
    }

    /// Half-open column span `[start, end)` covered by `zone`.
    pub fn span(&self, zone: Zone) -> (u16, u16) {
        let third = self.width / 3;
        match zone {
            Zone::Left => (0, third),
            Zone::Fire => (third, self.width - third),
            Zone::Right => (self.width - third, self.width),
        }
    }

    pub fn zone_at(&self, column: u16, row: u16) -> Option<Zone> {
        if row != self.row {
            return None;
        }
        Zone::ALL.into_iter().find(|&zone| {
            let (start, end) = self.span(zone);
            column >= start && column < end
        })
    }
}

// ── Event mapping ─────────────────────────────────────────────────────────────

/// One-shot commands that are not part of the held-state latch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// A click on the fire button: exactly one bullet.
    Fire,
    /// Answer to the end-of-round question.
    Choose(RoundChoice),
    Quit,
}

/// Maintains which keys and pointer zones are currently held.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (kitty protocol): proper
///   `Press` / `Repeat` / `Release` events, so keys are held until released.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`).  Keys expire after `HOLD_WINDOW` frames of silence.
#[derive(Debug, Default)]
pub struct Controls {
    /// Maps each held key to the frame it was last seen (press or repeat).
    key_frame: HashMap<KeyCode, u64>,
    /// Zone the pointer went down on, until the pointer is released.
    pointer: Option<Zone>,
    keyboard_enhanced: bool,
}

impl Controls {
    pub fn new(keyboard_enhanced: bool) -> Self {
        Controls {
            keyboard_enhanced,
            ..Controls::default()
        }
    }

    pub fn handle(&mut self, event: &Event, frame: u64, bar: &ButtonBar) -> Option<Action> {
        match event {
            Event::Key(key) => self.handle_key(key, frame),
            Event::Mouse(mouse) => self.handle_mouse(mouse, bar),
            _ => None,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, frame: u64) -> Option<Action> {
        let (code, modifiers) = (key.code, key.modifiers);
        match key.kind {
            KeyEventKind::Press => {
                self.key_frame.insert(code, frame);
                match code {
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        Some(Action::Quit)
                    }
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
                    KeyCode::Char('y') | KeyCode::Char('Y') => {
                        Some(Action::Choose(RoundChoice::PlayAgain))
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') => {
                        Some(Action::Choose(RoundChoice::Quit))
                    }
                    _ => None,
                }
            }
            KeyEventKind::Repeat => {
                self.key_frame.insert(code, frame);
                None
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&code);
                None
            }
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent, bar: &ButtonBar) -> Option<Action> {
        let zone = bar.zone_at(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.pointer = zone;
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let pressed = self.pointer.take();
                (pressed == Some(Zone::Fire) && zone == Some(Zone::Fire)).then_some(Action::Fire)
            }
            _ => None,
        }
    }

    /// Returns true if `key` is currently held.
    fn is_held(&self, key: KeyCode, frame: u64) -> bool {
        self.key_frame
            .get(&key)
            .map(|&last| self.keyboard_enhanced || frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    fn any_held(&self, keys: &[KeyCode], frame: u64) -> bool {
        keys.iter().any(|&k| self.is_held(k, frame))
    }

    /// Snapshot of the held flags as of `frame`.
    pub fn latch(&self, frame: u64) -> InputLatch {
        let left = self.pointer == Some(Zone::Left)
            || self.any_held(
                &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
                frame,
            );
        let right = self.pointer == Some(Zone::Right)
            || self.any_held(
                &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
                frame,
            );
        let fire = self.is_held(KeyCode::Char(' '), frame);

        let mut latch = InputLatch::default();
        for (held, control) in [(left, Control::Left), (right, Control::Right), (fire, Control::Fire)] {
            if held {
                latch.press(control);
            }
        }
        latch
    }
}
