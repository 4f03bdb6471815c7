//! Rendering layer.
//!
//! [`render`] translates a `GameState` into draw calls on an abstract
//! [`Surface`].  No game logic is performed here.  The terminal backend
//! lives in [`terminal`].

pub mod terminal;

use std::io;

use crate::assets::{Sprite, Sprites};
use crate::entities::{Bounded, GameState, GameStatus, Rect};

pub use terminal::TerminalSurface;

pub type Rgb = [u8; 3];

// ── Colour palette ────────────────────────────────────────────────────────────

pub const C_BULLET: Rgb = [0xff, 0x00, 0x00];
pub const C_TEXT: Rgb = [0x00, 0x00, 0x00];

/// Overlay shown once the round has ended.
pub const GAME_OVER_TEXT: &str = "Game Over!";

/// Something that can be drawn on in canvas coordinates.
pub trait Surface {
    /// Wipe the whole canvas.
    fn clear(&mut self) -> io::Result<()>;
    /// Blit a sprite stretched over `rect`.  A missing sprite draws nothing.
    fn draw_sprite(&mut self, sprite: Option<&Sprite>, rect: Rect) -> io::Result<()>;
    fn fill_rect(&mut self, rect: Rect, color: Rgb) -> io::Result<()>;
    /// Draw `text` with its baseline-left corner at (`x`, `y`).
    fn fill_text(&mut self, text: &str, x: f32, y: f32, color: Rgb) -> io::Result<()>;
    /// Push everything drawn so far to the screen.
    fn present(&mut self) -> io::Result<()>;
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Draw one complete frame.  The caller presents it after adding any
/// host-specific overlays.
pub fn render<S: Surface>(surface: &mut S, state: &GameState, sprites: &Sprites) -> io::Result<()> {
    surface.clear()?;

    surface.draw_sprite(sprites.player.as_ref(), state.player.rect())?;

    for bullet in &state.bullets {
        surface.fill_rect(bullet.rect(), C_BULLET)?;
    }

    for enemy in &state.enemies {
        surface.draw_sprite(sprites.enemy.as_ref(), enemy.rect())?;
    }

    if state.status == GameStatus::GameOver {
        surface.fill_text(
            GAME_OVER_TEXT,
            state.width / 2.0 - 80.0,
            state.height / 2.0,
            C_TEXT,
        )?;
    }

    Ok(())
}
