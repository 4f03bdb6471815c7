//! Terminal backend — all terminal I/O lives here.
//!
//! The canvas is scaled onto every terminal row except the last, which holds
//! the on-screen buttons.  Colours are emitted as true-colour backgrounds so a
//! sprite shows up as a solid block of its average colour.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use super::{Rgb, Surface};
use crate::assets::Sprite;
use crate::entities::Rect;
use crate::input::{ButtonBar, InputLatch, Zone};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_CANVAS: Color = Color::Rgb {
    r: 0xf0,
    g: 0xf0,
    b: 0xf0,
};
const C_BUTTON: Color = Color::DarkGrey;
const C_BUTTON_HELD: Color = Color::Grey;
const C_BUTTON_LABEL: Color = Color::White;
const C_PROMPT: Color = Color::Yellow;

fn to_color([r, g, b]: Rgb) -> Color {
    Color::Rgb { r, g, b }
}

/// Map the half-open canvas interval `[start, end)` onto terminal cells.
///
/// Returns `None` when the interval lies entirely outside the canvas.  Any
/// visible interval covers at least one cell.
pub fn cell_span(start: f32, end: f32, extent: f32, cells: u16) -> Option<(u16, u16)> {
    if cells == 0 || extent <= 0.0 || end <= 0.0 || start >= extent || end <= start {
        return None;
    }
    let scale = f32::from(cells) / extent;
    let first = (start.max(0.0) * scale).floor() as u16;
    let last = ((end.min(extent) * scale).ceil() as u16).min(cells);
    let first = first.min(cells - 1);
    Some((first, last.max(first + 1)))
}

pub struct TerminalSurface<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    canvas_width: f32,
    canvas_height: f32,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, cols: u16, rows: u16, canvas_width: f32, canvas_height: f32) -> Self {
        TerminalSurface {
            out,
            cols,
            rows,
            canvas_width,
            canvas_height,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    pub fn button_bar(&self) -> ButtonBar {
        ButtonBar::new(self.cols, self.rows)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Rows available to the canvas (everything above the button bar).
    fn play_rows(&self) -> u16 {
        self.rows.saturating_sub(1)
    }

    fn fill_cells(&mut self, rect: Rect, color: Color) -> std::io::Result<()> {
        let cols = cell_span(rect.x, rect.right(), self.canvas_width, self.cols);
        let rows = cell_span(rect.y, rect.bottom(), self.canvas_height, self.play_rows());
        let (Some((c0, c1)), Some((r0, r1))) = (cols, rows) else {
            return Ok(());
        };

        let run = " ".repeat(usize::from(c1 - c0));
        self.out.queue(style::SetBackgroundColor(color))?;
        for row in r0..r1 {
            self.out.queue(cursor::MoveTo(c0, row))?;
            self.out.queue(Print(&run))?;
        }
        self.out.queue(style::ResetColor)?;
        Ok(())
    }

    // ── Host overlays ─────────────────────────────────────────────────────────

    /// Draw the LEFT | FIRE | RIGHT bar; held zones are highlighted.
    pub fn draw_controls(&mut self, latch: &InputLatch) -> std::io::Result<()> {
        let bar = self.button_bar();
        for zone in Zone::ALL {
            let held = match zone {
                Zone::Left => latch.left,
                Zone::Fire => latch.fire,
                Zone::Right => latch.right,
            };
            let (start, end) = bar.span(zone);
            let width = usize::from(end.saturating_sub(start));
            if width == 0 {
                continue;
            }
            let label: String = format!("{:^width$}", zone.label(), width = width)
                .chars()
                .take(width)
                .collect();

            self.out.queue(cursor::MoveTo(start, bar.row))?;
            self.out.queue(style::SetBackgroundColor(if held {
                C_BUTTON_HELD
            } else {
                C_BUTTON
            }))?;
            self.out.queue(style::SetForegroundColor(C_BUTTON_LABEL))?;
            self.out.queue(Print(label))?;
        }
        self.out.queue(style::ResetColor)?;
        Ok(())
    }

    /// Centre a one-line question below the middle of the play area.
    pub fn draw_prompt(&mut self, text: &str) -> std::io::Result<()> {
        let row = (self.play_rows() / 2).saturating_add(2).min(self.play_rows().saturating_sub(1));
        let len = text.chars().count() as u16;
        let col = (self.cols / 2).saturating_sub(len / 2);
        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(style::SetForegroundColor(C_PROMPT))?;
        self.out.queue(style::SetBackgroundColor(Color::Black))?;
        self.out.queue(Print(text))?;
        self.out.queue(style::ResetColor)?;
        Ok(())
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn clear(&mut self) -> std::io::Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        let full = Rect::new(0.0, 0.0, self.canvas_width, self.canvas_height);
        self.fill_cells(full, C_CANVAS)
    }

    fn draw_sprite(&mut self, sprite: Option<&Sprite>, rect: Rect) -> std::io::Result<()> {
        match sprite {
            Some(sprite) => self.fill_cells(rect, to_color(sprite.color)),
            None => Ok(()),
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) -> std::io::Result<()> {
        self.fill_cells(rect, to_color(color))
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, color: Rgb) -> std::io::Result<()> {
        let col = cell_span(x, x + 1.0, self.canvas_width, self.cols);
        let row = cell_span(y, y + 1.0, self.canvas_height, self.play_rows());
        let (Some((col, _)), Some((row, _))) = (col, row) else {
            return Ok(());
        };
        let room = usize::from(self.cols - col);
        let visible: String = text.chars().take(room).collect();

        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(style::SetBackgroundColor(C_CANVAS))?;
        self.out.queue(style::SetForegroundColor(to_color(color)))?;
        self.out.queue(Print(visible))?;
        self.out.queue(style::ResetColor)?;
        Ok(())
    }

    fn present(&mut self) -> std::io::Result<()> {
        // Park cursor in a harmless spot and flush
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_scales_canvas_to_cells() {
        // 800 canvas units over 80 columns: 10 units per cell.
        assert_eq!(cell_span(0.0, 800.0, 800.0, 80), Some((0, 80)));
        assert_eq!(cell_span(375.0, 425.0, 800.0, 80), Some((37, 43)));
    }

    #[test]
    fn span_keeps_thin_rects_visible() {
        assert_eq!(cell_span(397.5, 402.5, 800.0, 20), Some((9, 11)));
        assert_eq!(cell_span(150.0, 150.5, 800.0, 8), Some((1, 2)));
    }

    #[test]
    fn span_clips_and_rejects_offscreen() {
        assert_eq!(cell_span(-50.0, 0.0, 600.0, 30), None);
        assert_eq!(cell_span(600.0, 650.0, 600.0, 30), None);
        assert_eq!(cell_span(-25.0, 25.0, 600.0, 30), Some((0, 2)));
        assert_eq!(cell_span(590.0, 640.0, 600.0, 30), Some((29, 30)));
    }

    #[test]
    fn missing_sprite_writes_nothing() {
        let mut surface = TerminalSurface::new(Vec::new(), 80, 25, 800.0, 600.0);
        surface
            .draw_sprite(None, Rect::new(10.0, 10.0, 50.0, 50.0))
            .unwrap();
        assert!(surface.into_inner().is_empty());
    }

    #[test]
    fn prompt_and_buttons_are_printed() {
        let mut surface = TerminalSurface::new(Vec::new(), 60, 20, 800.0, 600.0);
        surface.draw_controls(&InputLatch::default()).unwrap();
        surface.draw_prompt("Play again? [Y/N]").unwrap();
        let text = String::from_utf8(surface.into_inner()).unwrap();
        assert!(text.contains("FIRE"));
        assert!(text.contains("LEFT"));
        assert!(text.contains("RIGHT"));
        assert!(text.contains("Play again? [Y/N]"));
    }
}
