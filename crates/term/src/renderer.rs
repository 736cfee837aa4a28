//! TerminalRenderer: writes framebuffers to the terminal.
//!
//! Each draw is diffed against the previously flushed frame and only changed runs
//! of glyphs are emitted. The whole frame is encoded into one byte buffer and
//! written with a single flush.

use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{FrameBuffer, Glyph, Rgb, Style};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    /// Last frame flushed to the terminal
    shown: FrameBuffer,
    /// Next draw repaints everything
    stale: bool,
    entered: bool,
    buf: Vec<u8>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            shown: FrameBuffer::new(0, 0),
            stale: true,
            entered: false,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    /// Raw mode plus alternate screen.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        self.entered = true;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf().context("enter alternate screen")?;
        self.stale = true;
        Ok(())
    }

    /// Undo [`enter`](Self::enter). Safe to call more than once.
    pub fn exit(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        let flushed = self.flush_buf().context("leave alternate screen");
        terminal::disable_raw_mode().context("disable raw mode")?;
        flushed
    }

    /// Repaint everything on the next draw, e.g. after a resize.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    pub fn draw(&mut self, fb: &FrameBuffer) -> Result<()> {
        self.buf.clear();
        if self.stale || self.shown.width() != fb.width() || self.shown.height() != fb.height() {
            encode_full_into(fb, &mut self.buf)?;
            self.stale = false;
        } else {
            encode_diff_into(&self.shown, fb, &mut self.buf)?;
        }
        if !self.buf.is_empty() {
            self.flush_buf().context("write frame")?;
        }
        self.shown.clone_from(fb);
        Ok(())
    }

    fn flush_buf(&mut self) -> io::Result<()> {
        let mut out = self.stdout.lock();
        out.write_all(&self.buf)?;
        out.flush()
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        // Last resort when the caller bailed out before exit().
        let _ = self.exit();
    }
}

/// Encode a complete repaint of `fb`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut pen = Pen::default();
    for y in 0..fb.height() {
        out.queue(cursor::MoveTo(0, y))?;
        for x in 0..fb.width() {
            pen.print(out, fb.get(x, y).unwrap_or_default())?;
        }
    }
    pen.finish(out)
}

/// Encode only the runs of `next` that differ from `prev`. Emits nothing when the
/// frames are identical.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    if prev.width() != next.width() || prev.height() != next.height() {
        return encode_full_into(next, out);
    }

    let mut pen = Pen::default();
    for (x, y, len) in changed_runs(prev, next) {
        out.queue(cursor::MoveTo(x, y))?;
        for dx in 0..len {
            pen.print(out, next.get(x + dx, y).unwrap_or_default())?;
        }
    }
    if pen.used() {
        pen.finish(out)?;
    }
    Ok(())
}

/// Tracks the style last sent to the terminal so unchanged styles are not re-sent.
#[derive(Default)]
struct Pen {
    style: Option<Style>,
}

impl Pen {
    fn used(&self) -> bool {
        self.style.is_some()
    }

    fn print(&mut self, out: &mut Vec<u8>, glyph: Glyph) -> Result<()> {
        if self.style != Some(glyph.style) {
            let style = glyph.style;
            out.queue(SetAttribute(Attribute::Reset))?;
            out.queue(SetForegroundColor(color(style.fg)))?;
            out.queue(SetBackgroundColor(color(style.bg)))?;
            if style.bold {
                out.queue(SetAttribute(Attribute::Bold))?;
            }
            if style.dim {
                out.queue(SetAttribute(Attribute::Dim))?;
            }
            self.style = Some(style);
        }
        out.queue(Print(glyph.ch))?;
        Ok(())
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<()> {
        out.queue(ResetColor)?;
        out.queue(SetAttribute(Attribute::Reset))?;
        self.style = None;
        Ok(())
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// `(x, y, len)` for each maximal horizontal run of differing glyphs. Both frames
/// must have the same size.
fn changed_runs<'a>(
    prev: &'a FrameBuffer,
    next: &'a FrameBuffer,
) -> impl Iterator<Item = (u16, u16, u16)> + 'a {
    let w = next.width();
    (0..next.height()).flat_map(move |y| {
        let differs = move |x: u16| prev.get(x, y) != next.get(x, y);
        let mut x = 0;
        std::iter::from_fn(move || {
            while x < w && !differs(x) {
                x += 1;
            }
            if x >= w {
                return None;
            }
            let start = x;
            while x < w && differs(x) {
                x += 1;
            }
            Some((start, y, x - start))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(rows: &[&str]) -> FrameBuffer {
        let w = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u16;
        let mut fb = FrameBuffer::new(w, rows.len() as u16);
        for (y, row) in rows.iter().enumerate() {
            fb.put_str(0, y as u16, row, Style::default());
        }
        fb
    }

    #[test]
    fn test_changed_runs_coalesce_adjacent_cells() {
        let a = frame(&[".....", "....."]);
        let b = frame(&[".XXX.", "X...X"]);
        let runs: Vec<_> = changed_runs(&a, &b).collect();
        assert_eq!(runs, vec![(1, 0, 3), (0, 1, 1), (4, 1, 1)]);
    }

    #[test]
    fn test_identical_frames_encode_nothing() {
        let a = frame(&["abc"]);
        let mut out = Vec::new();
        encode_diff_into(&a, &a.clone(), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_diff_contains_only_changed_text() {
        let a = frame(&["hello world"]);
        let b = frame(&["hello there"]);
        let mut out = Vec::new();
        encode_diff_into(&a, &b, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("there"));
        assert!(!text.contains("hello"));
    }

    #[test]
    fn test_size_change_falls_back_to_full_redraw() {
        let a = frame(&["ab"]);
        let b = frame(&["abc", "def"]);
        let mut full = Vec::new();
        encode_full_into(&b, &mut full).unwrap();
        let mut diff = Vec::new();
        encode_diff_into(&a, &b, &mut diff).unwrap();
        assert_eq!(diff, full);
    }

    #[test]
    fn test_style_change_is_a_change() {
        let a = frame(&["x"]);
        let mut b = a.clone();
        b.put_char(0, 0, 'x', Style::default().bold());
        assert_eq!(changed_runs(&a, &b).count(), 1);
    }
}
