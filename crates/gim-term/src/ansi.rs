// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit — the view layer makes those. This module
// just knows the byte-level encoding of every terminal command we emit.
//
// All cursor positions are 0-indexed in our API and converted to 1-indexed
// for the terminal (ANSI standard uses 1-based coordinates).
//
// All functions return `io::Result` propagated from the underlying writer.
// In practice they never fail when writing to `OutputBuffer` (backed by a Vec).

use std::io::{self, Write};

// ─── Cursor ─────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` using the CUP (Cursor Position) sequence.
///
/// Our coordinates are 0-indexed; ANSI CUP is 1-indexed.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", y + 1, x + 1)
}

/// Move the cursor to the top-left corner (CUP with no parameters).
#[inline]
pub fn cursor_home(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[H")
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

/// Push the cursor to the bottom-right corner: CUF and CUD with a parameter
/// far larger than any real terminal. Both sequences clamp at the edge, which
/// is what makes the cursor-position-report fallback for window sizing work.
#[inline]
pub fn cursor_far_corner(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[999C\x1b[999B")
}

/// Request a cursor position report (DSR 6). The terminal replies on stdin
/// with `ESC [ <row> ; <col> R`.
#[inline]
pub fn query_cursor_position(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[6n")
}

// ─── Screen ─────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Clear from the cursor to the end of the current line (EL 0).
#[inline]
pub fn clear_line(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[K")
}

// ─── Text Attributes ────────────────────────────────────────────────────────

/// Switch to inverted video (SGR 7). Used for the status bar and for making
/// control bytes visible in the text area.
#[inline]
pub fn invert(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[7m")
}

/// Reset all SGR attributes to terminal defaults (SGR with no parameters).
#[inline]
pub fn sgr_reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[m")
}

/// Set the foreground colour to one of the base SGR codes (31–37).
#[inline]
pub fn fg_color(w: &mut impl Write, code: u8) -> io::Result<()> {
    write!(w, "\x1b[{code}m")
}

/// Reset the foreground colour to the terminal default (SGR 39).
#[inline]
pub fn fg_default(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[39m")
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> Vec<u8> {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        buf
    }

    #[test]
    fn cursor_to_converts_to_one_indexed() {
        assert_eq!(collect(|w| cursor_to(w, 0, 0)), b"\x1b[1;1H");
        assert_eq!(collect(|w| cursor_to(w, 4, 2)), b"\x1b[3;5H");
    }

    #[test]
    fn cursor_to_row_before_column() {
        // CUP takes row;col — x is the column, y the row.
        assert_eq!(collect(|w| cursor_to(w, 79, 23)), b"\x1b[24;80H");
    }

    #[test]
    fn cursor_home_is_bare_cup() {
        assert_eq!(collect(cursor_home), b"\x1b[H");
    }

    #[test]
    fn cursor_visibility() {
        assert_eq!(collect(cursor_hide), b"\x1b[?25l");
        assert_eq!(collect(cursor_show), b"\x1b[?25h");
    }

    #[test]
    fn far_corner_is_forward_then_down() {
        assert_eq!(collect(cursor_far_corner), b"\x1b[999C\x1b[999B");
    }

    #[test]
    fn position_report_request() {
        assert_eq!(collect(query_cursor_position), b"\x1b[6n");
    }

    #[test]
    fn screen_clears() {
        assert_eq!(collect(clear_screen), b"\x1b[2J");
        assert_eq!(collect(clear_line), b"\x1b[K");
    }

    #[test]
    fn sgr_sequences() {
        assert_eq!(collect(invert), b"\x1b[7m");
        assert_eq!(collect(sgr_reset), b"\x1b[m");
        assert_eq!(collect(fg_default), b"\x1b[39m");
    }

    #[test]
    fn fg_color_encodes_code() {
        assert_eq!(collect(|w| fg_color(w, 31)), b"\x1b[31m");
        assert_eq!(collect(|w| fg_color(w, 36)), b"\x1b[36m");
    }
}
