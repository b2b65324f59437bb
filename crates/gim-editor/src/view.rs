//! Viewport — composes one complete frame into the output buffer.
//!
//! Each refresh: clamp the scroll origin to the cursor, hide the cursor,
//! repaint every screen row with colour-state tracking (switching SGR
//! only when the class changes), draw the inverted status bar and the
//! status message line, then reposition and show the cursor. The caller
//! hands the finished buffer to the terminal in a single write.

use std::io::{self, Write};

use gim_term::ansi;
use gim_term::output::OutputBuffer;

use crate::editor::Editor;
use crate::row::Row;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compose a full frame for the editor's current state.
///
/// # Errors
///
/// Propagates writer errors; the `OutputBuffer` sink itself never fails.
#[allow(clippy::cast_possible_truncation)] // Screen coordinates fit u16.
pub fn refresh(editor: &mut Editor, out: &mut OutputBuffer) -> io::Result<()> {
    editor.scroll();

    out.clear();
    ansi::cursor_hide(out)?;
    ansi::cursor_home(out)?;

    draw_rows(editor, out)?;
    draw_status_bar(editor, out)?;
    draw_message_bar(editor, out)?;

    let x = (editor.rx - editor.off_col) as u16;
    let y = (editor.cy - editor.off_row) as u16;
    ansi::cursor_to(out, x, y)?;
    ansi::cursor_show(out)?;
    Ok(())
}

fn draw_rows(editor: &Editor, out: &mut OutputBuffer) -> io::Result<()> {
    for y in 0..editor.screen_rows {
        ansi::clear_line(out)?;

        let file_row = y + editor.off_row;
        if let Some(row) = editor.buffer.row(file_row) {
            draw_row(row, editor.off_col, editor.screen_cols, out)?;
        } else if editor.buffer.is_empty() && y == editor.screen_rows / 3 {
            draw_welcome(editor.screen_cols, out)?;
        } else {
            out.write_all(b"~")?;
        }

        out.write_all(b"\r\n")?;
    }
    Ok(())
}

/// Paint the visible slice of one row.
///
/// Control bytes render as inverted `@`-offset letters (`?` for DEL and
/// friends); everything else is emitted with its highlight colour, the
/// SGR switched only when the colour actually changes.
fn draw_row(row: &Row, off_col: usize, screen_cols: usize, out: &mut OutputBuffer) -> io::Result<()> {
    let render = row.render();
    if off_col >= render.len() {
        return Ok(());
    }
    let end = (off_col + screen_cols).min(render.len());
    let visible = &render[off_col..end];
    let highlight = &row.highlight()[off_col..end];

    let mut current: Option<u8> = None;
    for (i, &b) in visible.iter().enumerate() {
        if b.is_ascii_control() {
            let symbol = if b <= 26 { b'@' + b } else { b'?' };
            ansi::invert(out)?;
            out.push(symbol);
            ansi::sgr_reset(out)?;
            // The reset killed the colour state; re-arm it.
            if let Some(color) = current {
                ansi::fg_color(out, color)?;
            }
            continue;
        }

        match highlight[i].color() {
            Some(color) => {
                if current != Some(color) {
                    current = Some(color);
                    ansi::fg_color(out, color)?;
                }
            }
            None => {
                if current.is_some() {
                    current = None;
                    ansi::fg_default(out)?;
                }
            }
        }
        out.push(b);
    }

    ansi::fg_default(out)
}

fn draw_welcome(screen_cols: usize, out: &mut OutputBuffer) -> io::Result<()> {
    let welcome = format!("gim editor -- version {VERSION}");
    let text = &welcome.as_bytes()[..welcome.len().min(screen_cols)];

    let mut padding = (screen_cols - text.len()) / 2;
    if padding > 0 {
        out.write_all(b"~")?;
        padding -= 1;
    }
    for _ in 0..padding {
        out.push(b' ');
    }
    out.write_all(text)
}

fn draw_status_bar(editor: &Editor, out: &mut OutputBuffer) -> io::Result<()> {
    ansi::invert(out)?;

    let buffer = &editor.buffer;
    let left = format!(
        "{} - {} lines{}",
        buffer.display_name(),
        buffer.len(),
        if buffer.is_dirty() { " (modified)" } else { "" },
    );
    let right = format!(
        "{}/{} {}",
        editor.cy + 1,
        buffer.len(),
        buffer.syntax().map_or("no ft", |syntax| syntax.file_type),
    );

    let left = &left.as_bytes()[..left.len().min(editor.screen_cols)];
    out.write_all(left)?;

    if left.len() + right.len() <= editor.screen_cols {
        for _ in 0..editor.screen_cols - left.len() - right.len() {
            out.push(b' ');
        }
        out.write_all(right.as_bytes())?;
    } else {
        for _ in left.len()..editor.screen_cols {
            out.push(b' ');
        }
    }

    ansi::sgr_reset(out)?;
    out.write_all(b"\r\n")
}

fn draw_message_bar(editor: &Editor, out: &mut OutputBuffer) -> io::Result<()> {
    ansi::clear_line(out)?;
    if let Some(message) = editor.status_message() {
        let message = message.as_bytes();
        out.write_all(&message[..message.len().min(editor.screen_cols)])?;
    }
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use gim_term::terminal::Size;

    fn frame_for(editor: &mut Editor) -> Vec<u8> {
        let mut out = OutputBuffer::new();
        refresh(editor, &mut out).unwrap();
        out.as_bytes().to_vec()
    }

    fn frame_text(editor: &mut Editor) -> String {
        String::from_utf8_lossy(&frame_for(editor)).into_owned()
    }

    fn editor_24x80() -> Editor {
        Editor::new(Size { rows: 24, cols: 80 })
    }

    fn editor_with(lines: &[&[u8]]) -> Editor {
        let mut editor = editor_24x80();
        for (i, line) in lines.iter().enumerate() {
            editor.buffer.insert_row(i, line.to_vec());
        }
        editor
    }

    // ── Frame shape ───────────────────────────────────────────────────

    #[test]
    fn frame_brackets_with_cursor_hide_and_show() {
        let mut editor = editor_24x80();
        let frame = frame_text(&mut editor);
        assert!(frame.starts_with("\x1b[?25l\x1b[H"));
        assert!(frame.ends_with("\x1b[?25h"));
    }

    #[test]
    fn frame_has_one_line_feed_per_screen_row_plus_status_bar() {
        let mut editor = editor_24x80();
        let frame = frame_text(&mut editor);
        // 22 text rows + the status bar line; the message line has none.
        assert_eq!(frame.matches("\r\n").count(), 23);
    }

    #[test]
    fn cursor_lands_at_the_top_left_on_a_fresh_editor() {
        let mut editor = editor_24x80();
        let frame = frame_text(&mut editor);
        assert!(frame.contains("\x1b[1;1H"));
    }

    // ── Welcome banner ────────────────────────────────────────────────

    #[test]
    fn empty_buffer_centres_the_banner_a_third_down() {
        let mut editor = editor_24x80();
        let frame = frame_text(&mut editor);
        let lines: Vec<&str> = frame.split("\r\n").collect();
        // screen_rows = 22, banner on row 22/3 = 7.
        assert!(lines[7].contains("gim editor -- version"));
        // Leading tilde, then centring spaces.
        assert!(lines[7].contains("\x1b[K~ "));
        for (i, line) in lines.iter().enumerate().take(22) {
            if i != 7 {
                assert!(line.contains('~'), "row {i} should be a tilde row");
            }
        }
    }

    #[test]
    fn non_empty_buffer_has_no_banner() {
        let mut editor = editor_with(&[b"x"]);
        assert!(!frame_text(&mut editor).contains("version"));
    }

    // ── Row painting ──────────────────────────────────────────────────

    #[test]
    fn plain_rows_render_verbatim() {
        let mut editor = editor_with(&[b"hello"]);
        assert!(frame_text(&mut editor).contains("hello"));
    }

    #[test]
    fn colours_switch_only_on_class_change() {
        let mut editor = editor_with(&[b"int x = 42;"]);
        editor.buffer.set_filename("t.go".into());
        let frame = frame_text(&mut editor);
        assert!(frame.contains("\x1b[32mint"));
        assert!(frame.contains("\x1b[39m x = "));
        assert!(frame.contains("\x1b[31m42"));
        // One colour sequence covers both digits.
        assert!(!frame.contains("\x1b[31m4\x1b[31m"));
    }

    #[test]
    fn control_bytes_render_inverted() {
        let mut editor = editor_with(&[&[b'a', 0x01, b'b'][..]]);
        let frame = frame_text(&mut editor);
        assert!(frame.contains("a\x1b[7mA\x1b[mb"));
    }

    #[test]
    fn del_renders_as_question_mark() {
        let mut editor = editor_with(&[&[0x7f][..]]);
        assert!(frame_text(&mut editor).contains("\x1b[7m?\x1b[m"));
    }

    #[test]
    fn long_rows_are_cut_at_the_screen_edge() {
        let line = vec![b'x'; 200];
        let mut editor = editor_with(&[&line[..]]);
        let frame = frame_text(&mut editor);
        let longest = frame
            .split("\r\n")
            .map(|l| l.matches('x').count())
            .max()
            .unwrap();
        assert_eq!(longest, 80);
    }

    #[test]
    fn horizontal_scroll_slices_from_off_col() {
        let mut editor = editor_with(&[b"abcdefgh"]);
        editor.cx = 8;
        editor.off_col = 6; // scroll() keeps it: rx=8 within 6+80
        let frame = frame_text(&mut editor);
        assert!(frame.contains("\x1b[Kgh\x1b[39m"));
    }

    // ── Status bar ────────────────────────────────────────────────────

    #[test]
    fn status_bar_shows_sentinel_name_and_counts() {
        let mut editor = editor_24x80();
        let frame = frame_text(&mut editor);
        assert!(frame.contains("\x1b[7m[New File] - 0 lines"));
        assert!(frame.contains("1/0 no ft"));
    }

    #[test]
    fn status_bar_flags_a_dirty_buffer() {
        let mut editor = editor_with(&[b"x"]);
        assert!(frame_text(&mut editor).contains(" (modified)"));
    }

    #[test]
    fn status_bar_shows_the_file_type() {
        let mut editor = editor_with(&[b"x"]);
        editor.buffer.set_filename("a.c".into());
        let frame = frame_text(&mut editor);
        assert!(frame.contains("a.c - 1 lines"));
        assert!(frame.contains("1/1 c"));
    }

    #[test]
    fn status_bar_right_field_hugs_the_edge() {
        let mut editor = editor_24x80();
        let frame = frame_text(&mut editor);
        let bar = frame
            .split("\r\n")
            .find(|l| l.contains("[New File]"))
            .unwrap();
        let bar = bar.strip_prefix("\x1b[7m").unwrap();
        let bar = bar.strip_suffix("\x1b[m").unwrap();
        assert_eq!(bar.len(), 80);
        assert!(bar.ends_with("1/0 no ft"));
    }

    // ── Message bar ───────────────────────────────────────────────────

    #[test]
    fn live_status_message_is_drawn() {
        let mut editor = editor_24x80();
        editor.set_status("HELP: Ctrl-s = save | Ctrl-q = quit | Ctrl-F = find");
        let frame = frame_text(&mut editor);
        assert!(frame.ends_with("\x1b[KHELP: Ctrl-s = save | Ctrl-q = quit | Ctrl-F = find\x1b[1;1H\x1b[?25h"));
    }

    #[test]
    fn message_is_truncated_to_the_screen_width() {
        let mut editor = editor_24x80();
        editor.set_status("m".repeat(200));
        let frame = frame_text(&mut editor);
        let tail = frame.rsplit("\x1b[K").next().unwrap();
        assert_eq!(tail.matches('m').count(), 80);
    }

    // ── Visibility invariant ──────────────────────────────────────────

    #[test]
    fn refresh_keeps_the_cursor_inside_the_viewport() {
        let lines: Vec<Vec<u8>> = (0..100).map(|i| format!("row {i}").into_bytes()).collect();
        let refs: Vec<&[u8]> = lines.iter().map(Vec::as_slice).collect();
        let mut editor = editor_with(&refs);

        for cy in [0, 21, 22, 50, 99, 100] {
            editor.cy = cy;
            editor.cx = 0;
            let _ = frame_for(&mut editor);
            let (off_row, off_col) = editor.scroll_origin();
            assert!(editor.cy >= off_row && editor.cy < off_row + editor.screen_rows);
            assert!(editor.rx >= off_col && editor.rx < off_col + editor.screen_cols);
        }
    }

    #[test]
    fn cursor_reposition_uses_viewport_relative_coordinates() {
        let lines: Vec<Vec<u8>> = (0..100).map(|_| b"text".to_vec()).collect();
        let refs: Vec<&[u8]> = lines.iter().map(Vec::as_slice).collect();
        let mut editor = editor_with(&refs);
        editor.cy = 50;
        editor.cx = 2;
        let frame = frame_text(&mut editor);
        // off_row becomes 29, so the cursor row on screen is 50-29+1 = 22.
        assert!(frame.ends_with("\x1b[22;3H\x1b[?25h"));
    }
}
