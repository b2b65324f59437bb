//! Row — one logical line and its display projection.
//!
//! A row keeps the raw `line` bytes as loaded or edited, the `render`
//! bytes shown on screen (tabs expanded to spaces), one highlight tag per
//! render byte, the open-comment flag the scan engine threads across
//! rows, and its current index in the buffer.
//!
//! Two coordinate systems meet here: `cx` counts bytes of `line`, `rx`
//! counts columns of `render`. A tab advances `rx` by [`TAB_STOP`]
//! columns, every other byte by one.

use gim_syntax::Highlight;

/// Width of a rendered tab, in columns.
pub const TAB_STOP: usize = 4;

/// One logical row of the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub(crate) idx: usize,
    pub(crate) line: Vec<u8>,
    pub(crate) render: Vec<u8>,
    pub(crate) highlight: Vec<Highlight>,
    pub(crate) hl_open_comment: bool,
}

impl Row {
    /// Create a row from raw line bytes. The render projection is built
    /// immediately; highlighting starts all-`Normal` until the buffer runs
    /// the scan engine over it.
    #[must_use]
    pub fn new(line: Vec<u8>) -> Self {
        let render = render_of(&line);
        let highlight = vec![Highlight::Normal; render.len()];
        Self {
            idx: 0,
            line,
            render,
            highlight,
            hl_open_comment: false,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// The raw line bytes.
    #[inline]
    #[must_use]
    pub fn line(&self) -> &[u8] {
        &self.line
    }

    /// The display-expanded bytes.
    #[inline]
    #[must_use]
    pub fn render(&self) -> &[u8] {
        &self.render
    }

    /// One highlight tag per render byte.
    #[inline]
    #[must_use]
    pub fn highlight(&self) -> &[Highlight] {
        &self.highlight
    }

    /// This row's position in the buffer.
    #[inline]
    #[must_use]
    pub fn idx(&self) -> usize {
        self.idx
    }

    /// Whether a multi-line comment is still open after this row.
    #[inline]
    #[must_use]
    pub fn hl_open_comment(&self) -> bool {
        self.hl_open_comment
    }

    // ── Coordinate conversion ───────────────────────────────────────────

    /// Render column of logical column `cx`: iterate the first `cx` line
    /// bytes, tabs counting [`TAB_STOP`], everything else one.
    #[must_use]
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        self.line[..cx.min(self.line.len())]
            .iter()
            .map(|&b| if b == b'\t' { TAB_STOP } else { 1 })
            .sum()
    }

    /// Logical column containing render column `rx`: scan until the
    /// cumulative render column strictly exceeds the target.
    #[must_use]
    pub fn rx_to_cx(&self, rx: usize) -> usize {
        let mut current = 0;
        for (cx, &b) in self.line.iter().enumerate() {
            current += if b == b'\t' { TAB_STOP } else { 1 };
            if current > rx {
                return cx;
            }
        }
        self.line.len()
    }

    // ── Mutation (buffer-internal) ──────────────────────────────────────

    /// Insert one byte at `at`, clamped into `[0, len]`.
    pub(crate) fn insert_byte(&mut self, at: usize, b: u8) {
        let at = at.min(self.line.len());
        self.line.insert(at, b);
        self.rebuild_render();
    }

    /// Delete the byte at `at`. Out-of-range is a no-op; returns whether
    /// anything was removed.
    pub(crate) fn delete_byte(&mut self, at: usize) -> bool {
        if at >= self.line.len() {
            return false;
        }
        self.line.remove(at);
        self.rebuild_render();
        true
    }

    /// Append bytes to the end of the line (row join).
    pub(crate) fn append_bytes(&mut self, bytes: &[u8]) {
        self.line.extend_from_slice(bytes);
        self.rebuild_render();
    }

    /// Rebuild the render projection after a line edit. The highlight
    /// vector is reset to `Normal`; the buffer rescans it right after.
    pub(crate) fn rebuild_render(&mut self) {
        self.render = render_of(&self.line);
        self.highlight = vec![Highlight::Normal; self.render.len()];
    }
}

/// The display projection of a line: every tab replaced by exactly
/// [`TAB_STOP`] spaces.
#[must_use]
pub fn render_of(line: &[u8]) -> Vec<u8> {
    let mut render = Vec::with_capacity(line.len());
    for &b in line {
        if b == b'\t' {
            render.extend_from_slice(&[b' '; TAB_STOP]);
        } else {
            render.push(b);
        }
    }
    render
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Render projection ─────────────────────────────────────────────

    #[test]
    fn render_without_tabs_is_the_line() {
        let row = Row::new(b"plain text".to_vec());
        assert_eq!(row.render(), b"plain text");
    }

    #[test]
    fn tabs_expand_to_exactly_tab_stop_spaces() {
        let row = Row::new(b"\ta\tb".to_vec());
        assert_eq!(row.render(), b"    a    b");
    }

    #[test]
    fn highlight_always_matches_render_length() {
        for line in [&b""[..], b"x", b"\t", b"a\tb\tc"] {
            let row = Row::new(line.to_vec());
            assert_eq!(row.highlight().len(), row.render().len());
        }
    }

    #[test]
    fn edits_keep_render_in_sync() {
        let mut row = Row::new(b"ab".to_vec());
        row.insert_byte(1, b'\t');
        assert_eq!(row.line(), b"a\tb");
        assert_eq!(row.render(), b"a    b");
        assert_eq!(row.highlight().len(), row.render().len());

        assert!(row.delete_byte(1));
        assert_eq!(row.render(), b"ab");

        row.append_bytes(b"\tz");
        assert_eq!(row.render(), b"ab    z");
    }

    #[test]
    fn delete_out_of_range_is_a_noop() {
        let mut row = Row::new(b"ab".to_vec());
        assert!(!row.delete_byte(2));
        assert_eq!(row.line(), b"ab");
    }

    #[test]
    fn insert_clamps_past_end() {
        let mut row = Row::new(b"ab".to_vec());
        row.insert_byte(99, b'c');
        assert_eq!(row.line(), b"abc");
    }

    // ── Coordinate conversion ─────────────────────────────────────────

    #[test]
    fn cx_to_rx_counts_tabs_wide() {
        let row = Row::new(b"\tab\tc".to_vec());
        assert_eq!(row.cx_to_rx(0), 0);
        assert_eq!(row.cx_to_rx(1), 4); // past the tab
        assert_eq!(row.cx_to_rx(2), 5);
        assert_eq!(row.cx_to_rx(3), 6);
        assert_eq!(row.cx_to_rx(4), 10); // past the second tab
        assert_eq!(row.cx_to_rx(5), 11);
    }

    #[test]
    fn rx_to_cx_finds_the_containing_byte() {
        let row = Row::new(b"\tab".to_vec());
        // Columns 0..4 all land inside the tab.
        for rx in 0..4 {
            assert_eq!(row.rx_to_cx(rx), 0);
        }
        assert_eq!(row.rx_to_cx(4), 1);
        assert_eq!(row.rx_to_cx(5), 2);
    }

    #[test]
    fn rx_past_end_clamps_to_line_length() {
        let row = Row::new(b"ab\t".to_vec());
        assert_eq!(row.rx_to_cx(100), 3);
    }

    #[test]
    fn conversion_round_trip_laws() {
        let row = Row::new(b"a\tbc\t\td".to_vec());
        // rx→cx→rx never overshoots the original render column…
        let width = row.cx_to_rx(row.line().len());
        for rx in 0..=width {
            assert!(row.cx_to_rx(row.rx_to_cx(rx)) <= rx);
        }
        // …and cx→rx→cx is the identity on in-range columns.
        for cx in 0..=row.line().len() {
            assert_eq!(row.rx_to_cx(row.cx_to_rx(cx)), cx);
        }
    }
}
