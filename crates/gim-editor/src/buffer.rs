//! Buffer — the ordered sequence of rows.
//!
//! All row mutation funnels through here so three invariants hold after
//! every operation: each row's `idx` equals its position, each highlight
//! vector matches its render length, and the open-comment flag has been
//! propagated forward until it stabilized. Every edit marks the buffer
//! dirty; saving clears it.
//!
//! File I/O also lives here: rows are loaded by splitting the raw file
//! bytes on line terminators (chunks of an over-long line are joined
//! before the row is stored) and saved with a `\r\n` after every row.

use std::fs;
use std::io;

use gim_syntax::{profile, scan, Syntax};

use crate::row::Row;

/// Display name for a buffer that has never been given a filename.
pub const UNNAMED: &str = "[New File]";

/// The ordered row sequence, its file identity, and the active profile.
pub struct Buffer {
    rows: Vec<Row>,
    dirty: bool,
    filename: Option<String>,
    syntax: Option<&'static Syntax>,
}

impl Buffer {
    /// An empty, unnamed, clean buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            dirty: false,
            filename: None,
            syntax: None,
        }
    }

    /// Load a buffer from a file.
    ///
    /// A missing file yields an empty buffer carrying the filename — the
    /// first save creates it. Line terminators (`\n` or `\r\n`) are
    /// stripped; the bytes themselves are not reinterpreted.
    ///
    /// # Errors
    ///
    /// Any read failure other than the file not existing.
    pub fn from_file(path: &str) -> io::Result<Self> {
        let rows = match fs::read(path) {
            Ok(data) => split_rows(&data),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err),
        };

        let mut buffer = Self {
            rows,
            dirty: false,
            filename: Some(path.to_string()),
            syntax: None,
        };
        buffer.renumber_from(0);
        buffer.select_syntax();
        Ok(buffer)
    }

    /// Write every row followed by `\r\n` to the buffer's file.
    ///
    /// Returns the number of content bytes written (terminators not
    /// counted) and clears the dirty flag.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the buffer has no filename; otherwise any
    /// write failure, with the dirty flag left set.
    pub fn save(&mut self) -> io::Result<usize> {
        let Some(filename) = self.filename.clone() else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "buffer has no filename",
            ));
        };

        let mut data = Vec::new();
        let mut size = 0;
        for row in &self.rows {
            size += row.line.len();
            data.extend_from_slice(&row.line);
            data.extend_from_slice(b"\r\n");
        }

        fs::write(&filename, &data)?;
        self.dirty = false;
        Ok(size)
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the buffer has no rows at all.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows, in order.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The row at `at`, if any.
    #[inline]
    #[must_use]
    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    /// Mutable row access for the find overlay. Content edits go through
    /// the operations below so rendering and highlighting stay in sync.
    #[inline]
    pub(crate) fn row_mut(&mut self, at: usize) -> Option<&mut Row> {
        self.rows.get_mut(at)
    }

    /// Whether the buffer has unsaved changes.
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The filename, if the buffer has one.
    #[inline]
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// The filename as shown in the status bar.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.filename.as_deref().unwrap_or(UNNAMED)
    }

    /// The active language profile, if any.
    #[inline]
    #[must_use]
    pub fn syntax(&self) -> Option<&'static Syntax> {
        self.syntax
    }

    /// Name the buffer and re-select the language profile.
    pub fn set_filename(&mut self, name: String) {
        self.filename = Some(name);
        self.select_syntax();
    }

    // ── Row operations ──────────────────────────────────────────────────

    /// Insert a new row at `at` (`0..=len`). Positions past the end are
    /// ignored. Following rows are renumbered and the new row highlighted.
    pub fn insert_row(&mut self, at: usize, line: Vec<u8>) {
        if at > self.rows.len() {
            return;
        }
        self.rows.insert(at, Row::new(line));
        self.renumber_from(at);
        self.update_syntax(at);
        self.dirty = true;
    }

    /// Remove the row at `at`. Following rows are renumbered, and the row
    /// that slides into the slot is rescanned so a comment opened (or
    /// closed) by the deleted row propagates correctly.
    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.renumber_from(at);
        if at < self.rows.len() {
            self.update_syntax(at);
        }
        self.dirty = true;
    }

    /// Insert one byte into row `cy` at column `at` (clamped to the line).
    pub fn row_insert_char(&mut self, cy: usize, at: usize, b: u8) {
        if cy >= self.rows.len() {
            return;
        }
        self.rows[cy].insert_byte(at, b);
        self.update_syntax(cy);
        self.dirty = true;
    }

    /// Delete the byte at column `at` of row `cy`. Out of range is a no-op.
    pub fn row_delete_char(&mut self, cy: usize, at: usize) {
        if cy >= self.rows.len() {
            return;
        }
        if self.rows[cy].delete_byte(at) {
            self.update_syntax(cy);
            self.dirty = true;
        }
    }

    /// Split row `at` at column `cx`: the prefix stays, the suffix becomes
    /// a new row at `at + 1`.
    pub fn split_row(&mut self, at: usize, cx: usize) {
        if at >= self.rows.len() {
            return;
        }
        let cx = cx.min(self.rows[at].line.len());
        let suffix = self.rows[at].line.split_off(cx);
        self.rows[at].rebuild_render();
        self.rows.insert(at + 1, Row::new(suffix));
        self.renumber_from(at);
        self.update_syntax(at);
        self.dirty = true;
    }

    /// Append row `at`'s line onto row `at - 1` and delete row `at` — the
    /// join performed by backspace at column 0.
    pub fn join_rows(&mut self, at: usize) {
        if at == 0 || at >= self.rows.len() {
            return;
        }
        let moved = std::mem::take(&mut self.rows[at].line);
        self.rows[at - 1].append_bytes(&moved);
        self.rows.remove(at);
        self.renumber_from(at);
        self.update_syntax(at - 1);
        self.dirty = true;
    }

    // ── Syntax maintenance ──────────────────────────────────────────────

    /// Re-select the profile from the filename suffix and re-highlight
    /// every row. An unnamed buffer has no profile.
    pub fn select_syntax(&mut self) {
        self.syntax = self.filename.as_deref().and_then(profile::select);
        let mut open = false;
        for row in &mut self.rows {
            let (hl, now_open) = scan::scan(&row.render, self.syntax, open);
            row.highlight = hl;
            row.hl_open_comment = now_open;
            open = now_open;
        }
    }

    /// Rescan row `at`, then cascade forward while the open-comment flag
    /// keeps changing (a loop, though the flag's two values bound it
    /// anyway).
    fn update_syntax(&mut self, mut at: usize) {
        while at < self.rows.len() {
            let starts = at > 0 && self.rows[at - 1].hl_open_comment;
            let (hl, open) = scan::scan(&self.rows[at].render, self.syntax, starts);
            let row = &mut self.rows[at];
            row.highlight = hl;
            let changed = row.hl_open_comment != open;
            row.hl_open_comment = open;
            if !changed {
                break;
            }
            at += 1;
        }
    }

    fn renumber_from(&mut self, at: usize) {
        for (i, row) in self.rows.iter_mut().enumerate().skip(at) {
            row.idx = i;
        }
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Split raw file bytes into row lines: terminators are `\n` with an
/// optional preceding `\r`; a final line without a terminator is kept.
fn split_rows(data: &[u8]) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut line = Vec::new();
    for &b in data {
        if b == b'\n' {
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            rows.push(Row::new(std::mem::take(&mut line)));
        } else {
            line.push(b);
        }
    }
    if !line.is_empty() {
        rows.push(Row::new(line));
    }
    rows
}

// ─── Tests ──────────────────────────────────────────────────────────────────
