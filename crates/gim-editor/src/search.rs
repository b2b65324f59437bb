//! Incremental find — the state machine behind the search prompt.
//!
//! The prompt calls [`Editor::find_step`] after every keystroke with the
//! query typed so far. Arrows set the scan direction and step to the
//! next hit; any other key restarts the scan from the top; Enter and
//! Escape end the session. Exactly one row ever carries the `Match`
//! overlay — its real highlighting is saved before the overlay is
//! painted and restored on the next step (or on exit).

use gim_syntax::Highlight;
use gim_term::key::{Key, ENTER};

use crate::editor::Editor;

/// Search state carried across prompt keystrokes.
#[derive(Debug)]
pub struct FindState {
    /// Row of the previous hit; `None` when the scan starts over.
    last_match: Option<usize>,
    /// Scan direction.
    forward: bool,
    /// The overlaid row's pre-overlay highlighting.
    saved: Option<SavedHighlight>,
}

#[derive(Debug)]
struct SavedHighlight {
    row: usize,
    highlight: Vec<Highlight>,
}

impl Default for FindState {
    fn default() -> Self {
        Self {
            last_match: None,
            forward: true,
            saved: None,
        }
    }
}

impl Editor {
    /// One step of the incremental find. Called by the search prompt
    /// after every keystroke, with the accumulated query.
    pub fn find_step(&mut self, query: &[u8], key: Key) {
        // Take down the previous overlay before anything else.
        if let Some(saved) = self.find.saved.take() {
            if let Some(row) = self.buffer.row_mut(saved.row) {
                if row.highlight.len() == saved.highlight.len() {
                    row.highlight = saved.highlight;
                }
            }
        }

        match key {
            Key::Byte(ENTER) | Key::Escape => {
                self.find.last_match = None;
                self.find.forward = true;
                return;
            }
            Key::ArrowRight | Key::ArrowDown => self.find.forward = true,
            Key::ArrowLeft | Key::ArrowUp => self.find.forward = false,
            _ => {
                self.find.last_match = None;
                self.find.forward = true;
            }
        }

        if query.is_empty() || self.buffer.is_empty() {
            return;
        }

        // A fresh scan always runs forward.
        if self.find.last_match.is_none() {
            self.find.forward = true;
        }

        let count = self.buffer.len() as isize;
        let mut current = self.find.last_match.map_or(-1, |row| row as isize);

        for _ in 0..count {
            current += if self.find.forward { 1 } else { -1 };
            if current < 0 {
                current = count - 1;
            } else if current == count {
                current = 0;
            }

            let at = current as usize;
            let Some(row) = self.buffer.row(at) else {
                continue;
            };
            let Some(rx) = find_bytes(row.render(), query) else {
                continue;
            };

            self.find.last_match = Some(at);
            self.cy = at;
            self.cx = row.rx_to_cx(rx);
            // Pin the scroll past the end so the clamp lands the match
            // row at the top of the viewport.
            self.off_row = self.buffer.len();

            if let Some(row) = self.buffer.row_mut(at) {
                self.find.saved = Some(SavedHighlight {
                    row: at,
                    highlight: row.highlight.clone(),
                });
                row.highlight[rx..rx + query.len()].fill(Highlight::Match);
            }
            return;
        }

        self.set_status("Not found");
    }
}

/// First occurrence of `needle` in `haystack` (`needle` non-empty).
fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
