// SPDX-License-Identifier: MIT
//
// gim — a small VT100 terminal text editor.
//
// This is the binary that wires together the crates:
//
//   gim-term   → raw mode, window size, key decoding, frame output
//   gim-syntax → highlight classes, language profiles, scan engine
//   gim-editor → rows, buffer, cursor, viewport, incremental find
//
// Each keypress flows through:
//
//   stdin → key decoder → dispatch → buffer/cursor mutation
//   refresh → view::refresh → frame buffer → one terminal write
//
// The prompt sub-loop (save-as, search) takes over the same read/refresh
// path rather than spawning anything: it updates the status message with
// the pending input, repaints, reads one key, and hands it to an optional
// callback. Incremental find is just the search prompt plus a callback
// that scans the buffer.
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ text rows                    │  ← rows - 2 (managed by the view)
//   ├──────────────────────────────┤
//   │ status bar (inverted)        │  ← 1 row
//   ├──────────────────────────────┤
//   │ status message / prompt      │  ← 1 row
//   └──────────────────────────────┘

use std::env;
use std::error::Error;
use std::io;
use std::process;

use gim_editor::view;
use gim_editor::Editor;
use gim_term::key::{ctrl, read_key, Key, BACKSPACE, ENTER};
use gim_term::output::OutputBuffer;
use gim_term::terminal::Terminal;

const CTRL_Q: u8 = ctrl(b'q');
const CTRL_S: u8 = ctrl(b's');
const CTRL_F: u8 = ctrl(b'f');
const CTRL_H: u8 = ctrl(b'h');
const CTRL_L: u8 = ctrl(b'l');

const HELP_MESSAGE: &str = "HELP: Ctrl-s = save | Ctrl-q = quit | Ctrl-F = find";

/// Signature of a prompt callback: invoked after every keystroke with the
/// accumulated input and the key that caused the call.
type PromptCallback = fn(&mut Editor, &[u8], Key);

// ─── App ────────────────────────────────────────────────────────────────────

/// What the dispatcher tells the main loop after a key.
enum Action {
    Continue,
    Quit,
}

/// The running application: terminal, editor state, and the reusable
/// frame buffer. The terminal is borrowed so `run` can still reach it
/// for the exit-path screen clear after the loop ends.
struct App<'a> {
    term: &'a mut Terminal,
    editor: Editor,
    frame: OutputBuffer,
}

impl App<'_> {
    /// The read-key / dispatch / refresh loop. Returns on Ctrl-Q (after
    /// the dirty confirmation) or a terminal I/O failure.
    fn run(&mut self) -> io::Result<()> {
        loop {
            self.refresh()?;
            let key = read_key(&mut *self.term)?;
            if let Action::Quit = self.dispatch(key)? {
                return Ok(());
            }
        }
    }

    /// Compose a frame for the current state and write it in one call.
    fn refresh(&mut self) -> io::Result<()> {
        view::refresh(&mut self.editor, &mut self.frame)?;
        self.term.write_all(self.frame.as_bytes())
    }

    /// The key table. Every command except the quit confirmation itself
    /// re-arms the dirty-quit counter on the way out.
    fn dispatch(&mut self, key: Key) -> io::Result<Action> {
        match key {
            Key::Byte(ENTER) => self.editor.insert_newline(),
            Key::Byte(CTRL_Q) => {
                if self.editor.confirm_quit() {
                    return Ok(Action::Quit);
                }
                // Still counting down; leave the counter alone.
                return Ok(Action::Continue);
            }
            Key::Byte(CTRL_S) => self.save()?,
            Key::Byte(CTRL_F) => self.find()?,
            Key::PageUp | Key::PageDown => self.editor.page_move(key),
            Key::Home => self.editor.move_home(),
            Key::End => self.editor.move_end(),
            Key::Delete => {
                self.editor.move_cursor(Key::ArrowRight);
                self.editor.delete_char();
            }
            Key::Byte(BACKSPACE | CTRL_H) => self.editor.delete_char(),
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight => {
                self.editor.move_cursor(key);
            }
            Key::Byte(CTRL_L) | Key::Escape => {}
            Key::Byte(b) => self.editor.insert_char(b),
        }
        self.editor.reset_quit_confirm();
        Ok(Action::Continue)
    }

    /// Ctrl-S. An unnamed buffer prompts for its filename first; a save
    /// failure stays in the editor as a status message, dirty flag intact.
    fn save(&mut self) -> io::Result<()> {
        if self.editor.needs_filename() {
            match self.prompt("Save as: {}", None)? {
                Some(name) if !name.is_empty() => {
                    self.editor
                        .set_filename(String::from_utf8_lossy(&name).into_owned());
                }
                _ => {
                    self.editor.set_status("Save aborted");
                    return Ok(());
                }
            }
        }

        match self.editor.save() {
            Ok(size) => self
                .editor
                .set_status(format!("{size} bytes written to disk")),
            Err(err) => self
                .editor
                .set_status(format!("Can't save! I/O error: {err}")),
        }
        Ok(())
    }

    /// Ctrl-F. Runs the search prompt with the find callback; cursor and
    /// scroll are restored to their pre-prompt values when it ends.
    fn find(&mut self) -> io::Result<()> {
        let snapshot = self.editor.snapshot_cursor();
        self.prompt("Search: {} (Use ESC/Arrows/Enter)", Some(Editor::find_step))?;
        self.editor.restore_cursor(snapshot);
        Ok(())
    }

    /// The modal prompt sub-loop.
    ///
    /// `template` contains a `{}` placeholder for the pending input. Each
    /// iteration repaints through the normal refresh path, reads one key,
    /// and applies it: Enter accepts (`Some`), Escape cancels (`None`),
    /// Backspace/Del/Ctrl-H drop the last byte, printable ASCII appends.
    /// The callback, when present, runs after every keystroke.
    fn prompt(
        &mut self,
        template: &str,
        callback: Option<PromptCallback>,
    ) -> io::Result<Option<Vec<u8>>> {
        let mut input: Vec<u8> = Vec::new();

        loop {
            let pending = String::from_utf8_lossy(&input).into_owned();
            self.editor.set_status(template.replacen("{}", &pending, 1));
            self.refresh()?;

            let key = read_key(&mut *self.term)?;
            match key {
                Key::Byte(ENTER) => {
                    self.editor.set_status("");
                    if let Some(callback) = callback {
                        callback(&mut self.editor, &input, key);
                    }
                    return Ok(Some(input));
                }
                Key::Escape => {
                    self.editor.set_status("");
                    if let Some(callback) = callback {
                        callback(&mut self.editor, &input, key);
                    }
                    return Ok(None);
                }
                Key::Delete | Key::Byte(BACKSPACE | CTRL_H) => {
                    if input.pop().is_none() {
                        continue;
                    }
                }
                Key::Byte(b) if !b.is_ascii_control() && b < 0x80 => input.push(b),
                _ => {}
            }

            if let Some(callback) = callback {
                callback(&mut self.editor, &input, key);
            }
        }
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    let filename = env::args().nth(1);

    if let Err(err) = run(filename.as_deref()) {
        // Fatal failures go to standard output, after the screen clear
        // `run` already emitted and with the line discipline restored.
        println!("gim: {err}");
        process::exit(1);
    }
}

fn run(filename: Option<&str>) -> Result<(), Box<dyn Error>> {
    let mut term = Terminal::new();
    let result = setup_and_run(&mut term, filename);

    // Clear the screen on every exit path — clean quit and fatal error
    // alike, startup failures included — while the terminal is still
    // ours; dropping `term` then restores the saved line discipline
    // (the panic hook covers the rest).
    let _ = term.write_all(b"\x1b[2J\x1b[H");

    result
}

fn setup_and_run(term: &mut Terminal, filename: Option<&str>) -> Result<(), Box<dyn Error>> {
    term.enter_raw()?;
    let size = term.window_size()?;

    let mut editor = Editor::new(size);
    if let Some(path) = filename {
        editor.open(path).map_err(|err| format!("{path}: {err}"))?;
    }
    editor.set_status(HELP_MESSAGE);

    let mut app = App {
        term,
        editor,
        frame: OutputBuffer::new(),
    };
    app.run().map_err(Into::into)
}
