// SPDX-License-Identifier: MIT
//
// gim-term — Terminal layer for gim.
//
// Raw-mode acquisition with RAII restore, window-size discovery with the
// cursor-report fallback, decisecond-timeout byte reads, escape-sequence
// key decoding, and single-write frame output.
//
// This crate intentionally avoids external TUI frameworks (ratatui,
// crossterm) in favor of direct terminal control via ANSI escape
// sequences and raw termios. The editor owns every byte on the wire.

use std::io;

use thiserror::Error;

#[allow(clippy::missing_errors_doc)] // ANSI functions all just forward io::Write errors.
pub mod ansi;
pub mod key;
pub mod output;
pub mod terminal;

/// Terminal-layer failures. Both are fatal at startup: the editor cannot
/// run without a raw-mode TTY of known size.
#[derive(Debug, Error)]
pub enum Error {
    /// Raw-mode entry failed, or the size probe could not be written.
    #[error("terminal unavailable: {0}")]
    TerminalUnavailable(#[source] io::Error),

    /// Neither the ioctl nor the cursor-report fallback produced a size.
    #[error("cannot determine window size")]
    WindowSizeUnknown,
}
