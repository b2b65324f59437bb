// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, window size, and RAII cleanup.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, and raw fd reads/writes. These
// are the standard POSIX interfaces for terminal control — there is no
// safe alternative. Each unsafe block is minimal.
//
// This module owns the terminal's raw state. `enter_raw` snapshots the
// current termios, disables every line-discipline feature the editor must
// own itself (echo, canonical buffering, signal keys, flow control, output
// post-processing), and arms a 1-decisecond read timeout so the main loop
// can idle cheaply. The snapshot is restored when the handle is dropped —
// and, via a panic hook, even if the editor panics mid-frame.
//
// The panic hook bypasses Rust's stdout lock entirely, writing a pre-built
// restore sequence directly to fd 1. This prevents deadlock if the panic
// happened while holding the stdout lock (common during frame rendering).
// One raw write, termios restored, then the original panic handler prints
// its message to a working terminal.
#![allow(unsafe_code)]

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::key::ByteSource;
use crate::Error;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of rows (height in character cells).
    pub rows: u16,
    /// Number of columns (width in character cells).
    pub cols: u16,
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

/// Query the terminal size via `ioctl(TIOCGWINSZ)` on stdout.
///
/// Returns `None` if the query fails or reports zero columns — the caller
/// falls back to the cursor-position-report probe.
#[cfg(unix)]
fn query_winsize() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            rows: ws.ws_row,
            cols: ws.ws_col,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
fn query_winsize() -> Option<Size> {
    None
}

/// Parse a cursor position report: `ESC [ <rows> ; <cols>` (the terminating
/// `R` already stripped by the reader).
fn parse_cursor_report(reply: &[u8]) -> Option<Size> {
    let body = reply.strip_prefix(b"\x1b[")?;
    let sep = body.iter().position(|&b| b == b';')?;
    let rows = parse_u16(&body[..sep])?;
    let cols = parse_u16(&body[sep + 1..])?;
    Some(Size { rows, cols })
}

fn parse_u16(digits: &[u8]) -> Option<u16> {
    if digits.is_empty() {
        return None;
    }
    let mut value: u16 = 0;
    for &d in digits {
        if !d.is_ascii_digit() {
            return None;
        }
        value = value.checked_mul(10)?.checked_add(u16::from(d - b'0'))?;
    }
    Some(value)
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of the original termios for panic recovery.
///
/// The [`Terminal`] struct owns its own copy, but the panic hook can't
/// access it. This global backup — behind a [`Mutex`], not `static mut` —
/// lets the hook restore the line discipline without the struct.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original);
            }
        }
    }
}

/// Screen restore sequence for emergency use: clear, home, show cursor.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[2J\x1b[H\x1b[?25h";

/// Panic hook guard — the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
///
/// Without this, a panic in raw mode leaves the user's terminal broken:
/// no echo, no line editing, no way to read the error message. The hook
/// writes [`EMERGENCY_RESTORE`] directly to fd 1 (bypassing Rust's stdout
/// lock to avoid deadlock), restores termios, then delegates to the
/// original panic handler so the error prints to a working terminal.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Write the screen restore sequence directly to stdout's file descriptor.
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Terminal handle with RAII cleanup.
///
/// Call [`enter_raw`](Self::enter_raw) before the first frame. The original
/// line discipline is restored when the handle is dropped — even on panic,
/// via the installed hook. Restore is idempotent: the snapshot is taken
/// out of the handle on the first restore and later calls are no-ops.
#[derive(Default)]
pub struct Terminal {
    /// Original termios saved before entering raw mode.
    #[cfg(unix)]
    original_termios: Option<libc::termios>,
}

impl Terminal {
    /// Create a terminal handle. Does **not** touch the line discipline —
    /// call [`enter_raw`](Self::enter_raw) for that.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter raw mode.
    ///
    /// Snapshots the current termios, then disables echo, canonical mode,
    /// signal generation (Ctrl-C/Z), literal-next, software flow control
    /// (Ctrl-S/Q), CR→NL translation, BREAK interrupts, parity checking,
    /// input-bit stripping, and output post-processing; sets 8-bit
    /// characters; and arms the `VMIN=0`/`VTIME=1` read timeout so
    /// [`read_byte`](Self::read_byte) returns at least every decisecond.
    ///
    /// # Errors
    ///
    /// [`Error::TerminalUnavailable`] if the terminal attributes cannot be
    /// read or applied (stdin is not a TTY, for instance).
    #[cfg(unix)]
    pub fn enter_raw(&mut self) -> Result<(), Error> {
        if self.original_termios.is_some() {
            return Ok(());
        }

        install_panic_hook();

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(libc::STDIN_FILENO, &mut termios) != 0 {
                return Err(Error::TerminalUnavailable(io::Error::last_os_error()));
            }

            // Save the snapshot, both here and in the panic hook's backup.
            self.original_termios = Some(termios);
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(termios);
            }

            termios.c_iflag &=
                !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
            termios.c_oflag &= !libc::OPOST;
            termios.c_cflag |= libc::CS8;
            termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);

            // VMIN=0, VTIME=1: read() returns after one byte or one
            // decisecond, whichever comes first.
            termios.c_cc[libc::VMIN] = 0;
            termios.c_cc[libc::VTIME] = 1;

            if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &termios) != 0 {
                self.original_termios = None;
                return Err(Error::TerminalUnavailable(io::Error::last_os_error()));
            }
        }

        Ok(())
    }

    #[cfg(not(unix))]
    pub fn enter_raw(&mut self) -> Result<(), Error> {
        Err(Error::TerminalUnavailable(io::Error::new(
            io::ErrorKind::Unsupported,
            "raw mode requires a unix terminal",
        )))
    }

    /// Restore the saved line discipline. Idempotent; also runs on `Drop`.
    #[cfg(unix)]
    pub fn leave_raw(&mut self) {
        if let Some(original) = self.original_termios.take() {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &original);
            }
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }
        }
    }

    #[cfg(not(unix))]
    pub fn leave_raw(&mut self) {}

    /// The terminal size.
    ///
    /// Primary path is `ioctl(TIOCGWINSZ)`. If that fails, the cursor is
    /// pushed to the bottom-right corner and a cursor position report is
    /// requested and parsed. Requires raw mode for the fallback (the reply
    /// arrives unechoed on stdin).
    ///
    /// # Errors
    ///
    /// [`Error::WindowSizeUnknown`] if both paths fail;
    /// [`Error::TerminalUnavailable`] if the probe cannot be written.
    pub fn window_size(&mut self) -> Result<Size, Error> {
        if let Some(size) = query_winsize() {
            return Ok(size);
        }
        self.cursor_report_size()
    }

    /// Fallback size probe: `ESC[999C ESC[999B` then `ESC[6n`, parsing the
    /// `ESC[<rows>;<cols>R` reply from stdin.
    fn cursor_report_size(&mut self) -> Result<Size, Error> {
        if !is_tty() {
            return Err(Error::WindowSizeUnknown);
        }

        self.write_all(b"\x1b[999C\x1b[999B\x1b[6n")
            .map_err(Error::TerminalUnavailable)?;

        let mut reply: Vec<u8> = Vec::with_capacity(16);
        let mut timeouts = 0;
        while reply.len() < 32 {
            match self.read_byte().map_err(Error::TerminalUnavailable)? {
                Some(b'R') => return parse_cursor_report(&reply).ok_or(Error::WindowSizeUnknown),
                Some(b) => reply.push(b),
                None => {
                    // A real terminal answers within a few deciseconds.
                    timeouts += 1;
                    if timeouts >= 5 {
                        break;
                    }
                }
            }
        }
        Err(Error::WindowSizeUnknown)
    }

    /// Read one byte from stdin, or `None` if the decisecond timer expired.
    ///
    /// Interrupted reads are retried.
    ///
    /// # Errors
    ///
    /// Returns any other error from the underlying `read`.
    #[cfg(unix)]
    pub fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut b: u8 = 0;
        loop {
            let n = unsafe { libc::read(libc::STDIN_FILENO, (&mut b as *mut u8).cast(), 1) };
            return match n {
                1 => Ok(Some(b)),
                0 => Ok(None),
                _ => {
                    let err = io::Error::last_os_error();
                    if err.kind() == io::ErrorKind::Interrupted {
                        continue;
                    }
                    Err(err)
                }
            };
        }
    }

    #[cfg(not(unix))]
    pub fn read_byte(&mut self) -> io::Result<Option<u8>> {
        use std::io::Read;
        let mut b = [0u8; 1];
        match io::stdin().read(&mut b)? {
            0 => Ok(None),
            _ => Ok(Some(b[0])),
        }
    }

    /// Write the full byte sequence to stdout in one call and flush.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        lock.write_all(bytes)?;
        lock.flush()
    }
}

impl ByteSource for Terminal {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        Terminal::read_byte(self)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        self.leave_raw();
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
