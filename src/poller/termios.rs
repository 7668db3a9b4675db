//! Raw byte-stream polling over a termios terminal.
//!
//! There is no non-blocking peek on a canonical-mode terminal, so every
//! `key_hit` and `read_key` saves the line discipline, switches to a raw
//! profile, does its one measurement, and restores the saved attributes.
//! The restore lives in `RawModeGuard::drop`, so it runs on every exit path.
//!
//! The swap is not atomic with respect to other users of the same device.

use std::io;
use std::os::unix::io::RawFd;
use std::time::Duration;

use crate::keycode::{KeyCode, END_OF_STREAM};
use crate::poller::{Poller, PollerConfig};

/// OS operations the raw-mode poller needs. `FdTermios` is the real one;
/// tests substitute an in-memory terminal.
pub trait TermiosOps {
    fn get_attr(&mut self) -> io::Result<libc::termios>;

    fn set_attr(&mut self, attrs: &libc::termios) -> io::Result<()>;

    fn bytes_available(&mut self) -> io::Result<usize>;

    /// Blocking one-byte read. `Ok(None)` means end of stream.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    fn settle(&mut self, delay: Duration);
}

/// Termios calls against a file descriptor the caller keeps open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FdTermios {
    fd: RawFd,
}

impl FdTermios {
    pub fn stdin() -> Self {
        Self {
            fd: libc::STDIN_FILENO,
        }
    }

    /// Use `fd` as the input terminal. The fd is not closed on drop.
    pub fn with_fd(fd: RawFd) -> Self {
        Self { fd }
    }

    pub fn fd(&self) -> RawFd {
        self.fd
    }
}

impl TermiosOps for FdTermios {
    fn get_attr(&mut self) -> io::Result<libc::termios> {
        // SAFETY: termios is plain data; tcgetattr fully initializes it on success.
        let mut attrs: libc::termios = unsafe { std::mem::zeroed() };
        // SAFETY: attrs is a valid, writable termios.
        if unsafe { libc::tcgetattr(self.fd, &mut attrs) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(attrs)
    }

    fn set_attr(&mut self, attrs: &libc::termios) -> io::Result<()> {
        // SAFETY: attrs points to a valid termios for the duration of the call.
        if unsafe { libc::tcsetattr(self.fd, libc::TCSANOW, attrs) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn bytes_available(&mut self) -> io::Result<usize> {
        let mut count: libc::c_int = 0;
        // SAFETY: FIONREAD writes a single c_int through the pointer.
        if unsafe { libc::ioctl(self.fd, libc::FIONREAD as _, &mut count as *mut libc::c_int) } < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        loop {
            // SAFETY: byte is a valid 1-byte buffer.
            let n = unsafe { libc::read(self.fd, (&mut byte as *mut u8).cast(), 1) };
            match n {
                1 => return Ok(Some(byte)),
                0 => return Ok(None),
                _ => {
                    let err = io::Error::last_os_error();
                    if err.kind() == io::ErrorKind::Interrupted {
                        continue;
                    }
                    return Err(err);
                }
            }
        }
    }

    fn settle(&mut self, delay: Duration) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

/// Line discipline applied for the duration of one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawMode {
    /// Used by `key_hit`: input and output processing off, no canonical
    /// mode, no echo, `VMIN`/`VTIME` set.
    Probe { min_chars: u8, min_time: u8 },
    /// Used by `read_key`: no canonical mode, no echo. Everything else is
    /// left as the caller had it.
    Read,
}

impl RawMode {
    pub fn probe(config: &PollerConfig) -> Self {
        RawMode::Probe {
            min_chars: config.min_chars,
            min_time: config.min_time,
        }
    }

    pub fn apply(self, base: &libc::termios) -> libc::termios {
        let mut raw = *base;
        raw.c_lflag &= !(libc::ICANON | libc::ECHO);
        if let RawMode::Probe {
            min_chars,
            min_time,
        } = self
        {
            raw.c_iflag = 0;
            raw.c_oflag = 0;
            raw.c_cc[libc::VMIN] = min_chars as libc::cc_t;
            raw.c_cc[libc::VTIME] = min_time as libc::cc_t;
        }
        raw
    }
}

/// Holds a terminal in a `RawMode` and puts the saved attributes back on drop.
///
/// If the attributes cannot be read (stdin is a pipe or a file) the guard
/// does nothing and the caller measures the stream as it is.
pub struct RawModeGuard<'a, T: TermiosOps> {
    ops: &'a mut T,
    saved: Option<libc::termios>,
}

impl<'a, T: TermiosOps> RawModeGuard<'a, T> {
    pub fn acquire(ops: &'a mut T, mode: RawMode) -> Self {
        let saved = match ops.get_attr() {
            Ok(attrs) => attrs,
            Err(err) => {
                tracing::debug!(error = %err, "terminal attributes unavailable; skipping raw mode");
                return Self { ops, saved: None };
            }
        };

        if let Err(err) = ops.set_attr(&mode.apply(&saved)) {
            tracing::debug!(error = %err, ?mode, "failed to enter raw mode");
        }

        Self {
            ops,
            saved: Some(saved),
        }
    }

    pub fn is_raw(&self) -> bool {
        self.saved.is_some()
    }

    pub fn ops(&mut self) -> &mut T {
        self.ops
    }
}

impl<T: TermiosOps> Drop for RawModeGuard<'_, T> {
    fn drop(&mut self) {
        let Some(saved) = self.saved.take() else {
            return;
        };
        if let Err(err) = self.ops.set_attr(&saved) {
            tracing::warn!(error = %err, "failed to restore terminal attributes");
        }
    }
}

/// `Poller` for a termios terminal. Holds no terminal state between calls.
#[derive(Debug, Clone)]
pub struct RawTermPoller<T> {
    ops: T,
    config: PollerConfig,
}

impl<T: TermiosOps> RawTermPoller<T> {
    pub fn new(ops: T, config: PollerConfig) -> Self {
        Self { ops, config }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    pub fn ops(&self) -> &T {
        &self.ops
    }

    pub fn ops_mut(&mut self) -> &mut T {
        &mut self.ops
    }

    pub fn into_ops(self) -> T {
        self.ops
    }
}

impl<T: TermiosOps> Poller for RawTermPoller<T> {
    fn key_hit(&mut self) -> usize {
        let mode = RawMode::probe(&self.config);
        let settle = self.config.settle;

        let mut guard = RawModeGuard::acquire(&mut self.ops, mode);
        let count = match guard.ops().bytes_available() {
            Ok(count) => count,
            Err(err) => {
                tracing::debug!(error = %err, "byte count query failed");
                0
            }
        };
        guard.ops().settle(settle);
        count
    }

    fn read_key(&mut self) -> KeyCode {
        let mut guard = RawModeGuard::acquire(&mut self.ops, RawMode::Read);
        match guard.ops().read_byte() {
            Ok(Some(byte)) => KeyCode::from(byte),
            Ok(None) => END_OF_STREAM,
            Err(err) => {
                tracing::debug!(error = %err, "read failed; reporting end of stream");
                END_OF_STREAM
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/poller/termios.rs"]
mod tests;
