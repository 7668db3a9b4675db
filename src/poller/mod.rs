//! Non-blocking keystroke polling over standard input.
//!
//! The `Poller` trait is the whole contract: `key_hit` reports how many
//! bytes are waiting without consuming them, `read_key` consumes one.
//! Two native implementations exist and one is picked at build time:
//!
//! - unix: `termios::RawTermPoller`, which swaps the terminal into raw mode
//!   around every call and restores it before returning.
//! - windows: `console::ConsolePoller`, which uses the C runtime's console
//!   primitives directly.
//!
//! Neither implementation locks. The terminal configuration is process-wide,
//! so calls against the same device must not overlap.

use std::time::Duration;

use crate::keycode::KeyCode;

#[cfg(windows)]
pub mod console;
pub mod scripted;
#[cfg(unix)]
pub mod termios;

/// Delay spent inside the raw-mode window after counting bytes.
pub const DEFAULT_SETTLE: Duration = Duration::from_micros(100);

pub trait Poller {
    /// Number of bytes ready on the input stream. Never waits for a key.
    ///
    /// Faults in the underlying query read as 0.
    fn key_hit(&mut self) -> usize;

    /// Consume one pending byte, blocking until one arrives.
    ///
    /// Returns `keycode::END_OF_STREAM` when the stream is closed.
    fn read_key(&mut self) -> KeyCode;
}

impl<P: Poller + ?Sized> Poller for &mut P {
    fn key_hit(&mut self) -> usize {
        (**self).key_hit()
    }

    fn read_key(&mut self) -> KeyCode {
        (**self).read_key()
    }
}

impl<P: Poller + ?Sized> Poller for Box<P> {
    fn key_hit(&mut self) -> usize {
        (**self).key_hit()
    }

    fn read_key(&mut self) -> KeyCode {
        (**self).read_key()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    pub settle: Duration,
    /// `VMIN` while probing.
    pub min_chars: u8,
    /// `VTIME` while probing, in deciseconds.
    pub min_time: u8,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            settle: DEFAULT_SETTLE,
            min_chars: 1,
            min_time: 1,
        }
    }
}

#[cfg(unix)]
pub type StdinPoller = termios::RawTermPoller<termios::FdTermios>;

#[cfg(windows)]
pub type StdinPoller = console::ConsolePoller;

/// The native poller for this process's standard input.
#[cfg(unix)]
pub fn stdin_poller(config: PollerConfig) -> StdinPoller {
    termios::RawTermPoller::new(termios::FdTermios::stdin(), config)
}

/// The native poller for this process's standard input.
#[cfg(windows)]
pub fn stdin_poller(config: PollerConfig) -> StdinPoller {
    console::ConsolePoller::new(config)
}

/// `key_hit` against standard input with the default configuration.
pub fn key_hit() -> usize {
    stdin_poller(PollerConfig::default()).key_hit()
}

/// `read_key` against standard input with the default configuration.
pub fn read_key() -> KeyCode {
    stdin_poller(PollerConfig::default()).read_key()
}
