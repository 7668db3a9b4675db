//! Native console polling through the C runtime's `_kbhit` / `_getch`.
//!
//! Both primitives bypass line editing and echo for the duration of the
//! call, so no attribute swapping is needed here.

use crate::keycode::{KeyCode, END_OF_STREAM};
use crate::poller::{Poller, PollerConfig};

extern "C" {
    fn _kbhit() -> libc::c_int;
    fn _getch() -> libc::c_int;
}

/// The settle delay and `VMIN`/`VTIME` in the config only apply to termios
/// terminals; they are carried here so callers can build either poller from
/// the same config.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolePoller {
    config: PollerConfig,
}

impl ConsolePoller {
    pub fn new(config: PollerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }
}

impl Poller for ConsolePoller {
    /// The console reports whether a key is waiting, not how many bytes.
    /// A waiting key counts as 1; callers re-poll after reading it.
    fn key_hit(&mut self) -> usize {
        // SAFETY: _kbhit takes no arguments and only inspects the console input queue.
        let hit = unsafe { _kbhit() };
        usize::from(hit != 0)
    }

    fn read_key(&mut self) -> KeyCode {
        // SAFETY: _getch takes no arguments and blocks until a key is available.
        let code = unsafe { _getch() };
        if code < 0 {
            tracing::debug!(code, "console read returned end of stream");
            return END_OF_STREAM;
        }
        code
    }
}
