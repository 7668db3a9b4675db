//! Deterministic in-memory poller for tests and headless callers.

use std::collections::VecDeque;

use crate::keycode::{KeyCode, END_OF_STREAM};
use crate::poller::Poller;

/// A poller fed from a script instead of a terminal.
///
/// Codes added with `type_bytes`/`type_codes` are available at once.
/// Chunks added with `schedule` arrive one per `key_hit` call, before the
/// count is taken, which models bytes landing while a caller is still
/// draining. An empty chunk is a poll where nothing new arrives.
///
/// `read_key` on an empty queue cannot block, so it returns
/// `END_OF_STREAM` whether or not the script was closed.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPoller {
    available: VecDeque<KeyCode>,
    arrivals: VecDeque<Vec<KeyCode>>,
    closed: bool,
    hits: usize,
    reads: usize,
}

impl ScriptedPoller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn type_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.available.extend(bytes.iter().map(|&b| KeyCode::from(b)));
        self
    }

    pub fn type_codes(&mut self, codes: &[KeyCode]) -> &mut Self {
        self.available.extend(codes.iter().copied());
        self
    }

    pub fn schedule(&mut self, chunk: &[u8]) -> &mut Self {
        self.arrivals
            .push_back(chunk.iter().map(|&b| KeyCode::from(b)).collect());
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.closed = true;
        self
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn available(&self) -> usize {
        self.available.len()
    }

    pub fn scheduled(&self) -> usize {
        self.arrivals.len()
    }

    /// Number of `key_hit` calls so far.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Number of `read_key` calls so far.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl Poller for ScriptedPoller {
    fn key_hit(&mut self) -> usize {
        self.hits += 1;
        if let Some(chunk) = self.arrivals.pop_front() {
            self.available.extend(chunk);
        }
        self.available.len()
    }

    fn read_key(&mut self) -> KeyCode {
        self.reads += 1;
        self.available.pop_front().unwrap_or(END_OF_STREAM)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/poller/scripted.rs"]
mod tests;
