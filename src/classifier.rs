//! Burst classification on top of a `Poller`.
//!
//! Each tick drains every byte currently available into a pending buffer.
//! The first tick that finds nothing new flushes the buffer: one code is a
//! keystroke, two or more are text (a paste, a dragged-in path, an escape
//! sequence). There is no timeout; silence is simply the next empty poll,
//! so a keystroke is reported one tick after it arrives.

use serde::Serialize;

use crate::keycode::{self, KeyCode, END_OF_STREAM};
use crate::poller::Poller;

pub const DEFAULT_CAPACITY: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// Codes kept per burst. Later codes are read and dropped.
    pub capacity: usize,
    /// Treat a trailing NUL as "nothing pending", the way callers that use
    /// 0 as their no-input marker expect. A burst ending in NUL then rolls
    /// over into the next one instead of flushing.
    pub nul_is_no_input: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            nul_is_no_input: false,
        }
    }
}

impl ClassifierConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushKind {
    Keystroke,
    Text,
}

/// A completed burst.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Flush {
    Keystroke { code: KeyCode },
    Text { codes: Vec<KeyCode> },
}

impl Flush {
    pub fn kind(&self) -> FlushKind {
        match self {
            Flush::Keystroke { .. } => FlushKind::Keystroke,
            Flush::Text { .. } => FlushKind::Text,
        }
    }

    pub fn codes(&self) -> &[KeyCode] {
        match self {
            Flush::Keystroke { code } => std::slice::from_ref(code),
            Flush::Text { codes } => codes.as_slice(),
        }
    }

    pub fn to_text(&self) -> String {
        keycode::codes_to_string(self.codes())
    }

    pub fn dispatch<H: InputHandler + ?Sized>(&self, handler: &mut H) {
        match self {
            Flush::Keystroke { code } => handler.on_keystroke(*code),
            Flush::Text { codes } => handler.on_text(codes),
        }
    }
}

/// Outcome of one `InputClassifier::step`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Nothing arrived and nothing was owed.
    Idle,
    /// Codes were read and buffered; the burst may still be growing.
    Accumulated { read: usize },
    Flushed(Flush),
}

/// Receives flushed bursts.
pub trait InputHandler {
    fn on_keystroke(&mut self, code: KeyCode);

    fn on_text(&mut self, codes: &[KeyCode]);
}

impl<H: InputHandler + ?Sized> InputHandler for &mut H {
    fn on_keystroke(&mut self, code: KeyCode) {
        (**self).on_keystroke(code);
    }

    fn on_text(&mut self, codes: &[KeyCode]) {
        (**self).on_text(codes);
    }
}

impl<H: InputHandler + ?Sized> InputHandler for Box<H> {
    fn on_keystroke(&mut self, code: KeyCode) {
        (**self).on_keystroke(code);
    }

    fn on_text(&mut self, codes: &[KeyCode]) {
        (**self).on_text(codes);
    }
}

/// A pair of free-standing callbacks.
pub struct Callbacks<K, T> {
    pub on_keystroke: K,
    pub on_text: T,
}

impl<K, T> Callbacks<K, T>
where
    K: FnMut(KeyCode),
    T: FnMut(&[KeyCode]),
{
    pub fn new(on_keystroke: K, on_text: T) -> Self {
        Self {
            on_keystroke,
            on_text,
        }
    }
}

impl<K, T> InputHandler for Callbacks<K, T>
where
    K: FnMut(KeyCode),
    T: FnMut(&[KeyCode]),
{
    fn on_keystroke(&mut self, code: KeyCode) {
        (self.on_keystroke)(code);
    }

    fn on_text(&mut self, codes: &[KeyCode]) {
        (self.on_text)(codes);
    }
}

/// Methods of `R` dispatched against one receiver.
pub struct Bound<'a, R> {
    receiver: &'a mut R,
    on_keystroke: fn(&mut R, KeyCode),
    on_text: fn(&mut R, &[KeyCode]),
}

impl<'a, R> Bound<'a, R> {
    pub fn new(
        receiver: &'a mut R,
        on_keystroke: fn(&mut R, KeyCode),
        on_text: fn(&mut R, &[KeyCode]),
    ) -> Self {
        Self {
            receiver,
            on_keystroke,
            on_text,
        }
    }
}

impl<R> InputHandler for Bound<'_, R> {
    fn on_keystroke(&mut self, code: KeyCode) {
        (self.on_keystroke)(&mut *self.receiver, code);
    }

    fn on_text(&mut self, codes: &[KeyCode]) {
        (self.on_text)(&mut *self.receiver, codes);
    }
}

/// Accumulates polled codes and flushes them as keystrokes or text.
///
/// Each classifier has its own buffer, but all classifiers built on the
/// native pollers share one terminal. Ticks against the same device must
/// not run concurrently.
#[derive(Debug)]
pub struct InputClassifier<P> {
    poller: P,
    pending: Vec<KeyCode>,
    last: Option<KeyCode>,
    config: ClassifierConfig,
}

impl<P: Poller> InputClassifier<P> {
    pub fn new(poller: P) -> Self {
        Self::with_config(poller, ClassifierConfig::default())
    }

    pub fn with_config(poller: P, config: ClassifierConfig) -> Self {
        let config = ClassifierConfig {
            capacity: config.capacity.max(1),
            ..config
        };
        Self {
            poller,
            pending: Vec::new(),
            last: None,
            config,
        }
    }

    /// Run one tick with a pair of callbacks.
    pub fn pump<K, T>(&mut self, on_keystroke: K, on_text: T) -> Option<FlushKind>
    where
        K: FnMut(KeyCode),
        T: FnMut(&[KeyCode]),
    {
        self.pump_handler(&mut Callbacks::new(on_keystroke, on_text))
    }

    /// Run one tick, dispatching to methods of `receiver`.
    pub fn pump_bound<R>(
        &mut self,
        receiver: &mut R,
        on_keystroke: fn(&mut R, KeyCode),
        on_text: fn(&mut R, &[KeyCode]),
    ) -> Option<FlushKind> {
        self.pump_handler(&mut Bound::new(receiver, on_keystroke, on_text))
    }

    /// Run one tick, dispatching to `handler`. Returns what was flushed.
    pub fn pump_handler<H: InputHandler + ?Sized>(&mut self, handler: &mut H) -> Option<FlushKind> {
        match self.step() {
            Step::Flushed(flush) => {
                flush.dispatch(handler);
                Some(flush.kind())
            }
            Step::Idle | Step::Accumulated { .. } => None,
        }
    }

    /// Run one tick and hand back the result instead of dispatching it.
    pub fn step(&mut self) -> Step {
        let mut count = self.poller.key_hit();
        if count == 0 {
            return self.flush_step();
        }

        let mut read = 0;
        let mut ended = false;
        // Keep draining until a poll comes back empty, so a burst that lands
        // in pieces still ends up in one flush.
        'drain: while count > 0 {
            for _ in 0..count {
                let code = self.poller.read_key();
                if code == END_OF_STREAM {
                    ended = true;
                    break 'drain;
                }
                self.record(code);
                read += 1;
            }
            count = self.poller.key_hit();
        }

        if ended {
            tracing::debug!(read, "input stream ended mid-burst");
            if read == 0 {
                return self.flush_step();
            }
        }

        tracing::trace!(read, pending = self.pending.len(), "accumulated input");
        Step::Accumulated { read }
    }

    fn flush_step(&mut self) -> Step {
        match self.take_flush() {
            Some(flush) => Step::Flushed(flush),
            None => Step::Idle,
        }
    }

    fn record(&mut self, code: KeyCode) {
        if self.pending.len() < self.config.capacity {
            self.pending.push(code);
        }
        self.last = Some(code);
    }

    fn take_flush(&mut self) -> Option<Flush> {
        if !self.is_flush_owed() {
            return None;
        }

        let codes = std::mem::take(&mut self.pending);
        self.last = None;

        let flush = match codes.as_slice() {
            [] => return None,
            [code] => Flush::Keystroke { code: *code },
            _ => Flush::Text { codes },
        };
        tracing::debug!(kind = ?flush.kind(), len = flush.codes().len(), "flushed input");
        Some(flush)
    }

    /// Whether the next empty poll will flush.
    pub fn is_flush_owed(&self) -> bool {
        match self.last {
            Some(0) if self.config.nul_is_no_input => false,
            Some(_) => true,
            None => false,
        }
    }

    /// Codes buffered since the last flush.
    pub fn pending(&self) -> &[KeyCode] {
        &self.pending
    }

    /// Drop buffered codes without dispatching them.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.last = None;
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn poller(&self) -> &P {
        &self.poller
    }

    pub fn poller_mut(&mut self) -> &mut P {
        &mut self.poller
    }

    pub fn into_poller(self) -> P {
        self.poller
    }
}

#[cfg(test)]
#[path = "../tests/unit/classifier.rs"]
mod tests;
