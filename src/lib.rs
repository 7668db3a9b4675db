//! keyhit - non-blocking console keystroke polling
//!
//! Modules:
//! - keycode: key code integers and the named key table
//! - poller: `key_hit` / `read_key` over the native terminal (termios or console)
//! - classifier: groups polled bursts into keystrokes and text
//! - config: environment overrides for poller and classifier settings

pub mod classifier;
pub mod config;
pub mod keycode;
pub mod poller;

pub use classifier::{Flush, FlushKind, InputClassifier, InputHandler, Step};
pub use keycode::KeyCode;
pub use poller::{key_hit, read_key, stdin_poller, Poller, PollerConfig};
