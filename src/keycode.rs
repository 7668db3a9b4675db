//! Key codes as read from the console.
//!
//! A key code is a plain integer: one byte of input, or a small
//! platform-specific extended code. The set is open, so callers compare
//! against the constants here or against raw ASCII.
//!
//! The navigation constants share their values with uppercase letters
//! (`LEFT` is also `'K'`, `UP` is also `'H'`, ...). Which meaning applies
//! depends on the platform and on what was typed; both are kept.

pub type KeyCode = i32;

/// Returned by a blocking read when the input stream is closed.
pub const END_OF_STREAM: KeyCode = -1;

// Main board keys
pub const BACKSPACE: KeyCode = 8;
pub const TAB: KeyCode = 9;
pub const ENTER: KeyCode = 13;
pub const RETURN: KeyCode = 13;
pub const ESCAPE: KeyCode = 27;
pub const SPACE: KeyCode = 32;

// Arrow keys
pub const LEFT: KeyCode = 75; // also 'K'
pub const UP: KeyCode = 72; // also 'H'
pub const DOWN: KeyCode = 80; // also 'P'
pub const RIGHT: KeyCode = 77; // also 'M'

// Utility keys
pub const INSERT: KeyCode = 82; // also 'R'
pub const DELETE: KeyCode = 83; // also 'S'
pub const HOME: KeyCode = 71; // also 'G'
pub const END: KeyCode = 79; // also 'O'
pub const PAGEUP: KeyCode = 73; // also 'I'
pub const PAGEDOWN: KeyCode = 81; // also 'Q'

// Number row
pub const DIGIT_0: KeyCode = 48;
pub const DIGIT_1: KeyCode = 49;
pub const DIGIT_2: KeyCode = 50;
pub const DIGIT_3: KeyCode = 51;
pub const DIGIT_4: KeyCode = 52;
pub const DIGIT_5: KeyCode = 53;
pub const DIGIT_6: KeyCode = 54;
pub const DIGIT_7: KeyCode = 55;
pub const DIGIT_8: KeyCode = 56;
pub const DIGIT_9: KeyCode = 57;

// Numpad digits report the same codes as the number row.
pub const NUM_0: KeyCode = DIGIT_0;
pub const NUM_1: KeyCode = DIGIT_1;
pub const NUM_2: KeyCode = DIGIT_2;
pub const NUM_3: KeyCode = DIGIT_3;
pub const NUM_4: KeyCode = DIGIT_4;
pub const NUM_5: KeyCode = DIGIT_5;
pub const NUM_6: KeyCode = DIGIT_6;
pub const NUM_7: KeyCode = DIGIT_7;
pub const NUM_8: KeyCode = DIGIT_8;
pub const NUM_9: KeyCode = DIGIT_9;

const NAMED: &[(KeyCode, &str)] = &[
    (BACKSPACE, "BACKSPACE"),
    (TAB, "TAB"),
    (ENTER, "ENTER"),
    (ESCAPE, "ESCAPE"),
    (SPACE, "SPACE"),
    (LEFT, "LEFT"),
    (UP, "UP"),
    (DOWN, "DOWN"),
    (RIGHT, "RIGHT"),
    (INSERT, "INSERT"),
    (DELETE, "DELETE"),
    (HOME, "HOME"),
    (END, "END"),
    (PAGEUP, "PAGEUP"),
    (PAGEDOWN, "PAGEDOWN"),
];

/// Every named interpretation of `code`, in table order.
///
/// This does not pick between a navigation key and the letter sharing its
/// value; `key_names(UP)` is `["UP"]` and `as_char(UP)` is `Some('H')`.
pub fn key_names(code: KeyCode) -> Vec<&'static str> {
    NAMED
        .iter()
        .filter(|(value, _)| *value == code)
        .map(|(_, name)| *name)
        .collect()
}

/// The byte value of `code` as a `char`, if it is a single byte.
pub fn as_char(code: KeyCode) -> Option<char> {
    u8::try_from(code).ok().map(char::from)
}

pub fn is_printable(code: KeyCode) -> bool {
    as_char(code).is_some_and(|ch| ch.is_ascii_graphic() || ch == ' ')
}

pub fn is_end_of_stream(code: KeyCode) -> bool {
    code == END_OF_STREAM
}

/// Render a burst of codes as text.
///
/// Bytes are decoded as UTF-8 where possible; anything that is not a
/// single byte, or is not valid UTF-8, becomes U+FFFD.
pub fn codes_to_string(codes: &[KeyCode]) -> String {
    let mut bytes = Vec::with_capacity(codes.len());
    for &code in codes {
        match u8::try_from(code) {
            Ok(byte) => bytes.push(byte),
            // 0xFF never appears in UTF-8, so it decodes to U+FFFD.
            Err(_) => bytes.push(0xFF),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
#[path = "../tests/unit/keycode.rs"]
mod tests;
