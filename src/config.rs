//! Environment overrides for poller and classifier settings.
//!
//! Nothing is read from or written to disk. Each setting has an in-code
//! default; a `KEYHIT_*` variable replaces it for the current process.

use std::fmt;
use std::time::Duration;

use crate::classifier::ClassifierConfig;
use crate::poller::PollerConfig;

pub const SETTLE_MICROS_VAR: &str = "KEYHIT_SETTLE_MICROS";
pub const MIN_CHARS_VAR: &str = "KEYHIT_MIN_CHARS";
pub const MIN_TIME_VAR: &str = "KEYHIT_MIN_TIME";
pub const BUFFER_CAPACITY_VAR: &str = "KEYHIT_BUFFER_CAPACITY";
pub const NUL_IS_NO_INPUT_VAR: &str = "KEYHIT_NUL_IS_NO_INPUT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { var: &'static str, value: String },
    ZeroCapacity,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { var, value } => write!(f, "invalid value for {var}: {value:?}"),
            ConfigError::ZeroCapacity => write!(f, "{BUFFER_CAPACITY_VAR} must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
        var,
        value: value.to_string(),
    })
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
        }),
    }
}

fn parse_capacity(value: &str) -> Result<usize, ConfigError> {
    match parse_number::<usize>(BUFFER_CAPACITY_VAR, value)? {
        0 => Err(ConfigError::ZeroCapacity),
        n => Ok(n),
    }
}

/// Apply `parse` to the variable if it is set. On error the default stays
/// and the problem is logged.
fn lenient<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    parse: impl Fn(&str) -> Result<T, ConfigError>,
    slot: &mut T,
) {
    let Some(raw) = lookup(var) else {
        return;
    };
    match parse(&raw) {
        Ok(value) => *slot = value,
        Err(err) => tracing::warn!(%err, "ignoring override"),
    }
}

fn env_lookup(var: &str) -> Option<String> {
    std::env::var(var).ok()
}

impl PollerConfig {
    /// Defaults with any `KEYHIT_*` overrides applied. Bad values are
    /// logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let mut settle_micros = config.settle.as_micros() as u64;
        lenient(&lookup, SETTLE_MICROS_VAR, |v| parse_number(SETTLE_MICROS_VAR, v), &mut settle_micros);
        lenient(&lookup, MIN_CHARS_VAR, |v| parse_number(MIN_CHARS_VAR, v), &mut config.min_chars);
        lenient(&lookup, MIN_TIME_VAR, |v| parse_number(MIN_TIME_VAR, v), &mut config.min_time);
        config.settle = Duration::from_micros(settle_micros);
        config
    }

    /// Like `from_lookup`, but the first bad value is an error.
    pub fn try_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = lookup(SETTLE_MICROS_VAR) {
            config.settle = Duration::from_micros(parse_number(SETTLE_MICROS_VAR, &raw)?);
        }
        if let Some(raw) = lookup(MIN_CHARS_VAR) {
            config.min_chars = parse_number(MIN_CHARS_VAR, &raw)?;
        }
        if let Some(raw) = lookup(MIN_TIME_VAR) {
            config.min_time = parse_number(MIN_TIME_VAR, &raw)?;
        }
        Ok(config)
    }
}

impl ClassifierConfig {
    /// Defaults with any `KEYHIT_*` overrides applied. Bad values are
    /// logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        lenient(&lookup, BUFFER_CAPACITY_VAR, parse_capacity, &mut config.capacity);
        lenient(
            &lookup,
            NUL_IS_NO_INPUT_VAR,
            |v| parse_flag(NUL_IS_NO_INPUT_VAR, v),
            &mut config.nul_is_no_input,
        );
        config
    }

    /// Like `from_lookup`, but the first bad value is an error.
    pub fn try_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = lookup(BUFFER_CAPACITY_VAR) {
            config.capacity = parse_capacity(&raw)?;
        }
        if let Some(raw) = lookup(NUL_IS_NO_INPUT_VAR) {
            config.nul_is_no_input = parse_flag(NUL_IS_NO_INPUT_VAR, &raw)?;
        }
        Ok(config)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
