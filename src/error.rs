//! Error types
//!
//! Only construction can fail. Runtime platform failures degrade to safe
//! defaults and never surface here.

use thiserror::Error;

/// A window chrome configuration that cannot be honored
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid backdrop mode {0:?}: expected \"off\", \"on\" or \"auto\"")]
    InvalidBackdrop(String),

    #[error("invalid theme {0:?}: expected \"auto\", \"dark\" or \"light\"")]
    InvalidTheme(String),

    #[error("invalid color {0:?}: must be exactly 8 hex digits (RRGGBBAA)")]
    InvalidColorLength(String),

    #[error("invalid color {0:?}: contains a non-hex digit")]
    InvalidColorDigit(String),

    #[error("mica backdrop requires OS build {threshold} or newer, running build {build}")]
    MicaUnsupported { build: u32, threshold: u32 },

    #[error("invalid border width {0}: must be at least 1")]
    InvalidBorderWidth(i32),

    #[error("invalid effect cooldown {0} ms: must be at least 1")]
    InvalidCooldown(u64),
}
