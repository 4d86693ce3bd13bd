// error.rs - Error types
//
// Nothing here is fatal to the animation. Config errors surface to the host at
// construction; gesture failures are turned into a one-way fallback.

use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("gesture input unavailable: {0}")]
    GestureUnavailable(GestureFailure),

    #[error("hand frame has {0} floats, expected 42 or 63")]
    BadLandmarks(usize),
}

impl Error {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidConfig { field, reason: reason.into() }
    }
}

/// Why the camera-backed gesture source could not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureFailure {
    PermissionDenied,
    NoHardware,
    Unsupported,
}

impl GestureFailure {
    /// Map a host-side reason string (DOMException name or free text).
    pub fn from_reason(reason: &str) -> Self {
        match reason {
            "NotAllowedError" | "PermissionDeniedError" | "SecurityError" => Self::PermissionDenied,
            "NotFoundError" | "DevicesNotFoundError" | "NotReadableError" | "OverconstrainedError" => {
                Self::NoHardware
            }
            _ => Self::Unsupported,
        }
    }
}

impl fmt::Display for GestureFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::PermissionDenied => "camera permission denied",
            Self::NoHardware => "no usable camera",
            Self::Unsupported => "camera not supported in this context",
        };
        f.write_str(s)
    }
}
