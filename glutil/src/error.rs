//! Error types for glutil
//!
//! Creation and allocation paths (framebuffers, textures, buffers) return
//! these errors. Everything else the driver rejects stays observable only
//! through `ScopedErrorCheck`.

use std::fmt;
use crate::device::FramebufferStatus;

/// Result type for glutil operations
pub type Result<T> = std::result::Result<T, Error>;

/// glutil errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Backend-specific error (glow, mock, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// The device refused to hand out another object name
    ResourceExhausted(String),

    /// Invalid resource (zero-sized target, oversized upload, etc.)
    InvalidResource(String),

    /// Framebuffer attachments did not form a complete framebuffer
    IncompleteFramebuffer(FramebufferStatus),

    /// Device initialization failed (unsupported context version, etc.)
    InitializationFailed(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::ResourceExhausted(what) => write!(f, "Device resource exhausted: {}", what),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::IncompleteFramebuffer(status) => write!(f, "Incomplete framebuffer: {}", status),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Log an error through the crate logger and hand it back
///
/// Used on every `Err` path so failures show up in the log even when the
/// caller discards the result.
pub fn log_error(source: &str, error: Error) -> Error {
    crate::log::log(crate::log::LogSeverity::Error, source, error.to_string());
    error
}

/// Log an ERROR message with file:line information and return
/// `Err(Error::BackendError(..))` from the enclosing function
///
/// # Example
///
/// ```ignore
/// glutil_bail!("glutil::glow", "Texture width {} does not fit in a GLsizei", width);
/// ```
#[macro_export]
macro_rules! glutil_bail {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::glutil_error!($source, "{}", message);
        return Err($crate::error::Error::BackendError(message));
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
