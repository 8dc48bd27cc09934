//! Error handling for user32 calls.
//!
//! Most user32 entry points only report success as a zero/non-zero return and
//! are surfaced as `bool`. Lookups and calls whose failure detail matters
//! return [`Result`] with one of the variants below.

use thiserror::Error;

/// The main error type for this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// A Windows API error carrying the thread's last-error code.
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    Windows(#[from] windows::core::Error),

    /// A lookup returned a zero handle.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An entry point of `user32.dll` could not be resolved.
    #[error("Entry point `{symbol}` unavailable: {reason}")]
    EntryPoint {
        /// The exported symbol name.
        symbol: String,
        /// Why resolution failed.
        reason: String,
    },

    /// A null pointer was encountered where a valid pointer was expected.
    #[error("Null pointer error: {context}")]
    NullPointer {
        /// Description of where the null pointer was encountered.
        context: &'static str,
    },

    /// An invalid handle was provided or returned.
    #[error("Invalid handle: {context}")]
    InvalidHandle {
        /// Description of the invalid handle context.
        context: &'static str,
    },

    /// A string conversion error occurred.
    #[error("String conversion error: {0}")]
    StringConversion(String),

    /// A buffer was too small for the requested operation.
    #[error("Buffer too small: needed {needed}, got {actual}")]
    BufferTooSmall {
        /// The required buffer size.
        needed: usize,
        /// The actual buffer size provided.
        actual: usize,
    },

    /// A custom error with a message.
    #[error("{0}")]
    Custom(String),
}

/// A specialized `Result` type for user32 operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Creates a new entry point error.
    pub fn entry_point(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::EntryPoint {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new null pointer error with the given context.
    pub fn null_pointer(context: &'static str) -> Self {
        Error::NullPointer { context }
    }

    /// Creates a new invalid handle error with the given context.
    pub fn invalid_handle(context: &'static str) -> Self {
        Error::InvalidHandle { context }
    }

    /// Creates a new string conversion error.
    pub fn string_conversion(msg: impl Into<String>) -> Self {
        Error::StringConversion(msg.into())
    }

    /// Creates a new buffer too small error.
    pub fn buffer_too_small(needed: usize, actual: usize) -> Self {
        Error::BufferTooSmall { needed, actual }
    }

    /// Creates a custom error with the given message.
    pub fn custom(msg: impl Into<String>) -> Self {
        Error::Custom(msg.into())
    }

    /// Returns true if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Returns the Windows error code if this is a Windows error.
    #[cfg(windows)]
    pub fn win32_error_code(&self) -> Option<u32> {
        match self {
            Error::Windows(e) => Some(e.code().0 as u32),
            _ => None,
        }
    }
}

/// Extension trait for converting `windows` crate results.
#[cfg(windows)]
pub trait ResultExt<T> {
    /// Converts a Windows result to our Result type.
    fn to_result(self) -> Result<T>;
}

#[cfg(windows)]
impl<T> ResultExt<T> for windows::core::Result<T> {
    fn to_result(self) -> Result<T> {
        self.map_err(Error::from)
    }
}

/// Gets the last Windows error as our Error type.
#[cfg(windows)]
pub fn last_error() -> Error {
    Error::Windows(windows::core::Error::from_win32())
}

/// Returns `Ok(())` if the thread's last-error code is zero, otherwise the error.
///
/// Needed for calls where zero is both a valid result and the failure signal.
#[cfg(windows)]
pub fn check_last_error() -> Result<()> {
    let err = windows::core::Error::from_win32();
    if err.code().is_ok() {
        Ok(())
    } else {
        Err(Error::Windows(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = Error::not_found("window class=Foo title=Bar");
        assert_eq!(err.to_string(), "Not found: window class=Foo title=Bar");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_entry_point_display() {
        let err = Error::entry_point("FindWindowW", "missing export");
        assert_eq!(
            err.to_string(),
            "Entry point `FindWindowW` unavailable: missing export"
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_buffer_too_small_display() {
        let err = Error::buffer_too_small(256, 16);
        assert_eq!(err.to_string(), "Buffer too small: needed 256, got 16");
    }
}
