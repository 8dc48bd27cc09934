//! String conversion utilities for user32 text parameters.
//!
//! user32's `W` entry points take null-terminated UTF-16 strings, while Rust
//! uses UTF-8. This module converts between the two.

use crate::error::{Error, Result};

/// Converts a Rust string to a null-terminated UTF-16 vector.
///
/// # Example
///
/// ```
/// use ergonomic_user32::string::to_wide;
///
/// let wide = to_wide("Hello");
/// assert_eq!(wide, vec![72, 101, 108, 108, 111, 0]);
/// ```
#[inline]
pub fn to_wide(s: &str) -> Vec<u16> {
    // UTF-16 length is at most the UTF-8 length, +1 for the terminator.
    let mut result = Vec::with_capacity(s.len() + 1);
    result.extend(s.encode_utf16());
    result.push(0);
    result
}

/// Converts a UTF-16 slice to a Rust `String`, stopping at the first null.
///
/// The slice may or may not include the null terminator.
///
/// # Example
///
/// ```
/// use ergonomic_user32::string::{to_wide, from_wide};
///
/// let wide = to_wide("Hello");
/// assert_eq!(from_wide(&wide).unwrap(), "Hello");
/// ```
#[inline]
pub fn from_wide(wide: &[u16]) -> Result<String> {
    let len = wide.iter().position(|&c| c == 0).unwrap_or(wide.len());
    String::from_utf16(&wide[..len])
        .map_err(|_| Error::string_conversion("Invalid UTF-16 sequence"))
}

/// Converts the first `len` code units of a buffer filled by the OS.
///
/// Unlike [`from_wide`], this does not look for a null terminator.
#[inline]
pub fn from_wide_with_len(wide: &[u16], len: usize) -> Result<String> {
    let actual_len = len.min(wide.len());
    String::from_utf16(&wide[..actual_len])
        .map_err(|_| Error::string_conversion("Invalid UTF-16 sequence"))
}

/// Converts a null-terminated UTF-16 pointer to a Rust `String`.
///
/// # Safety
///
/// `ptr` must be null or point to a readable, null-terminated UTF-16 string
/// that is not mutated for the duration of the call.
pub unsafe fn from_wide_ptr(ptr: *const u16) -> Result<String> {
    if ptr.is_null() {
        return Err(Error::null_pointer("from_wide_ptr received null pointer"));
    }

    // SAFETY: caller guarantees ptr is valid and null-terminated.
    let mut len = 0;
    while *ptr.add(len) != 0 {
        len += 1;
    }

    // SAFETY: `len` code units before the terminator are readable.
    let slice = std::slice::from_raw_parts(ptr, len);
    from_wide(slice)
}

/// An owned null-terminated UTF-16 string for passing to user32.
///
/// Keeps the buffer alive for as long as the pointer handed to the OS is used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WideString {
    buffer: Vec<u16>,
}

impl WideString {
    /// Creates a new `WideString` from a Rust string.
    #[inline]
    pub fn new(s: &str) -> Self {
        Self { buffer: to_wide(s) }
    }

    /// Returns a pointer to the null-terminated wide string.
    #[inline]
    pub fn as_ptr(&self) -> *const u16 {
        self.buffer.as_ptr()
    }

    /// Returns the string as a PCWSTR for use with Windows APIs.
    #[cfg(windows)]
    #[inline]
    pub fn as_pcwstr(&self) -> windows::core::PCWSTR {
        windows::core::PCWSTR::from_raw(self.buffer.as_ptr())
    }

    /// Returns the length in UTF-16 code units, not including the null terminator.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len().saturating_sub(1)
    }

    /// Returns true if the string is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Converts back to a Rust String, truncating at the first null.
    #[inline]
    pub fn to_string_lossy(&self) -> String {
        let len = self.buffer.iter().position(|&c| c == 0).unwrap_or(self.buffer.len());
        String::from_utf16_lossy(&self.buffer[..len])
    }

    /// Returns the underlying buffer, including the terminator.
    #[inline]
    pub fn as_slice(&self) -> &[u16] {
        &self.buffer
    }
}

impl From<&str> for WideString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for WideString {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

/// Converts an optional string, mapping `None` and `""` to no buffer.
///
/// Several entry points treat a NULL string pointer as "match anything"; an
/// empty Rust string follows that convention.
#[inline]
pub fn optional_wide(s: Option<&str>) -> Option<WideString> {
    s.filter(|s| !s.is_empty()).map(WideString::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let original = "Hello, World! 🌍";
        let wide = to_wide(original);
        let back = from_wide(&wide).unwrap();
        assert_eq!(original, back);
    }

    #[test]
    fn test_empty_string() {
        let wide = to_wide("");
        assert_eq!(wide, vec![0]);
        assert_eq!(from_wide(&wide).unwrap(), "");
    }

    #[test]
    fn test_from_wide_stops_at_null() {
        let buffer = [b'a' as u16, b'b' as u16, 0, b'c' as u16];
        assert_eq!(from_wide(&buffer).unwrap(), "ab");
    }

    #[test]
    fn test_from_wide_with_len_ignores_tail() {
        let buffer = [b'a' as u16, b'b' as u16, b'c' as u16, 0, 0];
        assert_eq!(from_wide_with_len(&buffer, 2).unwrap(), "ab");
        assert_eq!(from_wide_with_len(&buffer, 99).unwrap(), "abc\0\0");
    }

    #[test]
    fn test_invalid_utf16_is_error() {
        // Lone high surrogate.
        let err = from_wide(&[0xD800, 0]).unwrap_err();
        assert!(matches!(err, Error::StringConversion(_)));
    }

    #[test]
    fn test_from_wide_ptr_null() {
        let err = unsafe { from_wide_ptr(std::ptr::null()) }.unwrap_err();
        assert!(matches!(err, Error::NullPointer { .. }));
    }

    #[test]
    fn test_wide_string_len_and_lossy() {
        let ws = WideString::new("title\0tail");
        assert_eq!(ws.len(), 10);
        assert_eq!(ws.to_string_lossy(), "title");
        assert_eq!(*ws.as_slice().last().unwrap(), 0);
    }

    #[test]
    fn test_optional_wide() {
        assert!(optional_wide(None).is_none());
        assert!(optional_wide(Some("")).is_none());
        assert_eq!(optional_wide(Some("Edit")).unwrap().to_string_lossy(), "Edit");
    }
}
