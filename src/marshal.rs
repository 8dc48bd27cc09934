//! Argument and return-value marshaling shared by every binding.

use crate::error::Result;
use crate::string::from_wide_with_len;
use windows::Win32::Foundation::BOOL;

/// Converts a Rust `bool` to a native `BOOL` (`1` or `0`).
#[inline]
pub fn to_native_bool(value: bool) -> BOOL {
    BOOL(value as i32)
}

/// Converts a native `BOOL` to a Rust `bool`; any non-zero value is true.
#[inline]
pub fn from_native_bool(value: BOOL) -> bool {
    value.0 != 0
}

/// Reads OS text with the length-query-then-fill protocol.
///
/// `query_len` returns the text length in UTF-16 units (without terminator);
/// `fill` receives a buffer one unit longer and returns how many units it
/// wrote. Text that grows between the two calls is truncated to the queried
/// length.
pub fn read_text(query_len: impl FnOnce() -> i32, fill: impl FnOnce(&mut [u16]) -> i32) -> Result<String> {
    let len = query_len().max(0) as usize;
    let mut buffer = vec![0u16; len + 1];
    let written = fill(&mut buffer).max(0) as usize;
    from_wide_with_len(&buffer, written.min(len))
}

/// Reads OS text into a fixed-capacity buffer.
///
/// Returns `None` when `fill` reports zero units written.
pub fn read_fixed_text(capacity: usize, fill: impl FnOnce(&mut [u16]) -> i32) -> Result<Option<String>> {
    let mut buffer = vec![0u16; capacity];
    let written = fill(&mut buffer);
    if written <= 0 {
        return Ok(None);
    }
    from_wide_with_len(&buffer, written as usize).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_conversion() {
        assert_eq!(to_native_bool(true), BOOL(1));
        assert_eq!(to_native_bool(false), BOOL(0));
        assert!(from_native_bool(BOOL(-1)));
        assert!(from_native_bool(BOOL(2)));
        assert!(!from_native_bool(BOOL(0)));
    }

    #[test]
    fn test_read_text_sizes_buffer_from_query() {
        let text = read_text(
            || 5,
            |buf| {
                assert_eq!(buf.len(), 6);
                for (dst, src) in buf.iter_mut().zip("hello".encode_utf16()) {
                    *dst = src;
                }
                5
            },
        )
        .unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn test_read_text_negative_length() {
        let text = read_text(|| -1, |_| 0).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_read_fixed_text_zero_is_none() {
        assert_eq!(read_fixed_text(16, |_| 0).unwrap(), None);
    }
}
