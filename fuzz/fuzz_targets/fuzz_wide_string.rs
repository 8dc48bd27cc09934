//! Fuzz target for the strings passed to user32 as `LPCWSTR`.
//!
//! `WideString` keeps embedded nulls, but the OS stops reading at the first
//! one, and so does `to_string_lossy`. `optional_wide` maps "" to a null
//! pointer argument.

#![no_main]

use ergonomic_user32::string::{optional_wide, WideString};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let wide = WideString::new(data);

    assert_eq!(wide.len(), data.encode_utf16().count());
    assert_eq!(wide.is_empty(), data.is_empty());
    assert_eq!(wide.as_slice().last(), Some(&0), "must stay null-terminated");
    assert!(!wide.as_ptr().is_null());

    let expected = data.split('\0').next().unwrap_or("");
    assert_eq!(wide.to_string_lossy(), expected);

    match optional_wide(Some(data)) {
        None => assert!(data.is_empty()),
        Some(arg) => assert_eq!(arg.as_slice(), wide.as_slice()),
    }
});
