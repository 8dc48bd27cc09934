//! Fuzz target for decoding OS-filled UTF-16 buffers.

#![no_main]

use ergonomic_user32::string::{from_wide, from_wide_with_len};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (Vec<u16>, usize)| {
    let (data, len) = input;
    if data.len() > 100_000 {
        return;
    }

    let terminated = from_wide(&data);

    // Stops at the first null, like the OS.
    let end = data.iter().position(|&c| c == 0).unwrap_or(data.len());
    match (&terminated, from_wide_with_len(&data, end)) {
        (Ok(a), Ok(b)) => assert_eq!(a, &b),
        (Err(_), Err(_)) => {}
        _ => panic!("from_wide and from_wide_with_len disagree"),
    }

    // A reported length past the buffer is clamped, never read.
    let _ = from_wide_with_len(&data, len);
});
