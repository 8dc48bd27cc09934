//! Clipboard access.
//!
//! The raw functions mirror the OS calls and leave pairing to the caller.
//! [`Clipboard`] opens the clipboard for a scope and closes it on drop.

use crate::error::{Error, Result};
use crate::handle::HandleExt;
use crate::marshal::{from_native_bool, read_fixed_text};
use crate::string::{from_wide, to_wide};
use crate::user32::User32;
use std::marker::PhantomData;
use windows::Win32::Foundation::{GlobalFree, HANDLE, HGLOBAL, HWND};
use windows::Win32::System::Memory::{GlobalAlloc, GlobalLock, GlobalSize, GlobalUnlock, GMEM_MOVEABLE};

/// `CF_UNICODETEXT`: null-terminated UTF-16 text.
pub const CF_UNICODETEXT: u32 = 13;

/// Longest name a registered clipboard format can have.
const FORMAT_NAME_CAPACITY: usize = 255;

/// Opens the clipboard for this thread, associating it with `owner` (may be
/// null). Fails if another window has it open.
pub fn open_clipboard(owner: HWND) -> bool {
    // SAFETY: OpenClipboard accepts any window handle, including null.
    from_native_bool(unsafe { (User32::get().open_clipboard)(owner) })
}

/// Closes the clipboard.
pub fn close_clipboard() -> bool {
    // SAFETY: CloseClipboard takes no arguments.
    from_native_bool(unsafe { (User32::get().close_clipboard)() })
}

/// Empties the open clipboard and makes the opening window its owner.
pub fn empty_clipboard() -> bool {
    // SAFETY: EmptyClipboard takes no arguments.
    from_native_bool(unsafe { (User32::get().empty_clipboard)() })
}

/// Returns the format after `previous` (start with 0), or 0 when done.
pub fn enum_clipboard_formats(previous: u32) -> u32 {
    // SAFETY: EnumClipboardFormats takes a plain integer.
    unsafe { (User32::get().enum_clipboard_formats)(previous) }
}

/// Returns the clipboard's data handle for `format`, if present.
///
/// The handle belongs to the clipboard; do not free it, and do not use it
/// after the clipboard is closed.
pub fn get_clipboard_data(format: u32) -> Option<HANDLE> {
    // SAFETY: GetClipboardData takes a plain integer.
    unsafe { (User32::get().get_clipboard_data)(format) }.non_null()
}

/// Places data on the open clipboard.
///
/// # Safety
///
/// On success the OS owns `data` and the caller must not touch it again. For
/// global-memory formats `data` must be a moveable `GlobalAlloc` block.
pub unsafe fn set_clipboard_data(format: u32, data: HANDLE) -> Result<HANDLE> {
    (User32::get().set_clipboard_data)(format, data).or_last_error()
}

/// Returns true if the clipboard holds data in `format`. The clipboard need
/// not be open.
pub fn is_clipboard_format_available(format: u32) -> bool {
    // SAFETY: IsClipboardFormatAvailable takes a plain integer.
    from_native_bool(unsafe { (User32::get().is_clipboard_format_available)(format) })
}

/// Returns the name of a registered clipboard format.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for predefined formats (which have no name)
/// and for unknown ids.
pub fn get_clipboard_format_name(format: u32) -> Result<String> {
    read_fixed_text(FORMAT_NAME_CAPACITY, |buf| {
        // SAFETY: buf is writable for buf.len() units.
        unsafe { (User32::get().get_clipboard_format_name)(format, buf.as_mut_ptr(), buf.len() as i32) }
    })?
    .ok_or_else(|| Error::not_found(format!("clipboard format name {format}")))
}

/// Registers `hwnd` to receive `WM_CLIPBOARDUPDATE` when contents change.
pub fn add_clipboard_format_listener(hwnd: HWND) -> bool {
    // SAFETY: the export validates the handle.
    from_native_bool(unsafe { (User32::get().add_clipboard_format_listener)(hwnd) })
}

/// Removes a listener added with [`add_clipboard_format_listener`].
pub fn remove_clipboard_format_listener(hwnd: HWND) -> bool {
    // SAFETY: the export validates the handle.
    from_native_bool(unsafe { (User32::get().remove_clipboard_format_listener)(hwnd) })
}

/// The open clipboard, closed when dropped.
///
/// Must be dropped on the thread that opened it.
#[derive(Debug)]
pub struct Clipboard {
    _not_send: PhantomData<*const ()>,
}

impl Clipboard {
    /// Opens the clipboard on behalf of `owner`.
    ///
    /// Writing requires a non-null owner: after [`empty`](Self::empty) with a
    /// null owner, the OS rejects new data.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the clipboard is open elsewhere.
    pub fn open(owner: HWND) -> Result<Self> {
        if !open_clipboard(owner) {
            return Err(crate::error::last_error());
        }
        Ok(Self {
            _not_send: PhantomData,
        })
    }

    /// Iterates over the formats currently on the clipboard.
    pub fn formats(&self) -> Formats<'_> {
        Formats {
            current: 0,
            _clipboard: PhantomData,
        }
    }

    /// Returns true if data in `format` is present.
    pub fn is_available(&self, format: u32) -> bool {
        is_clipboard_format_available(format)
    }

    /// Returns the data handle for `format`, valid while `self` is alive.
    pub fn data(&self, format: u32) -> Option<HANDLE> {
        get_clipboard_data(format)
    }

    /// Empties the clipboard and takes ownership of it.
    pub fn empty(&self) -> Result<()> {
        if empty_clipboard() {
            Ok(())
        } else {
            Err(crate::error::last_error())
        }
    }

    /// Reads the clipboard text, or `None` when there is no text.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be locked or is not valid UTF-16.
    pub fn text(&self) -> Result<Option<String>> {
        let Some(handle) = self.data(CF_UNICODETEXT) else {
            return Ok(None);
        };
        let global = HGLOBAL(handle.0);

        // SAFETY: CF_UNICODETEXT data is a global block owned by the open
        // clipboard; it stays valid until the clipboard is closed.
        unsafe {
            let ptr = GlobalLock(global) as *const u16;
            if ptr.is_null() {
                return Err(crate::error::last_error());
            }
            let units = GlobalSize(global) / std::mem::size_of::<u16>();
            let text = from_wide(std::slice::from_raw_parts(ptr, units));
            let _ = GlobalUnlock(global);
            text.map(Some)
        }
    }

    /// Replaces the clipboard contents with `text`.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the clipboard cannot be emptied, the block
    /// cannot be allocated, or the data is rejected.
    pub fn set_text(&self, text: &str) -> Result<()> {
        self.empty()?;

        let wide = to_wide(text);
        let bytes = wide.len() * std::mem::size_of::<u16>();

        // SAFETY: the block is allocated with room for `wide` and is freed
        // here unless the clipboard accepted it.
        unsafe {
            let global = GlobalAlloc(GMEM_MOVEABLE, bytes)?;
            let ptr = GlobalLock(global) as *mut u16;
            if ptr.is_null() {
                let error = crate::error::last_error();
                let _ = GlobalFree(global);
                return Err(error);
            }
            std::ptr::copy_nonoverlapping(wide.as_ptr(), ptr, wide.len());
            let _ = GlobalUnlock(global);

            if let Err(e) = set_clipboard_data(CF_UNICODETEXT, HANDLE(global.0)) {
                let _ = GlobalFree(global);
                return Err(e);
            }
        }
        Ok(())
    }
}

impl Drop for Clipboard {
    fn drop(&mut self) {
        if !close_clipboard() {
            tracing::warn!(error = %crate::error::last_error(), "CloseClipboard failed");
        }
    }
}

/// Iterator over clipboard formats, see [`Clipboard::formats`].
pub struct Formats<'a> {
    current: u32,
    _clipboard: PhantomData<&'a Clipboard>,
}

impl Iterator for Formats<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        self.current = enum_clipboard_formats(self.current);
        (self.current != 0).then_some(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{DefaultHandler, WindowBuilder};

    #[test]
    fn test_predefined_format_has_no_name() {
        let err = get_clipboard_format_name(CF_UNICODETEXT).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_text_round_trip() {
        let owner = WindowBuilder::new().build(DefaultHandler).unwrap();
        let clipboard = Clipboard::open(owner.hwnd()).unwrap();

        clipboard.set_text("clipboard ✓ text").unwrap();
        assert!(clipboard.is_available(CF_UNICODETEXT));
        assert!(clipboard.formats().any(|f| f == CF_UNICODETEXT));
        assert_eq!(clipboard.text().unwrap().as_deref(), Some("clipboard ✓ text"));

        drop(clipboard);
        assert!(is_clipboard_format_available(CF_UNICODETEXT));
    }

    #[test]
    fn test_listener_registration() {
        let window = WindowBuilder::new().build(DefaultHandler).unwrap();
        assert!(add_clipboard_format_listener(window.hwnd()));
        assert!(remove_clipboard_format_listener(window.hwnd()));
        assert!(!remove_clipboard_format_listener(window.hwnd()));
    }
}
