//! Helpers for user32 handle types.
//!
//! user32 handles (`HWND`, `HDC`, `HMONITOR`, ...) are opaque values that this
//! crate never dereferences and never frees on its own. A zero handle is the
//! OS's failure or "none" signal; the helpers here turn it into `Option` or
//! `Result` values.

use crate::error::{Error, Result};
use windows::Win32::Foundation::{HANDLE, HINSTANCE, HWND};
use windows::Win32::Graphics::Gdi::{HBRUSH, HDC, HMONITOR};
use windows::Win32::UI::Input::KeyboardAndMouse::HKL;
use windows::Win32::UI::WindowsAndMessaging::{HACCEL, HCURSOR, HICON, HMENU};

/// Extension trait for user32 handle types.
pub trait HandleExt: Copy + Sized {
    /// Returns the handle as an integer.
    fn to_raw(&self) -> isize;

    /// Returns true if this is the zero handle.
    #[inline]
    fn is_null(&self) -> bool {
        self.to_raw() == 0
    }

    /// Returns `None` for the zero handle.
    #[inline]
    fn non_null(self) -> Option<Self> {
        if self.is_null() {
            None
        } else {
            Some(self)
        }
    }

    /// Returns [`Error::NotFound`] for the zero handle.
    ///
    /// `what` describes the lookup and is only evaluated on failure.
    fn or_not_found(self, what: impl FnOnce() -> String) -> Result<Self> {
        match self.non_null() {
            Some(handle) => Ok(handle),
            None => {
                let what = what();
                tracing::debug!(%what, "lookup returned a null handle");
                Err(Error::not_found(what))
            }
        }
    }

    /// Returns the thread's last error for the zero handle.
    fn or_last_error(self) -> Result<Self> {
        self.non_null().ok_or_else(crate::error::last_error)
    }
}

macro_rules! impl_handle_ext {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HandleExt for $ty {
                #[inline]
                fn to_raw(&self) -> isize {
                    self.0 as isize
                }
            }
        )*
    };
}

impl_handle_ext!(HWND, HDC, HMONITOR, HICON, HCURSOR, HBRUSH, HMENU, HACCEL, HKL, HINSTANCE, HANDLE);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_handles() {
        assert!(HWND::default().is_null());
        assert!(HDC::default().non_null().is_none());
        assert!(HMONITOR::default().or_last_error().is_err());
    }

    #[test]
    fn test_not_found_message() {
        let err = HWND::default()
            .or_not_found(|| "window title=Missing".to_string())
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not found: window title=Missing");
    }

    #[test]
    fn test_non_null_passes_through() {
        let hwnd = HWND(0x1234 as *mut _);
        assert_eq!(hwnd.non_null(), Some(hwnd));
        assert_eq!(hwnd.to_raw(), 0x1234);
        assert!(hwnd.or_not_found(|| unreachable!()).is_ok());
    }
}
