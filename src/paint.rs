//! Device contexts and simple drawing.
//!
//! [`WindowDc`] and [`PaintSession`] pair the acquire and release calls for
//! a scope, so every exit path gives the device context back.

use crate::error::Result;
use crate::geometry::Rect;
use crate::handle::HandleExt;
use crate::marshal::{from_native_bool, to_native_bool};
use crate::string::to_wide;
use crate::user32::User32;
use std::marker::PhantomData;
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Gdi::{
    DT_CALCRECT, DT_CENTER, DT_LEFT, DT_NOPREFIX, DT_RIGHT, DT_SINGLELINE, DT_VCENTER,
    DT_WORDBREAK, HBRUSH, HDC, PAINTSTRUCT,
};
use windows::Win32::UI::WindowsAndMessaging::HICON;

/// Formatting flags for [`draw_text`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextFormat(pub u32);

impl TextFormat {
    /// Align to the left edge.
    pub const LEFT: Self = Self(DT_LEFT.0);
    /// Center horizontally.
    pub const CENTER: Self = Self(DT_CENTER.0);
    /// Align to the right edge.
    pub const RIGHT: Self = Self(DT_RIGHT.0);
    /// Center vertically; needs `SINGLELINE`.
    pub const VCENTER: Self = Self(DT_VCENTER.0);
    /// Draw on one line.
    pub const SINGLELINE: Self = Self(DT_SINGLELINE.0);
    /// Break lines between words.
    pub const WORDBREAK: Self = Self(DT_WORDBREAK.0);
    /// Do not treat `&` as a mnemonic prefix.
    pub const NOPREFIX: Self = Self(DT_NOPREFIX.0);
    /// Measure only: adjusts the rectangle and draws nothing.
    pub const CALCRECT: Self = Self(DT_CALCRECT.0);

    /// Combines two format sets.
    pub fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Retrieves the client-area device context of `hwnd` (the screen for null).
///
/// Pair with [`release_dc`], or use [`WindowDc`].
pub fn get_dc(hwnd: HWND) -> Result<HDC> {
    // SAFETY: GetDC accepts any window handle, including null.
    unsafe { (User32::get().get_dc)(hwnd) }.or_last_error()
}

/// Releases a device context from [`get_dc`]. Returns true if released.
pub fn release_dc(hwnd: HWND, hdc: HDC) -> bool {
    // SAFETY: ReleaseDC validates both handles.
    unsafe { (User32::get().release_dc)(hwnd, hdc) == 1 }
}

/// Prepares `hwnd` for painting and fills `ps`.
///
/// Pair with [`end_paint`] using the same `ps`, or use [`PaintSession`].
pub fn begin_paint(hwnd: HWND, ps: &mut PAINTSTRUCT) -> Result<HDC> {
    // SAFETY: ps is a writable PAINTSTRUCT.
    unsafe { (User32::get().begin_paint)(hwnd, ps) }.or_last_error()
}

/// Marks the end of painting started by [`begin_paint`].
pub fn end_paint(hwnd: HWND, ps: &PAINTSTRUCT) -> bool {
    // SAFETY: ps is the structure filled by begin_paint.
    from_native_bool(unsafe { (User32::get().end_paint)(hwnd, ps) })
}

/// Fills `rect` with `brush`, excluding the right and bottom edges.
pub fn fill_rect(hdc: HDC, rect: &Rect, brush: HBRUSH) -> bool {
    // SAFETY: rect is a readable RECT-layout value.
    unsafe { (User32::get().fill_rect)(hdc, rect, brush) != 0 }
}

/// Draws formatted text in `rect` and returns the text height (0 on failure).
///
/// With [`TextFormat::CALCRECT`], `rect` is adjusted to fit the text and
/// nothing is drawn.
pub fn draw_text(hdc: HDC, text: &str, rect: &mut Rect, format: TextFormat) -> i32 {
    let wide = to_wide(text);
    // SAFETY: wide is null-terminated, so -1 makes the OS compute the length.
    unsafe { (User32::get().draw_text)(hdc, wide.as_ptr(), -1, rect, format.0) }
}

/// Draws an icon with its upper-left corner at `(x, y)`.
pub fn draw_icon(hdc: HDC, x: i32, y: i32, icon: HICON) -> bool {
    // SAFETY: DrawIcon validates both handles.
    from_native_bool(unsafe { (User32::get().draw_icon)(hdc, x, y, icon) })
}

/// Adds `rect` (the whole client area for `None`) to the update region.
pub fn invalidate_rect(hwnd: HWND, rect: Option<&Rect>, erase: bool) -> bool {
    let rect = rect.map_or(std::ptr::null(), |r| r as *const Rect);
    // SAFETY: rect is null or points to a readable RECT-layout value.
    from_native_bool(unsafe { (User32::get().invalidate_rect)(hwnd, rect, to_native_bool(erase)) })
}

/// A window's device context, released when dropped.
pub struct WindowDc {
    hwnd: HWND,
    hdc: HDC,
    _not_send: PhantomData<*const ()>,
}

impl WindowDc {
    /// Retrieves the device context of `hwnd`.
    pub fn acquire(hwnd: HWND) -> Result<Self> {
        Ok(Self {
            hwnd,
            hdc: get_dc(hwnd)?,
            _not_send: PhantomData,
        })
    }

    /// Returns the device context.
    #[inline]
    pub fn hdc(&self) -> HDC {
        self.hdc
    }
}

impl Drop for WindowDc {
    fn drop(&mut self) {
        if !release_dc(self.hwnd, self.hdc) {
            tracing::warn!(hwnd = ?self.hwnd.0, "ReleaseDC failed");
        }
    }
}

/// A `BeginPaint`/`EndPaint` bracket, normally opened while handling
/// `WM_PAINT`.
pub struct PaintSession {
    hwnd: HWND,
    hdc: HDC,
    ps: PAINTSTRUCT,
    _not_send: PhantomData<*const ()>,
}

impl PaintSession {
    /// Begins painting `hwnd`.
    pub fn begin(hwnd: HWND) -> Result<Self> {
        let mut ps = PAINTSTRUCT::default();
        let hdc = begin_paint(hwnd, &mut ps)?;
        Ok(Self {
            hwnd,
            hdc,
            ps,
            _not_send: PhantomData,
        })
    }

    /// Returns the device context to paint with.
    #[inline]
    pub fn hdc(&self) -> HDC {
        self.hdc
    }

    /// The region that needs repainting.
    pub fn paint_rect(&self) -> Rect {
        self.ps.rcPaint.into()
    }

    /// True if the caller must erase the background itself.
    pub fn erase(&self) -> bool {
        from_native_bool(self.ps.fErase)
    }
}

impl Drop for PaintSession {
    fn drop(&mut self) {
        if !end_paint(self.hwnd, &self.ps) {
            tracing::warn!(hwnd = ?self.hwnd.0, "EndPaint failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{load_icon, ResourceId};
    use crate::window::{show_window, DefaultHandler, ShowCommand, WindowBuilder};
    use windows::Win32::Foundation::HINSTANCE;
    use windows::Win32::Graphics::Gdi::{GetStockObject, BLACK_BRUSH};

    #[test]
    fn test_get_and_release_dc_pair() {
        let window = WindowBuilder::new().build(DefaultHandler).unwrap();
        let hdc = get_dc(window.hwnd()).unwrap();
        assert!(!hdc.is_null());
        assert!(release_dc(window.hwnd(), hdc));
    }

    #[test]
    fn test_release_dc_through_other_window_fails() {
        let owner = WindowBuilder::new().build(DefaultHandler).unwrap();
        let other = WindowBuilder::new().build(DefaultHandler).unwrap();
        let hdc = get_dc(owner.hwnd()).unwrap();

        assert!(!release_dc(other.hwnd(), hdc));
        assert!(release_dc(owner.hwnd(), hdc));
    }

    #[test]
    fn test_window_dc_guard_draws() {
        let window = WindowBuilder::new().size(200, 100).build(DefaultHandler).unwrap();
        let dc = WindowDc::acquire(window.hwnd()).unwrap();

        // SAFETY: stock objects are shared and never freed.
        let brush = unsafe { HBRUSH(GetStockObject(BLACK_BRUSH).0) };
        assert!(fill_rect(dc.hdc(), &Rect::new(0, 0, 10, 10), brush));

        let mut bounds = Rect::new(0, 0, 0, 0);
        let height = draw_text(dc.hdc(), "Measure me", &mut bounds, TextFormat::CALCRECT.with(TextFormat::SINGLELINE));
        assert!(height > 0);
        assert!(bounds.width() > 0);

        let icon = load_icon(HINSTANCE::default(), &ResourceId::APPLICATION).unwrap();
        assert!(draw_icon(dc.hdc(), 0, 0, icon));
    }

    #[test]
    fn test_paint_session_after_invalidate() {
        let window = WindowBuilder::new().size(200, 100).build(DefaultHandler).unwrap();
        show_window(window.hwnd(), ShowCommand::SHOW);
        assert!(invalidate_rect(window.hwnd(), None, true));

        let session = PaintSession::begin(window.hwnd()).unwrap();
        assert!(!session.hdc().is_null());
        let client = window.client_rect().unwrap();
        assert!(session.paint_rect().subtract(&client).is_none());
    }
}
