//! Window classes, icons and cursors.
//!
//! A window class must be registered before any window of that class can be
//! created. Icons and cursors referenced by a class are loaded from resources
//! or built from bitmaps.

use crate::error::{Error, Result};
use crate::handle::HandleExt;
use crate::marshal::from_native_bool;
use crate::string::WideString;
use crate::user32::User32;
use windows::core::PCWSTR;
use windows::Win32::Foundation::HINSTANCE;
use windows::Win32::Graphics::Gdi::HBRUSH;
use windows::Win32::UI::WindowsAndMessaging::{
    CS_DBLCLKS, CS_HREDRAW, CS_NOCLOSE, CS_OWNDC, CS_VREDRAW, HCURSOR, HICON, WNDCLASSEXW,
    WNDCLASS_STYLES, WNDPROC,
};

/// A resource identified by name or by 16-bit integer id (`MAKEINTRESOURCE`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceId {
    /// A named resource.
    Name(String),
    /// An integer resource id.
    Id(u16),
}

impl ResourceId {
    /// The standard arrow cursor.
    pub const ARROW: Self = Self::Id(32512);
    /// The I-beam text cursor.
    pub const IBEAM: Self = Self::Id(32513);
    /// The hourglass cursor.
    pub const WAIT: Self = Self::Id(32514);
    /// The crosshair cursor.
    pub const CROSS: Self = Self::Id(32515);
    /// The hand cursor.
    pub const HAND: Self = Self::Id(32649);
    /// The default application icon.
    pub const APPLICATION: Self = Self::Id(32512);
    /// The warning icon.
    pub const WARNING: Self = Self::Id(32515);
    /// The error icon.
    pub const ERROR: Self = Self::Id(32513);
    /// The information icon.
    pub const INFORMATION: Self = Self::Id(32516);

    /// Calls `f` with the `LPCWSTR` form of this id.
    ///
    /// Integer ids are encoded in the pointer value, as the OS expects.
    pub(crate) fn with_pcwstr<R>(&self, f: impl FnOnce(PCWSTR) -> R) -> R {
        match self {
            ResourceId::Name(name) => {
                let wide = WideString::new(name);
                f(wide.as_pcwstr())
            }
            ResourceId::Id(id) => f(PCWSTR(*id as usize as *const u16)),
        }
    }
}

impl From<&str> for ResourceId {
    fn from(name: &str) -> Self {
        ResourceId::Name(name.to_string())
    }
}

impl From<u16> for ResourceId {
    fn from(id: u16) -> Self {
        ResourceId::Id(id)
    }
}

/// Window class styles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClassStyle(pub u32);

impl ClassStyle {
    /// No class styles.
    pub const NONE: Self = Self(0);
    /// Redraw on horizontal resize.
    pub const HREDRAW: Self = Self(CS_HREDRAW.0);
    /// Redraw on vertical resize.
    pub const VREDRAW: Self = Self(CS_VREDRAW.0);
    /// Deliver double-click messages.
    pub const DBLCLKS: Self = Self(CS_DBLCLKS.0);
    /// Give each window its own device context.
    pub const OWNDC: Self = Self(CS_OWNDC.0);
    /// Disable Close on the window menu.
    pub const NOCLOSE: Self = Self(CS_NOCLOSE.0);

    /// Combines two styles.
    pub fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// The atom identifying a registered class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Atom(pub u16);

/// A window-class descriptor for [`register_class_ex`].
#[derive(Clone, Debug)]
pub struct WindowClass {
    name: WideString,
    /// Class styles.
    pub style: ClassStyle,
    /// The window procedure for windows of this class.
    pub wndproc: WNDPROC,
    /// Extra bytes allocated after the class structure.
    pub class_extra: i32,
    /// Extra bytes allocated after each window instance.
    pub window_extra: i32,
    /// Module that contains the window procedure.
    pub instance: HINSTANCE,
    /// Large icon.
    pub icon: HICON,
    /// Small icon.
    pub small_icon: HICON,
    /// Cursor shown over the client area.
    pub cursor: HCURSOR,
    /// Brush used to erase the background.
    pub background: HBRUSH,
}

impl WindowClass {
    /// Creates a descriptor with the given class name and window procedure.
    pub fn new(name: &str, wndproc: WNDPROC) -> Self {
        Self {
            name: WideString::new(name),
            style: ClassStyle::HREDRAW.with(ClassStyle::VREDRAW),
            wndproc,
            class_extra: 0,
            window_extra: 0,
            instance: HINSTANCE::default(),
            icon: HICON::default(),
            small_icon: HICON::default(),
            cursor: HCURSOR::default(),
            background: HBRUSH::default(),
        }
    }

    /// Returns the class name.
    pub fn name(&self) -> String {
        self.name.to_string_lossy()
    }

    fn to_native(&self) -> WNDCLASSEXW {
        WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: WNDCLASS_STYLES(self.style.0),
            lpfnWndProc: self.wndproc,
            cbClsExtra: self.class_extra,
            cbWndExtra: self.window_extra,
            hInstance: self.instance,
            hIcon: self.icon,
            hCursor: self.cursor,
            hbrBackground: self.background,
            lpszMenuName: PCWSTR::null(),
            lpszClassName: self.name.as_pcwstr(),
            hIconSm: self.small_icon,
        }
    }
}

/// Registers a window class.
///
/// # Errors
///
/// Returns the OS error when registration fails (for example when the class
/// name is already registered in the same module).
pub fn register_class_ex(class: &WindowClass) -> Result<Atom> {
    let native = class.to_native();

    // SAFETY: native is fully initialized and its name buffer outlives the call.
    let atom = unsafe { (User32::get().register_class_ex)(&native) };
    if atom == 0 {
        return Err(crate::error::last_error());
    }
    Ok(Atom(atom))
}

/// Unregisters a window class. All windows of the class must be destroyed.
pub fn unregister_class(name: &str, instance: HINSTANCE) -> bool {
    let name = WideString::new(name);
    // SAFETY: name is a valid null-terminated wide string.
    from_native_bool(unsafe { (User32::get().unregister_class)(name.as_pcwstr(), instance) })
}

/// Loads an icon resource. Pass a null `instance` for system icons.
pub fn load_icon(instance: HINSTANCE, id: &ResourceId) -> Result<HICON> {
    // SAFETY: the name pointer is valid for the duration of the call.
    id.with_pcwstr(|name| unsafe { (User32::get().load_icon)(instance, name) })
        .or_last_error()
}

/// Loads a cursor resource. Pass a null `instance` for system cursors.
pub fn load_cursor(instance: HINSTANCE, id: &ResourceId) -> Result<HCURSOR> {
    // SAFETY: the name pointer is valid for the duration of the call.
    id.with_pcwstr(|name| unsafe { (User32::get().load_cursor)(instance, name) })
        .or_last_error()
}

/// Bytes needed for one bitmap of an icon: rows are padded to 16 bits.
fn icon_mask_len(width: i32, height: i32, bits_per_row_pixel: i32) -> usize {
    let row_bits = width.max(0) as usize * bits_per_row_pixel.max(0) as usize;
    row_bits.div_ceil(16) * 2 * height.max(0) as usize
}

/// Creates an icon from an AND (monochrome) mask and an XOR (color) bitmap.
///
/// # Errors
///
/// Returns [`Error::BufferTooSmall`] when a mask is shorter than its
/// dimensions require, or the OS error when creation fails.
pub fn create_icon(
    instance: HINSTANCE,
    width: i32,
    height: i32,
    planes: u8,
    bits_per_pixel: u8,
    and_mask: &[u8],
    xor_bits: &[u8],
) -> Result<HICON> {
    let and_len = icon_mask_len(width, height, 1);
    if and_mask.len() < and_len {
        return Err(Error::buffer_too_small(and_len, and_mask.len()));
    }
    let xor_len = icon_mask_len(width, height, planes as i32 * bits_per_pixel as i32);
    if xor_bits.len() < xor_len {
        return Err(Error::buffer_too_small(xor_len, xor_bits.len()));
    }

    // SAFETY: both buffers hold at least the bytes the dimensions describe.
    unsafe {
        (User32::get().create_icon)(
            instance,
            width,
            height,
            planes,
            bits_per_pixel,
            and_mask.as_ptr(),
            xor_bits.as_ptr(),
        )
    }
    .or_last_error()
}

/// Destroys an icon created with [`create_icon`]. Do not destroy shared icons.
pub fn destroy_icon(icon: HICON) -> bool {
    // SAFETY: DestroyIcon validates the handle.
    from_native_bool(unsafe { (User32::get().destroy_icon)(icon) })
}

/// Sets the cursor shape, returning the previous cursor if there was one.
pub fn set_cursor(cursor: HCURSOR) -> Option<HCURSOR> {
    // SAFETY: SetCursor accepts any cursor handle, including null.
    unsafe { (User32::get().set_cursor)(cursor) }.non_null()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::current_instance;

    #[test]
    fn test_icon_mask_len() {
        // 32x32 monochrome: 4 bytes per row.
        assert_eq!(icon_mask_len(32, 32, 1), 128);
        // 3 pixels still occupy a full 16-bit word.
        assert_eq!(icon_mask_len(3, 2, 1), 4);
        // 32x32 at 32bpp.
        assert_eq!(icon_mask_len(32, 32, 32), 4096);
    }

    #[test]
    fn test_load_system_cursor_and_icon() {
        let cursor = load_cursor(HINSTANCE::default(), &ResourceId::ARROW).unwrap();
        assert!(!cursor.is_null());
        let icon = load_icon(HINSTANCE::default(), &ResourceId::APPLICATION).unwrap();
        assert!(!icon.is_null());
    }

    #[test]
    fn test_create_icon_rejects_short_masks() {
        let instance = current_instance().unwrap();
        let err = create_icon(instance, 16, 16, 1, 1, &[0u8; 4], &[0u8; 32]).unwrap_err();
        assert!(matches!(err, Error::BufferTooSmall { needed: 32, actual: 4 }));
    }

    #[test]
    fn test_create_and_destroy_icon() {
        let instance = current_instance().unwrap();
        let and_mask = [0xFFu8; 32];
        let xor_bits = [0u8; 32];
        let icon = create_icon(instance, 16, 16, 1, 1, &and_mask, &xor_bits).unwrap();
        assert!(destroy_icon(icon));
    }

    #[test]
    fn test_register_duplicate_class_fails() {
        unsafe extern "system" fn proc(
            hwnd: windows::Win32::Foundation::HWND,
            msg: u32,
            wparam: windows::Win32::Foundation::WPARAM,
            lparam: windows::Win32::Foundation::LPARAM,
        ) -> windows::Win32::Foundation::LRESULT {
            crate::message::def_window_proc(hwnd, msg, wparam, lparam)
        }

        let name = format!("ErgonomicUser32Dup_{}", std::process::id());
        let mut class = WindowClass::new(&name, Some(proc));
        class.instance = current_instance().unwrap();

        assert!(register_class_ex(&class).is_ok());
        assert!(register_class_ex(&class).is_err());
        assert!(unregister_class(&name, class.instance));
    }
}
