//! The process-wide table of `user32.dll` entry points.
//!
//! The table is resolved once, on first use, from a reference to
//! `user32.dll` that is kept for the lifetime of the process. Every binding in
//! this crate calls through it.

use crate::dialog::DialogProc;
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};
use crate::input::RawInput;
use crate::message::Message;
use crate::module::Library;
use crate::monitor::MonitorEnumProc;
use std::ffi::c_void;
use std::sync::OnceLock;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{BOOL, HANDLE, HINSTANCE, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::Graphics::Gdi::{DEVMODEW, HBRUSH, HDC, HMONITOR, MONITORINFO, PAINTSTRUCT};
use windows::Win32::UI::Input::KeyboardAndMouse::HKL;
use windows::Win32::UI::WindowsAndMessaging::{HACCEL, HCURSOR, HICON, HMENU, WNDCLASSEXW, WNDPROC};

const DLL_NAME: &str = "user32.dll";

// The `*LongPtr` exports only exist on 64-bit; 32-bit headers map them to the
// `*Long` functions, whose LONG arguments are pointer-sized there.
#[cfg(target_pointer_width = "64")]
const GET_WINDOW_LONG_PTR: &str = "GetWindowLongPtrW";
#[cfg(target_pointer_width = "64")]
const SET_WINDOW_LONG_PTR: &str = "SetWindowLongPtrW";
#[cfg(not(target_pointer_width = "64"))]
const GET_WINDOW_LONG_PTR: &str = "GetWindowLongW";
#[cfg(not(target_pointer_width = "64"))]
const SET_WINDOW_LONG_PTR: &str = "SetWindowLongW";

macro_rules! entry_points {
    ($( $field:ident = $symbol:expr => fn($($arg:ty),* $(,)?) $(-> $ret:ty)?; )*) => {
        /// Resolved `user32.dll` entry points.
        ///
        /// Fields are typed function pointers; the bindings in the other
        /// modules are the public way to call them.
        #[allow(missing_docs)]
        pub struct User32 {
            $( pub(crate) $field: unsafe extern "system" fn($($arg),*) $(-> $ret)?, )*
        }

        impl User32 {
            /// Exported names held by the table, in declaration order.
            pub const SYMBOLS: &'static [&'static str] = &[$($symbol),*];

            fn resolve(library: &Library) -> Result<Self> {
                // SAFETY: each field's type is the documented signature of
                // the export named next to it.
                unsafe {
                    Ok(Self {
                        $( $field: library.get_proc($symbol)?, )*
                    })
                }
            }
        }
    };
}

entry_points! {
    // Window classes, icons, cursors
    register_class_ex = "RegisterClassExW" => fn(*const WNDCLASSEXW) -> u16;
    unregister_class = "UnregisterClassW" => fn(PCWSTR, HINSTANCE) -> BOOL;
    load_icon = "LoadIconW" => fn(HINSTANCE, PCWSTR) -> HICON;
    load_cursor = "LoadCursorW" => fn(HINSTANCE, PCWSTR) -> HCURSOR;
    create_icon = "CreateIcon" => fn(HINSTANCE, i32, i32, u8, u8, *const u8, *const u8) -> HICON;
    destroy_icon = "DestroyIcon" => fn(HICON) -> BOOL;
    set_cursor = "SetCursor" => fn(HCURSOR) -> HCURSOR;

    // Window lifecycle and queries
    create_window_ex = "CreateWindowExW" => fn(
        u32, PCWSTR, PCWSTR, u32, i32, i32, i32, i32, HWND, HMENU, HINSTANCE, *const c_void,
    ) -> HWND;
    destroy_window = "DestroyWindow" => fn(HWND) -> BOOL;
    show_window = "ShowWindow" => fn(HWND, i32) -> BOOL;
    update_window = "UpdateWindow" => fn(HWND) -> BOOL;
    move_window = "MoveWindow" => fn(HWND, i32, i32, i32, i32, BOOL) -> BOOL;
    set_window_pos = "SetWindowPos" => fn(HWND, HWND, i32, i32, i32, i32, u32) -> BOOL;
    adjust_window_rect = "AdjustWindowRect" => fn(*mut Rect, u32, BOOL) -> BOOL;
    adjust_window_rect_ex = "AdjustWindowRectEx" => fn(*mut Rect, u32, BOOL, u32) -> BOOL;
    set_window_text = "SetWindowTextW" => fn(HWND, PCWSTR) -> BOOL;
    get_window_text = "GetWindowTextW" => fn(HWND, *mut u16, i32) -> i32;
    get_window_text_length = "GetWindowTextLengthW" => fn(HWND) -> i32;
    get_window_rect = "GetWindowRect" => fn(HWND, *mut Rect) -> BOOL;
    get_client_rect = "GetClientRect" => fn(HWND, *mut Rect) -> BOOL;
    find_window = "FindWindowW" => fn(PCWSTR, PCWSTR) -> HWND;
    is_window = "IsWindow" => fn(HWND) -> BOOL;
    is_window_visible = "IsWindowVisible" => fn(HWND) -> BOOL;
    is_window_enabled = "IsWindowEnabled" => fn(HWND) -> BOOL;
    enable_window = "EnableWindow" => fn(HWND, BOOL) -> BOOL;
    get_window_thread_process_id = "GetWindowThreadProcessId" => fn(HWND, *mut u32) -> u32;
    get_window_long = "GetWindowLongW" => fn(HWND, i32) -> i32;
    set_window_long = "SetWindowLongW" => fn(HWND, i32, i32) -> i32;
    get_window_long_ptr = GET_WINDOW_LONG_PTR => fn(HWND, i32) -> isize;
    set_window_long_ptr = SET_WINDOW_LONG_PTR => fn(HWND, i32, isize) -> isize;
    screen_to_client = "ScreenToClient" => fn(HWND, *mut Point) -> BOOL;
    client_to_screen = "ClientToScreen" => fn(HWND, *mut Point) -> BOOL;
    message_box = "MessageBoxW" => fn(HWND, PCWSTR, PCWSTR, u32) -> i32;
    get_system_metrics = "GetSystemMetrics" => fn(i32) -> i32;

    // Message loop
    get_message = "GetMessageW" => fn(*mut Message, HWND, u32, u32) -> BOOL;
    peek_message = "PeekMessageW" => fn(*mut Message, HWND, u32, u32, u32) -> BOOL;
    translate_message = "TranslateMessage" => fn(*const Message) -> BOOL;
    dispatch_message = "DispatchMessageW" => fn(*const Message) -> LRESULT;
    send_message = "SendMessageW" => fn(HWND, u32, WPARAM, LPARAM) -> LRESULT;
    post_message = "PostMessageW" => fn(HWND, u32, WPARAM, LPARAM) -> BOOL;
    wait_message = "WaitMessage" => fn() -> BOOL;
    post_quit_message = "PostQuitMessage" => fn(i32);
    def_window_proc = "DefWindowProcW" => fn(HWND, u32, WPARAM, LPARAM) -> LRESULT;
    call_window_proc = "CallWindowProcW" => fn(WNDPROC, HWND, u32, WPARAM, LPARAM) -> LRESULT;
    translate_accelerator = "TranslateAcceleratorW" => fn(HWND, HACCEL, *const Message) -> i32;

    // Rectangles
    set_rect = "SetRect" => fn(*mut Rect, i32, i32, i32, i32) -> BOOL;
    set_rect_empty = "SetRectEmpty" => fn(*mut Rect) -> BOOL;
    copy_rect = "CopyRect" => fn(*mut Rect, *const Rect) -> BOOL;
    equal_rect = "EqualRect" => fn(*const Rect, *const Rect) -> BOOL;
    inflate_rect = "InflateRect" => fn(*mut Rect, i32, i32) -> BOOL;
    offset_rect = "OffsetRect" => fn(*mut Rect, i32, i32) -> BOOL;
    intersect_rect = "IntersectRect" => fn(*mut Rect, *const Rect, *const Rect) -> BOOL;
    union_rect = "UnionRect" => fn(*mut Rect, *const Rect, *const Rect) -> BOOL;
    subtract_rect = "SubtractRect" => fn(*mut Rect, *const Rect, *const Rect) -> BOOL;
    is_rect_empty = "IsRectEmpty" => fn(*const Rect) -> BOOL;
    pt_in_rect = "PtInRect" => fn(*const Rect, Point) -> BOOL;

    // Dialogs
    create_dialog_param = "CreateDialogParamW" => fn(HINSTANCE, PCWSTR, HWND, Option<DialogProc>, LPARAM) -> HWND;
    dialog_box_param = "DialogBoxParamW" => fn(HINSTANCE, PCWSTR, HWND, Option<DialogProc>, LPARAM) -> isize;
    get_dlg_item = "GetDlgItem" => fn(HWND, i32) -> HWND;
    end_dialog = "EndDialog" => fn(HWND, isize) -> BOOL;
    is_dialog_message = "IsDialogMessageW" => fn(HWND, *const Message) -> BOOL;
    def_dlg_proc = "DefDlgProcW" => fn(HWND, u32, WPARAM, LPARAM) -> LRESULT;

    // Clipboard
    open_clipboard = "OpenClipboard" => fn(HWND) -> BOOL;
    close_clipboard = "CloseClipboard" => fn() -> BOOL;
    empty_clipboard = "EmptyClipboard" => fn() -> BOOL;
    enum_clipboard_formats = "EnumClipboardFormats" => fn(u32) -> u32;
    get_clipboard_data = "GetClipboardData" => fn(u32) -> HANDLE;
    set_clipboard_data = "SetClipboardData" => fn(u32, HANDLE) -> HANDLE;
    get_clipboard_format_name = "GetClipboardFormatNameW" => fn(u32, *mut u16, i32) -> i32;
    is_clipboard_format_available = "IsClipboardFormatAvailable" => fn(u32) -> BOOL;
    add_clipboard_format_listener = "AddClipboardFormatListener" => fn(HWND) -> BOOL;
    remove_clipboard_format_listener = "RemoveClipboardFormatListener" => fn(HWND) -> BOOL;

    // Painting
    get_dc = "GetDC" => fn(HWND) -> HDC;
    release_dc = "ReleaseDC" => fn(HWND, HDC) -> i32;
    begin_paint = "BeginPaint" => fn(HWND, *mut PAINTSTRUCT) -> HDC;
    end_paint = "EndPaint" => fn(HWND, *const PAINTSTRUCT) -> BOOL;
    fill_rect = "FillRect" => fn(HDC, *const Rect, HBRUSH) -> i32;
    draw_text = "DrawTextW" => fn(HDC, *const u16, i32, *mut Rect, u32) -> i32;
    draw_icon = "DrawIcon" => fn(HDC, i32, i32, HICON) -> BOOL;
    invalidate_rect = "InvalidateRect" => fn(HWND, *const Rect, BOOL) -> BOOL;

    // Keyboard and mouse
    get_async_key_state = "GetAsyncKeyState" => fn(i32) -> i16;
    get_keyboard_state = "GetKeyboardState" => fn(*mut u8) -> BOOL;
    map_virtual_key_ex = "MapVirtualKeyExW" => fn(u32, u32, HKL) -> u32;
    to_ascii = "ToAscii" => fn(u32, u32, *const u8, *mut u16, u32) -> i32;
    send_input = "SendInput" => fn(u32, *const RawInput, i32) -> u32;
    get_cursor_pos = "GetCursorPos" => fn(*mut Point) -> BOOL;
    set_cursor_pos = "SetCursorPos" => fn(i32, i32) -> BOOL;
    swap_mouse_button = "SwapMouseButton" => fn(BOOL) -> BOOL;
    set_capture = "SetCapture" => fn(HWND) -> HWND;
    release_capture = "ReleaseCapture" => fn() -> BOOL;
    set_focus = "SetFocus" => fn(HWND) -> HWND;

    // Monitors and display settings
    enum_display_monitors = "EnumDisplayMonitors" => fn(HDC, *const Rect, MonitorEnumProc, LPARAM) -> BOOL;
    monitor_from_point = "MonitorFromPoint" => fn(Point, u32) -> HMONITOR;
    monitor_from_rect = "MonitorFromRect" => fn(*const Rect, u32) -> HMONITOR;
    monitor_from_window = "MonitorFromWindow" => fn(HWND, u32) -> HMONITOR;
    get_monitor_info = "GetMonitorInfoW" => fn(HMONITOR, *mut MONITORINFO) -> BOOL;
    enum_display_settings_ex = "EnumDisplaySettingsExW" => fn(PCWSTR, u32, *mut DEVMODEW, u32) -> BOOL;
    change_display_settings_ex = "ChangeDisplaySettingsExW" => fn(PCWSTR, *const DEVMODEW, HWND, u32, *const c_void) -> i32;
}

static TABLE: OnceLock<std::result::Result<User32, (String, String)>> = OnceLock::new();

fn load() -> std::result::Result<User32, (String, String)> {
    let library = Library::load(DLL_NAME).map_err(|e| (DLL_NAME.to_string(), e.to_string()))?;

    match User32::resolve(&library) {
        Ok(table) => {
            // The table's pointers stay valid only while the module is loaded.
            let _ = library.into_raw();
            tracing::debug!(symbols = User32::SYMBOLS.len(), "resolved user32 entry points");
            Ok(table)
        }
        Err(Error::EntryPoint { symbol, reason }) => Err((symbol, reason)),
        Err(e) => Err((DLL_NAME.to_string(), e.to_string())),
    }
}

impl User32 {
    /// Returns the entry-point table, resolving it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntryPoint`] naming the first symbol that could not be
    /// resolved. The outcome of the first attempt is cached for the process.
    pub fn try_get() -> Result<&'static User32> {
        match TABLE.get_or_init(|| {
            let table = load();
            if let Err((symbol, reason)) = &table {
                tracing::error!(%symbol, %reason, "failed to resolve user32 entry points");
            }
            table
        }) {
            Ok(table) => Ok(table),
            Err((symbol, reason)) => Err(Error::entry_point(symbol.clone(), reason.clone())),
        }
    }

    /// Returns the entry-point table, resolving it on first use.
    ///
    /// # Panics
    ///
    /// Panics if `user32.dll` or one of its entry points cannot be resolved;
    /// no binding can work in that process.
    pub fn get() -> &'static User32 {
        match Self::try_get() {
            Ok(table) => table,
            Err(e) => panic!("user32 bindings unavailable: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_resolves_once() {
        let first = User32::try_get().unwrap() as *const User32;
        let second = User32::get() as *const User32;
        assert_eq!(first, second);
    }

    #[test]
    fn test_symbols_unique() {
        let mut names: Vec<_> = User32::SYMBOLS.to_vec();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        // The 32-bit LongPtr aliases resolve to the same export.
        assert!(before - names.len() <= 2);
    }

    #[test]
    fn test_table_is_shared_across_threads() {
        let main = User32::get() as *const User32 as usize;
        let other = std::thread::spawn(|| User32::get() as *const User32 as usize)
            .join()
            .unwrap();
        assert_eq!(main, other);
    }
}
