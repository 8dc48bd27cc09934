//! Window lifecycle, queries and a typed window builder.
//!
//! The free functions are thin bindings over the user32 window calls. On top
//! of them, [`WindowBuilder`] registers a class, creates a window, and routes
//! its messages to a [`MessageHandler`].

use crate::class::{load_cursor, register_class_ex, unregister_class, ResourceId, WindowClass};
use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::handle::HandleExt;
use crate::marshal::{from_native_bool, read_text, to_native_bool};
use crate::message::{def_window_proc, post_quit_message, Message};
use crate::module::current_instance;
use crate::string::{optional_wide, WideString};
use crate::user32::User32;
use std::cell::RefCell;
use std::ffi::c_void;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::Graphics::Gdi::{GetStockObject, HBRUSH, WHITE_BRUSH};
use windows::Win32::UI::WindowsAndMessaging::{
    CREATESTRUCTW, CW_USEDEFAULT, GWLP_USERDATA, HMENU, SWP_FRAMECHANGED, SWP_HIDEWINDOW,
    SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SWP_NOZORDER, SWP_SHOWWINDOW, SW_HIDE, SW_MAXIMIZE,
    SW_MINIMIZE, SW_RESTORE, SW_SHOW, SW_SHOWDEFAULT, SW_SHOWNORMAL, WM_CLOSE, WM_CREATE,
    WM_DESTROY, WM_NCCREATE, WM_NCDESTROY, WS_CAPTION, WS_CHILD, WS_EX_APPWINDOW,
    WS_EX_TOOLWINDOW, WS_EX_TOPMOST, WS_OVERLAPPEDWINDOW, WS_POPUP, WS_SYSMENU, WS_VISIBLE,
};

/// Window styles for creating windows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Style(pub u32);

impl Style {
    /// A standard overlapped window with title bar, border, and system menu.
    pub const OVERLAPPED: Self = Self(WS_OVERLAPPEDWINDOW.0);

    /// A window with a caption.
    pub const CAPTION: Self = Self(WS_CAPTION.0);

    /// A window with a system menu.
    pub const SYSMENU: Self = Self(WS_SYSMENU.0);

    /// A visible window.
    pub const VISIBLE: Self = Self(WS_VISIBLE.0);

    /// A pop-up window.
    pub const POPUP: Self = Self(WS_POPUP.0);

    /// A child window.
    pub const CHILD: Self = Self(WS_CHILD.0);

    /// Combines two styles.
    pub fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Extended window styles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExStyle(pub u32);

impl ExStyle {
    /// No extended styles.
    pub const NONE: Self = Self(0);

    /// Stays above all non-topmost windows.
    pub const TOPMOST: Self = Self(WS_EX_TOPMOST.0);

    /// A tool window, not shown in the taskbar.
    pub const TOOLWINDOW: Self = Self(WS_EX_TOOLWINDOW.0);

    /// Forces a top-level window onto the taskbar.
    pub const APPWINDOW: Self = Self(WS_EX_APPWINDOW.0);

    /// Combines two extended styles.
    pub fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Show window commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShowCommand(pub i32);

impl ShowCommand {
    /// Shows the window in its default state.
    pub const DEFAULT: Self = Self(SW_SHOWDEFAULT.0);

    /// Shows the window normally.
    pub const SHOW: Self = Self(SW_SHOW.0);

    /// Activates and displays the window at its normal size.
    pub const NORMAL: Self = Self(SW_SHOWNORMAL.0);

    /// Hides the window.
    pub const HIDE: Self = Self(SW_HIDE.0);

    /// Minimizes the window.
    pub const MINIMIZE: Self = Self(SW_MINIMIZE.0);

    /// Maximizes the window.
    pub const MAXIMIZE: Self = Self(SW_MAXIMIZE.0);

    /// Restores a minimized or maximized window.
    pub const RESTORE: Self = Self(SW_RESTORE.0);
}

/// Flags for [`set_window_pos`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PositionFlags(pub u32);

impl PositionFlags {
    /// Keep the current size.
    pub const NOSIZE: Self = Self(SWP_NOSIZE.0);
    /// Keep the current position.
    pub const NOMOVE: Self = Self(SWP_NOMOVE.0);
    /// Keep the current Z order.
    pub const NOZORDER: Self = Self(SWP_NOZORDER.0);
    /// Do not activate the window.
    pub const NOACTIVATE: Self = Self(SWP_NOACTIVATE.0);
    /// Show the window.
    pub const SHOWWINDOW: Self = Self(SWP_SHOWWINDOW.0);
    /// Hide the window.
    pub const HIDEWINDOW: Self = Self(SWP_HIDEWINDOW.0);
    /// Apply frame style changes.
    pub const FRAMECHANGED: Self = Self(SWP_FRAMECHANGED.0);

    /// Combines two flag sets.
    pub fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Creates a window.
///
/// # Errors
///
/// Returns the OS error when creation fails, including when the window
/// procedure rejects `WM_NCCREATE` or `WM_CREATE`.
///
/// # Safety
///
/// `param` is handed to the window procedure in `CREATESTRUCTW`; it must be
/// whatever that procedure expects (or null).
#[allow(clippy::too_many_arguments)]
pub unsafe fn create_window_ex(
    ex_style: ExStyle,
    class_name: &str,
    title: &str,
    style: Style,
    rect: (i32, i32, i32, i32),
    parent: HWND,
    menu: HMENU,
    instance: HINSTANCE,
    param: *const c_void,
) -> Result<HWND> {
    let class_name = WideString::new(class_name);
    let title = WideString::new(title);
    let (x, y, width, height) = rect;

    (User32::get().create_window_ex)(
        ex_style.0,
        class_name.as_pcwstr(),
        title.as_pcwstr(),
        style.0,
        x,
        y,
        width,
        height,
        parent,
        menu,
        instance,
        param,
    )
    .or_last_error()
}

/// Destroys a window. Only the thread that created it may destroy it.
pub fn destroy_window(hwnd: HWND) -> bool {
    // SAFETY: DestroyWindow validates the handle.
    from_native_bool(unsafe { (User32::get().destroy_window)(hwnd) })
}

/// Sets the show state. Returns true if the window was previously visible.
pub fn show_window(hwnd: HWND, cmd: ShowCommand) -> bool {
    // SAFETY: ShowWindow validates the handle.
    from_native_bool(unsafe { (User32::get().show_window)(hwnd, cmd.0) })
}

/// Sends `WM_PAINT` directly if the update region is not empty.
pub fn update_window(hwnd: HWND) -> bool {
    // SAFETY: UpdateWindow validates the handle.
    from_native_bool(unsafe { (User32::get().update_window)(hwnd) })
}

/// Changes position and size.
pub fn move_window(hwnd: HWND, x: i32, y: i32, width: i32, height: i32, repaint: bool) -> bool {
    // SAFETY: MoveWindow validates the handle.
    from_native_bool(unsafe {
        (User32::get().move_window)(hwnd, x, y, width, height, to_native_bool(repaint))
    })
}

/// Changes size, position and Z order.
pub fn set_window_pos(
    hwnd: HWND,
    insert_after: HWND,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    flags: PositionFlags,
) -> bool {
    // SAFETY: SetWindowPos validates the handles.
    from_native_bool(unsafe {
        (User32::get().set_window_pos)(hwnd, insert_after, x, y, width, height, flags.0)
    })
}

/// Computes the window rectangle needed for a client rectangle.
pub fn adjust_window_rect(rect: &mut Rect, style: Style, menu: bool) -> bool {
    // SAFETY: rect is a writable RECT-layout value.
    from_native_bool(unsafe {
        (User32::get().adjust_window_rect)(rect, style.0, to_native_bool(menu))
    })
}

/// Computes the window rectangle needed for a client rectangle, with
/// extended styles.
pub fn adjust_window_rect_ex(rect: &mut Rect, style: Style, menu: bool, ex_style: ExStyle) -> bool {
    // SAFETY: rect is a writable RECT-layout value.
    from_native_bool(unsafe {
        (User32::get().adjust_window_rect_ex)(rect, style.0, to_native_bool(menu), ex_style.0)
    })
}

/// Sets the title bar text (or a control's text).
pub fn set_window_text(hwnd: HWND, text: &str) -> bool {
    let text = WideString::new(text);
    // SAFETY: text is a valid null-terminated wide string.
    from_native_bool(unsafe { (User32::get().set_window_text)(hwnd, text.as_pcwstr()) })
}

/// Length of the window text in UTF-16 units.
pub fn get_window_text_length(hwnd: HWND) -> i32 {
    // SAFETY: GetWindowTextLengthW validates the handle.
    unsafe { (User32::get().get_window_text_length)(hwnd) }
}

/// Returns the window text. Invalid windows and windows without text yield
/// an empty string.
///
/// # Errors
///
/// Returns [`Error::StringConversion`](crate::error::Error::StringConversion) if the text is not valid UTF-16.
pub fn get_window_text(hwnd: HWND) -> Result<String> {
    read_text(
        || get_window_text_length(hwnd),
        |buf| {
            // SAFETY: buf is writable for buf.len() units.
            unsafe { (User32::get().get_window_text)(hwnd, buf.as_mut_ptr(), buf.len() as i32) }
        },
    )
}

/// Bounding rectangle in screen coordinates, or `None` if `hwnd` is invalid.
pub fn get_window_rect(hwnd: HWND) -> Option<Rect> {
    let mut rect = Rect::default();
    // SAFETY: rect is a writable RECT-layout value.
    from_native_bool(unsafe { (User32::get().get_window_rect)(hwnd, &mut rect) }).then_some(rect)
}

/// Client-area rectangle; the upper-left corner is always `(0, 0)`.
///
/// # Errors
///
/// Returns the OS error when `hwnd` is not a valid window.
pub fn try_get_client_rect(hwnd: HWND) -> Result<Rect> {
    let mut rect = Rect::default();
    // SAFETY: rect is a writable RECT-layout value.
    if from_native_bool(unsafe { (User32::get().get_client_rect)(hwnd, &mut rect) }) {
        Ok(rect)
    } else {
        Err(crate::error::last_error())
    }
}

/// Client-area rectangle of a window the caller knows to be valid.
///
/// # Panics
///
/// Panics if the OS reports failure, which only happens for an invalid
/// handle. Use [`try_get_client_rect`] for handles that may be stale.
pub fn get_client_rect(hwnd: HWND) -> Rect {
    match try_get_client_rect(hwnd) {
        Ok(rect) => rect,
        Err(e) => panic!("GetClientRect({:?}) failed: {e}", hwnd.0),
    }
}

/// Finds a top-level window by class name and title (case-insensitive).
///
/// An empty `class_name` matches any class. The title always takes part in
/// the match, so an empty `title` only finds untitled windows.
///
/// # Errors
///
/// Returns [`Error::NotFound`](crate::error::Error::NotFound) when no window matches.
pub fn find_window(class_name: &str, title: &str) -> Result<HWND> {
    let class_wide = optional_wide(Some(class_name));
    let class_ptr = class_wide.as_ref().map_or(PCWSTR::null(), |w| w.as_pcwstr());
    let title_wide = WideString::new(title);

    // SAFETY: the class pointer is null or a valid null-terminated wide
    // string; the title is always one.
    unsafe { (User32::get().find_window)(class_ptr, title_wide.as_pcwstr()) }
        .or_not_found(|| format!("window class={class_name:?} title={title:?}"))
}

/// Returns true if `hwnd` identifies an existing window.
pub fn is_window(hwnd: HWND) -> bool {
    // SAFETY: IsWindow accepts any value.
    from_native_bool(unsafe { (User32::get().is_window)(hwnd) })
}

/// Returns true if the window has the visible style (and so do its parents).
pub fn is_window_visible(hwnd: HWND) -> bool {
    // SAFETY: IsWindowVisible accepts any value.
    from_native_bool(unsafe { (User32::get().is_window_visible)(hwnd) })
}

/// Returns true if the window accepts mouse and keyboard input.
pub fn is_window_enabled(hwnd: HWND) -> bool {
    // SAFETY: IsWindowEnabled accepts any value.
    from_native_bool(unsafe { (User32::get().is_window_enabled)(hwnd) })
}

/// Enables or disables input. Returns true if the window was previously disabled.
pub fn enable_window(hwnd: HWND, enable: bool) -> bool {
    // SAFETY: EnableWindow validates the handle.
    from_native_bool(unsafe { (User32::get().enable_window)(hwnd, to_native_bool(enable)) })
}

/// Returns `(thread_id, process_id)` of the window's creator, or `None` for
/// an invalid window.
pub fn get_window_thread_process_id(hwnd: HWND) -> Option<(u32, u32)> {
    let mut process_id = 0u32;
    // SAFETY: process_id is a writable u32.
    let thread_id = unsafe { (User32::get().get_window_thread_process_id)(hwnd, &mut process_id) };
    (thread_id != 0).then_some((thread_id, process_id))
}

/// Reads a 32-bit value from the window's extra memory or attributes.
pub fn get_window_long(hwnd: HWND, index: i32) -> i32 {
    // SAFETY: GetWindowLongW validates the handle and index.
    unsafe { (User32::get().get_window_long)(hwnd, index) }
}

/// Writes a 32-bit window value, returning the previous one.
///
/// # Safety
///
/// Some indexes (window procedure, user data read by a procedure) change how
/// the OS or the window procedure interprets memory.
pub unsafe fn set_window_long(hwnd: HWND, index: i32, value: i32) -> i32 {
    (User32::get().set_window_long)(hwnd, index, value)
}

/// Reads a pointer-sized window value.
pub fn get_window_long_ptr(hwnd: HWND, index: i32) -> isize {
    // SAFETY: the export validates the handle and index.
    unsafe { (User32::get().get_window_long_ptr)(hwnd, index) }
}

/// Writes a pointer-sized window value, returning the previous one.
///
/// # Safety
///
/// See [`set_window_long`].
pub unsafe fn set_window_long_ptr(hwnd: HWND, index: i32, value: isize) -> isize {
    (User32::get().set_window_long_ptr)(hwnd, index, value)
}

/// Converts a screen point to client coordinates of `hwnd`.
pub fn screen_to_client(hwnd: HWND, pt: Point) -> Option<Point> {
    let mut pt = pt;
    // SAFETY: pt is a writable POINT-layout value.
    from_native_bool(unsafe { (User32::get().screen_to_client)(hwnd, &mut pt) }).then_some(pt)
}

/// Converts a client point of `hwnd` to screen coordinates.
pub fn client_to_screen(hwnd: HWND, pt: Point) -> Option<Point> {
    let mut pt = pt;
    // SAFETY: pt is a writable POINT-layout value.
    from_native_bool(unsafe { (User32::get().client_to_screen)(hwnd, &mut pt) }).then_some(pt)
}

/// Shows a modal message box and returns the id of the pressed button
/// (0 on failure). `flags` are the `MB_*` values.
pub fn message_box(owner: HWND, text: &str, caption: &str, flags: u32) -> i32 {
    let text = WideString::new(text);
    let caption = WideString::new(caption);
    // SAFETY: both strings are valid null-terminated wide strings.
    unsafe { (User32::get().message_box)(owner, text.as_pcwstr(), caption.as_pcwstr(), flags) }
}

/// Returns a system metric (`SM_*` index); 0 for unknown indexes.
pub fn get_system_metrics(index: i32) -> i32 {
    // SAFETY: GetSystemMetrics takes a plain integer.
    unsafe { (User32::get().get_system_metrics)(index) }
}

/// Trait for handling window messages.
pub trait MessageHandler {
    /// Handles a window message.
    ///
    /// Return `Some(result)` to indicate the message was handled, or `None` to
    /// let the default window procedure handle it.
    fn handle_message(&mut self, msg: Message) -> Option<LRESULT>;

    /// Called when the window is created.
    fn on_create(&mut self, _hwnd: HWND) -> bool {
        true
    }

    /// Called when the window is about to be destroyed.
    fn on_destroy(&mut self) {}

    /// Called when the window receives a close request.
    ///
    /// Return `false` to keep the window open.
    fn on_close(&mut self, _hwnd: HWND) -> bool {
        true
    }

    /// Whether destroying this window should end the thread's message loop.
    fn quit_on_destroy(&self) -> bool {
        true
    }
}

/// A default message handler that does nothing.
pub struct DefaultHandler;

impl MessageHandler for DefaultHandler {
    fn handle_message(&mut self, _msg: Message) -> Option<LRESULT> {
        None
    }
}

/// Builder for creating windows.
pub struct WindowBuilder {
    class_name: String,
    title: String,
    style: Style,
    ex_style: ExStyle,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    parent: HWND,
}

impl Default for WindowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowBuilder {
    /// Creates a new window builder with default settings.
    pub fn new() -> Self {
        Self {
            class_name: String::new(),
            title: String::from("Window"),
            style: Style::OVERLAPPED,
            ex_style: ExStyle::NONE,
            x: CW_USEDEFAULT,
            y: CW_USEDEFAULT,
            width: CW_USEDEFAULT,
            height: CW_USEDEFAULT,
            parent: HWND::default(),
        }
    }

    /// Sets the window class name.
    pub fn class_name(mut self, name: impl Into<String>) -> Self {
        self.class_name = name.into();
        self
    }

    /// Sets the window title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the window style.
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Sets the extended window style.
    pub fn ex_style(mut self, ex_style: ExStyle) -> Self {
        self.ex_style = ex_style;
        self
    }

    /// Sets the window position.
    pub fn position(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Sets the window size.
    pub fn size(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the parent or owner window.
    pub fn parent(mut self, parent: HWND) -> Self {
        self.parent = parent;
        self
    }

    /// Registers the class and creates the window.
    ///
    /// # Errors
    ///
    /// Returns an error if window class registration or window creation fails.
    pub fn build<H: MessageHandler + 'static>(self, handler: H) -> Result<Window<H>> {
        static NEXT_CLASS: std::sync::atomic::AtomicU32 = std::sync::atomic::AtomicU32::new(0);

        let class_name = if self.class_name.is_empty() {
            let n = NEXT_CLASS.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            format!("ErgonomicUser32_{}_{}", std::process::id(), n)
        } else {
            self.class_name
        };

        let instance = current_instance()?;
        let mut class = WindowClass::new(&class_name, Some(window_proc::<H>));
        class.instance = instance;
        class.cursor = load_cursor(HINSTANCE::default(), &ResourceId::ARROW)?;
        // SAFETY: GetStockObject(WHITE_BRUSH) returns a shared system brush.
        class.background = unsafe { HBRUSH(GetStockObject(WHITE_BRUSH).0) };
        register_class_ex(&class)?;

        // Reclaimed in Window::drop, or below if creation fails.
        let handler_ptr = Box::into_raw(Box::new(RefCell::new(handler)));

        // SAFETY: handler_ptr is what window_proc::<H> expects in CREATESTRUCTW.
        let created = unsafe {
            create_window_ex(
                self.ex_style,
                &class_name,
                &self.title,
                self.style,
                (self.x, self.y, self.width, self.height),
                self.parent,
                HMENU::default(),
                instance,
                handler_ptr as *const c_void,
            )
        };

        match created {
            Ok(hwnd) => Ok(Window {
                hwnd,
                class_name,
                handler: handler_ptr,
                instance,
            }),
            Err(e) => {
                // SAFETY: the window does not exist, so nothing else holds the pointer.
                unsafe { drop(Box::from_raw(handler_ptr)) };
                unregister_class(&class_name, instance);
                Err(e)
            }
        }
    }
}

/// A window owned by this thread, destroyed on drop.
pub struct Window<H: MessageHandler> {
    hwnd: HWND,
    class_name: String,
    handler: *mut RefCell<H>,
    instance: HINSTANCE,
}

impl<H: MessageHandler> Window<H> {
    /// Returns the window handle.
    #[inline]
    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    /// Shows the window.
    pub fn show(&self, cmd: ShowCommand) {
        show_window(self.hwnd, cmd);
    }

    /// Returns the title bar text.
    pub fn title(&self) -> Result<String> {
        get_window_text(self.hwnd)
    }

    /// Sets the title bar text.
    pub fn set_title(&self, title: &str) -> Result<()> {
        if set_window_text(self.hwnd, title) {
            Ok(())
        } else {
            Err(crate::error::last_error())
        }
    }

    /// Returns the client-area rectangle.
    pub fn client_rect(&self) -> Result<Rect> {
        try_get_client_rect(self.hwnd)
    }

    /// Gets a mutable reference to the message handler.
    ///
    /// # Panics
    ///
    /// Panics if the handler is already borrowed (e.g., during message handling).
    pub fn handler_mut(&self) -> std::cell::RefMut<'_, H> {
        // SAFETY: self.handler stays valid until Window is dropped.
        unsafe { (*self.handler).borrow_mut() }
    }

    /// Gets a reference to the message handler.
    ///
    /// # Panics
    ///
    /// Panics if the handler is already mutably borrowed (e.g., during message handling).
    pub fn handler(&self) -> std::cell::Ref<'_, H> {
        // SAFETY: self.handler stays valid until Window is dropped.
        unsafe { (*self.handler).borrow() }
    }

    /// Destroys the window.
    ///
    /// This is equivalent to dropping the window.
    pub fn destroy(self) {}
}

impl<H: MessageHandler> Drop for Window<H> {
    fn drop(&mut self) {
        if is_window(self.hwnd) {
            destroy_window(self.hwnd);
        }
        unregister_class(&self.class_name, self.instance);
        // SAFETY: the window is gone (WM_NCDESTROY cleared the user data), so
        // the procedure can no longer reach the handler.
        unsafe { drop(Box::from_raw(self.handler)) };
    }
}

/// The window procedure that forwards messages to the handler.
///
/// # Safety
///
/// Called by the OS for windows of a class registered with this procedure.
/// The handler pointer in `GWLP_USERDATA` is installed during `WM_NCCREATE`
/// and cleared during `WM_NCDESTROY`.
unsafe extern "system" fn window_proc<H: MessageHandler>(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if msg == WM_NCCREATE {
        // SAFETY: during WM_NCCREATE, lparam points to a CREATESTRUCTW whose
        // lpCreateParams is the pointer passed to CreateWindowExW.
        let create_struct = &*(lparam.0 as *const CREATESTRUCTW);
        set_window_long_ptr(hwnd, GWLP_USERDATA.0, create_struct.lpCreateParams as isize);
        return def_window_proc(hwnd, msg, wparam, lparam);
    }

    let handler_ptr = get_window_long_ptr(hwnd, GWLP_USERDATA.0) as *mut RefCell<H>;
    if handler_ptr.is_null() {
        return def_window_proc(hwnd, msg, wparam, lparam);
    }

    if msg == WM_NCDESTROY {
        set_window_long_ptr(hwnd, GWLP_USERDATA.0, 0);
        return def_window_proc(hwnd, msg, wparam, lparam);
    }

    // SAFETY: handler_ptr was installed in WM_NCCREATE and the Window that
    // owns it outlives the native window.
    let handler = &*handler_ptr;

    // A handler that re-enters the window (e.g. destroys it from a callback)
    // gets default processing for the nested messages.
    let Ok(mut handler) = handler.try_borrow_mut() else {
        return def_window_proc(hwnd, msg, wparam, lparam);
    };

    match msg {
        WM_CREATE => {
            if handler.on_create(hwnd) {
                LRESULT(0)
            } else {
                LRESULT(-1)
            }
        }
        WM_DESTROY => {
            handler.on_destroy();
            if handler.quit_on_destroy() {
                post_quit_message(0);
            }
            LRESULT(0)
        }
        WM_CLOSE => {
            let close = handler.on_close(hwnd);
            // Destruction re-enters this procedure with WM_DESTROY.
            drop(handler);
            if close {
                destroy_window(hwnd);
            }
            LRESULT(0)
        }
        _ => match handler.handle_message(Message::new(hwnd, msg, wparam, lparam)) {
            Some(result) => result,
            None => {
                drop(handler);
                def_window_proc(hwnd, msg, wparam, lparam)
            }
        },
    }
}
