//! Message queue primitives.
//!
//! Each thread that creates windows owns a message queue. [`get_message`] and
//! [`wait_message`] block until the queue has something to deliver and have
//! no timeout; post a message to the thread to wake them.
//!
//! [`send_message`] runs the target window's procedure and returns only when
//! it finishes; when the target belongs to another thread the caller blocks
//! until that thread processes it. [`post_message`] enqueues and returns
//! immediately, and posts are delivered in FIFO order relative to each other.

use crate::error::{last_error, Result};
use crate::geometry::Point;
use crate::marshal::from_native_bool;
use crate::user32::User32;
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    HACCEL, PM_NOREMOVE, PM_NOYIELD, PM_REMOVE, WM_APP, WM_CLOSE, WM_COMMAND, WM_CREATE,
    WM_DESTROY, WM_KEYDOWN, WM_KEYUP, WM_NULL, WM_PAINT, WM_QUIT, WM_SIZE, WM_TIMER, WM_USER,
    WNDPROC,
};

/// A queued window message, laid out like `MSG`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Message {
    /// The target window, or null for thread messages.
    pub hwnd: HWND,
    /// The message identifier.
    pub msg: u32,
    /// Additional message information.
    pub wparam: WPARAM,
    /// Additional message information.
    pub lparam: LPARAM,
    /// Time the message was posted.
    pub time: u32,
    /// Cursor position, in screen coordinates, when the message was posted.
    pub pt: Point,
}

impl Message {
    /// WM_NULL message.
    pub const NULL: u32 = WM_NULL;
    /// WM_CREATE message.
    pub const CREATE: u32 = WM_CREATE;
    /// WM_DESTROY message.
    pub const DESTROY: u32 = WM_DESTROY;
    /// WM_CLOSE message.
    pub const CLOSE: u32 = WM_CLOSE;
    /// WM_QUIT message.
    pub const QUIT: u32 = WM_QUIT;
    /// WM_PAINT message.
    pub const PAINT: u32 = WM_PAINT;
    /// WM_SIZE message.
    pub const SIZE: u32 = WM_SIZE;
    /// WM_KEYDOWN message.
    pub const KEYDOWN: u32 = WM_KEYDOWN;
    /// WM_KEYUP message.
    pub const KEYUP: u32 = WM_KEYUP;
    /// WM_COMMAND message.
    pub const COMMAND: u32 = WM_COMMAND;
    /// WM_TIMER message.
    pub const TIMER: u32 = WM_TIMER;
    /// First private window-class message.
    pub const USER: u32 = WM_USER;
    /// First private application message.
    pub const APP: u32 = WM_APP;

    /// Creates a message with zero time and position.
    pub fn new(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> Self {
        Self {
            hwnd,
            msg,
            wparam,
            lparam,
            ..Default::default()
        }
    }
}

/// What [`get_message`] retrieved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Received {
    /// An ordinary message.
    Message(Message),
    /// `WM_QUIT`, carrying the exit code given to [`post_quit_message`].
    Quit(i32),
}

/// Flags for [`peek_message`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeekFlags(pub u32);

impl PeekFlags {
    /// Leave the message in the queue.
    pub const NOREMOVE: Self = Self(PM_NOREMOVE.0);
    /// Remove the message from the queue.
    pub const REMOVE: Self = Self(PM_REMOVE.0);
    /// Do not release threads waiting for this one to go idle.
    pub const NOYIELD: Self = Self(PM_NOYIELD.0);

    /// Combines two flag sets.
    pub fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Waits for and retrieves the next message for `hwnd`, or for any window
/// of this thread (and thread messages) when `hwnd` is null.
///
/// `filter_min`/`filter_max` restrict the message range; pass `0, 0` for all.
///
/// # Errors
///
/// Returns the OS error when `hwnd` is not a valid window of this thread.
pub fn get_message(hwnd: HWND, filter_min: u32, filter_max: u32) -> Result<Received> {
    let mut msg = Message::default();

    // SAFETY: msg is a writable MSG-layout value.
    let ret = unsafe { (User32::get().get_message)(&mut msg, hwnd, filter_min, filter_max) };
    match ret.0 {
        -1 => Err(last_error()),
        0 => Ok(Received::Quit(msg.wparam.0 as i32)),
        _ => Ok(Received::Message(msg)),
    }
}

/// Checks the queue without blocking. Returns the message, if any.
pub fn peek_message(hwnd: HWND, filter_min: u32, filter_max: u32, flags: PeekFlags) -> Option<Message> {
    let mut msg = Message::default();

    // SAFETY: msg is a writable MSG-layout value.
    let found = unsafe {
        (User32::get().peek_message)(&mut msg, hwnd, filter_min, filter_max, flags.0)
    };
    from_native_bool(found).then_some(msg)
}

/// Posts character messages for a virtual-key message.
///
/// Returns true if the message was translated.
pub fn translate_message(msg: &Message) -> bool {
    // SAFETY: msg is a valid MSG-layout value.
    from_native_bool(unsafe { (User32::get().translate_message)(msg) })
}

/// Delivers a message to its window procedure and returns the result.
///
/// # Safety
///
/// `msg` must have been retrieved from the queue, or its parameters must be
/// valid for its message code (some codes carry pointers that the receiving
/// procedure dereferences).
pub unsafe fn dispatch_message(msg: &Message) -> LRESULT {
    (User32::get().dispatch_message)(msg)
}

/// Sends a message and blocks until the window procedure has processed it.
///
/// # Safety
///
/// Pointer-carrying messages must point to memory valid for the call.
/// Sending to a window of another thread blocks until that thread pumps
/// messages, which deadlocks if it is waiting on the caller.
pub unsafe fn send_message(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    (User32::get().send_message)(hwnd, msg, wparam, lparam)
}

/// Places a message in the queue of the thread that owns `hwnd` and returns
/// without waiting. A null `hwnd` posts to the calling thread.
///
/// # Safety
///
/// Pointer-carrying messages must point to memory that stays valid until the
/// message is processed.
pub unsafe fn post_message(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> bool {
    from_native_bool((User32::get().post_message)(hwnd, msg, wparam, lparam))
}

/// Blocks until a new message arrives in the calling thread's queue.
pub fn wait_message() -> bool {
    // SAFETY: WaitMessage takes no arguments.
    from_native_bool(unsafe { (User32::get().wait_message)() })
}

/// Posts `WM_QUIT` with `exit_code` to the calling thread.
pub fn post_quit_message(exit_code: i32) {
    // SAFETY: PostQuitMessage takes a plain integer.
    unsafe { (User32::get().post_quit_message)(exit_code) }
}

/// Default processing for messages a window procedure does not handle.
///
/// # Safety
///
/// Parameters must be valid for `msg`, as passed to the window procedure.
pub unsafe fn def_window_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    (User32::get().def_window_proc)(hwnd, msg, wparam, lparam)
}

/// Passes a message to a previous window procedure (subclassing).
///
/// # Safety
///
/// `prev` must be a window procedure obtained from the OS, and parameters
/// must be valid for `msg`.
pub unsafe fn call_window_proc(
    prev: WNDPROC,
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    (User32::get().call_window_proc)(prev, hwnd, msg, wparam, lparam)
}

/// Translates a keyboard message through an accelerator table into
/// `WM_COMMAND`. Returns true if it was translated; the message must then not
/// be dispatched.
pub fn translate_accelerator(hwnd: HWND, table: HACCEL, msg: &Message) -> bool {
    // SAFETY: msg is a valid MSG-layout value.
    unsafe { (User32::get().translate_accelerator)(hwnd, table, msg) != 0 }
}

/// Runs the message loop until WM_QUIT is received.
///
/// # Returns
///
/// The exit code passed to [`post_quit_message`], or -1 if retrieval failed.
pub fn run_message_loop() -> i32 {
    loop {
        match get_message(HWND::default(), 0, 0) {
            Ok(Received::Message(msg)) => {
                translate_message(&msg);
                // SAFETY: msg came from the queue.
                unsafe { dispatch_message(&msg) };
            }
            Ok(Received::Quit(code)) => return code,
            Err(e) => {
                tracing::error!(error = %e, "GetMessageW failed");
                return -1;
            }
        }
    }
}

/// Processes pending messages without blocking.
///
/// # Returns
///
/// Returns `true` if a WM_QUIT message was received, indicating the application should exit.
pub fn process_messages() -> bool {
    while let Some(msg) = peek_message(HWND::default(), 0, 0, PeekFlags::REMOVE) {
        if msg.msg == WM_QUIT {
            return true;
        }
        translate_message(&msg);
        // SAFETY: msg came from the queue.
        unsafe { dispatch_message(&msg) };
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use windows::Win32::UI::WindowsAndMessaging::MSG;

    #[test]
    fn test_layout_matches_msg() {
        assert_eq!(std::mem::size_of::<Message>(), std::mem::size_of::<MSG>());
        assert_eq!(std::mem::offset_of!(Message, msg), std::mem::offset_of!(MSG, message));
        assert_eq!(std::mem::offset_of!(Message, wparam), std::mem::offset_of!(MSG, wParam));
        assert_eq!(std::mem::offset_of!(Message, lparam), std::mem::offset_of!(MSG, lParam));
        assert_eq!(std::mem::offset_of!(Message, pt), std::mem::offset_of!(MSG, pt));
    }

    fn ensure_queue() {
        let _ = peek_message(HWND::default(), 0, 0, PeekFlags::NOREMOVE);
    }

    #[test]
    fn test_post_then_peek_preserves_order() {
        ensure_queue();
        let base = Message::APP + 0x100;

        for i in 0..3usize {
            let posted =
                unsafe { post_message(HWND::default(), base + i as u32, WPARAM(i), LPARAM(-(i as isize))) };
            assert!(posted);
        }

        for i in 0..3usize {
            let msg = peek_message(HWND::default(), base, base + 2, PeekFlags::REMOVE)
                .expect("posted message is queued");
            assert_eq!(msg.msg, base + i as u32);
            assert_eq!(msg.wparam, WPARAM(i));
            assert_eq!(msg.lparam, LPARAM(-(i as isize)));
        }
        assert!(peek_message(HWND::default(), base, base + 2, PeekFlags::REMOVE).is_none());
    }

    #[test]
    fn test_peek_noremove_leaves_message() {
        ensure_queue();
        let code = Message::APP + 0x200;
        assert!(unsafe { post_message(HWND::default(), code, WPARAM(7), LPARAM(0)) });

        let peeked = peek_message(HWND::default(), code, code, PeekFlags::NOREMOVE).unwrap();
        assert_eq!(peeked.wparam, WPARAM(7));

        let fetched = get_message(HWND::default(), code, code).unwrap();
        assert_eq!(fetched, Received::Message(peeked));
    }

    #[test]
    fn test_wait_message_returns_when_queue_has_input() {
        ensure_queue();
        let code = Message::APP + 0x300;
        assert!(unsafe { post_message(HWND::default(), code, WPARAM(0), LPARAM(0)) });

        assert!(wait_message());
        assert!(peek_message(HWND::default(), code, code, PeekFlags::REMOVE).is_some());
    }

    #[test]
    fn test_quit_ends_loop_with_exit_code() {
        ensure_queue();
        post_quit_message(42);
        assert_eq!(run_message_loop(), 42);
    }

    #[test]
    fn test_process_messages_reports_quit() {
        ensure_queue();
        post_quit_message(0);
        assert!(process_messages());
        assert!(!process_messages());
    }
}
