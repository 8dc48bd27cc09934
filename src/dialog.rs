//! Modal and modeless dialog boxes built from dialog-template resources.

use crate::class::ResourceId;
use crate::error::{last_error, Error, Result};
use crate::handle::HandleExt;
use crate::marshal::from_native_bool;
use crate::message::Message;
use crate::user32::User32;
use crate::window::is_window;
use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, WPARAM};

/// A dialog procedure: returns non-zero when it handled the message.
pub type DialogProc = unsafe extern "system" fn(HWND, u32, WPARAM, LPARAM) -> isize;

/// Creates a modeless dialog from a template resource.
///
/// The dialog's messages reach it only if the caller's message loop routes
/// them through [`is_dialog_message`].
///
/// # Errors
///
/// Returns the OS error when the template cannot be found or creation fails.
pub fn create_dialog(
    instance: HINSTANCE,
    template: &ResourceId,
    parent: HWND,
    proc: Option<DialogProc>,
    param: LPARAM,
) -> Result<HWND> {
    // SAFETY: the template pointer is valid for the duration of the call.
    template
        .with_pcwstr(|name| unsafe {
            (User32::get().create_dialog_param)(instance, name, parent, proc, param)
        })
        .or_last_error()
}

/// Runs a modal dialog from a template resource.
///
/// Blocks, pumping its own message loop, until the dialog procedure calls
/// [`end_dialog`], and returns the value passed there.
///
/// # Errors
///
/// Returns [`Error::InvalidHandle`] for a non-null `parent` that is not a
/// window, or the OS error when the dialog cannot be created.
pub fn dialog_box(
    instance: HINSTANCE,
    template: &ResourceId,
    parent: HWND,
    proc: Option<DialogProc>,
    param: LPARAM,
) -> Result<isize> {
    // The OS reports a bad parent as 0, which is also a legal end_dialog value.
    if !parent.is_null() && !is_window(parent) {
        return Err(Error::invalid_handle("dialog parent"));
    }

    // SAFETY: the template pointer is valid for the duration of the call.
    let result = template.with_pcwstr(|name| unsafe {
        (User32::get().dialog_box_param)(instance, name, parent, proc, param)
    });
    if result == -1 {
        return Err(last_error());
    }
    Ok(result)
}

/// Looks up a control of a dialog by its identifier.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when the dialog has no such control.
pub fn get_dlg_item(dialog: HWND, id: i32) -> Result<HWND> {
    // SAFETY: GetDlgItem validates the handle.
    unsafe { (User32::get().get_dlg_item)(dialog, id) }
        .or_not_found(|| format!("dialog item {id}"))
}

/// Ends a modal dialog; [`dialog_box`] returns `result`.
pub fn end_dialog(dialog: HWND, result: isize) -> bool {
    // SAFETY: EndDialog validates the handle.
    from_native_bool(unsafe { (User32::get().end_dialog)(dialog, result) })
}

/// Lets a modeless dialog process `msg` (keyboard navigation and the like).
///
/// Returns true if the message was processed; it must then not be
/// translated or dispatched.
///
/// # Safety
///
/// Processing dispatches `msg`, so the same rules as
/// [`dispatch_message`](crate::message::dispatch_message) apply.
pub unsafe fn is_dialog_message(dialog: HWND, msg: &Message) -> bool {
    from_native_bool((User32::get().is_dialog_message)(dialog, msg))
}

/// Default processing for dialogs with a private window class.
///
/// # Safety
///
/// Parameters must be valid for `msg`, as passed to the window procedure.
pub unsafe fn def_dlg_proc(dialog: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    (User32::get().def_dlg_proc)(dialog, msg, wparam, lparam)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::current_instance;

    unsafe extern "system" fn never_called(_: HWND, _: u32, _: WPARAM, _: LPARAM) -> isize {
        0
    }

    #[test]
    fn test_missing_template_is_an_error() {
        let instance = current_instance().unwrap();
        let template = ResourceId::from("NoSuchDialogTemplate");

        assert!(create_dialog(instance, &template, HWND::default(), Some(never_called), LPARAM(0)).is_err());
        assert!(dialog_box(instance, &ResourceId::Id(0x7FFF), HWND::default(), Some(never_called), LPARAM(0)).is_err());
    }

    #[test]
    fn test_dialog_box_rejects_invalid_parent() {
        let instance = current_instance().unwrap();
        let bogus = HWND(0x7FFF_0001 as *mut _);
        let err = dialog_box(instance, &ResourceId::Id(1), bogus, None, LPARAM(0)).unwrap_err();
        assert!(matches!(err, Error::InvalidHandle { .. }));
    }

    #[test]
    fn test_get_dlg_item_not_found() {
        let err = get_dlg_item(HWND::default(), 1001).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_end_dialog_on_invalid_window() {
        assert!(!end_dialog(HWND::default(), 1));
    }
}
