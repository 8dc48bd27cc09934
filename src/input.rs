//! Keyboard and mouse input: key state, synthesized input, keyboard-layout
//! translation, the cursor, mouse capture and keyboard focus.

use crate::error::Result;
use crate::geometry::Point;
use crate::handle::HandleExt;
use crate::marshal::{from_native_bool, to_native_bool};
use crate::user32::User32;
use std::marker::PhantomData;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::Input::KeyboardAndMouse::{HKL, INPUT};

const INPUT_MOUSE: u32 = 0;
const INPUT_KEYBOARD: u32 = 1;
const INPUT_HARDWARE: u32 = 2;

/// Synthesized mouse motion or button event, laid out like `MOUSEINPUT`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MouseInput {
    /// Horizontal position or motion.
    pub dx: i32,
    /// Vertical position or motion.
    pub dy: i32,
    /// Wheel delta or X-button number, depending on `flags`.
    pub mouse_data: u32,
    /// `MOUSEEVENTF_*` flags.
    pub flags: u32,
    /// Event timestamp in milliseconds; 0 lets the OS supply one.
    pub time: u32,
    /// Extra value retrievable with `GetMessageExtraInfo`.
    pub extra_info: usize,
}

/// Synthesized keystroke, laid out like `KEYBDINPUT`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyboardInput {
    /// Virtual-key code; 0 with `KEYEVENTF_UNICODE`.
    pub vk: u16,
    /// Hardware scan code, or the UTF-16 unit with `KEYEVENTF_UNICODE`.
    pub scan: u16,
    /// `KEYEVENTF_*` flags.
    pub flags: u32,
    /// Event timestamp in milliseconds; 0 lets the OS supply one.
    pub time: u32,
    /// Extra value retrievable with `GetMessageExtraInfo`.
    pub extra_info: usize,
}

/// Input from a device other than keyboard or mouse, laid out like
/// `HARDWAREINPUT`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HardwareInput {
    /// The message generated by the device.
    pub msg: u32,
    /// Low word of the message's `lParam`.
    pub param_low: u16,
    /// High word of the message's `lParam`.
    pub param_high: u16,
}

/// One synthesized input event for [`send_input`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    /// A mouse event.
    Mouse(MouseInput),
    /// A keyboard event.
    Keyboard(KeyboardInput),
    /// A hardware event.
    Hardware(HardwareInput),
}

const KEYEVENTF_KEYUP: u32 = 0x0002;
const KEYEVENTF_UNICODE: u32 = 0x0004;
const MOUSEEVENTF_MOVE: u32 = 0x0001;
const MOUSEEVENTF_ABSOLUTE: u32 = 0x8000;

impl Input {
    /// A virtual-key press.
    pub fn key_down(vk: u16) -> Self {
        Input::Keyboard(KeyboardInput {
            vk,
            ..Default::default()
        })
    }

    /// A virtual-key release.
    pub fn key_up(vk: u16) -> Self {
        Input::Keyboard(KeyboardInput {
            vk,
            flags: KEYEVENTF_KEYUP,
            ..Default::default()
        })
    }

    /// Press and release events typing `text`, one UTF-16 unit at a time.
    pub fn text(text: &str) -> Vec<Self> {
        text.encode_utf16()
            .flat_map(|unit| {
                let down = KeyboardInput {
                    scan: unit,
                    flags: KEYEVENTF_UNICODE,
                    ..Default::default()
                };
                let up = KeyboardInput {
                    flags: KEYEVENTF_UNICODE | KEYEVENTF_KEYUP,
                    ..down
                };
                [Input::Keyboard(down), Input::Keyboard(up)]
            })
            .collect()
    }

    /// Mouse motion by `(dx, dy)` mickeys, or to normalized `(0..=65535)`
    /// coordinates when `absolute`.
    pub fn mouse_move(dx: i32, dy: i32, absolute: bool) -> Self {
        let flags = if absolute {
            MOUSEEVENTF_MOVE | MOUSEEVENTF_ABSOLUTE
        } else {
            MOUSEEVENTF_MOVE
        };
        Input::Mouse(MouseInput {
            dx,
            dy,
            flags,
            ..Default::default()
        })
    }

    /// Decodes an OS `INPUT` record.
    ///
    /// # Panics
    ///
    /// Panics if the record's tag is not mouse, keyboard or hardware.
    pub fn from_native(input: &INPUT) -> Self {
        // SAFETY: RawInput has the layout of INPUT.
        let raw = unsafe { &*(input as *const INPUT as *const RawInput) };
        raw.decode()
    }

    fn to_raw(self) -> RawInput {
        match self {
            Input::Mouse(mouse) => RawInput {
                kind: INPUT_MOUSE,
                payload: RawPayload { mouse },
            },
            Input::Keyboard(keyboard) => RawInput {
                kind: INPUT_KEYBOARD,
                payload: RawPayload { keyboard },
            },
            Input::Hardware(hardware) => RawInput {
                kind: INPUT_HARDWARE,
                payload: RawPayload { hardware },
            },
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy)]
union RawPayload {
    mouse: MouseInput,
    keyboard: KeyboardInput,
    hardware: HardwareInput,
}

/// The OS `INPUT` record: a tag followed by a pointer-aligned union.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RawInput {
    kind: u32,
    payload: RawPayload,
}

impl RawInput {
    fn decode(&self) -> Input {
        // SAFETY: the tag selects the initialized union member.
        unsafe {
            match self.kind {
                INPUT_MOUSE => Input::Mouse(self.payload.mouse),
                INPUT_KEYBOARD => Input::Keyboard(self.payload.keyboard),
                INPUT_HARDWARE => Input::Hardware(self.payload.hardware),
                other => panic!("unknown input type {other}"),
            }
        }
    }
}

/// Synthesizes `inputs` in order. Returns how many were inserted; fewer than
/// `inputs.len()` means the stream was blocked (see `last_error`).
pub fn send_input(inputs: &[Input]) -> u32 {
    if inputs.is_empty() {
        return 0;
    }
    let raw: Vec<RawInput> = inputs.iter().map(|input| input.to_raw()).collect();

    // SAFETY: raw holds raw.len() initialized INPUT-layout records.
    unsafe {
        (User32::get().send_input)(
            raw.len() as u32,
            raw.as_ptr(),
            std::mem::size_of::<RawInput>() as i32,
        )
    }
}

/// Asynchronous key state from [`get_async_key_state`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyState {
    /// The key is down now.
    pub down: bool,
    /// The key was pressed since the previous query. Unreliable when other
    /// processes also poll.
    pub pressed_since_last: bool,
}

impl KeyState {
    fn from_raw(raw: i16) -> Self {
        Self {
            down: raw < 0,
            pressed_since_last: raw & 1 != 0,
        }
    }
}

/// Returns the physical state of a virtual key.
pub fn get_async_key_state(vk: i32) -> KeyState {
    // SAFETY: GetAsyncKeyState takes a plain integer.
    KeyState::from_raw(unsafe { (User32::get().get_async_key_state)(vk) })
}

/// Snapshot of all 256 virtual keys for the calling thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyboardState(pub [u8; 256]);

impl Default for KeyboardState {
    fn default() -> Self {
        Self([0; 256])
    }
}

impl KeyboardState {
    /// The key was down when the snapshot was taken.
    pub fn is_down(&self, vk: u8) -> bool {
        self.0[vk as usize] & 0x80 != 0
    }

    /// The key (e.g. Caps Lock) is toggled on.
    pub fn is_toggled(&self, vk: u8) -> bool {
        self.0[vk as usize] & 0x01 != 0
    }
}

/// Copies the calling thread's keyboard state.
///
/// # Errors
///
/// Returns the OS error when the state cannot be read.
pub fn get_keyboard_state() -> Result<KeyboardState> {
    let mut state = KeyboardState::default();
    // SAFETY: the buffer holds the 256 bytes the OS writes.
    if from_native_bool(unsafe { (User32::get().get_keyboard_state)(state.0.as_mut_ptr()) }) {
        Ok(state)
    } else {
        Err(crate::error::last_error())
    }
}

/// Translation performed by [`map_virtual_key_ex`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum MapType {
    /// Virtual key to scan code.
    VkToVsc = 0,
    /// Scan code to virtual key, not distinguishing left and right keys.
    VscToVk = 1,
    /// Virtual key to unshifted character in the low word.
    VkToChar = 2,
    /// Scan code to virtual key, distinguishing left and right keys.
    VscToVkEx = 3,
    /// Virtual key to scan code, with the extended-key prefix.
    VkToVscEx = 4,
}

/// Translates between virtual keys, scan codes and characters using the
/// layout `layout` (null for the thread's current layout). Returns 0 when
/// there is no translation.
pub fn map_virtual_key_ex(code: u32, map: MapType, layout: HKL) -> u32 {
    // SAFETY: MapVirtualKeyExW takes plain values.
    unsafe { (User32::get().map_virtual_key_ex)(code, map as u32, layout) }
}

/// Outcome of [`to_ascii`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToAsciiResult {
    /// The key has no character translation.
    None,
    /// One character.
    Char(u16),
    /// A dead key (accent) that will combine with the next key.
    Dead,
    /// Two characters: a dead key that could not combine, then this key.
    Two(u16, u16),
}

impl ToAsciiResult {
    fn from_raw(ret: i32, chars: [u16; 2]) -> Self {
        match ret {
            1 => ToAsciiResult::Char(chars[0]),
            2 => ToAsciiResult::Two(chars[0], chars[1]),
            r if r < 0 => ToAsciiResult::Dead,
            _ => ToAsciiResult::None,
        }
    }
}

/// Translates a virtual key and scan code into characters using the
/// current layout and `state`.
pub fn to_ascii(vk: u32, scan_code: u32, state: &KeyboardState, menu_active: bool) -> ToAsciiResult {
    let mut chars = [0u16; 2];
    // SAFETY: state holds 256 bytes and chars has room for two characters.
    let ret = unsafe {
        (User32::get().to_ascii)(vk, scan_code, state.0.as_ptr(), chars.as_mut_ptr(), menu_active as u32)
    };
    ToAsciiResult::from_raw(ret, chars)
}

/// Cursor position in screen coordinates.
pub fn get_cursor_pos() -> Option<Point> {
    let mut pt = Point::default();
    // SAFETY: pt is a writable POINT-layout value.
    from_native_bool(unsafe { (User32::get().get_cursor_pos)(&mut pt) }).then_some(pt)
}

/// Moves the cursor to screen coordinates `(x, y)`.
pub fn set_cursor_pos(x: i32, y: i32) -> bool {
    // SAFETY: SetCursorPos takes plain integers.
    from_native_bool(unsafe { (User32::get().set_cursor_pos)(x, y) })
}

/// Swaps (or restores) the left and right mouse buttons. Returns true if
/// they were swapped before the call.
pub fn swap_mouse_button(swap: bool) -> bool {
    // SAFETY: SwapMouseButton takes a plain value.
    from_native_bool(unsafe { (User32::get().swap_mouse_button)(to_native_bool(swap)) })
}

/// Captures the mouse for `hwnd`, returning the previous capture window.
pub fn set_capture(hwnd: HWND) -> Option<HWND> {
    // SAFETY: SetCapture validates the handle.
    unsafe { (User32::get().set_capture)(hwnd) }.non_null()
}

/// Releases mouse capture held by a window of this thread.
pub fn release_capture() -> bool {
    // SAFETY: ReleaseCapture takes no arguments.
    from_native_bool(unsafe { (User32::get().release_capture)() })
}

/// Gives keyboard focus to `hwnd`, returning the window that had it.
pub fn set_focus(hwnd: HWND) -> Option<HWND> {
    // SAFETY: SetFocus validates the handle.
    unsafe { (User32::get().set_focus)(hwnd) }.non_null()
}

/// Mouse capture held by a window, released when dropped.
pub struct MouseCapture {
    previous: Option<HWND>,
    _not_send: PhantomData<*const ()>,
}

impl MouseCapture {
    /// Captures the mouse for `hwnd`.
    pub fn set(hwnd: HWND) -> Self {
        Self {
            previous: set_capture(hwnd),
            _not_send: PhantomData,
        }
    }

    /// The window that held capture before.
    pub fn previous(&self) -> Option<HWND> {
        self.previous
    }
}

impl Drop for MouseCapture {
    fn drop(&mut self) {
        if !release_capture() {
            tracing::warn!(error = %crate::error::last_error(), "ReleaseCapture failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use windows::Win32::UI::Input::KeyboardAndMouse::INPUT_TYPE;

    #[test]
    fn test_raw_input_matches_os_layout() {
        assert_eq!(std::mem::size_of::<RawInput>(), std::mem::size_of::<INPUT>());
        assert_eq!(std::mem::align_of::<RawInput>(), std::mem::align_of::<INPUT>());
        #[cfg(target_pointer_width = "64")]
        assert_eq!(std::mem::size_of::<RawInput>(), 40);
        #[cfg(target_pointer_width = "32")]
        assert_eq!(std::mem::size_of::<RawInput>(), 28);
    }

    #[test]
    fn test_from_native_decodes_tag() {
        let key = Input::key_up(0x41);
        let raw = key.to_raw();
        // SAFETY: RawInput has the layout of INPUT.
        let native = unsafe { &*(&raw as *const RawInput as *const INPUT) };
        assert_eq!(Input::from_native(native), key);

        let hardware = Input::Hardware(HardwareInput {
            msg: 0x0400,
            param_low: 1,
            param_high: 2,
        });
        let raw = hardware.to_raw();
        let native = unsafe { &*(&raw as *const RawInput as *const INPUT) };
        assert_eq!(Input::from_native(native), hardware);
    }

    #[test]
    #[should_panic(expected = "unknown input type 7")]
    fn test_from_native_unknown_tag_panics() {
        // SAFETY: INPUT is plain data.
        let mut native: INPUT = unsafe { std::mem::zeroed() };
        native.r#type = INPUT_TYPE(7);
        Input::from_native(&native);
    }

    #[test]
    fn test_text_input_pairs() {
        let events = Input::text("hé");
        assert_eq!(events.len(), 4);
        assert!(matches!(events[1], Input::Keyboard(k) if k.flags & KEYEVENTF_KEYUP != 0 && k.scan == 'h' as u16));
        assert!(matches!(events[2], Input::Keyboard(k) if k.scan == 'é' as u16));
    }

    #[test]
    fn test_send_empty_input() {
        assert_eq!(send_input(&[]), 0);
    }

    #[test]
    fn test_key_state_bits() {
        assert_eq!(
            KeyState::from_raw(i16::MIN | 1),
            KeyState {
                down: true,
                pressed_since_last: true
            }
        );
        assert_eq!(KeyState::from_raw(0), KeyState::default());
    }

    #[test]
    fn test_to_ascii_result_codes() {
        assert_eq!(ToAsciiResult::from_raw(0, [0, 0]), ToAsciiResult::None);
        assert_eq!(ToAsciiResult::from_raw(1, [0x61, 0]), ToAsciiResult::Char(0x61));
        assert_eq!(ToAsciiResult::from_raw(2, [0x60, 0x61]), ToAsciiResult::Two(0x60, 0x61));
        assert_eq!(ToAsciiResult::from_raw(-1, [0x60, 0]), ToAsciiResult::Dead);
    }

    #[test]
    fn test_keyboard_layout_translation() {
        // Escape is scan code 1 on every layout.
        assert_eq!(map_virtual_key_ex(0x1B, MapType::VkToVsc, HKL::default()), 1);

        let state = get_keyboard_state().unwrap();
        assert_eq!(to_ascii(0x20, 0x39, &state, false), ToAsciiResult::Char(b' ' as u16));
    }

    #[test]
    fn test_keyboard_state_bits() {
        let mut state = KeyboardState::default();
        state.0[0x14] = 0x01;
        state.0[0x10] = 0x80;
        assert!(state.is_toggled(0x14));
        assert!(!state.is_down(0x14));
        assert!(state.is_down(0x10));
    }

    #[test]
    fn test_cursor_position_is_readable() {
        assert!(get_cursor_pos().is_some());
    }
}
