//! Display monitors and display modes.

use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};
use crate::handle::HandleExt;
use crate::marshal::from_native_bool;
use crate::string::{from_wide, optional_wide, WideString};
use crate::user32::User32;
use std::fmt;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{BOOL, HWND, LPARAM};
use windows::Win32::Graphics::Gdi::{
    DEVMODEW, DEVMODE_FIELD_FLAGS, DM_BITSPERPEL, DM_DISPLAYFREQUENCY, DM_PELSHEIGHT, DM_PELSWIDTH,
    HDC, HMONITOR, MONITORINFO, MONITORINFOEXW,
};

/// Callback type for `EnumDisplayMonitors`.
pub type MonitorEnumProc = Option<unsafe extern "system" fn(HMONITOR, HDC, *mut Rect, LPARAM) -> BOOL>;

const MONITORINFOF_PRIMARY: u32 = 1;

/// One monitor reported by [`enum_display_monitors`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonitorEntry {
    /// The monitor.
    pub monitor: HMONITOR,
    /// A device context clipped to the monitor, or null when enumerating
    /// without one.
    pub hdc: HDC,
    /// Monitor rectangle: in virtual-screen coordinates without a device
    /// context, else in device-context coordinates clipped to the clip area.
    pub rect: Rect,
}

struct EnumContext<'a> {
    callback: &'a mut dyn FnMut(MonitorEntry) -> bool,
    stopped: bool,
}

unsafe extern "system" fn enum_trampoline(
    monitor: HMONITOR,
    hdc: HDC,
    rect: *mut Rect,
    data: LPARAM,
) -> BOOL {
    // SAFETY: data is the EnumContext passed by enum_display_monitors_with,
    // alive for the whole enumeration.
    let context = &mut *(data.0 as *mut EnumContext<'_>);
    let rect = if rect.is_null() { Rect::default() } else { *rect };

    let keep_going = (context.callback)(MonitorEntry { monitor, hdc, rect });
    if !keep_going {
        context.stopped = true;
    }
    BOOL::from(keep_going)
}

/// Calls `callback` for each monitor intersecting `clip` (and the visible
/// area of `hdc`, when given). Return `false` from the callback to stop.
///
/// The callback must not panic.
///
/// # Errors
///
/// Returns the OS error when enumeration fails for a reason other than the
/// callback stopping it.
pub fn enum_display_monitors_with<F>(hdc: HDC, clip: Option<&Rect>, mut callback: F) -> Result<()>
where
    F: FnMut(MonitorEntry) -> bool,
{
    let mut context = EnumContext {
        callback: &mut callback,
        stopped: false,
    };
    let clip = clip.map_or(std::ptr::null(), |r| r as *const Rect);

    // SAFETY: the context outlives the call and the trampoline casts it back
    // to the same type.
    let ok = unsafe {
        (User32::get().enum_display_monitors)(
            hdc,
            clip,
            Some(enum_trampoline),
            LPARAM(&mut context as *mut EnumContext<'_> as isize),
        )
    };
    if from_native_bool(ok) || context.stopped {
        Ok(())
    } else {
        Err(crate::error::last_error())
    }
}

/// Lists the monitors intersecting `clip` (and the visible area of `hdc`).
///
/// # Errors
///
/// Returns the OS error when enumeration fails.
pub fn enum_display_monitors(hdc: HDC, clip: Option<&Rect>) -> Result<Vec<MonitorEntry>> {
    let mut monitors = Vec::new();
    enum_display_monitors_with(hdc, clip, |entry| {
        monitors.push(entry);
        true
    })?;
    Ok(monitors)
}

/// What the `MonitorFrom*` functions return when nothing matches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u32)]
pub enum MonitorDefault {
    /// No monitor.
    #[default]
    Null = 0,
    /// The primary monitor.
    Primary = 1,
    /// The closest monitor.
    Nearest = 2,
}

/// The monitor containing `pt`.
pub fn monitor_from_point(pt: Point, default: MonitorDefault) -> Option<HMONITOR> {
    // SAFETY: MonitorFromPoint takes plain values.
    unsafe { (User32::get().monitor_from_point)(pt, default as u32) }.non_null()
}

/// The monitor with the largest intersection with `rect`.
pub fn monitor_from_rect(rect: &Rect, default: MonitorDefault) -> Option<HMONITOR> {
    // SAFETY: rect is a readable RECT-layout value.
    unsafe { (User32::get().monitor_from_rect)(rect, default as u32) }.non_null()
}

/// The monitor with the largest intersection with the window's bounds.
pub fn monitor_from_window(hwnd: HWND, default: MonitorDefault) -> Option<HMONITOR> {
    // SAFETY: MonitorFromWindow validates the handle.
    unsafe { (User32::get().monitor_from_window)(hwnd, default as u32) }.non_null()
}

/// Monitor geometry and identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonitorInfo {
    /// Monitor rectangle in virtual-screen coordinates.
    pub monitor: Rect,
    /// Work area (excluding taskbars and docked bars).
    pub work: Rect,
    /// This is the primary monitor.
    pub primary: bool,
    /// Device name, e.g. `\\.\DISPLAY1`.
    pub device: String,
}

/// Queries a monitor's rectangles, flags and device name.
///
/// # Errors
///
/// Returns the OS error for an invalid monitor handle.
pub fn get_monitor_info(monitor: HMONITOR) -> Result<MonitorInfo> {
    let mut info = MONITORINFOEXW::default();
    info.monitorInfo.cbSize = std::mem::size_of::<MONITORINFOEXW>() as u32;

    // SAFETY: cbSize tells the OS the structure is the extended form.
    let ok = unsafe {
        (User32::get().get_monitor_info)(monitor, &mut info as *mut MONITORINFOEXW as *mut MONITORINFO)
    };
    if !from_native_bool(ok) {
        return Err(crate::error::last_error());
    }

    Ok(MonitorInfo {
        monitor: info.monitorInfo.rcMonitor.into(),
        work: info.monitorInfo.rcWork.into(),
        primary: info.monitorInfo.dwFlags & MONITORINFOF_PRIMARY != 0,
        device: from_wide(&info.szDevice)?,
    })
}

/// Which mode [`enum_display_settings_ex`] reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeIndex {
    /// The mode in use.
    Current,
    /// The mode stored in the registry.
    Registry,
    /// The n-th supported mode.
    Index(u32),
}

impl ModeIndex {
    fn to_raw(self) -> u32 {
        match self {
            ModeIndex::Current => u32::MAX,
            ModeIndex::Registry => u32::MAX - 1,
            ModeIndex::Index(n) => n,
        }
    }
}

/// A display mode (`DEVMODEW`).
#[derive(Clone, Copy)]
pub struct DisplayMode(DEVMODEW);

impl Default for DisplayMode {
    fn default() -> Self {
        let mut mode = DEVMODEW::default();
        mode.dmSize = std::mem::size_of::<DEVMODEW>() as u16;
        Self(mode)
    }
}

impl DisplayMode {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.0.dmPelsWidth
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.0.dmPelsHeight
    }

    /// Color depth.
    pub fn bits_per_pixel(&self) -> u32 {
        self.0.dmBitsPerPel
    }

    /// Refresh rate in hertz; 0 or 1 means the hardware default.
    pub fn frequency(&self) -> u32 {
        self.0.dmDisplayFrequency
    }

    /// Sets the resolution and marks it for [`change_display_settings_ex`].
    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.0.dmPelsWidth = width;
        self.0.dmPelsHeight = height;
        self.0.dmFields |= DM_PELSWIDTH | DM_PELSHEIGHT;
    }

    /// Sets the color depth and marks it for [`change_display_settings_ex`].
    pub fn set_bits_per_pixel(&mut self, bits: u32) {
        self.0.dmBitsPerPel = bits;
        self.0.dmFields |= DM_BITSPERPEL;
    }

    /// Sets the refresh rate and marks it for [`change_display_settings_ex`].
    pub fn set_frequency(&mut self, hertz: u32) {
        self.0.dmDisplayFrequency = hertz;
        self.0.dmFields |= DM_DISPLAYFREQUENCY;
    }

    /// Clears the list of fields to apply.
    pub fn clear_fields(&mut self) {
        self.0.dmFields = DEVMODE_FIELD_FLAGS(0);
    }

    /// The underlying structure.
    pub fn as_native(&self) -> &DEVMODEW {
        &self.0
    }
}

impl fmt::Debug for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayMode")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("bits_per_pixel", &self.bits_per_pixel())
            .field("frequency", &self.frequency())
            .finish()
    }
}

/// Reports a display mode of `device` (the primary display for `None`).
///
/// Returns `None` past the last supported mode or for an unknown device.
pub fn enum_display_settings_ex(device: Option<&str>, index: ModeIndex, flags: u32) -> Option<DisplayMode> {
    let device = optional_wide(device);
    let mut mode = DisplayMode::default();

    // SAFETY: dmSize is set and the device name is null or valid.
    let ok = unsafe {
        (User32::get().enum_display_settings_ex)(
            device.as_ref().map_or(PCWSTR::null(), WideString::as_pcwstr),
            index.to_raw(),
            &mut mode.0,
            flags,
        )
    };
    from_native_bool(ok).then_some(mode)
}

/// Result code of [`change_display_settings_ex`] (`DISP_CHANGE_*`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayChange {
    /// The change took effect.
    Successful,
    /// The computer must restart for the change to take effect.
    Restart,
    /// The driver failed the mode.
    Failed,
    /// The mode is not supported.
    BadMode,
    /// The settings could not be written to the registry.
    NotUpdated,
    /// Invalid flags.
    BadFlags,
    /// Invalid parameter.
    BadParam,
    /// The system is DualView capable and the mode was rejected.
    BadDualView,
}

impl DisplayChange {
    /// Maps a `DISP_CHANGE_*` code.
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => DisplayChange::Successful,
            1 => DisplayChange::Restart,
            -1 => DisplayChange::Failed,
            -2 => DisplayChange::BadMode,
            -3 => DisplayChange::NotUpdated,
            -4 => DisplayChange::BadFlags,
            -5 => DisplayChange::BadParam,
            -6 => DisplayChange::BadDualView,
            _ => return None,
        })
    }

    /// The change was accepted (possibly pending a restart).
    pub fn is_success(self) -> bool {
        matches!(self, DisplayChange::Successful | DisplayChange::Restart)
    }
}

impl fmt::Display for DisplayChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DisplayChange::Successful => "display change successful",
            DisplayChange::Restart => "restart required",
            DisplayChange::Failed => "driver failed the mode",
            DisplayChange::BadMode => "mode not supported",
            DisplayChange::NotUpdated => "settings not written to the registry",
            DisplayChange::BadFlags => "invalid flags",
            DisplayChange::BadParam => "invalid parameter",
            DisplayChange::BadDualView => "mode rejected on a DualView system",
        };
        f.write_str(text)
    }
}

/// `CDS_TEST`: validate the mode without applying it.
pub const CDS_TEST: u32 = 0x0000_0002;

/// Changes the mode of `device` (the primary display for `None`). `None`
/// for `mode` restores the registry mode. `flags` are the `CDS_*` values.
///
/// # Errors
///
/// Returns [`Error::Custom`] describing the failure code when the change is
/// rejected.
pub fn change_display_settings_ex(
    device: Option<&str>,
    mode: Option<&DisplayMode>,
    flags: u32,
) -> Result<DisplayChange> {
    let device = optional_wide(device);
    let mode = mode.map_or(std::ptr::null(), |m| &m.0 as *const DEVMODEW);

    // SAFETY: the mode is null or a DEVMODEW with dmSize set.
    let code = unsafe {
        (User32::get().change_display_settings_ex)(
            device.as_ref().map_or(PCWSTR::null(), WideString::as_pcwstr),
            mode,
            HWND::default(),
            flags,
            std::ptr::null(),
        )
    };

    match DisplayChange::from_code(code) {
        Some(change) if change.is_success() => Ok(change),
        Some(change) => Err(Error::custom(format!("ChangeDisplaySettingsExW: {change}"))),
        None => Err(Error::custom(format!("ChangeDisplaySettingsExW: unknown result {code}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumerate_and_describe_monitors() {
        let monitors = enum_display_monitors(HDC::default(), None).unwrap();
        assert!(!monitors.is_empty());

        let infos: Vec<_> = monitors
            .iter()
            .map(|entry| get_monitor_info(entry.monitor).unwrap())
            .collect();
        assert_eq!(infos.iter().filter(|info| info.primary).count(), 1);
        for (entry, info) in monitors.iter().zip(&infos) {
            assert_eq!(entry.rect, info.monitor);
            assert!(info.monitor.intersect(&info.work).is_some());
            assert!(info.device.starts_with(r"\\.\"));
        }
    }

    #[test]
    fn test_callback_can_stop_early() {
        let mut calls = 0;
        enum_display_monitors_with(HDC::default(), None, |_| {
            calls += 1;
            false
        })
        .unwrap();
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_origin_is_on_primary_monitor() {
        let monitor = monitor_from_point(Point::new(0, 0), MonitorDefault::Null).unwrap();
        assert!(get_monitor_info(monitor).unwrap().primary);

        let far = Point::new(-1_000_000, -1_000_000);
        assert!(monitor_from_point(far, MonitorDefault::Null).is_none());
        assert!(monitor_from_point(far, MonitorDefault::Nearest).is_some());
        assert_eq!(
            monitor_from_rect(&Rect::new(0, 0, 1, 1), MonitorDefault::Null),
            Some(monitor)
        );
        assert!(monitor_from_window(HWND::default(), MonitorDefault::Null).is_none());
    }

    #[test]
    fn test_current_mode_passes_validation() {
        let current = enum_display_settings_ex(None, ModeIndex::Current, 0).unwrap();
        assert!(current.width() > 0 && current.height() > 0);

        let mut mode = current;
        mode.clear_fields();
        mode.set_resolution(current.width(), current.height());
        assert_eq!(
            change_display_settings_ex(None, Some(&mode), CDS_TEST).unwrap(),
            DisplayChange::Successful
        );
    }

    #[test]
    fn test_past_last_mode_is_none() {
        assert!(enum_display_settings_ex(None, ModeIndex::Index(100_000), 0).is_none());
        assert!(enum_display_settings_ex(Some(r"\\.\NoSuchDisplay"), ModeIndex::Current, 0).is_none());
    }

    #[test]
    fn test_display_change_codes() {
        assert_eq!(DisplayChange::from_code(0), Some(DisplayChange::Successful));
        assert_eq!(DisplayChange::from_code(-6), Some(DisplayChange::BadDualView));
        assert_eq!(DisplayChange::from_code(-7), None);
        assert!(DisplayChange::Restart.is_success());
        assert!(!DisplayChange::BadMode.is_success());
    }
}
