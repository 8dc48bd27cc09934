//! Small tour of the ergonomic-user32 bindings.
//!
//! Run with `cargo run --features demo`.

use ergonomic_user32::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    info!("ergonomic-user32 demo v{}", env!("CARGO_PKG_VERSION"));

    let a = Rect::new(0, 0, 100, 50);
    let b = Rect::new(60, 10, 160, 40);
    info!(?a, ?b, union = ?a.union(&b), intersect = ?a.intersect(&b), "rectangle algebra");

    let wide = to_wide("user32 ✓");
    info!(units = wide.len(), back = %from_wide(&wide)?, "wide string round trip");

    #[cfg(windows)]
    desktop_tour()?;

    #[cfg(not(windows))]
    info!("the user32 bindings require Windows; only portable helpers ran");

    Ok(())
}

#[cfg(windows)]
fn desktop_tour() -> Result<()> {
    use ergonomic_user32::input::get_cursor_pos;
    use ergonomic_user32::monitor::{enum_display_monitors, enum_display_settings_ex, get_monitor_info, ModeIndex};
    use windows::Win32::Graphics::Gdi::HDC;

    let table = User32::try_get()?;
    info!(symbols = User32::SYMBOLS.len(), table = ?(table as *const User32), "user32 resolved");

    for entry in enum_display_monitors(HDC::default(), None)? {
        let monitor = get_monitor_info(entry.monitor)?;
        info!(
            device = %monitor.device,
            primary = monitor.primary,
            width = monitor.monitor.width(),
            height = monitor.monitor.height(),
            "monitor"
        );
    }

    if let Some(mode) = enum_display_settings_ex(None, ModeIndex::Current, 0) {
        info!(?mode, "current display mode");
    }

    if let Some(pt) = get_cursor_pos() {
        info!(x = pt.x, y = pt.y, "cursor position");
    }

    Ok(())
}
