//! # Ergonomic user32
//!
//! Typed bindings for the Windows windowing and input API in `user32.dll`.
//!
//! Every binding calls through a table of entry points that is resolved once,
//! on first use, and shared by all threads. On top of the raw calls the crate
//! offers a few RAII helpers for the calls that must be paired:
//!
//! - **Windows**: [`window::WindowBuilder`] registers a class, creates a
//!   window and routes its messages to a [`window::MessageHandler`]
//! - **Message loop**: [`message::run_message_loop`], [`message::process_messages`]
//! - **Painting**: [`paint::WindowDc`], [`paint::PaintSession`]
//! - **Clipboard**: [`clipboard::Clipboard`]
//! - **Mouse capture**: [`input::MouseCapture`]
//!
//! Rectangle algebra in [`geometry`], the UTF-16 helpers in [`string`] and
//! the error types compile on every platform; everything that talks to the
//! OS is only available on Windows.
//!
//! ## Quick Start
//!
//! ```no_run
//! # #[cfg(windows)]
//! # fn main() -> ergonomic_user32::Result<()> {
//! use ergonomic_user32::prelude::*;
//!
//! let window = WindowBuilder::new()
//!     .title("Hello")
//!     .size(640, 480)
//!     .build(DefaultHandler)?;
//! window.show(ShowCommand::NORMAL);
//!
//! let code = run_message_loop();
//! # let _ = code;
//! # Ok(())
//! # }
//! # #[cfg(not(windows))]
//! # fn main() {}
//! ```
//!
//! ## Rectangles
//!
//! ```
//! use ergonomic_user32::geometry::{Point, Rect};
//!
//! let a = Rect::new(0, 0, 100, 50);
//! let b = Rect::new(50, 25, 150, 75);
//! assert_eq!(a.intersect(&b), Some(Rect::new(50, 25, 100, 50)));
//! assert!(a.contains(Point::new(0, 0)));
//! assert!(!a.contains(Point::new(100, 50)));
//! ```

#![warn(missing_docs)]

// Portable modules
pub mod error;
pub mod geometry;
pub mod string;

// OS bindings
#[cfg(windows)]
pub mod class;
#[cfg(windows)]
pub mod clipboard;
#[cfg(windows)]
pub mod dialog;
#[cfg(windows)]
pub mod handle;
#[cfg(windows)]
pub mod input;
#[cfg(windows)]
pub mod marshal;
#[cfg(windows)]
pub mod message;
#[cfg(windows)]
pub mod module;
#[cfg(windows)]
pub mod monitor;
#[cfg(windows)]
pub mod paint;
#[cfg(windows)]
pub mod user32;
#[cfg(windows)]
pub mod window;

pub use error::{Error, Result};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::string::{from_wide, to_wide, WideString};

    #[cfg(windows)]
    pub use crate::{
        clipboard::Clipboard,
        error::ResultExt,
        handle::HandleExt,
        input::{Input, MouseCapture},
        message::{run_message_loop, process_messages, Message, Received},
        monitor::{MonitorDefault, MonitorInfo},
        paint::{PaintSession, WindowDc},
        user32::User32,
        window::{
            DefaultHandler, ExStyle, MessageHandler, ShowCommand, Style, Window, WindowBuilder,
        },
    };
}
