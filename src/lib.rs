//! Area Chrome
//!
//! Borderless window chrome for a compositing window manager: the native
//! title bar is removed and redrawn, while resize-by-edge, snap-to-maximize,
//! auto-hide taskbar access, full-screen detection and translucent backdrops
//! keep working.
//!
//! The platform is reached only through `platform::Platform` and
//! `platform::EffectsProvider`; `platform::win32` is the native backend and
//! `platform::sim` an in-memory one.

pub mod config;
pub mod effects;
pub mod error;
pub mod platform;
pub mod shared;
pub mod theme;
pub mod titlebar;
pub mod window;
pub mod wm;

pub use config::{BackdropMode, ChromeConfig, ChromeSettings, ThemeMode};
pub use error::ConfigError;
pub use platform::{EffectsProvider, Platform, RawMessage, WindowHandle, WindowMessage};
pub use window::{ChromeWindow, Outcome};
