//! Title Bar Module
//!
//! The custom-drawn strip that replaces the native caption.

pub mod bar;
pub mod button;

pub use bar::{TITLE_BAR_HEIGHT, TitleBar, TitleBarAction};
pub use button::{ButtonKind, ButtonState, MouseButton, TitleBarButton};
