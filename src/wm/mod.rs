//! Window Manager Module
//!
//! Non-client area interception: what the window manager asks while laying
//! out and hit testing a borderless window, and the answers we give.

pub mod frame;
pub mod hit_test;
pub mod probe;
pub mod taskbar;

pub use frame::{FrameState, WVR_REDRAW};
pub use hit_test::{HitRegion, HitTestRouter, MaxButtonOutcome};
pub use taskbar::TaskbarEdge;
