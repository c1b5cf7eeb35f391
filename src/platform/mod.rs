//! Platform Module
//!
//! The seam between the chrome logic and the host window manager. Everything
//! the chrome needs from the outside world (placement queries, monitor
//! layout, shell app-bar state, timers, effect calls) goes through the
//! `Platform` and `EffectsProvider` traits so the frame and hit-test logic
//! stays a pure function of what the platform reports.

pub mod sim;
#[cfg(windows)]
pub mod win32;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::shared::{Point, Rect};
use crate::theme::Rgba;

/// Opaque identifier of a top-level window; never owned by the chrome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowHandle(pub isize);

/// Show state from the window placement record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowState {
    Normal,
    Minimized,
    Maximized,
}

/// Show-state change requested by the chrome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowCommand {
    Minimize,
    Maximize,
    Restore,
}

/// Which monitor to fall back to when the window does not intersect one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorFallback {
    Primary,
    Nearest,
}

/// A screen edge an app-bar can be docked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenEdge {
    Left,
    Top,
    Right,
    Bottom,
}

impl ScreenEdge {
    /// Probe order for app-bar lookups
    pub const PROBE_ORDER: [ScreenEdge; 4] = [Self::Left, Self::Top, Self::Right, Self::Bottom];
}

/// Snapshot of one monitor; re-queried per event, never cached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorInfo {
    /// Full monitor bounds
    pub monitor: Rect,
    /// Monitor bounds minus docked app-bars
    pub work_area: Rect,
    pub primary: bool,
}

/// Identifier of a per-window platform timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub usize);

/// Queries and commands the chrome issues against the host window manager.
///
/// Query failures are reported as `None`; callers turn them into safe
/// defaults rather than errors.
pub trait Platform {
    /// Show state of the window placement record
    fn show_state(&self, handle: WindowHandle) -> Option<ShowState>;

    /// Outer window rectangle in screen coordinates
    fn window_rect(&self, handle: WindowHandle) -> Option<Rect>;

    /// Geometry of the toolkit's top-level widget in physical screen pixels,
    /// the same space as hit-test cursors. Divide by `device_pixel_ratio` for
    /// logical units. `None` while the toolkit window is not realized.
    fn widget_geometry(&self, handle: WindowHandle) -> Option<Rect>;

    fn monitor_info(&self, handle: WindowHandle, fallback: MonitorFallback) -> Option<MonitorInfo>;

    /// Device pixel ratio of the toolkit window; `None` while not realized
    fn device_pixel_ratio(&self, handle: WindowHandle) -> Option<f64>;

    /// System resize-frame thickness plus padded border, in physical pixels
    fn frame_thickness_metric(&self) -> i32;

    /// Whether desktop composition is enabled
    fn composition_enabled(&self) -> bool;

    /// Whether the shell reports the taskbar in auto-hide mode
    fn app_bar_auto_hide(&self) -> bool;

    /// Whether an auto-hide app-bar occupies `edge` of the given monitor
    fn app_bar_on_edge(&self, edge: ScreenEdge, monitor: Rect) -> bool;

    /// Persisted user preference for dark apps; `None` if unreadable
    fn prefers_dark_theme(&self) -> Option<bool>;

    /// OS build number used to pick the modern platform variant
    fn os_build_number(&self) -> u32;

    fn show(&mut self, handle: WindowHandle, command: ShowCommand);

    fn close(&mut self, handle: WindowHandle);

    /// Hand the pointer to the native move loop (caption drag, snapping)
    fn begin_native_move(&mut self, handle: WindowHandle);

    fn request_repaint(&mut self, handle: WindowHandle);

    fn set_title(&mut self, handle: WindowHandle, title: &str);

    /// Arm a timer that delivers `WindowMessage::Timer(id)` after `delay`.
    /// Arming an id that is already armed replaces it.
    fn set_timer(&mut self, handle: WindowHandle, id: TimerId, delay: Duration);

    fn kill_timer(&mut self, handle: WindowHandle, id: TimerId);
}

/// Opaque compositor effects keyed by window handle. Calls are best effort;
/// nothing verifies that an effect actually rendered.
pub trait EffectsProvider {
    /// Open/close animation
    fn add_window_animation(&mut self, handle: WindowHandle);

    fn add_blur_behind(&mut self, handle: WindowHandle);

    fn add_shadow(&mut self, handle: WindowHandle);

    fn add_mica(&mut self, handle: WindowHandle, dark_mode: bool);

    fn add_acrylic(&mut self, handle: WindowHandle, tint: Rgba);

    fn remove_background(&mut self, handle: WindowHandle);
}

/// Platform window messages the chrome cares about, already decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMessage {
    /// Compute the client area. `rect` is the proposed client rectangle and
    /// is rewritten in place; `calc_valid_rects` is set when the calculation
    /// comes from a size change rather than a plain move.
    NcCalcSize { calc_valid_rects: bool, rect: Rect },
    /// Classify the cursor (screen coordinates) into a frame region
    NcHitTest { cursor: Point },
    NcLButtonDown,
    NcLButtonUp,
    NcRButtonUp,
    NcMouseLeave,
    MouseLeave,
    Timer(TimerId),
    Destroy,
    /// Anything else; carries the raw message id for logging
    Other(u32),
}

/// A message as delivered by the pre-dispatch hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMessage {
    /// `None` when the platform delivered a message without a window
    pub handle: Option<WindowHandle>,
    pub message: WindowMessage,
}

impl RawMessage {
    pub fn new(handle: WindowHandle, message: WindowMessage) -> Self {
        Self { handle: Some(handle), message }
    }
}
