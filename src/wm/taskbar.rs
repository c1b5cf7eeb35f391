//! Taskbar Locator
//!
//! Finds out whether the shell taskbar auto-hides and which edge of the
//! window's monitor it is docked to. A maximized borderless window covers
//! the whole work area, so without a gap on that edge the auto-hide taskbar
//! could never be summoned.

use tracing::trace;

use crate::platform::{MonitorFallback, Platform, ScreenEdge, WindowHandle};

/// Gap left on the taskbar edge so the cursor can still reach it
pub const AUTO_HIDE_THICKNESS: i32 = 2;

/// Edge of the monitor occupied by the auto-hide taskbar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskbarEdge {
    Left,
    Top,
    Right,
    Bottom,
    None,
}

impl From<ScreenEdge> for TaskbarEdge {
    fn from(edge: ScreenEdge) -> Self {
        match edge {
            ScreenEdge::Left => Self::Left,
            ScreenEdge::Top => Self::Top,
            ScreenEdge::Right => Self::Right,
            ScreenEdge::Bottom => Self::Bottom,
        }
    }
}

/// Whether the shell reports the auto-hide state
pub fn is_auto_hide(platform: &impl Platform) -> bool {
    platform.app_bar_auto_hide()
}

/// Probe Left, Top, Right, Bottom on the window's nearest monitor; first hit
/// wins. Only one auto-hide taskbar is assumed.
pub fn locate(platform: &impl Platform, handle: WindowHandle) -> TaskbarEdge {
    let Some(info) = platform.monitor_info(handle, MonitorFallback::Nearest) else {
        trace!("taskbar: no monitor for {:?}", handle);
        return TaskbarEdge::None;
    };

    ScreenEdge::PROBE_ORDER
        .into_iter()
        .find(|edge| platform.app_bar_on_edge(*edge, info.monitor))
        .map(TaskbarEdge::from)
        .unwrap_or(TaskbarEdge::None)
}
