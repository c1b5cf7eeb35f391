//! Frame Adjuster
//!
//! Rewrites the client rectangle the window manager proposes while it
//! computes the non-client area. Left alone, the whole window is client
//! area (that is what removing the native frame means); the two exceptions
//! are a maximized window, where the window manager pads the frame back in,
//! and an auto-hide taskbar that needs a reachable gap.

use tracing::debug;

use crate::platform::{Platform, WindowHandle};
use crate::shared::Rect;
use crate::wm::probe;
use crate::wm::taskbar::{self, AUTO_HIDE_THICKNESS, TaskbarEdge};

/// "Redraw the whole client area" result of the client-area calculation
pub const WVR_REDRAW: isize = 0x0300;

/// Window state the adjustment depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameState {
    pub maximized: bool,
    pub full_screen: bool,
    pub border_thickness: i32,
    /// Edge of an auto-hide taskbar, `TaskbarEdge::None` if there is none
    pub auto_hide_edge: TaskbarEdge,
}

impl FrameState {
    /// Query everything the adjustment needs, fresh for this message
    pub fn query(platform: &impl Platform, handle: WindowHandle) -> Self {
        let maximized = probe::is_maximized(platform, handle);
        let full_screen = probe::is_full_screen(platform, handle);

        let border_thickness = if maximized && !full_screen {
            probe::resize_border_thickness(platform, handle)
        } else {
            0
        };

        let auto_hide_edge = if (maximized || full_screen) && taskbar::is_auto_hide(platform) {
            taskbar::locate(platform, handle)
        } else {
            TaskbarEdge::None
        };

        Self {
            maximized,
            full_screen,
            border_thickness,
            auto_hide_edge,
        }
    }
}

/// Apply the adjustment to the proposed client rectangle in place
pub fn adjust_client_rect(rect: &mut Rect, state: &FrameState) {
    if state.maximized && !state.full_screen {
        rect.shrink(state.border_thickness);
    }

    if state.maximized || state.full_screen {
        match state.auto_hide_edge {
            TaskbarEdge::Top => rect.top += AUTO_HIDE_THICKNESS,
            TaskbarEdge::Bottom => rect.bottom -= AUTO_HIDE_THICKNESS,
            TaskbarEdge::Left => rect.left += AUTO_HIDE_THICKNESS,
            TaskbarEdge::Right => rect.right -= AUTO_HIDE_THICKNESS,
            TaskbarEdge::None => {}
        }
    }
}

/// Handle a client-area calculation and return the result code for the
/// window manager: a redraw when the calculation comes from a size change,
/// plain acceptance for a move so nothing repaints needlessly.
pub fn handle_nc_calc_size(
    platform: &impl Platform,
    handle: WindowHandle,
    calc_valid_rects: bool,
    rect: &mut Rect,
) -> isize {
    let state = FrameState::query(platform, handle);
    let proposed = *rect;
    adjust_client_rect(rect, &state);
    if *rect != proposed {
        debug!("Client rect adjusted {:?} -> {:?} ({:?})", proposed, rect, state);
    }

    if calc_valid_rects { WVR_REDRAW } else { 0 }
}
