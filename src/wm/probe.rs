//! Geometry/Monitor Probe
//!
//! Placement, full-screen and resize-border queries. Every call goes back to
//! the platform; monitor topology can change between two messages so nothing
//! is cached. Failed queries answer with the conservative default.

use tracing::{debug, trace};

use crate::platform::{MonitorFallback, Platform, ShowState, WindowHandle};

/// Fallback frame thickness with desktop composition on
const COMPOSITED_THICKNESS: f64 = 8.0;
/// Fallback frame thickness without composition
const CLASSIC_THICKNESS: f64 = 4.0;

/// True iff the placement record reports the maximized show state
pub fn is_maximized(platform: &impl Platform, handle: WindowHandle) -> bool {
    platform.show_state(handle) == Some(ShowState::Maximized)
}

/// True iff the outer window rectangle equals its monitor's full rectangle
/// on all four edges. Area equality is not enough: a window overlapping the
/// monitor by a few pixels is not full-screen.
pub fn is_full_screen(platform: &impl Platform, handle: WindowHandle) -> bool {
    let Some(window) = platform.window_rect(handle) else {
        trace!("is_full_screen: no window rect for {:?}", handle);
        return false;
    };
    let Some(info) = platform.monitor_info(handle, MonitorFallback::Primary) else {
        trace!("is_full_screen: no monitor for {:?}", handle);
        return false;
    };
    window == info.monitor
}

/// Thickness of the invisible resize frame the window manager re-adds to a
/// maximized window, in physical pixels. 0 while the toolkit window is not
/// realized.
pub fn resize_border_thickness(platform: &impl Platform, handle: WindowHandle) -> i32 {
    let Some(ratio) = platform.device_pixel_ratio(handle) else {
        debug!("resize_border_thickness: toolkit window for {:?} not realized", handle);
        return 0;
    };

    let metric = platform.frame_thickness_metric();
    if metric > 0 {
        return metric;
    }

    let base = if platform.composition_enabled() {
        COMPOSITED_THICKNESS
    } else {
        CLASSIC_THICKNESS
    };
    (base * ratio).round_ties_even() as i32
}
