//! Hit-Test Router
//!
//! Classifies the cursor into frame regions for the window manager: resize
//! bands along the edges, and on the modern platform variant the synthetic
//! maximize button, reported as a real maximize button so the window
//! manager shows its snap-layout flyout.
//!
//! Once the maximize button is reported as a non-client region, the window
//! manager stops sending client mouse events for it. The router therefore
//! also drives the button from the non-client button messages that follow.

use bitflags::bitflags;
use tracing::{debug, trace};

use crate::platform::WindowMessage;
use crate::shared::{Point, Rect, Size};
use crate::titlebar::{ButtonState, TitleBarButton};

bitflags! {
    /// Edge bands a window-local point falls into
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BorderBands: u8 {
        const LEFT   = 1 << 0;
        const TOP    = 1 << 1;
        const RIGHT  = 1 << 2;
        const BOTTOM = 1 << 3;
    }
}

/// Frame region reported back to the window manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    MaxButton,
    Left,
    Right,
    Top,
    TopLeft,
    TopRight,
    Bottom,
    BottomLeft,
    BottomRight,
}

impl HitRegion {
    /// Hit-test result code understood by the window manager
    pub const fn code(self) -> isize {
        match self {
            Self::MaxButton => 9,
            Self::Left => 10,
            Self::Right => 11,
            Self::Top => 12,
            Self::TopLeft => 13,
            Self::TopRight => 14,
            Self::Bottom => 15,
            Self::BottomLeft => 16,
            Self::BottomRight => 17,
        }
    }
}

/// Which bands of width `border` around a `size` window contain `pos`
pub fn border_bands(pos: Point, size: Size, border: i32) -> BorderBands {
    let mut bands = BorderBands::empty();
    bands.set(BorderBands::LEFT, pos.x < border);
    bands.set(BorderBands::RIGHT, pos.x > size.width - border);
    bands.set(BorderBands::TOP, pos.y < border);
    bands.set(BorderBands::BOTTOM, pos.y > size.height - border);
    bands
}

impl BorderBands {
    /// Corners first, then right, bottom, left, top
    pub fn region(self) -> Option<HitRegion> {
        const PRECEDENCE: [(BorderBands, HitRegion); 8] = [
            (BorderBands::RIGHT.union(BorderBands::BOTTOM), HitRegion::BottomRight),
            (BorderBands::RIGHT.union(BorderBands::TOP), HitRegion::TopRight),
            (BorderBands::LEFT.union(BorderBands::BOTTOM), HitRegion::BottomLeft),
            (BorderBands::LEFT.union(BorderBands::TOP), HitRegion::TopLeft),
            (BorderBands::RIGHT, HitRegion::Right),
            (BorderBands::BOTTOM, HitRegion::Bottom),
            (BorderBands::LEFT, HitRegion::Left),
            (BorderBands::TOP, HitRegion::Top),
        ];
        PRECEDENCE
            .into_iter()
            .find(|(bands, _)| self.contains(*bands))
            .map(|(_, region)| region)
    }
}

/// What the composition root should do with a non-client button message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxButtonOutcome {
    /// Not ours; let default processing run
    NotHandled,
    /// Consumed, return this result code
    Handled(isize),
    /// The window manager swallowed a click on the maximize button; toggle
    /// maximize, then let default processing run
    Click,
}

/// Per-window hit-test state
#[derive(Debug, Clone)]
pub struct HitTestRouter {
    border_width: i32,
    /// Report the maximize button region (modern platform variant only)
    snap_layouts: bool,
    max_button_hovered: bool,
}

impl HitTestRouter {
    pub fn new(border_width: i32, snap_layouts: bool) -> Self {
        Self {
            border_width,
            snap_layouts,
            max_button_hovered: false,
        }
    }

    pub fn is_max_button_hovered(&self) -> bool {
        self.max_button_hovered
    }

    /// Classify a window-local cursor position. `None` means the position is
    /// ordinary client area and normal hit testing should run.
    pub fn hit_test(
        &mut self,
        local: Point,
        size: Size,
        max_button_bounds: Rect,
        max_button: &mut TitleBarButton,
    ) -> Option<HitRegion> {
        if self.snap_layouts {
            if max_button_bounds.contains(local) {
                if !self.max_button_hovered {
                    trace!("Cursor entered maximize button at {:?}", local);
                }
                self.max_button_hovered = true;
                if max_button.state() != ButtonState::Pressed {
                    max_button.set_state(ButtonState::Hovered);
                }
                return Some(HitRegion::MaxButton);
            }
            if self.max_button_hovered {
                trace!("Cursor left maximize button region at {:?}", local);
                self.release_max_button(max_button);
            }
        }

        border_bands(local, size, self.border_width).region()
    }

    /// Feed a non-client button message to the maximize button if it owns
    /// the pointer
    pub fn forward_to_max_button(
        &mut self,
        message: &WindowMessage,
        max_button: &mut TitleBarButton,
    ) -> MaxButtonOutcome {
        if !self.snap_layouts || !self.max_button_hovered {
            return MaxButtonOutcome::NotHandled;
        }

        match message {
            WindowMessage::NcLButtonDown => {
                max_button.set_state(ButtonState::Pressed);
                MaxButtonOutcome::Handled(0)
            }
            WindowMessage::NcLButtonUp | WindowMessage::NcRButtonUp => {
                debug!("Maximize button clicked through non-client area");
                max_button.set_state(ButtonState::Hovered);
                MaxButtonOutcome::Click
            }
            WindowMessage::NcMouseLeave | WindowMessage::MouseLeave => {
                self.release_max_button(max_button);
                MaxButtonOutcome::NotHandled
            }
            _ => MaxButtonOutcome::NotHandled,
        }
    }

    fn release_max_button(&mut self, max_button: &mut TitleBarButton) {
        self.max_button_hovered = false;
        max_button.set_state(ButtonState::Normal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::titlebar::ButtonKind;
    use crate::theme::Appearance;

    const SIZE: Size = Size::new(800, 600);
    const MAX_BOUNDS: Rect = Rect::new(708, 0, 754, 32);

    fn button() -> TitleBarButton {
        TitleBarButton::new(ButtonKind::Maximize, Appearance::Light)
    }

    fn classify(x: i32, y: i32) -> Option<HitRegion> {
        border_bands(Point::new(x, y), SIZE, 4).region()
    }

    #[test]
    fn test_edges_and_corners() {
        assert_eq!(classify(0, 0), Some(HitRegion::TopLeft));
        assert_eq!(classify(799, 0), Some(HitRegion::TopRight));
        assert_eq!(classify(0, 599), Some(HitRegion::BottomLeft));
        assert_eq!(classify(799, 599), Some(HitRegion::BottomRight));
        assert_eq!(classify(2, 300), Some(HitRegion::Left));
        assert_eq!(classify(797, 300), Some(HitRegion::Right));
        assert_eq!(classify(400, 3), Some(HitRegion::Top));
        assert_eq!(classify(400, 597), Some(HitRegion::Bottom));
    }

    #[test]
    fn test_interior_falls_through() {
        assert_eq!(classify(4, 4), None);
        assert_eq!(classify(796, 596), None);
        assert_eq!(classify(400, 300), None);
    }

    #[test]
    fn test_band_thresholds_are_strict() {
        assert_eq!(classify(3, 300), Some(HitRegion::Left));
        assert_eq!(classify(4, 300), None);
        assert_eq!(classify(796, 300), None);
        assert_eq!(classify(797, 300), Some(HitRegion::Right));
    }

    #[test]
    fn test_degenerate_window_prefers_right_bottom() {
        let bands = border_bands(Point::new(2, 2), Size::new(4, 4), 4);
        assert!(bands.contains(BorderBands::all()));
        assert_eq!(bands.region(), Some(HitRegion::BottomRight));
    }

    #[test]
    fn test_region_codes() {
        assert_eq!(HitRegion::MaxButton.code(), 9);
        assert_eq!(HitRegion::TopLeft.code(), 13);
        assert_eq!(HitRegion::BottomRight.code(), 17);
    }

    #[test]
    fn test_max_button_reported_on_modern_only() {
        let mut max = button();
        let mut modern = HitTestRouter::new(4, true);
        let pos = Point::new(720, 2);
        assert_eq!(modern.hit_test(pos, SIZE, MAX_BOUNDS, &mut max), Some(HitRegion::MaxButton));
        assert!(modern.is_max_button_hovered());
        assert_eq!(max.state(), ButtonState::Hovered);

        let mut max = button();
        let mut legacy = HitTestRouter::new(4, false);
        assert_eq!(legacy.hit_test(pos, SIZE, MAX_BOUNDS, &mut max), Some(HitRegion::Top));
        assert_eq!(max.state(), ButtonState::Normal);
        assert_eq!(
            legacy.forward_to_max_button(&WindowMessage::NcLButtonDown, &mut max),
            MaxButtonOutcome::NotHandled
        );
    }

    #[test]
    fn test_press_release_clicks() {
        let mut max = button();
        let mut router = HitTestRouter::new(4, true);
        router.hit_test(Point::new(720, 10), SIZE, MAX_BOUNDS, &mut max);

        assert_eq!(
            router.forward_to_max_button(&WindowMessage::NcLButtonDown, &mut max),
            MaxButtonOutcome::Handled(0)
        );
        assert_eq!(max.state(), ButtonState::Pressed);

        // Jitter while held keeps the pressed look
        router.hit_test(Point::new(721, 11), SIZE, MAX_BOUNDS, &mut max);
        assert_eq!(max.state(), ButtonState::Pressed);

        assert_eq!(
            router.forward_to_max_button(&WindowMessage::NcLButtonUp, &mut max),
            MaxButtonOutcome::Click
        );
        assert_eq!(max.state(), ButtonState::Hovered);
    }

    #[test]
    fn test_press_then_leave_resets() {
        let mut max = button();
        let mut router = HitTestRouter::new(4, true);
        router.hit_test(Point::new(720, 10), SIZE, MAX_BOUNDS, &mut max);
        router.forward_to_max_button(&WindowMessage::NcLButtonDown, &mut max);
        assert_eq!(
            router.forward_to_max_button(&WindowMessage::NcMouseLeave, &mut max),
            MaxButtonOutcome::NotHandled
        );
        assert_eq!(max.state(), ButtonState::Normal);
        assert!(!router.is_max_button_hovered());

        // Once released, button messages are no longer ours
        assert_eq!(
            router.forward_to_max_button(&WindowMessage::NcLButtonUp, &mut max),
            MaxButtonOutcome::NotHandled
        );
    }

    #[test]
    fn test_client_mouse_leave_resets_hover() {
        let mut max = button();
        let mut router = HitTestRouter::new(4, true);
        router.hit_test(Point::new(720, 10), SIZE, MAX_BOUNDS, &mut max);
        assert_eq!(max.state(), ButtonState::Hovered);

        assert_eq!(
            router.forward_to_max_button(&WindowMessage::MouseLeave, &mut max),
            MaxButtonOutcome::NotHandled
        );
        assert_eq!(max.state(), ButtonState::Normal);
        assert!(!router.is_max_button_hovered());
        assert_eq!(
            router.forward_to_max_button(&WindowMessage::NcLButtonDown, &mut max),
            MaxButtonOutcome::NotHandled
        );
        assert_eq!(max.state(), ButtonState::Normal);
    }

    #[test]
    fn test_region_change_resets() {
        let mut max = button();
        let mut router = HitTestRouter::new(4, true);
        router.hit_test(Point::new(720, 10), SIZE, MAX_BOUNDS, &mut max);
        assert_eq!(router.hit_test(Point::new(400, 10), SIZE, MAX_BOUNDS, &mut max), None);
        assert_eq!(max.state(), ButtonState::Normal);
        assert!(!router.is_max_button_hovered());
    }

    #[test]
    fn test_right_button_up_also_clicks() {
        let mut max = button();
        let mut router = HitTestRouter::new(4, true);
        router.hit_test(Point::new(720, 10), SIZE, MAX_BOUNDS, &mut max);
        assert_eq!(
            router.forward_to_max_button(&WindowMessage::NcRButtonUp, &mut max),
            MaxButtonOutcome::Click
        );
    }
}
