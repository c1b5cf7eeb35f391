//! Title bar buttons
//!
//! One button type for all three controls, tagged by `ButtonKind`. The kind
//! decides the palette and the glyph; the hover/press state machine is
//! shared. State only changes through the explicit event handlers below,
//! never by inferring it from pointer position.

use serde::{Deserialize, Serialize};

use crate::theme::{Appearance, CLOSE_HOVER, CLOSE_PRESSED, Rgba};

/// Fixed button width in logical units
pub const BUTTON_WIDTH: i32 = 46;
/// Fixed button height in logical units
pub const BUTTON_HEIGHT: i32 = 32;

/// Alpha of the hover/pressed overlays on minimize and maximize
const HOVER_ALPHA: u8 = 0x20;
const PRESSED_ALPHA: u8 = 0x40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonKind {
    Minimize,
    Maximize,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Normal,
    Hovered,
    Pressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Bundled close icon asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseIcon {
    White,
    Black,
}

impl CloseIcon {
    /// Asset path relative to the resource directory
    pub fn asset(self) -> &'static str {
        match self {
            Self::White => "res/close_white.svg",
            Self::Black => "res/close_black.svg",
        }
    }
}

/// Point in device pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPoint {
    pub x: f64,
    pub y: f64,
}

impl GlyphPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Cosmetic (1 device pixel) strokes making up a procedural glyph
#[derive(Debug, Clone, PartialEq)]
pub enum GlyphPrimitive {
    Line { from: GlyphPoint, to: GlyphPoint },
    Rect { x: i32, y: i32, width: i32, height: i32 },
    Polyline(Vec<GlyphPoint>),
}

/// What to paint on top of the button background
#[derive(Debug, Clone, PartialEq)]
pub enum Glyph {
    Drawn { color: Rgba, strokes: Vec<GlyphPrimitive> },
    Icon(CloseIcon),
}

/// A title bar control
#[derive(Debug, Clone)]
pub struct TitleBarButton {
    kind: ButtonKind,
    state: ButtonState,
    appearance: Appearance,
    /// Maximize only: draws the restore glyph when set
    maximized: bool,
}

impl TitleBarButton {
    pub fn new(kind: ButtonKind, appearance: Appearance) -> Self {
        Self {
            kind,
            state: ButtonState::Normal,
            appearance,
            maximized: false,
        }
    }

    pub fn kind(&self) -> ButtonKind {
        self.kind
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Force a state; used when the window manager owns mouse routing
    pub fn set_state(&mut self, state: ButtonState) {
        self.state = state;
    }

    pub fn is_maximized(&self) -> bool {
        self.maximized
    }

    pub fn set_maximized(&mut self, maximized: bool) {
        self.maximized = maximized;
    }

    pub fn on_enter(&mut self) {
        self.state = ButtonState::Hovered;
    }

    /// Leaving always wins, even mid-press
    pub fn on_leave(&mut self) {
        self.state = ButtonState::Normal;
    }

    pub fn on_press(&mut self, button: MouseButton) {
        if button == MouseButton::Left {
            self.state = ButtonState::Pressed;
        }
    }

    /// Returns true when the release completes a left click
    pub fn on_release(&mut self, button: MouseButton) -> bool {
        let clicked = self.state == ButtonState::Pressed && button == MouseButton::Left;
        self.state = ButtonState::Hovered;
        clicked
    }

    /// Background fill for the current state
    pub fn background(&self) -> Rgba {
        match (self.kind, self.state) {
            (_, ButtonState::Normal) => Rgba::TRANSPARENT,
            (ButtonKind::Close, ButtonState::Hovered) => CLOSE_HOVER,
            (ButtonKind::Close, ButtonState::Pressed) => CLOSE_PRESSED,
            (_, ButtonState::Hovered) => self.appearance.foreground().with_alpha(HOVER_ALPHA),
            (_, ButtonState::Pressed) => self.appearance.foreground().with_alpha(PRESSED_ALPHA),
        }
    }

    /// Close icon for the current theme and state. Light theme swaps to the
    /// white icon while hovered so it stays readable on the red background.
    pub fn close_icon(&self) -> CloseIcon {
        if self.appearance.is_dark() || self.state != ButtonState::Normal {
            CloseIcon::White
        } else {
            CloseIcon::Black
        }
    }

    /// Glyph for the current state, scaled by the device pixel ratio
    pub fn glyph(&self, ratio: f64) -> Glyph {
        let color = self.appearance.foreground();
        let px = |v: f64| (v * ratio) as i32;
        match self.kind {
            ButtonKind::Close => Glyph::Icon(self.close_icon()),
            ButtonKind::Minimize => Glyph::Drawn {
                color,
                strokes: vec![GlyphPrimitive::Line {
                    from: GlyphPoint::new(18.0 * ratio, 16.0 * ratio),
                    to: GlyphPoint::new(28.0 * ratio, 16.0 * ratio),
                }],
            },
            ButtonKind::Maximize if !self.maximized => Glyph::Drawn {
                color,
                strokes: vec![GlyphPrimitive::Rect {
                    x: px(18.0),
                    y: px(11.0),
                    width: px(10.0),
                    height: px(10.0),
                }],
            },
            ButtonKind::Maximize => {
                // Front square plus the visible corner of the one behind it
                let side = 8.0 * ratio;
                let dw = px(2.0) as f64;
                let x0 = (px(18.0) + px(2.0)) as f64;
                let y0 = 13.0 * ratio;
                Glyph::Drawn {
                    color,
                    strokes: vec![
                        GlyphPrimitive::Rect {
                            x: px(18.0),
                            y: px(13.0),
                            width: px(8.0),
                            height: px(8.0),
                        },
                        GlyphPrimitive::Polyline(vec![
                            GlyphPoint::new(x0, y0),
                            GlyphPoint::new(x0, y0 - dw),
                            GlyphPoint::new(x0 + side, y0 - dw),
                            GlyphPoint::new(x0 + side, y0 - dw + side),
                            GlyphPoint::new(x0 + side - dw, y0 - dw + side),
                        ]),
                    ],
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maximize(appearance: Appearance) -> TitleBarButton {
        TitleBarButton::new(ButtonKind::Maximize, appearance)
    }

    #[test]
    fn test_leave_overrides_press() {
        let mut button = maximize(Appearance::Light);
        button.on_enter();
        button.on_press(MouseButton::Left);
        button.on_leave();
        assert_eq!(button.state(), ButtonState::Normal);
    }

    #[test]
    fn test_release_returns_to_hovered() {
        let mut button = maximize(Appearance::Light);
        button.on_enter();
        button.on_press(MouseButton::Left);
        assert_eq!(button.state(), ButtonState::Pressed);
        assert!(button.on_release(MouseButton::Left));
        assert_eq!(button.state(), ButtonState::Hovered);
    }

    #[test]
    fn test_right_button_does_not_press() {
        let mut button = maximize(Appearance::Light);
        button.on_enter();
        button.on_press(MouseButton::Right);
        assert_eq!(button.state(), ButtonState::Hovered);
        assert!(!button.on_release(MouseButton::Right));
        assert_eq!(button.state(), ButtonState::Hovered);
    }

    #[test]
    fn test_backgrounds() {
        let mut button = TitleBarButton::new(ButtonKind::Minimize, Appearance::Dark);
        assert_eq!(button.background(), Rgba::TRANSPARENT);
        button.on_enter();
        assert_eq!(button.background(), Rgba::new(0xFF, 0xFF, 0xFF, 0x20));
        button.on_press(MouseButton::Left);
        assert_eq!(button.background(), Rgba::new(0xFF, 0xFF, 0xFF, 0x40));

        let mut close = TitleBarButton::new(ButtonKind::Close, Appearance::Light);
        close.on_enter();
        assert_eq!(close.background(), CLOSE_HOVER);
        close.on_press(MouseButton::Left);
        assert_eq!(close.background(), CLOSE_PRESSED);
    }

    #[test]
    fn test_close_icon_by_theme_and_hover() {
        let mut light = TitleBarButton::new(ButtonKind::Close, Appearance::Light);
        assert_eq!(light.glyph(1.0), Glyph::Icon(CloseIcon::Black));
        light.on_enter();
        assert_eq!(light.glyph(1.0), Glyph::Icon(CloseIcon::White));
        light.on_leave();
        assert_eq!(light.close_icon(), CloseIcon::Black);

        let dark = TitleBarButton::new(ButtonKind::Close, Appearance::Dark);
        assert_eq!(dark.close_icon(), CloseIcon::White);
        assert_eq!(CloseIcon::Black.asset(), "res/close_black.svg");
    }

    #[test]
    fn test_maximize_glyph_switches() {
        let mut button = maximize(Appearance::Light);
        let Glyph::Drawn { strokes, color } = button.glyph(1.0) else {
            panic!("maximize glyph must be drawn");
        };
        assert_eq!(color, Rgba::BLACK);
        assert_eq!(strokes, vec![GlyphPrimitive::Rect { x: 18, y: 11, width: 10, height: 10 }]);

        button.set_maximized(true);
        let Glyph::Drawn { strokes, .. } = button.glyph(2.0) else {
            panic!("restore glyph must be drawn");
        };
        assert_eq!(strokes.len(), 2);
        assert_eq!(strokes[0], GlyphPrimitive::Rect { x: 36, y: 26, width: 16, height: 16 });
        let GlyphPrimitive::Polyline(points) = &strokes[1] else {
            panic!("expected back square outline");
        };
        assert_eq!(points[0], GlyphPoint::new(40.0, 26.0));
        assert_eq!(points[2], GlyphPoint::new(56.0, 22.0));
        assert_eq!(points[4], GlyphPoint::new(52.0, 38.0));
    }
}
