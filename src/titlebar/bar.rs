//! Synthetic title bar
//!
//! A fixed-height strip: icon slot, title, then minimize/maximize/close
//! flush right. Pointer events arrive in bar-local coordinates from the
//! toolkit; the bar turns them into button state changes and into
//! `TitleBarAction`s for the owning window. Dragging never moves the window
//! here, it hands off to the native move loop so snapping keeps working.

use tracing::debug;

use super::button::{BUTTON_HEIGHT, BUTTON_WIDTH, ButtonKind, MouseButton, TitleBarButton};
use crate::shared::{Point, Rect, Size};
use crate::theme::{Appearance, Rgba};

pub const TITLE_BAR_HEIGHT: i32 = 32;

/// Icon slot width without and with a window icon
const ICON_SLOT_EMPTY: i32 = 10;
const ICON_SLOT_FILLED: i32 = 32;
/// Window icon pixmap size
pub const ICON_SIZE: i32 = 16;

/// Buttons left to right
const BUTTON_ORDER: [ButtonKind; 3] = [ButtonKind::Minimize, ButtonKind::Maximize, ButtonKind::Close];

/// Something the owning window has to carry out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleBarAction {
    Minimize,
    ToggleMaximize,
    Close,
    /// Start the native window move loop
    BeginMove,
}

impl From<ButtonKind> for TitleBarAction {
    fn from(kind: ButtonKind) -> Self {
        match kind {
            ButtonKind::Minimize => Self::Minimize,
            ButtonKind::Maximize => Self::ToggleMaximize,
            ButtonKind::Close => Self::Close,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TitleBar {
    width: i32,
    title: String,
    has_icon: bool,
    appearance: Appearance,
    minimize: TitleBarButton,
    maximize: TitleBarButton,
    close: TitleBarButton,
    /// Button currently under the pointer
    hovered: Option<ButtonKind>,
    /// Button that took the last left press
    pressed: Option<ButtonKind>,
    /// Left press landed on the bar itself; the next move starts a drag
    drag_armed: bool,
}

impl TitleBar {
    pub fn new(width: i32, appearance: Appearance) -> Self {
        Self {
            width,
            title: String::new(),
            has_icon: false,
            appearance,
            minimize: TitleBarButton::new(ButtonKind::Minimize, appearance),
            maximize: TitleBarButton::new(ButtonKind::Maximize, appearance),
            close: TitleBarButton::new(ButtonKind::Close, appearance),
            hovered: None,
            pressed: None,
            drag_armed: false,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, TITLE_BAR_HEIGHT)
    }

    pub fn set_width(&mut self, width: i32) {
        self.width = width;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub fn set_has_icon(&mut self, has_icon: bool) {
        self.has_icon = has_icon;
    }

    /// Title text color; `None` keeps the toolkit default
    pub fn title_color(&self) -> Option<Rgba> {
        self.appearance.is_dark().then_some(Rgba::WHITE)
    }

    pub fn button(&self, kind: ButtonKind) -> &TitleBarButton {
        match kind {
            ButtonKind::Minimize => &self.minimize,
            ButtonKind::Maximize => &self.maximize,
            ButtonKind::Close => &self.close,
        }
    }

    pub fn button_mut(&mut self, kind: ButtonKind) -> &mut TitleBarButton {
        match kind {
            ButtonKind::Minimize => &mut self.minimize,
            ButtonKind::Maximize => &mut self.maximize,
            ButtonKind::Close => &mut self.close,
        }
    }

    pub fn icon_rect(&self) -> Rect {
        let width = if self.has_icon { ICON_SLOT_FILLED } else { ICON_SLOT_EMPTY };
        Rect::new(0, 0, width, TITLE_BAR_HEIGHT)
    }

    /// Where the window icon is painted, centered in its slot
    pub fn icon_pixmap_rect(&self) -> Option<Rect> {
        self.has_icon.then(|| {
            let origin = Point::new(
                (self.icon_rect().width() - ICON_SIZE) / 2,
                (TITLE_BAR_HEIGHT - ICON_SIZE) / 2,
            );
            Rect::from_origin_size(origin, Size::new(ICON_SIZE, ICON_SIZE))
        })
    }

    /// Space left for the title between the icon slot and the buttons
    pub fn title_rect(&self) -> Rect {
        let left = self.icon_rect().right;
        let right = self.buttons_left().max(left);
        Rect::new(left, 0, right, TITLE_BAR_HEIGHT)
    }

    /// Bar-local bounds of a button
    pub fn button_rect(&self, kind: ButtonKind) -> Rect {
        let index = BUTTON_ORDER.iter().position(|k| *k == kind).unwrap_or_default() as i32;
        let left = self.buttons_left() + index * BUTTON_WIDTH;
        Rect::new(left, 0, left + BUTTON_WIDTH, BUTTON_HEIGHT)
    }

    fn buttons_left(&self) -> i32 {
        self.width - BUTTON_WIDTH * BUTTON_ORDER.len() as i32
    }

    /// Button under a bar-local point
    pub fn button_at(&self, pos: Point) -> Option<ButtonKind> {
        BUTTON_ORDER
            .into_iter()
            .find(|kind| self.button_rect(*kind).contains(pos))
    }

    fn set_hovered(&mut self, target: Option<ButtonKind>) {
        if self.hovered == target {
            return;
        }
        if let Some(previous) = self.hovered {
            self.button_mut(previous).on_leave();
        }
        if let Some(next) = target {
            self.button_mut(next).on_enter();
        }
        self.hovered = target;
    }

    /// Pointer moved over the bar
    pub fn pointer_moved(&mut self, pos: Point) -> Option<TitleBarAction> {
        let target = self.button_at(pos);
        self.set_hovered(target);

        if self.drag_armed && pos.x < self.buttons_left() {
            self.drag_armed = false;
            debug!("Title bar drag at {:?}, handing off to native move", pos);
            return Some(TitleBarAction::BeginMove);
        }
        None
    }

    pub fn pointer_pressed(&mut self, pos: Point, button: MouseButton) {
        match self.button_at(pos) {
            Some(kind) => {
                self.set_hovered(Some(kind));
                self.button_mut(kind).on_press(button);
                if button == MouseButton::Left {
                    self.pressed = Some(kind);
                }
            }
            None => self.drag_armed = button == MouseButton::Left,
        }
    }

    pub fn pointer_released(&mut self, pos: Point, button: MouseButton) -> Option<TitleBarAction> {
        if button == MouseButton::Left {
            self.drag_armed = false;
        }
        let pressed = if button == MouseButton::Left { self.pressed.take() } else { None };

        let kind = self.button_at(pos)?;
        let clicked = self.button_mut(kind).on_release(button);
        (clicked && pressed == Some(kind)).then(|| TitleBarAction::from(kind))
    }

    /// Left double-click on the bar toggles maximize; buttons ignore it
    pub fn double_clicked(&mut self, pos: Point, button: MouseButton) -> Option<TitleBarAction> {
        if button != MouseButton::Left || self.button_at(pos).is_some() {
            return None;
        }
        Some(TitleBarAction::ToggleMaximize)
    }

    pub fn pointer_left(&mut self) {
        self.set_hovered(None);
        self.pressed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::titlebar::button::ButtonState;

    fn bar() -> TitleBar {
        TitleBar::new(800, Appearance::Light)
    }

    #[test]
    fn test_layout() {
        let mut bar = bar();
        assert_eq!(bar.button_rect(ButtonKind::Close), Rect::new(754, 0, 800, 32));
        assert_eq!(bar.button_rect(ButtonKind::Maximize), Rect::new(708, 0, 754, 32));
        assert_eq!(bar.button_rect(ButtonKind::Minimize), Rect::new(662, 0, 708, 32));
        assert_eq!(bar.title_rect(), Rect::new(10, 0, 662, 32));

        assert_eq!(bar.icon_pixmap_rect(), None);
        bar.set_has_icon(true);
        assert_eq!(bar.title_rect().left, 32);
        assert_eq!(bar.icon_pixmap_rect(), Some(Rect::new(8, 8, 24, 24)));

        bar.set_width(1000);
        assert_eq!(bar.button_at(Point::new(930, 5)), Some(ButtonKind::Maximize));
        assert_eq!(bar.button_at(Point::new(500, 5)), None);
    }

    #[test]
    fn test_click_emits_button_action() {
        let mut bar = bar();
        let over_close = Point::new(780, 10);
        bar.pointer_moved(over_close);
        assert_eq!(bar.button(ButtonKind::Close).state(), ButtonState::Hovered);

        bar.pointer_pressed(over_close, MouseButton::Left);
        assert_eq!(bar.button(ButtonKind::Close).state(), ButtonState::Pressed);
        assert_eq!(
            bar.pointer_released(over_close, MouseButton::Left),
            Some(TitleBarAction::Close)
        );
        assert_eq!(bar.button(ButtonKind::Close).state(), ButtonState::Hovered);
    }

    #[test]
    fn test_press_then_leave_cancels_click() {
        let mut bar = bar();
        let over_min = Point::new(670, 10);
        bar.pointer_pressed(over_min, MouseButton::Left);
        bar.pointer_moved(Point::new(300, 10));
        assert_eq!(bar.button(ButtonKind::Minimize).state(), ButtonState::Normal);
        assert_eq!(bar.pointer_released(Point::new(300, 10), MouseButton::Left), None);
    }

    #[test]
    fn test_hover_moves_between_buttons() {
        let mut bar = bar();
        bar.pointer_moved(Point::new(670, 10));
        bar.pointer_moved(Point::new(720, 10));
        assert_eq!(bar.button(ButtonKind::Minimize).state(), ButtonState::Normal);
        assert_eq!(bar.button(ButtonKind::Maximize).state(), ButtonState::Hovered);
        bar.pointer_left();
        assert_eq!(bar.button(ButtonKind::Maximize).state(), ButtonState::Normal);
    }

    #[test]
    fn test_drag_on_bar_begins_native_move_once() {
        let mut bar = bar();
        bar.pointer_pressed(Point::new(200, 10), MouseButton::Left);
        assert_eq!(bar.pointer_moved(Point::new(210, 12)), Some(TitleBarAction::BeginMove));
        assert_eq!(bar.pointer_moved(Point::new(220, 14)), None);
    }

    #[test]
    fn test_drag_over_buttons_does_not_move() {
        let mut bar = bar();
        bar.pointer_pressed(Point::new(200, 10), MouseButton::Left);
        assert_eq!(bar.pointer_moved(Point::new(700, 10)), None);

        let mut bar = self::bar();
        bar.pointer_pressed(Point::new(200, 10), MouseButton::Right);
        assert_eq!(bar.pointer_moved(Point::new(210, 10)), None);
    }

    #[test]
    fn test_double_click_left_only() {
        let mut bar = bar();
        assert_eq!(
            bar.double_clicked(Point::new(200, 10), MouseButton::Left),
            Some(TitleBarAction::ToggleMaximize)
        );
        assert_eq!(bar.double_clicked(Point::new(200, 10), MouseButton::Right), None);
        assert_eq!(bar.double_clicked(Point::new(780, 10), MouseButton::Left), None);
    }

    #[test]
    fn test_title_color_in_dark_mode() {
        assert_eq!(bar().title_color(), None);
        assert_eq!(TitleBar::new(800, Appearance::Dark).title_color(), Some(Rgba::WHITE));
    }
}
