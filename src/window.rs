//! Chrome window
//!
//! Composition root: one `ChromeWindow` per top-level window owns the title
//! bar, the hit-test state and the backdrop controller, and is torn down
//! with the window. Raw platform messages come in through `route_message`;
//! widget events (pointer, move, resize) come in through the `on_*` and
//! `pointer_*` methods.

use tracing::{debug, info, trace};

use crate::config::{ChromeConfig, ChromeSettings};
use crate::effects::{BackdropController, FallbackFill};
use crate::error::ConfigError;
use crate::platform::{
    EffectsProvider, Platform, RawMessage, ShowCommand, WindowHandle, WindowMessage,
};
use crate::shared::{Point, Size};
use crate::titlebar::{ButtonKind, MouseButton, TitleBar, TitleBarAction};
use crate::wm::frame;
use crate::wm::hit_test::{HitTestRouter, MaxButtonOutcome};
use crate::wm::probe;

/// Answer to the platform's pre-dispatch hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Let the toolkit/default window procedure handle it
    NotHandled,
    /// Stop here and return this result code
    Handled(isize),
}

pub struct ChromeWindow<P: Platform, E: EffectsProvider> {
    handle: WindowHandle,
    platform: P,
    effects: E,
    settings: ChromeSettings,
    title_bar: TitleBar,
    router: HitTestRouter,
    backdrop: BackdropController,
    destroyed: bool,
}

impl<P: Platform, E: EffectsProvider> ChromeWindow<P, E> {
    /// Validate `config` and attach chrome to `handle`. On error nothing has
    /// been touched.
    pub fn new(
        handle: WindowHandle,
        config: &ChromeConfig,
        mut platform: P,
        mut effects: E,
    ) -> Result<Self, ConfigError> {
        let settings = config.resolve(&platform)?;

        let width = platform
            .widget_geometry(handle)
            .zip(platform.device_pixel_ratio(handle))
            .map(|(geometry, ratio)| geometry.size().to_logical(ratio).width)
            .unwrap_or_default();
        let mut title_bar = TitleBar::new(width, settings.appearance);
        title_bar
            .button_mut(ButtonKind::Maximize)
            .set_maximized(probe::is_maximized(&platform, handle));

        let mut backdrop = BackdropController::new(&settings);
        backdrop.install(&mut platform, &mut effects, handle);

        info!(
            "Chrome attached to {:?} (modern={}, mica={}, appearance={:?})",
            handle, settings.is_modern, settings.use_mica, settings.appearance
        );

        Ok(Self {
            handle,
            platform,
            effects,
            router: HitTestRouter::new(settings.border_width, settings.is_modern),
            settings,
            title_bar,
            backdrop,
            destroyed: false,
        })
    }

    pub fn handle(&self) -> WindowHandle {
        self.handle
    }

    pub fn settings(&self) -> &ChromeSettings {
        &self.settings
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut E {
        &mut self.effects
    }

    pub fn title_bar(&self) -> &TitleBar {
        &self.title_bar
    }

    pub fn backdrop_enabled(&self) -> bool {
        self.backdrop.is_enabled()
    }

    /// Dispatch a raw platform message: frame adjuster, then hit-test
    /// router, then default handling. A `NcCalcSize` rect is rewritten in
    /// place.
    pub fn route_message(&mut self, raw: &mut RawMessage) -> Outcome {
        let Some(handle) = raw.handle else {
            return Outcome::NotHandled;
        };
        if handle != self.handle || self.destroyed {
            trace!("Ignoring message for {:?}", handle);
            return Outcome::NotHandled;
        }

        match &mut raw.message {
            WindowMessage::NcCalcSize { calc_valid_rects, rect } => Outcome::Handled(
                frame::handle_nc_calc_size(&self.platform, handle, *calc_valid_rects, rect),
            ),
            WindowMessage::NcHitTest { cursor } => self.hit_test(*cursor),
            WindowMessage::Timer(id) => {
                if self
                    .backdrop
                    .on_timer(*id, &mut self.platform, &mut self.effects, handle)
                {
                    Outcome::Handled(0)
                } else {
                    Outcome::NotHandled
                }
            }
            WindowMessage::Destroy => {
                self.teardown();
                Outcome::NotHandled
            }
            message => {
                let max_button = self.title_bar.button_mut(ButtonKind::Maximize);
                match self.router.forward_to_max_button(message, max_button) {
                    MaxButtonOutcome::NotHandled => Outcome::NotHandled,
                    MaxButtonOutcome::Handled(code) => Outcome::Handled(code),
                    MaxButtonOutcome::Click => {
                        self.toggle_maximize();
                        Outcome::NotHandled
                    }
                }
            }
        }
    }

    fn hit_test(&mut self, cursor: Point) -> Outcome {
        let (Some(geometry), Some(ratio)) = (
            self.platform.widget_geometry(self.handle),
            self.platform.device_pixel_ratio(self.handle),
        ) else {
            return Outcome::NotHandled;
        };
        // Cursor and geometry are physical; the bar and border are logical
        let local = cursor.relative_to(geometry.origin()).to_logical(ratio);
        let size = geometry.size().to_logical(ratio);
        // The title bar sits at the window origin, so bar-local is window-local
        let max_bounds = self.title_bar.button_rect(ButtonKind::Maximize);
        let max_button = self.title_bar.button_mut(ButtonKind::Maximize);

        match self.router.hit_test(local, size, max_bounds, max_button) {
            Some(region) => Outcome::Handled(region.code()),
            None => Outcome::NotHandled,
        }
    }

    /// Maximize or restore based on the live placement, and switch the
    /// maximize glyph to match
    pub fn toggle_maximize(&mut self) {
        let maximized = probe::is_maximized(&self.platform, self.handle);
        let command = if maximized {
            ShowCommand::Restore
        } else {
            ShowCommand::Maximize
        };
        debug!("Toggling maximize on {:?}: {:?}", self.handle, command);
        self.platform.show(self.handle, command);
        self.title_bar
            .button_mut(ButtonKind::Maximize)
            .set_maximized(!maximized);
    }

    fn perform(&mut self, action: TitleBarAction) {
        match action {
            TitleBarAction::Minimize => self.platform.show(self.handle, ShowCommand::Minimize),
            TitleBarAction::ToggleMaximize => self.toggle_maximize(),
            TitleBarAction::Close => self.platform.close(self.handle),
            TitleBarAction::BeginMove => self.platform.begin_native_move(self.handle),
        }
    }

    pub fn set_title(&mut self, title: &str) {
        self.title_bar.set_title(title);
        self.platform.set_title(self.handle, title);
    }

    /// A window icon was set (or cleared); the icon slot widens to fit it
    pub fn set_icon(&mut self, has_icon: bool) {
        self.title_bar.set_has_icon(has_icon);
    }

    /// Toolkit move event
    pub fn on_moved(&mut self) {
        if self.destroyed {
            return;
        }
        self.backdrop
            .on_moved(&mut self.platform, &mut self.effects, self.handle);
    }

    /// Toolkit resize event
    pub fn on_resized(&mut self, size: Size) {
        if self.destroyed {
            return;
        }
        self.title_bar.set_width(size.width);
        let maximized = probe::is_maximized(&self.platform, self.handle);
        self.title_bar
            .button_mut(ButtonKind::Maximize)
            .set_maximized(maximized);
        self.backdrop
            .on_resized(&mut self.platform, &mut self.effects, self.handle);
    }

    /// Pointer moved over the title bar (bar-local coordinates)
    pub fn pointer_moved(&mut self, pos: Point) {
        if let Some(action) = self.title_bar.pointer_moved(pos) {
            self.perform(action);
        }
    }

    pub fn pointer_pressed(&mut self, pos: Point, button: MouseButton) {
        self.title_bar.pointer_pressed(pos, button);
    }

    pub fn pointer_released(&mut self, pos: Point, button: MouseButton) {
        if let Some(action) = self.title_bar.pointer_released(pos, button) {
            self.perform(action);
        }
    }

    pub fn double_clicked(&mut self, pos: Point, button: MouseButton) {
        if let Some(action) = self.title_bar.double_clicked(pos, button) {
            self.perform(action);
        }
    }

    pub fn pointer_left(&mut self) {
        self.title_bar.pointer_left();
    }

    /// Flat fill to paint instead of the live backdrop, if it is off
    pub fn fallback_fill(&self) -> Option<FallbackFill> {
        self.backdrop.fallback_fill()
    }

    fn teardown(&mut self) {
        if self.destroyed {
            return;
        }
        self.backdrop.shutdown(&mut self.platform, self.handle);
        self.destroyed = true;
        debug!("Chrome detached from {:?}", self.handle);
    }
}

impl<P: Platform, E: EffectsProvider> Drop for ChromeWindow<P, E> {
    fn drop(&mut self) {
        self.teardown();
    }
}
