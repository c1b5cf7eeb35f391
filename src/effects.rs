//! Backdrop Effect Controller
//!
//! Switches the compositor backdrop (mica or acrylic) on and off. Acrylic
//! flickers while the window is dragged or resized, so those events turn the
//! backdrop off and a debounced one-shot timer turns it back on once the
//! burst is over. The timer runs on the platform's own event loop; at most
//! one is pending per window.

use std::time::Duration;

use tracing::{debug, trace};

use crate::config::ChromeSettings;
use crate::platform::{EffectsProvider, Platform, TimerId, WindowHandle};
use crate::theme::{Appearance, Rgba};

/// Timer id reserved for the backdrop cooldown
pub const EFFECT_TIMER: TimerId = TimerId(0xA7EA);

/// Opacity of the flat fill painted while the backdrop is off
const FALLBACK_OPACITY: f32 = 0.8;

/// Cancellable one-shot timer. Re-arming replaces the pending firing
/// instead of queuing a second one.
#[derive(Debug, Clone)]
pub struct Debounce {
    id: TimerId,
    delay: Duration,
    pending: bool,
}

impl Debounce {
    pub fn new(id: TimerId, delay: Duration) -> Self {
        Self { id, delay, pending: false }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// (Re)start the countdown from now
    pub fn arm(&mut self, platform: &mut impl Platform, handle: WindowHandle) {
        if self.pending {
            platform.kill_timer(handle, self.id);
        }
        platform.set_timer(handle, self.id, self.delay);
        self.pending = true;
    }

    pub fn cancel(&mut self, platform: &mut impl Platform, handle: WindowHandle) {
        if self.pending {
            platform.kill_timer(handle, self.id);
            self.pending = false;
        }
    }

    /// Consume a timer firing. Returns true if it was this timer and it was
    /// still pending; the platform timer is killed so it cannot repeat.
    pub fn fire(&mut self, platform: &mut impl Platform, handle: WindowHandle, id: TimerId) -> bool {
        if id != self.id || !self.pending {
            return false;
        }
        platform.kill_timer(handle, self.id);
        self.pending = false;
        true
    }
}

/// Flat paint used when no live backdrop is shown
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackFill {
    pub color: Rgba,
    pub opacity: f32,
}

#[derive(Debug, Clone)]
pub struct BackdropController {
    enabled: bool,
    use_mica: bool,
    is_modern: bool,
    appearance: Appearance,
    acrylic_color: Rgba,
    cooldown: Debounce,
}

impl BackdropController {
    pub fn new(settings: &ChromeSettings) -> Self {
        Self {
            enabled: false,
            use_mica: settings.use_mica,
            is_modern: settings.is_modern,
            appearance: settings.appearance,
            acrylic_color: settings.acrylic_color,
            cooldown: Debounce::new(EFFECT_TIMER, settings.effect_cooldown),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn cooldown_pending(&self) -> bool {
        self.cooldown.is_pending()
    }

    /// Construction-time effects, then the backdrop itself
    pub fn install(
        &mut self,
        platform: &mut impl Platform,
        effects: &mut impl EffectsProvider,
        handle: WindowHandle,
    ) {
        effects.add_window_animation(handle);
        self.set_effect(true, platform, effects, handle);
        if self.is_modern {
            effects.add_blur_behind(handle);
            effects.add_shadow(handle);
        }
    }

    /// Turn the backdrop on or off. No-op when already in that state;
    /// returns whether anything changed.
    pub fn set_effect(
        &mut self,
        enabled: bool,
        platform: &mut impl Platform,
        effects: &mut impl EffectsProvider,
        handle: WindowHandle,
    ) -> bool {
        if self.enabled == enabled {
            return false;
        }
        self.enabled = enabled;

        if !enabled {
            effects.remove_background(handle);
        } else if self.use_mica {
            effects.add_mica(handle, self.appearance.is_dark());
        } else {
            effects.add_acrylic(handle, self.acrylic_color);
        }
        debug!("Backdrop {} for {:?}", if enabled { "enabled" } else { "disabled" }, handle);

        platform.request_repaint(handle);
        true
    }

    /// Drop the backdrop now and bring it back after the cooldown
    pub fn temporarily_disable(
        &mut self,
        platform: &mut impl Platform,
        effects: &mut impl EffectsProvider,
        handle: WindowHandle,
    ) {
        self.set_effect(false, platform, effects, handle);
        self.cooldown.arm(platform, handle);
        trace!("Backdrop cooldown re-armed for {:?}", handle);
    }

    /// Window moved; only pre-modern platforms flicker during drags
    pub fn on_moved(
        &mut self,
        platform: &mut impl Platform,
        effects: &mut impl EffectsProvider,
        handle: WindowHandle,
    ) {
        if !self.is_modern {
            self.temporarily_disable(platform, effects, handle);
        }
    }

    /// Window resized; mica copes with live resize, acrylic does not
    pub fn on_resized(
        &mut self,
        platform: &mut impl Platform,
        effects: &mut impl EffectsProvider,
        handle: WindowHandle,
    ) {
        if !self.use_mica {
            self.temporarily_disable(platform, effects, handle);
        }
    }

    /// Timer message; returns true if it was the cooldown
    pub fn on_timer(
        &mut self,
        id: TimerId,
        platform: &mut impl Platform,
        effects: &mut impl EffectsProvider,
        handle: WindowHandle,
    ) -> bool {
        if !self.cooldown.fire(platform, handle, id) {
            return false;
        }
        self.set_effect(true, platform, effects, handle);
        true
    }

    /// Cancel anything pending before the window goes away
    pub fn shutdown(&mut self, platform: &mut impl Platform, handle: WindowHandle) {
        self.cooldown.cancel(platform, handle);
    }

    /// Fill to paint while the backdrop is off
    pub fn fallback_fill(&self) -> Option<FallbackFill> {
        (!self.enabled).then(|| FallbackFill {
            color: self.appearance.fallback_fill(),
            opacity: FALLBACK_OPACITY,
        })
    }
}
