//! In-memory platform
//!
//! Answers every query from plain fields and records every command, with a
//! virtual clock for timers. Used by the trace replay tool and the tests.
//! Timers here are one-shot: a firing removes the timer.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::trace;

use super::{
    EffectsProvider, MonitorFallback, MonitorInfo, Platform, ScreenEdge, ShowCommand, ShowState,
    TimerId, WindowHandle,
};
use crate::shared::{Point, Rect};
use crate::theme::Rgba;

/// A command the chrome issued against the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimCommand {
    Show(ShowCommand),
    Close,
    BeginMove,
    Repaint,
    SetTitle(String),
    SetTimer(TimerId, Duration),
    KillTimer(TimerId),
}

/// A timer that came due during `SimPlatform::advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFiring {
    pub handle: WindowHandle,
    pub id: TimerId,
    /// Virtual time at which it fired
    pub at: Duration,
}

#[derive(Debug, Clone)]
pub struct SimPlatform {
    pub show_state: ShowState,
    pub window_rect: Rect,
    pub monitors: Vec<MonitorInfo>,
    /// `None` simulates a toolkit window that is not realized yet
    pub device_pixel_ratio: Option<f64>,
    pub frame_metric: i32,
    pub composition: bool,
    pub auto_hide: bool,
    /// Edges carrying an auto-hide app-bar, on every monitor
    pub app_bars: Vec<ScreenEdge>,
    pub dark_preference: Option<bool>,
    pub build: u32,
    pub commands: Vec<SimCommand>,
    now: Duration,
    timers: BTreeMap<(WindowHandle, TimerId), Duration>,
}

impl SimPlatform {
    /// One primary monitor with a 40 px bottom taskbar, window restored at 100,100
    pub fn single_monitor(width: i32, height: i32) -> Self {
        Self {
            show_state: ShowState::Normal,
            window_rect: Rect::new(100, 100, 900, 700),
            monitors: vec![MonitorInfo {
                monitor: Rect::new(0, 0, width, height),
                work_area: Rect::new(0, 0, width, height - 40),
                primary: true,
            }],
            device_pixel_ratio: Some(1.0),
            frame_metric: 8,
            composition: true,
            auto_hide: false,
            app_bars: Vec::new(),
            dark_preference: Some(false),
            build: 22621,
            commands: Vec::new(),
            now: Duration::ZERO,
            timers: BTreeMap::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Deadline of an armed timer
    pub fn timer_deadline(&self, handle: WindowHandle, id: TimerId) -> Option<Duration> {
        self.timers.get(&(handle, id)).copied()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Move the clock forward and return the timers that came due, in order
    pub fn advance(&mut self, by: Duration) -> Vec<TimerFiring> {
        let target = self.now + by;
        let mut due: Vec<TimerFiring> = self
            .timers
            .iter()
            .filter(|(_, deadline)| **deadline <= target)
            .map(|((handle, id), deadline)| TimerFiring { handle: *handle, id: *id, at: *deadline })
            .collect();
        due.sort_by_key(|firing| firing.at);
        for firing in &due {
            self.timers.remove(&(firing.handle, firing.id));
        }
        self.now = target;
        due
    }

    /// Commands issued so far, leaving the log empty
    pub fn take_commands(&mut self) -> Vec<SimCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn count(&self, command: &SimCommand) -> usize {
        self.commands.iter().filter(|c| *c == command).count()
    }

    fn center(rect: Rect) -> Point {
        Point::new(rect.left + rect.width() / 2, rect.top + rect.height() / 2)
    }

    fn distance_to(rect: Rect, point: Point) -> i64 {
        let dx = (rect.left - point.x).max(point.x - rect.right + 1).max(0) as i64;
        let dy = (rect.top - point.y).max(point.y - rect.bottom + 1).max(0) as i64;
        dx * dx + dy * dy
    }
}

impl Platform for SimPlatform {
    fn show_state(&self, _handle: WindowHandle) -> Option<ShowState> {
        Some(self.show_state)
    }

    fn window_rect(&self, _handle: WindowHandle) -> Option<Rect> {
        Some(self.window_rect)
    }

    fn widget_geometry(&self, _handle: WindowHandle) -> Option<Rect> {
        self.device_pixel_ratio.map(|_| self.window_rect)
    }

    fn monitor_info(&self, _handle: WindowHandle, fallback: MonitorFallback) -> Option<MonitorInfo> {
        let center = Self::center(self.window_rect);
        if let Some(found) = self.monitors.iter().find(|m| m.monitor.contains(center)) {
            return Some(*found);
        }
        match fallback {
            MonitorFallback::Primary => self.monitors.iter().find(|m| m.primary).copied(),
            MonitorFallback::Nearest => self
                .monitors
                .iter()
                .min_by_key(|m| Self::distance_to(m.monitor, center))
                .copied(),
        }
    }

    fn device_pixel_ratio(&self, _handle: WindowHandle) -> Option<f64> {
        self.device_pixel_ratio
    }

    fn frame_thickness_metric(&self) -> i32 {
        self.frame_metric
    }

    fn composition_enabled(&self) -> bool {
        self.composition
    }

    fn app_bar_auto_hide(&self) -> bool {
        self.auto_hide
    }

    fn app_bar_on_edge(&self, edge: ScreenEdge, _monitor: Rect) -> bool {
        self.app_bars.contains(&edge)
    }

    fn prefers_dark_theme(&self) -> Option<bool> {
        self.dark_preference
    }

    fn os_build_number(&self) -> u32 {
        self.build
    }

    fn show(&mut self, _handle: WindowHandle, command: ShowCommand) {
        self.show_state = match command {
            ShowCommand::Minimize => ShowState::Minimized,
            ShowCommand::Maximize => ShowState::Maximized,
            ShowCommand::Restore => ShowState::Normal,
        };
        self.commands.push(SimCommand::Show(command));
    }

    fn close(&mut self, _handle: WindowHandle) {
        self.commands.push(SimCommand::Close);
    }

    fn begin_native_move(&mut self, _handle: WindowHandle) {
        self.commands.push(SimCommand::BeginMove);
    }

    fn request_repaint(&mut self, _handle: WindowHandle) {
        self.commands.push(SimCommand::Repaint);
    }

    fn set_title(&mut self, _handle: WindowHandle, title: &str) {
        self.commands.push(SimCommand::SetTitle(title.to_string()));
    }

    fn set_timer(&mut self, handle: WindowHandle, id: TimerId, delay: Duration) {
        trace!("sim: timer {:?} armed for {:?} at {:?}", id, self.now + delay, self.now);
        self.timers.insert((handle, id), self.now + delay);
        self.commands.push(SimCommand::SetTimer(id, delay));
    }

    fn kill_timer(&mut self, handle: WindowHandle, id: TimerId) {
        self.timers.remove(&(handle, id));
        self.commands.push(SimCommand::KillTimer(id));
    }
}

/// An effect call recorded by `RecordingEffects`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectCall {
    WindowAnimation,
    BlurBehind,
    Shadow,
    Mica { dark_mode: bool },
    Acrylic(Rgba),
    RemoveBackground,
}

/// Effects provider that only records what it was asked to do
#[derive(Debug, Clone, Default)]
pub struct RecordingEffects {
    pub calls: Vec<EffectCall>,
}

impl RecordingEffects {
    pub fn take_calls(&mut self) -> Vec<EffectCall> {
        std::mem::take(&mut self.calls)
    }
}

impl EffectsProvider for RecordingEffects {
    fn add_window_animation(&mut self, _handle: WindowHandle) {
        self.calls.push(EffectCall::WindowAnimation);
    }

    fn add_blur_behind(&mut self, _handle: WindowHandle) {
        self.calls.push(EffectCall::BlurBehind);
    }

    fn add_shadow(&mut self, _handle: WindowHandle) {
        self.calls.push(EffectCall::Shadow);
    }

    fn add_mica(&mut self, _handle: WindowHandle, dark_mode: bool) {
        self.calls.push(EffectCall::Mica { dark_mode });
    }

    fn add_acrylic(&mut self, _handle: WindowHandle, tint: Rgba) {
        self.calls.push(EffectCall::Acrylic(tint));
    }

    fn remove_background(&mut self, _handle: WindowHandle) {
        self.calls.push(EffectCall::RemoveBackground);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HANDLE: WindowHandle = WindowHandle(1);

    #[test]
    fn test_advance_fires_due_timers_once() {
        let mut sim = SimPlatform::single_monitor(1920, 1080);
        sim.set_timer(HANDLE, TimerId(1), Duration::from_millis(100));
        assert!(sim.advance(Duration::from_millis(99)).is_empty());

        let fired = sim.advance(Duration::from_millis(1));
        assert_eq!(
            fired,
            vec![TimerFiring { handle: HANDLE, id: TimerId(1), at: Duration::from_millis(100) }]
        );
        assert!(sim.advance(Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_monitor_fallbacks() {
        let mut sim = SimPlatform::single_monitor(1920, 1080);
        sim.monitors.push(MonitorInfo {
            monitor: Rect::new(1920, 0, 3840, 1080),
            work_area: Rect::new(1920, 0, 3840, 1080),
            primary: false,
        });
        sim.window_rect = Rect::new(4000, 100, 4400, 400);

        let primary = sim.monitor_info(HANDLE, MonitorFallback::Primary).unwrap();
        assert!(primary.primary);
        let nearest = sim.monitor_info(HANDLE, MonitorFallback::Nearest).unwrap();
        assert_eq!(nearest.monitor.left, 1920);
    }
}
