//! Win32 backend
//!
//! `Win32Platform` answers the chrome's queries straight from the window
//! manager and shell on every call; nothing is cached. `DwmEffects` maps the
//! effect calls onto DWM attributes and the accent policy. `decode`/`encode` translate between raw
//! window-procedure parameters and `WindowMessage`.

use std::ffi::c_void;
use std::mem::size_of;
use std::time::Duration;

use tracing::{debug, trace, warn};
use windows::Wdk::System::SystemServices::RtlGetVersion;
use windows::Win32::Foundation::{BOOL, HWND, LPARAM, RECT, WPARAM};
use windows::Win32::Graphics::Dwm::{
    DWM_BB_ENABLE, DWM_BLURBEHIND, DWM_SYSTEMBACKDROP_TYPE, DWMSBT_MAINWINDOW, DWMSBT_NONE,
    DWMWA_SYSTEMBACKDROP_TYPE, DWMWA_TRANSITIONS_FORCEDISABLED,
    DWMWA_USE_IMMERSIVE_DARK_MODE, DWMWINDOWATTRIBUTE, DwmEnableBlurBehindWindow,
    DwmExtendFrameIntoClientArea, DwmIsCompositionEnabled, DwmSetWindowAttribute,
};
use windows::Win32::Graphics::Gdi::{
    GetMonitorInfoW, InvalidateRect, MONITOR_DEFAULTTONEAREST, MONITOR_DEFAULTTOPRIMARY,
    MONITORINFO, MONITORINFOF_PRIMARY, MonitorFromWindow,
};
use windows::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryW};
use windows::Win32::System::Registry::{HKEY_CURRENT_USER, RRF_RT_REG_DWORD, RegGetValueW};
use windows::Win32::System::SystemInformation::OSVERSIONINFOW;
use windows::Win32::UI::Controls::MARGINS;
use windows::Win32::UI::HiDpi::GetDpiForWindow;
use windows::Win32::UI::Input::KeyboardAndMouse::ReleaseCapture;
use windows::Win32::UI::Shell::{
    ABE_BOTTOM, ABE_LEFT, ABE_RIGHT, ABE_TOP, ABM_GETSTATE, ABS_AUTOHIDE, APPBARDATA,
    SHAppBarMessage,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetSystemMetrics, GetWindowPlacement, GetWindowRect, HTCAPTION, KillTimer, NCCALCSIZE_PARAMS,
    PostMessageW, SC_MOVE, SM_CXPADDEDBORDER, SM_CXSIZEFRAME, SW_MAXIMIZE, SW_MINIMIZE,
    SW_RESTORE, SW_SHOWMAXIMIZED, SW_SHOWMINIMIZED, SendMessageW, SetTimer, SetWindowTextW,
    ShowWindow, WINDOWPLACEMENT, WM_CLOSE, WM_DESTROY, WM_MOUSELEAVE, WM_NCCALCSIZE,
    WM_NCHITTEST, WM_NCLBUTTONDOWN, WM_NCLBUTTONUP, WM_NCRBUTTONUP, WM_SYSCOMMAND, WM_TIMER,
};
use windows::core::{HSTRING, s, w};

use super::{
    EffectsProvider, MonitorFallback, MonitorInfo, Platform, ScreenEdge, ShowCommand, ShowState,
    TimerId, WindowHandle, WindowMessage,
};
use crate::shared::{Point, Rect};
use crate::theme::Rgba;

/// Not exported by the bindings
const WM_NCMOUSELEAVE: u32 = 0x02A2;
const ABM_GETAUTOHIDEBAREX: u32 = 11;

const USER_DEFAULT_DPI: f64 = 96.0;

fn hwnd(handle: WindowHandle) -> HWND {
    HWND(handle.0 as *mut c_void)
}

impl From<RECT> for Rect {
    fn from(rect: RECT) -> Self {
        Rect::new(rect.left, rect.top, rect.right, rect.bottom)
    }
}

impl From<Rect> for RECT {
    fn from(rect: Rect) -> Self {
        RECT {
            left: rect.left,
            top: rect.top,
            right: rect.right,
            bottom: rect.bottom,
        }
    }
}

/// Native platform; stateless, every query goes to the system
#[derive(Debug, Default)]
pub struct Win32Platform;

impl Win32Platform {
    pub fn new() -> Self {
        Self
    }

    fn placement(handle: WindowHandle) -> Option<WINDOWPLACEMENT> {
        let mut placement = WINDOWPLACEMENT {
            length: size_of::<WINDOWPLACEMENT>() as u32,
            ..Default::default()
        };
        match unsafe { GetWindowPlacement(hwnd(handle), &mut placement) } {
            Ok(()) => Some(placement),
            Err(e) => {
                debug!("GetWindowPlacement failed for {:?}: {}", handle, e);
                None
            }
        }
    }
}

impl Platform for Win32Platform {
    fn show_state(&self, handle: WindowHandle) -> Option<ShowState> {
        let placement = Self::placement(handle)?;
        let state = match placement.showCmd {
            cmd if cmd == SW_SHOWMAXIMIZED.0 as u32 => ShowState::Maximized,
            cmd if cmd == SW_SHOWMINIMIZED.0 as u32 => ShowState::Minimized,
            _ => ShowState::Normal,
        };
        Some(state)
    }

    fn window_rect(&self, handle: WindowHandle) -> Option<Rect> {
        let mut rect = RECT::default();
        unsafe { GetWindowRect(hwnd(handle), &mut rect) }.ok()?;
        Some(rect.into())
    }

    fn widget_geometry(&self, handle: WindowHandle) -> Option<Rect> {
        // The borderless client area covers the whole window
        self.window_rect(handle)
    }

    fn monitor_info(&self, handle: WindowHandle, fallback: MonitorFallback) -> Option<MonitorInfo> {
        let flags = match fallback {
            MonitorFallback::Primary => MONITOR_DEFAULTTOPRIMARY,
            MonitorFallback::Nearest => MONITOR_DEFAULTTONEAREST,
        };
        let mut info = MONITORINFO {
            cbSize: size_of::<MONITORINFO>() as u32,
            ..Default::default()
        };
        unsafe {
            let monitor = MonitorFromWindow(hwnd(handle), flags);
            if monitor.is_invalid() || !GetMonitorInfoW(monitor, &mut info).as_bool() {
                debug!("No monitor info for {:?}", handle);
                return None;
            }
        }
        Some(MonitorInfo {
            monitor: info.rcMonitor.into(),
            work_area: info.rcWork.into(),
            primary: info.dwFlags & MONITORINFOF_PRIMARY != 0,
        })
    }

    fn device_pixel_ratio(&self, handle: WindowHandle) -> Option<f64> {
        match unsafe { GetDpiForWindow(hwnd(handle)) } {
            0 => None,
            dpi => Some(dpi as f64 / USER_DEFAULT_DPI),
        }
    }

    fn frame_thickness_metric(&self) -> i32 {
        unsafe { GetSystemMetrics(SM_CXSIZEFRAME) + GetSystemMetrics(SM_CXPADDEDBORDER) }
    }

    fn composition_enabled(&self) -> bool {
        unsafe { DwmIsCompositionEnabled() }
            .map(|enabled| enabled.as_bool())
            .unwrap_or(false)
    }

    fn app_bar_auto_hide(&self) -> bool {
        let mut data = APPBARDATA {
            cbSize: size_of::<APPBARDATA>() as u32,
            ..Default::default()
        };
        let state = unsafe { SHAppBarMessage(ABM_GETSTATE, &mut data) };
        state as u32 & ABS_AUTOHIDE != 0
    }

    fn app_bar_on_edge(&self, edge: ScreenEdge, monitor: Rect) -> bool {
        let mut data = APPBARDATA {
            cbSize: size_of::<APPBARDATA>() as u32,
            uEdge: match edge {
                ScreenEdge::Left => ABE_LEFT,
                ScreenEdge::Top => ABE_TOP,
                ScreenEdge::Right => ABE_RIGHT,
                ScreenEdge::Bottom => ABE_BOTTOM,
            },
            rc: monitor.into(),
            ..Default::default()
        };
        unsafe { SHAppBarMessage(ABM_GETAUTOHIDEBAREX, &mut data) != 0 }
    }

    fn prefers_dark_theme(&self) -> Option<bool> {
        let mut value: u32 = 0;
        let mut size = size_of::<u32>() as u32;
        let status = unsafe {
            RegGetValueW(
                HKEY_CURRENT_USER,
                w!("Software\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize"),
                w!("AppsUseLightTheme"),
                RRF_RT_REG_DWORD,
                None,
                Some(&mut value as *mut u32 as *mut c_void),
                Some(&mut size as *mut u32),
            )
        };
        if status.is_err() {
            debug!("AppsUseLightTheme unreadable: {:?}", status);
            return None;
        }
        Some(value == 0)
    }

    fn os_build_number(&self) -> u32 {
        let mut info = OSVERSIONINFOW {
            dwOSVersionInfoSize: size_of::<OSVERSIONINFOW>() as u32,
            ..Default::default()
        };
        match unsafe { RtlGetVersion(&mut info) }.ok() {
            Ok(()) => info.dwBuildNumber,
            Err(e) => {
                warn!("RtlGetVersion failed: {}", e);
                0
            }
        }
    }

    fn show(&mut self, handle: WindowHandle, command: ShowCommand) {
        let cmd = match command {
            ShowCommand::Minimize => SW_MINIMIZE,
            ShowCommand::Maximize => SW_MAXIMIZE,
            ShowCommand::Restore => SW_RESTORE,
        };
        // Return value is the previous visibility, not an error
        let _ = unsafe { ShowWindow(hwnd(handle), cmd) };
    }

    fn close(&mut self, handle: WindowHandle) {
        if let Err(e) = unsafe { PostMessageW(hwnd(handle), WM_CLOSE, WPARAM(0), LPARAM(0)) } {
            warn!("Failed to post close to {:?}: {}", handle, e);
        }
    }

    fn begin_native_move(&mut self, handle: WindowHandle) {
        unsafe {
            if let Err(e) = ReleaseCapture() {
                trace!("ReleaseCapture: {}", e);
            }
            SendMessageW(
                hwnd(handle),
                WM_SYSCOMMAND,
                WPARAM((SC_MOVE | HTCAPTION) as usize),
                LPARAM(0),
            );
        }
    }

    fn request_repaint(&mut self, handle: WindowHandle) {
        let _ = unsafe { InvalidateRect(hwnd(handle), None, false) };
    }

    fn set_title(&mut self, handle: WindowHandle, title: &str) {
        if let Err(e) = unsafe { SetWindowTextW(hwnd(handle), &HSTRING::from(title)) } {
            warn!("Failed to set title on {:?}: {}", handle, e);
        }
    }

    fn set_timer(&mut self, handle: WindowHandle, id: TimerId, delay: Duration) {
        let elapse = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        if unsafe { SetTimer(hwnd(handle), id.0, elapse, None) } == 0 {
            warn!("SetTimer failed for {:?} on {:?}", id, handle);
        }
    }

    fn kill_timer(&mut self, handle: WindowHandle, id: TimerId) {
        // Killing a timer that already fired is expected to fail
        let _ = unsafe { KillTimer(hwnd(handle), id.0) };
    }
}

/// First build with `DWMWA_SYSTEMBACKDROP_TYPE`
pub const SYSTEM_BACKDROP_BUILD: u32 = 22621;

/// Undocumented mica switch honored by builds before `SYSTEM_BACKDROP_BUILD`
const DWMWA_MICA_EFFECT: DWMWINDOWATTRIBUTE = DWMWINDOWATTRIBUTE(1029);

const WCA_ACCENT_POLICY: u32 = 19;
const ACCENT_DISABLED: u32 = 0;
const ACCENT_ENABLE_ACRYLICBLURBEHIND: u32 = 4;
/// Draw the left, top, right and bottom borders
const ACCENT_FLAG_DRAW_ALL_BORDERS: u32 = 0x20 | 0x40 | 0x80 | 0x100;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AccentPolicy {
    accent_state: u32,
    accent_flags: u32,
    /// Tint as ABGR
    gradient_color: u32,
    animation_id: u32,
}

impl AccentPolicy {
    fn acrylic(tint: Rgba) -> Self {
        Self {
            accent_state: ACCENT_ENABLE_ACRYLICBLURBEHIND,
            accent_flags: ACCENT_FLAG_DRAW_ALL_BORDERS,
            gradient_color: tint.to_abgr(),
            animation_id: 0,
        }
    }

    fn disabled() -> Self {
        Self {
            accent_state: ACCENT_DISABLED,
            accent_flags: 0,
            gradient_color: 0,
            animation_id: 0,
        }
    }
}

#[repr(C)]
struct WindowCompositionAttribData {
    attribute: u32,
    data: *mut c_void,
    size: usize,
}

type SetWindowCompositionAttributeFn =
    unsafe extern "system" fn(HWND, *mut WindowCompositionAttribData) -> BOOL;

/// How mica is switched on a given build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MicaSwitch {
    /// `DWMWA_SYSTEMBACKDROP_TYPE`
    SystemBackdrop,
    /// `DWMWA_MICA_EFFECT`
    Legacy,
}

impl MicaSwitch {
    fn for_build(build: u32) -> Self {
        if build >= SYSTEM_BACKDROP_BUILD {
            Self::SystemBackdrop
        } else {
            Self::Legacy
        }
    }
}

/// Effects backed by DWM window attributes and the user32 accent policy.
/// Acrylic goes through `SetWindowCompositionAttribute`, which takes the
/// tint; mica uses whichever DWM attribute the running build understands.
#[derive(Debug)]
pub struct DwmEffects {
    build: u32,
    set_composition: Option<SetWindowCompositionAttributeFn>,
}

impl Default for DwmEffects {
    fn default() -> Self {
        Self::new()
    }
}

impl DwmEffects {
    pub fn new() -> Self {
        Self::for_build(Win32Platform.os_build_number())
    }

    pub fn for_build(build: u32) -> Self {
        Self {
            build,
            set_composition: load_set_window_composition_attribute(),
        }
    }

    fn set_attribute<T>(handle: WindowHandle, attribute: DWMWINDOWATTRIBUTE, value: &T) {
        let result = unsafe {
            DwmSetWindowAttribute(
                hwnd(handle),
                attribute,
                value as *const T as *const c_void,
                size_of::<T>() as u32,
            )
        };
        if let Err(e) = result {
            debug!("DwmSetWindowAttribute({:?}) failed on {:?}: {}", attribute, handle, e);
        }
    }

    fn set_backdrop(handle: WindowHandle, backdrop: DWM_SYSTEMBACKDROP_TYPE) {
        Self::set_attribute(handle, DWMWA_SYSTEMBACKDROP_TYPE, &backdrop);
    }

    fn set_accent(&self, handle: WindowHandle, mut policy: AccentPolicy) {
        let Some(set_composition) = self.set_composition else {
            debug!("SetWindowCompositionAttribute unavailable, accent {:?} skipped", policy);
            return;
        };
        let mut data = WindowCompositionAttribData {
            attribute: WCA_ACCENT_POLICY,
            data: &mut policy as *mut AccentPolicy as *mut c_void,
            size: size_of::<AccentPolicy>(),
        };
        if !unsafe { set_composition(hwnd(handle), &mut data) }.as_bool() {
            debug!("SetWindowCompositionAttribute failed on {:?}", handle);
        }
    }
}

fn load_set_window_composition_attribute() -> Option<SetWindowCompositionAttributeFn> {
    unsafe {
        let user32 = match LoadLibraryW(w!("user32.dll")) {
            Ok(module) => module,
            Err(e) => {
                warn!("Failed to load user32.dll: {}", e);
                return None;
            }
        };
        let Some(proc) = GetProcAddress(user32, s!("SetWindowCompositionAttribute")) else {
            warn!("SetWindowCompositionAttribute not exported, acrylic disabled");
            return None;
        };
        Some(std::mem::transmute::<
            unsafe extern "system" fn() -> isize,
            SetWindowCompositionAttributeFn,
        >(proc))
    }
}

impl EffectsProvider for DwmEffects {
    fn add_window_animation(&mut self, handle: WindowHandle) {
        Self::set_attribute(handle, DWMWA_TRANSITIONS_FORCEDISABLED, &BOOL::from(false));
    }

    fn add_blur_behind(&mut self, handle: WindowHandle) {
        let blur = DWM_BLURBEHIND {
            dwFlags: DWM_BB_ENABLE,
            fEnable: true.into(),
            ..Default::default()
        };
        if let Err(e) = unsafe { DwmEnableBlurBehindWindow(hwnd(handle), &blur) } {
            debug!("Blur-behind failed on {:?}: {}", handle, e);
        }
    }

    fn add_shadow(&mut self, handle: WindowHandle) {
        // A one pixel frame extension is enough for DWM to draw the shadow
        let margins = MARGINS {
            cxLeftWidth: 1,
            cxRightWidth: 1,
            cyTopHeight: 1,
            cyBottomHeight: 1,
        };
        if let Err(e) = unsafe { DwmExtendFrameIntoClientArea(hwnd(handle), &margins) } {
            debug!("Shadow failed on {:?}: {}", handle, e);
        }
    }

    fn add_mica(&mut self, handle: WindowHandle, dark_mode: bool) {
        Self::set_attribute(handle, DWMWA_USE_IMMERSIVE_DARK_MODE, &BOOL::from(dark_mode));
        match MicaSwitch::for_build(self.build) {
            MicaSwitch::SystemBackdrop => Self::set_backdrop(handle, DWMSBT_MAINWINDOW),
            MicaSwitch::Legacy => Self::set_attribute(handle, DWMWA_MICA_EFFECT, &BOOL::from(true)),
        }
    }

    fn add_acrylic(&mut self, handle: WindowHandle, tint: Rgba) {
        trace!("Acrylic on {:?}, tint {}", handle, tint);
        self.set_accent(handle, AccentPolicy::acrylic(tint));
    }

    fn remove_background(&mut self, handle: WindowHandle) {
        self.set_accent(handle, AccentPolicy::disabled());
        match MicaSwitch::for_build(self.build) {
            MicaSwitch::SystemBackdrop => Self::set_backdrop(handle, DWMSBT_NONE),
            MicaSwitch::Legacy => {
                Self::set_attribute(handle, DWMWA_MICA_EFFECT, &BOOL::from(false))
            }
        }
    }
}

/// Decode window-procedure parameters into a `WindowMessage`.
///
/// # Safety
/// For `WM_NCCALCSIZE`, `lparam` must be the pointer the window manager
/// passed: an `NCCALCSIZE_PARAMS` when `wparam` is non-zero, a `RECT`
/// otherwise.
pub unsafe fn decode(message: u32, wparam: WPARAM, lparam: LPARAM) -> WindowMessage {
    match message {
        WM_NCCALCSIZE => {
            let calc_valid_rects = wparam.0 != 0;
            let rect = unsafe { proposed_rect(calc_valid_rects, lparam) }.unwrap_or_default();
            WindowMessage::NcCalcSize { calc_valid_rects, rect }
        }
        WM_NCHITTEST => WindowMessage::NcHitTest {
            cursor: Point::new(
                (lparam.0 & 0xFFFF) as u16 as i16 as i32,
                ((lparam.0 >> 16) & 0xFFFF) as u16 as i16 as i32,
            ),
        },
        WM_NCLBUTTONDOWN => WindowMessage::NcLButtonDown,
        WM_NCLBUTTONUP => WindowMessage::NcLButtonUp,
        WM_NCRBUTTONUP => WindowMessage::NcRButtonUp,
        WM_NCMOUSELEAVE => WindowMessage::NcMouseLeave,
        WM_MOUSELEAVE => WindowMessage::MouseLeave,
        WM_TIMER => WindowMessage::Timer(TimerId(wparam.0)),
        WM_DESTROY => WindowMessage::Destroy,
        other => WindowMessage::Other(other),
    }
}

/// Write a rewritten client rectangle back through `lparam`. No-op for
/// every other message.
///
/// # Safety
/// Same contract as `decode`, for the same message.
pub unsafe fn encode(message: &WindowMessage, lparam: LPARAM) {
    let WindowMessage::NcCalcSize { calc_valid_rects, rect } = message else {
        return;
    };
    let Some(target) = (unsafe { proposed_rect_mut(*calc_valid_rects, lparam) }) else {
        return;
    };
    *target = (*rect).into();
}

unsafe fn proposed_rect(calc_valid_rects: bool, lparam: LPARAM) -> Option<Rect> {
    unsafe { proposed_rect_mut(calc_valid_rects, lparam) }.map(|rect| Rect::from(*rect))
}

unsafe fn proposed_rect_mut<'a>(calc_valid_rects: bool, lparam: LPARAM) -> Option<&'a mut RECT> {
    if lparam.0 == 0 {
        return None;
    }
    if calc_valid_rects {
        let params = lparam.0 as *mut NCCALCSIZE_PARAMS;
        unsafe { Some(&mut (*params).rgrc[0]) }
    } else {
        unsafe { (lparam.0 as *mut RECT).as_mut() }
    }
}
