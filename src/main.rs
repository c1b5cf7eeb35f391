//! area-chrome
//!
//! Replays a recorded trace of window messages and widget events against
//! the in-memory platform and logs how the chrome answered each one. One
//! JSON object per line; blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! {"type":"NcHitTest","x":820,"y":110}
//! {"type":"NcLButtonDown"}
//! {"type":"NcLButtonUp"}
//! {"type":"Resized","width":1920,"height":1040}
//! {"type":"Wait","ms":120}
//! ```

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use area_chrome::platform::sim::{RecordingEffects, SimPlatform};
use area_chrome::platform::{ScreenEdge, ShowState};
use area_chrome::shared::{Point, Rect, Size};
use area_chrome::titlebar::MouseButton;
use area_chrome::{ChromeConfig, ChromeWindow, Outcome, RawMessage, WindowHandle, WindowMessage};

const TRACE_HANDLE: WindowHandle = WindowHandle(1);

/// Simulated primary monitor
const SCREEN_WIDTH: i32 = 1920;
const SCREEN_HEIGHT: i32 = 1080;

/// One line of a replay trace
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
enum TraceEvent {
    /// Change the placement the platform reports
    Placement {
        state: ShowState,
        #[serde(default)]
        rect: Option<Rect>,
    },

    /// Configure the shell's auto-hide app-bars
    Taskbar {
        auto_hide: bool,
        #[serde(default)]
        edges: Vec<ScreenEdge>,
    },

    NcCalcSize {
        calc_valid_rects: bool,
        rect: Rect,
    },
    NcHitTest { x: i32, y: i32 },
    NcLButtonDown,
    NcLButtonUp,
    NcRButtonUp,
    NcMouseLeave,
    MouseLeave,
    Destroy,

    Moved,
    Resized { width: i32, height: i32 },

    PointerMoved { x: i32, y: i32 },
    PointerPressed {
        x: i32,
        y: i32,
        #[serde(default = "left_button")]
        button: MouseButton,
    },
    PointerReleased {
        x: i32,
        y: i32,
        #[serde(default = "left_button")]
        button: MouseButton,
    },
    DoubleClicked {
        x: i32,
        y: i32,
        #[serde(default = "left_button")]
        button: MouseButton,
    },
    PointerLeft,

    SetTitle { title: String },
    SetIcon { present: bool },

    /// Advance the virtual clock and deliver any timers that came due
    Wait { ms: u64 },
}

fn left_button() -> MouseButton {
    MouseButton::Left
}

struct Args {
    trace: PathBuf,
    config: Option<PathBuf>,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut trace = None;
        let mut config = None;
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let path = args.next().context("--config requires a path")?;
                    config = Some(PathBuf::from(path));
                }
                _ if arg.starts_with('-') => bail!("Unknown option: {}", arg),
                _ if trace.is_none() => trace = Some(PathBuf::from(arg)),
                _ => bail!("Unexpected argument: {}", arg),
            }
        }

        let trace = trace.context("Usage: area-chrome <trace.jsonl> [--config <path>]")?;
        Ok(Self { trace, config })
    }
}

type SimWindow = ChromeWindow<SimPlatform, RecordingEffects>;

struct Replay {
    window: SimWindow,
    routed: usize,
    handled: usize,
}

impl Replay {
    fn new(config: &ChromeConfig) -> Result<Self> {
        let platform = SimPlatform::single_monitor(SCREEN_WIDTH, SCREEN_HEIGHT);
        let window = ChromeWindow::new(TRACE_HANDLE, config, platform, RecordingEffects::default())
            .context("Invalid chrome configuration")?;
        Ok(Self {
            window,
            routed: 0,
            handled: 0,
        })
    }

    fn route(&mut self, message: WindowMessage) {
        let mut raw = RawMessage::new(TRACE_HANDLE, message);
        let outcome = self.window.route_message(&mut raw);
        self.routed += 1;
        if matches!(outcome, Outcome::Handled(_)) {
            self.handled += 1;
        }
        match raw.message {
            WindowMessage::NcCalcSize { rect, .. } => {
                info!("{:?} -> {:?}, client {:?}", message, outcome, rect)
            }
            _ => info!("{:?} -> {:?}", message, outcome),
        }
    }

    fn apply(&mut self, event: TraceEvent) {
        match event {
            TraceEvent::Placement { state, rect } => {
                let sim = self.window.platform_mut();
                sim.show_state = state;
                if let Some(rect) = rect {
                    sim.window_rect = rect;
                }
                debug!("Placement now {:?} at {:?}", sim.show_state, sim.window_rect);
            }
            TraceEvent::Taskbar { auto_hide, edges } => {
                let sim = self.window.platform_mut();
                sim.auto_hide = auto_hide;
                sim.app_bars = edges;
            }
            TraceEvent::NcCalcSize { calc_valid_rects, rect } => {
                self.route(WindowMessage::NcCalcSize { calc_valid_rects, rect })
            }
            TraceEvent::NcHitTest { x, y } => {
                self.route(WindowMessage::NcHitTest { cursor: Point::new(x, y) })
            }
            TraceEvent::NcLButtonDown => self.route(WindowMessage::NcLButtonDown),
            TraceEvent::NcLButtonUp => self.route(WindowMessage::NcLButtonUp),
            TraceEvent::NcRButtonUp => self.route(WindowMessage::NcRButtonUp),
            TraceEvent::NcMouseLeave => self.route(WindowMessage::NcMouseLeave),
            TraceEvent::MouseLeave => self.route(WindowMessage::MouseLeave),
            TraceEvent::Destroy => self.route(WindowMessage::Destroy),
            TraceEvent::Moved => self.window.on_moved(),
            TraceEvent::Resized { width, height } => self.window.on_resized(Size::new(width, height)),
            TraceEvent::PointerMoved { x, y } => self.window.pointer_moved(Point::new(x, y)),
            TraceEvent::PointerPressed { x, y, button } => {
                self.window.pointer_pressed(Point::new(x, y), button)
            }
            TraceEvent::PointerReleased { x, y, button } => {
                self.window.pointer_released(Point::new(x, y), button)
            }
            TraceEvent::DoubleClicked { x, y, button } => {
                self.window.double_clicked(Point::new(x, y), button)
            }
            TraceEvent::PointerLeft => self.window.pointer_left(),
            TraceEvent::SetTitle { title } => self.window.set_title(&title),
            TraceEvent::SetIcon { present } => self.window.set_icon(present),
            TraceEvent::Wait { ms } => {
                let firings = self.window.platform_mut().advance(Duration::from_millis(ms));
                for firing in firings {
                    debug!("Timer {:?} fired at {:?}", firing.id, firing.at);
                    self.route(WindowMessage::Timer(firing.id));
                }
            }
        }

        for command in self.window.platform_mut().take_commands() {
            debug!("Platform command: {:?}", command);
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "area_chrome=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse()?;

    let config = match &args.config {
        Some(path) => ChromeConfig::load_from(path)?,
        None => ChromeConfig::load()?,
    };
    info!("Replaying {:?} with {:?}", args.trace, config);

    let trace = std::fs::read_to_string(&args.trace)
        .with_context(|| format!("Failed to read trace file: {:?}", args.trace))?;

    let mut replay = Replay::new(&config)?;
    for (index, line) in trace.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event: TraceEvent = serde_json::from_str(line)
            .with_context(|| format!("Invalid trace event on line {}", index + 1))?;
        replay.apply(event);
    }

    info!(
        "Replay finished: {} messages routed, {} handled, backdrop {}",
        replay.routed,
        replay.handled,
        if replay.window.backdrop_enabled() { "active" } else { "inactive" }
    );
    for call in &replay.window.effects().calls {
        debug!("Effect call: {:?}", call);
    }

    Ok(())
}
