/// Terminal host for the tutorial scenes
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::debug;
use scenery_core::{
    demos, CommandQueue, Command, Error, FrameScheduler, Result as CoreResult, SystemClock, UpdateLoop,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod cli;
pub mod deck;
pub mod headless;
pub mod renderer;

pub use deck::ControlDeck;
pub use headless::{run_headless, HeadlessOptions, HeadlessReport};
pub use renderer::{RenderStyle, TerminalSurface};

/// Rows kept below the picture for the status lines.
const HUD_ROWS: u16 = 2;

fn surface_error(error: io::Error) -> Error {
    Error::Surface(error.to_string())
}

/// Picture size in framebuffer pixels for a terminal of `cols` x `rows`.
fn picture_size(style: RenderStyle, cols: u16, rows: u16) -> (u32, u32) {
    let rows = rows.saturating_sub(HUD_ROWS).max(1);
    (u32::from(cols.max(1)), style.pixel_rows(rows))
}

/// Paces frames and turns terminal events into commands between them
pub struct TerminalScheduler {
    deck: ControlDeck,
    style: RenderStyle,
    scene: &'static str,
    size: (u16, u16),
    frame_time: Duration,
    frame_start: Instant,
    last_report: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalScheduler {
    pub fn new(deck: ControlDeck, style: RenderStyle, scene: &'static str, size: (u16, u16), fps: u32) -> Self {
        let now = Instant::now();
        Self {
            deck,
            style,
            scene,
            size,
            frame_time: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
            frame_start: now,
            last_report: now,
            frame_count: 0,
            fps: 0.0,
        }
    }

    fn draw_hud(&self) -> io::Result<()> {
        let mut stdout = stdout();
        let top = self.size.1.saturating_sub(HUD_ROWS);
        queue!(
            stdout,
            cursor::MoveTo(0, top),
            terminal::Clear(ClearType::FromCursorDown),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "{} | FPS: {:.1} | Tab=Select +/-=Adjust Space=Toggle Arrows=Orbit Shift+Arrows=Pan PgUp/PgDn=Zoom Q=Quit",
                self.scene, self.fps
            )),
            cursor::MoveTo(0, top + 1),
            SetForegroundColor(Color::Cyan),
            Print(self.deck.status()),
            ResetColor
        )?;
        stdout.flush()
    }

    fn translate(&mut self, event: Event) -> Option<Command> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.deck.handle_key(key),
            Event::Resize(cols, rows) => {
                self.size = (cols, rows);
                let (width, height) = picture_size(self.style, cols, rows);
                Some(Command::Resize { width, height })
            }
            Event::Mouse(mouse) => {
                let (cols, rows) = (f32::from(self.size.0.max(1)), f32::from(self.size.1.max(1)));
                match mouse.kind {
                    MouseEventKind::Moved => Some(Command::Pointer {
                        x: f32::from(mouse.column) / cols * 2.0 - 1.0,
                        y: -(f32::from(mouse.row) / rows) * 2.0 + 1.0,
                    }),
                    MouseEventKind::ScrollUp => Some(Command::OrbitZoom(0.95)),
                    MouseEventKind::ScrollDown => Some(Command::OrbitZoom(1.0 / 0.95)),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

impl FrameScheduler for TerminalScheduler {
    fn wait_for_next_frame(&mut self, queue: &CommandQueue) -> CoreResult<()> {
        self.frame_count += 1;
        let now = Instant::now();
        if (now - self.last_report).as_secs() >= 1 {
            self.fps = self.frame_count as f32 / (now - self.last_report).as_secs_f32();
            self.frame_count = 0;
            self.last_report = now;
        }
        self.draw_hud().map_err(surface_error)?;

        // Handle input until the frame budget runs out
        let deadline = self.frame_start + self.frame_time;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining).map_err(surface_error)? {
                break;
            }
            let event = event::read().map_err(surface_error)?;
            if let Some(command) = self.translate(event) {
                debug!("terminal input -> {command:?}");
                queue.push(command);
            }
            if remaining.is_zero() {
                break;
            }
        }
        self.frame_start = Instant::now();
        Ok(())
    }
}

/// Main application struct for interactive terminal rendering
pub struct TerminalApp {
    update: UpdateLoop<SystemClock>,
    style: RenderStyle,
    fps: u32,
    size: (u16, u16),
}

impl TerminalApp {
    pub fn new(scene: &str, style: RenderStyle, fps: u32) -> anyhow::Result<Self> {
        let size = terminal::size()?;
        let (width, height) = picture_size(style, size.0, size.1);
        let demo = demos::build(scene, width, height)?;
        Ok(Self {
            update: UpdateLoop::new(demo, SystemClock::new()),
            style,
            fps,
            size,
        })
    }

    /// Run until the user quits. Returns the number of frames rendered.
    pub fn run(&mut self) -> anyhow::Result<u64> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide, EnableMouseCapture)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> anyhow::Result<u64> {
        let deck = ControlDeck::new(self.update.panel().controls().iter().map(|c| c.spec.clone()));
        let mut scheduler = TerminalScheduler::new(deck, self.style, self.update.name(), self.size, self.fps);
        let viewport = self.update.context().viewport;
        let mut surface = TerminalSurface::new(stdout(), self.style, viewport.width, viewport.height);
        Ok(self.update.run(&mut surface, &mut scheduler)?)
    }
}
