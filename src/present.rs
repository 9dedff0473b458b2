//! The driving loop and the render thread behind it.
//!
//! The driving thread pumps raw input, steps the application at a fixed
//! tick rate and paints into the shared frame under its lock. Each painted
//! frame is announced through a one-slot channel; the render thread picks
//! the accumulated dirty regions up, converts them through the color table
//! and pushes them to the display backend. A full slot just means a wakeup
//! is already pending, so regions ride along with the earlier announcement
//! and nothing is lost.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::device::DeviceProfile;
use crate::dirty::DirtyRegions;
use crate::display::DisplayBackend;
use crate::event::{Event, RawInput};
use crate::input::{InputState, Keymap};
use crate::palette::{Color, Palette, PaletteMode};
use crate::surface::{Rect, Surface};

/// Everything the driving thread mutates between presents and the render
/// thread reads during one, all behind a single lock.
pub struct FrameState {
    pub surface: Surface,
    pub dirty: DirtyRegions,
    pub palette: Palette,
}

/// The application's view of the shared frame during [`Application::paint`].
pub struct Frame<'a> {
    state: &'a mut FrameState,
}

impl Frame<'_> {
    pub fn size(&self) -> (u32, u32) {
        (self.state.surface.width(), self.state.surface.height())
    }

    pub fn pitch(&self) -> u32 {
        self.state.surface.pitch()
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        self.state.surface.pixels_mut()
    }

    /// Queue a frame-space rectangle for the next present. Parts outside
    /// the frame are cut off; rectangles left empty by that are ignored.
    pub fn mark_dirty(&mut self, rect: Rect) {
        let clipped = rect.clipped(self.state.surface.width(), self.state.surface.height());
        if clipped.is_empty() {
            return;
        }
        self.state.dirty.mark(clipped);
    }

    pub fn mark_all_dirty(&mut self) {
        self.state.dirty.mark_all();
    }

    pub fn set_color(&mut self, index: usize, color: Color) {
        self.state.palette.set(index, color);
    }

    pub fn set_colors(&mut self, first: usize, colors: &[Color]) {
        self.state.palette.set_range(first, colors);
    }
}

/// Decision returned by [`Application::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// The simulation plugged into the driver. `tick` runs one fixed-rate step
/// and may overlap with a present; `paint` runs under the frame lock and is
/// the only place the surface, dirty regions and palette may change.
pub trait Application {
    fn tick(&mut self, ctx: &mut TickCtx) -> Control;
    fn paint(&mut self, frame: &mut Frame);
}

/// One simulation step's view of the driver.
pub struct TickCtx<'a> {
    events: &'a mut VecDeque<Event>,
    /// Driver clock, milliseconds since [`Driver::run`] began.
    pub now_ms: u64,
    /// Pointer position in frame pixels.
    pub pointer: (i32, i32),
}

impl TickCtx<'_> {
    /// Next synthesized event, oldest first.
    pub fn poll_event(&mut self) -> Option<Event> {
        self.events.pop_front()
    }
}

/// Where raw samples come from. The driver drains the source every cycle
/// until it reports empty.
pub trait EventSource {
    fn poll(&mut self, now_ms: u64) -> Option<RawInput>;
}

/// Render-side state: the packed color table, the output buffer and the
/// backend handle. Behind its own lock, taken only with the frame lock held.
struct Presenter {
    backend: Box<dyn DisplayBackend>,
    mode: PaletteMode,
    table: [u32; 256],
    out: Vec<u32>,
    out_width: u32,
    out_height: u32,
}

impl Presenter {
    fn new(backend: Box<dyn DisplayBackend>) -> Self {
        let (out_width, out_height) = backend.size();
        let mode = backend.palette_mode();
        Presenter {
            backend,
            mode,
            table: [0; 256],
            out: vec![0; out_width as usize * out_height as usize],
            out_width,
            out_height,
        }
    }

    /// One presentation pass: apply pending palette changes, then convert
    /// and push the dirty regions. With nothing to do the backend is not
    /// touched, so calling this again on a clean frame is a no-op.
    fn pass(
        &mut self,
        frame: &mut FrameState,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let (rects, overflowed) = frame.dirty.take_all();
        let mut full = overflowed;

        if let Some((first, count)) = frame.palette.take_dirty() {
            match self.mode {
                PaletteMode::Backend => {
                    for i in first..first + count {
                        self.table[i] = pack(frame.palette.entries[i]);
                    }
                    self.backend
                        .set_color_table(first, &frame.palette.entries[first..first + count])?;
                }
                PaletteMode::Blitter => {
                    // No hardware table to change, so every pixel on screen
                    // converted through the old colors is stale.
                    for (slot, &color) in self.table.iter_mut().zip(frame.palette.entries.iter()) {
                        *slot = pack(color);
                    }
                    full = true;
                }
            }
        }

        let display_rects: Vec<Rect> = if full {
            vec![Rect::new(0, 0, self.out_width as i32, self.out_height as i32)]
        } else {
            rects
                .iter()
                .map(|rect| self.scale_rect(rect, &frame.surface))
                .filter(|rect| !rect.is_empty())
                .collect()
        };
        if display_rects.is_empty() {
            return Ok(());
        }

        for rect in &display_rects {
            self.convert(&frame.surface, rect);
        }
        self.backend.present(&self.out, &display_rects, full)
    }

    /// Frame-space rectangle to output space, edges rounded outward.
    fn scale_rect(&self, rect: &Rect, surface: &Surface) -> Rect {
        let rect = rect.clipped(surface.width(), surface.height());
        if rect.is_empty() {
            return rect;
        }
        let fw = surface.width() as i64;
        let fh = surface.height() as i64;
        let dw = self.out_width as i64;
        let dh = self.out_height as i64;
        let x0 = rect.x as i64 * dw / fw;
        let y0 = rect.y as i64 * dh / fh;
        let x1 = ((rect.x + rect.w) as i64 * dw + fw - 1) / fw;
        let y1 = ((rect.y + rect.h) as i64 * dh + fh - 1) / fh;
        Rect::new(x0 as i32, y0 as i32, (x1 - x0) as i32, (y1 - y0) as i32)
    }

    /// Nearest-neighbor conversion of one output-space rectangle from the
    /// indexed surface into the packed output buffer.
    fn convert(&mut self, surface: &Surface, rect: &Rect) {
        let fw = surface.width() as usize;
        let fh = surface.height() as usize;
        let dw = self.out_width as usize;
        let dh = self.out_height as usize;

        for oy in rect.y..rect.y + rect.h {
            let src = surface.row((oy as usize * fh / dh) as u32);
            let base = oy as usize * dw;
            for ox in rect.x..rect.x + rect.w {
                let sx = ox as usize * fw / dw;
                self.out[base + ox as usize] = self.table[src[sx] as usize];
            }
        }
    }
}

fn pack(color: Color) -> u32 {
    (color.r as u32) << 16 | (color.g as u32) << 8 | color.b as u32
}

/// Driver context: the shared frame and render state plus everything owned
/// by the driving thread.
pub struct Driver {
    frame: Arc<Mutex<FrameState>>,
    presenter: Arc<Mutex<Presenter>>,
    input: InputState,
    keymap: Box<dyn Keymap>,
    events: VecDeque<Event>,
    threaded: bool,
    tick_ms: u64,
    frame_width: u32,
    frame_height: u32,
}

impl Driver {
    /// Bring the driver up: validate the configuration, snap the requested
    /// frame size to the closest supported mode and prime a full first
    /// presentation (whole color table, whole panel).
    pub fn start(
        config: &Config,
        backend: Box<dyn DisplayBackend>,
        keymap: Box<dyn Keymap>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        config
            .validate()
            .map_err(|err| format!("invalid configuration: {err}"))?;

        let profile = DeviceProfile::current();
        let (width, height) = profile.nearest_mode(config.width, config.height);
        if (width, height) != (config.width, config.height) {
            log::info!(
                "no {}x{} mode on {}, using {}x{}",
                config.width,
                config.height,
                profile.name,
                width,
                height
            );
        }

        let presenter = Presenter::new(backend);
        log::info!(
            "driver up: frame {}x{}, output {}x{}, {:?} palette",
            width,
            height,
            presenter.out_width,
            presenter.out_height,
            presenter.mode
        );

        let mut frame = FrameState {
            surface: Surface::new(width, height),
            dirty: DirtyRegions::new(),
            palette: Palette::new(),
        };
        frame.palette.mark_all_dirty();
        frame.dirty.mark_all();

        Ok(Driver {
            frame: Arc::new(Mutex::new(frame)),
            presenter: Arc::new(Mutex::new(presenter)),
            input: InputState::new(config, width, height),
            keymap,
            events: VecDeque::new(),
            threaded: config.threaded,
            tick_ms: config.tick_ms,
            frame_width: width,
            frame_height: height,
        })
    }

    /// Selected frame resolution.
    pub fn frame_size(&self) -> (u32, u32) {
        (self.frame_width, self.frame_height)
    }

    /// Drive the application until its tick asks to quit. Raw samples are
    /// pumped every cycle; the simulation steps at the configured tick rate
    /// and each painted frame is announced to the render thread, or
    /// presented inline when unthreaded.
    pub fn run(
        &mut self,
        app: &mut dyn Application,
        source: &mut dyn EventSource,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let cont = Arc::new(AtomicBool::new(true));
        let (signal, wakeups) = mpsc::sync_channel::<()>(1);

        let mut render_thread = None;
        if self.threaded {
            let frame = Arc::clone(&self.frame);
            let presenter = Arc::clone(&self.presenter);
            let render_cont = Arc::clone(&cont);
            let spawned = thread::Builder::new()
                .name("render".into())
                .spawn(move || render_loop(&frame, &presenter, &render_cont, wakeups));
            match spawned {
                Ok(handle) => render_thread = Some(handle),
                Err(err) => log::warn!("[render] thread unavailable, presenting inline: {err}"),
            }
        }
        let threaded = render_thread.is_some();

        let epoch = Instant::now();
        let tick = Duration::from_millis(self.tick_ms);
        let mut next_tick = epoch;

        loop {
            let now_ms = epoch.elapsed().as_millis() as u64;
            while let Some(raw) = source.poll(now_ms) {
                self.input.dispatch(raw, self.keymap.as_ref(), &mut self.events);
            }
            self.input.tick_clicks(now_ms, &mut self.events);

            if Instant::now() >= next_tick {
                // Rescheduled from now rather than advanced, so a slow tick
                // does not trigger a catch-up burst.
                next_tick = Instant::now() + tick;

                let mut ctx = TickCtx {
                    events: &mut self.events,
                    now_ms,
                    pointer: self.input.pointer(),
                };
                if app.tick(&mut ctx) == Control::Quit {
                    break;
                }

                {
                    let mut frame = self.frame.lock().map_err(|_| "frame lock poisoned")?;
                    app.paint(&mut Frame { state: &mut *frame });
                }

                if threaded {
                    let _ = signal.try_send(());
                } else {
                    self.present_inline()?;
                }
            } else {
                thread::sleep(Duration::from_millis(1));
            }
        }

        cont.store(false, Ordering::Relaxed);
        if let Some(handle) = render_thread {
            // Wake the render thread so it sees the cleared flag. A full
            // slot means it is about to wake anyway.
            let _ = signal.try_send(());
            if handle.join().is_err() {
                log::error!("[render] thread panicked");
            }
        }
        Ok(())
    }

    fn present_inline(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut frame = self.frame.lock().map_err(|_| "frame lock poisoned")?;
        let mut presenter = self
            .presenter
            .lock()
            .map_err(|_| "presenter lock poisoned")?;
        if let Err(err) = presenter.pass(&mut frame) {
            log::error!("present failed: {err}");
        }
        Ok(())
    }
}

fn render_loop(
    frame: &Mutex<FrameState>,
    presenter: &Mutex<Presenter>,
    cont: &AtomicBool,
    wakeups: Receiver<()>,
) {
    log::debug!("[render] thread starting");
    while wakeups.recv().is_ok() {
        if !cont.load(Ordering::Relaxed) {
            break;
        }
        let Ok(mut frame) = frame.lock() else { break };
        let Ok(mut presenter) = presenter.lock() else { break };
        if let Err(err) = presenter.pass(&mut frame) {
            log::error!("[render] present failed: {err}");
        }
    }
    log::debug!("[render] thread stopping");
}
