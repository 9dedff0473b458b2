use deckview::config::{Cli, Config};
use deckview::device::DeviceProfile;
use deckview::display::MemoryDisplay;
use deckview::event::{Event, KeyMods, Panel, RawInput};
use deckview::input::{Keymap, TranslatedKey};
use deckview::palette::{Color, PaletteMode};
use deckview::present::{Application, Control, Driver, EventSource, Frame, TickCtx};
use deckview::surface::Rect;

use clap::Parser;

const BOX_SIZE: i32 = 24;

/// ASCII passthrough plus Enter and Escape, enough for the demo.
struct DeckKeymap;

impl Keymap for DeckKeymap {
    fn translate(&self, keycode: u32) -> Option<TranslatedKey> {
        match keycode {
            13 => Some(TranslatedKey {
                key: 0x0D,
                character: None,
            }),
            27 => Some(TranslatedKey {
                key: 0x1B,
                character: None,
            }),
            32..=126 => Some(TranslatedKey {
                key: keycode as u16,
                character: char::from_u32(keycode),
            }),
            _ => None,
        }
    }
}

/// Bounces a box around the frame and cycles its color, logging whatever
/// events the input layer synthesizes along the way.
struct DemoApp {
    duration_ms: u64,
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
    prev: Option<Rect>,
    ticks: u64,
    clicks: u64,
}

impl DemoApp {
    fn new(duration_ms: u64) -> Self {
        DemoApp {
            duration_ms,
            x: 12,
            y: 12,
            dx: 3,
            dy: 2,
            prev: None,
            ticks: 0,
            clicks: 0,
        }
    }
}

impl Application for DemoApp {
    fn tick(&mut self, ctx: &mut TickCtx) -> Control {
        while let Some(event) = ctx.poll_event() {
            match event {
                Event::MouseDown(button) => {
                    self.clicks += 1;
                    log::info!("{button:?} press at {:?}", ctx.pointer);
                }
                Event::MouseUp(button) => log::info!("{button:?} release"),
                Event::Wheel(delta) => log::info!("wheel {delta:+}"),
                Event::Directions(mask) => log::debug!("directions {mask:04b}"),
                Event::Key { key, character } => log::debug!("key {key:#06x} ({character:?})"),
                Event::MouseMotion { .. } => {}
            }
        }
        if ctx.now_ms >= self.duration_ms {
            log::info!(
                "demo done after {} ticks and {} clicks",
                self.ticks,
                self.clicks
            );
            return Control::Quit;
        }
        self.ticks += 1;
        Control::Continue
    }

    fn paint(&mut self, frame: &mut Frame) {
        let (w, h) = frame.size();

        self.x += self.dx;
        self.y += self.dy;
        if self.x <= 0 || self.x + BOX_SIZE >= w as i32 {
            self.dx = -self.dx;
            self.x = self.x.clamp(0, w as i32 - BOX_SIZE);
        }
        if self.y <= 0 || self.y + BOX_SIZE >= h as i32 {
            self.dy = -self.dy;
            self.y = self.y.clamp(0, h as i32 - BOX_SIZE);
        }

        if let Some(prev) = self.prev.take() {
            fill(frame, prev, 0);
            frame.mark_dirty(prev);
        }
        let rect = Rect::new(self.x, self.y, BOX_SIZE, BOX_SIZE);
        fill(frame, rect, 1);
        frame.mark_dirty(rect);
        self.prev = Some(rect);

        let phase = (self.ticks % 255) as u8;
        frame.set_color(1, Color::rgb(255 - phase, phase, 64));
    }
}

fn fill(frame: &mut Frame, rect: Rect, index: u8) {
    let (w, h) = frame.size();
    let pitch = frame.pitch() as usize;
    let x0 = rect.x.clamp(0, w as i32) as usize;
    let y0 = rect.y.clamp(0, h as i32) as usize;
    let x1 = (rect.x + rect.w).clamp(0, w as i32) as usize;
    let y1 = (rect.y + rect.h).clamp(0, h as i32) as usize;
    let pixels = frame.pixels_mut();
    for y in y0..y1 {
        pixels[y * pitch + x0..y * pitch + x1].fill(index);
    }
}

/// A canned input tour: a quick tap, a two-finger drag, a stick sweep and
/// a keypress, so the demo exercises the whole event path without real
/// hardware.
struct ScriptedTour {
    script: Vec<(u64, RawInput)>,
    next: usize,
}

impl ScriptedTour {
    fn new() -> Self {
        fn down(finger: u64, x: f32, y: f32, at: u64) -> RawInput {
            RawInput::TouchDown {
                panel: Panel::Front,
                finger,
                x,
                y,
                timestamp_ms: at,
            }
        }
        fn motion(finger: u64, x: f32, y: f32, at: u64) -> RawInput {
            RawInput::TouchMotion {
                panel: Panel::Front,
                finger,
                x,
                y,
                timestamp_ms: at,
            }
        }
        fn up(finger: u64, x: f32, y: f32, at: u64) -> RawInput {
            RawInput::TouchUp {
                panel: Panel::Front,
                finger,
                x,
                y,
                timestamp_ms: at,
            }
        }

        let script = vec![
            // a quick tap in the middle
            (300, down(1, 0.5, 0.5, 300)),
            (380, up(1, 0.5, 0.5, 380)),
            // two fingers held past the tap window, then dragged
            (700, down(1, 0.4, 0.4, 700)),
            (720, down(2, 0.6, 0.4, 720)),
            (1000, motion(1, 0.45, 0.45, 1000)),
            (1040, motion(1, 0.5, 0.5, 1040)),
            (1080, up(2, 0.6, 0.4, 1080)),
            (1120, up(1, 0.5, 0.5, 1120)),
            // a stick sweep and a shoulder scroll
            (1400, RawInput::StickAxis { axis: 0, value: 4000 }),
            (1430, RawInput::StickAxis { axis: 0, value: 4000 }),
            (1460, RawInput::StickAxis { axis: 1, value: -2500 }),
            (1600, RawInput::ButtonDown { button: 4 }),
            (1630, RawInput::ButtonUp { button: 4 }),
            // type a letter
            (
                1800,
                RawInput::KeyDown {
                    keycode: 97,
                    mods: KeyMods::default(),
                },
            ),
        ];
        ScriptedTour { script, next: 0 }
    }
}

impl EventSource for ScriptedTour {
    fn poll(&mut self, now_ms: u64) -> Option<RawInput> {
        let (at, raw) = *self.script.get(self.next)?;
        if now_ms < at {
            return None;
        }
        self.next += 1;
        Some(raw)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::load(&cli);
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {e}");
        std::process::exit(1);
    }

    log::info!(
        "deckview starting (frame={}x{}, threaded={}, rear_touch={})",
        config.width,
        config.height,
        config.threaded,
        config.rear_touch
    );

    let mode = if cli.blitter_palette {
        PaletteMode::Blitter
    } else {
        PaletteMode::Backend
    };
    let profile = DeviceProfile::current();
    let display = MemoryDisplay::new(profile.display_width, profile.display_height, mode);
    let view = display.clone();

    let mut driver = Driver::start(&config, Box::new(display), Box::new(DeckKeymap))?;
    let mut app = DemoApp::new(cli.duration_ms);
    let mut tour = ScriptedTour::new();
    driver.run(&mut app, &mut tour)?;

    let stats = view.stats();
    log::info!(
        "presented {} frames ({} full), {} color table pushes",
        stats.presents,
        stats.full_presents,
        stats.color_table_pushes.len()
    );
    Ok(())
}
