//! Raw hardware samples coming in from the platform event poller, and the
//! canonical events the driver synthesizes for the application queue.

/// Touch panel identifier. The rear panel is tracked separately and only
/// processed when enabled in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Front,
    Rear,
}

impl Panel {
    pub const COUNT: usize = 2;

    pub fn index(self) -> usize {
        match self {
            Panel::Front => 0,
            Panel::Rear => 1,
        }
    }
}

/// Synthesized mouse button. Taps and drags only ever produce these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

impl MouseButton {
    pub(crate) fn index(self) -> usize {
        match self {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
        }
    }
}

/// Modifier state delivered alongside a raw key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyMods {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

/// One raw sample from the input layer. Touch coordinates are normalized to
/// `[0.0, 1.0]` over the panel; timestamps are milliseconds on the driver
/// clock (see `present::EventSource`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput {
    TouchDown { panel: Panel, finger: u64, x: f32, y: f32, timestamp_ms: u64 },
    TouchUp { panel: Panel, finger: u64, x: f32, y: f32, timestamp_ms: u64 },
    TouchMotion { panel: Panel, finger: u64, x: f32, y: f32, timestamp_ms: u64 },
    StickAxis { axis: u8, value: i16 },
    ButtonDown { button: u8 },
    ButtonUp { button: u8 },
    KeyDown { keycode: u32, mods: KeyMods },
}

/// Canonical event delivered to the application queue. Pointer coordinates
/// are frame pixels, already clamped to the frame bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    MouseMotion { x: i32, y: i32 },
    MouseDown(MouseButton),
    MouseUp(MouseButton),
    Wheel(i32),
    /// Held-direction bitmask; see the `DIR_*` constants in `input`.
    Directions(u8),
    /// A key press after translation, with modifier bits folded in.
    Key { key: u16, character: Option<char> },
}
