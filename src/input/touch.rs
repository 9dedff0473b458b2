use std::collections::VecDeque;

use crate::event::{Event, MouseButton, Panel};

use super::click::SimulatedClicks;
use super::PointerState;

/// Contacts tracked per panel. Anything beyond this is dropped.
pub const MAX_FINGERS: usize = 3;

#[derive(Debug, Clone, Copy, Default)]
struct Finger {
    id: Option<u64>,
    down_ms: u64,
    down_nx: f32,
    down_ny: f32,
    last_px: i32,
    last_py: i32,
}

/// Fixed-capacity contact table for one panel.
struct FingerTable {
    fingers: [Finger; MAX_FINGERS],
}

impl FingerTable {
    fn new() -> Self {
        Self {
            fingers: [Finger::default(); MAX_FINGERS],
        }
    }

    /// Bind `id` to the first free slot. Any slot already holding `id` is
    /// released first so an identity never occupies two slots (a missed
    /// up-event would otherwise leak one). `None` means the table is full
    /// and the contact is dropped.
    fn acquire(&mut self, id: u64, t: u64, nx: f32, ny: f32, px: i32, py: i32) -> Option<usize> {
        self.release(id);
        let slot = self.fingers.iter().position(|f| f.id.is_none())?;
        self.fingers[slot] = Finger {
            id: Some(id),
            down_ms: t,
            down_nx: nx,
            down_ny: ny,
            last_px: px,
            last_py: py,
        };
        Some(slot)
    }

    fn release(&mut self, id: u64) {
        for finger in &mut self.fingers {
            if finger.id == Some(id) {
                finger.id = None;
            }
        }
    }

    fn find(&self, id: u64) -> Option<usize> {
        self.fingers.iter().position(|f| f.id == Some(id))
    }

    fn count_down(&self) -> usize {
        self.fingers.iter().filter(|f| f.id.is_some()).count()
    }

    /// Whether no other occupied slot went down earlier.
    fn is_oldest(&self, slot: usize) -> bool {
        let down = self.fingers[slot].down_ms;
        !self
            .fingers
            .iter()
            .enumerate()
            .any(|(i, f)| i != slot && f.id.is_some() && f.down_ms < down)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drag {
    None,
    TwoFinger,
    ThreeFinger,
}

impl Drag {
    fn button(self) -> Option<MouseButton> {
        match self {
            Drag::None => None,
            Drag::TwoFinger => Some(MouseButton::Left),
            Drag::ThreeFinger => Some(MouseButton::Right),
        }
    }
}

/// Turns raw panel contacts into pointer events.
///
/// A short, stationary tap becomes a click on release: one finger left, two
/// fingers right. Two or three fingers all held past the tap timeout enter a
/// drag: the matching button goes down, motion of the oldest finger steers
/// the pointer, and the button comes back up when the contact count drops to
/// one. Everything else (third-finger taps, late releases, moved releases,
/// contacts past capacity) synthesizes nothing.
pub struct TouchRecognizer {
    tables: [FingerTable; Panel::COUNT],
    drags: [Drag; Panel::COUNT],
    tap_timeout_ms: u64,
    tap_radius_px: f32,
}

impl TouchRecognizer {
    pub fn new(tap_timeout_ms: u64, tap_radius_px: u32) -> Self {
        Self {
            tables: [FingerTable::new(), FingerTable::new()],
            drags: [Drag::None; Panel::COUNT],
            tap_timeout_ms,
            tap_radius_px: tap_radius_px as f32,
        }
    }

    pub fn handle_down(
        &mut self,
        panel: Panel,
        id: u64,
        nx: f32,
        ny: f32,
        t: u64,
        pointer: &PointerState,
    ) {
        let (px, py) = scale_to_frame(nx, ny, pointer);
        if self.tables[panel.index()]
            .acquire(id, t, nx, ny, px, py)
            .is_none()
        {
            log::debug!("[touch] table full, dropping finger {} on {:?} panel", id, panel);
        }
    }

    pub fn handle_up(
        &mut self,
        panel: Panel,
        id: u64,
        nx: f32,
        ny: f32,
        t: u64,
        pointer: &PointerState,
        clicks: &mut SimulatedClicks,
        out: &mut VecDeque<Event>,
    ) {
        let pi = panel.index();
        let table = &mut self.tables[pi];
        let Some(slot) = table.find(id) else {
            return;
        };

        // Count before this release decides what the gesture was.
        let n = table.count_down();
        let finger = table.fingers[slot];

        match self.drags[pi] {
            Drag::None => {
                let elapsed = t.saturating_sub(finger.down_ms);
                let (w, h) = (pointer.width() as f32, pointer.height() as f32);
                let dx = (nx - finger.down_nx) * w;
                let dy = (ny - finger.down_ny) * h;
                let within_radius = dx * dx + dy * dy < self.tap_radius_px * self.tap_radius_px;
                if elapsed <= self.tap_timeout_ms && within_radius {
                    match n {
                        1 => {
                            out.push_back(Event::MouseDown(MouseButton::Left));
                            clicks.arm(panel, MouseButton::Left, t);
                        }
                        2 => {
                            out.push_back(Event::MouseDown(MouseButton::Right));
                            clicks.arm(panel, MouseButton::Right, t);
                        }
                        _ => {}
                    }
                }
            }
            drag => {
                // The drag ends when this release leaves one finger down.
                if n == 2 {
                    if let Some(button) = drag.button() {
                        out.push_back(Event::MouseUp(button));
                    }
                    self.drags[pi] = Drag::None;
                }
            }
        }

        table.release(id);
    }

    pub fn handle_motion(
        &mut self,
        panel: Panel,
        id: u64,
        nx: f32,
        ny: f32,
        t: u64,
        pointer: &mut PointerState,
        out: &mut VecDeque<Event>,
    ) {
        let pi = panel.index();
        let n = self.tables[pi].count_down();
        if n == 0 {
            return;
        }

        // Drag entry is decided by how long the contacts have been held, not
        // by which finger moved, so it runs before the slot lookup.
        if n >= 2 && self.drags[pi] == Drag::None {
            let held_long = self.tables[pi]
                .fingers
                .iter()
                .filter(|f| f.id.is_some() && t.saturating_sub(f.down_ms) > self.tap_timeout_ms)
                .count();
            if held_long >= 2 {
                let (drag, button) = if held_long == 2 {
                    (Drag::TwoFinger, MouseButton::Left)
                } else {
                    (Drag::ThreeFinger, MouseButton::Right)
                };
                self.drags[pi] = drag;
                out.push_back(Event::MouseDown(button));
            }
        }

        let table = &mut self.tables[pi];
        let Some(slot) = table.find(id) else {
            return;
        };
        // Only the oldest contact steers the pointer.
        if n > 1 && !table.is_oldest(slot) {
            return;
        }

        let (px, py) = scale_to_frame(nx, ny, pointer);
        let xrel = px - table.fingers[slot].last_px;
        let yrel = py - table.fingers[slot].last_py;
        table.fingers[slot].last_px = px;
        table.fingers[slot].last_py = py;
        if xrel == 0 && yrel == 0 {
            return;
        }

        let (x, y) = pointer.shift(xrel, yrel);
        out.push_back(Event::MouseMotion { x, y });
    }
}

fn scale_to_frame(nx: f32, ny: f32, pointer: &PointerState) -> (i32, i32) {
    (
        (nx * pointer.width() as f32) as i32,
        (ny * pointer.height() as f32) as i32,
    )
}
