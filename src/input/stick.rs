use std::collections::VecDeque;

use crate::event::{Event, MouseButton};

use super::PointerState;

/// Held-direction bits reported through `Event::Directions`.
pub const DIR_LEFT: u8 = 1;
pub const DIR_UP: u8 = 2;
pub const DIR_RIGHT: u8 = 4;
pub const DIR_DOWN: u8 = 8;

// Physical button ids on the handheld.
const BTN_RIGHT_CLICK: u8 = 1;
const BTN_LEFT_CLICK: u8 = 2;
const BTN_SHOULDER_L: u8 = 4;
const BTN_SHOULDER_R: u8 = 5;
const BTN_DPAD_DOWN: u8 = 6;
const BTN_DPAD_LEFT: u8 = 7;
const BTN_DPAD_UP: u8 = 8;
const BTN_DPAD_RIGHT: u8 = 9;

/// Analog stick and discrete button handling. The stick nudges the pointer
/// by `value / 100` per sample, face buttons map to the mouse, the
/// shoulders scroll and the d-pad feeds the direction mask.
pub struct StickState {
    directions: u8,
}

impl StickState {
    pub fn new() -> Self {
        Self { directions: 0 }
    }

    pub fn handle_axis(
        &mut self,
        axis: u8,
        value: i16,
        pointer: &mut PointerState,
        out: &mut VecDeque<Event>,
    ) {
        let delta = value as i32 / 100;
        if delta == 0 {
            return;
        }
        let (x, y) = match axis {
            0 | 2 => pointer.shift(delta, 0),
            1 | 3 => pointer.shift(0, delta),
            _ => return,
        };
        out.push_back(Event::MouseMotion { x, y });
    }

    pub fn handle_button(&mut self, button: u8, pressed: bool, out: &mut VecDeque<Event>) {
        let dir_bit = match button {
            BTN_DPAD_DOWN => Some(DIR_DOWN),
            BTN_DPAD_LEFT => Some(DIR_LEFT),
            BTN_DPAD_UP => Some(DIR_UP),
            BTN_DPAD_RIGHT => Some(DIR_RIGHT),
            _ => None,
        };
        if let Some(bit) = dir_bit {
            let updated = if pressed {
                self.directions | bit
            } else {
                self.directions & !bit
            };
            if updated != self.directions {
                self.directions = updated;
                out.push_back(Event::Directions(updated));
            }
            return;
        }

        match button {
            BTN_RIGHT_CLICK if pressed => out.push_back(Event::MouseDown(MouseButton::Right)),
            BTN_RIGHT_CLICK => out.push_back(Event::MouseUp(MouseButton::Right)),
            BTN_LEFT_CLICK if pressed => out.push_back(Event::MouseDown(MouseButton::Left)),
            BTN_LEFT_CLICK => out.push_back(Event::MouseUp(MouseButton::Left)),
            BTN_SHOULDER_L if pressed => out.push_back(Event::Wheel(1)),
            BTN_SHOULDER_R if pressed => out.push_back(Event::Wheel(-1)),
            _ => {}
        }
    }

    pub fn directions(&self) -> u8 {
        self.directions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stick_motion_scales_down_and_clamps() {
        let mut stick = StickState::new();
        let mut pointer = PointerState::new(480, 272);
        let mut out = VecDeque::new();

        stick.handle_axis(0, 1000, &mut pointer, &mut out);
        assert_eq!(out.pop_front(), Some(Event::MouseMotion { x: 10, y: 0 }));

        // Below the divisor nothing moves.
        stick.handle_axis(0, 99, &mut pointer, &mut out);
        assert!(out.is_empty());

        // Pushing past the top edge pins y at zero.
        stick.handle_axis(1, -5000, &mut pointer, &mut out);
        assert_eq!(out.pop_front(), Some(Event::MouseMotion { x: 10, y: 0 }));
    }

    #[test]
    fn face_buttons_map_to_the_mouse() {
        let mut stick = StickState::new();
        let mut out = VecDeque::new();

        stick.handle_button(2, true, &mut out);
        stick.handle_button(2, false, &mut out);
        stick.handle_button(1, true, &mut out);
        stick.handle_button(1, false, &mut out);

        let events: Vec<Event> = out.drain(..).collect();
        assert_eq!(
            events,
            vec![
                Event::MouseDown(MouseButton::Left),
                Event::MouseUp(MouseButton::Left),
                Event::MouseDown(MouseButton::Right),
                Event::MouseUp(MouseButton::Right),
            ]
        );
    }

    #[test]
    fn shoulders_scroll_on_press_only() {
        let mut stick = StickState::new();
        let mut out = VecDeque::new();

        stick.handle_button(4, true, &mut out);
        stick.handle_button(4, false, &mut out);
        stick.handle_button(5, true, &mut out);

        let events: Vec<Event> = out.drain(..).collect();
        assert_eq!(events, vec![Event::Wheel(1), Event::Wheel(-1)]);
    }

    #[test]
    fn dpad_reports_one_event_per_mask_change() {
        let mut stick = StickState::new();
        let mut out = VecDeque::new();

        stick.handle_button(7, true, &mut out);
        assert_eq!(out.pop_front(), Some(Event::Directions(DIR_LEFT)));

        stick.handle_button(8, true, &mut out);
        assert_eq!(out.pop_front(), Some(Event::Directions(DIR_LEFT | DIR_UP)));

        // Auto-repeat of a held button changes nothing.
        stick.handle_button(8, true, &mut out);
        assert!(out.is_empty());

        stick.handle_button(7, false, &mut out);
        assert_eq!(out.pop_front(), Some(Event::Directions(DIR_UP)));

        stick.handle_button(6, true, &mut out);
        stick.handle_button(9, true, &mut out);
        let events: Vec<Event> = out.drain(..).collect();
        assert_eq!(
            events,
            vec![
                Event::Directions(DIR_UP | DIR_DOWN),
                Event::Directions(DIR_UP | DIR_DOWN | DIR_RIGHT),
            ]
        );
    }
}
