use std::collections::VecDeque;

use crate::event::{Event, MouseButton, Panel};

/// Pending button releases for taps whose button-down has already gone out.
///
/// A tap is only recognized on the finger-up, so the synthesized press would
/// be zero-length without this: the down is emitted immediately and the
/// matching up is held back until `hold_ms` has passed, giving consumers
/// that sample button state between events a real pressed interval.
pub struct SimulatedClicks {
    // armed_at[panel][button] = driver timestamp of the synthesized down
    armed_at: [[Option<u64>; 2]; Panel::COUNT],
    hold_ms: u64,
}

impl SimulatedClicks {
    pub fn new(hold_ms: u64) -> Self {
        Self {
            armed_at: [[None; 2]; Panel::COUNT],
            hold_ms,
        }
    }

    /// Schedule the button-up for a tap. Re-arming an already armed button
    /// restarts its hold.
    pub fn arm(&mut self, panel: Panel, button: MouseButton, now_ms: u64) {
        self.armed_at[panel.index()][button.index()] = Some(now_ms);
    }

    /// Emit the release for every armed button whose hold has elapsed.
    /// Called once per driving-loop cycle, not per input event.
    pub fn tick(&mut self, now_ms: u64, out: &mut VecDeque<Event>) {
        for per_panel in &mut self.armed_at {
            for button in [MouseButton::Left, MouseButton::Right] {
                let slot = &mut per_panel[button.index()];
                let Some(t0) = *slot else { continue };
                if now_ms.saturating_sub(t0) < self.hold_ms {
                    continue;
                }
                out.push_back(Event::MouseUp(button));
                *slot = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_fires_once_the_hold_elapses() {
        let mut clicks = SimulatedClicks::new(50);
        let mut out = VecDeque::new();

        clicks.arm(Panel::Front, MouseButton::Left, 100);
        clicks.tick(149, &mut out);
        assert!(out.is_empty());

        clicks.tick(150, &mut out);
        assert_eq!(out.pop_front(), Some(Event::MouseUp(MouseButton::Left)));

        clicks.tick(200, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn panels_and_buttons_release_independently() {
        let mut clicks = SimulatedClicks::new(50);
        let mut out = VecDeque::new();

        clicks.arm(Panel::Front, MouseButton::Left, 0);
        clicks.arm(Panel::Rear, MouseButton::Right, 10);
        clicks.tick(40, &mut out);
        assert!(out.is_empty());

        clicks.tick(60, &mut out);
        let released: Vec<Event> = out.drain(..).collect();
        assert_eq!(
            released,
            vec![
                Event::MouseUp(MouseButton::Left),
                Event::MouseUp(MouseButton::Right),
            ]
        );
    }

    #[test]
    fn rearming_restarts_the_hold() {
        let mut clicks = SimulatedClicks::new(50);
        let mut out = VecDeque::new();

        clicks.arm(Panel::Front, MouseButton::Left, 0);
        clicks.arm(Panel::Front, MouseButton::Left, 40);
        clicks.tick(60, &mut out);
        assert!(out.is_empty());

        clicks.tick(90, &mut out);
        assert_eq!(out.pop_front(), Some(Event::MouseUp(MouseButton::Left)));
    }
}
