//! Raw-sample fan-out: one [`InputState`] owns every recognizer and the
//! pointer they steer. Raw samples go in, canonical events come out.

mod click;
mod keymap;
mod stick;
mod touch;

pub use click::SimulatedClicks;
pub use keymap::{Keymap, TranslatedKey, KEY_ALT, KEY_CTRL, KEY_SHIFT};
pub use stick::{StickState, DIR_DOWN, DIR_LEFT, DIR_RIGHT, DIR_UP};
pub use touch::{TouchRecognizer, MAX_FINGERS};

use std::collections::VecDeque;

use crate::config::Config;
use crate::event::{Event, Panel, RawInput};

/// Absolute cursor position in frame pixels, clamped to the frame bounds
/// (inclusive, matching physical-mouse behavior at the edges).
pub struct PointerState {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

impl PointerState {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Move by a delta, truncated at the frame boundary. Returns the new
    /// position.
    pub fn shift(&mut self, dx: i32, dy: i32) -> (i32, i32) {
        self.x = (self.x + dx).clamp(0, self.width as i32);
        self.y = (self.y + dy).clamp(0, self.height as i32);
        (self.x, self.y)
    }
}

/// All recognizer state for one driver. Lives on the driving thread only;
/// the render thread never sees it.
pub struct InputState {
    touch: TouchRecognizer,
    clicks: SimulatedClicks,
    stick: StickState,
    pointer: PointerState,
    rear_touch: bool,
}

impl InputState {
    pub fn new(config: &Config, frame_width: u32, frame_height: u32) -> Self {
        Self {
            touch: TouchRecognizer::new(config.tap_timeout_ms, config.tap_radius_px),
            clicks: SimulatedClicks::new(config.click_hold_ms),
            stick: StickState::new(),
            pointer: PointerState::new(frame_width, frame_height),
            rear_touch: config.rear_touch,
        }
    }

    pub fn pointer(&self) -> (i32, i32) {
        self.pointer.position()
    }

    pub fn directions(&self) -> u8 {
        self.stick.directions()
    }

    /// Route one raw sample to its recognizer, pushing any synthesized
    /// events onto the queue.
    pub fn dispatch(&mut self, raw: RawInput, keymap: &dyn Keymap, out: &mut VecDeque<Event>) {
        match raw {
            RawInput::TouchDown {
                panel,
                finger,
                x,
                y,
                timestamp_ms,
            } => {
                if self.panel_enabled(panel) {
                    self.touch
                        .handle_down(panel, finger, x, y, timestamp_ms, &self.pointer);
                }
            }
            RawInput::TouchUp {
                panel,
                finger,
                x,
                y,
                timestamp_ms,
            } => {
                if self.panel_enabled(panel) {
                    self.touch.handle_up(
                        panel,
                        finger,
                        x,
                        y,
                        timestamp_ms,
                        &self.pointer,
                        &mut self.clicks,
                        out,
                    );
                }
            }
            RawInput::TouchMotion {
                panel,
                finger,
                x,
                y,
                timestamp_ms,
            } => {
                if self.panel_enabled(panel) {
                    self.touch
                        .handle_motion(panel, finger, x, y, timestamp_ms, &mut self.pointer, out);
                }
            }
            RawInput::StickAxis { axis, value } => {
                self.stick.handle_axis(axis, value, &mut self.pointer, out);
            }
            RawInput::ButtonDown { button } => self.stick.handle_button(button, true, out),
            RawInput::ButtonUp { button } => self.stick.handle_button(button, false, out),
            RawInput::KeyDown { keycode, mods } => {
                if let Some(translated) = keymap.translate(keycode) {
                    out.push_back(Event::Key {
                        key: keymap::apply_mods(translated.key, mods),
                        character: translated.character,
                    });
                }
            }
        }
    }

    /// Flush simulated click releases that are due. Called once per
    /// driving-loop cycle.
    pub fn tick_clicks(&mut self, now_ms: u64, out: &mut VecDeque<Event>) {
        self.clicks.tick(now_ms, out);
    }

    fn panel_enabled(&self, panel: Panel) -> bool {
        panel == Panel::Front || self.rear_touch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{KeyMods, MouseButton};

    struct TestKeymap;

    impl Keymap for TestKeymap {
        fn translate(&self, keycode: u32) -> Option<TranslatedKey> {
            match keycode {
                13 => Some(TranslatedKey {
                    key: 0x0D,
                    character: None,
                }),
                97 => Some(TranslatedKey {
                    key: 0x61,
                    character: Some('a'),
                }),
                _ => None,
            }
        }
    }

    fn config() -> Config {
        Config::default()
    }

    #[test]
    fn rear_panel_is_ignored_unless_enabled() {
        let mut out = VecDeque::new();

        let mut input = InputState::new(&config(), 480, 272);
        let down = RawInput::TouchDown {
            panel: Panel::Rear,
            finger: 1,
            x: 0.5,
            y: 0.5,
            timestamp_ms: 0,
        };
        let up = RawInput::TouchUp {
            panel: Panel::Rear,
            finger: 1,
            x: 0.5,
            y: 0.5,
            timestamp_ms: 100,
        };
        input.dispatch(down, &TestKeymap, &mut out);
        input.dispatch(up, &TestKeymap, &mut out);
        assert!(out.is_empty());

        let mut enabled = config();
        enabled.rear_touch = true;
        let mut input = InputState::new(&enabled, 480, 272);
        input.dispatch(down, &TestKeymap, &mut out);
        input.dispatch(up, &TestKeymap, &mut out);
        assert_eq!(
            out.drain(..).collect::<Vec<_>>(),
            vec![Event::MouseDown(MouseButton::Left)]
        );
    }

    #[test]
    fn keys_pass_through_translation_with_mods() {
        let mut input = InputState::new(&config(), 480, 272);
        let mut out = VecDeque::new();

        input.dispatch(
            RawInput::KeyDown {
                keycode: 97,
                mods: KeyMods {
                    ctrl: true,
                    ..KeyMods::default()
                },
            },
            &TestKeymap,
            &mut out,
        );
        assert_eq!(
            out.pop_front(),
            Some(Event::Key {
                key: 0x61 | KEY_CTRL,
                character: Some('a'),
            })
        );

        // Unmapped keycodes are dropped.
        input.dispatch(
            RawInput::KeyDown {
                keycode: 1,
                mods: KeyMods::default(),
            },
            &TestKeymap,
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn taps_complete_through_the_click_tick() {
        let mut input = InputState::new(&config(), 480, 272);
        let mut out = VecDeque::new();

        input.dispatch(
            RawInput::TouchDown {
                panel: Panel::Front,
                finger: 1,
                x: 0.5,
                y: 0.5,
                timestamp_ms: 0,
            },
            &TestKeymap,
            &mut out,
        );
        input.dispatch(
            RawInput::TouchUp {
                panel: Panel::Front,
                finger: 1,
                x: 0.5,
                y: 0.5,
                timestamp_ms: 100,
            },
            &TestKeymap,
            &mut out,
        );
        input.tick_clicks(120, &mut out);
        assert_eq!(
            out.drain(..).collect::<Vec<_>>(),
            vec![Event::MouseDown(MouseButton::Left)]
        );

        input.tick_clicks(150, &mut out);
        assert_eq!(
            out.drain(..).collect::<Vec<_>>(),
            vec![Event::MouseUp(MouseButton::Left)]
        );
    }
}
