//! Input bridging and frame presentation for a touch-and-joystick handheld.
//!
//! Raw panel, stick and button samples go through [`input::InputState`] and
//! come out as canonical pointer and key events. The application paints a
//! palette-indexed [`surface::Surface`] between fixed-rate ticks;
//! [`present::Driver`] collects the dirty regions and hands each finished
//! frame to a render thread for color conversion and the scaled blit to the
//! display backend.

pub mod config;
pub mod device;
pub mod dirty;
pub mod display;
pub mod event;
pub mod input;
pub mod palette;
pub mod present;
pub mod surface;
