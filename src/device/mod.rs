//! Device-specific geometry: the physical panel and the frame resolutions
//! the driver will accept.

mod deck;

pub use deck::DECK;

/// Device-specific parameters for input scaling and presentation.
#[derive(Debug, Clone, Copy)]
pub struct DeviceProfile {
    pub name: &'static str,

    // Physical panel the scale-blit targets
    pub display_width: u32,
    pub display_height: u32,

    // Frame resolutions the driver accepts, in declaration order
    pub resolutions: &'static [(u32, u32)],
}

impl DeviceProfile {
    /// Get the profile for the current device.
    pub fn current() -> &'static Self {
        &DECK
    }

    /// Pick the supported mode closest to the request. An exact match wins;
    /// otherwise the mode with the smallest product of width and height
    /// deltas is chosen.
    pub fn nearest_mode(&self, width: u32, height: u32) -> (u32, u32) {
        if self.resolutions.is_empty() {
            return (width, height);
        }

        for &(w, h) in self.resolutions {
            if w == width && h == height {
                return (w, h);
            }
        }

        let score = |(w, h): (u32, u32)| w.abs_diff(width) as u64 * h.abs_diff(height) as u64;

        let mut best = self.resolutions[0];
        let mut best_score = score(best);
        for &mode in &self.resolutions[1..] {
            let s = score(mode);
            if s < best_score {
                best = mode;
                best_score = s;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_mode_is_kept() {
        assert_eq!(DECK.nearest_mode(960, 544), (960, 544));
        assert_eq!(DECK.nearest_mode(480, 272), (480, 272));
    }

    #[test]
    fn near_request_snaps_to_closest_mode() {
        assert_eq!(DECK.nearest_mode(500, 300), (480, 272));
        assert_eq!(DECK.nearest_mode(900, 500), (960, 544));
        // 640x480 sits between the two modes; the delta product favors the
        // native one (320*64 against 160*208).
        assert_eq!(DECK.nearest_mode(640, 480), (960, 544));
    }

    #[test]
    fn empty_list_passes_the_request_through() {
        let profile = DeviceProfile {
            name: "test",
            display_width: 100,
            display_height: 100,
            resolutions: &[],
        };
        assert_eq!(profile.nearest_mode(123, 45), (123, 45));
    }
}
