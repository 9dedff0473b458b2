//! The 256-entry color table and the change range carried between the
//! simulation side and the presenter.

/// One palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// How the display backend wants palette changes applied, declared once at
/// driver start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteMode {
    /// Push only the changed entries into the display's color table. Cost is
    /// proportional to the changed range.
    Backend,
    /// Software palette lookup: refresh the conversion table and re-run the
    /// full convert-and-present path. Cost is proportional to the frame.
    Blitter,
}

/// The application's color table plus the `(first, count)` range changed
/// since the last presentation pass. Mutated during `paint` under the frame
/// lock; the presenter copies the dirty range out by value before using it.
#[derive(Clone)]
pub struct Palette {
    pub entries: [Color; 256],
    first_dirty: usize,
    count_dirty: usize,
}

impl Palette {
    pub fn new() -> Self {
        Self {
            entries: [Color::default(); 256],
            first_dirty: 0,
            count_dirty: 0,
        }
    }

    /// Update one entry and widen the dirty range to cover it.
    pub fn set(&mut self, index: usize, color: Color) {
        if index >= self.entries.len() {
            return;
        }
        self.entries[index] = color;
        if self.count_dirty == 0 {
            self.first_dirty = index;
            self.count_dirty = 1;
        } else {
            let end = (self.first_dirty + self.count_dirty).max(index + 1);
            self.first_dirty = self.first_dirty.min(index);
            self.count_dirty = end - self.first_dirty;
        }
    }

    /// Update a run of entries starting at `first`.
    pub fn set_range(&mut self, first: usize, colors: &[Color]) {
        for (i, &color) in colors.iter().enumerate() {
            self.set(first + i, color);
        }
    }

    /// Flag every entry as changed (used at driver start).
    pub fn mark_all_dirty(&mut self) {
        self.first_dirty = 0;
        self.count_dirty = self.entries.len();
    }

    /// The pending `(first, count)` change range, cleared on return.
    pub fn take_dirty(&mut self) -> Option<(usize, usize)> {
        if self.count_dirty == 0 {
            return None;
        }
        let range = (self.first_dirty, self.count_dirty);
        self.first_dirty = 0;
        self.count_dirty = 0;
        Some(range)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_widens_dirty_range() {
        let mut pal = Palette::new();
        assert_eq!(pal.take_dirty(), None);

        pal.set(10, Color::rgb(1, 2, 3));
        pal.set(4, Color::rgb(4, 5, 6));
        pal.set(7, Color::rgb(7, 8, 9));
        assert_eq!(pal.take_dirty(), Some((4, 7)));
        assert_eq!(pal.take_dirty(), None);
        assert_eq!(pal.entries[10], Color::rgb(1, 2, 3));
    }

    #[test]
    fn set_range_covers_exactly_the_run() {
        let mut pal = Palette::new();
        pal.set_range(100, &[Color::rgb(1, 1, 1); 8]);
        assert_eq!(pal.take_dirty(), Some((100, 8)));
    }

    #[test]
    fn out_of_range_set_is_ignored() {
        let mut pal = Palette::new();
        pal.set(256, Color::rgb(9, 9, 9));
        assert_eq!(pal.take_dirty(), None);
    }

    #[test]
    fn mark_all_dirty_spans_the_table() {
        let mut pal = Palette::new();
        pal.mark_all_dirty();
        assert_eq!(pal.take_dirty(), Some((0, 256)));
    }
}
