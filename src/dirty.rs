//! Dirty rectangle accumulation between presentation passes.

use crate::surface::Rect;

const MAX_DIRTY_RECTS: usize = 100;

/// Records the screen regions invalidated since the last presentation.
///
/// Submissions beyond capacity are counted but not stored; the overflow is
/// reported by `take_all` and the presenter responds by redrawing the full
/// surface. Overlapping rectangles are never merged; a pixel covered twice
/// is converted twice, which keeps `mark` O(1).
pub struct DirtyRegions {
    rects: Vec<Rect>,
    submitted: usize,
    capacity: usize,
}

impl DirtyRegions {
    pub fn new() -> Self {
        Self::with_capacity(MAX_DIRTY_RECTS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rects: Vec::with_capacity(capacity),
            submitted: 0,
            capacity,
        }
    }

    /// Record one invalidated rectangle. Beyond capacity only the count
    /// grows, which later forces the full-surface path.
    pub fn mark(&mut self, rect: Rect) {
        if self.rects.len() < self.capacity {
            self.rects.push(rect);
        }
        self.submitted += 1;
    }

    /// Invalidate everything without enumerating rectangles.
    pub fn mark_all(&mut self) {
        self.submitted = self.submitted.max(self.capacity + 1);
    }

    /// True when nothing has been marked since the last `take_all`.
    pub fn is_clean(&self) -> bool {
        self.submitted == 0
    }

    /// Drain the accumulated rectangles and report whether submissions
    /// exceeded capacity. The accumulator is empty afterwards.
    pub fn take_all(&mut self) -> (Vec<Rect>, bool) {
        let overflowed = self.submitted > self.capacity;
        self.submitted = 0;
        (std::mem::take(&mut self.rects), overflowed)
    }
}

impl Default for DirtyRegions {
    fn default() -> Self {
        Self::new()
    }
}
