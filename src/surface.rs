//! The palette-indexed frame surface the external rasterizer draws into,
//! plus the rectangle type used throughout dirty tracking and blitting.

/// Axis-aligned rectangle in frame-buffer pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Intersection with a `width × height` surface, for safe pixel access.
    pub(crate) fn clipped(&self, width: u32, height: u32) -> Rect {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = self.x.saturating_add(self.w).min(width as i32);
        let y1 = self.y.saturating_add(self.h).min(height as i32);
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }
}

/// The software frame buffer: one byte per pixel indexing the palette.
/// The rasterizer writes it between ticks; the presenter only reads it.
/// `pitch` is the row stride in pixels and may exceed `width`.
pub struct Surface {
    width: u32,
    height: u32,
    pitch: u32,
    pixels: Vec<u8>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_pitch(width, height, width)
    }

    pub fn with_pitch(width: u32, height: u32, pitch: u32) -> Self {
        debug_assert!(pitch >= width);
        Self {
            width,
            height,
            pitch,
            pixels: vec![0; (pitch * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pitch(&self) -> u32 {
        self.pitch
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// One row of visible pixels (pitch padding excluded).
    pub fn row(&self, y: u32) -> &[u8] {
        let start = (y * self.pitch) as usize;
        &self.pixels[start..start + self.width as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_inside_is_identity() {
        let r = Rect::new(10, 20, 30, 40);
        assert_eq!(r.clipped(480, 272), r);
    }

    #[test]
    fn clip_truncates_at_edges() {
        let r = Rect::new(-5, 260, 20, 30);
        let c = r.clipped(480, 272);
        assert_eq!(c, Rect::new(0, 260, 15, 12));

        let off = Rect::new(500, 0, 10, 10).clipped(480, 272);
        assert!(off.is_empty());
    }

    #[test]
    fn surface_rows_respect_pitch() {
        let mut s = Surface::with_pitch(4, 2, 8);
        s.pixels_mut()[8] = 7; // first pixel of row 1
        assert_eq!(s.row(1), &[7, 0, 0, 0]);
        assert_eq!(s.pixels().len(), 16);
    }
}
