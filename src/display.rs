//! Display backend seam: where converted pixels leave the driver.

use std::sync::{Arc, Mutex};

use crate::palette::{Color, PaletteMode};
use crate::surface::Rect;

/// Output side of the presentation pipeline. A backend declares its fixed
/// output resolution and how it wants palette changes applied, then receives
/// converted pixels.
pub trait DisplayBackend: Send {
    /// Output resolution in pixels.
    fn size(&self) -> (u32, u32);

    /// How this backend wants palette changes applied.
    fn palette_mode(&self) -> PaletteMode;

    /// Load `colors` into the color table starting at `first`. Only called
    /// for `PaletteMode::Backend`.
    fn set_color_table(
        &mut self,
        first: usize,
        colors: &[Color],
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Push converted pixels out. `pixels` is the full output buffer in
    /// row-major `0x00RRGGBB`; `rects` lists the regions that changed, in
    /// output coordinates. `full` means the whole output changed and
    /// `rects` covers it.
    fn present(
        &mut self,
        pixels: &[u32],
        rects: &[Rect],
        full: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// What a [`MemoryDisplay`] has observed so far.
#[derive(Debug, Clone, Default)]
pub struct DisplayStats {
    pub presents: u64,
    pub full_presents: u64,
    /// `(first, count)` per color-table push, in call order.
    pub color_table_pushes: Vec<(usize, usize)>,
    /// Rectangles of the most recent present.
    pub last_rects: Vec<Rect>,
}

struct Shared {
    pixels: Vec<u32>,
    stats: DisplayStats,
}

/// Backend that renders into main memory. The demo binary presents into it,
/// and tests read back what the driver pushed; clones share the same
/// storage, so a clone kept outside the driver stays readable after the
/// driver takes the original.
#[derive(Clone)]
pub struct MemoryDisplay {
    width: u32,
    height: u32,
    mode: PaletteMode,
    shared: Arc<Mutex<Shared>>,
}

impl MemoryDisplay {
    pub fn new(width: u32, height: u32, mode: PaletteMode) -> Self {
        Self {
            width,
            height,
            mode,
            shared: Arc::new(Mutex::new(Shared {
                pixels: vec![0; (width * height) as usize],
                stats: DisplayStats::default(),
            })),
        }
    }

    pub fn stats(&self) -> DisplayStats {
        match self.shared.lock() {
            Ok(shared) => shared.stats.clone(),
            Err(_) => DisplayStats::default(),
        }
    }

    pub fn pixels(&self) -> Vec<u32> {
        match self.shared.lock() {
            Ok(shared) => shared.pixels.clone(),
            Err(_) => Vec::new(),
        }
    }
}

impl DisplayBackend for MemoryDisplay {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn palette_mode(&self) -> PaletteMode {
        self.mode
    }

    fn set_color_table(
        &mut self,
        first: usize,
        colors: &[Color],
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if first + colors.len() > 256 {
            return Err(format!(
                "color table push {}..{} exceeds 256 entries",
                first,
                first + colors.len()
            )
            .into());
        }
        let mut shared = self
            .shared
            .lock()
            .map_err(|_| "display storage lock poisoned")?;
        shared.stats.color_table_pushes.push((first, colors.len()));
        Ok(())
    }

    fn present(
        &mut self,
        pixels: &[u32],
        rects: &[Rect],
        full: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let expected = (self.width * self.height) as usize;
        if pixels.len() != expected {
            return Err(format!(
                "present buffer holds {} pixels, display needs {}",
                pixels.len(),
                expected
            )
            .into());
        }

        let mut shared = self
            .shared
            .lock()
            .map_err(|_| "display storage lock poisoned")?;
        if full {
            shared.pixels.copy_from_slice(pixels);
        } else {
            let width = self.width as usize;
            for rect in rects {
                let rect = rect.clipped(self.width, self.height);
                for row in rect.y..rect.y + rect.h {
                    let start = row as usize * width + rect.x as usize;
                    let end = start + rect.w as usize;
                    shared.pixels[start..end].copy_from_slice(&pixels[start..end]);
                }
            }
        }
        shared.stats.presents += 1;
        if full {
            shared.stats.full_presents += 1;
        }
        shared.stats.last_rects = rects.to_vec();
        Ok(())
    }
}
