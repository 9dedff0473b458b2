use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "deckview")]
#[command(about = "Touch and joystick driver for the handheld panel")]
#[command(version)]
pub struct Cli {
    /// Requested frame width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Requested frame height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Milliseconds per simulation tick
    #[arg(long)]
    pub tick_ms: Option<u64>,

    /// Present from the driving thread instead of a render thread
    #[arg(long)]
    pub no_threads: bool,

    /// React to touches on the rear panel as well
    #[arg(long)]
    pub rear_touch: bool,

    /// Minimum hold for synthesized clicks, in milliseconds
    #[arg(long)]
    pub click_hold_ms: Option<u64>,

    /// Longest contact that still counts as a tap, in milliseconds
    #[arg(long)]
    pub tap_timeout_ms: Option<u64>,

    /// Largest motion that still counts as a tap, in frame pixels
    #[arg(long)]
    pub tap_radius_px: Option<u32>,

    /// Convert colors in software instead of pushing the color table
    #[arg(long)]
    pub blitter_palette: bool,

    /// How long the demo runs, in milliseconds
    #[arg(long, default_value_t = 3000)]
    pub duration_ms: u64,

    /// Path to config file
    #[arg(long, env = "DECKVIEW_CONFIG")]
    pub config: Option<PathBuf>,
}
