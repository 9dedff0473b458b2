mod cli;
mod file;

pub use cli::Cli;

/// Merged driver configuration from CLI args and config file.
#[derive(Debug, Clone)]
pub struct Config {
    /// Requested frame width; snapped to the nearest supported mode at start.
    pub width: u32,
    pub height: u32,
    /// Milliseconds per simulation tick.
    pub tick_ms: u64,
    /// Present from a dedicated render thread.
    pub threaded: bool,
    /// React to rear panel touches.
    pub rear_touch: bool,
    /// Minimum hold for synthesized clicks, in milliseconds.
    pub click_hold_ms: u64,
    /// Longest contact that still counts as a tap, in milliseconds.
    pub tap_timeout_ms: u64,
    /// Largest motion that still counts as a tap, in frame pixels.
    pub tap_radius_px: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: 480,
            height: 272,
            tick_ms: 30,
            threaded: true,
            rear_touch: false,
            click_hold_ms: 50,
            tap_timeout_ms: 250,
            tap_radius_px: 10,
        }
    }
}

impl Config {
    /// Load configuration by merging the config file with CLI overrides.
    pub fn load(cli: &Cli) -> Self {
        let file_config = cli
            .config
            .as_ref()
            .and_then(|p| file::load_from_path(p))
            .or_else(file::load_from_default_paths)
            .unwrap_or_default();
        let defaults = Config::default();

        Self {
            width: cli.width.or(file_config.width).unwrap_or(defaults.width),
            height: cli.height.or(file_config.height).unwrap_or(defaults.height),
            tick_ms: cli.tick_ms.or(file_config.tick_ms).unwrap_or(defaults.tick_ms),
            threaded: if cli.no_threads {
                false
            } else {
                file_config.threaded
            },
            rear_touch: cli.rear_touch || file_config.rear_touch,
            click_hold_ms: cli
                .click_hold_ms
                .or(file_config.click_hold_ms)
                .unwrap_or(defaults.click_hold_ms),
            tap_timeout_ms: cli
                .tap_timeout_ms
                .or(file_config.tap_timeout_ms)
                .unwrap_or(defaults.tap_timeout_ms),
            tap_radius_px: cli
                .tap_radius_px
                .or(file_config.tap_radius_px)
                .unwrap_or(defaults.tap_radius_px),
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.width == 0 || self.height == 0 {
            return Err("Frame resolution cannot be zero");
        }
        if self.tick_ms == 0 {
            return Err("Tick interval must be at least 1ms");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("deckview").chain(args.iter().copied()))
    }

    #[test]
    fn file_values_fill_in_and_flags_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "width = 960\nheight = 544\ntick_ms = 10").unwrap();

        let config = Config::load(&cli(&[
            "--config",
            file.path().to_str().unwrap(),
            "--tick-ms",
            "5",
        ]));

        assert_eq!(config.width, 960);
        assert_eq!(config.height, 544);
        assert_eq!(config.tick_ms, 5);
        assert!(config.threaded);
    }

    #[test]
    fn no_threads_flag_beats_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "threaded = true").unwrap();

        let config = Config::load(&cli(&[
            "--config",
            file.path().to_str().unwrap(),
            "--no-threads",
        ]));

        assert!(!config.threaded);
    }

    #[test]
    fn unknown_file_keys_fall_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "wdith = 960").unwrap();

        let config = Config::load(&cli(&["--config", file.path().to_str().unwrap()]));

        assert_eq!(config.width, Config::default().width);
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.width = 0;
        assert!(config.validate().is_err());

        config.width = 480;
        config.tick_ms = 0;
        assert!(config.validate().is_err());
    }
}
