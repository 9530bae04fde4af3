//! Programmatic configuration surface.
//!
//! Building a `Config` from CLI flags or a config file is the thin job of
//! the `main` binary; this struct and its defaults are what the library
//! itself understands.

use std::path::PathBuf;

use crate::render::{Rgb, PALETTE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    P360,
    P480,
    P720,
    P1080,
}

impl Resolution {
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Resolution::P360 => (640, 360),
            Resolution::P480 => (854, 480),
            Resolution::P720 => (1280, 720),
            Resolution::P1080 => (1920, 1080),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub resolution: Resolution,
    pub fps: u32,
    pub start_delay_sec: f64,
    pub fall_seconds: f64,
    pub skip_program_above: u8,
    pub max_workers: usize,
    pub palette: Vec<Rgb>,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub frames_dir: PathBuf,
    pub font_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resolution: Resolution::P1080,
            fps: 60,
            start_delay_sec: 3.0,
            fall_seconds: 3.0,
            skip_program_above: 80,
            max_workers: 50,
            palette: PALETTE.to_vec(),
            input_path: PathBuf::from("input.mid"),
            output_path: PathBuf::from("output.mp4"),
            frames_dir: PathBuf::from("frames"),
            font_path: PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_dimensions_match_presets() {
        assert_eq!(Resolution::P1080.dimensions(), (1920, 1080));
        assert_eq!(Resolution::P360.dimensions(), (640, 360));
    }

    #[test]
    fn default_config_has_five_palette_entries() {
        assert_eq!(Config::default().palette.len(), 5);
    }
}
