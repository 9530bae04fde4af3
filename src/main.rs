//! pianoroll-render - turns a MIDI file into a falling-notes piano roll
//! video.
//!
//! # Usage
//!
//! ```bash
//! pianoroll-render song.mid --output song.mp4
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};

use pianoroll_render::config::{Config, Resolution};
use pianoroll_render::render_video;

/// Command-line options for the renderer.
struct CliOptions {
    input: PathBuf,
    output: PathBuf,
    resolution: Resolution,
    fps: u32,
}

impl CliOptions {
    /// Parses command-line arguments.
    ///
    /// Supports:
    /// - a positional path to the input `.mid` file
    /// - `--output <path>` or `-o <path>`: output MP4 path (default `output.mp4`)
    /// - `--resolution <360p|480p|720p|1080p>`: frame size (default `1080p`)
    /// - `--fps <n>`: frame rate (default 60)
    /// - `--help` or `-h`: print help and exit
    fn parse() -> Result<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut input: Option<PathBuf> = None;
        let mut output = PathBuf::from("output.mp4");
        let mut resolution = Resolution::P1080;
        let mut fps: u32 = 60;
        let mut i = 1;

        while i < args.len() {
            match args[i].as_str() {
                "--output" | "-o" => {
                    i += 1;
                    let path = args.get(i).context("--output requires a path argument")?;
                    output = PathBuf::from(path);
                }
                "--resolution" | "-r" => {
                    i += 1;
                    let value = args
                        .get(i)
                        .context("--resolution requires an argument")?;
                    resolution = match value.as_str() {
                        "360p" => Resolution::P360,
                        "480p" => Resolution::P480,
                        "720p" => Resolution::P720,
                        "1080p" => Resolution::P1080,
                        other => anyhow::bail!("unknown resolution: {other}"),
                    };
                }
                "--fps" => {
                    i += 1;
                    let value = args.get(i).context("--fps requires a number")?;
                    fps = value.parse().context("--fps must be a positive integer")?;
                }
                "--help" | "-h" => {
                    eprintln!("pianoroll-render - renders a MIDI file to a falling-notes video");
                    eprintln!();
                    eprintln!(
                        "Usage: {} <input.mid> [OPTIONS]",
                        args.first().map(String::as_str).unwrap_or("pianoroll-render")
                    );
                    eprintln!();
                    eprintln!("Options:");
                    eprintln!("  -o, --output PATH       Output MP4 path (default: output.mp4)");
                    eprintln!("  -r, --resolution RES    360p | 480p | 720p | 1080p (default: 1080p)");
                    eprintln!("      --fps N             Frame rate (default: 60)");
                    eprintln!("  -h, --help              Print this help message");
                    std::process::exit(0);
                }
                other => {
                    if other.starts_with('-') {
                        anyhow::bail!("unknown option: {other}");
                    }
                    input = Some(PathBuf::from(other));
                }
            }
            i += 1;
        }

        Ok(Self {
            input: input.context("missing input MIDI file path")?,
            output,
            resolution,
            fps,
        })
    }
}

fn main() -> Result<()> {
    let cli = CliOptions::parse()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config {
        resolution: cli.resolution,
        fps: cli.fps,
        input_path: cli.input,
        output_path: cli.output,
        ..Config::default()
    };

    if let Err(err) = render_video(&config) {
        tracing::error!("{err}");
        std::process::exit(err.exit_code());
    }

    Ok(())
}
