//! Renders a MIDI file into a falling-notes piano roll video: a parser
//! decodes the file, a scene planner projects it onto a per-frame timeline,
//! and a parallel rasteriser draws each frame before an external
//! synthesiser and muxer produce the final MP4.

pub mod config;
pub mod driver;
pub mod error;
pub mod midi;
pub mod render;
pub mod scene;

use std::fs::File;
use std::io::BufReader;

use tracing::info;

pub use config::Config;
pub use error::PipelineError;

use driver::{FfmpegMuxer, Muxer, Synthesizer, TimiditySynth};
use render::pool::WorkerPoolConfig;
use scene::{Layout, PlannerConfig};

/// Runs the full pipeline: parse, plan, render, synthesize, mux.
pub fn render_video(config: &Config) -> Result<(), PipelineError> {
    let file = File::open(&config.input_path)?;
    let (parsed, warnings) = midi::parse(BufReader::new(file))?;
    for warning in &warnings {
        tracing::warn!(?warning, "parser warning");
    }
    info!(
        tracks = parsed.tracks.len(),
        ppq = parsed.ppq,
        "parsed MIDI file"
    );

    let (width, height) = config.resolution.dimensions();
    let layout = Layout::new(width, height);
    let planner_cfg = PlannerConfig {
        fps: config.fps,
        start_delay_sec: config.start_delay_sec,
        fall_seconds: config.fall_seconds,
        skip_program_above: config.skip_program_above,
    };
    let plan = scene::plan(&parsed, &layout, &planner_cfg);
    info!(total_frames = plan.total_frames, "planned scene");

    let pool_cfg = WorkerPoolConfig {
        max_workers: config.max_workers,
        width,
        height,
        fps: config.fps,
        font_path: config.font_path.clone(),
        frames_dir: config.frames_dir.clone(),
    };
    render::pool::render_all(&plan, &layout, &config.palette, &pool_cfg)?;

    let synth = TimiditySynth::new();
    let audio_path = synth.synthesize(&config.input_path)?;

    let frames_pattern = config
        .frames_dir
        .join("fr%05d.png")
        .to_string_lossy()
        .into_owned();
    let duration_secs = plan.total_frames as f64 / config.fps as f64;
    let muxer = FfmpegMuxer::new();
    muxer.mux(
        &frames_pattern,
        &audio_path,
        &config.output_path,
        config.fps,
        duration_secs,
        config.start_delay_sec,
    )?;

    info!(output = %config.output_path.display(), "video complete");
    Ok(())
}
