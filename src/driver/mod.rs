//! External collaborator interfaces: the software synthesiser that turns a
//! MIDI file into audio, and the video muxer that combines the rendered PNG
//! sequence with that audio into an MP4. Both are shelled out to as
//! external processes; the pipeline treats them as black boxes.

pub mod ffmpeg;
pub mod timidity;

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use thiserror::Error;

pub use ffmpeg::FfmpegMuxer;
pub use timidity::TimiditySynth;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("failed to run `{command}`: {source}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}")]
    ExitStatus { command: String, status: ExitStatus },
}

/// Converts a MIDI file into a rendered audio file.
pub trait Synthesizer {
    fn synthesize(&self, midi_path: &Path) -> Result<PathBuf, DriverError>;
}

/// Combines a PNG frame sequence and an audio track into a video file.
pub trait Muxer {
    #[allow(clippy::too_many_arguments)]
    fn mux(
        &self,
        frames_pattern: &str,
        audio_path: &Path,
        output_path: &Path,
        fps: u32,
        duration_secs: f64,
        start_delay_sec: f64,
    ) -> Result<(), DriverError>;
}
