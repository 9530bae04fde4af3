//! `ffmpeg`-backed `Muxer`.

use std::path::Path;
use std::process::Command;

use super::timidity::format_command;
use super::{DriverError, Muxer};

pub struct FfmpegMuxer {
    binary: String,
}

impl FfmpegMuxer {
    pub fn new() -> Self {
        Self { binary: "ffmpeg".to_string() }
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }
}

impl Default for FfmpegMuxer {
    fn default() -> Self {
        Self::new()
    }
}

impl Muxer for FfmpegMuxer {
    fn mux(
        &self,
        frames_pattern: &str,
        audio_path: &Path,
        output_path: &Path,
        fps: u32,
        duration_secs: f64,
        start_delay_sec: f64,
    ) -> Result<(), DriverError> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-y")
            .arg("-framerate")
            .arg(fps.to_string())
            .arg("-i")
            .arg(frames_pattern)
            .arg("-itsoffset")
            .arg(start_delay_sec.to_string())
            .arg("-i")
            .arg(audio_path)
            .arg("-map")
            .arg("0:v")
            .arg("-map")
            .arg("1:a")
            .arg("-c:v")
            .arg("libx264")
            .arg("-pix_fmt")
            .arg("yuv420p")
            .arg("-tune")
            .arg("animation")
            .arg("-t")
            .arg(duration_secs.to_string())
            .arg(output_path);

        let command_string = format_command(&self.binary, &cmd);
        let status = cmd.status().map_err(|source| DriverError::CommandFailed {
            command: command_string.clone(),
            source,
        })?;
        if !status.success() {
            return Err(DriverError::ExitStatus { command: command_string, status });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_binary_is_ffmpeg() {
        assert_eq!(FfmpegMuxer::new().binary, "ffmpeg");
    }
}
