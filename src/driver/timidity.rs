//! `timidity`-backed `Synthesizer`.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::{DriverError, Synthesizer};

/// Shells out to `timidity` to render a MIDI file to a WAV file of the same
/// stem, alongside the input.
pub struct TimiditySynth {
    binary: String,
}

impl TimiditySynth {
    pub fn new() -> Self {
        Self { binary: "timidity".to_string() }
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }
}

impl Default for TimiditySynth {
    fn default() -> Self {
        Self::new()
    }
}

impl Synthesizer for TimiditySynth {
    fn synthesize(&self, midi_path: &Path) -> Result<PathBuf, DriverError> {
        let wav_path = midi_path.with_extension("wav");
        let mut cmd = Command::new(&self.binary);
        cmd.arg(midi_path)
            .arg("-Ow")
            .arg("--preserve-silence")
            .arg("-o")
            .arg(&wav_path);

        let command_string = format_command(&self.binary, &cmd);
        let status = cmd.status().map_err(|source| DriverError::CommandFailed {
            command: command_string.clone(),
            source,
        })?;
        if !status.success() {
            return Err(DriverError::ExitStatus { command: command_string, status });
        }
        Ok(wav_path)
    }
}

pub(super) fn format_command(binary: &str, cmd: &Command) -> String {
    let args: Vec<String> = cmd
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    format!("{} {}", binary, args.join(" "))
}
