//! Turns tick-domain notes into the frame-indexed pressed-key and
//! falling-note timelines a `FramePlan` carries.

use std::collections::{HashMap, HashSet};

use crate::midi::ParsedMidi;

use super::{FallingNote, FramePlan, Layout, PlayingNote};

#[derive(Debug, Clone, Copy)]
pub struct PlannerConfig {
    pub fps: u32,
    pub start_delay_sec: f64,
    pub fall_seconds: f64,
    pub skip_program_above: u8,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            start_delay_sec: 3.0,
            fall_seconds: 3.0,
            skip_program_above: 80,
        }
    }
}

struct Projected {
    display_note: u32,
    on_frame: u32,
    off_frame: u32,
    track_index: usize,
}

/// Builds the full per-frame timeline for a decoded MIDI file.
pub fn plan(parsed: &ParsedMidi, layout: &Layout, cfg: &PlannerConfig) -> FramePlan {
    let tempo_map = parsed.tempo_map();
    let skip_channels: HashSet<u8> = parsed
        .channels
        .iter()
        .filter(|(_, info)| info.program > cfg.skip_program_above)
        .map(|(&channel, _)| channel)
        .collect();

    let mut projected = Vec::new();
    let mut max_off_frame: u32 = 0;

    for (track_index, track) in parsed.tracks.iter().enumerate() {
        for note in &track.notes {
            if skip_channels.contains(&note.channel) {
                continue;
            }
            let shifted = note.pitch as i32 - 24;
            if !(0..84).contains(&shifted) {
                continue;
            }
            let display_note = shifted as u32;

            let on_sec = tempo_map.tick_to_seconds(note.on_tick) + cfg.start_delay_sec;
            let off_sec = tempo_map.tick_to_seconds(note.off_tick) + cfg.start_delay_sec;
            let on_frame = (on_sec * cfg.fps as f64).ceil() as u32;
            let off_frame = ((off_sec * cfg.fps as f64).floor() as i64).max(on_frame as i64) as u32;

            max_off_frame = max_off_frame.max(off_frame);
            projected.push(Projected {
                display_note,
                on_frame,
                off_frame,
                track_index,
            });
        }
    }

    let base_frames = if parsed.tracks.is_empty() {
        0
    } else {
        let end_sec = tempo_map.tick_to_seconds(parsed.end_tick()) + cfg.start_delay_sec;
        (end_sec * cfg.fps as f64).ceil() as u32
    };
    // `off_frame` is exclusive: the key's press state and its falling-note
    // range both end at `off_frame - 1`, so padding to `max_off_frame` (not
    // `+ 1`) is already enough to cover the last visible frame.
    let total_frames = base_frames.max(if projected.is_empty() {
        0
    } else {
        max_off_frame
    });

    let mut pressed_keys = vec![HashMap::new(); total_frames as usize];
    let mut falling_notes: Vec<Vec<FallingNote>> = vec![Vec::new(); total_frames as usize];

    // kind 0 = release, kind 1 = press: sorting by (frame, kind) applies a
    // release before a press of the same note on the same frame.
    let mut events: Vec<(u32, u8, u32, usize)> = Vec::with_capacity(projected.len() * 2);
    for p in &projected {
        events.push((p.on_frame, 1, p.display_note, p.track_index));
        events.push((p.off_frame, 0, p.display_note, p.track_index));
    }
    events.sort_by_key(|e| (e.0, e.1));

    let mut pressed: HashMap<u32, PlayingNote> = HashMap::new();
    let mut idx = 0;
    for (frame, slot) in pressed_keys.iter_mut().enumerate() {
        let frame = frame as u32;
        while idx < events.len() && events[idx].0 == frame {
            let (_, kind, note, track_index) = events[idx];
            if kind == 0 {
                pressed.remove(&note);
            } else {
                pressed.insert(note, PlayingNote { track_index });
            }
            idx += 1;
        }
        *slot = pressed.clone();
    }

    let fall_frames = (cfg.fall_seconds * cfg.fps as f64) as i64;
    let px_per_frame = if fall_frames > 0 {
        layout.key_y / fall_frames as f64
    } else {
        0.0
    };
    let min_height = layout.min_displayed_height();

    for p in &projected {
        let start = p.on_frame as i64 - fall_frames;
        let full_height = ((p.off_frame - p.on_frame) as f64 * px_per_frame).max(min_height);
        let from = start.max(0);
        for i in from..p.off_frame as i64 {
            let relative = i - start;
            let y = relative as f64 * px_per_frame - full_height;
            let height = full_height.min(layout.key_y - y);
            if height <= 0.0 {
                continue;
            }
            falling_notes[i as usize].push(FallingNote {
                note: p.display_note,
                y,
                height,
                track_index: p.track_index,
            });
        }
    }

    FramePlan {
        total_frames,
        pressed_keys,
        falling_notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::note::Note;
    use crate::midi::TrackData;

    fn parsed_with_one_note(pitch: u8, on_tick: u32, off_tick: u32) -> ParsedMidi {
        ParsedMidi {
            ppq: 480,
            tempos: vec![],
            tracks: vec![TrackData {
                notes: vec![Note::new(0, pitch, on_tick, off_tick)],
                end_tick: off_tick,
            }],
            channels: Default::default(),
        }
    }

    #[test]
    fn pressed_key_spans_on_to_off_frame() {
        let parsed = parsed_with_one_note(60, 0, 480);
        let layout = Layout::new(1920, 1080);
        let cfg = PlannerConfig { start_delay_sec: 0.0, ..Default::default() };
        let plan = plan(&parsed, &layout, &cfg);
        let display_note = 60 - 24;
        assert!(plan.pressed_keys[0].contains_key(&display_note));
        let off_frame = plan.total_frames - 1;
        assert!(plan.pressed_keys[off_frame as usize].contains_key(&display_note));
    }

    #[test]
    fn out_of_range_notes_are_skipped() {
        let parsed = parsed_with_one_note(10, 0, 480); // shifted negative
        let layout = Layout::new(1920, 1080);
        let cfg = PlannerConfig::default();
        let plan = plan(&parsed, &layout, &cfg);
        assert!(plan.pressed_keys.iter().all(|m| m.is_empty()));
    }

    #[test]
    fn falling_note_never_overlaps_keyboard_row() {
        let parsed = parsed_with_one_note(72, 0, 240);
        let layout = Layout::new(1920, 1080);
        let cfg = PlannerConfig { start_delay_sec: 0.0, ..Default::default() };
        let plan = plan(&parsed, &layout, &cfg);
        for frame in &plan.falling_notes {
            for note in frame {
                assert!(note.y + note.height <= layout.key_y + 1e-6);
            }
        }
    }

    #[test]
    fn skip_channels_above_program_threshold() {
        let mut parsed = parsed_with_one_note(60, 0, 480);
        parsed.channels.insert(0, crate::midi::ChannelInfo { program: 90 });
        let layout = Layout::new(1920, 1080);
        let cfg = PlannerConfig::default();
        let plan = plan(&parsed, &layout, &cfg);
        assert!(plan.pressed_keys.iter().all(|m| m.is_empty()));
    }
}
