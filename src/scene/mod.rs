//! Projects parsed MIDI into a per-frame scene description.

pub mod layout;
pub mod planner;

pub use layout::Layout;
pub use planner::{plan, PlannerConfig};

use std::collections::HashMap;

/// A key currently held down, and which track is driving it (for coloring).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayingNote {
    pub track_index: usize,
}

/// One falling-note rectangle visible during a given frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallingNote {
    pub note: u32,
    pub y: f64,
    pub height: f64,
    pub track_index: usize,
}

/// The complete, deterministic per-frame timeline the renderer consumes.
#[derive(Debug, Clone)]
pub struct FramePlan {
    pub total_frames: u32,
    pub pressed_keys: Vec<HashMap<u32, PlayingNote>>,
    pub falling_notes: Vec<Vec<FallingNote>>,
}
