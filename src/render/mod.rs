//! Frame rendering: draws one scene (one frame index) via a `DrawingContext`.

pub mod context;
pub mod pool;

use std::path::Path;

use thiserror::Error;

use crate::scene::{FramePlan, Layout};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Darker variant used for black-key falling notes, matching the
    /// reference palette's 0.8 shade multiplier.
    pub fn darken(self) -> Self {
        Self::new(self.r * 0.8, self.g * 0.8, self.b * 0.8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write frame {path}: {source}")]
    WritePng {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("canvas allocation failed for {width}x{height}")]
    CanvasAllocation { width: u32, height: u32 },
    #[error("font loading failed: {0}")]
    FontLoad(String),
    #[error("failed to start render thread pool: {0}")]
    ThreadPool(String),
}

/// The drawing primitives a concrete rasteriser backend must provide.
///
/// Kept deliberately small: every shape the renderer needs (keys, falling
/// notes, guide lines, octave labels) reduces to these calls.
pub trait DrawingContext {
    fn clear(&mut self, color: Rgb);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb);
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb, line_width: f64);
    fn fill_rounded_rect(&mut self, x: f64, y: f64, w: f64, h: f64, radius: f64, color: Rgb);
    fn stroke_rounded_rect(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        radius: f64,
        color: Rgb,
        line_width: f64,
    );
    fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgba, line_width: f64);
    fn draw_text(&mut self, text: &str, x: f64, y: f64, size: f64, color: Rgba);
    fn save_png(&self, path: &Path) -> Result<(), RenderError>;
}

/// Background clear color, matching the reference implementation's dark
/// grey canvas.
pub const BACKGROUND: Rgb = Rgb::new(0.17, 0.17, 0.17);

pub const PALETTE: [Rgb; 5] = [
    Rgb::new(1.0, 0.5, 0.0),
    Rgb::new(0.2, 1.0, 0.2),
    Rgb::new(0.5, 0.85, 1.0),
    Rgb::new(0.5, 0.5, 0.5),
    Rgb::new(0.5, 0.5, 0.5),
];

const FALLING_NOTE_RADIUS: f64 = 6.0;
const GUIDE_LINE_COLOR: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

fn track_color(palette: &[Rgb], track_index: usize) -> Rgb {
    palette[track_index % palette.len()]
}

/// Renders frame `i` of `plan` into `ctx`, in the fixed draw order:
/// background, axis guides, white keys, black keys, octave labels, falling
/// notes.
pub fn render_frame(
    i: usize,
    plan: &FramePlan,
    layout: &Layout,
    palette: &[Rgb],
    ctx: &mut dyn DrawingContext,
) {
    ctx.clear(BACKGROUND);
    draw_axis_guides(layout, ctx);
    draw_keyboard(&plan.pressed_keys[i], layout, palette, ctx);
    draw_octave_labels(layout, ctx);
    draw_falling_notes(&plan.falling_notes[i], layout, palette, ctx);
}

fn draw_axis_guides(layout: &Layout, ctx: &mut dyn DrawingContext) {
    let octaves = 7;
    for octave in 0..octaves {
        let base = octave * 12;
        let strong_x = layout.note_to_x(base);
        ctx.draw_line(
            strong_x,
            0.0,
            strong_x,
            layout.key_y,
            Rgba::new(GUIDE_LINE_COLOR.r, GUIDE_LINE_COLOR.g, GUIDE_LINE_COLOR.b, 0.3),
            1.0,
        );
        let weak_x = layout.note_to_x(base + 5);
        ctx.draw_line(
            weak_x,
            0.0,
            weak_x,
            layout.key_y,
            Rgba::new(GUIDE_LINE_COLOR.r, GUIDE_LINE_COLOR.g, GUIDE_LINE_COLOR.b, 0.1),
            1.0,
        );
    }
}

fn draw_keyboard(
    pressed: &std::collections::HashMap<u32, crate::scene::PlayingNote>,
    layout: &Layout,
    palette: &[Rgb],
    ctx: &mut dyn DrawingContext,
) {
    for n in (0..84).filter(|&n| Layout::is_white(n)) {
        let color = match pressed.get(&n) {
            Some(playing) => track_color(palette, playing.track_index),
            None => Rgb::new(1.0, 1.0, 1.0),
        };
        ctx.fill_rect(layout.note_to_x(n), layout.key_y, layout.white_w, layout.key_h, color);
        ctx.stroke_rect(
            layout.note_to_x(n),
            layout.key_y,
            layout.white_w,
            layout.key_h,
            Rgb::new(0.0, 0.0, 0.0),
            1.0,
        );
    }
    for n in (0..84).filter(|&n| !Layout::is_white(n)) {
        let color = match pressed.get(&n) {
            Some(playing) => track_color(palette, playing.track_index).darken(),
            None => Rgb::new(0.1, 0.1, 0.1),
        };
        ctx.fill_rect(layout.note_to_x(n), layout.key_y, layout.black_w, layout.black_h, color);
    }
}

fn draw_octave_labels(layout: &Layout, ctx: &mut dyn DrawingContext) {
    for octave in 0..7u32 {
        let x = layout.note_to_x(octave * 12);
        let label = format!("C{}", octave + 1);
        ctx.draw_text(
            &label,
            x + layout.white_w / 6.0,
            layout.height - 10.0,
            layout.white_w / 2.0,
            Rgba::new(1.0, 1.0, 1.0, 1.0),
        );
    }
}

fn draw_falling_notes(
    notes: &[crate::scene::FallingNote],
    layout: &Layout,
    palette: &[Rgb],
    ctx: &mut dyn DrawingContext,
) {
    for note in notes {
        let is_white = Layout::is_white(note.note);
        let width = if is_white { layout.white_w } else { layout.black_w };
        let mut color = track_color(palette, note.track_index);
        if !is_white {
            color = color.darken();
        }
        let x = layout.note_to_x(note.note);
        ctx.fill_rounded_rect(x, note.y, width, note.height, FALLING_NOTE_RADIUS, color);
        ctx.stroke_rounded_rect(
            x,
            note.y,
            width,
            note.height,
            FALLING_NOTE_RADIUS,
            Rgb::new(0.0, 0.0, 0.0),
            1.0,
        );
    }
}

/// Deterministic output filename for frame index `i` (0-based): `fr00001.png`
/// for `i == 0`.
pub fn frame_filename(i: usize) -> String {
    format!("fr{:05}.png", i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_filenames_are_one_indexed_and_padded() {
        assert_eq!(frame_filename(0), "fr00001.png");
        assert_eq!(frame_filename(99), "fr00100.png");
    }

    #[test]
    fn darken_scales_each_channel() {
        let c = Rgb::new(1.0, 0.5, 0.25).darken();
        assert!((c.r - 0.8).abs() < 1e-6);
        assert!((c.g - 0.4).abs() < 1e-6);
        assert!((c.b - 0.2).abs() < 1e-6);
    }
}
