//! `tiny-skia` + `fontdue` backed `DrawingContext`.
//!
//! One `RasterContext` is created per worker-pool slot and reused across
//! frames: `clear` resets the canvas in place instead of reallocating.

use std::path::Path;

use fontdue::{Font, FontSettings};
use tiny_skia::{
    FillRule, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Rect as SkRect, Stroke, Transform,
};

use super::{DrawingContext, RenderError, Rgb, Rgba};

pub struct RasterContext {
    pixmap: Pixmap,
    font: Font,
}

impl RasterContext {
    pub fn new(width: u32, height: u32, font_path: &Path) -> Result<Self, RenderError> {
        let pixmap = Pixmap::new(width, height)
            .ok_or(RenderError::CanvasAllocation { width, height })?;
        let font_bytes = std::fs::read(font_path)
            .map_err(|e| RenderError::FontLoad(format!("{}: {}", font_path.display(), e)))?;
        let font = Font::from_bytes(font_bytes, FontSettings::default())
            .map_err(|e| RenderError::FontLoad(e.to_string()))?;
        Ok(Self { pixmap, font })
    }

    fn paint_for(color: Rgb, alpha: f32) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(
            (color.r.clamp(0.0, 1.0) * 255.0) as u8,
            (color.g.clamp(0.0, 1.0) * 255.0) as u8,
            (color.b.clamp(0.0, 1.0) * 255.0) as u8,
            (alpha.clamp(0.0, 1.0) * 255.0) as u8,
        );
        paint.anti_alias = true;
        paint
    }

    fn rounded_rect_path(x: f64, y: f64, w: f64, h: f64, radius: f64) -> Option<tiny_skia::Path> {
        let r = radius.min(w / 2.0).min(h / 2.0).max(0.0) as f32;
        let (x, y, w, h) = (x as f32, y as f32, w as f32, h as f32);
        let mut pb = PathBuilder::new();
        pb.move_to(x + r, y);
        pb.line_to(x + w - r, y);
        pb.quad_to(x + w, y, x + w, y + r);
        pb.line_to(x + w, y + h - r);
        pb.quad_to(x + w, y + h, x + w - r, y + h);
        pb.line_to(x + r, y + h);
        pb.quad_to(x, y + h, x, y + h - r);
        pb.line_to(x, y + r);
        pb.quad_to(x, y, x + r, y);
        pb.close();
        pb.finish()
    }
}

impl DrawingContext for RasterContext {
    fn clear(&mut self, color: Rgb) {
        self.pixmap.fill(tiny_skia::Color::from_rgba8(
            (color.r.clamp(0.0, 1.0) * 255.0) as u8,
            (color.g.clamp(0.0, 1.0) * 255.0) as u8,
            (color.b.clamp(0.0, 1.0) * 255.0) as u8,
            255,
        ));
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb) {
        let Some(rect) = SkRect::from_xywh(x as f32, y as f32, w as f32, h as f32) else {
            return;
        };
        let paint = Self::paint_for(color, 1.0);
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb, line_width: f64) {
        let Some(rect) = SkRect::from_xywh(x as f32, y as f32, w as f32, h as f32) else {
            return;
        };
        let path = PathBuilder::from_rect(rect);
        let paint = Self::paint_for(color, 1.0);
        let stroke = Stroke {
            width: line_width as f32,
            ..Default::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    fn fill_rounded_rect(&mut self, x: f64, y: f64, w: f64, h: f64, radius: f64, color: Rgb) {
        let Some(path) = Self::rounded_rect_path(x, y, w, h, radius) else {
            return;
        };
        let paint = Self::paint_for(color, 1.0);
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    fn stroke_rounded_rect(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        radius: f64,
        color: Rgb,
        line_width: f64,
    ) {
        let Some(path) = Self::rounded_rect_path(x, y, w, h, radius) else {
            return;
        };
        let paint = Self::paint_for(color, 1.0);
        let stroke = Stroke {
            width: line_width as f32,
            ..Default::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgba, line_width: f64) {
        let mut pb = PathBuilder::new();
        pb.move_to(x0 as f32, y0 as f32);
        pb.line_to(x1 as f32, y1 as f32);
        let Some(path) = pb.finish() else { return };
        let mut paint = Paint::default();
        paint.set_color_rgba8(
            (color.r.clamp(0.0, 1.0) * 255.0) as u8,
            (color.g.clamp(0.0, 1.0) * 255.0) as u8,
            (color.b.clamp(0.0, 1.0) * 255.0) as u8,
            (color.a.clamp(0.0, 1.0) * 255.0) as u8,
        );
        let stroke = Stroke {
            width: line_width as f32,
            ..Default::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, size: f64, color: Rgba) {
        let mut pen_x = x as f32;
        let baseline_y = y as f32;
        let r = (color.r.clamp(0.0, 1.0) * 255.0) as u8;
        let g = (color.g.clamp(0.0, 1.0) * 255.0) as u8;
        let b = (color.b.clamp(0.0, 1.0) * 255.0) as u8;
        let alpha = color.a.clamp(0.0, 1.0);

        for ch in text.chars() {
            let (metrics, bitmap) = self.font.rasterize(ch, size as f32);
            let glyph_x = pen_x as i32 + metrics.xmin;
            let glyph_y = baseline_y as i32 - metrics.height as i32 - metrics.ymin;
            blit_glyph(&mut self.pixmap, glyph_x, glyph_y, metrics.width, metrics.height, &bitmap, r, g, b, alpha);
            pen_x += metrics.advance_width;
        }
    }

    fn save_png(&self, path: &Path) -> Result<(), RenderError> {
        self.pixmap
            .save_png(path)
            .map_err(|e| RenderError::WritePng {
                path: path.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
            })
    }
}

/// Alpha-blends a fontdue coverage bitmap onto the canvas at `(x, y)`.
#[allow(clippy::too_many_arguments)]
fn blit_glyph(
    pixmap: &mut Pixmap,
    x: i32,
    y: i32,
    width: usize,
    height: usize,
    coverage: &[u8],
    r: u8,
    g: u8,
    b: u8,
    alpha: f32,
) {
    let pw = pixmap.width() as i32;
    let ph = pixmap.height() as i32;
    let data = pixmap.pixels_mut();
    for row in 0..height as i32 {
        let py = y + row;
        if py < 0 || py >= ph {
            continue;
        }
        for col in 0..width as i32 {
            let px = x + col;
            if px < 0 || px >= pw {
                continue;
            }
            let cov = coverage[(row as usize) * width + col as usize] as f32 / 255.0 * alpha;
            if cov <= 0.0 {
                continue;
            }
            let idx = (py * pw + px) as usize;
            let existing = data[idx];
            let blended = PremultipliedColorU8::from_rgba(
                lerp(existing.red(), r, cov),
                lerp(existing.green(), g, cov),
                lerp(existing.blue(), b, cov),
                lerp(existing.alpha(), 255, cov),
            )
            .unwrap_or(existing);
            data[idx] = blended;
        }
    }
}

fn lerp(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounded_rect_path_exists_for_positive_dimensions() {
        let path = RasterContext::rounded_rect_path(0.0, 0.0, 40.0, 20.0, 6.0);
        assert!(path.is_some());
    }

    #[test]
    fn lerp_interpolates_linearly() {
        assert_eq!(lerp(0, 255, 0.0), 0);
        assert_eq!(lerp(0, 255, 1.0), 255);
    }
}
