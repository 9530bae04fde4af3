//! Bounded-concurrency frame rasterisation.
//!
//! A fixed-width `rayon` thread pool drives one render task per frame; a
//! `crossbeam_channel` bounded channel holds a pool of reusable
//! `RasterContext`s so no more than `max_workers` canvases are ever live at
//! once. A single failed frame aborts the whole pass.

use std::path::PathBuf;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};
use rayon::prelude::*;
use tracing::info;

use super::context::RasterContext;
use super::{frame_filename, render_frame, DrawingContext, RenderError, Rgb};
use crate::scene::FramePlan;

pub struct WorkerPoolConfig {
    pub max_workers: usize,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub font_path: PathBuf,
    pub frames_dir: PathBuf,
}

/// Renders every frame in `plan`, writing `fr00001.png`-style files into
/// `cfg.frames_dir`.
pub fn render_all(
    plan: &FramePlan,
    layout: &crate::scene::Layout,
    palette: &[Rgb],
    cfg: &WorkerPoolConfig,
) -> Result<(), RenderError> {
    std::fs::create_dir_all(&cfg.frames_dir).map_err(|e| RenderError::WritePng {
        path: cfg.frames_dir.display().to_string(),
        source: e,
    })?;

    let (tx, rx): (Sender<RasterContext>, Receiver<RasterContext>) =
        crossbeam_channel::bounded(cfg.max_workers);
    for _ in 0..cfg.max_workers {
        tx.send(RasterContext::new(cfg.width, cfg.height, &cfg.font_path)?)
            .expect("channel freshly created, cannot be disconnected");
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cfg.max_workers)
        .build()
        .map_err(|e| RenderError::ThreadPool(e.to_string()))?;

    let total = plan.total_frames as usize;
    let started = Instant::now();
    let progress_every = (cfg.fps as usize).saturating_mul(30).max(1);

    pool.install(|| {
        (0..total).into_par_iter().try_for_each(|i| -> Result<(), RenderError> {
            let mut ctx = rx.recv().expect("worker pool context channel closed early");
            render_frame(i, plan, layout, palette, &mut ctx);
            let path = cfg.frames_dir.join(frame_filename(i));
            let result = ctx.save_png(&path);
            tx.send(ctx).expect("worker pool context channel closed early");
            result?;

            if (i + 1) % progress_every == 0 || i + 1 == total {
                let elapsed = started.elapsed().as_secs_f64();
                info!(
                    "rendered {}/{} frames ({:.2}s elapsed, {:.4}s/frame)",
                    i + 1,
                    total,
                    elapsed,
                    elapsed / (i + 1) as f64
                );
            }
            Ok(())
        })
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_filename_sequence_has_no_gaps() {
        let names: Vec<_> = (0..3).map(frame_filename).collect();
        assert_eq!(names, vec!["fr00001.png", "fr00002.png", "fr00003.png"]);
    }
}
