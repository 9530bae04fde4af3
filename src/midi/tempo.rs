//! Piecewise tempo map: tick-domain to seconds-domain conversion.
//!
//! A file's tempo can change any number of times. Each change takes effect
//! from its tick onward until superseded by the next one, so converting a
//! tick to wall-clock seconds means integrating across every change that
//! happened before it.

/// One tempo change: `bpm` beats per minute starting at `tick`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoPoint {
    pub tick: u32,
    pub bpm: f64,
}

pub const DEFAULT_BPM: f64 = 120.0;

/// Sorted, de-duplicated tempo changes plus the file's ticks-per-quarter-note.
#[derive(Debug, Clone)]
pub struct TempoMap {
    ppq: u32,
    points: Vec<TempoPoint>,
}

impl TempoMap {
    /// Builds a map from an unsorted, possibly-duplicated list of tempo
    /// points. Points sharing a tick keep the last one seen (the value a
    /// Set-Tempo meta event at that tick supersedes any earlier one in
    /// declaration order).
    pub fn new(ppq: u32, mut points: Vec<TempoPoint>) -> Self {
        points.sort_by_key(|p| p.tick);
        points.dedup_by(|a, b| {
            if a.tick == b.tick {
                // `a` is the later element in sort order when dedup_by compares
                // adjacent items; keep it by copying into `b`.
                *b = *a;
                true
            } else {
                false
            }
        });
        if points.first().map(|p| p.tick) != Some(0) {
            points.insert(0, TempoPoint { tick: 0, bpm: DEFAULT_BPM });
        }
        Self { ppq: ppq.max(1), points }
    }

    /// Converts an absolute tick to seconds since tick 0, integrating across
    /// every tempo segment that precedes it.
    pub fn tick_to_seconds(&self, tick: u32) -> f64 {
        let idx = self.segment_index(tick);
        let mut seconds = 0.0;
        for (i, point) in self.points[..=idx].iter().enumerate() {
            let segment_end = self
                .points
                .get(i + 1)
                .map(|p| p.tick)
                .unwrap_or(tick)
                .min(tick);
            if segment_end <= point.tick {
                continue;
            }
            let ticks_in_segment = (segment_end - point.tick) as f64;
            let beats = ticks_in_segment / self.ppq as f64;
            seconds += beats * 60.0 / point.bpm;
        }
        seconds
    }

    /// Binary search for the tempo segment containing `tick`.
    fn segment_index(&self, tick: u32) -> usize {
        match self.points.binary_search_by_key(&tick, |p| p.tick) {
            Ok(i) => i,
            Err(0) => 0,
            Err(i) => i - 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_tempo_is_linear() {
        let map = TempoMap::new(480, vec![TempoPoint { tick: 0, bpm: 120.0 }]);
        assert!((map.tick_to_seconds(480) - 0.5).abs() < 1e-9);
        assert!((map.tick_to_seconds(960) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn missing_initial_point_defaults_to_120() {
        let map = TempoMap::new(480, vec![TempoPoint { tick: 960, bpm: 60.0 }]);
        assert!((map.tick_to_seconds(480) - 0.5).abs() < 1e-9);
        // From tick 960 onward, 60 bpm: one beat per second.
        assert!((map.tick_to_seconds(960 + 480) - (1.0 + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn monotonic_across_changes() {
        let map = TempoMap::new(
            480,
            vec![
                TempoPoint { tick: 0, bpm: 120.0 },
                TempoPoint { tick: 480, bpm: 90.0 },
                TempoPoint { tick: 1920, bpm: 200.0 },
            ],
        );
        let mut prev = 0.0;
        for t in (0..4000).step_by(37) {
            let s = map.tick_to_seconds(t);
            assert!(s >= prev);
            prev = s;
        }
    }

    #[test]
    fn duplicate_tick_keeps_last_declared() {
        let map = TempoMap::new(
            480,
            vec![
                TempoPoint { tick: 0, bpm: 120.0 },
                TempoPoint { tick: 480, bpm: 60.0 },
                TempoPoint { tick: 480, bpm: 240.0 },
            ],
        );
        // 240 bpm applies from tick 480: one beat every 0.25s.
        assert!((map.tick_to_seconds(480 + 480) - (0.5 + 0.25)).abs() < 1e-9);
    }
}
