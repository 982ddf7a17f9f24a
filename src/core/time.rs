//! Frame timing utilities
//!
//! Supplies the per-frame time delta that drives camera updates and
//! decoration streaming, plus rolling FPS statistics for overlays.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Rolling FPS statistics over a five second window
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct FpsStats {
    pub avg: f32,
    pub min: f32,
    pub max: f32,
    pub frame_count: u64,
}

/// Tracks frame timing and calculates FPS
pub struct FrameTimer {
    last_frame: Instant,
    delta: Duration,
    frame_count: u64,
    /// Ring buffer of (timestamp, frame_time_secs) for rolling stats
    frame_history: VecDeque<(Instant, f32)>,
}

const STATS_WINDOW: Duration = Duration::from_secs(5);

impl FrameTimer {
    /// Create a new frame timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta: Duration::ZERO,
            frame_count: 0,
            frame_history: VecDeque::new(),
        }
    }

    /// Call once per frame. Returns the delta since the previous tick in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta = now - self.last_frame;
        self.last_frame = now;
        self.frame_count += 1;

        let frame_time = self.delta.as_secs_f32();
        self.frame_history.push_back((now, frame_time));

        // Prune frames that fell out of the stats window
        let cutoff = now - STATS_WINDOW;
        while let Some(&(timestamp, _)) = self.frame_history.front() {
            if timestamp < cutoff {
                self.frame_history.pop_front();
            } else {
                break;
            }
        }

        frame_time
    }

    /// Get delta time in seconds
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get delta time as Duration
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Get total frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get rolling FPS statistics over the stats window
    pub fn fps_stats(&self) -> FpsStats {
        let mut frames = 0u64;
        let mut total_time = 0.0f32;
        let mut min_fps = f32::INFINITY;
        let mut max_fps = 0.0f32;

        for &(_, frame_time) in self.frame_history.iter() {
            frames += 1;
            total_time += frame_time;
            if frame_time > 0.0 {
                let fps = 1.0 / frame_time;
                min_fps = min_fps.min(fps);
                max_fps = max_fps.max(fps);
            }
        }

        let avg = if total_time > 0.0 {
            frames as f32 / total_time
        } else {
            0.0
        };
        if frames == 0 || min_fps == f32::INFINITY {
            min_fps = 0.0;
        }

        FpsStats {
            avg,
            min: min_fps,
            max: max_fps,
            frame_count: self.frame_count,
        }
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}
