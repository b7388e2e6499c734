//! Shared gait clock. Sampled once per tick so every leg compares against the
//! same phase value; legs are only allowed to start a swing while the wrapped
//! distance between the clock and their phase offset is inside the step
//! window.

use crate::config::RigConfig;
use crate::math::{phase_distance, wrap01};

#[derive(Clone, Copy, Debug)]
pub struct GaitClock {
    /// Current phase in [0, 1).
    pub phase: f32,
    half_window: f32,
}

impl GaitClock {
    /// Sample the clock from elapsed simulated time.
    pub fn sample(time: f32, cfg: &RigConfig) -> Self {
        Self {
            phase: wrap01(time * cfg.gait_cycle_frequency),
            half_window: cfg.step_window.clamp(0.01, 1.0) * 0.5,
        }
    }

    /// Whether a leg with the given phase offset may start a swing now.
    pub fn window_open(&self, offset: f32) -> bool {
        phase_distance(self.phase, wrap01(offset)) <= self.half_window
    }

    /// Half a gait cycle in seconds, used to defer the second leg group when
    /// movement starts.
    pub fn half_cycle(cfg: &RigConfig) -> f32 {
        0.5 / cfg.gait_cycle_frequency.max(1e-4)
    }
}
