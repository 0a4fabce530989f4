//! Vertical velocity tracking with dead zone
//!
//! Tracks timestamped positions and differentiates over a short window.
//! Speeds inside the dead zone read as zero (filters jitter).

use std::collections::VecDeque;

/// Number of frame intervals the velocity is measured over
pub const VELOCITY_FRAMES: usize = 3;

/// Finite-difference velocity over the last [`VELOCITY_FRAMES`] samples
pub struct VelocityTracker {
    /// Ring buffer of (timestamp seconds, value)
    history: VecDeque<(f64, f32)>,
    /// Speeds below this magnitude (units per second) are reported as 0
    dead_zone: f32,
}

impl VelocityTracker {
    pub fn new(dead_zone: f32) -> Self {
        Self {
            history: VecDeque::with_capacity(VELOCITY_FRAMES + 2),
            dead_zone: dead_zone.max(0.0),
        }
    }

    pub fn set_dead_zone(&mut self, dead_zone: f32) {
        self.dead_zone = dead_zone.max(0.0);
    }

    /// Push a new sample, returns the velocity in units per second
    ///
    /// Non-increasing timestamps are ignored.
    pub fn update(&mut self, t: f64, value: f32) -> f32 {
        if let Some(&(last_t, _)) = self.history.back() {
            if t <= last_t {
                return self.velocity();
            }
        }
        if !value.is_finite() {
            return self.velocity();
        }

        self.history.push_back((t, value));
        if self.history.len() > VELOCITY_FRAMES + 1 {
            self.history.pop_front();
        }

        self.velocity()
    }

    /// Current velocity estimate (0 until enough history)
    pub fn velocity(&self) -> f32 {
        let (Some(&(t_old, v_old)), Some(&(t_new, v_new))) = (self.history.front(), self.history.back())
        else {
            return 0.0;
        };
        if self.history.len() < 2 {
            return 0.0;
        }

        let dt = (t_new - t_old) as f32;
        if dt <= 0.0 {
            return 0.0;
        }

        let raw = (v_new - v_old) / dt;
        if raw.abs() < self.dead_zone {
            0.0
        } else {
            raw
        }
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_rate() {
        let mut v = VelocityTracker::new(0.0);
        for i in 0..6 {
            v.update(i as f64 * 0.1, i as f32 * 0.05);
        }
        assert!((v.velocity() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_dead_zone() {
        let mut v = VelocityTracker::new(0.1);
        v.update(0.0, 0.5);
        v.update(0.1, 0.501);
        assert_eq!(v.velocity(), 0.0);
        v.update(0.2, 0.6);
        assert!(v.velocity() > 0.1);
    }

    #[test]
    fn test_out_of_order_ignored() {
        let mut v = VelocityTracker::new(0.0);
        v.update(1.0, 0.0);
        v.update(2.0, 1.0);
        assert_eq!(v.update(1.5, 100.0), 1.0);
    }

    #[test]
    fn test_clear() {
        let mut v = VelocityTracker::new(0.0);
        v.update(0.0, 0.0);
        v.update(1.0, 1.0);
        v.clear();
        assert_eq!(v.velocity(), 0.0);
    }
}
