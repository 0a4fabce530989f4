//! Foot contact tracker - ground contact and heel strikes for one leg
//!
//! Image y grows downward, so the floor is the largest smoothed foot y
//! seen over the rolling window and "descending" means positive velocity.
//! All thresholds scale with leg length so they hold at any camera distance.

use std::collections::VecDeque;

use crate::physics::{OneEuroFilter, VelocityTracker};

/// Foot moving faster than this many dead zones is in swing even near the floor
const STANCE_SPEED_FACTOR: f32 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FootSample {
    /// Smoothed foot position (aspect-corrected x, y)
    pub position: (f32, f32),
    pub in_contact: bool,
    /// Vertical velocity, leg lengths per second is the natural unit
    pub velocity: f32,
    /// Planted: in contact and not moving fast
    pub planted: bool,
    pub heel_strike: bool,
}

pub struct FootTracker {
    filter: OneEuroFilter,
    velocity: VelocityTracker,
    floor_history: VecDeque<f32>,
    floor_window: usize,
    /// Foot has left the ground since the last strike
    swing_seen: bool,
    /// Foot has been moving down since it left the ground
    descending_seen: bool,
    last_strike: Option<f64>,
    min_stride_seconds: f64,
}

impl FootTracker {
    pub fn new(floor_window: usize, min_stride_seconds: f64) -> Self {
        Self {
            filter: OneEuroFilter::for_gait(),
            velocity: VelocityTracker::new(0.0),
            floor_history: VecDeque::with_capacity(floor_window.max(1)),
            floor_window: floor_window.max(1),
            swing_seen: false,
            descending_seen: false,
            last_strike: None,
            min_stride_seconds,
        }
    }

    /// Rolling floor baseline (largest foot y in the window)
    pub fn floor(&self) -> Option<f32> {
        self.floor_history.iter().copied().reduce(f32::max)
    }

    pub fn last_strike(&self) -> Option<f64> {
        self.last_strike
    }

    /// Feed the raw foot position at `t` seconds
    ///
    /// `contact_tolerance` and `dead_zone` are absolute, already scaled by
    /// the current leg length.
    pub fn update(&mut self, t: f64, raw: (f32, f32), contact_tolerance: f32, dead_zone: f32) -> FootSample {
        let position = self.filter.filter(t, raw);

        if self.floor_history.len() == self.floor_window {
            self.floor_history.pop_front();
        }
        self.floor_history.push_back(position.1);
        let floor = self.floor().unwrap_or(position.1);

        self.velocity.set_dead_zone(dead_zone);
        let velocity = self.velocity.update(t, position.1);

        let in_contact = floor - position.1 <= contact_tolerance;
        let planted = in_contact && velocity.abs() <= STANCE_SPEED_FACTOR * dead_zone;

        if !in_contact {
            self.swing_seen = true;
        }
        if self.swing_seen && velocity > 0.0 {
            self.descending_seen = true;
        }

        let mut heel_strike = false;
        // Came down after a swing and has come to rest on the floor
        if self.swing_seen && self.descending_seen && in_contact && velocity <= 0.0 {
            self.swing_seen = false;
            self.descending_seen = false;
            match self.last_strike {
                Some(last) if t - last < self.min_stride_seconds => {
                    log::trace!("heel strike at {:.2}s ignored, {:.2}s after previous", t, t - last);
                }
                _ => {
                    heel_strike = true;
                    self.last_strike = Some(t);
                }
            }
        }

        FootSample {
            position,
            in_contact,
            velocity,
            planted,
            heel_strike,
        }
    }
}
