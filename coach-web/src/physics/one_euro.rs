//! One Euro filter for 2D landmark positions
//!
//! Smooth while the foot is planted, responsive once it swings. The cutoff
//! follows the planar speed of the point, so both axes open up together.
//! Timestamps are in seconds; stale timestamps and non-finite samples
//! return the last output.

use nalgebra::Vector2;
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OneEuroParams {
    /// Cutoff at rest (Hz)
    pub min_cutoff: f32,
    /// Cutoff added per unit of speed (units/s)
    pub beta: f32,
    /// Cutoff of the speed estimate (Hz)
    pub d_cutoff: f32,
}

impl OneEuroParams {
    /// Foot landmarks at ~30 fps walking
    pub const GAIT: OneEuroParams = OneEuroParams {
        min_cutoff: 3.0,
        beta: 0.5,
        d_cutoff: 1.0,
    };
}

impl Default for OneEuroParams {
    fn default() -> Self {
        Self::GAIT
    }
}

/// Blend toward the new sample for a first-order low-pass at `cutoff` Hz
fn blend(dt: f32, cutoff: f32) -> f32 {
    let r = TAU * cutoff * dt;
    r / (r + 1.0)
}

struct Filtered {
    t: f64,
    position: Vector2<f32>,
    velocity: Vector2<f32>,
}

pub struct OneEuroFilter {
    params: OneEuroParams,
    state: Option<Filtered>,
}

impl OneEuroFilter {
    pub fn new(params: OneEuroParams) -> Self {
        Self { params, state: None }
    }

    pub fn for_gait() -> Self {
        Self::new(OneEuroParams::GAIT)
    }

    /// Last filtered position, origin before the first sample
    pub fn last(&self) -> (f32, f32) {
        self.state
            .as_ref()
            .map_or((0.0, 0.0), |s| (s.position.x, s.position.y))
    }

    /// Filter one position sampled at `t` seconds
    pub fn filter(&mut self, t: f64, (x, y): (f32, f32)) -> (f32, f32) {
        if !(x.is_finite() && y.is_finite()) {
            return self.last();
        }
        let sample = Vector2::new(x, y);
        let Some(state) = self.state.as_mut() else {
            self.state = Some(Filtered {
                t,
                position: sample,
                velocity: Vector2::zeros(),
            });
            return (x, y);
        };

        let dt = (t - state.t) as f32;
        if dt <= 0.0 {
            return (state.position.x, state.position.y);
        }

        let raw_velocity = (sample - state.position) / dt;
        state.velocity = state.velocity.lerp(&raw_velocity, blend(dt, self.params.d_cutoff));
        let cutoff = self.params.min_cutoff + self.params.beta * state.velocity.norm();
        state.position = state.position.lerp(&sample, blend(dt, cutoff));
        state.t = t;
        (state.position.x, state.position.y)
    }

    pub fn reset(&mut self) {
        self.state = None;
    }
}

impl Default for OneEuroFilter {
    fn default() -> Self {
        Self::for_gait()
    }
}
