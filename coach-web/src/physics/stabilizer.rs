//! Angle stabilizer - ring-buffer smoothing of a noisy scalar
//!
//! Suppresses frame-to-frame detector jitter on joint angles.
//! Averages over however many samples are available until the window fills.

/// Default number of samples in the smoothing window
pub const DEFAULT_WINDOW: usize = 5;

/// How the window contents are combined
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Smoothing {
    /// Arithmetic mean of the window
    #[default]
    Mean,
    /// Linearly increasing weights, newest sample heaviest
    Weighted,
    /// Exponential moving average, `alpha` weight on the newest sample
    Exponential { alpha: f32 },
}

pub struct AngleStabilizer {
    /// Circular buffer of raw samples
    buffer: Vec<f32>,
    /// Next slot to write
    write_index: usize,
    /// Number of valid samples (<= capacity)
    len: usize,
    smoothing: Smoothing,
    /// Last smoothed output
    current: Option<f32>,
}

impl AngleStabilizer {
    pub fn new(window: usize) -> Self {
        Self::with_smoothing(window, Smoothing::Mean)
    }

    pub fn with_smoothing(window: usize, smoothing: Smoothing) -> Self {
        let capacity = window.max(1);
        let smoothing = match smoothing {
            Smoothing::Exponential { alpha } if !(alpha > 0.0 && alpha <= 1.0) => Smoothing::Mean,
            other => other,
        };
        Self {
            buffer: vec![0.0; capacity],
            write_index: 0,
            len: 0,
            smoothing,
            current: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Samples currently in the window
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Last smoothed value, None before the first finite sample
    pub fn current(&self) -> Option<f32> {
        self.current
    }

    /// Push a raw sample and return the smoothed value
    ///
    /// Non-finite samples are ignored: the previous output is returned
    /// (0 if nothing has been seen yet).
    pub fn stabilize(&mut self, raw: f32) -> f32 {
        if !raw.is_finite() {
            return self.current.unwrap_or(0.0);
        }

        let capacity = self.buffer.len();
        self.buffer[self.write_index] = raw;
        self.write_index = (self.write_index + 1) % capacity;
        self.len = (self.len + 1).min(capacity);

        let smoothed = match self.smoothing {
            Smoothing::Mean => self.samples().sum::<f32>() / self.len as f32,
            Smoothing::Weighted => {
                let (sum, weights) = self
                    .samples()
                    .enumerate()
                    .fold((0.0, 0.0), |(sum, weights), (i, v)| {
                        let w = (i + 1) as f32;
                        (sum + v * w, weights + w)
                    });
                sum / weights
            }
            Smoothing::Exponential { alpha } => match self.current {
                Some(prev) => alpha * raw + (1.0 - alpha) * prev,
                None => raw,
            },
        };

        self.current = Some(smoothed);
        smoothed
    }

    /// Forget all history; the next sample starts a fresh window
    pub fn reset(&mut self) {
        self.buffer.iter_mut().for_each(|v| *v = 0.0);
        self.write_index = 0;
        self.len = 0;
        self.current = None;
    }

    /// Window contents, oldest first
    fn samples(&self) -> impl Iterator<Item = f32> + '_ {
        let capacity = self.buffer.len();
        let start = (self.write_index + capacity - self.len) % capacity;
        (0..self.len).map(move |i| self.buffer[(start + i) % capacity])
    }
}

impl Default for AngleStabilizer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}
