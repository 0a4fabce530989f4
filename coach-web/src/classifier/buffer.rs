//! Rolling feature buffer for sequence classification
//!
//! Keeps the last N frames of per-frame features in chronological order
//! so JS can hand a flat window straight to the inference session.

/// Frames per classification window
pub const DEFAULT_SEQUENCE_LENGTH: usize = 30;

/// Rolling buffer that maintains the last `capacity` frames
pub struct FeatureBuffer {
    /// Circular storage, `capacity * width` floats
    data: Vec<f32>,
    width: usize,
    capacity: usize,

    /// Next slot to write
    write_index: usize,

    /// Whether the buffer has wrapped at least once
    filled: bool,
}

impl FeatureBuffer {
    pub fn new(capacity: usize, width: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: vec![0.0; capacity * width],
            width,
            capacity,
            write_index: 0,
            filled: false,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Push one frame; frames of the wrong width are dropped
    pub fn push(&mut self, features: &[f32]) -> bool {
        if features.len() != self.width {
            log::warn!(
                "Feature frame of width {} dropped, buffer expects {}",
                features.len(),
                self.width
            );
            return false;
        }
        let start = self.write_index * self.width;
        self.data[start..start + self.width].copy_from_slice(features);
        self.write_index = (self.write_index + 1) % self.capacity;

        if self.write_index == 0 {
            self.filled = true;
        }
        true
    }

    /// A full window is available
    pub fn is_ready(&self) -> bool {
        self.filled
    }

    pub fn frame_count(&self) -> usize {
        if self.filled {
            self.capacity
        } else {
            self.write_index
        }
    }

    /// Frames oldest first as one flat array of `capacity * width` floats
    pub fn as_flat(&self) -> Vec<f32> {
        let mut result = Vec::with_capacity(self.data.len());
        for i in 0..self.capacity {
            let idx = (self.write_index + i) % self.capacity;
            let start = idx * self.width;
            result.extend_from_slice(&self.data[start..start + self.width]);
        }
        result
    }

    pub fn clear(&mut self) {
        self.data.fill(0.0);
        self.write_index = 0;
        self.filled = false;
    }
}
