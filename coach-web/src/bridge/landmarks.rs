//! Flat landmark arrays from JavaScript
//!
//! The detector output arrives as a `Float32Array` with stride 3
//! (`x, y, z`) or stride 4 (`x, y, z, visibility`).

use crate::error::{CoachError, Result};
use crate::pose::Landmark;

/// Decode exactly `count` landmarks from a flat array
pub fn parse_landmarks(data: &[f32], count: usize) -> Result<Vec<Landmark>> {
    let stride = match data.len() {
        n if count > 0 && n == count * 3 => 3,
        n if count > 0 && n == count * 4 => 4,
        n => {
            log::warn!(
                "Invalid landmark data length: {} (expected {} or {})",
                n,
                count * 3,
                count * 4
            );
            return Err(CoachError::InvalidLandmarkData { len: n, expected: count });
        }
    };

    Ok(data
        .chunks_exact(stride)
        .map(|chunk| Landmark {
            x: chunk[0],
            y: chunk[1],
            z: Some(chunk[2]),
            visibility: chunk.get(3).copied(),
        })
        .collect())
}
