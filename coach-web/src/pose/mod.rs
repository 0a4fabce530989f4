//! Pose module - landmark type and body/hand index schema
//!
//! Re-exports only. All logic in submodules.

mod landmark;
mod skeleton;

pub use landmark::{Landmark, midpoint};
pub use skeleton::*;
