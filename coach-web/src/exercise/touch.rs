//! Touch sequence counter - thumb opposition for hand rehab
//!
//! The thumb tip touches the index, middle, ring and pinky tips in order.
//! One completed sequence is one repetition. Distances are measured
//! relative to palm size so the check is independent of hand distance
//! from the camera.

use super::detector::{AccuracyTally, RepPhase, RepUpdate};
use super::feedback::FeedbackKey;
use crate::pose::{Landmark, HAND_LANDMARK_COUNT, MIDDLE_MCP, OPPOSITION_TIPS, THUMB_TIP, WRIST};

/// Tip distance / palm size below which a touch starts
pub const TOUCH_RATIO: f32 = 0.25;

/// Tip distance / palm size above which a touch ends
pub const RELEASE_RATIO: f32 = 0.40;

/// Palms smaller than this (normalized units) are treated as not visible
const MIN_PALM_SIZE: f32 = 0.01;

pub struct TouchSequenceCounter {
    /// Index into [`OPPOSITION_TIPS`] of the next finger to touch
    next: usize,
    /// Fingertip currently in contact with the thumb
    touching: Option<usize>,
    /// Out-of-order touches in the current sequence
    mistakes: u32,
    rep_count: u32,
    last_timestamp: Option<f64>,
    accuracy: AccuracyTally,
}

impl TouchSequenceCounter {
    pub fn new() -> Self {
        Self {
            next: 0,
            touching: None,
            mistakes: 0,
            rep_count: 0,
            last_timestamp: None,
            accuracy: AccuracyTally::default(),
        }
    }

    pub fn rep_count(&self) -> u32 {
        self.rep_count
    }

    pub fn set_accuracy(&self) -> Option<f32> {
        self.accuracy.mean()
    }

    /// Landmark index of the fingertip expected next
    pub fn next_finger(&self) -> usize {
        OPPOSITION_TIPS[self.next]
    }

    pub fn update(&mut self, landmarks: &[Landmark], timestamp: f64) -> RepUpdate {
        if !timestamp.is_finite() || landmarks.len() < HAND_LANDMARK_COUNT {
            return self.snapshot(FeedbackKey::NotVisible);
        }
        if let Some(last) = self.last_timestamp {
            if timestamp <= last {
                return self.snapshot(FeedbackKey::TouchNextFinger);
            }
        }

        let thumb = &landmarks[THUMB_TIP];
        let palm = landmarks[WRIST].distance(&landmarks[MIDDLE_MCP]);
        if !thumb.is_visible(0.0) || !(palm >= MIN_PALM_SIZE) {
            return self.snapshot(FeedbackKey::NotVisible);
        }
        self.last_timestamp = Some(timestamp);

        let ratio = |tip: usize| thumb.distance(&landmarks[tip]) / palm;

        if let Some(tip) = self.touching {
            if ratio(tip) > RELEASE_RATIO {
                self.touching = None;
            } else {
                return self.snapshot(FeedbackKey::TouchNextFinger);
            }
        }

        let closest = OPPOSITION_TIPS
            .iter()
            .copied()
            .filter(|&tip| landmarks[tip].is_visible(0.0))
            .map(|tip| (tip, ratio(tip)))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let mut accuracy = None;
        let feedback = match closest {
            Some((tip, r)) if r < TOUCH_RATIO => {
                self.touching = Some(tip);
                if tip == OPPOSITION_TIPS[self.next] {
                    self.next += 1;
                    if self.next == OPPOSITION_TIPS.len() {
                        accuracy = Some(self.complete_sequence());
                        FeedbackKey::SequenceComplete
                    } else {
                        FeedbackKey::TouchNextFinger
                    }
                } else {
                    self.mistakes += 1;
                    FeedbackKey::WrongFinger
                }
            }
            _ if self.next == 0 => FeedbackKey::GetReady,
            _ => FeedbackKey::TouchNextFinger,
        };

        RepUpdate {
            phase: self.phase(),
            rep_count: self.rep_count,
            counted: accuracy.is_some(),
            accuracy,
            progress: self.progress(),
            feedback,
        }
    }

    fn complete_sequence(&mut self) -> f32 {
        let fingers = OPPOSITION_TIPS.len() as f32;
        let score = fingers / (fingers + self.mistakes as f32) * 100.0;
        self.rep_count += 1;
        self.accuracy.add(score);
        self.next = 0;
        self.mistakes = 0;
        log::debug!("touch sequence {} complete: accuracy {:.0}%", self.rep_count, score);
        score
    }

    fn phase(&self) -> RepPhase {
        if self.next == 0 && self.touching.is_none() {
            RepPhase::WaitingForStart
        } else {
            RepPhase::InSequence
        }
    }

    fn progress(&self) -> f32 {
        self.next as f32 / OPPOSITION_TIPS.len() as f32 * 100.0
    }

    pub fn snapshot(&self, feedback: FeedbackKey) -> RepUpdate {
        RepUpdate {
            phase: self.phase(),
            rep_count: self.rep_count,
            counted: false,
            accuracy: None,
            progress: self.progress(),
            feedback,
        }
    }

    pub fn reset(&mut self) {
        *self = TouchSequenceCounter::new();
    }
}

impl Default for TouchSequenceCounter {
    fn default() -> Self {
        Self::new()
    }
}
