//! Feedback tokens handed to the presentation layer
//!
//! Tokens are i18n keys, never display text.

use serde::{Serialize, Serializer};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackKey {
    /// Required landmarks missing or low confidence
    NotVisible,
    /// At rest, waiting for the movement to start
    GetReady,
    KeepGoing,
    TargetReached,
    ReturnToStart,
    RepCounted,
    /// Returned without reaching the target
    NotDeepEnough,
    /// Rep counted but finished too quickly
    TooFast,
    HoldPosition,
    HoldBroken,
    HoldComplete,
    TouchNextFinger,
    WrongFinger,
    SequenceComplete,
}

impl FeedbackKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackKey::NotVisible => "exercise.feedback.notVisible",
            FeedbackKey::GetReady => "exercise.feedback.getReady",
            FeedbackKey::KeepGoing => "exercise.feedback.keepGoing",
            FeedbackKey::TargetReached => "exercise.feedback.targetReached",
            FeedbackKey::ReturnToStart => "exercise.feedback.returnToStart",
            FeedbackKey::RepCounted => "exercise.feedback.repCounted",
            FeedbackKey::NotDeepEnough => "exercise.feedback.notDeepEnough",
            FeedbackKey::TooFast => "exercise.feedback.tooFast",
            FeedbackKey::HoldPosition => "exercise.feedback.holdPosition",
            FeedbackKey::HoldBroken => "exercise.feedback.holdBroken",
            FeedbackKey::HoldComplete => "exercise.feedback.holdComplete",
            FeedbackKey::TouchNextFinger => "exercise.feedback.touchNextFinger",
            FeedbackKey::WrongFinger => "exercise.feedback.wrongFinger",
            FeedbackKey::SequenceComplete => "exercise.feedback.sequenceComplete",
        }
    }
}

impl Serialize for FeedbackKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
