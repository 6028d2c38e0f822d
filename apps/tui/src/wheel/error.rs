use thiserror::Error;

use crate::animation::AnimationError;

#[derive(Debug, Error, PartialEq)]
pub enum WheelError {
    #[error("the wheel needs at least one segment")]
    EmptySegmentSet,

    #[error("segment id {0} appears more than once")]
    DuplicateSegmentId(String),

    #[error("winning index {winner} is outside a wheel of {count} segments")]
    WinnerOutOfRange { winner: usize, count: usize },

    #[error("current rotation must be finite, got {0}")]
    InvalidRotation(f64),

    #[error("minimum spin count must be at least 1")]
    InvalidMinSpins,

    #[error("spin duration must be positive, got {0}s")]
    InvalidDuration(f64),

    #[error("animation did not complete: {0}")]
    Animation(#[from] AnimationError),
}
