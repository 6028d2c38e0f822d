// Export our modules for use in binaries and tests
pub mod animation;
pub mod config;
pub mod domain;
pub mod wheel;

pub use domain::{Rgb, Segment, SegmentId, SegmentSet, SegmentStyle, WheelTheme};
pub use wheel::{SpinOutcome, SpinSession, SpinSettings, SpinStatus, WheelError};
