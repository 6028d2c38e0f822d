// Spin resolution core: who wins, where the wheel stops, when it clicks.

mod effects;
mod error;
mod planner;
mod selector;
mod session;
mod ticks;

pub use effects::{
    AudioSink, NoParticles, ParticleBurst, ParticleTrigger, ScreenPoint, SilentAudio, SpinEffects,
    TerminalBell, CONFETTI_PARTICLE_COUNT, CONFETTI_SPREAD_DEGREES,
};
pub use error::WheelError;
pub use planner::{plan_end_rotation, segment_center, segment_under_pointer, FULL_TURN, POINTER_ANGLE};
pub use selector::select_winner;
pub use session::{
    SpinOutcome, SpinSession, SpinSettings, SpinStatus, DEFAULT_MIN_SPINS, DEFAULT_SPIN_DURATION,
};
pub use ticks::TickDetector;
