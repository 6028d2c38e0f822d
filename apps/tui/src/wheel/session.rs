use std::fmt;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, warn};

use super::effects::{AudioSink, ParticleBurst, SpinEffects};
use super::planner::plan_end_rotation;
use super::selector::select_winner;
use super::ticks::TickDetector;
use super::WheelError;
use crate::animation::{AnimationRequest, Animator, CubicBezier};
use crate::domain::{Segment, SegmentSet};

pub const DEFAULT_MIN_SPINS: u32 = 5;
pub const DEFAULT_SPIN_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinStatus {
    Idle,
    Spinning,
    /// Finished a spin; accepts the next trigger exactly like `Idle`.
    Settled,
}

impl fmt::Display for SpinStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Spinning => write!(f, "Spinning"),
            Self::Settled => write!(f, "Settled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpinSettings {
    pub min_spins: u32,
    pub spin_duration: Duration,
    /// Debug override for the winner; ignored when out of range.
    pub forced_result: Option<i64>,
    pub sound: bool,
    pub confetti: bool,
}

impl SpinSettings {
    pub fn validate(&self) -> Result<(), WheelError> {
        if self.min_spins == 0 {
            return Err(WheelError::InvalidMinSpins);
        }
        if self.spin_duration.is_zero() {
            return Err(WheelError::InvalidDuration(self.spin_duration.as_secs_f64()));
        }
        Ok(())
    }
}

impl Default for SpinSettings {
    fn default() -> Self {
        Self {
            min_spins: DEFAULT_MIN_SPINS,
            spin_duration: DEFAULT_SPIN_DURATION,
            forced_result: None,
            sound: true,
            confetti: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpinOutcome {
    pub winner_index: usize,
    pub segment: Segment,
    pub end_rotation: f64,
    pub duration: Duration,
    pub easing: CubicBezier,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    winner_index: usize,
    request: AnimationRequest,
}

/// Owns the wheel's cumulative rotation and sequences one spin at a time:
/// `Idle | Settled --begin_spin--> Spinning --finish_spin--> Settled`,
/// with `cancel` returning to `Idle` without side effects.
pub struct SpinSession<R> {
    segments: SegmentSet,
    settings: SpinSettings,
    rng: R,
    status: SpinStatus,
    current_rotation: f64,
    ticks: TickDetector,
    in_flight: Option<InFlight>,
}

impl<R: Rng> SpinSession<R> {
    pub fn new(segments: SegmentSet, settings: SpinSettings, rng: R) -> Result<Self, WheelError> {
        settings.validate()?;
        let ticks = TickDetector::new(segments.angle_per_item());
        Ok(Self {
            segments,
            settings,
            rng,
            status: SpinStatus::Idle,
            current_rotation: 0.0,
            ticks,
            in_flight: None,
        })
    }

    pub const fn status(&self) -> SpinStatus {
        self.status
    }

    pub const fn is_spinning(&self) -> bool {
        matches!(self.status, SpinStatus::Spinning)
    }

    /// Cumulative rotation in degrees, never wrapped.
    pub const fn current_rotation(&self) -> f64 {
        self.current_rotation
    }

    pub const fn segments(&self) -> &SegmentSet {
        &self.segments
    }

    pub const fn settings(&self) -> &SpinSettings {
        &self.settings
    }

    pub fn set_sound(&mut self, enabled: bool) {
        self.settings.sound = enabled;
    }

    pub fn set_confetti(&mut self, enabled: bool) {
        self.settings.confetti = enabled;
    }

    pub const fn last_tick_boundary(&self) -> Option<i64> {
        self.ticks.last_boundary()
    }

    /// The request for the spin in flight, if any.
    pub fn active_request(&self) -> Option<AnimationRequest> {
        self.in_flight.map(|spin| spin.request)
    }

    /// Starts a spin. Returns `Ok(None)` without touching any state when a
    /// spin is already in flight.
    pub fn begin_spin(&mut self) -> Result<Option<AnimationRequest>, WheelError> {
        if self.is_spinning() {
            debug!("spin rejected, wheel already spinning");
            return Ok(None);
        }

        let count = self.segments.len();
        let winner_index = select_winner(count, self.settings.forced_result, &mut self.rng)?;
        let end_rotation = plan_end_rotation(
            winner_index,
            count,
            self.current_rotation,
            self.settings.min_spins,
        )?;

        let request = AnimationRequest {
            from: self.current_rotation,
            to: end_rotation,
            duration: self.settings.spin_duration,
            easing: CubicBezier::SPIN,
        };

        // Every spin starts with no boundary ticked, so its first frame ticks
        // the boundary under the pointer even when the wheel rests on it.
        self.ticks.reset();
        self.in_flight = Some(InFlight {
            winner_index,
            request,
        });
        self.status = SpinStatus::Spinning;

        info!(
            winner = winner_index,
            from = self.current_rotation,
            to = end_rotation,
            "spin started"
        );
        Ok(Some(request))
    }

    /// Feeds one animation frame. Returns the boundary index when this frame
    /// crossed a segment boundary.
    pub fn observe_frame(&mut self, angle: f64, audio: &mut dyn AudioSink) -> Option<i64> {
        if !self.is_spinning() {
            return None;
        }

        let boundary = self.ticks.observe(angle)?;
        debug!(boundary, angle, "segment boundary crossed");
        if self.settings.sound {
            audio.play_tick();
        }
        Some(boundary)
    }

    /// Settles the spin in flight: persist rotation, win sound, confetti,
    /// then `on_finish`. Does nothing when no spin is in flight.
    pub fn finish_spin(
        &mut self,
        effects: &mut SpinEffects<'_>,
        on_finish: impl FnOnce(&Segment),
    ) -> Option<SpinOutcome> {
        if !self.is_spinning() {
            return None;
        }
        let spin = self.in_flight.take()?;
        let Some(segment) = self.segments.get(spin.winner_index).cloned() else {
            self.status = SpinStatus::Idle;
            return None;
        };

        self.current_rotation = spin.request.to;

        if self.settings.sound {
            effects.audio.play_win();
        }
        if self.settings.confetti {
            effects
                .particles
                .trigger(&ParticleBurst::confetti(effects.origin));
        }

        on_finish(&segment);
        self.status = SpinStatus::Settled;

        info!(
            winner = spin.winner_index,
            label = %segment.label,
            rotation = self.current_rotation,
            "spin settled"
        );

        Some(SpinOutcome {
            winner_index: spin.winner_index,
            segment,
            end_rotation: spin.request.to,
            duration: spin.request.duration,
            easing: spin.request.easing,
        })
    }

    /// Abandons the spin in flight. Rotation stays where the last settled
    /// spin left it and no completion effect fires.
    pub fn cancel(&mut self) -> bool {
        if !self.is_spinning() {
            return false;
        }

        self.in_flight = None;
        self.ticks.reset();
        self.status = SpinStatus::Idle;
        info!(rotation = self.current_rotation, "spin cancelled");
        true
    }

    /// Runs a whole spin against `animator`, resolving once the completion
    /// effects have fired. Returns `Ok(None)` when a spin is already in flight.
    ///
    /// If the animator fails the spin is cancelled and the error returned.
    /// Dropping the returned future mid-spin leaves the session `Spinning`;
    /// call [`Self::cancel`] to recover.
    pub async fn trigger_spin<A: Animator>(
        &mut self,
        animator: &mut A,
        effects: &mut SpinEffects<'_>,
        on_finish: impl FnOnce(&Segment),
    ) -> Result<Option<SpinOutcome>, WheelError> {
        let Some(request) = self.begin_spin()? else {
            return Ok(None);
        };

        let animated = {
            let audio = &mut *effects.audio;
            animator
                .animate(request, |angle| {
                    self.observe_frame(angle, audio);
                })
                .await
        };

        if let Err(error) = animated {
            warn!(error = %error, "animation failed, abandoning spin");
            self.cancel();
            return Err(error.into());
        }

        Ok(self.finish_spin(effects, on_finish))
    }
}

impl<R> fmt::Debug for SpinSession<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpinSession")
            .field("segments", &self.segments.len())
            .field("status", &self.status)
            .field("current_rotation", &self.current_rotation)
            .field("last_tick", &self.ticks.last_boundary())
            .finish_non_exhaustive()
    }
}
