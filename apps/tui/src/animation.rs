use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{Instant, MissedTickBehavior};

/// Longest wall-clock gap a single frame is allowed to account for.
const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnimationError {
    #[error("animation interrupted: {0}")]
    Interrupted(String),
}

/// CSS-style `cubic-bezier(x1, y1, x2, y2)` easing curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CubicBezier {
    /// Fast spin-up, long slow deceleration.
    pub const SPIN: Self = Self::new(0.2, 0.8, 0.2, 1.0);

    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn coefficients(p1: f64, p2: f64) -> (f64, f64, f64) {
        let c = 3.0 * p1;
        let b = 3.0f64.mul_add(p2 - p1, -c);
        let a = 1.0 - c - b;
        (a, b, c)
    }

    fn sample_axis(p1: f64, p2: f64, t: f64) -> f64 {
        let (a, b, c) = Self::coefficients(p1, p2);
        a.mul_add(t, b).mul_add(t, c) * t
    }

    fn sample_axis_derivative(p1: f64, p2: f64, t: f64) -> f64 {
        let (a, b, c) = Self::coefficients(p1, p2);
        (3.0 * a).mul_add(t, 2.0 * b).mul_add(t, c)
    }

    fn solve_t(&self, x: f64) -> f64 {
        const EPSILON: f64 = 1e-7;

        let mut t = x;
        for _ in 0..8 {
            let error = Self::sample_axis(self.x1, self.x2, t) - x;
            if error.abs() < EPSILON {
                return t;
            }
            let slope = Self::sample_axis_derivative(self.x1, self.x2, t);
            if slope.abs() < 1e-6 {
                break;
            }
            t -= error / slope;
        }

        // Newton stalled; bisection always converges on [0, 1].
        let (mut low, mut high) = (0.0, 1.0);
        t = x;
        for _ in 0..64 {
            let value = Self::sample_axis(self.x1, self.x2, t);
            if (value - x).abs() < EPSILON {
                break;
            }
            if value < x {
                low = t;
            } else {
                high = t;
            }
            t = (low + high) / 2.0;
        }
        t
    }

    /// Eased progress for linear progress `x` in `[0, 1]`.
    pub fn ease(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        Self::sample_axis(self.y1, self.y2, self.solve_t(x))
    }
}

/// What an animation engine is asked to do for one spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationRequest {
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
    pub easing: CubicBezier,
}

impl AnimationRequest {
    /// Angle at `elapsed` into the animation. Exactly `to` once the duration has passed.
    pub fn sample(&self, elapsed: Duration) -> f64 {
        if self.is_finished(elapsed) {
            return self.to;
        }
        let progress = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (self.to - self.from).mul_add(self.easing.ease(progress), self.from)
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

/// The animation engine seam. Implementations call `on_frame` with each
/// intermediate angle, report `request.to` last, and resolve after that.
pub trait Animator {
    fn animate<F>(
        &mut self,
        request: AnimationRequest,
        on_frame: F,
    ) -> impl Future<Output = Result<(), AnimationError>>
    where
        F: FnMut(f64);
}

/// Drives a request from a tokio interval.
#[derive(Debug, Clone, Copy)]
pub struct TokioAnimator {
    frame_interval: Duration,
}

impl TokioAnimator {
    pub const fn new(frame_interval: Duration) -> Self {
        Self { frame_interval }
    }
}

impl Default for TokioAnimator {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}

impl Animator for TokioAnimator {
    fn animate<F>(
        &mut self,
        request: AnimationRequest,
        mut on_frame: F,
    ) -> impl Future<Output = Result<(), AnimationError>>
    where
        F: FnMut(f64),
    {
        let frame_interval = self.frame_interval;
        async move {
            if frame_interval.is_zero() {
                return Err(AnimationError::Interrupted(
                    "frame interval must be non-zero".to_string(),
                ));
            }

            let mut interval = tokio::time::interval(frame_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let started = Instant::now();

            loop {
                interval.tick().await;
                let elapsed = started.elapsed();
                on_frame(request.sample(elapsed));
                if request.is_finished(elapsed) {
                    return Ok(());
                }
            }
        }
    }
}

/// Per-frame time source for the event loop. Gaps longer than
/// `MAX_FRAME_DELTA` are clamped and backwards clocks count as zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_tick: Option<f64>,
}

impl FrameClock {
    pub const fn new() -> Self {
        Self { last_tick: None }
    }

    pub fn advance(&mut self, now_seconds: f64) -> Duration {
        let delta = self
            .last_tick
            .map_or(0.0, |last| (now_seconds - last).clamp(0.0, MAX_FRAME_DELTA.as_secs_f64()));
        self.last_tick = Some(now_seconds);
        Duration::from_secs_f64(delta)
    }

    pub const fn last_tick(&self) -> Option<f64> {
        self.last_tick
    }
}
