use std::io::Write;

use tracing::debug;

pub const CONFETTI_PARTICLE_COUNT: u32 = 100;
pub const CONFETTI_SPREAD_DEGREES: f64 = 70.0;

/// Fire-and-forget audio cues. Implementations must swallow backend
/// failures; a missing audio device never interrupts a spin.
pub trait AudioSink {
    fn play_tick(&mut self);
    fn play_win(&mut self);
}

pub trait ParticleTrigger {
    fn trigger(&mut self, burst: &ParticleBurst);
}

/// Point in screen space, normalised so `(0, 0)` is top-left and `(1, 1)` bottom-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const CENTER: Self = Self { x: 0.5, y: 0.5 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleBurst {
    pub origin: ScreenPoint,
    pub particle_count: u32,
    /// Cone width in degrees.
    pub spread: f64,
}

impl ParticleBurst {
    pub const fn confetti(origin: ScreenPoint) -> Self {
        Self {
            origin,
            particle_count: CONFETTI_PARTICLE_COUNT,
            spread: CONFETTI_SPREAD_DEGREES,
        }
    }
}

/// Collaborators a spin reports to when it settles or crosses a segment.
pub struct SpinEffects<'a> {
    pub audio: &'a mut dyn AudioSink,
    pub particles: &'a mut dyn ParticleTrigger,
    /// Screen-space centre of the wheel widget.
    pub origin: ScreenPoint,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play_tick(&mut self) {}
    fn play_win(&mut self) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoParticles;

impl ParticleTrigger for NoParticles {
    fn trigger(&mut self, _burst: &ParticleBurst) {}
}

const BELL: &[u8] = b"\x07";

/// Audio through the terminal bell. The output handle is opened on first
/// use and released when the sink is dropped.
pub struct TerminalBell {
    output: Option<Box<dyn Write + Send>>,
    open: fn() -> Box<dyn Write + Send>,
    ring_ticks: bool,
}

impl TerminalBell {
    pub fn new(ring_ticks: bool) -> Self {
        Self::with_output(ring_ticks, || Box::new(std::io::stdout()))
    }

    pub fn with_output(ring_ticks: bool, open: fn() -> Box<dyn Write + Send>) -> Self {
        Self {
            output: None,
            open,
            ring_ticks,
        }
    }

    pub const fn is_open(&self) -> bool {
        self.output.is_some()
    }

    fn ring(&mut self) {
        let open = self.open;
        let output = self.output.get_or_insert_with(open);
        if let Err(e) = output.write_all(BELL).and_then(|()| output.flush()) {
            debug!(error = %e, "terminal bell unavailable");
        }
    }
}

impl AudioSink for TerminalBell {
    fn play_tick(&mut self) {
        if self.ring_ticks {
            self.ring();
        }
    }

    fn play_win(&mut self) {
        self.ring();
    }
}

impl std::fmt::Debug for TerminalBell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalBell")
            .field("open", &self.is_open())
            .field("ring_ticks", &self.ring_ticks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "no terminal"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn bell_opens_lazily() {
        let mut bell = TerminalBell::with_output(false, || Box::new(io::sink()));
        assert!(!bell.is_open());

        bell.play_tick();
        assert!(!bell.is_open(), "ticks are silent unless enabled");

        bell.play_win();
        assert!(bell.is_open());
    }

    #[test]
    fn broken_output_is_a_no_op() {
        let mut bell = TerminalBell::with_output(true, || Box::new(Broken));
        bell.play_tick();
        bell.play_win();
        assert!(bell.is_open());
    }

    #[test]
    fn confetti_burst_uses_fixed_shape() {
        let burst = ParticleBurst::confetti(ScreenPoint::new(0.25, 0.75));
        assert_eq!(burst.particle_count, 100);
        assert!((burst.spread - 70.0).abs() < f64::EPSILON);
        assert_eq!(burst.origin, ScreenPoint::new(0.25, 0.75));
    }
}
