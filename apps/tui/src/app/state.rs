use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ratatui::layout::Rect;
use spin_wheel_tui::animation::FrameClock;
use spin_wheel_tui::config::WheelConfig;
use spin_wheel_tui::domain::{Segment, SegmentSet, WheelTheme};
use spin_wheel_tui::wheel::{ScreenPoint, SpinEffects, SpinSession, TerminalBell, WheelError};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tachyonfx::{fx, Effect, Interpolation};
use tracing::debug;

use crate::app::confetti::ConfettiField;
use crate::ui::screens::main::wheel_area;

/// How long the pointer stays lit after a segment boundary passes under it.
const POINTER_FLASH: Duration = Duration::from_millis(70);

pub type WheelSession = SpinSession<ChaCha8Rng>;

pub fn build_session(config: &WheelConfig) -> Result<WheelSession, WheelError> {
    let segments = SegmentSet::new(config.segments.clone())?;
    let rng = config
        .seed
        .map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
    SpinSession::new(segments, config.settings.clone(), rng)
}

pub struct App {
    pub running: bool,
    pub session: WheelSession,
    /// Angle currently drawn: the animated value mid-spin, the settled rotation otherwise.
    pub display_rotation: f64,
    spin_elapsed: Option<Duration>,
    pub pointer_flash: Duration,
    pub audio: TerminalBell,
    pub confetti: ConfettiField,
    pub theme: WheelTheme,
    pub last_winner: Option<(usize, Segment)>,
    pub spin_count: u32,
    pub status_message: String,
    pub show_help: bool,
    pub animation_counter: f64,
    pub viewport: Rect,
    started: Instant,
    clock: FrameClock,
    pub last_tick: Duration,
    pub winner_fx: Mutex<Option<Effect>>,
}

impl App {
    pub fn new(config: &WheelConfig) -> Result<Self, WheelError> {
        let session = build_session(config)?;
        Ok(Self {
            running: true,
            display_rotation: session.current_rotation(),
            session,
            spin_elapsed: None,
            pointer_flash: Duration::ZERO,
            audio: TerminalBell::new(config.tick_bell),
            confetti: ConfettiField::new(config.seed),
            theme: config.theme,
            last_winner: None,
            spin_count: 0,
            status_message: "Press Space to spin".to_string(),
            show_help: false,
            animation_counter: 0.0,
            viewport: Rect::new(0, 0, 80, 24),
            started: Instant::now(),
            clock: FrameClock::new(),
            last_tick: Duration::ZERO,
            winner_fx: Mutex::new(None),
        })
    }

    pub const fn is_spinning(&self) -> bool {
        self.session.is_spinning()
    }

    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.viewport = Rect::new(0, 0, width, height);
    }

    /// Normalised screen-space centre of the wheel widget.
    pub fn wheel_origin(&self) -> ScreenPoint {
        let area = wheel_area(self.viewport);
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return ScreenPoint::CENTER;
        }
        ScreenPoint::new(
            (f64::from(area.x) + f64::from(area.width) / 2.0) / f64::from(self.viewport.width),
            (f64::from(area.y) + f64::from(area.height) / 2.0) / f64::from(self.viewport.height),
        )
    }

    pub fn update(&mut self) {
        let delta = self.clock.advance(self.started.elapsed().as_secs_f64());
        self.advance(delta);
    }

    pub fn advance(&mut self, delta: Duration) {
        self.last_tick = delta;

        // Idle shimmer on the rim (cycles between 0 and 2*PI)
        self.animation_counter += delta.as_secs_f64() * 2.0;
        if self.animation_counter > 2.0 * std::f64::consts::PI {
            self.animation_counter -= 2.0 * std::f64::consts::PI;
        }

        self.pointer_flash = self.pointer_flash.saturating_sub(delta);
        if !self.confetti.is_empty() {
            self.confetti.step(delta);
        }

        let (Some(elapsed), Some(request)) = (self.spin_elapsed, self.session.active_request())
        else {
            return;
        };

        let elapsed = elapsed + delta;
        self.display_rotation = request.sample(elapsed);
        if self
            .session
            .observe_frame(self.display_rotation, &mut self.audio)
            .is_some()
        {
            self.pointer_flash = POINTER_FLASH;
        }

        if request.is_finished(elapsed) {
            self.spin_elapsed = None;
            self.settle();
        } else {
            self.spin_elapsed = Some(elapsed);
        }
    }

    pub fn start_spin(&mut self) {
        match self.session.begin_spin() {
            Ok(Some(request)) => {
                self.spin_elapsed = Some(Duration::ZERO);
                self.display_rotation = request.from;
                self.status_message = "Spinning...".to_string();
                if let Ok(mut effect) = self.winner_fx.lock() {
                    *effect = None;
                }
            }
            Ok(None) => debug!("spin key ignored while spinning"),
            Err(e) => self.status_message = format!("Error: {e}"),
        }
    }

    pub fn cancel_spin(&mut self) {
        if self.session.cancel() {
            self.spin_elapsed = None;
            self.display_rotation = self.session.current_rotation();
            self.status_message = "Spin cancelled".to_string();
        }
    }

    fn settle(&mut self) {
        let origin = self.wheel_origin();
        let mut effects = SpinEffects {
            audio: &mut self.audio,
            particles: &mut self.confetti,
            origin,
        };

        let mut winner = None;
        let Some(outcome) = self
            .session
            .finish_spin(&mut effects, |segment| winner = Some(segment.clone()))
        else {
            return;
        };

        self.display_rotation = self.session.current_rotation();
        self.spin_count += 1;
        if let Some(segment) = winner {
            self.status_message = format!("Won: {}", segment.display_label());
            self.last_winner = Some((outcome.winner_index, segment));
        }
        if let Ok(mut effect) = self.winner_fx.lock() {
            *effect = Some(fx::coalesce((600, Interpolation::SineOut)));
        }
    }

    pub fn toggle_sound(&mut self) {
        let enabled = !self.session.settings().sound;
        self.session.set_sound(enabled);
        self.status_message = format!("Sound {}", if enabled { "on" } else { "off" });
    }

    pub fn toggle_confetti(&mut self) {
        let enabled = !self.session.settings().confetti;
        self.session.set_confetti(enabled);
        self.status_message = format!("Confetti {}", if enabled { "on" } else { "off" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spin_wheel_tui::wheel::SpinStatus;

    fn test_app(forced: Option<i64>) -> App {
        let mut config = WheelConfig {
            seed: Some(17),
            ..WheelConfig::default()
        };
        config.settings.forced_result = forced;
        // Keep the bell away from the test harness' stdout.
        config.settings.sound = false;
        App::new(&config).unwrap()
    }

    fn run_to_rest(app: &mut App) {
        for _ in 0..400 {
            if !app.is_spinning() {
                return;
            }
            app.advance(Duration::from_millis(16));
        }
        panic!("spin never settled");
    }

    #[test]
    fn spin_lands_on_forced_segment() {
        let mut app = test_app(Some(4));
        app.start_spin();
        assert!(app.is_spinning());

        run_to_rest(&mut app);

        assert_eq!(app.session.status(), SpinStatus::Settled);
        assert!((app.display_rotation - 1867.5).abs() < 1e-9);
        assert_eq!(app.spin_count, 1);
        let (index, segment) = app.last_winner.clone().unwrap();
        assert_eq!(index, 4);
        assert_eq!(segment.label, "JACKPOT");
        assert_eq!(app.status_message, "Won: JACKPOT");
        assert_eq!(app.confetti.particles().len(), 100);
    }

    #[test]
    fn rotation_only_moves_forward_during_a_spin() {
        let mut app = test_app(None);
        app.start_spin();
        let mut previous = app.display_rotation;
        while app.is_spinning() {
            app.advance(Duration::from_millis(33));
            assert!(app.display_rotation >= previous);
            previous = app.display_rotation;
        }
    }

    #[test]
    fn second_spin_key_does_not_restart() {
        let mut app = test_app(Some(2));
        app.start_spin();
        app.advance(Duration::from_millis(500));
        let mid_spin = app.display_rotation;
        let request = app.session.active_request();

        app.start_spin();

        assert_eq!(app.session.active_request(), request);
        assert!((app.display_rotation - mid_spin).abs() < f64::EPSILON);
    }

    #[test]
    fn cancel_restores_settled_rotation() {
        let mut app = test_app(Some(1));
        app.start_spin();
        app.advance(Duration::from_millis(800));
        app.cancel_spin();

        assert!(!app.is_spinning());
        assert!(app.display_rotation.abs() < f64::EPSILON);
        assert_eq!(app.status_message, "Spin cancelled");
        assert!(app.confetti.is_empty());
        assert!(app.last_winner.is_none());
    }

    #[test]
    fn confetti_toggle_suppresses_burst() {
        let mut app = test_app(Some(0));
        app.toggle_confetti();
        app.start_spin();
        run_to_rest(&mut app);
        assert!(app.confetti.is_empty());
        assert_eq!(app.status_message, "Won: 50 Gems");
    }

    #[test]
    fn first_spin_flashes_pointer_on_first_frame() {
        let mut app = test_app(Some(3));
        app.start_spin();
        app.advance(Duration::from_millis(16));
        assert_eq!(app.pointer_flash, POINTER_FLASH);
    }

    #[test]
    fn origin_sits_inside_the_viewport() {
        let mut app = test_app(None);
        app.set_viewport(120, 40);
        let origin = app.wheel_origin();
        assert!((0.0..=1.0).contains(&origin.x));
        assert!((0.0..=1.0).contains(&origin.y));
    }

    #[test]
    fn next_spin_flashes_the_resting_boundary_first() {
        let mut app = test_app(Some(4));
        app.start_spin();
        run_to_rest(&mut app);
        app.pointer_flash = Duration::ZERO;

        app.start_spin();
        app.advance(Duration::from_millis(1));
        assert_eq!(app.pointer_flash, POINTER_FLASH);
        assert_eq!(app.session.last_tick_boundary(), Some(41));
    }

    #[test]
    fn confetti_clears_after_its_lifetime() {
        let mut app = test_app(Some(4));
        app.start_spin();
        run_to_rest(&mut app);
        assert!(!app.confetti.is_empty());

        for _ in 0..250 {
            app.advance(Duration::from_millis(16));
        }
        assert!(app.confetti.is_empty());
        // Stepping an empty field is a no-op.
        app.advance(Duration::from_millis(16));
        assert!(app.confetti.particles().is_empty());
    }

    #[test]
    fn theme_comes_from_config() {
        let mut config = WheelConfig {
            seed: Some(2),
            ..WheelConfig::default()
        };
        config.theme.pointer = spin_wheel_tui::domain::Rgb(1, 2, 3);
        let app = App::new(&config).unwrap();
        assert_eq!(app.theme.pointer, spin_wheel_tui::domain::Rgb(1, 2, 3));
    }
}
