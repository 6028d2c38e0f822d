use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use ratatui::style::Color;
use std::time::Duration;

use spin_wheel_tui::wheel::{ParticleBurst, ParticleTrigger};

const PALETTE: [Color; 7] = [
    Color::Rgb(0x26, 0xcc, 0xff),
    Color::Rgb(0xa2, 0x5a, 0xfd),
    Color::Rgb(0xff, 0x5e, 0x7e),
    Color::Rgb(0x88, 0xff, 0x5a),
    Color::Rgb(0xfc, 0xff, 0x42),
    Color::Rgb(0xff, 0xa6, 0x2d),
    Color::Rgb(0xff, 0x36, 0xff),
];

/// Launch direction, degrees counter-clockwise from +x (straight up).
const LAUNCH_ANGLE: f64 = 90.0;
/// Screen heights per second.
const START_SPEED: f64 = 1.1;
const GRAVITY: f64 = 1.4;
/// Velocity kept per 1/60 s.
const DRAG: f64 = 0.94;
const LIFETIME: Duration = Duration::from_millis(3_200);

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Normalised screen position, `(0, 0)` top-left.
    pub x: f64,
    pub y: f64,
    vx: f64,
    vy: f64,
    pub color: Color,
    remaining: Duration,
}

impl Particle {
    pub fn is_alive(&self) -> bool {
        !self.remaining.is_zero() && self.y <= 1.2 && (-0.2..=1.2).contains(&self.x)
    }
}

/// Confetti particles, launched by spin completions and advanced per frame.
#[derive(Debug)]
pub struct ConfettiField {
    particles: Vec<Particle>,
    rng: ChaCha8Rng,
}

impl ConfettiField {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
        Self {
            particles: Vec::new(),
            rng,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn step(&mut self, delta: Duration) {
        if delta.is_zero() {
            return;
        }

        let dt = delta.as_secs_f64();
        let drag = DRAG.powf(dt * 60.0);
        for particle in &mut self.particles {
            particle.vx *= drag;
            particle.vy = particle.vy.mul_add(drag, GRAVITY * dt);
            particle.x = particle.vx.mul_add(dt, particle.x);
            particle.y = particle.vy.mul_add(dt, particle.y);
            particle.remaining = particle.remaining.saturating_sub(delta);
        }
        self.particles.retain(Particle::is_alive);
    }
}

impl ParticleTrigger for ConfettiField {
    fn trigger(&mut self, burst: &ParticleBurst) {
        let half_spread = burst.spread / 2.0;
        self.particles.reserve(burst.particle_count as usize);

        for _ in 0..burst.particle_count {
            let angle = (LAUNCH_ANGLE + self.rng.gen_range(-half_spread..=half_spread)).to_radians();
            let speed = START_SPEED * self.rng.gen_range(0.5..=1.0);
            let color = PALETTE[self.rng.gen_range(0..PALETTE.len())];
            self.particles.push(Particle {
                x: burst.origin.x,
                y: burst.origin.y,
                vx: angle.cos() * speed,
                // Screen y grows downwards.
                vy: -angle.sin() * speed,
                color,
                remaining: LIFETIME,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spin_wheel_tui::wheel::ScreenPoint;

    #[test]
    fn burst_spawns_requested_particles_at_origin() {
        let mut field = ConfettiField::new(Some(3));
        field.trigger(&ParticleBurst::confetti(ScreenPoint::new(0.3, 0.6)));

        assert_eq!(field.particles().len(), 100);
        assert!(field
            .particles()
            .iter()
            .all(|p| (p.x - 0.3).abs() < f64::EPSILON && (p.y - 0.6).abs() < f64::EPSILON));
    }

    #[test]
    fn particles_launch_upwards_within_spread() {
        let mut field = ConfettiField::new(Some(11));
        field.trigger(&ParticleBurst::confetti(ScreenPoint::CENTER));
        field.step(Duration::from_millis(16));

        // Gravity bends paths slightly outwards on the first frame.
        let max_sideways = (40.0_f64).to_radians().tan();
        for particle in field.particles() {
            let dy = 0.5 - particle.y;
            let dx = (particle.x - 0.5).abs();
            assert!(dy > 0.0, "particle fell on the first frame");
            assert!(dx <= dy * max_sideways + 1e-9, "particle left the cone");
        }
    }

    #[test]
    fn particles_expire() {
        let mut field = ConfettiField::new(Some(5));
        field.trigger(&ParticleBurst::confetti(ScreenPoint::CENTER));
        for _ in 0..40 {
            field.step(Duration::from_millis(100));
        }
        assert!(field.is_empty());
    }

    #[test]
    fn zero_delta_is_a_no_op() {
        let mut field = ConfettiField::new(Some(5));
        field.trigger(&ParticleBurst::confetti(ScreenPoint::CENTER));
        let before = field.particles().to_vec();
        field.step(Duration::ZERO);
        assert_eq!(field.particles(), before.as_slice());
    }
}
