use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::Frame;

use crate::app::confetti::Particle;

const GLYPHS: [&str; 4] = ["▪", "•", "▴", "◆"];

/// Cell covered by a particle, if it is on screen. Positions are normalised
/// to `area` with y pointing down.
pub fn particle_cell(area: Rect, x: f64, y: f64) -> Option<(u16, u16)> {
    if !(0.0..1.0).contains(&x) || !(0.0..1.0).contains(&y) {
        return None;
    }
    let column = (x * f64::from(area.width)).floor() as u16;
    let row = (y * f64::from(area.height)).floor() as u16;
    Some((area.x + column, area.y + row))
}

/// Paints particles over what is already drawn, keeping each cell's background.
pub fn render_confetti(f: &mut Frame<'_>, area: Rect, particles: &[Particle]) {
    paint(f.buffer_mut(), area, particles);
}

fn paint(buf: &mut Buffer, area: Rect, particles: &[Particle]) {
    for (index, particle) in particles.iter().enumerate() {
        let Some(position) = particle_cell(area, particle.x, particle.y) else {
            continue;
        };
        if let Some(cell) = buf.cell_mut(position) {
            cell.set_symbol(GLYPHS[index % GLYPHS.len()]).set_fg(particle.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_normalised_positions_to_cells() {
        let area = Rect::new(2, 1, 100, 50);
        assert_eq!(particle_cell(area, 0.0, 0.0), Some((2, 1)));
        assert_eq!(particle_cell(area, 0.5, 0.5), Some((52, 26)));
        assert_eq!(particle_cell(area, 0.999, 0.999), Some((101, 50)));
    }

    #[test]
    fn off_screen_particles_are_skipped() {
        let area = Rect::new(0, 0, 10, 10);
        assert_eq!(particle_cell(area, -0.1, 0.5), None);
        assert_eq!(particle_cell(area, 0.5, 1.0), None);
        assert_eq!(particle_cell(area, 0.5, -0.01), None);
    }
}
