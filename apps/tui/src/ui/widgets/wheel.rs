use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine};
use ratatui::Frame;
use spin_wheel_tui::domain::{Rgb, SegmentSet, WheelTheme};

/// Canvas half-width; leaves room above the rim for the pointer.
const EXTENT: f64 = 1.2;
const RIM_RADIUS: f64 = 1.0;
const LABEL_RADIUS: f64 = 0.65;
const HUB_RADIUS: f64 = 0.17;
/// Degrees between radial fill lines.
const FILL_STEP: f64 = 0.75;
const MAX_LABEL_CHARS: usize = 10;

/// Rim brightness at the dark end of the shimmer.
const RIM_SHADE: f64 = 0.75;
const DIVIDER: Color = Color::Rgb(0x1c, 0x1c, 0x1c);

pub struct WheelView<'a> {
    pub segments: &'a SegmentSet,
    /// Cumulative rotation in degrees, clockwise.
    pub rotation: f64,
    pub pointer_lit: bool,
    pub highlight: Option<usize>,
    pub spinning: bool,
    pub shimmer: f64,
    pub theme: WheelTheme,
}

pub const fn rgb_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Canvas coordinates for a wheel angle: 0° points right, angles grow
/// clockwise on screen, and the canvas y axis points up.
pub fn polar(angle_degrees: f64, radius: f64) -> (f64, f64) {
    let radians = angle_degrees.to_radians();
    (radians.cos() * radius, -radians.sin() * radius)
}

/// Largest rect inside `area` that draws the wheel round. Terminal cells
/// are about twice as tall as they are wide.
pub fn wheel_rect(area: Rect) -> Rect {
    let width = area.width.min(area.height.saturating_mul(2));
    let height = (width / 2).min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn short_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        return label.to_string();
    }
    let mut short: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
    short.push('…');
    short
}

pub fn render_wheel(f: &mut Frame<'_>, area: Rect, view: &WheelView<'_>) {
    let square = wheel_rect(area);
    if square.width < 8 || square.height < 4 {
        return;
    }

    let cell_width = 2.0 * EXTENT / f64::from(square.width);

    f.render_widget(
        Canvas::default()
            .marker(Marker::HalfBlock)
            .paint(|ctx| {
                paint_segments(ctx, view);
                ctx.layer();
                paint_rim(ctx, view);
                ctx.layer();
                paint_labels(ctx, view, cell_width);
                paint_pointer(ctx, view);
            })
            .x_bounds([-EXTENT, EXTENT])
            .y_bounds([-EXTENT, EXTENT]),
        square,
    );
}

fn paint_segments(ctx: &mut Context<'_>, view: &WheelView<'_>) {
    let angle_per_item = view.segments.angle_per_item();

    for (index, segment) in view.segments.iter().enumerate() {
        let start = angle_per_item.mul_add(index as f64, view.rotation);
        let color = rgb_color(segment.color);

        let mut angle = start;
        while angle < start + angle_per_item {
            let (x2, y2) = polar(angle, RIM_RADIUS);
            ctx.draw(&CanvasLine {
                x1: 0.0,
                y1: 0.0,
                x2,
                y2,
                color,
            });
            angle += FILL_STEP;
        }
    }
}

fn paint_rim(ctx: &mut Context<'_>, view: &WheelView<'_>) {
    let angle_per_item = view.segments.angle_per_item();

    if view.segments.len() > 1 {
        for index in 0..view.segments.len() {
            let start = angle_per_item.mul_add(index as f64, view.rotation);
            let lit = !view.spinning
                && view
                    .highlight
                    .is_some_and(|winner| winner == index || (winner + 1) % view.segments.len() == index);
            let (x2, y2) = polar(start, RIM_RADIUS);
            ctx.draw(&CanvasLine {
                x1: 0.0,
                y1: 0.0,
                x2,
                y2,
                color: if lit { Color::White } else { DIVIDER },
            });
        }
    }

    let pulse = view.shimmer.sin().mul_add(0.5, 0.5);
    let rim = if pulse > 0.5 {
        view.theme.rim
    } else {
        view.theme.rim.scaled(RIM_SHADE)
    };
    ctx.draw(&Circle {
        x: 0.0,
        y: 0.0,
        radius: RIM_RADIUS,
        color: rgb_color(rim),
    });
    ctx.draw(&Circle {
        x: 0.0,
        y: 0.0,
        radius: HUB_RADIUS,
        color: rgb_color(view.theme.knob),
    });
}

fn paint_labels(ctx: &mut Context<'_>, view: &WheelView<'_>, cell_width: f64) {
    let angle_per_item = view.segments.angle_per_item();

    for (index, segment) in view.segments.iter().enumerate() {
        let middle = angle_per_item.mul_add(index as f64 + 0.5, view.rotation);
        let (x, y) = polar(middle, LABEL_RADIUS);
        let label = short_label(&segment.display_label());

        let mut style = Style::default()
            .fg(rgb_color(view.theme.label_color(segment)))
            .bg(rgb_color(segment.color));
        if segment.style.is_some_and(|s| s.bold) {
            style = style.add_modifier(Modifier::BOLD);
        }

        let offset = label.chars().count() as f64 * cell_width / 2.0;
        ctx.print(x - offset, y, Span::styled(label, style));
    }

    let knob = if view.spinning { "····" } else { "SPIN" };
    ctx.print(
        -2.0 * cell_width,
        0.0,
        Span::styled(
            knob,
            Style::default()
                .fg(Color::Black)
                .bg(rgb_color(view.theme.knob))
                .add_modifier(Modifier::BOLD),
        ),
    );
}

fn paint_pointer(ctx: &mut Context<'_>, view: &WheelView<'_>) {
    let color = if view.pointer_lit {
        Color::White
    } else {
        rgb_color(view.theme.pointer)
    };
    let tip = (0.0, RIM_RADIUS - 0.08);
    let left = (-0.1, RIM_RADIUS + 0.15);
    let right = (0.1, RIM_RADIUS + 0.15);

    for ((x1, y1), (x2, y2)) in [(left, tip), (right, tip), (left, right)] {
        ctx.draw(&CanvasLine {
            x1,
            y1,
            x2,
            y2,
            color,
        });
    }
}
