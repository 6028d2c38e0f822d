use crate::app::App;
use crate::ui::widgets::confetti::render_confetti;
use crate::ui::widgets::popup::{centered_rect, render_popup};
use crate::ui::widgets::wheel::{render_wheel, rgb_color, WheelView};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use spin_wheel_tui::wheel::{segment_under_pointer, SpinStatus};
use std::rc::Rc;
use tachyonfx::EffectRenderer;

fn main_layout(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title area
            Constraint::Min(10),   // Wheel and side panel
            Constraint::Length(3), // Status area
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(area.inner(Margin::new(2, 1)))
}

fn content_layout(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area)
}

/// Inner area of the wheel panel for a frame of size `viewport`.
pub fn wheel_area(viewport: Rect) -> Rect {
    let content = main_layout(viewport)[1];
    content_layout(content)[0].inner(Margin::new(1, 1))
}

pub fn render_main(app: &App, f: &mut Frame<'_>) {
    let layout = main_layout(f.area());

    render_title_section(app, f, layout[0]);
    render_content_section(app, f, layout[1]);
    render_status_section(app, f, layout[2]);
    render_shortcuts(f, layout[3]);

    render_confetti(f, f.area(), app.confetti.particles());

    if app.show_help {
        render_help_popup(f, centered_rect(70, 70, f.area()));
    }
}

fn render_title_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let title_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let status_style = match app.session.status() {
        SpinStatus::Spinning => Style::default().fg(Color::Magenta),
        SpinStatus::Settled => Style::default().fg(Color::Green),
        SpinStatus::Idle => Style::default().fg(Color::Gray),
    };

    let title = Paragraph::new(TextLine::from(vec![
        Span::styled(
            "Prize ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "Wheel",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(format!("[{}]", app.session.status()), status_style),
    ]))
    .block(title_block)
    .alignment(Alignment::Center);

    f.render_widget(title, area);
}

fn render_content_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = content_layout(area);

    let wheel_block = Block::default()
        .title(" Wheel ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let wheel_inner = wheel_block.inner(chunks[0]);
    f.render_widget(wheel_block, chunks[0]);

    let view = WheelView {
        segments: app.session.segments(),
        rotation: app.display_rotation,
        pointer_lit: !app.pointer_flash.is_zero(),
        highlight: app.last_winner.as_ref().map(|(index, _)| *index),
        spinning: app.is_spinning(),
        shimmer: app.animation_counter,
        theme: app.theme,
    };
    render_wheel(f, wheel_inner, &view);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Result
            Constraint::Min(4),    // Prizes
            Constraint::Length(7), // Settings
        ])
        .split(chunks[1]);

    render_result_panel(app, f, side[0]);
    render_prize_list(app, f, side[1]);
    render_settings_panel(app, f, side[2]);
}

fn render_result_panel(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Result ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL);

    let lines = match (&app.last_winner, app.is_spinning()) {
        (_, true) => vec![
            TextLine::from(Span::styled(
                "Spinning...",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )),
            TextLine::from(format!("{:.0}°", app.display_rotation)),
        ],
        (Some((_, segment)), false) => {
            let mut label_style = Style::default()
                .fg(rgb_color(app.theme.label_color(segment)))
                .bg(rgb_color(segment.color));
            if segment.style.is_some_and(|s| s.bold) {
                label_style = label_style.add_modifier(Modifier::BOLD);
            }
            vec![
                TextLine::from(vec![
                    Span::raw("Won: "),
                    Span::styled(format!(" {} ", segment.display_label()), label_style),
                ]),
                TextLine::from(format!("Prize id: {}", segment.id)),
                TextLine::from(Span::styled(
                    format!("Spins so far: {}", app.spin_count),
                    Style::default().fg(Color::Gray),
                )),
            ]
        }
        (None, false) => vec![TextLine::from(Span::styled(
            "Press Space to spin",
            Style::default().fg(Color::Gray),
        ))],
    };

    f.render_widget(
        Paragraph::new(Text::from(lines))
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );

    if let Ok(mut effect) = app.winner_fx.lock() {
        if let Some(effect) = effect.as_mut() {
            let buffer = f.buffer_mut();
            buffer.render_effect(effect, area, app.last_tick);
        }
    }
}

fn render_prize_list(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Prizes ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL);

    let segments = app.session.segments();
    let under_pointer = segment_under_pointer(app.display_rotation, segments.len());

    let lines: Vec<TextLine<'_>> = segments
        .iter()
        .enumerate()
        .map(|(index, segment)| {
            let marker = if under_pointer == Some(index) { "▶ " } else { "  " };
            TextLine::from(vec![
                Span::styled(marker, Style::default().fg(Color::Red)),
                Span::styled("██ ", Style::default().fg(rgb_color(segment.color))),
                Span::raw(segment.display_label()),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn on_off(enabled: bool) -> Span<'static> {
    if enabled {
        Span::styled("on", Style::default().fg(Color::Green))
    } else {
        Span::styled("off", Style::default().fg(Color::Red))
    }
}

fn render_settings_panel(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Settings ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL);

    let settings = app.session.settings();
    let forced = settings
        .forced_result
        .map_or_else(|| "random".to_string(), |index| format!("index {index}"));

    let lines = vec![
        TextLine::from(vec![Span::raw("Sound:    "), on_off(settings.sound)]),
        TextLine::from(vec![Span::raw("Confetti: "), on_off(settings.confetti)]),
        TextLine::from(format!("Turns:    {}+", settings.min_spins)),
        TextLine::from(format!(
            "Duration: {:.1}s",
            settings.spin_duration.as_secs_f64()
        )),
        TextLine::from(format!("Result:   {forced}")),
    ];

    f.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL);

    let style = if app.status_message.starts_with("Error") {
        Style::default().fg(Color::Red)
    } else if app.status_message.starts_with("Won") {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    f.render_widget(
        Paragraph::new(Span::styled(app.status_message.as_str(), style)).block(status_block),
        area,
    );
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let key = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let hint = TextLine::from(vec![
        Span::styled("Space", key),
        Span::raw(" spin  "),
        Span::styled("Esc", key),
        Span::raw(" cancel  "),
        Span::styled("s", key),
        Span::raw(" sound  "),
        Span::styled("c", key),
        Span::raw(" confetti  "),
        Span::styled("?", key),
        Span::raw(" help  "),
        Span::styled("q", key),
        Span::raw(" quit"),
    ]);
    f.render_widget(Paragraph::new(hint).alignment(Alignment::Center), area);
}

fn help_line(key: &'static str, description: &'static str) -> TextLine<'static> {
    TextLine::from(vec![
        Span::styled(
            format!("  {key:<8}"),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(description),
    ])
}

fn render_help_popup(f: &mut Frame<'_>, area: Rect) {
    let lines = vec![
        TextLine::from(Span::styled(
            "Spin the wheel and see where the pointer lands.",
            Style::default().fg(Color::Cyan),
        )),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Keys",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        help_line("Space", "Spin (ignored while spinning)"),
        help_line("Enter", "Spin"),
        help_line("Esc", "Cancel a spin in progress"),
        help_line("s", "Toggle sound"),
        help_line("c", "Toggle confetti"),
        help_line("? / F1", "Toggle this help"),
        help_line("q", "Quit"),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Run with --help for command line options.",
            Style::default().fg(Color::Gray),
        )),
        TextLine::from(Span::styled(
            "Press Esc or ? to close",
            Style::default().fg(Color::Gray),
        )),
    ];

    render_popup(f, area, "Help", lines);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use spin_wheel_tui::config::WheelConfig;

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| render_main(app, f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn wheel_area_lies_inside_the_viewport() {
        let viewport = Rect::new(0, 0, 120, 40);
        let area = wheel_area(viewport);
        assert!(area.x >= 3 && area.y >= 5);
        assert!(area.right() < 120 * 65 / 100 + 3);
        assert!(area.bottom() < 40);
    }

    #[test]
    fn idle_screen_shows_prizes_and_prompt() {
        let app = App::new(&WheelConfig::default()).unwrap();
        let text = screen_text(&app);
        assert!(text.contains("Press Space to spin"));
        assert!(text.contains("JACKPOT"));
        assert!(text.contains("Settings"));
    }

    #[test]
    fn help_popup_lists_keys() {
        let mut app = App::new(&WheelConfig::default()).unwrap();
        app.show_help = true;
        let text = screen_text(&app);
        assert!(text.contains("Toggle confetti"));
    }
}
