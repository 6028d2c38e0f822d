use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_input(app: &mut App, key: KeyCode) {
    if handle_help_toggle(app, key) {
        return;
    }

    match key {
        KeyCode::Char('q') => {
            app.cancel_spin();
            app.running = false;
        }
        KeyCode::Char(' ') | KeyCode::Enter => app.start_spin(),
        KeyCode::Esc => app.cancel_spin(),
        KeyCode::Char('s') => app.toggle_sound(),
        KeyCode::Char('c') => app.toggle_confetti(),
        _ => {}
    }
}

fn handle_help_toggle(app: &mut App, key: KeyCode) -> bool {
    if matches!(key, KeyCode::F(1) | KeyCode::Char('?')) {
        app.show_help = !app.show_help;
        return true;
    }

    if app.show_help {
        if key == KeyCode::Esc {
            app.show_help = false;
        }
        return true;
    }

    false
}
