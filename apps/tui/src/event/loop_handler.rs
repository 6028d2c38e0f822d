use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use spin_wheel_tui::animation::TokioAnimator;
use spin_wheel_tui::config::WheelConfig;
use spin_wheel_tui::wheel::{
    NoParticles, ScreenPoint, SilentAudio, SpinEffects, SpinOutcome, FULL_TURN,
};
use std::io::Stdout;
use std::time::Duration;
use tracing::info;

use crate::app::{build_session, handle_input, App};
use crate::ui;

/// Run spins without a UI and print the outcomes
pub async fn run_headless(config: &WheelConfig, json: bool, spins: u32) -> Result<()> {
    let mut session = build_session(config)?;
    let mut animator = TokioAnimator::default();
    let mut audio = SilentAudio;
    let mut particles = NoParticles;

    let mut results = Vec::new();
    for spin in 1..=spins {
        let mut effects = SpinEffects {
            audio: &mut audio,
            particles: &mut particles,
            origin: ScreenPoint::CENTER,
        };

        let outcome = session
            .trigger_spin(&mut animator, &mut effects, |segment| {
                info!(spin, label = %segment.label, "winner");
            })
            .await?;

        if let Some(outcome) = outcome {
            results.push(HeadlessSpin::new(spin, &outcome));
        }
    }

    if json {
        let json = serde_json::to_string_pretty(&results)?;
        println!("{json}");
    } else {
        render_headless_spins(&results);
    }

    Ok(())
}

fn render_headless_spins(results: &[HeadlessSpin]) {
    println!("\nPrize Wheel");
    println!("===========");
    for result in results {
        println!(
            "Spin {}: {} (index {})  end rotation {:.1}°  resting at {:.1}°",
            result.spin, result.label, result.index, result.end_rotation, result.resting_angle
        );
    }
}

#[derive(Debug, serde::Serialize)]
struct HeadlessSpin {
    spin: u32,
    index: usize,
    id: String,
    label: String,
    end_rotation: f64,
    resting_angle: f64,
}

impl HeadlessSpin {
    fn new(spin: u32, outcome: &SpinOutcome) -> Self {
        Self {
            spin,
            index: outcome.winner_index,
            id: outcome.segment.id.to_string(),
            label: outcome.segment.label.clone(),
            end_rotation: outcome.end_rotation,
            resting_angle: outcome.end_rotation.rem_euclid(FULL_TURN),
        }
    }
}

/// Run the main application event loop
pub fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // Roughly 60 frames per second while idle or spinning
    const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(16);

    if let Ok((width, height)) = crossterm::terminal::size() {
        app.set_viewport(width, height);
    }

    loop {
        // Update animations
        app.update();

        // Draw the UI with better error context
        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if !matches!(event::poll(EVENT_POLL_TIMEOUT), Ok(true)) {
            continue;
        }

        match event::read() {
            Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                handle_input(app, key.code);
                if !app.running {
                    break;
                }
            }
            Ok(Event::Resize(width, height)) => {
                app.set_viewport(width, height);
            }
            Ok(_) | Err(_) => {
                // Ignore non-key events for now
            }
        }
    }
    Ok(())
}
