//! Ping Track entry point
//!
//! Headless demo: the autopilot plays every track on a simulated clock and
//! each strip is printed whenever it changes.
//!
//! Usage: `ping-track [settings.json] [seconds]`

use ping_track::sim::{Game, TrackEvent};
use ping_track::{Autopilot, Settings, Side, Strip};

/// Simulated seconds to play when none are given
const DEFAULT_DEMO_SECONDS: f64 = 60.0;
/// Autopilot reaction chance per sample
const DEMO_SKILL: f64 = 0.7;

fn main() {
    env_logger::init();
    log::info!("Ping Track (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(DEFAULT_DEMO_SECONDS);

    let mut game = match Game::new(&settings) {
        Ok(game) => game,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    let mut pilot = Autopilot::new(settings.seed, DEMO_SKILL);
    let strip = Strip::new(settings.strip_cells);

    let update_dt = settings.update_interval();
    let render_dt = 1.0 / settings.render_hz as f64;
    let samples = (seconds / update_dt).ceil() as u64;

    let mut next_render = 0.0;
    let mut last_frame: Vec<String> = Vec::new();

    for i in 0..=samples {
        let time = i as f64 * update_dt;

        for (track, event) in game.update(time) {
            match event {
                TrackEvent::Goal { side, .. } => log::info!(
                    "[{time:7.3}] track {track}: goal against {side} ({} - {})",
                    game.score(Side::Left),
                    game.score(Side::Right)
                ),
                TrackEvent::Rebound { side, speed, .. } => {
                    log::debug!("[{time:7.3}] track {track}: {side} rebound at {speed:.2}")
                }
                TrackEvent::Fired { .. } => {}
            }
        }

        for (track, side) in pilot.inputs(&game, time) {
            game.press(track, side, time);
        }

        if render_due(&mut next_render, time, render_dt) {
            let frame: Vec<String> = game
                .tracks()
                .iter()
                .map(|t| Strip::to_ascii(&strip.render(t, time)))
                .collect();
            if frame != last_frame {
                println!("{time:7.3}  {}", frame.join("  "));
                last_frame = frame;
            }
        }
    }

    let end = samples as f64 * update_dt;
    match serde_json::to_string(&game.snapshot(end)) {
        Ok(json) => println!("{json}"),
        Err(e) => log::warn!("Could not serialize final state: {e}"),
    }
    println!(
        "Final score: left {} - right {}",
        game.score(Side::Left),
        game.score(Side::Right)
    );
}

/// Whether a frame is due at `time`. Skips `next_render` past every render
/// interval that has elapsed, so a render rate above the update rate does not
/// fall behind.
fn render_due(next_render: &mut f64, time: f64, render_dt: f64) -> bool {
    if time < *next_render {
        return false;
    }
    while *next_render <= time {
        *next_render += render_dt;
    }
    true
}
