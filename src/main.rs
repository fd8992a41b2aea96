//! Flap Run entry point
//!
//! Headless native driver: runs the autopilot through a fixed stretch of
//! simulated time and logs every run.
//!
//! Usage: flap-run [--settings <path>] [--seed <n>] [--seconds <n>]

use std::time::{SystemTime, UNIX_EPOCH};

use flap_run::Settings;
use flap_run::sim::{FrameClock, Game, RunPhase, TickInput, tick};

/// Render rate the headless loop pretends to run at
const FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_SECONDS: f32 = 60.0;

struct Args {
    settings: Option<String>,
    seed: Option<u64>,
    seconds: f32,
}

fn parse_args() -> Args {
    let mut args = Args {
        settings: None,
        seed: None,
        seconds: DEFAULT_SECONDS,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--settings" => args.settings = iter.next(),
            "--seed" => match iter.next().map(|s| s.parse::<u64>()) {
                Some(Ok(seed)) => args.seed = Some(seed),
                _ => log::warn!("--seed expects an unsigned integer"),
            },
            "--seconds" => match iter.next().map(|s| s.parse::<f32>()) {
                Some(Ok(secs)) if secs > 0.0 => args.seconds = secs,
                _ => log::warn!("--seconds expects a positive number"),
            },
            other => log::warn!("Ignoring unknown argument {}", other),
        }
    }
    args
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn main() {
    env_logger::init();
    log::info!("Flap Run (headless) starting...");

    let args = parse_args();
    let settings = match &args.settings {
        Some(path) => Settings::load_from(path),
        None => Settings::default(),
    };
    let seed = args.seed.or(settings.seed).unwrap_or_else(clock_seed);
    log::info!("Game initialized with seed: {}", seed);

    let mut game = Game::new(settings, seed);
    let mut clock = FrameClock::new();
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let frames = (args.seconds / FRAME_DT).ceil() as u64;
    let mut last_phase = game.controller.phase();
    let mut scores = Vec::new();

    for _ in 0..frames {
        for _ in 0..clock.frame(FRAME_DT) {
            tick(&mut game, &input, flap_run::consts::SIM_DT);
        }

        let phase = game.controller.phase();
        if phase != last_phase {
            if let RunPhase::Ended { message_shown: false } = phase {
                scores.push(game.controller.score());
            }
            log::debug!("{:?} {}", phase, game.hud.line());
            last_phase = phase;
        }
    }

    let best = scores.iter().copied().max().unwrap_or(0);
    println!(
        "Simulated {:.0}s: {} finished runs, best score {}, current {}",
        args.seconds,
        scores.len(),
        best.max(game.controller.score()),
        game.hud.line()
    );
}
