//! Meteor Run demo driver
//!
//! Runs one evaluation of a scripted pilot against a deployment config and
//! logs the result. Pass a JSON config path to override the default
//! deployment; otherwise the built-in constants apply.

use std::process::ExitCode;

use meteor_run::WorldConfig;
use meteor_run::eval::{Controller, EvalConfig, evaluate};

/// Scripted pilot: steers back toward the horizontal center and holds the
/// trigger. Enough to exercise movement, firing and spawning end to end.
struct CenterPilot;

impl Controller for CenterPilot {
    fn activate(&mut self, inputs: &[f32]) -> Vec<f32> {
        // inputs[0] is the ship's normalized x in [-1, 1]; push the
        // steering output past the ±0.5 threshold whenever we drift.
        vec![-inputs[0] * 2.0, 0.0, 1.0]
    }
}

fn load_config() -> Result<WorldConfig, String> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| format!("cannot read config '{path}': {e}"))?;
            serde_json::from_str(&text).map_err(|e| format!("cannot parse config '{path}': {e}"))
        }
        None => Ok(WorldConfig::default()),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let world_config = match load_config() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let eval_config = EvalConfig::default();
    log::info!(
        "playfield {}x{}, boundary {:?}, sensor arity {}",
        world_config.width,
        world_config.height,
        world_config.boundary,
        world_config.sensor.arity()
    );

    match evaluate(&world_config, &eval_config, &mut CenterPilot, 0x5eed) {
        Ok(fitness) => {
            log::info!(
                "scripted pilot fitness over {} episodes: {fitness:.3}",
                eval_config.episodes
            );
            println!("{fitness:.3}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("evaluation failed: {error}");
            ExitCode::FAILURE
        }
    }
}
