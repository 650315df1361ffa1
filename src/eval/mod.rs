//! Episodic evaluation and fitness shaping
//!
//! Drives one `World` per controller at a fixed timestep: read sensor state,
//! ask the controller for outputs, discretize them into an `Action`, step the
//! world, accumulate shaped fitness. Episodes are fully independent, so a
//! batch fans out across threads with each worker owning one world and one
//! controller end to end; the only write-back is one fitness per slot.

use rayon::prelude::*;

use crate::config::{FitnessWeights, WorldConfig};
use crate::consts::SIM_DT;
use crate::error::{Result, SimError};
use crate::sim::{Action, Axis, World, sensor_state, step};

/// Number of controller outputs the action contract expects
/// (move x, move y, fire).
pub const CONTROLLER_OUTPUTS: usize = 3;

/// A decision-making function mapping sensor state to continuous outputs.
/// This is the subject of training; the evaluator treats it as a black box.
pub trait Controller: Send {
    fn activate(&mut self, inputs: &[f32]) -> Vec<f32>;
}

/// Episode bounds and shaping weights for one evaluation run.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalConfig {
    /// Fixed timestep
    pub dt: f32,
    /// Tick budget; exhausting it is a normal terminal condition
    pub max_ticks: u32,
    /// Independent episodes averaged per controller
    pub episodes: u32,
    pub weights: FitnessWeights,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            dt: SIM_DT,
            max_ticks: 90 * 60,
            episodes: 3,
            weights: FitnessWeights::default(),
        }
    }
}

impl EvalConfig {
    pub fn validate(&self) -> Result<()> {
        if self.dt <= 0.0 || !self.dt.is_finite() {
            return Err(SimError::InvalidConfig {
                param: "dt",
                message: format!("must be positive and finite, got {}", self.dt),
            });
        }
        if self.max_ticks == 0 {
            return Err(SimError::InvalidConfig {
                param: "max_ticks",
                message: "must be at least 1".to_string(),
            });
        }
        if self.episodes == 0 {
            return Err(SimError::InvalidConfig {
                param: "episodes",
                message: "must be at least 1".to_string(),
            });
        }
        self.weights.validate()
    }
}

/// Discretize raw controller outputs into the action contract: movement
/// axes threshold at ±0.5, fire at 0.5. Rejects wrong-arity output instead
/// of guessing.
pub fn discretize(outputs: &[f32]) -> Result<Action> {
    if outputs.len() != CONTROLLER_OUTPUTS {
        return Err(SimError::OutputArityMismatch {
            expected: CONTROLLER_OUTPUTS,
            actual: outputs.len(),
        });
    }
    Ok(Action::new(
        Axis::from_output(outputs[0]),
        Axis::from_output(outputs[1]),
        outputs[2] > 0.5,
    ))
}

/// Smallest distance from the ship to any playfield edge. Negative only
/// under configurations that let the rect poke outside.
fn edge_distance(world: &World) -> f32 {
    let r = &world.ship.rect;
    let b = world.bounds();
    (r.left() - b.left())
        .min(b.right() - r.right())
        .min(r.top() - b.top())
        .min(b.bottom() - r.bottom())
}

/// Run a single episode and return its shaped fitness.
pub fn run_episode<C: Controller + ?Sized>(
    world_config: &WorldConfig,
    eval_config: &EvalConfig,
    controller: &mut C,
    seed: u64,
) -> Result<f32> {
    let mut world = World::new(world_config.clone(), seed)?;
    let weights = &eval_config.weights;
    let mut fitness = 0.0f32;
    let mut ticks = 0u32;

    while world.running && ticks < eval_config.max_ticks {
        let inputs = sensor_state(&world);
        let outputs = controller.activate(&inputs);
        let action = discretize(&outputs)?;
        step(&mut world, &action, eval_config.dt);

        fitness += weights.survival * eval_config.dt;
        fitness += weights.destruction * world.take_meteors_destroyed() as f32;

        let heading = world.ship.heading;
        if heading.x.abs() < 0.01 && heading.y.abs() < 0.01 {
            fitness -= weights.idle_penalty * eval_config.dt;
        }

        let distance = edge_distance(&world);
        if distance < weights.edge_margin {
            let depth = (weights.edge_margin - distance) / weights.edge_margin;
            fitness -= weights.edge_penalty * depth * depth * eval_config.dt;
        }

        ticks += 1;
    }

    if !world.running {
        fitness -= weights.death_penalty;
    }
    if weights.clamp_floor {
        fitness = fitness.max(0.0);
    }

    log::debug!(
        "episode seed={} ticks={} score={:.2} fitness={:.3}",
        seed,
        ticks,
        world.score,
        fitness
    );
    Ok(fitness)
}

/// Average fitness over `episodes` independently seeded episodes, reducing
/// the variance a single lucky meteor pattern would cause.
pub fn evaluate<C: Controller + ?Sized>(
    world_config: &WorldConfig,
    eval_config: &EvalConfig,
    controller: &mut C,
    base_seed: u64,
) -> Result<f32> {
    world_config.validate()?;
    eval_config.validate()?;

    let mut total = 0.0f32;
    for episode in 0..eval_config.episodes {
        total += run_episode(
            world_config,
            eval_config,
            controller,
            base_seed.wrapping_add(episode as u64),
        )?;
    }
    Ok(total / eval_config.episodes as f32)
}

/// Evaluate a whole population in parallel. Each worker owns one world and
/// one controller; seeds are spaced so no two controllers share an episode
/// stream.
pub fn evaluate_batch<C: Controller>(
    world_config: &WorldConfig,
    eval_config: &EvalConfig,
    controllers: &mut [C],
    base_seed: u64,
) -> Result<Vec<f32>> {
    world_config.validate()?;
    eval_config.validate()?;
    log::info!(
        "evaluating batch of {} controllers ({} episodes each)",
        controllers.len(),
        eval_config.episodes
    );

    controllers
        .par_iter_mut()
        .enumerate()
        .map(|(slot, controller)| {
            evaluate(
                world_config,
                eval_config,
                controller,
                base_seed.wrapping_add((slot as u64) << 32),
            )
        })
        .collect()
}
