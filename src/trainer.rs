//! A reference driver: synchronous episode and generation runners. The game
//! itself is pacing-agnostic, so real-time UIs, test loops, and the rayon
//! runner below all drive the same step API.

use crate::agent::Agent;
use crate::game::Game;
use crate::population::FitnessRecord;
use crate::random::Happens;
use rand::RngCore;

/// Decisions sampled between ticks, matching the production driver's
/// 4× decision clock.
pub const DECISIONS_PER_TICK: usize = 4;

/// Runs episodes on a fixed field size. One [`Game`] per (agent,
/// generation) pair; the game is dropped as soon as its episode ends.
#[derive(Debug, Clone, Copy)]
pub struct Trainer {
    width: usize,
    height: usize,
}

impl Trainer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Play one agent to its crash and report the episode's fitness.
    /// Collision is the only exit: a pilot that never moves is eventually
    /// hit by the run spawned into its column.
    pub fn run_episode(
        &self,
        agent: &Agent,
        rng: &mut (impl RngCore + Happens),
    ) -> FitnessRecord {
        let mut game = Game::new(self.width, self.height);
        let outcome = loop {
            let mut crashed = None;
            for _ in 0..DECISIONS_PER_TICK {
                let outcome = game.steer(agent.decide(&game.sensors()));
                if outcome.crashed {
                    crashed = Some(outcome);
                    break;
                }
            }
            match crashed {
                Some(outcome) => break outcome,
                None => {
                    let outcome = game.tick(rng);
                    if outcome.crashed {
                        break outcome;
                    }
                }
            }
        };

        FitnessRecord {
            agent: agent.clone(),
            score: outcome.score,
            movements: outcome.movements,
        }
    }

    /// Evaluate a whole cohort, one record per agent. Returning only a
    /// complete set is the generation barrier: breeding never sees a
    /// partial cohort.
    pub fn run_generation(
        &self,
        agents: &[Agent],
        rng: &mut (impl RngCore + Happens),
    ) -> Vec<FitnessRecord> {
        agents
            .iter()
            .map(|agent| self.run_episode(agent, rng))
            .collect()
    }

    /// Parallel evaluation. Episodes are fully independent, so each gets
    /// its own generator derived from `seed`; results keep cohort order.
    #[cfg(feature = "parallel")]
    pub fn run_generation_par(&self, agents: &[Agent], seed: u64) -> Vec<FitnessRecord> {
        use crate::random::{ProbBinding, ProbStatic, WyRng};
        use rayon::prelude::*;

        agents
            .par_iter()
            .enumerate()
            .map(|(idx, agent)| {
                let mut rng = ProbBinding::new(
                    ProbStatic::default(),
                    WyRng::seeded(seed ^ (idx as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)),
                );
                self.run_episode(agent, &mut rng)
            })
            .collect()
    }
}
