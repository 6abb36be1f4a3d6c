//! Generational breeding: fold one cohort's fitness results into the next
//! cohort of pilots via elitism, roulette-selected crossover, and a final
//! mutation sweep over everyone.

use crate::agent::Agent;
use crate::genome::GenomeError;
use crate::random::Happens;
use rand::{Rng, RngCore};
use thiserror::Error;
use tracing::debug;

/// One agent's episode result. Produced once per agent per generation and
/// consumed exactly once by [`Population::next_generation`].
#[derive(Debug, Clone)]
pub struct FitnessRecord {
    pub agent: Agent,
    pub score: u32,
    pub movements: u32,
}

#[derive(Debug, Error)]
pub enum EvolveError {
    #[error("expected {expected} fitness records, got {actual}")]
    CohortSize { expected: usize, actual: usize },
    #[error(transparent)]
    Genome(#[from] GenomeError),
}

/// After this many equal roulette draws for the second parent, give up on
/// redrawing and take the neighboring sector instead. A single record
/// holding the whole wheel would otherwise redraw forever.
const REDRAW_LIMIT: usize = 64;

/// Breeds cohorts of a fixed size. The generation counter ticks up once per
/// [`Population::next_generation`] call; cohorts are replaced wholesale and
/// no agent is ever modified in place.
#[derive(Debug)]
pub struct Population {
    size: usize,
    winners: usize,
    generation: u64,
}

impl Population {
    pub fn new(size: usize, winners: usize) -> Self {
        debug_assert!(size >= 2, "breeding needs a best and a second best");
        debug_assert!(
            size >= winners + 3,
            "winners plus the three fixed appends must fit the cohort"
        );
        Self {
            size,
            winners,
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// A full cohort of freshly randomized pilots.
    pub fn first_generation(&self, rng: &mut impl RngCore) -> Vec<Agent> {
        (0..self.size).map(|_| Agent::random(rng)).collect()
    }

    /// Fold a complete set of episode results into the next cohort:
    /// the `winners` best carry over, crossover children of roulette-picked
    /// parents fill the middle, and the tail is the two best crossed, the
    /// best copied, and one fresh pilot. Everyone takes a mutation pass,
    /// elites included.
    pub fn next_generation(
        &mut self,
        results: Vec<FitnessRecord>,
        rng: &mut (impl RngCore + Happens),
    ) -> Result<Vec<Agent>, EvolveError> {
        if results.len() != self.size {
            return Err(EvolveError::CohortSize {
                expected: self.size,
                actual: results.len(),
            });
        }

        let mut ranked = results;
        ranked.sort_by_key(|record| record.score);
        let sectors = roulette_sectors(&vitality_chances(&ranked));

        let mut cohort = Vec::with_capacity(self.size);
        for record in ranked.iter().rev().take(self.winners) {
            cohort.push(record.agent.clone());
        }

        while cohort.len() < self.size - 3 {
            let a = select_sector(&sectors, rng);
            let b = select_distinct_sector(&sectors, a, rng);
            cohort.push(ranked[a].agent.cross_over(&ranked[b].agent, rng)?);
        }

        let best = &ranked[self.size - 1];
        let second = &ranked[self.size - 2];
        cohort.push(best.agent.cross_over(&second.agent, rng)?);
        cohort.push(best.agent.clone());
        cohort.push(Agent::random(rng));

        self.generation += 1;
        debug!(
            generation = self.generation,
            best_score = best.score,
            "bred next cohort"
        );

        Ok(cohort.iter().map(|agent| agent.mutate(rng)).collect())
    }
}

/// Selection weight per record, in sorted order: score over the cohort's
/// total, as a percentage. A scoreless cohort gets a uniform wheel instead
/// of dividing by zero.
fn vitality_chances(ranked: &[FitnessRecord]) -> Vec<f64> {
    let total: u32 = ranked.iter().map(|record| record.score).sum();
    if total == 0 {
        return vec![100. / ranked.len() as f64; ranked.len()];
    }
    ranked
        .iter()
        .map(|record| record.score as f64 / total as f64 * 100.)
        .collect()
}

/// Cumulative wheel: sector i spans the running total before it through the
/// running total including it.
fn roulette_sectors(chances: &[f64]) -> Vec<(f64, f64)> {
    let mut sectors = Vec::with_capacity(chances.len());
    let mut cumulative = 0.;
    for chance in chances {
        sectors.push((cumulative, cumulative + chance));
        cumulative += chance;
    }
    sectors
}

/// First sector whose bounds contain the roll, both ends inclusive;
/// falls back to 0 if the roll lands nowhere.
fn sector_at(sectors: &[(f64, f64)], roll: f64) -> usize {
    sectors
        .iter()
        .position(|&(lo, hi)| lo <= roll && roll <= hi)
        .unwrap_or(0)
}

fn select_sector(sectors: &[(f64, f64)], rng: &mut impl RngCore) -> usize {
    let max = sectors.last().map_or(0., |sector| sector.1);
    sector_at(sectors, rng.random::<f64>() * max)
}

fn select_distinct_sector(sectors: &[(f64, f64)], taken: usize, rng: &mut impl RngCore) -> usize {
    for _ in 0..REDRAW_LIMIT {
        let pick = select_sector(sectors, rng);
        if pick != taken {
            return pick;
        }
    }
    (taken + 1) % sectors.len()
}
