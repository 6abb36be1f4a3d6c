//! The heritable parameters of a pilot: a versioned pair of bias and weight
//! vectors for the fixed 3×6×2 perceptron. The topology itself never
//! mutates; crossover and mutation only reshuffle and rescale parameters.

use crate::random::{ChanceEvent, Happens};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SENSORY: usize = 3;
pub const HIDDEN: usize = 6;
pub const ACTION: usize = 2;
pub const NEURONS: usize = SENSORY + HIDDEN + ACTION;
pub const SYNAPSES: usize = SENSORY * HIDDEN + HIDDEN * ACTION;

pub const GENOME_VERSION: u16 = 1;

/// Fresh parameters land in (-SPREAD, SPREAD).
const SPREAD: f64 = 0.1;

/// Errors raised when a genome doesn't fit the fixed topology.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenomeError {
    #[error("unsupported genome version {0}")]
    UnsupportedVersion(u16),
    #[error("expected {expected} biases, genome carries {actual}")]
    BiasCount { expected: usize, actual: usize },
    #[error("expected {expected} weights, genome carries {actual}")]
    WeightCount { expected: usize, actual: usize },
}

/// The serialized shape is part of the crate's contract: bump
/// `GENOME_VERSION` whenever the layout changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub version: u16,
    /// Neuron biases, ordered sensory → hidden → action. Sensory biases
    /// never enter the forward pass but recombine and mutate like the rest.
    pub biases: Vec<f64>,
    /// Connection weights, row-major `[from, to]`: the sensory→hidden block
    /// followed by the hidden→action block.
    pub weights: Vec<f64>,
}

impl Genome {
    pub fn random(rng: &mut impl RngCore) -> Self {
        Self {
            version: GENOME_VERSION,
            biases: (0..NEURONS)
                .map(|_| rng.random_range(-SPREAD..SPREAD))
                .collect(),
            weights: (0..SYNAPSES)
                .map(|_| rng.random_range(-SPREAD..SPREAD))
                .collect(),
        }
    }

    pub fn validate(&self) -> Result<(), GenomeError> {
        if self.version != GENOME_VERSION {
            return Err(GenomeError::UnsupportedVersion(self.version));
        }
        if self.biases.len() != NEURONS {
            return Err(GenomeError::BiasCount {
                expected: NEURONS,
                actual: self.biases.len(),
            });
        }
        if self.weights.len() != SYNAPSES {
            return Err(GenomeError::WeightCount {
                expected: SYNAPSES,
                actual: self.weights.len(),
            });
        }
        Ok(())
    }

    /// Recombine with `other`: each bias keeps the receiver's value or takes
    /// the donor's with equal odds; weights come from the receiver alone.
    /// Both genomes must fit the topology or nothing is produced.
    pub fn cross_over(
        &self,
        other: &Self,
        rng: &mut (impl RngCore + Happens),
    ) -> Result<Self, GenomeError> {
        self.validate()?;
        other.validate()?;
        Ok(Self {
            version: GENOME_VERSION,
            biases: self
                .biases
                .iter()
                .zip(&other.biases)
                .map(|(own, donor)| {
                    if rng.happens(ChanceEvent::InheritBias) {
                        *own
                    } else {
                        *donor
                    }
                })
                .collect(),
            weights: self.weights.clone(),
        })
    }

    /// Every parameter independently rolls its mutation event and, when it
    /// fires, is scaled by a fresh factor in [-0.5, 2.5).
    pub fn mutate(&self, rng: &mut (impl RngCore + Happens)) -> Self {
        Self {
            version: self.version,
            biases: self
                .biases
                .iter()
                .map(|b| {
                    if rng.happens(ChanceEvent::MutateBias) {
                        b * mutation_factor(rng)
                    } else {
                        *b
                    }
                })
                .collect(),
            weights: self
                .weights
                .iter()
                .map(|w| {
                    if rng.happens(ChanceEvent::MutateWeight) {
                        w * mutation_factor(rng)
                    } else {
                        *w
                    }
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, Box<dyn core::error::Error>> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, Box<dyn core::error::Error>> {
        let genome: Self = serde_json::from_str(s)?;
        genome.validate()?;
        Ok(genome)
    }
}

fn mutation_factor(rng: &mut impl RngCore) -> f64 {
    1. + (rng.random::<f64>() - 0.5) * 3.
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::random::{percent, ProbBinding, ProbStatic, WyRng};

    fn rng_with(overrides: &[(ChanceEvent, u64)]) -> impl RngCore + Happens {
        ProbBinding::new(
            ProbStatic::default().with_overrides(overrides),
            WyRng::seeded(0xB0A7),
        )
    }

    #[test]
    fn test_random_genome_fits_topology() {
        let genome = Genome::random(&mut WyRng::seeded(3));
        assert_eq!(genome.biases.len(), NEURONS);
        assert_eq!(genome.weights.len(), SYNAPSES);
        assert!(genome.validate().is_ok());
        assert!(genome.biases.iter().all(|b| b.abs() < SPREAD));
        assert!(genome.weights.iter().all(|w| w.abs() < SPREAD));
    }

    #[test]
    fn test_validate_rejects_misfits() {
        let genome = Genome::random(&mut WyRng::seeded(3));

        let mut stale = genome.clone();
        stale.version = GENOME_VERSION + 1;
        assert_eq!(
            stale.validate(),
            Err(GenomeError::UnsupportedVersion(GENOME_VERSION + 1))
        );

        let mut short = genome.clone();
        short.biases.truncate(5);
        assert_eq!(
            short.validate(),
            Err(GenomeError::BiasCount {
                expected: NEURONS,
                actual: 5
            })
        );

        let mut wide = genome;
        wide.weights.push(0.);
        assert_eq!(
            wide.validate(),
            Err(GenomeError::WeightCount {
                expected: SYNAPSES,
                actual: SYNAPSES + 1
            })
        );
    }

    #[test]
    fn test_cross_over_rejects_misfits() {
        let mut rng = rng_with(&[]);
        let genome = Genome::random(&mut WyRng::seeded(3));
        let runt = Genome {
            version: GENOME_VERSION,
            biases: vec![0.; 5],
            weights: vec![0.; SYNAPSES],
        };
        assert!(genome.cross_over(&runt, &mut rng).is_err());
        assert!(runt.cross_over(&genome, &mut rng).is_err());
    }

    #[test]
    fn test_self_cross_over_is_identity() {
        let mut rng = rng_with(&[]);
        let genome = Genome::random(&mut WyRng::seeded(3));
        assert_eq!(genome.cross_over(&genome, &mut rng).unwrap(), genome);
    }

    #[test]
    fn test_cross_over_inheritance_extremes() {
        let own = Genome::random(&mut WyRng::seeded(3));
        let donor = Genome::random(&mut WyRng::seeded(4));

        let mut keep_all = rng_with(&[(ChanceEvent::InheritBias, percent(100))]);
        assert_eq!(own.cross_over(&donor, &mut keep_all).unwrap(), own);

        let mut take_all = rng_with(&[(ChanceEvent::InheritBias, 0)]);
        let child = own.cross_over(&donor, &mut take_all).unwrap();
        assert_eq!(child.biases, donor.biases);
        assert_eq!(child.weights, own.weights);
    }

    #[test]
    fn test_mutation_off_is_identity() {
        let mut rng = rng_with(&[
            (ChanceEvent::MutateBias, 0),
            (ChanceEvent::MutateWeight, 0),
        ]);
        let genome = Genome::random(&mut WyRng::seeded(3));
        assert_eq!(genome.mutate(&mut rng), genome);
    }

    #[test]
    fn test_mutation_scales_within_range() {
        let mut rng = rng_with(&[
            (ChanceEvent::MutateBias, percent(100)),
            (ChanceEvent::MutateWeight, percent(100)),
        ]);
        let genome = Genome::random(&mut WyRng::seeded(3));
        let mutant = genome.mutate(&mut rng);

        for (before, after) in genome
            .biases
            .iter()
            .chain(&genome.weights)
            .zip(mutant.biases.iter().chain(&mutant.weights))
        {
            let factor = after / before;
            assert!(
                (-0.5..2.5).contains(&factor),
                "factor {factor} out of range"
            );
        }
    }

    #[test]
    fn test_json_round_trip() {
        let genome = Genome::random(&mut WyRng::seeded(3));
        let parsed = Genome::from_json(&genome.to_json().unwrap()).unwrap();
        assert_eq!(parsed, genome);
    }

    #[test]
    fn test_from_json_validates() {
        let runt = Genome {
            version: GENOME_VERSION,
            biases: vec![0.; 5],
            weights: vec![0.; SYNAPSES],
        };
        assert!(Genome::from_json(&serde_json::to_string(&runt).unwrap()).is_err());
    }
}
