//! A pilot: one genome and the decision rule that turns a sensor reading
//! into a steering action. Agents hold no memory between ticks, and the
//! genetic operators never touch the receiver.

use crate::game::{SensorReading, Steer};
use crate::genome::{Genome, GenomeError};
use crate::network::{activate, Perceptron};
use crate::random::Happens;
use rand::RngCore;

#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    genome: Genome,
}

impl Agent {
    pub fn random(rng: &mut impl RngCore) -> Self {
        Self {
            genome: Genome::random(rng),
        }
    }

    pub fn from_genome(genome: Genome) -> Result<Self, GenomeError> {
        genome.validate()?;
        Ok(Self { genome })
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// Map a sensor reading to a steering action. The raw features are
    /// scaled onto the trained input ranges before activation; the output
    /// rule reads neuron 0 as "move at all" and neuron 1 as the direction.
    pub fn decide(&self, reading: &SensorReading) -> Steer {
        let [o0, o1] = Perceptron::from_genome(&self.genome, activate::logistic).activate([
            reading.nearest_block_offset * 50.,
            reading.widest_gap_offset * 100.,
            reading.nearest_block_width as f64 * 50.,
        ]);

        if o0 <= 0.5 {
            Steer::Straight
        } else if o1 > 0.5 {
            Steer::Right
        } else {
            Steer::Left
        }
    }

    /// Breed with `other`; see [`Genome::cross_over`] for the recombination
    /// rule. Fails if either genome doesn't fit the shared topology.
    pub fn cross_over(
        &self,
        other: &Self,
        rng: &mut (impl RngCore + Happens),
    ) -> Result<Self, GenomeError> {
        Ok(Self {
            genome: self.genome.cross_over(&other.genome, rng)?,
        })
    }

    pub fn mutate(&self, rng: &mut (impl RngCore + Happens)) -> Self {
        Self {
            genome: self.genome.mutate(rng),
        }
    }
}
