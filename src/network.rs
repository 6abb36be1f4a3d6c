//! The pure evaluator for a pilot's genome: a fixed 3×6×2 feed-forward pass
//! expressed as two matrix products. No state survives between activations.

use crate::genome::{Genome, ACTION, HIDDEN, SENSORY};
use rulinalg::matrix::{BaseMatrix, BaseMatrixMut, Matrix};

pub mod activate {
    /// The logistic curve, squashing every hidden and action neuron.
    pub fn logistic(x: f64) -> f64 {
        1. / (1. + (-x).exp())
    }
}

/// Weights and biases lifted out of a genome, ready to activate. Sensory
/// values pass through unsquashed and their biases stay behind in the
/// genome.
pub struct Perceptron<T: Fn(f64) -> f64 + Sized> {
    σ: T,
    w_hidden: Matrix<f64>, // sensory × hidden, indexed as [from, to]
    w_action: Matrix<f64>, // hidden × action, indexed as [from, to]
    θ_hidden: Matrix<f64>,
    θ_action: Matrix<f64>,
}

impl<T: Fn(f64) -> f64> Perceptron<T> {
    pub fn from_genome(genome: &Genome, σ: T) -> Self {
        let split = SENSORY * HIDDEN;
        Self {
            σ,
            w_hidden: Matrix::new(SENSORY, HIDDEN, genome.weights[..split].to_vec()),
            w_action: Matrix::new(HIDDEN, ACTION, genome.weights[split..].to_vec()),
            θ_hidden: Matrix::new(1, HIDDEN, genome.biases[SENSORY..SENSORY + HIDDEN].to_vec()),
            θ_action: Matrix::new(1, ACTION, genome.biases[SENSORY + HIDDEN..].to_vec()),
        }
    }

    pub fn activate(&self, input: [f64; SENSORY]) -> [f64; ACTION] {
        let x = Matrix::new(1, SENSORY, input.to_vec());
        let hidden = (x * &self.w_hidden + &self.θ_hidden).apply(&self.σ);
        let action = (hidden * &self.w_action + &self.θ_action).apply(&self.σ);
        [action.data()[0], action.data()[1]]
    }
}
