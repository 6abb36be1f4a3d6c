#![allow(mixed_script_confusables)]
#![allow(confusable_idents)]

pub mod agent;
pub mod game;
pub mod genome;
pub mod network;
pub mod population;
pub mod random;
pub mod trainer;

pub use agent::Agent;
pub use game::{Cell, Field, Game, Outcome, SensorReading, Steer};
pub use genome::{Genome, GenomeError};
pub use network::{activate, Perceptron};
pub use population::{EvolveError, FitnessRecord, Population};
pub use random::{ChanceEvent, Happens, ProbBinding, ProbStatic, Probabilities, WyRng};
pub use trainer::Trainer;
