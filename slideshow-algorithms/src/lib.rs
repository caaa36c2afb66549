use ahash::RandomState;
pub(crate) type HashMap<K, V> = std::collections::HashMap<K, V, RandomState>;

pub mod candidates;
pub mod config;
pub mod engine;
pub mod pipeline;
pub mod selector;
pub mod sequence;

pub use candidates::{generate_candidates, CandidateSet, PairingStrategy};
pub use config::Hyperparameters;
pub use engine::{
    BinaryProgram, BranchAndBound, LinearConstraint, OptimizationEngine, Sense, SolveBudget,
    SolveOutcome, SolveStatus,
};
pub use pipeline::{solve, solve_challenge, solve_with_engine, SolveReport};
pub use selector::{CoverMode, Selection, SelectionError, SlideSelector};
pub use sequence::{SequenceBuilder, Slideshow};
