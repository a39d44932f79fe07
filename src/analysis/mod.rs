//! Analysis module - branch classification and counting

mod accumulator;
mod branch;
mod classifier;

pub use accumulator::{Counter, RunAccumulator, RunCounts};
pub use branch::{BranchCategory, PredicateFamily};
pub use classifier::BranchClassifier;
