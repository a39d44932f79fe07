//! Branch instruction census for LLVM IR
//!
//! [`analysis::BranchClassifier`] decides what kind of branch an instruction
//! is, [`analysis::RunAccumulator`] walks functions and keeps the counts.
//! The [`parser`] reads textual `.ll` files into the [`ir`] model.

pub mod analysis;
pub mod ir;
pub mod output;
pub mod parser;
pub mod project;
