//! Per-run branch counters and the traversal that fills them

use log::trace;
use serde::Serialize;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use super::branch::BranchCategory;
use super::classifier::BranchClassifier;
use crate::ir::{Branch, Function, InstKind, Module};

/// The five counters of one analysis run
///
/// `conditional` always covers at least `equality + greater_than + less_than`;
/// the gap is the number of conditional branches classified as other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunCounts {
    pub unconditional: u64,
    pub conditional: u64,
    pub equality: u64,
    pub greater_than: u64,
    pub less_than: u64,
}

impl RunCounts {
    fn record(&mut self, category: BranchCategory) {
        if category.is_conditional() {
            self.conditional += 1;
        }
        match category {
            BranchCategory::Unconditional => self.unconditional += 1,
            BranchCategory::ConditionalEquality => self.equality += 1,
            BranchCategory::ConditionalGreaterThan => self.greater_than += 1,
            BranchCategory::ConditionalLessThan => self.less_than += 1,
            BranchCategory::ConditionalOther => {}
        }
    }

    /// Every branch instruction seen
    pub fn total_branches(&self) -> u64 {
        self.unconditional + self.conditional
    }

    /// Conditional branches outside the three named families. Zero for a
    /// hand-built `RunCounts` whose sub-buckets exceed `conditional`.
    pub fn other_conditional(&self) -> u64 {
        self.conditional
            .saturating_sub(self.equality + self.greater_than + self.less_than)
    }

    pub fn get(&self, counter: Counter) -> u64 {
        match counter {
            Counter::Unconditional => self.unconditional,
            Counter::Conditional => self.conditional,
            Counter::Equality => self.equality,
            Counter::GreaterThan => self.greater_than,
            Counter::LessThan => self.less_than,
        }
    }
}

impl Add for RunCounts {
    type Output = RunCounts;

    fn add(mut self, rhs: RunCounts) -> RunCounts {
        self += rhs;
        self
    }
}

impl AddAssign for RunCounts {
    fn add_assign(&mut self, rhs: RunCounts) {
        self.unconditional += rhs.unconditional;
        self.conditional += rhs.conditional;
        self.equality += rhs.equality;
        self.greater_than += rhs.greater_than;
        self.less_than += rhs.less_than;
    }
}

impl Sum for RunCounts {
    fn sum<I: Iterator<Item = RunCounts>>(iter: I) -> Self {
        iter.fold(RunCounts::default(), Add::add)
    }
}

/// Names a counter for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Unconditional,
    Conditional,
    Equality,
    GreaterThan,
    LessThan,
}

impl Counter {
    /// Report order
    pub const ALL: [Counter; 5] = [
        Counter::Unconditional,
        Counter::Conditional,
        Counter::Equality,
        Counter::GreaterThan,
        Counter::LessThan,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Counter::Unconditional => "NumUncondBranch",
            Counter::Conditional => "NumCondBranch",
            Counter::Equality => "NumEqBranch",
            Counter::GreaterThan => "NumGTBranch",
            Counter::LessThan => "NumLTBranch",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Counter::Unconditional => "Number of unconditional branches in the program",
            Counter::Conditional => "Number of conditional branches in the program",
            Counter::Equality => {
                "Number of conditional branches whose comparison type is equal test"
            }
            Counter::GreaterThan => {
                "Number of conditional branches whose comparison type is greater than test"
            }
            Counter::LessThan => {
                "Number of conditional branches whose comparison type is less than test"
            }
        }
    }
}

/// Walks functions and folds every branch instruction into one `RunCounts`
///
/// Counters only ever grow; start a new accumulator for a fresh run.
#[derive(Debug, Default)]
pub struct RunAccumulator {
    counts: RunCounts,
}

impl RunAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the branches of a single function in a fresh run
    pub fn process_function(function: &Function) -> RunCounts {
        let mut acc = Self::new();
        acc.accumulate(function);
        acc.finish()
    }

    /// Add every branch of `function` to the running totals
    pub fn accumulate(&mut self, function: &Function) {
        for instruction in function.instructions() {
            if let Some(category) = BranchClassifier::classify(instruction) {
                if let InstKind::Branch(Branch::Conditional { condition, .. }) =
                    &instruction.kind
                {
                    trace!("@{}: br on {} -> {:?}", function.name, condition, category);
                } else {
                    trace!("@{}: {:?}", function.name, category);
                }
                self.counts.record(category);
            }
        }
    }

    pub fn accumulate_module(&mut self, module: &Module) {
        for function in &module.functions {
            self.accumulate(function);
        }
    }

    /// Totals so far
    pub fn counts(&self) -> RunCounts {
        self.counts
    }

    pub fn finish(self) -> RunCounts {
        self.counts
    }
}
