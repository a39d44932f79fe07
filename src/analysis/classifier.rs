//! Instruction to branch category classification

use super::branch::{BranchCategory, PredicateFamily};
use crate::ir::{Branch, Condition, InstKind, Instruction};

/// Decides whether an instruction is a branch and which bucket it belongs to
pub struct BranchClassifier;

impl BranchClassifier {
    /// Classify one instruction. Returns `None` for anything that is not a
    /// branch instruction.
    ///
    /// A conditional branch whose condition is not a compare is
    /// `ConditionalOther`; this is also where a condition the reader could
    /// not bind to its definition ends up.
    pub fn classify(instruction: &Instruction) -> Option<BranchCategory> {
        let branch = match &instruction.kind {
            InstKind::Branch(branch) => branch,
            InstKind::Compare(_) | InstKind::Other { .. } => return None,
        };

        let category = match branch {
            Branch::Unconditional { .. } => BranchCategory::Unconditional,
            Branch::Conditional { condition, .. } => match condition {
                Condition::Compare(cmp) => PredicateFamily::of(cmp.predicate).into(),
                Condition::Value(_) => BranchCategory::ConditionalOther,
            },
        };

        Some(category)
    }
}
