//! Branch category types

use crate::ir::CmpPredicate;

/// Bucket a branch instruction falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchCategory {
    /// `br label %dest`
    Unconditional,
    /// Conditional on an equality compare
    ConditionalEquality,
    /// Conditional on a greater-than or greater-or-equal compare
    ConditionalGreaterThan,
    /// Conditional on a less-than or less-or-equal compare
    ConditionalLessThan,
    /// Conditional on anything else: not-equal, ordered/unordered checks,
    /// constant predicates, or a condition that is not a compare at all
    ConditionalOther,
}

impl BranchCategory {
    pub fn is_conditional(self) -> bool {
        !matches!(self, BranchCategory::Unconditional)
    }
}

impl From<PredicateFamily> for BranchCategory {
    fn from(family: PredicateFamily) -> Self {
        match family {
            PredicateFamily::Equality => BranchCategory::ConditionalEquality,
            PredicateFamily::GreaterThan => BranchCategory::ConditionalGreaterThan,
            PredicateFamily::LessThan => BranchCategory::ConditionalLessThan,
            PredicateFamily::Other => BranchCategory::ConditionalOther,
        }
    }
}

/// Ordering direction of a compare predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateFamily {
    Equality,
    GreaterThan,
    LessThan,
    Other,
}

impl PredicateFamily {
    /// Strict and non-strict forms share a family: `sge` counts as greater
    /// than, `ule` as less than.
    pub fn of(predicate: CmpPredicate) -> Self {
        match predicate {
            CmpPredicate::IcmpEq | CmpPredicate::FcmpOeq | CmpPredicate::FcmpUeq => {
                PredicateFamily::Equality
            }

            CmpPredicate::IcmpSgt
            | CmpPredicate::IcmpUgt
            | CmpPredicate::IcmpSge
            | CmpPredicate::IcmpUge
            | CmpPredicate::FcmpOgt
            | CmpPredicate::FcmpUgt
            | CmpPredicate::FcmpOge
            | CmpPredicate::FcmpUge => PredicateFamily::GreaterThan,

            CmpPredicate::IcmpSlt
            | CmpPredicate::IcmpUlt
            | CmpPredicate::IcmpSle
            | CmpPredicate::IcmpUle
            | CmpPredicate::FcmpOlt
            | CmpPredicate::FcmpUlt
            | CmpPredicate::FcmpOle
            | CmpPredicate::FcmpUle => PredicateFamily::LessThan,

            CmpPredicate::IcmpNe
            | CmpPredicate::FcmpOne
            | CmpPredicate::FcmpUne
            | CmpPredicate::FcmpOrd
            | CmpPredicate::FcmpUno
            | CmpPredicate::FcmpFalse
            | CmpPredicate::FcmpTrue => PredicateFamily::Other,
        }
    }
}

impl std::fmt::Display for PredicateFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredicateFamily::Equality => write!(f, "equality"),
            PredicateFamily::GreaterThan => write!(f, "greater-than"),
            PredicateFamily::LessThan => write!(f, "less-than"),
            PredicateFamily::Other => write!(f, "other"),
        }
    }
}
