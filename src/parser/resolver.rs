//! Binds branch conditions to the compare instructions that define them

use std::collections::HashMap;

use crate::ir::{Branch, Compare, Condition, Function, InstKind, Operand};

/// Rewrites `Condition::Value(%c)` into `Condition::Compare(..)` when `%c` is
/// the result of an `icmp`/`fcmp` in the same function.
///
/// Definitions may appear after their uses in the text (blocks are not
/// required to be listed in dominance order), so all compares are collected
/// before any branch is rewritten.
pub struct ConditionResolver;

impl ConditionResolver {
    pub fn resolve(function: &mut Function) {
        let compares: HashMap<String, Compare> = function
            .instructions()
            .filter_map(|inst| match (&inst.result, &inst.kind) {
                (Some(name), InstKind::Compare(cmp)) => Some((name.clone(), cmp.clone())),
                _ => None,
            })
            .collect();

        if compares.is_empty() {
            return;
        }

        for block in &mut function.blocks {
            for inst in &mut block.instructions {
                if let InstKind::Branch(Branch::Conditional { condition, .. }) = &mut inst.kind {
                    if let Condition::Value(Operand::Local(name)) = condition {
                        if let Some(cmp) = compares.get(name.as_str()) {
                            *condition = Condition::Compare(cmp.clone());
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{BasicBlock, CmpPredicate, Instruction};

    fn cond_br(on: &str) -> Instruction {
        Instruction::new(
            None,
            InstKind::Branch(Branch::Conditional {
                condition: Condition::Value(Operand::Local(on.to_string())),
                if_true: "t".to_string(),
                if_false: "f".to_string(),
            }),
        )
    }

    fn icmp(result: &str, predicate: CmpPredicate) -> Instruction {
        Instruction::new(
            Some(result.to_string()),
            InstKind::Compare(Compare {
                predicate,
                lhs: Operand::Local("a".to_string()),
                rhs: Operand::Constant("0".to_string()),
            }),
        )
    }

    fn condition_of(inst: &Instruction) -> &Condition {
        match &inst.kind {
            InstKind::Branch(Branch::Conditional { condition, .. }) => condition,
            other => panic!("not a conditional branch: {:?}", other),
        }
    }

    #[test]
    fn test_definition_after_use() {
        let mut f = Function {
            name: "f".to_string(),
            blocks: vec![
                BasicBlock {
                    label: "entry".to_string(),
                    instructions: vec![cond_br("late")],
                },
                BasicBlock {
                    label: "later".to_string(),
                    instructions: vec![icmp("late", CmpPredicate::IcmpUlt)],
                },
            ],
        };

        ConditionResolver::resolve(&mut f);

        match condition_of(&f.blocks[0].instructions[0]) {
            Condition::Compare(cmp) => assert_eq!(cmp.predicate, CmpPredicate::IcmpUlt),
            other => panic!("unresolved: {:?}", other),
        }
    }

    #[test]
    fn test_non_compare_left_alone() {
        let mut f = Function {
            name: "f".to_string(),
            blocks: vec![BasicBlock {
                label: "entry".to_string(),
                instructions: vec![
                    icmp("c", CmpPredicate::IcmpEq),
                    Instruction::new(
                        Some("both".to_string()),
                        InstKind::Other {
                            opcode: "and".to_string(),
                        },
                    ),
                    cond_br("both"),
                ],
            }],
        };

        ConditionResolver::resolve(&mut f);

        assert!(matches!(
            condition_of(&f.blocks[0].instructions[2]),
            Condition::Value(Operand::Local(name)) if name == "both"
        ));
    }
}
