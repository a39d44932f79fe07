//! Integration tests for branch counting over IR files

mod common;

use branchcount::analysis::{BranchClassifier, RunAccumulator, RunCounts};
use common::{count_fixture, count_function, counts, parse_fixture};

#[test]
fn test_no_branches() {
    assert_eq!(count_fixture("no_branches.ll"), counts(0, 0, 0, 0, 0));
}

#[test]
fn test_single_unconditional() {
    assert_eq!(count_fixture("unconditional.ll"), counts(1, 0, 0, 0, 0));
}

#[test]
fn test_integer_equality() {
    assert_eq!(count_fixture("eq_branch.ll"), counts(0, 1, 1, 0, 0));
}

#[test]
fn test_unordered_greater_or_equal() {
    assert_eq!(count_fixture("fcmp_uge.ll"), counts(0, 1, 0, 1, 0));
}

#[test]
fn test_not_equal_has_no_sub_bucket() {
    let result = count_fixture("ne_branch.ll");
    assert_eq!(result, counts(0, 1, 0, 0, 0));
    assert_eq!(result.other_conditional(), 1);
}

#[test]
fn test_three_blocks() {
    assert_eq!(count_fixture("three_blocks.ll"), counts(1, 2, 0, 1, 1));
}

#[test]
fn test_clang_style_module() {
    // unnamed entry block, numbered labels and metadata attachments
    assert_eq!(count_function("loops.ll", "sum_to"), counts(1, 2, 0, 1, 1));

    // uno and a branch on `and` land in other; switch is not a branch
    assert_eq!(count_function("loops.ll", "classify"), counts(3, 3, 1, 0, 0));

    assert_eq!(count_fixture("loops.ll"), counts(4, 5, 1, 1, 1));
}

#[test]
fn test_module_total_is_sum_of_functions() {
    let module = parse_fixture("loops.ll");
    let summed: RunCounts = module
        .functions
        .iter()
        .map(RunAccumulator::process_function)
        .sum();

    let mut acc = RunAccumulator::new();
    acc.accumulate_module(&module);
    assert_eq!(acc.finish(), summed);
}

#[test]
fn test_branch_totals_match_branch_instructions() {
    for fixture in [
        "no_branches.ll",
        "unconditional.ll",
        "eq_branch.ll",
        "fcmp_uge.ll",
        "ne_branch.ll",
        "three_blocks.ll",
        "loops.ll",
    ] {
        let module = parse_fixture(fixture);
        let branches = module
            .functions
            .iter()
            .flat_map(|f| f.instructions())
            .filter(|inst| BranchClassifier::classify(inst).is_some())
            .count() as u64;

        let result = count_fixture(fixture);
        assert_eq!(result.total_branches(), branches, "{}", fixture);
        assert!(
            result.equality + result.greater_than + result.less_than <= result.conditional,
            "{}",
            fixture
        );
    }
}

#[test]
fn test_repeated_runs_agree() {
    let module = parse_fixture("loops.ll");
    for function in &module.functions {
        assert_eq!(
            RunAccumulator::process_function(function),
            RunAccumulator::process_function(function)
        );
    }
}
