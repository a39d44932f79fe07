//! Common test utilities

#![allow(dead_code)]

use std::path::PathBuf;

use branchcount::analysis::{RunAccumulator, RunCounts};
use branchcount::ir::Module;
use branchcount::parser::IrParser;

/// Get the path to the testdata directory
pub fn testdata_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

/// Parse a fixture from testdata
pub fn parse_fixture(name: &str) -> Module {
    let path = testdata_dir().join(name);
    IrParser::parse_file(&path).unwrap_or_else(|e| panic!("failed to parse {}: {}", name, e))
}

/// Counts over every function of a fixture
pub fn count_fixture(name: &str) -> RunCounts {
    let mut acc = RunAccumulator::new();
    acc.accumulate_module(&parse_fixture(name));
    acc.finish()
}

/// Counts for one function of a fixture
pub fn count_function(name: &str, function: &str) -> RunCounts {
    let module = parse_fixture(name);
    let f = module
        .functions
        .iter()
        .find(|f| f.name == function)
        .unwrap_or_else(|| panic!("no function @{} in {}", function, name));
    RunAccumulator::process_function(f)
}

pub fn counts(
    unconditional: u64,
    conditional: u64,
    equality: u64,
    greater_than: u64,
    less_than: u64,
) -> RunCounts {
    RunCounts {
        unconditional,
        conditional,
        equality,
        greater_than,
        less_than,
    }
}
