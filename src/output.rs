//! Report rendering

use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

use crate::analysis::{Counter, RunCounts};

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Counts of one function
#[derive(Debug, Clone, Serialize)]
pub struct FunctionReport {
    pub name: String,
    pub counts: RunCounts,
}

/// Counts of one IR file, with per-function detail when requested
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    pub counts: RunCounts,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<FunctionReport>,
}

/// Everything one `count` invocation found
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub total: RunCounts,
    pub files: Vec<FileReport>,
}

/// Render one line per counter in report order, `NumCondBranch = 3`
pub fn render_counts(counts: &RunCounts, describe: bool) -> String {
    let mut output = String::new();

    for counter in Counter::ALL {
        output.push_str(&format!("{} = {}", counter.name(), counts.get(counter)));
        if describe {
            output.push_str(&format!("  # {}", counter.description()));
        }
        output.push('\n');
    }

    output
}

/// Render the report as plain text: per-function sections (if any) followed
/// by the totals
pub fn render_text(report: &Report, describe: bool) -> String {
    let mut output = String::new();

    for file in &report.files {
        for function in &file.functions {
            output.push_str(&format!("{}: @{}\n", file.path, function.name));
            output.push_str(&render_counts(&function.counts, describe));
            output.push('\n');
        }
    }

    output.push_str(&render_counts(&report.total, describe));
    output
}

pub fn render_toml(report: &Report) -> Result<String, OutputError> {
    Ok(toml::to_string(report)?)
}

/// Write rendered output to a file, creating parent directories
pub fn write_report(content: &str, output_path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = fs::File::create(output_path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}
