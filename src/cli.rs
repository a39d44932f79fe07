use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use log::{debug, info, warn, LevelFilter};
use std::io::Write;
use std::path::{Path, PathBuf};

use branchcount::analysis::{PredicateFamily, RunAccumulator, RunCounts};
use branchcount::ir::{CmpPredicate, Module};
use branchcount::output::{
    render_text, render_toml, write_report, FileReport, FunctionReport, Report,
};
use branchcount::parser::IrParser;
use branchcount::project::Project;

/// branchcount - classify and count the branch instructions of LLVM IR
#[derive(Parser)]
#[command(name = "branchcount")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Base log level (use -v / -q to adjust relative to this level)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    log_level: LogLevel,

    /// Increase logging verbosity (can be used multiple times)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Decrease logging verbosity (can be used multiple times)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count branch instructions by kind and comparison predicate
    Count {
        /// Target (optional): an IR file or a directory of IR files.
        /// If omitted, reads the source directory of the enclosing branchcount.toml project
        #[arg(value_name = "TARGET")]
        target: Option<PathBuf>,

        /// Only analyze functions with this name (without the leading @)
        #[arg(short, long)]
        function: Option<String>,

        /// Also report counts for each function
        #[arg(long)]
        per_function: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Append each counter's description (text format only)
        #[arg(long)]
        describe: bool,

        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List every comparison predicate and the bucket it counts toward
    Predicates,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Format {
    Text,
    Toml,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Shift the base level by the -v / -q counts, clamped to the known levels
fn log_filter(base: LogLevel, verbose: u8, quiet: u8) -> LevelFilter {
    let levels = [
        LevelFilter::Error,
        LevelFilter::Warn,
        LevelFilter::Info,
        LevelFilter::Debug,
        LevelFilter::Trace,
    ];

    let base_idx = levels
        .iter()
        .position(|lvl| *lvl == base.to_filter())
        .unwrap_or(1) as i32;
    let adjusted = (base_idx + i32::from(verbose) - i32::from(quiet))
        .clamp(0, levels.len() as i32 - 1) as usize;

    levels[adjusted]
}

/// Options of the `count` subcommand once parsed
struct CountOptions {
    function: Option<String>,
    per_function: bool,
}

impl Cli {
    pub fn init_logging(&self) {
        env_logger::Builder::from_default_env()
            .format_target(false)
            .filter_level(log_filter(self.log_level, self.verbose, self.quiet))
            .init();
    }

    pub fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        match self.command {
            Commands::Count {
                target,
                function,
                per_function,
                format,
                describe,
                output,
            } => {
                let options = CountOptions {
                    function,
                    per_function,
                };
                let report = count(target.as_deref(), &options)?;

                let content = match format {
                    Format::Text => render_text(&report, describe),
                    Format::Toml => render_toml(&report)?,
                };

                match output {
                    Some(path) => {
                        write_report(&content, &path)?;
                        info!("wrote report to {:?}", path);
                    }
                    None => std::io::stdout().write_all(content.as_bytes())?,
                }
                Ok(())
            }
            Commands::Predicates => {
                print!("{}", predicate_table());
                Ok(())
            }
        }
    }
}

fn count(
    target: Option<&Path>,
    options: &CountOptions,
) -> Result<Report, Box<dyn std::error::Error>> {
    let mut report = Report::default();

    match target {
        // A single file: parse failures are fatal
        Some(path) if path.is_file() => {
            let module = IrParser::parse_file(path)
                .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;
            report.files.push(analyze_module(path, &module, options));
        }

        Some(dir) => {
            let project = Project::for_directory(dir);
            count_project(&project, options, &mut report)?;
        }

        None => {
            let project = Project::discover()?;
            info!("found project at {:?}", project.root());
            count_project(&project, options, &mut report)?;
        }
    }

    report.total = report.files.iter().map(|f| f.counts).sum();
    Ok(report)
}

/// Parse every IR file of a project. Files that fail to parse are skipped
/// with a warning.
fn count_project(
    project: &Project,
    options: &CountOptions,
    report: &mut Report,
) -> Result<(), Box<dyn std::error::Error>> {
    let files = project.find_ir_files()?;
    if files.is_empty() {
        warn!("no IR files found in {:?}", project.src_dir());
        return Ok(());
    }

    info!("found {} IR files", files.len());

    for path in files {
        let module = match IrParser::parse_file(&path) {
            Ok(m) => m,
            Err(e) => {
                warn!("skipping {:?}: {}", path, e);
                continue;
            }
        };
        report.files.push(analyze_module(&path, &module, options));
    }

    Ok(())
}

fn analyze_module(path: &Path, module: &Module, options: &CountOptions) -> FileReport {
    let mut total = RunCounts::default();
    let mut functions = Vec::new();

    for function in &module.functions {
        if let Some(wanted) = &options.function {
            if &function.name != wanted {
                continue;
            }
        }

        let counts = RunAccumulator::process_function(function);
        debug!("@{}: {:?}", function.name, counts);
        total += counts;

        if options.per_function {
            functions.push(FunctionReport {
                name: function.name.clone(),
                counts,
            });
        }
    }

    info!(
        "{}: {} functions, {} branches",
        path.display(),
        module.functions.len(),
        total.total_branches()
    );

    FileReport {
        path: path.display().to_string(),
        counts: total,
        functions,
    }
}

/// One line per predicate: `icmp sge    greater-than`
fn predicate_table() -> String {
    let mut output = String::new();
    for pred in CmpPredicate::ALL {
        output.push_str(&format!(
            "{:<12}{}\n",
            pred.to_string(),
            PredicateFamily::of(pred)
        ));
    }
    output
}
