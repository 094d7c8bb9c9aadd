use anyhow::Result;
use clap::Parser;
use colored::control::set_override as set_color_override;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{error, info};

use toki_test::engine::RunOptions;
use toki_test::report;
use toki_test::subject::{ExternalSubject, Subject};
use toki_test::{lint, make, tree};

const DEFAULT_END_TO_END_PATH: &str = "./test/end_to_end";
const DEFAULT_SUBJECT: &str = "./toki.exe";

/// Performs all end-to-end tests located in the given folders and reports the
/// results.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Paths to files/folders holding end-to-end test cases
    #[arg(
        short = 'e',
        long = "end-to-end",
        value_name = "PATH",
        num_args = 0..
    )]
    end_to_end: Vec<PathBuf>,

    /// Use the default end-to-end suite location
    #[arg(short = 'd', long = "default")]
    use_default: bool,

    /// Build the subject compiler with `make` before running tests
    #[arg(short = 'm', long = "make-subject")]
    make_subject: bool,

    /// Display all test results, even successes
    #[arg(short = 's', long = "show-success")]
    show_success: bool,

    /// Subject executable to test
    #[arg(long, value_name = "CMD", default_value = DEFAULT_SUBJECT)]
    subject: String,

    /// Per-invocation timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    timeout: u64,

    /// Lint the subject's source with cppcheck before testing
    #[arg(long)]
    lint: bool,

    /// Show suite progress while running
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    no_color: bool,
}

fn display_path(path: &str) -> String {
    match std::fs::canonicalize(Path::new(path)) {
        Ok(p) => p.to_string_lossy().into_owned(),
        Err(_) => path.to_string(),
    }
}

/// Bare command names are resolved through PATH, explicit paths are shown
/// canonicalized.
fn resolve_subject_path(cmd: &str) -> String {
    if cmd.contains(std::path::MAIN_SEPARATOR) || cmd.starts_with("./") || cmd.starts_with(".\\") {
        return display_path(cmd);
    }
    match which::which(cmd) {
        Ok(p) => p.to_string_lossy().into_owned(),
        Err(_) => cmd.to_string(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "toki_test=info".to_string())
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "toki_test=warn".to_string())
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if cli.no_color {
        set_color_override(false);
    }

    if cli.lint {
        lint::lint(Path::new("."))?;
    }

    if cli.make_subject {
        make::make_subject(Path::new("."), cli.subject.trim_start_matches("./"))?;
    }

    let subject = ExternalSubject {
        subject_cmd: resolve_subject_path(&cli.subject),
        work_dir: PathBuf::from("."),
        timeout: Some(Duration::from_secs(cli.timeout)),
    };
    if let Err(e) = subject.validate() {
        error!("{e:#}");
        std::process::exit(2);
    }

    let mut roots = cli.end_to_end.clone();
    if cli.use_default {
        roots.push(PathBuf::from(DEFAULT_END_TO_END_PATH));
    }

    if cli.verbose {
        info!(
            "{} {} testing `{}` over {} root(s)",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            subject.subject_cmd,
            roots.len()
        );
    }

    let opts = RunOptions {
        show_success: cli.show_success,
        work_dir: PathBuf::from("."),
    };
    let total = tree::run_roots(&subject, &roots, &opts)?;

    report::print_summary(&total);

    if total.failures() > 0 {
        std::process::exit(1);
    }
    Ok(())
}
