use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::artifacts::ArtifactGuard;
use crate::report;
use crate::subject::Subject;
use crate::types::{CaseOutcome, CasePaths};

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Print a line for passing cases too (failures are always printed).
    pub show_success: bool,
    /// Where the subject drops its artifacts.
    pub work_dir: PathBuf,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            show_success: false,
            work_dir: PathBuf::from("."),
        }
    }
}

/// Runs one case: compile stage, run stage, artifact cleanup, output
/// comparison. Compile/run failures are case-local outcomes; only a missing
/// or unreadable expected-output fixture is an error.
pub fn run_case<S: Subject>(
    subject: &S,
    case: &CasePaths,
    opts: &RunOptions,
) -> Result<CaseOutcome> {
    debug!("running case `{}`", case.dir.display());

    let staged = {
        // Guard scope: artifacts are gone before the comparison below,
        // whatever the two stages did.
        let _guard = ArtifactGuard::new(&opts.work_dir);
        invoke_stages(subject, case)
    };

    let outcome = match staged {
        Err(failed) => failed,
        Ok(actual) => {
            let expected = fs::read_to_string(&case.expected).with_context(|| {
                format!("failed to read expected output `{}`", case.expected.display())
            })?;
            if actual == expected {
                CaseOutcome::Success
            } else {
                CaseOutcome::OutputMismatch { actual, expected }
            }
        }
    };

    match &outcome {
        CaseOutcome::Success => {
            if opts.show_success {
                report::print_success(&case.dir);
            }
        }
        failed => report::print_failure(&case.dir, failed),
    }

    Ok(outcome)
}

/// Compile and run stages. `Ok` carries the artifact's captured stdout, `Err`
/// the failed outcome. A stage that could not launch (or timed out) reports
/// the same failure kind as a nonzero exit.
fn invoke_stages<S: Subject>(subject: &S, case: &CasePaths) -> Result<String, CaseOutcome> {
    match subject.compile(&case.test) {
        Ok(out) if out.success() => {}
        Ok(out) => {
            return Err(CaseOutcome::CompileFailure {
                code: out.code,
                stdout: out.stdout,
                stderr: out.stderr,
            })
        }
        Err(e) => {
            return Err(CaseOutcome::CompileFailure {
                code: None,
                stdout: String::new(),
                stderr: format!("{e:#}"),
            })
        }
    }

    match subject.run_artifact() {
        Ok(out) if out.success() => Ok(out.stdout),
        Ok(out) => Err(CaseOutcome::RuntimeFailure {
            code: out.code,
            stdout: out.stdout,
            stderr: out.stderr,
        }),
        Err(e) => Err(CaseOutcome::RuntimeFailure {
            code: None,
            stdout: String::new(),
            stderr: format!("{e:#}"),
        }),
    }
}
