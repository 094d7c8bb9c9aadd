use colored::Colorize;
use std::path::Path;

use crate::types::{Aggregate, CaseOutcome};

pub fn render_failure(case_dir: &Path, outcome: &CaseOutcome) -> String {
    let mut out = format!("{} {}\n", "FAILURE:".red().bold(), case_dir.display());
    match outcome {
        CaseOutcome::CompileFailure {
            code,
            stdout,
            stderr,
        } => {
            out.push_str(&format!("  Compilation error (code: {})\n", fmt_code(*code)));
            push_captured(&mut out, stdout, stderr);
        }
        CaseOutcome::RuntimeFailure {
            code,
            stdout,
            stderr,
        } => {
            out.push_str(&format!("  Runtime error (code: {})\n", fmt_code(*code)));
            push_captured(&mut out, stdout, stderr);
        }
        CaseOutcome::OutputMismatch { actual, expected } => {
            out.push_str("  Incorrect output\n");
            out.push_str(&format!("  {}\n{actual}\n", "Got:".bold()));
            out.push_str(&format!("  {}\n{expected}\n", "Expected:".bold()));
        }
        CaseOutcome::Success => {}
    }
    out
}

pub fn render_success(case_dir: &Path) -> String {
    format!("{} {}", "SUCCESS:".green().bold(), case_dir.display())
}

pub fn render_summary(total: &Aggregate) -> String {
    let counts = format!("{}/{}", total.successes, total.trials);
    let counts = if total.failures() == 0 {
        counts.green().to_string()
    } else {
        counts.red().bold().to_string()
    };
    format!("TESTS FINISHED: {counts} tests succeeded")
}

pub fn print_failure(case_dir: &Path, outcome: &CaseOutcome) {
    print!("{}", render_failure(case_dir, outcome));
}

pub fn print_success(case_dir: &Path) {
    println!("{}", render_success(case_dir));
}

pub fn print_summary(total: &Aggregate) {
    println!("{}", render_summary(total));
}

fn fmt_code(code: Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "none".to_string(),
    }
}

fn push_captured(out: &mut String, stdout: &str, stderr: &str) {
    if !stderr.is_empty() {
        out.push_str(&format!("  {}\n{stderr}\n", "stderr:".bold()));
    }
    if !stdout.is_empty() {
        out.push_str(&format!("  {}\n{stdout}\n", "output:".bold()));
    }
}
