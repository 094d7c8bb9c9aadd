use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;

use crate::make::SUBJECT_SOURCE;

/// Lints the subject compiler's source with cppcheck.
pub fn lint(work_dir: &Path) -> Result<()> {
    let status = Command::new("cppcheck")
        .args([
            "--enable=all",
            "--force",
            "--suppress=missingIncludeSystem",
            SUBJECT_SOURCE,
        ])
        .current_dir(work_dir)
        .status()
        .context("failed to run `cppcheck`; check that it is installed and in PATH")?;
    if !status.success() {
        bail!("cppcheck reported problems ({status})");
    }
    Ok(())
}
