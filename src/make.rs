use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;
use tracing::info;

/// Source file the subject compiler is built from.
pub const SUBJECT_SOURCE: &str = "toki.c";

/// Make target producing the subject executable.
pub const MAKE_TARGET: &str = "toki";

/// Builds the subject compiler before the suite runs and verifies the
/// executable actually appeared.
pub fn make_subject(work_dir: &Path, subject_exe: &str) -> Result<()> {
    if !work_dir.join(SUBJECT_SOURCE).exists() {
        bail!("cannot find `{SUBJECT_SOURCE}`, try compiling yourself");
    }
    if !work_dir.join("makefile").exists() && !work_dir.join("Makefile").exists() {
        bail!("cannot find `makefile`, try compiling yourself");
    }

    info!("building `{MAKE_TARGET}`");
    let status = Command::new("make")
        .arg(MAKE_TARGET)
        .current_dir(work_dir)
        .status()
        .context("failed to run `make`")?;
    if !status.success() {
        bail!("`make {MAKE_TARGET}` failed with {status}");
    }

    if !work_dir.join(subject_exe).exists() {
        bail!("running `make {MAKE_TARGET}` failed (`{subject_exe}` not found), try compiling yourself");
    }
    Ok(())
}
