use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::engine::{run_case, RunOptions};
use crate::error::HarnessError;
use crate::subject::Subject;
use crate::types::{Aggregate, CasePaths};

pub const TEST_SUFFIX: &str = "_test.toki";
pub const EXPECTED_SUFFIX: &str = "_expected.txt";

/// Drives the locator over each configured root in order, summing the
/// per-root aggregates. An empty root list is fine and yields 0/0.
pub fn run_roots<S: Subject>(
    subject: &S,
    roots: &[PathBuf],
    opts: &RunOptions,
) -> Result<Aggregate> {
    let mut total = Aggregate::default();
    for root in roots {
        info!("running suite under `{}`", root.display());
        total += locate_and_run(subject, root, opts)?;
    }
    Ok(total)
}

/// Recursive suite walk. A directory whose entries are all directories is a
/// branch and contributes the sum of its children; anything else is a leaf
/// case and must contain exactly the `{name}_test.toki` /
/// `{name}_expected.txt` pair. Entries are visited sorted by name so
/// traversal order is reproducible.
pub fn locate_and_run<S: Subject>(
    subject: &S,
    path: &Path,
    opts: &RunOptions,
) -> Result<Aggregate> {
    if !path.is_dir() {
        return Err(HarnessError::InvalidInput(path.to_path_buf()).into());
    }

    let mut entries: Vec<PathBuf> = fs::read_dir(path)
        .with_context(|| format!("failed to list `{}`", path.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, _>>()
        .with_context(|| format!("failed to list `{}`", path.display()))?;
    entries.sort();

    // An empty directory counts as a branch with no cases.
    if entries.iter().all(|p| p.is_dir()) {
        return entries.iter().try_fold(Aggregate::default(), |acc, child| {
            Ok(acc + locate_and_run(subject, child, opts)?)
        });
    }

    let case = leaf_case(path, &entries)?;
    let outcome = run_case(subject, &case, opts)?;
    Ok(Aggregate::single(outcome.passed()))
}

/// Shape check for a leaf: exactly two entries, named after the directory
/// with the fixture suffixes.
fn leaf_case(path: &Path, entries: &[PathBuf]) -> Result<CasePaths, HarnessError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let test = path.join(format!("{name}{TEST_SUFFIX}"));
    let expected = path.join(format!("{name}{EXPECTED_SUFFIX}"));

    if entries.len() != 2 || !entries.contains(&test) || !entries.contains(&expected) {
        return Err(HarnessError::MalformedCase { test, expected });
    }

    Ok(CasePaths {
        dir: path.to_path_buf(),
        test,
        expected,
    })
}
