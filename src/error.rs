use std::path::PathBuf;
use thiserror::Error;

/// Structural problems with the configured test tree. These abort the run,
/// unlike per-case compile/run/compare failures which are counted and
/// reported.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("end-to-end test input needs to be a directory: `{}`", .0.display())]
    InvalidInput(PathBuf),

    #[error("could not find both `{}` and `{}`", test.display(), expected.display())]
    MalformedCase { test: PathBuf, expected: PathBuf },
}
