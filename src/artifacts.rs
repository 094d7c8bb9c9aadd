use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Output base name handed to the subject compiler.
pub const OUTPUT_BASE: &str = "a";

/// Everything a single compile stage may leave behind in the working
/// directory. Fixed names, shared by all cases, which is why cases must run
/// one at a time.
pub const ARTIFACT_FILES: [&str; 3] = ["a.asm", "a.obj", "a.exe"];

/// The runnable artifact among them.
pub const ARTIFACT_EXE: &str = "a.exe";

/// Removes the intermediate artifacts when dropped, so they are gone on every
/// exit path of a case run and a later case never sees an earlier case's
/// leftovers.
pub struct ArtifactGuard {
    dir: PathBuf,
}

impl ArtifactGuard {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        clean(&self.dir);
    }
}

/// Removes each artifact if present. A missing file is not an error; any
/// other removal failure is logged and skipped so one stuck file cannot take
/// down the rest of the suite.
pub fn clean(dir: &Path) {
    for name in ARTIFACT_FILES {
        let path = dir.join(name);
        match fs::remove_file(&path) {
            Ok(()) => debug!("removed `{}`", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("could not remove `{}`: {e}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_tolerates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        clean(dir.path());
    }

    #[test]
    fn guard_removes_existing_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ARTIFACT_FILES {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        fs::write(dir.path().join("keep.txt"), "x").unwrap();

        drop(ArtifactGuard::new(dir.path()));

        for name in ARTIFACT_FILES {
            assert!(!dir.path().join(name).exists());
        }
        assert!(dir.path().join("keep.txt").exists());
    }
}
