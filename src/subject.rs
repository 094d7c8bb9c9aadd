use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use tracing::debug;
use wait_timeout::ChildExt;

use crate::artifacts::{ARTIFACT_EXE, OUTPUT_BASE};

/// 30 seconds per external invocation
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Exit code and captured output of one external invocation.
#[derive(Debug, Clone)]
pub struct StageOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl StageOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// The compiler under test. `compile` translates one test source into the
/// fixed-name artifacts; `run_artifact` executes the produced binary and
/// captures its stdout. An `Err` from either means the stage could not run at
/// all (launch failure or timeout); a nonzero exit comes back as a normal
/// `StageOutput`.
pub trait Subject {
    fn compile(&self, test_source: &Path) -> Result<StageOutput>;
    fn run_artifact(&self) -> Result<StageOutput>;
    fn validate(&self) -> Result<()>;
}

/// Runs the real subject executable in a working directory.
#[derive(Debug, Clone)]
pub struct ExternalSubject {
    pub subject_cmd: String,
    pub work_dir: PathBuf,
    pub timeout: Option<Duration>,
}

/// The subject is always handed forward-slash paths, independent of the host
/// separator.
pub fn forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

impl ExternalSubject {
    fn invoke(&self, mut cmd: Command) -> Result<StageOutput> {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        cmd.current_dir(&self.work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!("invoking {cmd:?}");
        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to start `{}`", cmd.get_program().to_string_lossy()))?;

        match child.wait_timeout(timeout)? {
            Some(_status) => {}
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(anyhow!(
                    "`{}` timed out after {} s",
                    cmd.get_program().to_string_lossy(),
                    timeout.as_secs()
                ));
            }
        }

        let out = child.wait_with_output()?;
        Ok(StageOutput {
            code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }
}

impl Subject for ExternalSubject {
    fn compile(&self, test_source: &Path) -> Result<StageOutput> {
        let mut cmd = Command::new(&self.subject_cmd);
        cmd.arg(forward_slashes(test_source)).arg(OUTPUT_BASE);
        self.invoke(cmd)
    }

    fn run_artifact(&self) -> Result<StageOutput> {
        let exe = self.work_dir.join(ARTIFACT_EXE);
        // Absolute path so `current_dir` cannot change what we execute.
        let exe = exe.canonicalize().unwrap_or(exe);
        self.invoke(Command::new(exe))
    }

    fn validate(&self) -> Result<()> {
        let path = Path::new(&self.subject_cmd);
        if path.exists() {
            return Ok(());
        }
        match which::which(&self.subject_cmd) {
            Ok(_) => Ok(()),
            Err(_) => Err(anyhow!(
                "subject executable `{}` does not exist or is not in PATH; \
                 build it first (try `--make-subject`)",
                self.subject_cmd
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_slashes_flips_backslashes() {
        assert_eq!(forward_slashes(Path::new("a\\b\\c.toki")), "a/b/c.toki");
        assert_eq!(forward_slashes(Path::new("a/b/c.toki")), "a/b/c.toki");
    }

    #[test]
    fn nonzero_code_is_not_success() {
        let out = StageOutput {
            code: Some(1),
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(!out.success());
        assert!(StageOutput { code: Some(0), ..out }.success());
    }
}
