use anyhow::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

use toki_test::engine::RunOptions;
use toki_test::report::render_summary;
use toki_test::subject::{StageOutput, Subject};
use toki_test::tree::run_roots;
use toki_test::types::Aggregate;

/// Subject that "compiles" anything and has the artifact print a canned text
/// per test source file.
struct MockSubject {
    programs: HashMap<String, String>,
    last: RefCell<Option<String>>,
}

impl MockSubject {
    fn new(programs: &[(&str, &str)]) -> Self {
        Self {
            programs: programs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            last: RefCell::new(None),
        }
    }
}

impl Subject for MockSubject {
    fn compile(&self, test_source: &Path) -> Result<StageOutput> {
        let name = test_source
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        *self.last.borrow_mut() = Some(name);
        Ok(StageOutput {
            code: Some(0),
            stdout: String::new(),
            stderr: String::new(),
        })
    }

    fn run_artifact(&self) -> Result<StageOutput> {
        let last = self.last.borrow().clone().expect("compile stage first");
        let stdout = self.programs.get(&last).cloned().unwrap_or_default();
        Ok(StageOutput {
            code: Some(0),
            stdout,
            stderr: String::new(),
        })
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

fn write_case(root: &Path, name: &str, expected: &str) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{name}_test.toki")), "ale e ni\n").unwrap();
    fs::write(dir.join(format!("{name}_expected.txt")), expected).unwrap();
}

fn opts(work: &Path) -> RunOptions {
    RunOptions {
        show_success: false,
        work_dir: work.to_path_buf(),
    }
}

#[test]
fn one_pass_one_mismatch() -> Result<()> {
    colored::control::set_override(false);
    let suite = tempdir()?;
    let work = tempdir()?;
    write_case(suite.path(), "caseA", "3\n");
    write_case(suite.path(), "caseB", "4\n");

    let subject = MockSubject::new(&[("caseA_test.toki", "3\n"), ("caseB_test.toki", "5\n")]);
    let total = run_roots(
        &subject,
        &[suite.path().to_path_buf()],
        &opts(work.path()),
    )?;

    assert_eq!(
        total,
        Aggregate {
            successes: 1,
            trials: 2
        }
    );
    assert_eq!(render_summary(&total), "TESTS FINISHED: 1/2 tests succeeded");
    Ok(())
}

#[test]
fn no_roots_is_zero_of_zero() -> Result<()> {
    colored::control::set_override(false);
    let work = tempdir()?;
    let subject = MockSubject::new(&[]);
    let total = run_roots(&subject, &[], &opts(work.path()))?;

    assert_eq!(total, Aggregate::default());
    assert_eq!(render_summary(&total), "TESTS FINISHED: 0/0 tests succeeded");
    Ok(())
}

#[test]
fn root_order_does_not_change_totals() -> Result<()> {
    let suite_a = tempdir()?;
    let suite_b = tempdir()?;
    let work = tempdir()?;
    write_case(suite_a.path(), "caseA", "1\n");
    write_case(suite_b.path(), "caseB", "2\n");

    let subject = MockSubject::new(&[("caseA_test.toki", "1\n"), ("caseB_test.toki", "no\n")]);
    let forward = run_roots(
        &subject,
        &[suite_a.path().to_path_buf(), suite_b.path().to_path_buf()],
        &opts(work.path()),
    )?;
    let backward = run_roots(
        &subject,
        &[suite_b.path().to_path_buf(), suite_a.path().to_path_buf()],
        &opts(work.path()),
    )?;

    assert_eq!(forward, backward);
    assert_eq!(
        forward,
        Aggregate {
            successes: 1,
            trials: 2
        }
    );
    Ok(())
}
