use {
    anyhow::{anyhow, Context, Result},
    log::debug,
    std::{path::PathBuf, process::Command},
};

#[derive(Debug)]
pub struct StepOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Narrow seam over external commands so the deploy pipeline can be driven
/// with deterministic fakes in tests.
pub trait StepRunner {
    /// Run `command` to completion, capturing stdout and stderr separately.
    /// A non-zero exit status is an error carrying the captured stderr.
    fn run_step(&self, command: &str, label: &str) -> Result<StepOutput>;

    /// Run `command` with inherited stdio, returning whether it exited zero.
    fn stream(&self, command: &str) -> Result<bool>;
}

/// Runs commands through `sh -c` in a fixed working directory, so steps like
/// `python -m twine upload dist/*` keep their shell globs.
pub struct ShellRunner {
    workdir: PathBuf,
}

impl ShellRunner {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }
}

impl StepRunner for ShellRunner {
    fn run_step(&self, command: &str, label: &str) -> Result<StepOutput> {
        debug!("running `{command}` in {}", self.workdir.display());
        let output = Command::new("sh")
            .args(["-c", command])
            .current_dir(&self.workdir)
            .output()
            .with_context(|| format!("failed to run `{command}`"))?;
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        if !output.status.success() {
            return Err(anyhow!("{label} failed: {}", stderr.trim()));
        }
        Ok(StepOutput { stdout, stderr })
    }

    fn stream(&self, command: &str) -> Result<bool> {
        debug!("streaming `{command}` in {}", self.workdir.display());
        let status = Command::new("sh")
            .args(["-c", command])
            .current_dir(&self.workdir)
            .status()
            .with_context(|| format!("failed to run `{command}`"))?;
        Ok(status.success())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, pretty_assertions::assert_eq};

    #[test]
    fn test_run_step_captures_output() {
        let runner = ShellRunner::new(".");
        let output = runner
            .run_step("echo out && echo err >&2", "echo")
            .unwrap();
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
    }

    #[test]
    fn test_run_step_nonzero_exit_surfaces_stderr() {
        let runner = ShellRunner::new(".");
        let err = runner
            .run_step("echo boom >&2; exit 3", "build step")
            .unwrap_err();
        assert_eq!(err.to_string(), "build step failed: boom");
    }

    #[test]
    fn test_run_step_respects_workdir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker"), "here").unwrap();
        let runner = ShellRunner::new(dir.path());
        let output = runner.run_step("cat marker", "cat").unwrap();
        assert_eq!(output.stdout, "here");
    }

    #[test]
    fn test_stream_reports_exit_status() {
        let runner = ShellRunner::new(".");
        assert!(runner.stream("true").unwrap());
        assert!(!runner.stream("false").unwrap());
    }
}
