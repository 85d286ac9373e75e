use {
    crate::utils::{
        console,
        shell::{ShellRunner, StepRunner},
    },
    anyhow::{bail, Context, Result},
    clap::Args,
    std::path::PathBuf,
};

#[derive(Args, Debug)]
pub struct CommandArgs {
    #[arg(long, default_value = "tests", help = "Directory holding the test suite")]
    pub test_dir: PathBuf,

    #[arg(
        long,
        default_value = "python -m pytest",
        help = "Command that invokes the test framework"
    )]
    pub pytest_cmd: String,

    #[arg(
        long,
        default_value = "python -m pytest --version",
        help = "Probe that succeeds when the test framework is installed"
    )]
    pub pytest_probe: String,

    #[arg(short = 'C', long, default_value = ".", help = "Directory to operate in")]
    pub workdir: PathBuf,
}

pub fn run(args: CommandArgs) -> Result<()> {
    let runner = ShellRunner::new(args.workdir.clone());
    run_with(&args, &runner)
}

/// Pass-through wrapper: probe the framework, stream the suite with
/// inherited stdio, and map its exit status to ours.
fn run_with(args: &CommandArgs, runner: &dyn StepRunner) -> Result<()> {
    runner
        .run_step(&args.pytest_probe, "test framework check")
        .context("pytest not found, install with: pip install pytest")?;
    console::success("pytest available");

    console::step("Running test suite...");
    let command = format!(
        "{} {} -v --tb=short --strict-markers",
        args.pytest_cmd,
        args.test_dir.display()
    );
    if runner.stream(&command)? {
        console::success("All tests passed");
        Ok(())
    } else {
        bail!("some tests failed, check the output above");
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::utils::shell::StepOutput,
        anyhow::anyhow,
        pretty_assertions::assert_eq,
        std::cell::RefCell,
    };

    struct FakeRunner {
        probe_ok: bool,
        suite_ok: bool,
        streamed: RefCell<Option<String>>,
    }

    impl StepRunner for FakeRunner {
        fn run_step(&self, _command: &str, label: &str) -> Result<StepOutput> {
            if !self.probe_ok {
                return Err(anyhow!("{label} failed: not installed"));
            }
            Ok(StepOutput {
                stdout: String::new(),
                stderr: String::new(),
            })
        }

        fn stream(&self, command: &str) -> Result<bool> {
            *self.streamed.borrow_mut() = Some(command.to_string());
            Ok(self.suite_ok)
        }
    }

    fn args() -> CommandArgs {
        CommandArgs {
            test_dir: PathBuf::from("tests"),
            pytest_cmd: "python -m pytest".to_string(),
            pytest_probe: "python -m pytest --version".to_string(),
            workdir: PathBuf::from("."),
        }
    }

    #[test]
    fn test_passing_suite() {
        let runner = FakeRunner {
            probe_ok: true,
            suite_ok: true,
            streamed: RefCell::new(None),
        };
        run_with(&args(), &runner).unwrap();
        assert_eq!(
            runner.streamed.borrow().as_deref(),
            Some("python -m pytest tests -v --tb=short --strict-markers")
        );
    }

    #[test]
    fn test_failing_suite() {
        let runner = FakeRunner {
            probe_ok: true,
            suite_ok: false,
            streamed: RefCell::new(None),
        };
        let err = run_with(&args(), &runner).unwrap_err();
        assert!(err.to_string().contains("some tests failed"));
    }

    #[test]
    fn test_missing_framework() {
        let runner = FakeRunner {
            probe_ok: false,
            suite_ok: true,
            streamed: RefCell::new(None),
        };
        let err = run_with(&args(), &runner).unwrap_err();
        assert!(err.to_string().contains("pip install pytest"));
        // The suite never runs without the framework.
        assert_eq!(*runner.streamed.borrow(), None);
    }
}
