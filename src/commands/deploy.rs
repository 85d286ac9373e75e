use {
    crate::utils::{
        console, manifest,
        prompt::{Confirm, StdinConfirm},
        rollback::RollbackHandle,
        shell::{ShellRunner, StepOutput, StepRunner},
        version,
    },
    anyhow::{bail, Context, Result},
    clap::Args,
    scopeguard::ScopeGuard,
    std::{
        fs,
        path::{Path, PathBuf},
    },
};

#[derive(Args, Debug)]
pub struct CommandArgs {
    #[arg(help = "Target version (MAJOR.MINOR.PATCH, e.g. 1.0.5)")]
    pub version: String,

    #[arg(
        long,
        default_value = "pyproject.toml",
        help = "Manifest file holding the authoritative version line"
    )]
    pub manifest: PathBuf,

    #[arg(
        long,
        default_value = "dist",
        help = "Directory the build step writes artifacts into"
    )]
    pub dist_dir: PathBuf,

    #[arg(
        long,
        default_value = "rm -rf dist build *.egg-info",
        help = "Command that removes previous build output"
    )]
    pub clean_cmd: String,

    #[arg(
        long,
        default_value = "python -m build",
        help = "Command that builds the distributable artifacts"
    )]
    pub build_cmd: String,

    #[arg(
        long,
        default_value = "python -m twine upload dist/*",
        help = "Command that uploads the artifacts to the registry"
    )]
    pub upload_cmd: String,

    #[arg(
        long,
        default_value = "python -m build --version",
        help = "Probe that succeeds when the build tool is installed"
    )]
    pub build_probe: String,

    #[arg(
        long,
        default_value = "python -m twine --version",
        help = "Probe that succeeds when the upload tool is installed"
    )]
    pub upload_probe: String,

    #[arg(short = 'C', long, default_value = ".", help = "Directory to operate in")]
    pub workdir: PathBuf,
}

pub fn run(args: CommandArgs, rollback: RollbackHandle) -> Result<()> {
    let runner = ShellRunner::new(args.workdir.clone());
    Deploy::new(args, runner, StdinConfirm, rollback).run()
}

struct Deploy<R, C> {
    version: String,
    manifest: PathBuf,
    dist_dir: PathBuf,
    clean_cmd: String,
    build_cmd: String,
    upload_cmd: String,
    build_probe: String,
    upload_probe: String,
    runner: R,
    confirm: C,
    rollback: RollbackHandle,
}

impl<R: StepRunner, C: Confirm> Deploy<R, C> {
    fn new(args: CommandArgs, runner: R, confirm: C, rollback: RollbackHandle) -> Self {
        fn resolve(workdir: &Path, path: PathBuf) -> PathBuf {
            if path.is_absolute() {
                path
            } else {
                workdir.join(path)
            }
        }
        let manifest = resolve(&args.workdir, args.manifest);
        let dist_dir = resolve(&args.workdir, args.dist_dir);
        Self {
            version: args.version,
            manifest,
            dist_dir,
            clean_cmd: args.clean_cmd,
            build_cmd: args.build_cmd,
            upload_cmd: args.upload_cmd,
            build_probe: args.build_probe,
            upload_probe: args.upload_probe,
            runner,
            confirm,
            rollback,
        }
    }

    fn run(mut self) -> Result<()> {
        if !version::validate_version(&self.version) {
            bail!(
                "invalid version format: {} (expected MAJOR.MINOR.PATCH, e.g. 1.0.5)",
                self.version
            );
        }
        if !self.manifest.exists() {
            bail!("{} not found", self.manifest.display());
        }

        console::step("Checking required tools...");
        self.runner
            .run_step(&self.build_probe, "build tool check")
            .context("build tool not available, install with: pip install build")?;
        self.runner
            .run_step(&self.upload_probe, "upload tool check")
            .context("upload tool not available, install with: pip install twine")?;
        console::success("All required tools are available");

        let current = manifest::read_version(&self.manifest)
            .context("could not determine the current version from the manifest")?;

        console::info(&format!("Current version: {current}"));
        console::info(&format!("New version: {}", self.version));
        if version::is_downgrade(&current, &self.version) == Some(true) {
            console::warning(&format!(
                "requested version {} is not newer than {current}",
                self.version
            ));
        }

        let question = format!("\nDo you want to deploy version {}? (y/N): ", self.version);
        if !self.confirm.confirm(&question)? {
            console::warning("Deployment cancelled");
            return Ok(());
        }

        console::step("Updating version in the manifest...");
        // Armed before the backup copy so an interrupt or write failure
        // anywhere in the mutation window restores; restoring is a no-op
        // until the backup file actually exists. The guard covers every
        // early return until one of the two commit paths defuses it.
        self.rollback.arm(self.manifest.clone());
        let guard = scopeguard::guard(self.rollback.clone(), |rollback| {
            rollback.restore_if_armed();
        });
        manifest::write_version(&self.manifest, &self.version)?;
        console::success(&format!("Version updated: {current} -> {}", self.version));

        self.step(&self.clean_cmd, "Cleaning up build artifacts")?;
        self.step(&self.build_cmd, "Building package")?;

        let artifacts = self.built_artifacts()?;
        if artifacts.is_empty() {
            bail!(
                "no files found in {} after build",
                self.dist_dir.display()
            );
        }
        console::info("Built files:");
        for name in &artifacts {
            console::plain(&format!("  {name}"));
        }

        console::plain("");
        console::warning("About to upload to the package registry. Make sure you have:");
        console::warning("1. Configured your registry credentials");
        console::warning("2. Tested the package locally");
        console::warning("3. Updated documentation and changelog");

        if !self.confirm.confirm("\nContinue with the upload? (y/N): ")? {
            console::warning(&format!(
                "Upload cancelled. Build artifacts remain in {}",
                self.dist_dir.display()
            ));
            console::info(&format!(
                "You can upload manually later with: {}",
                self.upload_cmd
            ));
            // The bumped manifest is kept on purpose; only the backup goes.
            ScopeGuard::into_inner(guard).commit();
            return Ok(());
        }

        if let Err(err) = self.step(&self.upload_cmd, "Uploading to the registry") {
            console::warning(&format!(
                "Build artifacts remain in {} for manual inspection",
                self.dist_dir.display()
            ));
            return Err(err);
        }

        ScopeGuard::into_inner(guard).commit();
        console::success(&format!(
            "Successfully deployed version {}!",
            self.version
        ));
        self.print_summary(&current);
        Ok(())
    }

    fn step(&self, command: &str, label: &str) -> Result<StepOutput> {
        console::step(&format!("{label}..."));
        match self.runner.run_step(command, label) {
            Ok(output) => {
                console::success(&format!("{label} completed"));
                Ok(output)
            }
            Err(err) => {
                console::error(&format!("{label} failed!"));
                Err(err)
            }
        }
    }

    fn built_artifacts(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.dist_dir).with_context(|| {
            format!("no {} directory found after build", self.dist_dir.display())
        })?;
        let mut names = vec![];
        for entry in entries {
            let entry = entry.with_context(|| {
                format!("failed to list {}", self.dist_dir.display())
            })?;
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        names.sort();
        Ok(names)
    }

    fn print_summary(&self, previous: &str) {
        let package = manifest::read_package_name(&self.manifest)
            .unwrap_or_else(|| "<unknown>".to_string());
        console::plain("");
        console::info("Deployment summary:");
        console::info(&format!("  Package: {package}"));
        console::info(&format!("  Version: {}", self.version));
        console::info(&format!("  Previous: {previous}"));
        console::plain("");
        console::info("Next steps:");
        console::info(&format!(
            "1. Tag the release: git tag v{v} && git push origin v{v}",
            v = self.version
        ));
        console::info("2. Create a release with the changelog");
        console::info("3. Update documentation if needed");
    }
}
