//! shipit - release and test automation for a packaging project
//!
//! This library backs the `shipit` binary: a `deploy` command that bumps the
//! version line in a project manifest, builds the distribution artifacts,
//! and uploads them to a package registry with rollback of the manifest on
//! any failure after mutation; and a `test` command that wraps the project's
//! test framework.
//!
//! # Examples
//!
//! ## Validating a release version
//!
//! ```
//! use shipit::utils::version::validate_version;
//!
//! assert!(validate_version("1.0.5"));
//! assert!(!validate_version("1.0.5-beta"));
//! ```
//!
//! ## Reading and bumping a manifest version
//!
//! ```no_run
//! use {shipit::utils::manifest, std::path::Path};
//!
//! let manifest_path = Path::new("pyproject.toml");
//! let current = manifest::read_version(manifest_path).unwrap();
//! println!("current version: {current}");
//!
//! // Backs the file up, rewrites the first version line, and verifies
//! // the new value round-trips before considering the write done.
//! manifest::write_version(manifest_path, "1.0.5").unwrap();
//! ```

pub mod commands;
pub mod utils;

pub use commands::deploy;
pub use commands::run_tests;

pub use semver::Version;

pub type Result<T> = anyhow::Result<T>;
