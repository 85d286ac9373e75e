pub mod console;
pub mod manifest;
pub mod prompt;
pub mod rollback;
pub mod shell;
pub mod version;

pub use manifest::{read_version, restore_backup, write_version};
pub use rollback::RollbackHandle;
pub use shell::{ShellRunner, StepRunner};
pub use version::validate_version;
