use {
    super::{console, manifest},
    log::warn,
    std::{
        path::PathBuf,
        sync::{Arc, Mutex},
    },
};

/// Shared handle to the armed manifest backup. The deploy pipeline arms it
/// right after the manifest is mutated; the ctrl-c task and the pipeline's
/// failure guard both restore through it, whichever fires first.
#[derive(Clone, Default)]
pub struct RollbackHandle {
    armed: Arc<Mutex<Option<PathBuf>>>,
}

impl RollbackHandle {
    pub fn new() -> Self {
        Self::default()
    }

    fn take(&self) -> Option<PathBuf> {
        let mut armed = match self.armed.lock() {
            Ok(armed) => armed,
            Err(poisoned) => poisoned.into_inner(),
        };
        armed.take()
    }

    pub fn arm(&self, manifest: PathBuf) {
        let mut armed = match self.armed.lock() {
            Ok(armed) => armed,
            Err(poisoned) => poisoned.into_inner(),
        };
        *armed = Some(manifest);
    }

    /// Restore the manifest from its backup if one is armed and the backup
    /// file exists. Idempotent; a failed restoration is logged rather than
    /// propagated since every caller is already on its way out.
    pub fn restore_if_armed(&self) {
        if let Some(manifest) = self.take() {
            if !manifest::backup_path(&manifest).exists() {
                return;
            }
            console::info("Restoring backup...");
            if let Err(err) = manifest::restore_backup(&manifest) {
                warn!("failed to restore {}: {err}", manifest.display());
            }
        }
    }

    /// Commit the mutation: disarm and delete the backup file. A failed
    /// removal is only logged; the mutation itself is already committed and
    /// the commit paths must still exit cleanly.
    pub fn commit(&self) {
        if let Some(manifest) = self.take() {
            if let Err(err) = manifest::discard_backup(&manifest) {
                warn!(
                    "failed to remove backup for {}: {err}",
                    manifest.display()
                );
            }
        }
    }
}
