use {
    anyhow::{anyhow, Context, Result},
    log::{debug, info},
    regex::Regex,
    std::{
        fs,
        path::{Path, PathBuf},
        sync::LazyLock,
    },
};

// Anchored per line; only the first match in the file is authoritative.
static VERSION_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^version = "([^"]+)""#).expect("valid regex"));

static NAME_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^name = "([^"]+)""#).expect("valid regex"));

/// Backup sibling of the manifest, e.g. `pyproject.toml.backup`.
pub fn backup_path(manifest: &Path) -> PathBuf {
    let mut path = manifest.as_os_str().to_os_string();
    path.push(".backup");
    PathBuf::from(path)
}

/// First `version = "..."` line in the manifest.
pub fn read_version(manifest: &Path) -> Result<String> {
    let content = fs::read_to_string(manifest)
        .with_context(|| format!("failed to read {}", manifest.display()))?;
    let caps = VERSION_LINE_RE
        .captures(&content)
        .ok_or_else(|| anyhow!("no version line found in {}", manifest.display()))?;
    Ok(caps[1].to_string())
}

pub fn read_package_name(manifest: &Path) -> Option<String> {
    let content = fs::read_to_string(manifest).ok()?;
    Some(NAME_LINE_RE.captures(&content)?[1].to_string())
}

/// Back up the manifest, rewrite only the first version line, then read the
/// file back and confirm the new value round-trips. Any failure after the
/// backup copy succeeds, including a failed or partial write, restores the
/// backup (and removes it) before returning the error.
pub fn write_version(manifest: &Path, new_version: &str) -> Result<()> {
    let backup = backup_path(manifest);
    fs::copy(manifest, &backup)
        .with_context(|| format!("failed to back up {}", manifest.display()))?;
    debug!("backup created: {}", backup.display());

    if let Err(err) = rewrite_and_verify(manifest, new_version) {
        restore_backup(manifest)?;
        return Err(err);
    }
    Ok(())
}

fn rewrite_and_verify(manifest: &Path, new_version: &str) -> Result<()> {
    let content = fs::read_to_string(manifest)
        .with_context(|| format!("failed to read {}", manifest.display()))?;
    let replacement = format!("version = \"{new_version}\"");
    let updated = VERSION_LINE_RE.replacen(&content, 1, regex::NoExpand(&replacement));
    fs::write(manifest, updated.as_ref())
        .with_context(|| format!("failed to write {}", manifest.display()))?;

    match read_version(manifest) {
        Ok(version) if version == new_version => Ok(()),
        _ => Err(anyhow!(
            "version in {} did not update to {new_version}",
            manifest.display()
        )),
    }
}

/// Overwrite the manifest with its backup and delete the backup. No-op when
/// no backup exists, so it is safe to call from any failure path.
pub fn restore_backup(manifest: &Path) -> Result<()> {
    let backup = backup_path(manifest);
    if !backup.exists() {
        return Ok(());
    }
    fs::copy(&backup, manifest)
        .with_context(|| format!("failed to restore {}", manifest.display()))?;
    fs::remove_file(&backup)
        .with_context(|| format!("failed to remove {}", backup.display()))?;
    info!("restored {} from backup", manifest.display());
    Ok(())
}

/// Delete the backup without touching the manifest, committing the mutation.
pub fn discard_backup(manifest: &Path) -> Result<()> {
    let backup = backup_path(manifest);
    if backup.exists() {
        fs::remove_file(&backup)
            .with_context(|| format!("failed to remove {}", backup.display()))?;
        debug!("backup removed: {}", backup.display());
    }
    Ok(())
}
