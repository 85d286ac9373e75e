use {
    regex::Regex,
    semver::Version,
    std::sync::LazyLock,
};

// Deliberately stricter than full semver: no pre-release or build metadata,
// so a release version is always exactly three integers.
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("valid regex"));

pub fn validate_version(version: &str) -> bool {
    VERSION_RE.is_match(version)
}

/// Best-effort comparison for the downgrade warning. Returns `None` when
/// either side does not parse as semver (the manifest may hold anything).
pub fn is_downgrade(current: &str, requested: &str) -> Option<bool> {
    let current = Version::parse(current).ok()?;
    let requested = Version::parse(requested).ok()?;
    Some(requested <= current)
}
