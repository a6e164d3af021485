use semver::Version;

/// Extension methods for [Version]
pub trait VersionExt {
    /// Formats the version as a release tag, like `v1.2.3`
    fn to_tag(&self) -> String;
}

impl VersionExt for Version {
    fn to_tag(&self) -> String {
        format!("v{self}")
    }
}

/// Parses a release tag into a [Version].
///
/// Any leading non-numeric prefix is stripped (`v1.2.3`, `release-1.2.3`) and missing minor or patch segments are
/// considered zero (`v2` or `2.1`).
pub fn parse_version_tag(tag: &str) -> Result<Version, semver::Error> {
    let raw = tag.trim().trim_start_matches(|c: char| !c.is_ascii_digit());

    // Split off pre-release and build metadata, to pad only the numeric core
    let core_end = raw.find(['-', '+']).unwrap_or(raw.len());
    let (core, rest) = raw.split_at(core_end);
    let padded = match core.split('.').count() {
        1 if !core.is_empty() => format!("{core}.0.0{rest}"),
        2 => format!("{core}.0{rest}"),
        _ => raw.to_string(),
    };

    Version::parse(&padded)
}
