use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw release tag as published on the release service (e.g. "v1.2.3")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    pub name: String,
}

impl ReleaseTag {
    /// Create a new release tag
    pub fn new(name: impl Into<String>) -> Self {
        ReleaseTag { name: name.into() }
    }

    /// Strip a single leading literal `v` ("v1.2.3" -> "1.2.3")
    pub fn normalize(&self) -> NormalizedVersion {
        let trimmed = self.name.trim();
        let version = trimmed.strip_prefix('v').unwrap_or(trimmed);
        NormalizedVersion(version.to_string())
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// How much of the resolved version gets substituted into the Dockerfile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// The full version, e.g. `1.2.3`
    #[default]
    Patch,
    /// Only `MAJOR.MINOR`, for Dockerfiles that pin minor-version ranges
    Minor,
}

/// A release version with the tag prefix removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedVersion(String);

impl NormalizedVersion {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reduce the version to the requested precision.
    ///
    /// Semver versions are truncated through their parsed components so that
    /// pre-release and build suffixes are dropped along with the patch number.
    /// Anything else keeps its first two dot-separated components.
    ///
    /// # Example
    /// ```ignore
    /// let v = ReleaseTag::new("v5.12.3").normalize();
    /// assert_eq!(v.truncate(Precision::Minor), "5.12");
    /// assert_eq!(v.truncate(Precision::Patch), "5.12.3");
    /// ```
    pub fn truncate(&self, precision: Precision) -> String {
        match precision {
            Precision::Patch => self.0.clone(),
            Precision::Minor => match semver::Version::parse(&self.0) {
                Ok(v) => format!("{}.{}", v.major, v.minor),
                Err(_) => self.0.splitn(3, '.').take(2).collect::<Vec<_>>().join("."),
            },
        }
    }
}

impl fmt::Display for NormalizedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
