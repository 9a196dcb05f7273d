use crate::error::{BumpError, Result};
use std::fmt;
use std::str::FromStr;

/// A GitHub repository identifier in `owner/name` form
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    /// Parse an `owner/name` identifier
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let (owner, name) = trimmed.split_once('/').ok_or_else(|| {
            BumpError::config(format!(
                "Invalid repository '{}' - expected owner/name",
                input
            ))
        })?;

        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(BumpError::config(format!(
                "Invalid repository '{}' - expected owner/name",
                input
            )));
        }

        Ok(RepoSlug {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl FromStr for RepoSlug {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        RepoSlug::parse(s)
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slug() {
        let slug = RepoSlug::parse("legendu-net/icon").unwrap();
        assert_eq!(slug.owner, "legendu-net");
        assert_eq!(slug.name, "icon");
        assert_eq!(slug.to_string(), "legendu-net/icon");
    }

    #[test]
    fn test_parse_slug_trims_whitespace() {
        let slug: RepoSlug = " jupyterlab/jupyterlab ".parse().unwrap();
        assert_eq!(slug.to_string(), "jupyterlab/jupyterlab");
    }

    #[test]
    fn test_parse_slug_invalid() {
        for input in ["", "owner", "/name", "owner/", "a/b/c"] {
            let err = RepoSlug::parse(input).unwrap_err();
            assert!(err.is_configuration(), "{} should be rejected", input);
        }
    }
}
