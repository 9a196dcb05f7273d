use crate::boundary::BoundaryWarning;
use crate::domain::Precision;
use crate::error::{BumpError, Result};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Placeholder in a replacement template that receives the resolved version
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// A pattern/replacement pair describing how to rewrite a version in a Dockerfile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchSpec {
    pub pattern: String,

    #[serde(default)]
    pub replace: String,

    #[serde(default)]
    pub precision: Precision,
}

impl PatchSpec {
    pub fn new(pattern: impl Into<String>, replace: impl Into<String>) -> Self {
        PatchSpec {
            pattern: pattern.into(),
            replace: replace.into(),
            precision: Precision::Patch,
        }
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Compile the pattern
    pub fn compile(&self) -> Result<CompiledPatch> {
        let regex = Regex::new(&self.pattern).map_err(|source| BumpError::Pattern {
            pattern: self.pattern.clone(),
            source,
        })?;

        Ok(CompiledPatch {
            regex,
            template: self.replace.clone(),
            precision: self.precision,
        })
    }
}

/// A PatchSpec whose regex compiled successfully
#[derive(Debug, Clone)]
pub struct CompiledPatch {
    pub regex: Regex,
    pub template: String,
    pub precision: Precision,
}

impl CompiledPatch {
    /// Expand `$1`-style capture references for one match, then fill the
    /// version placeholder. The version is never itself expanded.
    pub fn replacement_for(&self, caps: &Captures<'_>, version: &str) -> String {
        let mut expanded = String::new();
        caps.expand(&self.template, &mut expanded);
        expanded.replace(VERSION_PLACEHOLDER, version)
    }
}

/// Where a selected PatchSpec came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
    /// Looked up in the context table under this identifier
    Context(String),
    /// Supplied on the command line
    Caller,
}

/// Result of [`ContextTable::select`]
#[derive(Debug, Clone)]
pub struct Selection {
    pub spec: PatchSpec,
    pub source: SpecSource,
    pub warnings: Vec<BoundaryWarning>,
}

/// Mapping from automation context (`owner/name` of the repository running the
/// update) to the PatchSpec used for its Dockerfile.
#[derive(Debug, Clone)]
pub struct ContextTable {
    entries: HashMap<String, PatchSpec>,
}

/// Contexts with built-in patch rules.
fn builtin_entries() -> HashMap<String, PatchSpec> {
    let upper_bound = PatchSpec::new(r",<\d+\.\d+(?:\.\d+)?", ",<{version}")
        .with_precision(Precision::Minor);

    let mut map = HashMap::new();
    map.insert(
        "legendu-net/docker-base".to_string(),
        PatchSpec::new(r"-v v\d+\.\d+\.\d+", "-v v{version}"),
    );
    map.insert(
        "legendu-net/docker-jupyterlab".to_string(),
        upper_bound.clone(),
    );
    map.insert("legendu-net/docker-vscode-server".to_string(), upper_bound);
    map
}

impl Default for ContextTable {
    fn default() -> Self {
        ContextTable {
            entries: builtin_entries(),
        }
    }
}

impl ContextTable {
    /// A table with no entries; every lookup falls back to the caller's spec
    pub fn empty() -> Self {
        ContextTable {
            entries: HashMap::new(),
        }
    }

    /// Built-in entries extended (or replaced) by `overrides`
    pub fn with_overrides(overrides: &HashMap<String, PatchSpec>) -> Self {
        let mut table = ContextTable::default();
        for (context, spec) in overrides {
            table.entries.insert(context.clone(), spec.clone());
        }
        table
    }

    pub fn get(&self, context: &str) -> Option<&PatchSpec> {
        self.entries.get(context)
    }

    pub fn contexts(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Choose the PatchSpec for a run.
    ///
    /// A known context always uses its table entry. Otherwise the caller's
    /// pattern is required; an empty pattern is a configuration error.
    pub fn select(&self, context: Option<&str>, caller: &PatchSpec) -> Result<Selection> {
        let mut warnings = Vec::new();

        if let Some((name, spec)) = context.and_then(|c| self.entries.get_key_value(c)) {
            if !caller.pattern.is_empty() || !caller.replace.is_empty() {
                warnings.push(BoundaryWarning::CallerPatchIgnored {
                    context: name.clone(),
                });
            }
            return Ok(Selection {
                spec: spec.clone(),
                source: SpecSource::Context(name.clone()),
                warnings,
            });
        }

        if caller.pattern.is_empty() {
            return Err(BumpError::config(format!(
                "--pattern is required for context '{}' (known contexts: {})",
                context.unwrap_or("<unset>"),
                self.contexts().join(", ")
            )));
        }

        if !caller.replace.contains(VERSION_PLACEHOLDER) {
            warnings.push(BoundaryWarning::MissingPlaceholder {
                replace: caller.replace.clone(),
            });
        }

        Ok(Selection {
            spec: caller.clone(),
            source: SpecSource::Caller,
            warnings,
        })
    }
}
