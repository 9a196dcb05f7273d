//! Rewrites the version embedded in the target file.
//!
//! The whole file is read, every non-overlapping match of the pattern is
//! replaced in a single pass, and the result is written back atomically.

use crate::domain::CompiledPatch;
use crate::error::{BumpError, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Whether [apply_to_file] may write the result back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Write,
    DryRun,
}

/// Text after substitution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patched {
    pub text: String,
    pub replacements: usize,
}

/// Outcome of patching a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    /// Number of pattern matches that were replaced
    pub replacements: usize,
    /// Whether the file content differs from what was read
    pub changed: bool,
    /// Whether the file was written back
    pub written: bool,
}

/// Replace all matches of `patch` in `text` with its template filled with `version`.
///
/// Zero matches leaves the text untouched.
pub fn apply_to_text(text: &str, patch: &CompiledPatch, version: &str) -> Patched {
    let replacements = patch.regex.find_iter(text).count();
    if replacements == 0 {
        return Patched {
            text: text.to_string(),
            replacements,
        };
    }

    let text = patch
        .regex
        .replace_all(text, |caps: &regex::Captures<'_>| {
            patch.replacement_for(caps, version)
        })
        .into_owned();

    Patched { text, replacements }
}

/// Patch the file at `path` in place.
///
/// The file is only rewritten when its content actually changes, so an
/// already up-to-date Dockerfile keeps its mtime and stays clean in git.
pub fn apply_to_file(
    path: &Path,
    patch: &CompiledPatch,
    version: &str,
    mode: WriteMode,
) -> Result<PatchReport> {
    let original = fs::read_to_string(path).map_err(|e| BumpError::file_io(path, e))?;
    let patched = apply_to_text(&original, patch, version);
    let changed = patched.text != original;

    tracing::debug!(
        path = %path.display(),
        replacements = patched.replacements,
        changed,
        "applied patch"
    );

    let written = changed && mode == WriteMode::Write;
    if written {
        atomic_write(path, patched.text.as_bytes()).map_err(|e| BumpError::file_io(path, e))?;
    }

    Ok(PatchReport {
        replacements: patched.replacements,
        changed,
        written,
    })
}

/// Atomic file write: tempfile + fsync + rename, keeping the original permissions.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path)?.permissions();

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    fs::set_permissions(temp.path(), permissions)?;

    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
