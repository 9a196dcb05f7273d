//! Domain logic - pure rules independent of the network and git

pub mod patch;
pub mod repo;
pub mod version;

pub use patch::{CompiledPatch, ContextTable, PatchSpec, Selection, SpecSource};
pub use repo::RepoSlug;
pub use version::{NormalizedVersion, Precision, ReleaseTag};
