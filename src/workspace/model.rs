use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceKind {
    Project,
    Assembly,
}

/// A declared dependency of a project: either a `<ProjectReference>` or an
/// assembly-level reference (`<Reference>` / `<PackageReference>`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    pub target_name: String,
    pub kind: ReferenceKind,
    pub target_path: Option<PathBuf>,
}

impl Reference {
    pub fn project(target_name: impl Into<String>, target_path: PathBuf) -> Self {
        Self {
            target_name: target_name.into(),
            kind: ReferenceKind::Project,
            target_path: Some(target_path),
        }
    }

    pub fn assembly(target_name: impl Into<String>) -> Self {
        Self {
            target_name: target_name.into(),
            kind: ReferenceKind::Assembly,
            target_path: None,
        }
    }
}

/// Normalised view of one project manifest, the input contract of the
/// analysis pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    /// Absolute path of the manifest; the project's identity.
    pub path: PathBuf,
    /// Target framework moniker, "unknown" when the manifest does not say.
    pub target_framework: String,
    pub language: String,
    pub solution_name: String,
    pub references: Vec<Reference>,
    /// Source files collected for the syntactic backend.
    pub source_files: Vec<PathBuf>,
    /// Non-fatal conditions hit while reading the manifest.
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionProject {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Solution {
    pub name: String,
    pub path: PathBuf,
    pub projects: Vec<SolutionProject>,
    pub warnings: Vec<String>,
}
