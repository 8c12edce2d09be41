//! Name-based symbol resolution over the scanned sources.
//!
//! The "analyse project" capability either yields a [`ProjectScan`] or a
//! fallback token with the reason; downstream metrics apply their documented
//! fallbacks when a project is unavailable.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fs;

use log::{debug, warn};

#[cfg(feature = "parallel_analysis")]
use rayon::prelude::*;

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::graph::model::identity_key;
use crate::syntax::scanner::{MemberKind, SourceModel, TypeKind};
use crate::syntax::{lex, scan};
use crate::workspace::model::ProjectInfo;

/// What the index knows about one declared type.
#[derive(Debug, Clone)]
pub struct TypeEntry {
    /// Declaring assembly; by convention the project name.
    pub assembly: String,
    pub kind: TypeKind,
    /// Glyphs of user-defined operators.
    pub operators: HashSet<String>,
    /// Whether the type declares implicit/explicit conversions.
    pub has_conversions: bool,
}

/// Simple type name -> declaring assembly. Names declared by several
/// assemblies keep the first declaration in project load order.
#[derive(Debug, Clone, Default)]
pub struct TypeIndex {
    entries: HashMap<String, TypeEntry>,
}

impl TypeIndex {
    pub fn entry(&self, type_name: &str) -> Option<&TypeEntry> {
        self.entries.get(type_name)
    }

    pub fn assembly_of(&self, type_name: &str) -> Option<&str> {
        self.entries.get(type_name).map(|e| e.assembly.as_str())
    }

    pub(crate) fn absorb(&mut self, assembly: &str, model: &SourceModel) {
        for ty in &model.types {
            let operators: HashSet<String> = ty
                .members
                .iter()
                .filter_map(|m| match &m.kind {
                    MemberKind::Operator(sym) => Some(sym.clone()),
                    _ => None,
                })
                .collect();
            let has_conversions = ty
                .members
                .iter()
                .any(|m| m.kind == MemberKind::Conversion);

            match self.entries.entry(ty.name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(TypeEntry {
                        assembly: assembly.to_string(),
                        kind: ty.kind,
                        operators,
                        has_conversions,
                    });
                }
                Entry::Occupied(mut slot) => {
                    let existing = slot.get_mut();
                    if existing.assembly == assembly {
                        // partial declarations merge
                        existing.operators.extend(operators);
                        existing.has_conversions |= has_conversions;
                    } else {
                        debug!(
                            "type name {} declared by both {} and {}; resolution keeps the first",
                            ty.name, existing.assembly, assembly
                        );
                    }
                }
            }
        }
    }
}

/// Scanned sources of one project.
#[derive(Debug, Clone, Default)]
pub struct ProjectScan {
    pub models: Vec<SourceModel>,
    pub warnings: Vec<String>,
}

/// Result of the per-project analysis capability.
#[derive(Debug, Clone)]
pub enum ProjectAnalysis {
    Analyzed(ProjectScan),
    Unavailable { reason: String },
}

/// Scanned view of the whole project set plus the cross-project type index.
#[derive(Debug, Clone, Default)]
pub struct SemanticModel {
    analyses: HashMap<String, ProjectAnalysis>,
    pub type_index: TypeIndex,
}

impl SemanticModel {
    /// Scan every distinct project. Honours cancellation between projects
    /// and between files; IO failures degrade the affected project only.
    pub fn analyze(projects: &[ProjectInfo], cancel: &CancelToken) -> Result<SemanticModel> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut unique: Vec<&ProjectInfo> = Vec::new();
        for project in projects {
            if seen.insert(identity_key(&project.path)) {
                unique.push(project);
            }
        }

        #[cfg(feature = "parallel_analysis")]
        let scanned: Result<Vec<(String, ProjectAnalysis)>> = unique
            .par_iter()
            .map(|p| Ok((identity_key(&p.path), scan_project(p, cancel)?)))
            .collect();
        #[cfg(not(feature = "parallel_analysis"))]
        let scanned: Result<Vec<(String, ProjectAnalysis)>> = unique
            .iter()
            .map(|p| Ok((identity_key(&p.path), scan_project(p, cancel)?)))
            .collect();
        let analyses: HashMap<String, ProjectAnalysis> = scanned?.into_iter().collect();

        // Serial fold keeps first-declaration-wins deterministic.
        let mut type_index = TypeIndex::default();
        for project in &unique {
            if let Some(ProjectAnalysis::Analyzed(scan)) =
                analyses.get(&identity_key(&project.path))
            {
                for model in &scan.models {
                    type_index.absorb(&project.name, model);
                }
            }
        }

        Ok(SemanticModel {
            analyses,
            type_index,
        })
    }

    /// All projects unavailable; the documented metric fallbacks apply.
    pub fn disabled(projects: &[ProjectInfo]) -> SemanticModel {
        let analyses = projects
            .iter()
            .map(|p| {
                (
                    identity_key(&p.path),
                    ProjectAnalysis::Unavailable {
                        reason: "semantic analysis disabled".to_string(),
                    },
                )
            })
            .collect();
        SemanticModel {
            analyses,
            type_index: TypeIndex::default(),
        }
    }

    pub fn analysis(&self, path_key: &str) -> Option<&ProjectAnalysis> {
        self.analyses.get(path_key)
    }
}

/// Scope any per-project state to this call so memory stays bounded: file
/// contents are dropped as soon as their token model exists.
fn scan_project(project: &ProjectInfo, cancel: &CancelToken) -> Result<ProjectAnalysis> {
    cancel.checkpoint()?;
    if project.source_files.is_empty() {
        return Ok(ProjectAnalysis::Unavailable {
            reason: "no source files".to_string(),
        });
    }

    let mut scan_result = ProjectScan::default();
    for file in &project.source_files {
        cancel.checkpoint()?;
        match fs::read_to_string(file) {
            Ok(source) => {
                let tokens = lex(&source);
                scan_result.models.push(scan(&tokens));
            }
            Err(e) => {
                scan_result
                    .warnings
                    .push(format!("cannot read {}: {}", file.display(), e));
            }
        }
    }

    if scan_result.models.is_empty() {
        let reason = format!(
            "all {} source files unreadable",
            project.source_files.len()
        );
        warn!("{}: {}", project.name, reason);
        return Ok(ProjectAnalysis::Unavailable { reason });
    }
    Ok(ProjectAnalysis::Analyzed(scan_result))
}
