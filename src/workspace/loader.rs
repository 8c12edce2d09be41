use std::collections::HashSet;
use std::path::{Path, PathBuf};

use globwalk::GlobWalkerBuilder;
use log::{debug, warn};

use crate::workspace::csproj::CsprojReader;
use crate::workspace::error::{Result, WorkspaceError};
use crate::workspace::model::ProjectInfo;
use crate::workspace::sln::SolutionReader;

/// A loaded set of projects, in deterministic discovery order.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    pub root: PathBuf,
    /// Solution names in load order; empty when loading bare projects.
    pub solutions: Vec<String>,
    pub projects: Vec<ProjectInfo>,
}

/// Turns an input path into a [`Workspace`].
///
/// Three-layer fallback: a `.sln` file is authoritative; a `.csproj` file is
/// accepted directly; a directory is scanned for solutions first, then for
/// project files. Transitive `ProjectReference` targets are followed.
pub struct WorkspaceLoader;

impl WorkspaceLoader {
    pub fn from_path(path: &Path) -> Result<Workspace> {
        let path = path.canonicalize()?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("sln") => {
                let root = path.parent().unwrap_or(Path::new(".")).to_path_buf();
                let mut workspace = Workspace {
                    root,
                    ..Workspace::default()
                };
                Self::load_solution(&path, &mut workspace)?;
                Ok(workspace)
            }
            Some("csproj") => {
                let root = path.parent().unwrap_or(Path::new(".")).to_path_buf();
                let name = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("project")
                    .to_string();
                let mut workspace = Workspace {
                    root,
                    solutions: vec![name.clone()],
                    projects: Vec::new(),
                };
                Self::load_closure(vec![path], &name, &mut workspace.projects);
                Ok(workspace)
            }
            _ if path.is_dir() => Self::from_dir(&path),
            _ => Err(WorkspaceError::NotFound(path.display().to_string())),
        }
    }

    /// Directories prefer solutions; bare csproj scanning is the last layer.
    fn from_dir(dir: &Path) -> Result<Workspace> {
        let slns = Self::find_files(dir, "**/*.sln");
        if !slns.is_empty() {
            let mut workspace = Workspace {
                root: dir.to_path_buf(),
                ..Workspace::default()
            };
            for sln in &slns {
                Self::load_solution(sln, &mut workspace)?;
            }
            return Ok(workspace);
        }

        let csprojs = Self::find_files(dir, "**/*.csproj");
        if csprojs.is_empty() {
            return Err(WorkspaceError::NotFound(dir.display().to_string()));
        }
        let name = dir
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("workspace")
            .to_string();
        let mut workspace = Workspace {
            root: dir.to_path_buf(),
            solutions: vec![name.clone()],
            projects: Vec::new(),
        };
        Self::load_closure(csprojs, &name, &mut workspace.projects);
        Ok(workspace)
    }

    fn load_solution(path: &Path, workspace: &mut Workspace) -> Result<()> {
        let solution = SolutionReader::read(path)?;
        for warning in &solution.warnings {
            warn!("{}: {}", solution.name, warning);
        }
        let seeds: Vec<PathBuf> = solution.projects.iter().map(|p| p.path.clone()).collect();
        Self::load_closure(seeds, &solution.name, &mut workspace.projects);
        workspace.solutions.push(solution.name);
        Ok(())
    }

    /// Breadth-first load of the given manifests plus every transitively
    /// referenced project. Unreadable manifests are skipped with a warning
    /// so one broken project does not sink the run.
    fn load_closure(seeds: Vec<PathBuf>, solution_name: &str, out: &mut Vec<ProjectInfo>) {
        let mut visited: HashSet<PathBuf> = HashSet::new();
        let mut queue: Vec<PathBuf> = seeds;
        let mut next: Vec<PathBuf> = Vec::new();

        while !queue.is_empty() {
            for path in queue.drain(..) {
                let key = path.canonicalize().unwrap_or_else(|_| path.clone());
                if !visited.insert(key) {
                    continue;
                }
                match CsprojReader::read(&path, solution_name) {
                    Ok(project) => {
                        debug!(
                            "loaded {} ({} references, {} sources)",
                            project.name,
                            project.references.len(),
                            project.source_files.len()
                        );
                        for reference in &project.references {
                            if let Some(target) = &reference.target_path {
                                if target.exists() {
                                    next.push(target.clone());
                                }
                            }
                        }
                        out.push(project);
                    }
                    Err(e) => warn!("skipping project {}: {}", path.display(), e),
                }
            }
            std::mem::swap(&mut queue, &mut next);
        }
    }

    fn find_files(dir: &Path, pattern: &str) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = Vec::new();
        if let Ok(walker) = GlobWalkerBuilder::from_patterns(dir, &[pattern])
            .case_insensitive(true)
            .build()
        {
            for entry in walker.filter_map(|r| r.ok()) {
                if entry.file_type().is_file() {
                    let p = entry.path();
                    found.push(p.canonicalize().unwrap_or_else(|_| p.to_path_buf()));
                }
            }
        }
        found.sort();
        found
    }
}
