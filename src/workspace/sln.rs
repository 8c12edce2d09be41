use std::fs;
use std::path::Path;

use regex::Regex;

use crate::workspace::error::{Result, WorkspaceError};
use crate::workspace::model::{Solution, SolutionProject};

/// Reads Visual Studio solution files.
///
/// Solution files are line-oriented; only the `Project(...)` entries matter
/// here. Non-C# project types (vcxproj, solution folders, ...) are skipped.
pub struct SolutionReader;

impl SolutionReader {
    pub fn read(path: &Path) -> Result<Solution> {
        let path = path.canonicalize()?;
        let content = fs::read_to_string(&path)?;
        let root = path.parent().unwrap_or(Path::new("."));
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("solution")
            .to_string();

        // Project("{type-guid}") = "Name", "rel\path.csproj", "{project-guid}"
        let line = Regex::new(
            r#"(?m)^\s*Project\("\{[0-9A-Fa-f\-]+\}"\)\s*=\s*"([^"]+)"\s*,\s*"([^"]+)"\s*,"#,
        )
        .map_err(|e| WorkspaceError::SolutionParse(e.to_string()))?;

        let mut solution = Solution {
            name,
            path: path.clone(),
            projects: Vec::new(),
            warnings: Vec::new(),
        };

        for captures in line.captures_iter(&content) {
            let project_name = captures[1].to_string();
            let rel = captures[2].replace('\\', "/");
            if !rel.to_ascii_lowercase().ends_with(".csproj") {
                continue;
            }
            let joined = root.join(&rel);
            match joined.canonicalize() {
                Ok(abs) => solution.projects.push(SolutionProject {
                    name: project_name,
                    path: abs,
                }),
                Err(_) => {
                    solution.warnings.push(format!(
                        "solution entry '{}' points at missing project {}",
                        project_name,
                        joined.display()
                    ));
                }
            }
        }

        if solution.projects.is_empty() && solution.warnings.is_empty() {
            solution
                .warnings
                .push(format!("no C# projects listed in {}", path.display()));
        }

        Ok(solution)
    }
}
