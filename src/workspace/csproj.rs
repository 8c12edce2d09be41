use std::fs;
use std::path::{Path, PathBuf};

use globwalk::GlobWalkerBuilder;
use quick_xml::Reader as XmlReader;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;

use crate::workspace::error::{Result, WorkspaceError};
use crate::workspace::model::{ProjectInfo, Reference};

/// Which target-framework element the reader is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TfmElement {
    Single,
    Multi,
    LegacyVersion,
}

#[derive(Default)]
struct ItemLists {
    includes: Vec<String>,
    removes: Vec<String>,
}

/// Reads one csproj manifest into a [`ProjectInfo`].
///
/// Parses a small subset of MSBuild: `<TargetFramework>`,
/// `<TargetFrameworks>`, `<TargetFrameworkVersion>`, `<ProjectReference>`,
/// `<Reference>`, `<PackageReference>` and `<Compile Include/Remove>`.
/// Conditions and macros are not evaluated; both are recorded as warnings.
pub struct CsprojReader;

impl CsprojReader {
    pub fn read(path: &Path, solution_name: &str) -> Result<ProjectInfo> {
        let path = path.canonicalize()?;
        let root = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("project")
            .to_string();

        let mut project = ProjectInfo {
            name,
            path: path.clone(),
            target_framework: "unknown".to_string(),
            language: "C#".to_string(),
            solution_name: solution_name.to_string(),
            references: Vec::new(),
            source_files: Vec::new(),
            warnings: Vec::new(),
        };

        let content = fs::read_to_string(&path)?;
        let mut reader = XmlReader::from_str(&content);
        reader.trim_text(true);

        let mut items = ItemLists::default();
        let mut tfm_single: Option<String> = None;
        let mut tfm_multi: Option<String> = None;
        let mut tfm_legacy: Option<String> = None;
        let mut in_tfm: Option<TfmElement> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    in_tfm = match e.name().as_ref().to_ascii_lowercase().as_slice() {
                        b"targetframework" => Some(TfmElement::Single),
                        b"targetframeworks" => Some(TfmElement::Multi),
                        b"targetframeworkversion" => Some(TfmElement::LegacyVersion),
                        _ => None,
                    };
                    Self::handle_element(&e, &root, &mut project, &mut items);
                }
                Ok(Event::Empty(e)) => {
                    Self::handle_element(&e, &root, &mut project, &mut items);
                }
                Ok(Event::Text(t)) => {
                    if let Some(kind) = in_tfm {
                        let text = t
                            .unescape()
                            .map(|v| v.trim().to_string())
                            .unwrap_or_default();
                        if !text.is_empty() {
                            match kind {
                                TfmElement::Single => tfm_single = Some(text),
                                TfmElement::Multi => tfm_multi = Some(text),
                                TfmElement::LegacyVersion => tfm_legacy = Some(text),
                            }
                        }
                    }
                }
                Ok(Event::End(_)) => in_tfm = None,
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(WorkspaceError::ProjectParse(format!(
                        "XML parse error in {}: {}",
                        path.display(),
                        e
                    )));
                }
                _ => {}
            }
        }

        // Precedence: TargetFramework, then the first TargetFrameworks entry,
        // then the legacy TargetFrameworkVersion converted (v4.7.2 -> net472).
        project.target_framework = tfm_single
            .or_else(|| {
                tfm_multi.and_then(|list| {
                    list.split(';')
                        .map(str::trim)
                        .find(|s| !s.is_empty())
                        .map(str::to_string)
                })
            })
            .or_else(|| tfm_legacy.as_deref().and_then(convert_framework_version))
            .unwrap_or_else(|| "unknown".to_string());

        project.source_files = Self::collect_sources(
            &root,
            &items.includes,
            &items.removes,
            &mut project.warnings,
        );

        Ok(project)
    }

    fn handle_element(
        e: &BytesStart<'_>,
        root: &Path,
        project: &mut ProjectInfo,
        items: &mut ItemLists,
    ) {
        let elem = e.name().as_ref().to_ascii_lowercase();
        for a in e.attributes().flatten() {
            let key = a.key.as_ref();
            let value = a
                .unescape_value()
                .ok()
                .map(|v| v.trim().to_string())
                .unwrap_or_default();
            if key.eq_ignore_ascii_case(b"condition") {
                project.warnings.push(format!(
                    "MSBuild Condition not evaluated on <{}>: {}",
                    String::from_utf8_lossy(&elem),
                    value
                ));
                continue;
            }
            let is_include = key.eq_ignore_ascii_case(b"include");
            let is_remove = key.eq_ignore_ascii_case(b"remove");
            let is_update = key.eq_ignore_ascii_case(b"update");
            if !is_include && !is_remove && !is_update {
                continue;
            }
            let val_clean = value.replace('\\', "/");
            if val_clean.is_empty() {
                continue;
            }
            if val_clean.contains("$(") {
                project.warnings.push(format!(
                    "MSBuild macro not expanded on <{} {}>: {}",
                    String::from_utf8_lossy(&elem),
                    String::from_utf8_lossy(key),
                    val_clean
                ));
            }

            if elem.ends_with(b"projectreference") && is_include {
                let reference = Self::project_reference(root, &val_clean, &mut project.warnings);
                project.references.push(reference);
            } else if elem.as_slice() == b"reference" && is_include {
                // Strong names carry ", Version=..." tails
                let assembly = val_clean
                    .split(',')
                    .next()
                    .unwrap_or(&val_clean)
                    .trim()
                    .to_string();
                if !assembly.is_empty() {
                    project.references.push(Reference::assembly(assembly));
                }
            } else if elem.ends_with(b"packagereference") && is_include {
                project.references.push(Reference::assembly(val_clean));
            } else if elem.ends_with(b"compile") {
                if is_include || is_update {
                    items.includes.push(val_clean);
                } else if is_remove {
                    items.removes.push(val_clean);
                }
            }
        }
    }

    fn project_reference(root: &Path, include: &str, warnings: &mut Vec<String>) -> Reference {
        let target_name = Path::new(include)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(include)
            .to_string();
        let joined = root.join(include);
        let resolved = match joined.canonicalize() {
            Ok(abs) => abs,
            Err(_) => {
                warnings.push(format!("unresolved ProjectReference: {}", joined.display()));
                joined
            }
        };
        Reference::project(target_name, resolved)
    }

    /// Default SDK-style source set: `**/*.cs` under the project root minus
    /// `bin/`, `obj/` and `.git/`, plus explicit Compile includes, minus
    /// explicit Compile removes.
    fn collect_sources(
        root: &Path,
        includes: &[String],
        removes: &[String],
        warnings: &mut Vec<String>,
    ) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = Vec::new();
        Self::collect_glob(root, "**/*.cs", &mut files, warnings);
        for pattern in includes {
            Self::collect_glob(root, pattern, &mut files, warnings);
        }

        let mut drop_set: Vec<PathBuf> = Vec::new();
        for pattern in ["bin/**", "obj/**", ".git/**"]
            .iter()
            .map(|s| s.to_string())
            .chain(removes.iter().cloned())
        {
            Self::collect_glob(root, &pattern, &mut drop_set, warnings);
        }
        files.retain(|f| !drop_set.contains(f));

        files.sort();
        files.dedup();
        files.retain(|f| {
            f.extension()
                .and_then(|s| s.to_str())
                .map(|e| e.eq_ignore_ascii_case("cs"))
                .unwrap_or(false)
        });
        files
    }

    fn collect_glob(root: &Path, pattern: &str, out: &mut Vec<PathBuf>, warnings: &mut Vec<String>) {
        let walker = GlobWalkerBuilder::from_patterns(root, &[pattern])
            .case_insensitive(true)
            .build();
        match walker {
            Ok(w) => {
                for entry in w.filter_map(|r| r.ok()) {
                    if entry.file_type().is_file() {
                        let p = entry.path();
                        out.push(p.canonicalize().unwrap_or_else(|_| p.to_path_buf()));
                    }
                }
            }
            Err(e) => warnings.push(format!("glob error for '{pattern}': {e}")),
        }
    }
}

/// `v4.7.2` becomes `net472`: drop the `v` and the dots.
fn convert_framework_version(version: &str) -> Option<String> {
    let digits: String = version
        .trim()
        .strip_prefix(['v', 'V'])?
        .chars()
        .filter(|c| *c != '.')
        .collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(format!("net{digits}"))
}
