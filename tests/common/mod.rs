#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use depscope::graph::model::DependencyGraph;
use depscope::workspace::model::{ProjectInfo, Reference, ReferenceKind};

pub fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut dir = std::env::temp_dir();
    dir.push(format!("{}_{}", prefix, nanos));
    fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut f = fs::File::create(path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
}

/// An in-memory project record for builder-level tests that need no
/// filesystem.
pub fn project(name: &str, solution: &str, references: Vec<Reference>) -> ProjectInfo {
    ProjectInfo {
        name: name.to_string(),
        path: PathBuf::from(format!("/virtual/{solution}/{name}/{name}.csproj")),
        target_framework: "net8.0".to_string(),
        language: "C#".to_string(),
        solution_name: solution.to_string(),
        references,
        source_files: Vec::new(),
        warnings: Vec::new(),
    }
}

pub fn project_ref(target: &str, solution: &str) -> Reference {
    Reference {
        target_name: target.to_string(),
        kind: ReferenceKind::Project,
        target_path: Some(PathBuf::from(format!(
            "/virtual/{solution}/{target}/{target}.csproj"
        ))),
    }
}

pub fn assembly_ref(target: &str) -> Reference {
    Reference {
        target_name: target.to_string(),
        kind: ReferenceKind::Assembly,
        target_path: None,
    }
}

/// A ring A -> B -> C -> A within one solution.
pub fn three_node_cycle() -> Vec<ProjectInfo> {
    vec![
        project("A", "Main", vec![project_ref("B", "Main")]),
        project("B", "Main", vec![project_ref("C", "Main")]),
        project("C", "Main", vec![project_ref("A", "Main")]),
    ]
}

pub fn edge_between(
    graph: &DependencyGraph,
    source: &str,
    target: &str,
) -> Option<petgraph::graph::EdgeIndex> {
    graph.graph.edge_indices().find(|e| {
        graph
            .graph
            .edge_endpoints(*e)
            .map(|(s, t)| graph.node(s).name == source && graph.node(t).name == target)
            .unwrap_or(false)
    })
}

/// Write a minimal SDK-style csproj with the given project references.
pub fn write_csproj(dir: &Path, name: &str, tfm: &str, refs: &[&str]) -> PathBuf {
    let mut items = String::new();
    for r in refs {
        items.push_str(&format!(
            "    <ProjectReference Include=\"../{r}/{r}.csproj\" />\n"
        ));
    }
    let content = format!(
        "<Project Sdk=\"Microsoft.NET.Sdk\">\n  <PropertyGroup>\n    <TargetFramework>{tfm}</TargetFramework>\n  </PropertyGroup>\n  <ItemGroup>\n{items}  </ItemGroup>\n</Project>\n"
    );
    let path = dir.join(name).join(format!("{name}.csproj"));
    write(&path, &content);
    path
}
