use std::path::PathBuf;

use depscope::error::AnalyzerError;
use depscope::graph::builder::GraphBuilder;
use depscope::workspace::model::Reference;

use crate::common::{assembly_ref, project, project_ref, three_node_cycle};

#[test]
fn one_vertex_per_project_one_edge_per_reference() {
    let projects = three_node_cycle();
    let output = GraphBuilder::build(&projects).unwrap();
    assert_eq!(output.graph.vertex_count(), 3);
    assert_eq!(output.graph.edge_count(), 3);
    assert!(output.warnings.is_empty());
}

#[test]
fn project_reference_falls_back_to_name_match() {
    // the reference path points nowhere useful, but the name resolves
    let mut projects = vec![
        project("App", "Main", Vec::new()),
        project("Lib", "Main", Vec::new()),
    ];
    projects[0].references.push(Reference {
        target_name: "Lib".to_string(),
        kind: depscope::workspace::model::ReferenceKind::Project,
        target_path: Some(PathBuf::from("/elsewhere/Lib.csproj")),
    });
    let output = GraphBuilder::build(&projects).unwrap();
    assert_eq!(output.graph.edge_count(), 1);
    assert!(output.warnings.is_empty());
}

#[test]
fn unresolved_project_reference_warns_and_drops() {
    let projects = vec![project("App", "Main", vec![project_ref("Ghost", "Main")])];
    let output = GraphBuilder::build(&projects).unwrap();
    assert_eq!(output.graph.vertex_count(), 1);
    assert_eq!(output.graph.edge_count(), 0);
    assert_eq!(output.warnings.len(), 1);
    assert!(output.warnings[0].contains("Ghost"));
}

#[test]
fn unresolved_assembly_reference_becomes_synthetic_vertex() {
    let projects = vec![project(
        "App",
        "Main",
        vec![assembly_ref("Newtonsoft.Json")],
    )];
    let output = GraphBuilder::build(&projects).unwrap();
    assert_eq!(output.graph.vertex_count(), 2);
    assert_eq!(output.graph.edge_count(), 1);
    let synthetic = output.graph.lookup_name("Newtonsoft.Json").unwrap();
    assert!(output.graph.node(synthetic).synthetic);
    // synthetic assemblies inherit the referencing project's solution
    assert_eq!(output.graph.node(synthetic).solution, "Main");
}

#[test]
fn assembly_reference_to_known_project_resolves_by_name() {
    let projects = vec![
        project("App", "Main", vec![assembly_ref("Lib")]),
        project("Lib", "Main", Vec::new()),
    ];
    let output = GraphBuilder::build(&projects).unwrap();
    assert_eq!(output.graph.vertex_count(), 2);
    let lib = output.graph.lookup_name("Lib").unwrap();
    assert!(!output.graph.node(lib).synthetic);
}

#[test]
fn duplicate_identities_collapse_and_first_solution_wins() {
    let mut first = project("Shared", "Alpha", Vec::new());
    let mut second = project("Shared", "Beta", Vec::new());
    // same canonical path in both solutions
    let path = PathBuf::from("/virtual/common/Shared/Shared.csproj");
    first.path = path.clone();
    second.path = path;
    let output = GraphBuilder::build(&[first, second]).unwrap();
    assert_eq!(output.graph.vertex_count(), 1);
    let shared = output.graph.lookup_name("Shared").unwrap();
    assert_eq!(output.graph.node(shared).solution, "Alpha");
}

#[test]
fn conflicting_names_at_one_path_is_an_input_error() {
    let mut first = project("One", "Main", Vec::new());
    let mut second = project("Two", "Main", Vec::new());
    let path = PathBuf::from("/virtual/x/Project.csproj");
    first.path = path.clone();
    second.path = path;
    let err = GraphBuilder::build(&[first, second]).unwrap_err();
    assert!(matches!(err, AnalyzerError::Input { .. }));
}

#[test]
fn self_references_are_dropped_with_a_warning() {
    let projects = vec![project("App", "Main", vec![project_ref("App", "Main")])];
    let output = GraphBuilder::build(&projects).unwrap();
    assert_eq!(output.graph.edge_count(), 0);
    assert!(output.warnings.iter().any(|w| w.contains("self-referencing")));
}

#[test]
fn duplicate_references_produce_one_edge() {
    let projects = vec![
        project(
            "App",
            "Main",
            vec![project_ref("Lib", "Main"), project_ref("Lib", "Main")],
        ),
        project("Lib", "Main", Vec::new()),
    ];
    let output = GraphBuilder::build(&projects).unwrap();
    assert_eq!(output.graph.edge_count(), 1);
}
