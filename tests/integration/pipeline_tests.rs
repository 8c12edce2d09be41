use depscope::cancel::CancelToken;
use depscope::config::AnalyzerConfig;
use depscope::emit::dot::{DotEmitter, DotOptions};
use depscope::error::AnalyzerError;
use depscope::pipeline::{AnalysisPipeline, PipelineOptions};
use depscope::report::AnalysisReport;
use depscope::workspace::WorkspaceLoader;

use crate::common::{edge_between, three_node_cycle, unique_temp_dir, write, write_csproj};

/// A -> B -> C -> A on disk, with call-site counts 2 / 10 / 2.
fn ring_workspace() -> std::path::PathBuf {
    let root = unique_temp_dir("depscope_e2e_ring");
    write_csproj(&root, "A", "net8.0", &["B"]);
    write_csproj(&root, "B", "net8.0", &["C"]);
    write_csproj(&root, "C", "net8.0", &["A"]);

    write(
        &root.join("A/AThing.cs"),
        r#"
        public class AThing
        {
            public void Run() { }
            public void Go(BThing b) { b.Run(); b.Run(); }
        }
        "#,
    );
    let many_calls = "c.Run(); ".repeat(10);
    write(
        &root.join("B/BThing.cs"),
        &format!(
            "public class BThing\n{{\n    public void Run() {{ }}\n    public void Go(CThing c) {{ {many_calls}}}\n}}\n"
        ),
    );
    write(
        &root.join("C/CThing.cs"),
        r#"
        public class CThing
        {
            public void Run() { }
            public void Go(AThing a) { a.Run(); a.Run(); }
        }
        "#,
    );
    root
}

#[test]
fn end_to_end_ring_detects_and_ranks() {
    let root = ring_workspace();
    let workspace = WorkspaceLoader::from_path(&root).unwrap();
    assert_eq!(workspace.projects.len(), 3);

    let output = AnalysisPipeline::run(
        &workspace.projects,
        &AnalyzerConfig::default(),
        &PipelineOptions::default(),
        &CancelToken::new(),
    )
    .unwrap();

    // S1 shape
    assert_eq!(output.cycle_stats.total_cycles, 1);
    assert_eq!(output.cycle_stats.largest_cycle_size, 3);
    assert_eq!(output.cycle_stats.distinct_projects_in_cycles, 3);
    assert_eq!(output.cycle_stats.participation_rate, 100.0);

    // S2 annotation: A->B 2, B->C 10, C->A 2
    let ab = edge_between(&output.graph, "A", "B").unwrap();
    let bc = edge_between(&output.graph, "B", "C").unwrap();
    let ca = edge_between(&output.graph, "C", "A").unwrap();
    assert_eq!(output.graph.graph[ab].coupling_score, 2);
    assert_eq!(output.graph.graph[bc].coupling_score, 10);
    assert_eq!(output.graph.graph[ca].coupling_score, 2);

    let cycle = &output.cycles[0];
    assert_eq!(cycle.weak_coupling_score, Some(2));
    assert_eq!(cycle.weak_edges.len(), 2);

    assert_eq!(output.suggestions.len(), 2);
    assert_eq!(output.suggestions[0].source, "A");
    assert_eq!(output.suggestions[0].target, "B");
    assert_eq!(output.suggestions[0].rank, 1);
    assert_eq!(output.suggestions[1].source, "C");
    assert_eq!(output.suggestions[1].rank, 2);

    // scores cover every project and buckets add up
    assert_eq!(output.score_stats.total, 3);
    assert_eq!(
        output.score_stats.easy + output.score_stats.medium + output.score_stats.hard,
        3
    );

    // re-running the annotated pipeline reproduces every coupling score
    let again = AnalysisPipeline::run(
        &workspace.projects,
        &AnalyzerConfig::default(),
        &PipelineOptions::default(),
        &CancelToken::new(),
    )
    .unwrap();
    let ab2 = edge_between(&again.graph, "A", "B").unwrap();
    assert_eq!(again.graph.graph[ab2].coupling_score, 2);
}

#[test]
fn dot_overlay_marks_breaks_and_cycles() {
    let root = ring_workspace();
    let workspace = WorkspaceLoader::from_path(&root).unwrap();
    let output = AnalysisPipeline::run(
        &workspace.projects,
        &AnalyzerConfig::default(),
        &PipelineOptions::default(),
        &CancelToken::new(),
    )
    .unwrap();

    let dot = DotEmitter::emit(
        &output.graph,
        &output.cycles,
        &output.suggestions,
        Some(&output.ranked.ordered),
        &DotOptions::default(),
    );
    // weak edges are suggested breaks, the strong edge stays red
    assert!(dot.text.contains("\"A\" -> \"B\" [color=yellow, style=bold];"));
    assert!(dot.text.contains("\"C\" -> \"A\" [color=yellow, style=bold];"));
    assert!(dot.text.contains("\"B\" -> \"C\" [color=red, style=bold];"));

    // deterministic emission
    let dot2 = DotEmitter::emit(
        &output.graph,
        &output.cycles,
        &output.suggestions,
        Some(&output.ranked.ordered),
        &DotOptions::default(),
    );
    assert_eq!(dot.text, dot2.text);
}

#[test]
fn report_serialises_the_whole_run() {
    let root = ring_workspace();
    let workspace = WorkspaceLoader::from_path(&root).unwrap();
    let output = AnalysisPipeline::run(
        &workspace.projects,
        &AnalyzerConfig::default(),
        &PipelineOptions::default(),
        &CancelToken::new(),
    )
    .unwrap();
    let report = AnalysisReport::from_output(&output);
    let json = serde_json::to_string_pretty(&report).unwrap();
    assert!(json.contains("\"cycle_statistics\""));
    assert!(json.contains("\"recommendations\""));
    assert!(json.contains("method call"));
}

#[test]
fn no_semantic_mode_keeps_default_coupling() {
    let root = ring_workspace();
    let workspace = WorkspaceLoader::from_path(&root).unwrap();
    let output = AnalysisPipeline::run(
        &workspace.projects,
        &AnalyzerConfig::default(),
        &PipelineOptions { semantic: false },
        &CancelToken::new(),
    )
    .unwrap();
    let bc = edge_between(&output.graph, "B", "C").unwrap();
    assert_eq!(output.graph.graph[bc].coupling_score, 1);
    // degradation warnings were recorded (annotator + scorer)
    assert!(!output.warnings.is_empty());
}

#[test]
fn cancellation_aborts_without_output() {
    let root = ring_workspace();
    let workspace = WorkspaceLoader::from_path(&root).unwrap();
    let cancel = CancelToken::new();
    cancel.cancel();
    let err = AnalysisPipeline::run(
        &workspace.projects,
        &AnalyzerConfig::default(),
        &PipelineOptions::default(),
        &cancel,
    )
    .unwrap_err();
    assert!(matches!(err, AnalyzerError::Cancelled));
}

#[test]
fn config_errors_surface_before_stages() {
    let root = ring_workspace();
    let workspace = WorkspaceLoader::from_path(&root).unwrap();
    let mut config = AnalyzerConfig::default();
    config.scoring_weights.coupling = 0.9;
    let err = AnalysisPipeline::run(
        &workspace.projects,
        &config,
        &PipelineOptions::default(),
        &CancelToken::new(),
    )
    .unwrap_err();
    assert!(matches!(err, AnalyzerError::Config { .. }));
}

#[test]
fn duplicate_paths_with_distinct_names_are_an_input_error() {
    let mut projects = three_node_cycle();
    projects[1].path = projects[0].path.clone();
    let err = AnalysisPipeline::run(
        &projects,
        &AnalyzerConfig::default(),
        &PipelineOptions { semantic: false },
        &CancelToken::new(),
    )
    .unwrap_err();
    assert!(matches!(err, AnalyzerError::Input { .. }));
}

#[test]
fn framework_edges_are_filtered_from_the_pipeline_graph() {
    let root = unique_temp_dir("depscope_e2e_filter");
    let path = root.join("App/App.csproj");
    write(
        &path,
        r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
  </PropertyGroup>
  <ItemGroup>
    <PackageReference Include="Microsoft.Extensions.Logging" Version="8.0.0" />
    <PackageReference Include="Contoso.Billing" Version="1.0.0" />
  </ItemGroup>
</Project>
"#,
    );
    write(&root.join("App/App.cs"), "class App { }");

    let workspace = WorkspaceLoader::from_path(&root).unwrap();
    let output = AnalysisPipeline::run(
        &workspace.projects,
        &AnalyzerConfig::default(),
        &PipelineOptions::default(),
        &CancelToken::new(),
    )
    .unwrap();

    // vertices preserved, framework edge gone
    assert_eq!(output.graph.vertex_count(), 3);
    assert_eq!(output.graph.edge_count(), 1);
    assert!(edge_between(&output.graph, "App", "Contoso.Billing").is_some());
    assert!(edge_between(&output.graph, "App", "Microsoft.Extensions.Logging").is_none());
}
