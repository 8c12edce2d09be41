use depscope::cancel::CancelToken;
use depscope::config::ScoringWeights;
use depscope::error::AnalyzerError;
use depscope::graph::builder::GraphBuilder;
use depscope::scoring::{
    DifficultyCategory, ExtractionScorer, MetricScore, ProjectMetrics, combine, rank,
};
use depscope::semantic::SemanticModel;

use crate::common::{project, project_ref, three_node_cycle, unique_temp_dir, write};

#[test]
fn composition_matches_the_weighted_sum() {
    // S4: coupling 50, complexity 60, tech debt 40, exposure 66 -> 52.6
    let metrics = ProjectMetrics {
        coupling: MetricScore::new(0.0, 50.0),
        complexity: MetricScore::new(0.0, 60.0),
        tech_debt: MetricScore::new(0.0, 40.0),
        api_exposure: MetricScore::new(0.0, 66.0),
    };
    let final_score = combine(&ScoringWeights::default(), &metrics);
    assert!((final_score - 52.6).abs() < 1e-9);
    assert_eq!(
        DifficultyCategory::from_score(final_score),
        DifficultyCategory::Medium
    );
}

#[test]
fn invalid_weights_fail_the_run() {
    let graph = GraphBuilder::build(&three_node_cycle()).unwrap().graph;
    let semantic = SemanticModel::disabled(&[]);
    let weights = ScoringWeights {
        coupling: 0.40,
        complexity: 0.30,
        tech_debt: 0.20,
        external_exposure: 0.08,
    };
    let err = ExtractionScorer::score(&graph, &semantic, &weights, &CancelToken::new()).unwrap_err();
    assert!(matches!(err, AnalyzerError::Config { .. }));
}

#[test]
fn fallback_metrics_apply_without_semantic_analysis() {
    let projects = vec![
        project("A", "Main", vec![project_ref("B", "Main")]),
        project("B", "Main", Vec::new()),
    ];
    let graph = GraphBuilder::build(&projects).unwrap().graph;
    let semantic = SemanticModel::disabled(&projects);
    let output = ExtractionScorer::score(
        &graph,
        &semantic,
        &ScoringWeights::default(),
        &CancelToken::new(),
    )
    .unwrap();

    assert_eq!(output.scores.len(), 2);
    // one warning per degraded project
    assert_eq!(output.warnings.len(), 2);
    for score in &output.scores {
        assert_eq!(score.metrics.complexity.normalised, 50.0);
        assert_eq!(score.metrics.api_exposure.normalised, 0.0);
        // net8.0 fixtures carry zero tech debt
        assert_eq!(score.metrics.tech_debt.normalised, 0.0);
        assert!(score.final_score >= 0.0 && score.final_score <= 100.0);
    }

    // B has indegree 1, outdegree 0 -> raw 2; A has outdegree 1 -> raw 1
    let a = output.scores.iter().find(|s| s.project == "A").unwrap();
    let b = output.scores.iter().find(|s| s.project == "B").unwrap();
    assert_eq!(b.metrics.coupling.normalised, 100.0);
    assert_eq!(a.metrics.coupling.normalised, 50.0);
}

#[test]
fn categories_and_buckets_agree() {
    let projects = three_node_cycle();
    let graph = GraphBuilder::build(&projects).unwrap().graph;
    let semantic = SemanticModel::disabled(&projects);
    let output = ExtractionScorer::score(
        &graph,
        &semantic,
        &ScoringWeights::default(),
        &CancelToken::new(),
    )
    .unwrap();
    let (ranked, stats) = rank(&output.scores);

    assert_eq!(stats.total, output.scores.len());
    assert_eq!(stats.easy + stats.medium + stats.hard, stats.total);
    for score in &ranked.ordered {
        assert_eq!(score.category, DifficultyCategory::from_score(score.final_score));
    }
    // ascending order
    for pair in ranked.ordered.windows(2) {
        assert!(pair[0].final_score <= pair[1].final_score);
    }
}

#[test]
fn scored_projects_reflect_real_sources() {
    let root = unique_temp_dir("depscope_scoring_semantic");
    let csproj = root.join("App/App.csproj");
    write(
        &csproj,
        "<Project Sdk=\"Microsoft.NET.Sdk\"><PropertyGroup><TargetFramework>net472</TargetFramework></PropertyGroup></Project>",
    );
    write(
        &root.join("App/Service.cs"),
        r#"
        public class Service
        {
            public int Branchy(int x)
            {
                if (x > 0) { return 1; }
                if (x < -10 && x > -20) { return 2; }
                return 0;
            }
        }
        "#,
    );

    let ws = depscope::workspace::WorkspaceLoader::from_path(&csproj).unwrap();
    let graph = GraphBuilder::build(&ws.projects).unwrap().graph;
    let semantic = SemanticModel::analyze(&ws.projects, &CancelToken::new()).unwrap();
    let output = ExtractionScorer::score(
        &graph,
        &semantic,
        &ScoringWeights::default(),
        &CancelToken::new(),
    )
    .unwrap();

    assert!(output.warnings.is_empty());
    let app = &output.scores[0];
    // one unit: 1 + if + if + && = 4 decision-adjusted complexity
    assert!((app.metrics.complexity.raw - 4.0).abs() < 1e-9);
    // net472 scores 40 on the debt table
    assert_eq!(app.metrics.tech_debt.normalised, 40.0);
    assert_eq!(app.metrics.api_exposure.normalised, 0.0);
}
