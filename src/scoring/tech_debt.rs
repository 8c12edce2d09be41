//! Tech-debt metric: age of the declared target framework.

use petgraph::graph::NodeIndex;

use crate::scoring::{MetricCalculator, MetricScore, ScoringContext};

/// Neutral fallback for unknown or unparseable monikers.
pub const NEUTRAL: f64 = 50.0;

/// Fixed TFM-to-debt table. Platform suffixes (`net8.0-windows`) are
/// stripped before lookup; `netstandard1.x` collapses to one bucket.
pub fn tfm_score(tfm: &str) -> Option<f64> {
    let tfm = tfm.trim().to_ascii_lowercase();
    let tfm = tfm.split('-').next().unwrap_or(&tfm);
    if tfm.starts_with("netstandard1.") {
        return Some(70.0);
    }
    let score = match tfm {
        "net20" | "net35" => 100.0,
        "net40" | "net403" => 90.0,
        "net45" | "net451" | "net452" => 80.0,
        "net46" => 70.0,
        "net461" => 65.0,
        "net462" => 60.0,
        "net47" => 50.0,
        "net471" => 45.0,
        "net472" | "net48" | "net481" => 40.0,
        "netstandard2.0" => 50.0,
        "netstandard2.1" => 35.0,
        "netcoreapp1.0" | "netcoreapp1.1" => 60.0,
        "netcoreapp2.0" | "netcoreapp2.1" | "netcoreapp2.2" => 45.0,
        "netcoreapp3.0" => 35.0,
        "netcoreapp3.1" => 30.0,
        "net5.0" => 20.0,
        "net6.0" => 10.0,
        "net7.0" => 5.0,
        "net8.0" | "net9.0" | "net10.0" => 0.0,
        _ => return None,
    };
    Some(score)
}

pub struct TechDebtCalculator;

impl MetricCalculator for TechDebtCalculator {
    fn metric(&self) -> &'static str {
        "tech_debt"
    }

    fn normalise(&self, node: NodeIndex, ctx: &ScoringContext<'_>) -> MetricScore {
        let tfm = &ctx.graph.node(node).target_framework;
        let score = tfm_score(tfm).unwrap_or(NEUTRAL);
        MetricScore::new(score, score)
    }
}
