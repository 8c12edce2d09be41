//! External-API metric: how much public surface the project exposes via
//! Web API controllers, legacy WebMethods and WCF service contracts.

use petgraph::graph::NodeIndex;

use crate::scoring::{MetricCalculator, MetricScore, ScoringContext};
use crate::semantic::ProjectAnalysis;
use crate::syntax::scanner::{SourceModel, TypeKind};

const HTTP_VERB_ATTRIBUTES: &[&str] = &[
    "HttpGet", "HttpPost", "HttpPut", "HttpDelete", "HttpPatch", "Route",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EndpointCounts {
    pub web_api: usize,
    pub web_methods: usize,
    pub wcf_operations: usize,
}

impl EndpointCounts {
    pub fn total(&self) -> usize {
        self.web_api + self.web_methods + self.wcf_operations
    }
}

pub fn count_endpoints(models: &[SourceModel]) -> EndpointCounts {
    let mut counts = EndpointCounts::default();
    for model in models {
        for ty in &model.types {
            let is_controller = ty.kind == TypeKind::Class
                && (ty.has_attribute("ApiController")
                    || ty.has_base("ControllerBase")
                    || ty.has_base("ApiController"));
            let is_service_contract =
                ty.kind == TypeKind::Interface && ty.has_attribute("ServiceContract");

            for member in &ty.members {
                if is_controller
                    && HTTP_VERB_ATTRIBUTES.iter().any(|a| member.has_attribute(a))
                {
                    counts.web_api += 1;
                }
                if member.has_attribute("WebMethod") {
                    counts.web_methods += 1;
                }
                if is_service_contract && member.has_attribute("OperationContract") {
                    counts.wcf_operations += 1;
                }
            }
        }
    }
    counts
}

/// Step mapping of the total endpoint count.
pub fn step(total: usize) -> f64 {
    match total {
        0 => 0.0,
        1..=5 => 33.0,
        6..=15 => 66.0,
        _ => 100.0,
    }
}

pub struct ExternalApiCalculator;

impl MetricCalculator for ExternalApiCalculator {
    fn metric(&self) -> &'static str {
        "api_exposure"
    }

    fn normalise(&self, node: NodeIndex, ctx: &ScoringContext<'_>) -> MetricScore {
        match ctx.analysis(node) {
            Some(ProjectAnalysis::Analyzed(scan)) => {
                let total = count_endpoints(&scan.models).total();
                MetricScore::new(total as f64, step(total))
            }
            // Conservative: no evidence of exposure
            _ => MetricScore::new(0.0, 0.0),
        }
    }
}
