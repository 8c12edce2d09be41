//! McCabe cyclomatic complexity averaged over executable code units.

use petgraph::graph::NodeIndex;

use crate::scoring::{MetricCalculator, MetricScore, ScoringContext};
use crate::semantic::ProjectAnalysis;
use crate::syntax::lexer::Token;

/// Neutral score used when semantic analysis is unavailable.
pub const NEUTRAL: f64 = 50.0;

pub struct ComplexityCalculator;

/// 1 + decision points of a unit body. An empty body is the base 1.
pub fn cyclomatic(body: &[Token]) -> usize {
    1 + decision_points(body)
}

/// Decision points: `if`, `for`, `foreach`, `while` (covering do-while via
/// its trailing `while`), `switch`-cases, `catch`, ternaries and
/// short-circuit operators.
pub fn decision_points(body: &[Token]) -> usize {
    let mut count = 0usize;
    for (i, tok) in body.iter().enumerate() {
        match tok {
            Token::Ident(word) => {
                if matches!(word.as_str(), "if" | "for" | "foreach" | "while" | "case" | "catch")
                {
                    count += 1;
                }
            }
            Token::AndAnd | Token::OrOr => count += 1,
            Token::Question => {
                if is_ternary(body, i) {
                    count += 1;
                }
            }
            _ => {}
        }
    }
    count
}

/// A `?` is conditional when a `:` follows at the same bracket depth before
/// the statement ends; nullable-type uses never see one.
fn is_ternary(body: &[Token], at: usize) -> bool {
    let mut depth = 0i32;
    for tok in &body[at + 1..] {
        match tok {
            Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
            Token::RParen | Token::RBracket | Token::RBrace => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            Token::Semi if depth == 0 => return false,
            Token::Colon if depth == 0 => return true,
            _ => {}
        }
    }
    false
}

/// Piecewise-linear mapping of the average onto [0, 100].
pub fn normalise_average(avg: f64) -> f64 {
    if avg <= 0.0 {
        0.0
    } else if avg <= 7.0 {
        (avg / 7.0) * 33.0
    } else if avg <= 15.0 {
        33.0 + ((avg - 7.0) / 8.0) * 33.0
    } else if avg <= 25.0 {
        66.0 + ((avg - 15.0) / 10.0) * 24.0
    } else {
        (90.0 + (avg - 25.0)).clamp(0.0, 100.0)
    }
}

impl MetricCalculator for ComplexityCalculator {
    fn metric(&self) -> &'static str {
        "complexity"
    }

    fn normalise(&self, node: NodeIndex, ctx: &ScoringContext<'_>) -> MetricScore {
        match ctx.analysis(node) {
            Some(ProjectAnalysis::Analyzed(scan)) => {
                let mut units = 0usize;
                let mut total = 0usize;
                for model in &scan.models {
                    for ty in &model.types {
                        for member in &ty.members {
                            if member.is_code_unit() {
                                units += 1;
                                total += cyclomatic(&member.body);
                            }
                        }
                    }
                }
                let avg = if units == 0 {
                    0.0
                } else {
                    total as f64 / units as f64
                };
                MetricScore::new(avg, normalise_average(avg))
            }
            _ => MetricScore::new(0.0, NEUTRAL),
        }
    }
}
