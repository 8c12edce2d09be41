//! Ranked-candidates view over the extraction scores.

use serde::Serialize;

use crate::scoring::{DifficultyCategory, ExtractionScore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreStatistics {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RankedCandidates {
    /// All projects, easiest first; name breaks exact score ties.
    pub ordered: Vec<ExtractionScore>,
    /// Up to ten easiest `Easy` projects.
    pub easiest: Vec<ExtractionScore>,
    /// Up to ten hardest `Hard` projects, hardest first.
    pub hardest: Vec<ExtractionScore>,
}

pub fn rank(scores: &[ExtractionScore]) -> (RankedCandidates, ScoreStatistics) {
    let mut ordered: Vec<ExtractionScore> = scores.to_vec();
    ordered.sort_by(|a, b| {
        a.final_score
            .partial_cmp(&b.final_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.project.to_lowercase().cmp(&b.project.to_lowercase()))
    });

    let easiest: Vec<ExtractionScore> = ordered
        .iter()
        .filter(|s| s.category == DifficultyCategory::Easy)
        .take(10)
        .cloned()
        .collect();
    let hardest: Vec<ExtractionScore> = ordered
        .iter()
        .rev()
        .filter(|s| s.category == DifficultyCategory::Hard)
        .take(10)
        .cloned()
        .collect();

    let stats = ScoreStatistics {
        easy: ordered
            .iter()
            .filter(|s| s.category == DifficultyCategory::Easy)
            .count(),
        medium: ordered
            .iter()
            .filter(|s| s.category == DifficultyCategory::Medium)
            .count(),
        hard: ordered
            .iter()
            .filter(|s| s.category == DifficultyCategory::Hard)
            .count(),
        total: ordered.len(),
    };
    debug_assert_eq!(stats.easy + stats.medium + stats.hard, stats.total);

    (
        RankedCandidates {
            ordered,
            easiest,
            hardest,
        },
        stats,
    )
}
