use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AnalyzerError, Result};

/// Patterns deciding which reference targets survive the framework filter.
///
/// Two shapes only: a trailing-wildcard prefix (`Microsoft.*`) or an exact
/// name. Matching is case-insensitive. An allow match short-circuits to
/// retain; a block match drops; anything else is retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "PascalCase")]
pub struct FilterConfig {
    pub block_list: Vec<String>,
    pub allow_list: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            block_list: vec!["Microsoft.*".to_string(), "System.*".to_string()],
            allow_list: Vec::new(),
        }
    }
}

/// Weights combining the four extraction metrics. Each must lie in [0, 1]
/// and the four must sum to 1.0 within a 0.01 tolerance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "PascalCase")]
pub struct ScoringWeights {
    pub coupling: f64,
    pub complexity: f64,
    pub tech_debt: f64,
    pub external_exposure: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            coupling: 0.40,
            complexity: 0.30,
            tech_debt: 0.20,
            external_exposure: 0.10,
        }
    }
}

impl ScoringWeights {
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("Coupling", self.coupling),
            ("Complexity", self.complexity),
            ("TechDebt", self.tech_debt),
            ("ExternalExposure", self.external_exposure),
        ];
        for (name, value) in named {
            if !(0.0..=1.0).contains(&value) || !value.is_finite() {
                return Err(AnalyzerError::config(
                    "ScoringWeights",
                    format!("weight {name} is {value}, outside [0, 1]"),
                    "Set every weight to a value between 0.0 and 1.0",
                ));
            }
        }
        let sum: f64 = named.iter().map(|(_, v)| v).sum();
        if !(0.99..=1.01).contains(&sum) {
            return Err(AnalyzerError::config(
                "ScoringWeights",
                format!("the four weights sum to {sum:.3}, outside [0.99, 1.01]"),
                "Adjust the weights so they sum to 1.0",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    #[serde(rename = "FrameworkFilters")]
    pub framework_filters: FilterConfig,
    #[serde(rename = "ScoringWeights")]
    pub scoring_weights: ScoringWeights,
}

impl AnalyzerConfig {
    /// Load from a JSON or TOML file, chosen by extension. The parsed config
    /// is validated before it is returned; the result is immutable for the
    /// rest of the run.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            AnalyzerError::config(
                path.display().to_string(),
                format!("cannot read config file: {e}"),
                "Check that the path exists and is readable",
            )
        })?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        let config: AnalyzerConfig = if ext == "toml" {
            toml::from_str(&text).map_err(|e| {
                AnalyzerError::config(
                    path.display().to_string(),
                    format!("invalid TOML: {e}"),
                    "Fix the reported TOML syntax or property name",
                )
            })?
        } else {
            serde_json::from_str(&text).map_err(|e| {
                AnalyzerError::config(
                    path.display().to_string(),
                    format!("invalid JSON: {e}"),
                    "Fix the reported JSON syntax or property name",
                )
            })?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.scoring_weights.validate()?;
        for (list, name) in [
            (&self.framework_filters.block_list, "BlockList"),
            (&self.framework_filters.allow_list, "AllowList"),
        ] {
            if let Some(idx) = list.iter().position(|p| p.trim().is_empty()) {
                return Err(AnalyzerError::config(
                    "FrameworkFilters",
                    format!("{name} entry {idx} is empty"),
                    "Remove the empty entry or replace it with a pattern",
                ));
            }
        }
        Ok(())
    }
}
