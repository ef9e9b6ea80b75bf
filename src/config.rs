//! Configuration management for the ATS analyzer

use crate::error::{AtsError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tolerance used when checking that the overall score weights sum to one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub extraction: ExtractionConfig,
    pub batch: BatchConfig,
    pub data: DataConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ScoreWeights,
    pub category_multipliers: CategoryMultipliers,
}

/// Weights of the five component scores in the overall ATS score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub formatting: f64,
    pub keyword: f64,
    pub content_structure: f64,
    pub readability: f64,
    pub job_match: f64,
}

/// Importance multiplier applied to term frequency, per keyword category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryMultipliers {
    pub technical: f64,
    pub tool: f64,
    pub certification: f64,
    pub soft_skill: f64,
    pub generic: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Job-side keyword sets are truncated to this many entries by weight.
    pub max_job_keywords: usize,
    /// Extra multi-word phrases kept as single tokens.
    pub phrases: Vec<String>,
    pub max_job_description_chars: usize,
    /// Per-job limit when comparing one resume against several postings.
    pub max_compare_job_chars: usize,
    pub max_resume_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub max_concurrent: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxonomy_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmarks_path: Option<PathBuf>,
    pub history_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            formatting: 0.25,
            keyword: 0.20,
            content_structure: 0.25,
            readability: 0.15,
            job_match: 0.15,
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.formatting + self.keyword + self.content_structure + self.readability + self.job_match
    }

    fn as_pairs(&self) -> [(&'static str, f64); 5] {
        [
            ("formatting", self.formatting),
            ("keyword", self.keyword),
            ("content_structure", self.content_structure),
            ("readability", self.readability),
            ("job_match", self.job_match),
        ]
    }
}

impl Default for CategoryMultipliers {
    fn default() -> Self {
        Self {
            technical: 3.0,
            tool: 2.5,
            certification: 2.0,
            soft_skill: 1.5,
            generic: 1.0,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_job_keywords: 50,
            phrases: Vec::new(),
            max_job_description_chars: 10_000,
            max_compare_job_chars: 5_000,
            max_resume_chars: 50_000,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 4,
            timeout_ms: None,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        let history_path = dirs::data_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("ats-analyzer")
            .join("history.json");

        Self {
            taxonomy_path: None,
            benchmarks_path: None,
            history_path,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl Config {
    /// Load the configuration from the default location, writing defaults when absent.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load and validate a configuration file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AtsError::Configuration(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| AtsError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AtsError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("ats-analyzer")
            .join("config.toml")
    }

    /// Reject configurations that would make every analysis wrong.
    pub fn validate(&self) -> Result<()> {
        let weights = &self.scoring.weights;
        for (name, value) in weights.as_pairs() {
            if !value.is_finite() || value < 0.0 {
                return Err(AtsError::Configuration(format!(
                    "Score weight '{}' must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        let sum = weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(AtsError::Configuration(format!(
                "Score weights must sum to 1.0, got {:.4}",
                sum
            )));
        }

        let m = &self.scoring.category_multipliers;
        for (name, value) in [
            ("technical", m.technical),
            ("tool", m.tool),
            ("certification", m.certification),
            ("soft_skill", m.soft_skill),
            ("generic", m.generic),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AtsError::Configuration(format!(
                    "Category multiplier '{}' must be positive, got {}",
                    name, value
                )));
            }
        }

        if self.extraction.max_job_keywords == 0 {
            return Err(AtsError::Configuration(
                "extraction.max_job_keywords must be at least 1".to_string(),
            ));
        }
        if self.batch.max_concurrent == 0 {
            return Err(AtsError::Configuration(
                "batch.max_concurrent must be at least 1".to_string(),
            ));
        }

        for (label, path) in [
            ("taxonomy", &self.data.taxonomy_path),
            ("benchmarks", &self.data.benchmarks_path),
        ] {
            if let Some(path) = path {
                if !path.exists() {
                    return Err(AtsError::Configuration(format!(
                        "Configured {} file does not exist: {}",
                        label,
                        path.display()
                    )));
                }
            }
        }

        Ok(())
    }
}
