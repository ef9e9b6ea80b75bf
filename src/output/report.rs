//! Report structures wrapping analysis results for presentation

use crate::processing::analyzer::{AnalysisResult, BulkItem, JobComparisonReport};
use crate::processing::history::HistoryStatistics;
use crate::processing::scoring::{Metric, ScoreCard, ScoreRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreLevel {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl ScoreLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreLevel::Excellent
        } else if score >= 60.0 {
            ScoreLevel::Good
        } else if score >= 40.0 {
            ScoreLevel::Fair
        } else {
            ScoreLevel::NeedsImprovement
        }
    }
}

impl fmt::Display for ScoreLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScoreLevel::Excellent => "Excellent",
            ScoreLevel::Good => "Good",
            ScoreLevel::Fair => "Fair",
            ScoreLevel::NeedsImprovement => "Needs Improvement",
        };
        write!(f, "{}", name)
    }
}

/// A score area that can be flagged for improvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreArea {
    Overall,
    Metric(Metric),
}

impl fmt::Display for ScoreArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreArea::Overall => write!(f, "ATS Compatibility"),
            ScoreArea::Metric(metric) => write!(f, "{}", metric),
        }
    }
}

/// Areas checked for improvement, in priority order, with the score below
/// which each is flagged.
const IMPROVEMENT_THRESHOLDS: [(ScoreArea, f64); 6] = [
    (ScoreArea::Overall, 80.0),
    (ScoreArea::Metric(Metric::ContentStructure), 75.0),
    (ScoreArea::Metric(Metric::Formatting), 70.0),
    (ScoreArea::Metric(Metric::Readability), 65.0),
    (ScoreArea::Metric(Metric::Keyword), 60.0),
    (ScoreArea::Metric(Metric::JobMatch), 55.0),
];

const MAX_IMPROVEMENT_AREAS: usize = 3;

/// Up to three areas below their threshold, highest priority first.
pub fn improvement_areas(card: &ScoreCard) -> Vec<ScoreArea> {
    IMPROVEMENT_THRESHOLDS
        .iter()
        .filter(|(area, threshold)| {
            let score = match area {
                ScoreArea::Overall => card.overall as f64,
                ScoreArea::Metric(metric) => card.value(*metric),
            };
            score < *threshold
        })
        .map(|(area, _)| *area)
        .take(MAX_IMPROVEMENT_AREAS)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub metric: Metric,
    pub score: f64,
    pub weight: f64,
    pub level: ScoreLevel,
}

/// Executive summary of one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub overall_score: u32,
    pub overall_level: ScoreLevel,
    pub metrics: Vec<MetricSummary>,
    pub improvement_areas: Vec<ScoreArea>,
    pub verdict: String,
}

impl AnalysisSummary {
    pub fn from_scores(card: &ScoreCard, weights: &crate::config::ScoreWeights) -> Self {
        let metrics = Metric::ALL
            .iter()
            .map(|&metric| {
                let score = card.value(metric);
                MetricSummary {
                    metric,
                    score,
                    weight: metric.weight(weights),
                    level: ScoreLevel::from_score(score),
                }
            })
            .collect();

        let verdict = match card.overall {
            90..=100 => "Excellent ATS compatibility - ready to submit",
            80..=89 => "Very good compatibility - minor improvements could help",
            70..=79 => "Good compatibility - some targeted improvements recommended",
            60..=69 => "Fair compatibility - several improvements needed",
            50..=59 => "Below average compatibility - significant improvements required",
            _ => "Poor compatibility - major revisions needed",
        }
        .to_string();

        Self {
            overall_score: card.overall,
            overall_level: ScoreLevel::from_score(card.overall as f64),
            metrics,
            improvement_areas: improvement_areas(card),
            verdict,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub resume_file: String,
    pub job_file: String,
    pub processing_time_ms: u64,
    pub version: String,
}

impl ReportMetadata {
    pub fn new(resume_file: &str, job_file: &str, processing_time_ms: u64) -> Self {
        Self {
            generated_at: Utc::now(),
            resume_file: resume_file.to_string(),
            job_file: job_file.to_string(),
            processing_time_ms,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Full analysis report: summary, raw result and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: AnalysisSummary,
    pub analysis: AnalysisResult,
    pub metadata: ReportMetadata,
}

impl AnalysisReport {
    pub fn new(
        analysis: AnalysisResult,
        weights: &crate::config::ScoreWeights,
        metadata: ReportMetadata,
    ) -> Self {
        Self {
            summary: AnalysisSummary::from_scores(&analysis.scores, weights),
            analysis,
            metadata,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryReport {
    pub resume_id: String,
    pub records: Vec<ScoreRecord>,
    pub deltas: Vec<i64>,
    pub statistics: HistoryStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub resume_file: String,
    pub report: JobComparisonReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkReport {
    pub job_file: String,
    pub items: Vec<BulkItem>,
}

impl BulkReport {
    /// Counts of completed, failed and cancelled items.
    pub fn tally(&self) -> (usize, usize, usize) {
        self.items
            .iter()
            .fold((0, 0, 0), |(c, f, x), item| match item.outcome.status() {
                "completed" => (c + 1, f, x),
                "failed" => (c, f + 1, x),
                _ => (c, f, x + 1),
            })
    }
}
