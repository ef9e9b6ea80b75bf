//! Append-only score history per resume

use crate::error::{AtsError, Result};
use crate::processing::scoring::ScoreRecord;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::RwLock;

/// Number of most recent scores used for the trend slope.
const TREND_WINDOW: usize = 5;
/// Slope in points per analysis beyond which a trend is reported.
const TREND_THRESHOLD: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImprovementTrend {
    Improving,
    Declining,
    Stable,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryStatistics {
    pub total_analyses: usize,
    pub average_score: f64,
    pub highest_score: u32,
    pub lowest_score: u32,
    /// Last overall score minus the first.
    pub improvement: i64,
    pub trend: ImprovementTrend,
}

#[derive(Debug, Default)]
pub struct ScoreHistory {
    records: RwLock<HashMap<String, Vec<ScoreRecord>>>,
}

impl ScoreHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load history from a JSON file. A missing file yields an empty history.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No history file at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let content = std::fs::read_to_string(path)?;
        let records: HashMap<String, Vec<ScoreRecord>> = serde_json::from_str(&content)
            .map_err(|e| {
                AtsError::History(format!("Failed to parse {}: {}", path.display(), e))
            })?;

        info!(
            "Loaded score history for {} resume(s) from {}",
            records.len(),
            path.display()
        );
        Ok(Self {
            records: RwLock::new(records),
        })
    }

    /// Write the whole history as JSON, replacing the file in one rename.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let snapshot: BTreeMap<String, Vec<ScoreRecord>> = {
            let guard = self.records.read().unwrap_or_else(|p| p.into_inner());
            guard.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&snapshot)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, path)?;

        debug!("Persisted score history to {}", path.display());
        Ok(())
    }

    pub fn record(&self, resume_id: &str, record: ScoreRecord) {
        let mut guard = self.records.write().unwrap_or_else(|p| p.into_inner());
        guard.entry(resume_id.to_string()).or_default().push(record);
    }

    /// Records in the order they were appended.
    pub fn trend(&self, resume_id: &str) -> Vec<ScoreRecord> {
        let guard = self.records.read().unwrap_or_else(|p| p.into_inner());
        guard.get(resume_id).cloned().unwrap_or_default()
    }

    pub fn resume_ids(&self) -> Vec<String> {
        let guard = self.records.read().unwrap_or_else(|p| p.into_inner());
        let mut ids: Vec<String> = guard.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Change of the overall score between consecutive records.
    pub fn deltas(&self, resume_id: &str) -> Vec<i64> {
        overall_scores(&self.trend(resume_id))
            .windows(2)
            .map(|w| w[1] - w[0])
            .collect()
    }

    pub fn improvement_trend(&self, resume_id: &str) -> ImprovementTrend {
        trend_of(&overall_scores(&self.trend(resume_id)))
    }

    pub fn statistics(&self, resume_id: &str) -> HistoryStatistics {
        let scores = overall_scores(&self.trend(resume_id));
        let trend = trend_of(&scores);

        let (Some(&first), Some(&last)) = (scores.first(), scores.last()) else {
            return HistoryStatistics {
                total_analyses: 0,
                average_score: 0.0,
                highest_score: 0,
                lowest_score: 0,
                improvement: 0,
                trend,
            };
        };

        let sum: i64 = scores.iter().sum();
        let average = sum as f64 / scores.len() as f64;

        HistoryStatistics {
            total_analyses: scores.len(),
            average_score: (average * 10.0).round() / 10.0,
            highest_score: scores.iter().copied().max().unwrap_or(0) as u32,
            lowest_score: scores.iter().copied().min().unwrap_or(0) as u32,
            improvement: last - first,
            trend,
        }
    }
}

fn overall_scores(records: &[ScoreRecord]) -> Vec<i64> {
    records.iter().map(|r| r.scores.overall as i64).collect()
}

/// Least-squares slope over the most recent scores.
fn trend_of(scores: &[i64]) -> ImprovementTrend {
    if scores.len() < 2 {
        return ImprovementTrend::Neutral;
    }

    let recent = &scores[scores.len().saturating_sub(TREND_WINDOW)..];
    let n = recent.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = recent.iter().sum::<i64>() as f64 / n;

    let (num, den) = recent
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, &y)| {
            let dx = i as f64 - mean_x;
            (num + dx * (y as f64 - mean_y), den + dx * dx)
        });
    let slope = num / den;

    if slope > TREND_THRESHOLD {
        ImprovementTrend::Improving
    } else if slope < -TREND_THRESHOLD {
        ImprovementTrend::Declining
    } else {
        ImprovementTrend::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::scoring::ScoreCard;
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;

    fn record(overall: u32, minutes: i64) -> ScoreRecord {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        ScoreRecord::new(
            ScoreCard {
                overall,
                formatting: overall,
                keyword: overall,
                content_structure: overall,
                readability: overall,
                job_match_percentage: overall as f64,
            },
            base + Duration::minutes(minutes),
        )
    }

    #[test]
    fn test_trend_preserves_append_order() {
        let history = ScoreHistory::new();
        history.record("r1", record(70, 0));
        history.record("r1", record(65, 1));
        history.record("r1", record(80, 2));
        history.record("r2", record(50, 0));

        let overall: Vec<u32> = history.trend("r1").iter().map(|r| r.scores.overall).collect();
        assert_eq!(overall, vec![70, 65, 80]);
        assert_eq!(history.deltas("r1"), vec![-5, 15]);
        assert!(history.trend("missing").is_empty());
        assert_eq!(history.resume_ids(), vec!["r1", "r2"]);
    }

    #[test]
    fn test_improvement_trend_labels() {
        let history = ScoreHistory::new();
        assert_eq!(history.improvement_trend("r"), ImprovementTrend::Neutral);

        history.record("r", record(60, 0));
        assert_eq!(history.improvement_trend("r"), ImprovementTrend::Neutral);

        for (i, score) in [65, 70, 75].into_iter().enumerate() {
            history.record("r", record(score, i as i64 + 1));
        }
        assert_eq!(history.improvement_trend("r"), ImprovementTrend::Improving);

        let flat = ScoreHistory::new();
        for (i, score) in [70, 71, 70, 71].into_iter().enumerate() {
            flat.record("r", record(score, i as i64));
        }
        assert_eq!(flat.improvement_trend("r"), ImprovementTrend::Stable);

        let falling = ScoreHistory::new();
        for (i, score) in [90, 80, 70].into_iter().enumerate() {
            falling.record("r", record(score, i as i64));
        }
        assert_eq!(falling.improvement_trend("r"), ImprovementTrend::Declining);
    }

    #[test]
    fn test_trend_uses_last_five() {
        let history = ScoreHistory::new();
        // Early drop is outside the window
        for (i, score) in [95, 40, 60, 61, 60, 61, 60].into_iter().enumerate() {
            history.record("r", record(score, i as i64));
        }
        assert_eq!(history.improvement_trend("r"), ImprovementTrend::Stable);
    }

    #[test]
    fn test_statistics() {
        let history = ScoreHistory::new();
        assert_eq!(history.statistics("r").total_analyses, 0);

        for (i, score) in [60, 75, 70].into_iter().enumerate() {
            history.record("r", record(score, i as i64));
        }
        let stats = history.statistics("r");
        assert_eq!(stats.total_analyses, 3);
        assert_eq!(stats.average_score, 68.3);
        assert_eq!(stats.highest_score, 75);
        assert_eq!(stats.lowest_score, 60);
        assert_eq!(stats.improvement, 10);
    }

    #[test]
    fn test_persist_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.json");

        let history = ScoreHistory::new();
        history.record("r1", record(70, 0));
        history.record("r1", record(72, 5));
        history.persist(&path).unwrap();

        let loaded = ScoreHistory::load(&path).unwrap();
        assert_eq!(loaded.trend("r1"), history.trend("r1"));

        let empty = ScoreHistory::load(&dir.path().join("absent.json")).unwrap();
        assert!(empty.resume_ids().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_history_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(ScoreHistory::load(&path), Err(AtsError::History(_))));
    }

    #[test]
    fn test_concurrent_appends() {
        let history = Arc::new(ScoreHistory::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let history = Arc::clone(&history);
                std::thread::spawn(move || {
                    for j in 0..25 {
                        history.record("shared", record(50, i * 100 + j));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(history.trend("shared").len(), 200);
    }
}
