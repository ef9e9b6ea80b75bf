//! Industry and role benchmarks with atomic reload

use crate::error::{AtsError, Result};
use crate::processing::document::JobDescription;
use crate::processing::scoring::Metric;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

/// Industry key of the fallback benchmark.
pub const GENERAL: &str = "general";

static EXECUTIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:director|vp|vice president|head of|chief)\b")
        .expect("Invalid executive regex")
});

static SENIOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:senior|sr|staff|principal|lead)\b").expect("Invalid senior regex")
});

static MID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:mid-level|mid level|intermediate)\b").expect("Invalid mid regex")
});

static ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:intern|internship|junior|jr|entry|entry-level|graduate)\b")
        .expect("Invalid entry regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleLevel {
    Entry,
    Mid,
    Senior,
    Executive,
    General,
}

impl RoleLevel {
    /// Role level from the job's seniority hint, else from its text.
    pub fn infer(job: &JobDescription) -> RoleLevel {
        if let Some(level) = job.seniority.as_deref().and_then(|s| s.parse().ok()) {
            return level;
        }

        let text = &job.text;
        if EXECUTIVE_RE.is_match(text) {
            RoleLevel::Executive
        } else if SENIOR_RE.is_match(text) {
            RoleLevel::Senior
        } else if MID_RE.is_match(text) {
            RoleLevel::Mid
        } else if ENTRY_RE.is_match(text) {
            RoleLevel::Entry
        } else {
            RoleLevel::General
        }
    }
}

impl FromStr for RoleLevel {
    type Err = AtsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "entry" | "entry-level" | "junior" | "intern" | "graduate" => Ok(RoleLevel::Entry),
            "mid" | "mid-level" | "intermediate" => Ok(RoleLevel::Mid),
            "senior" | "lead" | "staff" | "principal" => Ok(RoleLevel::Senior),
            "executive" | "director" => Ok(RoleLevel::Executive),
            "general" | "any" => Ok(RoleLevel::General),
            other => Err(AtsError::InvalidInput(format!("Unknown role level: {}", other))),
        }
    }
}

impl fmt::Display for RoleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoleLevel::Entry => "entry",
            RoleLevel::Mid => "mid",
            RoleLevel::Senior => "senior",
            RoleLevel::Executive => "executive",
            RoleLevel::General => "general",
        };
        write!(f, "{}", name)
    }
}

/// Recommended resume length in words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthRange {
    pub min: u32,
    pub max: u32,
}

impl LengthRange {
    /// Inclusive on both ends.
    pub fn contains(&self, words: usize) -> bool {
        words >= self.min as usize && words <= self.max as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubScoreAverages {
    pub formatting: f64,
    pub keyword: f64,
    pub content_structure: f64,
    pub readability: f64,
    pub job_match: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    pub industry: String,
    pub role_level: RoleLevel,
    pub average_ats_score: f64,
    pub recommended_length_range: LengthRange,
    #[serde(default)]
    pub trending_keywords: Vec<String>,
    #[serde(default)]
    pub recommended_sections: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_score_averages: Option<SubScoreAverages>,
}

impl Benchmark {
    /// Reference value for one metric. Falls back to the overall average.
    pub fn average_for(&self, metric: Metric) -> f64 {
        match &self.sub_score_averages {
            Some(avg) => match metric {
                Metric::Formatting => avg.formatting,
                Metric::Keyword => avg.keyword,
                Metric::ContentStructure => avg.content_structure,
                Metric::Readability => avg.readability,
                Metric::JobMatch => avg.job_match,
            },
            None => self.average_ats_score,
        }
    }

    fn is_default(&self) -> bool {
        self.industry.eq_ignore_ascii_case(GENERAL) && self.role_level == RoleLevel::General
    }
}

/// Benchmark lookup result. `exact` is false when the general default was used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkMatch {
    pub benchmark: Benchmark,
    pub exact: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkTable {
    benchmarks: Vec<Benchmark>,
}

impl BenchmarkTable {
    /// Build a table. It must contain the `general/general` default.
    pub fn new(benchmarks: Vec<Benchmark>) -> Result<Self> {
        if !benchmarks.iter().any(Benchmark::is_default) {
            return Err(AtsError::Benchmark(
                "Benchmark table must contain a general/general entry".to_string(),
            ));
        }
        Ok(Self { benchmarks })
    }

    pub fn builtin() -> Self {
        Self {
            benchmarks: builtin_benchmarks(),
        }
    }

    /// Load a `.toml` or `.json` table with a top-level `benchmarks` array.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AtsError::Benchmark(format!(
                "Failed to read benchmarks {}: {}",
                path.display(),
                e
            ))
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| e.eq_ignore_ascii_case("json"));

        let table: BenchmarkTable = if is_json {
            serde_json::from_str(&content).map_err(|e| {
                AtsError::Benchmark(format!("Failed to parse {}: {}", path.display(), e))
            })?
        } else {
            toml::from_str(&content).map_err(|e| {
                AtsError::Benchmark(format!("Failed to parse {}: {}", path.display(), e))
            })?
        };

        Self::new(table.benchmarks)
    }

    pub fn len(&self) -> usize {
        self.benchmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }

    fn find(&self, industry: &str, role_level: RoleLevel) -> Option<&Benchmark> {
        self.benchmarks
            .iter()
            .find(|b| b.industry.eq_ignore_ascii_case(industry) && b.role_level == role_level)
    }

    fn default_benchmark(&self) -> Option<&Benchmark> {
        self.benchmarks.iter().find(|b| b.is_default())
    }

    pub fn lookup(&self, industry: Option<&str>, role_level: Option<&str>) -> Option<BenchmarkMatch> {
        let industry = industry.map(str::trim).filter(|i| !i.is_empty());
        let level = match role_level.map(str::trim).filter(|r| !r.is_empty()) {
            Some(raw) => raw.parse::<RoleLevel>().ok(),
            None => Some(RoleLevel::General),
        };

        if let (Some(industry), Some(level)) = (industry, level) {
            if let Some(benchmark) = self.find(industry, level) {
                return Some(BenchmarkMatch {
                    benchmark: benchmark.clone(),
                    exact: true,
                });
            }
        }

        self.default_benchmark().map(|benchmark| BenchmarkMatch {
            benchmark: benchmark.clone(),
            exact: false,
        })
    }

    pub fn list(&self, industry: Option<&str>) -> Vec<Benchmark> {
        self.benchmarks
            .iter()
            .filter(|b| industry.map_or(true, |i| b.industry.eq_ignore_ascii_case(i.trim())))
            .cloned()
            .collect()
    }
}

/// Shared benchmark table. Readers take an `Arc` snapshot; reload swaps the whole table.
pub struct BenchmarkProvider {
    table: RwLock<Arc<BenchmarkTable>>,
}

impl BenchmarkProvider {
    pub fn new(table: BenchmarkTable) -> Self {
        Self {
            table: RwLock::new(Arc::new(table)),
        }
    }

    pub fn builtin() -> Self {
        Self::new(BenchmarkTable::builtin())
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let table = BenchmarkTable::from_file(path)?;
        info!("Loaded {} benchmarks from {}", table.len(), path.display());
        Ok(Self::new(table))
    }

    pub fn snapshot(&self) -> Arc<BenchmarkTable> {
        let guard = self.table.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Look up a benchmark; unknown or malformed keys fall back to the general default.
    pub fn get_benchmark(&self, industry: Option<&str>, role_level: Option<&str>) -> BenchmarkMatch {
        let snapshot = self.snapshot();
        match snapshot.lookup(industry, role_level) {
            Some(found) => {
                if !found.exact {
                    warn!(
                        "No benchmark for industry={:?} role_level={:?}, using general default",
                        industry, role_level
                    );
                }
                found
            }
            // Tables are validated on construction, so the default is always present
            None => BenchmarkMatch {
                benchmark: general_default(),
                exact: false,
            },
        }
    }

    pub fn list(&self, industry: Option<&str>) -> Vec<Benchmark> {
        self.snapshot().list(industry)
    }

    pub fn reload(&self, table: BenchmarkTable) {
        let mut guard = self.table.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(table);
        info!("Benchmark table reloaded ({} entries)", guard.len());
    }

    /// Replace the table from a file. On error the current table stays in place.
    pub fn reload_from_path(&self, path: &Path) -> Result<()> {
        let table = BenchmarkTable::from_file(path)?;
        self.reload(table);
        Ok(())
    }
}

impl Default for BenchmarkProvider {
    fn default() -> Self {
        Self::builtin()
    }
}

fn general_default() -> Benchmark {
    benchmark(
        GENERAL,
        RoleLevel::General,
        70.0,
        (400, 800),
        &[],
        &["summary", "experience", "education", "skills"],
    )
}

fn benchmark(
    industry: &str,
    role_level: RoleLevel,
    average: f64,
    (min, max): (u32, u32),
    trending: &[&str],
    sections: &[&str],
) -> Benchmark {
    Benchmark {
        industry: industry.to_string(),
        role_level,
        average_ats_score: average,
        recommended_length_range: LengthRange { min, max },
        trending_keywords: trending.iter().map(|s| s.to_string()).collect(),
        recommended_sections: sections.iter().map(|s| s.to_string()).collect(),
        sub_score_averages: None,
    }
}

fn builtin_benchmarks() -> Vec<Benchmark> {
    let mut technology_mid = benchmark(
        "technology",
        RoleLevel::Mid,
        75.0,
        (500, 800),
        &["cloud computing", "microservices", "kubernetes", "ci/cd"],
        &["technical_skills", "projects", "experience"],
    );
    technology_mid.sub_score_averages = Some(SubScoreAverages {
        formatting: 80.0,
        keyword: 70.0,
        content_structure: 75.0,
        readability: 72.0,
        job_match: 70.0,
    });

    vec![
        general_default(),
        benchmark(
            "technology",
            RoleLevel::General,
            75.0,
            (600, 800),
            &["machine learning", "cloud computing", "devops", "cybersecurity"],
            &["technical_skills", "projects", "certifications"],
        ),
        benchmark(
            "technology",
            RoleLevel::Entry,
            72.0,
            (400, 700),
            &["software development", "agile", "git", "unit testing"],
            &["technical_skills", "projects", "education"],
        ),
        technology_mid,
        benchmark(
            "technology",
            RoleLevel::Senior,
            78.0,
            (600, 900),
            &["leadership", "system architecture", "mentoring", "strategic planning"],
            &["leadership_experience", "technical_skills", "achievements"],
        ),
        benchmark(
            "healthcare",
            RoleLevel::General,
            70.0,
            (500, 700),
            &["telemedicine", "ehr", "patient care"],
            &["certifications", "clinical_experience", "education"],
        ),
        benchmark(
            "healthcare",
            RoleLevel::Entry,
            68.0,
            (400, 650),
            &["patient care", "clinical experience", "medical records", "hipaa"],
            &["clinical_experience", "certifications", "education"],
        ),
        benchmark(
            "finance",
            RoleLevel::General,
            72.0,
            (550, 750),
            &["financial modeling", "risk management", "compliance"],
            &["quantifiable_achievements", "certifications", "software_skills"],
        ),
        benchmark(
            "finance",
            RoleLevel::Mid,
            75.0,
            (500, 750),
            &["financial analysis", "excel", "risk management", "compliance"],
            &["quantifiable_achievements", "certifications", "education"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_lookup_is_case_insensitive() {
        let provider = BenchmarkProvider::builtin();
        let found = provider.get_benchmark(Some("Technology"), Some("SENIOR"));
        assert!(found.exact);
        assert_eq!(found.benchmark.average_ats_score, 78.0);
        assert_eq!(found.benchmark.recommended_length_range, LengthRange { min: 600, max: 900 });
    }

    #[test]
    fn test_unknown_keys_fall_back() {
        let provider = BenchmarkProvider::builtin();

        let found = provider.get_benchmark(Some("underwater basket weaving"), None);
        assert!(!found.exact);
        assert_eq!(found.benchmark.industry, GENERAL);

        let malformed = provider.get_benchmark(Some("technology"), Some("wizard"));
        assert!(!malformed.exact);

        let missing = provider.get_benchmark(None, None);
        assert!(!missing.exact);
    }

    #[test]
    fn test_industry_without_level_uses_general_row() {
        let provider = BenchmarkProvider::builtin();
        let found = provider.get_benchmark(Some("finance"), None);
        assert!(found.exact);
        assert_eq!(found.benchmark.role_level, RoleLevel::General);
        assert_eq!(found.benchmark.average_ats_score, 72.0);
    }

    #[test]
    fn test_average_for_falls_back_to_overall() {
        let provider = BenchmarkProvider::builtin();
        let mid = provider.get_benchmark(Some("technology"), Some("mid")).benchmark;
        assert_eq!(mid.average_for(Metric::Keyword), 70.0);

        let general = provider.get_benchmark(None, None).benchmark;
        assert_eq!(general.average_for(Metric::Keyword), general.average_ats_score);
    }

    #[test]
    fn test_list_filters_by_industry() {
        let provider = BenchmarkProvider::builtin();
        let tech = provider.list(Some("TECHNOLOGY"));
        assert_eq!(tech.len(), 4);
        assert!(tech.iter().all(|b| b.industry == "technology"));
        assert_eq!(provider.list(None).len(), BenchmarkTable::builtin().len());
    }

    #[test]
    fn test_table_without_default_rejected() {
        let table = BenchmarkTable::new(vec![benchmark(
            "technology",
            RoleLevel::Entry,
            70.0,
            (400, 700),
            &[],
            &[],
        )]);
        assert!(matches!(table, Err(AtsError::Benchmark(_))));
    }

    #[test]
    fn test_reload_swaps_whole_table() {
        let provider = BenchmarkProvider::builtin();
        let before = provider.snapshot();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("benchmarks.toml");
        std::fs::write(
            &path,
            r#"
[[benchmarks]]
industry = "general"
role_level = "general"
average_ats_score = 60.0
recommended_length_range = { min = 300, max = 600 }

[[benchmarks]]
industry = "Retail"
role_level = "entry"
average_ats_score = 65.0
recommended_length_range = { min = 300, max = 500 }
trending_keywords = ["customer service"]
"#,
        )
        .unwrap();

        provider.reload_from_path(&path).unwrap();

        let retail = provider.get_benchmark(Some("retail"), Some("entry"));
        assert!(retail.exact);
        assert_eq!(retail.benchmark.average_ats_score, 65.0);
        assert!(!provider.get_benchmark(Some("technology"), Some("senior")).exact);

        // Snapshots taken before the reload are unchanged
        assert_eq!(before.len(), BenchmarkTable::builtin().len());
    }

    #[test]
    fn test_failed_reload_keeps_current_table() {
        let provider = BenchmarkProvider::builtin();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("benchmarks.json");
        std::fs::write(&path, r#"{"benchmarks": []}"#).unwrap();

        assert!(provider.reload_from_path(&path).is_err());
        assert!(provider.get_benchmark(Some("technology"), Some("senior")).exact);
    }

    #[test]
    fn test_role_level_inference() {
        let hinted = JobDescription::new("Director of Engineering").with_seniority("Junior");
        assert_eq!(RoleLevel::infer(&hinted), RoleLevel::Entry);

        let cases = [
            ("VP of Product", RoleLevel::Executive),
            ("Senior Software Engineer", RoleLevel::Senior),
            ("Mid-level data analyst", RoleLevel::Mid),
            ("Graduate developer program", RoleLevel::Entry),
            ("Software Engineer", RoleLevel::General),
        ];
        for (text, expected) in cases {
            assert_eq!(RoleLevel::infer(&JobDescription::new(text)), expected, "{}", text);
        }
    }
}
