//! Skill gap classification for job keywords missing from a resume

use crate::processing::keywords::{KeywordSet, Zone};
use crate::processing::taxonomy::KeywordCategory;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Important,
    NiceToHave,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Critical => "critical",
            Severity::Important => "important",
            Severity::NiceToHave => "nice to have",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGap {
    /// Normalized keyword term.
    pub keyword: String,
    /// First surface form seen in the job text, for presentation.
    pub display: String,
    pub severity: Severity,
    pub category: KeywordCategory,
    pub weight: f64,
}

/// Classify every job keyword absent from the resume.
///
/// Job keywords are ranked by weight desc then term, and split into tertiles.
/// Keywords with equal weight share the tertile of the first of them.
pub fn analyze_gaps(job: &KeywordSet, resume: &KeywordSet) -> Vec<SkillGap> {
    let ranked = job.ranked();
    let n = ranked.len();
    let mut gaps = Vec::new();
    let mut tier_start = 0;

    for (rank, keyword) in ranked.iter().enumerate() {
        if rank > 0 && ranked[rank - 1].weight != keyword.weight {
            tier_start = rank;
        }
        if resume.contains(&keyword.term) {
            continue;
        }

        let tertile = tier_start * 3 / n;
        let base = match (tertile, keyword.category) {
            (0, KeywordCategory::Technical | KeywordCategory::Certification) => Severity::Critical,
            (0, _) | (1, KeywordCategory::Technical) => Severity::Important,
            _ => Severity::NiceToHave,
        };

        let severity = match keyword.zone {
            Zone::Required => base.min(Severity::Important),
            Zone::Preferred => base.max(Severity::Important),
            Zone::General => base,
        };

        gaps.push(SkillGap {
            keyword: keyword.term.clone(),
            display: keyword.display.clone(),
            severity,
            category: keyword.category,
            weight: keyword.weight,
        });
    }

    gaps.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| b.weight.total_cmp(&a.weight))
            .then_with(|| a.keyword.cmp(&b.keyword))
    });
    gaps
}
