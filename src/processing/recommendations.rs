//! Rule-based recommendations traced to skill gaps or sub-scores

use crate::processing::ats_matcher::MatchResult;
use crate::processing::benchmarks::{BenchmarkMatch, LengthRange, RoleLevel};
use crate::processing::keywords::KeywordSet;
use crate::processing::scoring::{Metric, Scoring};
use crate::processing::skill_gap::{Severity, SkillGap};
use crate::processing::text_processor::TextNormalizer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A sub-score this far below its benchmark average earns a recommendation.
const DEFICIT_THRESHOLD: f64 = 15.0;
/// Deficits beyond this are high priority.
const HIGH_DEFICIT_THRESHOLD: f64 = 30.0;
/// Failed rules listed per sub-score recommendation.
const MAX_RULE_ACTIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    Skills,
    Keywords,
    Formatting,
    Content,
    Readability,
    JobMatch,
}

impl RecommendationCategory {
    fn for_metric(metric: Metric) -> Self {
        match metric {
            Metric::Formatting => RecommendationCategory::Formatting,
            Metric::Keyword => RecommendationCategory::Keywords,
            Metric::ContentStructure => RecommendationCategory::Content,
            Metric::Readability => RecommendationCategory::Readability,
            Metric::JobMatch => RecommendationCategory::JobMatch,
        }
    }
}

impl fmt::Display for RecommendationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecommendationCategory::Skills => "skills",
            RecommendationCategory::Keywords => "keywords",
            RecommendationCategory::Formatting => "formatting",
            RecommendationCategory::Content => "content",
            RecommendationCategory::Readability => "readability",
            RecommendationCategory::JobMatch => "job match",
        };
        write!(f, "{}", name)
    }
}

/// What a recommendation was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecommendationBasis {
    SkillGaps { keywords: Vec<String> },
    SubScore { metric: Metric },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: RecommendationCategory,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    /// Estimated points regained in the targeted sub-score.
    pub impact_estimate: f64,
    pub action_items: Vec<String>,
    pub basis: RecommendationBasis,
}

/// Build ranked recommendations. `max_suggestions` of None keeps all of them.
pub fn generate(
    scoring: &Scoring,
    gaps: &[SkillGap],
    matches: &MatchResult,
    benchmark: &BenchmarkMatch,
    max_suggestions: Option<usize>,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    let gap_groups = [
        (
            Severity::Critical,
            Priority::High,
            RecommendationCategory::Skills,
            "Add critical missing skills",
        ),
        (
            Severity::Important,
            Priority::Medium,
            RecommendationCategory::Keywords,
            "Incorporate important job keywords",
        ),
        (
            Severity::NiceToHave,
            Priority::Low,
            RecommendationCategory::Keywords,
            "Consider nice-to-have keywords",
        ),
    ];

    for (severity, priority, category, title) in gap_groups {
        let group: Vec<&SkillGap> = gaps.iter().filter(|g| g.severity == severity).collect();
        if group.is_empty() {
            continue;
        }
        let keywords: Vec<String> = group.iter().map(|g| g.keyword.clone()).collect();
        let weight: f64 = group.iter().map(|g| g.weight).sum();
        let impact = if matches.total_weight > 0.0 {
            round1(100.0 * weight / matches.total_weight)
        } else {
            0.0
        };

        recommendations.push(Recommendation {
            category,
            priority,
            title: title.to_string(),
            description: format!(
                "The job description asks for {} {} keyword(s) that do not appear in your resume.",
                keywords.len(),
                severity
            ),
            impact_estimate: impact,
            action_items: keywords
                .iter()
                .map(|k| format!("Add '{}' to your skills or experience if it applies to you", k))
                .collect(),
            basis: RecommendationBasis::SkillGaps { keywords },
        });
    }

    for metric in Metric::ALL {
        if let Some(rec) = sub_score_recommendation(scoring, metric, benchmark) {
            recommendations.push(rec);
        }
    }

    recommendations.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| b.impact_estimate.total_cmp(&a.impact_estimate))
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.title.cmp(&b.title))
    });

    if let Some(max) = max_suggestions {
        recommendations.truncate(max);
    }
    recommendations
}

fn sub_score_recommendation(
    scoring: &Scoring,
    metric: Metric,
    benchmark: &BenchmarkMatch,
) -> Option<Recommendation> {
    let breakdown = scoring.breakdown(metric)?;
    let score = scoring.card.value(metric);
    let average = benchmark.benchmark.average_for(metric);
    let deficit = average - score;

    let mut failed: Vec<_> = breakdown.failed_rules().collect();
    failed.sort_by(|a, b| {
        b.shortfall()
            .total_cmp(&a.shortfall())
            .then_with(|| a.rule.cmp(&b.rule))
    });
    let recoverable: f64 = failed.iter().map(|r| r.shortfall()).sum();

    let mut action_items: Vec<String> = failed
        .iter()
        .take(MAX_RULE_ACTIONS)
        .map(|r| r.description.clone())
        .collect();

    let (priority, title, description, impact) = if deficit > DEFICIT_THRESHOLD {
        let priority = if deficit > HIGH_DEFICIT_THRESHOLD {
            Priority::High
        } else {
            Priority::Medium
        };
        if action_items.is_empty() {
            action_items.push(format!(
                "Raise {} toward the benchmark average of {:.0}",
                metric, average
            ));
        }
        let impact = if recoverable > 0.0 { recoverable } else { deficit };
        (
            priority,
            format!("Improve {}", metric),
            format!(
                "{} scored {:.0}, {:.0} points below the {} benchmark average of {:.0}.",
                metric, score, deficit, benchmark.benchmark.industry, average
            ),
            impact,
        )
    } else if !failed.is_empty() {
        (
            Priority::Low,
            format!("Polish {}", metric),
            format!(
                "{} scored {:.0}; {} rule(s) can still add points.",
                metric,
                score,
                failed.len()
            ),
            recoverable,
        )
    } else {
        return None;
    };

    Some(Recommendation {
        category: RecommendationCategory::for_metric(metric),
        priority,
        title,
        description,
        impact_estimate: round1(impact),
        action_items,
        basis: RecommendationBasis::SubScore { metric },
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthStatus {
    TooShort,
    WithinRange,
    TooLong,
}

/// How the resume compares with its industry benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryInsights {
    pub industry: String,
    pub role_level: RoleLevel,
    pub benchmark_exact: bool,
    pub average_ats_score: f64,
    pub score_vs_benchmark: f64,
    pub resume_word_count: usize,
    pub recommended_length: LengthRange,
    pub length_status: LengthStatus,
    pub trending_keywords: Vec<String>,
    pub missing_trending_keywords: Vec<String>,
    pub recommendations: Vec<String>,
}

pub fn industry_insights(
    overall: u32,
    resume_word_count: usize,
    resume_keywords: &KeywordSet,
    benchmark: &BenchmarkMatch,
    normalizer: &TextNormalizer,
) -> IndustryInsights {
    let b = &benchmark.benchmark;
    let range = b.recommended_length_range;

    let length_status = if range.contains(resume_word_count) {
        LengthStatus::WithinRange
    } else if resume_word_count < range.min as usize {
        LengthStatus::TooShort
    } else {
        LengthStatus::TooLong
    };

    let missing_trending: Vec<String> = b
        .trending_keywords
        .iter()
        .filter(|k| {
            let tokens = normalizer.normalize(k);
            tokens.is_empty() || !tokens.iter().all(|t| resume_keywords.contains(&t.term))
        })
        .cloned()
        .collect();

    let mut recommendations = Vec::new();
    match length_status {
        LengthStatus::TooShort => recommendations.push(format!(
            "Expand resume content to {}-{} words (currently {})",
            range.min, range.max, resume_word_count
        )),
        LengthStatus::TooLong => recommendations.push(format!(
            "Condense resume to {}-{} words (currently {})",
            range.min, range.max, resume_word_count
        )),
        LengthStatus::WithinRange => {}
    }
    if !missing_trending.is_empty() {
        let top: Vec<&str> = missing_trending.iter().take(3).map(String::as_str).collect();
        recommendations.push(format!(
            "Consider adding trending {} skills: {}",
            b.industry,
            top.join(", ")
        ));
    }
    let score_vs_benchmark = overall as f64 - b.average_ats_score;
    if score_vs_benchmark < 0.0 {
        recommendations.push(format!(
            "Overall score {} is below the {} average of {:.0}",
            overall, b.industry, b.average_ats_score
        ));
    }

    IndustryInsights {
        industry: b.industry.clone(),
        role_level: b.role_level,
        benchmark_exact: benchmark.exact,
        average_ats_score: b.average_ats_score,
        score_vs_benchmark,
        resume_word_count,
        recommended_length: range,
        length_status,
        trending_keywords: b.trending_keywords.clone(),
        missing_trending_keywords: missing_trending,
        recommendations,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::benchmarks::BenchmarkProvider;
    use crate::processing::keywords::{KeywordToken, Zone};
    use crate::processing::scoring::{RuleCheck, ScoreBreakdown, ScoreCard};
    use crate::processing::taxonomy::{KeywordCategory, Taxonomy};
    use std::sync::Arc;

    fn breakdown(metric: Metric, rules: Vec<(&str, f64, f64)>) -> ScoreBreakdown {
        let rules: Vec<RuleCheck> = rules
            .into_iter()
            .map(|(rule, earned, possible)| RuleCheck {
                rule: rule.to_string(),
                description: format!("{} check", rule),
                points_earned: earned,
                points_possible: possible,
            })
            .collect();
        let score = rules.iter().map(|r| r.points_earned).sum();
        ScoreBreakdown {
            metric,
            score,
            rules,
        }
    }

    fn scoring(formatting: f64, content: f64) -> Scoring {
        Scoring {
            card: ScoreCard {
                overall: 70,
                formatting: formatting as u32,
                keyword: 100,
                content_structure: content as u32,
                readability: 100,
                job_match_percentage: 100.0,
            },
            breakdowns: vec![
                breakdown(
                    Metric::Formatting,
                    vec![("summary", 0.0, 15.0), ("rest", formatting, formatting)],
                ),
                breakdown(Metric::Keyword, vec![("all", 100.0, 100.0)]),
                breakdown(
                    Metric::ContentStructure,
                    vec![("projects", 0.0, 8.0), ("rest", content, content)],
                ),
                breakdown(Metric::Readability, vec![("all", 100.0, 100.0)]),
                breakdown(Metric::JobMatch, vec![("all", 100.0, 100.0)]),
            ],
        }
    }

    fn gap(keyword: &str, severity: Severity, weight: f64) -> SkillGap {
        SkillGap {
            keyword: keyword.to_string(),
            display: keyword.to_string(),
            severity,
            category: KeywordCategory::Technical,
            weight,
        }
    }

    fn general() -> BenchmarkMatch {
        BenchmarkProvider::builtin().get_benchmark(None, None)
    }

    #[test]
    fn test_critical_gaps_are_high_priority() {
        let matches = MatchResult {
            total_weight: 20.0,
            ..Default::default()
        };
        let gaps = vec![
            gap("aws", Severity::Critical, 3.0),
            gap("gcp", Severity::Critical, 3.0),
            gap("agile", Severity::NiceToHave, 1.5),
        ];
        let recs = generate(&scoring(100.0, 100.0), &gaps, &matches, &general(), None);

        let first = &recs[0];
        assert_eq!(first.priority, Priority::High);
        assert_eq!(first.category, RecommendationCategory::Skills);
        assert_eq!(first.action_items.len(), 2);
        assert_eq!(first.impact_estimate, 30.0);
        assert_eq!(
            first.basis,
            RecommendationBasis::SkillGaps {
                keywords: vec!["aws".to_string(), "gcp".to_string()]
            }
        );
        assert!(recs.iter().any(|r| r.priority == Priority::Low
            && r.category == RecommendationCategory::Keywords));
    }

    #[test]
    fn test_deficit_priorities() {
        // general benchmark average is 70
        let recs = generate(
            &scoring(35.0, 50.0),
            &[],
            &MatchResult::default(),
            &general(),
            None,
        );

        let formatting = recs
            .iter()
            .find(|r| r.basis == RecommendationBasis::SubScore { metric: Metric::Formatting })
            .unwrap();
        assert_eq!(formatting.priority, Priority::High);
        assert_eq!(formatting.action_items, vec!["summary check".to_string()]);

        let content = recs
            .iter()
            .find(|r| r.basis == RecommendationBasis::SubScore { metric: Metric::ContentStructure })
            .unwrap();
        assert_eq!(content.priority, Priority::Medium);
    }

    #[test]
    fn test_no_deficit_no_failure_produces_nothing() {
        let recs = generate(
            &scoring(100.0, 100.0),
            &[],
            &MatchResult::default(),
            &general(),
            None,
        );
        // Only the two polish recommendations for rules that failed
        assert_eq!(recs.len(), 2);
        assert!(recs.iter().all(|r| r.priority == Priority::Low));
        assert!(recs.iter().all(|r| !r.action_items.is_empty()));
        assert!(!recs.iter().any(|r| r.basis
            == RecommendationBasis::SubScore {
                metric: Metric::Readability
            }));
    }

    #[test]
    fn test_ordering_and_cap() {
        let matches = MatchResult {
            total_weight: 10.0,
            ..Default::default()
        };
        let gaps = vec![
            gap("aws", Severity::Critical, 3.0),
            gap("docker", Severity::Important, 2.5),
        ];
        let recs = generate(&scoring(35.0, 50.0), &gaps, &matches, &general(), None);
        for pair in recs.windows(2) {
            assert!(pair[0].priority <= pair[1].priority);
            if pair[0].priority == pair[1].priority {
                assert!(pair[0].impact_estimate >= pair[1].impact_estimate);
            }
        }

        let capped = generate(&scoring(35.0, 50.0), &gaps, &matches, &general(), Some(2));
        assert_eq!(capped.len(), 2);
        assert_eq!(capped[..], recs[..2]);
    }

    #[test]
    fn test_industry_insights() {
        let normalizer = TextNormalizer::new(Arc::new(Taxonomy::builtin())).unwrap();
        let provider = BenchmarkProvider::builtin();
        let benchmark = provider.get_benchmark(Some("technology"), Some("entry"));

        let resume_keywords: KeywordSet = vec![KeywordToken {
            term: "git".to_string(),
            display: "Git".to_string(),
            category: KeywordCategory::Tool,
            frequency: 1,
            weight: 2.5,
            zone: Zone::General,
        }]
        .into_iter()
        .collect();

        let insights = industry_insights(60, 120, &resume_keywords, &benchmark, &normalizer);
        assert!(insights.benchmark_exact);
        assert_eq!(insights.length_status, LengthStatus::TooShort);
        assert_eq!(insights.score_vs_benchmark, -12.0);
        assert!(!insights.missing_trending_keywords.contains(&"git".to_string()));
        assert!(insights
            .missing_trending_keywords
            .contains(&"agile".to_string()));
        assert_eq!(insights.recommendations.len(), 3);

        let range = benchmark.benchmark.recommended_length_range;
        let at_max = industry_insights(90, range.max as usize, &resume_keywords, &benchmark, &normalizer);
        assert_eq!(at_max.length_status, LengthStatus::WithinRange);
        let over = industry_insights(90, range.max as usize + 1, &resume_keywords, &benchmark, &normalizer);
        assert_eq!(over.length_status, LengthStatus::TooLong);
    }
}
