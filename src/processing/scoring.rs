//! ATS scoring engine
//!
//! Every sub-score is a pure function of its inputs and returns the rule
//! checks that produced it, so recommendations can point at concrete failures.

use crate::config::ScoreWeights;
use crate::processing::ats_matcher::MatchResult;
use crate::processing::document::{ResumeContent, SectionType};
use crate::processing::text_processor::{split_sentences, word_count, TextNormalizer};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$").expect("Invalid date regex"));

static FIRST_PERSON_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:i|me|my|mine|myself|we|our|ours)\b").expect("Invalid pronoun regex")
});

static WEAK_OPENER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:responsible\s+for|duties\s+included|worked\s+on|helped\s+with|assisted\s+(?:in|with)|i\s+am\s+an?|my\s+name\s+is|looking\s+for|seeking)\b",
    )
    .expect("Invalid weak opener regex")
});

const ACTION_VERBS: &[&str] = &[
    "achieved", "administered", "analyzed", "architected", "automated", "built", "coordinated",
    "created", "delivered", "designed", "developed", "enhanced", "established", "executed",
    "implemented", "improved", "increased", "launched", "led", "managed", "mentored",
    "migrated", "optimized", "organized", "reduced", "spearheaded", "streamlined",
    "supervised",
];

/// Distinct action verbs expected to open bullets.
const MIN_ACTION_VERBS: usize = 3;
/// Share of summary and bullet words that are taxonomy keywords before it reads as stuffing.
const MAX_KEYWORD_DENSITY: f64 = 15.0;
/// Weak openers quoted in a failed rule description.
const MAX_QUOTED_OPENERS: usize = 3;

/// The scored dimensions that feed the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Formatting,
    Keyword,
    ContentStructure,
    Readability,
    JobMatch,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Formatting,
        Metric::Keyword,
        Metric::ContentStructure,
        Metric::Readability,
        Metric::JobMatch,
    ];

    pub fn weight(self, weights: &ScoreWeights) -> f64 {
        match self {
            Metric::Formatting => weights.formatting,
            Metric::Keyword => weights.keyword,
            Metric::ContentStructure => weights.content_structure,
            Metric::Readability => weights.readability,
            Metric::JobMatch => weights.job_match,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Formatting => "Formatting",
            Metric::Keyword => "Keyword Optimization",
            Metric::ContentStructure => "Content Structure",
            Metric::Readability => "Readability",
            Metric::JobMatch => "Job Match",
        };
        write!(f, "{}", name)
    }
}

/// One scoring rule and the points it contributed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCheck {
    pub rule: String,
    pub description: String,
    pub points_earned: f64,
    pub points_possible: f64,
}

impl RuleCheck {
    fn new(rule: &str, description: impl Into<String>, earned: f64, possible: f64) -> Self {
        Self {
            rule: rule.to_string(),
            description: description.into(),
            points_earned: earned,
            points_possible: possible,
        }
    }

    fn pass_fail(rule: &str, description: impl Into<String>, passed: bool, possible: f64) -> Self {
        Self::new(rule, description, if passed { possible } else { 0.0 }, possible)
    }

    pub fn passed(&self) -> bool {
        self.points_earned >= self.points_possible
    }

    /// Points missing from this rule.
    pub fn shortfall(&self) -> f64 {
        (self.points_possible - self.points_earned).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub metric: Metric,
    pub score: f64,
    pub rules: Vec<RuleCheck>,
}

impl ScoreBreakdown {
    fn from_rules(metric: Metric, rules: Vec<RuleCheck>) -> Self {
        let total: f64 = rules.iter().map(|r| r.points_earned).sum();
        Self {
            metric,
            score: total.round().clamp(0.0, 100.0),
            rules,
        }
    }

    pub fn failed_rules(&self) -> impl Iterator<Item = &RuleCheck> {
        self.rules.iter().filter(|r| !r.passed())
    }
}

/// Final scores of one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub overall: u32,
    pub formatting: u32,
    pub keyword: u32,
    pub content_structure: u32,
    pub readability: u32,
    pub job_match_percentage: f64,
}

impl ScoreCard {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Formatting => self.formatting as f64,
            Metric::Keyword => self.keyword as f64,
            Metric::ContentStructure => self.content_structure as f64,
            Metric::Readability => self.readability as f64,
            Metric::JobMatch => self.job_match_percentage,
        }
    }
}

/// A score card stamped with the time it was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    #[serde(flatten)]
    pub scores: ScoreCard,
    pub timestamp: DateTime<Utc>,
}

impl ScoreRecord {
    pub fn new(scores: ScoreCard, timestamp: DateTime<Utc>) -> Self {
        Self { scores, timestamp }
    }

    pub fn now(scores: ScoreCard) -> Self {
        Self::new(scores, Utc::now())
    }
}

/// Component values fed into the overall score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub formatting: f64,
    pub keyword: f64,
    pub content_structure: f64,
    pub readability: f64,
    pub job_match: f64,
}

impl SubScores {
    fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Formatting => self.formatting,
            Metric::Keyword => self.keyword,
            Metric::ContentStructure => self.content_structure,
            Metric::Readability => self.readability,
            Metric::JobMatch => self.job_match,
        }
    }
}

/// Score card plus the breakdown of each scored metric.
#[derive(Debug, Clone, PartialEq)]
pub struct Scoring {
    pub card: ScoreCard,
    pub breakdowns: Vec<ScoreBreakdown>,
}

impl Scoring {
    pub fn breakdown(&self, metric: Metric) -> Option<&ScoreBreakdown> {
        self.breakdowns.iter().find(|b| b.metric == metric)
    }
}

/// Run every scorer and combine them with the configured weights.
pub fn score_resume(
    resume: &ResumeContent,
    matches: &MatchResult,
    weights: &ScoreWeights,
    normalizer: &TextNormalizer,
) -> Scoring {
    let formatting = formatting_score(resume);
    let keyword = keyword_score(matches);
    let content = content_structure_score(resume);
    let readability = readability_score(resume, normalizer);
    let job_match = job_match_percentage(keyword.score as u32, matches);

    let sub_scores = SubScores {
        formatting: formatting.score,
        keyword: keyword.score,
        content_structure: content.score,
        readability: readability.score,
        job_match: job_match.score,
    };

    let card = ScoreCard {
        overall: overall_ats_score(&sub_scores, weights),
        formatting: formatting.score as u32,
        keyword: keyword.score as u32,
        content_structure: content.score as u32,
        readability: readability.score as u32,
        job_match_percentage: job_match.score,
    };

    Scoring {
        card,
        breakdowns: vec![formatting, keyword, content, readability, job_match],
    }
}

/// Weighted share of job keywords present in the resume. 100 when the job has none.
pub fn keyword_score(matches: &MatchResult) -> ScoreBreakdown {
    if matches.total_weight <= 0.0 {
        let rules = vec![RuleCheck::new(
            "no_job_keywords",
            "Job description has no keywords to match",
            100.0,
            100.0,
        )];
        return ScoreBreakdown::from_rules(Metric::Keyword, rules);
    }

    let total = matches.total_weight;
    let mut rules: Vec<RuleCheck> = matches
        .matched
        .iter()
        .map(|k| (k, true))
        .chain(matches.missing.iter().map(|k| (k, false)))
        .map(|(k, present)| {
            let possible = 100.0 * k.weight / total;
            let description = if present {
                format!("'{}' found in resume", k.display)
            } else {
                format!("'{}' missing from resume", k.display)
            };
            RuleCheck::new(&k.term, description, if present { possible } else { 0.0 }, possible)
        })
        .collect();
    rules.sort_by(|a, b| a.rule.cmp(&b.rule));

    let score = (100.0 * matches.matched_weight / total).round().clamp(0.0, 100.0);
    ScoreBreakdown {
        metric: Metric::Keyword,
        score,
        rules,
    }
}

/// Structural checks an ATS parser relies on. Independent of the job.
pub fn formatting_score(resume: &ResumeContent) -> ScoreBreakdown {
    let info = &resume.personal_info;

    let has_name = !info.first_name.trim().is_empty() && !info.last_name.trim().is_empty();
    let valid_email = EMAIL_RE.is_match(info.email.trim());
    let phone_digits = info.phone.chars().filter(char::is_ascii_digit).count();

    let complete_entries = !resume.work_experience.is_empty()
        && resume.work_experience.iter().all(|job| {
            !job.job_title.trim().is_empty()
                && !job.company.trim().is_empty()
                && job
                    .start_date
                    .as_deref()
                    .map_or(false, |d| !d.trim().is_empty())
        });

    let dates: Vec<&str> = resume
        .work_experience
        .iter()
        .flat_map(|job| [job.start_date.as_deref(), job.end_date.as_deref()])
        .flatten()
        .map(str::trim)
        .filter(|d| !d.is_empty() && !d.eq_ignore_ascii_case("present"))
        .collect();
    let consistent_dates = !dates.is_empty() && dates.iter().all(|d| DATE_RE.is_match(d));

    let clean_characters = resume
        .text_segments()
        .into_iter()
        .chain([info.email.as_str(), info.phone.as_str()])
        .all(|s| !s.chars().any(is_ats_breaking));

    let rules = vec![
        RuleCheck::pass_fail("contact_name", "First and last name present", has_name, 5.0),
        RuleCheck::pass_fail("valid_email", "Valid email address", valid_email, 5.0),
        RuleCheck::pass_fail(
            "phone_number",
            "Phone number with at least 10 digits",
            phone_digits >= 10,
            5.0,
        ),
        RuleCheck::pass_fail(
            "professional_summary",
            "Professional summary section",
            resume.has_section(SectionType::Summary),
            15.0,
        ),
        RuleCheck::pass_fail(
            "work_experience",
            "Work experience section",
            resume.has_section(SectionType::Experience),
            20.0,
        ),
        RuleCheck::pass_fail(
            "education",
            "Education section",
            resume.has_section(SectionType::Education),
            15.0,
        ),
        RuleCheck::pass_fail(
            "skills",
            "Skills section",
            resume.has_section(SectionType::Skills),
            10.0,
        ),
        RuleCheck::pass_fail(
            "complete_experience_entries",
            "Every experience entry has title, company and start date",
            complete_entries,
            10.0,
        ),
        RuleCheck::pass_fail(
            "consistent_dates",
            "Dates use the YYYY-MM format",
            consistent_dates,
            10.0,
        ),
        RuleCheck::pass_fail(
            "ats_safe_characters",
            "No box drawing, private-use, pictograph or control characters",
            clean_characters,
            5.0,
        ),
    ];

    ScoreBreakdown::from_rules(Metric::Formatting, rules)
}

/// Section presence and depth. A missing section scores 0 for that section.
pub fn content_structure_score(resume: &ResumeContent) -> ScoreBreakdown {
    let summary_words = resume.summary().map(word_count).unwrap_or(0);
    let summary_points = match summary_words {
        0 => 0.0,
        1..=9 => 8.0,
        _ => 15.0,
    };

    let jobs = &resume.work_experience;
    let avg_bullets = if jobs.is_empty() {
        0.0
    } else {
        let bullets: usize = jobs
            .iter()
            .map(|j| j.responsibilities.iter().filter(|r| !r.trim().is_empty()).count())
            .sum();
        bullets as f64 / jobs.len() as f64
    };
    let bullet_points = if avg_bullets >= 3.0 {
        20.0
    } else if avg_bullets >= 2.0 {
        12.0
    } else if avg_bullets >= 1.0 {
        6.0
    } else {
        0.0
    };

    let education_complete = !resume.education.is_empty()
        && resume
            .education
            .iter()
            .all(|e| !e.degree.trim().is_empty() && !e.institution.trim().is_empty());

    let skill_count = resume.skills.count();
    let skill_points = match skill_count {
        0 => 0.0,
        1..=4 => 8.0,
        5..=7 => 15.0,
        _ => 20.0,
    };

    let rules = vec![
        RuleCheck::new(
            "summary_depth",
            format!("Professional summary of at least 10 words ({} words)", summary_words),
            summary_points,
            15.0,
        ),
        RuleCheck::pass_fail(
            "experience_present",
            "Work experience entries present",
            !jobs.is_empty(),
            15.0,
        ),
        RuleCheck::new(
            "experience_bullets",
            format!("At least 3 bullets per role (average {:.1})", avg_bullets),
            bullet_points,
            20.0,
        ),
        RuleCheck::pass_fail(
            "education_present",
            "Education entries present",
            !resume.education.is_empty(),
            10.0,
        ),
        RuleCheck::pass_fail(
            "education_complete",
            "Every education entry has degree and institution",
            education_complete,
            5.0,
        ),
        RuleCheck::new(
            "skills_breadth",
            format!("At least 8 listed skills ({} listed)", skill_count),
            skill_points,
            20.0,
        ),
        RuleCheck::pass_fail(
            "projects",
            "Projects section",
            resume.has_section(SectionType::Projects),
            8.0,
        ),
        RuleCheck::pass_fail(
            "certifications",
            "Certifications section",
            resume.has_section(SectionType::Certifications),
            7.0,
        ),
    ];

    ScoreBreakdown::from_rules(Metric::ContentStructure, rules)
}

/// Sentence length, quantified achievements, impersonal voice, action verbs,
/// weak openers and keyword density of the prose (summary and bullets).
pub fn readability_score(resume: &ResumeContent, normalizer: &TextNormalizer) -> ScoreBreakdown {
    let bullets = resume.bullets();
    let summary = resume.summary();
    let mut sentences: Vec<String> = summary.map(split_sentences).unwrap_or_default();
    sentences.extend(bullets.iter().map(|b| b.to_string()));

    let avg_len = if sentences.is_empty() {
        None
    } else {
        let words: usize = sentences.iter().map(|s| word_count(s)).sum();
        Some(words as f64 / sentences.len() as f64)
    };
    let length_points = match avg_len {
        None => 0.0,
        Some(avg) if (8.0..=20.0).contains(&avg) => 30.0,
        Some(avg) if (5.0..8.0).contains(&avg) || (avg > 20.0 && avg <= 25.0) => 20.0,
        Some(_) => 8.0,
    };

    let quantified = bullets
        .iter()
        .filter(|b| b.chars().any(|c| c.is_ascii_digit() || c == '%' || c == '$'))
        .count();
    let quantified_ratio = ratio(quantified, bullets.len());

    let impersonal = sentences
        .iter()
        .filter(|s| !FIRST_PERSON_RE.is_match(s))
        .count();
    let impersonal_ratio = ratio(impersonal, sentences.len());

    let verbs = action_verbs(&bullets);
    let verb_points = 10.0 * verbs.len().min(MIN_ACTION_VERBS) as f64 / MIN_ACTION_VERBS as f64;

    let openings: Vec<&str> = summary.into_iter().chain(bullets.iter().copied()).collect();
    let weak: Vec<&str> = openings
        .iter()
        .copied()
        .filter(|text| WEAK_OPENER_RE.is_match(text))
        .collect();
    let strong_ratio = ratio(openings.len() - weak.len(), openings.len());

    let prose_words: usize = openings.iter().map(|t| word_count(t)).sum();
    let prose_keywords: usize = openings
        .iter()
        .flat_map(|t| normalizer.normalize(t))
        .filter(|token| normalizer.taxonomy().contains(&token.term))
        .count();
    let density = if prose_words == 0 {
        None
    } else {
        Some(100.0 * prose_keywords as f64 / prose_words as f64)
    };

    let rules = vec![
        RuleCheck::new(
            "sentence_length",
            match avg_len {
                Some(avg) => format!("Average sentence length of 8-20 words ({:.1})", avg),
                None => "No sentences to evaluate".to_string(),
            },
            length_points,
            30.0,
        ),
        RuleCheck::new(
            "quantified_achievements",
            format!("{} of {} bullets include numbers", quantified, bullets.len()),
            quantified_ratio * 25.0,
            25.0,
        ),
        RuleCheck::new(
            "impersonal_voice",
            format!(
                "{} of {} sentences avoid first-person pronouns",
                impersonal,
                sentences.len()
            ),
            impersonal_ratio * 15.0,
            15.0,
        ),
        RuleCheck::new(
            "action_verbs",
            if verbs.is_empty() {
                format!(
                    "Start bullets with strong action verbs such as led, developed or reduced (at least {} different)",
                    MIN_ACTION_VERBS
                )
            } else {
                format!(
                    "{} distinct action verb(s) open bullets, at least {} expected ({})",
                    verbs.len(),
                    MIN_ACTION_VERBS,
                    verbs.join(", ")
                )
            },
            verb_points,
            10.0,
        ),
        RuleCheck::new(
            "weak_openers",
            if weak.is_empty() {
                format!("{} summary and bullet openings avoid weak phrasing", openings.len())
            } else {
                let quoted: Vec<String> = weak
                    .iter()
                    .take(MAX_QUOTED_OPENERS)
                    .map(|t| format!("'{}'", t.trim()))
                    .collect();
                format!(
                    "Rewrite {} opening(s) that start with weak phrasing like 'Responsible for': {}",
                    weak.len(),
                    quoted.join("; ")
                )
            },
            strong_ratio * 10.0,
            10.0,
        ),
        match density {
            Some(d) if d > MAX_KEYWORD_DENSITY => RuleCheck::new(
                "keyword_density",
                format!(
                    "Keyword density of {:.1}% in summary and bullets reads as keyword stuffing (keep it under {:.0}%)",
                    d, MAX_KEYWORD_DENSITY
                ),
                0.0,
                10.0,
            ),
            Some(d) => RuleCheck::new(
                "keyword_density",
                format!("Keyword density of {:.1}% in summary and bullets", d),
                10.0,
                10.0,
            ),
            None => RuleCheck::new("keyword_density", "No summary or bullets to evaluate", 0.0, 10.0),
        },
    ];

    ScoreBreakdown::from_rules(Metric::Readability, rules)
}

/// Distinct action verbs that open a bullet, in first-seen order.
pub fn action_verbs(bullets: &[&str]) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for bullet in bullets {
        let first = bullet
            .split_whitespace()
            .next()
            .map(|w| w.trim_end_matches(|c: char| !c.is_alphanumeric()).to_lowercase());
        if let Some(word) = first {
            if ACTION_VERBS.contains(&word.as_str()) && !found.contains(&word) {
                found.push(word);
            }
        }
    }
    found
}

fn ratio(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

/// Blend of weighted keyword score and technical/tool coverage, one decimal.
pub fn job_match_percentage(keyword_score: u32, matches: &MatchResult) -> ScoreBreakdown {
    let (matched_hard, total_hard) = matches.hard_skill_counts();
    let coverage = if total_hard == 0 {
        100.0
    } else {
        100.0 * matched_hard as f64 / total_hard as f64
    };

    let keyword_part = 0.7 * keyword_score.min(100) as f64;
    let coverage_part = 0.3 * coverage;
    let score = ((keyword_part + coverage_part) * 10.0).round() / 10.0;

    let missing_hard: Vec<&str> = matches
        .missing
        .iter()
        .filter(|k| k.category.is_hard_skill())
        .map(|k| k.display.as_str())
        .collect();

    let rules = vec![
        RuleCheck::new(
            "weighted_keyword_coverage",
            format!("Keyword score {} of 100", keyword_score),
            keyword_part,
            70.0,
        ),
        RuleCheck::new(
            "technical_coverage",
            if missing_hard.is_empty() {
                format!("{} of {} technical/tool keywords present", matched_hard, total_hard)
            } else {
                format!(
                    "{} of {} technical/tool keywords present, missing: {}",
                    matched_hard,
                    total_hard,
                    missing_hard.join(", ")
                )
            },
            coverage_part,
            30.0,
        ),
    ];

    ScoreBreakdown {
        metric: Metric::JobMatch,
        score: score.clamp(0.0, 100.0),
        rules,
    }
}

/// Weighted sum of the five components, rounded.
pub fn overall_ats_score(scores: &SubScores, weights: &ScoreWeights) -> u32 {
    let total: f64 = Metric::ALL
        .iter()
        .map(|m| m.weight(weights) * scores.value(*m))
        .sum();
    total.round().clamp(0.0, 100.0) as u32
}

/// Characters that commonly break ATS text extraction.
fn is_ats_breaking(c: char) -> bool {
    matches!(c,
        '\u{2500}'..='\u{259F}'      // box drawing, block elements
        | '\u{E000}'..='\u{F8FF}'    // private use
        | '\u{F0000}'..='\u{10FFFF}'
        | '\u{2600}'..='\u{27BF}'    // misc symbols, dingbats
        | '\u{1F000}'..='\u{1FAFF}'  // pictographs, emoji
    ) || (c.is_control() && c != '\n' && c != '\t')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::document::{
        Certification, Education, PersonalInfo, Project, Skills, WorkExperience,
    };
    use crate::processing::keywords::{KeywordToken, Zone};
    use crate::processing::taxonomy::{KeywordCategory, Taxonomy};
    use std::sync::Arc;

    fn normalizer() -> TextNormalizer {
        TextNormalizer::new(Arc::new(Taxonomy::builtin())).unwrap()
    }

    fn token(term: &str, category: KeywordCategory, weight: f64) -> KeywordToken {
        KeywordToken {
            term: term.to_string(),
            display: term.to_string(),
            category,
            frequency: 1,
            weight,
            zone: Zone::General,
        }
    }

    fn complete_resume() -> ResumeContent {
        ResumeContent {
            personal_info: PersonalInfo {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                email: "jane.doe@example.com".to_string(),
                phone: "+1 (555) 123-4567".to_string(),
                ..Default::default()
            },
            professional_summary: Some(
                "Backend engineer with eight years building reliable payment systems at scale."
                    .to_string(),
            ),
            work_experience: vec![WorkExperience {
                job_title: "Senior Engineer".to_string(),
                company: "Acme".to_string(),
                start_date: Some("2019-03".to_string()),
                end_date: Some("Present".to_string()),
                location: None,
                responsibilities: vec![
                    "Reduced payment latency by 40% across three regions".to_string(),
                    "Led migration of 12 services to Kubernetes with zero downtime".to_string(),
                    "Mentored 4 engineers through structured code review sessions".to_string(),
                ],
            }],
            education: vec![Education {
                degree: "BSc Computer Science".to_string(),
                institution: "State University".to_string(),
                graduation_year: Some("2014".to_string()),
                field_of_study: None,
            }],
            skills: Skills {
                technical: vec!["Python", "Rust", "Go", "SQL", "Kafka"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
                tools: vec!["Docker", "Kubernetes", "Terraform"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
                ..Default::default()
            },
            certifications: vec![Certification {
                name: "CKA".to_string(),
                issuer: "CNCF".to_string(),
                issue_date: None,
            }],
            projects: vec![Project {
                name: "ledger".to_string(),
                description: "Open source double-entry ledger handling 1M events per day"
                    .to_string(),
                technologies: vec!["Rust".to_string()],
            }],
        }
    }

    #[test]
    fn test_overall_fixture() {
        let scores = SubScores {
            formatting: 92.0,
            keyword: 78.0,
            content_structure: 86.0,
            readability: 89.0,
            job_match: 73.5,
        };
        assert_eq!(overall_ats_score(&scores, &ScoreWeights::default()), 84);
    }

    #[test]
    fn test_keyword_score_worked_example() {
        let matches = MatchResult {
            matched: vec![
                token("python", KeywordCategory::Technical, 3.0),
                token("react", KeywordCategory::Technical, 3.0),
            ],
            missing: vec![
                token("agile", KeywordCategory::SoftSkill, 1.5),
                token("aws", KeywordCategory::Technical, 3.0),
                token("docker", KeywordCategory::Tool, 2.5),
                token("engineer", KeywordCategory::Generic, 1.0),
                token("senior", KeywordCategory::Generic, 1.0),
                token("softwar", KeywordCategory::Generic, 1.0),
            ],
            matched_weight: 6.0,
            total_weight: 16.0,
        };

        let keyword = keyword_score(&matches);
        assert_eq!(keyword.score, 38.0);
        assert_eq!(keyword.failed_rules().count(), 6);

        let job_match = job_match_percentage(38, &matches);
        // 0.7 * 38 + 0.3 * 50
        assert_eq!(job_match.score, 41.6);
    }

    #[test]
    fn test_empty_job_fallback() {
        let matches = MatchResult::default();
        assert_eq!(keyword_score(&matches).score, 100.0);
        assert_eq!(job_match_percentage(100, &matches).score, 100.0);
    }

    #[test]
    fn test_complete_resume_formatting() {
        let breakdown = formatting_score(&complete_resume());
        assert_eq!(breakdown.score, 100.0);
        assert_eq!(breakdown.failed_rules().count(), 0);
        let possible: f64 = breakdown.rules.iter().map(|r| r.points_possible).sum();
        assert_eq!(possible, 100.0);
    }

    #[test]
    fn test_bad_dates_and_symbols_lose_points() {
        let mut resume = complete_resume();
        resume.work_experience[0].start_date = Some("March 2019".to_string());
        resume.work_experience[0].responsibilities[0] = "\u{2605} Shipped features".to_string();

        let breakdown = formatting_score(&resume);
        assert_eq!(breakdown.score, 85.0);
        let failed: Vec<&str> = breakdown.failed_rules().map(|r| r.rule.as_str()).collect();
        assert_eq!(failed, vec!["consistent_dates", "ats_safe_characters"]);
    }

    #[test]
    fn test_complete_resume_content() {
        let breakdown = content_structure_score(&complete_resume());
        // 8 skills, 3 bullets, everything present
        assert_eq!(breakdown.score, 100.0);
    }

    #[test]
    fn test_content_partial_credit() {
        let mut resume = complete_resume();
        resume.professional_summary = Some("Backend engineer.".to_string());
        resume.work_experience[0].responsibilities.truncate(2);
        resume.skills.tools.clear();
        resume.projects.clear();

        // 8 + 15 + 12 + 15 + 15 + 0 + 7
        assert_eq!(content_structure_score(&resume).score, 72.0);
    }

    #[test]
    fn test_readability() {
        let breakdown = readability_score(&complete_resume(), &normalizer());
        assert_eq!(breakdown.score, 100.0);

        let mut resume = complete_resume();
        resume.work_experience[0].responsibilities =
            vec!["I built my own tooling for the team".to_string()];
        resume.projects.clear();
        let breakdown = readability_score(&resume, &normalizer());
        // 30 length + 0 numbers + 7.5 half first person + 0 verbs + 10 openers + 10 density
        assert_eq!(breakdown.score, 58.0);
    }

    #[test]
    fn test_action_verbs_open_bullets() {
        let bullets = [
            "Led the platform team",
            "led hiring",
            "Reduced costs by 10%",
            "Kubernetes rollout",
            "Designed: the schema",
        ];
        assert_eq!(action_verbs(&bullets), vec!["led", "reduced", "designed"]);
        assert!(action_verbs(&[]).is_empty());

        let mut resume = complete_resume();
        resume.work_experience[0].responsibilities = vec![
            "Led migration of 12 services to Kubernetes".to_string(),
            "Led a team of 4 engineers through 3 launches".to_string(),
        ];
        resume.projects.clear();
        let breakdown = readability_score(&resume, &normalizer());
        let rule = breakdown.rules.iter().find(|r| r.rule == "action_verbs").unwrap();
        assert!(!rule.passed());
        assert!(rule.description.contains("led"));
    }

    #[test]
    fn test_weak_openers_are_reported() {
        let mut resume = complete_resume();
        resume.professional_summary =
            Some("Seeking a backend role where I can grow as an engineer".to_string());
        resume.work_experience[0].responsibilities = vec![
            "Responsible for the billing service and its 3 databases".to_string(),
            "Reduced payment latency by 40% across three regions".to_string(),
        ];
        resume.projects.clear();

        let breakdown = readability_score(&resume, &normalizer());
        let rule = breakdown.rules.iter().find(|r| r.rule == "weak_openers").unwrap();
        // summary and one of two bullets are weak
        assert!((rule.points_earned - 10.0 / 3.0).abs() < 1e-9);
        assert!(rule.description.contains("'Responsible for the billing service"));
        assert!(rule.description.contains("'Seeking a backend role"));
    }

    #[test]
    fn test_keyword_stuffing_fails_density_rule() {
        let mut resume = complete_resume();
        resume.professional_summary = Some(
            "Python AWS Docker Kubernetes Terraform Kafka SQL Rust engineer with Agile Scrum"
                .to_string(),
        );
        let breakdown = readability_score(&resume, &normalizer());
        let rule = breakdown.rules.iter().find(|r| r.rule == "keyword_density").unwrap();
        assert_eq!(rule.points_earned, 0.0);
        assert!(rule.description.contains("keyword stuffing"));

        let clean = readability_score(&complete_resume(), &normalizer());
        let rule = clean.rules.iter().find(|r| r.rule == "keyword_density").unwrap();
        assert!(rule.passed());
    }

    #[test]
    fn test_empty_resume_scores_low() {
        let resume = ResumeContent::default();
        assert_eq!(formatting_score(&resume).score, 5.0);
        assert_eq!(content_structure_score(&resume).score, 0.0);
        assert_eq!(readability_score(&resume, &normalizer()).score, 0.0);
    }

    #[test]
    fn test_score_resume_is_deterministic() {
        let resume = complete_resume();
        let matches = MatchResult::default();
        let weights = ScoreWeights::default();
        let normalizer = normalizer();
        let a = score_resume(&resume, &matches, &weights, &normalizer);
        let b = score_resume(&resume, &matches, &weights, &normalizer);
        assert_eq!(a, b);
        assert_eq!(a.card.overall, 100);
        assert!(a.breakdown(Metric::Readability).is_some());
    }
}
