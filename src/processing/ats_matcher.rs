//! ATS keyword matching between job and resume keyword sets

use crate::processing::keywords::{KeywordSet, KeywordToken};
use serde::{Deserialize, Serialize};

/// Job keywords split by presence in the resume. Tokens carry job-side weight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched: Vec<KeywordToken>,
    pub missing: Vec<KeywordToken>,
    pub matched_weight: f64,
    pub total_weight: f64,
}

impl MatchResult {
    /// Weighted coverage in [0, 1]. None when the job has no keywords.
    pub fn coverage(&self) -> Option<f64> {
        if self.total_weight > 0.0 {
            Some((self.matched_weight / self.total_weight).clamp(0.0, 1.0))
        } else {
            None
        }
    }

    /// Matched and total counts of technical/tool keywords.
    pub fn hard_skill_counts(&self) -> (usize, usize) {
        let matched = self
            .matched
            .iter()
            .filter(|k| k.category.is_hard_skill())
            .count();
        let missing = self
            .missing
            .iter()
            .filter(|k| k.category.is_hard_skill())
            .count();
        (matched, matched + missing)
    }

    /// Normalized terms of the matched keywords, independent of job text casing.
    pub fn matched_terms(&self) -> Vec<String> {
        self.matched.iter().map(|k| k.term.clone()).collect()
    }

    pub fn missing_terms(&self) -> Vec<String> {
        self.missing.iter().map(|k| k.term.clone()).collect()
    }
}

pub struct KeywordMatcher;

impl KeywordMatcher {
    /// Split job keywords into matched and missing. Output follows term order.
    pub fn match_keywords(job: &KeywordSet, resume: &KeywordSet) -> MatchResult {
        let mut result = MatchResult::default();

        for keyword in job.iter() {
            result.total_weight += keyword.weight;
            if resume.contains(&keyword.term) {
                result.matched_weight += keyword.weight;
                result.matched.push(keyword.clone());
            } else {
                result.missing.push(keyword.clone());
            }
        }

        result
    }

    /// Share of resume keyword weight carried by matched job terms, as a percentage.
    pub fn keyword_density(resume: &KeywordSet, result: &MatchResult) -> f64 {
        let total = resume.total_weight();
        if total <= 0.0 {
            return 0.0;
        }

        let matched: f64 = result
            .matched
            .iter()
            .filter_map(|k| resume.get(&k.term))
            .map(|k| k.weight)
            .sum();

        round_to(matched / total * 100.0, 2)
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategoryMultipliers;
    use crate::processing::keywords::{KeywordExtractor, KeywordSource};
    use crate::processing::taxonomy::Taxonomy;
    use crate::processing::text_processor::TextNormalizer;
    use std::sync::Arc;

    fn sets(job: &str, resume: &str) -> (KeywordSet, KeywordSet) {
        let normalizer = TextNormalizer::new(Arc::new(Taxonomy::builtin())).unwrap();
        let ex = KeywordExtractor::new(normalizer, CategoryMultipliers::default(), 50);
        let job_tokens = ex.normalizer().normalize(job);
        let resume_tokens = ex.normalizer().normalize(resume);
        (
            ex.extract(&job_tokens, KeywordSource::Job),
            ex.extract(&resume_tokens, KeywordSource::Resume),
        )
    }

    #[test]
    fn test_exact_matching() {
        let (job, resume) = sets(
            "Senior Software Engineer with Python, React, AWS, Docker, and Agile",
            "Python React",
        );
        let result = KeywordMatcher::match_keywords(&job, &resume);

        assert_eq!(result.matched_weight, 6.0);
        assert_eq!(result.total_weight, 16.0);
        assert_eq!(result.coverage(), Some(0.375));
        assert_eq!(result.matched_terms(), vec!["python", "react"]);
        assert!(result.missing_terms().contains(&"aws".to_string()));
        assert_eq!(result.hard_skill_counts(), (2, 4));
    }

    #[test]
    fn test_terms_ignore_job_casing() {
        let (upper, resume) = sets("PYTHON, Docker and AWS", "python");
        let (lower, _) = sets("python, docker and aws", "python");
        let upper = KeywordMatcher::match_keywords(&upper, &resume);
        let lower = KeywordMatcher::match_keywords(&lower, &resume);

        assert_eq!(upper.matched_terms(), lower.matched_terms());
        assert_eq!(upper.missing_terms(), lower.missing_terms());
        assert_eq!(upper.missing_terms(), vec!["aws", "docker"]);
    }

    #[test]
    fn test_aliases_match_canonical_terms() {
        let (job, resume) = sets("Kubernetes and JavaScript", "k8s, js");
        let result = KeywordMatcher::match_keywords(&job, &resume);
        assert!(result.missing.is_empty());
        assert_eq!(result.matched.len(), 2);
    }

    #[test]
    fn test_empty_job_has_no_coverage() {
        let (job, resume) = sets("", "Python");
        let result = KeywordMatcher::match_keywords(&job, &resume);
        assert_eq!(result.coverage(), None);
        assert_eq!(result.hard_skill_counts(), (0, 0));
    }

    #[test]
    fn test_keyword_density() {
        let (job, resume) = sets("Python", "Python and gardening");
        let result = KeywordMatcher::match_keywords(&job, &resume);
        // python 3.0 of 4.0 resume weight
        assert_eq!(KeywordMatcher::keyword_density(&resume, &result), 75.0);

        let (_, empty) = sets("Python", "");
        assert_eq!(KeywordMatcher::keyword_density(&empty, &result), 0.0);
    }
}
