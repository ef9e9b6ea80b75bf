//! Weighted keyword extraction for resumes and job descriptions

use crate::config::CategoryMultipliers;
use crate::processing::document::{JobDescription, ResumeContent};
use crate::processing::taxonomy::KeywordCategory;
use crate::processing::text_processor::{TextNormalizer, Token};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

static REQUIRED_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:must|required|requirements?)\b").expect("Invalid required marker regex")
});

static PREFERRED_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:preferred|nice to have|bonus|a plus)\b")
        .expect("Invalid preferred marker regex")
});

static REQUIRED_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:requirements?|qualifications?|must)\b")
        .expect("Invalid required header regex")
});

static PREFERRED_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:preferred|nice to have|bonus|plus)\b")
        .expect("Invalid preferred header regex")
});

/// Headers longer than this many words are treated as ordinary lines.
const MAX_HEADER_WORDS: usize = 6;

/// Where a job keyword was found. Ordered by strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Required,
    General,
    Preferred,
}

impl Zone {
    fn strength(self) -> u8 {
        match self {
            Zone::Required => 2,
            Zone::General => 1,
            Zone::Preferred => 0,
        }
    }

    fn strongest(self, other: Zone) -> Zone {
        if other.strength() > self.strength() {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Zone::Required => "required",
            Zone::General => "general",
            Zone::Preferred => "preferred",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordSource {
    Resume,
    Job,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordToken {
    pub term: String,
    /// First surface form seen in the text.
    pub display: String,
    pub category: KeywordCategory,
    pub frequency: u32,
    pub weight: f64,
    pub zone: Zone,
}

/// Keywords keyed by canonical term, iterated in term order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordSet(BTreeMap<String, KeywordToken>);

impl KeywordSet {
    pub fn get(&self, term: &str) -> Option<&KeywordToken> {
        self.0.get(term)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.0.contains_key(term)
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeywordToken> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.0.values().map(|k| k.weight).sum()
    }

    /// Tokens ordered by weight desc, then term.
    pub fn ranked(&self) -> Vec<&KeywordToken> {
        let mut ranked: Vec<&KeywordToken> = self.0.values().collect();
        ranked.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.term.cmp(&b.term)));
        ranked
    }
}

impl FromIterator<KeywordToken> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = KeywordToken>>(iter: I) -> Self {
        Self(iter.into_iter().map(|k| (k.term.clone(), k)).collect())
    }
}

/// Running counts for one term while scanning text.
struct TermCount {
    display: String,
    frequency: u32,
    zone: Zone,
}

pub struct KeywordExtractor {
    normalizer: TextNormalizer,
    multipliers: CategoryMultipliers,
    max_job_keywords: usize,
}

impl KeywordExtractor {
    pub fn new(
        normalizer: TextNormalizer,
        multipliers: CategoryMultipliers,
        max_job_keywords: usize,
    ) -> Self {
        Self {
            normalizer,
            multipliers,
            max_job_keywords,
        }
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Weighted keyword set from already normalized tokens.
    pub fn extract(&self, tokens: &[Token], source: KeywordSource) -> KeywordSet {
        let mut counts = BTreeMap::new();
        accumulate(&mut counts, tokens, Zone::General);
        self.build(counts, source)
    }

    /// Job keywords with requirement zones taken from headers and inline markers.
    pub fn extract_job(&self, job: &JobDescription) -> KeywordSet {
        let mut counts = BTreeMap::new();
        let mut section_zone = Zone::General;

        for line in job.text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(header) = header_text(trimmed) {
                section_zone = header_zone(header);
                continue;
            }

            let zone = if REQUIRED_MARKER.is_match(trimmed) {
                Zone::Required
            } else if PREFERRED_MARKER.is_match(trimmed) {
                Zone::Preferred
            } else {
                section_zone
            };

            let tokens = self.normalizer.normalize(trimmed);
            accumulate(&mut counts, &tokens, zone);
        }

        let set = self.build(counts, KeywordSource::Job);
        debug!("Extracted {} job keywords", set.len());
        set
    }

    /// Resume keywords from every section. Fields are normalized separately so
    /// phrases never span two fields.
    pub fn extract_resume(&self, resume: &ResumeContent) -> KeywordSet {
        let mut counts = BTreeMap::new();
        for segment in resume.text_segments() {
            let tokens = self.normalizer.normalize(segment);
            accumulate(&mut counts, &tokens, Zone::General);
        }

        let set = self.build(counts, KeywordSource::Resume);
        debug!("Extracted {} resume keywords", set.len());
        set
    }

    fn build(&self, counts: BTreeMap<String, TermCount>, source: KeywordSource) -> KeywordSet {
        let taxonomy = self.normalizer.taxonomy();
        let tokens = counts.into_iter().map(|(term, count)| {
            let category = taxonomy.category_or_generic(&term);
            let zone = match source {
                KeywordSource::Job => count.zone,
                KeywordSource::Resume => Zone::General,
            };
            KeywordToken {
                weight: count.frequency as f64 * category.multiplier(&self.multipliers),
                term,
                display: count.display,
                category,
                frequency: count.frequency,
                zone,
            }
        });

        match source {
            KeywordSource::Resume => tokens.collect(),
            KeywordSource::Job => {
                let mut all: Vec<KeywordToken> = tokens.collect();
                all.sort_by(|a, b| {
                    b.weight.total_cmp(&a.weight).then_with(|| a.term.cmp(&b.term))
                });
                all.truncate(self.max_job_keywords);
                all.into_iter().collect()
            }
        }
    }
}

fn accumulate(counts: &mut BTreeMap<String, TermCount>, tokens: &[Token], zone: Zone) {
    for token in tokens {
        counts
            .entry(token.term.clone())
            .and_modify(|c| {
                c.frequency += 1;
                c.zone = c.zone.strongest(zone);
            })
            .or_insert_with(|| TermCount {
                display: token.surface.clone(),
                frequency: 1,
                zone,
            });
    }
}

/// Header text of a section line: `Requirements:` or a markdown heading.
fn header_text(line: &str) -> Option<&str> {
    let text = if let Some(stripped) = line.strip_suffix(':') {
        stripped.trim_start_matches('#').trim()
    } else if line.starts_with('#') {
        line.trim_start_matches('#').trim()
    } else {
        return None;
    };

    let words = text.split_whitespace().count();
    if words == 0 || words > MAX_HEADER_WORDS {
        None
    } else {
        Some(text)
    }
}

fn header_zone(header: &str) -> Zone {
    if REQUIRED_HEADER.is_match(header) {
        Zone::Required
    } else if PREFERRED_HEADER.is_match(header) {
        Zone::Preferred
    } else {
        Zone::General
    }
}
