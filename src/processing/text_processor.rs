//! Text normalization and tokenization

use crate::error::{AtsError, Result};
use crate::processing::taxonomy::Taxonomy;
use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

/// Letters/digits joined by intra-word `-` or `.`, with an optional `+`/`#` suffix.
static WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:[-.][\p{L}\p{N}]+)*[+#]*").expect("Invalid word regex")
});

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "from", "up", "about", "into", "through", "during", "before", "after", "above", "below",
        "between", "among", "is", "was", "are", "were", "be", "been", "being", "have", "has",
        "had", "do", "does", "did", "will", "would", "could", "should", "may", "might", "can",
        "must", "shall", "this", "that", "these", "those", "i", "you", "he", "she", "it", "we",
        "they", "me", "him", "her", "us", "them", "my", "our", "your", "their", "its", "as",
        "if", "so", "than", "then", "also", "such", "other", "all", "any", "each", "more",
        "most", "some", "very", "not", "no", "who", "what", "which", "when", "where", "how",
        "while", "within", "across", "per", "via", "etc", "re", "ll", "ve", "including",
    ]
    .into_iter()
    .collect()
});

/// Canonical term plus the first surface form it was produced from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub term: String,
    pub surface: String,
}

/// A word of the input: lowercased text and its byte span in the folded text.
struct Word {
    lower: String,
    start: usize,
    end: usize,
}

/// Turns free text into canonical tokens using a shared taxonomy.
pub struct TextNormalizer {
    taxonomy: Arc<Taxonomy>,
    phrase_matcher: Option<AhoCorasick>,
}

impl TextNormalizer {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Result<Self> {
        let phrases = taxonomy.phrases();

        let phrase_matcher = if phrases.is_empty() {
            None
        } else {
            let matcher = AhoCorasick::builder()
                .match_kind(MatchKind::LeftmostLongest)
                .build(&phrases)
                .map_err(|e| {
                    AtsError::TextProcessing(format!("Failed to build phrase matcher: {}", e))
                })?;
            Some(matcher)
        };

        Ok(Self {
            taxonomy,
            phrase_matcher,
        })
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Normalize text into canonical tokens in reading order.
    pub fn normalize(&self, text: &str) -> Vec<Token> {
        let folded = fold_punctuation(text);
        let words: Vec<Word> = WORD_RE
            .find_iter(&folded)
            .map(|m| Word {
                lower: m.as_str().to_lowercase(),
                start: m.start(),
                end: m.end(),
            })
            .collect();

        if words.is_empty() {
            return Vec::new();
        }

        let spans = self.phrase_spans(&words);
        let mut tokens = Vec::with_capacity(words.len());
        let mut spans = spans.into_iter().peekable();
        let mut i = 0;

        while i < words.len() {
            if let Some(&(first, last)) = spans.peek() {
                if first == i {
                    spans.next();
                    let canonical = words[first..=last]
                        .iter()
                        .map(|w| w.lower.as_str())
                        .collect::<Vec<_>>()
                        .join(" ");
                    let term = self
                        .taxonomy
                        .resolve_alias(&canonical)
                        .map(str::to_string)
                        .unwrap_or(canonical);
                    tokens.push(Token {
                        term,
                        surface: folded[words[first].start..words[last].end].to_string(),
                    });
                    i = last + 1;
                    continue;
                }
            }

            let word = &words[i];
            if let Some(term) = self.resolve_word(&word.lower) {
                tokens.push(Token {
                    term,
                    surface: folded[word.start..word.end].to_string(),
                });
            }
            i += 1;
        }

        tokens
    }

    /// Normalize arbitrary bytes; invalid UTF-8 sequences are replaced.
    pub fn normalize_bytes(&self, bytes: &[u8]) -> Vec<Token> {
        self.normalize(&String::from_utf8_lossy(bytes))
    }

    /// Word index ranges covered by taxonomy phrases, in order and non-overlapping.
    fn phrase_spans(&self, words: &[Word]) -> Vec<(usize, usize)> {
        let Some(matcher) = &self.phrase_matcher else {
            return Vec::new();
        };

        let mut joined = String::new();
        let mut starts = Vec::with_capacity(words.len());
        let mut ends = Vec::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            if i > 0 {
                joined.push(' ');
            }
            starts.push(joined.len());
            joined.push_str(&word.lower);
            ends.push(joined.len());
        }

        matcher
            .find_iter(&joined)
            .filter_map(|m| {
                // Only whole-word matches count
                let first = starts.binary_search(&m.start()).ok()?;
                let last = ends.binary_search(&m.end()).ok()?;
                Some((first, last))
            })
            .collect()
    }

    fn resolve_word(&self, lower: &str) -> Option<String> {
        if let Some(canonical) = self.taxonomy.resolve_alias(lower) {
            return Some(canonical.to_string());
        }
        if self.taxonomy.contains(lower) {
            return Some(lower.to_string());
        }
        if STOP_WORDS.contains(lower)
            || lower.chars().count() < 2
            || !lower.chars().any(char::is_alphabetic)
        {
            return None;
        }
        Some(stem(lower))
    }
}

/// Lowercased words joined by single spaces. Used for taxonomy keys.
pub fn canonical_form(text: &str) -> String {
    let folded = fold_punctuation(text);
    WORD_RE
        .find_iter(&folded)
        .map(|m| m.as_str().to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fold typographic punctuation to ASCII.
pub fn fold_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => '\'',
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => '"',
            '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
            '\u{2026}' => '.',
            '\u{00A0}' | '\u{2007}' | '\u{202F}' => ' ',
            _ => c,
        })
        .collect()
}

/// Split text into sentences using Unicode sentence boundaries.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.unicode_sentences()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn word_count(text: &str) -> usize {
    WORD_RE.find_iter(text).count()
}

/// Light suffix stemmer. Collapses plural and verb inflections onto one stem.
pub fn stem(word: &str) -> String {
    let mut w = word.to_string();

    if w.ends_with("ies") && char_len(&w) > 4 {
        w.truncate(w.len() - 3);
        w.push('y');
    } else if w.ends_with("sses") {
        w.truncate(w.len() - 2);
    } else if w.ends_with("es") && char_len(&w) > 4 {
        w.truncate(w.len() - 2);
    } else if w.ends_with('s')
        && !w.ends_with("ss")
        && !w.ends_with("us")
        && !w.ends_with("is")
        && char_len(&w) > 3
    {
        w.truncate(w.len() - 1);
    }

    if let Some(base) = w.strip_suffix("ing").filter(|b| char_len(b) >= 3) {
        w = undouble(base);
    } else if let Some(base) = w.strip_suffix("ed").filter(|b| char_len(b) >= 3) {
        w = undouble(base);
    }

    if w.ends_with('e') && char_len(&w) > 3 {
        w.truncate(w.len() - 1);
    }

    w
}

fn undouble(base: &str) -> String {
    let bytes = base.as_bytes();
    if bytes.len() >= 2 {
        let last = bytes[bytes.len() - 1];
        if last == bytes[bytes.len() - 2]
            && last.is_ascii_alphabetic()
            && !b"aeiouylsz".contains(&last)
        {
            return base[..base.len() - 1].to_string();
        }
    }
    base.to_string()
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> TextNormalizer {
        TextNormalizer::new(Arc::new(Taxonomy::builtin())).unwrap()
    }

    fn terms(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.term.as_str()).collect()
    }

    #[test]
    fn test_empty_input() {
        let n = normalizer();
        assert!(n.normalize("").is_empty());
        assert!(n.normalize("   \n\t ").is_empty());
    }

    #[test]
    fn test_inflections_share_a_stem() {
        let n = normalizer();
        let tokens = n.normalize("Managed, managing, manages, manage");
        assert_eq!(terms(&tokens), vec!["manag", "manag", "manag", "manag"]);
        assert_eq!(tokens[0].surface, "Managed");
    }

    #[test]
    fn test_symbols_in_terms() {
        let n = normalizer();
        let tokens = n.normalize("C++ and C# with Node.js, full-stack.");
        let t = terms(&tokens);
        assert!(t.contains(&"c++"));
        assert!(t.contains(&"c#"));
        assert!(t.contains(&"node.js"));
        assert!(t.contains(&"full-stack"));
        assert!(!t.contains(&"and"));
    }

    #[test]
    fn test_phrases_and_aliases() {
        let n = normalizer();
        let tokens = n.normalize("Machine Learning on Amazon Web Services and k8s");
        assert_eq!(terms(&tokens), vec!["machine learning", "aws", "kubernetes"]);
        assert_eq!(tokens[0].surface, "Machine Learning");
        assert_eq!(tokens[1].surface, "Amazon Web Services");
    }

    #[test]
    fn test_phrase_requires_word_boundary() {
        let n = normalizer();
        let t = n.normalize("xmachine learning");
        assert!(!terms(&t).contains(&"machine learning"));
    }

    #[test]
    fn test_typographic_punctuation_folded() {
        let n = normalizer();
        let tokens = n.normalize("\u{201C}Python\u{201D}\u{2014}React\u{2026}");
        assert_eq!(terms(&tokens), vec!["python", "react"]);
    }

    #[test]
    fn test_numbers_and_short_words_dropped() {
        let n = normalizer();
        let tokens = n.normalize("5 years x 2024");
        assert_eq!(terms(&tokens), vec!["year"]);
    }

    #[test]
    fn test_invalid_utf8_bytes() {
        let n = normalizer();
        let tokens = n.normalize_bytes(b"python \xFF\xFE docker");
        assert_eq!(terms(&tokens), vec!["python", "docker"]);
    }

    #[test]
    fn test_canonical_form() {
        assert_eq!(canonical_form("CI/CD"), "ci cd");
        assert_eq!(canonical_form("  Power  BI "), "power bi");
        assert_eq!(canonical_form("!!!"), "");
    }

    #[test]
    fn test_stemmer() {
        assert_eq!(stem("companies"), "company");
        assert_eq!(stem("processes"), "process");
        assert_eq!(stem("planned"), "plan");
        assert_eq!(stem("building"), "build");
        assert_eq!(stem("status"), "status");
        assert_eq!(stem("analysis"), "analysis");
    }

    #[test]
    fn test_sentences_and_word_count() {
        let sentences = split_sentences("Built APIs. Led a team of 5! ");
        assert_eq!(sentences, vec!["Built APIs.", "Led a team of 5!"]);
        assert_eq!(word_count("Led a team of 5"), 5);
    }
}
