//! Curated keyword taxonomy: term categories, aliases and phrases

use crate::config::CategoryMultipliers;
use crate::error::{AtsError, Result};
use crate::processing::text_processor::canonical_form;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordCategory {
    Technical,
    Tool,
    Certification,
    SoftSkill,
    Generic,
}

impl KeywordCategory {
    pub fn multiplier(self, multipliers: &CategoryMultipliers) -> f64 {
        match self {
            KeywordCategory::Technical => multipliers.technical,
            KeywordCategory::Tool => multipliers.tool,
            KeywordCategory::Certification => multipliers.certification,
            KeywordCategory::SoftSkill => multipliers.soft_skill,
            KeywordCategory::Generic => multipliers.generic,
        }
    }

    /// Hard skills counted by the job match coverage term.
    pub fn is_hard_skill(self) -> bool {
        matches!(self, KeywordCategory::Technical | KeywordCategory::Tool)
    }
}

impl fmt::Display for KeywordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeywordCategory::Technical => "technical",
            KeywordCategory::Tool => "tool",
            KeywordCategory::Certification => "certification",
            KeywordCategory::SoftSkill => "soft skill",
            KeywordCategory::Generic => "generic",
        };
        write!(f, "{}", name)
    }
}

/// On-disk taxonomy layout. Entries are merged over the built-in table
/// unless `replace_builtin` is set.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TaxonomyFile {
    replace_builtin: bool,
    categories: CategoryLists,
    aliases: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CategoryLists {
    technical: Vec<String>,
    tool: Vec<String>,
    certification: Vec<String>,
    soft_skill: Vec<String>,
    generic: Vec<String>,
}

/// Term to category lookup plus alias table. Keys are stored in canonical form.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    terms: HashMap<String, KeywordCategory>,
    aliases: HashMap<String, String>,
}

impl Taxonomy {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut taxonomy = Self::empty();

        taxonomy.insert_all(KeywordCategory::Technical, TECHNICAL_TERMS);
        taxonomy.insert_all(KeywordCategory::Tool, TOOL_TERMS);
        taxonomy.insert_all(KeywordCategory::Certification, CERTIFICATION_TERMS);
        taxonomy.insert_all(KeywordCategory::SoftSkill, SOFT_SKILL_TERMS);

        for (alias, canonical) in ALIASES {
            taxonomy.insert_alias(alias, canonical);
        }

        debug!(
            "Built-in taxonomy: {} terms, {} aliases",
            taxonomy.terms.len(),
            taxonomy.aliases.len()
        );
        taxonomy
    }

    /// Load a taxonomy file. Missing or malformed files are configuration errors.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AtsError::Configuration(format!(
                "Failed to read taxonomy {}: {}",
                path.display(),
                e
            ))
        })?;
        let file: TaxonomyFile = toml::from_str(&content).map_err(|e| {
            AtsError::Configuration(format!(
                "Failed to parse taxonomy {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut taxonomy = if file.replace_builtin {
            Self::empty()
        } else {
            Self::builtin()
        };

        let lists = [
            (KeywordCategory::Technical, &file.categories.technical),
            (KeywordCategory::Tool, &file.categories.tool),
            (KeywordCategory::Certification, &file.categories.certification),
            (KeywordCategory::SoftSkill, &file.categories.soft_skill),
            (KeywordCategory::Generic, &file.categories.generic),
        ];
        for (category, terms) in lists {
            for term in terms {
                taxonomy.insert(term, category);
            }
        }
        for (alias, canonical) in &file.aliases {
            taxonomy.insert_alias(alias, canonical);
        }

        info!(
            "Loaded taxonomy from {} ({} terms, {} aliases)",
            path.display(),
            taxonomy.terms.len(),
            taxonomy.aliases.len()
        );
        Ok(taxonomy)
    }

    /// Insert or recategorize a term. Terms with no word characters are ignored.
    pub fn insert(&mut self, term: &str, category: KeywordCategory) {
        let key = canonical_form(term);
        if !key.is_empty() {
            self.terms.insert(key, category);
        }
    }

    pub fn insert_alias(&mut self, alias: &str, canonical: &str) {
        let from = canonical_form(alias);
        let to = canonical_form(canonical);
        if !from.is_empty() && !to.is_empty() && from != to {
            self.aliases.insert(from, to);
        }
    }

    /// Register extra phrases that should stay single tokens.
    /// Phrases already in the table keep their category.
    pub fn add_phrases<S: AsRef<str>>(&mut self, phrases: &[S]) {
        for phrase in phrases {
            let key = canonical_form(phrase.as_ref());
            if !key.is_empty() {
                self.terms.entry(key).or_insert(KeywordCategory::Generic);
            }
        }
    }

    fn insert_all(&mut self, category: KeywordCategory, terms: &[&str]) {
        for term in terms {
            self.insert(term, category);
        }
    }

    pub fn category(&self, term: &str) -> Option<KeywordCategory> {
        self.terms.get(term).copied()
    }

    /// Category of a canonical term; taxonomy misses are generic.
    pub fn category_or_generic(&self, term: &str) -> KeywordCategory {
        self.category(term).unwrap_or(KeywordCategory::Generic)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    pub fn resolve_alias(&self, term: &str) -> Option<&str> {
        self.aliases.get(term).map(String::as_str)
    }

    /// Multi-word terms and aliases, sorted for a stable automaton.
    pub fn phrases(&self) -> Vec<&str> {
        let mut phrases: Vec<&str> = self
            .terms
            .keys()
            .chain(self.aliases.keys())
            .filter(|t| t.contains(' '))
            .map(String::as_str)
            .collect();
        phrases.sort_unstable();
        phrases.dedup();
        phrases
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

const TECHNICAL_TERMS: &[&str] = &[
    // Programming languages
    "python", "java", "javascript", "typescript", "c++", "c#", "ruby", "php", "go", "rust",
    "swift", "kotlin", "scala", "matlab", "sql", "html", "css", "dart", "perl", "haskell",
    "objective-c", "bash",
    // Frameworks and libraries
    "react", "angular", "vue", "django", "flask", "spring", "express", "node.js", "laravel",
    "rails", "asp.net", "bootstrap", "jquery", "next.js", "nuxt.js", "react native", "flutter",
    "pandas", "numpy", "scikit-learn", "tensorflow", "pytorch", "keras", "spark", "hadoop",
    "kafka", "graphql", "grpc",
    // Databases
    "mysql", "postgresql", "mongodb", "redis", "cassandra", "elasticsearch", "dynamodb",
    "oracle", "sqlite", "mariadb", "neo4j", "snowflake",
    // Cloud platforms
    "aws", "azure", "gcp", "google cloud", "heroku", "cloudflare",
    // Engineering practices and domains
    "machine learning", "deep learning", "artificial intelligence", "data analysis",
    "statistics", "microservices", "rest", "api", "ci/cd", "serverless", "cloud computing",
    "system architecture", "distributed systems", "devops", "linux", "ios", "android",
    "mobile development", "unit testing", "integration testing", "automated testing",
    "cybersecurity", "information security", "penetration testing", "encryption", "oauth",
    // Healthcare
    "patient care", "clinical experience", "medical records", "hipaa", "ehr", "emr",
    "telemedicine", "clinical trials", "medical terminology",
    // Finance
    "financial analysis", "financial modeling", "risk management", "portfolio management",
    "valuation", "forecasting", "accounting", "audit", "compliance", "derivatives",
    // Marketing and sales
    "digital marketing", "seo", "sem", "content marketing", "lead generation",
    "marketing automation", "account management",
    // Manufacturing
    "quality control", "supply chain", "inventory management", "lean manufacturing",
];

const TOOL_TERMS: &[&str] = &[
    "docker", "kubernetes", "jenkins", "gitlab", "github", "terraform", "ansible", "chef",
    "puppet", "vagrant", "circleci", "travis ci", "git", "jira", "confluence", "tableau",
    "power bi", "excel", "selenium", "cypress", "jest", "mocha", "pytest", "junit", "postman",
    "webpack", "nginx", "airflow", "salesforce", "figma", "bloomberg terminal", "crm",
];

const CERTIFICATION_TERMS: &[&str] = &[
    "aws certified solutions architect", "aws certified developer", "pmp", "cissp", "cism",
    "cpa", "cfa", "ccna", "comptia security+", "certified kubernetes administrator",
    "certified scrum master", "six sigma", "itil", "rn", "bls",
];

const SOFT_SKILL_TERMS: &[&str] = &[
    "agile", "scrum", "kanban", "leadership", "communication", "teamwork", "problem solving",
    "critical thinking", "creativity", "adaptability", "time management", "project management",
    "collaboration", "mentoring", "coaching", "presentation", "negotiation", "customer service",
    "stakeholder management", "attention to detail", "code review", "strategic planning",
    "change management",
];

const ALIASES: &[(&str, &str)] = &[
    ("k8s", "kubernetes"),
    ("js", "javascript"),
    ("golang", "go"),
    ("reactjs", "react"),
    ("react.js", "react"),
    ("nodejs", "node.js"),
    ("node", "node.js"),
    ("vuejs", "vue"),
    ("postgres", "postgresql"),
    ("amazon web services", "aws"),
    ("microsoft azure", "azure"),
    ("google cloud platform", "gcp"),
    ("ml", "machine learning"),
    ("ai", "artificial intelligence"),
    ("sklearn", "scikit-learn"),
    ("cicd", "ci/cd"),
    ("continuous integration", "ci/cd"),
    ("restful", "rest"),
    ("powerbi", "power bi"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_categories() {
        let taxonomy = Taxonomy::builtin();
        assert_eq!(taxonomy.category("aws"), Some(KeywordCategory::Technical));
        assert_eq!(taxonomy.category("docker"), Some(KeywordCategory::Tool));
        assert_eq!(taxonomy.category("agile"), Some(KeywordCategory::SoftSkill));
        assert_eq!(taxonomy.category("pmp"), Some(KeywordCategory::Certification));
        assert_eq!(taxonomy.category_or_generic("engineer"), KeywordCategory::Generic);
    }

    #[test]
    fn test_keys_are_canonical() {
        let taxonomy = Taxonomy::builtin();
        assert!(taxonomy.contains("ci cd"));
        assert_eq!(taxonomy.resolve_alias("k8s"), Some("kubernetes"));
        assert_eq!(taxonomy.resolve_alias("amazon web services"), Some("aws"));
    }

    #[test]
    fn test_phrases_are_multi_word() {
        let taxonomy = Taxonomy::builtin();
        let phrases = taxonomy.phrases();
        assert!(phrases.contains(&"machine learning"));
        assert!(phrases.contains(&"amazon web services"));
        assert!(phrases.iter().all(|p| p.contains(' ')));
    }

    #[test]
    fn test_extra_phrases_are_generic() {
        let mut taxonomy = Taxonomy::builtin();
        taxonomy.add_phrases(&["Event Sourcing", "machine learning"]);
        assert_eq!(taxonomy.category("event sourcing"), Some(KeywordCategory::Generic));
        assert_eq!(
            taxonomy.category("machine learning"),
            Some(KeywordCategory::Technical)
        );
    }

    #[test]
    fn test_multipliers() {
        let m = CategoryMultipliers::default();
        assert_eq!(KeywordCategory::Technical.multiplier(&m), 3.0);
        assert_eq!(KeywordCategory::Tool.multiplier(&m), 2.5);
        assert_eq!(KeywordCategory::Generic.multiplier(&m), 1.0);
    }

    #[test]
    fn test_file_merges_over_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taxonomy.toml");
        std::fs::write(
            &path,
            "[categories]\ntool = [\"Bazel\"]\n\n[aliases]\n\"tf\" = \"terraform\"\n",
        )
        .unwrap();

        let taxonomy = Taxonomy::from_file(&path).unwrap();
        assert_eq!(taxonomy.category("bazel"), Some(KeywordCategory::Tool));
        assert_eq!(taxonomy.category("python"), Some(KeywordCategory::Technical));
        assert_eq!(taxonomy.resolve_alias("tf"), Some("terraform"));
    }

    #[test]
    fn test_replace_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taxonomy.toml");
        std::fs::write(&path, "replace_builtin = true\n[categories]\ntechnical = [\"cobol\"]\n")
            .unwrap();

        let taxonomy = Taxonomy::from_file(&path).unwrap();
        assert_eq!(taxonomy.len(), 1);
        assert!(!taxonomy.contains("python"));
    }

    #[test]
    fn test_malformed_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taxonomy.toml");
        std::fs::write(&path, "[categories\ntechnical = 3").unwrap();

        assert!(matches!(
            Taxonomy::from_file(&path),
            Err(AtsError::Configuration(_))
        ));
    }
}
