//! Resume and job description structures

use crate::error::{AtsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured resume snapshot used for one analysis call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeContent {
    pub personal_info: PersonalInfo,
    pub professional_summary: Option<String>,
    pub work_experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub skills: Skills,
    pub certifications: Vec<Certification>,
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub location: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperience {
    pub job_title: String,
    pub company: String,
    /// Expected as `YYYY-MM`.
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location: Option<String>,
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub graduation_year: Option<String>,
    pub field_of_study: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    pub technical: Vec<String>,
    pub soft: Vec<String>,
    pub languages: Vec<String>,
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub issue_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionType::Summary => "Summary",
            SectionType::Experience => "Experience",
            SectionType::Education => "Education",
            SectionType::Skills => "Skills",
            SectionType::Projects => "Projects",
            SectionType::Certifications => "Certifications",
        };
        write!(f, "{}", name)
    }
}

fn non_blank(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

impl Skills {
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.technical
            .iter()
            .chain(self.languages.iter())
            .chain(self.tools.iter())
            .chain(self.soft.iter())
    }

    /// Number of non-blank skill entries across all categories.
    pub fn count(&self) -> usize {
        self.iter().filter(|s| non_blank(s).is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

impl ResumeContent {
    pub fn summary(&self) -> Option<&str> {
        self.professional_summary.as_deref().and_then(non_blank)
    }

    pub fn has_section(&self, section: SectionType) -> bool {
        match section {
            SectionType::Summary => self.summary().is_some(),
            SectionType::Experience => !self.work_experience.is_empty(),
            SectionType::Education => !self.education.is_empty(),
            SectionType::Skills => !self.skills.is_empty(),
            SectionType::Projects => !self.projects.is_empty(),
            SectionType::Certifications => !self.certifications.is_empty(),
        }
    }

    /// Sections a resume is expected to carry for ATS parsing.
    pub fn missing_required_sections(&self) -> Vec<SectionType> {
        [
            SectionType::Summary,
            SectionType::Experience,
            SectionType::Education,
            SectionType::Skills,
        ]
        .into_iter()
        .filter(|section| !self.has_section(*section))
        .collect()
    }

    /// All bullet-style statements: responsibilities and project descriptions.
    pub fn bullets(&self) -> Vec<&str> {
        self.work_experience
            .iter()
            .flat_map(|job| job.responsibilities.iter())
            .chain(self.projects.iter().map(|p| &p.description))
            .filter_map(|b| non_blank(b))
            .collect()
    }

    /// Ordered text fragments of every section, blank fields skipped.
    pub fn text_segments(&self) -> Vec<&str> {
        let mut segments: Vec<&str> = Vec::new();

        segments.extend(non_blank(&self.personal_info.first_name));
        segments.extend(non_blank(&self.personal_info.last_name));
        segments.extend(self.summary());

        for job in &self.work_experience {
            segments.extend(non_blank(&job.job_title));
            segments.extend(non_blank(&job.company));
            segments.extend(job.responsibilities.iter().filter_map(|r| non_blank(r)));
        }

        for edu in &self.education {
            segments.extend(non_blank(&edu.degree));
            segments.extend(non_blank(&edu.institution));
            segments.extend(edu.field_of_study.as_deref().and_then(non_blank));
        }

        segments.extend(self.skills.iter().filter_map(|s| non_blank(s)));

        for project in &self.projects {
            segments.extend(non_blank(&project.name));
            segments.extend(non_blank(&project.description));
            segments.extend(project.technologies.iter().filter_map(|t| non_blank(t)));
        }

        for cert in &self.certifications {
            segments.extend(non_blank(&cert.name));
            segments.extend(non_blank(&cert.issuer));
        }

        segments
    }

    /// Full resume text. Segments are joined by newlines so phrases never span fields.
    pub fn full_text(&self) -> String {
        self.text_segments().join("\n")
    }

    pub fn word_count(&self) -> usize {
        self.text_segments()
            .iter()
            .map(|s| s.split_whitespace().count())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.text_segments().is_empty()
    }

    /// Reject resumes that are too large to be a realistic document.
    pub fn validate(&self, max_chars: usize) -> Result<()> {
        let chars: usize = self.text_segments().iter().map(|s| s.chars().count()).sum();
        if chars > max_chars {
            return Err(AtsError::InvalidInput(format!(
                "Resume text too long ({} characters, max {})",
                chars, max_chars
            )));
        }
        Ok(())
    }
}

/// Raw job posting text plus optional structured hints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub text: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub seniority: Option<String>,
}

impl JobDescription {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            industry: None,
            seniority: None,
        }
    }

    /// Build from raw bytes, replacing invalid UTF-8 sequences.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    pub fn with_seniority(mut self, seniority: impl Into<String>) -> Self {
        self.seniority = Some(seniority.into());
        self
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn validate(&self, max_chars: usize) -> Result<()> {
        let chars = self.char_count();
        if chars > max_chars {
            return Err(AtsError::InvalidInput(format!(
                "Job description too long ({} characters, max {})",
                chars, max_chars
            )));
        }
        Ok(())
    }

    /// Short preview used in comparison reports.
    pub fn preview(&self, max_chars: usize) -> String {
        let trimmed = self.text.trim();
        if trimmed.chars().count() <= max_chars {
            trimmed.to_string()
        } else {
            let cut: String = trimmed.chars().take(max_chars).collect();
            format!("{}...", cut)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_resume() -> ResumeContent {
        ResumeContent {
            personal_info: PersonalInfo {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: "555-123-4567".to_string(),
                ..Default::default()
            },
            professional_summary: Some("Backend engineer.".to_string()),
            work_experience: vec![WorkExperience {
                job_title: "Engineer".to_string(),
                company: "Acme".to_string(),
                start_date: Some("2020-01".to_string()),
                end_date: None,
                location: None,
                responsibilities: vec!["Built APIs".to_string(), "  ".to_string()],
            }],
            projects: vec![Project {
                name: "Tool".to_string(),
                description: "A CLI tool".to_string(),
                technologies: vec!["Rust".to_string()],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_resume_deserializes() {
        let resume: ResumeContent = serde_json::from_str("{}").unwrap();
        assert!(resume.is_empty());
        assert_eq!(resume.missing_required_sections().len(), 4);
    }

    #[test]
    fn test_bullets_skip_blank_entries() {
        let resume = sample_resume();
        assert_eq!(resume.bullets(), vec!["Built APIs", "A CLI tool"]);
    }

    #[test]
    fn test_text_segments_in_section_order() {
        let resume = sample_resume();
        let segments = resume.text_segments();
        assert_eq!(segments[0], "Jane");
        assert!(segments.contains(&"Rust"));
        assert!(resume.full_text().contains("Backend engineer."));
    }

    #[test]
    fn test_missing_sections() {
        let resume = sample_resume();
        assert_eq!(
            resume.missing_required_sections(),
            vec![SectionType::Education, SectionType::Skills]
        );
    }

    #[test]
    fn test_job_from_invalid_bytes() {
        let job = JobDescription::from_bytes(b"Rust \xF0\x28\x8C\x28 engineer");
        assert!(job.text.contains("Rust"));
        assert!(job.text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_length_limits() {
        let job = JobDescription::new("x".repeat(20));
        assert!(job.validate(20).is_ok());
        assert!(job.validate(19).is_err());
        assert!(sample_resume().validate(5).is_err());
    }
}
