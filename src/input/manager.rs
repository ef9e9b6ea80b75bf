//! Input manager for resume and job description files

use crate::error::{AtsError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PlainTextExtractor, TextExtractor};
use crate::processing::document::{JobDescription, ResumeContent};
use log::info;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// A resume file read from disk but not yet parsed.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub path: PathBuf,
    pub file_type: FileType,
    pub content: String,
}

impl ResumeDocument {
    pub fn label(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn parse(&self) -> Result<ResumeContent> {
        parse_resume(self.file_type, &self.content).map_err(|e| {
            AtsError::InvalidInput(format!("{}: {}", self.path.display(), e))
        })
    }
}

/// Parse a structured resume. Missing fields default to empty.
pub fn parse_resume(file_type: FileType, content: &str) -> Result<ResumeContent> {
    match file_type {
        FileType::Json => serde_json::from_str(content)
            .map_err(|e| AtsError::InvalidInput(format!("Invalid JSON resume: {}", e))),
        FileType::Toml => toml::from_str(content)
            .map_err(|e| AtsError::InvalidInput(format!("Invalid TOML resume: {}", e))),
        other => Err(AtsError::UnsupportedFormat(format!(
            "Resumes must be JSON or TOML, got {:?}",
            other
        ))),
    }
}

pub struct InputManager {
    cache: HashMap<PathBuf, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn read_resume(&mut self, path: &Path) -> Result<ResumeDocument> {
        let file_type = FileType::from_path(path);
        if !file_type.is_resume_format() {
            return Err(AtsError::UnsupportedFormat(format!(
                "Unsupported resume file: {} (expected .json or .toml)",
                path.display()
            )));
        }

        let content = self.read_cached(path, file_type).await?;
        Ok(ResumeDocument {
            path: path.to_path_buf(),
            file_type,
            content,
        })
    }

    pub async fn load_resume(&mut self, path: &Path) -> Result<ResumeContent> {
        self.read_resume(path).await?.parse()
    }

    pub async fn load_job(&mut self, path: &Path) -> Result<JobDescription> {
        let file_type = FileType::from_path(path);
        if !file_type.is_job_format() {
            return Err(AtsError::UnsupportedFormat(format!(
                "Unsupported job description file: {} (expected .txt or .md)",
                path.display()
            )));
        }

        let text = self.read_cached(path, file_type).await?;
        Ok(JobDescription::new(text))
    }

    async fn read_cached(&mut self, path: &Path, file_type: FileType) -> Result<String> {
        if self.enable_cache {
            if let Some(cached) = self.cache.get(path) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        if !path.exists() {
            return Err(AtsError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match file_type {
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            _ => {
                info!("Reading structured file: {}", path.display());
                let bytes = fs::read(path).await?;
                String::from_utf8(bytes).map_err(|e| {
                    AtsError::InvalidInput(format!(
                        "{} is not valid UTF-8: {}",
                        path.display(),
                        e
                    ))
                })?
            }
        };

        if self.enable_cache {
            self.cache.insert(path.to_path_buf(), text.clone());
        }
        Ok(text)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
