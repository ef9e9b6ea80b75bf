//! CLI interface for the ATS analyzer

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ats-analyzer")]
#[command(about = "Deterministic ATS compatibility analysis for structured resumes")]
#[command(long_about = "Score a structured resume (JSON/TOML) against job descriptions, find missing skills, and get ranked, explainable recommendations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format: console, json, markdown (defaults to the configured format)
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Save output to file
    #[arg(short, long, global = true)]
    pub save: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a resume against one job description
    Analyze {
        /// Path to resume file (JSON, TOML)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Industry used for benchmarking (overrides detection)
        #[arg(long)]
        industry: Option<String>,

        /// Role level: entry, mid, senior, executive, general
        #[arg(long)]
        role_level: Option<String>,

        /// Record the scores in the history under this id
        #[arg(long)]
        record: Option<String>,

        /// Skip the skill gap section
        #[arg(long)]
        no_gaps: bool,

        /// Skip recommendations
        #[arg(long)]
        no_recommendations: bool,

        /// Output detailed analysis
        #[arg(short, long)]
        detailed: bool,
    },

    /// Compare one resume against several job descriptions
    Compare {
        #[arg(short, long)]
        resume: PathBuf,

        /// Job description files, in display order
        #[arg(short, long, num_args = 1.., required = true)]
        jobs: Vec<PathBuf>,

        /// Optional job titles, one per job file
        #[arg(long, num_args = 1..)]
        titles: Option<Vec<String>>,

        /// Stop waiting after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Ranked optimization suggestions for a resume and job
    Suggest {
        #[arg(short, long)]
        resume: PathBuf,

        #[arg(short, long)]
        job: PathBuf,

        /// Maximum number of suggestions
        #[arg(short, long)]
        max: Option<usize>,
    },

    /// Score many resumes against one job description
    Bulk {
        /// Resume files (JSON, TOML)
        #[arg(short, long, num_args = 1.., required = true)]
        resumes: Vec<PathBuf>,

        #[arg(short, long)]
        job: PathBuf,

        /// Stop waiting after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Show the recorded score history of a resume
    History {
        /// Resume id used with `analyze --record`
        resume_id: Option<String>,
    },

    /// List industry benchmarks
    Benchmarks {
        /// Filter by industry
        #[arg(short, long)]
        industry: Option<String>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
