//! ats-analyzer: deterministic ATS compatibility analysis for structured resumes

use anyhow::Context;
use ats_analyzer::cli::{self, Cli, Commands, ConfigAction};
use ats_analyzer::config::{Config, OutputFormat};
use ats_analyzer::error::AtsError;
use ats_analyzer::input::{InputManager, ResumeDocument};
use ats_analyzer::output::formatter::save_report_to_file;
use ats_analyzer::output::report::{BulkReport, ComparisonReport, HistoryReport};
use ats_analyzer::output::{AnalysisReport, ReportGenerator, ReportMetadata};
use ats_analyzer::processing::analyzer::BulkItem;
use ats_analyzer::{AnalysisEngine, AnalysisOptions};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if let Err(e) = run(cli).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

/// Settings shared by every command once config and flags are resolved.
struct Session {
    config: Config,
    format: OutputFormat,
    save: Option<PathBuf>,
}

impl Session {
    fn generator(&self, detailed: bool) -> ReportGenerator {
        let use_colors = self.config.output.color_output && self.save.is_none();
        ReportGenerator::with_options(
            use_colors,
            detailed || self.config.output.detailed,
            true,
            true,
        )
    }

    fn emit(&self, content: &str) -> anyhow::Result<()> {
        match &self.save {
            Some(path) => {
                save_report_to_file(content, path)
                    .with_context(|| format!("Failed to save report to {}", path.display()))?;
                println!("Report saved to {}", path.display());
            }
            None => println!("{}", content),
        }
        Ok(())
    }

    fn engine(&self) -> anyhow::Result<AnalysisEngine> {
        AnalysisEngine::new(self.config.clone()).context("Failed to initialize analysis engine")
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let format = match &cli.output {
        Some(raw) => cli::parse_output_format(raw).map_err(AtsError::InvalidInput)?,
        None => config.output.format,
    };

    let session = Session {
        config,
        format,
        save: cli.save,
    };

    match cli.command {
        Commands::Analyze {
            resume,
            job,
            industry,
            role_level,
            record,
            no_gaps,
            no_recommendations,
            detailed,
        } => {
            check_resume_path(&resume)?;
            check_job_path(&job)?;

            let mut input = InputManager::new();
            let resume_content = input.load_resume(&resume).await?;
            let job_description = input.load_job(&job).await?;

            let options = AnalysisOptions {
                target_industry: industry,
                role_level,
                include_skill_gaps: !no_gaps,
                include_recommendations: !no_recommendations,
            };

            let start = Instant::now();
            let result = match &record {
                Some(resume_id) => {
                    let engine = session.engine()?.with_persistent_history()?;
                    let result =
                        engine.analyze_and_record(resume_id, &resume_content, &job_description, &options)?;
                    engine.persist_history()?;
                    result
                }
                None => session
                    .engine()?
                    .analyze(&resume_content, &job_description, &options)?,
            };
            let elapsed = start.elapsed().as_millis() as u64;

            let report = AnalysisReport::new(
                result,
                &session.config.scoring.weights,
                ReportMetadata::new(&display_name(&resume), &display_name(&job), elapsed),
            );
            let content = session
                .generator(detailed)
                .formatter(session.format)
                .format_analysis(&report)?;
            session.emit(&content)?;
        }

        Commands::Compare {
            resume,
            jobs,
            titles,
            timeout_ms,
        } => {
            check_resume_path(&resume)?;
            let mut input = InputManager::new();
            let resume_content = input.load_resume(&resume).await?;

            let mut job_descriptions = Vec::with_capacity(jobs.len());
            for path in &jobs {
                check_job_path(path)?;
                job_descriptions.push(input.load_job(path).await?);
            }

            let engine = session.engine()?;
            let spinner = spinner(format!("Comparing against {} job(s)...", jobs.len()));
            let report = engine
                .compare_jobs_with_timeout(
                    &resume_content,
                    job_descriptions,
                    titles,
                    timeout_ms.map(Duration::from_millis),
                )
                .await;
            spinner.finish_and_clear();

            let report = ComparisonReport {
                resume_file: display_name(&resume),
                report: report?,
            };
            let content = session
                .generator(false)
                .formatter(session.format)
                .format_comparison(&report)?;
            session.emit(&content)?;
        }

        Commands::Suggest { resume, job, max } => {
            check_resume_path(&resume)?;
            check_job_path(&job)?;

            let mut input = InputManager::new();
            let resume_content = input.load_resume(&resume).await?;
            let job_description = input.load_job(&job).await?;

            let suggestions =
                session
                    .engine()?
                    .optimization_suggestions(&resume_content, &job_description, max)?;
            let content = session
                .generator(true)
                .formatter(session.format)
                .format_suggestions(&suggestions)?;
            session.emit(&content)?;
        }

        Commands::Bulk {
            resumes,
            job,
            timeout_ms,
        } => {
            check_job_path(&job)?;
            let mut input = InputManager::new().with_cache(false);
            let job_description = input.load_job(&job).await?;

            // Read failures stay in their slot so one bad file does not stop the batch
            let mut documents = Vec::with_capacity(resumes.len());
            for path in &resumes {
                documents.push(input.read_resume(path).await);
            }
            let labels: Vec<String> = resumes.iter().map(|p| display_name(p)).collect();

            let engine = session.engine()?;
            let spinner = spinner(format!("Analyzing {} resume(s)...", resumes.len()));
            let outcomes = engine
                .bulk_analyze_with(
                    documents,
                    &job_description,
                    timeout_ms.map(Duration::from_millis),
                    |document: ats_analyzer::Result<ResumeDocument>| document.and_then(|d| d.parse()),
                )
                .await;
            spinner.finish_and_clear();

            let report = BulkReport {
                job_file: display_name(&job),
                items: labels
                    .into_iter()
                    .zip(outcomes?)
                    .map(|(label, outcome)| BulkItem { label, outcome })
                    .collect(),
            };
            info!(
                "Bulk analysis finished: {:?} (completed, failed, cancelled)",
                report.tally()
            );
            let content = session
                .generator(false)
                .formatter(session.format)
                .format_bulk(&report)?;
            session.emit(&content)?;
        }

        Commands::History { resume_id } => {
            let engine = session.engine()?.with_persistent_history()?;
            let ids = match resume_id {
                Some(id) => vec![id],
                None => engine.history().resume_ids(),
            };
            if ids.is_empty() {
                println!("No score history recorded yet.");
            }

            let generator = session.generator(false);
            for id in ids {
                let report = HistoryReport {
                    records: engine.score_history(&id),
                    deltas: engine.history().deltas(&id),
                    statistics: engine.history_statistics(&id),
                    resume_id: id,
                };
                let content = generator.formatter(session.format).format_history(&report)?;
                session.emit(&content)?;
            }
        }

        Commands::Benchmarks { industry } => {
            let benchmarks = session.engine()?.benchmarks(industry.as_deref());
            let content = session
                .generator(true)
                .formatter(session.format)
                .format_benchmarks(&benchmarks)?;
            session.emit(&content)?;
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let rendered = toml::to_string_pretty(&session.config)
                    .map_err(|e| AtsError::Configuration(e.to_string()))?;
                println!("# {}\n", Config::config_path().display());
                println!("{}", rendered);
            }
            Some(ConfigAction::Reset) => {
                let path = match &cli.config {
                    Some(path) => path.clone(),
                    None => Config::config_path(),
                };
                Config::default().save_to(&path)?;
                println!("Configuration reset: {}", path.display());
            }
            Some(ConfigAction::Path) => {
                println!("{}", Config::config_path().display());
            }
        },
    }

    Ok(())
}

fn check_resume_path(path: &Path) -> anyhow::Result<()> {
    cli::validate_file_extension(path, &["json", "toml"])
        .map_err(|e| AtsError::InvalidInput(format!("Resume file: {}", e)))?;
    Ok(())
}

fn check_job_path(path: &Path) -> anyhow::Result<()> {
    cli::validate_file_extension(path, &["txt", "md", "markdown"])
        .map_err(|e| AtsError::InvalidInput(format!("Job description file: {}", e)))?;
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
