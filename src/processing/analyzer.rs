//! Main analysis engine combining extraction, matching, scoring and recommendations

use crate::config::Config;
use crate::error::{AtsError, Result};
use crate::processing::ats_matcher::{KeywordMatcher, MatchResult};
use crate::processing::batch::{BatchRunner, ItemOutcome};
use crate::processing::benchmarks::{Benchmark, BenchmarkMatch, BenchmarkProvider, RoleLevel};
use crate::processing::document::{JobDescription, ResumeContent};
use crate::processing::history::{HistoryStatistics, ImprovementTrend, ScoreHistory};
use crate::processing::keywords::{KeywordExtractor, KeywordSet};
use crate::processing::recommendations::{self, IndustryInsights, Recommendation};
use crate::processing::scoring::{self, ScoreBreakdown, ScoreCard, ScoreRecord, Scoring};
use crate::processing::skill_gap::{self, Severity, SkillGap};
use crate::processing::taxonomy::Taxonomy;
use crate::processing::text_processor::TextNormalizer;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Per-call analysis switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Overrides the job's industry hint for benchmarking.
    pub target_industry: Option<String>,
    /// Overrides the job's seniority hint and text inference.
    pub role_level: Option<String>,
    pub include_skill_gaps: bool,
    pub include_recommendations: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            target_industry: None,
            role_level: None,
            include_skill_gaps: true,
            include_recommendations: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    /// Share of resume keyword weight carried by matched job keywords, as a percentage.
    pub keyword_density: f64,
    /// Distinct job keywords considered.
    pub total_keywords: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub scores: ScoreCard,
    pub keyword_analysis: KeywordAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_gaps: Option<Vec<SkillGap>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<Recommendation>>,
    pub industry_insights: IndustryInsights,
    pub breakdown: Vec<ScoreBreakdown>,
}

/// Condensed result for one posting in a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatchSummary {
    pub scores: ScoreCard,
    pub matched_keywords: usize,
    pub total_keywords: usize,
    pub critical_gaps: Vec<String>,
    pub missing_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobComparison {
    pub label: String,
    pub job_preview: String,
    pub outcome: ItemOutcome<JobMatchSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobComparisonReport {
    /// One entry per job, in input order.
    pub comparisons: Vec<JobComparison>,
    /// Label of the completed job with the highest match, first on ties.
    pub best_match: Option<String>,
    /// Mean job match over completed jobs, 0 when none completed.
    pub average_match_percentage: f64,
}

/// Bulk result slot, labelled for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkItem {
    pub label: String,
    pub outcome: ItemOutcome<ScoreRecord>,
}

/// Keyword sets and scores shared by every entry point.
struct Evaluation {
    job_keywords: KeywordSet,
    resume_keywords: KeywordSet,
    matches: MatchResult,
    scoring: Scoring,
    gaps: Vec<SkillGap>,
    benchmark: BenchmarkMatch,
}

const PREVIEW_CHARS: usize = 80;
const MISSING_KEYWORDS_IN_SUMMARY: usize = 10;

/// Cheap to clone; batch tasks each hold a clone.
#[derive(Clone)]
pub struct AnalysisEngine {
    config: Arc<Config>,
    extractor: Arc<KeywordExtractor>,
    benchmarks: Arc<BenchmarkProvider>,
    history: Arc<ScoreHistory>,
}

impl AnalysisEngine {
    /// Build the engine. Invalid configuration or unreadable data files are fatal here.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let mut taxonomy = match &config.data.taxonomy_path {
            Some(path) => {
                ensure_exists(path, "taxonomy")?;
                Taxonomy::from_file(path)?
            }
            None => Taxonomy::builtin(),
        };
        taxonomy.add_phrases(&config.extraction.phrases);

        let normalizer = TextNormalizer::new(Arc::new(taxonomy))?;
        let extractor = KeywordExtractor::new(
            normalizer,
            config.scoring.category_multipliers.clone(),
            config.extraction.max_job_keywords,
        );

        let benchmarks = match &config.data.benchmarks_path {
            Some(path) => {
                ensure_exists(path, "benchmarks")?;
                BenchmarkProvider::from_path(path)?
            }
            None => BenchmarkProvider::builtin(),
        };

        info!("Analysis engine ready");
        Ok(Self {
            config: Arc::new(config),
            extractor: Arc::new(extractor),
            benchmarks: Arc::new(benchmarks),
            history: Arc::new(ScoreHistory::new()),
        })
    }

    /// Replace the in-memory history, typically with one loaded from disk.
    pub fn with_history(mut self, history: ScoreHistory) -> Self {
        self.history = Arc::new(history);
        self
    }

    /// Load history from `[data].history_path`.
    pub fn with_persistent_history(self) -> Result<Self> {
        let history = ScoreHistory::load(&self.config.data.history_path)?;
        Ok(self.with_history(history))
    }

    pub fn persist_history(&self) -> Result<()> {
        self.history.persist(&self.config.data.history_path)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn benchmark_provider(&self) -> &BenchmarkProvider {
        &self.benchmarks
    }

    pub fn history(&self) -> &ScoreHistory {
        &self.history
    }

    /// Analyze one resume against one job description.
    pub fn analyze(
        &self,
        resume: &ResumeContent,
        job: &JobDescription,
        options: &AnalysisOptions,
    ) -> Result<AnalysisResult> {
        resume.validate(self.config.extraction.max_resume_chars)?;
        job.validate(self.config.extraction.max_job_description_chars)?;

        let start = Instant::now();
        let result = self.assemble(resume, job, options);
        debug!(
            "Analysis completed in {}ms (overall {})",
            start.elapsed().as_millis(),
            result.scores.overall
        );
        Ok(result)
    }

    /// Analyze and append the resulting scores to the resume's history.
    pub fn analyze_and_record(
        &self,
        resume_id: &str,
        resume: &ResumeContent,
        job: &JobDescription,
        options: &AnalysisOptions,
    ) -> Result<AnalysisResult> {
        let result = self.analyze(resume, job, options)?;
        self.history.record(resume_id, ScoreRecord::now(result.scores));
        info!(
            "Recorded score {} for resume '{}'",
            result.scores.overall, resume_id
        );
        Ok(result)
    }

    pub fn optimization_suggestions(
        &self,
        resume: &ResumeContent,
        job: &JobDescription,
        max_suggestions: Option<usize>,
    ) -> Result<Vec<Recommendation>> {
        resume.validate(self.config.extraction.max_resume_chars)?;
        job.validate(self.config.extraction.max_job_description_chars)?;

        let eval = self.evaluate(resume, job, &AnalysisOptions::default());
        Ok(recommendations::generate(
            &eval.scoring,
            &eval.gaps,
            &eval.matches,
            &eval.benchmark,
            max_suggestions,
        ))
    }

    pub fn score_history(&self, resume_id: &str) -> Vec<ScoreRecord> {
        self.history.trend(resume_id)
    }

    pub fn history_statistics(&self, resume_id: &str) -> HistoryStatistics {
        self.history.statistics(resume_id)
    }

    pub fn improvement_trend(&self, resume_id: &str) -> ImprovementTrend {
        self.history.improvement_trend(resume_id)
    }

    pub fn benchmarks(&self, industry: Option<&str>) -> Vec<Benchmark> {
        self.benchmarks.list(industry)
    }

    pub fn reload_benchmarks(&self, path: &Path) -> Result<()> {
        self.benchmarks.reload_from_path(path)
    }

    fn batch_runner(&self, timeout: Option<Duration>) -> Result<BatchRunner> {
        let runner = BatchRunner::from_config(&self.config.batch)?;
        Ok(match timeout {
            Some(t) => runner.with_timeout(Some(t)),
            None => runner,
        })
    }

    /// Compare one resume against several postings, keeping input order.
    pub async fn compare_jobs(
        &self,
        resume: &ResumeContent,
        jobs: Vec<JobDescription>,
        titles: Option<Vec<String>>,
    ) -> Result<JobComparisonReport> {
        self.compare_jobs_with_timeout(resume, jobs, titles, None).await
    }

    pub async fn compare_jobs_with_timeout(
        &self,
        resume: &ResumeContent,
        jobs: Vec<JobDescription>,
        titles: Option<Vec<String>>,
        timeout: Option<Duration>,
    ) -> Result<JobComparisonReport> {
        if let Some(titles) = &titles {
            if titles.len() != jobs.len() {
                return Err(AtsError::InvalidInput(format!(
                    "Got {} job titles for {} job descriptions",
                    titles.len(),
                    jobs.len()
                )));
            }
        }
        resume.validate(self.config.extraction.max_resume_chars)?;

        let labels: Vec<String> = match titles {
            Some(titles) => titles,
            None => (1..=jobs.len()).map(|i| format!("Job {}", i)).collect(),
        };
        let previews: Vec<String> = jobs.iter().map(|j| j.preview(PREVIEW_CHARS)).collect();

        info!("Comparing resume against {} job description(s)", jobs.len());

        let engine = self.clone();
        let resume = Arc::new(resume.clone());
        let outcomes = self
            .batch_runner(timeout)?
            .run(jobs, move |job| {
                let engine = engine.clone();
                let resume = Arc::clone(&resume);
                async move { engine.summarize_job(&resume, &job) }
            })
            .await;

        let mut best: Option<(usize, f64)> = None;
        let mut total = 0.0;
        let mut completed = 0usize;
        for (index, outcome) in outcomes.iter().enumerate() {
            if let Some(summary) = outcome.completed() {
                let pct = summary.scores.job_match_percentage;
                total += pct;
                completed += 1;
                if best.map_or(true, |(_, top)| pct > top) {
                    best = Some((index, pct));
                }
            }
        }

        let average_match_percentage = if completed == 0 {
            0.0
        } else {
            ((total / completed as f64) * 10.0).round() / 10.0
        };
        let best_match = best.map(|(index, _)| labels[index].clone());

        let comparisons = labels
            .into_iter()
            .zip(previews)
            .zip(outcomes)
            .map(|((label, job_preview), outcome)| JobComparison {
                label,
                job_preview,
                outcome,
            })
            .collect();

        Ok(JobComparisonReport {
            comparisons,
            best_match,
            average_match_percentage,
        })
    }

    /// Score many resumes against one job. One outcome per resume, in input order.
    pub async fn bulk_analyze(
        &self,
        resumes: Vec<ResumeContent>,
        job: &JobDescription,
    ) -> Result<Vec<ItemOutcome<ScoreRecord>>> {
        self.bulk_analyze_with(resumes, job, None, Ok).await
    }

    pub async fn bulk_analyze_with_timeout(
        &self,
        resumes: Vec<ResumeContent>,
        job: &JobDescription,
        timeout: Option<Duration>,
    ) -> Result<Vec<ItemOutcome<ScoreRecord>>> {
        self.bulk_analyze_with(resumes, job, timeout, Ok).await
    }

    /// Like `bulk_analyze`, but each document is parsed inside its own slot.
    pub async fn bulk_analyze_json(
        &self,
        documents: Vec<String>,
        job: &JobDescription,
    ) -> Result<Vec<ItemOutcome<ScoreRecord>>> {
        self.bulk_analyze_with(documents, job, None, |raw: String| {
            serde_json::from_str::<ResumeContent>(&raw)
                .map_err(|e| AtsError::InvalidInput(format!("Unparseable resume: {}", e)))
        })
        .await
    }

    /// Bulk analysis over arbitrary items; `parse` runs inside each slot, so
    /// its errors become per-item failures.
    pub async fn bulk_analyze_with<T, P>(
        &self,
        items: Vec<T>,
        job: &JobDescription,
        timeout: Option<Duration>,
        parse: P,
    ) -> Result<Vec<ItemOutcome<ScoreRecord>>>
    where
        T: Send + 'static,
        P: Fn(T) -> Result<ResumeContent> + Send + Sync + 'static,
    {
        job.validate(self.config.extraction.max_job_description_chars)?;
        info!("Bulk analysis of {} resume(s)", items.len());

        let engine = self.clone();
        let job = Arc::new(job.clone());
        let parse = Arc::new(parse);
        let outcomes = self
            .batch_runner(timeout)?
            .run(items, move |item| {
                let engine = engine.clone();
                let job = Arc::clone(&job);
                let parse = Arc::clone(&parse);
                async move {
                    let resume = parse(item)?;
                    resume.validate(engine.config.extraction.max_resume_chars)?;
                    let eval = engine.evaluate(&resume, &job, &AnalysisOptions::default());
                    Ok(ScoreRecord::now(eval.scoring.card))
                }
            })
            .await;

        Ok(outcomes)
    }

    fn summarize_job(&self, resume: &ResumeContent, job: &JobDescription) -> Result<JobMatchSummary> {
        job.validate(self.config.extraction.max_compare_job_chars)?;
        let eval = self.evaluate(resume, job, &AnalysisOptions::default());

        let critical_gaps = eval
            .gaps
            .iter()
            .filter(|g| g.severity == Severity::Critical)
            .map(|g| g.keyword.clone())
            .collect();
        let mut missing_keywords = eval.matches.missing_terms();
        missing_keywords.truncate(MISSING_KEYWORDS_IN_SUMMARY);

        Ok(JobMatchSummary {
            scores: eval.scoring.card,
            matched_keywords: eval.matches.matched.len(),
            total_keywords: eval.job_keywords.len(),
            critical_gaps,
            missing_keywords,
        })
    }

    fn assemble(
        &self,
        resume: &ResumeContent,
        job: &JobDescription,
        options: &AnalysisOptions,
    ) -> AnalysisResult {
        let eval = self.evaluate(resume, job, options);

        let keyword_analysis = KeywordAnalysis {
            matched_keywords: eval.matches.matched_terms(),
            missing_keywords: eval.matches.missing_terms(),
            keyword_density: KeywordMatcher::keyword_density(&eval.resume_keywords, &eval.matches),
            total_keywords: eval.job_keywords.len(),
        };

        let industry_insights = recommendations::industry_insights(
            eval.scoring.card.overall,
            resume.word_count(),
            &eval.resume_keywords,
            &eval.benchmark,
            self.extractor.normalizer(),
        );

        let recommendations = options.include_recommendations.then(|| {
            recommendations::generate(&eval.scoring, &eval.gaps, &eval.matches, &eval.benchmark, None)
        });

        AnalysisResult {
            scores: eval.scoring.card,
            keyword_analysis,
            skill_gaps: options.include_skill_gaps.then(|| eval.gaps.clone()),
            recommendations,
            industry_insights,
            breakdown: eval.scoring.breakdowns,
        }
    }

    fn evaluate(
        &self,
        resume: &ResumeContent,
        job: &JobDescription,
        options: &AnalysisOptions,
    ) -> Evaluation {
        let job_keywords = self.extractor.extract_job(job);
        let resume_keywords = self.extractor.extract_resume(resume);
        debug!(
            "Extracted {} job keywords and {} resume keywords",
            job_keywords.len(),
            resume_keywords.len()
        );

        let matches = KeywordMatcher::match_keywords(&job_keywords, &resume_keywords);
        let scoring = scoring::score_resume(
            resume,
            &matches,
            &self.config.scoring.weights,
            self.extractor.normalizer(),
        );
        let gaps = skill_gap::analyze_gaps(&job_keywords, &resume_keywords);
        let benchmark = self.select_benchmark(job, options);

        Evaluation {
            job_keywords,
            resume_keywords,
            matches,
            scoring,
            gaps,
            benchmark,
        }
    }

    /// An explicit role level is looked up as given. An inferred one that has
    /// no row of its own falls back to the industry-wide row.
    fn select_benchmark(&self, job: &JobDescription, options: &AnalysisOptions) -> BenchmarkMatch {
        let industry = options
            .target_industry
            .as_deref()
            .or(job.industry.as_deref());

        if options.role_level.is_some() {
            return self
                .benchmarks
                .get_benchmark(industry, options.role_level.as_deref());
        }

        let inferred = RoleLevel::infer(job);
        if inferred != RoleLevel::General {
            let found = self
                .benchmarks
                .snapshot()
                .lookup(industry, Some(&inferred.to_string()));
            if let Some(found) = found.filter(|m| m.exact) {
                return found;
            }
        }
        self.benchmarks.get_benchmark(industry, None)
    }
}

fn ensure_exists(path: &Path, what: &str) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(AtsError::Configuration(format!(
            "Configured {} file not found: {}",
            what,
            path.display()
        )))
    }
}
