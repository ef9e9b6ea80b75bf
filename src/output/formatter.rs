//! Output formatters for console, JSON and markdown

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::*;
use crate::processing::batch::ItemOutcome;
use crate::processing::benchmarks::Benchmark;
use crate::processing::recommendations::{Priority, Recommendation};
use crate::processing::skill_gap::Severity;
use colored::{Color, Colorize};
use serde::Serialize;
use std::path::Path;

/// One method per report kind the CLI prints.
pub trait OutputFormatter {
    fn format_analysis(&self, report: &AnalysisReport) -> Result<String>;
    fn format_comparison(&self, report: &ComparisonReport) -> Result<String>;
    fn format_suggestions(&self, suggestions: &[Recommendation]) -> Result<String>;
    fn format_bulk(&self, report: &BulkReport) -> Result<String>;
    fn format_history(&self, report: &HistoryReport) -> Result<String>;
    fn format_benchmarks(&self, benchmarks: &[Benchmark]) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for scripting and integration
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for saved reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates the formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };
        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_level_badge(&self, level: ScoreLevel) -> String {
        let color = match level {
            ScoreLevel::Excellent => Color::Green,
            ScoreLevel::Good => Color::BrightGreen,
            ScoreLevel::Fair => Color::Yellow,
            ScoreLevel::NeedsImprovement => Color::Red,
        };
        let badge = level.to_string().to_uppercase();

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_priority_icon(&self, priority: Priority) -> String {
        let (text, color) = match priority {
            Priority::High => ("[!]", Color::Red),
            Priority::Medium => ("[*]", Color::Yellow),
            Priority::Low => ("[+]", Color::Green),
        };
        format!("{} ", self.colorize(text, color))
    }

    fn format_recommendations(&self, output: &mut String, recommendations: &[Recommendation]) {
        for (i, rec) in recommendations.iter().enumerate() {
            output.push_str(&format!(
                "{}. {}{} {}\n",
                i + 1,
                self.format_priority_icon(rec.priority),
                self.colorize(&rec.title, Color::White),
                self.colorize(
                    &format!("({}, +{:.1} pts)", rec.category, rec.impact_estimate),
                    Color::BrightBlack
                )
            ));
            output.push_str(&format!("   {}\n", rec.description));
            for item in &rec.action_items {
                output.push_str(&format!("   - {}\n", item));
            }
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_analysis(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();
        let summary = &report.summary;
        let analysis = &report.analysis;

        output.push_str(&self.format_header("ATS COMPATIBILITY ANALYSIS", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));

        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!(
            "Overall ATS Score: {} {}\n",
            summary.overall_score,
            self.format_level_badge(summary.overall_level)
        ));
        output.push_str(&format!(
            "Verdict: {}\n",
            self.colorize(&summary.verdict, Color::Cyan)
        ));

        output.push_str(&self.format_header("Score Breakdown", 3));
        for metric in &summary.metrics {
            output.push_str(&format!(
                "  {:<22} {:>5.1} {} (weight: {:.0}%)\n",
                metric.metric.to_string(),
                metric.score,
                self.format_level_badge(metric.level),
                metric.weight * 100.0
            ));
        }

        if !summary.improvement_areas.is_empty() {
            output.push_str(&self.format_header("Improvement Areas", 3));
            for area in &summary.improvement_areas {
                output.push_str(&format!(
                    "  • {}\n",
                    self.colorize(&area.to_string(), Color::Yellow)
                ));
            }
        }

        let keywords = &analysis.keyword_analysis;
        output.push_str(&self.format_header("Keywords", 2));
        output.push_str(&format!(
            "Matched {} of {} job keywords (density {:.2}%)\n",
            keywords.matched_keywords.len(),
            keywords.total_keywords,
            keywords.keyword_density
        ));
        if !keywords.matched_keywords.is_empty() {
            output.push_str(&format!(
                "  Matched: {}\n",
                self.colorize(&keywords.matched_keywords.join(", "), Color::Green)
            ));
        }
        if !keywords.missing_keywords.is_empty() {
            output.push_str(&format!(
                "  Missing: {}\n",
                self.colorize(&keywords.missing_keywords.join(", "), Color::Red)
            ));
        }

        if let Some(gaps) = &analysis.skill_gaps {
            if !gaps.is_empty() {
                output.push_str(&self.format_header("Skill Gaps", 3));
                for gap in gaps {
                    let color = match gap.severity {
                        Severity::Critical => Color::Red,
                        Severity::Important => Color::Yellow,
                        Severity::NiceToHave => Color::BrightBlack,
                    };
                    output.push_str(&format!(
                        "  {:<24} {}\n",
                        gap.display,
                        self.colorize(&gap.severity.to_string(), color)
                    ));
                }
            }
        }

        if let Some(recommendations) = &analysis.recommendations {
            output.push_str(&self.format_header("Recommendations", 2));
            if recommendations.is_empty() {
                output.push_str("No changes recommended.\n");
            } else {
                let shown = if self.detailed {
                    recommendations.len()
                } else {
                    recommendations.len().min(5)
                };
                self.format_recommendations(&mut output, &recommendations[..shown]);
            }
        }

        let insights = &analysis.industry_insights;
        output.push_str(&self.format_header("Industry Insights", 2));
        let benchmark_note = if insights.benchmark_exact {
            String::new()
        } else {
            self.colorize(" (general fallback)", Color::BrightBlack)
        };
        output.push_str(&format!(
            "Benchmark: {} / {}{}\n",
            insights.industry, insights.role_level, benchmark_note
        ));
        output.push_str(&format!(
            "Average ATS score: {:.0} (you: {:+.0})\n",
            insights.average_ats_score, insights.score_vs_benchmark
        ));
        output.push_str(&format!(
            "Length: {} words (recommended {}-{})\n",
            insights.resume_word_count,
            insights.recommended_length.min,
            insights.recommended_length.max
        ));
        for line in &insights.recommendations {
            output.push_str(&format!("  • {}\n", line));
        }

        if self.detailed {
            output.push_str(&self.format_header("Rule Details", 2));
            for breakdown in &analysis.breakdown {
                output.push_str(&format!("{} ({:.1})\n", breakdown.metric, breakdown.score));
                for rule in &breakdown.rules {
                    let mark = if rule.passed() {
                        self.colorize("✓", Color::Green)
                    } else {
                        self.colorize("✗", Color::Red)
                    };
                    output.push_str(&format!(
                        "  {} {:<28} {:>5.1}/{:<5.1} {}\n",
                        mark, rule.rule, rule.points_earned, rule.points_possible, rule.description
                    ));
                }
            }
        }

        Ok(output)
    }

    fn format_comparison(&self, report: &ComparisonReport) -> Result<String> {
        let mut output = String::new();
        output.push_str(&self.format_header("JOB COMPARISON", 1));
        output.push_str(&format!("Resume: {}\n", report.resume_file));

        for comparison in &report.report.comparisons {
            output.push_str(&self.format_header(&comparison.label, 3));
            output.push_str(&format!(
                "  {}\n",
                self.colorize(&comparison.job_preview, Color::BrightBlack)
            ));
            match &comparison.outcome {
                ItemOutcome::Completed(summary) => {
                    output.push_str(&format!(
                        "  Job match: {:.1}% | Overall: {} | Keywords: {}/{}\n",
                        summary.scores.job_match_percentage,
                        summary.scores.overall,
                        summary.matched_keywords,
                        summary.total_keywords
                    ));
                    if !summary.critical_gaps.is_empty() {
                        output.push_str(&format!(
                            "  Critical gaps: {}\n",
                            self.colorize(&summary.critical_gaps.join(", "), Color::Red)
                        ));
                    }
                }
                ItemOutcome::Failed { reason } => {
                    output.push_str(&format!("  {}\n", self.colorize(&format!("Failed: {}", reason), Color::Red)));
                }
                ItemOutcome::Cancelled => {
                    output.push_str(&format!("  {}\n", self.colorize("Cancelled", Color::Yellow)));
                }
            }
        }

        output.push_str(&self.format_header("Summary", 2));
        match &report.report.best_match {
            Some(best) => output.push_str(&format!(
                "Best match: {}\n",
                self.colorize(best, Color::Green)
            )),
            None => output.push_str("Best match: none\n"),
        }
        output.push_str(&format!(
            "Average match: {:.1}%\n",
            report.report.average_match_percentage
        ));
        Ok(output)
    }

    fn format_suggestions(&self, suggestions: &[Recommendation]) -> Result<String> {
        let mut output = String::new();
        output.push_str(&self.format_header("OPTIMIZATION SUGGESTIONS", 1));
        if suggestions.is_empty() {
            output.push_str("No changes recommended.\n");
        } else {
            self.format_recommendations(&mut output, suggestions);
        }
        Ok(output)
    }

    fn format_bulk(&self, report: &BulkReport) -> Result<String> {
        let mut output = String::new();
        output.push_str(&self.format_header("BULK ANALYSIS", 1));
        output.push_str(&format!("Job: {}\n\n", report.job_file));

        for item in &report.items {
            let line = match &item.outcome {
                ItemOutcome::Completed(record) => format!(
                    "{:<32} overall {:>3}  job match {:>5.1}%",
                    item.label, record.scores.overall, record.scores.job_match_percentage
                ),
                ItemOutcome::Failed { reason } => self.colorize(
                    &format!("{:<32} failed: {}", item.label, reason),
                    Color::Red,
                ),
                ItemOutcome::Cancelled => {
                    self.colorize(&format!("{:<32} cancelled", item.label), Color::Yellow)
                }
            };
            output.push_str(&format!("  {}\n", line));
        }

        let (completed, failed, cancelled) = report.tally();
        output.push_str(&format!(
            "\n{} completed, {} failed, {} cancelled\n",
            completed, failed, cancelled
        ));
        Ok(output)
    }

    fn format_history(&self, report: &HistoryReport) -> Result<String> {
        let mut output = String::new();
        output.push_str(&self.format_header(&format!("SCORE HISTORY: {}", report.resume_id), 1));

        if report.records.is_empty() {
            output.push_str("No analyses recorded.\n");
            return Ok(output);
        }

        for (i, record) in report.records.iter().enumerate() {
            let delta = match i {
                0 => String::new(),
                _ => {
                    let d = report.deltas[i - 1];
                    let color = if d > 0 {
                        Color::Green
                    } else if d < 0 {
                        Color::Red
                    } else {
                        Color::BrightBlack
                    };
                    self.colorize(&format!("({:+})", d), color)
                }
            };
            output.push_str(&format!(
                "  {}  {:>3} {}\n",
                record.timestamp.format("%Y-%m-%d %H:%M"),
                record.scores.overall,
                delta
            ));
        }

        let stats = &report.statistics;
        output.push_str(&self.format_header("Statistics", 3));
        output.push_str(&format!(
            "  Analyses: {} | Average: {:.1} | Highest: {} | Lowest: {}\n",
            stats.total_analyses, stats.average_score, stats.highest_score, stats.lowest_score
        ));
        output.push_str(&format!(
            "  Improvement: {:+} | Trend: {:?}\n",
            stats.improvement, stats.trend
        ));
        Ok(output)
    }

    fn format_benchmarks(&self, benchmarks: &[Benchmark]) -> Result<String> {
        let mut output = String::new();
        output.push_str(&self.format_header("INDUSTRY BENCHMARKS", 1));
        for b in benchmarks {
            output.push_str(&format!(
                "  {:<14} {:<10} avg {:>4.0}  length {}-{}\n",
                b.industry,
                b.role_level.to_string(),
                b.average_ats_score,
                b.recommended_length_range.min,
                b.recommended_length_range.max
            ));
            if self.detailed && !b.trending_keywords.is_empty() {
                output.push_str(&format!(
                    "    trending: {}\n",
                    self.colorize(&b.trending_keywords.join(", "), Color::Cyan)
                ));
            }
        }
        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_analysis(&self, report: &AnalysisReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_comparison(&self, report: &ComparisonReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_suggestions(&self, suggestions: &[Recommendation]) -> Result<String> {
        self.to_json(suggestions)
    }

    fn format_bulk(&self, report: &BulkReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_history(&self, report: &HistoryReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_benchmarks(&self, benchmarks: &[Benchmark]) -> Result<String> {
        self.to_json(benchmarks)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn recommendations_section(output: &mut String, recommendations: &[Recommendation]) {
        for rec in recommendations {
            output.push_str(&format!(
                "### {} {}\n\n",
                Self::priority_badge(rec.priority),
                rec.title
            ));
            output.push_str(&format!(
                "**Category:** {} | **Impact:** +{:.1} pts\n\n",
                rec.category, rec.impact_estimate
            ));
            output.push_str(&format!("{}\n\n", rec.description));
            for item in &rec.action_items {
                output.push_str(&format!("- {}\n", item));
            }
            output.push('\n');
        }
    }

    fn priority_badge(priority: Priority) -> &'static str {
        match priority {
            Priority::High => "🔴",
            Priority::Medium => "🟡",
            Priority::Low => "🟢",
        }
    }

    fn level_badge(level: ScoreLevel) -> &'static str {
        match level {
            ScoreLevel::Excellent => "🟢 Excellent",
            ScoreLevel::Good => "🟡 Good",
            ScoreLevel::Fair => "🟠 Fair",
            ScoreLevel::NeedsImprovement => "🔴 Needs Improvement",
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_analysis(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();
        let summary = &report.summary;
        let analysis = &report.analysis;

        output.push_str("# ATS Compatibility Report\n\n");
        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms
            ));
            output.push_str(&format!(
                "**Resume:** `{}` | **Job:** `{}`\n\n",
                report.metadata.resume_file, report.metadata.job_file
            ));
        }

        output.push_str("## Summary\n\n");
        output.push_str(&format!(
            "**Overall ATS Score:** {} {}\n\n",
            summary.overall_score,
            Self::level_badge(summary.overall_level)
        ));
        output.push_str(&format!("**Verdict:** {}\n\n", summary.verdict));

        output.push_str("### Score Breakdown\n\n");
        output.push_str("| Metric | Score | Level | Weight |\n");
        output.push_str("|--------|-------|-------|--------|\n");
        for metric in &summary.metrics {
            output.push_str(&format!(
                "| {} | {:.1} | {} | {:.0}% |\n",
                metric.metric,
                metric.score,
                Self::level_badge(metric.level),
                metric.weight * 100.0
            ));
        }
        output.push('\n');

        if !summary.improvement_areas.is_empty() {
            output.push_str("### Areas for Improvement\n\n");
            for area in &summary.improvement_areas {
                output.push_str(&format!("- {}\n", area));
            }
            output.push('\n');
        }

        let keywords = &analysis.keyword_analysis;
        output.push_str("## Keywords\n\n");
        output.push_str(&format!(
            "Matched **{}** of **{}** job keywords (density {:.2}%).\n\n",
            keywords.matched_keywords.len(),
            keywords.total_keywords,
            keywords.keyword_density
        ));
        if !keywords.missing_keywords.is_empty() {
            output.push_str(&format!(
                "**Missing:** {}\n\n",
                keywords
                    .missing_keywords
                    .iter()
                    .map(|k| format!("`{}`", k))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        if let Some(gaps) = &analysis.skill_gaps {
            if !gaps.is_empty() {
                output.push_str("### Skill Gaps\n\n");
                output.push_str("| Keyword | Severity | Category |\n");
                output.push_str("|---------|----------|----------|\n");
                for gap in gaps {
                    output.push_str(&format!(
                        "| {} | {} | {} |\n",
                        gap.display, gap.severity, gap.category
                    ));
                }
                output.push('\n');
            }
        }

        if let Some(recommendations) = &analysis.recommendations {
            output.push_str("## Recommendations\n\n");
            Self::recommendations_section(&mut output, recommendations);
        }

        let insights = &analysis.industry_insights;
        output.push_str("## Industry Insights\n\n");
        output.push_str(&format!(
            "- **Benchmark:** {} / {}{}\n",
            insights.industry,
            insights.role_level,
            if insights.benchmark_exact { "" } else { " (general fallback)" }
        ));
        output.push_str(&format!(
            "- **Average ATS score:** {:.0} ({:+.0})\n",
            insights.average_ats_score, insights.score_vs_benchmark
        ));
        output.push_str(&format!(
            "- **Length:** {} words (recommended {}-{})\n",
            insights.resume_word_count,
            insights.recommended_length.min,
            insights.recommended_length.max
        ));
        for line in &insights.recommendations {
            output.push_str(&format!("- {}\n", line));
        }

        Ok(output)
    }

    fn format_comparison(&self, report: &ComparisonReport) -> Result<String> {
        let mut output = String::new();
        output.push_str("# Job Comparison\n\n");
        output.push_str(&format!("**Resume:** `{}`\n\n", report.resume_file));
        output.push_str("| Job | Status | Job Match | Overall | Critical Gaps |\n");
        output.push_str("|-----|--------|-----------|---------|---------------|\n");
        for comparison in &report.report.comparisons {
            match &comparison.outcome {
                ItemOutcome::Completed(summary) => output.push_str(&format!(
                    "| {} | completed | {:.1}% | {} | {} |\n",
                    comparison.label,
                    summary.scores.job_match_percentage,
                    summary.scores.overall,
                    summary.critical_gaps.join(", ")
                )),
                ItemOutcome::Failed { reason } => output.push_str(&format!(
                    "| {} | failed: {} | - | - | - |\n",
                    comparison.label, reason
                )),
                ItemOutcome::Cancelled => output.push_str(&format!(
                    "| {} | cancelled | - | - | - |\n",
                    comparison.label
                )),
            }
        }
        output.push('\n');
        output.push_str(&format!(
            "**Best match:** {}\n\n**Average match:** {:.1}%\n",
            report.report.best_match.as_deref().unwrap_or("none"),
            report.report.average_match_percentage
        ));
        Ok(output)
    }

    fn format_suggestions(&self, suggestions: &[Recommendation]) -> Result<String> {
        let mut output = String::from("# Optimization Suggestions\n\n");
        if suggestions.is_empty() {
            output.push_str("No changes recommended.\n");
        } else {
            Self::recommendations_section(&mut output, suggestions);
        }
        Ok(output)
    }

    fn format_bulk(&self, report: &BulkReport) -> Result<String> {
        let mut output = String::from("# Bulk Analysis\n\n");
        output.push_str(&format!("**Job:** `{}`\n\n", report.job_file));
        output.push_str("| Resume | Status | Overall | Job Match |\n");
        output.push_str("|--------|--------|---------|-----------|\n");
        for item in &report.items {
            match &item.outcome {
                ItemOutcome::Completed(record) => output.push_str(&format!(
                    "| {} | completed | {} | {:.1}% |\n",
                    item.label, record.scores.overall, record.scores.job_match_percentage
                )),
                ItemOutcome::Failed { reason } => output.push_str(&format!(
                    "| {} | failed: {} | - | - |\n",
                    item.label, reason
                )),
                ItemOutcome::Cancelled => {
                    output.push_str(&format!("| {} | cancelled | - | - |\n", item.label))
                }
            }
        }
        Ok(output)
    }

    fn format_history(&self, report: &HistoryReport) -> Result<String> {
        let mut output = format!("# Score History: {}\n\n", report.resume_id);
        output.push_str("| Recorded | Overall | Formatting | Keyword | Content | Readability | Job Match |\n");
        output.push_str("|----------|---------|------------|---------|---------|-------------|-----------|\n");
        for record in &report.records {
            let s = &record.scores;
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {:.1}% |\n",
                record.timestamp.format("%Y-%m-%d %H:%M"),
                s.overall,
                s.formatting,
                s.keyword,
                s.content_structure,
                s.readability,
                s.job_match_percentage
            ));
        }
        let stats = &report.statistics;
        output.push_str(&format!(
            "\n**Average:** {:.1} | **Improvement:** {:+} | **Trend:** {:?}\n",
            stats.average_score, stats.improvement, stats.trend
        ));
        Ok(output)
    }

    fn format_benchmarks(&self, benchmarks: &[Benchmark]) -> Result<String> {
        let mut output = String::from("# Industry Benchmarks\n\n");
        output.push_str("| Industry | Role Level | Average ATS | Length | Trending Keywords |\n");
        output.push_str("|----------|------------|-------------|--------|-------------------|\n");
        for b in benchmarks {
            output.push_str(&format!(
                "| {} | {} | {:.0} | {}-{} | {} |\n",
                b.industry,
                b.role_level,
                b.average_ats_score,
                b.recommended_length_range.min,
                b.recommended_length_range.max,
                b.trending_keywords.join(", ")
            ));
        }
        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        pretty_json: bool,
        include_metadata: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn formatter(&self, format: OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_ats{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_ats{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_ats{}.md", base_name, timestamp_suffix),
    }
}
