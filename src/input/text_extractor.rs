//! Job description text extraction

use crate::error::Result;
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        Ok(markdown_to_text(&String::from_utf8_lossy(&bytes)))
    }
}

/// Flatten markdown into plain lines. Headings become `Title:` lines so the
/// keyword extractor sees them as section headers.
pub fn markdown_to_text(markdown: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Text(text) | Event::Code(text) => current.push_str(&text),
            Event::SoftBreak => current.push(' '),
            Event::HardBreak => flush(&mut current, &mut lines),
            Event::Start(Tag::Item) | Event::Start(Tag::Paragraph) => {
                flush(&mut current, &mut lines)
            }
            Event::End(Tag::Heading(..)) => {
                let title = current.trim().trim_end_matches(':').to_string();
                current = format!("{}:", title);
                flush(&mut current, &mut lines);
            }
            Event::End(Tag::Item) | Event::End(Tag::Paragraph) => {
                flush(&mut current, &mut lines)
            }
            _ => {}
        }
    }
    flush(&mut current, &mut lines);

    lines.join("\n")
}

fn flush(current: &mut String, lines: &mut Vec<String>) {
    let line = current.trim();
    if !line.is_empty() {
        lines.push(line.to_string());
    }
    current.clear();
}
