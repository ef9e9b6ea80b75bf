//! Text processing, scoring and analysis

pub mod analyzer;
pub mod ats_matcher;
pub mod batch;
pub mod benchmarks;
pub mod document;
pub mod history;
pub mod keywords;
pub mod recommendations;
pub mod scoring;
pub mod skill_gap;
pub mod taxonomy;
pub mod text_processor;
