//! ATS resume compatibility analyzer library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{AtsError, Result};
pub use processing::analyzer::{AnalysisEngine, AnalysisOptions, AnalysisResult};
