//! Responsiveness Audit Library
//!
//! Grades how well a static website adapts between desktop and mobile viewports. Static
//! signals come from the site's stylesheets and markup; visual signals come from a
//! desktop/mobile screenshot pair per page. Both are combined into a 0-10 score per page
//! and a project-level grade.
//!
//! # Module Overview
//!
//! - [`discovery`] - Locate pages, stylesheets and screenshot pairs, and match them up
//! - [`profile`] - CSS and HTML feature profiles and their scores
//! - [`visual`] - Desktop/mobile divergence measurement and visualizations
//! - [`scoring`] - Composite scores, aggregation and rubric tiers
//! - [`recommendations`] - Per-page improvement suggestions
//! - [`engine`] - Page and project analysis
//! - [`config`] - Configuration file support
//! - [`types`] - Core data types and structures
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use raudit_lib::{EngineOptions, ResponsivenessEngine};
//!
//! # fn example() -> raudit_lib::Result<()> {
//! let engine = ResponsivenessEngine::new(EngineOptions::default())?;
//! let report = engine.analyze_project(Path::new("site"), Path::new("screenshots"))?;
//! match report.aggregate.score() {
//!     Some(score) => println!("{score:.2}/10"),
//!     None => println!("nothing to score"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod image_loader;
pub mod output;
pub mod profile;
pub mod recommendations;
pub mod scoring;
pub mod types;
pub mod visual;

pub use config::{Config, ConfigError};
pub use discovery::{locate, match_pages, similarity, Discovery, MatchingOptions};
pub use engine::{analyze_project, EngineOptions, PairComparison, ResponsivenessEngine};
pub use error::{AuditError, ErrorCategory, ErrorPayload, Result};
pub use image_loader::{load_image, ImageLoadError};
pub use output::{
    AnalyzeOutput, AuditOutput, DiscoverOutput, ErrorOutput, AUDIT_OUTPUT_VERSION,
};
pub use profile::{css_score, html_score, CssOptions, CssProfiler, HtmlProfiler};
pub use scoring::{
    aggregate, assess_layout_techniques, assess_responsiveness, composite_score, ScoreWeights,
};
pub use types::*;
pub use visual::{layout_score, measure, DivergenceSignals, PreparedPair, VisualOptions};
