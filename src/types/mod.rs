//! Data model shared by discovery, profiling, visual analysis and scoring.
//!
//! - [`artifacts`] - discovered pages, stylesheet sources and screenshot pairs
//! - [`profiles`] - per-source CSS/HTML feature profiles and visual comparison results
//! - [`results`] - page scores, skipped-artifact records and the project report

pub mod artifacts;
pub mod profiles;
pub mod results;

pub use artifacts::{
    Device, MatchKind, PageArtifact, PageMatch, ScreenshotPair, StylesheetOrigin,
    StylesheetSource,
};
pub use profiles::{
    CssFeatureProfile, ElementCounts, HtmlFeatureProfile, ImageSize, LayoutCounts,
    MediaQueryCounts, RelativeUnitCounts, VisualComparisonResult,
};
pub use results::{
    Aggregate, AggregateScore, DiscoverySummary, PageReport, PageScore, ProjectReport, SkipKind,
    SkippedArtifact, Tier, TierAssessment, VisualStatus,
};
