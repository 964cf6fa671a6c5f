use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::artifacts::{PageMatch, StylesheetOrigin};
use super::profiles::{CssFeatureProfile, HtmlFeatureProfile, VisualComparisonResult};

/// Component and composite scores for one page, each in [0, 10].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageScore {
    pub css_score: f64,
    pub html_score: f64,
    /// Absent when no screenshot pair matched the page.
    pub layout_score: Option<f64>,
    /// Absent whenever `layout_score` is absent; such pages stay out of the aggregate.
    pub overall_score: Option<f64>,
}

/// Why an artifact (or part of a page's analysis) was left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipKind {
    /// Nothing of a required kind was found.
    DiscoveryEmpty,
    /// A page, stylesheet or image failed to read or decode.
    ArtifactUnreadable,
    /// A page had no screenshot pair.
    MatchFailure,
    /// Screenshot heights diverged too far to visualize; scoring still ran.
    GeometryDegenerate,
}

impl fmt::Display for SkipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipKind::DiscoveryEmpty => "discovery-empty",
            SkipKind::ArtifactUnreadable => "artifact-unreadable",
            SkipKind::MatchFailure => "match-failure",
            SkipKind::GeometryDegenerate => "geometry-degenerate",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedArtifact {
    pub path: String,
    pub kind: SkipKind,
    pub reason: String,
}

impl SkippedArtifact {
    pub fn new(path: impl Into<String>, kind: SkipKind, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum VisualStatus {
    Analyzed,
    /// No screenshot pair matched; the page is scored on CSS/HTML only.
    Unavailable { reason: String },
    /// The matched pair could not be decoded; layout contributes 0.
    Unreadable { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Fail,
    Pass,
    Credit,
    Distinction,
}

impl Tier {
    pub const fn label(&self) -> &'static str {
        match self {
            Tier::Distinction => "Distinction (75-100%)",
            Tier::Credit => "Credit (65-74%)",
            Tier::Pass => "Pass (50-64%)",
            Tier::Fail => "Fail (0-49%)",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A score placed into a rubric band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierAssessment {
    pub tier: Tier,
    /// Linear position within the tier's band, in [0, 100].
    pub percentage: f64,
    pub points: f64,
    pub max_points: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateScore {
    /// Mean overall score of pages with a visual analysis.
    pub score: f64,
    pub pages_scored: usize,
    pub responsiveness: TierAssessment,
    /// Responsiveness points plus layout-technique points.
    pub design_total: f64,
    pub design_total_max: f64,
}

/// Project-level result: a score, or an explicit marker that nothing could be scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Aggregate {
    Scored(AggregateScore),
    NoData { reason: String },
}

impl Aggregate {
    pub fn score(&self) -> Option<f64> {
        match self {
            Aggregate::Scored(a) => Some(a.score),
            Aggregate::NoData { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReport {
    pub page: PathBuf,
    pub stylesheet_origin: StylesheetOrigin,
    pub css_profiles: Vec<CssFeatureProfile>,
    pub html: HtmlFeatureProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshots: Option<PageMatch>,
    pub visual_status: VisualStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual: Option<VisualComparisonResult>,
    pub scores: PageScore,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedArtifact>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverySummary {
    pub pages: usize,
    pub stylesheet_files: usize,
    pub inline_blocks: usize,
    pub screenshot_pairs: usize,
    pub exact_matches: usize,
    pub fuzzy_matches: usize,
    pub fallback_pages: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReport {
    pub project_root: PathBuf,
    pub screenshot_root: PathBuf,
    pub discovery: DiscoverySummary,
    pub pages: Vec<PageReport>,
    pub aggregate: Aggregate,
    pub layout_techniques: TierAssessment,
    /// Union of breakpoints across the stylesheets of scored pages, ascending.
    pub breakpoints: Vec<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedArtifact>,
}
