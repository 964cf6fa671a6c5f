use crate::error::ErrorPayload;
use crate::types::{
    DiscoverySummary, PageArtifact, ProjectReport, ScreenshotPair, SkippedArtifact,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Schema version for output payloads.
pub const AUDIT_OUTPUT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum AuditOutput {
    Analyze(AnalyzeOutput),
    Discover(DiscoverOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visuals_dir: Option<PathBuf>,
    pub report: ProjectReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverOutput {
    pub version: String,
    pub project_root: PathBuf,
    pub screenshot_root: PathBuf,
    pub summary: DiscoverySummary,
    pub pages: Vec<PageArtifact>,
    pub pairs: Vec<ScreenshotPair>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedArtifact>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: ErrorPayload,
}
