//! Artifact discovery: pages, their stylesheets, screenshot pairs, and page-to-pair matching.

mod matching;
mod pages;
mod screenshots;

use std::path::{Path, PathBuf};

pub use matching::{match_pages, similarity, MatchingOptions};
pub use pages::{
    extract_stylesheets, find_files, normalize_path, resolve_page, resolve_stylesheet_link,
    PAGE_EXTENSIONS, STYLESHEET_EXTENSIONS,
};
pub use screenshots::{find_screenshot_pairs, parse_screenshot_name, ScreenshotInventory};

use crate::error::AuditError;
use crate::types::{
    DiscoverySummary, MatchKind, PageArtifact, ScreenshotPair, SkipKind, SkippedArtifact,
    StylesheetOrigin,
};
use crate::Result;

/// Everything found under a project root and a screenshot root.
#[derive(Debug, Clone)]
pub struct Discovery {
    pub project_root: PathBuf,
    pub screenshot_root: PathBuf,
    /// Pages sorted by path, each with resolved stylesheets and (when found) screenshots.
    pub pages: Vec<PageArtifact>,
    pub stylesheet_files: Vec<PathBuf>,
    pub pairs: Vec<ScreenshotPair>,
    pub skipped: Vec<SkippedArtifact>,
    pub summary: DiscoverySummary,
}

/// Discover pages, stylesheets and screenshot pairs, and match them up.
///
/// Empty discoveries are not errors: they are recorded in `skipped`. Only a project
/// root that is not a directory is rejected.
pub fn locate(
    project_root: &Path,
    screenshot_root: &Path,
    options: &MatchingOptions,
) -> Result<Discovery> {
    if !project_root.is_dir() {
        return Err(AuditError::invalid_argument(format!(
            "Project root is not a directory: {}",
            project_root.display()
        )));
    }

    let mut skipped = Vec::new();

    let (page_paths, unreadable) = find_files(project_root, PAGE_EXTENSIONS);
    skipped.extend(unreadable);
    if page_paths.is_empty() {
        ::log::warn!("No HTML files found in {}", project_root.display());
        skipped.push(SkippedArtifact::new(
            project_root.display().to_string(),
            SkipKind::DiscoveryEmpty,
            "no pages found",
        ));
    }

    let (stylesheet_files, unreadable) = find_files(project_root, STYLESHEET_EXTENSIONS);
    skipped.extend(unreadable);

    let mut pages = Vec::with_capacity(page_paths.len());
    for path in &page_paths {
        let (page, skip) = resolve_page(path, project_root, &stylesheet_files);
        skipped.extend(skip);
        pages.push(page);
    }

    let inline_blocks: usize = pages
        .iter()
        .filter(|p| p.stylesheet_origin == StylesheetOrigin::Page)
        .map(|p| p.stylesheets.iter().filter(|s| s.is_inline()).count())
        .sum();
    if stylesheet_files.is_empty() && inline_blocks == 0 && !pages.is_empty() {
        ::log::warn!("No stylesheets found in {}", project_root.display());
        skipped.push(SkippedArtifact::new(
            project_root.display().to_string(),
            SkipKind::DiscoveryEmpty,
            "no stylesheets found",
        ));
    }
    ::log::info!(
        "Found {} pages, {} stylesheet files and {} inline style blocks",
        pages.len(),
        stylesheet_files.len(),
        inline_blocks
    );

    let inventory = find_screenshot_pairs(screenshot_root);
    skipped.extend(inventory.skipped);
    let pairs = inventory.pairs;
    // A missing directory was already recorded by the inventory.
    if pairs.is_empty() && screenshot_root.is_dir() {
        ::log::warn!(
            "No screenshot pairs found in {} (expected <page>.desktop.png and <page>.mobile.png)",
            screenshot_root.display()
        );
        skipped.push(SkippedArtifact::new(
            screenshot_root.display().to_string(),
            SkipKind::DiscoveryEmpty,
            "no screenshot pairs found",
        ));
    } else {
        ::log::info!("Found {} screenshot pairs", pairs.len());
    }

    let stems: Vec<&str> = pages.iter().map(|p| p.stem.as_str()).collect();
    let matches = match_pages(&stems, &pairs, options);
    for (page, found) in pages.iter_mut().zip(matches) {
        page.screenshots = found;
    }

    let exact_matches = pages
        .iter()
        .filter(|p| matches!(p.screenshots.as_ref().map(|m| m.kind), Some(MatchKind::Exact)))
        .count();
    let fuzzy_matches = pages
        .iter()
        .filter(|p| {
            matches!(
                p.screenshots.as_ref().map(|m| m.kind),
                Some(MatchKind::Fuzzy { .. })
            )
        })
        .count();
    ::log::info!(
        "Matched {} pages with screenshot pairs ({} exact, {} fuzzy)",
        exact_matches + fuzzy_matches,
        exact_matches,
        fuzzy_matches
    );

    let summary = DiscoverySummary {
        pages: pages.len(),
        stylesheet_files: stylesheet_files.len(),
        inline_blocks,
        screenshot_pairs: pairs.len(),
        exact_matches,
        fuzzy_matches,
        fallback_pages: pages
            .iter()
            .filter(|p| p.stylesheet_origin == StylesheetOrigin::ProjectFallback)
            .count(),
    };

    Ok(Discovery {
        project_root: project_root.to_path_buf(),
        screenshot_root: screenshot_root.to_path_buf(),
        pages,
        stylesheet_files,
        pairs,
        skipped,
        summary,
    })
}
