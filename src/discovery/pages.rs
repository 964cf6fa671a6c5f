use std::path::{Component, Path, PathBuf};

use scraper::{Html, Selector};
use walkdir::WalkDir;

use crate::types::{
    PageArtifact, SkipKind, SkippedArtifact, StylesheetOrigin, StylesheetSource,
};

pub const PAGE_EXTENSIONS: &[&str] = &["html", "htm"];
pub const STYLESHEET_EXTENSIONS: &[&str] = &["css"];

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Recursively list files under `root` with one of `extensions`, sorted by path.
///
/// Entries that cannot be read are reported instead of aborting the walk.
pub fn find_files(root: &Path, extensions: &[&str]) -> (Vec<PathBuf>, Vec<SkippedArtifact>) {
    let mut files = Vec::new();
    let mut skipped = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| root.display().to_string());
                ::log::warn!("Skipping unreadable entry {}: {}", path, err);
                skipped.push(SkippedArtifact::new(
                    path,
                    SkipKind::ArtifactUnreadable,
                    err.to_string(),
                ));
                continue;
            }
        };
        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    (files, skipped)
}

/// Lexically resolve `.` and `..` without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn is_off_site(href: &str) -> bool {
    let lower = href.trim().to_ascii_lowercase();
    lower.starts_with("//") || lower.starts_with("data:") || lower.contains("://")
}

/// Resolve a stylesheet `href` to a file inside the project.
///
/// Root-relative links (`/css/a.css`) resolve against the project root, everything else
/// against the page's directory. Off-site links and links to missing or non-CSS files
/// resolve to `None`.
pub fn resolve_stylesheet_link(href: &str, page: &Path, project_root: &Path) -> Option<PathBuf> {
    if is_off_site(href) {
        return None;
    }
    let link = href
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    if link.is_empty() {
        return None;
    }

    let candidate = if let Some(rooted) = link.strip_prefix('/') {
        project_root.join(rooted)
    } else {
        page.parent().unwrap_or(project_root).join(link)
    };
    let candidate = normalize_path(&candidate);

    if candidate.is_file() && has_extension(&candidate, STYLESHEET_EXTENSIONS) {
        Some(candidate)
    } else {
        ::log::debug!("Ignoring stylesheet link {} from {}", href, page.display());
        None
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Linked stylesheets (in document order) followed by inline `<style>` blocks.
pub fn extract_stylesheets(markup: &str, page: &Path, project_root: &Path) -> Vec<StylesheetSource> {
    let doc = Html::parse_document(markup);
    let mut sources = Vec::new();

    if let Some(links) = selector("link[href]") {
        for link in doc.select(&links) {
            let is_stylesheet = link
                .value()
                .attr("rel")
                .map(|rel| {
                    rel.split_whitespace()
                        .any(|token| token.eq_ignore_ascii_case("stylesheet"))
                })
                .unwrap_or(false);
            if !is_stylesheet {
                continue;
            }
            if let Some(path) = link
                .value()
                .attr("href")
                .and_then(|href| resolve_stylesheet_link(href, page, project_root))
            {
                sources.push(StylesheetSource::File { path });
            }
        }
    }

    if let Some(styles) = selector("style") {
        for (idx, style) in doc.select(&styles).enumerate() {
            let css: String = style.text().collect();
            sources.push(StylesheetSource::inline(page, idx + 1, css));
        }
    }

    sources
}

/// Build a page artifact with its stylesheet sources resolved.
///
/// A page that references no stylesheet (or cannot be read) is attributed every
/// stylesheet in the project. That fallback is an approximation.
pub fn resolve_page(
    page: &Path,
    project_root: &Path,
    project_stylesheets: &[PathBuf],
) -> (PageArtifact, Option<SkippedArtifact>) {
    let (sources, skipped) = match std::fs::read_to_string(page) {
        Ok(markup) => (extract_stylesheets(&markup, page, project_root), None),
        Err(err) => {
            ::log::warn!("Error finding stylesheets for {}: {}", page.display(), err);
            (
                Vec::new(),
                Some(SkippedArtifact::new(
                    page.display().to_string(),
                    SkipKind::ArtifactUnreadable,
                    format!("page could not be read: {err}"),
                )),
            )
        }
    };

    let (stylesheets, stylesheet_origin) = if sources.is_empty() {
        (
            project_stylesheets
                .iter()
                .map(|path| StylesheetSource::File { path: path.clone() })
                .collect(),
            StylesheetOrigin::ProjectFallback,
        )
    } else {
        (sources, StylesheetOrigin::Page)
    };

    let stem = page
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    (
        PageArtifact {
            path: page.to_path_buf(),
            stem,
            stylesheets,
            stylesheet_origin,
            screenshots: None,
        },
        skipped,
    )
}
