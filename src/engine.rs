//! Page and project analysis.
//!
//! [`ResponsivenessEngine`] holds compiled profilers and immutable options. Analyzing a
//! page reads only that page's artifacts and writes only that page's visuals, so
//! `analyze_page` may be called from several threads for distinct pages.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::discovery::{locate, Discovery, MatchingOptions};
use crate::image_loader::{load_image, ImageLoadError};
use crate::profile::{average_css_score, CssOptions, CssProfiler, HtmlProfiler};
use crate::recommendations::{page_recommendations, PageCssTotals};
use crate::scoring::{aggregate, assess_layout_techniques, page_score, ScoreWeights};
use crate::types::{
    Aggregate, PageArtifact, PageReport, ProjectReport, ScreenshotPair, SkipKind,
    SkippedArtifact, VisualComparisonResult, VisualStatus,
};
use crate::visual::{measure, render_visuals, PreparedPair, VisualOptions};
use crate::Result;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineOptions {
    pub weights: ScoreWeights,
    pub visual: VisualOptions,
    pub matching: MatchingOptions,
    pub css: CssOptions,
    /// Directory for comparison and heatmap images. `None` writes nothing.
    pub visuals_dir: Option<PathBuf>,
}

/// A visual comparison plus any policy skip it triggered.
#[derive(Debug, Clone, PartialEq)]
pub struct PairComparison {
    pub result: VisualComparisonResult,
    pub skipped: Option<SkippedArtifact>,
}

pub struct ResponsivenessEngine {
    options: EngineOptions,
    css: CssProfiler,
    html: HtmlProfiler,
}

impl ResponsivenessEngine {
    pub fn new(options: EngineOptions) -> Result<Self> {
        Ok(Self {
            css: CssProfiler::new(options.css.clone())?,
            html: HtmlProfiler::new()?,
            options,
        })
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Decode, measure and (optionally) visualize one screenshot pair.
    ///
    /// Visuals are named after `page_name`, so pages sharing a fuzzy-matched pair still
    /// write distinct files.
    pub fn compare_pair(
        &self,
        pair: &ScreenshotPair,
        page_name: &str,
    ) -> std::result::Result<PairComparison, ImageLoadError> {
        let desktop = load_image(&pair.desktop)?;
        let mobile = load_image(&pair.mobile)?;
        let prepared = PreparedPair::new(&desktop, &mobile);
        let measured = measure(&prepared, &self.options.visual);

        let mut comparison_path = None;
        let mut heatmap_path = None;
        let mut skipped = None;

        if !measured.visualization_feasible {
            ::log::info!(
                "Skipping visualization for {} - height difference too large",
                page_name
            );
            skipped = Some(SkippedArtifact::new(
                pair.desktop.display().to_string(),
                SkipKind::GeometryDegenerate,
                format!(
                    "rescaled mobile height {} diverges from desktop height {} by more than {}x",
                    prepared.mobile_rescaled.height(),
                    prepared.desktop.height(),
                    self.options.visual.max_height_divergence
                ),
            ));
        } else if let Some(dir) = &self.options.visuals_dir {
            match render_visuals(&prepared, page_name, dir) {
                Ok(artifacts) => {
                    comparison_path = Some(artifacts.comparison_path);
                    heatmap_path = Some(artifacts.heatmap_path);
                }
                Err(err) => {
                    ::log::warn!("Could not write visuals for {}: {}", page_name, err);
                }
            }
        }

        Ok(PairComparison {
            result: VisualComparisonResult {
                desktop_path: pair.desktop.clone(),
                mobile_path: pair.mobile.clone(),
                desktop_size: measured.desktop_size,
                mobile_size: measured.mobile_size,
                width_ratio: measured.signals.width_ratio,
                color_similarity: measured.color_similarity,
                mean_difference: measured.signals.mean_difference,
                horizontal_edge_distance: measured.signals.horizontal_edge_distance,
                vertical_edge_distance: measured.signals.vertical_edge_distance,
                layout_score: measured.layout_score,
                comparison_path,
                heatmap_path,
            },
            skipped,
        })
    }

    /// Score one page. Failures reading its artifacts end up in the report, never as errors.
    pub fn analyze_page(&self, page: &PageArtifact) -> PageReport {
        let mut skipped = Vec::new();

        let css_profiles: Vec<_> = page
            .stylesheets
            .iter()
            .map(|source| self.css.profile_source(source))
            .collect();
        for profile in css_profiles.iter().filter(|p| p.error.is_some()) {
            skipped.push(SkippedArtifact::new(
                profile.source.clone(),
                SkipKind::ArtifactUnreadable,
                profile.error.clone().unwrap_or_default(),
            ));
        }

        let html = self.html.profile_file(&page.path);
        if let Some(err) = &html.error {
            skipped.push(SkippedArtifact::new(
                html.source.clone(),
                SkipKind::ArtifactUnreadable,
                err.clone(),
            ));
        }

        let (visual_status, visual) = match &page.screenshots {
            None => {
                let reason = format!("no screenshot pair matched '{}'", page.stem);
                ::log::info!("Visual analysis unavailable for {}", page.path.display());
                skipped.push(SkippedArtifact::new(
                    page.path.display().to_string(),
                    SkipKind::MatchFailure,
                    reason.clone(),
                ));
                (VisualStatus::Unavailable { reason }, None)
            }
            Some(found) => match self.compare_pair(&found.pair, &page.stem) {
                Ok(comparison) => {
                    skipped.extend(comparison.skipped);
                    (VisualStatus::Analyzed, Some(comparison.result))
                }
                Err(err) => {
                    ::log::warn!(
                        "Error comparing screenshots {} and {}: {}",
                        found.pair.desktop.display(),
                        found.pair.mobile.display(),
                        err
                    );
                    let reason = err.to_string();
                    skipped.push(SkippedArtifact::new(
                        found.pair.base_name.clone(),
                        SkipKind::ArtifactUnreadable,
                        reason.clone(),
                    ));
                    (VisualStatus::Unreadable { reason }, None)
                }
            },
        };

        let layout = match visual_status {
            VisualStatus::Analyzed => visual.as_ref().map(|v| v.layout_score),
            VisualStatus::Unreadable { .. } => Some(0.0),
            VisualStatus::Unavailable { .. } => None,
        };
        let scores = page_score(
            layout,
            average_css_score(&css_profiles),
            html.score,
            &self.options.weights,
        );

        let recommendations = page_recommendations(
            &html,
            &PageCssTotals::from_profiles(&css_profiles),
            &scores,
            visual.as_ref(),
        );

        PageReport {
            page: page.path.clone(),
            stylesheet_origin: page.stylesheet_origin,
            css_profiles,
            html,
            screenshots: page.screenshots.clone(),
            visual_status,
            visual,
            scores,
            recommendations,
            skipped,
        }
    }

    /// Analyze every page of an already discovered project.
    pub fn analyze_discovery(&self, discovery: Discovery) -> ProjectReport {
        let pages: Vec<PageReport> = discovery
            .pages
            .iter()
            .map(|page| {
                ::log::debug!("Analyzing {}", page.path.display());
                self.analyze_page(page)
            })
            .collect();

        let mut skipped = discovery.skipped;
        for page in &pages {
            skipped.extend(page.skipped.iter().cloned());
        }

        // Only pages that enter the aggregate feed the project-level CSS signals.
        let scored_profiles = || {
            pages
                .iter()
                .filter(|p| p.scores.overall_score.is_some())
                .flat_map(|p| p.css_profiles.iter())
        };
        let layout_techniques = assess_layout_techniques(scored_profiles());
        let aggregate = aggregate(&pages, &layout_techniques);
        match &aggregate {
            Aggregate::Scored(a) => ::log::info!(
                "Overall score {:.2}/10 over {} pages ({})",
                a.score,
                a.pages_scored,
                a.responsiveness.tier
            ),
            Aggregate::NoData { reason } => ::log::warn!("No aggregate score: {}", reason),
        }

        let breakpoints: BTreeSet<u32> = scored_profiles()
            .flat_map(|c| c.breakpoints.iter().copied())
            .collect();

        ProjectReport {
            project_root: discovery.project_root,
            screenshot_root: discovery.screenshot_root,
            discovery: discovery.summary,
            pages,
            aggregate,
            layout_techniques,
            breakpoints: breakpoints.into_iter().collect(),
            skipped,
        }
    }

    /// Discover and analyze a whole project.
    ///
    /// Only an invalid project root is an error; empty discoveries produce a report with a
    /// no-data aggregate.
    pub fn analyze_project(
        &self,
        project_root: &Path,
        screenshot_root: &Path,
    ) -> Result<ProjectReport> {
        let discovery = locate(project_root, screenshot_root, &self.options.matching)?;
        Ok(self.analyze_discovery(discovery))
    }
}

/// Build an engine from `options` and analyze a project with it.
pub fn analyze_project(
    project_root: &Path,
    screenshot_root: &Path,
    options: EngineOptions,
) -> Result<ProjectReport> {
    ResponsivenessEngine::new(options)?.analyze_project(project_root, screenshot_root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MatchKind, PageMatch, StylesheetOrigin, StylesheetSource};
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn engine() -> ResponsivenessEngine {
        ResponsivenessEngine::new(EngineOptions::default()).expect("engine")
    }

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("mkdir");
        }
        std::fs::write(path, content).expect("write");
    }

    fn save(img: &RgbImage, path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("mkdir");
        }
        img.save(path).expect("png");
    }

    fn columns(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, _| {
            if (x / 8) % 2 == 0 {
                Rgb([240, 240, 240])
            } else {
                Rgb([30, 60, 120])
            }
        })
    }

    fn page(dir: &Path, stem: &str, pair: Option<ScreenshotPair>) -> PageArtifact {
        let path = dir.join(format!("{stem}.html"));
        PageArtifact {
            path,
            stem: stem.to_string(),
            stylesheets: vec![StylesheetSource::inline(
                &dir.join(format!("{stem}.html")),
                1,
                "@media (max-width: 768px) { .a { width: 50%; } }",
            )],
            stylesheet_origin: StylesheetOrigin::Page,
            screenshots: pair.map(|pair| PageMatch {
                pair,
                kind: MatchKind::Exact,
            }),
        }
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ResponsivenessEngine>();
    }

    #[test]
    fn unmatched_page_has_no_layout_or_overall_score() {
        let dir = TempDir::new().expect("tempdir");
        write(
            &dir.path().join("about.html"),
            r#"<meta name="viewport" content="width=device-width">"#,
        );
        let report = engine().analyze_page(&page(dir.path(), "about", None));
        assert_eq!(report.scores.layout_score, None);
        assert_eq!(report.scores.overall_score, None);
        assert_eq!(report.scores.html_score, 5.0);
        assert!(matches!(report.visual_status, VisualStatus::Unavailable { .. }));
        assert_eq!(report.skipped[0].kind, SkipKind::MatchFailure);
    }

    #[test]
    fn identical_screenshots_score_two_for_layout() {
        let dir = TempDir::new().expect("tempdir");
        write(&dir.path().join("home.html"), "<p>home</p>");
        let shot = columns(32, 40);
        let pair = ScreenshotPair {
            base_name: "home".to_string(),
            desktop: dir.path().join("shots/home.desktop.png"),
            mobile: dir.path().join("shots/home.mobile.png"),
        };
        save(&shot, &pair.desktop);
        save(&shot, &pair.mobile);

        let report = engine().analyze_page(&page(dir.path(), "home", Some(pair)));
        assert_eq!(report.visual_status, VisualStatus::Analyzed);
        assert_eq!(report.scores.layout_score, Some(2.0));
        let overall = report.scores.overall_score.expect("overall");
        assert!((0.0..=10.0).contains(&overall));
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("layout adaptation")));
    }

    #[test]
    fn undecodable_pair_contributes_zero_layout() {
        let dir = TempDir::new().expect("tempdir");
        write(&dir.path().join("home.html"), "<p>home</p>");
        let pair = ScreenshotPair {
            base_name: "home".to_string(),
            desktop: dir.path().join("home.desktop.png"),
            mobile: dir.path().join("home.mobile.png"),
        };
        write(&pair.desktop, "not an image");
        write(&pair.mobile, "not an image");

        let report = engine().analyze_page(&page(dir.path(), "home", Some(pair)));
        assert!(matches!(report.visual_status, VisualStatus::Unreadable { .. }));
        assert_eq!(report.scores.layout_score, Some(0.0));
        assert!(report.scores.overall_score.is_some());
        assert!(report
            .skipped
            .iter()
            .any(|s| s.kind == SkipKind::ArtifactUnreadable));
    }

    #[test]
    fn visuals_written_only_when_requested() {
        let dir = TempDir::new().expect("tempdir");
        write(&dir.path().join("home.html"), "<p>home</p>");
        let pair = ScreenshotPair {
            base_name: "home".to_string(),
            desktop: dir.path().join("home.desktop.png"),
            mobile: dir.path().join("home.mobile.png"),
        };
        save(&columns(64, 48), &pair.desktop);
        save(&columns(16, 20), &pair.mobile);

        let quiet = engine().compare_pair(&pair, "home").expect("compare");
        assert!(quiet.result.comparison_path.is_none());

        let out = dir.path().join("visuals");
        let loud = ResponsivenessEngine::new(EngineOptions {
            visuals_dir: Some(out.clone()),
            ..Default::default()
        })
        .expect("engine")
        .compare_pair(&pair, "home")
        .expect("compare");
        assert_eq!(loud.result.comparison_path, Some(out.join("compare_home.png")));
        assert!(out.join("heatmap_home.png").is_file());
        assert_eq!(quiet.result.layout_score, loud.result.layout_score);
        assert_eq!(quiet.result.width_ratio, 4.0);
    }

    #[test]
    fn divergent_heights_skip_visuals_but_keep_score() {
        let dir = TempDir::new().expect("tempdir");
        let pair = ScreenshotPair {
            base_name: "tall".to_string(),
            desktop: dir.path().join("tall.desktop.png"),
            mobile: dir.path().join("tall.mobile.png"),
        };
        save(&columns(40, 10), &pair.desktop);
        save(&columns(10, 40), &pair.mobile);

        let compared = ResponsivenessEngine::new(EngineOptions {
            visuals_dir: Some(dir.path().join("visuals")),
            ..Default::default()
        })
        .expect("engine")
        .compare_pair(&pair, "tall")
        .expect("compare");
        assert!(compared.result.comparison_path.is_none());
        assert!(compared.result.heatmap_path.is_none());
        assert_eq!(
            compared.skipped.map(|s| s.kind),
            Some(SkipKind::GeometryDegenerate)
        );
        assert!((0.0..=10.0).contains(&compared.result.layout_score));
    }

    #[test]
    fn empty_project_reports_no_data() {
        let dir = TempDir::new().expect("tempdir");
        let report = engine()
            .analyze_project(dir.path(), &dir.path().join("shots"))
            .expect("report");
        assert!(report.pages.is_empty());
        assert!(matches!(report.aggregate, Aggregate::NoData { .. }));
        assert_eq!(report.layout_techniques.percentage, 0.0);
        assert!(!report.skipped.is_empty());
    }

    #[test]
    fn project_analysis_is_deterministic() {
        let dir = TempDir::new().expect("tempdir");
        let site = dir.path().join("site");
        let shots = dir.path().join("shots");
        write(
            &site.join("home.html"),
            r#"<link rel="stylesheet" href="main.css"><meta name="viewport" content="width=device-width">"#,
        );
        write(
            &site.join("main.css"),
            "@media (max-width: 480px) { .a { display: flex; } } @media (min-width: 992px) { .b { width: 2rem; } }",
        );
        save(&columns(64, 48), &shots.join("home.desktop.png"));
        save(&columns(16, 20), &shots.join("home.mobile.png"));

        let engine = engine();
        let first = engine.analyze_project(&site, &shots).expect("report");
        let second = engine.analyze_project(&site, &shots).expect("report");
        assert_eq!(first, second);
        assert_eq!(first.breakpoints, vec![480, 992]);
        assert!(first.aggregate.score().is_some());
    }
}
