use std::collections::BTreeSet;

use crate::types::{CssFeatureProfile, HtmlFeatureProfile, PageScore, VisualComparisonResult};

pub const ADD_VIEWPORT: &str = "Add a viewport meta tag to enable proper mobile scaling.";
pub const USE_RESPONSIVE_IMAGES: &str =
    "Implement responsive image techniques (srcset, sizes, picture elements).";
pub const ADD_MEDIA_QUERIES: &str =
    "Add more media queries to adapt layout at different screen sizes.";
pub const ADD_BREAKPOINTS: &str = "Define additional breakpoints for better device coverage.";
pub const USE_FLEX_OR_GRID: &str =
    "Increase usage of Flexbox and/or Grid for more responsive layouts.";
pub const USE_RELATIVE_UNITS: &str =
    "Use more relative units (%, em, rem, vh, vw) instead of fixed pixels.";
pub const IMPROVE_ADAPTATION: &str =
    "Improve layout adaptation between desktop and mobile versions.";
pub const KEEP_VISUAL_CONSISTENCY: &str =
    "Ensure visual consistency between desktop and mobile versions.";

/// Totals across every stylesheet attributed to a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCssTotals {
    pub media_queries: usize,
    pub breakpoints: BTreeSet<u32>,
    pub flex_features: usize,
    pub grid_features: usize,
    pub relative_units: usize,
}

impl PageCssTotals {
    pub fn from_profiles(profiles: &[CssFeatureProfile]) -> Self {
        let mut totals = Self::default();
        for profile in profiles {
            totals.media_queries += profile.media_queries.total();
            totals.breakpoints.extend(profile.breakpoints.iter().copied());
            totals.flex_features += profile.layouts.flex_features();
            totals.grid_features += profile.layouts.grid_features();
            totals.relative_units += profile.relative_units.total();
        }
        totals
    }
}

/// Improvement suggestions for one page, in a fixed order.
///
/// Layout and color checks only apply when the page had a visual comparison.
pub fn page_recommendations(
    html: &HtmlFeatureProfile,
    css: &PageCssTotals,
    scores: &PageScore,
    visual: Option<&VisualComparisonResult>,
) -> Vec<String> {
    let checks = [
        (!html.has_viewport_meta, ADD_VIEWPORT),
        (html.responsive_images() < 2, USE_RESPONSIVE_IMAGES),
        (css.media_queries < 3, ADD_MEDIA_QUERIES),
        (css.breakpoints.len() < 2, ADD_BREAKPOINTS),
        (
            css.flex_features < 3 && css.grid_features < 2,
            USE_FLEX_OR_GRID,
        ),
        (css.relative_units < 10, USE_RELATIVE_UNITS),
        (
            scores.layout_score.is_some_and(|s| s < 5.0),
            IMPROVE_ADAPTATION,
        ),
        (
            visual.is_some_and(|v| v.color_similarity < 0.7),
            KEEP_VISUAL_CONSISTENCY,
        ),
    ];

    checks
        .into_iter()
        .filter(|(applies, _)| *applies)
        .map(|(_, message)| message.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ImageSize, LayoutCounts, MediaQueryCounts, RelativeUnitCounts};
    use std::path::PathBuf;

    fn visual(color_similarity: f64) -> VisualComparisonResult {
        VisualComparisonResult {
            desktop_path: PathBuf::from("home.desktop.png"),
            mobile_path: PathBuf::from("home.mobile.png"),
            desktop_size: ImageSize {
                width: 1600,
                height: 900,
            },
            mobile_size: ImageSize {
                width: 400,
                height: 900,
            },
            width_ratio: 4.0,
            color_similarity,
            mean_difference: 45.0,
            horizontal_edge_distance: 0.6,
            vertical_edge_distance: 0.2,
            layout_score: 10.0,
            comparison_path: None,
            heatmap_path: None,
        }
    }

    fn rich_css() -> CssFeatureProfile {
        CssFeatureProfile {
            breakpoints: vec![480, 768],
            media_queries: MediaQueryCounts {
                max_width: 3,
                ..Default::default()
            },
            relative_units: RelativeUnitCounts {
                rem: 12,
                ..Default::default()
            },
            layouts: LayoutCounts {
                flexbox: 4,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn bare_page_gets_every_static_recommendation_in_order() {
        let recs = page_recommendations(
            &HtmlFeatureProfile::default(),
            &PageCssTotals::default(),
            &PageScore::default(),
            None,
        );
        assert_eq!(
            recs,
            vec![
                ADD_VIEWPORT,
                USE_RESPONSIVE_IMAGES,
                ADD_MEDIA_QUERIES,
                ADD_BREAKPOINTS,
                USE_FLEX_OR_GRID,
                USE_RELATIVE_UNITS,
            ]
        );
    }

    #[test]
    fn well_built_page_gets_none() {
        let html = HtmlFeatureProfile {
            has_viewport_meta: true,
            srcset_attributes: 2,
            ..Default::default()
        };
        let css = PageCssTotals::from_profiles(&[rich_css()]);
        let scores = PageScore {
            layout_score: Some(8.0),
            ..Default::default()
        };
        let v = visual(0.9);
        assert!(page_recommendations(&html, &css, &scores, Some(&v)).is_empty());
    }

    #[test]
    fn visual_checks_follow_the_comparison() {
        let html = HtmlFeatureProfile {
            has_viewport_meta: true,
            srcset_attributes: 2,
            ..Default::default()
        };
        let css = PageCssTotals::from_profiles(&[rich_css()]);
        let scores = PageScore {
            layout_score: Some(2.0),
            ..Default::default()
        };
        let v = visual(0.1);
        assert_eq!(
            page_recommendations(&html, &css, &scores, Some(&v)),
            vec![IMPROVE_ADAPTATION, KEEP_VISUAL_CONSISTENCY]
        );
    }

    #[test]
    fn totals_union_breakpoints_across_sources() {
        let mut other = rich_css();
        other.breakpoints = vec![768, 1200];
        let totals = PageCssTotals::from_profiles(&[rich_css(), other]);
        assert_eq!(totals.breakpoints.len(), 3);
        assert_eq!(totals.media_queries, 6);
        assert_eq!(totals.flex_features, 8);
    }
}
