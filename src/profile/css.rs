use std::collections::BTreeSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::{
    CssFeatureProfile, ElementCounts, LayoutCounts, MediaQueryCounts, RelativeUnitCounts,
    StylesheetSource,
};
use crate::Result;

/// Breakpoints most sites target (mobile, tablet, desktop, large desktop).
pub const COMMON_BREAKPOINTS: [u32; 4] = [480, 768, 992, 1200];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CssOptions {
    /// A breakpoint within this many pixels of a common one counts as common.
    pub breakpoint_tolerance: u32,
    pub common_breakpoints: Vec<u32>,
}

impl Default for CssOptions {
    fn default() -> Self {
        Self {
            breakpoint_tolerance: 20,
            common_breakpoints: COMMON_BREAKPOINTS.to_vec(),
        }
    }
}

// An optional `only screen and` media type may precede the first condition.
const MEDIA_PREFIX: &str = r"(?i)@media\s+(?:only\s+)?(?:screen\s+and\s+)?\(\s*";

struct CssPatterns {
    comment: Regex,
    media_prelude: Regex,
    max_width: Regex,
    min_width: Regex,
    orientation: Regex,
    device_width: Regex,
    percentage: Regex,
    em: Regex,
    rem: Regex,
    vh: Regex,
    vw: Regex,
    flexbox: Regex,
    grid: Regex,
    grid_template: Regex,
    flex_wrap: Regex,
    flex_direction: Regex,
    max_width_prop: Regex,
    min_width_prop: Regex,
    calc: Regex,
    object_fit: Regex,
}

impl CssPatterns {
    fn compile() -> Result<Self> {
        let media = |condition: &str| Regex::new(&format!("{MEDIA_PREFIX}{condition}"));
        Ok(Self {
            comment: Regex::new(r"(?s)/\*.*?\*/")?,
            media_prelude: Regex::new(r"(?i)@media[^{]*")?,
            max_width: media(r"max-width\s*:\s*(\d+)px\s*\)")?,
            min_width: media(r"min-width\s*:\s*(\d+)px\s*\)")?,
            orientation: media(r"orientation\s*:\s*(portrait|landscape)\s*\)")?,
            device_width: media(r"(?:max|min)-device-width\s*:\s*(\d+)px\s*\)")?,
            percentage: Regex::new(r":\s*(-?\d+\.?\d*)%")?,
            em: Regex::new(r":\s*(-?\d+\.?\d*)em")?,
            rem: Regex::new(r":\s*(-?\d+\.?\d*)rem")?,
            vh: Regex::new(r":\s*(-?\d+\.?\d*)vh")?,
            vw: Regex::new(r":\s*(-?\d+\.?\d*)vw")?,
            flexbox: Regex::new(r"display\s*:\s*flex")?,
            grid: Regex::new(r"display\s*:\s*grid")?,
            grid_template: Regex::new(r"grid-template-(columns|rows|areas)")?,
            flex_wrap: Regex::new(r"flex-wrap\s*:\s*wrap")?,
            flex_direction: Regex::new(r"flex-direction\s*:")?,
            max_width_prop: Regex::new(r"max-width\s*:\s*\d+")?,
            min_width_prop: Regex::new(r"min-width\s*:\s*\d+")?,
            calc: Regex::new(r"calc\s*\(")?,
            object_fit: Regex::new(r"object-fit\s*:")?,
        })
    }
}

/// Extracts adaptive-layout signals from stylesheet text.
pub struct CssProfiler {
    options: CssOptions,
    patterns: CssPatterns,
}

impl CssProfiler {
    pub fn new(options: CssOptions) -> Result<Self> {
        Ok(Self {
            options,
            patterns: CssPatterns::compile()?,
        })
    }

    pub fn options(&self) -> &CssOptions {
        &self.options
    }

    /// Profile a stylesheet source, reading it from disk when it is a file.
    ///
    /// A file that cannot be read yields a zero-score profile carrying the error.
    pub fn profile_source(&self, source: &StylesheetSource) -> CssFeatureProfile {
        match source {
            StylesheetSource::Inline { id, css } => self.profile(id, css),
            StylesheetSource::File { path } => match std::fs::read_to_string(path) {
                Ok(css) => self.profile(&path.display().to_string(), &css),
                Err(err) => {
                    ::log::warn!("Error analyzing CSS file {}: {}", path.display(), err);
                    CssFeatureProfile::unreadable(path.display().to_string(), err.to_string())
                }
            },
        }
    }

    pub fn profile(&self, source: &str, css: &str) -> CssFeatureProfile {
        let p = &self.patterns;
        let css = p.comment.replace_all(css, "");

        let media_queries = MediaQueryCounts {
            max_width: p.max_width.find_iter(&css).count(),
            min_width: p.min_width.find_iter(&css).count(),
            orientation: p.orientation.find_iter(&css).count(),
            device_width: p.device_width.find_iter(&css).count(),
        };

        let breakpoints: BTreeSet<u32> = [&p.max_width, &p.min_width]
            .into_iter()
            .flat_map(|re| re.captures_iter(&css))
            .filter_map(|caps| caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()))
            .collect();
        let common_breakpoints = self.count_common(&breakpoints);

        let relative_units = RelativeUnitCounts {
            percentage: p.percentage.find_iter(&css).count(),
            em: p.em.find_iter(&css).count(),
            rem: p.rem.find_iter(&css).count(),
            vh: p.vh.find_iter(&css).count(),
            vw: p.vw.find_iter(&css).count(),
        };

        let layouts = LayoutCounts {
            flexbox: p.flexbox.find_iter(&css).count(),
            grid: p.grid.find_iter(&css).count(),
            grid_template: p.grid_template.find_iter(&css).count(),
            flex_wrap: p.flex_wrap.find_iter(&css).count(),
            flex_direction: p.flex_direction.find_iter(&css).count(),
        };

        // Width constraints inside media conditions are breakpoints, not declarations.
        let declarations = p.media_prelude.replace_all(&css, "");
        let elements = ElementCounts {
            max_width: p.max_width_prop.find_iter(&declarations).count(),
            min_width: p.min_width_prop.find_iter(&declarations).count(),
            calc: p.calc.find_iter(&declarations).count(),
            object_fit: p.object_fit.find_iter(&declarations).count(),
        };

        let mut profile = CssFeatureProfile {
            source: source.to_string(),
            breakpoints: breakpoints.into_iter().collect(),
            common_breakpoints,
            media_queries,
            relative_units,
            layouts,
            elements,
            score: 0.0,
            error: None,
        };
        profile.score = css_score(&profile);
        ::log::debug!(
            "CSS {}: {} media queries, {} breakpoints ({} common), score {:.2}",
            profile.source,
            profile.media_queries.total(),
            profile.breakpoints.len(),
            profile.common_breakpoints,
            profile.score
        );
        profile
    }

    fn count_common(&self, breakpoints: &BTreeSet<u32>) -> usize {
        let tolerance = self.options.breakpoint_tolerance;
        breakpoints
            .iter()
            .filter(|bp| {
                self.options
                    .common_breakpoints
                    .iter()
                    .any(|common| bp.abs_diff(*common) <= tolerance)
            })
            .count()
    }
}

/// Step-function score in [0, 10] from a profile's counts.
pub fn css_score(profile: &CssFeatureProfile) -> f64 {
    let mut score = 0.0;

    score += match profile.media_queries.total() {
        n if n >= 10 => 4.0,
        n if n >= 6 => 3.0,
        n if n >= 3 => 2.0,
        n if n >= 1 => 1.0,
        _ => 0.0,
    };

    score += match profile.breakpoints.len() {
        n if n >= 4 => 2.0,
        n if n >= 2 => 1.0,
        _ => 0.0,
    };

    if profile.common_breakpoints >= 2 {
        score += 1.0;
    }

    score += match profile.relative_units.total() {
        n if n >= 15 => 1.0,
        n if n >= 8 => 0.5,
        _ => 0.0,
    };

    score += match profile.layouts.total() {
        n if n >= 8 => 1.5,
        n if n >= 4 => 1.0,
        n if n >= 1 => 0.5,
        _ => 0.0,
    };

    score += match profile.elements.total() {
        n if n >= 5 => 0.5,
        n if n >= 2 => 0.25,
        _ => 0.0,
    };

    f64::clamp(score, 0.0, 10.0)
}

/// Unweighted mean of per-source scores; unreadable sources count as 0. No sources gives 0.
pub fn average_css_score(profiles: &[CssFeatureProfile]) -> f64 {
    if profiles.is_empty() {
        return 0.0;
    }
    profiles.iter().map(|p| p.score).sum::<f64>() / profiles.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profiler() -> CssProfiler {
        CssProfiler::new(CssOptions::default()).expect("patterns compile")
    }

    fn twelve_max_width_rules() -> String {
        let widths = [320, 480, 768, 992, 1200, 1440];
        widths
            .iter()
            .chain(widths.iter())
            .map(|w| format!("@media (max-width: {w}px) {{ .c {{ color: red; }} }}\n"))
            .collect()
    }

    #[test]
    fn max_width_rules_at_common_breakpoints_score_seven() {
        let profile = profiler().profile("a.css", &twelve_max_width_rules());
        assert_eq!(profile.media_queries.max_width, 12);
        assert_eq!(profile.breakpoints, vec![320, 480, 768, 992, 1200, 1440]);
        assert_eq!(profile.common_breakpoints, 4);
        assert_eq!(profile.relative_units.total(), 0);
        assert_eq!(profile.layouts.total(), 0);
        assert_eq!(profile.elements.total(), 0);
        assert_eq!(profile.score, 7.0);
    }

    #[test]
    fn empty_stylesheet_scores_zero() {
        let profile = profiler().profile("empty.css", "");
        assert_eq!(profile.score, 0.0);
        assert!(profile.breakpoints.is_empty());
        assert!(profile.error.is_none());
    }

    #[test]
    fn screen_prefixed_queries_and_orientation_are_counted() {
        let css = "@media only screen and (min-width: 600px) {}\n\
                   @media screen and (max-width: 1000px) {}\n\
                   @media (orientation: landscape) {}\n\
                   @media only screen and (max-device-width: 480px) {}";
        let profile = profiler().profile("a.css", css);
        assert_eq!(profile.media_queries.min_width, 1);
        assert_eq!(profile.media_queries.max_width, 1);
        assert_eq!(profile.media_queries.orientation, 1);
        assert_eq!(profile.media_queries.device_width, 1);
        assert_eq!(profile.breakpoints, vec![600, 1000]);
        // 4 rules -> 2, 2 breakpoints -> 1, one common (992 +-20 covers 1000) -> 0
        assert_eq!(profile.common_breakpoints, 1);
        assert_eq!(profile.score, 3.0);
    }

    #[test]
    fn breakpoints_near_common_values_use_tolerance() {
        let css = "@media (max-width: 500px) {} @media (max-width: 789px) {} @media (max-width: 600px) {}";
        let profile = profiler().profile("a.css", css);
        // 500 is within 20 of 480, 789 is outside 768 +- 20
        assert_eq!(profile.common_breakpoints, 1);
    }

    #[test]
    fn relative_units_layouts_and_elements() {
        let css = ".a { width: 50%; font-size: 1.2em; margin: 2rem; height: 100vh; width: 10vw; }\n\
                   .b { display: flex; flex-wrap: wrap; flex-direction: column; }\n\
                   .c { display: grid; grid-template-columns: 1fr 1fr; }\n\
                   .d { max-width: 100px; min-width: 20px; width: calc(100% - 2px); object-fit: cover; }";
        let profile = profiler().profile("a.css", css);
        assert_eq!(profile.relative_units.percentage, 1);
        assert_eq!(profile.relative_units.em, 1);
        assert_eq!(profile.relative_units.rem, 1);
        assert_eq!(profile.relative_units.vh, 1);
        assert_eq!(profile.relative_units.vw, 1);
        assert_eq!(profile.layouts.flex_features(), 3);
        assert_eq!(profile.layouts.grid_features(), 2);
        assert_eq!(profile.elements.total(), 4);
        // layouts 5 -> 1.0, elements 4 -> 0.25
        assert_eq!(profile.score, 1.25);
    }

    #[test]
    fn commented_out_rules_are_ignored() {
        let css = "/* .a { display: flex; } @media (max-width: 768px) {} */ .b { color: red; }";
        let profile = profiler().profile("a.css", css);
        assert_eq!(profile.layouts.total(), 0);
        assert_eq!(profile.media_queries.total(), 0);
    }

    #[test]
    fn adding_common_breakpoints_never_lowers_the_score() {
        let base = ".a { display: flex; }\n@media (max-width: 300px) {}\n@media (max-width: 1500px) {}";
        let with_common = format!(
            "{base}\n@media (max-width: 768px) {{}}\n@media (max-width: 1200px) {{}}"
        );
        let p = profiler();
        let before = p.profile("a.css", base);
        let after = p.profile("a.css", &with_common);
        assert_eq!(before.common_breakpoints, 0);
        assert_eq!(after.common_breakpoints, 2);
        assert!(after.score >= before.score);
    }

    #[test]
    fn huge_stylesheet_stays_within_bounds() {
        let mut css = String::new();
        for w in 0..10_000u32 {
            css.push_str(&format!(
                "@media (max-width: {w}px) {{ .a {{ width: 1%; display: flex; max-width: 1px; }} }}\n"
            ));
        }
        let profile = profiler().profile("big.css", &css);
        assert_eq!(profile.breakpoints.len(), 10_000);
        assert!(profile.score <= 10.0);
        assert_eq!(profile.score, 10.0);
    }

    #[test]
    fn oversized_breakpoint_values_are_ignored() {
        let profile = profiler().profile("a.css", "@media (max-width: 99999999999px) {}");
        assert_eq!(profile.media_queries.max_width, 1);
        assert!(profile.breakpoints.is_empty());
    }

    #[test]
    fn unreadable_file_yields_zero_profile_with_error() {
        let source = StylesheetSource::File {
            path: "/nonexistent/style.css".into(),
        };
        let profile = profiler().profile_source(&source);
        assert_eq!(profile.score, 0.0);
        assert!(profile.error.is_some());
    }

    #[test]
    fn average_counts_unreadable_sources() {
        let good = CssFeatureProfile {
            score: 6.0,
            ..Default::default()
        };
        let bad = CssFeatureProfile::unreadable("b.css", "missing");
        assert_eq!(average_css_score(&[good.clone(), bad]), 3.0);
        assert_eq!(average_css_score(&[good]), 6.0);
        assert_eq!(average_css_score(&[]), 0.0);
    }
}
