use std::path::Path;

use regex::Regex;

use crate::types::HtmlFeatureProfile;
use crate::Result;

/// Detects a device-width viewport declaration and responsive-image techniques in markup.
pub struct HtmlProfiler {
    viewport_meta: Regex,
    srcset: Regex,
    sizes: Regex,
    picture: Regex,
    source_media: Regex,
}

impl HtmlProfiler {
    pub fn new() -> Result<Self> {
        Ok(Self {
            viewport_meta: Regex::new(
                r#"(?i)<meta\s+name=["']viewport["'][^>]*content=["'][^"']*width=device-width[^"']*["']"#,
            )?,
            srcset: Regex::new(r#"srcset=["'][^"']+["']"#)?,
            sizes: Regex::new(r#"sizes=["'][^"']+["']"#)?,
            picture: Regex::new(r"<picture\b")?,
            source_media: Regex::new(r#"<source[^>]*media=["'][^"']+["']"#)?,
        })
    }

    pub fn profile_file(&self, path: &Path) -> HtmlFeatureProfile {
        match std::fs::read_to_string(path) {
            Ok(markup) => self.profile(&path.display().to_string(), &markup),
            Err(err) => {
                ::log::warn!("Error analyzing HTML file {}: {}", path.display(), err);
                HtmlFeatureProfile::unreadable(path.display().to_string(), err.to_string())
            }
        }
    }

    pub fn profile(&self, source: &str, markup: &str) -> HtmlFeatureProfile {
        let mut profile = HtmlFeatureProfile {
            source: source.to_string(),
            has_viewport_meta: self.viewport_meta.is_match(markup),
            srcset_attributes: self.srcset.find_iter(markup).count(),
            sizes_attributes: self.sizes.find_iter(markup).count(),
            picture_elements: self.picture.find_iter(markup).count(),
            source_media: self.source_media.find_iter(markup).count(),
            score: 0.0,
            error: None,
        };
        profile.score = html_score(profile.has_viewport_meta, profile.responsive_images());
        profile
    }
}

/// Viewport declaration is worth 5 (all or nothing); responsive images up to 5.
pub fn html_score(has_viewport_meta: bool, responsive_images: usize) -> f64 {
    let mut score = 0.0;
    if has_viewport_meta {
        score += 5.0;
    }
    score += match responsive_images {
        n if n >= 10 => 5.0,
        n if n >= 5 => 3.0,
        n if n >= 1 => 1.0,
        _ => 0.0,
    };
    f64::clamp(score, 0.0, 10.0)
}
