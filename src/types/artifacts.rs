use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Viewport a screenshot was captured at, taken from the `<base>.<device>.<ext>` file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Desktop,
    Mobile,
}

impl Device {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Device::Desktop => "desktop",
            Device::Mobile => "mobile",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Device {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "desktop" => Ok(Device::Desktop),
            "mobile" => Ok(Device::Mobile),
            other => Err(format!("Unknown device suffix: {}", other)),
        }
    }
}

/// One stylesheet attributable to a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StylesheetSource {
    /// A `.css` file on disk.
    File { path: PathBuf },
    /// The body of a `<style>` block, held in memory.
    ///
    /// `id` is `<page path>#style<n>` (1-based), unique across a run.
    Inline { id: String, css: String },
}

impl StylesheetSource {
    pub fn inline(page: &Path, ordinal: usize, css: impl Into<String>) -> Self {
        StylesheetSource::Inline {
            id: format!("{}#style{}", page.display(), ordinal),
            css: css.into(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            StylesheetSource::File { path } => path.display().to_string(),
            StylesheetSource::Inline { id, .. } => id.clone(),
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, StylesheetSource::Inline { .. })
    }
}

/// How a page's stylesheet list was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StylesheetOrigin {
    /// Linked files and/or inline blocks found in the page itself.
    Page,
    /// The page referenced nothing; every stylesheet in the project is used instead.
    /// This is a known approximation, not an exact attribution.
    ProjectFallback,
}

/// Desktop/mobile captures sharing one base name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotPair {
    pub base_name: String,
    pub desktop: PathBuf,
    pub mobile: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MatchKind {
    Exact,
    Fuzzy { similarity: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMatch {
    pub pair: ScreenshotPair,
    #[serde(rename = "match")]
    pub kind: MatchKind,
}

/// One analyzed page. Built once by discovery and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageArtifact {
    pub path: PathBuf,
    /// File name without extension, used for screenshot matching.
    pub stem: String,
    pub stylesheets: Vec<StylesheetSource>,
    pub stylesheet_origin: StylesheetOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshots: Option<PageMatch>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_parses_case_insensitively() {
        assert_eq!("Desktop".parse::<Device>(), Ok(Device::Desktop));
        assert_eq!("MOBILE".parse::<Device>(), Ok(Device::Mobile));
        assert!("tablet".parse::<Device>().is_err());
    }

    #[test]
    fn inline_ids_include_page_and_ordinal() {
        let a = StylesheetSource::inline(Path::new("site/index.html"), 1, "a{}");
        let b = StylesheetSource::inline(Path::new("site/about/index.html"), 1, "a{}");
        assert_eq!(a.label(), "site/index.html#style1");
        assert_ne!(a.label(), b.label());
        assert!(a.is_inline());
    }

    #[test]
    fn match_kind_serializes_with_tag() {
        let json = serde_json::to_string(&MatchKind::Fuzzy { similarity: 0.7 }).expect("json");
        assert!(json.contains("\"kind\":\"fuzzy\""));
        assert!(json.contains("\"similarity\":0.7"));
    }
}
