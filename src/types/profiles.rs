use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Conditional-rule occurrences by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaQueryCounts {
    pub max_width: usize,
    pub min_width: usize,
    pub orientation: usize,
    pub device_width: usize,
}

impl MediaQueryCounts {
    pub fn total(&self) -> usize {
        self.max_width + self.min_width + self.orientation + self.device_width
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativeUnitCounts {
    pub percentage: usize,
    pub em: usize,
    pub rem: usize,
    pub vh: usize,
    pub vw: usize,
}

impl RelativeUnitCounts {
    pub fn total(&self) -> usize {
        self.percentage + self.em + self.rem + self.vh + self.vw
    }
}

/// Flexible-layout declarations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutCounts {
    pub flexbox: usize,
    pub grid: usize,
    pub grid_template: usize,
    pub flex_wrap: usize,
    pub flex_direction: usize,
}

impl LayoutCounts {
    pub fn total(&self) -> usize {
        self.flexbox + self.grid + self.grid_template + self.flex_wrap + self.flex_direction
    }

    pub fn flex_features(&self) -> usize {
        self.flexbox + self.flex_wrap + self.flex_direction
    }

    pub fn grid_features(&self) -> usize {
        self.grid + self.grid_template
    }
}

/// Other adaptive element properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementCounts {
    pub max_width: usize,
    pub min_width: usize,
    pub calc: usize,
    pub object_fit: usize,
}

impl ElementCounts {
    pub fn total(&self) -> usize {
        self.max_width + self.min_width + self.calc + self.object_fit
    }
}

/// Adaptive-layout signals of one stylesheet source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CssFeatureProfile {
    /// File path or inline block id.
    pub source: String,
    /// Unique width breakpoints, ascending.
    pub breakpoints: Vec<u32>,
    pub common_breakpoints: usize,
    pub media_queries: MediaQueryCounts,
    pub relative_units: RelativeUnitCounts,
    pub layouts: LayoutCounts,
    pub elements: ElementCounts,
    /// In [0, 10]; 0 when the source could not be read.
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CssFeatureProfile {
    /// Profile for a source that failed to load. It still counts toward the page average.
    pub fn unreadable(source: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

/// Adaptive-markup signals of one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlFeatureProfile {
    pub source: String,
    pub has_viewport_meta: bool,
    pub srcset_attributes: usize,
    pub sizes_attributes: usize,
    pub picture_elements: usize,
    pub source_media: usize,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HtmlFeatureProfile {
    pub fn responsive_images(&self) -> usize {
        self.srcset_attributes + self.sizes_attributes + self.picture_elements + self.source_media
    }

    pub fn unreadable(source: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Outcome of comparing one desktop/mobile pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualComparisonResult {
    pub desktop_path: PathBuf,
    pub mobile_path: PathBuf,
    pub desktop_size: ImageSize,
    pub mobile_size: ImageSize,
    /// desktop width / mobile width
    pub width_ratio: f64,
    /// Histogram correlation in [-1, 1].
    pub color_similarity: f64,
    pub mean_difference: f64,
    pub horizontal_edge_distance: f64,
    pub vertical_edge_distance: f64,
    pub layout_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heatmap_path: Option<PathBuf>,
}
