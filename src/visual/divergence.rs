use image::{DynamicImage, GrayImage, Luma, RgbImage};
use serde::{Deserialize, Serialize};

use crate::image_loader::{crop_to_height, resize_to_width};
use crate::types::ImageSize;

use super::edges::{canny, l1_distance, projections, to_gray};
use super::histogram::color_similarity;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct VisualOptions {
    /// Histogram buckets per color channel.
    pub histogram_bins: u32,
    pub canny_low: f32,
    pub canny_high: f32,
    /// Visuals are skipped when the rescaled mobile height differs from the desktop
    /// height by more than this multiple of the desktop height.
    pub max_height_divergence: f64,
}

impl Default for VisualOptions {
    fn default() -> Self {
        Self {
            histogram_bins: 8,
            canny_low: 100.0,
            canny_high: 200.0,
            max_height_divergence: 2.0,
        }
    }
}

/// Raw signals the layout score is derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DivergenceSignals {
    pub width_ratio: f64,
    /// Mean intensity of the grayscale difference map, in [0, 255].
    pub mean_difference: f64,
    pub horizontal_edge_distance: f64,
    pub vertical_edge_distance: f64,
}

/// Turn divergence signals into a 0-10 layout adaptation score.
///
/// Starts from 5. Near-identical captures (mean difference below 10) lose 3 and heavily
/// garbled ones (above 80) lose 2, while a difference in [30, 60] gains 3. A desktop
/// more than twice as wide as mobile gains 1 (more than 1.5x gains 0.5). Edge mass that
/// moved between columns (> 0.5) while staying put across rows (< 0.3) gains 1.
pub fn layout_score(signals: &DivergenceSignals) -> f64 {
    let mut score = 5.0;

    let mean = signals.mean_difference;
    if mean < 10.0 {
        score -= 3.0;
    } else if mean > 80.0 {
        score -= 2.0;
    } else if (30.0..=60.0).contains(&mean) {
        score += 3.0;
    }

    if signals.width_ratio > 2.0 {
        score += 1.0;
    } else if signals.width_ratio > 1.5 {
        score += 0.5;
    }

    if signals.horizontal_edge_distance > 0.5 && signals.vertical_edge_distance < 0.3 {
        score += 1.0;
    }

    f64::clamp(score, 0.0, 10.0)
}

/// Decoded captures ready for comparison.
#[derive(Debug, Clone)]
pub struct PreparedPair {
    pub desktop: RgbImage,
    pub mobile: RgbImage,
    /// Mobile rescaled to the desktop width, aspect ratio preserved.
    pub mobile_rescaled: RgbImage,
}

impl PreparedPair {
    pub fn new(desktop: &DynamicImage, mobile: &DynamicImage) -> Self {
        let desktop = desktop.to_rgb8();
        let mobile = mobile.to_rgb8();
        let mobile_rescaled = resize_to_width(&mobile, desktop.width());
        Self {
            desktop,
            mobile,
            mobile_rescaled,
        }
    }

    /// Both captures cropped to their shared height.
    pub fn cropped(&self) -> (RgbImage, RgbImage) {
        let height = self.desktop.height().min(self.mobile_rescaled.height());
        (
            crop_to_height(&self.desktop, height),
            crop_to_height(&self.mobile_rescaled, height),
        )
    }

    pub fn visualization_feasible(&self, max_height_divergence: f64) -> bool {
        let desktop_h = self.desktop.height() as f64;
        let diff = (self.mobile_rescaled.height() as f64 - desktop_h).abs();
        diff <= desktop_h * max_height_divergence
    }
}

/// The numeric outcome of comparing a pair. Computing it touches no files.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub desktop_size: ImageSize,
    pub mobile_size: ImageSize,
    pub color_similarity: f64,
    pub signals: DivergenceSignals,
    pub layout_score: f64,
    pub visualization_feasible: bool,
}

/// Grayscale absolute difference of two equally sized images.
pub fn difference_map(a: &RgbImage, b: &RgbImage) -> GrayImage {
    let w = a.width().min(b.width());
    let h = a.height().min(b.height());
    GrayImage::from_fn(w, h, |x, y| {
        let pa = a.get_pixel(x, y).0;
        let pb = b.get_pixel(x, y).0;
        let r = pa[0].abs_diff(pb[0]) as f64;
        let g = pa[1].abs_diff(pb[1]) as f64;
        let bl = pa[2].abs_diff(pb[2]) as f64;
        let v = 0.299 * r + 0.587 * g + 0.114 * bl;
        Luma([v.round().clamp(0.0, 255.0) as u8])
    })
}

fn mean_intensity(img: &GrayImage) -> f64 {
    let raw = img.as_raw();
    if raw.is_empty() {
        return 0.0;
    }
    raw.iter().map(|&v| v as f64).sum::<f64>() / raw.len() as f64
}

/// Compare a desktop capture with its mobile counterpart.
pub fn measure(pair: &PreparedPair, options: &VisualOptions) -> Measurement {
    let desktop_size = ImageSize {
        width: pair.desktop.width(),
        height: pair.desktop.height(),
    };
    let mobile_size = ImageSize {
        width: pair.mobile.width(),
        height: pair.mobile.height(),
    };

    let color_similarity = color_similarity(&pair.desktop, &pair.mobile, options.histogram_bins);
    let width_ratio = if mobile_size.width == 0 {
        0.0
    } else {
        desktop_size.width as f64 / mobile_size.width as f64
    };

    let (desktop_crop, mobile_crop) = pair.cropped();
    let mean_difference = mean_intensity(&difference_map(&desktop_crop, &mobile_crop));

    let desktop_edges = projections(&canny(
        &to_gray(&desktop_crop),
        options.canny_low,
        options.canny_high,
    ));
    let mobile_edges = projections(&canny(
        &to_gray(&mobile_crop),
        options.canny_low,
        options.canny_high,
    ));

    let signals = DivergenceSignals {
        width_ratio,
        mean_difference,
        horizontal_edge_distance: l1_distance(&desktop_edges.horizontal, &mobile_edges.horizontal),
        vertical_edge_distance: l1_distance(&desktop_edges.vertical, &mobile_edges.vertical),
    };

    Measurement {
        desktop_size,
        mobile_size,
        color_similarity,
        layout_score: layout_score(&signals),
        signals,
        visualization_feasible: pair.visualization_feasible(options.max_height_divergence),
    }
}
