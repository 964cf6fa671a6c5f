use std::path::{Path, PathBuf};

use image::{GrayImage, Rgb, RgbImage};

use crate::image_loader::{save_image, ImageLoadError};

use super::divergence::{difference_map, PreparedPair};

const GUTTER: u32 = 20;
const LABEL_BAR_HEIGHT: u32 = 6;
const DESKTOP_LABEL: Rgb<u8> = Rgb([0, 90, 255]);
const MOBILE_LABEL: Rgb<u8> = Rgb([0, 200, 80]);

/// Files written for one screenshot pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualArtifacts {
    pub comparison_path: PathBuf,
    pub heatmap_path: PathBuf,
}

pub fn comparison_path(output_dir: &Path, base_name: &str) -> PathBuf {
    output_dir.join(format!("compare_{base_name}.png"))
}

pub fn heatmap_path(output_dir: &Path, base_name: &str) -> PathBuf {
    output_dir.join(format!("heatmap_{base_name}.png"))
}

/// Desktop and rescaled mobile side by side on black, separated by a gutter, each with a
/// colored bar across the top of its panel.
pub fn comparison_image(desktop: &RgbImage, mobile: &RgbImage) -> RgbImage {
    let height = desktop.height().max(mobile.height());
    let width = desktop.width() + GUTTER + mobile.width();
    let mut canvas = RgbImage::new(width, height);

    image::imageops::replace(&mut canvas, desktop, 0, 0);
    let mobile_x = desktop.width() + GUTTER;
    image::imageops::replace(&mut canvas, mobile, mobile_x as i64, 0);

    label_bar(&mut canvas, 0, desktop.width(), DESKTOP_LABEL);
    label_bar(&mut canvas, mobile_x, mobile.width(), MOBILE_LABEL);
    canvas
}

fn label_bar(canvas: &mut RgbImage, x0: u32, width: u32, color: Rgb<u8>) {
    let bar_h = LABEL_BAR_HEIGHT.min(canvas.height());
    for y in 0..bar_h {
        for x in x0..(x0 + width).min(canvas.width()) {
            canvas.put_pixel(x, y, color);
        }
    }
}

/// Map a value in [0, 1] through a black-red-yellow-white ramp.
pub fn hot(t: f64) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0);
    let channel = |lo: f64, hi: f64| (((t - lo) / (hi - lo)).clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgb([
        channel(0.0, 0.365),
        channel(0.365, 0.746),
        channel(0.746, 1.0),
    ])
}

/// Color a grayscale difference map, stretching its own range over the full ramp.
pub fn heatmap_image(diff: &GrayImage) -> RgbImage {
    let (lo, hi) = diff
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p.0[0]), hi.max(p.0[0])));
    let span = hi.saturating_sub(lo) as f64;
    RgbImage::from_fn(diff.width(), diff.height(), |x, y| {
        let v = diff.get_pixel(x, y).0[0].saturating_sub(lo) as f64;
        hot(if span > 0.0 { v / span } else { 0.0 })
    })
}

/// Write the comparison and heatmap PNGs for a pair into `output_dir`.
pub fn render_visuals(
    pair: &PreparedPair,
    base_name: &str,
    output_dir: &Path,
) -> Result<VisualArtifacts, ImageLoadError> {
    let artifacts = VisualArtifacts {
        comparison_path: comparison_path(output_dir, base_name),
        heatmap_path: heatmap_path(output_dir, base_name),
    };

    save_image(
        &comparison_image(&pair.desktop, &pair.mobile_rescaled),
        &artifacts.comparison_path,
    )?;

    let (desktop_crop, mobile_crop) = pair.cropped();
    save_image(
        &heatmap_image(&difference_map(&desktop_crop, &mobile_crop)),
        &artifacts.heatmap_path,
    )?;

    ::log::debug!(
        "Wrote {} and {}",
        artifacts.comparison_path.display(),
        artifacts.heatmap_path.display()
    );
    Ok(artifacts)
}
