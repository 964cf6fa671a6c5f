use image::RgbImage;

/// Joint RGB histogram with `bins` buckets per channel, flattened as `r * bins² + g * bins + b`.
pub fn color_histogram(img: &RgbImage, bins: u32) -> Vec<f64> {
    let bins = bins.clamp(1, 256) as usize;
    let mut hist = vec![0.0f64; bins * bins * bins];
    for pixel in img.pixels() {
        let [r, g, b] = pixel.0;
        let r = r as usize * bins / 256;
        let g = g as usize * bins / 256;
        let b = b as usize * bins / 256;
        hist[(r * bins + g) * bins + b] += 1.0;
    }
    hist
}

/// Pearson correlation of two histograms, in [-1, 1].
///
/// Correlation is scale-invariant, so the histograms need no normalization. When either
/// histogram is flat the denominator vanishes and the result is 1.
pub fn correlation(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 1.0;
    }
    let mean_a = a[..n].iter().sum::<f64>() / n as f64;
    let mean_b = b[..n].iter().sum::<f64>() / n as f64;

    let mut num = 0.0f64;
    let mut var_a = 0.0f64;
    let mut var_b = 0.0f64;
    for (x, y) in a[..n].iter().zip(&b[..n]) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        num += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let denom = var_a * var_b;
    if denom.abs() <= f64::EPSILON {
        return 1.0;
    }
    (num / denom.sqrt()).clamp(-1.0, 1.0)
}

/// Color-distribution similarity of two images.
pub fn color_similarity(a: &RgbImage, b: &RgbImage, bins: u32) -> f64 {
    correlation(&color_histogram(a, bins), &color_histogram(b, bins))
}
