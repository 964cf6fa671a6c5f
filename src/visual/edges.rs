use image::{GrayImage, Luma, RgbImage};

/// Rec. 601 luma, rounded to the nearest integer.
pub fn to_gray(img: &RgbImage) -> GrayImage {
    let (w, h) = img.dimensions();
    let mut out = GrayImage::new(w, h);
    for (x, y, pixel) in img.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let v = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
        out.put_pixel(x, y, Luma([v.round().clamp(0.0, 255.0) as u8]));
    }
    out
}

const EDGE: u8 = 255;

// tan(22.5°) and tan(67.5°)
const TAN_22_5: f64 = 0.414_213_562_373_095;
const TAN_67_5: f64 = 2.414_213_562_373_095;

/// Canny edge map: 3x3 Sobel gradients with L1 magnitude, non-maximum suppression,
/// and hysteresis between `low` and `high`. Edge pixels are 255, everything else 0.
///
/// Borders are handled by replicating the outermost pixels.
pub fn canny(gray: &GrayImage, low: f32, high: f32) -> GrayImage {
    let (w, h) = gray.dimensions();
    let (wu, hu) = (w as usize, h as usize);
    let mut out = GrayImage::new(w, h);
    if wu == 0 || hu == 0 {
        return out;
    }
    let (low, high) = if low > high { (high, low) } else { (low, high) };
    let (low, high) = (low as i32, high as i32);

    let src = gray.as_raw();
    let at = |x: isize, y: isize| -> i32 {
        let x = x.clamp(0, wu as isize - 1) as usize;
        let y = y.clamp(0, hu as isize - 1) as usize;
        src[y * wu + x] as i32
    };

    let mut gx = vec![0i32; wu * hu];
    let mut gy = vec![0i32; wu * hu];
    let mut mag = vec![0i32; wu * hu];
    for y in 0..hu {
        for x in 0..wu {
            let (xi, yi) = (x as isize, y as isize);
            let dx = (at(xi + 1, yi - 1) + 2 * at(xi + 1, yi) + at(xi + 1, yi + 1))
                - (at(xi - 1, yi - 1) + 2 * at(xi - 1, yi) + at(xi - 1, yi + 1));
            let dy = (at(xi - 1, yi + 1) + 2 * at(xi, yi + 1) + at(xi + 1, yi + 1))
                - (at(xi - 1, yi - 1) + 2 * at(xi, yi - 1) + at(xi + 1, yi - 1));
            let idx = y * wu + x;
            gx[idx] = dx;
            gy[idx] = dy;
            mag[idx] = dx.abs() + dy.abs();
        }
    }

    // Magnitude outside the image counts as zero.
    let mag_at = |x: isize, y: isize| -> i32 {
        if x < 0 || y < 0 || x >= wu as isize || y >= hu as isize {
            0
        } else {
            mag[y as usize * wu + x as usize]
        }
    };

    // 0 = suppressed, 1 = weak candidate, 2 = strong
    let mut class = vec![0u8; wu * hu];
    let mut stack = Vec::new();
    for y in 0..hu {
        for x in 0..wu {
            let idx = y * wu + x;
            let m = mag[idx];
            if m <= low {
                continue;
            }
            let (xi, yi) = (x as isize, y as isize);
            let ax = gx[idx].abs() as f64;
            let ay = gy[idx].abs() as f64;
            let is_max = if ay < ax * TAN_22_5 {
                m > mag_at(xi - 1, yi) && m >= mag_at(xi + 1, yi)
            } else if ay > ax * TAN_67_5 {
                m > mag_at(xi, yi - 1) && m >= mag_at(xi, yi + 1)
            } else {
                let s: isize = if (gx[idx] ^ gy[idx]) < 0 { -1 } else { 1 };
                m > mag_at(xi - s, yi - 1) && m > mag_at(xi + s, yi + 1)
            };
            if !is_max {
                continue;
            }
            if m > high {
                class[idx] = 2;
                stack.push(idx);
            } else {
                class[idx] = 1;
            }
        }
    }

    while let Some(idx) = stack.pop() {
        let (x, y) = ((idx % wu) as isize, (idx / wu) as isize);
        for dy in -1..=1isize {
            for dx in -1..=1isize {
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || ny < 0 || nx >= wu as isize || ny >= hu as isize {
                    continue;
                }
                let n = ny as usize * wu + nx as usize;
                if class[n] == 1 {
                    class[n] = 2;
                    stack.push(n);
                }
            }
        }
    }

    for (pixel, c) in out.pixels_mut().zip(&class) {
        if *c == 2 {
            pixel.0[0] = EDGE;
        }
    }
    out
}

/// Edge mass per column (`horizontal`) and per row (`vertical`), each normalized to sum
/// to one when it is non-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Projections {
    pub horizontal: Vec<f64>,
    pub vertical: Vec<f64>,
}

pub fn projections(edges: &GrayImage) -> Projections {
    let (w, h) = edges.dimensions();
    let mut horizontal = vec![0.0f64; w as usize];
    let mut vertical = vec![0.0f64; h as usize];
    for (x, y, pixel) in edges.enumerate_pixels() {
        let v = pixel.0[0] as f64;
        horizontal[x as usize] += v;
        vertical[y as usize] += v;
    }
    normalize(&mut horizontal);
    normalize(&mut vertical);
    Projections {
        horizontal,
        vertical,
    }
}

fn normalize(values: &mut [f64]) {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        values.iter_mut().for_each(|v| *v /= total);
    }
}

/// Sum of absolute differences; the shorter slice is treated as zero-padded.
pub fn l1_distance(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().max(b.len());
    (0..n)
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0.0);
            let y = b.get(i).copied().unwrap_or(0.0);
            (x - y).abs()
        })
        .sum()
}
