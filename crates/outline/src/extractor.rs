//! The fixed frame-to-contour pipeline.
//!
//! Order never varies: grayscale conversion, separable 5x5 Gaussian blur,
//! Canny hysteresis edge detection, hierarchical contour trace with
//! colinear-run compression. All raster primitives are delegated to
//! `image`/`imageproc`.

use image::{GrayImage, RgbImage};
use imageproc::contours::BorderType;

use crate::types::{Contour, ContourKind, ContourSet, ThresholdPair};

/// Radius of the smoothing kernel: 2 on each side of center, a 5x5 window.
const BLUR_RADIUS: i32 = 2;
/// Smoothing scale of the Gaussian kernel.
const BLUR_SIGMA: f32 = 1.5;

/// Extracts the boundary contours of a raster frame.
#[derive(Debug, Clone, Default)]
pub struct EdgeExtractor;

impl EdgeExtractor {
    /// Run the pipeline on one frame.
    ///
    /// A degenerate (zero-dimension) frame yields an empty [`ContourSet`],
    /// not an error. Thresholds are repaired via
    /// [`ThresholdPair::clamped`] before reaching the detector.
    pub fn extract(&self, frame: &RgbImage, thresholds: ThresholdPair) -> ContourSet {
        if frame.width() == 0 || frame.height() == 0 {
            return ContourSet::empty(frame.width(), frame.height());
        }

        let gray = image::imageops::grayscale(frame);
        let blurred = smooth(&gray);
        let (low, high) = thresholds.clamped();
        let edges = imageproc::edges::canny(&blurred, low, high);

        ContourSet {
            contours: trace(&edges),
            frame_width: frame.width(),
            frame_height: frame.height(),
        }
    }
}

fn smooth(gray: &GrayImage) -> GrayImage {
    let kernel = gaussian_kernel(BLUR_SIGMA, BLUR_RADIUS);
    imageproc::filter::separable_filter_equal(gray, &kernel)
}

fn gaussian_kernel(sigma: f32, radius: i32) -> Vec<f32> {
    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|x| (-((x * x) as f32) / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for weight in &mut kernel {
        *weight /= sum;
    }
    kernel
}

/// Trace all boundary contours of a binary edge map, keeping the full
/// outer/hole hierarchy with parent links.
fn trace(edges: &GrayImage) -> Vec<Contour> {
    imageproc::contours::find_contours::<i32>(edges)
        .into_iter()
        .map(|contour| {
            let points: Vec<[i32; 2]> = contour.points.iter().map(|p| [p.x, p.y]).collect();
            Contour {
                points: compress_colinear(&points),
                kind: match contour.border_type {
                    BorderType::Outer => ContourKind::Outer,
                    BorderType::Hole => ContourKind::Hole,
                },
                parent: contour.parent,
            }
        })
        .collect()
}

/// Drop intermediate points along straight runs, keeping every corner.
///
/// Traced chains move in unit steps, so two consecutive equal deltas mean
/// the middle point is colinear with its neighbors. Endpoints always stay.
fn compress_colinear(points: &[[i32; 2]]) -> Vec<[i32; 2]> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let mut kept = Vec::with_capacity(points.len());
    kept.push(points[0]);
    for window in points.windows(3) {
        let [a, b, c] = [window[0], window[1], window[2]];
        let step_in = (b[0] - a[0], b[1] - a[1]);
        let step_out = (c[0] - b[0], c[1] - b[1]);
        if step_in != step_out {
            kept.push(b);
        }
    }
    kept.push(points[points.len() - 1]);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        let kernel = gaussian_kernel(BLUR_SIGMA, BLUR_RADIUS);
        assert_eq!(kernel.len(), 5);
        let sum: f32 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert_eq!(kernel[0], kernel[4]);
        assert_eq!(kernel[1], kernel[3]);
        assert!(kernel[2] > kernel[1]);
    }

    #[test]
    fn compress_drops_straight_runs_keeps_corners() {
        let chain = [[0, 0], [1, 0], [2, 0], [3, 0], [3, 1], [3, 2]];
        assert_eq!(compress_colinear(&chain), vec![[0, 0], [3, 0], [3, 2]]);
    }

    #[test]
    fn compress_keeps_short_chains_unchanged() {
        assert_eq!(compress_colinear(&[]), Vec::<[i32; 2]>::new());
        assert_eq!(compress_colinear(&[[5, 5]]), vec![[5, 5]]);
        assert_eq!(compress_colinear(&[[0, 0], [1, 1]]), vec![[0, 0], [1, 1]]);
    }

    #[test]
    fn compress_keeps_zigzags_intact() {
        let chain = [[0, 0], [1, 1], [2, 0], [3, 1]];
        assert_eq!(compress_colinear(&chain), chain.to_vec());
    }
}
