use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Detector floor applied by [`ThresholdPair::clamped`].
pub const MIN_THRESHOLD: f32 = 1.0;

/// Canny hysteresis thresholds.
///
/// The pair is process-wide configuration: it is replaced wholesale via a
/// "set thresholds" operation and read by every extraction until changed.
/// Values are accepted as given — ordering and range are only repaired at
/// the detector boundary (see [`clamped`](Self::clamped)).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ThresholdPair {
    /// Low hysteresis threshold: gradients below it are rejected outright.
    pub low: f32,
    /// High hysteresis threshold: gradients above it are definite edges.
    pub high: f32,
}

impl ThresholdPair {
    pub fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    /// Order and floor the pair for the detector.
    ///
    /// The legacy behavior passed thresholds through unchecked; here they
    /// are repaired instead so out-of-order or negative values degrade
    /// deterministically: `high` is floored at [`MIN_THRESHOLD`] and `low`
    /// is pulled into `[MIN_THRESHOLD, high]`. Identical inputs always map
    /// to identical detector parameters.
    pub fn clamped(self) -> (f32, f32) {
        let high = self.high.max(MIN_THRESHOLD);
        let low = self.low.max(MIN_THRESHOLD).min(high);
        (low, high)
    }
}

impl Default for ThresholdPair {
    /// The thresholds the legacy plugin invoked extraction with.
    fn default() -> Self {
        Self {
            low: 70.0,
            high: 150.0,
        }
    }
}

/// Whether a traced border encloses foreground or a hole within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContourKind {
    Outer,
    Hole,
}

/// One traced boundary: an ordered sequence of integer points in trace
/// order, never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<[i32; 2]>,
    pub kind: ContourKind,
    /// Index of the enclosing contour within the owning set, if any.
    pub parent: Option<usize>,
}

/// All contours traced from a single frame. Each advance fully replaces the
/// previous set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourSet {
    pub contours: Vec<Contour>,
    /// Original frame dimensions
    pub frame_width: u32,
    pub frame_height: u32,
}

impl ContourSet {
    pub fn empty(frame_width: u32, frame_height: u32) -> Self {
        Self {
            contours: Vec::new(),
            frame_width,
            frame_height,
        }
    }

    pub fn len(&self) -> usize {
        self.contours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Iterate over the outer (non-hole) contours only.
    pub fn outer(&self) -> impl Iterator<Item = &Contour> {
        self.contours
            .iter()
            .filter(|c| c.kind == ContourKind::Outer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_repairs_swapped_thresholds() {
        let (low, high) = ThresholdPair::new(200.0, 50.0).clamped();
        assert!(low <= high);
        assert!(low >= MIN_THRESHOLD);
    }

    #[test]
    fn clamped_floors_negative_thresholds() {
        let (low, high) = ThresholdPair::new(-10.0, -5.0).clamped();
        assert_eq!(low, MIN_THRESHOLD);
        assert_eq!(high, MIN_THRESHOLD);
    }

    #[test]
    fn clamped_preserves_well_formed_pairs() {
        let (low, high) = ThresholdPair::default().clamped();
        assert_eq!((low, high), (70.0, 150.0));
    }
}
