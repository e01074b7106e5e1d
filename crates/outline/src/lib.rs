//! # Outline Extraction
//!
//! Turns a raster frame into drawable polylines: grayscale conversion,
//! separable Gaussian smoothing, Canny hysteresis edge detection and
//! hierarchical contour tracing, followed by contour-to-polyline
//! conversion. The raster primitives are delegated to `image`/`imageproc`;
//! this crate owns the fixed pipeline order, the threshold semantics and
//! the vertex-chain representation.
//!
//! ```rust,no_run
//! use outline::{EdgeExtractor, Polyline, ThresholdPair};
//!
//! let frame = image::open("frame.png")?.to_rgb8();
//! let contours = EdgeExtractor.extract(&frame, ThresholdPair::default());
//! let polylines: Vec<Polyline> = contours.contours.iter().map(Polyline::from).collect();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod extractor;
pub mod polyline;
pub mod types;

pub use extractor::EdgeExtractor;
pub use polyline::Polyline;
pub use types::{Contour, ContourKind, ContourSet, MIN_THRESHOLD, ThresholdPair};
