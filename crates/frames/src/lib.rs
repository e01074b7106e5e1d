//! Frame sources for the edgeline pipeline.
//!
//! A [`FrameSource`] supplies an ordered sequence of raster frames, either
//! decoded from a video container ([`VideoSource`]) or loaded from a single
//! still image ([`StillSource`]). Sources are strictly sequential: there is
//! no seeking, and a frame is consumed exactly once.
//!
//! End of sequence is a normal signal, not an error — [`FrameSource::next_frame`]
//! returns `Ok(None)` once the source is exhausted or closed, and keeps
//! returning it on every later call.

pub mod still;
pub mod video;

use thiserror::Error;

pub use still::StillSource;
pub use video::VideoSource;

/// A single decoded raster frame, owned by the caller once produced.
pub type Frame = image::RgbImage;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("frame stream error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SourceError>;

/// A sequential supplier of raster frames.
pub trait FrameSource {
    /// Produce the next frame, or `Ok(None)` at end of sequence.
    ///
    /// After exhaustion or [`close`](Self::close) this always returns
    /// `Ok(None)` — it never fails.
    fn next_frame(&mut self) -> Result<Option<Frame>>;

    /// Release any resources held by the source. Idempotent.
    fn close(&mut self);

    /// Get a human-readable description of this source
    fn description(&self) -> String;
}
