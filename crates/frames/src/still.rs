//! Still-image frame source.

use std::path::{Path, PathBuf};

use crate::{Frame, FrameSource, Result};

/// Yields a single frame loaded from an image file, then end of sequence.
///
/// The raster is flipped vertically on load: image row 0 is "bottom" in the
/// target drawing surface's Y axis. Video frames are deliberately not
/// flipped, matching the legacy coordinate convention.
#[derive(Debug)]
pub struct StillSource {
    path: PathBuf,
    frame: Option<Frame>,
}

impl StillSource {
    /// Load an image file eagerly.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let image = image::open(&path)?;
        let frame = image::imageops::flip_vertical(&image.to_rgb8());
        Ok(Self {
            path,
            frame: Some(frame),
        })
    }
}

impl FrameSource for StillSource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        Ok(self.frame.take())
    }

    fn close(&mut self) {
        self.frame = None;
    }

    fn description(&self) -> String {
        format!("image file: {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourceError;
    use image::{Rgb, RgbImage};
    use std::path::PathBuf;

    fn temp_png(name: &str, image: &RgbImage) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "frames-still-{}-{}.png",
            std::process::id(),
            name
        ));
        image.save(&path).expect("failed to write test image");
        path
    }

    #[test]
    fn yields_exactly_once_then_end_of_sequence() {
        let image = RgbImage::from_pixel(4, 4, Rgb([10, 20, 30]));
        let path = temp_png("once", &image);

        let mut source = StillSource::open(&path).expect("open should succeed");
        assert!(source.next_frame().unwrap().is_some());
        assert!(source.next_frame().unwrap().is_none());
        assert!(source.next_frame().unwrap().is_none());

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn frame_is_flipped_vertically() {
        let mut image = RgbImage::new(2, 2);
        for x in 0..2 {
            image.put_pixel(x, 0, Rgb([255, 0, 0]));
            image.put_pixel(x, 1, Rgb([0, 0, 255]));
        }
        let path = temp_png("flip", &image);

        let mut source = StillSource::open(&path).expect("open should succeed");
        let frame = source.next_frame().unwrap().expect("one frame expected");
        // Row 0 of the loaded image was red; after the flip it is blue.
        assert_eq!(frame.get_pixel(0, 0), &Rgb([0, 0, 255]));
        assert_eq!(frame.get_pixel(0, 1), &Rgb([255, 0, 0]));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn close_drops_the_pending_frame() {
        let image = RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]));
        let path = temp_png("close", &image);

        let mut source = StillSource::open(&path).expect("open should succeed");
        source.close();
        assert!(source.next_frame().unwrap().is_none());

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn open_missing_file_fails() {
        let err = StillSource::open("/definitely/not/here.png").unwrap_err();
        assert!(matches!(
            err,
            SourceError::Decode(_) | SourceError::Unavailable(_)
        ));
    }
}
