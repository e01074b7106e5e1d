//! Video-backed frame source.
//!
//! Container demuxing and codec work are delegated to an external `ffmpeg`
//! process: frames are streamed over its stdout as raw RGB24 and sliced into
//! [`Frame`] buffers here. Dimensions are probed up front with `ffprobe`.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use image::RgbImage;
use serde::Deserialize;
use tracing::debug;

use crate::{Frame, FrameSource, Result, SourceError};

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: u32,
    height: u32,
}

/// Decodes the frames of a video file in strict sequential order.
#[derive(Debug)]
pub struct VideoSource {
    path: PathBuf,
    width: u32,
    height: u32,
    decoder: Option<Decoder>,
    frames_read: u64,
}

#[derive(Debug)]
struct Decoder {
    child: Child,
    stdout: ChildStdout,
}

impl VideoSource {
    /// Open a video file using `ffmpeg` and `ffprobe` from `PATH`.
    ///
    /// Fails with [`SourceError::Unavailable`] if the file is missing, the
    /// container has no video stream, or the tools cannot be launched.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_tools(path, "ffmpeg", "ffprobe")
    }

    /// Open a video file with explicit tool paths.
    pub fn open_with_tools(path: impl AsRef<Path>, ffmpeg: &str, ffprobe: &str) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(SourceError::Unavailable(format!(
                "input file not found: {}",
                path.display()
            )));
        }

        let (width, height) = probe_dimensions(&path, ffprobe)?;
        debug!(width, height, path = %path.display(), "video stream probed");

        let mut child = Command::new(ffmpeg)
            .arg("-v")
            .arg("error")
            .arg("-i")
            .arg(&path)
            .arg("-f")
            .arg("rawvideo")
            .arg("-pix_fmt")
            .arg("rgb24")
            .arg("-")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SourceError::Unavailable(format!("failed to launch {ffmpeg}: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SourceError::Unavailable("ffmpeg stdout unavailable".to_string()))?;

        Ok(Self {
            path,
            width,
            height,
            decoder: Some(Decoder { child, stdout }),
            frames_read: 0,
        })
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of frames decoded so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    fn release(&mut self) {
        if let Some(mut decoder) = self.decoder.take() {
            let _ = decoder.child.kill();
            let _ = decoder.child.wait();
        }
    }

    /// Reap the decoder after its stdout closed. A non-zero exit means the
    /// stream was cut short by a decode failure, not exhausted.
    fn finish(&mut self) -> Result<()> {
        let Some(mut decoder) = self.decoder.take() else {
            return Ok(());
        };
        let status = decoder.child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(SourceError::Unavailable(format!(
                "decoder exited with {status} after {} frames",
                self.frames_read
            )))
        }
    }
}

impl FrameSource for VideoSource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let Some(decoder) = self.decoder.as_mut() else {
            return Ok(None);
        };

        let mut buf = vec![0u8; self.width as usize * self.height as usize * 3];
        match decoder.stdout.read_exact(&mut buf) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                self.finish()?;
                return Ok(None);
            }
            Err(e) => {
                self.release();
                return Err(SourceError::Io(e));
            }
        }

        self.frames_read += 1;
        let frame = RgbImage::from_raw(self.width, self.height, buf).ok_or_else(|| {
            SourceError::Unavailable("decoded frame buffer has unexpected size".to_string())
        })?;
        Ok(Some(frame))
    }

    fn close(&mut self) {
        self.release();
    }

    fn description(&self) -> String {
        format!(
            "video file: {} ({}x{})",
            self.path.display(),
            self.width,
            self.height
        )
    }
}

impl Drop for VideoSource {
    fn drop(&mut self) {
        self.release();
    }
}

fn probe_dimensions(path: &Path, ffprobe: &str) -> Result<(u32, u32)> {
    let output = Command::new(ffprobe)
        .arg("-v")
        .arg("error")
        .arg("-select_streams")
        .arg("v:0")
        .arg("-show_entries")
        .arg("stream=width,height")
        .arg("-of")
        .arg("json")
        .arg(path)
        .output()
        .map_err(|e| SourceError::Unavailable(format!("failed to launch {ffprobe}: {e}")))?;

    if !output.status.success() {
        return Err(SourceError::Unavailable(format!(
            "{ffprobe} rejected {}",
            path.display()
        )));
    }

    let probe: ProbeOutput = serde_json::from_slice(&output.stdout)
        .map_err(|e| SourceError::Unavailable(format!("unreadable probe output: {e}")))?;

    let stream = probe.streams.first().ok_or_else(|| {
        SourceError::Unavailable(format!("no video stream in {}", path.display()))
    })?;
    if stream.width == 0 || stream.height == 0 {
        return Err(SourceError::Unavailable(format!(
            "degenerate video dimensions in {}",
            path.display()
        )));
    }
    Ok((stream.width, stream.height))
}
