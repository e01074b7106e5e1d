//! # Drawing Session
//!
//! The stateful controller between a frame source and a drawing surface.
//! Each advance pulls one frame, extracts its contours and replaces the
//! previously drawn polylines with the new generation — at most one
//! generation is ever resident on the surface.
//!
//! The session moves through four phases:
//!
//! ```text
//! Idle --bind--> Active --end of sequence--> Exhausted
//!   \________________________close_______________________> Closed
//! ```
//!
//! Every operation is synchronous and runs to completion; the model is
//! single-threaded by design, and sessions share nothing with each other.
//!
//! ```rust,no_run
//! use session::{DrawingSession, InMemorySurface};
//!
//! let mut session = DrawingSession::new(InMemorySurface::new());
//! session.bind_video("clip.mp4")?;
//! session.advance()?;
//! session.close();
//! # Ok::<(), session::SessionError>(())
//! ```

pub mod command;
pub mod surface;

use frames::{FrameSource, SourceError, StillSource, VideoSource};
use outline::{EdgeExtractor, Polyline, ThresholdPair};
use std::path::Path;
use strum::Display;
use thiserror::Error;
use tracing::{debug, info};

pub use command::SessionCommand;
pub use surface::{DrawingSurface, Handle, InMemorySurface};

/// The lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    /// No source bound.
    Idle,
    /// Source bound, frames can be advanced.
    Active,
    /// The source reported end of sequence.
    Exhausted,
    /// Terminal; every further operation is rejected.
    Closed,
}

#[derive(Error, Debug)]
pub enum SessionError {
    /// The source could not be opened, or failed mid-stream. Previously
    /// drawn primitives are never undone by a later failure.
    #[error("source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),

    /// An operation was invoked in a phase that forbids it. No state was
    /// mutated.
    #[error("invalid session state: {operation} is not allowed while {phase}")]
    InvalidState {
        operation: &'static str,
        phase: Phase,
    },
}

/// What a single `advance` did.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    /// A frame was decoded and its contours drawn.
    Drawn { frame_index: u64, polylines: usize },
    /// The source ran out; the session is now [`Phase::Exhausted`] and the
    /// surface was not touched.
    Exhausted,
}

/// The result of executing one [`SessionCommand`].
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Bound { description: String },
    Advanced(AdvanceOutcome),
    ThresholdsSet(ThresholdPair),
    Cleared { removed: usize },
    Closed,
}

/// A stateful controller owning one frame source, one threshold pair and
/// the handles of the currently drawn polyline generation.
pub struct DrawingSession<S: DrawingSurface> {
    surface: S,
    source: Option<Box<dyn FrameSource>>,
    phase: Phase,
    frame_index: u64,
    thresholds: ThresholdPair,
    handles: Vec<Handle>,
    extractor: EdgeExtractor,
}

impl<S: DrawingSurface> DrawingSession<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            source: None,
            phase: Phase::Idle,
            frame_index: 0,
            thresholds: ThresholdPair::default(),
            handles: Vec::new(),
            extractor: EdgeExtractor,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the next frame to be drawn; equals the number of frames
    /// drawn since binding.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn thresholds(&self) -> ThresholdPair {
        self.thresholds
    }

    /// Handles of the currently resident polyline generation, in draw
    /// order.
    pub fn handles(&self) -> &[Handle] {
        &self.handles
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Consume the session, keeping the surface and whatever is drawn on
    /// it.
    pub fn into_surface(mut self) -> S {
        self.release_source();
        self.surface
    }

    /// Bind a video file as the frame source. Idle -> Active.
    pub fn bind_video(&mut self, path: impl AsRef<Path>) -> Result<CommandOutcome, SessionError> {
        self.ensure_idle("bind_video")?;
        let source = VideoSource::open(path)?;
        Ok(self.attach(Box::new(source)))
    }

    /// Bind a still image file as the frame source. Idle -> Active.
    pub fn bind_image(&mut self, path: impl AsRef<Path>) -> Result<CommandOutcome, SessionError> {
        self.ensure_idle("bind_image")?;
        let source = StillSource::open(path)?;
        Ok(self.attach(Box::new(source)))
    }

    /// Bind an already-open source. Idle -> Active.
    pub fn bind_source(
        &mut self,
        source: Box<dyn FrameSource>,
    ) -> Result<CommandOutcome, SessionError> {
        self.ensure_idle("bind_source")?;
        Ok(self.attach(source))
    }

    /// Pull the next frame, extract its contours and replace the drawn
    /// polylines with the new generation.
    ///
    /// Valid only while [`Phase::Active`]. The surface is cleared only
    /// after a frame actually arrived and only when a previous generation
    /// exists, so the advance that discovers end of sequence never touches
    /// the surface.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, SessionError> {
        if self.phase != Phase::Active {
            return Err(SessionError::InvalidState {
                operation: "advance",
                phase: self.phase,
            });
        }
        let Some(source) = self.source.as_mut() else {
            return Err(SessionError::InvalidState {
                operation: "advance",
                phase: self.phase,
            });
        };

        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                self.release_source();
                self.phase = Phase::Exhausted;
                info!(
                    frames_drawn = self.frame_index,
                    "frame source exhausted"
                );
                return Ok(AdvanceOutcome::Exhausted);
            }
            Err(err) => return Err(err.into()),
        };

        if self.frame_index > 0 {
            self.surface.clear_all();
            self.handles.clear();
        }

        let contours = self.extractor.extract(&frame, self.thresholds);
        for contour in &contours.contours {
            let handle = self.surface.append_polyline(Polyline::from_contour(contour));
            self.handles.push(handle);
        }

        let frame_index = self.frame_index;
        self.frame_index += 1;
        debug!(frame_index, polylines = contours.len(), "frame drawn");
        Ok(AdvanceOutcome::Drawn {
            frame_index,
            polylines: contours.len(),
        })
    }

    /// Replace the threshold pair; takes effect on the next advance and
    /// never redraws the current frame retroactively. Valid in any
    /// non-terminal phase.
    pub fn set_thresholds(&mut self, low: f32, high: f32) -> Result<CommandOutcome, SessionError> {
        if self.phase == Phase::Closed {
            return Err(SessionError::InvalidState {
                operation: "set_thresholds",
                phase: self.phase,
            });
        }
        self.thresholds = ThresholdPair::new(low, high);
        Ok(CommandOutcome::ThresholdsSet(self.thresholds))
    }

    /// Explicitly remove every drawn polyline, independent of advancing.
    pub fn clear_drawn(&mut self) -> Result<CommandOutcome, SessionError> {
        match self.phase {
            Phase::Active | Phase::Exhausted => {
                let removed = self.handles.len();
                self.surface.clear_all();
                self.handles.clear();
                Ok(CommandOutcome::Cleared { removed })
            }
            phase => Err(SessionError::InvalidState {
                operation: "clear",
                phase,
            }),
        }
    }

    /// Release the source and drawn primitives and enter the terminal
    /// phase. Valid from any phase; idempotent.
    pub fn close(&mut self) -> CommandOutcome {
        self.release_source();
        self.surface.clear_all();
        self.handles.clear();
        self.phase = Phase::Closed;
        CommandOutcome::Closed
    }

    /// Dispatch one command to the matching operation.
    pub fn execute(&mut self, command: SessionCommand) -> Result<CommandOutcome, SessionError> {
        match command {
            SessionCommand::BindVideo { path } => self.bind_video(path),
            SessionCommand::BindImage { path } => self.bind_image(path),
            SessionCommand::Advance => self.advance().map(CommandOutcome::Advanced),
            SessionCommand::SetThresholds { low, high } => self.set_thresholds(low, high),
            SessionCommand::Clear => self.clear_drawn(),
            SessionCommand::Close => Ok(self.close()),
        }
    }

    fn ensure_idle(&self, operation: &'static str) -> Result<(), SessionError> {
        if self.phase == Phase::Idle {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                operation,
                phase: self.phase,
            })
        }
    }

    fn attach(&mut self, source: Box<dyn FrameSource>) -> CommandOutcome {
        let description = source.description();
        info!(%description, "source bound");
        self.source = Some(source);
        self.phase = Phase::Active;
        self.frame_index = 0;
        CommandOutcome::Bound { description }
    }

    fn release_source(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.close();
        }
    }
}
