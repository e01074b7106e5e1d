use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

/// The user-visible command surface, one variant per session operation.
#[derive(
    Debug, Clone,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq
)]
#[serde(tag = "type", content = "params", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionCommand {
    /// Bind a video file as the frame source
    BindVideo { path: String },

    /// Bind a still image file as the frame source
    BindImage { path: String },

    /// Decode the next frame and redraw its contours
    Advance,

    /// Replace the Canny thresholds used from the next advance onward
    SetThresholds { low: f32, high: f32 },

    /// Remove every drawn polyline from the surface
    Clear,

    /// Close the session, releasing the source and drawn primitives
    Close,
}

impl SessionCommand {
    /// Get the JSON schema for all commands
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(SessionCommand)
    }

    /// Get a list of all available command names
    pub fn command_names() -> &'static [&'static str] {
        <Self as VariantNames>::VARIANTS
    }

    /// Get a description of the command
    pub fn description(&self) -> &'static str {
        match self {
            Self::BindVideo { .. } => "Bind a video file; frames are decoded sequentially, one per advance",
            Self::BindImage { .. } => "Bind a still image; it is drawn by the next advance",
            Self::Advance => "Decode the next frame, replace the drawn polylines with its contours",
            Self::SetThresholds { .. } => "Replace the Canny hysteresis thresholds for subsequent advances",
            Self::Clear => "Remove all polylines drawn by this session",
            Self::Close => "Release the source and drawn primitives; the session becomes terminal",
        }
    }
}
