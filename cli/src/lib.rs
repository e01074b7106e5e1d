//! Script loading and error-to-exit-code mapping for the `edgeline`
//! binary.
//!
//! A [`SessionScript`] is an ordered list of [`SessionCommand`]s read from
//! a TOML or JSON file; the binary replays it against a fresh session.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use session::{SessionCommand, SessionError};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

impl CliError {
    /// Map each failure kind to its process exit code. Success is 0; the
    /// codes here are stable so scripts can branch on them.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Session(SessionError::SourceUnavailable(_)) => 2,
            Self::Session(SessionError::InvalidState { .. }) => 3,
            Self::IoError(_) => 4,
            Self::SerdeError(_)
            | Self::TomlDeError(_)
            | Self::TomlSerError(_)
            | Self::UnsupportedFileFormat => 5,
        }
    }
}

/// An ordered command list replayed against one session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SessionScript {
    pub description: Option<String>,
    pub commands: Vec<SessionCommand>,
}

impl SessionScript {
    /// Load a script from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load a script from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        let script: SessionScript = toml::from_str(content)?;
        Ok(script)
    }

    /// Load a script from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load a script from a JSON string
    pub fn from_json(content: &str) -> Result<Self, CliError> {
        let script: SessionScript = serde_json::from_str(content)?;
        Ok(script)
    }

    /// Auto-detect file format and load the script
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(CliError::UnsupportedFileFormat),
        }
    }

    /// Convert the script to a TOML string
    pub fn to_toml(&self) -> Result<String, CliError> {
        let toml = toml::to_string_pretty(&self)?;
        Ok(toml)
    }

    /// Convert the script to a JSON string
    pub fn to_json(&self) -> Result<String, CliError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_parses_from_toml() {
        let toml = r#"
            description = "trace one still"

            [[commands]]
            type = "bind_image"
            params = { path = "still.png" }

            [[commands]]
            type = "advance"

            [[commands]]
            type = "close"
        "#;
        let script = SessionScript::from_toml(toml).unwrap();
        assert_eq!(script.commands.len(), 3);
        assert_eq!(
            script.commands[0],
            SessionCommand::BindImage {
                path: "still.png".to_string()
            }
        );
    }

    #[test]
    fn script_parses_from_json() {
        let json = r#"{
            "description": null,
            "commands": [
                { "type": "set_thresholds", "params": { "low": 30.0, "high": 90.0 } },
                { "type": "bind_video", "params": { "path": "clip.mp4" } },
                { "type": "advance" }
            ]
        }"#;
        let script = SessionScript::from_json(json).unwrap();
        assert_eq!(script.commands.len(), 3);
        assert_eq!(
            script.commands[0],
            SessionCommand::SetThresholds {
                low: 30.0,
                high: 90.0
            }
        );
    }

    #[test]
    fn script_round_trips_through_both_formats() {
        let script = SessionScript {
            description: Some("round trip".to_string()),
            commands: vec![
                SessionCommand::BindVideo {
                    path: "clip.mp4".to_string(),
                },
                SessionCommand::Advance,
                SessionCommand::Clear,
                SessionCommand::Close,
            ],
        };
        let from_toml = SessionScript::from_toml(&script.to_toml().unwrap()).unwrap();
        let from_json = SessionScript::from_json(&script.to_json().unwrap()).unwrap();
        assert_eq!(from_toml, script);
        assert_eq!(from_json, script);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = SessionScript::from_file("commands.yaml").unwrap_err();
        assert!(matches!(err, CliError::UnsupportedFileFormat));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn exit_codes_are_distinct_per_failure_kind() {
        let unavailable = CliError::Session(SessionError::SourceUnavailable(
            frames_error_for_test(),
        ));
        let invalid = CliError::Session(SessionError::InvalidState {
            operation: "advance",
            phase: session::Phase::Idle,
        });
        let io = CliError::IoError(std::io::Error::other("boom"));
        let format = CliError::UnsupportedFileFormat;

        let codes = [
            unavailable.exit_code(),
            invalid.exit_code(),
            io.exit_code(),
            format.exit_code(),
        ];
        assert_eq!(codes, [2, 3, 4, 5]);
    }

    fn frames_error_for_test() -> frames::SourceError {
        frames::SourceError::Unavailable("no such file".to_string())
    }
}
