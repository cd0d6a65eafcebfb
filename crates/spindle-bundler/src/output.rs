//! What a build or transform call hands back.

use serde::Serialize;
use spindle_common::Message;
use std::borrow::Cow;
use std::path::PathBuf;

/// Path reported for output that has no file of its own.
pub const STDOUT_PATH: &str = "<stdout>";

/// A compiled file, kept in memory. Spindle never writes outputs to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputFile {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

impl OutputFile {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    /// Contents as text, replacing invalid UTF-8
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.contents)
    }

    /// Whether this file went to stdout rather than a path
    pub fn is_stdout(&self) -> bool {
        self.path.as_os_str() == STDOUT_PATH
    }
}

/// Result of [`crate::build`].
///
/// `output_files` is empty whenever any stage reported an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildResult {
    pub errors: Vec<Message>,
    pub warnings: Vec<Message>,
    pub output_files: Vec<OutputFile>,
}

impl BuildResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Result of [`crate::transform`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResult {
    pub errors: Vec<Message>,
    pub warnings: Vec<Message>,
    /// Compiled code; empty when the call failed
    pub code: String,
    /// Present only for external or linked source maps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_map: Option<String>,
}

impl TransformResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stdout_sentinel_is_recognized() {
        assert!(OutputFile::new(STDOUT_PATH, "x").is_stdout());
        assert!(!OutputFile::new("/out/a.js", "x").is_stdout());
    }

    #[test]
    fn results_serialize_in_camel_case() {
        let result = BuildResult {
            output_files: vec![OutputFile::new("/out/a.js", "a")],
            ..Default::default()
        };
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("outputFiles").is_some());

        let transform = TransformResult {
            code: "x".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&transform).unwrap();
        assert!(value.get("sourceMap").is_none());
    }
}
