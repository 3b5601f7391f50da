//! Transcript Provider
//!
//! Seam for the external speech/caption capability. The engine only consumes
//! its output: a plain transcript string or timed segments.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::{content::TranscriptTimestamp, CoreError, CoreResult};

/// Media the transcript is requested for
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
}

impl MediaRef {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            video_id: None,
        }
    }

    pub fn with_video_id(mut self, video_id: &str) -> Self {
        self.video_id = Some(video_id.to_string());
        self
    }
}

/// Timed transcript segment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSegment {
    /// Start time in seconds
    pub start_time: f64,
    /// End time in seconds
    pub end_time: f64,
    pub text: String,
}

/// Provider output
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranscriptResult {
    Plain(String),
    Segments(Vec<TranscriptSegment>),
}

impl TranscriptResult {
    /// Full transcript text; segments are joined with single spaces
    pub fn text(&self) -> String {
        match self {
            TranscriptResult::Plain(text) => text.trim().to_string(),
            TranscriptResult::Segments(segments) => segments
                .iter()
                .map(|s| s.text.trim())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Segment start times as transcript timestamps, sorted by time
    pub fn timestamps(&self) -> Vec<TranscriptTimestamp> {
        let TranscriptResult::Segments(segments) = self else {
            return Vec::new();
        };
        let mut stamps: Vec<_> = segments
            .iter()
            .filter(|s| s.start_time.is_finite())
            .map(|s| TranscriptTimestamp {
                time: s.start_time.max(0.0),
                text: s.text.trim().to_string(),
            })
            .collect();
        stamps.sort_by(|a, b| a.time.total_cmp(&b.time));
        stamps
    }

    pub fn is_empty(&self) -> bool {
        self.text().is_empty()
    }
}

/// Speech/caption collaborator
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// Produces a transcript for `media`
    async fn transcribe(&self, media: &MediaRef) -> CoreResult<TranscriptResult>;
}

/// Provider returning a fixed transcript, for offline use
#[derive(Clone, Debug)]
pub struct StaticTranscriptProvider {
    result: TranscriptResult,
}

impl StaticTranscriptProvider {
    pub fn new(result: TranscriptResult) -> Self {
        Self { result }
    }
}

#[async_trait]
impl TranscriptProvider for StaticTranscriptProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn transcribe(&self, _media: &MediaRef) -> CoreResult<TranscriptResult> {
        if self.result.is_empty() {
            return Err(CoreError::TranscriptUnavailable(
                "no transcript configured".to_string(),
            ));
        }
        Ok(self.result.clone())
    }
}

/// User-facing message for a recoverable editor failure
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorNotice {
    pub message: String,
    /// Underlying cause, for logs
    pub detail: String,
}

impl EditorNotice {
    pub fn transcript_failed(error: &CoreError) -> Self {
        Self {
            message: "We couldn't generate a transcript for this video. Please try a different video."
                .to_string(),
            detail: error.to_string(),
        }
    }

    pub fn no_editor() -> Self {
        Self {
            message: "Open a video or transcript in the editor first.".to_string(),
            detail: "no editor dialog is open".to_string(),
        }
    }

    pub fn transcript_not_supported(content_type: &str) -> Self {
        Self {
            message: "Transcripts can only be added to video or transcript content.".to_string(),
            detail: format!("content type is {}", content_type),
        }
    }
}

impl std::fmt::Display for EditorNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}
