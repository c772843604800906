//! Types for the media module.

use serde::{Deserialize, Serialize};

/// Result of probing a media file, mirroring ffprobe's JSON output.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbeResult {
    pub format: ProbeFormat,
    pub streams: Vec<ProbeStream>,
}

impl ProbeResult {
    /// Duration of the probed media in seconds, 0.0 when unparsable.
    pub fn duration_secs(&self) -> f64 {
        self.format.duration.parse().unwrap_or(0.0)
    }
}

/// Container metadata.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbeFormat {
    pub format_name: String,
    pub format_long_name: String,
    /// Duration in seconds. Kept as the decimal string ffprobe reports to
    /// preserve precision.
    pub duration: String,
}

/// One stream descriptor from the probed container.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbeStream {
    pub index: u32,
    pub codec_name: String,
    pub codec_type: String,
    pub channels: Option<u32>,
}

/// Snapshot of the encoder's reported progress. Each update fully replaces
/// the previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeProgress {
    /// Encoder speed multiplier as reported, e.g. "1.02x". Stored verbatim.
    pub speed: String,
    /// Seconds of source media already encoded.
    pub timestamp_secs: f64,
}

impl Default for TranscodeProgress {
    fn default() -> Self {
        Self {
            speed: "1x".to_string(),
            timestamp_secs: 0.0,
        }
    }
}
