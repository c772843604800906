//! Testing utilities and mock implementations of the adapter traits.
//!
//! The mocks let pipeline and server tests run without ffmpeg, ffprobe or
//! a reachable Discord webhook.

mod mock_media;
mod mock_notifier;

pub use mock_media::{MockProber, MockTranscoder};
pub use mock_notifier::MockNotifier;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::media::{ProbeFormat, ProbeResult, ProbeStream};

    /// Create a probe result with one video and one audio stream and the
    /// given duration string.
    pub fn probe_result(duration: &str) -> ProbeResult {
        ProbeResult {
            format: ProbeFormat {
                format_name: "matroska,webm".to_string(),
                format_long_name: "Matroska / WebM".to_string(),
                duration: duration.to_string(),
            },
            streams: vec![
                ProbeStream {
                    index: 0,
                    codec_name: "h264".to_string(),
                    codec_type: "video".to_string(),
                    channels: None,
                },
                ProbeStream {
                    index: 1,
                    codec_name: "ac3".to_string(),
                    codec_type: "audio".to_string(),
                    channels: Some(6),
                },
            ],
        }
    }
}
