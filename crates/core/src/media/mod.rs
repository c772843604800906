//! Media inspection and transcoding via external FFmpeg processes.
//!
//! `MediaProber` wraps `ffprobe` and returns container/stream metadata for a
//! single file. `Transcoder` wraps `ffmpeg` with a fixed H.264/AAC argument
//! profile and translates its `key=value` status stream into progress
//! updates on the owning task.

mod config;
mod error;
mod probe;
mod traits;
mod transcode;
mod types;

pub use config::MediaConfig;
pub use error::{ProbeError, TranscodeError};
pub use probe::FfprobeProber;
pub use traits::{MediaProber, Transcoder, UpdateCallback};
pub use transcode::FfmpegTranscoder;
pub use types::{ProbeFormat, ProbeResult, ProbeStream, TranscodeProgress};
