//! Error types for the media module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the probe adapter. All of them are terminal for the
/// owning task.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// FFprobe binary not found.
    #[error("ffprobe not found at path: {path}")]
    FfprobeNotFound { path: PathBuf },

    /// FFprobe exited non-zero.
    #[error("ffprobe failed: {stderr}")]
    ProbeFailed { stderr: String },

    /// FFprobe output was not valid JSON.
    #[error("failed to parse ffprobe output: {reason}")]
    ParseError { reason: String },

    /// I/O error while running ffprobe.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the transcode adapter. All of them are terminal for the
/// owning task.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// FFmpeg binary not found.
    #[error("ffmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// FFmpeg exited non-zero.
    #[error("ffmpeg exited with code {code:?}: {stderr}")]
    TranscodeFailed { code: Option<i32>, stderr: String },

    /// I/O error while running ffmpeg.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
