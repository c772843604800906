//! FFmpeg-based transcode adapter.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

use super::config::MediaConfig;
use super::error::TranscodeError;
use super::traits::{Transcoder, UpdateCallback};
use super::types::TranscodeProgress;
use crate::task::TaskHandle;

/// Fixed encoding profile: widely compatible H.264 baseline video, stereo
/// AAC audio, mov_text subtitles, with the status stream on stdout.
const FFMPEG_ARGS: &[&str] = &[
    "-movflags",
    "faststart",
    "-hide_banner",
    "-loglevel",
    "error",
    "-progress",
    "pipe:1",
    "-nostats",
    "-stats_period",
    "5",
    "-c:v",
    "libx264",
    "-crf",
    "23",
    "-profile:v",
    "baseline",
    "-level",
    "3.0",
    "-pix_fmt",
    "yuv420p",
    "-c:a",
    "aac",
    "-ac",
    "2",
    "-b:a",
    "128k",
    "-c:s",
    "mov_text",
];

/// One recognized line of the encoder's `key=value` status stream.
#[derive(Debug, PartialEq)]
enum StatusLine {
    /// New speed multiplier, kept verbatim.
    Speed(String),
    /// New encoded timestamp in seconds.
    OutTime(f64),
    /// End of one status block; callers should fire their update callback.
    Tick,
}

/// Parses one status line. Unknown keys, lines without a `=` and
/// non-numeric `out_time_ms` values yield `None`; the stream is
/// forward-compatible with whatever else ffmpeg decides to print.
fn parse_status_line(line: &str) -> Option<StatusLine> {
    let (key, value) = line.split_once('=')?;
    let value = value.trim();
    match key.trim() {
        "speed" => Some(StatusLine::Speed(value.to_string())),
        "out_time_ms" => value
            .parse::<i64>()
            .ok()
            .map(|us| StatusLine::OutTime(us as f64 / 1_000_000.0)),
        "progress" if value == "continue" => Some(StatusLine::Tick),
        _ => None,
    }
}

/// Transcode adapter backed by the ffmpeg binary.
pub struct FfmpegTranscoder {
    config: MediaConfig,
}

impl FfmpegTranscoder {
    /// Creates a new transcoder with the given configuration.
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    /// Creates a transcoder with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(MediaConfig::default())
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(
        &self,
        task: &TaskHandle,
        on_tick: UpdateCallback,
    ) -> Result<(), TranscodeError> {
        let (source, output) = {
            let snapshot = task.snapshot().await;
            (snapshot.source_path, snapshot.output_path)
        };

        debug!(
            input = %source.display(),
            output = %output.display(),
            "starting ffmpeg"
        );

        let mut child = Command::new(&self.config.ffmpeg_path)
            .arg("-i")
            .arg(&source)
            .args(FFMPEG_ARGS)
            .arg(&output)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TranscodeError::FfmpegNotFound {
                        path: self.config.ffmpeg_path.clone(),
                    }
                } else {
                    TranscodeError::Io(e)
                }
            })?;

        let stdout = child.stdout.take().expect("stdout should be captured");
        let stderr = child.stderr.take().expect("stderr should be captured");

        // Drain stderr on its own task so a chatty encoder can't fill the
        // pipe buffer and stall.
        let stderr_task = tokio::spawn(async move {
            let mut buf = String::new();
            let _ = BufReader::new(stderr).read_to_string(&mut buf).await;
            buf
        });

        let mut lines = BufReader::new(stdout).lines();
        let mut progress = TranscodeProgress::default();

        while let Ok(Some(line)) = lines.next_line().await {
            match parse_status_line(&line) {
                Some(StatusLine::Speed(speed)) => {
                    progress.speed = speed;
                    task.set_progress(progress.clone()).await;
                }
                Some(StatusLine::OutTime(secs)) => {
                    progress.timestamp_secs = secs;
                    task.set_progress(progress.clone()).await;
                }
                Some(StatusLine::Tick) => on_tick(),
                None => {}
            }
        }

        let status = child.wait().await?;
        let stderr_output = stderr_task.await.unwrap_or_default();

        if !status.success() {
            return Err(TranscodeError::TranscodeFailed {
                code: status.code(),
                stderr: stderr_output,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_speed_kept_verbatim() {
        assert_eq!(
            parse_status_line("speed=2.5x"),
            Some(StatusLine::Speed("2.5x".to_string()))
        );
        // No numeric coercion, whatever ffmpeg prints is kept
        assert_eq!(
            parse_status_line("speed=N/A"),
            Some(StatusLine::Speed("N/A".to_string()))
        );
    }

    #[test]
    fn test_parse_out_time_ms_microseconds_to_seconds() {
        assert_eq!(
            parse_status_line("out_time_ms=60000000"),
            Some(StatusLine::OutTime(60.0))
        );
        assert_eq!(
            parse_status_line("out_time_ms=1500000"),
            Some(StatusLine::OutTime(1.5))
        );
    }

    #[test]
    fn test_parse_out_time_ms_non_numeric_ignored() {
        assert_eq!(parse_status_line("out_time_ms=N/A"), None);
    }

    #[test]
    fn test_parse_progress_continue_is_tick() {
        assert_eq!(parse_status_line("progress=continue"), Some(StatusLine::Tick));
        assert_eq!(parse_status_line("progress=end"), None);
    }

    #[test]
    fn test_parse_unknown_keys_ignored() {
        assert_eq!(parse_status_line("frame=123"), None);
        assert_eq!(parse_status_line("total_size=456789"), None);
        assert_eq!(parse_status_line("not a key value pair"), None);
    }

    #[tokio::test]
    async fn test_transcode_missing_binary_reports_not_found() {
        let transcoder = FfmpegTranscoder::new(MediaConfig {
            ffmpeg_path: "/nonexistent/ffmpeg".into(),
            ffprobe_path: "/nonexistent/ffprobe".into(),
        });
        let task = crate::task::TaskHandle::new(crate::task::Task::new(
            "/tmp/in.mkv".into(),
            "/tmp/out.mp4".into(),
        ));
        let result = transcoder
            .transcode(&task, std::sync::Arc::new(|| {}))
            .await;
        assert!(matches!(
            result,
            Err(TranscodeError::FfmpegNotFound { .. })
        ));
    }
}
