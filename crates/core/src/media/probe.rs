//! FFprobe-based probe adapter.

use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

use super::config::MediaConfig;
use super::error::ProbeError;
use super::traits::MediaProber;
use super::types::ProbeResult;

/// Probe adapter backed by the ffprobe binary.
pub struct FfprobeProber {
    config: MediaConfig,
}

impl FfprobeProber {
    /// Creates a new prober with the given configuration.
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }

    /// Creates a prober with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(MediaConfig::default())
    }

    fn parse_probe_output(output: &[u8]) -> Result<ProbeResult, ProbeError> {
        serde_json::from_slice(output).map_err(|e| ProbeError::ParseError {
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl MediaProber for FfprobeProber {
    async fn probe(&self, path: &Path) -> Result<ProbeResult, ProbeError> {
        let output = Command::new(&self.config.ffprobe_path)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ProbeError::FfprobeNotFound {
                        path: self.config.ffprobe_path.clone(),
                    }
                } else {
                    ProbeError::Io(e)
                }
            })?;

        if !output.status.success() {
            return Err(ProbeError::ProbeFailed {
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Self::parse_probe_output(&output.stdout)
    }
}
