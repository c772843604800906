pub mod config;
pub mod media;
pub mod notifier;
pub mod pipeline;
pub mod task;
pub mod testing;
pub mod watch;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DiscordConfig,
    LibraryConfig, ServerConfig,
};
pub use media::{
    FfmpegTranscoder, FfprobeProber, MediaConfig, MediaProber, ProbeError, ProbeFormat,
    ProbeResult, ProbeStream, TranscodeError, TranscodeProgress, Transcoder, UpdateCallback,
};
pub use notifier::{DiscordNotifier, Notifier, NotifyError};
pub use pipeline::TaskPipeline;
pub use task::{Task, TaskHandle, TaskStatus};
pub use watch::{FileWatcher, WatchError};
