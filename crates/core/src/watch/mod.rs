//! Filesystem trigger source.
//!
//! Watches the library root folder for newly created files and feeds them
//! into the pipeline. The pipeline's own output files are filtered out so
//! the watcher never re-triggers on what it produced.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::media::{MediaProber, Transcoder};
use crate::notifier::Notifier;
use crate::pipeline::TaskPipeline;
use crate::task::{Task, TaskHandle};

/// Errors creating or attaching the filesystem watcher. Fatal at startup.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to create filesystem watcher: {0}")]
    Init(#[from] notify::Error),

    #[error("failed to watch {path}: {source}")]
    Attach {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

/// Watches a root folder for created files. Dropping the watcher stops it.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Starts watching `root` and spawning a pipeline task per qualifying
    /// create event. The watch is non-recursive.
    pub fn start<P, T, N>(
        root: &Path,
        pipeline: Arc<TaskPipeline<P, T, N>>,
    ) -> Result<Self, WatchError>
    where
        P: MediaProber + 'static,
        T: Transcoder + 'static,
        N: Notifier + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel();

        // The notify callback runs on the watcher's own thread; events are
        // bridged into the async world through the channel.
        let mut watcher = RecommendedWatcher::new(
            move |result: notify::Result<Event>| {
                let _ = tx.send(result);
            },
            notify::Config::default(),
        )?;
        watcher
            .watch(root, RecursiveMode::NonRecursive)
            .map_err(|source| WatchError::Attach {
                path: root.to_path_buf(),
                source,
            })?;
        info!(path = %root.display(), "watching folder");

        tokio::spawn(async move {
            while let Some(result) = rx.recv().await {
                match result {
                    Ok(event) if matches!(event.kind, EventKind::Create(_)) => {
                        for path in event.paths {
                            let Some(task) = Task::from_watched_path(&path) else {
                                continue;
                            };
                            info!(path = %path.display(), "new file detected");
                            pipeline.spawn(TaskHandle::new(task));
                        }
                    }
                    Ok(_) => {}
                    Err(e) => error!(error = %e, "watch error"),
                }
            }
        });

        Ok(Self { _watcher: watcher })
    }
}
