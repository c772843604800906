use std::path::{Path, PathBuf};
use std::sync::Arc;

use remuxarr_core::{MediaProber, Notifier, TaskPipeline, Transcoder};

/// Shared application state
pub struct AppState<P, T, N> {
    pipeline: Arc<TaskPipeline<P, T, N>>,
    root_folder: PathBuf,
}

impl<P, T, N> AppState<P, T, N>
where
    P: MediaProber + 'static,
    T: Transcoder + 'static,
    N: Notifier + 'static,
{
    pub fn new(pipeline: Arc<TaskPipeline<P, T, N>>, root_folder: PathBuf) -> Self {
        Self {
            pipeline,
            root_folder,
        }
    }

    pub fn pipeline(&self) -> &Arc<TaskPipeline<P, T, N>> {
        &self.pipeline
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }
}
