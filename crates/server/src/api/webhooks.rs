//! Inbound webhook trigger sources.
//!
//! Media-library managers notify us about imported files here. The
//! endpoints acknowledge with 200 unconditionally; malformed payloads are
//! logged and dropped without creating a task.

use axum::{body::Bytes, extract::State, http::StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use remuxarr_core::{MediaProber, Notifier, Task, TaskHandle, Transcoder};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RadarrEvent {
    pub movie: RadarrMovie,
    #[serde(rename = "movieFile")]
    pub movie_file: RadarrMovieFile,
}

#[derive(Debug, Deserialize)]
pub struct RadarrMovie {
    pub title: String,
    #[serde(rename = "folderPath")]
    pub folder_path: String,
}

#[derive(Debug, Deserialize)]
pub struct RadarrMovieFile {
    #[serde(rename = "relativePath")]
    pub relative_path: String,
}

#[derive(Debug, Deserialize)]
pub struct SonarrEvent {
    pub series: SonarrSeries,
    #[serde(default)]
    pub episodes: Vec<SonarrEpisode>,
    #[serde(rename = "episodeFile")]
    pub episode_file: SonarrEpisodeFile,
}

#[derive(Debug, Deserialize)]
pub struct SonarrSeries {
    pub title: String,
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct SonarrEpisode {
    #[serde(rename = "seasonNumber")]
    pub season_number: u32,
    #[serde(rename = "episodeNumber")]
    pub episode_number: u32,
}

#[derive(Debug, Deserialize)]
pub struct SonarrEpisodeFile {
    #[serde(rename = "relativePath")]
    pub relative_path: String,
}

/// Radarr "file imported" notification.
pub async fn radarr<P, T, N>(
    State(state): State<Arc<AppState<P, T, N>>>,
    body: Bytes,
) -> StatusCode
where
    P: MediaProber + 'static,
    T: Transcoder + 'static,
    N: Notifier + 'static,
{
    let event: RadarrEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "ignoring malformed radarr payload");
            return StatusCode::OK;
        }
    };

    let task = Task::from_import(
        state.root_folder(),
        &event.movie.folder_path,
        &event.movie_file.relative_path,
        &event.movie.title,
    );
    info!(path = %task.source_path.display(), "radarr import received");
    state.pipeline().spawn(TaskHandle::new(task));

    StatusCode::OK
}

/// Sonarr "file imported" notification.
pub async fn sonarr<P, T, N>(
    State(state): State<Arc<AppState<P, T, N>>>,
    body: Bytes,
) -> StatusCode
where
    P: MediaProber + 'static,
    T: Transcoder + 'static,
    N: Notifier + 'static,
{
    let event: SonarrEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "ignoring malformed sonarr payload");
            return StatusCode::OK;
        }
    };

    let title = match event.episodes.first() {
        Some(episode) => format!(
            "{} Season {} Episode {}",
            event.series.title, episode.season_number, episode.episode_number
        ),
        None => event.series.title.clone(),
    };

    let task = Task::from_import(
        state.root_folder(),
        &event.series.path,
        &event.episode_file.relative_path,
        &title,
    );
    info!(path = %task.source_path.display(), "sonarr import received");
    state.pipeline().spawn(TaskHandle::new(task));

    StatusCode::OK
}
