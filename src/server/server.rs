use anyhow::{Context, Result};
use std::time::Duration;

use chrono::Utc;
use tower_http::services::ServeDir;
use tracing::{debug, error, info};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

#[cfg(feature = "slowdown")]
use super::http_layers::random_slowdown::slowdown_request;
use super::metrics::{
    init_catalog_metrics, init_metrics, metrics_handler, record_lookup, record_prices,
};
use super::{log_requests, state::*, ServerConfig};
use crate::catalog::{ArtistId, CatalogEntry, CatalogError, CatalogResult, NotFound};
use crate::catalog_store::{ArtistRepository, CatalogStore, GenreRepository};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::InvalidIdentifier { .. } => StatusCode::BAD_REQUEST,
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum AlbumsView {
    #[default]
    List,
    Summary,
}

#[derive(Deserialize, Debug, Default)]
struct AlbumsQuery {
    #[serde(default)]
    view: AlbumsView,
}

#[derive(Deserialize, Debug, Default)]
struct ArtistsQuery {
    genre: Option<String>,
}

/// Runs a repository-bound operation on the blocking pool, bounded by the
/// configured repository timeout. A timeout or a panicked task reads as an
/// unavailable repository.
async fn with_store<T, F>(state: &ServerState, operation: F) -> CatalogResult<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn CatalogStore) -> CatalogResult<T> + Send + 'static,
{
    let store = state.catalog_store.clone();
    let timeout = state.config.repository_timeout;
    let task = tokio::task::spawn_blocking(move || operation(store.as_ref()));

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => {
            error!("Repository task failed: {}", join_error);
            Err(CatalogError::UpstreamUnavailable(format!(
                "repository task failed: {}",
                join_error
            )))
        }
        Err(_) => {
            error!("Repository call timed out after {}ms", timeout.as_millis());
            Err(CatalogError::UpstreamUnavailable(format!(
                "repository call timed out after {}ms",
                timeout.as_millis()
            )))
        }
    }
}

fn entries_response(entries: &[CatalogEntry], view: AlbumsView) -> Response {
    record_prices(entries);
    match view {
        AlbumsView::List => Json(entries).into_response(),
        AlbumsView::Summary => Json(
            entries
                .iter()
                .map(CatalogEntry::summary)
                .collect::<Vec<_>>(),
        )
        .into_response(),
    }
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION").to_owned(),
    };
    Json(stats)
}

async fn get_albums(
    State(state): State<ServerState>,
    Query(query): Query<AlbumsQuery>,
) -> Result<Response, CatalogError> {
    let index = state.catalog_index.clone();
    let mut rng = state.request_rng();
    let entries = with_store(&state, move |store| {
        index.list(store, Utc::now(), &mut rng)
    })
    .await?;
    debug!("Listing {} albums", entries.len());
    Ok(entries_response(&entries, query.view))
}

async fn get_album(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Response, CatalogError> {
    let index = state.catalog_index.clone();
    let mut rng = state.request_rng();
    let result = with_store(&state, move |store| {
        index.lookup(&id, store, Utc::now(), &mut rng)
    })
    .await;
    record_lookup(&result);

    let entry = result?;
    record_prices([&entry]);
    Ok(Json(entry.detail()).into_response())
}

async fn get_artists(
    State(state): State<ServerState>,
    Query(query): Query<ArtistsQuery>,
) -> Result<Response, CatalogError> {
    let artists = with_store(&state, move |store| {
        let result = match &query.genre {
            Some(genre) => store.find_by_genre(genre),
            None => store.find_all(),
        };
        result.map_err(CatalogError::upstream)
    })
    .await?;
    Ok(Json(artists).into_response())
}

async fn get_artist(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Response, CatalogError> {
    let artist_id = ArtistId::parse(&id)?;
    let artist = with_store(&state, move |store| {
        match store.find_by_id(&artist_id).map_err(CatalogError::upstream)? {
            Some(artist) => Ok(artist),
            None => Err(CatalogError::NotFound(NotFound::Artist(artist_id))),
        }
    })
    .await?;
    Ok(Json(artist).into_response())
}

async fn get_artist_albums(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Response, CatalogError> {
    let index = state.catalog_index.clone();
    let mut rng = state.request_rng();
    let entries = with_store(&state, move |store| {
        index.list_for_artist(&id, store, Utc::now(), &mut rng)
    })
    .await?;
    Ok(entries_response(&entries, AlbumsView::Summary))
}

async fn get_genres(State(state): State<ServerState>) -> Result<Response, CatalogError> {
    let genres = with_store(&state, |store| {
        store.find_all_genres().map_err(CatalogError::upstream)
    })
    .await?;
    Ok(Json(genres).into_response())
}

async fn get_genre(
    State(state): State<ServerState>,
    Path(link): Path<String>,
) -> Result<Response, CatalogError> {
    let genre = with_store(&state, move |store| {
        match store.find_genre(&link).map_err(CatalogError::upstream)? {
            Some(genre) => Ok(genre),
            None => Err(CatalogError::NotFound(NotFound::Genre(link))),
        }
    })
    .await?;
    Ok(Json(genre).into_response())
}

pub fn make_app(config: ServerConfig, catalog_store: GuardedCatalogStore) -> Result<Router> {
    let state = ServerState::new(config.clone(), catalog_store);

    let catalog_routes: Router = Router::new()
        .route("/", get(home))
        .route("/albums", get(get_albums))
        .route("/albums/{id}", get(get_album))
        .route("/artists", get(get_artists))
        .route("/artists/{id}", get(get_artist))
        .route("/artists/{id}/albums", get(get_artist_albums))
        .route("/genres", get(get_genres))
        .route("/genres/{link}", get(get_genre))
        .route("/metrics", get(metrics_handler))
        .with_state(state.clone());

    let mut app: Router = match &config.assets_dir {
        Some(assets_dir) => {
            if !assets_dir.is_dir() {
                anyhow::bail!("Assets dir {:?} is not a directory", assets_dir);
            }
            catalog_routes.nest_service("/assets", ServeDir::new(assets_dir))
        }
        None => catalog_routes,
    };

    #[cfg(feature = "slowdown")]
    {
        app = app.layer(middleware::from_fn(slowdown_request));
    }
    app = app.layer(middleware::from_fn_with_state(state.clone(), log_requests));

    Ok(app)
}

pub async fn run_server(catalog_store: GuardedCatalogStore, config: ServerConfig) -> Result<()> {
    init_metrics();
    let counts = catalog_store
        .counts()
        .context("Failed to count catalog contents")?;
    init_catalog_metrics(&counts);

    let port = config.port;
    let app = make_app(config, catalog_store)?;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Serving catalog on port {}", port);

    Ok(axum::serve(listener, app).await?)
}
