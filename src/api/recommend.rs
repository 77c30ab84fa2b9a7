use crate::error::{AppError, Result};
use crate::models::{HealthStatus, Recommendation, RecommendRequest, SongInfo};
use crate::services::similarity::TOP_K;
use crate::services::{MoodIndex, TextEmbedder};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use ndarray::Array1;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct AppState {
    pub index: Arc<MoodIndex>,
    pub embedder: Arc<dyn TextEmbedder>,
}

pub fn recommend_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/recommend", post(recommend))
        .route("/health", get(health))
}

async fn recommend(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecommendRequest>,
) -> Result<Json<Recommendation>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    info!("Received mood input: {}", req.mood);

    // Nothing to rank against; skip the embedding round-trip entirely
    if state.index.is_empty() {
        return Err(AppError::EmptyCorpus);
    }

    let raw = state.embedder.embed(&req.mood).await?;
    let ranked = state.index.rank(&Array1::from(raw))?;
    let best = ranked.first().copied().ok_or(AppError::EmptyCorpus)?;

    info!("Top {} matches:", TOP_K);
    for m in ranked.iter().take(TOP_K) {
        let song = SongInfo::from_filename(state.index.song_file(m.index));
        info!("- {} - {}: {:.3}", song.artist, song.title, m.score);
    }

    let song_file = state.index.song_file(best.index).to_string();
    let song = SongInfo::from_filename(&song_file);
    info!(
        "Best match found: {} with similarity score: {}",
        song_file, best.score
    );

    Ok(Json(Recommendation {
        song_file,
        similarity_score: best.score,
        title: song.title,
        artist: song.artist,
    }))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    // The index is built before the listener starts, so reaching this
    // handler means it is loaded
    Json(HealthStatus {
        status: "healthy",
        embeddings_loaded: true,
        num_embeddings: state.index.len(),
    })
}
