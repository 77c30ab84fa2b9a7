use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory of per-song embedding files (one file per song)
    pub embeddings_dir: String,
    /// Reference embedding matrix the projection is fit against
    pub reference_embeddings_path: String,
    /// Base URL of the sentence-embedding sidecar
    pub embedding_service_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Allowed CORS origins (comma-separated)
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        // The embedding sidecar is required - the service cannot answer
        // queries without it
        let embedding_service_url = env::var("EMBEDDING_SERVICE_URL").map_err(|_| {
            anyhow::anyhow!(
                "EMBEDDING_SERVICE_URL environment variable must be set \
                (base URL of the sentence-embedding service)"
            )
        })?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Config {
            embeddings_dir: env::var("EMBEDDINGS_DIR")
                .unwrap_or_else(|_| "embeddings".to_string()),
            reference_embeddings_path: env::var("REFERENCE_EMBEDDINGS_PATH")
                .unwrap_or_else(|_| "query_embedding.csv".to_string()),
            embedding_service_url,
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
            cors_origins,
        })
    }
}
