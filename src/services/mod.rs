pub mod embedder;
pub mod mood_index;
pub mod pca;
pub mod similarity;

pub use embedder::{EmbeddingClient, TextEmbedder};
pub use mood_index::MoodIndex;
