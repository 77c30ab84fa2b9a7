use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RecommendRequest {
    #[validate(length(min = 1, message = "mood must not be empty"))]
    pub mood: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub song_file: String,
    pub similarity_score: f32,
    pub title: String,
    pub artist: String,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub embeddings_loaded: bool,
    pub num_embeddings: usize,
}

/// Artist and title recovered from an embedding filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongInfo {
    pub artist: String,
    pub title: String,
}

impl SongInfo {
    /// Parse artist and title out of an embedding filename.
    ///
    /// Filenames come in a few shapes, tried in order:
    /// `"Artist - Title.csv"`, `"Artist-Title.csv"` (first hyphen splits,
    /// both sides trimmed), `"artist_word1_word2.csv"` (underscores),
    /// and anything else uses the whole stem for both fields.
    pub fn from_filename(filename: &str) -> Self {
        let base_name = match filename.rsplit_once('.') {
            Some((stem, _ext)) if !stem.is_empty() => stem,
            _ => filename,
        };

        if let Some((artist, title)) = base_name.split_once(" - ") {
            SongInfo {
                artist: artist.to_string(),
                title: title.to_string(),
            }
        } else if let Some((artist, title)) = base_name.split_once('-') {
            // Handles cases like "2pac- Still Ballin"
            SongInfo {
                artist: artist.trim().to_string(),
                title: title.trim().to_string(),
            }
        } else if base_name.contains('_') {
            let mut parts = base_name.split('_');
            let artist = parts.next().unwrap_or(base_name).to_string();
            SongInfo {
                artist,
                title: parts.collect::<Vec<_>>().join(" "),
            }
        } else {
            SongInfo {
                artist: base_name.to_string(),
                title: base_name.to_string(),
            }
        }
    }
}
