pub mod song;

pub use song::{HealthStatus, Recommendation, RecommendRequest, SongInfo};
