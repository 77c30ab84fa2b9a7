use crate::error::{AppError, Result};
use crate::services::pca::Pca;
use crate::services::similarity::{self, Match};
use ndarray::{Array1, Array2, Axis};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Output width of the sentence-embedding model (all-MiniLM-L6-v2).
pub const RAW_DIM: usize = 384;
/// Width of the reduced space the corpus files are stored in.
pub const REDUCED_DIM: usize = 200;

/// The immutable matching state built once at startup: the normalized
/// corpus matrix, the filenames its rows were built from, and the
/// projection fitted on the reference distribution.
///
/// Corpus rows and query vectors only ever meet in the reduced space, and
/// row `i` of the corpus always corresponds to `song_files[i]`.
#[derive(Debug)]
pub struct MoodIndex {
    corpus: Array2<f32>,
    song_files: Vec<String>,
    pca: Pca,
}

impl MoodIndex {
    /// Build the index from the reference embedding file and the per-song
    /// embedding directory.
    ///
    /// The reference set must be raw-width; a mismatch aborts the load. A
    /// per-song file with the wrong column count is skipped with a warning
    /// and leaves its row zeroed, while an unreadable or numerically
    /// corrupt file aborts the load.
    pub fn load(reference_path: &Path, embeddings_dir: &Path) -> Result<Self> {
        info!("Loading reference embeddings from {}", reference_path.display());
        let reference = read_matrix(reference_path)?;
        if reference.ncols() != RAW_DIM {
            return Err(AppError::DimensionMismatch {
                context: "reference embedding",
                expected: RAW_DIM,
                actual: reference.ncols(),
            });
        }
        info!(
            "Reference embeddings loaded. Shape: ({}, {})",
            reference.nrows(),
            reference.ncols()
        );

        info!("Fitting PCA...");
        let pca = Pca::fit(&reference, REDUCED_DIM);
        info!(
            "PCA fit: {} components over {} features, explained variance ratio {:.3}",
            pca.n_components(),
            pca.n_features(),
            pca.explained_variance_ratio()
        );

        let song_files = list_embedding_files(embeddings_dir)?;
        info!("Found {} embedding files", song_files.len());

        let mut corpus = Array2::<f32>::zeros((song_files.len(), REDUCED_DIM));
        for (i, file) in song_files.iter().enumerate() {
            let batch = read_matrix(&embeddings_dir.join(file))?;
            // The per-song files are stored pre-reduced, unlike the raw
            // reference set. A wrong width skips the song rather than
            // aborting the load.
            if batch.ncols() != REDUCED_DIM {
                warn!(
                    "Unexpected embedding dimension in {}: {}",
                    file,
                    batch.ncols()
                );
                continue;
            }
            let Some(mean) = batch.mean_axis(Axis(0)) else {
                warn!("No rows in {}", file);
                continue;
            };
            corpus.row_mut(i).assign(&mean);
        }

        similarity::normalize_rows(&mut corpus);

        if corpus.ncols() != REDUCED_DIM {
            return Err(AppError::DimensionMismatch {
                context: "corpus",
                expected: REDUCED_DIM,
                actual: corpus.ncols(),
            });
        }
        info!(
            "Corpus loaded successfully. Shape: ({}, {})",
            corpus.nrows(),
            corpus.ncols()
        );

        Ok(Self {
            corpus,
            song_files,
            pca,
        })
    }

    /// Project and normalize a raw query vector, then rank the whole
    /// corpus against it.
    pub fn rank(&self, raw_query: &Array1<f32>) -> Result<Vec<Match>> {
        if raw_query.len() != RAW_DIM {
            return Err(AppError::DimensionMismatch {
                context: "query embedding",
                expected: RAW_DIM,
                actual: raw_query.len(),
            });
        }

        let reduced = self.pca.transform(raw_query);
        let query = similarity::normalize(&reduced);
        Ok(similarity::search(&self.corpus, &query))
    }

    pub fn len(&self) -> usize {
        self.song_files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.song_files.is_empty()
    }

    pub fn song_file(&self, index: usize) -> &str {
        &self.song_files[index]
    }

    #[cfg(test)]
    pub(crate) fn from_parts(corpus: Array2<f32>, song_files: Vec<String>, pca: Pca) -> Self {
        Self {
            corpus,
            song_files,
            pca,
        }
    }

    #[cfg(test)]
    pub(crate) fn corpus(&self) -> &Array2<f32> {
        &self.corpus
    }
}

/// List the per-song embedding filenames, sorted lexicographically. The
/// sort fixes the corpus row order across runs.
fn list_embedding_files(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| AppError::Load(format!("failed to read {}: {}", dir.display(), e)))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| AppError::Load(format!("failed to read {}: {}", dir.display(), e)))?;
        let is_file = entry
            .file_type()
            .map(|t| t.is_file())
            .unwrap_or(false);
        if is_file {
            files.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    files.sort();
    Ok(files)
}

/// Parse a headerless comma-separated numeric matrix, one row per line.
/// Blank lines are ignored; anything non-numeric or ragged is an error.
fn read_matrix(path: &Path) -> Result<Array2<f32>> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::Load(format!("failed to read {}: {}", path.display(), e)))?;

    let mut rows: Vec<Vec<f32>> = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row = line
            .split(',')
            .map(|v| v.trim().parse::<f32>())
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(|e| {
                AppError::Load(format!(
                    "{}:{}: invalid value: {}",
                    path.display(),
                    line_no + 1,
                    e
                ))
            })?;
        rows.push(row);
    }

    let ncols = rows.first().map(|r| r.len()).unwrap_or(0);
    if rows.iter().any(|r| r.len() != ncols) {
        return Err(AppError::Load(format!(
            "{}: rows have inconsistent column counts",
            path.display()
        )));
    }

    let nrows = rows.len();
    let flat: Vec<f32> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((nrows, ncols), flat)
        .map_err(|e| AppError::Load(format!("{}: {}", path.display(), e)))
}
