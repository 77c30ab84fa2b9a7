use ndarray::{Array1, Array2};
use std::cmp::Ordering;

/// How many ranked matches are surfaced in the per-query diagnostics.
pub const TOP_K: usize = 5;

/// One scored corpus row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    pub index: usize,
    pub score: f32,
}

/// Rescale a vector to unit length. A zero vector is returned unchanged
/// rather than dividing by zero.
pub fn normalize(v: &Array1<f32>) -> Array1<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v / norm
    } else {
        v.clone()
    }
}

/// Rescale every row of a matrix to unit length in place. Zero rows are
/// left unchanged.
pub fn normalize_rows(m: &mut Array2<f32>) {
    for mut row in m.rows_mut() {
        let norm: f32 = row.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            row.mapv_inplace(|x| x / norm);
        }
    }
}

/// Score every corpus row against the query and rank descending.
///
/// Both sides are expected to be unit length, so the dot product is the
/// cosine similarity in [-1, 1]. Ties rank the lower row index first.
pub fn search(corpus: &Array2<f32>, query: &Array1<f32>) -> Vec<Match> {
    let scores = corpus.dot(query);

    let mut ranked: Vec<Match> = scores
        .iter()
        .enumerate()
        .map(|(index, &score)| Match { index, score })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(a.index.cmp(&b.index))
    });

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    const TOLERANCE: f32 = 1e-6;

    #[test]
    fn normalize_produces_unit_length() {
        let v = array![3.0, 4.0];
        let n = normalize(&v);
        let len: f32 = n.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((len - 1.0).abs() < TOLERANCE);
        assert!((n[0] - 0.6).abs() < TOLERANCE);
        assert!((n[1] - 0.8).abs() < TOLERANCE);
    }

    #[test]
    fn normalize_is_idempotent() {
        let v = array![1.0, -2.0, 2.0];
        let once = normalize(&v);
        let twice = normalize(&once);
        for (a, b) in once.iter().zip(twice.iter()) {
            assert!((a - b).abs() < TOLERANCE);
        }
    }

    #[test]
    fn normalize_leaves_zero_vector_unchanged() {
        let v = array![0.0, 0.0, 0.0];
        let n = normalize(&v);
        assert!(n.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn normalize_rows_handles_zero_row() {
        let mut m = array![[3.0, 4.0], [0.0, 0.0]];
        normalize_rows(&mut m);
        assert!((m[[0, 0]] - 0.6).abs() < TOLERANCE);
        assert!((m[[0, 1]] - 0.8).abs() < TOLERANCE);
        assert_eq!(m[[1, 0]], 0.0);
        assert_eq!(m[[1, 1]], 0.0);
    }

    #[test]
    fn self_similarity_is_maximal() {
        let mut corpus = array![[1.0, 1.0, 0.0], [0.0, 2.0, 0.0], [1.0, 0.0, 3.0]];
        normalize_rows(&mut corpus);

        let query = normalize(&array![0.0, 2.0, 0.0]);
        let ranked = search(&corpus, &query);

        assert_eq!(ranked[0].index, 1);
        assert!((ranked[0].score - 1.0).abs() < TOLERANCE);
        assert!(ranked.iter().all(|m| m.score <= ranked[0].score + TOLERANCE));
    }

    #[test]
    fn ranking_is_deterministic_with_tie_break() {
        // Rows 0 and 2 are identical, so they tie exactly; the lower
        // index must come first, and repeated searches must agree.
        let corpus = array![[1.0, 0.0], [0.0, 1.0], [1.0, 0.0]];
        let query = array![1.0, 0.0];

        let first = search(&corpus, &query);
        let second = search(&corpus, &query);
        assert_eq!(first, second);

        assert_eq!(first[0].index, 0);
        assert_eq!(first[1].index, 2);
        assert_eq!(first[2].index, 1);
    }

    #[test]
    fn scores_are_cosine_similarities() {
        let corpus = array![[1.0, 0.0], [0.0, -1.0]];
        let query = array![0.0, 1.0];
        let ranked = search(&corpus, &query);

        assert_eq!(ranked[0].index, 0);
        assert!((ranked[0].score - 0.0).abs() < TOLERANCE);
        assert!((ranked[1].score - (-1.0)).abs() < TOLERANCE);
    }
}
