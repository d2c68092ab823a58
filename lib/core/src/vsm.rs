//! Term vector space model with smoothed IDF weighting.
//!
//! Two independent instances back the matcher: one over word stems, one over
//! character n-grams. The vocabulary and IDF table derive only from the
//! category corpus - categories define the semantic basis, product text is
//! merely projected onto it. Both are rebuilt fresh every run; a model is a
//! pure function of the corpus it was fitted on.

use ahash::{AHashMap, AHashSet};

/// Vocabulary plus inverse-document-frequency weights fitted on a corpus of
/// token sequences. Read-only after [`VectorSpaceModel::fit`].
#[derive(Debug, Clone)]
pub struct VectorSpaceModel {
    vocabulary: AHashMap<String, usize>,
    idf: Vec<f32>,
}

impl VectorSpaceModel {
    /// Build vocabulary (first-seen order) and IDF table from the corpus.
    ///
    /// IDF = `ln((N+1)/(df+1)) + 1`, always positive and monotonically
    /// decreasing in document frequency.
    pub fn fit(corpus: &[Vec<String>]) -> Self {
        let mut vocabulary: AHashMap<String, usize> = AHashMap::new();
        let mut df: Vec<u32> = Vec::new();

        for document in corpus {
            let mut seen: AHashSet<usize> = AHashSet::new();
            for term in document {
                let next = vocabulary.len();
                let index = *vocabulary.entry(term.clone()).or_insert(next);
                if index == df.len() {
                    df.push(0);
                }
                if seen.insert(index) {
                    df[index] += 1;
                }
            }
        }

        let n = corpus.len() as f32;
        let idf = df
            .iter()
            .map(|&d| ((n + 1.0) / (d as f32 + 1.0)).ln() + 1.0)
            .collect();

        Self { vocabulary, idf }
    }

    /// Number of vocabulary terms (the vector dimensionality).
    pub fn dim(&self) -> usize {
        self.idf.len()
    }

    /// Project a token sequence into the model's space: raw term counts
    /// (out-of-vocabulary tokens ignored) times IDF, L2-normalized. A
    /// zero-norm vector is returned unchanged, all-zero.
    pub fn vectorize(&self, tokens: &[String]) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.idf.len()];
        for token in tokens {
            if let Some(&index) = self.vocabulary.get(token) {
                vector[index] += 1.0;
            }
        }
        for (value, weight) in vector.iter_mut().zip(&self.idf) {
            *value *= weight;
        }
        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }

    /// Cosine similarity of two vectors from this model (dot product, since
    /// vectorize output is unit-normalized).
    pub fn similarity(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }
}
