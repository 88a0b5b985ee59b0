//! The statistical modeling stage fed by the finished corpus: vocabulary,
//! tf-idf weighting, optional dimensionality reduction, and a persisted
//! cosine similarity index. The pipeline hands the corpus in and takes
//! nothing back except success or failure.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::corpus::Corpus;

/// Sparse document vector: `(term id, weight)` pairs, ascending by id.
pub type SparseVec = Vec<(u32, f32)>;

/// Token ↔ id mapping in first-seen order.
pub struct Vocabulary {
    ids: HashMap<String, u32>,
    tokens: Vec<String>,
}

impl Vocabulary {
    pub fn from_corpus(corpus: &Corpus) -> Self {
        let mut ids = HashMap::new();
        let mut tokens = Vec::new();
        for doc in corpus {
            for token in doc {
                if !ids.contains_key(token) {
                    ids.insert(token.clone(), tokens.len() as u32);
                    tokens.push(token.clone());
                }
            }
        }
        Vocabulary { ids, tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn id(&self, token: &str) -> Option<u32> {
        self.ids.get(token).copied()
    }

    /// Term-frequency vector for one document.
    pub fn doc_to_bow(&self, doc: &[String]) -> SparseVec {
        let mut tf: HashMap<u32, f32> = HashMap::new();
        for token in doc {
            if let Some(id) = self.id(token) {
                *tf.entry(id).or_insert(0.0) += 1.0;
            }
        }
        let mut bow: SparseVec = tf.into_iter().collect();
        bow.sort_unstable_by_key(|&(id, _)| id);
        bow
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        serde_json::to_writer(BufWriter::new(File::create(path)?), &self.tokens)?;
        Ok(())
    }
}

/// Tf-idf weighting fitted on document frequencies.
pub struct TfIdfModel {
    idf: Vec<f32>,
}

impl TfIdfModel {
    pub fn fit(bows: &[SparseVec], vocab_len: usize) -> Self {
        let mut df = vec![0u32; vocab_len];
        for bow in bows {
            for &(id, _) in bow {
                df[id as usize] += 1;
            }
        }
        let n = bows.len() as f32;
        let idf = df
            .iter()
            .map(|&d| if d == 0 { 0.0 } else { (n / d as f32).ln() })
            .collect();
        TfIdfModel { idf }
    }

    /// Weight one document and scale it to unit length. Terms present in
    /// every document carry no signal and drop out here.
    pub fn transform(&self, bow: &SparseVec) -> SparseVec {
        let mut weighted: SparseVec = bow
            .iter()
            .map(|&(id, tf)| (id, tf * self.idf[id as usize]))
            .filter(|&(_, w)| w > 0.0)
            .collect();

        let norm: f32 = weighted.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in weighted.iter_mut() {
                *w /= norm;
            }
        }
        weighted
    }

    pub fn weight_corpus(&self, bows: &[SparseVec]) -> Vec<SparseVec> {
        bows.iter().map(|b| self.transform(b)).collect()
    }
}

const LSI_ITERATIONS: usize = 50;

/// Truncated SVD by orthogonal iteration: projects documents onto the top
/// right singular vectors of the weighted corpus. Deterministic start
/// vectors keep repeated runs identical.
pub struct LsiModel {
    basis: Vec<Vec<f32>>,
}

impl LsiModel {
    pub fn fit(weighted: &[SparseVec], vocab_len: usize, topics: usize) -> Self {
        let k = topics.min(vocab_len).min(weighted.len());
        let mut basis: Vec<Vec<f32>> = (0..k)
            .map(|j| seeded_direction(j as u64, vocab_len))
            .collect();
        orthonormalize(&mut basis);

        for _ in 0..LSI_ITERATIONS {
            let mut next: Vec<Vec<f32>> = Vec::with_capacity(k);
            for q in &basis {
                // z = Xᵀ(Xq), accumulated row by sparse row
                let mut z = vec![0.0f32; vocab_len];
                for row in weighted {
                    let y = sparse_dot_dense(row, q);
                    if y != 0.0 {
                        for &(id, w) in row {
                            z[id as usize] += w * y;
                        }
                    }
                }
                next.push(z);
            }
            orthonormalize(&mut next);
            basis = next;
        }

        LsiModel { basis }
    }

    pub fn topics(&self) -> usize {
        self.basis.len()
    }

    /// Topic-space coordinates for one weighted document.
    pub fn project(&self, doc: &SparseVec) -> Vec<f32> {
        self.basis.iter().map(|q| sparse_dot_dense(doc, q)).collect()
    }

    pub fn project_corpus(&self, weighted: &[SparseVec]) -> Vec<SparseVec> {
        weighted
            .iter()
            .map(|doc| {
                self.project(doc)
                    .into_iter()
                    .enumerate()
                    .map(|(topic, w)| (topic as u32, w))
                    .collect()
            })
            .collect()
    }
}

/// Cosine similarity over unit-normalized sparse documents.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct SimilarityIndex {
    docs: Vec<SparseVec>,
}

impl SimilarityIndex {
    /// Normalize every document to unit length and freeze the index.
    pub fn build(mut docs: Vec<SparseVec>) -> Self {
        for doc in docs.iter_mut() {
            let norm: f32 = doc.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt();
            if norm > 0.0 {
                for (_, w) in doc.iter_mut() {
                    *w /= norm;
                }
            }
        }
        SimilarityIndex { docs }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// The `k` documents most similar to document `id`, best first.
    pub fn most_similar(&self, id: usize, k: usize) -> Vec<(usize, f32)> {
        let query = &self.docs[id];
        let mut scores: Vec<(usize, f32)> = self
            .docs
            .iter()
            .enumerate()
            .map(|(other, doc)| (other, sparse_dot(query, doc)))
            .collect();
        scores.sort_unstable_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scores.truncate(k);
        scores
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        serde_json::to_writer(BufWriter::new(File::create(path)?), self)?;
        Ok(())
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// Persist a weighted corpus as one sparse row per document.
pub fn save_corpus(docs: &[SparseVec], path: &Path) -> io::Result<()> {
    serde_json::to_writer(BufWriter::new(File::create(path)?), docs)?;
    Ok(())
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    let mut acc = 0.0f32;
    for i in 0..a.len() {
        acc += a[i] * b[i];
    }
    acc
}

fn sparse_dot(a: &SparseVec, b: &SparseVec) -> f32 {
    let (mut i, mut j) = (0, 0);
    let mut acc = 0.0f32;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                acc += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    acc
}

fn sparse_dot_dense(row: &SparseVec, dense: &[f32]) -> f32 {
    row.iter().map(|&(id, w)| w * dense[id as usize]).sum()
}

/// Deterministic pseudo-random start vector (xorshift), one per column.
fn seeded_direction(seed: u64, len: usize) -> Vec<f32> {
    let mut state = seed
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(0x2545_F491_4F6C_DD1D)
        | 1;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 40) as f32 / (1u64 << 24) as f32 - 0.5
        })
        .collect()
}

/// Modified Gram–Schmidt over the columns; degenerate columns stay zero.
fn orthonormalize(cols: &mut [Vec<f32>]) {
    for j in 0..cols.len() {
        let (head, tail) = cols.split_at_mut(j);
        let col = &mut tail[0];
        for q in head.iter() {
            let proj = dot(q, col);
            for (c, h) in col.iter_mut().zip(q) {
                *c -= proj * h;
            }
        }
        let norm = dot(col, col).sqrt();
        if norm > 1e-12 {
            for v in col.iter_mut() {
                *v /= norm;
            }
        }
    }
}
