//! Corpus assembly and the position-consistent lookup tables.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bow::TokenBags;

/// Ordered token bags, one per surviving headword.
pub type Corpus = Vec<Vec<String>>;

/// Paired lookup tables: position → headword and headword → position.
/// Positions are assigned in strict visitation order, zero-based, gapless.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Index {
    pub by_id: Vec<String>,
    pub by_word: HashMap<String, usize>,
}

/// Build the corpus and both lookup tables from a single pass over `bags`.
/// Deriving all three from one iteration of one ordered map is what makes
/// `by_word[by_id[i]] == i` hold by construction.
pub fn build(bags: &TokenBags) -> (Corpus, Index) {
    let mut corpus = Corpus::with_capacity(bags.len());
    let mut index = Index {
        by_id: Vec::with_capacity(bags.len()),
        by_word: HashMap::with_capacity(bags.len()),
    };

    for (lemma, bag) in bags {
        corpus.push(bag.clone());
        index.by_word.insert(lemma.clone(), index.by_id.len());
        index.by_id.push(lemma.clone());
    }

    (corpus, index)
}

impl Index {
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Persist both lookup tables.
    pub fn save(&self, word_path: &Path, id_path: &Path, quiet: bool) -> io::Result<()> {
        if !quiet {
            println!("Saving index {}", word_path.display());
        }
        serde_json::to_writer(BufWriter::new(File::create(word_path)?), &self.by_word)?;

        if !quiet {
            println!("Saving index {}", id_path.display());
        }
        serde_json::to_writer(BufWriter::new(File::create(id_path)?), &self.by_id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bags_of(pairs: &[(&str, &[&str])]) -> TokenBags {
        pairs
            .iter()
            .map(|&(k, toks)| {
                (
                    k.to_string(),
                    toks.iter().map(|t| t.to_string()).collect::<Vec<_>>(),
                )
            })
            .collect()
    }

    #[test]
    fn positions_round_trip_through_both_tables() {
        let bags = bags_of(&[
            ("amor", &["love", "love"]),
            ("lego", &["read"]),
            ("uir", &["man", "hero"]),
        ]);
        let (corpus, index) = build(&bags);

        assert_eq!(corpus.len(), index.len());
        for (i, lemma) in index.by_id.iter().enumerate() {
            assert_eq!(index.by_word[lemma], i);
            assert_eq!(&corpus[i], &bags[lemma]);
        }
    }

    #[test]
    fn order_follows_the_bag_map() {
        let bags = bags_of(&[("c", &["x"]), ("a", &["y"]), ("b", &["z"])]);
        let (_, index) = build(&bags);
        assert_eq!(index.by_id, vec!["c", "a", "b"]);
        assert_eq!(index.by_word["c"], 0);
        assert_eq!(index.by_word["a"], 1);
        assert_eq!(index.by_word["b"], 2);
    }
}
