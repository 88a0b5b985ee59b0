//! Definition text → frequency-filtered bags of words.

use std::collections::HashMap;

use indexmap::IndexMap;
use lazy_static::lazy_static;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};

use crate::dictionary::Definitions;
use crate::normalize;
use crate::progress;

/// Normalized tokens per headword, in encounter order.
pub type TokenBags = IndexMap<String, Vec<String>>;

lazy_static! {
    static ref WORD_SPLIT: Regex = Regex::new(r"\W+").unwrap();
}

static STEMMER: Lazy<Stemmer> = Lazy::new(|| Stemmer::create(Algorithm::English));

/// Reduce each definition to a bag of normalized tokens, then drop tokens
/// occurring only once across the whole collection and headwords whose bags
/// end up empty.
///
/// Two passes are required, not an optimization: the filter threshold is a
/// global count, so every bag must exist before any token can be judged.
/// Returns the filtered bags and the number of headwords dropped.
pub fn bag_of_words(defs: Definitions, stem: bool, quiet: bool) -> (TokenBags, usize) {
    if !quiet {
        println!("Converting defs to bags of words");
    }

    let mut count: HashMap<String, usize> = HashMap::new();
    let mut bags = TokenBags::with_capacity(defs.len());

    let pb = progress::count(defs.len() as u64, quiet);

    for (lemma, text) in defs {
        pb.inc(1);

        let mut tokens: Vec<String> = WORD_SPLIT
            .split(&text)
            .filter(|w| !w.trim().is_empty())
            .map(normalize::standardize_token)
            .filter(|w| !w.is_empty())
            .collect();

        if stem {
            tokens = tokens
                .iter()
                .map(|w| STEMMER.stem(w).into_owned())
                .collect();
        }

        for token in &tokens {
            *count.entry(token.clone()).or_insert(0) += 1;
        }

        bags.insert(lemma, tokens);
    }
    pb.finish_and_clear();

    if !quiet {
        println!("Removing hapax legomena");
    }

    let pb = progress::count(bags.len() as u64, quiet);

    let mut filtered = TokenBags::with_capacity(bags.len());
    let mut lost = 0usize;

    for (lemma, tokens) in bags {
        pb.inc(1);
        let kept: Vec<String> = tokens.into_iter().filter(|t| count[t] > 1).collect();
        if kept.is_empty() {
            lost += 1;
            continue;
        }
        filtered.insert(lemma, kept);
    }
    pb.finish_and_clear();

    if !quiet {
        println!("Lost {} empty definitions", lost);
    }

    (filtered, lost)
}
