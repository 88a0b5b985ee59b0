//! Parse the big XML dictionaries from Perseus — Lewis & Short for Latin
//! and Liddell-Scott-Jones for Greek — into a headword → English-definition
//! map, reduce each definition to a frequency-filtered bag of words, and
//! build a position-consistent corpus, lookup tables, and a cosine
//! similarity index over the tf-idf-weighted (optionally LSI-reduced)
//! documents.

pub mod betacode;
pub mod bow;
pub mod corpus;
pub mod dictionary;
pub mod lexicon;
pub mod model;
pub mod normalize;
pub mod paths;
pub mod progress;
