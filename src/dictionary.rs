//! Merging per-language entry streams into one ordered headword map.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::process;

use indexmap::IndexMap;

use crate::lexicon;
use crate::normalize::Lang;
use crate::paths::DataPaths;
use crate::progress;

/// Definition fragments accumulated per headword, in encounter order.
pub type DefSets = IndexMap<String, Vec<String>>;

/// Flattened definitions, one string per headword. Insertion order is
/// load-bearing: the corpus and index downstream are both derived from it.
pub type Definitions = IndexMap<String, String>;

/// Parse the configured lexica into one headword→fragments map.
///
/// Entries sharing a standardized headword, within one lexicon or across
/// both, accumulate all of their fragments. A lexicon that cannot be read
/// is fatal; a unit that does not match the entry structure contributes
/// nothing.
pub fn parse_lexica(paths: &DataPaths, langs: &[Lang], quiet: bool) -> DefSets {
    let mut defs = DefSets::new();

    for &lang in langs {
        let path = paths.lexicon(lang);

        if !quiet {
            println!("Reading lexicon {}", path.display());
        }

        let reader = match lexicon::open_lexicon(&path) {
            Ok(r) => r,
            Err(err) => {
                eprintln!("Can't read {}: {}", path.display(), err);
                process::exit(1);
            }
        };

        // Byte progress is only meaningful against the on-disk size of an
        // uncompressed source.
        let len = if path.to_string_lossy().ends_with(".bz2") {
            None
        } else {
            fs::metadata(&path).ok().map(|m| m.len())
        };
        let pb = progress::bytes(len, quiet);

        let mut matched = 0usize;
        let result = lexicon::scan_entries(reader, &pb, |unit| {
            if let Some((lemma, fragments)) = lexicon::parse_entry(lang, unit) {
                defs.entry(lemma).or_default().extend(fragments);
                matched += 1;
            }
        });
        pb.finish_and_clear();

        if let Err(err) = result {
            eprintln!("Can't read {}: {}", path.display(), err);
            process::exit(1);
        }

        if !quiet {
            println!("  {} entries extracted", matched);
        }
    }

    defs
}

/// Join each headword's fragments with `"; "`, dropping headwords whose
/// definitions all turned out empty. Returns the flattened map and the
/// number of headwords dropped.
pub fn flatten(defs: DefSets, quiet: bool) -> (Definitions, usize) {
    if !quiet {
        println!("Flattening entries with multiple definitions");
    }

    let pb = progress::count(defs.len() as u64, quiet);

    let mut flat = Definitions::with_capacity(defs.len());
    let mut lost = 0usize;

    for (lemma, fragments) in defs {
        pb.inc(1);
        if fragments.is_empty() {
            lost += 1;
            continue;
        }
        flat.insert(lemma, fragments.join("; "));
    }
    pb.finish_and_clear();

    if !quiet {
        println!("Lost {} empty definitions", lost);
    }

    (flat, lost)
}

/// Save the flattened dictionary snapshot.
pub fn write_cache(defs: &Definitions, paths: &DataPaths, quiet: bool) -> io::Result<()> {
    let path = paths.cache();
    if !quiet {
        println!("Saving dictionary to {}", path.display());
    }
    let file = File::create(&path)?;
    serde_json::to_writer(BufWriter::new(file), defs)?;
    Ok(())
}

/// Load the dictionary snapshot written by an earlier run. Missing or
/// unreadable snapshots are fatal: the caller asked to skip parsing.
pub fn read_cache(paths: &DataPaths, quiet: bool) -> Definitions {
    let path = paths.cache();
    if !quiet {
        println!("Loading dictionary from {}", path.display());
    }
    let file = match File::open(&path) {
        Ok(f) => f,
        Err(err) => {
            eprintln!("Can't read {}: {}", path.display(), err);
            process::exit(1);
        }
    };
    match serde_json::from_reader(BufReader::new(file)) {
        Ok(defs) => defs,
        Err(err) => {
            eprintln!("Can't read {}: {}", path.display(), err);
            process::exit(1);
        }
    }
}
