use std::fs;
use std::path::PathBuf;

use clap::Parser;

use synonymy::bow;
use synonymy::corpus;
use synonymy::dictionary;
use synonymy::model::{self, LsiModel, SimilarityIndex, TfIdfModel, Vocabulary};
use synonymy::normalize::Lang;
use synonymy::paths::DataPaths;

#[derive(Parser)]
#[command(name = "synonymy")]
#[command(about = "Parse the Latin and Greek lexica into a bag-of-words corpus and similarity index")]
struct Args {
    /// Data directory (expects common/<lang>.lexicon.xml under it)
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Use cached version of dictionaries
    #[arg(short, long)]
    cache: bool,

    /// Apply an English stemmer to definitions
    #[arg(short, long)]
    stem: bool,

    /// Perform LSI with N topics
    #[arg(short, long, value_name = "N")]
    topics: Option<usize>,

    /// Print less info
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    let quiet = args.quiet;

    let paths = DataPaths::new(&args.data_dir);
    fs::create_dir_all(paths.out_dir())?;

    // read the dictionaries

    let defs = if args.cache {
        dictionary::read_cache(&paths, quiet)
    } else {
        let raw = dictionary::parse_lexica(&paths, &[Lang::Latin, Lang::Greek], quiet);
        let (defs, _) = dictionary::flatten(raw, quiet);
        dictionary::write_cache(&defs, &paths, quiet)?;
        defs
    };

    // convert to bags of words

    let (bags, _) = bow::bag_of_words(defs, args.stem, quiet);

    if !quiet {
        println!("{} lemmas still have definitions", bags.len());
    }

    // corpus plus the by-word and by-id lookup tables

    let (corpus, index) = corpus::build(&bags);
    index.save(&paths.lookup_word(), &paths.lookup_id(), quiet)?;

    // hand the corpus over to the modeling stage

    if !quiet {
        println!("Creating dictionary");
    }
    let vocab = Vocabulary::from_corpus(&corpus);
    if !quiet {
        println!("Saving dictionary as {}", paths.dictionary().display());
    }
    vocab.save(&paths.dictionary())?;

    let bows: Vec<model::SparseVec> = corpus.iter().map(|doc| vocab.doc_to_bow(doc)).collect();

    if !quiet {
        println!("Creating tf-idf model");
    }
    let tfidf = TfIdfModel::fit(&bows, vocab.len());
    let weighted = tfidf.weight_corpus(&bows);

    if !quiet {
        println!("Saving corpus as {}", paths.corpus_tfidf().display());
    }
    model::save_corpus(&weighted, &paths.corpus_tfidf())?;

    let corpus_final = match args.topics {
        Some(topics) if topics > 0 => {
            if !quiet {
                println!("Performing LSI with {} topics", topics);
            }
            let lsi = LsiModel::fit(&weighted, vocab.len(), topics);
            let reduced = lsi.project_corpus(&weighted);
            if !quiet {
                println!("Saving corpus as {}", paths.corpus_lsi().display());
            }
            model::save_corpus(&reduced, &paths.corpus_lsi())?;
            reduced
        }
        _ => weighted,
    };

    if !quiet {
        println!("Calculating similarities (please be patient)");
    }
    let sim = SimilarityIndex::build(corpus_final);

    if !quiet {
        println!("Saving similarity index {}", paths.similarity().display());
    }
    sim.save(&paths.similarity())?;

    if !quiet {
        println!();
        println!("============================================================");
        println!("Lemmas: {}", index.len());
        println!("Vocabulary: {} terms", vocab.len());
        println!("Documents indexed: {}", sim.len());
        println!("============================================================");
    }

    Ok(())
}
