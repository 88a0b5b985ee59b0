//! Entry extraction from the Perseus lexicon dumps.
//!
//! A lexicon is streamed as a sequence of `<entryFree>` units delimited by
//! their markers, so entries reformatted across physical lines still come
//! out whole. Units that do not match the expected structure contribute
//! nothing; only a source that cannot be read at all is an error.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use bzip2::read::BzDecoder;
use indicatif::ProgressBar;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::betacode;
use crate::normalize::{self, Lang};

const ENTRY_OPEN: &str = "<entryFree";
const ENTRY_CLOSE: &str = "</entryFree>";

lazy_static! {
    /// One lexicon entry: the key attribute and the element body.
    static ref ENTRY: Regex =
        Regex::new(r#"(?s)<entryFree [^>]*key="(.+?)"[^>]*>(.+?)</entryFree>"#).unwrap();

    /// Element spans that must never leak into definition text: citations,
    /// bibliography, lemma forms, etymology, and the grammatical apparatus.
    static ref STOPLIST: Vec<Regex> = [
        r"(?s)<cit>.*?</cit>",
        r"(?s)<bibl .+?>.*?</bibl>",
        r"(?s)<orth .+?>.*?</orth>",
        r"(?s)<etym .+?>.*?</etym>",
        r"(?s)<itype .+?>.*?</itype>",
        r"(?s)<pos .+?>.*?</pos>",
        r"(?s)<number .+?>.*?</number>",
        r"(?s)<gen .+?>.*?</gen>",
        r"(?s)<mood .+?>.*?</mood>",
        r"(?s)<case .+?>.*?</case>",
        r"(?s)<tns .+?>.*?</tns>",
        r"(?s)<per .+?>.*?</per>",
        r"(?s)<pron .+?>.*?</pron>",
        r"(?s)<date>.*?</date>",
        r"(?s)<usg .+?>.*?</usg>",
        r"(?s)<gramGrp .+?>.*?</gramGrp>",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    /// Embedded betacode Greek. Both lexica use this marker for Greek and
    /// for nothing else inside definitions.
    static ref FOREIGN: Regex =
        Regex::new(r#"(?s)<foreign lang="greek">(.+?)</foreign>"#).unwrap();

    // The spans structurally marked as English translations of the
    // headword: italicized phrases in Lewis & Short, a dedicated
    // translation tag in Liddell-Scott-Jones.
    static ref DEFINITION_LA: Regex =
        Regex::new(r#"(?s)<hi [^>]*rend="ital"[^>]*>(.+?)</hi>"#).unwrap();
    static ref DEFINITION_GRC: Regex = Regex::new(r"(?s)<tr\b[^>]*>(.+?)</tr>").unwrap();
}

fn definition_pattern(lang: Lang) -> &'static Regex {
    match lang {
        Lang::Latin => &DEFINITION_LA,
        Lang::Greek => &DEFINITION_GRC,
    }
}

/// Open a lexicon as a buffered reader, decompressing `.bz2` transparently.
pub fn open_lexicon(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    let reader: Box<dyn BufRead> = if path.to_string_lossy().ends_with(".bz2") {
        Box::new(BufReader::with_capacity(256 * 1024, BzDecoder::new(file)))
    } else {
        Box::new(BufReader::with_capacity(256 * 1024, file))
    };
    Ok(reader)
}

/// Stream complete `<entryFree>` units out of a lexicon, advancing `pb` by
/// the bytes consumed. Text between units, and a truncated unit at end of
/// input, are discarded silently.
pub fn scan_entries(
    mut reader: impl BufRead,
    pb: &ProgressBar,
    mut callback: impl FnMut(&str),
) -> io::Result<()> {
    let mut buffer = String::new();
    let mut chunk = vec![0u8; 1024 * 1024];

    loop {
        let bytes_read = reader.read(&mut chunk)?;
        if bytes_read == 0 {
            break;
        }
        pb.inc(bytes_read as u64);
        buffer.push_str(&String::from_utf8_lossy(&chunk[..bytes_read]));

        while let Some(start) = buffer.find(ENTRY_OPEN) {
            if let Some(end_offset) = buffer[start..].find(ENTRY_CLOSE) {
                let end = start + end_offset + ENTRY_CLOSE.len();
                let unit = buffer[start..end].to_string();
                buffer.drain(..end);
                callback(&unit);
            } else {
                // Opening marker without its close yet; wait for more data.
                buffer.drain(..start);
                break;
            }
        }

        // Keep only a tail that could still begin an opening marker.
        if !buffer.contains(ENTRY_OPEN) {
            match buffer.rfind('<') {
                Some(tail) => {
                    buffer.drain(..tail);
                }
                None => buffer.clear(),
            }
        }
    }

    Ok(())
}

/// Parse one unit into a standardized headword and its raw definition
/// fragments. Returns `None` when the unit does not match the entry
/// structure; the fragment list may be empty.
pub fn parse_entry(lang: Lang, unit: &str) -> Option<(String, Vec<String>)> {
    let caps = ENTRY.captures(unit)?;

    let mut body = caps[2].to_string();
    for stop in STOPLIST.iter() {
        body = stop.replace_all(&body, "").into_owned();
    }

    // Transliterate embedded Greek in place, before definition extraction,
    // so definitions quoting Greek read correctly.
    let body = FOREIGN.replace_all(&body, |m: &Captures| betacode::beta_to_uni(&m[1]));

    let lemma = normalize::standardize(lang, &caps[1]);

    let fragments: Vec<String> = definition_pattern(lang)
        .captures_iter(&body)
        .map(|c| c[1].to_string())
        .filter(|d| !d.trim().is_empty())
        .collect();

    Some((lemma, fragments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn units_of(input: &str) -> Vec<String> {
        let pb = ProgressBar::hidden();
        let mut units = Vec::new();
        scan_entries(Cursor::new(input), &pb, |u| units.push(u.to_string())).unwrap();
        units
    }

    #[test]
    fn latin_entry_keeps_only_italic_spans() {
        let unit = concat!(
            r#"<entryFree id="n2871" key="amor" type="main">"#,
            r#"<orth extent="full">ămor</orth>, <itype opt="n">ōris</itype>, "#,
            r#"<gen opt="n">m.</gen> <etym opt="n">amo</etym>, "#,
            r#"<hi rend="ital">love</hi>, "#,
            r#"<cit><quote>amor patriae</quote><bibl n="Cic.">Cic.</bibl></cit>"#,
            r#"</entryFree>"#
        );
        let (lemma, fragments) = parse_entry(Lang::Latin, unit).unwrap();
        assert_eq!(lemma, "amor");
        assert_eq!(fragments, vec!["love"]);
    }

    #[test]
    fn greek_entry_uses_translation_spans() {
        let unit = r#"<entryFree key="lo/gos"><tr>word</tr>, <tr opt="n">speech</tr></entryFree>"#;
        let (lemma, fragments) = parse_entry(Lang::Greek, unit).unwrap();
        assert_eq!(lemma, "λόγος");
        assert_eq!(fragments, vec!["word", "speech"]);
    }

    #[test]
    fn embedded_greek_is_transliterated_inside_definitions() {
        let unit = concat!(
            r#"<entryFree key="amor">"#,
            r#"<hi rend="ital">love, answering to <foreign lang="greek">e)/rws</foreign></hi>"#,
            r#"</entryFree>"#
        );
        let (_, fragments) = parse_entry(Lang::Latin, unit).unwrap();
        assert_eq!(fragments, vec!["love, answering to ἔρως"]);
    }

    #[test]
    fn whitespace_only_fragments_are_dropped() {
        let unit = r#"<entryFree key="amor"><hi rend="ital">   </hi></entryFree>"#;
        let (lemma, fragments) = parse_entry(Lang::Latin, unit).unwrap();
        assert_eq!(lemma, "amor");
        assert!(fragments.is_empty());
    }

    #[test]
    fn malformed_units_are_skipped() {
        assert!(parse_entry(Lang::Latin, "<div1>prefatory matter</div1>").is_none());
        assert!(parse_entry(Lang::Latin, "<entryFree >no key here</entryFree>").is_none());
    }

    #[test]
    fn scanner_finds_units_between_noise() {
        let input = concat!(
            "<?xml version=\"1.0\"?>\n<body>\n",
            "<entryFree key=\"a\"><hi rend=\"ital\">x</hi></entryFree>\n",
            "noise noise\n",
            "<entryFree key=\"b\"><hi rend=\"ital\">y</hi></entryFree>\n",
            "</body>\n"
        );
        let units = units_of(input);
        assert_eq!(units.len(), 2);
        assert!(units[0].contains("key=\"a\""));
        assert!(units[1].contains("key=\"b\""));
    }

    #[test]
    fn scanner_recovers_entries_spanning_lines() {
        let input = "<entryFree key=\"a\">\n  <hi rend=\"ital\">split\nacross lines</hi>\n</entryFree>";
        let units = units_of(input);
        assert_eq!(units.len(), 1);
        let (lemma, fragments) = parse_entry(Lang::Latin, &units[0]).unwrap();
        assert_eq!(lemma, "a");
        assert_eq!(fragments, vec!["split\nacross lines"]);
    }

    #[test]
    fn truncated_trailing_unit_is_dropped() {
        let input = "<entryFree key=\"a\"><hi rend=\"ital\">x</hi></entryFree><entryFree key=\"b\">never closed";
        let units = units_of(input);
        assert_eq!(units.len(), 1);
    }

    #[test]
    fn stoplist_spans_are_removed_everywhere() {
        let unit = concat!(
            r#"<entryFree key="k">"#,
            r#"<pos opt="n">adj.</pos><gen opt="n">f.</gen>"#,
            r#"<hi rend="ital">first</hi>"#,
            r#"<usg type="style">poet.</usg><date>1850</date>"#,
            r#"<hi rend="ital">second</hi>"#,
            r#"</entryFree>"#
        );
        let (_, fragments) = parse_entry(Lang::Latin, unit).unwrap();
        assert_eq!(fragments, vec!["first", "second"]);
    }
}
