//! Orthographic standardization of headwords and tokens.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::betacode;

/// The two source lexica. Every language-specific rule in the crate
/// dispatches on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    Latin,
    Greek,
}

impl Lang {
    /// Short code used in source file names.
    pub fn code(self) -> &'static str {
        match self {
            Lang::Latin => "la",
            Lang::Greek => "grc",
        }
    }
}

lazy_static! {
    // Characters outside each language's permitted alphabet. Greek keeps
    // its own letter range and loses only the quantity marks the
    // transliterator passes through.
    static ref CLEAN_LA: Regex = Regex::new(r"[^a-z]").unwrap();
    static ref CLEAN_GRC: Regex = Regex::new(r"[\^_]").unwrap();
    static ref CLEAN_ANY: Regex = Regex::new(r"\W").unwrap();
}

/// Standardize the orthography of a Latin or Greek headword.
///
/// Latin folds the j/i and v/u manuscript variants; Greek converts the
/// alternate grave notation to acute and transliterates betacode. Both then
/// compose to NFC, lowercase, and strip everything outside the language's
/// alphabet. Total over any input; a fixed point on its own output.
pub fn standardize(lang: Lang, raw: &str) -> String {
    let folded = match lang {
        // Fold after lowercasing so re-normalizing output is a no-op.
        Lang::Latin => raw.to_lowercase().replace('j', "i").replace('v', "u"),
        Lang::Greek => betacode::beta_to_uni(&raw.replace('\\', "/")),
    };
    let strip = match lang {
        Lang::Latin => &*CLEAN_LA,
        Lang::Greek => &*CLEAN_GRC,
    };
    finish(&folded, strip)
}

/// Token-level variant applied to English definition words: NFC, lowercase,
/// strip all non-word characters.
pub fn standardize_token(raw: &str) -> String {
    finish(raw, &CLEAN_ANY)
}

fn finish(s: &str, strip: &Regex) -> String {
    let composed: String = s.nfc().collect();
    strip.replace_all(&composed.to_lowercase(), "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin_folds_v_to_u() {
        assert_eq!(standardize(Lang::Latin, "vir"), "uir");
    }

    #[test]
    fn latin_folds_j_to_i() {
        assert_eq!(standardize(Lang::Latin, "jus"), "ius");
        assert_eq!(standardize(Lang::Latin, "Jove"), "ioue");
    }

    #[test]
    fn latin_lowercases_and_strips() {
        assert_eq!(standardize(Lang::Latin, "Amor, -oris"), "amororis");
    }

    #[test]
    fn greek_transliterates_betacode() {
        assert_eq!(standardize(Lang::Greek, "lo/gos"), "λόγος");
    }

    #[test]
    fn greek_grave_notation_becomes_acute() {
        assert_eq!(standardize(Lang::Greek, r"pro\s"), "πρός");
    }

    #[test]
    fn greek_strips_quantity_marks() {
        assert_eq!(standardize(Lang::Greek, "mh^nis"), "μηνις");
    }

    #[test]
    fn token_variant_strips_punctuation() {
        assert_eq!(standardize_token("Fighting!"), "fighting");
        assert_eq!(standardize_token("don’t"), "dont");
    }

    #[test]
    fn standardize_is_idempotent() {
        for raw in ["vir", "Jove", "amor"] {
            let once = standardize(Lang::Latin, raw);
            assert_eq!(standardize(Lang::Latin, &once), once);
        }
        for raw in ["lo/gos", "e)/rws", "*zeu/s"] {
            let once = standardize(Lang::Greek, raw);
            assert_eq!(standardize(Lang::Greek, &once), once);
        }
        let once = standardize_token("Fighting!");
        assert_eq!(standardize_token(&once), once);
    }
}
