//! Query term normalization.
//!
//! Index terms are already normalized by the generator: case-folded and run
//! through a Snowball stemmer, except acronyms and proper nouns which survive
//! as-is. Queries therefore probe both the folded literal and its stem.

use rust_stemmers::Stemmer;

/// Case-folds a query term.
pub(crate) fn fold(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Index keys a query term may be stored under.
///
/// Returns the folded literal plus the stemmed form when it differs, so
/// `"running"` probes `run` and `"AWS"` still finds the unstemmed `aws` key.
/// An empty or whitespace-only term yields no candidates.
pub(crate) fn candidates(term: &str, stemmer: Option<&Stemmer>) -> Vec<String> {
    let folded = fold(term);
    if folded.is_empty() {
        return vec![];
    }

    let mut keys = vec![folded];
    if let Some(stemmer) = stemmer {
        let stemmed = stemmer.stem(&keys[0]).into_owned();
        if stemmed != keys[0] {
            keys.push(stemmed);
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;
    use rust_stemmers::Algorithm;

    #[rstest]
    #[case("Running", &["running", "run"])]
    #[case("AWS", &["aws", "aw"])]
    #[case("run", &["run"])]
    #[case("  Course ", &["course", "cours"])]
    fn stemmed_candidates(#[case] term: &str, #[case] expected: &[&str]) {
        let stemmer = Stemmer::create(Algorithm::English);
        let keys = candidates(term, Some(&stemmer));
        check!(keys == expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\n\t")]
    fn blank_terms_have_no_candidates(#[case] term: &str) {
        let stemmer = Stemmer::create(Algorithm::English);
        check!(candidates(term, Some(&stemmer)).is_empty());
    }

    #[test]
    fn no_stemmer_folds_only() {
        check!(candidates("Running", None) == ["running"]);
    }
}
