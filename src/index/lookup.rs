//! Query operations over a loaded [`SearchIndex`].

use super::normalize;
use super::store::{Document, SearchIndex};
use ahash::AHashMap;
use rapidfuzz::distance::jaro_winkler;
use rust_stemmers::Stemmer;

/// Similarity floor for [`SearchIndex::suggest`].
const SUGGEST_CUTOFF: f64 = 0.7;

/// A matched document with its relevance score.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub doc: &'a Document,
    pub score: u32,
}

impl SearchIndex {
    /// Returns the documents mentioning `term`, best first.
    ///
    /// The term is case-folded and its stemmed form is probed as well; per
    /// document the higher weight wins. Results are ordered by descending
    /// score, ties broken by docname. An unknown, empty, or whitespace-only
    /// term yields an empty vector; lookups never fail.
    pub fn lookup(&self, term: &str) -> Vec<Hit<'_>> {
        let stemmer = self.query_stemmer();
        self.collect(self.term_scores(term, stemmer.as_ref()))
    }

    /// Returns the documents mentioning every whitespace-separated word of
    /// `query`, scored by summed weights.
    pub fn search(&self, query: &str) -> Vec<Hit<'_>> {
        let stemmer = self.query_stemmer();
        let mut combined: Option<AHashMap<u32, u32>> = None;

        for word in query.split_whitespace() {
            let scores = self.term_scores(word, stemmer.as_ref());
            if scores.is_empty() {
                return vec![];
            }
            combined = Some(match combined {
                None => scores,
                Some(previous) => {
                    // AND semantics: keep documents matched by every word.
                    let mut next = AHashMap::new();
                    for (doc, score) in scores {
                        if let Some(prior) = previous.get(&doc) {
                            next.insert(doc, prior + score);
                        }
                    }
                    if next.is_empty() {
                        return vec![];
                    }
                    next
                }
            });
        }

        self.collect(combined.unwrap_or_default())
    }

    /// Suggests index terms similar to a query term that matched nothing.
    ///
    /// Ordered by descending Jaro-Winkler similarity, ties broken
    /// alphabetically; at most `limit` entries.
    pub fn suggest(&self, term: &str, limit: usize) -> Vec<&str> {
        let folded = normalize::fold(term);
        if folded.is_empty() || limit == 0 {
            return vec![];
        }

        let mut scored: Vec<(&str, f64)> = self
            .data
            .terms
            .keys()
            .filter_map(|candidate| {
                let score = jaro_winkler::similarity(folded.chars(), candidate.chars());
                (score >= SUGGEST_CUTOFF).then_some((candidate.as_str(), score))
            })
            .collect();

        scored.sort_by(|(a, sa), (b, sb)| sb.total_cmp(sa).then_with(|| a.cmp(b)));
        scored.into_iter().take(limit).map(|(term, _)| term).collect()
    }

    fn query_stemmer(&self) -> Option<Stemmer> {
        self.stemmer.clone().map(Stemmer::create)
    }

    /// Per-document scores for a single query term.
    fn term_scores(&self, term: &str, stemmer: Option<&Stemmer>) -> AHashMap<u32, u32> {
        let mut scores: AHashMap<u32, u32> = AHashMap::new();
        for key in normalize::candidates(term, stemmer) {
            if let Some(postings) = self.data.terms.get(&key) {
                for posting in postings {
                    let score = posting.weight.score();
                    scores
                        .entry(posting.doc)
                        .and_modify(|existing| *existing = (*existing).max(score))
                        .or_insert(score);
                }
            }
        }
        scores
    }

    fn collect(&self, scores: AHashMap<u32, u32>) -> Vec<Hit<'_>> {
        let mut hits: Vec<Hit<'_>> = scores
            .into_iter()
            .map(|(doc, score)| Hit {
                doc: &self.data.docs[doc as usize],
                score,
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.doc.docname().cmp(b.doc.docname()))
        });
        hits
    }
}
