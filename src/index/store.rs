//! Immutable index and title stores built from a parsed artifact.

use crate::artifact::{self, DocRefs, RawIndex};
use crate::cache;
use crate::error::LoadError;
use crate::title::TitleParser;
use ahash::AHashMap;
use rust_stemmers::Algorithm;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use xxhash_rust::xxh3::xxh3_64;

/// A document known to the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    docname: String,
    filename: Option<String>,
    title: String,
    section: Option<Vec<u32>>,
}

impl Document {
    /// Extension-less document identifier, e.g. `content/preface`.
    pub fn docname(&self) -> &str {
        &self.docname
    }

    /// Source filename, e.g. `content/preface.md`, when the artifact carries one.
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Display title with generated markup stripped.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Section ordinal parsed from the generated title, e.g. `[2]` or `[1, 4, 2]`.
    pub fn section(&self) -> Option<&[u32]> {
        self.section.as_deref()
    }
}

/// Where a term occurred in a document. `Title` outranks `Body`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TermWeight {
    Body,
    Title,
}

impl TermWeight {
    /// Relevance contribution of one occurrence.
    pub const fn score(self) -> u32 {
        match self {
            Self::Body => 1,
            Self::Title => 2,
        }
    }
}

/// One term-to-document association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Posting {
    pub(crate) doc: u32,
    pub(crate) weight: TermWeight,
}

/// The serializable stores: documents plus term postings.
///
/// Term keys are case-folded at build time; postings are sorted by descending
/// weight, then docname, so query results come out in final order.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct IndexData {
    pub(crate) docs: Vec<Document>,
    pub(crate) terms: AHashMap<String, Vec<Posting>>,
}

/// Load-time configuration.
///
/// Replaces the generator's global-object-literal initialization with an
/// explicit immutable value passed once at load.
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Stemmer applied to query terms. Must match the generator's language;
    /// `None` disables stemming and matches folded literals only.
    pub stemmer: Option<Algorithm>,
    /// Optional path for a binary cache of the built stores.
    pub cache: Option<PathBuf>,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            stemmer: Some(Algorithm::English),
            cache: None,
        }
    }
}

/// An immutable search index loaded from a generated artifact.
///
/// Loading is the only fallible operation; afterwards the index answers
/// arbitrarily many concurrent queries through `&self` with no coordination.
pub struct SearchIndex {
    pub(crate) data: IndexData,
    pub(crate) stemmer: Option<Algorithm>,
}

impl SearchIndex {
    /// Loads an index from an artifact file with default options.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::load_with(path, &IndexOptions::default())
    }

    /// Loads an index from an artifact file.
    ///
    /// When `options.cache` is set, a fingerprinted binary cache is consulted
    /// first and refreshed after a full parse. Cache trouble is logged and
    /// ignored; artifact trouble is fatal.
    pub fn load_with(path: impl AsRef<Path>, options: &IndexOptions) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let data = match &options.cache {
            Some(cache_path) => {
                let fingerprint = xxh3_64(text.as_bytes());
                if let Some(data) = cache::load(cache_path, fingerprint) {
                    data
                } else {
                    let data = parse_and_build(&text)?;
                    cache::store(cache_path, fingerprint, &data);
                    data
                }
            }
            None => parse_and_build(&text)?,
        };

        tracing::info!(
            path = %path.display(),
            docs = data.docs.len(),
            terms = data.terms.len(),
            "loaded search index"
        );

        Ok(Self {
            data,
            stemmer: options.stemmer.clone(),
        })
    }

    /// Builds an index from in-memory artifact text.
    pub fn from_source(text: &str, options: &IndexOptions) -> Result<Self, LoadError> {
        Ok(Self {
            data: parse_and_build(text)?,
            stemmer: options.stemmer.clone(),
        })
    }

    /// Number of documents in the Title Store.
    pub fn doc_count(&self) -> usize {
        self.data.docs.len()
    }

    /// Number of distinct (folded) terms with at least one posting.
    pub fn term_count(&self) -> usize {
        self.data.terms.len()
    }

    /// All documents, in artifact order.
    pub fn documents(&self) -> &[Document] {
        &self.data.docs
    }

    /// Looks up a document by its docname.
    pub fn document(&self, docname: &str) -> Option<&Document> {
        self.data.docs.iter().find(|doc| doc.docname == docname)
    }
}

fn parse_and_build(text: &str) -> Result<IndexData, LoadError> {
    let start = Instant::now();
    let raw = artifact::parse(text)?;
    if let Some(envversion) = &raw.envversion {
        tracing::debug!(%envversion, "generator environment metadata");
    }
    let data = build(raw)?;
    tracing::debug!(elapsed = ?start.elapsed(), "built index stores");
    Ok(data)
}

/// Validates the raw artifact and builds the immutable stores.
fn build(raw: RawIndex) -> Result<IndexData, LoadError> {
    let doc_count = raw.docnames.len();
    if raw.titles.len() != doc_count {
        return Err(LoadError::LengthMismatch {
            field: "titles",
            expected: doc_count,
            actual: raw.titles.len(),
        });
    }
    if !raw.filenames.is_empty() && raw.filenames.len() != doc_count {
        return Err(LoadError::LengthMismatch {
            field: "filenames",
            expected: doc_count,
            actual: raw.filenames.len(),
        });
    }

    let parser = TitleParser::new();
    let mut filenames = raw.filenames.into_iter().map(Some).chain(std::iter::repeat(None));
    let docs: Vec<Document> = raw
        .docnames
        .into_iter()
        .zip(raw.titles)
        .map(|(docname, raw_title)| {
            let parsed = parser.parse(&raw_title);
            Document {
                docname,
                filename: filenames.next().flatten(),
                title: parsed.text,
                section: parsed.section,
            }
        })
        .collect();

    // Fold term keys and merge body/title postings, title weight winning.
    let mut merged: AHashMap<String, AHashMap<u32, TermWeight>> = AHashMap::new();
    let mut add = |term: String, refs: DocRefs, weight: TermWeight| -> Result<(), LoadError> {
        let mut postings = AHashMap::new();
        for doc_ref in refs.iter() {
            if doc_ref >= doc_count {
                return Err(LoadError::DanglingDocRef {
                    term,
                    doc_ref,
                    doc_count,
                });
            }
            postings.insert(doc_ref as u32, weight);
        }
        let entry = merged.entry(term.to_lowercase()).or_default();
        for (doc, weight) in postings {
            entry
                .entry(doc)
                .and_modify(|existing| *existing = (*existing).max(weight))
                .or_insert(weight);
        }
        Ok(())
    };

    for (term, refs) in raw.terms {
        add(term, refs, TermWeight::Body)?;
    }
    for (term, refs) in raw.titleterms {
        add(term, refs, TermWeight::Title)?;
    }

    // Terms the generator pruned down to zero postings are not present.
    let terms = merged
        .into_iter()
        .filter(|(_, postings)| !postings.is_empty())
        .map(|(term, postings)| {
            let mut postings: Vec<Posting> = postings
                .into_iter()
                .map(|(doc, weight)| Posting { doc, weight })
                .collect();
            postings.sort_by(|a, b| {
                b.weight.cmp(&a.weight).then_with(|| {
                    docs[a.doc as usize]
                        .docname
                        .cmp(&docs[b.doc as usize].docname)
                })
            });
            (term, postings)
        })
        .collect();

    Ok(IndexData { docs, terms })
}
