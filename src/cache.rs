//! Binary caching of built index stores.
//!
//! The cache file holds a postcard-encoded envelope: an xxh3 fingerprint of
//! the artifact bytes plus the built stores. A fingerprint mismatch means the
//! artifact changed and the cache is discarded. Cache failures are never
//! fatal; the artifact is simply reparsed.

use crate::error::Result;
use crate::index::store::IndexData;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Deserialize)]
struct Envelope {
    fingerprint: u64,
    data: IndexData,
}

// Borrowing twin of `Envelope` for writing; postcard encodes both identically.
#[derive(Serialize)]
struct EnvelopeRef<'a> {
    fingerprint: u64,
    data: &'a IndexData,
}

/// Loads cached stores if the cache matches the artifact fingerprint.
pub(crate) fn load(path: &Path, fingerprint: u64) -> Option<IndexData> {
    let bytes = fs::read(path).ok()?;
    match postcard::from_bytes::<Envelope>(&bytes) {
        Ok(envelope) if envelope.fingerprint == fingerprint => {
            // The cache bypasses build-time validation, so the in-range
            // invariant on postings must be re-checked before queries index
            // into the document table.
            if !postings_in_range(&envelope.data) {
                tracing::warn!(
                    path = %path.display(),
                    "cache references unknown documents, will rebuild"
                );
                let _ = fs::remove_file(path);
                return None;
            }
            tracing::debug!(path = %path.display(), "using cached index");
            Some(envelope.data)
        }
        Ok(_) => {
            tracing::debug!(path = %path.display(), "cache stale, will rebuild");
            let _ = fs::remove_file(path);
            None
        }
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "unreadable cache, will rebuild");
            let _ = fs::remove_file(path);
            None
        }
    }
}

/// Stores built stores to the cache path. Failure is logged, not propagated.
pub(crate) fn store(path: &Path, fingerprint: u64, data: &IndexData) {
    match try_store(path, fingerprint, data) {
        Ok(()) => tracing::debug!(path = %path.display(), "cached index"),
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "failed to cache index");
        }
    }
}

/// Checks that every posting references a document in the table.
fn postings_in_range(data: &IndexData) -> bool {
    let doc_count = data.docs.len();
    data.terms
        .values()
        .flatten()
        .all(|posting| (posting.doc as usize) < doc_count)
}

fn try_store(path: &Path, fingerprint: u64, data: &IndexData) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating cache directory {}", parent.display()))?;
    }
    let bytes = postcard::to_stdvec(&EnvelopeRef { fingerprint, data })
        .context("serializing index cache")?;
    fs::write(path, bytes).with_context(|| format!("writing cache to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::store::Posting;
    use crate::index::{IndexOptions, SearchIndex, TermWeight};
    use assert2::check;
    use std::path::PathBuf;

    fn sample_data() -> IndexData {
        SearchIndex::from_source(
            r#"{"docnames":["a"],"titles":["A"],"terms":{"x":0}}"#,
            &IndexOptions::default(),
        )
        .unwrap()
        .data
    }

    fn cache_file(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("index.cache")
    }

    #[test]
    fn roundtrips_on_matching_fingerprint() {
        let dir = tempfile::tempdir().unwrap();
        let path = cache_file(&dir);
        store(&path, 42, &sample_data());
        let data = load(&path, 42).unwrap();
        check!(data.docs.len() == 1);
        check!(data.terms.contains_key("x"));
    }

    #[test]
    fn mismatched_fingerprint_discards_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = cache_file(&dir);
        store(&path, 42, &sample_data());
        check!(load(&path, 7).is_none());
        check!(!path.exists());
    }

    #[test]
    fn out_of_range_postings_discard_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = cache_file(&dir);

        // A cache whose postings point past the document table must not
        // reach query code, even with a matching fingerprint.
        let mut data = sample_data();
        data.terms.insert(
            "ghost".to_string(),
            vec![Posting {
                doc: 5,
                weight: TermWeight::Body,
            }],
        );
        store(&path, 42, &data);

        check!(load(&path, 42).is_none());
        check!(!path.exists());
    }
}
