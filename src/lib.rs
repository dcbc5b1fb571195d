//! Read-only lookup over generated documentation-site search indexes.
//!
//! A documentation generator emits a `searchindex.js` artifact mapping
//! pre-normalized terms to the documents containing them, alongside document
//! titles and section numbering. This crate loads that artifact once into
//! immutable stores and answers term queries against them:
//!
//! ```no_run
//! use searchindex::SearchIndex;
//!
//! # fn main() -> Result<(), searchindex::LoadError> {
//! let index = SearchIndex::load("_build/html/searchindex.js")?;
//! for hit in index.lookup("rudaux") {
//!     println!("{}: {}", hit.doc.docname(), hit.doc.title());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Malformed artifacts fail loading outright; queries over a loaded index
//! never fail, an unmatched term just returns no hits.

mod artifact;
mod cache;
pub mod error;
pub mod index;
mod title;
pub mod tracing;

pub use error::{LoadError, Result};
pub use index::{Document, Hit, IndexOptions, SearchIndex, TermWeight};
pub use rust_stemmers::Algorithm;
