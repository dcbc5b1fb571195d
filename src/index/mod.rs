//! Immutable search-index stores and the lookup service over them.

// Module declarations
pub(crate) mod lookup;
pub(crate) mod normalize;
pub(crate) mod store;

// Public re-exports (used via lib.rs)
pub use lookup::Hit;
pub use store::{Document, IndexOptions, SearchIndex, TermWeight};
