//! # spec-catalog
//!
//! Aggregates a configured, ordered list of named OpenAPI documents into a
//! single browsable catalog:
//! - concurrent loading with per-source failure collection
//! - component-namespace merging with collision detection
//! - operation lookup across documents, earliest source winning
//!
//! Rendering, navigation and deep-linking belong to the consuming viewer;
//! the catalog only models the documents.

mod catalog;
mod error;
mod loader;
mod source;

pub use catalog::{Catalog, CatalogWarning, Lookup, QualifiedKey};
pub use error::{CatalogError, CatalogResult};
pub use loader::{
    DocumentError, DocumentErrorKind, LoadOutcome, LoadedDocument, SpecLoader,
    DEFAULT_FETCH_TIMEOUT,
};
pub use source::{CatalogConfig, Location, SpecSource};

/// Load every configured source and build the catalog.
///
/// Per-source failures are carried inside the catalog; only a component
/// collision (or an invalid loader setup) fails the whole call.
pub async fn load_catalog(config: &CatalogConfig) -> CatalogResult<Catalog> {
    let loader = SpecLoader::new(config.fetch_timeout)?;
    let outcome = loader.load(&config.sources).await;
    Catalog::build(outcome)
}
