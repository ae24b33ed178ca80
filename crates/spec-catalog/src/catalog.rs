//! Catalog construction: component merging and operation lookup
//!
//! Building the catalog is the join point after all loads settle. Per-source
//! load errors ride along inside the catalog; a qualified-key collision is
//! fatal and fails the build.

use indexmap::IndexMap;
use serde_json::Value;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{debug, warn};

use openapi_parser::{ComponentName, HttpMethod, Operation, SpecDocument};

use crate::error::{CatalogError, CatalogResult};
use crate::loader::{DocumentError, LoadOutcome, LoadedDocument};

/// A component name scoped by its owning source; the unit of collision
/// detection in the merged namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedKey {
    pub source: String,
    pub component: ComponentName,
}

impl std::fmt::Display for QualifiedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.source, self.component)
    }
}

/// Non-fatal findings recorded while building the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogWarning {
    /// The same method+path appears in more than one document; lookups
    /// resolve to the winner (the earlier source)
    ShadowedRoute {
        method: HttpMethod,
        path: String,
        winner: String,
        shadowed: String,
    },
}

/// Outcome of an operation lookup. A miss is a value, not an absence.
#[derive(Debug, Clone, Copy)]
pub enum Lookup<'a> {
    Found {
        /// Name of the source the operation came from
        source: &'a str,
        operation: &'a Operation,
    },
    NotFound,
}

/// An ordered, queryable catalog of OpenAPI documents
#[derive(Debug, Clone)]
pub struct Catalog {
    documents: Vec<LoadedDocument>,
    components: IndexMap<QualifiedKey, Value>,
    errors: Vec<DocumentError>,
    warnings: Vec<CatalogWarning>,
}

impl Catalog {
    /// Merge loaded documents into a catalog.
    ///
    /// Documents stay in source order. Fails on the first qualified-key
    /// collision, naming both contributing sources.
    pub fn build(outcome: LoadOutcome) -> CatalogResult<Self> {
        let components = Self::merge_components(&outcome.documents)?;
        let warnings = Self::scan_shadowed_routes(&outcome.documents);

        debug!(
            "catalog built: {} documents, {} components, {} load errors, {} warnings",
            outcome.documents.len(),
            components.len(),
            outcome.errors.len(),
            warnings.len()
        );

        Ok(Self {
            documents: outcome.documents,
            components,
            errors: outcome.errors,
            warnings,
        })
    }

    fn merge_components(
        documents: &[LoadedDocument],
    ) -> CatalogResult<IndexMap<QualifiedKey, Value>> {
        let mut merged = IndexMap::new();
        // Tracks which location contributed each key, so a collision can
        // name both sides
        let mut contributors: HashMap<QualifiedKey, &str> = HashMap::new();

        for doc in documents {
            for (name, definition) in &doc.document.components {
                let key = QualifiedKey {
                    source: doc.source.name.clone(),
                    component: name.clone(),
                };
                if let Some(first) = contributors.get(&key) {
                    return Err(CatalogError::Collision {
                        first: (*first).to_string(),
                        second: doc.source.location.clone(),
                        key,
                    });
                }
                contributors.insert(key.clone(), doc.source.location.as_str());
                merged.insert(key, definition.clone());
            }
        }

        Ok(merged)
    }

    fn scan_shadowed_routes(documents: &[LoadedDocument]) -> Vec<CatalogWarning> {
        let mut first_seen: HashMap<(HttpMethod, &str), &str> = HashMap::new();
        let mut warnings = Vec::new();

        for doc in documents {
            for op in &doc.document.operations {
                match first_seen.entry((op.method, op.path.as_str())) {
                    Entry::Vacant(entry) => {
                        entry.insert(doc.source.name.as_str());
                    }
                    Entry::Occupied(entry) => {
                        warn!(
                            "route {} {} in '{}' is shadowed by '{}'",
                            op.method,
                            op.path,
                            doc.source.name,
                            entry.get()
                        );
                        warnings.push(CatalogWarning::ShadowedRoute {
                            method: op.method,
                            path: op.path.clone(),
                            winner: entry.get().to_string(),
                            shadowed: doc.source.name.clone(),
                        });
                    }
                }
            }
        }

        warnings
    }

    /// Documents in original source order
    pub fn documents(&self) -> &[LoadedDocument] {
        &self.documents
    }

    /// Look up a document by source name
    pub fn document(&self, name: &str) -> Option<&SpecDocument> {
        self.documents
            .iter()
            .find(|d| d.source.name == name)
            .map(|d| &d.document)
    }

    /// The merged component namespace, in source order
    pub fn components(&self) -> &IndexMap<QualifiedKey, Value> {
        &self.components
    }

    /// Per-source load errors carried through from loading
    pub fn errors(&self) -> &[DocumentError] {
        &self.errors
    }

    /// Warnings recorded during the merge
    pub fn warnings(&self) -> &[CatalogWarning] {
        &self.warnings
    }

    /// Find an operation by method and path across all documents.
    ///
    /// Ties resolve to the earliest source; the shadowed duplicates were
    /// recorded as [`CatalogWarning::ShadowedRoute`] at build time.
    pub fn find_operation(&self, method: HttpMethod, path: &str) -> Lookup<'_> {
        for doc in &self.documents {
            if let Some(op) = doc
                .document
                .operations
                .iter()
                .find(|op| op.method == method && op.path == path)
            {
                return Lookup::Found {
                    source: &doc.source.name,
                    operation: op,
                };
            }
        }
        Lookup::NotFound
    }
}
