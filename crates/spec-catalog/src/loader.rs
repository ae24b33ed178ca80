//! Concurrent document loading
//!
//! All fetches run concurrently and independently; nothing shared is written
//! while they are in flight. The outcome is re-ordered to the original
//! source-list order regardless of completion order.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use openapi_parser::{OpenApiParser, ParseError, SpecDocument};

use crate::error::{CatalogError, CatalogResult};
use crate::source::{Location, SpecSource};

/// Default per-fetch timeout; a source that exceeds it is marked unreachable
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Why a single source failed to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentErrorKind {
    /// The location could not be fetched (network/HTTP/file error or timeout)
    Unreachable,
    /// The body is not well-formed JSON or YAML
    MalformedSyntax,
    /// The body parsed but is not a valid OpenAPI 3.x document
    SchemaInvalid,
}

/// A per-source load failure. Collected, never fatal to the batch.
#[derive(Debug, Clone)]
pub struct DocumentError {
    pub source: SpecSource,
    pub kind: DocumentErrorKind,
    pub detail: String,
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:?}): {}", self.source.name, self.kind, self.detail)
    }
}

/// A successfully loaded document paired with its source
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub source: SpecSource,
    pub document: SpecDocument,
}

/// Result of loading a source list: documents in source order, plus the
/// per-source failures that did not abort the batch
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub documents: Vec<LoadedDocument>,
    pub errors: Vec<DocumentError>,
}

/// Fetches and parses spec sources
pub struct SpecLoader {
    client: reqwest::Client,
}

impl SpecLoader {
    /// Create a loader with the given per-fetch timeout
    pub fn new(timeout: Duration) -> CatalogResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Config(e.to_string()))?;

        Ok(Self { client })
    }

    /// Fetch and parse every source concurrently.
    ///
    /// Completion order is arbitrary; the outcome lists documents and errors
    /// in original source order. Loading identical inputs yields identical
    /// outcomes.
    pub async fn load(&self, sources: &[SpecSource]) -> LoadOutcome {
        let results = join_all(sources.iter().map(|s| self.load_one(s))).await;

        let mut outcome = LoadOutcome::default();
        // join_all preserves input order, so this zip restores source order
        for (source, result) in sources.iter().zip(results) {
            match result {
                Ok(document) => {
                    debug!(
                        source = %source.name,
                        "loaded '{}' with {} operations",
                        document.title,
                        document.operations.len()
                    );
                    outcome.documents.push(LoadedDocument {
                        source: source.clone(),
                        document,
                    });
                }
                Err(err) => {
                    warn!(source = %err.source.name, kind = ?err.kind, "failed to load spec: {}", err.detail);
                    outcome.errors.push(err);
                }
            }
        }

        info!(
            "loaded {} of {} spec sources",
            outcome.documents.len(),
            sources.len()
        );
        outcome
    }

    async fn load_one(&self, source: &SpecSource) -> Result<SpecDocument, DocumentError> {
        let body = self.fetch(source).await?;

        OpenApiParser::parse(&body).map_err(|e| DocumentError {
            source: source.clone(),
            kind: classify_parse_error(&e),
            detail: e.to_string(),
        })
    }

    async fn fetch(&self, source: &SpecSource) -> Result<String, DocumentError> {
        let unreachable = |detail: String| DocumentError {
            source: source.clone(),
            kind: DocumentErrorKind::Unreachable,
            detail,
        };

        match source.resolve_location() {
            Ok(Location::Http(url)) => {
                debug!(source = %source.name, "fetching {}", url);
                let response = self
                    .client
                    .get(url.clone())
                    .header("Accept", "application/json, application/yaml, text/yaml")
                    .send()
                    .await
                    .map_err(|e| unreachable(e.to_string()))?;

                if !response.status().is_success() {
                    return Err(unreachable(format!(
                        "HTTP {} from {}",
                        response.status(),
                        url
                    )));
                }

                response.text().await.map_err(|e| unreachable(e.to_string()))
            }
            Ok(Location::File(path)) => tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| unreachable(format!("{}: {}", path.display(), e))),
            Err(e) => Err(unreachable(e.to_string())),
        }
    }
}

fn classify_parse_error(err: &ParseError) -> DocumentErrorKind {
    match err {
        ParseError::Syntax(_) => DocumentErrorKind::MalformedSyntax,
        ParseError::Schema(_) | ParseError::UnsupportedVersion(_) => {
            DocumentErrorKind::SchemaInvalid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    const PETS_SPEC: &str = r#"
openapi: "3.0.0"
info:
  title: Pets
  version: "1.0"
paths:
  /pets:
    get:
      operationId: listPets
      responses:
        '200':
          description: ok
"#;

    fn write_spec(dir: &Path, file: &str, contents: &str) -> SpecSource {
        let path = dir.join(file);
        std::fs::write(&path, contents).unwrap();
        SpecSource::new(file.trim_end_matches(".yaml"), path.display().to_string())
    }

    #[tokio::test]
    async fn test_load_from_files() {
        let dir = TempDir::new().unwrap();
        let sources = vec![
            write_spec(dir.path(), "pets.yaml", PETS_SPEC),
            write_spec(dir.path(), "other.yaml", PETS_SPEC),
        ];

        let loader = SpecLoader::new(DEFAULT_FETCH_TIMEOUT).unwrap();
        let outcome = loader.load(&sources).await;

        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.documents.len(), 2);
        // Source order is preserved regardless of completion order
        assert_eq!(outcome.documents[0].source.name, "pets");
        assert_eq!(outcome.documents[1].source.name, "other");
    }

    #[tokio::test]
    async fn test_unreachable_source_does_not_abort_batch() {
        let dir = TempDir::new().unwrap();
        let sources = vec![
            write_spec(dir.path(), "a.yaml", PETS_SPEC),
            SpecSource::new("missing", dir.path().join("nope.yaml").display().to_string()),
            write_spec(dir.path(), "b.yaml", PETS_SPEC),
        ];

        let loader = SpecLoader::new(DEFAULT_FETCH_TIMEOUT).unwrap();
        let outcome = loader.load(&sources).await;

        assert_eq!(outcome.documents.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].source.name, "missing");
        assert_eq!(outcome.errors[0].kind, DocumentErrorKind::Unreachable);
    }

    #[tokio::test]
    async fn test_error_kinds_are_distinguished() {
        let dir = TempDir::new().unwrap();
        let sources = vec![
            write_spec(dir.path(), "garbage.yaml", "{not valid: [json or yaml"),
            write_spec(dir.path(), "not-openapi.yaml", "just: some mapping\n"),
            write_spec(
                dir.path(),
                "old.yaml",
                "openapi: \"2.0\"\ninfo:\n  title: Old\n  version: \"1\"\npaths: {}\n",
            ),
        ];

        let loader = SpecLoader::new(DEFAULT_FETCH_TIMEOUT).unwrap();
        let outcome = loader.load(&sources).await;

        assert!(outcome.documents.is_empty());
        let kinds: Vec<_> = outcome.errors.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DocumentErrorKind::MalformedSyntax,
                DocumentErrorKind::SchemaInvalid,
                DocumentErrorKind::SchemaInvalid,
            ]
        );
    }

    #[tokio::test]
    async fn test_load_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let sources = vec![write_spec(dir.path(), "pets.yaml", PETS_SPEC)];

        let loader = SpecLoader::new(DEFAULT_FETCH_TIMEOUT).unwrap();
        let first = loader.load(&sources).await;
        let second = loader.load(&sources).await;

        assert_eq!(first.documents.len(), second.documents.len());
        assert_eq!(
            first.documents[0].document.operations[0].operation_id,
            second.documents[0].document.operations[0].operation_id
        );
    }

    /// Bind a listener that accepts connections but never answers,
    /// to exercise the fetch timeout without touching the network
    async fn stalled_server() -> std::net::SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            loop {
                if let Ok((socket, _)) = listener.accept().await {
                    held.push(socket);
                }
            }
        });
        addr
    }

    #[tokio::test]
    async fn test_fetch_timeout_marks_source_unreachable() {
        let addr = stalled_server().await;
        let sources = vec![SpecSource::new(
            "stalled",
            format!("http://{}/openapi.yaml", addr),
        )];

        let loader = SpecLoader::new(Duration::from_millis(300)).unwrap();
        let outcome = loader.load(&sources).await;

        assert!(outcome.documents.is_empty());
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].kind, DocumentErrorKind::Unreachable);
    }

    #[tokio::test]
    async fn test_refused_connection_is_unreachable() {
        // Bind and drop immediately to get a local port with no listener
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let sources = vec![SpecSource::new(
            "nowhere",
            format!("http://{}/openapi.yaml", addr),
        )];

        let loader = SpecLoader::new(Duration::from_secs(5)).unwrap();
        let outcome = loader.load(&sources).await;

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].kind, DocumentErrorKind::Unreachable);
    }
}
