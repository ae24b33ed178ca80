//! Spec sources and catalog configuration
//!
//! The config file keeps the shape of the original portal config: a YAML
//! list of `{name, url}` entries, optionally wrapped in an object that also
//! carries loader options.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::{CatalogError, CatalogResult};
use crate::loader::DEFAULT_FETCH_TIMEOUT;

/// A named OpenAPI document location, immutable and supplied at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecSource {
    /// Display name, also the scope of the source's component keys
    pub name: String,
    /// Where to fetch the document from: http(s), file://, or a bare path
    #[serde(rename = "url")]
    pub location: String,
}

impl SpecSource {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }

    /// Classify the location. Bare paths and file:// URLs are local files;
    /// anything with a scheme other than http(s)/file is rejected.
    pub fn resolve_location(&self) -> CatalogResult<Location> {
        match Url::parse(&self.location) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
                Ok(Location::Http(url))
            }
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(Location::File)
                .map_err(|_| CatalogError::UnsupportedLocation(self.location.clone())),
            Ok(url) => Err(CatalogError::UnsupportedLocation(format!(
                "{} (scheme '{}')",
                self.location,
                url.scheme()
            ))),
            // Relative-URL parse errors mean a plain filesystem path
            Err(_) => Ok(Location::File(PathBuf::from(&self.location))),
        }
    }
}

/// Resolved location kind for a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Http(Url),
    File(PathBuf),
}

/// Catalog configuration with enumerated options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Ordered list of sources; catalog order follows this list
    pub sources: Vec<SpecSource>,
    /// Per-fetch timeout, after which a source is marked unreachable
    pub fetch_timeout: Duration,
}

// The file is either the original bare list of sources, or an object with
// an `urls` list plus options.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawConfig {
    List(Vec<SpecSource>),
    Full {
        #[serde(default)]
        urls: Vec<SpecSource>,
        #[serde(rename = "timeoutSecs")]
        timeout_secs: Option<u64>,
    },
}

impl CatalogConfig {
    /// Build a config from a source list, with the default fetch timeout
    pub fn new(sources: Vec<SpecSource>) -> CatalogResult<Self> {
        let config = Self {
            sources,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn from_file(path: &Path) -> CatalogResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&contents)?;
        debug!("loaded {} sources from {:?}", config.sources.len(), path);
        Ok(config)
    }

    /// Parse and validate config YAML
    pub fn from_yaml(contents: &str) -> CatalogResult<Self> {
        let raw: RawConfig = serde_yaml::from_str(contents)?;
        let (sources, timeout_secs) = match raw {
            RawConfig::List(sources) => (sources, None),
            RawConfig::Full { urls, timeout_secs } => (urls, timeout_secs),
        };

        let config = Self {
            sources,
            fetch_timeout: timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_FETCH_TIMEOUT),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configs that could never produce a well-formed catalog:
    /// empty/duplicate names and unsupported locations.
    fn validate(&self) -> CatalogResult<()> {
        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(CatalogError::Config(format!(
                    "source with location '{}' has an empty name",
                    source.location
                )));
            }
            // A duplicate name would alias two documents' component scopes
            if !seen.insert(source.name.as_str()) {
                return Err(CatalogError::DuplicateSourceName(source.name.clone()));
            }
            source.resolve_location()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_list_config() {
        let yaml = r#"
- name: grader
  url: https://api.example.com/grader.yaml
- name: panel
  url: specs/panel.yaml
"#;
        let config = CatalogConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[0].name, "grader");
        assert_eq!(config.fetch_timeout, DEFAULT_FETCH_TIMEOUT);
    }

    #[test]
    fn test_object_config_with_timeout() {
        let yaml = r#"
urls:
  - name: grader
    url: https://api.example.com/grader.yaml
timeoutSecs: 5
"#;
        let config = CatalogConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let yaml = r#"
- name: grader
  url: a.yaml
- name: grader
  url: b.yaml
"#;
        let err = CatalogConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateSourceName(name) if name == "grader"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let sources = vec![SpecSource::new("", "a.yaml")];
        assert!(matches!(
            CatalogConfig::new(sources),
            Err(CatalogError::Config(_))
        ));
    }

    #[test]
    fn test_unknown_scheme_rejected() {
        let sources = vec![SpecSource::new("ftp", "ftp://example.com/spec.yaml")];
        assert!(matches!(
            CatalogConfig::new(sources),
            Err(CatalogError::UnsupportedLocation(_))
        ));
    }

    #[test]
    fn test_location_classification() {
        let http = SpecSource::new("a", "https://example.com/spec.yaml");
        assert!(matches!(http.resolve_location().unwrap(), Location::Http(_)));

        let bare = SpecSource::new("b", "specs/panel.yaml");
        assert_eq!(
            bare.resolve_location().unwrap(),
            Location::File(PathBuf::from("specs/panel.yaml"))
        );

        let file_url = SpecSource::new("c", "file:///tmp/spec.yaml");
        assert_eq!(
            file_url.resolve_location().unwrap(),
            Location::File(PathBuf::from("/tmp/spec.yaml"))
        );
    }
}
