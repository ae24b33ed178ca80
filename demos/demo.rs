//! Load a catalog from a config file and print what it contains

use spec_catalog::{load_catalog, CatalogConfig};
use std::path::Path;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config-urls.yaml".to_string());

    println!("Loading catalog from: {}", config_path);
    let config = CatalogConfig::from_file(Path::new(&config_path)).expect("Failed to load config");

    let catalog = load_catalog(&config).await.expect("Failed to build catalog");

    println!("\n=== Documents ===");
    for doc in catalog.documents() {
        println!(
            "{}: {} v{} - {} operations, {} components",
            doc.source.name,
            doc.document.title,
            doc.document.version,
            doc.document.operations.len(),
            doc.document.components.len()
        );
    }

    if !catalog.errors().is_empty() {
        println!("\n=== Load errors ===");
        for err in catalog.errors() {
            println!("✗ {}", err);
        }
    }

    if !catalog.warnings().is_empty() {
        println!("\n=== Warnings ===");
        for warning in catalog.warnings() {
            println!("⚠ {:?}", warning);
        }
    }

    println!("\n{} merged components", catalog.components().len());
}
