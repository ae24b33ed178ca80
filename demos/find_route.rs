//! Look up one operation across every document in the catalog
//!
//! Usage: find_route <config.yaml> <METHOD> <PATH>

use openapi_parser::HttpMethod;
use spec_catalog::{load_catalog, CatalogConfig, Lookup};
use std::path::Path;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(config_path), Some(method), Some(path)) = (args.next(), args.next(), args.next())
    else {
        eprintln!("usage: find_route <config.yaml> <METHOD> <PATH>");
        std::process::exit(2);
    };

    let method = HttpMethod::parse(&method).expect("Unknown HTTP method");
    let config = CatalogConfig::from_file(Path::new(&config_path)).expect("Failed to load config");
    let catalog = load_catalog(&config).await.expect("Failed to build catalog");

    match catalog.find_operation(method, &path) {
        Lookup::Found { source, operation } => {
            println!("Found in '{}':", source);
            println!("  {} {}", operation.method, operation.path);
            println!("  operationId: {}", operation.operation_id);
            if let Some(summary) = &operation.summary {
                println!("  summary: {}", summary);
            }
        }
        Lookup::NotFound => {
            println!("No operation matches {} {}", method, path);
        }
    }
}
