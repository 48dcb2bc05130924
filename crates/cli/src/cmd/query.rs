//! Query command implementation.

use std::fs;
use std::path::Path;

use mdquery_core::query::QueryTree;

use super::output::{documents, print_documents};
use super::resolve_format;
use crate::QueryArgs;

pub fn run(config: Option<&Path>, profile: Option<&str>, args: QueryArgs) {
    let text = match (&args.query, &args.file) {
        (Some(query), _) => query.clone(),
        (None, Some(file)) => match fs::read_to_string(file) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Error reading query file {}: {}", file.display(), e);
                std::process::exit(1);
            }
        },
        (None, None) => {
            eprintln!("Error: provide a query or --file");
            std::process::exit(2);
        }
    };

    let tree: QueryTree = match serde_json::from_str(&text) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("Error parsing query: {}", e);
            std::process::exit(1);
        }
    };

    let rc = super::load_config(config, profile);
    let (store, _) = super::load_store(&rc);

    let result = store.evaluate(&tree);
    tracing::info!(
        "{} matched {} documents in {:.3}ms",
        tree,
        result.results.len(),
        result.duration_ms
    );

    let docs = documents(&store, &result.results);
    print_documents(&docs, resolve_format(args.output, args.json, args.quiet));
}
