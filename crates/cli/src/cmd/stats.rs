//! Stats command implementation.

use std::collections::BTreeMap;
use std::path::Path;

use mdquery_core::index::DocumentKind;
use serde::Serialize;

use super::output::print_json;
use crate::StatsArgs;

#[derive(Debug, Serialize)]
struct StatsOutput {
    files: usize,
    skipped: usize,
    documents: usize,
    kinds: BTreeMap<&'static str, usize>,
    tags: usize,
    link_targets: usize,
    fields: usize,
}

pub fn run(config: Option<&Path>, profile: Option<&str>, args: StatsArgs) {
    let rc = super::load_config(config, profile);
    let (store, imported) = super::load_store(&rc);

    let kinds = [
        DocumentKind::Page,
        DocumentKind::Section,
        DocumentKind::Block,
        DocumentKind::ListItem,
    ]
    .into_iter()
    .map(|kind| (kind.as_str(), store.kinds().get(&kind).len()))
    .filter(|(_, count)| *count > 0)
    .collect();

    let stats = StatsOutput {
        files: imported.files,
        skipped: imported.skipped,
        documents: store.len(),
        kinds,
        tags: store.tags().value_count(),
        link_targets: store.links().value_count(),
        fields: store.field_names().count(),
    };

    if args.json {
        print_json(&stats);
        return;
    }

    println!("Vault: {}", rc.vault_root.display());
    println!("  Files:        {}", stats.files);
    if stats.skipped > 0 {
        println!("  Skipped:      {}", stats.skipped);
    }
    println!("  Documents:    {}", stats.documents);
    for (kind, count) in &stats.kinds {
        println!("    {:<12}{}", kind, count);
    }
    println!("  Tags:         {}", stats.tags);
    println!("  Link targets: {}", stats.link_targets);
    println!("  Fields:       {}", stats.fields);
}
