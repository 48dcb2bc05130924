//! Tags command implementation.

use std::path::Path;

use mdquery_core::index::normalize_tag;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use super::output::print_json;
use super::resolve_format;
use crate::{OutputFormat, TagsArgs};

#[derive(Debug, Serialize, Tabled)]
struct TagRow {
    #[tabled(rename = "TAG")]
    tag: String,
    #[tabled(rename = "DOCUMENTS")]
    documents: usize,
}

pub fn run(config: Option<&Path>, profile: Option<&str>, args: TagsArgs) {
    let rc = super::load_config(config, profile);
    let (store, _) = super::load_store(&rc);

    let prefix = args.prefix.as_deref().map(normalize_tag);
    let rows: Vec<TagRow> = store
        .tag_counts()
        .into_iter()
        .filter(|(tag, _)| prefix.as_deref().is_none_or(|p| tag.starts_with(p)))
        .map(|(tag, documents)| TagRow { tag: tag.to_string(), documents })
        .collect();

    match resolve_format(args.output, args.json, false) {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Quiet => rows.iter().for_each(|row| println!("{}", row.tag)),
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("(no tags found)");
            } else {
                println!("{}", Table::new(&rows).with(Style::rounded()));
            }
        }
    }
}
