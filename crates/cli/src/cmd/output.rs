//! Shared output formatting for commands that list documents.

use mdquery_core::index::{Document, IndexStore, Namespace};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::OutputFormat;

/// Formatted document for JSON and table output.
#[derive(Debug, Serialize, Tabled)]
pub struct DocumentOutput {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "KIND")]
    pub kind: String,
    #[tabled(rename = "PATH")]
    pub path: String,
}

impl From<&Document> for DocumentOutput {
    fn from(doc: &Document) -> Self {
        Self { id: doc.id.clone(), kind: doc.kind.as_str().to_string(), path: doc.path.clone() }
    }
}

/// Look up each id in the store, skipping any that vanished.
pub fn documents<'a, N: Namespace>(
    store: &IndexStore<N>,
    ids: impl IntoIterator<Item = &'a String>,
) -> Vec<DocumentOutput> {
    ids.into_iter().filter_map(|id| store.get(id)).map(DocumentOutput::from).collect()
}

pub fn print_documents(docs: &[DocumentOutput], format: OutputFormat) {
    match format {
        OutputFormat::Table => print_documents_table(docs),
        OutputFormat::Json => print_json(&docs),
        OutputFormat::Quiet => print_documents_quiet(docs),
    }
}

pub fn print_documents_table(docs: &[DocumentOutput]) {
    if docs.is_empty() {
        println!("(no documents found)");
        return;
    }

    println!("{}", Table::new(docs).with(Style::rounded()));
    println!();
    println!("Total: {} documents", docs.len());
}

pub fn print_documents_quiet(docs: &[DocumentOutput]) {
    for doc in docs {
        println!("{}", doc.id);
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            std::process::exit(1);
        }
    }
}
