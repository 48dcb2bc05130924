//! Backlinks command implementation.

use std::path::Path;

use super::output::{documents, print_documents};
use super::resolve_format;
use crate::BacklinksArgs;

pub fn run(config: Option<&Path>, profile: Option<&str>, args: BacklinksArgs) {
    let rc = super::load_config(config, profile);
    let (store, _) = super::load_store(&rc);

    // Normalize the note path (strip leading ./)
    let note = args.note.strip_prefix("./").unwrap_or(&args.note);

    let ids = store.backlinks(note);
    tracing::debug!("{} documents link to {}", ids.len(), note);

    let docs = documents(&store, &ids);
    print_documents(&docs, resolve_format(args.output, args.json, args.quiet));
}
