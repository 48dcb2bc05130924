//! Vault file discovery.
//!
//! This module provides the walker used to enumerate markdown files for
//! import and the on-disk [`Namespace`](crate::index::Namespace) backing
//! folder queries. Both share the same [`Exclusions`].

pub mod namespace;
pub mod walker;

pub use namespace::VaultNamespace;
pub use walker::{Exclusions, VaultWalker, VaultWalkerError, WalkedFile, is_markdown_file};
