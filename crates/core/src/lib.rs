#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod index;
pub mod literal;
pub mod query;
pub mod vault;

pub use index::{Document, DocumentKind, IndexStore};
pub use literal::{Link, Literal};
pub use query::{QueryResult, QueryTree};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
