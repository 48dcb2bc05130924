use std::fs;

use chrono::DateTime;
use mdquery_core::index::{Document, DocumentKind, FieldPolicy, IdSet, IndexStore};
use mdquery_core::literal::{Link, Literal};
use mdquery_core::query::{CompareOp, QueryTree};
use mdquery_core::vault::VaultNamespace;
use rstest::rstest;
use tempfile::tempdir;

fn ids(items: &[&str]) -> IdSet {
    items.iter().map(|s| s.to_string()).collect()
}

fn date(s: &str) -> Literal {
    Literal::Date(DateTime::parse_from_rfc3339(&format!("{s}T00:00:00Z")).unwrap())
}

fn two_pages() -> IndexStore {
    let mut store = IndexStore::default();
    store.add_or_update(Document::page("p1").with_tags(["#a", "#b"]));
    store.add_or_update(Document::page("p2").with_tags(["#b"]));
    store
}

#[test]
fn tag_queries_over_two_pages() {
    let store = two_pages();

    assert_eq!(store.evaluate(&QueryTree::eq("tag", "#b")).results, ids(&["p1", "p2"]));
    assert_eq!(
        store
            .evaluate(&QueryTree::and([QueryTree::eq("tag", "#a"), QueryTree::eq("tag", "#b")]))
            .results,
        ids(&["p1"])
    );
    assert_eq!(store.evaluate(&QueryTree::not(QueryTree::eq("tag", "#a"))).results, ids(&["p2"]));
}

#[test]
fn removed_documents_leave_no_trace() {
    let mut store = two_pages();
    store.remove("p1");

    assert_eq!(store.evaluate(&QueryTree::eq("tag", "#b")).results, ids(&["p2"]));
    assert!(store.evaluate(&QueryTree::eq("tag", "#a")).results.is_empty());
    assert_eq!(store.universe(), &ids(&["p2"]));
}

#[test]
fn renamed_document_is_found_under_new_id() {
    let mut store = two_pages();
    assert!(store.rename("p2", "p3"));

    assert_eq!(store.evaluate(&QueryTree::eq("tag", "#b")).results, ids(&["p1", "p3"]));
    assert_eq!(store.evaluate(&QueryTree::not(QueryTree::eq("tag", "#a"))).results, ids(&["p3"]));
}

fn task_store(policy: FieldPolicy) -> IndexStore {
    let mut store = IndexStore::new(policy, Default::default());
    for (id, due, status) in [
        ("t1", "2024-01-10", "open"),
        ("t2", "2024-02-10", "done"),
        ("t3", "2024-03-10", "open"),
    ] {
        store.add_or_update(
            Document::page(id).with_field("due", date(due)).with_field("status", status),
        );
    }
    store.add_or_update(Document::page("t4").with_field("status", "open"));
    store
}

#[rstest]
#[case(CompareOp::Gt, "2024-02-10", &["t3"][..])]
#[case(CompareOp::Ge, "2024-02-10", &["t2", "t3"][..])]
#[case(CompareOp::Lt, "2024-02-10", &["t1"][..])]
#[case(CompareOp::Le, "2024-02-10", &["t1", "t2"][..])]
#[case(CompareOp::Eq, "2024-03-10", &["t3"][..])]
fn date_comparisons(#[case] op: CompareOp, #[case] day: &str, #[case] expected: &[&str]) {
    let expected = ids(expected);
    let query = QueryTree::compare("due", op, date(day));

    let indexed = task_store(FieldPolicy::default());
    let scanned = task_store(FieldPolicy::none());
    assert_eq!(indexed.evaluate(&query).results, expected);
    assert_eq!(scanned.evaluate(&query).results, expected);
}

#[test]
fn missing_field_only_matches_under_not() {
    let store = task_store(FieldPolicy::default());
    let has_due = QueryTree::compare("due", CompareOp::Ge, date("1970-01-01"));
    assert_eq!(store.evaluate(&QueryTree::not(has_due)).results, ids(&["t4"]));
}

#[test]
fn combined_query_over_fields_and_kinds() {
    let mut store = task_store(FieldPolicy::default());
    store.add_or_update(
        Document::new("t1#Notes", DocumentKind::Section, "t1").with_field("status", "open"),
    );

    let query = QueryTree::and([
        QueryTree::eq("status", "open"),
        QueryTree::eq("kind", "page"),
        QueryTree::or([
            QueryTree::compare("due", CompareOp::Lt, date("2024-02-01")),
            QueryTree::not(QueryTree::compare("due", CompareOp::Ge, date("1970-01-01"))),
        ]),
    ]);
    assert_eq!(store.evaluate(&query).results, ids(&["t1", "t4"]));
}

#[test]
fn link_and_contains_queries() {
    let mut store = IndexStore::default();
    store.add_or_update(Document::page("home.md").with_link(Link::file("projects/alpha")));
    store.add_or_update(Document::page("log.md").with_link(Link::header("alpha", "Status")));
    store.add_or_update(Document::page("projects/alpha.md").with_field("title", "Alpha Launch"));

    assert_eq!(
        store.evaluate(&QueryTree::eq("link", "projects/alpha.md")).results,
        ids(&["home.md", "log.md"])
    );
    assert_eq!(
        store.evaluate(&QueryTree::compare("$links", CompareOp::Contains, "ALPHA")).results,
        ids(&["home.md", "log.md"])
    );
    assert_eq!(
        store.evaluate(&QueryTree::compare("title", CompareOp::Contains, "launch")).results,
        ids(&["projects/alpha.md"])
    );
}

#[test]
fn folder_queries_against_a_vault_on_disk() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("notes/sub")).unwrap();
    fs::create_dir_all(root.join("other")).unwrap();
    for file in ["notes/a.md", "notes/sub/b.md", "other/c.md"] {
        fs::write(root.join(file), "").unwrap();
    }

    let namespace = VaultNamespace::new(root, Vec::new()).unwrap();
    let mut store = IndexStore::new(FieldPolicy::default(), namespace);
    for file in ["notes/a.md", "notes/sub/b.md", "other/c.md"] {
        store.add_or_update(Document::page(file));
    }

    let in_notes = store.evaluate(&QueryTree::eq("folder", "notes")).results;
    assert_eq!(in_notes, ids(&["notes/a.md", "notes/sub/b.md"]));

    // files on disk that were never indexed are not query results
    fs::write(root.join("notes/new.md"), "").unwrap();
    let in_notes = store.evaluate(&QueryTree::eq("folder", "notes")).results;
    assert_eq!(in_notes.len(), 2);
    assert_eq!(store.folder().get("notes", None).len(), 3);

    assert_eq!(store.folder().get_exact("notes", None), ids(&["notes/a.md", "notes/new.md"]));
}
