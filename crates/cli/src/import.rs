//! Turns markdown files into documents for the index store.
//!
//! Each file yields one page document (frontmatter fields, frontmatter and
//! inline tags, wikilinks and local markdown links) and one section document
//! per heading, identified as `path#Heading`.

use std::collections::HashSet;
use std::fs;
use std::sync::LazyLock;

use chrono::{DateTime, Local};
use mdquery_core::config::types::ResolvedConfig;
use mdquery_core::index::{Document, DocumentKind, FieldPolicy, IndexStore};
use mdquery_core::literal::{Link, Literal};
use mdquery_core::vault::{VaultNamespace, VaultWalker, VaultWalkerError};
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Walk(#[from] VaultWalkerError),

    #[error("failed to read {0}: {1}")]
    Read(String, #[source] std::io::Error),
}

/// Counts reported after an import.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ImportStats {
    pub files: usize,
    pub documents: usize,
    /// Files left out because their frontmatter is not valid YAML.
    pub skipped: usize,
}

static WIKILINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!)?\[\[([^\]]+)\]\]").unwrap());

static MARKDOWN_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!)?\[([^\]]*)\]\(([^)\s]+)\)").unwrap());

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)#([\p{L}_][\p{L}\p{N}_/-]*)").unwrap());

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+?)\s*#*$").unwrap());

/// Split leading `---` frontmatter from the body.
///
/// Returns `None` for the frontmatter when the file has none or the block is
/// never closed.
pub fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content.strip_prefix("---") else {
        return (None, content);
    };
    let Some(rest) = rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n")) else {
        return (None, content);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, content)
}

/// Documents for one markdown file at vault path `path`.
pub fn parse_note(path: &str, content: &str) -> Result<Vec<Document>, serde_yaml::Error> {
    let (frontmatter, body) = split_frontmatter(content);

    let mut page = Document::page(path);
    if let Some(yaml) = frontmatter.filter(|yaml| !yaml.trim().is_empty()) {
        let mapping: serde_yaml::Mapping = serde_yaml::from_str(yaml)?;
        for (key, value) in &mapping {
            let Some(key) = key.as_str() else {
                continue;
            };
            let value = Literal::from_yaml(value);
            if key.eq_ignore_ascii_case("tags") {
                page.tags.extend(frontmatter_tags(&value));
            }
            collect_links(&value, &mut page.links);
            page.set_field(key, value);
        }
    }

    let mut sections: Vec<Document> = Vec::new();
    let mut seen_headings = HashSet::new();
    let mut in_fence = false;

    for line in body.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }

        if let Some(caps) = HEADING_RE.captures(line) {
            let heading = caps[2].to_string();
            if seen_headings.insert(heading.to_lowercase()) {
                let level = caps[1].len() as i64;
                sections.push(
                    Document::new(format!("{path}#{heading}"), DocumentKind::Section, path)
                        .with_field("heading", heading.as_str())
                        .with_field("level", level),
                );
            }
        }

        let tags = inline_tags(line);
        let links = line_links(line);
        page.tags.extend(tags.iter().cloned());
        page.links.extend(links.iter().cloned());
        if let Some(section) = sections.last_mut() {
            section.tags.extend(tags);
            section.links.extend(links);
        }
    }

    let mut documents = Vec::with_capacity(sections.len() + 1);
    documents.push(page);
    documents.extend(sections);
    Ok(documents)
}

fn frontmatter_tags(value: &Literal) -> Vec<String> {
    match value {
        Literal::String(s) => {
            s.split([',', ' ']).filter(|t| !t.is_empty()).map(String::from).collect()
        }
        Literal::Array(items) => {
            items.iter().filter_map(Literal::as_str).map(String::from).collect()
        }
        _ => Vec::new(),
    }
}

fn collect_links(value: &Literal, links: &mut Vec<Link>) {
    match value {
        Literal::Link(link) => links.push(link.clone()),
        Literal::Array(items) => items.iter().for_each(|item| collect_links(item, links)),
        Literal::Object(map) => map.values().for_each(|item| collect_links(item, links)),
        _ => {}
    }
}

fn inline_tags(line: &str) -> Vec<String> {
    TAG_RE.captures_iter(line).map(|caps| format!("#{}", &caps[1])).collect()
}

fn line_links(line: &str) -> Vec<Link> {
    let mut links: Vec<Link> = WIKILINK_RE
        .captures_iter(line)
        .map(|caps| {
            let link = Link::parse(&caps[2]);
            if caps.get(1).is_some() { link.embedded() } else { link }
        })
        .collect();

    for caps in MARKDOWN_LINK_RE.captures_iter(line) {
        let url = &caps[3];
        if caps.get(1).is_some() || url.contains("://") || !is_note_reference(url) {
            continue;
        }
        let (target, heading) = match url.split_once('#') {
            Some((target, heading)) => (target, Some(heading)),
            None => (url, None),
        };
        if target.is_empty() {
            continue;
        }
        let link = match heading {
            Some(heading) => Link::header(target, heading),
            None => Link::file(target),
        };
        links.push(link.with_display(&caps[2]));
    }

    links
}

fn is_note_reference(url: &str) -> bool {
    let path = url.split('#').next().unwrap_or(url).to_lowercase();
    path.ends_with(".md") || !path.rsplit('/').next().unwrap_or(&path).contains('.')
}

/// Walk the configured vault and build a store over it.
pub fn import_vault(
    rc: &ResolvedConfig,
) -> Result<(IndexStore<VaultNamespace>, ImportStats), ImportError> {
    let walker = VaultWalker::with_exclusions(&rc.vault_root, rc.excluded_folders.clone())?;
    let namespace = VaultNamespace::new(walker.root(), rc.excluded_folders.clone())?;
    let mut store = IndexStore::new(FieldPolicy::from_config(&rc.index), namespace);
    let mut stats = ImportStats::default();

    for file in walker.walk()? {
        stats.files += 1;
        let content = fs::read_to_string(&file.absolute_path)
            .map_err(|e| ImportError::Read(file.absolute_path.display().to_string(), e))?;

        let documents = match parse_note(&file.path, &content) {
            Ok(documents) => documents,
            Err(e) => {
                tracing::warn!("skipping {}: invalid frontmatter: {}", file.path, e);
                stats.skipped += 1;
                continue;
            }
        };

        let modified: DateTime<Local> = file.modified.into();
        for mut document in documents {
            for link in &mut document.links {
                link.path =
                    store.folder().resolve_relative(&link.path, Some(file.path.as_str()));
            }
            if document.kind == DocumentKind::Page {
                document.set_field("$mtime", Literal::Date(modified.fixed_offset()));
            }
            store.add_or_update(document);
            stats.documents += 1;
        }
    }

    tracing::info!(
        "imported {} documents from {} files ({} skipped)",
        stats.documents,
        stats.files,
        stats.skipped
    );
    Ok((store, stats))
}
