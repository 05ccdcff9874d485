//! Article extraction from fetched HTML
//!
//! Turns an encyclopedia article into a `Page`:
//! - title from `#firstHeading`
//! - cleaned body text from `#mw-content-text .mw-parser-output`
//! - categories from `#mw-normal-catlinks ul > li`
//! - last modification time from the footer
//! - outgoing article titles and the URLs to grow the frontier with

use crate::state::Page;
use crate::url::UrlFilter;
use chrono::{Local, NaiveDateTime};
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use std::sync::OnceLock;
use url::Url;

const TITLE_SELECTOR: &str = "#firstHeading";
const CONTENT_SELECTOR: &str = "#mw-content-text .mw-parser-output";
const CATEGORIES_SELECTOR: &str = "#mw-normal-catlinks";
const LAST_MODIFIED_SELECTOR: &str = "#footer-info-lastmod";

/// Elements stripped from the content before its text is taken:
/// reference markers, section edit links, tables and block containers
const CLEANUP_SELECTORS: &[&str] = &["sup.reference", "span.mw-editsection", "table", "div"];

/// Footer timestamp, e.g. `18 January 2018 21:30`
const LAST_MODIFIED_FORMAT: &str = "%d %B %Y %H:%M";

/// A page extracted from an article, plus the links to follow from it
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    pub page: Page,

    /// In-content links that pass the host/path filter, absolute, in document order
    pub links: Vec<Url>,
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn is_heading(name: &str) -> bool {
    matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// Collapses runs of whitespace and trims the result
fn normalize_text<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let joined: String = parts.collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts a page from an article document
///
/// # Arguments
///
/// * `html` - The fetched document
/// * `base_url` - The post-redirect URL, used to resolve relative links
/// * `filter` - Host/path filter deciding which links are articles
///
/// # Returns
///
/// * `Some(ExtractedPage)` - Title, content and categories were all found and non-empty
/// * `None` - A required element is missing, or content/categories reduced to nothing
pub fn extract_page(html: &str, base_url: &Url, filter: &UrlFilter) -> Option<ExtractedPage> {
    let mut document = Html::parse_document(html);

    let (title, content_id, categories, footer) = {
        let title_el = document.select(&selector(TITLE_SELECTOR)?).next()?;
        let content_el = document.select(&selector(CONTENT_SELECTOR)?).next()?;
        let categories_el = document.select(&selector(CATEGORIES_SELECTOR)?).next()?;

        let categories: Vec<String> = categories_el
            .select(&selector("ul > li")?)
            .map(|li| normalize_text(li.text()))
            .collect();

        let footer = document
            .select(&selector(LAST_MODIFIED_SELECTOR)?)
            .next()
            .map(|el| el.text().collect::<String>());

        (
            normalize_text(title_el.text()),
            content_el.id(),
            categories,
            footer,
        )
    };

    // Step 1: strip references, edit links, tables and block containers
    let removable: Vec<_> = {
        let content = ElementRef::wrap(document.tree.get(content_id)?)?;
        let mut ids = Vec::new();
        for css in CLEANUP_SELECTORS {
            ids.extend(
                content
                    .select(&selector(css)?)
                    .map(|el| el.id())
                    .filter(|id| *id != content_id),
            );
        }
        ids
    };
    for id in removable {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    // Step 2: headings directly followed by another heading have no body text
    let dangling: Vec<_> = {
        let content = ElementRef::wrap(document.tree.get(content_id)?)?;
        content
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| is_heading(el.value().name()) && followed_by_heading(*el))
            .map(|el| el.id())
            .collect()
    };
    for id in dangling {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    let content_el = ElementRef::wrap(document.tree.get(content_id)?)?;

    // Step 3: text of every non-empty direct child, one per line
    let content = content_el
        .children()
        .filter_map(ElementRef::wrap)
        .map(|child| child.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let last_modify = footer
        .as_deref()
        .and_then(parse_last_modified)
        .unwrap_or_else(|| Local::now().naive_local());

    let links = collect_links(content_el, base_url, filter);
    let out_links = out_link_titles(&links, filter);

    let page = Page::new(title, content, categories, last_modify, out_links)?;
    Some(ExtractedPage { page, links })
}

/// Returns true if the next sibling element is a heading with only whitespace between
fn followed_by_heading(el: ElementRef<'_>) -> bool {
    for sibling in el.next_siblings() {
        match sibling.value() {
            Node::Element(next) => return is_heading(next.name()),
            Node::Text(text) if text.trim().is_empty() => continue,
            Node::Comment(_) => continue,
            _ => return false,
        }
    }
    false
}

/// Resolves every `a[href]` in the content and keeps the ones the filter accepts
fn collect_links(content: ElementRef<'_>, base_url: &Url, filter: &UrlFilter) -> Vec<Url> {
    let Some(anchors) = selector("a[href]") else {
        return Vec::new();
    };

    content
        .select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| base_url.join(href.trim()).ok())
        .filter(|url| filter.matches(url))
        .collect()
}

/// Maps article links to their titles, deduplicated in first-seen order
fn out_link_titles(links: &[Url], filter: &UrlFilter) -> Vec<String> {
    let mut seen = HashSet::new();
    links
        .iter()
        .filter_map(|url| filter.title_of(url))
        .filter(|title| seen.insert(title.clone()))
        .collect()
}

fn edited_on_regex() -> &'static Regex {
    static EDITED_ON: OnceLock<Regex> = OnceLock::new();
    EDITED_ON.get_or_init(|| {
        Regex::new(r"edited on ([^,]*), at ([^.]*)").expect("footer pattern is valid")
    })
}

/// Parses a footer like "This page was last edited on 18 January 2018, at 21:30."
pub fn parse_last_modified(footer: &str) -> Option<NaiveDateTime> {
    let captures = edited_on_regex().captures(footer)?;
    let stamp = format!(
        "{} {}",
        captures.get(1)?.as_str().trim(),
        captures.get(2)?.as_str().trim()
    );
    NaiveDateTime::parse_from_str(&stamp, LAST_MODIFIED_FORMAT).ok()
}
