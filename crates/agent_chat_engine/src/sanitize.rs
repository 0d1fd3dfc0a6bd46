//! HTML sanitizer adapter for assistant replies.
//!
//! Markup is parsed with html5ever (through `scraper`) and re-serialized from
//! an allowlist: unknown elements are unwrapped, active content is dropped
//! together with its children, and only a handful of attributes survive.

use std::sync::LazyLock;

use ego_tree::NodeRef;
use regex::Regex;
use scraper::node::{Element, Node};
use scraper::Html;
use url::Url;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?[a-z][\s\S]*>").expect("valid regex"));
static TABLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<table[\s>/]").expect("valid regex"));

const ALLOWED_TAGS: &[&str] = &[
    "a", "abbr", "b", "blockquote", "br", "caption", "code", "col", "colgroup", "dd", "del",
    "details", "div", "dl", "dt", "em", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "i", "img",
    "ins", "kbd", "li", "mark", "ol", "p", "pre", "s", "small", "span", "strong", "sub",
    "summary", "sup", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "u", "ul",
];

/// Dropped together with everything inside them.
const DROPPED_TAGS: &[&str] = &[
    "button", "embed", "form", "frame", "frameset", "head", "iframe", "input", "link", "math",
    "meta", "noscript", "object", "script", "select", "style", "svg", "template", "textarea",
    "title",
];

const VOID_TAGS: &[&str] = &["br", "col", "hr", "img"];

const URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// True when `content` contains something shaped like an HTML tag.
pub fn looks_like_html(content: &str) -> bool {
    TAG_PATTERN.is_match(content)
}

/// True when `content` contains a `<table>` element.
pub fn contains_table(content: &str) -> bool {
    TABLE_PATTERN.is_match(content)
}

/// Returns markup that is safe to inject into the chat surface.
pub fn sanitize(raw: &str) -> String {
    let fragment = Html::parse_fragment(raw);
    let mut out = String::with_capacity(raw.len());
    for child in fragment.root_element().children() {
        write_node(child, &mut out);
    }
    out
}

/// Escapes text for use as element content or a quoted attribute value.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(text, &mut out);
    out
}

fn push_escaped(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

fn write_node(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => push_escaped(text, out),
        Node::Element(element) => write_element(node, element, out),
        // Comments, doctypes and processing instructions never reach the surface.
        _ => {}
    }
}

fn write_element(node: NodeRef<'_, Node>, element: &Element, out: &mut String) {
    let tag = element.name().to_ascii_lowercase();
    if DROPPED_TAGS.contains(&tag.as_str()) {
        return;
    }
    if !ALLOWED_TAGS.contains(&tag.as_str()) {
        for child in node.children() {
            write_node(child, out);
        }
        return;
    }

    out.push('<');
    out.push_str(&tag);
    for (name, value) in element.attrs() {
        let name = name.to_ascii_lowercase();
        if let Some(value) = allowed_attribute(&tag, &name, value) {
            out.push(' ');
            out.push_str(&name);
            out.push_str("=\"");
            push_escaped(value, out);
            out.push('"');
        }
    }
    if tag == "a" {
        out.push_str(" rel=\"noopener noreferrer\" target=\"_blank\"");
    }
    out.push('>');

    if VOID_TAGS.contains(&tag.as_str()) {
        return;
    }
    for child in node.children() {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(&tag);
    out.push('>');
}

fn allowed_attribute<'a>(tag: &str, name: &str, value: &'a str) -> Option<&'a str> {
    let allowed = match (tag, name) {
        (_, "title") => true,
        ("a", "href") | ("img", "src") => return is_safe_url(value).then_some(value),
        ("img", "alt" | "width" | "height") => true,
        ("td" | "th", "colspan" | "rowspan" | "align") => true,
        ("th", "scope") => true,
        ("col" | "colgroup", "span") => true,
        ("ol", "start") => true,
        _ => false,
    };
    allowed.then_some(value)
}

fn is_safe_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => URL_SCHEMES.contains(&url.scheme()),
        Err(url::ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}
