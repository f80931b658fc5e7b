//! Lightweight scanner turning a built `index.html` into asset-bearing document nodes.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::models::{DocumentNode, LinkNode, ScriptNode, StyleNode};

/// Asset nodes found in each section of a document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
  /// Nodes inside `<head>`.
  pub head: Vec<DocumentNode>,
  /// Nodes inside `<body>`.
  pub body: Vec<DocumentNode>,
}

struct DocumentPatterns {
  head: Regex,
  body: Regex,
  node: Regex,
  attr: Regex,
}

fn document_patterns() -> &'static DocumentPatterns {
  static PATTERNS: OnceLock<DocumentPatterns> = OnceLock::new();
  PATTERNS.get_or_init(|| DocumentPatterns {
    head: Regex::new(r"(?is)<head\b[^>]*>(.*?)</head\s*>").expect("invalid head regex"),
    body: Regex::new(r"(?is)<body\b[^>]*>(.*?)(?:</body\s*>|\z)").expect("invalid body regex"),
    node: Regex::new(
      r"(?is)<!--.*?-->|<link\b([^>]*)>|<script\b([^>]*)>(.*?)</script\s*>|<style\b([^>]*)>(.*?)</style\s*>",
    )
    .expect("invalid node regex"),
    attr: Regex::new(r#"([^\s=/>"']+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
      .expect("invalid attribute regex"),
  })
}

/// Scan the head and body of an HTML document for `<link>`, `<script>` and `<style>` tags.
///
/// Comments are skipped. Missing sections yield empty node lists.
pub fn parse_document(html: &str) -> ParsedDocument {
  let patterns = document_patterns();
  let section = |pattern: &Regex| {
    pattern
      .captures(html)
      .and_then(|caps| caps.get(1))
      .map(|m| scan_nodes(m.as_str()))
      .unwrap_or_default()
  };

  ParsedDocument {
    head: section(&patterns.head),
    body: section(&patterns.body),
  }
}

/// Scan an HTML fragment for asset nodes in order.
pub fn scan_nodes(fragment: &str) -> Vec<DocumentNode> {
  document_patterns()
    .node
    .captures_iter(fragment)
    .filter_map(|caps| node_from_captures(&caps))
    .collect()
}

fn node_from_captures(caps: &Captures<'_>) -> Option<DocumentNode> {
  if let Some(attrs) = caps.get(1) {
    let mut attrs = parse_attributes(attrs.as_str());
    return Some(DocumentNode::Link(LinkNode {
      href: attrs.remove("href"),
      rel: attrs.remove("rel"),
      as_: attrs.remove("as"),
      hreflang: attrs.remove("hreflang"),
      crossorigin: attrs.remove("crossorigin"),
    }));
  }

  if let Some(attrs) = caps.get(2) {
    let mut attrs = parse_attributes(attrs.as_str());
    return Some(DocumentNode::Script(ScriptNode {
      src: attrs.remove("src"),
      crossorigin: attrs.remove("crossorigin"),
      inner_html: inner_content(caps.get(3).map(|m| m.as_str())),
    }));
  }

  if caps.get(4).is_some() {
    return Some(DocumentNode::Style(StyleNode {
      inner_html: inner_content(caps.get(5).map(|m| m.as_str())),
    }));
  }

  None
}

fn inner_content(raw: Option<&str>) -> Option<String> {
  raw
    .filter(|value| !value.is_empty())
    .map(str::to_string)
}

/// Parse the attribute section of a start tag.
///
/// Names are lowercased. Boolean attributes such as a bare `crossorigin` map to `""`.
pub fn parse_attributes(source: &str) -> HashMap<String, String> {
  document_patterns()
    .attr
    .captures_iter(source.trim_end_matches('/'))
    .filter_map(|caps| {
      let name = caps.get(1)?.as_str().to_ascii_lowercase();
      let value = caps
        .get(2)
        .or_else(|| caps.get(3))
        .or_else(|| caps.get(4))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
      Some((name, value))
    })
    .collect()
}
