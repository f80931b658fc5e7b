//! Classify document nodes and accumulate them into an asset manifest.

use tracing::debug;

use crate::asset_paths::{IgnoreDecision, link_tag, need_ignore, script_tag};
use crate::error::ExtractError;
use crate::manifest::externalize::{ChunkKind, ChunkWriter, ExtractionContext};
use crate::models::{
  AssetEntry, AssetManifest, DocumentNode, LinkNode, ParseOptions, ReplacementDirective,
  ScriptNode, StyleNode,
};

/// Extract link, script and style nodes into the placement selected by `options.is_head`.
///
/// Nodes are processed strictly in order. The manifest is mutated in place and the
/// replacement directives generated along the way are returned in the order they were
/// produced. Any error aborts extraction for the whole sub-application.
pub fn fill_asset_list<W: ChunkWriter>(
  nodes: &[DocumentNode],
  manifest: &mut AssetManifest,
  options: &ParseOptions,
  context: &mut ExtractionContext<W>,
) -> Result<Vec<ReplacementDirective>, ExtractError> {
  let mut replacements = Vec::new();

  for node in nodes {
    let entry = match node {
      DocumentNode::Link(link) => fill_link(link, manifest, options, &mut replacements)?,
      DocumentNode::Script(script) => fill_script(script, options, context, &mut replacements)?,
      DocumentNode::Style(style) => fill_style(style, options, context)?,
    };

    if let Some(entry) = entry {
      manifest.placement_mut(options.is_head).push(entry);
    }
  }

  Ok(replacements)
}

fn fill_link(
  link: &LinkNode,
  manifest: &mut AssetManifest,
  options: &ParseOptions,
  replacements: &mut Vec<ReplacementDirective>,
) -> Result<Option<AssetEntry>, ExtractError> {
  let Some(mut href) = link.href.clone().filter(|value| !value.is_empty()) else {
    return Ok(None);
  };

  // Root-relative legacy paths would otherwise be rejected as invalid references.
  if let Some((rewritten, directive)) = options
    .rewrites
    .rewrite_legacy_path(&options.app_home_page, &href)
  {
    href = rewritten;
    replacements.push(directive);
  }

  let decision = need_ignore(options, &href, link.hreflang.as_deref())?;
  if decision.is_ignored() {
    debug!("ignore href {href}");
    return Ok(None);
  }

  debug!(
    "analyze link href[{href}] as[{}] rel[{}]",
    link.as_.as_deref().unwrap_or_default(),
    link.rel.as_deref().unwrap_or_default()
  );
  if href.ends_with(".css") {
    manifest.css_url_list.insert(href.clone());
  }
  if decision == IgnoreDecision::KeepPrivileged {
    manifest.privileged_css_url_list.insert(href.clone());
  }

  let tag = link_tag(&options.app_home_page, &href);
  Ok(Some(AssetEntry::new(tag, vec![
    ("href", Some(href)),
    ("as", link.as_.clone()),
    ("rel", link.rel.clone()),
    ("crossorigin", link.crossorigin.clone()),
  ])))
}

fn fill_script<W: ChunkWriter>(
  script: &ScriptNode,
  options: &ParseOptions,
  context: &mut ExtractionContext<W>,
  replacements: &mut Vec<ReplacementDirective>,
) -> Result<Option<AssetEntry>, ExtractError> {
  let src = match script.src.clone().filter(|value| !value.is_empty()) {
    Some(src) => src,
    None => {
      match context.externalize(script.inner_html.as_deref(), ChunkKind::Script, options)? {
        Some(src) => src,
        None => return Ok(None),
      }
    }
  };

  if need_ignore(options, &src, None)?.is_ignored() {
    debug!("ignore script {src}");
    return Ok(None);
  }

  debug!("analyze script src[{src}]");
  if let Some(directive) = options.rewrites.swap_dev_bundle(&src) {
    replacements.push(directive);
  }

  let tag = script_tag(&options.app_home_page, &src);
  Ok(Some(AssetEntry::new(tag, vec![
    ("src", Some(src)),
    ("crossorigin", script.crossorigin.clone()),
  ])))
}

fn fill_style<W: ChunkWriter>(
  style: &StyleNode,
  options: &ParseOptions,
  context: &mut ExtractionContext<W>,
) -> Result<Option<AssetEntry>, ExtractError> {
  let Some(href) = context.externalize(style.inner_html.as_deref(), ChunkKind::Style, options)?
  else {
    return Ok(None);
  };

  debug!("stored style content at {href}");
  let tag = link_tag(&options.app_home_page, &href);
  Ok(Some(AssetEntry::new(tag, vec![
    ("href", Some(href)),
    ("rel", Some("stylesheet".to_string())),
  ])))
}

#[cfg(test)]
mod tests {
  use std::fs;

  use super::*;
  use crate::models::{AssetTag, ExtractMode};
  use tempfile::tempdir;

  const HOME: &str = "https://cdn.x/app";

  fn link(href: &str) -> DocumentNode {
    DocumentNode::Link(LinkNode {
      href: Some(href.into()),
      rel: Some("stylesheet".into()),
      ..LinkNode::default()
    })
  }

  fn script(src: &str) -> DocumentNode {
    DocumentNode::Script(ScriptNode {
      src: Some(src.into()),
      ..ScriptNode::default()
    })
  }

  fn inline_script(body: &str) -> DocumentNode {
    DocumentNode::Script(ScriptNode {
      inner_html: Some(body.into()),
      ..ScriptNode::default()
    })
  }

  fn inline_style(body: &str) -> DocumentNode {
    DocumentNode::Style(StyleNode {
      inner_html: Some(body.into()),
    })
  }

  fn fill(
    nodes: &[DocumentNode],
    options: &ParseOptions,
  ) -> Result<(AssetManifest, Vec<ReplacementDirective>), ExtractError> {
    let mut manifest = AssetManifest::default();
    let mut context = ExtractionContext::new();
    let replacements = fill_asset_list(nodes, &mut manifest, options, &mut context)?;
    Ok((manifest, replacements))
  }

  #[test]
  fn single_owned_stylesheet_in_head() {
    let node = DocumentNode::Link(LinkNode {
      href: Some("https://cdn.x/app/main.css".into()),
      hreflang: Some(String::new()),
      ..LinkNode::default()
    });
    let options = ParseOptions::new("/unused", HOME);

    let (manifest, replacements) = fill(&[node], &options).unwrap();

    assert!(replacements.is_empty());
    assert!(manifest.body_asset_list.is_empty());
    assert_eq!(manifest.head_asset_list.len(), 1);
    let entry = &manifest.head_asset_list[0];
    assert_eq!(entry.tag, AssetTag::Link);
    assert_eq!(entry.url(), Some("https://cdn.x/app/main.css"));
    assert_eq!(
      manifest.css_url_list.iter().collect::<Vec<_>>(),
      vec!["https://cdn.x/app/main.css"]
    );
    assert!(manifest.privileged_css_url_list.is_empty());
  }

  #[test]
  fn inline_body_script_is_externalized() {
    let dir = tempdir().unwrap();
    let options = ParseOptions::new(dir.path(), HOME).for_placement(false);

    let (manifest, _) = fill(&[inline_script("console.log(1)")], &options).unwrap();

    assert!(dir.path().join("hel_userChunk_1.js").exists());
    assert!(manifest.head_asset_list.is_empty());
    let entry = &manifest.body_asset_list[0];
    assert_eq!(entry.tag, AssetTag::Script);
    assert_eq!(entry.url(), Some("https://cdn.x/app/hel_userChunk_1.js"));
  }

  #[test]
  fn duplicate_css_urls_are_listed_once_in_first_seen_order() {
    let options = ParseOptions::new("/unused", HOME);
    let nodes = [
      link("https://cdn.x/app/b.css"),
      link("https://cdn.x/app/a.css"),
      link("https://cdn.x/app/b.css"),
    ];

    let (manifest, _) = fill(&nodes, &options).unwrap();

    assert_eq!(manifest.head_asset_list.len(), 3);
    assert_eq!(
      manifest.css_url_list.iter().collect::<Vec<_>>(),
      vec!["https://cdn.x/app/b.css", "https://cdn.x/app/a.css"]
    );
  }

  #[test]
  fn build_mode_drops_foreign_urls_unless_privileged() {
    let options = ParseOptions::new("/unused", HOME);
    let privileged = DocumentNode::Link(LinkNode {
      href: Some("https://theme.cdn/base.css".into()),
      hreflang: Some("PRIV_CSS".into()),
      ..LinkNode::default()
    });
    let nodes = [
      link("https://theme.cdn/other.css"),
      script("https://unpkg.com/lodash.js"),
      privileged,
    ];

    let (manifest, _) = fill(&nodes, &options).unwrap();

    assert_eq!(manifest.head_asset_list.len(), 1);
    assert_eq!(manifest.head_asset_list[0].tag, AssetTag::StaticLink);
    assert_eq!(
      manifest.privileged_css_url_list.iter().collect::<Vec<_>>(),
      vec!["https://theme.cdn/base.css"]
    );
    assert_eq!(manifest.css_url_list.len(), 1);
  }

  #[test]
  fn static_mode_keeps_foreign_urls_as_static_variants() {
    let options = ParseOptions::new("/unused", HOME).with_mode(ExtractMode::BuildStatic);
    let nodes = [
      link("https://theme.cdn/other.css"),
      script("https://unpkg.com/lodash.js"),
    ];

    let (manifest, _) = fill(&nodes, &options).unwrap();

    let tags: Vec<AssetTag> = manifest.head_asset_list.iter().map(|e| e.tag).collect();
    assert_eq!(tags, vec![AssetTag::StaticLink, AssetTag::StaticScript]);
  }

  #[test]
  fn skips_links_without_href_and_ignores_protocol_relative() {
    let options = ParseOptions::new("/unused", HOME);
    let nodes = [
      DocumentNode::Link(LinkNode::default()),
      link(""),
      link("//cdn.x/app/a.css"),
    ];

    let (manifest, replacements) = fill(&nodes, &options).unwrap();
    assert!(manifest.is_empty());
    assert!(replacements.is_empty());
  }

  #[test]
  fn relative_reference_aborts_extraction() {
    let options = ParseOptions::new("/unused", HOME);
    let err = fill(&[script("static/js/main.js")], &options).unwrap_err();
    assert!(err.to_string().contains("static/js/main.js"));
  }

  #[test]
  fn legacy_links_are_rewritten_and_recorded() {
    let options = ParseOptions::new("/unused", HOME);
    let (manifest, replacements) = fill(&[link("/favicon.ico")], &options).unwrap();

    assert_eq!(
      manifest.head_asset_list[0].url(),
      Some("https://cdn.x/app/favicon.ico")
    );
    assert_eq!(manifest.head_asset_list[0].tag, AssetTag::Link);
    assert_eq!(replacements, vec![ReplacementDirective::new(
      "https://cdn.x/app/favicon.ico",
      "https://cdn.x/app/favicon.ico"
    )]);
  }

  #[test]
  fn development_bundles_produce_swap_directives() {
    let options = ParseOptions::new("/unused", HOME).with_mode(ExtractMode::BuildStatic);
    let nodes = [
      script("https://unpkg.com/react.dev.js"),
      script("https://unpkg.com/vue.dev.js"),
    ];

    let (manifest, replacements) = fill(&nodes, &options).unwrap();

    assert_eq!(manifest.head_asset_list[0].url(), Some("https://unpkg.com/react.dev.js"));
    assert_eq!(replacements, vec![
      ReplacementDirective::new("https://unpkg.com/react.dev.js", "https://unpkg.com/react.js"),
      ReplacementDirective::new("https://unpkg.com/vue.dev.js", "https://unpkg.com/vue.js"),
    ]);
  }

  #[test]
  fn crossorigin_is_preserved_when_explicitly_empty() {
    let options = ParseOptions::new("/unused", HOME);
    let nodes = [
      DocumentNode::Script(ScriptNode {
        src: Some("https://cdn.x/app/a.js".into()),
        crossorigin: Some(String::new()),
        inner_html: None,
      }),
      script("https://cdn.x/app/b.js"),
    ];

    let (manifest, _) = fill(&nodes, &options).unwrap();

    let first = &manifest.head_asset_list[0].attrs;
    assert_eq!(first.get("crossorigin").map(String::as_str), Some(""));
    let second = &manifest.head_asset_list[1].attrs;
    assert!(!second.contains_key("crossorigin"));
  }

  #[test]
  fn inline_styles_become_stylesheet_links() {
    let dir = tempdir().unwrap();
    let options = ParseOptions::new(dir.path(), HOME);
    let nodes = [
      inline_style("body { margin: 0 }"),
      inline_script("boot()"),
      DocumentNode::Style(StyleNode { inner_html: None }),
      inline_style("h1 { color: red }"),
    ];

    let (manifest, _) = fill(&nodes, &options).unwrap();

    let urls: Vec<&str> = manifest
      .head_asset_list
      .iter()
      .filter_map(AssetEntry::url)
      .collect();
    assert_eq!(urls, vec![
      "https://cdn.x/app/hel_userChunk_1.css",
      "https://cdn.x/app/hel_userChunk_2.js",
      "https://cdn.x/app/hel_userChunk_3.css",
    ]);
    let style_attrs = &manifest.head_asset_list[0].attrs;
    assert_eq!(style_attrs.get("rel").map(String::as_str), Some("stylesheet"));
    assert_eq!(
      fs::read_to_string(dir.path().join("hel_userChunk_3.css")).unwrap(),
      "h1 { color: red }"
    );
  }

  #[test]
  fn refilling_into_a_fresh_manifest_is_deterministic() {
    let dir = tempdir().unwrap();
    let options = ParseOptions::new(dir.path(), HOME);
    let nodes = [
      link("https://cdn.x/app/a.css"),
      inline_script("boot()"),
      script("https://cdn.x/app/react.dev.js"),
    ];

    let first = fill(&nodes, &options).unwrap();
    let second = fill(&nodes, &options).unwrap();

    assert_eq!(first, second);
  }
}
