//! Data structures produced while extracting a sub-application's asset manifest.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::asset_paths::AssetRewrites;
use crate::error::ExtractError;

/// Attribute name that survives purification even when explicitly empty.
pub const CROSSORIGIN_ATTR: &str = "crossorigin";

/// Manifest tag describing where an asset is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetTag {
  /// Stylesheet or link served from the app home page.
  Link,
  /// Link served from a third-party host.
  StaticLink,
  /// Script served from the app home page.
  Script,
  /// Script served from a third-party host.
  StaticScript,
}

impl AssetTag {
  /// Whether the asset is served from the sub-application's own home page.
  pub fn is_owned(self) -> bool {
    matches!(self, Self::Link | Self::Script)
  }
}

/// One manifest row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AssetEntry {
  /// Origin-based classification of the asset.
  pub tag: AssetTag,
  /// Purified attribute map in insertion order.
  pub attrs: IndexMap<String, String>,
}

impl AssetEntry {
  /// Build an entry from raw attributes, dropping unset values.
  pub fn new(tag: AssetTag, raw: RawAttrs) -> Self {
    Self {
      tag,
      attrs: purify_attrs(raw),
    }
  }

  /// The `href` or `src` the entry points at.
  pub fn url(&self) -> Option<&str> {
    self
      .attrs
      .get("href")
      .or_else(|| self.attrs.get("src"))
      .map(String::as_str)
  }
}

/// Unpurified attribute list collected for a node.
pub type RawAttrs = Vec<(&'static str, Option<String>)>;

/// Drop unset attributes.
///
/// `crossorigin` is kept for any explicitly set value, including `""` which means
/// "anonymous". Every other key is dropped when missing or empty.
pub fn purify_attrs(raw: RawAttrs) -> IndexMap<String, String> {
  raw
    .into_iter()
    .filter_map(|(key, value)| {
      let value = value?;
      if key != CROSSORIGIN_ATTR && value.is_empty() {
        return None;
      }
      Some((key.to_string(), value))
    })
    .collect()
}

/// Per-placement asset lists plus the CSS URL sets gathered across both placements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetManifest {
  /// Assets found in the document head, in document order.
  pub head_asset_list: Vec<AssetEntry>,
  /// Assets found in the document body, in document order.
  pub body_asset_list: Vec<AssetEntry>,
  /// Every `.css` link seen, deduplicated in first-seen order.
  pub css_url_list: IndexSet<String>,
  /// CSS links carrying the privileged marker.
  pub privileged_css_url_list: IndexSet<String>,
}

impl AssetManifest {
  /// The asset list for the requested placement.
  pub fn placement_mut(&mut self, is_head: bool) -> &mut Vec<AssetEntry> {
    if is_head {
      &mut self.head_asset_list
    } else {
      &mut self.body_asset_list
    }
  }

  /// Total number of entries across both placements.
  pub fn len(&self) -> usize {
    self.head_asset_list.len() + self.body_asset_list.len()
  }

  /// Returns `true` when neither placement holds an entry.
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// Request to substitute one literal string for another in emitted output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplacementDirective {
  /// Literal text to search for.
  pub to_match: String,
  /// Replacement text.
  pub to_replace: String,
}

impl ReplacementDirective {
  /// Create a directive replacing `to_match` with `to_replace`.
  pub fn new(to_match: impl Into<String>, to_replace: impl Into<String>) -> Self {
    Self {
      to_match: to_match.into(),
      to_replace: to_replace.into(),
    }
  }
}

/// Policy controlling which absolute URLs are retained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum ExtractMode {
  /// Keep only absolute URLs rooted at the app home page.
  #[default]
  #[serde(rename = "build")]
  Build,
  /// Keep every absolute URL, classifying foreign ones as static.
  #[serde(rename = "bu_st")]
  BuildStatic,
}

impl ExtractMode {
  /// The configuration spelling of the mode.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Build => "build",
      Self::BuildStatic => "bu_st",
    }
  }
}

impl FromStr for ExtractMode {
  type Err = ExtractError;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value {
      "build" => Ok(Self::Build),
      "bu_st" => Ok(Self::BuildStatic),
      other => Err(ExtractError::UnknownExtractMode(other.to_string())),
    }
  }
}

impl fmt::Display for ExtractMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Options applied while filling one placement of the manifest.
#[derive(Debug, Clone)]
pub struct ParseOptions {
  /// Directory inline chunks are written into.
  pub build_dir_path: PathBuf,
  /// Whether the nodes come from the document head.
  pub is_head: bool,
  /// Absolute URL prefix the sub-application is served from.
  pub app_home_page: String,
  /// Absolute URL retention policy.
  pub extract_mode: ExtractMode,
  /// Hreflang prefix marking a stylesheet as privileged.
  pub privileged_css_prefix: String,
  /// Legacy path and development bundle substitution tables.
  pub rewrites: AssetRewrites,
}

impl ParseOptions {
  /// Options for the given build directory and home page with default tables.
  pub fn new(build_dir_path: impl Into<PathBuf>, app_home_page: impl Into<String>) -> Self {
    Self {
      build_dir_path: build_dir_path.into(),
      is_head: true,
      app_home_page: app_home_page.into(),
      extract_mode: ExtractMode::default(),
      privileged_css_prefix: DEFAULT_PRIVILEGED_CSS_PREFIX.to_string(),
      rewrites: AssetRewrites::default(),
    }
  }

  /// Copy of these options targeting the given placement.
  pub fn for_placement(&self, is_head: bool) -> Self {
    Self {
      is_head,
      ..self.clone()
    }
  }

  /// Copy of these options with another extract mode.
  pub fn with_mode(mut self, extract_mode: ExtractMode) -> Self {
    self.extract_mode = extract_mode;
    self
  }
}

/// Default hreflang prefix for privileged stylesheets.
pub const DEFAULT_PRIVILEGED_CSS_PREFIX: &str = "PRIV_CSS";

/// `<link>` descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkNode {
  /// Referenced URL.
  pub href: Option<String>,
  /// Link relation.
  pub rel: Option<String>,
  /// Preload destination.
  pub as_: Option<String>,
  /// Language tag, doubling as the privileged CSS marker.
  pub hreflang: Option<String>,
  /// CORS mode; `Some("")` for a bare attribute.
  pub crossorigin: Option<String>,
}

/// `<script>` descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptNode {
  /// Referenced URL.
  pub src: Option<String>,
  /// CORS mode; `Some("")` for a bare attribute.
  pub crossorigin: Option<String>,
  /// Embedded script text.
  pub inner_html: Option<String>,
}

/// `<style>` descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleNode {
  /// Embedded stylesheet text.
  pub inner_html: Option<String>,
}

/// Asset-bearing document node, in head or body order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentNode {
  /// A `<link>` element.
  Link(LinkNode),
  /// A `<script>` element.
  Script(ScriptNode),
  /// A `<style>` element.
  Style(StyleNode),
}

impl DocumentNode {
  /// Lowercase tag name of the node.
  pub fn tag_name(&self) -> &'static str {
    match self {
      Self::Link(_) => "link",
      Self::Script(_) => "script",
      Self::Style(_) => "style",
    }
  }
}
