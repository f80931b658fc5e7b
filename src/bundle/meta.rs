//! Loading and writing the serialized sub-application meta file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::{AssetManifest, ExtractMode, ReplacementDirective};

/// Serialized description of a sub-application handed to the host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAppMeta {
  /// Sub-application name.
  #[serde(default)]
  pub name: String,
  /// Absolute URL prefix the sub-application is served from.
  pub home_page: String,
  /// Extract mode used to build the manifest.
  #[serde(default)]
  pub extract_mode: ExtractMode,
  /// Extracted asset manifest.
  pub manifest: AssetManifest,
  /// Replacement directives applied to the emitted document.
  #[serde(default)]
  pub replacements: Vec<ReplacementDirective>,
}

/// Load a meta file from disk.
pub fn load_meta(path: &Path) -> Result<SubAppMeta> {
  let content =
    fs::read_to_string(path).with_context(|| format!("meta file not found at {}", path.display()))?;
  let meta: SubAppMeta = serde_json::from_str(&content)
    .with_context(|| format!("failed to parse meta JSON at {}", path.display()))?;
  Ok(meta)
}

/// Serialize the meta as pretty JSON and write it to `path`.
pub fn write_meta(path: &Path, meta: &SubAppMeta) -> Result<String> {
  let json = serde_json::to_string_pretty(meta).context("failed to serialize meta JSON")?;
  fs::write(path, &json).with_context(|| format!("failed to write {}", path.display()))?;
  Ok(json)
}
