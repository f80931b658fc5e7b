//! Applying replacement directives to emitted documents and bundles.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::models::ReplacementDirective;

/// Apply every directive to `text` in order, replacing all literal occurrences.
pub fn apply_replacements(text: &str, directives: &[ReplacementDirective]) -> String {
  directives
    .iter()
    .filter(|directive| !directive.to_match.is_empty())
    .fold(text.to_string(), |acc, directive| {
      acc.replace(&directive.to_match, &directive.to_replace)
    })
}

/// Apply directives to a file in place, returning the patched content.
pub fn patch_file(path: &Path, directives: &[ReplacementDirective]) -> Result<String> {
  let text =
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
  let patched = apply_replacements(&text, directives);
  if patched != text {
    debug!("applied {} replacements to {}", directives.len(), path.display());
    fs::write(path, &patched).with_context(|| format!("failed to write {}", path.display()))?;
  }
  Ok(patched)
}
