//! Build orchestrator responsible for extracting a sub-application's asset manifest from
//! its built document and emitting the meta file consumed by the host.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::bundle::meta::{SubAppMeta, write_meta};
use crate::bundle::replace::patch_file;
use crate::config::BuildOptions;
use crate::manifest::{ChunkWriter, ExtractionContext, FsChunkWriter, fill_asset_list, parse_document};
use crate::models::{AssetManifest, ReplacementDirective};

/// Generic build result type used by the orchestration layer.
pub type BuildResult<T> = Result<T>;

/// Artifacts produced by a single extraction run.
#[derive(Debug)]
pub struct BuildArtifacts {
  /// Meta description handed to the host.
  pub meta: SubAppMeta,
  /// The meta serialized as prettified JSON.
  pub meta_json: String,
  /// Document content after replacement directives were applied.
  pub patched_html: String,
  /// Chunk files written while externalizing inline content.
  pub chunk_files: Vec<PathBuf>,
}

/// High-level helper extracting the asset manifest for one sub-application build.
pub struct MetaBuilder {
  options: BuildOptions,
}

impl MetaBuilder {
  /// Create a builder for the provided options.
  pub fn new(options: BuildOptions) -> Self {
    Self { options }
  }

  /// Options the builder was created with.
  pub fn options(&self) -> &BuildOptions {
    &self.options
  }

  /// Scan the built document, externalize inline chunks, patch the document and write the
  /// meta file next to it.
  pub fn build(&self) -> BuildResult<BuildArtifacts> {
    let index_path = self.options.index_html_path();
    let html = fs::read_to_string(&index_path)
      .with_context(|| format!("failed to read {}", index_path.display()))?;

    let mut context = ExtractionContext::with_writer(FsChunkWriter);
    let (manifest, replacements) = match self.extract(&html, &mut context) {
      Ok(extracted) => extracted,
      Err(err) => {
        discard_chunks(context.written_files());
        return Err(err);
      }
    };
    let (_, chunk_files) = context.into_parts();

    let patched_html = patch_file(&index_path, &replacements)?;

    let meta = SubAppMeta {
      name: self.options.app_name.clone(),
      home_page: self.options.parse.app_home_page.clone(),
      extract_mode: self.options.parse.extract_mode,
      manifest,
      replacements,
    };
    let meta_json = write_meta(&self.options.meta_json_path(), &meta)?;

    info!(
      "extracted {} head and {} body assets for [{}], {} inline chunks",
      meta.manifest.head_asset_list.len(),
      meta.manifest.body_asset_list.len(),
      meta.name,
      chunk_files.len()
    );

    Ok(BuildArtifacts {
      meta,
      meta_json,
      patched_html,
      chunk_files,
    })
  }

  /// Fill a fresh manifest from an HTML document using the given extraction context.
  ///
  /// The head is processed before the body so chunk numbering follows document order.
  pub fn extract<W: ChunkWriter>(
    &self,
    html: &str,
    context: &mut ExtractionContext<W>,
  ) -> BuildResult<(AssetManifest, Vec<ReplacementDirective>)> {
    let document = parse_document(html);
    let mut manifest = AssetManifest::default();
    let mut replacements = Vec::new();

    for (is_head, nodes) in [(true, &document.head), (false, &document.body)] {
      let options = self.options.parse.for_placement(is_head);
      let produced = fill_asset_list(nodes, &mut manifest, &options, context).with_context(|| {
        format!(
          "failed to extract {} assets for [{}]",
          if is_head { "head" } else { "body" },
          self.options.app_name
        )
      })?;
      replacements.extend(produced);
    }

    Ok((manifest, replacements))
  }
}

fn discard_chunks(paths: &[PathBuf]) {
  for path in paths {
    if let Err(err) = fs::remove_file(path) {
      warn!("failed to remove chunk {}: {err}", path.display());
    }
  }
}
