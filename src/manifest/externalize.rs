//! Persisting inline `<script>` and `<style>` bodies as standalone chunk files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::asset_paths::home_page_url;
use crate::error::ExtractError;
use crate::models::ParseOptions;

/// Prefix of every externalized chunk file name.
pub const CHUNK_FILE_PREFIX: &str = "hel_userChunk_";

/// Kind of inline content being externalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
  /// Inline script body, written as `.js`.
  Script,
  /// Inline stylesheet body, written as `.css`.
  Style,
}

impl ChunkKind {
  /// File extension used for the chunk.
  pub fn extension(self) -> &'static str {
    match self {
      Self::Script => "js",
      Self::Style => "css",
    }
  }
}

/// Sink receiving externalized chunk contents.
pub trait ChunkWriter {
  /// Write `content` to the absolute `path`.
  fn write_chunk(&mut self, path: &Path, content: &str) -> std::io::Result<()>;
}

/// Writes chunks straight to the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsChunkWriter;

impl ChunkWriter for FsChunkWriter {
  fn write_chunk(&mut self, path: &Path, content: &str) -> std::io::Result<()> {
    fs::write(path, content)
  }
}

/// State shared across every placement processed during one extraction run.
///
/// The chunk counter only ever increases, so chunk names never collide within a run no
/// matter how script and style nodes interleave. A fresh context starts again at `1`.
#[derive(Debug, Default)]
pub struct ExtractionContext<W = FsChunkWriter> {
  last_chunk: usize,
  writer: W,
  written: Vec<PathBuf>,
}

impl ExtractionContext<FsChunkWriter> {
  /// Context writing chunks to the local file system.
  pub fn new() -> Self {
    Self::with_writer(FsChunkWriter)
  }
}

impl<W: ChunkWriter> ExtractionContext<W> {
  /// Context using a custom chunk sink.
  pub fn with_writer(writer: W) -> Self {
    Self {
      last_chunk: 0,
      writer,
      written: Vec::new(),
    }
  }

  /// Number of chunks externalized so far.
  pub fn chunk_count(&self) -> usize {
    self.last_chunk
  }

  /// Absolute paths of every chunk written so far, in write order.
  pub fn written_files(&self) -> &[PathBuf] {
    &self.written
  }

  /// Consume the context, returning the sink and the written paths.
  pub fn into_parts(self) -> (W, Vec<PathBuf>) {
    (self.writer, self.written)
  }

  /// Write inline content into the build directory and return its web path.
  ///
  /// Returns `Ok(None)` without consuming a chunk number when there is nothing to write.
  pub fn externalize(
    &mut self,
    content: Option<&str>,
    kind: ChunkKind,
    options: &ParseOptions,
  ) -> Result<Option<String>, ExtractError> {
    let Some(content) = content.filter(|value| !value.is_empty()) else {
      return Ok(None);
    };

    debug!(
      "found a customized {} tag in html, extracting its content",
      kind.extension()
    );
    self.last_chunk += 1;
    let file_name = format!(
      "{CHUNK_FILE_PREFIX}{}.{}",
      self.last_chunk,
      kind.extension()
    );
    let path = options.build_dir_path.join(&file_name);
    let web_path = home_page_url(&options.app_home_page, &file_name);

    self
      .writer
      .write_chunk(&path, content)
      .map_err(|source| ExtractError::Externalization {
        kind: kind.extension().to_string(),
        path: path.clone(),
        source,
      })?;
    info!("externalized inline {} to {web_path}", kind.extension());
    self.written.push(path);

    Ok(Some(web_path))
  }
}
