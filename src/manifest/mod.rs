//! Asset manifest extraction broken into focused submodules for easier testing.

mod document;
mod externalize;
mod fill;

pub use document::{ParsedDocument, parse_attributes, parse_document, scan_nodes};
pub use externalize::{
    CHUNK_FILE_PREFIX, ChunkKind, ChunkWriter, ExtractionContext, FsChunkWriter,
};
pub use fill::fill_asset_list;
