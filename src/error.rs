//! Error types shared by the manifest extractor and the runtime fetch guard.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors raised while extracting a sub-application's asset manifest.
///
/// Any of these aborts extraction for the affected sub-application; none of them are
/// recoverable per node.
#[derive(Debug, Error)]
pub enum ExtractError {
  /// The configured extract mode is not one of `build` or `bu_st`.
  #[error("unknown extract_mode [{0}]")]
  UnknownExtractMode(String),
  /// A reference that is neither absolute, protocol-relative nor rooted at the app home page.
  #[error("src or href is invalid, it must refer to a cdn host, now it is {0}")]
  InvalidReference(String),
  /// The app home page is not an absolute `http(s)` URL, so references cannot be classified.
  #[error("app_home_page must be an absolute http url, now it is [{0}]")]
  InvalidHomePage(String),
  /// Writing externalized inline content to the build directory failed.
  #[error("failed to externalize inline {kind} content to {}: {source}", path.display())]
  Externalization {
    /// File extension of the chunk being written (`js` or `css`).
    kind: String,
    /// Absolute path the chunk was written to.
    path: PathBuf,
    /// Underlying I/O failure.
    #[source]
    source: std::io::Error,
  },
}

/// Failures reported by an asynchronous retrieval wrapped in a fetch guard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetrievalError {
  /// The retrieval itself failed; the message may be empty.
  #[error("{0}")]
  Failed(String),
  /// The retrieval resolved without producing a payload.
  #[error("no component fetched")]
  Empty,
}

impl RetrievalError {
  /// Convenience constructor for a failed retrieval.
  pub fn failed(message: impl Into<String>) -> Self {
    Self::Failed(message.into())
  }
}
