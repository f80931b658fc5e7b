use async_trait::async_trait;

use super::props::FetchOptions;
use super::view::EmittedModule;
use crate::error::RetrievalError;

/// Transport used to retrieve remote styles and module bundles.
///
/// Implementations own caching; fetch guards only prevent overlapping requests.
#[async_trait]
pub trait RemoteAppService: Send + Sync + 'static {
  /// Fetch and concatenate the stylesheets at `urls`.
  async fn fetch_style_by_url_list(&self, urls: &[String]) -> Result<String, RetrievalError>;

  /// Fetch the style text registered for the named app.
  async fn fetch_style_str(
    &self,
    name: &str,
    options: &FetchOptions,
  ) -> Result<String, RetrievalError>;

  /// Fetch and emit the named app; `None` when nothing was emitted.
  async fn prefetch_app(
    &self,
    name: &str,
    options: &FetchOptions,
  ) -> Result<Option<EmittedModule>, RetrievalError>;

  /// Fetch and emit the named lib; `None` when nothing was emitted.
  async fn prefetch_lib(
    &self,
    name: &str,
    options: &FetchOptions,
  ) -> Result<Option<EmittedModule>, RetrievalError>;
}
