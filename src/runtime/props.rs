//! Remote module props and the fetch options derived from them.

use super::platform::PlatformRegistry;

/// Props supplied by the host for a remote module; unset values take defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteModuleProps {
  /// Remote app or lib name.
  pub name: String,
  /// Platform to load from.
  pub platform: Option<String>,
  /// Pinned version.
  pub version_id: Option<String>,
  /// Load as a library rather than an app.
  pub is_lib: Option<bool>,
  /// Render inside a shadow root.
  pub shadow: Option<bool>,
  /// Fetch styles as a string instead of appending links.
  pub set_style_as_string: Option<bool>,
  /// Append style links to the document.
  pub append_css: Option<bool>,
  /// Legacy rendering mode.
  pub is_legacy: Option<bool>,
  /// Allow disk caching of fetched bundles.
  pub enable_disk_cache: Option<bool>,
  /// Extra stylesheets fetched alongside the module's own.
  pub extra_css_url_list: Vec<String>,
}

/// Props with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProps {
  /// Remote app or lib name.
  pub name: String,
  /// Platform to load from, if given.
  pub platform: Option<String>,
  /// Pinned version.
  pub version_id: Option<String>,
  /// Load as a library rather than an app.
  pub is_lib: bool,
  /// Render inside a shadow root.
  pub shadow: bool,
  /// Fetch styles as a string.
  pub set_style_as_string: bool,
  /// Append style links to the document.
  pub append_css: bool,
  /// Legacy rendering mode.
  pub is_legacy: bool,
  /// Allow disk caching of fetched bundles.
  pub enable_disk_cache: Option<bool>,
  /// Extra stylesheets.
  pub extra_css_url_list: Vec<String>,
}

impl RemoteModuleProps {
  /// Props for the named module with everything else unset.
  pub fn named(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      ..Self::default()
    }
  }

  /// Apply defaults.
  ///
  /// A style string is only needed inside a shadow root, so unless `append_css` is set
  /// explicitly, links are appended exactly when no style string is requested.
  pub fn ensure_defaults(&self) -> ResolvedProps {
    let shadow = self.shadow.unwrap_or(false);
    let set_style_as_string = self.set_style_as_string.unwrap_or(false);
    let need_style_str = shadow && set_style_as_string;

    ResolvedProps {
      name: self.name.clone(),
      platform: self.platform.clone(),
      version_id: self.version_id.clone(),
      is_lib: self.is_lib.unwrap_or(false),
      shadow,
      set_style_as_string,
      append_css: self.append_css.unwrap_or(!need_style_str),
      is_legacy: self.is_legacy.unwrap_or(false),
      enable_disk_cache: self.enable_disk_cache,
      extra_css_url_list: self.extra_css_url_list.clone(),
    }
  }
}

/// Options forwarded to every retrieval for a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
  /// Resolved platform.
  pub platform: String,
  /// Pinned version.
  pub version_id: Option<String>,
  /// Append style links to the document.
  pub append_css: bool,
  /// Fetch styles as a string.
  pub set_style_as_string: bool,
  /// Allow disk caching of fetched bundles.
  pub enable_disk_cache: Option<bool>,
  /// Extra stylesheets.
  pub extra_css_url_list: Vec<String>,
}

impl FetchOptions {
  /// Derive fetch options, falling back to the registry's default platform.
  pub fn from_props(props: &ResolvedProps, platforms: &PlatformRegistry) -> Self {
    Self {
      platform: platforms.get_platform(props.platform.as_deref()),
      version_id: props.version_id.clone(),
      append_css: props.append_css,
      set_style_as_string: props.set_style_as_string,
      enable_disk_cache: props.enable_disk_cache,
      extra_css_url_list: props.extra_css_url_list.clone(),
    }
  }
}
