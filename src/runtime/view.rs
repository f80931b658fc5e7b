//! Values handed to the host renderer.

/// A module emitted by a completed retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedModule {
  /// App or lib name.
  pub name: String,
  /// Platform it was loaded from.
  pub platform: String,
  /// Version that was loaded, when known.
  pub version_id: Option<String>,
  /// Whether it was loaded as a library.
  pub is_lib: bool,
}

/// What the host should mount in place of the remote module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleSlot {
  /// Placeholder while retrievals are outstanding.
  Skeleton,
  /// Error view carrying the failure message.
  Error(String),
  /// The loaded module.
  Ready(EmittedModule),
}

/// Render input for a remote module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteModuleView {
  /// Component slot to mount.
  pub remote_module: ModuleSlot,
  /// Style text to inject, empty unless fetched as a string.
  pub style_str: String,
  /// Stylesheet URLs to link.
  pub style_url_list: Vec<String>,
  /// Whether the module can be mounted.
  pub module_ready: bool,
}

impl RemoteModuleView {
  /// Placeholder result returned while a retrieval is outstanding.
  pub fn fetching() -> Self {
    Self {
      remote_module: ModuleSlot::Skeleton,
      style_str: String::new(),
      style_url_list: Vec::new(),
      module_ready: false,
    }
  }

  /// Error result carrying `message`.
  pub fn error(message: impl Into<String>) -> Self {
    Self {
      remote_module: ModuleSlot::Error(message.into()),
      ..Self::fetching()
    }
  }

  /// Ready result for a loaded module.
  pub fn ready(module: EmittedModule, style_str: String, style_url_list: Vec<String>) -> Self {
    Self {
      remote_module: ModuleSlot::Ready(module),
      style_str,
      style_url_list,
      module_ready: true,
    }
  }

  /// Text of the default error view, if this is an error result.
  pub fn error_banner(&self) -> Option<String> {
    match &self.remote_module {
      ModuleSlot::Error(message) => Some(format!("Hel MicroComp error: {message}")),
      _ => None,
    }
  }
}
