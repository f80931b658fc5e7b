//! Platform lookup used to resolve where remote modules are fetched from.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Platform used when neither the caller nor the registry names one.
pub const DEFAULT_PLATFORM: &str = "unpkg";

/// Connection details for one platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlatformConfig {
  /// Host remote bundles are served from.
  pub host: String,
}

/// Registry of known platforms and the platform each app was registered under.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlatformRegistry {
  /// Platform used when none is given.
  pub default_platform: String,
  /// Known platforms keyed by name.
  pub platforms: HashMap<String, PlatformConfig>,
  /// Platform each app was registered under.
  pub app_platforms: HashMap<String, String>,
}

impl Default for PlatformRegistry {
  fn default() -> Self {
    let mut platforms = HashMap::new();
    platforms.insert(DEFAULT_PLATFORM.to_string(), PlatformConfig {
      host: "https://unpkg.com".into(),
    });
    Self {
      default_platform: DEFAULT_PLATFORM.into(),
      platforms,
      app_platforms: HashMap::new(),
    }
  }
}

/// Minimal context describing a remote app, usable outside a mounted host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelContext {
  /// App name.
  pub name: String,
  /// Platform the app is loaded from.
  pub platform: String,
  /// Pinned version, empty when unpinned.
  pub version_id: String,
}

impl PlatformRegistry {
  /// The explicit platform when non-empty, otherwise the default platform.
  pub fn get_platform(&self, platform: Option<&str>) -> String {
    platform
      .filter(|value| !value.is_empty())
      .unwrap_or(self.default_platform.as_str())
      .to_string()
  }

  /// Configuration for the resolved platform.
  pub fn get_platform_config(&self, platform: Option<&str>) -> Option<&PlatformConfig> {
    self.platforms.get(&self.get_platform(platform))
  }

  /// Host of the resolved platform.
  pub fn get_platform_host(&self, platform: Option<&str>) -> Option<&str> {
    self
      .get_platform_config(platform)
      .map(|config| config.host.as_str())
  }

  /// Record the platform an app was loaded from.
  pub fn register_app(&mut self, name: impl Into<String>, platform: impl Into<String>) {
    self.app_platforms.insert(name.into(), platform.into());
  }

  /// Platform an app was registered under, or the default platform.
  pub fn app_platform(&self, name: &str) -> String {
    self
      .app_platforms
      .get(name)
      .cloned()
      .unwrap_or_else(|| self.default_platform.clone())
  }

  /// Context for `name`, preferring explicit options over registered values.
  pub fn fake_context(
    &self,
    name: &str,
    platform: Option<&str>,
    version_id: Option<&str>,
  ) -> HelContext {
    HelContext {
      name: name.to_string(),
      platform: platform
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| self.app_platform(name)),
      version_id: version_id.unwrap_or_default().to_string(),
    }
  }
}
