//! Project configuration loader describing where a sub-application build lives and how
//! its assets should be extracted.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::asset_paths::{AssetRewrites, BundleSwap};
use crate::error::ExtractError;
use crate::models::{DEFAULT_PRIVILEGED_CSS_PREFIX, ExtractMode, ParseOptions};

/// Configuration file searched for in the project directory.
pub const DEFAULT_CONFIG_FILE: &str = "hel.config.json";

/// Discoverable project configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
  /// Sub-application name recorded in the emitted meta file.
  pub app_name: String,
  /// Build output directory, relative to the project directory.
  pub build_dir: String,
  /// Absolute URL prefix the built assets are served from.
  pub app_home_page: String,
  /// Extract mode spelling (`build` or `bu_st`).
  pub extract_mode: String,
  /// Name of the built document to scan.
  pub index_html_file: String,
  /// Name of the meta JSON file written into the build directory.
  pub meta_json_file: String,
  /// Root-relative paths rewritten onto the home page.
  pub legacy_paths: Vec<String>,
  /// Development to production bundle substitutions.
  pub bundle_swaps: Vec<BundleSwap>,
  /// Hreflang prefix marking privileged stylesheets.
  pub privileged_css_prefix: String,
}

impl Default for ProjectConfig {
  fn default() -> Self {
    let rewrites = AssetRewrites::default();
    Self {
      app_name: String::new(),
      build_dir: "build".into(),
      app_home_page: String::new(),
      extract_mode: ExtractMode::Build.as_str().into(),
      index_html_file: "index.html".into(),
      meta_json_file: "hel-meta.json".into(),
      legacy_paths: rewrites.legacy_paths,
      bundle_swaps: rewrites.bundle_swaps,
      privileged_css_prefix: DEFAULT_PRIVILEGED_CSS_PREFIX.into(),
    }
  }
}

/// Fully resolved inputs for one extraction run.
#[derive(Debug, Clone)]
pub struct BuildOptions {
  /// Sub-application name.
  pub app_name: String,
  /// Absolute or project-relative build directory.
  pub build_dir: PathBuf,
  /// Name of the built document to scan.
  pub index_html_file: String,
  /// Name of the meta JSON file to write.
  pub meta_json_file: String,
  /// Parse options shared by both placements; `is_head` is set per placement.
  pub parse: ParseOptions,
}

impl BuildOptions {
  /// Path of the document that will be scanned.
  pub fn index_html_path(&self) -> PathBuf {
    self.build_dir.join(&self.index_html_file)
  }

  /// Path the meta file will be written to.
  pub fn meta_json_path(&self) -> PathBuf {
    self.build_dir.join(&self.meta_json_file)
  }
}

impl ProjectConfig {
  /// Attempt to load configuration from the provided directory.
  ///
  /// When the configuration file does not exist or fails to parse we fall back to default
  /// values so callers can still supply everything on the command line.
  pub fn discover(project_dir: &Path) -> Self {
    let candidate = project_dir.join(DEFAULT_CONFIG_FILE);
    Self::from_path(&candidate).unwrap_or_default()
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> Option<Self> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
  }

  /// Substitution tables described by this configuration.
  pub fn rewrites(&self) -> AssetRewrites {
    AssetRewrites {
      legacy_paths: self.legacy_paths.clone(),
      bundle_swaps: self.bundle_swaps.clone(),
    }
  }

  /// Build directory resolved against the project directory.
  pub fn build_dir_path(&self, project_dir: &Path) -> PathBuf {
    project_dir.join(&self.build_dir)
  }

  /// Validate the configuration and resolve it into build options.
  pub fn to_build_options(&self, project_dir: &Path) -> Result<BuildOptions, ExtractError> {
    let extract_mode: ExtractMode = self.extract_mode.parse()?;
    // An empty prefix would match every reference and tag third-party assets as owned.
    let home_page = self.app_home_page.trim();
    if home_page.len() <= "http".len() || !home_page.starts_with("http") {
      return Err(ExtractError::InvalidHomePage(self.app_home_page.clone()));
    }
    let build_dir = self.build_dir_path(project_dir);
    let parse = ParseOptions {
      build_dir_path: build_dir.clone(),
      is_head: true,
      app_home_page: self.app_home_page.clone(),
      extract_mode,
      privileged_css_prefix: self.privileged_css_prefix.clone(),
      rewrites: self.rewrites(),
    };

    Ok(BuildOptions {
      app_name: self.app_name.clone(),
      build_dir,
      index_html_file: self.index_html_file.clone(),
      meta_json_file: self.meta_json_file.clone(),
      parse,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn discover_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let config = ProjectConfig::discover(dir.path());
    assert_eq!(config.build_dir, "build");
    assert_eq!(config.extract_mode, "build");
    assert_eq!(config.legacy_paths.len(), 2);
  }

  #[test]
  fn discover_reads_partial_configuration() {
    let dir = tempdir().unwrap();
    fs::write(
      dir.path().join(DEFAULT_CONFIG_FILE),
      r#"{"app_name":"demo","app_home_page":"https://cdn.x/demo","extract_mode":"bu_st","build_dir":"dist"}"#,
    )
    .unwrap();

    let config = ProjectConfig::discover(dir.path());
    let options = config.to_build_options(dir.path()).unwrap();

    assert_eq!(options.app_name, "demo");
    assert_eq!(options.build_dir, dir.path().join("dist"));
    assert_eq!(options.parse.extract_mode, ExtractMode::BuildStatic);
    assert_eq!(options.parse.app_home_page, "https://cdn.x/demo");
    assert_eq!(options.index_html_path(), dir.path().join("dist/index.html"));
    assert_eq!(options.meta_json_path(), dir.path().join("dist/hel-meta.json"));
  }

  #[test]
  fn malformed_configuration_is_ignored() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "{ not json").unwrap();
    assert_eq!(ProjectConfig::discover(dir.path()).build_dir, "build");
  }

  #[test]
  fn unknown_mode_fails_option_resolution() {
    let config = ProjectConfig {
      extract_mode: "foo".into(),
      ..ProjectConfig::default()
    };
    let err = config.to_build_options(Path::new(".")).unwrap_err();
    assert_eq!(err.to_string(), "unknown extract_mode [foo]");
  }

  #[test]
  fn home_page_must_be_an_absolute_http_url() {
    for home in ["", "   ", "/app", "cdn.x/app", "http"] {
      let config = ProjectConfig {
        app_home_page: home.into(),
        ..ProjectConfig::default()
      };
      let err = config.to_build_options(Path::new(".")).unwrap_err();
      assert!(
        matches!(err, ExtractError::InvalidHomePage(ref value) if value == home),
        "accepted home page [{home}]"
      );
    }

    let config = ProjectConfig {
      app_home_page: "https://cdn.x/app".into(),
      ..ProjectConfig::default()
    };
    assert!(config.to_build_options(Path::new(".")).is_ok());
  }
}
