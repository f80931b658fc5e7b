use serde::{Deserialize, Serialize};

use super::classify::home_page_url;
use crate::models::ReplacementDirective;

/// A development framework bundle and the production bundle that should replace it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BundleSwap {
    /// File name suffix of the development bundle, e.g. `react.dev.js`.
    pub dev: String,
    /// File name of the production bundle, e.g. `react.js`.
    pub prod: String,
}

impl BundleSwap {
    /// Create a swap from `dev` to `prod`.
    pub fn new(dev: impl Into<String>, prod: impl Into<String>) -> Self {
        Self {
            dev: dev.into(),
            prod: prod.into(),
        }
    }
}

/// Substitution tables applied while filling the manifest.
///
/// Older create-react-app builds leave a couple of well-known links unprefixed even after
/// the public path is changed, and sub-applications occasionally ship development builds
/// of their framework. Both lists are configuration data rather than fixed literals.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetRewrites {
    /// Root-relative paths that are rewritten onto the app home page.
    pub legacy_paths: Vec<String>,
    /// Development to production bundle substitutions.
    pub bundle_swaps: Vec<BundleSwap>,
}

impl Default for AssetRewrites {
    fn default() -> Self {
        Self {
            legacy_paths: vec!["/manifest.json".into(), "/favicon.ico".into()],
            bundle_swaps: vec![
                BundleSwap::new("react.dev.js", "react.js"),
                BundleSwap::new("vue.dev.js", "vue.js"),
            ],
        }
    }
}

impl AssetRewrites {
    /// Rewrite a legacy well-known path onto the home page.
    ///
    /// Returns the rewritten reference together with the directive that records it, or
    /// `None` when the reference is not one of the configured legacy paths.
    pub fn rewrite_legacy_path(
        &self,
        app_home_page: &str,
        reference: &str,
    ) -> Option<(String, ReplacementDirective)> {
        if !self.legacy_paths.iter().any(|path| path == reference) {
            return None;
        }

        let rewritten = home_page_url(app_home_page, reference);
        let directive = ReplacementDirective::new(rewritten.clone(), rewritten.clone());
        Some((rewritten, directive))
    }

    /// Directive swapping a development framework bundle for its production build.
    pub fn swap_dev_bundle(&self, src: &str) -> Option<ReplacementDirective> {
        self.bundle_swaps.iter().find_map(|swap| {
            let prefix = src.strip_suffix(swap.dev.as_str())?;
            Some(ReplacementDirective::new(src, format!("{prefix}{}", swap.prod)))
        })
    }
}
