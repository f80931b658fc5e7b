//! Helpers for classifying and filtering asset references found in a sub-application.
//!
//! Filtering references, classifying them by origin, and rewriting legacy or development
//! references are split into focused submodules so each rule can be tested independently.

mod classify;
mod filters;
mod rewrites;

pub use classify::{home_page_url, link_tag, script_tag};
pub use filters::{IgnoreDecision, is_privileged, need_ignore};
pub use rewrites::{AssetRewrites, BundleSwap};
