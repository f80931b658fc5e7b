use regex::Regex;
use tracing::debug;

use crate::error::ExtractError;
use crate::models::{ExtractMode, ParseOptions};

struct ReferencePatterns {
    absolute: Regex,
    protocol_relative: Regex,
}

fn reference_patterns() -> &'static ReferencePatterns {
    use std::sync::OnceLock;

    static PATTERNS: OnceLock<ReferencePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| ReferencePatterns {
        absolute: Regex::new(r"^http").expect("invalid absolute url regex"),
        protocol_relative: Regex::new(r"^//").expect("invalid protocol-relative regex"),
    })
}

/// Outcome of evaluating the ignore rules for one reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreDecision {
    /// Drop the node from the manifest.
    Ignore,
    /// Keep the node. An empty reference also yields this so callers try inline content.
    Keep,
    /// Keep the node regardless of other rules because it carries the privileged marker.
    KeepPrivileged,
}

impl IgnoreDecision {
    /// Whether the node should be dropped.
    pub fn is_ignored(self) -> bool {
        self == Self::Ignore
    }
}

/// Determine whether a `src`/`href` reference should be left out of the manifest.
///
/// `hreflang` is only meaningful for links; stylesheets whose language tag starts with the
/// privileged prefix always survive. Unknown modes are rejected when [`ExtractMode`] is
/// parsed, so the only failure here is a reference the sub-application's packaging should
/// have rooted at its home page.
pub fn need_ignore(
    options: &ParseOptions,
    reference: &str,
    hreflang: Option<&str>,
) -> Result<IgnoreDecision, ExtractError> {
    if reference.is_empty() {
        return Ok(IgnoreDecision::Keep);
    }

    if is_privileged(options, hreflang) {
        return Ok(IgnoreDecision::KeepPrivileged);
    }

    let patterns = reference_patterns();
    if patterns.absolute.is_match(reference) {
        let ignored = match options.extract_mode {
            ExtractMode::Build => !reference.starts_with(&options.app_home_page),
            ExtractMode::BuildStatic => false,
        };
        return Ok(if ignored {
            IgnoreDecision::Ignore
        } else {
            IgnoreDecision::Keep
        });
    }

    if patterns.protocol_relative.is_match(reference) {
        debug!("protocol-relative reference {reference} is not supported");
        return Ok(IgnoreDecision::Ignore);
    }

    Err(ExtractError::InvalidReference(reference.to_string()))
}

/// Whether a link's language tag marks it as a privileged stylesheet.
pub fn is_privileged(options: &ParseOptions, hreflang: Option<&str>) -> bool {
    hreflang.is_some_and(|lang| lang.starts_with(&options.privileged_css_prefix))
}
