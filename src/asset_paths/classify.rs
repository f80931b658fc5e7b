use crate::models::AssetTag;

/// Classify a link reference by origin.
///
/// References rooted at the app home page are owned (`link`); everything else is served
/// from a third party (`staticLink`).
pub fn link_tag(app_home_page: &str, reference: &str) -> AssetTag {
    if reference.starts_with(app_home_page) {
        AssetTag::Link
    } else {
        AssetTag::StaticLink
    }
}

/// Classify a script reference by origin, mirroring [`link_tag`].
pub fn script_tag(app_home_page: &str, reference: &str) -> AssetTag {
    if reference.starts_with(app_home_page) {
        AssetTag::Script
    } else {
        AssetTag::StaticScript
    }
}

/// Join a file name onto the home page, producing the web path it will be served from.
pub fn home_page_url(app_home_page: &str, file_name: &str) -> String {
    format!(
        "{}/{}",
        app_home_page.trim_end_matches('/'),
        file_name.trim_start_matches('/')
    )
}
