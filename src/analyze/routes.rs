//! Route derivation from `app/**/page.*` files.

use super::SOURCE_EXTENSIONS;

/// Top-level routing directory.
pub const APP_DIR: &str = "app";

/// Returns `true` for `page.<ext>` files anywhere under `app/`, where `ext`
/// is a recognized source extension.
#[must_use]
pub fn is_page(path: &str) -> bool {
    let Some(rest) = path.strip_prefix("app/") else {
        return false;
    };
    let file_name = rest.rsplit('/').next().unwrap_or(rest);
    file_name
        .rsplit_once('.')
        .is_some_and(|(stem, ext)| stem == "page" && SOURCE_EXTENSIONS.contains(&ext))
}

/// Route path served by the page at `path`.
///
/// `app/page.tsx` maps to `/`, `app/dashboard/settings/page.tsx` to
/// `/dashboard/settings`. Directory names are kept verbatim.
#[must_use]
pub fn route_for_page(path: &str) -> String {
    let dir = path.rsplit_once('/').map_or("", |(dir, _)| dir);
    let route = dir.strip_prefix(APP_DIR).unwrap_or(dir);
    if route.is_empty() {
        "/".to_string()
    } else {
        route.to_string()
    }
}

/// Routes for every page in `paths`, in order, duplicates kept.
#[must_use]
pub fn discover_routes<'a>(paths: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    paths.into_iter().filter(|p| is_page(p)).map(|p| route_for_page(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_page_maps_to_slash() {
        assert_eq!(route_for_page("app/page.tsx"), "/");
    }

    #[test]
    fn nested_page_maps_to_directory_path() {
        assert_eq!(route_for_page("app/dashboard/settings/page.tsx"), "/dashboard/settings");
        assert_eq!(route_for_page("app/blog/[slug]/page.js"), "/blog/[slug]");
    }

    #[test]
    fn only_pages_under_app_count() {
        assert!(is_page("app/page.tsx"));
        assert!(is_page("app/about/page.jsx"));
        assert!(!is_page("app/about/pages.tsx"));
        assert!(!is_page("app/about/page-header.tsx"));
        assert!(!is_page("app/about/page.test.tsx"));
        assert!(!is_page("app/about/page.mdx"));
        assert!(!is_page("components/page.tsx"));
    }

    #[test]
    fn duplicate_variants_are_not_deduplicated() {
        let paths = vec![
            "app/page.ts".to_string(),
            "app/page.tsx".to_string(),
            "app/layout.tsx".to_string(),
            "app/shop/page.tsx".to_string(),
        ];
        assert_eq!(discover_routes(&paths), vec!["/", "/", "/shop"]);
    }
}
