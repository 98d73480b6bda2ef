//! services/api/src/web/locale.rs
//!
//! Locale resolution for page routes. Every page URL carries a locale
//! prefix (`/en/...`, `/es/...`); requests without one are redirected
//! to the default-locale equivalent. API routes, framework internals
//! and static assets pass through untouched.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::i18n;

/// Path prefixes that never participate in locale resolution.
const BYPASS_PREFIXES: [&str; 5] = ["/api", "/_next", "/health", "/swagger-ui", "/api-docs"];

fn is_bypassed(path: &str) -> bool {
    if BYPASS_PREFIXES
        .iter()
        .any(|p| path == *p || path.starts_with(&format!("{}/", p)))
    {
        return true;
    }
    // Anything with a file extension is a static asset.
    path.rsplit('/').next().is_some_and(|seg| seg.contains('.'))
}

/// True for segments that look like a locale tag (`en`, `pt`, `pt-BR`)
/// whether or not we actually serve them.
fn is_locale_shaped(segment: &str) -> bool {
    match segment.len() {
        2 => segment.chars().all(|c| c.is_ascii_lowercase()),
        5 => {
            let bytes = segment.as_bytes();
            bytes[2] == b'-'
                && segment[..2].chars().all(|c| c.is_ascii_lowercase())
                && segment[3..].chars().all(|c| c.is_ascii_alphabetic())
        }
        _ => false,
    }
}

/// Decides whether a request path needs a locale redirect.
///
/// Returns `None` when the path should pass through unchanged, or
/// `Some(target)` with the path the client should be redirected to.
pub fn resolve(path: &str) -> Option<String> {
    if is_bypassed(path) {
        return None;
    }

    let mut segments = path.trim_start_matches('/').splitn(2, '/');
    let first = segments.next().unwrap_or_default();
    let rest = segments.next().unwrap_or_default();

    if first.is_empty() {
        return Some(format!("/{}", i18n::DEFAULT_LOCALE));
    }

    if i18n::is_supported(first) {
        return None;
    }

    if is_locale_shaped(first) {
        // A locale tag we do not serve: swap it for the default rather
        // than stacking a second prefix in front of it.
        return Some(if rest.is_empty() {
            format!("/{}", i18n::DEFAULT_LOCALE)
        } else {
            format!("/{}/{}", i18n::DEFAULT_LOCALE, rest)
        });
    }

    Some(format!(
        "/{}{}",
        i18n::DEFAULT_LOCALE,
        path.trim_end_matches('/')
    ))
}

/// Axum layer applying [`resolve`] with a 307 redirect, preserving the
/// query string.
pub async fn locale_redirect(req: Request, next: Next) -> Response {
    if let Some(mut target) = resolve(req.uri().path()) {
        if let Some(query) = req.uri().query() {
            target.push('?');
            target.push_str(query);
        }
        return Redirect::temporary(&target).into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_redirects_to_default_locale() {
        assert_eq!(resolve("/").as_deref(), Some("/en"));
    }

    #[test]
    fn unprefixed_pages_gain_the_default_prefix() {
        assert_eq!(resolve("/about").as_deref(), Some("/en/about"));
        assert_eq!(resolve("/services/seo").as_deref(), Some("/en/services/seo"));
    }

    #[test]
    fn supported_prefixes_pass_through() {
        assert_eq!(resolve("/en"), None);
        assert_eq!(resolve("/es/contacto"), None);
    }

    #[test]
    fn unsupported_locale_tags_are_replaced_not_stacked() {
        assert_eq!(resolve("/fr/about").as_deref(), Some("/en/about"));
        assert_eq!(resolve("/pt-BR/precos").as_deref(), Some("/en/precos"));
        assert_eq!(resolve("/de").as_deref(), Some("/en"));
    }

    #[test]
    fn api_and_framework_paths_are_bypassed() {
        assert_eq!(resolve("/api/leads"), None);
        assert_eq!(resolve("/api"), None);
        assert_eq!(resolve("/_next/static/chunk.js"), None);
        assert_eq!(resolve("/health"), None);
    }

    #[test]
    fn dotted_asset_paths_are_bypassed() {
        assert_eq!(resolve("/favicon.ico"), None);
        assert_eq!(resolve("/images/logo.svg"), None);
    }

    #[test]
    fn locale_shaped_is_strict_about_shape() {
        assert!(is_locale_shaped("en"));
        assert!(is_locale_shaped("pt-BR"));
        assert!(!is_locale_shaped("api"));
        assert!(!is_locale_shaped("blog"));
        assert!(!is_locale_shaped("EN"));
    }
}
