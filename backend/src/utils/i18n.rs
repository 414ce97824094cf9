//! Internationalization utilities for the backend
//!
//! This module provides locale extraction from HTTP requests and
//! task-local storage for the locale of the request being served.

use std::future::Future;

tokio::task_local! {
    static CURRENT_LOCALE: String;
}

/// Supported locales
pub const SUPPORTED_LOCALES: &[&str] = &["en", "ml"];
pub const DEFAULT_LOCALE: &str = "en";

/// Run `fut` with `locale` as the current locale.
///
/// The value follows the task across worker threads, so it is still visible
/// when an error is turned into a response after an `.await`.
pub async fn with_locale<F>(locale: &str, fut: F) -> F::Output
where
    F: Future,
{
    CURRENT_LOCALE.scope(normalize_locale(locale), fut).await
}

/// Get the current locale, or the default outside a locale scope
pub fn get_locale() -> String {
    CURRENT_LOCALE
        .try_with(|l| l.clone())
        .unwrap_or_else(|_| DEFAULT_LOCALE.to_string())
}

/// Normalize locale string to supported format
/// Accepts: "en", "en-US", "ml", "ml-IN", "ml_IN;q=0.9", etc.
fn normalize_locale(locale: &str) -> String {
    let locale = locale.trim().to_lowercase();

    // Extract primary language tag
    let primary = locale
        .split(['-', '_', ',', ';'])
        .next()
        .unwrap_or(DEFAULT_LOCALE);

    SUPPORTED_LOCALES
        .iter()
        .find(|supported| primary == **supported)
        .map(|supported| supported.to_string())
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
}

/// Extract locale from Accept-Language header value
pub fn extract_locale_from_header(header_value: Option<&str>) -> String {
    match header_value {
        Some(value) => normalize_locale(value),
        None => DEFAULT_LOCALE.to_string(),
    }
}
