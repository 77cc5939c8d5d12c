//! Language fallback list: which caption tracks to try, and in what order.
//!
//! A request that sticks with the default language is widened to a fixed list
//! of common tags, since many videos only carry a regional variant or an
//! auto-generated track in another language. An explicit tag is taken at its
//! word and never expanded.

/// Language assumed when the caller does not ask for one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Ordered superset tried for default-language requests.
pub const FALLBACK_LANGUAGES: &[&str] = &[
    "en", "en-US", "en-GB", "en-CA", "en-AU", "en-IN", "es", "es-ES", "es-MX", "es-AR", "fr",
    "fr-FR", "fr-CA", "de", "de-DE", "it", "it-IT", "pt", "pt-BR", "pt-PT", "ja", "ko", "zh",
    "zh-CN", "zh-TW", "hi", "ar", "ru", "nl", "sv", "no", "da", "fi",
];

/// Whether `preferred` means "use the default".
///
/// Missing, blank and the default tag itself all count.
pub fn is_default(preferred: Option<&str>) -> bool {
    match preferred.map(str::trim) {
        None | Some("") => true,
        Some(tag) => tag == DEFAULT_LANGUAGE,
    }
}

/// Build the ordered list of language tags to try for a request.
pub fn fallback_languages(preferred: Option<&str>) -> Vec<String> {
    if let Some(tag) = preferred.map(str::trim) {
        if !is_default(Some(tag)) {
            return vec![tag.to_string()];
        }
    }

    let mut languages: Vec<String> = Vec::with_capacity(FALLBACK_LANGUAGES.len());
    for tag in FALLBACK_LANGUAGES {
        if !languages.iter().any(|seen| seen == tag) {
            languages.push((*tag).to_string());
        }
    }
    languages
}
