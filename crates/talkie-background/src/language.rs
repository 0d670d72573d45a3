//! Speaking language resolution for a selection.
//!
//! Priority, first non-empty wins:
//! 1. the selection's `lang` attribute from the page's `<html>` tag
//! 2. the nearest parent element with a `lang` attribute
//! 3. language detected from the text itself
//! 4. the caller's fallback (usually the page language)
//! 5. the configured default language

use talkie_core::TextSelection;

/// Whether `selection` carries a language hint from the page markup.
pub fn has_markup_language(selection: &TextSelection) -> bool {
    markup_language(selection).is_some()
}

/// Pick the language to speak `selection` in.
pub fn pick_language(
    selection: &TextSelection,
    detected: Option<&str>,
    fallback: Option<&str>,
    default_language: &str,
) -> String {
    markup_language(selection)
        .or_else(|| non_empty(detected))
        .or_else(|| non_empty(fallback))
        .unwrap_or(default_language)
        .to_string()
}

fn markup_language(selection: &TextSelection) -> Option<&str> {
    non_empty(selection.html_tag_language.as_deref())
        .or_else(|| selection.nearest_parent_language())
}

fn non_empty(language: Option<&str>) -> Option<&str> {
    language.map(str::trim).filter(|language| !language.is_empty())
}
