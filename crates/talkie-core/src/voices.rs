//! Voice list grouping helpers.
//!
//! Pure functions over the engine's voice list. Maps are `BTreeMap`s so that
//! languages and groups come out sorted, the way option lists show them.

use std::collections::BTreeMap;

use crate::domain::{Voice, language_group};

/// All distinct languages, sorted.
pub fn languages(voices: &[Voice]) -> Vec<String> {
    voices_by_language(voices).into_keys().collect()
}

/// All distinct language groups (`"en"`, `"fr"`, ...), sorted.
pub fn language_groups(voices: &[Voice]) -> Vec<String> {
    voices_by_language_group(voices).into_keys().collect()
}

/// Voices keyed by their full language tag, in voice-list order.
pub fn voices_by_language(voices: &[Voice]) -> BTreeMap<String, Vec<Voice>> {
    let mut by_language: BTreeMap<String, Vec<Voice>> = BTreeMap::new();
    for voice in voices {
        by_language
            .entry(voice.lang.clone())
            .or_default()
            .push(voice.clone());
    }
    by_language
}

/// Voices keyed by language group, in voice-list order.
pub fn voices_by_language_group(voices: &[Voice]) -> BTreeMap<String, Vec<Voice>> {
    let mut by_group: BTreeMap<String, Vec<Voice>> = BTreeMap::new();
    for voice in voices {
        by_group
            .entry(voice.language_group().to_string())
            .or_default()
            .push(voice.clone());
    }
    by_group
}

/// Voices keyed by language, nested under their language group.
pub fn voices_by_language_by_language_group(
    voices: &[Voice],
) -> BTreeMap<String, BTreeMap<String, Vec<Voice>>> {
    let mut nested: BTreeMap<String, BTreeMap<String, Vec<Voice>>> = BTreeMap::new();
    for (language, language_voices) in voices_by_language(voices) {
        nested
            .entry(language_group(&language).to_string())
            .or_default()
            .insert(language, language_voices);
    }
    nested
}

/// Sorted languages per language group.
pub fn languages_by_language_group(voices: &[Voice]) -> BTreeMap<String, Vec<String>> {
    voices_by_language_by_language_group(voices)
        .into_iter()
        .map(|(group, languages)| (group, languages.into_keys().collect()))
        .collect()
}

/// Pick the best installed voice for `lang`.
///
/// Exact language matches (case-insensitive) win, then voices in the same
/// language group. Within a match set the engine's default voice is
/// preferred, otherwise the first in list order.
pub fn best_voice_for_language<'a>(voices: &'a [Voice], lang: &str) -> Option<&'a Voice> {
    let exact: Vec<&Voice> = voices
        .iter()
        .filter(|voice| voice.lang.eq_ignore_ascii_case(lang))
        .collect();
    if let Some(voice) = prefer_default(&exact) {
        return Some(voice);
    }

    let group = language_group(lang);
    let same_group: Vec<&Voice> = voices
        .iter()
        .filter(|voice| voice.language_group().eq_ignore_ascii_case(group))
        .collect();
    prefer_default(&same_group)
}

fn prefer_default<'a>(candidates: &[&'a Voice]) -> Option<&'a Voice> {
    candidates
        .iter()
        .find(|voice| voice.default)
        .or_else(|| candidates.first())
        .copied()
}
