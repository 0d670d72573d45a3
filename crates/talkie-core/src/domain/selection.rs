//! Text selected on a page, together with the language hints found around it.

use serde::{Deserialize, Serialize};

/// One contiguous run of selected text read from a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSelection {
    /// The selected text.
    pub text: String,

    /// `lang` attribute of the element containing the selection, if any.
    #[serde(default)]
    pub html_tag_language: Option<String>,

    /// `lang` attributes of the ancestor elements, nearest first.
    #[serde(default)]
    pub parent_elements_languages: Vec<String>,
}

impl TextSelection {
    /// A selection with no language hints.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            html_tag_language: None,
            parent_elements_languages: Vec::new(),
        }
    }

    /// Attach the language of the containing element.
    #[must_use]
    pub fn with_html_tag_language(mut self, language: impl Into<String>) -> Self {
        self.html_tag_language = Some(language.into());
        self
    }

    /// Attach ancestor element languages, nearest first.
    #[must_use]
    pub fn with_parent_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parent_elements_languages = languages.into_iter().map(Into::into).collect();
        self
    }

    /// Whether there is nothing worth speaking in this selection.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// The nearest non-empty ancestor language hint.
    pub fn nearest_parent_language(&self) -> Option<&str> {
        self.parent_elements_languages
            .iter()
            .map(|lang| lang.trim())
            .find(|lang| !lang.is_empty())
    }
}
