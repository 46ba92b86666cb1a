//! Dictionary language list resolution.

/// One entry of a source's `SelectedLanguages` list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LanguageEntry {
    /// Insertion point for the languages inherited from outer scopes.
    Inherited,
    Language(String),
}

impl LanguageEntry {
    /// Maps raw list text to an entry; blank text marks the inherited position.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            LanguageEntry::Inherited
        } else {
            LanguageEntry::Language(trimmed.to_owned())
        }
    }
}

/// Resolves the language list contributed by one source against the running list.
///
/// Returns `None` when the result would be empty, in which case the running
/// list is kept as is.
pub fn resolve_languages(existing: &[String], incoming: &[LanguageEntry]) -> Option<Vec<String>> {
    let mut entries: Vec<LanguageEntry> = Vec::with_capacity(incoming.len());
    for entry in incoming {
        let duplicate = entries.iter().any(|seen| match (seen, entry) {
            (LanguageEntry::Inherited, LanguageEntry::Inherited) => true,
            (LanguageEntry::Language(a), LanguageEntry::Language(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        });
        if !duplicate {
            entries.push(entry.clone());
        }
    }

    let placeholder = entries
        .iter()
        .position(|entry| *entry == LanguageEntry::Inherited);

    let mut languages: Vec<String> = entries
        .into_iter()
        .filter_map(|entry| match entry {
            LanguageEntry::Language(code) => Some(code),
            LanguageEntry::Inherited => None,
        })
        .collect();

    if let Some(mut insert_at) = placeholder {
        for language in existing {
            if !languages
                .iter()
                .any(|present| present.eq_ignore_ascii_case(language))
            {
                languages.insert(insert_at, language.clone());
                insert_at += 1;
            }
        }
    }

    (!languages.is_empty()).then_some(languages)
}
