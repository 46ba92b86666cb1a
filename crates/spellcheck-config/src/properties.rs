//! Raw per-source settings and their typed accessors.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use crate::error::PropertyError;
use crate::languages::LanguageEntry;
use crate::pattern::RegexOptions;

/// Property names read from configuration sources. Members of option groups
/// are addressed as `Group/Member`.
pub mod keys {
    pub const SPELL_CHECK_AS_YOU_TYPE: &str = "SpellCheckAsYouType";
    pub const INCLUDE_IN_PROJECT_SPELL_CHECK: &str = "IncludeInProjectSpellCheck";
    pub const DETECT_DOUBLED_WORDS: &str = "DetectDoubledWords";
    pub const IGNORE_WORDS_WITH_DIGITS: &str = "IgnoreWordsWithDigits";
    pub const IGNORE_WORDS_IN_ALL_UPPERCASE: &str = "IgnoreWordsInAllUppercase";
    pub const IGNORE_WORDS_IN_MIXED_CASE: &str = "IgnoreWordsInMixedCase";
    pub const IGNORE_FORMAT_SPECIFIERS: &str = "IgnoreFormatSpecifiers";
    pub const IGNORE_FILENAMES_AND_EMAIL_ADDRESSES: &str = "IgnoreFilenamesAndEMailAddresses";
    pub const IGNORE_XML_ELEMENTS_IN_TEXT: &str = "IgnoreXmlElementsInText";
    pub const TREAT_UNDERSCORE_AS_SEPARATOR: &str = "TreatUnderscoreAsSeparator";
    pub const IGNORE_MNEMONICS: &str = "IgnoreMnemonics";
    pub const IGNORED_CHARACTER_CLASS: &str = "IgnoredCharacterClass";
    pub const DETERMINE_RESOURCE_FILE_LANGUAGE_FROM_NAME: &str =
        "DetermineResourceFileLanguageFromName";
    pub const ENABLE_WPF_TEXT_BOX_SPELL_CHECKING: &str = "EnableWpfTextBoxSpellChecking";

    pub const LANGUAGE_IGNORE_IDENTIFIER_IF_PRIVATE: &str = "LanguageOptions/IgnoreIdentifierIfPrivate";
    pub const LANGUAGE_IGNORE_IDENTIFIER_IF_INTERNAL: &str =
        "LanguageOptions/IgnoreIdentifierIfInternal";
    pub const LANGUAGE_IGNORE_IDENTIFIER_IF_ALL_UPPERCASE: &str =
        "LanguageOptions/IgnoreIdentifierIfAllUppercase";
    pub const LANGUAGE_IGNORE_IDENTIFIERS_WITHIN_MEMBER_BODIES: &str =
        "LanguageOptions/IgnoreIdentifiersWithinMemberBodies";
    pub const LANGUAGE_IGNORE_TYPE_PARAMETERS: &str = "LanguageOptions/IgnoreTypeParameters";

    pub const CSHARP_IGNORE_XML_DOC_COMMENTS: &str = "CSharpOptions/IgnoreXmlDocComments";
    pub const CSHARP_IGNORE_DELIMITED_COMMENTS: &str = "CSharpOptions/IgnoreDelimitedComments";
    pub const CSHARP_IGNORE_STANDARD_SINGLE_LINE_COMMENTS: &str =
        "CSharpOptions/IgnoreStandardSingleLineComments";
    pub const CSHARP_IGNORE_QUADRUPLE_SLASH_COMMENTS: &str =
        "CSharpOptions/IgnoreQuadrupleSlashComments";
    pub const CSHARP_IGNORE_NORMAL_STRINGS: &str = "CSharpOptions/IgnoreNormalStrings";
    pub const CSHARP_IGNORE_VERBATIM_STRINGS: &str = "CSharpOptions/IgnoreVerbatimStrings";
    pub const CSHARP_IGNORE_INTERPOLATED_STRINGS: &str = "CSharpOptions/IgnoreInterpolatedStrings";
    pub const CSHARP_APPLY_TO_ALL_C_STYLE_LANGUAGES: &str =
        "CSharpOptions/ApplyToAllCStyleLanguages";

    pub const CAD_IMPORT_CODE_ANALYSIS_DICTIONARIES: &str =
        "CodeAnalysisDictionaryOptions/ImportCodeAnalysisDictionaries";
    pub const CAD_RECOGNIZED_WORD_HANDLING: &str =
        "CodeAnalysisDictionaryOptions/RecognizedWordHandling";
    pub const CAD_TREAT_UNRECOGNIZED_WORDS_AS_MISSPELLED: &str =
        "CodeAnalysisDictionaryOptions/TreatUnrecognizedWordsAsMisspelled";
    pub const CAD_TREAT_DEPRECATED_TERMS_AS_MISSPELLED: &str =
        "CodeAnalysisDictionaryOptions/TreatDeprecatedTermsAsMisspelled";
    pub const CAD_TREAT_COMPOUND_TERMS_AS_MISSPELLED: &str =
        "CodeAnalysisDictionaryOptions/TreatCompoundTermsAsMisspelled";
    pub const CAD_TREAT_CASING_EXCEPTIONS_AS_IGNORED_WORDS: &str =
        "CodeAnalysisDictionaryOptions/TreatCasingExceptionsAsIgnoredWords";

    pub const INHERIT_IGNORED_WORDS: &str = "InheritIgnoredWords";
    pub const INHERIT_IGNORED_FILE_PATTERNS: &str = "InheritIgnoredFilePatterns";
    pub const INHERIT_ADDITIONAL_DICTIONARY_FOLDERS: &str = "InheritAdditionalDictionaryFolders";
    pub const INHERIT_EXCLUSION_EXPRESSIONS: &str = "InheritExclusionExpressions";
    pub const INHERIT_XML_SETTINGS: &str = "InheritXmlSettings";
    pub const INHERIT_IGNORED_CLASSIFICATIONS: &str = "InheritIgnoredClassifications";

    pub const IMPORT_SETTINGS_FILE: &str = "ImportSettingsFile";
    pub const ADDITIONAL_DICTIONARY_FOLDERS: &str = "AdditionalDictionaryFolders";
    pub const IGNORED_WORDS: &str = "IgnoredWords";
    pub const IGNORED_WORDS_FILE: &str = "IgnoredWordsFile";
    pub const EXCLUSION_EXPRESSIONS: &str = "ExclusionExpressions";
    pub const IGNORED_FILE_PATTERNS: &str = "IgnoredFilePatterns";
    pub const IGNORED_XML_ELEMENTS: &str = "IgnoredXmlElements";
    pub const SPELL_CHECKED_XML_ATTRIBUTES: &str = "SpellCheckedXmlAttributes";
    pub const IGNORED_CLASSIFICATIONS: &str = "IgnoredClassifications";
    pub const SELECTED_LANGUAGES: &str = "SelectedLanguages";
    pub const VISUAL_STUDIO_ID_EXCLUSIONS: &str = "VisualStudioIdExclusions";

    /// Attribute carrying regex options on exclusion expression items.
    pub const OPTIONS_ATTRIBUTE: &str = "Options";
    /// Attribute naming the content type of a classification group.
    pub const NAME_ATTRIBUTE: &str = "Name";
}

/// One entry of a list-valued property.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PropertyItem {
    pub value: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<String>,
}

impl PropertyItem {
    pub fn text(value: impl Into<String>) -> Self {
        PropertyItem {
            value: value.into(),
            ..PropertyItem::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Raw value of a property.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Items(Vec<PropertyItem>),
}

/// Sparse mapping from property name to raw value for one source.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PropertyBag {
    values: HashMap<String, PropertyValue>,
}

impl PropertyBag {
    pub fn new() -> Self {
        PropertyBag::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: PropertyValue) {
        self.values.insert(key.into(), value);
    }

    pub fn with_text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, PropertyValue::Text(value.into()));
        self
    }

    pub fn with_values<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = values.into_iter().map(PropertyItem::text).collect();
        self.insert(key, PropertyValue::Items(items));
        self
    }

    pub fn with_items(mut self, key: impl Into<String>, items: Vec<PropertyItem>) -> Self {
        self.insert(key, PropertyValue::Items(items));
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Trimmed text of a scalar property.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key)? {
            PropertyValue::Text(value) => Some(value.trim()),
            PropertyValue::Items(_) => None,
        }
    }

    /// Non-blank text of a scalar property.
    pub fn string(&self, key: &str) -> Option<&str> {
        self.text(key).filter(|value| !value.is_empty())
    }

    pub fn boolean(&self, key: &str) -> Result<Option<bool>, PropertyError> {
        let Some(value) = self.string(key) else {
            return Ok(None);
        };
        if value.eq_ignore_ascii_case("true") {
            Ok(Some(true))
        } else if value.eq_ignore_ascii_case("false") {
            Ok(Some(false))
        } else {
            Err(PropertyError {
                key: key.to_owned(),
                value: value.to_owned(),
                expected: "true or false",
            })
        }
    }

    pub fn enumeration<T: FromStr>(
        &self,
        key: &str,
        expected: &'static str,
    ) -> Result<Option<T>, PropertyError> {
        let Some(value) = self.string(key) else {
            return Ok(None);
        };
        value.parse::<T>().map(Some).map_err(|_| PropertyError {
            key: key.to_owned(),
            value: value.to_owned(),
            expected,
        })
    }

    /// Items of a list property. A scalar with no content counts as an empty list.
    pub fn items(&self, key: &str) -> Option<&[PropertyItem]> {
        match self.values.get(key)? {
            PropertyValue::Items(items) => Some(items.as_slice()),
            PropertyValue::Text(value) if value.trim().is_empty() => Some(&[][..]),
            PropertyValue::Text(_) => None,
        }
    }

    /// Trimmed, non-blank entries of a list property.
    pub fn values(&self, key: &str) -> Option<Vec<&str>> {
        self.items(key).map(|items| {
            items
                .iter()
                .map(|item| item.value.trim())
                .filter(|value| !value.is_empty())
                .collect()
        })
    }

    /// Regular expressions of a list property with their options. Blank
    /// entries are skipped; the others keep their whitespace.
    pub fn expressions(&self, key: &str) -> Option<Vec<(&str, RegexOptions)>> {
        self.items(key).map(|items| {
            items
                .iter()
                .filter(|item| !item.value.trim().is_empty())
                .map(|item| {
                    let options = item
                        .attribute(keys::OPTIONS_ATTRIBUTE)
                        .map(RegexOptions::parse)
                        .unwrap_or_default();
                    (item.value.as_str(), options)
                })
                .collect()
        })
    }

    /// Language entries, keeping blank entries as the inherited placeholder.
    pub fn languages(&self, key: &str) -> Option<Vec<LanguageEntry>> {
        self.items(key).map(|items| {
            items
                .iter()
                .map(|item| LanguageEntry::from_raw(&item.value))
                .collect()
        })
    }

    /// Named groups of values, e.g. content type to classification names.
    pub fn groups(&self, key: &str) -> Option<Vec<(&str, Vec<&str>)>> {
        self.items(key).map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let name = item.attribute(keys::NAME_ATTRIBUTE)?.trim();
                    if name.is_empty() {
                        return None;
                    }
                    let values = item
                        .children
                        .iter()
                        .map(|child| child.trim())
                        .filter(|child| !child.is_empty())
                        .collect();
                    Some((name, values))
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_parse_case_insensitively() {
        let bag = PropertyBag::new()
            .with_text("A", "True")
            .with_text("B", "false")
            .with_text("C", "yes");
        assert_eq!(bag.boolean("A"), Ok(Some(true)));
        assert_eq!(bag.boolean("B"), Ok(Some(false)));
        assert_eq!(bag.boolean("Missing"), Ok(None));
        let err = bag.boolean("C").unwrap_err();
        assert_eq!(err.key, "C");
        assert_eq!(err.value, "yes");
    }

    #[test]
    fn empty_scalar_reads_as_empty_list() {
        let bag = PropertyBag::new().with_text(keys::IGNORED_WORDS, "  ");
        assert!(bag.contains(keys::IGNORED_WORDS));
        assert_eq!(bag.values(keys::IGNORED_WORDS), Some(Vec::new()));
    }

    #[test]
    fn languages_keep_placeholder() {
        let bag = PropertyBag::new().with_values(keys::SELECTED_LANGUAGES, ["", "fr-FR"]);
        assert_eq!(
            bag.languages(keys::SELECTED_LANGUAGES),
            Some(vec![
                LanguageEntry::Inherited,
                LanguageEntry::Language("fr-FR".into())
            ])
        );
    }

    #[test]
    fn groups_require_name() {
        let bag = PropertyBag::new().with_items(
            keys::IGNORED_CLASSIFICATIONS,
            vec![
                PropertyItem::default()
                    .with_attribute("Name", "CSharp")
                    .with_children(["string", " ", "comment"]),
                PropertyItem::default().with_children(["orphan"]),
            ],
        );
        assert_eq!(
            bag.groups(keys::IGNORED_CLASSIFICATIONS),
            Some(vec![("CSharp", vec!["string", "comment"])])
        );
    }

    #[test]
    fn expressions_carry_options() {
        let bag = PropertyBag::new().with_items(
            keys::EXCLUSION_EXPRESSIONS,
            vec![
                PropertyItem::text(r"\d+").with_attribute("Options", "IgnoreCase"),
                PropertyItem::text(""),
            ],
        );
        let expressions = bag.expressions(keys::EXCLUSION_EXPRESSIONS).expect("present");
        assert_eq!(expressions.len(), 1);
        assert!(expressions[0].1.ignore_case);
    }

    #[test]
    fn expressions_are_not_trimmed() {
        let bag = PropertyBag::new().with_values(keys::EXCLUSION_EXPRESSIONS, [" +$", "  "]);
        let expressions = bag.expressions(keys::EXCLUSION_EXPRESSIONS).expect("present");
        assert_eq!(expressions.len(), 1);
        assert_eq!(expressions[0].0, " +$");
    }
}
