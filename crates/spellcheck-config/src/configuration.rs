use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::defaults;
use crate::pattern::{CompiledPattern, PatternSet, RegexOptions};
use crate::scope::ConfigurationScope;
use crate::words::{WordMap, WordSet};

/// Character classes whose words are skipped entirely.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum IgnoredCharacterClass {
    #[default]
    None,
    NonAscii,
    NonLatin,
}

impl std::str::FromStr for IgnoredCharacterClass {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "None" => Ok(IgnoredCharacterClass::None),
            "NonAscii" => Ok(IgnoredCharacterClass::NonAscii),
            "NonLatin" => Ok(IgnoredCharacterClass::NonLatin),
            _ => Err(()),
        }
    }
}

/// How recognized words from code analysis dictionaries are used.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum RecognizedWordHandling {
    None,
    #[default]
    IgnoreAllWords,
    AddAllWords,
    /// The `Spelling` attribute of each word decides.
    AttributeDeterminesUsage,
}

impl std::str::FromStr for RecognizedWordHandling {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "None" => Ok(RecognizedWordHandling::None),
            "IgnoreAllWords" => Ok(RecognizedWordHandling::IgnoreAllWords),
            "AddAllWords" => Ok(RecognizedWordHandling::AddAllWords),
            "AttributeDeterminesUsage" | "UseAttribute" => {
                Ok(RecognizedWordHandling::AttributeDeterminesUsage)
            }
            _ => Err(()),
        }
    }
}

impl fmt::Display for RecognizedWordHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecognizedWordHandling::None => "None",
            RecognizedWordHandling::IgnoreAllWords => "IgnoreAllWords",
            RecognizedWordHandling::AddAllWords => "AddAllWords",
            RecognizedWordHandling::AttributeDeterminesUsage => "AttributeDeterminesUsage",
        };
        f.write_str(label)
    }
}

/// Identifier options for code analyzers. Read from the global source only.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct LanguageOptions {
    pub ignore_identifier_if_private: bool,
    pub ignore_identifier_if_internal: bool,
    pub ignore_identifier_if_all_uppercase: bool,
    pub ignore_identifiers_within_member_bodies: bool,
    pub ignore_type_parameters: bool,
}

impl Default for LanguageOptions {
    fn default() -> Self {
        LanguageOptions {
            ignore_identifier_if_private: false,
            ignore_identifier_if_internal: false,
            ignore_identifier_if_all_uppercase: false,
            ignore_identifiers_within_member_bodies: false,
            ignore_type_parameters: true,
        }
    }
}

/// Which parts of C# (and optionally other C-style) sources are skipped.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct CSharpOptions {
    pub ignore_xml_doc_comments: bool,
    pub ignore_delimited_comments: bool,
    pub ignore_standard_single_line_comments: bool,
    pub ignore_quadruple_slash_comments: bool,
    pub ignore_normal_strings: bool,
    pub ignore_verbatim_strings: bool,
    pub ignore_interpolated_strings: bool,
    pub apply_to_all_c_style_languages: bool,
}

/// Gates for [`CodeAnalysisDictionary`](crate::CodeAnalysisDictionary) imports.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct CodeAnalysisOptions {
    pub import_code_analysis_dictionaries: bool,
    pub recognized_word_handling: RecognizedWordHandling,
    pub treat_unrecognized_words_as_misspelled: bool,
    pub treat_deprecated_terms_as_misspelled: bool,
    pub treat_compound_terms_as_misspelled: bool,
    pub treat_casing_exceptions_as_ignored_words: bool,
}

impl Default for CodeAnalysisOptions {
    fn default() -> Self {
        CodeAnalysisOptions {
            import_code_analysis_dictionaries: true,
            recognized_word_handling: RecognizedWordHandling::IgnoreAllWords,
            treat_unrecognized_words_as_misspelled: true,
            treat_deprecated_terms_as_misspelled: true,
            treat_compound_terms_as_misspelled: true,
            treat_casing_exceptions_as_ignored_words: false,
        }
    }
}

/// Per-group inherit flags. `false` makes a source's collection replace the
/// one accumulated from outer scopes instead of extending it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct InheritanceFlags {
    pub ignored_words: bool,
    pub ignored_file_patterns: bool,
    pub additional_dictionary_folders: bool,
    pub exclusion_expressions: bool,
    pub xml_settings: bool,
    pub ignored_classifications: bool,
}

impl Default for InheritanceFlags {
    fn default() -> Self {
        InheritanceFlags {
            ignored_words: true,
            ignored_file_patterns: true,
            additional_dictionary_folders: true,
            exclusion_expressions: true,
            xml_settings: true,
            ignored_classifications: true,
        }
    }
}

/// An ignored words file that contributed to the configuration.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct IgnoredWordsFile {
    pub scope: ConfigurationScope,
    pub path: PathBuf,
}

/// Effective settings for one file, resolved from the configuration cascade.
///
/// Built by [`CascadeResolver`](crate::CascadeResolver) and read-only
/// afterwards; share it behind an `Arc` to check files concurrently.
#[derive(Clone, Debug, Serialize)]
pub struct Configuration {
    pub spell_check_as_you_type: bool,
    pub include_in_project_spell_check: bool,
    pub detect_doubled_words: bool,
    pub ignore_words_with_digits: bool,
    pub ignore_words_in_all_uppercase: bool,
    pub ignore_words_in_mixed_case: bool,
    pub ignore_format_specifiers: bool,
    pub ignore_filenames_and_email_addresses: bool,
    pub ignore_xml_elements_in_text: bool,
    pub treat_underscore_as_separator: bool,
    pub ignore_mnemonics: bool,
    pub ignored_character_class: IgnoredCharacterClass,
    pub determine_resource_file_language_from_name: bool,
    pub enable_wpf_text_box_spell_checking: bool,
    pub language_options: LanguageOptions,
    pub csharp_options: CSharpOptions,
    pub code_analysis: CodeAnalysisOptions,
    pub inheritance: InheritanceFlags,

    pub ignored_words: WordSet,
    pub ignored_words_files: Vec<IgnoredWordsFile>,
    pub ignored_file_patterns: PatternSet,
    pub additional_dictionary_folders: WordSet,
    pub exclusion_expressions: PatternSet,
    pub editor_exclusions: PatternSet,
    pub ignored_xml_elements: WordSet,
    pub spell_checked_xml_attributes: WordSet,
    pub ignored_classifications: BTreeMap<String, WordSet>,
    pub dictionary_languages: Vec<String>,

    pub recognized_words: WordSet,
    pub unrecognized_words: WordMap<Vec<String>>,
    pub deprecated_terms: WordMap<String>,
    pub compound_terms: WordMap<String>,
}

impl Default for Configuration {
    fn default() -> Self {
        let ignored_file_patterns = defaults::IGNORED_FILE_PATTERNS
            .iter()
            .filter_map(|raw| CompiledPattern::glob(raw).ok())
            .collect();

        let (content_type, classification) = defaults::IGNORED_CLASSIFICATION;
        let mut ignored_classifications = BTreeMap::new();
        ignored_classifications.insert(
            content_type.to_owned(),
            WordSet::from_words(crate::CaseMode::Sensitive, [classification]),
        );

        Configuration {
            spell_check_as_you_type: true,
            include_in_project_spell_check: true,
            detect_doubled_words: true,
            ignore_words_with_digits: true,
            ignore_words_in_all_uppercase: true,
            ignore_words_in_mixed_case: true,
            ignore_format_specifiers: true,
            ignore_filenames_and_email_addresses: true,
            ignore_xml_elements_in_text: true,
            treat_underscore_as_separator: false,
            ignore_mnemonics: true,
            ignored_character_class: IgnoredCharacterClass::None,
            determine_resource_file_language_from_name: true,
            enable_wpf_text_box_spell_checking: true,
            language_options: LanguageOptions::default(),
            csharp_options: CSharpOptions::default(),
            code_analysis: CodeAnalysisOptions::default(),
            inheritance: InheritanceFlags::default(),

            ignored_words: WordSet::from_words(
                crate::CaseMode::Insensitive,
                defaults::IGNORED_WORDS.iter().copied(),
            ),
            ignored_words_files: Vec::new(),
            ignored_file_patterns,
            additional_dictionary_folders: WordSet::case_insensitive(),
            exclusion_expressions: PatternSet::new(),
            editor_exclusions: PatternSet::new(),
            ignored_xml_elements: WordSet::from_words(
                crate::CaseMode::Sensitive,
                defaults::IGNORED_XML_ELEMENTS.iter().copied(),
            ),
            spell_checked_xml_attributes: WordSet::from_words(
                crate::CaseMode::Sensitive,
                defaults::SPELL_CHECKED_XML_ATTRIBUTES.iter().copied(),
            ),
            ignored_classifications,
            dictionary_languages: Vec::new(),

            recognized_words: WordSet::case_insensitive(),
            unrecognized_words: WordMap::new(),
            deprecated_terms: WordMap::new(),
            compound_terms: WordMap::new(),
        }
    }
}

/// The fixed expression that hides inline ignore-spelling directives.
pub fn directive_expression() -> Option<CompiledPattern> {
    CompiledPattern::regex(defaults::IGNORE_SPELLING_DIRECTIVE, RegexOptions::default()).ok()
}

impl Configuration {
    /// Establishes the invariants every resolved configuration holds: the
    /// directive expression is excluded and at least one language is selected.
    pub(crate) fn finalize(&mut self) {
        if let Some(directive) = directive_expression() {
            self.exclusion_expressions.insert(directive);
        }
        if self.dictionary_languages.is_empty() {
            self.dictionary_languages
                .push(defaults::DEFAULT_LANGUAGE.to_owned());
        }
    }

    pub fn should_ignore_word(&self, word: &str) -> bool {
        self.ignored_words.contains(word)
    }

    pub fn is_recognized_word(&self, word: &str) -> bool {
        self.recognized_words.contains(word)
    }

    /// Whether `path` matches one of the ignored file patterns.
    pub fn is_file_ignored(&self, path: &Path) -> bool {
        self.ignored_file_patterns.matches_path(path)
    }

    /// Whether a project-wide spell check should look at `path` at all.
    pub fn should_spell_check_file(&self, path: &Path) -> bool {
        self.include_in_project_spell_check && !self.is_file_ignored(path)
    }

    pub fn ignored_classifications_for(&self, content_type: &str) -> Option<&WordSet> {
        self.ignored_classifications.get(content_type)
    }

    pub fn is_classification_ignored(&self, content_type: &str, classification: &str) -> bool {
        self.ignored_classifications_for(content_type)
            .is_some_and(|classifications| classifications.contains(classification))
    }

    /// Byte ranges of `text` covered by exclusion expressions, in match order.
    pub fn excluded_ranges(&self, text: &str) -> Vec<Range<usize>> {
        self.exclusion_expressions
            .iter()
            .flat_map(|pattern| pattern.regex_ref().find_iter(text).map(|m| m.range()))
            .collect()
    }
}
