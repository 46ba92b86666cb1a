//! Import of code analysis (FxCop style) custom dictionaries.
//!
//! ```xml
//! <Dictionary>
//!   <Words>
//!     <Recognized><Word Spelling="Add">contoso</Word></Recognized>
//!     <Unrecognized><Word SpellingAlternates="sign in, log in">login</Word></Unrecognized>
//!     <Deprecated><Term PreferredAlternate="sign in">login</Term></Deprecated>
//!     <Compound><Term CompoundAlternate="FileName">filename</Term></Compound>
//!   </Words>
//!   <Acronyms><CasingExceptions><Acronym>GUID</Acronym></CasingExceptions></Acronyms>
//! </Dictionary>
//! ```

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::configuration::{Configuration, RecognizedWordHandling};
use crate::error::DictionaryImportError;
use crate::xml::{self, XmlDocumentError, XmlNode};

/// A recognized word and its optional `Spelling` attribute.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecognizedWord {
    pub word: String,
    pub spelling: Option<String>,
}

impl RecognizedWord {
    fn spelling_is(&self, value: &str) -> bool {
        self.spelling
            .as_deref()
            .is_some_and(|spelling| spelling.trim().eq_ignore_ascii_case(value))
    }
}

/// Parsed contents of a code analysis dictionary, in document order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CodeAnalysisDictionary {
    pub recognized: Vec<RecognizedWord>,
    /// Unrecognized words with their spelling alternates.
    pub unrecognized: Vec<(String, Vec<String>)>,
    /// Deprecated terms with their preferred alternate.
    pub deprecated: Vec<(String, String)>,
    /// Compound terms with their compound alternate.
    pub compound: Vec<(String, String)>,
    pub casing_exceptions: Vec<String>,
}

impl CodeAnalysisDictionary {
    pub fn parse(contents: &str) -> Result<Self, DictionaryImportError> {
        let root = xml::parse_document(contents).map_err(|err| match err {
            XmlDocumentError::Xml(source) => DictionaryImportError::Xml(source),
            XmlDocumentError::Malformed(message) => DictionaryImportError::Malformed(message),
        })?;

        let mut dictionary = CodeAnalysisDictionary::default();

        for node in entries(&root, "Words/Recognized", "Word") {
            dictionary.recognized.push(RecognizedWord {
                word: node.text().to_owned(),
                spelling: node.attribute("Spelling").map(str::to_owned),
            });
        }

        for node in entries(&root, "Words/Unrecognized", "Word") {
            let alternates = node
                .attribute("SpellingAlternates")
                .map(split_alternates)
                .unwrap_or_default();
            dictionary
                .unrecognized
                .push((node.text().to_owned(), alternates));
        }

        for node in entries(&root, "Words/Deprecated", "Term") {
            let preferred = node.attribute("PreferredAlternate").unwrap_or_default();
            dictionary
                .deprecated
                .push((node.text().to_owned(), preferred.trim().to_owned()));
        }

        for node in entries(&root, "Words/Compound", "Term") {
            let alternate = node.attribute("CompoundAlternate").unwrap_or_default();
            dictionary
                .compound
                .push((node.text().to_owned(), alternate.trim().to_owned()));
        }

        dictionary.casing_exceptions = entries(&root, "Acronyms/CasingExceptions", "Acronym")
            .map(|node| node.text().to_owned())
            .collect();

        Ok(dictionary)
    }

    pub fn load(path: &Path) -> Result<Self, DictionaryImportError> {
        let contents = fs::read_to_string(path).map_err(|source| DictionaryImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        CodeAnalysisDictionary::parse(&contents)
    }

    /// Merges the dictionary into `config` according to its code analysis
    /// options. Sections whose option is off are skipped.
    pub fn import_into(&self, config: &mut Configuration) {
        let options = config.code_analysis;

        match options.recognized_word_handling {
            RecognizedWordHandling::None => {}
            RecognizedWordHandling::IgnoreAllWords => {
                for entry in &self.recognized {
                    config.ignored_words.insert(entry.word.as_str());
                }
            }
            RecognizedWordHandling::AddAllWords => {
                for entry in &self.recognized {
                    config.recognized_words.insert(entry.word.as_str());
                }
            }
            RecognizedWordHandling::AttributeDeterminesUsage => {
                for entry in &self.recognized {
                    if entry.spelling_is("Add") {
                        config.recognized_words.insert(entry.word.as_str());
                    } else if entry.spelling_is("Ignore") {
                        config.ignored_words.insert(entry.word.as_str());
                    }
                }
            }
        }

        if options.treat_unrecognized_words_as_misspelled {
            for (word, alternates) in &self.unrecognized {
                config
                    .unrecognized_words
                    .insert(word.as_str(), alternates.clone());
            }
        }

        if options.treat_deprecated_terms_as_misspelled {
            for (term, preferred) in &self.deprecated {
                config.deprecated_terms.insert(term.as_str(), preferred.clone());
            }
        }

        if options.treat_compound_terms_as_misspelled {
            for (term, alternate) in &self.compound {
                config.compound_terms.insert(term.as_str(), alternate.clone());
            }
        }

        if options.treat_casing_exceptions_as_ignored_words {
            for acronym in &self.casing_exceptions {
                config.ignored_words.insert(acronym.as_str());
            }
        }
    }
}

impl Configuration {
    /// Imports each dictionary in order when dictionary import is enabled.
    /// Stops at the first dictionary that cannot be read; dictionaries
    /// imported before it stay applied. Returns how many were imported.
    pub fn import_code_analysis_dictionaries<I, P>(
        &mut self,
        paths: I,
    ) -> Result<usize, DictionaryImportError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        if !self.code_analysis.import_code_analysis_dictionaries {
            return Ok(0);
        }

        let mut imported = 0;
        for path in paths {
            let path = path.as_ref();
            let dictionary = CodeAnalysisDictionary::load(path)?;
            dictionary.import_into(self);
            debug!(path = %path.display(), "imported code analysis dictionary");
            imported += 1;
        }
        Ok(imported)
    }
}

/// Non-blank `item` children of the section at `section`.
fn entries<'a>(
    root: &'a XmlNode,
    section: &str,
    item: &'a str,
) -> impl Iterator<Item = &'a XmlNode> + 'a {
    root.descend(section)
        .into_iter()
        .flat_map(move |node| node.children_named(item))
        .filter(|node| !node.text().is_empty())
}

fn split_alternates(raw: &str) -> Vec<String> {
    raw.split([' ', ','])
        .map(str::trim)
        .filter(|alternate| !alternate.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DICTIONARY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
        <Dictionary>
          <Words>
            <Recognized>
              <Word>contoso</Word>
              <Word Spelling="add">fabrikam</Word>
              <Word Spelling="Ignore">northwind</Word>
              <Word Spelling="Maybe">adventureworks</Word>
              <Word>   </Word>
            </Recognized>
            <Unrecognized>
              <Word SpellingAlternates="sign in, log in">login</Word>
              <Word>cancelled</Word>
            </Unrecognized>
            <Deprecated>
              <Term PreferredAlternate="sign in">signon</Term>
            </Deprecated>
            <Compound>
              <Term CompoundAlternate="FileName">filename</Term>
            </Compound>
          </Words>
          <Acronyms>
            <CasingExceptions>
              <Acronym>GUID</Acronym>
            </CasingExceptions>
          </Acronyms>
        </Dictionary>"#;

    #[test]
    fn parses_every_section() {
        let dictionary = CodeAnalysisDictionary::parse(DICTIONARY).expect("parse");
        assert_eq!(dictionary.recognized.len(), 4);
        assert_eq!(
            dictionary.unrecognized[0],
            ("login".to_string(), vec!["sign".to_string(), "in".to_string(), "log".to_string(), "in".to_string()])
        );
        assert!(dictionary.unrecognized[1].1.is_empty());
        assert_eq!(dictionary.deprecated, vec![("signon".into(), "sign in".into())]);
        assert_eq!(dictionary.compound, vec![("filename".into(), "FileName".into())]);
        assert_eq!(dictionary.casing_exceptions, vec!["GUID".to_string()]);
    }

    #[test]
    fn default_handling_ignores_recognized_words() {
        let dictionary = CodeAnalysisDictionary::parse(DICTIONARY).expect("parse");
        let mut config = Configuration::default();
        dictionary.import_into(&mut config);

        assert!(config.should_ignore_word("Contoso"));
        assert!(config.should_ignore_word("adventureworks"));
        assert!(config.recognized_words.is_empty());
        assert!(config.unrecognized_words.contains_key("LOGIN"));
        assert_eq!(config.deprecated_terms.get("signon").map(String::as_str), Some("sign in"));
        assert!(!config.should_ignore_word("guid"));
    }

    #[test]
    fn spelling_attribute_decides_usage() {
        let dictionary = CodeAnalysisDictionary::parse(DICTIONARY).expect("parse");
        let mut config = Configuration::default();
        config.code_analysis.recognized_word_handling =
            RecognizedWordHandling::AttributeDeterminesUsage;
        config.code_analysis.treat_casing_exceptions_as_ignored_words = true;
        config.code_analysis.treat_compound_terms_as_misspelled = false;
        dictionary.import_into(&mut config);

        assert!(config.is_recognized_word("fabrikam"));
        assert!(config.should_ignore_word("northwind"));
        assert!(!config.is_recognized_word("adventureworks"));
        assert!(!config.should_ignore_word("adventureworks"));
        assert!(!config.should_ignore_word("contoso"));
        assert!(config.should_ignore_word("guid"));
        assert!(config.compound_terms.is_empty());
    }

    #[test]
    fn later_entries_overwrite_earlier_ones() {
        let mut config = Configuration::default();
        for preferred in ["first", "second"] {
            let xml = format!(
                r#"<Dictionary><Words><Deprecated><Term PreferredAlternate="{preferred}">Term</Term></Deprecated></Words></Dictionary>"#
            );
            CodeAnalysisDictionary::parse(&xml)
                .expect("parse")
                .import_into(&mut config);
        }
        assert_eq!(config.deprecated_terms.len(), 1);
        assert_eq!(config.deprecated_terms.get("term").map(String::as_str), Some("second"));
    }

    #[test]
    fn malformed_document_is_an_error() {
        let err = CodeAnalysisDictionary::parse("<Dictionary><Words></Dictionary>").unwrap_err();
        assert!(matches!(
            err,
            DictionaryImportError::Xml(_) | DictionaryImportError::Malformed(_)
        ));
    }
}
