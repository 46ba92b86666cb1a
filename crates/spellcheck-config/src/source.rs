//! Configuration sources: turn one settings file into a [`PropertyBag`].
//!
//! XML documents follow the `.vsspell` layout: the root element's children are
//! properties, an element with child elements is a list (or option group) whose
//! children are items. TOML documents use top-level keys for properties,
//! arrays for lists and tables for option groups and classification groups.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::SourceError;
use crate::properties::{keys, PropertyBag, PropertyItem, PropertyValue};
use crate::xml::{self, XmlDocumentError, XmlNode};

/// Supplies the raw settings of configuration files to the resolver.
pub trait ConfigurationSource {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn load(&self, path: &Path) -> Result<PropertyBag, SourceError>;

    /// Reads a newline-delimited word list. `Ok(None)` when the file is absent.
    fn read_words(&self, path: &Path) -> io::Result<Option<Vec<String>>> {
        if !path.is_file() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        Ok(Some(parse_word_list(&contents)))
    }
}

/// Splits a word list into entries, skipping blank lines and `#` comments.
pub fn parse_word_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect()
}

/// Reads XML configuration files.
#[derive(Clone, Copy, Debug, Default)]
pub struct XmlSource;

impl ConfigurationSource for XmlSource {
    fn load(&self, path: &Path) -> Result<PropertyBag, SourceError> {
        let contents = read_source(path)?;
        parse_xml(&contents, path)
    }
}

/// Reads TOML configuration files.
#[derive(Clone, Copy, Debug, Default)]
pub struct TomlSource;

impl ConfigurationSource for TomlSource {
    fn load(&self, path: &Path) -> Result<PropertyBag, SourceError> {
        let contents = read_source(path)?;
        parse_toml(&contents, path)
    }
}

/// Picks the format from the file extension: `.toml` is TOML, anything else XML.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileSource;

impl ConfigurationSource for FileSource {
    fn load(&self, path: &Path) -> Result<PropertyBag, SourceError> {
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            TomlSource.load(path)
        } else {
            XmlSource.load(path)
        }
    }
}

/// Settings held in memory, keyed by path. Useful for hosts that obtain
/// settings from somewhere other than the file system.
#[derive(Clone, Debug, Default)]
pub struct InMemorySource {
    bags: HashMap<PathBuf, PropertyBag>,
    word_lists: HashMap<PathBuf, Vec<String>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        InMemorySource::default()
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>, bag: PropertyBag) -> Self {
        self.bags.insert(path.into(), bag);
        self
    }

    pub fn with_word_list<I, S>(mut self, path: impl Into<PathBuf>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.word_lists
            .insert(path.into(), words.into_iter().map(Into::into).collect());
        self
    }
}

impl ConfigurationSource for InMemorySource {
    fn exists(&self, path: &Path) -> bool {
        self.bags.contains_key(path)
    }

    fn load(&self, path: &Path) -> Result<PropertyBag, SourceError> {
        self.bags.get(path).cloned().ok_or_else(|| SourceError::Io {
            path: path.to_path_buf(),
            source: io::Error::from(io::ErrorKind::NotFound),
        })
    }

    fn read_words(&self, path: &Path) -> io::Result<Option<Vec<String>>> {
        Ok(self.word_lists.get(path).cloned())
    }
}

fn read_source(path: &Path) -> Result<String, SourceError> {
    fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses an XML configuration document.
pub fn parse_xml(contents: &str, path: &Path) -> Result<PropertyBag, SourceError> {
    let root = xml::parse_document(contents).map_err(|err| match err {
        XmlDocumentError::Xml(source) => SourceError::Xml {
            path: path.to_path_buf(),
            source,
        },
        XmlDocumentError::Malformed(message) => SourceError::Malformed {
            path: path.to_path_buf(),
            message,
        },
    })?;

    let mut bag = PropertyBag::new();
    for property in &root.children {
        if property.children.is_empty() {
            bag.insert(
                property.name.clone(),
                PropertyValue::Text(property.text().to_owned()),
            );
            continue;
        }

        for member in property.children.iter().filter(|member| member.children.is_empty()) {
            bag.insert(
                format!("{}/{}", property.name, member.name),
                PropertyValue::Text(member.text().to_owned()),
            );
        }
        let items = property.children.iter().map(xml_item).collect();
        bag.insert(property.name.clone(), PropertyValue::Items(items));
    }
    Ok(bag)
}

fn xml_item(node: &XmlNode) -> PropertyItem {
    PropertyItem {
        value: node.raw_text().to_owned(),
        attributes: node.attributes.clone(),
        children: node
            .children
            .iter()
            .map(|child| child.text().to_owned())
            .collect(),
    }
}

/// Parses a TOML configuration document.
pub fn parse_toml(contents: &str, path: &Path) -> Result<PropertyBag, SourceError> {
    let table: toml::Table = toml::from_str(contents).map_err(|source| SourceError::Toml {
        path: path.to_path_buf(),
        source,
    })?;

    let mut bag = PropertyBag::new();
    for (key, value) in table {
        match value {
            toml::Value::Table(group) => {
                let mut items = Vec::new();
                for (member, member_value) in group {
                    match member_value {
                        toml::Value::Array(values) => items.push(
                            PropertyItem::default()
                                .with_attribute(keys::NAME_ATTRIBUTE, member)
                                .with_children(values.iter().filter_map(toml_scalar)),
                        ),
                        other => {
                            if let Some(text) = toml_scalar(&other) {
                                bag.insert(format!("{key}/{member}"), PropertyValue::Text(text));
                            }
                        }
                    }
                }
                bag.insert(key, PropertyValue::Items(items));
            }
            toml::Value::Array(values) => {
                let items = values.into_iter().filter_map(toml_item).collect();
                bag.insert(key, PropertyValue::Items(items));
            }
            other => {
                if let Some(text) = toml_scalar(&other) {
                    bag.insert(key, PropertyValue::Text(text));
                }
            }
        }
    }
    Ok(bag)
}

fn toml_scalar(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(text) => Some(text.clone()),
        toml::Value::Boolean(flag) => Some(flag.to_string()),
        toml::Value::Integer(number) => Some(number.to_string()),
        toml::Value::Float(number) => Some(number.to_string()),
        toml::Value::Datetime(datetime) => Some(datetime.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}

/// Array entries are either plain scalars or tables with a `Value` key plus attributes.
fn toml_item(value: toml::Value) -> Option<PropertyItem> {
    match value {
        toml::Value::Table(table) => {
            let mut item = PropertyItem::default();
            for (name, field) in table {
                let Some(text) = toml_scalar(&field) else {
                    continue;
                };
                if name == "Value" {
                    item.value = text;
                } else {
                    item.attributes.insert(name, text);
                }
            }
            Some(item)
        }
        other => toml_scalar(&other).map(PropertyItem::text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::LanguageEntry;

    #[test]
    fn xml_properties_lists_and_groups() {
        let bag = parse_xml(
            r#"<SpellCheckerConfiguration Version="2018.8.16.0">
                <SpellCheckAsYouType>False</SpellCheckAsYouType>
                <CSharpOptions>
                  <IgnoreXmlDocComments>True</IgnoreXmlDocComments>
                </CSharpOptions>
                <IgnoredWords>
                  <Ignore>foo</Ignore>
                  <Ignore>bar</Ignore>
                </IgnoredWords>
                <SelectedLanguages>
                  <SelectedLanguage />
                  <SelectedLanguage>fr-FR</SelectedLanguage>
                </SelectedLanguages>
                <IgnoredClassifications>
                  <ContentType Name="CSharp">
                    <Classification>string</Classification>
                  </ContentType>
                </IgnoredClassifications>
                <ExclusionExpressions>
                  <Expression Options="IgnoreCase">\w+@\w+</Expression>
                </ExclusionExpressions>
                <IgnoredXmlElements />
              </SpellCheckerConfiguration>"#,
            Path::new("test.vsspell"),
        )
        .expect("parse");

        assert_eq!(bag.boolean(keys::SPELL_CHECK_AS_YOU_TYPE), Ok(Some(false)));
        assert_eq!(bag.boolean(keys::CSHARP_IGNORE_XML_DOC_COMMENTS), Ok(Some(true)));
        assert_eq!(bag.values(keys::IGNORED_WORDS), Some(vec!["foo", "bar"]));
        assert_eq!(
            bag.languages(keys::SELECTED_LANGUAGES),
            Some(vec![
                LanguageEntry::Inherited,
                LanguageEntry::Language("fr-FR".into())
            ])
        );
        assert_eq!(
            bag.groups(keys::IGNORED_CLASSIFICATIONS),
            Some(vec![("CSharp", vec!["string"])])
        );
        let expressions = bag.expressions(keys::EXCLUSION_EXPRESSIONS).expect("expressions");
        assert_eq!(expressions[0].0, r"\w+@\w+");
        assert!(expressions[0].1.ignore_case);
        assert_eq!(bag.values(keys::IGNORED_XML_ELEMENTS), Some(Vec::new()));
    }

    #[test]
    fn xml_expressions_keep_surrounding_whitespace() {
        let bag = parse_xml(
            "<SpellCheckerConfiguration>\
               <ExclusionExpressions><Expression> +$</Expression></ExclusionExpressions>\
               <IgnoredWords><Ignore>  padded  </Ignore></IgnoredWords>\
             </SpellCheckerConfiguration>",
            Path::new("test.vsspell"),
        )
        .expect("parse");

        let expressions = bag.expressions(keys::EXCLUSION_EXPRESSIONS).expect("expressions");
        assert_eq!(expressions[0].0, " +$");
        assert_eq!(bag.values(keys::IGNORED_WORDS), Some(vec!["padded"]));
    }

    #[test]
    fn toml_matches_xml_layout() {
        let bag = parse_toml(
            r#"
            SpellCheckAsYouType = false
            IgnoredWords = ["foo", "bar"]
            SelectedLanguages = ["", "fr-FR"]
            ExclusionExpressions = [{ Value = '\w+@\w+', Options = "IgnoreCase" }, '\d+']

            [CSharpOptions]
            IgnoreXmlDocComments = true

            [IgnoredClassifications]
            CSharp = ["string"]
            "#,
            Path::new("test.toml"),
        )
        .expect("parse");

        assert_eq!(bag.boolean(keys::SPELL_CHECK_AS_YOU_TYPE), Ok(Some(false)));
        assert_eq!(bag.boolean(keys::CSHARP_IGNORE_XML_DOC_COMMENTS), Ok(Some(true)));
        assert_eq!(bag.values(keys::IGNORED_WORDS), Some(vec!["foo", "bar"]));
        assert_eq!(
            bag.groups(keys::IGNORED_CLASSIFICATIONS),
            Some(vec![("CSharp", vec!["string"])])
        );
        let expressions = bag.expressions(keys::EXCLUSION_EXPRESSIONS).expect("expressions");
        assert_eq!(expressions.len(), 2);
        assert!(expressions[0].1.ignore_case);
        assert_eq!(expressions[1].0, r"\d+");
    }

    #[test]
    fn malformed_documents_report_path() {
        let err = parse_xml("<Root>", Path::new("broken.vsspell")).unwrap_err();
        assert_eq!(err.path(), Path::new("broken.vsspell"));

        let err = parse_toml("IgnoredWords = [", Path::new("broken.toml")).unwrap_err();
        assert!(matches!(err, SourceError::Toml { .. }));
    }

    #[test]
    fn file_source_picks_format_by_extension() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let xml_path = dir.path().join("App.vsspell");
        let toml_path = dir.path().join("spellcheck.TOML");
        fs::write(
            &xml_path,
            "<SpellCheckerConfiguration><IgnoreMnemonics>False</IgnoreMnemonics></SpellCheckerConfiguration>",
        )
        .expect("write xml");
        fs::write(&toml_path, "IgnoreMnemonics = false\n").expect("write toml");

        for path in [&xml_path, &toml_path] {
            assert!(FileSource.exists(path));
            let bag = FileSource.load(path).expect("load");
            assert_eq!(bag.boolean(keys::IGNORE_MNEMONICS), Ok(Some(false)));
        }
        assert_eq!(FileSource.read_words(&dir.path().join("none.dic")).expect("read"), None);
    }

    #[test]
    fn word_lists_skip_blanks_and_comments() {
        assert_eq!(
            parse_word_list("alpha\n\n# comment\n  beta  \r\n"),
            vec!["alpha".to_string(), "beta".to_string()]
        );
    }
}
