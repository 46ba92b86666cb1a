use spellcheck_config::{
    CascadeEntry, CascadeResolver, ConfigurationScope, DictionaryImportError,
    RecognizedWordHandling,
};
use spellcheck_test_support::Fixture;

const CUSTOM_DICTIONARY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Dictionary>
  <Words>
    <Recognized>
      <Word Spelling="Add">Contoso</Word>
      <Word Spelling="Ignore">Northwind</Word>
    </Recognized>
    <Unrecognized>
      <Word SpellingAlternates="canceled">cancelled</Word>
    </Unrecognized>
  </Words>
  <Acronyms>
    <CasingExceptions>
      <Acronym>OAuth</Acronym>
    </CasingExceptions>
  </Acronyms>
</Dictionary>"#;

#[test]
fn cascade_options_drive_dictionary_import() {
    let fixture = Fixture::new();
    let settings = fixture.write_settings(
        "App.vsspell",
        "<CodeAnalysisDictionaryOptions>\
           <RecognizedWordHandling>AttributeDeterminesUsage</RecognizedWordHandling>\
           <TreatCasingExceptionsAsIgnoredWords>True</TreatCasingExceptionsAsIgnoredWords>\
         </CodeAnalysisDictionaryOptions>",
    );
    let dictionary = fixture.write("CustomDictionary.xml", CUSTOM_DICTIONARY);

    let mut config = CascadeResolver::new().resolve(&[CascadeEntry::new(
        ConfigurationScope::Project,
        settings,
    )]);
    assert_eq!(
        config.code_analysis.recognized_word_handling,
        RecognizedWordHandling::AttributeDeterminesUsage
    );

    let imported = config
        .import_code_analysis_dictionaries([&dictionary])
        .expect("import dictionary");

    assert_eq!(imported, 1);
    assert!(config.is_recognized_word("contoso"));
    assert!(config.should_ignore_word("northwind"));
    assert!(config.should_ignore_word("OAUTH"));
    assert_eq!(
        config.unrecognized_words.get("Cancelled"),
        Some(&vec!["canceled".to_string()])
    );
}

#[test]
fn disabled_import_skips_every_dictionary() {
    let fixture = Fixture::new();
    let settings = fixture.write_settings(
        "App.vsspell",
        "<CodeAnalysisDictionaryOptions>\
           <ImportCodeAnalysisDictionaries>False</ImportCodeAnalysisDictionaries>\
         </CodeAnalysisDictionaryOptions>",
    );
    let dictionary = fixture.write("CustomDictionary.xml", CUSTOM_DICTIONARY);
    let missing = fixture.root().join("Missing.xml");

    let mut config = CascadeResolver::new().resolve(&[CascadeEntry::new(
        ConfigurationScope::Project,
        settings,
    )]);

    let imported = config
        .import_code_analysis_dictionaries([&dictionary, &missing])
        .expect("nothing is read");
    assert_eq!(imported, 0);
    assert!(!config.should_ignore_word("contoso"));
}

#[test]
fn unreadable_dictionary_reports_its_path() {
    let fixture = Fixture::new();
    let missing = fixture.root().join("Missing.xml");
    let mut config = CascadeResolver::new().resolve(&[]);

    let err = config
        .import_code_analysis_dictionaries([&missing])
        .unwrap_err();
    match err {
        DictionaryImportError::Io { path, .. } => assert_eq!(path, missing),
        other => panic!("unexpected error: {other}"),
    }
}
