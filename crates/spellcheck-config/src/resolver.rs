//! Cascade resolution: merges configuration sources outer to inner into one
//! [`Configuration`].
//!
//! Every source is isolated: a source that cannot be read is skipped without
//! touching the configuration, and a failure part-way through a source stops
//! only that source. [`CascadeResolver::resolve`] never fails.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::configuration::{
    Configuration, IgnoredCharacterClass, IgnoredWordsFile, RecognizedWordHandling,
};
use crate::defaults;
use crate::error::{LoadError, PatternError, PropertyError};
use crate::languages::resolve_languages;
use crate::paths;
use crate::pattern::{CompiledPattern, PatternSet, RegexOptions};
use crate::properties::{keys, PropertyBag};
use crate::scope::{CascadeEntry, ConfigurationScope};
use crate::source::{ConfigurationSource, FileSource};
use crate::words::{merge_words, CaseMode, WordSet};

/// What happened to one requested source.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadOutcome {
    Loaded,
    /// The file was already applied earlier in this resolution (import cycle
    /// or repeated entry).
    AlreadyVisited,
    /// The file does not exist; it contributes nothing.
    Missing,
}

/// Record of a resolution, for callers that need more than the log.
#[derive(Debug, Default)]
pub struct ResolutionReport {
    /// Sources applied, in application order (imports included).
    pub loaded: Vec<CascadeEntry>,
    pub missing: Vec<CascadeEntry>,
    pub errors: Vec<LoadError>,
    pub invalid_patterns: Vec<PatternError>,
}

/// State shared by every load of one top-level resolution, imports included.
#[derive(Debug, Default)]
pub struct LoadSession {
    visited: HashSet<PathBuf>,
    report: ResolutionReport,
}

impl LoadSession {
    pub fn new() -> Self {
        LoadSession::default()
    }

    pub fn is_visited(&self, path: &Path) -> bool {
        self.visited.contains(&paths::visit_key(path))
    }

    pub fn report(&self) -> &ResolutionReport {
        &self.report
    }

    pub fn into_report(self) -> ResolutionReport {
        self.report
    }
}

/// Resolves configuration cascades using a [`ConfigurationSource`].
#[derive(Clone, Debug, Default)]
pub struct CascadeResolver<S = FileSource> {
    source: S,
}

impl CascadeResolver<FileSource> {
    pub fn new() -> Self {
        CascadeResolver::default()
    }
}

impl<S: ConfigurationSource> CascadeResolver<S> {
    pub fn with_source(source: S) -> Self {
        CascadeResolver { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolves `entries` (outermost first) into a configuration.
    pub fn resolve(&self, entries: &[CascadeEntry]) -> Configuration {
        self.resolve_with_report(entries).0
    }

    /// Like [`resolve`](Self::resolve), also returning what was loaded,
    /// skipped and rejected along the way.
    pub fn resolve_with_report(&self, entries: &[CascadeEntry]) -> (Configuration, ResolutionReport) {
        let mut configuration = Configuration::default();
        let mut session = LoadSession::new();

        for entry in entries {
            if let Err(err) = self.load(entry.scope, &entry.path, &mut configuration, &mut session) {
                warn!(scope = %entry.scope, error = %err, "skipping configuration source");
                session.report.errors.push(err);
            }
        }

        configuration.finalize();
        (configuration, session.into_report())
    }

    /// Applies the source at `path` (and anything it imports) to `configuration`.
    pub fn load(
        &self,
        scope: ConfigurationScope,
        path: &Path,
        configuration: &mut Configuration,
        session: &mut LoadSession,
    ) -> Result<LoadOutcome, LoadError> {
        let key = paths::visit_key(path);
        if session.visited.contains(&key) {
            debug!(path = %path.display(), %scope, "configuration already loaded");
            return Ok(LoadOutcome::AlreadyVisited);
        }

        if !self.source.exists(path) {
            debug!(path = %path.display(), %scope, "configuration file not found");
            session.report.missing.push(CascadeEntry::new(scope, path));
            return Ok(LoadOutcome::Missing);
        }

        let bag = self.source.load(path)?;
        session.visited.insert(key);
        session.report.loaded.push(CascadeEntry::new(scope, path));
        debug!(path = %path.display(), %scope, properties = bag.len(), "loading configuration");

        let import = bag
            .string(keys::IMPORT_SETTINGS_FILE)
            .map(|reference| paths::resolve_reference(reference, path));

        // Imported settings precede the importing file's own settings, except
        // for the global file where the import gets the final say.
        if !scope.is_outermost() {
            if let Some(import) = &import {
                self.load_import(scope, path, import, configuration, session);
            }
        }

        self.apply(scope, path, &bag, configuration, &mut session.report)?;

        if scope.is_outermost() {
            if let Some(import) = &import {
                self.load_import(scope, path, import, configuration, session);
            }
        }

        Ok(LoadOutcome::Loaded)
    }

    fn load_import(
        &self,
        scope: ConfigurationScope,
        importer: &Path,
        import: &Path,
        configuration: &mut Configuration,
        session: &mut LoadSession,
    ) {
        match self.load(scope, import, configuration, session) {
            Ok(LoadOutcome::Loaded) => {}
            Ok(LoadOutcome::AlreadyVisited) => {
                debug!(
                    importer = %importer.display(),
                    import = %import.display(),
                    "import already loaded, skipping"
                );
            }
            Ok(LoadOutcome::Missing) => {
                warn!(
                    importer = %importer.display(),
                    import = %import.display(),
                    "imported settings file not found"
                );
            }
            Err(err) => {
                warn!(importer = %importer.display(), error = %err, "failed to import settings");
                session.report.errors.push(err);
            }
        }
    }

    fn apply(
        &self,
        scope: ConfigurationScope,
        path: &Path,
        bag: &PropertyBag,
        configuration: &mut Configuration,
        report: &mut ResolutionReport,
    ) -> Result<(), LoadError> {
        apply_scalars(scope, bag, configuration).map_err(|source| LoadError::Property {
            path: path.to_path_buf(),
            source,
        })?;
        apply_collections(scope, path, bag, configuration, report);
        self.apply_ignored_words_file(scope, path, bag, configuration)?;
        apply_classifications(scope, bag, configuration);

        if let Some(entries) = bag.languages(keys::SELECTED_LANGUAGES) {
            if let Some(languages) = resolve_languages(&configuration.dictionary_languages, &entries)
            {
                configuration.dictionary_languages = languages;
            }
        }
        Ok(())
    }

    fn apply_ignored_words_file(
        &self,
        scope: ConfigurationScope,
        path: &Path,
        bag: &PropertyBag,
        configuration: &mut Configuration,
    ) -> Result<(), LoadError> {
        let reference = bag.string(keys::IGNORED_WORDS_FILE).or_else(|| {
            scope
                .is_outermost()
                .then_some(defaults::DEFAULT_IGNORED_WORDS_FILE)
        });
        let Some(reference) = reference else {
            return Ok(());
        };

        let file = paths::resolve_reference(reference, path);
        if !configuration
            .ignored_words_files
            .iter()
            .any(|known| known.path == file)
        {
            configuration.ignored_words_files.push(IgnoredWordsFile {
                scope,
                path: file.clone(),
            });
        }

        match self.source.read_words(&file) {
            Ok(Some(words)) => {
                debug!(file = %file.display(), count = words.len(), "loaded ignored words file");
                let incoming = WordSet::from_words(CaseMode::Insensitive, words);
                configuration.ignored_words = configuration.ignored_words.union(&incoming);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(source) => Err(LoadError::IgnoredWordsFile { path: file, source }),
        }
    }
}

fn read_bool(bag: &PropertyBag, key: &str, target: &mut bool) -> Result<(), PropertyError> {
    if let Some(value) = bag.boolean(key)? {
        *target = value;
    }
    Ok(())
}

fn apply_scalars(
    scope: ConfigurationScope,
    bag: &PropertyBag,
    config: &mut Configuration,
) -> Result<(), PropertyError> {
    read_bool(bag, keys::SPELL_CHECK_AS_YOU_TYPE, &mut config.spell_check_as_you_type)?;
    if scope.is_outermost() {
        config.include_in_project_spell_check = true;
    } else {
        read_bool(
            bag,
            keys::INCLUDE_IN_PROJECT_SPELL_CHECK,
            &mut config.include_in_project_spell_check,
        )?;
    }
    read_bool(bag, keys::DETECT_DOUBLED_WORDS, &mut config.detect_doubled_words)?;
    read_bool(bag, keys::IGNORE_WORDS_WITH_DIGITS, &mut config.ignore_words_with_digits)?;
    read_bool(
        bag,
        keys::IGNORE_WORDS_IN_ALL_UPPERCASE,
        &mut config.ignore_words_in_all_uppercase,
    )?;
    read_bool(
        bag,
        keys::IGNORE_WORDS_IN_MIXED_CASE,
        &mut config.ignore_words_in_mixed_case,
    )?;
    read_bool(bag, keys::IGNORE_FORMAT_SPECIFIERS, &mut config.ignore_format_specifiers)?;
    read_bool(
        bag,
        keys::IGNORE_FILENAMES_AND_EMAIL_ADDRESSES,
        &mut config.ignore_filenames_and_email_addresses,
    )?;
    read_bool(
        bag,
        keys::IGNORE_XML_ELEMENTS_IN_TEXT,
        &mut config.ignore_xml_elements_in_text,
    )?;
    read_bool(
        bag,
        keys::TREAT_UNDERSCORE_AS_SEPARATOR,
        &mut config.treat_underscore_as_separator,
    )?;
    read_bool(bag, keys::IGNORE_MNEMONICS, &mut config.ignore_mnemonics)?;
    if let Some(class) = bag.enumeration::<IgnoredCharacterClass>(
        keys::IGNORED_CHARACTER_CLASS,
        "None, NonAscii or NonLatin",
    )? {
        config.ignored_character_class = class;
    }
    read_bool(
        bag,
        keys::DETERMINE_RESOURCE_FILE_LANGUAGE_FROM_NAME,
        &mut config.determine_resource_file_language_from_name,
    )?;

    if scope.is_outermost() {
        read_bool(
            bag,
            keys::ENABLE_WPF_TEXT_BOX_SPELL_CHECKING,
            &mut config.enable_wpf_text_box_spell_checking,
        )?;
        let language = &mut config.language_options;
        read_bool(
            bag,
            keys::LANGUAGE_IGNORE_IDENTIFIER_IF_PRIVATE,
            &mut language.ignore_identifier_if_private,
        )?;
        read_bool(
            bag,
            keys::LANGUAGE_IGNORE_IDENTIFIER_IF_INTERNAL,
            &mut language.ignore_identifier_if_internal,
        )?;
        read_bool(
            bag,
            keys::LANGUAGE_IGNORE_IDENTIFIER_IF_ALL_UPPERCASE,
            &mut language.ignore_identifier_if_all_uppercase,
        )?;
        read_bool(
            bag,
            keys::LANGUAGE_IGNORE_IDENTIFIERS_WITHIN_MEMBER_BODIES,
            &mut language.ignore_identifiers_within_member_bodies,
        )?;
        read_bool(
            bag,
            keys::LANGUAGE_IGNORE_TYPE_PARAMETERS,
            &mut language.ignore_type_parameters,
        )?;
    }

    let csharp = &mut config.csharp_options;
    read_bool(bag, keys::CSHARP_IGNORE_XML_DOC_COMMENTS, &mut csharp.ignore_xml_doc_comments)?;
    read_bool(
        bag,
        keys::CSHARP_IGNORE_DELIMITED_COMMENTS,
        &mut csharp.ignore_delimited_comments,
    )?;
    read_bool(
        bag,
        keys::CSHARP_IGNORE_STANDARD_SINGLE_LINE_COMMENTS,
        &mut csharp.ignore_standard_single_line_comments,
    )?;
    read_bool(
        bag,
        keys::CSHARP_IGNORE_QUADRUPLE_SLASH_COMMENTS,
        &mut csharp.ignore_quadruple_slash_comments,
    )?;
    read_bool(bag, keys::CSHARP_IGNORE_NORMAL_STRINGS, &mut csharp.ignore_normal_strings)?;
    read_bool(bag, keys::CSHARP_IGNORE_VERBATIM_STRINGS, &mut csharp.ignore_verbatim_strings)?;
    read_bool(
        bag,
        keys::CSHARP_IGNORE_INTERPOLATED_STRINGS,
        &mut csharp.ignore_interpolated_strings,
    )?;
    read_bool(
        bag,
        keys::CSHARP_APPLY_TO_ALL_C_STYLE_LANGUAGES,
        &mut csharp.apply_to_all_c_style_languages,
    )?;

    let analysis = &mut config.code_analysis;
    read_bool(
        bag,
        keys::CAD_IMPORT_CODE_ANALYSIS_DICTIONARIES,
        &mut analysis.import_code_analysis_dictionaries,
    )?;
    if let Some(handling) = bag.enumeration::<RecognizedWordHandling>(
        keys::CAD_RECOGNIZED_WORD_HANDLING,
        "None, IgnoreAllWords, AddAllWords or AttributeDeterminesUsage",
    )? {
        analysis.recognized_word_handling = handling;
    }
    read_bool(
        bag,
        keys::CAD_TREAT_UNRECOGNIZED_WORDS_AS_MISSPELLED,
        &mut analysis.treat_unrecognized_words_as_misspelled,
    )?;
    read_bool(
        bag,
        keys::CAD_TREAT_DEPRECATED_TERMS_AS_MISSPELLED,
        &mut analysis.treat_deprecated_terms_as_misspelled,
    )?;
    read_bool(
        bag,
        keys::CAD_TREAT_COMPOUND_TERMS_AS_MISSPELLED,
        &mut analysis.treat_compound_terms_as_misspelled,
    )?;
    read_bool(
        bag,
        keys::CAD_TREAT_CASING_EXCEPTIONS_AS_IGNORED_WORDS,
        &mut analysis.treat_casing_exceptions_as_ignored_words,
    )?;

    let inherit = &mut config.inheritance;
    read_bool(bag, keys::INHERIT_IGNORED_WORDS, &mut inherit.ignored_words)?;
    read_bool(bag, keys::INHERIT_IGNORED_FILE_PATTERNS, &mut inherit.ignored_file_patterns)?;
    read_bool(
        bag,
        keys::INHERIT_ADDITIONAL_DICTIONARY_FOLDERS,
        &mut inherit.additional_dictionary_folders,
    )?;
    read_bool(bag, keys::INHERIT_EXCLUSION_EXPRESSIONS, &mut inherit.exclusion_expressions)?;
    read_bool(bag, keys::INHERIT_XML_SETTINGS, &mut inherit.xml_settings)?;
    read_bool(
        bag,
        keys::INHERIT_IGNORED_CLASSIFICATIONS,
        &mut inherit.ignored_classifications,
    )?;
    Ok(())
}

fn keep_valid(
    path: &Path,
    compiled: Result<CompiledPattern, PatternError>,
    set: &mut PatternSet,
    report: &mut ResolutionReport,
) {
    match compiled {
        Ok(pattern) => {
            set.insert(pattern);
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "skipping invalid pattern");
            report.invalid_patterns.push(err);
        }
    }
}

fn compile_expressions(
    path: &Path,
    expressions: Vec<(&str, RegexOptions)>,
    report: &mut ResolutionReport,
) -> PatternSet {
    let mut set = PatternSet::new();
    for (raw, options) in expressions {
        keep_valid(path, CompiledPattern::regex(raw, options), &mut set, report);
    }
    set
}

fn apply_collections(
    scope: ConfigurationScope,
    path: &Path,
    bag: &PropertyBag,
    config: &mut Configuration,
    report: &mut ResolutionReport,
) {
    let outermost = scope.is_outermost();
    let inherit = config.inheritance;

    if let Some(words) = bag.values(keys::IGNORED_WORDS) {
        let incoming = WordSet::from_words(CaseMode::Insensitive, words);
        config.ignored_words =
            merge_words(&config.ignored_words, incoming, inherit.ignored_words, outermost);
    }

    if let Some(globs) = bag.values(keys::IGNORED_FILE_PATTERNS) {
        let mut incoming = PatternSet::new();
        for glob in globs {
            keep_valid(path, CompiledPattern::glob(glob), &mut incoming, report);
        }
        config.ignored_file_patterns =
            config
                .ignored_file_patterns
                .merged(incoming, inherit.ignored_file_patterns, outermost);
    }

    if let Some(folders) = bag.values(keys::ADDITIONAL_DICTIONARY_FOLDERS) {
        let resolved = folders.into_iter().map(|folder| {
            paths::resolve_reference(folder, path)
                .to_string_lossy()
                .into_owned()
        });
        let incoming = WordSet::from_words(CaseMode::Insensitive, resolved);
        config.additional_dictionary_folders = merge_words(
            &config.additional_dictionary_folders,
            incoming,
            inherit.additional_dictionary_folders,
            outermost,
        );
    }

    if let Some(expressions) = bag.expressions(keys::EXCLUSION_EXPRESSIONS) {
        let incoming = compile_expressions(path, expressions, report);
        config.exclusion_expressions = config.exclusion_expressions.merged(
            incoming,
            inherit.exclusion_expressions,
            outermost,
        );
    }

    if outermost {
        if let Some(expressions) = bag.expressions(keys::VISUAL_STUDIO_ID_EXCLUSIONS) {
            config.editor_exclusions = compile_expressions(path, expressions, report);
        }
    }

    if let Some(elements) = bag.values(keys::IGNORED_XML_ELEMENTS) {
        let incoming = WordSet::from_words(CaseMode::Sensitive, elements);
        config.ignored_xml_elements = merge_words(
            &config.ignored_xml_elements,
            incoming,
            inherit.xml_settings,
            outermost,
        );
    }

    if let Some(attributes) = bag.values(keys::SPELL_CHECKED_XML_ATTRIBUTES) {
        let incoming = WordSet::from_words(CaseMode::Sensitive, attributes);
        config.spell_checked_xml_attributes = merge_words(
            &config.spell_checked_xml_attributes,
            incoming,
            inherit.xml_settings,
            outermost,
        );
    }
}

fn apply_classifications(
    scope: ConfigurationScope,
    bag: &PropertyBag,
    config: &mut Configuration,
) {
    let Some(groups) = bag.groups(keys::IGNORED_CLASSIFICATIONS) else {
        return;
    };

    let mut classifications = if scope.is_outermost() || !config.inheritance.ignored_classifications
    {
        BTreeMap::new()
    } else {
        config.ignored_classifications.clone()
    };

    for (content_type, names) in groups {
        let entry = classifications
            .entry(content_type.to_owned())
            .or_insert_with(WordSet::case_sensitive);
        for name in names {
            entry.insert(name);
        }
    }
    config.ignored_classifications = classifications;
}
