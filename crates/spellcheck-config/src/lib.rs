//! Resolution of spell checker configuration cascades.
//!
//! A file's effective settings come from an ordered list of configuration
//! sources (global, solution, project, folder, file). [`CascadeResolver`]
//! applies them outermost first, following `ImportSettingsFile` redirections,
//! and produces a read-only [`Configuration`].
//!
//! ```no_run
//! use spellcheck_config::{CascadeEntry, CascadeResolver, ConfigurationScope};
//!
//! let configuration = CascadeResolver::new().resolve(&[
//!     CascadeEntry::global("/home/dev/.config/spell/Global.vsspell"),
//!     CascadeEntry::new(ConfigurationScope::Project, "src/App/App.vsspell"),
//! ]);
//! assert!(!configuration.dictionary_languages.is_empty());
//! ```

mod code_analysis;
mod configuration;
pub mod defaults;
mod error;
mod languages;
pub mod paths;
mod pattern;
pub mod properties;
mod resolver;
mod scope;
mod source;
mod words;
mod xml;

pub use code_analysis::{CodeAnalysisDictionary, RecognizedWord};
pub use configuration::{
    directive_expression, CSharpOptions, CodeAnalysisOptions, Configuration,
    IgnoredCharacterClass, IgnoredWordsFile, InheritanceFlags, LanguageOptions,
    RecognizedWordHandling,
};
pub use error::{DictionaryImportError, LoadError, PatternError, PropertyError, SourceError};
pub use languages::{resolve_languages, LanguageEntry};
pub use pattern::{glob_to_regex, CompiledPattern, PatternKind, PatternSet, RegexOptions};
pub use properties::{PropertyBag, PropertyItem, PropertyValue};
pub use resolver::{CascadeResolver, LoadOutcome, LoadSession, ResolutionReport};
pub use scope::{CascadeEntry, ConfigurationScope};
pub use source::{
    parse_toml, parse_word_list, parse_xml, ConfigurationSource, FileSource, InMemorySource,
    TomlSource, XmlSource,
};
pub use words::{merge_words, CaseMode, WordMap, WordSet};
