use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A configuration source could not be read or parsed.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read configuration {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse XML configuration {path}: {source}")]
    Xml {
        path: PathBuf,
        source: quick_xml::Error,
    },
    #[error("failed to parse TOML configuration {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("malformed configuration {path}: {message}")]
    Malformed { path: PathBuf, message: String },
}

impl SourceError {
    pub fn path(&self) -> &Path {
        match self {
            SourceError::Io { path, .. }
            | SourceError::Xml { path, .. }
            | SourceError::Toml { path, .. }
            | SourceError::Malformed { path, .. } => path,
        }
    }
}

/// A property carried a value that does not fit its declared type.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("property '{key}' has invalid value '{value}' (expected {expected})")]
pub struct PropertyError {
    pub key: String,
    pub value: String,
    pub expected: &'static str,
}

/// A glob or regular expression failed to compile.
#[derive(Debug, Error)]
#[error("invalid pattern '{pattern}': {source}")]
pub struct PatternError {
    pub pattern: String,
    pub source: regex::Error,
}

/// Failure while applying one source of the cascade.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("invalid setting in {path}: {source}")]
    Property { path: PathBuf, source: PropertyError },
    #[error("failed to read ignored words file {path}: {source}")]
    IgnoredWordsFile { path: PathBuf, source: io::Error },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Source(err) => err.path(),
            LoadError::Property { path, .. } | LoadError::IgnoredWordsFile { path, .. } => path,
        }
    }
}

/// A code analysis dictionary could not be imported.
#[derive(Debug, Error)]
pub enum DictionaryImportError {
    #[error("failed to read code analysis dictionary {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse code analysis dictionary: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("malformed code analysis dictionary: {0}")]
    Malformed(String),
}
