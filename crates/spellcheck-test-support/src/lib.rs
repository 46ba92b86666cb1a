//! Shared test harness utilities for spellcheck crates.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Temporary directory tree for configuration files.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Fixture {
            dir: TempDir::new().expect("tempdir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `contents` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture directory");
        }
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    /// Writes an XML settings file whose root contains `body`.
    pub fn write_settings(&self, relative: &str, body: &str) -> PathBuf {
        self.write(relative, &settings_document(body))
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Fixture::new()
    }
}

/// Wraps property elements in a settings document root.
pub fn settings_document(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
         <SpellCheckerConfiguration Version=\"2018.8.16.0\">\n{body}\n</SpellCheckerConfiguration>\n"
    )
}
