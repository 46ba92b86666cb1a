use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Specificity level of a configuration source, ordered from outermost to innermost.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum ConfigurationScope {
    Global,
    Solution,
    Project,
    Folder,
    File,
    Dependency,
}

impl ConfigurationScope {
    pub const ALL: &'static [ConfigurationScope] = &[
        ConfigurationScope::Global,
        ConfigurationScope::Solution,
        ConfigurationScope::Project,
        ConfigurationScope::Folder,
        ConfigurationScope::File,
        ConfigurationScope::Dependency,
    ];

    /// The global scope is the root of the cascade and never inherits.
    pub fn is_outermost(self) -> bool {
        self == ConfigurationScope::Global
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigurationScope::Global => "global",
            ConfigurationScope::Solution => "solution",
            ConfigurationScope::Project => "project",
            ConfigurationScope::Folder => "folder",
            ConfigurationScope::File => "file",
            ConfigurationScope::Dependency => "dependency",
        }
    }
}

impl fmt::Display for ConfigurationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConfigurationScope {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ConfigurationScope::ALL
            .iter()
            .copied()
            .find(|scope| scope.as_str().eq_ignore_ascii_case(value))
            .ok_or(())
    }
}

/// One `(scope, path)` pair of the cascade, as produced by file discovery.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CascadeEntry {
    pub scope: ConfigurationScope,
    pub path: PathBuf,
}

impl CascadeEntry {
    pub fn new(scope: ConfigurationScope, path: impl Into<PathBuf>) -> Self {
        CascadeEntry {
            scope,
            path: path.into(),
        }
    }

    pub fn global(path: impl Into<PathBuf>) -> Self {
        CascadeEntry::new(ConfigurationScope::Global, path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_order_from_global_inward() {
        let mut scopes = vec![
            ConfigurationScope::File,
            ConfigurationScope::Global,
            ConfigurationScope::Folder,
            ConfigurationScope::Project,
            ConfigurationScope::Solution,
        ];
        scopes.sort();
        assert_eq!(
            scopes,
            vec![
                ConfigurationScope::Global,
                ConfigurationScope::Solution,
                ConfigurationScope::Project,
                ConfigurationScope::Folder,
                ConfigurationScope::File,
            ]
        );
        assert!(ConfigurationScope::Global.is_outermost());
        assert!(!ConfigurationScope::Solution.is_outermost());
    }

    #[test]
    fn parses_scope_names_case_insensitively() {
        assert_eq!("Project".parse(), Ok(ConfigurationScope::Project));
        assert_eq!("dependency".parse(), Ok(ConfigurationScope::Dependency));
        assert!("workspace".parse::<ConfigurationScope>().is_err());
    }
}
