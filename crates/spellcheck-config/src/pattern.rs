//! Compiled file patterns and exclusion expressions.
//!
//! Globs and raw regular expressions both end up as a [`regex::Regex`]. The
//! compiled expression text is the canonical form: two patterns are the same
//! entry when their canonical text is identical, whatever syntax they were
//! written in.

use std::fmt;
use std::path::Path;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::PatternError;

/// Syntax of a raw pattern as written in a configuration source.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum PatternKind {
    Glob,
    Regex,
}

/// Regular expression options as written in configuration files
/// (`IgnoreCase, Multiline`, ...), applied as inline flags.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RegexOptions {
    pub ignore_case: bool,
    pub multiline: bool,
    pub singleline: bool,
    pub ignore_pattern_whitespace: bool,
}

impl RegexOptions {
    /// Parses a comma, pipe or space separated option list. Options with no
    /// inline-flag equivalent are accepted and dropped.
    pub fn parse(text: &str) -> Self {
        let mut options = RegexOptions::default();
        for name in text
            .split(|ch: char| ch == ',' || ch == '|' || ch.is_whitespace())
            .filter(|name| !name.is_empty())
        {
            match name.to_ascii_lowercase().as_str() {
                "ignorecase" => options.ignore_case = true,
                "multiline" => options.multiline = true,
                "singleline" => options.singleline = true,
                "ignorepatternwhitespace" => options.ignore_pattern_whitespace = true,
                other => tracing::debug!(option = other, "ignoring unsupported regex option"),
            }
        }
        options
    }

    fn inline_flags(&self) -> Option<String> {
        let mut flags = String::new();
        if self.ignore_case {
            flags.push('i');
        }
        if self.multiline {
            flags.push('m');
        }
        if self.singleline {
            flags.push('s');
        }
        if self.ignore_pattern_whitespace {
            flags.push('x');
        }
        (!flags.is_empty()).then(|| format!("(?{flags})"))
    }
}

/// Translates a file glob into an anchored, case-insensitive expression.
///
/// `*` matches any run of characters (separators included), `?` a single
/// character, and `/` or `\` match either separator.
pub fn glob_to_regex(glob: &str) -> String {
    let mut expression = String::with_capacity(glob.len() * 2 + 8);
    expression.push_str("(?i)^");
    for ch in glob.chars() {
        match ch {
            '*' => expression.push_str(".*"),
            '?' => expression.push('.'),
            '/' | '\\' => expression.push_str(r"[\\/]"),
            other => {
                let mut buf = [0u8; 4];
                expression.push_str(&regex::escape(other.encode_utf8(&mut buf)));
            }
        }
    }
    expression.push('$');
    expression
}

/// A pattern compiled to its canonical regular expression.
#[derive(Clone, Debug)]
pub struct CompiledPattern {
    source: String,
    kind: PatternKind,
    regex: Regex,
}

impl CompiledPattern {
    pub fn compile(raw: &str, kind: PatternKind) -> Result<Self, PatternError> {
        match kind {
            PatternKind::Glob => CompiledPattern::glob(raw),
            PatternKind::Regex => CompiledPattern::regex(raw, RegexOptions::default()),
        }
    }

    pub fn glob(raw: &str) -> Result<Self, PatternError> {
        CompiledPattern::build(raw, PatternKind::Glob, glob_to_regex(raw))
    }

    pub fn regex(raw: &str, options: RegexOptions) -> Result<Self, PatternError> {
        let expression = match options.inline_flags() {
            Some(flags) => format!("{flags}{raw}"),
            None => raw.to_owned(),
        };
        CompiledPattern::build(raw, PatternKind::Regex, expression)
    }

    fn build(raw: &str, kind: PatternKind, expression: String) -> Result<Self, PatternError> {
        let regex = Regex::new(&expression).map_err(|source| PatternError {
            pattern: raw.to_owned(),
            source,
        })?;
        Ok(CompiledPattern {
            source: raw.to_owned(),
            kind,
            regex,
        })
    }

    /// Text as written in the configuration source.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    /// Canonical expression used for de-duplication.
    pub fn canonical(&self) -> &str {
        self.regex.as_str()
    }

    pub fn regex_ref(&self) -> &Regex {
        &self.regex
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for CompiledPattern {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for CompiledPattern {}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical())
    }
}

/// Ordered set of compiled patterns, unique by canonical expression.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatternSet {
    patterns: Vec<CompiledPattern>,
}

impl PatternSet {
    pub fn new() -> Self {
        PatternSet::default()
    }

    /// Adds `pattern` unless an entry with the same canonical form exists.
    pub fn insert(&mut self, pattern: CompiledPattern) -> bool {
        if self.contains(pattern.canonical()) {
            return false;
        }
        self.patterns.push(pattern);
        true
    }

    pub fn contains(&self, canonical: &str) -> bool {
        self.patterns
            .iter()
            .any(|existing| existing.canonical() == canonical)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledPattern> {
        self.patterns.iter()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(text))
    }

    pub fn matches_path(&self, path: &Path) -> bool {
        self.is_match(&path.to_string_lossy())
    }

    /// Produces the collection that follows `self` in the cascade: `incoming`
    /// alone when not inheriting or at the outermost scope, otherwise the union.
    pub fn merged(&self, incoming: PatternSet, inherit: bool, is_outermost: bool) -> PatternSet {
        if !inherit || is_outermost {
            return incoming;
        }
        let mut result = self.clone();
        result.extend(incoming);
        result
    }
}

impl Extend<CompiledPattern> for PatternSet {
    fn extend<T: IntoIterator<Item = CompiledPattern>>(&mut self, iter: T) {
        for pattern in iter {
            self.insert(pattern);
        }
    }
}

impl FromIterator<CompiledPattern> for PatternSet {
    fn from_iter<T: IntoIterator<Item = CompiledPattern>>(iter: T) -> Self {
        let mut set = PatternSet::new();
        set.extend(iter);
        set
    }
}

impl IntoIterator for PatternSet {
    type Item = CompiledPattern;
    type IntoIter = std::vec::IntoIter<CompiledPattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.into_iter()
    }
}

impl Serialize for PatternSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.patterns.iter().map(CompiledPattern::canonical))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_translation_is_anchored_and_separator_aware() {
        assert_eq!(glob_to_regex("*.min.js"), r"(?i)^.*\.min\.js$");
        assert_eq!(glob_to_regex(r"*\bin\*"), r"(?i)^.*[\\/]bin[\\/].*$");

        let pattern = CompiledPattern::glob(r"*\obj\*").expect("compile");
        assert!(pattern.is_match("src/obj/Debug/app.dll"));
        assert!(pattern.is_match(r"C:\src\OBJ\Debug\app.dll"));
        assert!(!pattern.is_match("src/object.cs"));
    }

    #[test]
    fn question_mark_matches_single_character() {
        let pattern = CompiledPattern::glob("file?.txt").expect("compile");
        assert!(pattern.is_match("file1.txt"));
        assert!(!pattern.is_match("file12.txt"));
    }

    #[test]
    fn glob_and_equivalent_regex_deduplicate() {
        let mut set = PatternSet::new();
        assert!(set.insert(CompiledPattern::glob("*.min.js").expect("glob")));
        let regex = CompiledPattern::regex(r"^.*\.min\.js$", RegexOptions::parse("IgnoreCase"))
            .expect("regex");
        assert_eq!(regex.canonical(), r"(?i)^.*\.min\.js$");
        assert!(!set.insert(regex));
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().map(CompiledPattern::kind), Some(PatternKind::Glob));
    }

    #[test]
    fn regex_options_become_inline_flags() {
        let options = RegexOptions::parse("IgnoreCase, Multiline | Singleline Compiled");
        assert!(options.ignore_case && options.multiline && options.singleline);
        assert!(!options.ignore_pattern_whitespace);

        let pattern = CompiledPattern::regex("^abc$", options).expect("compile");
        assert_eq!(pattern.canonical(), "(?ims)^abc$");
        assert_eq!(pattern.source(), "^abc$");
        assert!(pattern.is_match("x\nABC\ny"));
    }

    #[test]
    fn invalid_regex_reports_pattern() {
        let err = CompiledPattern::compile("(unclosed", PatternKind::Regex).unwrap_err();
        assert_eq!(err.pattern, "(unclosed");
    }

    #[test]
    fn merged_unions_or_replaces() {
        let base: PatternSet = ["*.a", "*.b"]
            .iter()
            .map(|raw| CompiledPattern::glob(raw).expect("glob"))
            .collect();
        let incoming: PatternSet = ["*.b", "*.c"]
            .iter()
            .map(|raw| CompiledPattern::glob(raw).expect("glob"))
            .collect();

        let union = base.merged(incoming.clone(), true, false);
        let sources: Vec<_> = union.iter().map(CompiledPattern::source).collect();
        assert_eq!(sources, vec!["*.a", "*.b", "*.c"]);

        let replaced = base.merged(incoming.clone(), true, true);
        assert_eq!(replaced, incoming);
        assert_eq!(base.merged(incoming.clone(), false, false), incoming);
    }
}
