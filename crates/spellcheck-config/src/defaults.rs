//! Built-in values a configuration starts from before any source is applied.

/// Language used when no source selects one.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// File name of the global ignored words list when the global source names none.
pub const DEFAULT_IGNORED_WORDS_FILE: &str = "IgnoredWords.dic";

/// Matches inline `Ignore spelling: word1 word2` directives so the directive
/// text itself is never reported.
pub const IGNORE_SPELLING_DIRECTIVE: &str = r"(?im)Ignore spelling:[^\r\n]*$";

/// Escape sequences and documentation commands that look like words.
pub const IGNORED_WORDS: &[&str] = &[
    r"\a", r"\b", r"\f", r"\n", r"\r", r"\t", r"\v", r"\x", r"\u",
    r"\addindex", r"\addtogroup", r"\anchor", r"\arg", r"\attention", r"\author",
    r"\authors", r"\brief", r"\bug", r"\callgraph", r"\callergraph", r"\category",
    r"\cite", r"\class", r"\code", r"\cond", r"\copybrief", r"\copydetails",
    r"\copydoc", r"\copyright", r"\date", r"\def", r"\defgroup", r"\deprecated",
    r"\details", r"\dir", r"\dontinclude", r"\endcode", r"\endcond",
];

/// Content type and classification ignored out of the box.
pub const IGNORED_CLASSIFICATION: (&str, &str) = ("XML", "XML Attribute Value");

/// Generated, minified and binary files that are never spell checked.
pub const IGNORED_FILE_PATTERNS: &[&str] = &[
    r"*\bin\*",
    r"*\obj\*",
    r"*.min.cs",
    r"*.min.js",
    r"*.min.css",
    r"*.designer.cs",
    r"*.designer.vb",
    r"*.generated.cs",
    r"*.g.cs",
    r"*.g.i.cs",
    r"*.AssemblyAttributes.cs",
    r"*.resources",
    r"*.snk",
    r"*.pfx",
    r"*.png",
    r"*.jpg",
    r"*.gif",
    r"*.ico",
];

/// XML elements whose content is code or markup rather than prose.
pub const IGNORED_XML_ELEMENTS: &[&str] = &[
    "c",
    "code",
    "codeEntityReference",
    "codeReference",
    "codeInline",
    "command",
    "environmentVariable",
    "fictitiousUri",
    "foreignPhrase",
    "link",
    "linkTarget",
    "linkUri",
    "localUri",
    "replaceable",
    "see",
    "seeAlso",
    "style",
    "token",
];

/// XML attributes whose values are prose and are spell checked.
pub const SPELL_CHECKED_XML_ATTRIBUTES: &[&str] = &[
    "alt",
    "altText",
    "content",
    "Content",
    "caption",
    "Caption",
    "header",
    "Header",
    "lead",
    "title",
    "Title",
    "term",
    "text",
    "ToolTip",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lists_have_expected_sizes() {
        assert_eq!(IGNORED_WORDS.len(), 38);
        assert_eq!(IGNORED_FILE_PATTERNS.len(), 18);
        assert_eq!(IGNORED_XML_ELEMENTS.len(), 18);
        assert_eq!(SPELL_CHECKED_XML_ATTRIBUTES.len(), 14);
    }

    #[test]
    fn ignored_words_are_distinct_ignoring_case() {
        let folded: std::collections::HashSet<String> =
            IGNORED_WORDS.iter().map(|word| word.to_lowercase()).collect();
        assert_eq!(folded.len(), IGNORED_WORDS.len());
    }
}
