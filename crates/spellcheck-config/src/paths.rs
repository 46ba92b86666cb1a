//! Path helpers for settings that reference other files.

use std::borrow::Cow;
use std::env;
use std::path::{Path, PathBuf};

/// Expands `%NAME%`, `$NAME` and `${NAME}` references using `lookup`.
/// Unknown variables are left as written.
pub fn expand_environment_variables<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let percent = expand_percent_variables(text, &lookup);
    shellexpand::env_with_context_no_errors(&*percent, |name: &str| lookup(name))
        .into_owned()
}

fn expand_percent_variables<'a, F>(text: &'a str, lookup: &F) -> Cow<'a, str>
where
    F: Fn(&str) -> Option<String>,
{
    if !text.contains('%') {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('%') {
        result.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let Some(end) = tail.find('%') else {
            result.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let name = &tail[..end];
        match lookup(name).filter(|_| !name.is_empty()) {
            Some(value) => {
                result.push_str(&value);
                rest = &tail[end + 1..];
            }
            None => {
                // Keep the opening marker and retry from the closing one so
                // `50% of %NAME%` still expands the variable.
                result.push('%');
                result.push_str(name);
                rest = &tail[end..];
            }
        }
    }
    result.push_str(rest);
    Cow::Owned(result)
}

/// Expands environment variables from the process environment and makes the
/// result absolute relative to the directory containing `source_file`.
pub fn resolve_reference(reference: &str, source_file: &Path) -> PathBuf {
    let expanded = expand_environment_variables(reference.trim(), |name| env::var(name).ok());
    let path = PathBuf::from(expanded);
    if path.is_absolute() {
        path
    } else {
        source_directory(source_file).join(path)
    }
}

pub fn source_directory(source_file: &Path) -> PathBuf {
    source_file
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Key used to recognise a file that has already been loaded.
pub fn visit_key(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
