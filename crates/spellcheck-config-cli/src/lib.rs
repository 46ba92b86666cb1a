use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::json;
use spellcheck_config::{
    CascadeEntry, CascadeResolver, Configuration, ConfigurationScope, ResolutionReport,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Resolve(args) => handle_resolve(args),
        Command::Check(args) => handle_check(args),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn resolve(cascade: &CascadeArgs) -> (Configuration, ResolutionReport) {
    debug!(sources = cascade.source.len(), "resolving configuration cascade");
    CascadeResolver::new().resolve_with_report(&cascade.source)
}

fn exit_code(report: &ResolutionReport, strict: bool) -> i32 {
    if strict && !(report.errors.is_empty() && report.invalid_patterns.is_empty()) {
        2
    } else {
        0
    }
}

fn handle_resolve(args: ResolveArgs) -> Result<i32> {
    let ResolveArgs { cascade, format } = args;
    let (config, report) = resolve(&cascade);

    let rendered = match format.unwrap_or(FormatValue::Plain) {
        FormatValue::Plain => render_plain(&config, &report)?,
        FormatValue::Json => serde_json::to_string_pretty(&json!({
            "configuration": config,
            "loaded": report
                .loaded
                .iter()
                .map(|entry| json!({ "scope": entry.scope, "path": entry.path }))
                .collect::<Vec<_>>(),
            "errors": report
                .errors
                .iter()
                .map(ToString::to_string)
                .chain(report.invalid_patterns.iter().map(ToString::to_string))
                .collect::<Vec<_>>(),
        }))?,
    };

    emit(&rendered)?;
    Ok(exit_code(&report, cascade.strict))
}

#[derive(Serialize)]
struct WordVerdict {
    word: String,
    ignored: bool,
    recognized: bool,
}

#[derive(Serialize)]
struct FileVerdict {
    path: PathBuf,
    spell_checked: bool,
}

fn handle_check(args: CheckArgs) -> Result<i32> {
    let CheckArgs {
        cascade,
        dictionary,
        word,
        file,
        format,
    } = args;

    let (mut config, report) = resolve(&cascade);
    config
        .import_code_analysis_dictionaries(&dictionary)
        .context("failed to import code analysis dictionary")?;

    let words: Vec<WordVerdict> = word
        .into_iter()
        .map(|word| WordVerdict {
            ignored: config.should_ignore_word(&word),
            recognized: config.is_recognized_word(&word),
            word,
        })
        .collect();
    let files: Vec<FileVerdict> = file
        .into_par_iter()
        .map(|path| FileVerdict {
            spell_checked: config.should_spell_check_file(&path),
            path,
        })
        .collect();

    let rendered = match format.unwrap_or(FormatValue::Plain) {
        FormatValue::Plain => {
            let mut out = String::new();
            for verdict in &words {
                let status = if verdict.ignored {
                    "ignored"
                } else if verdict.recognized {
                    "recognized"
                } else {
                    "checked"
                };
                writeln!(out, "word {}: {status}", verdict.word)?;
            }
            for verdict in &files {
                let status = if verdict.spell_checked {
                    "spell checked"
                } else {
                    "skipped"
                };
                writeln!(out, "file {}: {status}", verdict.path.display())?;
            }
            out
        }
        FormatValue::Json => serde_json::to_string_pretty(&json!({
            "words": words,
            "files": files,
        }))?,
    };

    emit(&rendered)?;
    Ok(exit_code(&report, cascade.strict))
}

fn render_plain(config: &Configuration, report: &ResolutionReport) -> Result<String> {
    let mut out = String::new();
    for entry in &report.loaded {
        writeln!(out, "loaded {} {}", entry.scope, entry.path.display())?;
    }
    for err in &report.errors {
        writeln!(out, "error {err}")?;
    }
    for err in &report.invalid_patterns {
        writeln!(out, "error {err}")?;
    }

    writeln!(out, "languages: {}", config.dictionary_languages.join(", "))?;
    writeln!(out, "spell check as you type: {}", config.spell_check_as_you_type)?;
    writeln!(
        out,
        "include in project spell check: {}",
        config.include_in_project_spell_check
    )?;
    writeln!(out, "detect doubled words: {}", config.detect_doubled_words)?;
    writeln!(
        out,
        "recognized word handling: {}",
        config.code_analysis.recognized_word_handling
    )?;

    write_list(&mut out, "ignored words", config.ignored_words.iter())?;
    write_list(
        &mut out,
        "ignored file patterns",
        config.ignored_file_patterns.iter().map(|p| p.source()),
    )?;
    write_list(
        &mut out,
        "exclusion expressions",
        config.exclusion_expressions.iter().map(|p| p.source()),
    )?;
    write_list(
        &mut out,
        "additional dictionary folders",
        config.additional_dictionary_folders.iter(),
    )?;
    for (content_type, classifications) in &config.ignored_classifications {
        write_list(
            &mut out,
            &format!("ignored classifications ({content_type})"),
            classifications.iter(),
        )?;
    }
    Ok(out)
}

fn write_list<'a>(
    out: &mut String,
    label: &str,
    items: impl Iterator<Item = &'a str>,
) -> Result<()> {
    let items: Vec<&str> = items.collect();
    writeln!(out, "{label} ({}):", items.len())?;
    for item in items {
        writeln!(out, "  {item}")?;
    }
    Ok(())
}

fn emit(content: &str) -> Result<()> {
    print!("{}", content);
    if !content.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn parse_source(value: &str) -> Result<CascadeEntry, String> {
    let (scope, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected <scope>=<path>, got '{value}'"))?;
    let scope: ConfigurationScope = scope.trim().parse().map_err(|_| {
        let known: Vec<_> = ConfigurationScope::ALL.iter().map(|s| s.as_str()).collect();
        format!("unknown scope '{scope}' (expected one of {})", known.join(", "))
    })?;
    if path.trim().is_empty() {
        return Err("source path is empty".to_owned());
    }
    Ok(CascadeEntry::new(scope, path.trim()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Resolve spell checker configuration cascades"
)]
struct Cli {
    /// Log loading decisions to stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the configuration resolved from a cascade of sources.
    Resolve(ResolveArgs),
    /// Report how words and files are treated by a resolved configuration.
    Check(CheckArgs),
}

#[derive(Args)]
struct CascadeArgs {
    /// Configuration source as `<scope>=<path>`, outermost first.
    #[arg(
        long = "source",
        value_name = "SCOPE=PATH",
        value_parser = parse_source,
        action = ArgAction::Append
    )]
    source: Vec<CascadeEntry>,

    /// Exit with status 2 when any source or pattern was rejected.
    #[arg(long)]
    strict: bool,
}

#[derive(Args)]
struct ResolveArgs {
    #[command(flatten)]
    cascade: CascadeArgs,

    #[arg(long, value_enum)]
    format: Option<FormatValue>,
}

#[derive(Args)]
struct CheckArgs {
    #[command(flatten)]
    cascade: CascadeArgs,

    /// Code analysis dictionary to import after resolution.
    #[arg(long = "dictionary", value_name = "PATH", action = ArgAction::Append)]
    dictionary: Vec<PathBuf>,

    #[arg(long = "word", value_name = "WORD", action = ArgAction::Append)]
    word: Vec<String>,

    #[arg(long = "file", value_name = "PATH", action = ArgAction::Append)]
    file: Vec<PathBuf>,

    #[arg(long, value_enum)]
    format: Option<FormatValue>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatValue {
    Plain,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scope_and_path() {
        let entry = parse_source("project=src/App.vsspell").expect("valid source");
        assert_eq!(entry.scope, ConfigurationScope::Project);
        assert_eq!(entry.path, PathBuf::from("src/App.vsspell"));

        let entry = parse_source("Global=/etc/Global.vsspell").expect("valid source");
        assert_eq!(entry.scope, ConfigurationScope::Global);
    }

    #[test]
    fn rejects_malformed_sources() {
        assert!(parse_source("src/App.vsspell").is_err());
        assert!(parse_source("workspace=App.vsspell").is_err());
        assert!(parse_source("file=").is_err());
    }
}
