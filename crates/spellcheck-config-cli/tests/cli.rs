use assert_cmd::Command;
use predicates::prelude::*;
use spellcheck_test_support::Fixture;

fn source_arg(scope: &str, path: &std::path::Path) -> String {
    format!("{scope}={}", path.display())
}

#[test]
fn resolve_prints_plain_summary() {
    let fixture = Fixture::new();
    let global = fixture.write_settings(
        "Global.vsspell",
        "<IgnoredWords><Ignore>contoso</Ignore></IgnoredWords>",
    );

    let mut cmd = Command::cargo_bin("spellcheck-config").expect("binary");
    cmd.args(["resolve", "--source", &source_arg("global", &global)])
        .assert()
        .success()
        .stdout(predicate::str::contains("languages: en-US"))
        .stdout(predicate::str::contains("ignored words (1):"))
        .stdout(predicate::str::contains("  contoso"));
}

#[test]
fn resolve_json_includes_configuration_and_sources() {
    let fixture = Fixture::new();
    let global = fixture.write_settings(
        "Global.vsspell",
        "<SelectedLanguages><SelectedLanguage>de-DE</SelectedLanguage></SelectedLanguages>",
    );
    let project = fixture.write_settings(
        "src/App.vsspell",
        "<SelectedLanguages><SelectedLanguage /><SelectedLanguage>fr-FR</SelectedLanguage></SelectedLanguages>",
    );

    let mut cmd = Command::cargo_bin("spellcheck-config").expect("binary");
    let output = cmd
        .args([
            "resolve",
            "--format",
            "json",
            "--source",
            &source_arg("global", &global),
            "--source",
            &source_arg("project", &project),
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).expect("json output");
    assert_eq!(
        value["configuration"]["dictionary_languages"],
        serde_json::json!(["de-DE", "fr-FR"])
    );
    assert_eq!(value["loaded"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["loaded"][1]["scope"], "Project");
    assert_eq!(value["errors"], serde_json::json!([]));
}

#[test]
fn strict_mode_fails_on_rejected_sources() {
    let fixture = Fixture::new();
    let broken = fixture.write("App.vsspell", "<SpellCheckerConfiguration>");

    let mut cmd = Command::cargo_bin("spellcheck-config").expect("binary");
    cmd.args(["resolve", "--strict", "--source", &source_arg("project", &broken)])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("error"));

    let mut cmd = Command::cargo_bin("spellcheck-config").expect("binary");
    cmd.args(["resolve", "--source", &source_arg("project", &broken)])
        .assert()
        .success();
}

#[test]
fn check_reports_words_and_files() {
    let fixture = Fixture::new();
    let project = fixture.write_settings(
        "App.vsspell",
        "<IgnoredWords><Ignore>fabrikam</Ignore></IgnoredWords>\
         <IgnoredFilePatterns><Ignore>*.generated.cs</Ignore></IgnoredFilePatterns>",
    );

    let mut cmd = Command::cargo_bin("spellcheck-config").expect("binary");
    cmd.args([
        "check",
        "--source",
        &source_arg("project", &project),
        "--word",
        "Fabrikam",
        "--word",
        "northwind",
        "--file",
        "src/Model.generated.cs",
        "--file",
        "src/Model.cs",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("word Fabrikam: ignored"))
    .stdout(predicate::str::contains("word northwind: checked"))
    .stdout(predicate::str::contains("file src/Model.generated.cs: skipped"))
    .stdout(predicate::str::contains("file src/Model.cs: spell checked"));
}

#[test]
fn check_imports_dictionaries() {
    let fixture = Fixture::new();
    let project = fixture.write_settings(
        "App.vsspell",
        "<CodeAnalysisDictionaryOptions>\
           <RecognizedWordHandling>AddAllWords</RecognizedWordHandling>\
         </CodeAnalysisDictionaryOptions>",
    );
    let dictionary = fixture.write(
        "CustomDictionary.xml",
        "<Dictionary><Words><Recognized><Word>northwind</Word></Recognized></Words></Dictionary>",
    );

    let mut cmd = Command::cargo_bin("spellcheck-config").expect("binary");
    cmd.args([
        "check",
        "--format",
        "json",
        "--source",
        &source_arg("project", &project),
        "--dictionary",
    ])
    .arg(&dictionary)
    .args(["--word", "Northwind"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"recognized\": true"));
}

#[test]
fn unknown_scope_is_a_usage_error() {
    let mut cmd = Command::cargo_bin("spellcheck-config").expect("binary");
    cmd.args(["resolve", "--source", "workspace=App.vsspell"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown scope"));
}
