//! Integration tests for the lyrical CLI
//!
//! External tools are replaced by small `sh` scripts so the full extraction
//! path (subprocesses, sidecars, side file, XML) runs end to end.

#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

use lyrical_rs::features::tool::ToolCommand;
use lyrical_rs::io::sidecar::SidecarSpec;
use lyrical_rs::LyricalConfig;

const READABILITY_REPORT: &str = "a b c 4,5 d e f g 60,5 h 3 i ? j k l m 12,3 n o p q 8,0";

/// Test helper to get the CLI binary
fn lyrical_cmd() -> Command {
    Command::cargo_bin("lyrical").unwrap()
}

fn sh(name: &str, script: &str) -> ToolCommand {
    ToolCommand::new(name, "sh").with_args(["-c", script])
}

/// A workspace with a lyrics directory, one sidecar and stand-in tools
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("lyrics")).unwrap();
        Self { dir }
    }

    fn lyrics(&self) -> PathBuf {
        self.dir.path().join("lyrics")
    }

    fn side_file(&self) -> PathBuf {
        self.dir.path().join("bigram_frequencies.dat")
    }

    fn add_song(&self, name: &str, text: &str) {
        fs::write(self.lyrics().join(name), text).unwrap();
    }

    fn add_sidecar(&self, name: &str, rows: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, rows).unwrap();
        path
    }

    fn config(&self, sidecars: Vec<SidecarSpec>) -> LyricalConfig {
        let mut config = LyricalConfig::default();
        config.tools.readability = sh("readability", &format!("echo '{READABILITY_REPORT}'"));
        config.tools.spelling = sh("spelling", "tr ' ' '\\n' | grep -x -e teh -e wrld || true");
        config.tools.tagger = sh(
            "tagger",
            "set -f; for w in $(cat \"$0\"); do printf '%s_NN ' \"$w\"; done",
        );
        config.sidecars = sidecars;
        config.input.sort_entries = true;
        config.output.bigram_side_file = self.side_file();
        config
    }

    fn write_config(&self, config: &LyricalConfig) -> PathBuf {
        let path = self.dir.path().join("lyrical.yml");
        fs::write(&path, config.to_yaml_string().unwrap()).unwrap();
        path
    }

    fn extract(&self, config: &Path) -> assert_cmd::assert::Assert {
        lyrical_cmd()
            .arg("extract")
            .arg("--config")
            .arg(config)
            .arg(self.lyrics())
            .assert()
    }
}

fn stdout_of(assert: &assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

#[test]
fn test_cli_help() {
    lyrical_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ACE XML"))
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("definitions"));
}

#[test]
fn test_cli_version() {
    lyrical_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_extract_writes_feature_vector_file() {
    let fixture = Fixture::new();
    fixture.add_song("alpha.txt", "Hello teh wrld. Hello again! Bye bye now?");
    fixture.add_song("beta.txt", "The cat and the dog.");
    fixture.add_song(".DS_Store", "binary junk");
    let topics = fixture.add_sidecar("topics10.dat", "0.25,0.75\n0.5,0.5\n");

    let config = fixture.write_config(
        &fixture.config(vec![SidecarSpec::new("Topic membership probabilities (10 topics)", topics)]),
    );
    let assert = fixture.extract(&config).success();
    let xml = stdout_of(&assert);

    assert!(xml.starts_with("<?xml version=\"1.0\"?>\n<!DOCTYPE feature_vector_file ["));
    assert!(xml.contains("<comments>Features extracted for SLAC</comments>"));
    assert_eq!(xml.matches("<data_set>").count(), 2);
    assert!(!xml.contains("DS_Store"));

    let alpha = xml.find("<data_set_id>alpha</data_set_id>").unwrap();
    let beta = xml.find("<data_set_id>beta</data_set_id>").unwrap();
    assert!(alpha < beta);

    // Readability report fields after decimal-comma conversion
    assert!(xml.contains("<name>Flesch-Kincaid grade level</name>\n         <v>4.5</v>"));
    assert!(xml.contains("<name>Sentence count</name>\n         <v>3</v>"));
    assert!(xml.contains("<name>Average sentence length</name>\n         <v>8</v>"));

    // Two of eight tokens in alpha are reported as misspelled
    assert!(xml.contains("<name>Rate of misspelling</name>\n         <v>0.25</v>"));

    // Sidecar rows follow every computed feature, one row per document
    let richness = xml.find("<name>Part-of-speech frequencies</name>").unwrap();
    let topics = xml.find("<name>Topic membership probabilities (10 topics)</name>").unwrap();
    assert!(richness < topics);
    assert!(xml.contains("<v>0.25</v>\n         <v>0.75</v>"));
    assert!(xml.trim_end().ends_with("</feature_vector_file>"));

    let side = fs::read_to_string(fixture.side_file()).unwrap();
    let lines: Vec<_> = side.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|line| line.split(',').count() == 729));
}

#[test]
fn test_extract_is_deterministic() {
    let fixture = Fixture::new();
    fixture.add_song("one.txt", "Round and round we go");
    fixture.add_song("two.txt", "Never gonna give you up");
    let config = fixture.write_config(&fixture.config(Vec::new()));

    let first = stdout_of(&fixture.extract(&config).success());
    let second = stdout_of(&fixture.extract(&config).success());
    assert_eq!(first, second);

    // The side file is appended to, never truncated
    let side = fs::read_to_string(fixture.side_file()).unwrap();
    let lines: Vec<&str> = side.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0..2], lines[2..4]);
    assert_ne!(lines[0], lines[1]);
}

#[test]
fn test_empty_document_skips_tools() {
    let fixture = Fixture::new();
    fixture.add_song("silence.txt", "");

    let mut config = fixture.config(Vec::new());
    config.tools.readability = sh("readability", "exit 7");
    config.tools.spelling = sh("spelling", "exit 7");
    config.tools.tagger = sh("tagger", "exit 7");
    let config = fixture.write_config(&config);

    let xml = stdout_of(&fixture.extract(&config).success());
    assert!(xml.contains("<name>Word count</name>\n         <v>0</v>"));
    assert!(xml.contains("<name>Vocabulary richness</name>\n         <v>0</v>"));
    assert!(xml.contains("<name>Rate of misspelling</name>\n         <v>0</v>"));
    assert!(!xml.contains("NaN"));
}

#[test]
fn test_short_sidecar_fails() {
    let fixture = Fixture::new();
    fixture.add_song("one.txt", "first song");
    fixture.add_song("two.txt", "second song");
    let topics = fixture.add_sidecar("topics24.dat", "1,0\n");

    let config = fixture.write_config(&fixture.config(vec![SidecarSpec::new("Topics", topics)]));
    fixture
        .extract(&config)
        .failure()
        .stderr(predicate::str::contains("Alignment error"))
        .stderr(predicate::str::contains("Topics"));
}

#[test]
fn test_long_sidecar_fails() {
    let fixture = Fixture::new();
    fixture.add_song("one.txt", "only song");
    let topics = fixture.add_sidecar("topics24.dat", "1,0\n0,1\n");

    let config = fixture.write_config(&fixture.config(vec![SidecarSpec::new("Topics", topics)]));
    fixture
        .extract(&config)
        .failure()
        .stderr(predicate::str::contains("more rows"));
}

#[test]
fn test_failing_tool_aborts_run() {
    let fixture = Fixture::new();
    fixture.add_song("one.txt", "some words here");

    let mut config = fixture.config(Vec::new());
    config.tools.spelling = sh("spelling", "echo dictionary missing >&2; exit 3");
    let config = fixture.write_config(&config);

    fixture
        .extract(&config)
        .failure()
        .stderr(predicate::str::contains("External tool 'spelling' failed"));
}

#[test]
fn test_extract_missing_directory() {
    let fixture = Fixture::new();
    let config = fixture.write_config(&fixture.config(Vec::new()));

    lyrical_cmd()
        .arg("extract")
        .arg("--config")
        .arg(&config)
        .arg(fixture.dir.path().join("nowhere"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn test_extract_to_output_file() {
    let fixture = Fixture::new();
    fixture.add_song("one.txt", "la la la");
    let config = fixture.write_config(&fixture.config(Vec::new()));
    let out = fixture.dir.path().join("features.xml");

    lyrical_cmd()
        .arg("extract")
        .arg("--config")
        .arg(&config)
        .arg("--out")
        .arg(&out)
        .arg(fixture.lyrics())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let xml = fs::read_to_string(&out).unwrap();
    assert!(xml.contains("<data_set_id>one</data_set_id>"));
}

#[test]
fn test_definitions_command() {
    let fixture = Fixture::new();
    let topics = fixture.add_sidecar("topics10.dat", "0.1,0.2,0.7\n");
    let config = fixture.write_config(&fixture.config(vec![SidecarSpec::new("Topics", topics)]));
    let out = fixture.dir.path().join("feature_key.xml");

    lyrical_cmd()
        .arg("definitions")
        .arg("--config")
        .arg(&config)
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let xml = fs::read_to_string(&out).unwrap();
    assert!(xml.contains("<!DOCTYPE feature_key_file ["));
    assert!(xml.contains("<name>Letter frequencies</name>"));
    assert!(xml.contains("<parallel_dimensions>26</parallel_dimensions>"));
    assert!(xml.contains("<parallel_dimensions>3</parallel_dimensions>"));
    assert_eq!(xml.matches("<feature>").count(), 15);
}

#[test]
fn test_list_features_json() {
    let fixture = Fixture::new();
    let config = fixture.write_config(&fixture.config(Vec::new()));

    let assert = lyrical_cmd()
        .arg("list-features")
        .arg("--config")
        .arg(&config)
        .arg("--json")
        .assert()
        .success();

    let definitions: serde_json::Value =
        serde_json::from_str(&stdout_of(&assert)).unwrap();
    let names: Vec<&str> = definitions
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();

    assert_eq!(names[0], "Word count");
    assert_eq!(names[1], "Function word frequencies");
    assert_eq!(names.last(), Some(&"Part-of-speech frequencies"));
}

#[test]
fn test_list_features_table() {
    let fixture = Fixture::new();
    let config = fixture.write_config(&fixture.config(Vec::new()));

    lyrical_cmd()
        .arg("list-features")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Punctuation frequencies"))
        .stdout(predicate::str::contains("32"));
}

#[test]
fn test_print_default_config() {
    lyrical_cmd()
        .arg("print-default-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("aspell"))
        .stdout(predicate::str::contains("topics24.dat"))
        .stdout(predicate::str::contains("bigram_frequencies.dat"));
}

#[test]
fn test_validate_config_valid() {
    let fixture = Fixture::new();
    let config = fixture.write_config(&fixture.config(Vec::new()));

    lyrical_cmd()
        .arg("validate-config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file is valid"));
}

#[test]
fn test_validate_config_invalid() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("bad.yml");
    fs::write(
        &config,
        "sidecars:\n  - name: Topics\n    path: a.dat\n  - name: Topics\n    path: b.dat\n",
    )
    .unwrap();

    lyrical_cmd()
        .arg("validate-config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("used twice"));
}
