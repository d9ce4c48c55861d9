//! CLI integration tests for veritas commands.
//!
//! These tests focus on exit codes and basic behavioral verification,
//! not specific output formatting which may change.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

/// Three pages separated by form feeds.
const DOCUMENT: &str = "Les données personnelles sont conservées pendant cinq ans. \
Elles sont ensuite archivées.\x0c\
Le responsable du traitement procède à l'effacement des données sur demande.\x0c\
Le présent règlement entre en vigueur le premier janvier.";

/// Sentence of the first page.
const RETENTION: &str = "Les données personnelles sont conservées pendant cinq ans.";

/// Sentence of the second page.
const ERASURE: &str = "Le responsable du traitement procède à l'effacement des données sur demande.";

/// Answer with no support in the document.
const HALLUCINATION: &str = "Le prix du ticket de métro augmente chaque printemps à Lyon.";

/// Answer given when nothing in the document supports the generated text.
const REFUSAL: &str =
    "Impossible de répondre à cette question en se basant uniquement sur le document fourni.";

/// Helper to create a temp directory for tests.
fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

/// Helper to get a veritas command.
fn veritas() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("veritas").unwrap()
}

/// Helper to run `veritas` in `dir` with HOME isolated to it.
fn veritas_in(dir: &Path) -> Command {
    let mut cmd = veritas();
    cmd.env("HOME", dir).env_remove("RUST_LOG").current_dir(dir);
    cmd
}

/// Creates a temp directory holding the sample document as `doc.txt`.
fn with_document() -> tempfile::TempDir {
    let dir = temp_dir();
    fs::write(dir.path().join("doc.txt"), DOCUMENT).unwrap();
    dir
}

/// Parses a command's stdout as JSON.
fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {output:?}");
    serde_json::from_slice(&output.stdout).unwrap()
}

/// Strips ANSI escape sequences from a string.
fn strip_ansi(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            output.push(ch);
        }
    }

    output
}

mod rank {
    use super::*;

    #[test]
    fn ranks_matching_page_first() {
        let dir = with_document();

        let json = stdout_json(veritas_in(dir.path()).args([
            "rank",
            "doc.txt",
            "effacement des données",
            "--json",
        ]));

        assert_eq!(json["total_pages"], 3);
        let results = json["results"].as_array().unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0]["page"], 1);
    }

    #[test]
    fn top_k_limits_results() {
        let dir = with_document();

        let json = stdout_json(veritas_in(dir.path()).args([
            "rank",
            "doc.txt",
            "données",
            "-n",
            "1",
            "--json",
        ]));

        assert_eq!(json["results"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn unrelated_query_has_no_results() {
        let dir = with_document();

        veritas_in(dir.path())
            .args(["rank", "doc.txt", "photosynthèse"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No relevant pages."));
    }

    #[test]
    fn missing_document_fails() {
        let dir = temp_dir();

        veritas_in(dir.path())
            .args(["rank", "absent.txt", "durée"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to read document"));
    }

    #[test]
    fn zero_top_k_fails() {
        let dir = with_document();

        veritas_in(dir.path())
            .args(["rank", "doc.txt", "durée", "-n", "0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("at least 1"));
    }
}

mod sentences {
    use super::*;

    #[test]
    fn lists_sentences_per_page() {
        let dir = with_document();

        let json = stdout_json(veritas_in(dir.path()).args(["sentences", "doc.txt", "--json"]));

        let pages = json.as_array().unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0]["sentences"][0], RETENTION);
        assert_eq!(pages[0]["sentences"].as_array().unwrap().len(), 2);
        assert_eq!(pages[1]["page"], 1);
    }

    #[test]
    fn plain_output_numbers_pages() {
        let dir = with_document();

        let output = veritas_in(dir.path())
            .args(["sentences", "doc.txt"])
            .output()
            .unwrap();
        assert!(output.status.success());
        let stdout = strip_ansi(&String::from_utf8_lossy(&output.stdout));
        assert!(stdout.contains("Page 0"));
        assert!(stdout.contains("Page 2"));
        assert!(stdout.contains(ERASURE));
    }
}

mod align {
    use super::*;

    /// Writes the source sentences, one per line.
    fn write_sources(dir: &Path) {
        fs::write(
            dir.join("sources.txt"),
            format!("{RETENTION}\n\n{ERASURE}\n"),
        )
        .unwrap();
    }

    #[test]
    fn verbatim_sentence_is_verified() {
        let dir = temp_dir();
        write_sources(dir.path());

        let json = stdout_json(veritas_in(dir.path()).args([
            "align",
            "sources.txt",
            ERASURE,
            "--json",
        ]));

        assert_eq!(json[0]["source"], ERASURE);
        assert_eq!(json[0]["aligned"], true);
        assert_eq!(json[0]["similarity"], 1.0);
    }

    #[test]
    fn generated_text_from_file() {
        let dir = temp_dir();
        write_sources(dir.path());
        fs::write(dir.path().join("answer.txt"), HALLUCINATION).unwrap();

        let json = stdout_json(veritas_in(dir.path()).args([
            "align",
            "sources.txt",
            "@answer.txt",
            "--json",
        ]));

        assert_eq!(json[0]["aligned"], false);
        assert!(json[0]["source"].is_null());
    }

    #[test]
    fn invalid_threshold_fails() {
        let dir = temp_dir();
        write_sources(dir.path());

        veritas_in(dir.path())
            .args(["align", "sources.txt", ERASURE, "--threshold", "1.5"])
            .assert()
            .failure()
            .stderr(predicate::str::starts_with("error:"));
    }

    #[test]
    fn align_then_ground() {
        let dir = temp_dir();
        write_sources(dir.path());

        let output = veritas_in(dir.path())
            .args(["align", "sources.txt", RETENTION, "--json"])
            .output()
            .unwrap();
        assert!(output.status.success());
        fs::write(dir.path().join("records.json"), &output.stdout).unwrap();

        veritas_in(dir.path())
            .args(["ground", "records.json"])
            .assert()
            .success()
            .stdout(predicate::str::diff(format!("{RETENTION}\n")));
    }
}

mod ground {
    use super::*;

    #[test]
    fn no_records_is_refused() {
        let dir = temp_dir();
        fs::write(dir.path().join("records.json"), "[]").unwrap();

        let json = stdout_json(veritas_in(dir.path()).args(["ground", "records.json", "--json"]));

        assert_eq!(json["text"], REFUSAL);
        assert_eq!(json["tier"], "refused");
    }

    #[test]
    fn inconsistent_record_fails() {
        let dir = temp_dir();
        fs::write(
            dir.path().join("records.json"),
            r#"[{"generated": "Une phrase générée.", "source": null, "similarity": 0.9, "aligned": true}]"#,
        )
        .unwrap();

        veritas_in(dir.path())
            .args(["ground", "records.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid alignment records"));
    }
}

mod answer {
    use super::*;

    #[test]
    fn verbatim_answer_is_kept() {
        let dir = with_document();

        let json = stdout_json(veritas_in(dir.path()).args([
            "answer",
            "doc.txt",
            "Combien de temps les données sont-elles conservées ?",
            "--generated",
            RETENTION,
            "--json",
        ]));

        assert_eq!(json["answer"], RETENTION);
        assert_eq!(json["tier"], "verified");
        assert_eq!(json["raw_answer"], RETENTION);
        assert_eq!(json["source_pages"], serde_json::json!([0, 1, 2]));
        assert_eq!(json["source_sentences"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn hallucination_is_refused() {
        let dir = with_document();

        veritas_in(dir.path())
            .args(["answer", "doc.txt", "Combien coûte le métro ?", "-g", HALLUCINATION])
            .assert()
            .success()
            .stdout(predicate::str::contains(REFUSAL));
    }

    #[test]
    fn selection_replaces_page_sentences() {
        let dir = with_document();
        fs::write(
            dir.path().join("selection.json"),
            format!(r#"{{"selected_sentences": ["{ERASURE}"]}}"#),
        )
        .unwrap();

        let json = stdout_json(veritas_in(dir.path()).args([
            "answer",
            "doc.txt",
            "Qui efface les données ?",
            "-g",
            ERASURE,
            "--selected",
            "selection.json",
            "--json",
        ]));

        assert_eq!(json["source_sentences"], serde_json::json!([ERASURE]));
        assert_eq!(json["answer"], ERASURE);
    }

    #[test]
    fn empty_document_has_no_relevant_page() {
        let dir = temp_dir();
        fs::write(dir.path().join("empty.txt"), "\x0c  \x0c").unwrap();

        veritas_in(dir.path())
            .args(["answer", "empty.txt", "Durée ?", "-g", RETENTION])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Aucune page pertinente n'a été trouvée dans le document.",
            ));
    }

    #[test]
    fn small_top_k_narrows_pages() {
        let dir = with_document();
        fs::write(
            dir.path().join(".veritas.toml"),
            "root = true\n[ranking]\ntop_k = 1\n",
        )
        .unwrap();

        let json = stdout_json(veritas_in(dir.path()).args([
            "answer",
            "doc.txt",
            "effacement des données",
            "-g",
            ERASURE,
            "--json",
        ]));

        assert_eq!(json["source_pages"], serde_json::json!([1]));
        assert_eq!(json["source_sentences"], serde_json::json!([ERASURE]));
    }
}

mod init {
    use super::*;

    #[test]
    fn creates_config_file() {
        let dir = temp_dir();
        let project = dir.path().join("project");
        fs::create_dir(&project).unwrap();

        veritas_in(&project)
            .env("HOME", dir.path())
            .arg("init")
            .assert()
            .success()
            .stdout(predicate::str::contains("Created"));

        let contents = fs::read_to_string(project.join(".veritas.toml")).unwrap();
        assert!(contents.contains("[ranking]"));
    }

    #[test]
    fn fails_if_config_exists() {
        let dir = temp_dir();
        fs::write(dir.path().join(".veritas.toml"), "existing").unwrap();

        veritas_in(dir.path())
            .args(["init", "--global"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("use --force to overwrite"));
    }

    #[test]
    fn force_overwrites() {
        let dir = temp_dir();
        fs::write(dir.path().join(".veritas.toml"), "existing").unwrap();

        veritas_in(dir.path())
            .args(["init", "--global", "--force"])
            .assert()
            .success();

        let contents = fs::read_to_string(dir.path().join(".veritas.toml")).unwrap();
        assert_ne!(contents, "existing");
    }

    #[test]
    fn sets_language() {
        let dir = temp_dir();

        veritas_in(dir.path())
            .args(["init", "--language", "English"])
            .assert()
            .success()
            .stdout(predicate::str::contains("ranking.language = english"));

        let contents = fs::read_to_string(dir.path().join(".veritas.toml")).unwrap();
        assert!(contents.contains("language = \"english\""));

        veritas_in(dir.path())
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("language = \"english\""));
    }

    #[test]
    fn rejects_unknown_language() {
        let dir = temp_dir();

        veritas_in(dir.path())
            .args(["init", "--language", "latin"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unsupported language"));

        assert!(!dir.path().join(".veritas.toml").exists());
    }

    #[test]
    fn writes_domain_tables() {
        let dir = temp_dir();

        veritas_in(dir.path())
            .args(["init", "--domain-tables"])
            .assert()
            .success()
            .stdout(predicate::str::contains("domain tables"));

        let contents = fs::read_to_string(dir.path().join(".veritas.toml")).unwrap();
        assert!(contents.contains("inherit_defaults = false"));
        assert!(contents.contains("[domain.weights]"));

        veritas_in(dir.path()).arg("status").assert().success();
    }

    #[test]
    fn works_with_invalid_existing_config() {
        let dir = temp_dir();
        fs::write(dir.path().join(".veritas.toml"), "[ranking\n").unwrap();

        veritas_in(dir.path())
            .args(["init", "--force"])
            .assert()
            .success();
    }
}

mod config {
    use super::*;

    #[test]
    fn shows_effective_settings() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".veritas.toml"),
            "root = true\n[ranking]\ntop_k = 7\n",
        )
        .unwrap();

        veritas_in(dir.path())
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("top_k = 7"))
            .stdout(predicate::str::contains("primary_threshold"));
    }

    #[test]
    fn invalid_config_fails() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".veritas.toml"),
            "root = true\n[ranking]\nb = 2.0\n",
        )
        .unwrap();

        veritas_in(dir.path())
            .arg("config")
            .assert()
            .failure()
            .stderr(predicate::str::contains("ranking.b"));
    }
}

mod status {
    use super::*;

    #[test]
    fn clean_config_has_no_issues() {
        let dir = temp_dir();
        fs::write(dir.path().join(".veritas.toml"), "root = true\n").unwrap();

        veritas_in(dir.path())
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("No issues found."));
    }

    #[test]
    fn labels_root_project_file() {
        let dir = temp_dir();
        let project = dir.path().join("project");
        fs::create_dir(&project).unwrap();
        fs::write(project.join(".veritas.toml"), "root = true\n").unwrap();

        let output = veritas_in(&project)
            .env("HOME", dir.path())
            .arg("status")
            .output()
            .unwrap();
        let stdout = strip_ansi(&String::from_utf8_lossy(&output.stdout));
        assert!(stdout.contains("(project, root)"));
    }

    #[test]
    fn warnings_fail() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".veritas.toml"),
            "root = true\n[alignment]\nprimary_threshold = 0.2\n",
        )
        .unwrap();

        let output = veritas_in(dir.path()).arg("status").output().unwrap();
        assert!(!output.status.success());
        let stdout = strip_ansi(&String::from_utf8_lossy(&output.stdout));
        assert!(stdout.contains("Warnings (1):"));
        assert!(stdout.contains("primary_threshold"));
    }
}
