//! End-to-end tests driving the `coderbot` binary.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use coderbot::models::{ArtifactKind, RunSummary};
use predicates::prelude::*;
use speculate2::speculate;

fn coderbot(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("coderbot").expect("Binary not built");
    cmd.current_dir(workdir)
        .env("CODERBOT_DELAY_MS", "0")
        .env_remove("CODERBOT_EXTENSIONS")
        .env_remove("RUST_LOG");
    cmd
}

speculate! {
    before {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let root = dir.path();
    }

    describe "generate" {
        it "writes every requested artifact and prints the summary" {
            std::fs::write(root.join("story.txt"), "Login feature needed").expect("write failed");

            coderbot(root)
                .args(["generate", "story.txt", "out/x", "--code-gen", "--unit-test", "--docs"])
                .assert()
                .success()
                .stdout(predicate::str::contains("Processing file: story.txt"))
                .stdout(predicate::str::contains(
                    "Selected options: Code Gen: true, Unit Tests: true, Docs: true",
                ))
                .stdout(predicate::str::contains("Generation complete!"))
                .stdout(predicate::str::contains("- Generated code: out/x_code.py"))
                .stdout(predicate::str::contains("- Generated tests: out/x_tests.py"))
                .stdout(predicate::str::contains("- Generated documentation: out/x_docs.md"));

            let code = std::fs::read_to_string(root.join("out/x_code.py")).expect("Code missing");
            assert!(code.contains("# Login feature needed...\n"));
            assert!(root.join("out/x_tests.py").is_file());
            assert!(root.join("out/x_docs.md").is_file());
        }

        it "only writes the kinds that were asked for" {
            std::fs::write(root.join("story.txt"), "story").expect("write failed");

            coderbot(root)
                .args(["generate", "story.txt", "only", "--docs"])
                .assert()
                .success();

            assert!(root.join("only_docs.md").is_file());
            assert!(!root.join("only_code.py").exists());
            assert!(!root.join("only_tests.py").exists());
        }

        it "emits a JSON summary on request" {
            std::fs::write(root.join("story.txt"), "story").expect("write failed");

            let output = coderbot(root)
                .args(["generate", "story.txt", "j", "--unit-test", "--json"])
                .output()
                .expect("Failed to run coderbot");

            assert!(output.status.success());
            let summary: RunSummary =
                serde_json::from_slice(&output.stdout).expect("stdout is not a JSON summary");
            assert_eq!(summary.kinds(), vec![ArtifactKind::UnitTest]);
            assert_eq!(summary.path_of(ArtifactKind::UnitTest), Some(&PathBuf::from("j_tests.py")));
        }

        it "exits with 1 when the input file is missing" {
            coderbot(root)
                .args(["generate", "missing.txt", "out/x", "--code-gen"])
                .assert()
                .code(1)
                .stdout(predicate::str::contains("Error: Input not found: missing.txt"))
                .stdout(predicate::str::contains("Processing file:").not());

            assert!(!root.join("out").exists());
        }
    }

    describe "analyze" {
        it "lists discovered files and skips code generation" {
            let src = root.join("src");
            std::fs::create_dir_all(&src).expect("mkdir failed");
            for i in 0..12 {
                std::fs::write(src.join(format!("m{i:02}.py")), "").expect("write failed");
            }

            coderbot(root)
                .args(["analyze", "src", "out/y", "--unit-test"])
                .assert()
                .success()
                .stdout(predicate::str::contains("Found 12 source files"))
                .stdout(predicate::str::contains("- Generated tests: out/y_tests.py"));

            let tests = std::fs::read_to_string(root.join("out/y_tests.py")).expect("Tests missing");
            assert_eq!(tests.lines().filter(|l| l.starts_with("# - m")).count(), 10);
            assert!(tests.contains("# - ... and 2 more files\n"));
            assert!(!root.join("out/y_code.py").exists());
            assert!(!root.join("out/y_docs.md").exists());
        }

        it "names the output after the current time when no prefix is given" {
            std::fs::create_dir_all(root.join("src")).expect("mkdir failed");
            std::fs::write(root.join("src/app.js"), "").expect("write failed");

            coderbot(root)
                .args(["analyze", "src", "--out-dir", "reports", "--docs"])
                .assert()
                .success()
                .stdout(predicate::str::contains("reports/coder_output_"));

            let produced: Vec<_> = std::fs::read_dir(root.join("reports"))
                .expect("reports missing")
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect();
            assert_eq!(produced.len(), 1);
            assert!(produced[0].starts_with("coder_output_"));
            assert!(produced[0].ends_with("_docs.md"));
        }

        it "exits with 1 and writes nothing when no files match" {
            std::fs::create_dir_all(root.join("src")).expect("mkdir failed");
            std::fs::write(root.join("src/readme.md"), "").expect("write failed");

            coderbot(root)
                .args(["analyze", "src", "out/y", "--unit-test", "--docs"])
                .assert()
                .code(1)
                .stdout(predicate::str::contains("Error: No files with extensions [py, js, ts]"));

            assert!(!root.join("out").exists());
        }

        it "honours extensions from the environment" {
            std::fs::create_dir_all(root.join("src")).expect("mkdir failed");
            std::fs::write(root.join("src/lib.rs"), "").expect("write failed");

            coderbot(root)
                .env("CODERBOT_EXTENSIONS", "rs")
                .args(["analyze", "src", "rust", "--docs"])
                .assert()
                .success();

            let docs = std::fs::read_to_string(root.join("rust_docs.md")).expect("Docs missing");
            assert!(docs.contains("- lib.rs\n"));
        }

        it "rejects the code generation flag" {
            std::fs::create_dir_all(root.join("src")).expect("mkdir failed");

            coderbot(root)
                .args(["analyze", "src", "out/y", "--code-gen"])
                .assert()
                .code(1);
        }
    }

    describe "stories" {
        it "writes the story document and reports progress" {
            coderbot(root)
                .args(["stories", "Checkout revamp", "stories/epic.txt"])
                .assert()
                .success()
                .stdout(predicate::str::contains("Generating stories for epic: Checkout revamp"))
                .stdout(predicate::str::contains("Step 3/3 completed"))
                .stdout(predicate::str::contains("Stories saved to: stories/epic.txt"));

            let doc = std::fs::read_to_string(root.join("stories/epic.txt")).expect("Stories missing");
            assert!(doc.contains("## Epic: Checkout revamp"));
            assert!(doc.contains("### Story 3: Reporting"));
        }
    }

    describe "config" {
        it "exits with 1 on a malformed config file" {
            std::fs::write(root.join("bad.json"), "{oops").expect("write failed");
            std::fs::write(root.join("story.txt"), "story").expect("write failed");

            coderbot(root)
                .args(["--config", "bad.json", "generate", "story.txt", "x", "--docs"])
                .assert()
                .code(1)
                .stdout(predicate::str::contains("Error: Invalid config bad.json"));
        }

        it "reads limits from an explicit config file" {
            std::fs::write(root.join("cfg.json"), r#"{"excerpt_chars": 5}"#).expect("write failed");
            std::fs::write(root.join("story.txt"), "abcdefghij").expect("write failed");

            coderbot(root)
                .args(["--config", "cfg.json", "generate", "story.txt", "x", "--docs"])
                .assert()
                .success();

            let docs = std::fs::read_to_string(root.join("x_docs.md")).expect("Docs missing");
            assert!(docs.contains("```\nabcde...\n```"));
        }
    }
}
