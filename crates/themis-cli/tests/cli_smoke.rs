use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn themis(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("themis").unwrap();
    cmd.current_dir(dir).env_remove("THEMIS_LOG");
    cmd
}

fn write_wea_inputs(dir: &Path) {
    fs::write(
        dir.join("questions.csv"),
        "Question\nWhat is 2+2?\nCapital of France?\n",
    )
    .unwrap();
    fs::write(
        dir.join("log.csv"),
        "QuestionText,TopAnswerText,TopAnswerConfidence,UserExperience\n\
         What is 2+2?,5,0.2,Failure\n\
         What is 2+2?,4,0.9,Success\n\
         Capital of France?,Paris,0.7,Success\n",
    )
    .unwrap();
}

fn write_evaluation_inputs(dir: &Path) {
    fs::write(dir.join("test_set.csv"), "Question,Frequency\nQ1,3\nQ2,1\nQ3,5\n").unwrap();
    fs::write(
        dir.join("judgments.csv"),
        "Question,Answer,Judgment\nQ1,A1,80\nQ2,B,30\nQ3,C,60\n",
    )
    .unwrap();
    fs::write(
        dir.join("answers.csv"),
        "Question,Answer,Confidence,Answer Id\nQ1,A1,0.9,\nQ2,B,0.4,\nQ3,C,0.1,\n",
    )
    .unwrap();
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    themis(dir.path())
        .arg("version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_qa_wea_resumes_from_output() {
    let dir = TempDir::new().unwrap();
    write_wea_inputs(dir.path());

    themis(dir.path())
        .args([
            "qa",
            "wea",
            "questions.csv",
            "answers.csv",
            "log.csv",
            "--checkpoint-frequency",
            "1",
        ])
        .assert()
        .success()
        .stderr(contains("2 answered"));

    let text = fs::read_to_string(dir.path().join("answers.csv")).unwrap();
    assert_eq!(
        text,
        "Question,Answer,Confidence,Answer Id\nWhat is 2+2?,4,0.9,\nCapital of France?,Paris,0.7,\n"
    );

    themis(dir.path())
        .args(["qa", "wea", "questions.csv", "answers.csv", "log.csv", "--format", "json"])
        .assert()
        .success()
        .stdout(contains("\"skipped\": 2"))
        .stdout(contains("\"answered\": 0"))
        .stderr(contains("Recovered 2 items from disk"));
    assert_eq!(
        fs::read_to_string(dir.path().join("answers.csv")).unwrap(),
        text
    );
}

#[test]
fn test_corrupt_checkpoint_exit_code() {
    let dir = TempDir::new().unwrap();
    write_wea_inputs(dir.path());
    fs::write(dir.path().join("answers.csv"), "Wrong,Header\nx,y\n").unwrap();

    themis(dir.path())
        .args(["qa", "wea", "questions.csv", "answers.csv", "log.csv"])
        .assert()
        .code(3)
        .stderr(contains("cannot recover data"));
}

#[test]
fn test_missing_column_exit_code() {
    let dir = TempDir::new().unwrap();
    write_wea_inputs(dir.path());
    fs::write(dir.path().join("questions.csv"), "Text\nfoo\n").unwrap();

    themis(dir.path())
        .args(["qa", "wea", "questions.csv", "answers.csv", "log.csv"])
        .assert()
        .code(2)
        .stderr(contains("'Question'"));
}

#[test]
fn test_judge_interpret_applies_threshold() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("judgments.csv"),
        "Question,Answer,Judgment\nQ1,A1,80\nQ1,A2,30\n",
    )
    .unwrap();

    themis(dir.path())
        .args(["judge", "interpret", "judgments.csv", "--output", "out.csv"])
        .assert()
        .success();
    let out = fs::read_to_string(dir.path().join("out.csv")).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Question,Answer,Judgment,In Purview,Correct");
    assert!(lines[1].starts_with("Q1,A1,") && lines[1].ends_with("true"));
    assert!(lines[2].starts_with("Q1,A2,") && lines[2].ends_with("false"));

    themis(dir.path())
        .args(["judge", "interpret", "judgments.csv", "--judgment-threshold", "90"])
        .assert()
        .success()
        .stdout(contains("true").not());
}

#[test]
fn test_judge_pairs_skips_judged() {
    let dir = TempDir::new().unwrap();
    write_evaluation_inputs(dir.path());
    fs::write(
        dir.path().join("other.csv"),
        "Question,Answer,Confidence\nQ1,A9,0.3\nQ2,,0\n",
    )
    .unwrap();

    themis(dir.path())
        .args([
            "judge",
            "pairs",
            "answers.csv",
            "other.csv",
            "--judgments",
            "judgments.csv",
        ])
        .assert()
        .success()
        .stdout("Question,Answer\nQ1,A9\n");
}

#[test]
fn test_roc_curve_to_stdout() {
    let dir = TempDir::new().unwrap();
    write_evaluation_inputs(dir.path());

    themis(dir.path())
        .args(["curves", "roc", "test_set.csv", "judgments.csv", "answers.csv"])
        .assert()
        .success()
        .stdout(contains("Threshold,False Positive Rate,True Positive Rate\n"))
        .stdout(contains("0.9,0,0.5\n"));
}

#[test]
fn test_collate_sorts_by_confidence() {
    let dir = TempDir::new().unwrap();
    write_evaluation_inputs(dir.path());

    themis(dir.path())
        .args([
            "collate",
            "test_set.csv",
            "judgments.csv",
            "answers.csv",
            "--output",
            "collated.csv",
        ])
        .assert()
        .success()
        .stderr(contains("3 answers: 3 judged"));

    let out = fs::read_to_string(dir.path().join("collated.csv")).unwrap();
    let questions: Vec<&str> = out
        .lines()
        .skip(1)
        .map(|l| l.split(',').next().unwrap())
        .collect();
    assert_eq!(questions, vec!["Q3", "Q2", "Q1"]);
}

#[test]
fn test_unknown_join_mode_is_config_error() {
    let dir = TempDir::new().unwrap();
    write_evaluation_inputs(dir.path());

    themis(dir.path())
        .args([
            "collate",
            "test_set.csv",
            "judgments.csv",
            "answers.csv",
            "--join",
            "outer",
        ])
        .assert()
        .code(2)
        .stderr(contains("unknown join mode"));
}

#[test]
fn test_test_set_sample_is_seeded() {
    let dir = TempDir::new().unwrap();
    write_wea_inputs(dir.path());

    let run = || {
        themis(dir.path())
            .args(["test-set", "log.csv", "--n", "1", "--seed", "11"])
            .output()
            .unwrap()
    };
    let first = run();
    assert!(first.status.success());
    assert_eq!(first.stdout, run().stdout);
    assert_eq!(String::from_utf8_lossy(&first.stdout).lines().count(), 2);
}

#[test]
fn test_strict_config_rejects_unknown_keys() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("themis.yaml"), "checkpoint_frequncy: 3\n").unwrap();

    themis(dir.path())
        .args(["--strict-config", "version"])
        .assert()
        .code(2)
        .stderr(contains("checkpoint_frequncy"));
}

#[test]
fn test_augment_usage_log_with_judgments() {
    let dir = TempDir::new().unwrap();
    write_wea_inputs(dir.path());
    fs::write(
        dir.path().join("judgments.csv"),
        "Question,Answer,Judgment\nWhat is 2+2?,4,90\nWhat is 2+2?,5,10\n",
    )
    .unwrap();

    themis(dir.path())
        .args(["augment", "log.csv", "judgments.csv", "--output", "augmented.csv"])
        .assert()
        .success();

    let text = fs::read_to_string(dir.path().join("augmented.csv")).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Question,Answer,Confidence,UserExperience,Judgment,In Purview,Correct"
    );
    assert_eq!(lines.next().unwrap(), "What is 2+2?,5,0.2,Failure,10.0,,false");
    assert_eq!(lines.next().unwrap(), "What is 2+2?,4,0.9,Success,90.0,,true");
    assert_eq!(lines.next().unwrap(), "Capital of France?,Paris,0.7,Success,,,false");
    assert!(lines.next().is_none());
}

#[test]
fn test_unknown_log_format_is_config_error() {
    let dir = TempDir::new().unwrap();

    themis(dir.path())
        .args(["--log-format", "xml", "version"])
        .assert()
        .code(2)
        .stderr(contains("unknown log format"));
}

#[test]
fn test_invalid_log_filter_is_config_error() {
    let dir = TempDir::new().unwrap();

    themis(dir.path())
        .args(["--log", "==bad", "version"])
        .assert()
        .code(2)
        .stderr(contains("invalid log filter"));
}
