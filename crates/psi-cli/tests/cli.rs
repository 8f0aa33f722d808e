use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

fn psi() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("psi"))
}

#[test]
fn help_mentions_core_commands() {
    psi().arg("--help").assert().success().stdout(
        predicate::str::contains("parse")
            .and(predicate::str::contains("roles"))
            .and(predicate::str::contains("check")),
    );
}

#[test]
fn parse_prints_the_tree() {
    let temp = TempDir::new().unwrap();
    let file = temp.child("A.java");
    file.write_str("class A {}").unwrap();

    psi()
        .arg("parse")
        .arg(file.path())
        .assert()
        .success()
        .stdout(
            predicate::str::starts_with("JavaFile@0..10\n")
                .and(predicate::str::contains("    Identifier@6..7 \"A\"")),
        );
}

#[test]
fn parse_json_reports_errors_with_positions() {
    let temp = TempDir::new().unwrap();
    let file = temp.child("Broken.java");
    file.write_str("class A {\n  void m( {}\n}\n").unwrap();

    let output = psi().arg("parse").arg(file.path()).arg("--json").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["tree"]["kind"], "JavaFile");
    let errors = v["errors"].as_array().unwrap();
    assert!(!errors.is_empty());
    assert_eq!(errors[0]["line"].as_u64(), Some(2));
}

#[test]
fn roles_annotates_children() {
    let temp = TempDir::new().unwrap();
    let file = temp.child("A.java");
    file.write_str("class A extends B {}").unwrap();

    psi()
        .arg("roles")
        .arg(file.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Identifier@6..7 [Name] \"A\"")
                .and(predicate::str::contains("[ExtendsList]")),
        );
}

#[test]
fn check_reports_literals_and_unresolved_names() {
    let temp = TempDir::new().unwrap();
    let file = temp.child("A.java");
    file.write_str("class A {\n  int i = 2147483648;\n  void m() { i = missing; }\n}\n")
        .unwrap();

    let output = psi().arg("check").arg(file.path()).arg("--json").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["summary"]["problems"].as_u64(), Some(2));
    let diagnostics = v["diagnostics"].as_array().unwrap();
    assert_eq!(diagnostics[0]["kind"], "literal_error");
    assert_eq!(diagnostics[0]["line"].as_u64(), Some(2));
    assert_eq!(diagnostics[1]["kind"], "unresolved_reference");
    assert_eq!(diagnostics[1]["line"].as_u64(), Some(3));
    assert_eq!(diagnostics[1]["column"].as_u64(), Some(18));
}

#[test]
fn clean_file_checks_clean() {
    let temp = TempDir::new().unwrap();
    let file = temp.child("Main.java");
    file.write_str(
        r#"public class Main {
  public static void main(String[] args) {
    System.out.println("hello");
  }
}
"#,
    )
    .unwrap();

    psi()
        .arg("check")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("summary: 0 problems"));
}

#[test]
fn config_file_is_validated() {
    let temp = TempDir::new().unwrap();
    let file = temp.child("A.java");
    file.write_str("class A {}").unwrap();
    let config = temp.child("psi.toml");
    config.write_str("[logging]\nlevl = \"debug\"\n").unwrap();

    psi()
        .arg("--config")
        .arg(config.path())
        .arg("parse")
        .arg(file.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to parse toml config"));
}

#[test]
fn missing_file_is_an_error() {
    psi()
        .arg("check")
        .arg("does/not/exist.java")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to read"));
}
