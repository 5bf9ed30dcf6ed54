use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;

fn texmath() -> Command {
    let mut cmd = Command::cargo_bin("texmath").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn parse_formula() {
    let mut cmd = texmath();
    cmd.args(["parse", r"\frac{a}{b}"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("mfrac(mi(a) mi(b))"));
}

#[test]
fn parse_several_formulas_in_one_session() {
    let mut cmd = texmath();
    cmd.args(["parse", r"\newcommand{\half}{\frac12}", r"\half"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("mfrac(mn(1) mn(2))"));
}

#[test]
fn parse_with_packages() {
    let mut cmd = texmath();
    cmd.args(["parse", "-p", "base", r"\binom{n}{k}"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains(r"undefined control sequence \binom"));
}

#[test]
fn parse_error_is_rendered() {
    let mut cmd = texmath();
    cmd.args(["parse", r"x+\alpah"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains(r"undefined control sequence \alpah"))
        .stderr(predicate::str::contains("1:3"));
}

#[test]
fn parse_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "a+b").unwrap();
    writeln!(file).unwrap();
    writeln!(file, r"\sqrt{{x}}").unwrap();
    let mut cmd = texmath();
    cmd.arg("parse").arg("--file").arg(file.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("mi(a) mo(+) mi(b)\nmsqrt(mi(x))\n"));
}

#[test]
fn parse_with_options() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"max_expansions": 2}}"#).unwrap();
    let mut cmd = texmath();
    cmd.arg("parse")
        .arg("--options")
        .arg(file.path())
        .arg(r"\iff\iff\iff");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("maximum number of macro expansions (2) exceeded"));
}

#[test]
fn parse_without_formulas() {
    let mut cmd = texmath();
    cmd.arg("parse");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No formulas provided"));
}

#[test]
fn doc_handler() {
    let mut cmd = texmath();
    cmd.args(["doc", "frac"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("symbol map: macros"))
        .stdout(predicate::str::contains("A fraction"));
}

#[test]
fn doc_character() {
    let mut cmd = texmath();
    cmd.args(["doc", r"\alpha"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("symbol map: mathchar0mi"));
}

#[test]
fn doc_environment() {
    let mut cmd = texmath();
    cmd.args(["doc", "pmatrix"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("symbol map: environment"));
}

#[test]
fn doc_undefined() {
    let mut cmd = texmath();
    cmd.args(["doc", "nosuchcommand"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("is not defined in any package"));
}

#[test]
fn packages() {
    let mut cmd = texmath();
    cmd.arg("packages");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "macro: macros, mathchar0mi, mathchar0mo, mathchar7, delimiter",
        ))
        .stdout(predicate::str::contains("macro fallback: Undefined"));
}
