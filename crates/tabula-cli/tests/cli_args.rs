use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("tabula").unwrap()
}

fn existing_file() -> tempfile::NamedTempFile {
    tempfile::Builder::new().suffix(".pdf").tempfile().unwrap()
}

#[test]
fn help_flag_prints_usage() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--area"))
        .stdout(predicate::str::contains("--columns"))
        .stdout(predicate::str::contains("--lattice"))
        .stdout(predicate::str::contains("--stream"));
}

#[test]
fn short_help_flag() {
    cmd().arg("-h").assert().success().stdout(predicate::str::contains("--batch"));
}

#[test]
fn version_flag_prints_version() {
    cmd()
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_flag_exits_one() {
    cmd().arg("--bogus").assert().code(1);
}

#[test]
fn no_input_is_an_error() {
    cmd()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Need exactly one filename"));
}

#[test]
fn two_inputs_are_an_error() {
    let a = existing_file();
    let b = existing_file();
    cmd()
        .arg(a.path())
        .arg(b.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Need exactly one filename"));
}

#[test]
fn file_with_batch_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = existing_file();
    cmd()
        .arg("-b")
        .arg(dir.path())
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Filename specified with batch"));
}

#[test]
fn missing_file_is_an_error() {
    cmd()
        .arg("does-not-exist.pdf")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("File does not exist"));
}

#[test]
fn batch_target_must_be_a_directory() {
    let file = existing_file();
    cmd()
        .arg("-b")
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is not a directory"));
}

#[test]
fn area_needs_four_numbers() {
    let file = existing_file();
    for area in ["1,2,3", "%1,2,3,4,5"] {
        cmd()
            .args(["-a", area])
            .arg(file.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains(
                "area parameters must be top,left,bottom,right",
            ));
    }
}

#[test]
fn bad_number_names_the_list() {
    let file = existing_file();
    cmd()
        .args(["-c", "1.0,abc,3.8"])
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid number format in: 1.0,abc,3.8"));
}

#[test]
fn unknown_format_lists_available() {
    let file = existing_file();
    cmd()
        .args(["-f", "csv"])
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "format csv is illegal. Available formats: CSV,TSV,JSON",
        ));
}

#[test]
fn bad_page_selector() {
    let file = existing_file();
    cmd()
        .args(["-p", "3-1"])
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("page range"));
}
