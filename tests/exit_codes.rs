use std::process::{Command, Stdio};

fn run_forge(args: &[&str]) -> i32 {
    let exe = env!("CARGO_BIN_EXE_forge");
    let status = Command::new(exe).args(args).status().expect("run forge");
    status.code().unwrap_or(1)
}

#[test]
fn missing_catalog_file_exits_one() {
    let code = run_forge(&["--menu", "this-catalog-does-not-exist.toml"]);
    assert_eq!(code, 1);
}

#[test]
fn empty_catalog_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.toml");
    std::fs::write(&path, "entries = []\n").unwrap();
    let code = run_forge(&["--menu", path.to_str().unwrap()]);
    assert_eq!(code, 1);
}

#[test]
fn terminal_acquisition_failure_exits_one_with_single_fatal_line() {
    // A valid catalog but no terminal attached: startup must fail at
    // surface acquisition with exactly one fatal message and no menu.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.toml");
    std::fs::write(&path, "[[entries]]\nlabel = \"A\"\nscript = \"a\"\n").unwrap();

    let exe = env!("CARGO_BIN_EXE_forge");
    let out = Command::new(exe)
        .args(["--menu", path.to_str().unwrap()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .expect("run forge");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(stderr.matches("could not acquire the terminal").count(), 1);
}

#[test]
fn unsupported_catalog_format_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.ini");
    std::fs::write(&path, "entries = []\n").unwrap();
    let code = run_forge(&["--menu", path.to_str().unwrap()]);
    assert_eq!(code, 1);
}
