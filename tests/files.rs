use std::{fs, path::Path};

use pile::{
    interpreter::{evaluator::core::Interpreter, output::CaptureOutputter, value::core::Value},
    run_file,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, text: &str) {
    fs::write(dir.join(name), text).unwrap();
}

/// Writes `Pilefile` into `dir` and runs it.
fn run_pilefile(dir: &Path, text: &str) -> (bool, CaptureOutputter, Interpreter) {
    write(dir, "Pilefile", text);
    let capture = CaptureOutputter::default();
    let mut interpreter = Interpreter::new().with_outputter(capture.clone());
    let ok = interpreter.read_file(dir.join("Pilefile"));
    (ok, capture, interpreter)
}

#[test]
fn include_runs_files_relative_to_the_script() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "common.eve", "string CFLAGS = \"-O2\"\nstring[] SOURCES = [\"main.c\"]");

    let (ok, capture, interpreter) = run_pilefile(dir.path(), "bool found = include(\"common.eve\")
println(found)
println(CFLAGS)");
    assert!(ok, "{:?}", capture.errors());
    assert_eq!(capture.output(), "true\n-O2\n");
    assert_eq!(interpreter.global("SOURCES").map(|v| v.to_string()), Some("[main.c]".to_string()));
}

#[test]
fn errors_in_included_files_name_that_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "bad.eve", "int x\nx = nope");

    let (ok, capture, interpreter) = run_pilefile(dir.path(), "bool ok = include(\"bad.eve\")\nprintln(ok)");
    assert!(ok);
    assert_eq!(capture.output(), "false\n");
    assert_eq!(interpreter.error_count(), 1);

    let bad = dir.path().join("bad.eve");
    assert_eq!(capture.errors(), [format!("{}:2: 'nope' is not declared", bad.display())]);
}

#[test]
fn missing_includes_are_reported() {
    let dir = TempDir::new().unwrap();
    let (ok, capture, _) = run_pilefile(dir.path(), "include(\"nope.eve\")");
    assert!(!ok);

    let errors = capture.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains(":1: nope.eve: "), "{errors:?}");
}

#[test]
fn include_depth_is_bounded() {
    let dir = TempDir::new().unwrap();
    let (ok, capture, interpreter) = run_pilefile(dir.path(), "include(\"Pilefile\")");

    assert!(ok);
    assert_eq!(interpreter.error_count(), 1);
    assert!(capture.errors()[0].ends_with("maximum include depth of 16 exceeded"));
}

#[test]
fn unreadable_files_are_reported() {
    let dir = TempDir::new().unwrap();
    let (ok, captured, _) = run_file(dir.path().join("missing"));

    assert!(!ok);
    assert_eq!(captured.errors.len(), 1);
    assert!(captured.errors[0].starts_with(&format!("{}:0: ", dir.path().join("missing").display())));
}

#[test]
fn ls_matches_wildcards() {
    let dir = TempDir::new().unwrap();
    for name in ["b.c", "a.c", "x.h"] {
        write(dir.path(), name, "");
    }
    fs::create_dir(dir.path().join("src")).unwrap();
    write(&dir.path().join("src"), "main.c", "");

    let (ok, capture, _) = run_pilefile(dir.path(), "println(ls(\"*.c\"))
println(ls(\"?.h\"))
println(ls(\"src/*.c\"))
println(ls(\"missing/*\").size())");
    assert!(ok, "{:?}", capture.errors());
    assert_eq!(capture.output(), "[a.c, b.c]\n[x.h]\n[src/main.c]\n0\n");
}

#[test]
fn directory_builtins() {
    let dir = TempDir::new().unwrap();
    let (ok, capture, _) = run_pilefile(dir.path(), "println(mkdir(\"out\"))
println(mkdir(\"out\"))
println(mkpath(\"out/a/b\"))
println(mkfile(\"out/a/b/f.txt\"))
println(delete(\"out/a\"))
println(delete(\"out/a\"))");
    assert!(ok, "{:?}", capture.errors());
    assert_eq!(capture.output(), "true\nfalse\ntrue\ntrue\ntrue\nfalse\n");
    assert!(dir.path().join("out").is_dir());
    assert!(!dir.path().join("out/a").exists());
}

#[test]
fn copy_and_move() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", "hello");

    let (ok, capture, _) = run_pilefile(dir.path(), "println(copy(\"a.txt\", \"b.txt\"))
println(move(\"b.txt\", \"c.txt\"))
println(copy(\"missing\", \"d.txt\"))");
    assert!(ok, "{:?}", capture.errors());
    assert_eq!(capture.output(), "true\ntrue\nfalse\n");
    assert_eq!(fs::read_to_string(dir.path().join("c.txt")).unwrap(), "hello");
    assert!(!dir.path().join("b.txt").exists());
}

#[test]
fn mod_time_of_existing_and_missing_files() {
    let dir = TempDir::new().unwrap();
    let (ok, capture, interpreter) = run_pilefile(dir.path(), "int t = mod_time(\"Pilefile\")\nprintln(t > 0)");
    assert!(ok, "{:?}", capture.errors());
    assert_eq!(capture.output(), "true\n");
    assert!(matches!(interpreter.global("t"), Some(Value::Int(t)) if t > 0));

    let (ok, capture, _) = run_pilefile(dir.path(), "int t = mod_time(\"missing\")");
    assert!(!ok);
    assert_eq!(capture.errors().len(), 1);
}

#[cfg(unix)]
#[test]
fn chmod_sets_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    write(dir.path(), "run.sh", "");

    let (ok, capture, _) = run_pilefile(dir.path(), "println(chmod(\"run.sh\", 493))\nprintln(chmod(\"run.sh\", -1))");
    assert!(ok, "{:?}", capture.errors());
    assert_eq!(capture.output(), "true\nfalse\n");

    let mode = fs::metadata(dir.path().join("run.sh")).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[test]
fn file_builtins_want_text_arguments() {
    let dir = TempDir::new().unwrap();
    let (ok, _, _) = run_pilefile(dir.path(), "mkdir(1)");
    assert!(!ok);
}
