use std::{
    cell::RefCell,
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
    rc::Rc,
    time::{Duration, SystemTime},
};

use pile::{
    interpreter::{
        evaluator::core::{Flow, Interpreter, Options},
        io::{FileSystem, matches_wildcard},
        lexer::tokenize,
        output::CaptureOutputter,
        value::core::Value,
    },
    run_source,
};
use pretty_assertions::assert_eq;

/// Files kept in memory, shared between clones.
#[derive(Debug, Default, Clone)]
struct MemoryFileSystem {
    files: Rc<RefCell<BTreeMap<PathBuf, String>>>,
}

impl MemoryFileSystem {
    fn with(self, path: &str, text: &str) -> Self {
        self.files.borrow_mut().insert(PathBuf::from(path), text.to_string());
        self
    }

    fn missing(path: &Path) -> io::Error {
        io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display()))
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.borrow().get(path).cloned().ok_or_else(|| Self::missing(path))
    }

    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>> {
        Ok(self.files
               .borrow()
               .keys()
               .filter(|path| path.parent() == Some(dir))
               .filter_map(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
               .collect())
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        let text = self.read_to_string(from)?;
        self.files.borrow_mut().insert(to.to_path_buf(), text);
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let text = self.files.borrow_mut().remove(from).ok_or_else(|| Self::missing(from))?;
        self.files.borrow_mut().insert(to.to_path_buf(), text);
        Ok(())
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        self.files.borrow_mut().remove(path).map(|_| ()).ok_or_else(|| Self::missing(path))
    }

    fn create_dir(&self, _: &Path) -> io::Result<()> {
        Ok(())
    }

    fn create_dir_all(&self, _: &Path) -> io::Result<()> {
        Ok(())
    }

    fn touch(&self, path: &Path) -> io::Result<()> {
        self.files.borrow_mut().entry(path.to_path_buf()).or_default();
        Ok(())
    }

    fn set_mode(&self, path: &Path, _: u32) -> io::Result<()> {
        self.read_to_string(path).map(|_| ())
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        self.read_to_string(path)?;
        Ok(SystemTime::UNIX_EPOCH + Duration::from_secs(1_000))
    }
}

#[test]
fn scripts_run_against_a_replaced_file_system() {
    let files = MemoryFileSystem::default().with("proj/Pilefile",
                                                 "include(\"rules.eve\")
string[] SOURCES = ls(\"*.c\")
println(SOURCES)
println(mod_time(\"main.c\"))
move(\"util.c\", \"old.c\")")
                                           .with("proj/rules.eve", "string CFLAGS = \"-Wall\"")
                                           .with("proj/main.c", "")
                                           .with("proj/util.c", "");
    let capture = CaptureOutputter::default();
    let mut interpreter = Interpreter::new().with_outputter(capture.clone())
                                            .with_file_system(files.clone());

    assert!(interpreter.read_file("proj/Pilefile"), "{:?}", capture.errors());
    assert_eq!(capture.output(), "[main.c, util.c]\n1000\n");
    assert_eq!(interpreter.global("CFLAGS"), Some(Value::from("-Wall")));
    assert!(files.files.borrow().contains_key(Path::new("proj/old.c")));
}

#[test]
fn error_format_is_configurable() {
    let capture = CaptureOutputter::default();
    let options = Options { error_format: "{message} ({file}, line {line})".to_string(),
                            ..Options::default() };
    let mut interpreter = Interpreter::new().with_options(options).with_outputter(capture.clone());

    assert!(!interpreter.read_source("build.eve", "\nnope"));
    assert_eq!(capture.errors(), ["'nope' is not declared (build.eve, line 2)"]);
    assert!(interpreter.has_errors());
    assert_eq!(interpreter.error_count(), 1);
}

#[test]
fn the_error_flag_resets_per_file_but_the_count_does_not() {
    let mut interpreter = Interpreter::new().with_outputter(CaptureOutputter::default());

    assert!(!interpreter.read_source("a.eve", "nope"));
    assert!(interpreter.read_source("b.eve", "int fine"));
    assert!(!interpreter.has_errors());
    assert_eq!(interpreter.error_count(), 1);
}

#[test]
fn globals_survive_errors() {
    let (ok, _, interpreter) = run_source("test.eve", "int before = 1\nnope\nint after = 2");
    assert!(!ok);
    assert_eq!(interpreter.global("before"), Some(Value::Int(1)));
    assert_eq!(interpreter.global("after"), Some(Value::Int(2)));
    assert_eq!(interpreter.global("nope"), None);
}

#[test]
fn predefined_globals_are_visible_to_scripts() {
    let capture = CaptureOutputter::default();
    let mut interpreter = Interpreter::new().with_outputter(capture.clone());
    interpreter.define_global("DEBUG", Value::Macro("1".to_string())).unwrap();
    assert!(interpreter.define_global("DEBUG", Value::Int(0)).is_err());

    assert!(interpreter.read_source("Pilefile", "if (defined(\"DEBUG\")) println(DEBUG)"));
    assert_eq!(capture.output(), "1\n");
    assert_eq!(interpreter.global_names(), ["DEBUG"]);
}

#[test]
fn expressions_evaluate_from_tokens() {
    let mut interpreter = Interpreter::new().with_outputter(CaptureOutputter::default());
    interpreter.eval_line("int base = 10");

    let tokens = tokenize("base * 2 + 1").unwrap().tokens;
    assert_eq!(interpreter.eval_tokens(&tokens, false), Flow::Value(Value::Int(21)));

    let tokens = tokenize("int other").unwrap().tokens;
    assert_eq!(interpreter.eval_tokens(&tokens, true), Flow::Value(Value::Int(0)));

    let tokens = tokenize("if (base) base").unwrap().tokens;
    assert_eq!(interpreter.eval_tokens(&tokens, false), Flow::Error);
}

#[test]
fn wildcards() {
    assert!(matches_wildcard("*.c", "main.c"));
    assert!(matches_wildcard("m?in.*", "main.c"));
    assert!(matches_wildcard("*", ""));
    assert!(matches_wildcard("a*b*c", "aXXbYYc"));
    assert!(!matches_wildcard("*.c", "main.h"));
    assert!(!matches_wildcard("?", ""));
}
