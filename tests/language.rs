use std::fs::{self};

use pile::{Captured, run_source};
use pretty_assertions::assert_eq;
use walkdir::WalkDir;

#[test]
fn book_examples_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("book/src").into_iter()
                                .filter_map(Result::ok)
                                .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        for (i, code) in extract_eve_blocks(&content).into_iter().enumerate() {
            count += 1;
            let (ok, captured, _) = run_source("book", &code);
            if !ok {
                panic!("Eve example {} in {:?} failed:\n{}\nErrors: {:?}",
                       i + 1,
                       path,
                       code,
                       captured.errors);
            }
        }
    }

    assert!(count > 0, "No Eve examples found in book/src");
}

fn extract_eve_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut inside = false;
    let mut buf = String::new();

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```eve") {
            inside = true;
            buf.clear();
            continue;
        }
        if inside && trimmed.starts_with("```") {
            inside = false;
            blocks.push(buf.clone());
            continue;
        }
        if inside {
            buf.push_str(line);
            buf.push('\n');
        }
    }

    blocks
}

fn assert_success(src: &str) {
    let (ok, captured, _) = run_source("test.eve", src);
    if !ok {
        panic!("Script failed: {:?}", captured.errors);
    }
}

fn assert_failure(src: &str) {
    let (ok, ..) = run_source("test.eve", src);
    if ok {
        panic!("Script succeeded but was expected to fail")
    }
}

/// Runs a script that must succeed and returns what it printed.
fn output_of(src: &str) -> String {
    let (ok, captured, _) = run_source("test.eve", src);
    assert!(ok, "Script failed: {:?}", captured.errors);
    captured.output
}

/// Runs a script that must fail and returns everything it produced.
fn failure_of(src: &str) -> Captured {
    let (ok, captured, _) = run_source("test.eve", src);
    assert!(!ok, "Script succeeded but was expected to fail");
    captured
}

#[test]
fn operator_precedence() {
    assert_eq!(output_of("println(1 + 2 * 3)"), "7\n");
    assert_eq!(output_of("println((1 + 2) * 3)"), "9\n");
    assert_eq!(output_of("println(2 ** 3 ** 2)"), "512\n");
    assert_eq!(output_of("println(10 - 4 - 3)"), "3\n");
    assert_eq!(output_of("println(-2 ** 2)"), "4\n");
    assert_eq!(output_of("println(1 + 2 < 4 && 3 > 2)"), "true\n");
}

#[test]
fn assignment_is_right_associative_and_yields_the_value() {
    assert_eq!(output_of("int a\nint b\na = b = 3\nprintln(a)\nprintln(b)"), "3\n3\n");
    assert_eq!(output_of("int a\nprintln(a = 5)"), "5\n");
}

#[test]
fn compound_assignment() {
    assert_eq!(output_of("int x = 10\nx += 5\nx -= 3\nx *= 2\nx /= 4\nx %= 4\nprintln(x)"),
               "2\n");
    assert_eq!(output_of("int x = 2\nx **= 10\nprintln(x)"), "1024\n");
    assert_eq!(output_of("string s = \"lib\"\ns += \"pile\"\nprintln(s)"), "libpile\n");
}

#[test]
fn assignment_converts_to_the_declared_type() {
    assert_eq!(output_of("int i = 2.9\nprintln(i)"), "2\n");
    assert_eq!(output_of("float f = 3\nprintln(f / 2)"), "1.5\n");
    assert_eq!(output_of("bool b = 7\nprintln(b)"), "true\n");
    assert_failure("int i = \"3\"");
    assert_failure("string s = 3");
}

#[test]
fn arithmetic_promotes_to_float() {
    assert_eq!(output_of("println(1 + 0.5)"), "1.5\n");
    assert_eq!(output_of("println(7 / 2)"), "3\n");
    assert_eq!(output_of("println(7.0 / 2)"), "3.5\n");
    assert_eq!(output_of("println(2 ** -1)"), "0.5\n");
    assert_eq!(output_of("println(7 % 3)"), "1\n");
}

#[test]
fn integer_errors_are_reported() {
    assert_eq!(failure_of("println(1 / 0)").errors, ["test.eve:1: division by zero"]);
    assert_eq!(failure_of("println(1 % 0)").errors, ["test.eve:1: division by zero"]);
    assert_eq!(failure_of("println(2147483647 + 1)").errors, ["test.eve:1: integer overflow"]);
}

#[test]
fn comparison_and_logic() {
    assert_eq!(output_of("println(\"abc\" < \"abd\")"), "true\n");
    assert_eq!(output_of("println(1 == 1.0)"), "true\n");
    assert_eq!(output_of("println(\"a\" != \"a\")"), "false\n");
    assert_eq!(output_of("println(true && 0)"), "false\n");
    assert_eq!(output_of("println(false || 2)"), "true\n");
    assert_eq!(output_of("println(!0)"), "true\n");
}

#[test]
fn logic_short_circuits() {
    assert_eq!(output_of("int n\nbool r = false && (n = 1) == 1\nprintln(n)"), "0\n");
    assert_eq!(output_of("int n\nbool r = true || (n = 1) == 1\nprintln(n)"), "0\n");
}

#[test]
fn bitwise_operators() {
    assert_eq!(output_of("println(6 & 3)"), "2\n");
    assert_eq!(output_of("println(6 | 3)"), "7\n");
    assert_eq!(output_of("println(6 ^ 3)"), "5\n");
    assert_failure("println(1.5 & 1)");
}

#[test]
fn string_concatenation_and_indexing() {
    assert_eq!(output_of("string s = \"ab\" + \"cd\"\nprintln(s)\nprintln(s.size())\nprintln(s[1])"),
               "abcd\n4\nb\n");
    assert_failure("string s = \"ab\"\nprintln(s[2])");
}

#[test]
fn undeclared_names_are_reported_with_file_and_line() {
    let captured = failure_of("int y\ny = x + 1");
    assert_eq!(captured.errors, ["test.eve:2: 'x' is not declared"]);
}

#[test]
fn statement_errors_do_not_stop_the_script() {
    let captured = failure_of("println(missing)\nprintln(\"after\")");
    assert_eq!(captured.output, "after\n");
    assert_eq!(captured.errors, ["test.eve:1: 'missing' is not declared"]);
}

#[test]
fn redefinition_in_the_same_scope_fails() {
    let captured = failure_of("int x\nint x");
    assert_eq!(captured.errors, ["test.eve:2: 'x' is redefined"]);
}

#[test]
fn inner_blocks_shadow_outer_names() {
    assert_eq!(output_of("int x = 1\n{\n    int x = 2\n    println(x)\n}\nprintln(x)"), "2\n1\n");
}

#[test]
fn block_locals_end_with_the_block() {
    let captured = failure_of("{\n    int local = 1\n}\nprintln(local)");
    assert_eq!(captured.errors, ["test.eve:4: 'local' is not declared"]);
}

#[test]
fn semicolons_separate_statements() {
    assert_eq!(output_of("int a; int b = 2; a = b * 2; println(a)"), "4\n");
}

#[test]
fn assigning_to_a_non_reference_fails() {
    let captured = failure_of("5 = 3");
    assert_eq!(captured.errors, ["test.eve:1: assigning to non-reference '5'"]);
}

#[test]
fn void_cannot_be_declared() {
    assert_failure("void v");
}

#[test]
fn continuation_lines_join_and_keep_the_first_line_number() {
    let captured = failure_of("int x = 1 + ...\n    2\nprintln(x)\ny = 3");
    assert_eq!(captured.output, "3\n");
    assert_eq!(captured.errors, ["test.eve:4: 'y' is not declared"]);

    let captured = failure_of("println(1 + ...\n    nope)");
    assert_eq!(captured.errors, ["test.eve:1: 'nope' is not declared"]);
}

#[test]
fn comments_are_ignored() {
    assert_eq!(output_of("// a comment\nint x = 4 // trailing\nprintln(x)"), "4\n");
}

#[test]
fn lexical_errors_are_reported_per_line() {
    let captured = failure_of("string s = \"abc\nprintln(1)");
    assert_eq!(captured.output, "1\n");
    assert_eq!(captured.errors, ["test.eve:1: unterminated string literal"]);

    assert_eq!(failure_of("int x = 1.2.3").errors, ["test.eve:1: malformed number '1.2.3'"]);
    assert_eq!(failure_of("int x = 99999999999").errors,
               ["test.eve:1: integer literal '99999999999' is out of range"]);
    assert_eq!(failure_of("int x = 1 ... 2").errors,
               ["test.eve:1: '...' must be the last token on a line"]);
}

#[test]
fn macros_print_with_escapes_applied() {
    use pile::interpreter::{
        evaluator::core::Interpreter, output::CaptureOutputter, value::core::Value,
    };

    let capture = CaptureOutputter::default();
    let mut interpreter = Interpreter::new().with_outputter(capture.clone());
    interpreter.define_global("CC", Value::Macro("gcc".to_string())).unwrap();
    interpreter.define_global("SEP", Value::Macro(r"a\tb".to_string())).unwrap();

    assert!(interpreter.read_source("Pilefile", "println(CC)\nprintln(SEP)\nprintln(type(CC))"));
    assert_eq!(capture.output(), "gcc\na\tb\nmacro\n");
}

#[test]
fn end_to_end_build_variables() {
    let (ok, captured, interpreter) = run_source("Pilefile",
                                                 "int x = 3\nint y\ny = x + 4\nprintln(y)");
    assert!(ok);
    assert_eq!(captured.output, "7\n");
    assert_eq!(interpreter.global("y").map(|v| v.to_string()), Some("7".to_string()));
    assert_eq!(interpreter.global_names(), ["x", "y"]);
}

#[test]
fn print_builtins() {
    assert_eq!(output_of("print(\"a\\tb\")\nprint(1)\nprint(2.5)\nprint(true)\nprintln()"), "a\tb12.5true\n");

    let (ok, captured, _) = run_source("test.eve", "warning(\"careful\")");
    assert!(ok);
    assert_eq!(captured.warnings, ["test.eve:1: careful"]);

    let captured = failure_of("error(\"bad \" + string(1))");
    assert_eq!(captured.errors, ["test.eve:1: bad 1"]);

    let (ok, captured, _) = run_source("test.eve", "debug(\"trace me\")");
    assert!(ok);
    assert_eq!(captured.debug, ["trace me"]);
}

#[test]
fn type_and_cast_builtins() {
    assert_eq!(output_of("println(type(1.5))\nprintln(type([1, 2]))\nprintln(type(\"s\"))"),
               "float\nint[]\nstring\n");
    assert_eq!(output_of("println(int(2.9))\nprintln(float(1) / 4)\nprintln(bool(0))"),
               "2\n0.25\nfalse\n");
    assert_eq!(output_of("println(string(12) + \"3\")\nprintln(string([1, 2]))"), "123\n[1, 2]\n");

    let captured = failure_of("int(\"3\")");
    assert_eq!(captured.errors, ["test.eve:1: cannot convert string to int"]);
}

#[test]
fn defined_checks_names() {
    assert_eq!(output_of("int a\nprintln(defined(a))\nprintln(defined(b))\nprintln(defined(\"a\"))\nprintln(defined(\"println\"))\nprintln(defined(\"nope\"))"),
               "true\nfalse\ntrue\ntrue\nfalse\n");
}

#[test]
fn builtins_check_their_argument_count() {
    assert_failure("type()");
    assert_failure("int(1, 2)");
    assert_failure("print(1, 2)");
}
