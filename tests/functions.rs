use pile::{
    interpreter::{
        evaluator::core::{Interpreter, Options},
        output::CaptureOutputter,
        value::{core::Value, operand::Operand},
    },
    run_source,
};
use pretty_assertions::assert_eq;

fn output_of(src: &str) -> String {
    let (ok, captured, _) = run_source("test.eve", src);
    assert!(ok, "Script failed: {:?}", captured.errors);
    captured.output
}

fn errors_of(src: &str) -> Vec<String> {
    let (ok, captured, _) = run_source("test.eve", src);
    assert!(!ok, "Script succeeded but was expected to fail");
    captured.errors
}

#[test]
fn functions_return_values() {
    let src = "int add(int a, int b) {
    return a + b
}
println(add(2, 3))";
    assert_eq!(output_of(src), "5\n");
}

#[test]
fn bodies_may_open_on_the_next_line_or_close_on_the_same_line() {
    let src = "int twice(int n)
{
    return n * 2
}
int inc(int n) { return n + 1 }
println(inc(twice(4)))";
    assert_eq!(output_of(src), "9\n");
}

#[test]
fn statements_may_follow_a_one_line_body() {
    assert_eq!(output_of("int one() { return 1 } println(one())"), "1\n");
}

#[test]
fn arguments_are_converted_to_parameter_types() {
    assert_eq!(output_of("float half(float x) { return x / 2 }\nprintln(half(3))"), "1.5\n");
    assert_eq!(output_of("int trunc(int x) { return x }\nprintln(trunc(3.7))"), "3\n");
}

#[test]
fn return_values_must_have_the_return_type() {
    assert_eq!(output_of("float f() { return 1.0 }\nprintln(type(f()))"), "float\n");
    assert_eq!(errors_of("float f() { return 1 }\nf()"), ["test.eve:2: 'f' returns float, found int"]);
    assert_eq!(output_of("int[] none() { return [] }\nprintln(type(none()))"), "int[]\n");
}

#[test]
fn argument_count_and_type_are_checked() {
    let header = "void f(int a, string b) {\n}\n";

    assert_eq!(errors_of(&format!("{header}f(1)")),
               ["test.eve:3: 'f' expects 2 argument(s), found 1"]);
    assert_eq!(errors_of(&format!("{header}f(\"x\", \"y\")")),
               ["test.eve:3: argument 1 of 'f': expected int, found string"]);
    assert_eq!(output_of(&format!("{header}f(1, \"y\")\nprintln(\"ok\")")), "ok\n");
}

#[test]
fn reference_parameters_write_back() {
    let src = "void set(int &a) { a = 5 }
int v
set(v)
println(v)";
    assert_eq!(output_of(src), "5\n");

    let errors = errors_of("void set(int &a) { a = 5 }\nset(3)");
    assert_eq!(errors, ["test.eve:2: argument 1 of 'set' must be a reference"]);

    let errors = errors_of("void set(int &a) { a = 5 }\nfloat x\nset(x)");
    assert_eq!(errors, ["test.eve:3: argument 1 of 'set': expected int, found float"]);
}

#[test]
fn value_parameters_are_copies() {
    let src = "void grow(int[] xs) { xs += 4 }
int[] xs = [1, 2, 3]
grow(xs)
println(xs.size())";
    assert_eq!(output_of(src), "3\n");
}

#[test]
fn missing_and_mismatched_returns() {
    assert_eq!(errors_of("int f() { }\nf()"), ["test.eve:2: 'f' must return int"]);
    assert_eq!(errors_of("int f() { return \"a\" }\nf()"),
               ["test.eve:2: 'f' returns int, found string"]);
    assert_eq!(errors_of("void f() { return 1 }\nf()"),
               ["test.eve:2: 'f' returns void, found int"]);
}

#[test]
fn void_functions_yield_nothing() {
    assert_eq!(output_of("void hello() { println(\"hi\") }\nhello()"), "hi\n");
    assert_eq!(errors_of("void hello() { }\nint x = hello()"), ["test.eve:2: expression has no value"]);
}

#[test]
fn recursion() {
    let src = "int fact(int n) {
    if (n <= 1) return 1
    return n * fact(n - 1)
}
println(fact(5))";
    assert_eq!(output_of(src), "120\n");
}

#[test]
fn runaway_recursion_is_stopped_once() {
    let src = "int forever(int n) { return forever(n) }\nforever(1)\nprintln(\"after\")";
    let (ok, captured, _) = run_source("test.eve", src);
    assert!(!ok);
    assert_eq!(captured.output, "after\n");
    assert_eq!(captured.errors, ["test.eve:2: maximum call depth of 128 exceeded"]);
}

#[test]
fn deep_recursion_fits_small_thread_stacks() {
    let worker = std::thread::Builder::new().stack_size(1024 * 1024)
                                            .spawn(|| {
                                                let options = Options { max_call_depth: 1000,
                                                                        ..Options::default() };
                                                let capture = CaptureOutputter::default();
                                                let mut interpreter =
                                                    Interpreter::new().with_options(options)
                                                                      .with_outputter(capture.clone());
                                                let src = "int down(int n) {
    if (n == 0) return 0
    return down(n - 1) + 1
}
println(down(900))
down(5000)";
                                                let ok = interpreter.read_source("test.eve", src);
                                                (ok, capture.output(), capture.errors())
                                            })
                                            .unwrap();

    let (ok, output, errors) = worker.join().unwrap();
    assert!(!ok);
    assert_eq!(output, "900\n");
    assert_eq!(errors, ["test.eve:6: maximum call depth of 1000 exceeded"]);
}

#[test]
fn call_depth_is_configurable() {
    let capture = CaptureOutputter::default();
    let options = Options { max_call_depth: 3,
                            ..Options::default() };
    let mut interpreter = Interpreter::new().with_options(options).with_outputter(capture.clone());

    let src = "int depth(int n) {
    if (n == 0) return 0
    return depth(n - 1)
}
depth(2)
depth(3)";
    assert!(!interpreter.read_source("test.eve", src));
    assert_eq!(capture.errors(), ["test.eve:6: maximum call depth of 3 exceeded"]);
}

#[test]
fn functions_see_globals_but_not_caller_locals() {
    assert_eq!(output_of("int g = 4\nvoid show() { println(g) }\nshow()"), "4\n");

    let src = "void show() { println(secret) }
{
    int secret = 1
    show()
}";
    assert_eq!(errors_of(src), ["test.eve:1: 'secret' is not declared"]);
}

#[test]
fn errors_in_bodies_report_the_body_line() {
    let src = "void broken() {
    int x = 1
    x = nope
}
broken()";
    assert_eq!(errors_of(src), ["test.eve:3: 'nope' is not declared"]);
}

#[test]
fn function_variables_hold_functions() {
    let src = "int sq(int x) { return x * x }
function f
f = sq
println(f(6))
println(type(f))";
    assert_eq!(output_of(src), "36\nfunction\n");
}

#[test]
fn only_functions_can_be_called() {
    assert_eq!(errors_of("int x\nx(1)"), ["test.eve:2: int is not callable"]);
}

#[test]
fn functions_cannot_be_redefined_in_the_same_scope() {
    assert_eq!(errors_of("void f() { }\nvoid f() { }"), ["test.eve:2: 'f' is redefined"]);
}

#[test]
fn body_syntax_errors() {
    assert_eq!(errors_of("int f()"), ["test.eve:1: expected '{' to begin the body of 'f'"]);
    assert_eq!(errors_of("int f() {\n    return 1"), ["test.eve:1: unterminated body of 'f'"]);
    assert_eq!(errors_of("int f(int) { }"),
               ["test.eve:1: invalid function declaration: expected a parameter name"]);
}

#[test]
fn procedures_run_their_body() {
    let src = "string[] SOURCES
procedure collect {
    SOURCES += \"main.c\"
    SOURCES += \"util.c\"
}
collect()
println(SOURCES)";
    assert_eq!(output_of(src), "[main.c, util.c]\n");
}

#[test]
fn procedures_take_no_arguments_and_return_nothing() {
    assert_eq!(errors_of("procedure p { }\np(1)"), ["test.eve:2: 'p' expects 0 argument(s), found 1"]);
    assert_eq!(errors_of("procedure p { return 1 }\np()"), ["test.eve:2: 'p' returns void, found int"]);
    assert_eq!(output_of("procedure p {\n    println(1)\n    return\n    println(2)\n}\np()"), "1\n");
}

#[test]
fn native_functions() {
    let capture = CaptureOutputter::default();
    let mut interpreter = Interpreter::new().with_outputter(capture.clone());
    interpreter.register_native("join", 2, |_, args: &[Operand]| {
                   Ok(Value::String(format!("{}/{}", *args[0].value(), *args[1].value())))
               })
               .unwrap();

    assert!(interpreter.read_source("test.eve", "println(join(\"src\", \"main.c\"))"));
    assert_eq!(capture.output(), "src/main.c\n");

    assert!(!interpreter.read_source("test.eve", "join(\"a\")"));
    assert_eq!(capture.errors(), ["test.eve:1: 'join' expects 2 argument(s), found 1"]);
}

#[test]
fn native_functions_are_limited_to_five_parameters() {
    let mut interpreter = Interpreter::new();
    assert!(interpreter.register_native("wide", 6, |_, _| Ok(Value::Int(0))).is_err());
    assert!(interpreter.register_native("five", 5, |_, _| Ok(Value::Int(0))).is_ok());
    assert!(interpreter.register_native("five", 1, |_, _| Ok(Value::Int(0))).is_err());
}
