use pile::{
    interpreter::value::{
        convert::{as_bool, as_int, convert},
        core::{Array, Value},
        types::{Type, is_convertible},
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
fn conversion_table() {
    let numeric = [Type::Bool, Type::Int, Type::Float];
    for from in &numeric {
        for to in &numeric {
            assert!(is_convertible(from, to), "{from} -> {to}");
        }
    }

    let others = [Type::String, Type::Macro, Type::List, Type::Function];
    for other in &others {
        assert!(is_convertible(other, other));
        for number in &numeric {
            assert!(!is_convertible(other, number), "{other} -> {number}");
            assert!(!is_convertible(number, other), "{number} -> {other}");
        }
    }

    assert!(!is_convertible(&Type::String, &Type::Macro));
    assert!(is_convertible(&Type::array_of(Type::Void), &Type::array_of(Type::Int)));
    assert!(!is_convertible(&Type::array_of(Type::Int), &Type::array_of(Type::Float)));
    assert!(is_convertible(&Type::Object("Point".into()), &Type::Object("Point".into())));
    assert!(!is_convertible(&Type::Object("Point".into()), &Type::Object("Line".into())));
}

#[test]
fn numeric_conversions() {
    assert_eq!(convert(&Value::Float(-2.9), &Type::Int).unwrap(), Value::Int(-2));
    assert_eq!(convert(&Value::Int(3), &Type::Float).unwrap(), Value::Float(3.0));
    assert_eq!(convert(&Value::Bool(true), &Type::Int).unwrap(), Value::Int(1));
    assert_eq!(convert(&Value::Float(0.5), &Type::Bool).unwrap(), Value::Bool(true));
    assert!(convert(&Value::Float(1e20), &Type::Int).is_err());

    assert!(as_bool(&Value::Int(2)).unwrap());
    assert!(as_bool(&Value::from("yes")).is_err());
    assert_eq!(as_int(&Value::Float(7.9)).unwrap(), 7);
}

#[test]
fn int_limits_are_writable() {
    assert_eq!(output_of("int lo = -2147483648\nprintln(lo)\nprintln(2147483647)"), "-2147483648\n2147483647\n");
    assert_failure_mentions("int lo = -2147483648\nlo = lo - 1", "overflow");
}

#[test]
fn empty_arrays_adopt_their_target_type() {
    let empty = Value::Array(Array::new(Type::Void));
    let converted = convert(&empty, &Type::array_of(Type::String)).unwrap();
    assert_eq!(converted.ty(), Type::array_of(Type::String));

    assert_eq!(output_of("int[] a = []\nprintln(type(a))\nprintln(a.size())"), "int[]\n0\n");
}

#[test]
fn copies_are_independent() {
    let original = Value::Array(Array::from_values(Type::Int, vec![Value::Int(1)]));
    let copy = original.copy();
    assert_eq!(original, copy);

    if let Value::Array(array) = &copy {
        *array.items[0].borrow_mut() = Value::Int(9);
    }
    assert_eq!(original.to_string(), "[1]");
    assert_eq!(copy.to_string(), "[9]");
}

#[test]
fn type_names_display_like_declarations() {
    assert_eq!(Type::array_of(Type::String).to_string(), "string[]");
    assert_eq!(Type::Object("Target".into()).to_string(), "Target");
    assert_eq!(Type::from_keyword("macro"), Some(Type::Macro));
    assert_eq!(Type::from_keyword("Target"), None);
}

#[test]
fn array_literals_share_one_element_type() {
    assert_eq!(output_of("int[] a = [1, 2, 3]\nprintln(a.size())\nprintln(a)"), "3\n[1, 2, 3]\n");
    assert_eq!(errors_of("int[] a = [1, \"a\"]"),
               ["test.eve:1: array element type mismatch: expected int, found string"]);
}

#[test]
fn array_indexing_and_element_assignment() {
    assert_eq!(output_of("string[] s = [\"a\", \"b\"]\ns[1] = \"c\"\nprintln(s[0] + s[1])"), "ac\n");
    assert_eq!(errors_of("int[] a = [1]\nprintln(a[3])"), ["test.eve:2: index 3 out of range for size 1"]);
    assert_eq!(errors_of("int[] a = [1]\nprintln(a[-1])"), ["test.eve:2: index -1 out of range for size 1"]);
    assert_eq!(errors_of("int x\nprintln(x[0])"), ["test.eve:2: int cannot be indexed"]);
}

#[test]
fn arrays_grow_with_plus() {
    let src = "string[] srcs
srcs += \"main.c\"
srcs += [\"a.c\", \"b.c\"]
println(srcs)
println(srcs + \"z.c\")";
    assert_eq!(output_of(src), "[main.c, a.c, b.c]\n[main.c, a.c, b.c, z.c]\n");
    assert_failure_mentions("string[] srcs\nsrcs += 1", "array element type mismatch");
}

#[test]
fn lists_hold_mixed_values() {
    let src = "list l
l += 1
l += \"two\"
l += 3.5
println(l)
println(type(l[1]))";
    assert_eq!(output_of(src), "[1, two, 3.5]\nstring\n");
}

#[test]
fn array_assignment_copies() {
    let src = "int[] a = [1, 2]
int[] b = a
b[0] = 7
println(a)
println(b)";
    assert_eq!(output_of(src), "[1, 2]\n[7, 2]\n");
}

#[test]
fn strings_compare_and_concatenate() {
    assert_eq!(output_of("println(\"b\" > \"a\")\nprintln(\"x\" + \"y\" == \"xy\")"), "true\ntrue\n");
    assert_failure_mentions("println(\"a\" - \"b\")", "operator '-' cannot be applied to string and string");
}

fn assert_failure_mentions(src: &str, needle: &str) {
    let errors = errors_of(src);
    assert!(errors.iter().any(|e| e.contains(needle)), "{errors:?} does not mention {needle:?}");
}
