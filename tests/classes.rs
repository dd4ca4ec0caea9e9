use pile::{
    interpreter::{
        evaluator::core::Interpreter,
        output::CaptureOutputter,
        value::{class::Class, core::Value, operand::Operand, types::Type},
    },
    run_source,
};
use pretty_assertions::assert_eq;

const POINT: &str = "class Point {
    int x
    int y
    int sum() {
        return .x + .y
    }
    void move(int dx) { .x += dx }
}
";

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
fn objects_start_with_zero_fields() {
    assert_eq!(output_of(&format!("{POINT}Point p\nprintln(p.x)\nprintln(type(p))")), "0\nPoint\n");
}

#[test]
fn fields_and_methods() {
    let src = format!("{POINT}Point p
p.x = 2
p.y = 3
p.move(5)
println(p.sum())
println(p.x)");
    assert_eq!(output_of(&src), "10\n7\n");
}

#[test]
fn assignment_copies_objects() {
    let src = format!("{POINT}Point p
p.x = 1
Point q = p
q.x = 100
println(p.x)
println(q.x)");
    assert_eq!(output_of(&src), "1\n100\n");
}

#[test]
fn methods_can_be_held_in_function_variables() {
    let src = format!("{POINT}Point p
p.y = 2
function total = p.sum
p.y = 40
println(total())");
    assert_eq!(output_of(&src), "40\n");
}

#[test]
fn methods_must_be_called() {
    let src = format!("{POINT}Point p\nint n = p.sum");
    assert_eq!(errors_of(&src), ["test.eve:10: cannot convert function to int"]);
}

#[test]
fn unknown_members_are_reported() {
    let src = format!("{POINT}Point p\np.z = 1");
    assert_eq!(errors_of(&src), ["test.eve:10: Point has no member 'z'"]);
}

#[test]
fn objects_nest() {
    let src = format!("{POINT}class Segment {{
    Point from
    Point to
    int length() {{ return .to.x - .from.x }}
}}
Segment s
s.from.x = 2
s.to.x = 9
println(s.length())");
    assert_eq!(output_of(&src), "7\n");
}

#[test]
fn this_is_only_available_inside_methods() {
    assert_eq!(errors_of("int n = .x"), ["test.eve:1: 'this' is only available inside methods"]);
}

#[test]
fn classes_cannot_be_redefined() {
    let src = format!("{POINT}{POINT}");
    assert_eq!(errors_of(&src), ["test.eve:9: class 'Point' is redefined"]);
}

#[test]
fn unknown_classes_yield_placeholders() {
    let (ok, captured, _) = run_source("test.eve", "Widget w\nw.size = 1");
    assert!(!ok);
    assert_eq!(captured.errors,
               ["test.eve:1: unknown class 'Widget'",
                "test.eve:2: object of unknown class has no member 'size'"]);
}

#[test]
fn class_bodies_only_hold_declarations() {
    let src = "class Bad {
    int x
    println(1)
}
Bad b
println(b.x)";
    let (ok, captured, _) = run_source("test.eve", src);
    assert!(!ok);
    assert_eq!(captured.output, "0\n");
    assert_eq!(captured.errors,
               ["test.eve:3: class bodies may only contain field and method declarations"]);
}

#[test]
fn containers_have_a_size_method() {
    assert_eq!(output_of("int[] a = [1, 2, 3]\nprintln(a.size())"), "3\n");
    assert_eq!(output_of("list l\nl += 1\nl += \"two\"\nprintln(l.size())"), "2\n");
    assert_eq!(output_of("println(\"four\".size())"), "4\n");
}

#[test]
fn registered_classes_are_usable_from_scripts() {
    let mut target = Class::new("Target");
    target.add_field(Type::String, "name");
    target.add_field(Type::array_of(Type::String), "sources");

    let capture = CaptureOutputter::default();
    let mut interpreter = Interpreter::new().with_outputter(capture.clone());
    interpreter.register_class(target).unwrap();

    let src = "Target app
app.name = \"app\"
app.sources += \"main.c\"
println(app.sources)";
    assert!(interpreter.read_source("Pilefile", src));
    assert_eq!(capture.output(), "[main.c]\n");
    assert!(interpreter.register_class(Class::new("Target")).is_err());
}

#[test]
fn native_methods_extend_classes() {
    let capture = CaptureOutputter::default();
    let mut interpreter = Interpreter::new().with_outputter(capture.clone());
    interpreter.register_native_method("Array", "first", 1, |_, args: &[Operand]| {
                   match &*args[0].value() {
                       Value::Array(array) => Ok(array.items.first().map_or(Value::Int(0), |item| item.borrow().copy())),
                       _ => Ok(Value::Int(0)),
                   }
               })
               .unwrap();

    assert!(interpreter.read_source("demo", "int[] a = [4, 5]\nprintln(a.first())"));
    assert_eq!(capture.output(), "4\n");
    assert!(interpreter.register_native_method("Nope", "m", 1, |_, _| Ok(Value::Int(0)))
                       .is_err());
}
