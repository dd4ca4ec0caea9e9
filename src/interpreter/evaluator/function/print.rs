use crate::{
    interpreter::{
        evaluator::{
            core::{EvalResult, Interpreter},
            utils::value_arg,
        },
        value::{core::Value, operand::Operand},
    },
    util::escape::unescape_lenient,
};

/// Returns the text a value prints as.
///
/// String literals had their escapes translated by the lexer; macros come
/// from outside the script and have theirs translated here.
fn display_text(args: &[Operand]) -> EvalResult<String> {
    Ok(match value_arg(args, 0)? {
        Value::Macro(text) => unescape_lenient(&text),
        other => other.to_string(),
    })
}

/// Writes a value to the script output.
///
/// # Example
/// ```
/// use pile::interpreter::{evaluator::core::Interpreter, output::CaptureOutputter};
///
/// let capture = CaptureOutputter::default();
/// let mut interpreter = Interpreter::new().with_outputter(capture.clone());
///
/// assert!(interpreter.read_source("demo", "print(\"a\")\nprint(1 + 1)"));
/// assert_eq!(capture.output(), "a2");
/// ```
pub fn print(interpreter: &mut Interpreter, args: &[Operand]) -> EvalResult<Value> {
    let text = display_text(args)?;
    interpreter.outputter.print(&text);
    Ok(Value::Void(String::new()))
}

/// Writes a value and a newline, or just a newline.
pub fn println(interpreter: &mut Interpreter, args: &[Operand]) -> EvalResult<Value> {
    let mut text = if args.is_empty() { String::new() } else { display_text(args)? };
    text.push('\n');
    interpreter.outputter.print(&text);
    Ok(Value::Void(String::new()))
}

/// Reports a warning at the current line. Warnings do not raise the error
/// flag.
pub fn warning(interpreter: &mut Interpreter, args: &[Operand]) -> EvalResult<Value> {
    let text = display_text(args)?;
    interpreter.warn(&text);
    Ok(Value::Void(String::new()))
}

/// Reports an error at the current line and raises the error flag; the
/// script keeps running.
pub fn error(interpreter: &mut Interpreter, args: &[Operand]) -> EvalResult<Value> {
    let text = display_text(args)?;
    interpreter.report_message(&text);
    Ok(Value::Void(String::new()))
}

/// Hands a message to the outputter's debug channel.
pub fn debug(interpreter: &mut Interpreter, args: &[Operand]) -> EvalResult<Value> {
    let text = display_text(args)?;
    interpreter.outputter.debug(&text);
    Ok(Value::Void(String::new()))
}
