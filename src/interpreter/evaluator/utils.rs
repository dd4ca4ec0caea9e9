use std::path::{Path, PathBuf};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::Interpreter,
        value::{convert::as_int, core::Value, operand::Operand, types::Type},
    },
};

/// Returns a copy of the value of argument `index`.
///
/// # Errors
/// `NotDeclared` for an unresolved identifier, `NoValue` for the result of a
/// void call.
///
/// # Example
/// ```
/// use pile::interpreter::{
///     evaluator::utils::value_arg,
///     value::{core::Value, operand::Operand},
/// };
///
/// let args = [Operand::literal(Value::Int(4)), Operand::nothing()];
/// assert_eq!(value_arg(&args, 0).unwrap(), Value::Int(4));
/// assert!(value_arg(&args, 1).is_err());
/// ```
pub fn value_arg(args: &[Operand], index: usize) -> Result<Value, RuntimeError> {
    match args.get(index) {
        Some(arg) => match &*arg.value() {
            Value::Void(name) if name.is_empty() => Err(RuntimeError::NoValue),
            Value::Void(name) => Err(RuntimeError::NotDeclared { name: name.clone() }),
            value => Ok(value.copy()),
        },
        None => Err(RuntimeError::NoValue),
    }
}

/// Returns the text of argument `index`, which must be a `string` or a
/// `macro`.
///
/// # Errors
/// `ArgumentType` naming the built-in `function` for any other type.
pub fn text_arg(function: &str, args: &[Operand], index: usize) -> Result<String, RuntimeError> {
    match value_arg(args, index)? {
        Value::String(text) | Value::Macro(text) => Ok(text),
        other => Err(RuntimeError::ArgumentType { name:     function.to_string(),
                                                  index:    index + 1,
                                                  expected: Type::String,
                                                  found:    other.ty(), }),
    }
}

/// Returns argument `index` as an `int`, converting `bool` and `float`.
///
/// # Errors
/// `ArgumentType` naming the built-in `function` for non-numeric values.
pub fn int_arg(function: &str, args: &[Operand], index: usize) -> Result<i32, RuntimeError> {
    let value = value_arg(args, index)?;
    as_int(&value).map_err(|_| RuntimeError::ArgumentType { name:     function.to_string(),
                                                            index:    index + 1,
                                                            expected: Type::Int,
                                                            found:    value.ty(), })
}

impl Interpreter {
    /// Resolves a path written in a script.
    ///
    /// Relative paths are taken relative to the directory of the file being
    /// executed, so a script behaves the same from any working directory.
    #[must_use]
    pub fn script_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            return path.to_path_buf();
        }

        match self.file.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}
