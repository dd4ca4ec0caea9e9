use std::time::UNIX_EPOCH;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Interpreter},
            utils::{int_arg, text_arg},
        },
        io::matches_wildcard,
        value::{
            core::{Array, Value},
            operand::Operand,
            types::Type,
        },
    },
    util::num::seconds_to_i32_checked,
};

/// Runs another Eve file in the current global environment.
///
/// The path is relative to the including file. Returns `true` if the
/// included file ran without errors.
pub fn include(interpreter: &mut Interpreter, args: &[Operand]) -> EvalResult<Value> {
    let path = text_arg("include", args, 0)?;
    Ok(Value::Bool(interpreter.include(&path)?))
}

/// Lists the files matching a wildcard pattern, sorted.
///
/// Only the last path component may hold wildcards. The result keeps the
/// directory part as written, so `ls("src/*.c")` yields `src/main.c`. A
/// directory that cannot be read yields an empty list.
///
/// # Example
/// ```
/// use pile::interpreter::{
///     evaluator::{core::Interpreter, function::fs::ls},
///     value::{core::Value, operand::Operand},
/// };
///
/// let mut interpreter = Interpreter::new();
/// let found = ls(&mut interpreter, &[Operand::literal(Value::from("no/such/dir/*.c"))]).unwrap();
/// assert_eq!(found.size(), Some(0));
/// ```
pub fn ls(interpreter: &mut Interpreter, args: &[Operand]) -> EvalResult<Value> {
    let pattern = text_arg("ls", args, 0)?;
    let (dir, name_pattern) = match pattern.rsplit_once('/') {
        Some((dir, name)) => (dir, name),
        None => ("", pattern.as_str()),
    };
    let search_dir = interpreter.script_path(if dir.is_empty() { "." } else { dir });

    let mut names = match interpreter.file_system.list_dir(&search_dir) {
        Ok(names) => names,
        Err(e) => {
            tracing::debug!(dir = %search_dir.display(), %e, "ls found nothing");
            Vec::new()
        },
    };

    names.sort();

    let matches: Vec<Value> = names.into_iter()
                                   .filter(|name| matches_wildcard(name_pattern, name))
                                   .map(|name| {
                                       if dir.is_empty() {
                                           Value::String(name)
                                       } else {
                                           Value::String(format!("{dir}/{name}"))
                                       }
                                   })
                                   .collect();
    Ok(Value::Array(Array::from_values(Type::String, matches)))
}

/// Copies a file; returns `true` on success.
pub fn copy(interpreter: &mut Interpreter, args: &[Operand]) -> EvalResult<Value> {
    let from = interpreter.script_path(&text_arg("copy", args, 0)?);
    let to = interpreter.script_path(&text_arg("copy", args, 1)?);
    Ok(Value::Bool(interpreter.file_system.copy(&from, &to).is_ok()))
}

/// Moves or renames a file; returns `true` on success.
pub fn rename(interpreter: &mut Interpreter, args: &[Operand]) -> EvalResult<Value> {
    let from = interpreter.script_path(&text_arg("move", args, 0)?);
    let to = interpreter.script_path(&text_arg("move", args, 1)?);
    Ok(Value::Bool(interpreter.file_system.rename(&from, &to).is_ok()))
}

/// Deletes a file, or a directory with everything in it.
pub fn delete(interpreter: &mut Interpreter, args: &[Operand]) -> EvalResult<Value> {
    let path = interpreter.script_path(&text_arg("delete", args, 0)?);
    Ok(Value::Bool(interpreter.file_system.remove(&path).is_ok()))
}

/// Creates one directory; its parent must exist.
pub fn mkdir(interpreter: &mut Interpreter, args: &[Operand]) -> EvalResult<Value> {
    let path = interpreter.script_path(&text_arg("mkdir", args, 0)?);
    Ok(Value::Bool(interpreter.file_system.create_dir(&path).is_ok()))
}

/// Creates a directory along with any missing parents.
pub fn mkpath(interpreter: &mut Interpreter, args: &[Operand]) -> EvalResult<Value> {
    let path = interpreter.script_path(&text_arg("mkpath", args, 0)?);
    Ok(Value::Bool(interpreter.file_system.create_dir_all(&path).is_ok()))
}

/// Creates an empty file if it does not exist yet.
pub fn mkfile(interpreter: &mut Interpreter, args: &[Operand]) -> EvalResult<Value> {
    let path = interpreter.script_path(&text_arg("mkfile", args, 0)?);
    Ok(Value::Bool(interpreter.file_system.touch(&path).is_ok()))
}

/// Sets the permission bits of a file. The mode is a plain number, so
/// `rwxr-xr-x` is written `493`.
pub fn chmod(interpreter: &mut Interpreter, args: &[Operand]) -> EvalResult<Value> {
    let path = interpreter.script_path(&text_arg("chmod", args, 0)?);
    let Ok(mode) = u32::try_from(int_arg("chmod", args, 1)?) else {
        return Ok(Value::Bool(false));
    };
    Ok(Value::Bool(interpreter.file_system.set_mode(&path, mode).is_ok()))
}

/// Returns a file's modification time in seconds since the Unix epoch.
pub fn mod_time(interpreter: &mut Interpreter, args: &[Operand]) -> EvalResult<Value> {
    let written = text_arg("mod_time", args, 0)?;
    let path = interpreter.script_path(&written);
    let io_error = |message: String| RuntimeError::Io { path: written.clone(),
                                                        message };

    let modified = interpreter.file_system
                              .modified(&path)
                              .map_err(|e| io_error(e.to_string()))?;
    let seconds = modified.duration_since(UNIX_EPOCH)
                          .map_err(|e| io_error(e.to_string()))?
                          .as_secs();
    Ok(Value::Int(seconds_to_i32_checked(seconds)?))
}
