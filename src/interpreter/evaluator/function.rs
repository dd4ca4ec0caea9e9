/// Introspection built-ins.
///
/// `type` and `defined`.
pub mod builtin;
/// Conversion built-ins and the cast syntax.
///
/// `string`, `bool`, `int` and `float`, following the conversion table.
pub mod cast;
/// The built-in table and call dispatch.
///
/// Maps built-in names to their implementations and routes calls to
/// built-in, native and user-defined functions.
pub mod core;
/// File system built-ins.
///
/// `include`, `ls`, `copy`, `move`, `delete`, `mkdir`, `mkpath`, `mkfile`,
/// `chmod` and `mod_time`, all resolved relative to the running script.
pub mod fs;
/// Output built-ins.
///
/// `print`, `println`, `warning`, `error` and `debug`.
pub mod print;
/// User-defined functions and procedures.
///
/// Argument binding, the call frame and return value checks.
pub mod user;
