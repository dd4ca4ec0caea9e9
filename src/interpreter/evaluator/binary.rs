/// Concatenation of strings, arrays and lists.
pub mod array;
/// Assignment and compound assignment.
///
/// Writes through references, converting the stored value to the type the
/// target already holds.
pub mod assign;
/// Ordering and equality comparisons.
pub mod comparison;
/// Dispatch of binary operators to their handlers.
pub mod core;
/// Bitwise and logical operators.
pub mod logic;
/// Checked integer and floating-point arithmetic.
pub mod scalar;
