/// Class templates and their instances.
///
/// A class is an ordered list of typed fields plus named methods. Objects
/// are stamped out of a class at declaration time, with every field holding
/// the zero value of its type.
pub mod class;
/// The conversion rules between value types.
pub mod convert;
/// The `Value` enum and storage slots.
///
/// Defines every runtime value Eve knows, how values are copied, compared
/// and displayed.
pub mod core;
/// Function, procedure and native callback values.
pub mod function;
/// Evaluation results: storage references versus temporaries.
pub mod operand;
/// Type tags and the conversion table.
pub mod types;
