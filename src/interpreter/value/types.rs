use std::fmt;

/// The type tag of an Eve value.
///
/// Every runtime value carries exactly one of these. Tags are compared
/// structurally: two array types are equal when their element types are, and
/// two object types are equal when they name the same class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// No value; as a parameter type it accepts anything.
    Void,
    /// `bool`
    Bool,
    /// `int`, a 32-bit signed integer.
    Int,
    /// `float`, a 32-bit float.
    Float,
    /// `string`
    String,
    /// `macro`, opaque text handed in by the embedding driver.
    Macro,
    /// `T[]`, a homogeneous array. `void[]` is the empty array literal.
    Array(Box<Self>),
    /// `list`, a heterogeneous sequence.
    List,
    /// `function`
    Function,
    /// A signature-less procedure.
    Procedure,
    /// A class template.
    Class,
    /// An instance of the named class; empty when the class was never found.
    Object(String),
    /// A type keyword used as a value.
    TypeName,
}

impl Type {
    /// Maps a type keyword to its type.
    ///
    /// Class names are not keywords and yield `None`.
    ///
    /// # Example
    /// ```
    /// use pile::interpreter::value::types::Type;
    ///
    /// assert_eq!(Type::from_keyword("int"), Some(Type::Int));
    /// assert_eq!(Type::from_keyword("Point"), None);
    /// ```
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "void" => Some(Self::Void),
            "bool" => Some(Self::Bool),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "string" => Some(Self::String),
            "macro" => Some(Self::Macro),
            "list" => Some(Self::List),
            "function" => Some(Self::Function),
            _ => None,
        }
    }

    /// Wraps the type into an array type.
    #[must_use]
    pub fn array_of(element: Self) -> Self {
        Self::Array(Box::new(element))
    }

    /// Returns `true` for `bool`, `int` and `float`.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Bool | Self::Int | Self::Float)
    }

    /// Returns the name of the built-in class holding methods for values of
    /// this type, such as `size()`.
    #[must_use]
    pub const fn builtin_class(&self) -> Option<&'static str> {
        match self {
            Self::Array(_) => Some("Array"),
            Self::List => Some("List"),
            Self::String => Some("String"),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => write!(f, "void"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
            Self::Macro => write!(f, "macro"),
            Self::Array(element) => write!(f, "{element}[]"),
            Self::List => write!(f, "list"),
            Self::Function => write!(f, "function"),
            Self::Procedure => write!(f, "procedure"),
            Self::Class => write!(f, "class"),
            Self::Object(name) if name.is_empty() => write!(f, "object"),
            Self::Object(name) => write!(f, "{name}"),
            Self::TypeName => write!(f, "type"),
        }
    }
}

/// Returns `true` if a value of type `src` may be converted to `dst`.
///
/// The table is reflexive; `bool`, `int` and `float` convert among each
/// other; everything else only converts to itself. The one extension is the
/// empty array literal (`void[]`), which converts to any array type.
///
/// This governs implicit argument coercion as well as the explicit casts.
///
/// # Example
/// ```
/// use pile::interpreter::value::types::{Type, is_convertible};
///
/// assert!(is_convertible(&Type::Bool, &Type::Float));
/// assert!(is_convertible(&Type::String, &Type::String));
/// assert!(!is_convertible(&Type::String, &Type::Int));
/// assert!(!is_convertible(&Type::Int, &Type::List));
/// ```
#[must_use]
pub fn is_convertible(src: &Type, dst: &Type) -> bool {
    match (src, dst) {
        _ if src == dst => true,
        (Type::Array(element), Type::Array(_)) => **element == Type::Void,
        _ => src.is_numeric() && dst.is_numeric(),
    }
}

