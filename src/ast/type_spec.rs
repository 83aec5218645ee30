//! C type specifications, as resolved by the type checker.
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// A fully resolved C type. Sizes follow the LP64 data model.
///
/// `void` only appears as the missing return type of a function, so every value of this type
/// describes something that can be stored in an operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CType {
    Bool,
    /// Plain `char`, which is signed on the target.
    Char,
    SChar,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
    Enum(String),
    Float,
    Double,
    LongDouble,
    Pointer(Box<CType>),
    Array(Box<CType>, usize),
    Struct { name: String, size: usize },
    Union { name: String, size: usize },
    Function {
        ret: Option<Box<CType>>,
        params: Vec<CType>,
    },
}
impl CType {
    pub fn pointer_to(pointee: CType) -> Self {
        CType::Pointer(Box::new(pointee))
    }

    pub fn array_of(elem: CType, len: usize) -> Self {
        CType::Array(Box::new(elem), len)
    }

    /// The storage size of a value of this type in bytes. Never zero: incomplete arrays and
    /// empty records still occupy one byte, and function designators are one byte wide.
    pub fn width(&self) -> usize {
        match self {
            CType::Bool | CType::Char | CType::SChar | CType::UChar => 1,
            CType::Short | CType::UShort => 2,
            CType::Int | CType::UInt | CType::Enum(_) | CType::Float => 4,
            CType::Long | CType::ULong | CType::LongLong | CType::ULongLong => 8,
            CType::Double | CType::Pointer(_) => 8,
            CType::LongDouble => 16,
            CType::Array(elem, len) => (elem.width() * len).max(1),
            CType::Struct { size, .. } | CType::Union { size, .. } => (*size).max(1),
            CType::Function { .. } => 1,
        }
    }

    pub fn is_unsigned_integer(&self) -> bool {
        matches!(
            self,
            CType::Bool
                | CType::UChar
                | CType::UShort
                | CType::UInt
                | CType::ULong
                | CType::ULongLong
        )
    }

    pub fn is_signed_integer(&self) -> bool {
        matches!(
            self,
            CType::Char
                | CType::SChar
                | CType::Short
                | CType::Int
                | CType::Long
                | CType::LongLong
                | CType::Enum(_)
        )
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, CType::Float | CType::Double | CType::LongDouble)
    }

    pub fn is_scalar(&self) -> bool {
        self.is_signed_integer()
            || self.is_unsigned_integer()
            || self.is_floating()
            || matches!(self, CType::Pointer(_))
    }
}
impl Display for CType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            CType::Bool => f.write_str("_Bool"),
            CType::Char => f.write_str("char"),
            CType::SChar => f.write_str("signed char"),
            CType::UChar => f.write_str("unsigned char"),
            CType::Short => f.write_str("short"),
            CType::UShort => f.write_str("unsigned short"),
            CType::Int => f.write_str("int"),
            CType::UInt => f.write_str("unsigned int"),
            CType::Long => f.write_str("long"),
            CType::ULong => f.write_str("unsigned long"),
            CType::LongLong => f.write_str("long long"),
            CType::ULongLong => f.write_str("unsigned long long"),
            CType::Enum(name) => write!(f, "enum {}", name),
            CType::Float => f.write_str("float"),
            CType::Double => f.write_str("double"),
            CType::LongDouble => f.write_str("long double"),
            CType::Pointer(inner) => write!(f, "{}*", inner),
            CType::Array(inner, len) => write!(f, "{}[{}]", inner, len),
            CType::Struct { name, .. } => write!(f, "struct {}", name),
            CType::Union { name, .. } => write!(f, "union {}", name),
            CType::Function { ret, params } => {
                match ret {
                    Some(ret) => write!(f, "{}(", ret)?,
                    None => f.write_str("void(")?,
                }
                let params = params
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{})", params)
            }
        }
    }
}
impl FromStr for CType {
    type Err = ();

    /// Parses the name of an arithmetic type.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "_Bool" => CType::Bool,
            "char" => CType::Char,
            "signed char" => CType::SChar,
            "unsigned char" => CType::UChar,
            "short" | "signed short" => CType::Short,
            "unsigned short" => CType::UShort,
            "int" | "signed" | "signed int" => CType::Int,
            "unsigned" | "unsigned int" => CType::UInt,
            "long" | "signed long" => CType::Long,
            "unsigned long" => CType::ULong,
            "long long" | "signed long long" => CType::LongLong,
            "unsigned long long" => CType::ULongLong,
            "float" => CType::Float,
            "double" => CType::Double,
            "long double" => CType::LongDouble,
            _ => return Err(()),
        })
    }
}
