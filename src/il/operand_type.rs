use std::fmt::{self, Display, Formatter};

use crate::ast::CType;

/// The representation class of an operand. Selects signed/unsigned/float semantics for
/// comparisons, shifts, division and conversions in the back end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandType {
    Signed,
    Unsigned,
    Float,
    Aggregate,
}
impl OperandType {
    /// Classify a C type. Pointers and `_Bool` are unsigned integers; arrays, records and
    /// function designators are aggregates.
    pub fn of(ty: &CType) -> Self {
        match ty {
            CType::Char
            | CType::SChar
            | CType::Short
            | CType::Int
            | CType::Long
            | CType::LongLong
            | CType::Enum(_) => OperandType::Signed,
            CType::Bool
            | CType::UChar
            | CType::UShort
            | CType::UInt
            | CType::ULong
            | CType::ULongLong
            | CType::Pointer(_) => OperandType::Unsigned,
            CType::Float | CType::Double | CType::LongDouble => OperandType::Float,
            CType::Array(..)
            | CType::Struct { .. }
            | CType::Union { .. }
            | CType::Function { .. } => OperandType::Aggregate,
        }
    }
}
impl From<&CType> for OperandType {
    fn from(ty: &CType) -> Self {
        Self::of(ty)
    }
}
impl Display for OperandType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            OperandType::Signed => f.write_str("signed"),
            OperandType::Unsigned => f.write_str("unsigned"),
            OperandType::Float => f.write_str("float"),
            OperandType::Aggregate => f.write_str("aggregate"),
        }
    }
}
