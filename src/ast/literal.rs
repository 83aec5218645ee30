use std::fmt::{self, Display, Formatter};

use super::CType;

/// The value of a constant as written in the source, after the front end has range-checked it
/// against its type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}
impl Display for LiteralValue {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            LiteralValue::Signed(v) => write!(f, "{}", v),
            LiteralValue::Unsigned(v) => write!(f, "{}", v),
            LiteralValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// A typed constant node.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub ty: CType,
    pub value: LiteralValue,
}
impl Literal {
    pub fn new(ty: CType, value: LiteralValue) -> Self {
        Self { ty, value }
    }

    pub fn int(value: i64) -> Self {
        Self::new(CType::Int, LiteralValue::Signed(value))
    }

    pub fn double(value: f64) -> Self {
        Self::new(CType::Double, LiteralValue::Float(value))
    }
}
impl Display for Literal {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "({}) {}", self.ty, self.value)
    }
}
