//! TAC operands: storage locations, constants and temporaries.

use std::{
    collections::HashMap,
    fmt::{self, Display, Formatter},
    rc::Rc,
};

use crate::{
    ast::{CType, Literal, LiteralValue, Object},
    prelude::*,
};

use super::{temp_generator::TempGenerator, OperandType};

/// Operands are shared between every instruction that uses them. Two references denote the
/// same operand if they point to the same allocation (see [`Rc::ptr_eq`]).
pub type OperandRef = Rc<Operand>;

/// A value read or written by an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Operand {
    width: usize,
    ty: OperandType,
    kind: OperandKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperandKind {
    Variable(Variable),
    /// A compile-time scalar, stored as a 64-bit pattern. Floating-point constants hold their
    /// IEEE-754 encoding; integers are sign- or zero-extended according to their class.
    Constant(u64),
    /// A virtual register, resolved to real storage by the register allocator.
    Temporary(usize),
}

/// A storage location. Objects with static storage duration are addressed by name, everything
/// else by its offset from the frame pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Variable {
    Named(String),
    Frame(isize),
}
impl Variable {
    pub fn name(&self) -> Option<&str> {
        match self {
            Variable::Named(name) => Some(name),
            Variable::Frame(_) => None,
        }
    }

    pub fn offset(&self) -> Option<isize> {
        match self {
            Variable::Named(_) => None,
            Variable::Frame(offset) => Some(*offset),
        }
    }
}
impl Display for Variable {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Variable::Named(name) => f.write_str(name),
            Variable::Frame(offset) => write!(f, "fp{:+}", offset),
        }
    }
}

impl Operand {
    /// The storage location of an object.
    pub fn variable(object: &Object) -> Self {
        let variable = match object.storage.frame_offset() {
            Some(offset) => Variable::Frame(offset),
            None => Variable::Named(object.name.clone()),
        };
        Self {
            width: object.ty.width(),
            ty: OperandType::of(&object.ty),
            kind: OperandKind::Variable(variable),
        }
    }

    /// The constant denoted by a literal.
    pub fn constant(literal: &Literal) -> Self {
        let width = literal.ty.width();
        let ty = OperandType::of(&literal.ty);
        let bits = match ty {
            OperandType::Float => encode_float(literal.value, width),
            OperandType::Signed | OperandType::Unsigned => {
                let raw = match literal.value {
                    LiteralValue::Signed(v) => v as u64,
                    LiteralValue::Unsigned(v) => v,
                    LiteralValue::Float(v) if ty == OperandType::Signed => v as i64 as u64,
                    LiteralValue::Float(v) => v as u64,
                };
                extend(raw, width, ty == OperandType::Signed)
            }
            OperandType::Aggregate => match literal.value {
                LiteralValue::Signed(v) => v as u64,
                LiteralValue::Unsigned(v) => v,
                LiteralValue::Float(v) => v.to_bits(),
            },
        };
        Self::with_bits(width, ty, bits)
    }

    fn with_bits(width: usize, ty: OperandType, bits: u64) -> Self {
        Self {
            width,
            ty,
            kind: OperandKind::Constant(bits),
        }
    }

    fn temporary(ty: &CType, id: usize) -> Self {
        Self {
            width: ty.width(),
            ty: OperandType::of(ty),
            kind: OperandKind::Temporary(id),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn ty(&self) -> OperandType {
        self.ty
    }

    pub fn kind(&self) -> &OperandKind {
        &self.kind
    }

    pub fn is_integer(&self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    pub fn is_signed(&self) -> bool {
        self.ty == OperandType::Signed
    }

    pub fn is_unsigned(&self) -> bool {
        self.ty == OperandType::Unsigned
    }

    pub fn is_float(&self) -> bool {
        self.ty == OperandType::Float
    }

    pub fn is_aggregate(&self) -> bool {
        self.ty == OperandType::Aggregate
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match &self.kind {
            OperandKind::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn temp_id(&self) -> Option<usize> {
        match self.kind {
            OperandKind::Temporary(id) => Some(id),
            _ => None,
        }
    }

    /// The raw bit pattern of a constant.
    pub fn bits(&self) -> Option<u64> {
        match self.kind {
            OperandKind::Constant(bits) => Some(bits),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.bits().map(|bits| bits as i64)
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.bits()
    }

    /// The value of a floating-point constant.
    pub fn as_f64(&self) -> Option<f64> {
        if !self.is_float() {
            return None;
        }
        self.bits().map(|bits| {
            if self.width == 4 {
                f32::from_bits(bits as u32) as f64
            } else {
                f64::from_bits(bits)
            }
        })
    }
}
impl Display for Operand {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match &self.kind {
            OperandKind::Variable(v) => v.fmt(f),
            OperandKind::Temporary(id) => write!(f, "t{}", id),
            OperandKind::Constant(bits) => match self.ty {
                OperandType::Signed => write!(f, "{}", *bits as i64),
                OperandType::Unsigned => write!(f, "{}", bits),
                OperandType::Float => write!(f, "{}", self.as_f64().unwrap_or_default()),
                OperandType::Aggregate => write!(f, "{:#x}", bits),
            },
        }
    }
}

fn encode_float(value: LiteralValue, width: usize) -> u64 {
    let value = match value {
        LiteralValue::Signed(v) => v as f64,
        LiteralValue::Unsigned(v) => v as f64,
        LiteralValue::Float(v) => v,
    };
    if width == 4 {
        (value as f32).to_bits() as u64
    } else {
        value.to_bits()
    }
}

/// Truncate `raw` to `width` bytes, then sign- or zero-extend it back to 64 bits.
fn extend(raw: u64, width: usize, signed: bool) -> u64 {
    if width >= 8 {
        return raw;
    }
    let shift = 64 - 8 * width as u32;
    if signed {
        (((raw << shift) as i64) >> shift) as u64
    } else {
        (raw << shift) >> shift
    }
}

/// Creates the operands of one compilation.
///
/// The pool numbers temporaries, hands out the shared `0` and `1` constants and makes sure
/// every storage location is represented by a single operand. It is not thread-safe; functions
/// that are lowered in parallel need a pool each.
#[derive(Debug)]
pub struct OperandPool {
    temps: TempGenerator,
    variables: HashMap<Operand, OperandRef>,
    zero: OperandRef,
    one: OperandRef,
}
impl OperandPool {
    pub fn new() -> Self {
        Self {
            temps: TempGenerator::new(),
            variables: HashMap::new(),
            zero: Rc::new(Operand::with_bits(1, OperandType::Signed, 0)),
            one: Rc::new(Operand::with_bits(1, OperandType::Signed, 1)),
        }
    }

    /// The storage location of `object`. Requesting the same location twice yields the same
    /// operand.
    pub fn variable(&mut self, object: &Object) -> OperandRef {
        let variable = Operand::variable(object);
        self.variables
            .entry(variable.clone())
            .or_insert_with(|| Rc::new(variable))
            .clone()
    }

    pub fn constant(&self, literal: &Literal) -> OperandRef {
        Rc::new(Operand::constant(literal))
    }

    /// A fresh integer constant of type `ty`, for callers that need a specific width.
    pub fn integer(&self, ty: &CType, value: i64) -> OperandRef {
        let value = if ty.is_unsigned_integer() || matches!(ty, CType::Pointer(_)) {
            LiteralValue::Unsigned(value as u64)
        } else {
            LiteralValue::Signed(value)
        };
        self.constant(&Literal::new(ty.clone(), value))
    }

    /// The shared signed `0`. It is one byte wide; request a constant through
    /// [`Self::integer`] if the width matters.
    pub fn zero(&self) -> OperandRef {
        self.zero.clone()
    }

    /// The shared signed `1`, one byte wide.
    pub fn one(&self) -> OperandRef {
        self.one.clone()
    }

    /// A fresh temporary holding a value of type `ty`.
    pub fn temporary(&mut self, ty: &CType) -> OperandRef {
        let temp = Operand::temporary(ty, self.temps.next_temp());
        trace!("New temporary {} : {}", temp, ty);
        Rc::new(temp)
    }

    pub fn temporaries_created(&self) -> usize {
        self.temps.count()
    }
}
impl Default for OperandPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::StorageClass;

    #[test]
    fn temporaries_are_strictly_increasing() {
        let mut pool = OperandPool::new();
        let ids: Vec<_> = (0..5)
            .map(|_| pool.temporary(&CType::Int).temp_id().unwrap())
            .collect();

        assert_eq!(vec![1, 2, 3, 4, 5], ids);
        assert_eq!(5, pool.temporaries_created());
    }

    #[test]
    fn temporary_numbering_restarts_per_pool() {
        let mut first = OperandPool::new();
        first.temporary(&CType::Int);
        first.temporary(&CType::Int);

        let mut second = OperandPool::new();
        assert_eq!("t1", second.temporary(&CType::Int).to_string());
    }

    #[test]
    fn temporaries_take_width_and_class_from_type() {
        let mut pool = OperandPool::new();
        let t = pool.temporary(&CType::Double);

        assert_eq!(8, t.width());
        assert!(t.is_float());
    }

    #[test]
    fn zero_and_one_are_singletons() {
        let pool = OperandPool::new();

        assert!(Rc::ptr_eq(&pool.zero(), &pool.zero()));
        assert!(Rc::ptr_eq(&pool.one(), &pool.one()));
        assert!(!Rc::ptr_eq(&pool.zero(), &pool.one()));
        assert_eq!(Some(0), pool.zero().as_i64());
        assert_eq!(Some(1), pool.one().as_i64());
        assert!(pool.one().is_signed());
        assert_eq!(1, pool.one().width());
    }

    #[test]
    fn globals_and_statics_are_named() {
        let global = Operand::variable(&Object::global("counter", CType::Int));
        let stat = Operand::variable(&Object::new("cache", CType::Long, StorageClass::Static));

        assert_eq!(Some("counter"), global.as_variable().unwrap().name());
        assert_eq!(None, global.as_variable().unwrap().offset());
        assert_eq!("cache", stat.to_string());
    }

    #[test]
    fn locals_and_params_are_frame_relative() {
        let local = Operand::variable(&Object::local("x", CType::Int, -4));
        let param = Operand::variable(&Object::param("p", CType::pointer_to(CType::Char), 16));

        assert_eq!(Some(-4), local.as_variable().unwrap().offset());
        assert_eq!(None, local.as_variable().unwrap().name());
        assert_eq!("fp-4", local.to_string());
        assert_eq!("fp+16", param.to_string());
        assert!(param.is_unsigned());
        assert_eq!(8, param.width());
    }

    #[test]
    fn the_same_location_yields_the_same_operand() {
        let mut pool = OperandPool::new();
        let x = Object::local("x", CType::Int, -4);

        let a = pool.variable(&x);
        let b = pool.variable(&x);
        let other = pool.variable(&Object::local("y", CType::Int, -8));

        assert!(Rc::ptr_eq(&a, &b));
        assert!(!Rc::ptr_eq(&a, &other));
    }

    #[test]
    fn integer_literals_round_trip() {
        for value in [0, 1, -1, 42, i32::MIN as i64, i32::MAX as i64] {
            let c = Operand::constant(&Literal::int(value));
            assert_eq!(Some(value), c.as_i64());
        }

        let big = Literal::new(CType::ULongLong, LiteralValue::Unsigned(u64::MAX));
        assert_eq!(Some(u64::MAX), Operand::constant(&big).as_u64());
    }

    #[test]
    fn narrow_integers_are_extended_by_class() {
        let signed = Literal::new(CType::SChar, LiteralValue::Signed(-1));
        assert_eq!(Some(u64::MAX), Operand::constant(&signed).bits());

        let unsigned = Literal::new(CType::UChar, LiteralValue::Unsigned(255));
        assert_eq!(Some(0xff), Operand::constant(&unsigned).bits());
        assert_eq!("255", Operand::constant(&unsigned).to_string());
    }

    #[test]
    fn float_literals_store_their_ieee_encoding() {
        let d = Operand::constant(&Literal::double(1.5));
        assert_eq!(Some(1.5f64.to_bits()), d.bits());
        assert_eq!(Some(1.5), d.as_f64());
        assert_eq!("1.5", d.to_string());

        let f = Operand::constant(&Literal::new(CType::Float, LiteralValue::Float(0.25)));
        assert_eq!(Some(0.25f32.to_bits() as u64), f.bits());
        assert_eq!(4, f.width());
    }

    #[test]
    fn integer_constants_are_not_floats() {
        assert_eq!(None, Operand::constant(&Literal::int(3)).as_f64());
    }

    #[test]
    fn explicit_width_constants_are_fresh() {
        let pool = OperandPool::new();
        let stride = pool.integer(&CType::ULong, 4);

        assert_eq!(8, stride.width());
        assert!(stride.is_unsigned());
        assert!(!Rc::ptr_eq(&stride, &pool.integer(&CType::ULong, 4)));
    }

    #[test]
    fn classification_queries_are_exclusive() {
        let mut pool = OperandPool::new();
        let operands = [
            pool.temporary(&CType::Int),
            pool.temporary(&CType::UInt),
            pool.temporary(&CType::Float),
            pool.temporary(&CType::array_of(CType::Int, 2)),
        ];

        for op in operands.iter() {
            let flags = [op.is_signed(), op.is_unsigned(), op.is_float(), op.is_aggregate()];
            assert_eq!(1, flags.iter().filter(|f| **f).count(), "{:?}", op);
            assert_eq!(op.is_integer(), op.is_signed() || op.is_unsigned());
        }
    }
}
