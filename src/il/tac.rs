//! Three-Address Code

use std::{
    fmt::{self, Display, Formatter},
    rc::Rc,
};

use crate::listing::{Listing, Position};

use super::{ForwardLabel, Operand, OperandRef, Operator};

pub type TacListing = Listing<TacInstr>;

impl Listing<TacInstr> {
    /// Whether `operand` is read by the instruction at `position` or by any instruction after it.
    pub fn is_read_after(&self, operand: &OperandRef, position: Position) -> bool {
        if position.index() >= self.len() {
            return false;
        }

        self.iter_lines()
            .skip_while(|(l, _)| l < &position)
            .any(|(_, instr)| instr.reads_operand(operand))
    }
}

/// The destination of a jump. Backward jumps are resolved on creation; forward jumps start
/// out pending and are patched when their label is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpTarget {
    Resolved(Position),
    Pending(ForwardLabel),
}
impl JumpTarget {
    pub fn position(&self) -> Option<Position> {
        match self {
            JumpTarget::Resolved(position) => Some(*position),
            JumpTarget::Pending(_) => None,
        }
    }
}
impl From<Position> for JumpTarget {
    fn from(position: Position) -> Self {
        JumpTarget::Resolved(position)
    }
}
impl From<ForwardLabel> for JumpTarget {
    fn from(label: ForwardLabel) -> Self {
        JumpTarget::Pending(label)
    }
}
impl Display for JumpTarget {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            JumpTarget::Resolved(position) => write!(f, "L{}", position),
            JumpTarget::Pending(label) => label.fmt(f),
        }
    }
}

/// The third operand slot of an instruction. Which alternative is present is decided by the
/// instruction's operator alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot<'a> {
    Empty,
    /// The right-hand operand of a binary operator.
    Right(&'a OperandRef),
    /// A byte offset for subscripted assignments, or the argument count of a call.
    Offset(isize),
    Target(&'a JumpTarget),
}

/// A single TAC instruction.
///
/// Instructions should be built through the constructor functions, which reject operand
/// combinations the back end cannot lower.
#[derive(Debug, Clone, PartialEq)]
pub enum TacInstr {
    /// `dest = lhs op rhs`
    Binary {
        op: Operator,
        dest: OperandRef,
        lhs: OperandRef,
        rhs: OperandRef,
    },
    /// `dest = src`
    Assign { dest: OperandRef, src: OperandRef },
    /// `dest[offset] = src`
    DesSsAssign {
        dest: OperandRef,
        src: OperandRef,
        offset: isize,
    },
    /// `dest = src[offset]`
    SrcSsAssign {
        dest: OperandRef,
        src: OperandRef,
        offset: isize,
    },
    /// `*dest = src`
    DerefAssign { dest: OperandRef, src: OperandRef },
    /// `dest = op src`. Increments and decrements also write `src` back.
    Unary {
        op: Operator,
        dest: OperandRef,
        src: OperandRef,
    },
    /// Pass the next argument of the following call, in declaration order.
    Param(OperandRef),
    /// Call `callee` with the `argc` preceding parameters.
    Call {
        dest: Option<OperandRef>,
        callee: OperandRef,
        argc: usize,
    },
    Jump(JumpTarget),
    /// Jump if `cond` is nonzero.
    If(OperandRef, JumpTarget),
    /// Jump if `cond` is zero.
    IfFalse(OperandRef, JumpTarget),
    /// A jump destination. Does nothing when executed.
    Label,
}

impl TacInstr {
    pub fn binary(op: Operator, dest: OperandRef, lhs: OperandRef, rhs: OperandRef) -> Self {
        Self::Binary { op, dest, lhs, rhs }.checked()
    }

    pub fn unary(op: Operator, dest: OperandRef, src: OperandRef) -> Self {
        Self::Unary { op, dest, src }.checked()
    }

    pub fn assign(dest: OperandRef, src: OperandRef) -> Self {
        Self::Assign { dest, src }.checked()
    }

    pub fn des_ss_assign(dest: OperandRef, src: OperandRef, offset: isize) -> Self {
        Self::DesSsAssign { dest, src, offset }.checked()
    }

    pub fn src_ss_assign(dest: OperandRef, src: OperandRef, offset: isize) -> Self {
        Self::SrcSsAssign { dest, src, offset }.checked()
    }

    pub fn deref_assign(dest: OperandRef, src: OperandRef) -> Self {
        Self::DerefAssign { dest, src }.checked()
    }

    pub fn param(arg: OperandRef) -> Self {
        Self::Param(arg)
    }

    pub fn call(dest: Option<OperandRef>, callee: OperandRef, argc: usize) -> Self {
        Self::Call { dest, callee, argc }
    }

    pub fn jump<T: Into<JumpTarget>>(target: T) -> Self {
        Self::Jump(target.into())
    }

    pub fn if_true<T: Into<JumpTarget>>(cond: OperandRef, target: T) -> Self {
        Self::If(cond, target.into()).checked()
    }

    pub fn if_false<T: Into<JumpTarget>>(cond: OperandRef, target: T) -> Self {
        Self::IfFalse(cond, target.into()).checked()
    }

    pub fn label() -> Self {
        Self::Label
    }

    fn checked(self) -> Self {
        if let Err(message) = self.check_operands() {
            panic!("Internal compiler error! {} in '{}'", message, self);
        }
        self
    }

    /// Check that the operator and operand classes fit together.
    pub(crate) fn check_operands(&self) -> Result<(), String> {
        match self {
            Self::Binary { op, dest, lhs, rhs } => {
                if !op.is_binary() {
                    return Err(format!("'{}' is not a binary operator", op));
                }
                for operand in [dest, lhs, rhs] {
                    scalar(*op, operand)?;
                }
                if op.is_integer_only() {
                    integer(*op, lhs)?;
                    integer(*op, rhs)?;
                }
            }
            Self::Unary { op, dest, src } => match op {
                Operator::Addr => integer(*op, dest)?,
                Operator::Deref => integer(*op, src)?,
                Operator::Compt => {
                    integer(*op, dest)?;
                    integer(*op, src)?;
                }
                Operator::Cast | Operator::Plus | Operator::Minus | Operator::Not => {
                    scalar(*op, dest)?;
                    scalar(*op, src)?;
                }
                op if op.is_step() => {
                    scalar(*op, dest)?;
                    scalar(*op, src)?;
                    if src.bits().is_some() {
                        return Err(format!("'{}' cannot modify the constant {}", op, src));
                    }
                }
                op => return Err(format!("'{}' is not a unary operator", op)),
            },
            Self::DerefAssign { dest, .. } => integer(Operator::DerefAssign, dest)?,
            Self::If(cond, _) => scalar(Operator::If, cond)?,
            Self::IfFalse(cond, _) => scalar(Operator::IfFalse, cond)?,
            Self::Assign { .. }
            | Self::DesSsAssign { .. }
            | Self::SrcSsAssign { .. }
            | Self::Param(_)
            | Self::Call { .. }
            | Self::Jump(_)
            | Self::Label => (),
        }
        Ok(())
    }

    pub fn operator(&self) -> Operator {
        match self {
            Self::Binary { op, .. } | Self::Unary { op, .. } => *op,
            Self::Assign { .. } => Operator::Assign,
            Self::DesSsAssign { .. } => Operator::DesSsAssign,
            Self::SrcSsAssign { .. } => Operator::SrcSsAssign,
            Self::DerefAssign { .. } => Operator::DerefAssign,
            Self::Param(_) => Operator::Param,
            Self::Call { .. } => Operator::Call,
            Self::Jump(_) => Operator::Jump,
            Self::If(..) => Operator::If,
            Self::IfFalse(..) => Operator::IfFalse,
            Self::Label => Operator::Label,
        }
    }

    /// The destination slot.
    pub fn dest(&self) -> Option<&OperandRef> {
        match self {
            Self::Binary { dest, .. }
            | Self::Unary { dest, .. }
            | Self::Assign { dest, .. }
            | Self::DesSsAssign { dest, .. }
            | Self::SrcSsAssign { dest, .. }
            | Self::DerefAssign { dest, .. } => Some(dest),
            Self::Call { dest, .. } => dest.as_ref(),
            Self::Param(_) | Self::Jump(_) | Self::If(..) | Self::IfFalse(..) | Self::Label => {
                None
            }
        }
    }

    /// The left operand slot: the source of assignments and unary operators, the argument of a
    /// parameter, the callee of a call and the condition of a conditional jump.
    pub fn lhs(&self) -> Option<&OperandRef> {
        match self {
            Self::Binary { lhs, .. } => Some(lhs),
            Self::Unary { src, .. }
            | Self::Assign { src, .. }
            | Self::DesSsAssign { src, .. }
            | Self::SrcSsAssign { src, .. }
            | Self::DerefAssign { src, .. } => Some(src),
            Self::Param(arg) => Some(arg),
            Self::Call { callee, .. } => Some(callee),
            Self::If(cond, _) | Self::IfFalse(cond, _) => Some(cond),
            Self::Jump(_) | Self::Label => None,
        }
    }

    pub fn slot(&self) -> Slot {
        match self {
            Self::Binary { rhs, .. } => Slot::Right(rhs),
            Self::DesSsAssign { offset, .. } | Self::SrcSsAssign { offset, .. } => {
                Slot::Offset(*offset)
            }
            Self::Call { argc, .. } => Slot::Offset(*argc as isize),
            Self::Jump(target) | Self::If(_, target) | Self::IfFalse(_, target) => {
                Slot::Target(target)
            }
            Self::Unary { .. }
            | Self::Assign { .. }
            | Self::DerefAssign { .. }
            | Self::Param(_)
            | Self::Label => Slot::Empty,
        }
    }

    pub fn target(&self) -> Option<&JumpTarget> {
        match self {
            Self::Jump(target) | Self::If(_, target) | Self::IfFalse(_, target) => Some(target),
            _ => None,
        }
    }

    pub(crate) fn target_mut(&mut self) -> Option<&mut JumpTarget> {
        match self {
            Self::Jump(target) | Self::If(_, target) | Self::IfFalse(_, target) => Some(target),
            _ => None,
        }
    }

    pub fn is_jump(&self) -> bool {
        self.target().is_some()
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Self::Label)
    }

    /// The operands whose values this instruction reads. A store through a pointer reads the
    /// pointer.
    pub fn reads(&self) -> Vec<&OperandRef> {
        match self {
            Self::Binary { lhs, rhs, .. } => vec![lhs, rhs],
            Self::Unary { src, .. }
            | Self::Assign { src, .. }
            | Self::DesSsAssign { src, .. }
            | Self::SrcSsAssign { src, .. } => vec![src],
            Self::DerefAssign { dest, src } => vec![dest, src],
            Self::Param(arg) => vec![arg],
            Self::Call { callee, .. } => vec![callee],
            Self::If(cond, _) | Self::IfFalse(cond, _) => vec![cond],
            Self::Jump(_) | Self::Label => vec![],
        }
    }

    /// The operands this instruction writes to.
    pub fn writes(&self) -> Vec<&OperandRef> {
        match self {
            Self::Unary { op, dest, src } if op.is_step() => vec![dest, src],
            Self::Binary { dest, .. }
            | Self::Unary { dest, .. }
            | Self::Assign { dest, .. }
            | Self::DesSsAssign { dest, .. }
            | Self::SrcSsAssign { dest, .. } => vec![dest],
            Self::Call { dest, .. } => dest.iter().collect(),
            Self::DerefAssign { .. }
            | Self::Param(_)
            | Self::Jump(_)
            | Self::If(..)
            | Self::IfFalse(..)
            | Self::Label => vec![],
        }
    }

    pub fn reads_operand(&self, operand: &OperandRef) -> bool {
        self.reads().into_iter().any(|r| Rc::ptr_eq(r, operand))
    }

    pub fn as_call(&self) -> Option<(Option<&OperandRef>, &OperandRef, usize)> {
        match self {
            Self::Call { dest, callee, argc } => Some((dest.as_ref(), callee, *argc)),
            _ => None,
        }
    }
}

fn scalar(op: Operator, operand: &Operand) -> Result<(), String> {
    if operand.is_aggregate() {
        Err(format!("'{}' cannot take the aggregate operand {}", op, operand))
    } else {
        Ok(())
    }
}

fn integer(op: Operator, operand: &Operand) -> Result<(), String> {
    if operand.is_integer() {
        Ok(())
    } else {
        Err(format!(
            "'{}' requires an integer operand, found {} {}",
            op,
            operand.ty(),
            operand
        ))
    }
}

impl Display for TacInstr {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Binary { op, dest, lhs, rhs } => write!(f, "{} = {} {} {}", dest, lhs, op, rhs),
            Self::Unary { op, dest, src } => match op {
                Operator::PostInc | Operator::PostDec => write!(f, "{} = {}{}", dest, src, op),
                Operator::Cast => write!(f, "{} = cast {}", dest, src),
                _ => write!(f, "{} = {}{}", dest, op, src),
            },
            Self::Assign { dest, src } => write!(f, "{} = {}", dest, src),
            Self::DesSsAssign { dest, src, offset } => {
                write!(f, "{}[{}] = {}", dest, offset, src)
            }
            Self::SrcSsAssign { dest, src, offset } => {
                write!(f, "{} = {}[{}]", dest, src, offset)
            }
            Self::DerefAssign { dest, src } => write!(f, "*{} = {}", dest, src),
            Self::Param(arg) => write!(f, "param {}", arg),
            Self::Call {
                dest: Some(dest),
                callee,
                argc,
            } => write!(f, "{} = call {}, {}", dest, callee, argc),
            Self::Call {
                dest: None,
                callee,
                argc,
            } => write!(f, "call {}, {}", callee, argc),
            Self::Jump(target) => write!(f, "goto {}", target),
            Self::If(cond, target) => write!(f, "if {} goto {}", cond, target),
            Self::IfFalse(cond, target) => write!(f, "if_false {} goto {}", cond, target),
            Self::Label => f.write_str("label"),
        }
    }
}

pub struct LineNumberIter<I, F> {
    iter: I,
    f: F,
}
impl<A, B, I, F> Iterator for LineNumberIter<I, F>
where
    I: Iterator<Item = (Position, A)>,
    F: FnMut(A) -> Option<B>,
{
    type Item = (Position, B);

    fn next(&mut self) -> Option<(Position, B)> {
        self.iter
            .find_map(|(line, a)| (self.f)(a).map(|x| (line, x)))
    }
}

/// Select the lines of a listing that match a pattern, keeping their positions.
pub trait MatchInstruction<A, I> {
    fn match_instruction<P, B>(self, pred: P) -> LineNumberIter<I, P>
    where
        P: Fn(A) -> Option<B>;
}
impl<'a, I> MatchInstruction<&'a TacInstr, I> for I
where
    I: Iterator<Item = (Position, &'a TacInstr)>,
{
    fn match_instruction<P, B>(self, pred: P) -> LineNumberIter<I, P>
    where
        P: Fn(&'a TacInstr) -> Option<B>,
    {
        LineNumberIter {
            iter: self,
            f: pred,
        }
    }
}
