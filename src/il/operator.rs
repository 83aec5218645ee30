use std::fmt::{self, Display, Formatter};

/// Every TAC opcode. Each maps onto one machine instruction, or onto a short fixed sequence of
/// them (e.g. `PostInc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // Binary
    Add,
    Sub,
    Mul,
    Div,
    Less,
    Greater,
    Eq,
    Ne,
    Le,
    Ge,
    LShift,
    RShift,
    Or,
    And,
    Xor,

    // Assignment
    /// `x = y`
    Assign,
    /// `x[n] = y`: store `n` bytes after the start of `x`.
    DesSsAssign,
    /// `x = y[n]`
    SrcSsAssign,
    /// `*x = y`
    DerefAssign,

    // Unary
    PreInc,
    PostInc,
    PreDec,
    PostDec,
    Plus,
    Minus,
    Addr,
    Deref,
    Compt,
    Not,
    Cast,

    // Function
    Param,
    Call,

    // Jump
    Jump,
    If,
    IfFalse,
    Label,
}

/// Operators that share an operand layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpGroup {
    /// `dest = lhs op rhs`
    Binary,
    /// `dest = lhs`, `dest[n] = lhs`, `dest = lhs[n]`, `*dest = lhs`
    Assignment,
    /// `dest = op lhs`
    Unary,
    /// `param lhs`, `dest = call lhs, n`
    Call,
    /// `goto target`, `if lhs goto target`, and labels.
    ControlFlow,
}

impl Operator {
    pub fn group(self) -> OpGroup {
        use Operator::*;
        match self {
            Add | Sub | Mul | Div | Less | Greater | Eq | Ne | Le | Ge | LShift | RShift | Or
            | And | Xor => OpGroup::Binary,
            Assign | DesSsAssign | SrcSsAssign | DerefAssign => OpGroup::Assignment,
            PreInc | PostInc | PreDec | PostDec | Plus | Minus | Addr | Deref | Compt | Not
            | Cast => OpGroup::Unary,
            Param | Call => OpGroup::Call,
            Jump | If | IfFalse | Label => OpGroup::ControlFlow,
        }
    }

    pub fn is_binary(self) -> bool {
        self.group() == OpGroup::Binary
    }

    pub fn is_unary(self) -> bool {
        self.group() == OpGroup::Unary
    }

    /// Comparisons produce a truth value rather than a value of their operands' type.
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            Operator::Less
                | Operator::Greater
                | Operator::Eq
                | Operator::Ne
                | Operator::Le
                | Operator::Ge
        )
    }

    /// Operators that are only defined on integer operands.
    pub fn is_integer_only(self) -> bool {
        matches!(
            self,
            Operator::LShift
                | Operator::RShift
                | Operator::Or
                | Operator::And
                | Operator::Xor
                | Operator::Compt
        )
    }

    /// Increments and decrements, which write back to their operand.
    pub fn is_step(self) -> bool {
        matches!(
            self,
            Operator::PreInc | Operator::PostInc | Operator::PreDec | Operator::PostDec
        )
    }

    /// Conditional and unconditional jumps.
    pub fn is_jump(self) -> bool {
        matches!(self, Operator::Jump | Operator::If | Operator::IfFalse)
    }

    pub fn symbol(self) -> &'static str {
        use Operator::*;
        match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Less => "<",
            Greater => ">",
            Eq => "==",
            Ne => "!=",
            Le => "<=",
            Ge => ">=",
            LShift => "<<",
            RShift => ">>",
            Or => "|",
            And => "&",
            Xor => "^",
            Assign => "=",
            DesSsAssign => "[]=",
            SrcSsAssign => "=[]",
            DerefAssign => "*=",
            PreInc | PostInc => "++",
            PreDec | PostDec => "--",
            Plus => "+",
            Minus => "-",
            Addr => "&",
            Deref => "*",
            Compt => "~",
            Not => "!",
            Cast => "cast",
            Param => "param",
            Call => "call",
            Jump => "goto",
            If => "if",
            IfFalse => "if_false",
            Label => "label",
        }
    }
}
impl Display for Operator {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators_are_grouped_by_layout() {
        assert_eq!(OpGroup::Binary, Operator::Xor.group());
        assert_eq!(OpGroup::Assignment, Operator::SrcSsAssign.group());
        assert_eq!(OpGroup::Unary, Operator::PostDec.group());
        assert_eq!(OpGroup::Unary, Operator::Cast.group());
        assert_eq!(OpGroup::Call, Operator::Param.group());
        assert_eq!(OpGroup::ControlFlow, Operator::Label.group());
    }

    #[test]
    fn labels_are_not_jumps() {
        assert!(Operator::IfFalse.is_jump());
        assert!(!Operator::Label.is_jump());
    }

    #[test]
    fn only_comparisons_are_relational() {
        assert!(Operator::Le.is_relational());
        assert!(!Operator::Sub.is_relational());
        assert!(!Operator::Less.is_integer_only());
        assert!(Operator::RShift.is_integer_only());
    }
}
