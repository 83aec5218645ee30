use std::collections::{BTreeMap, HashMap};

use crate::{error::IrError, listing::Position, prelude::*};

use super::{
    label_generator::LabelGenerator, verify, ForwardLabel, JumpTarget, TacFunction, TacInstr,
    TacListing,
};

/// Builds the instruction stream of one function.
///
/// Jumps may refer to instructions that have already been emitted, or to a [`ForwardLabel`]
/// that is bound later on. Every forward label that is jumped to must be bound before
/// [`Self::finish`] is called.
#[derive(Debug, Default)]
pub struct TacBuilder {
    listing: TacListing,
    labels: LabelGenerator,
    bound: HashMap<ForwardLabel, Position>,
    pending: BTreeMap<ForwardLabel, Vec<Position>>,
}
impl TacBuilder {
    pub fn new() -> Self {
        Self {
            listing: TacListing::new(),
            labels: LabelGenerator::new(),
            bound: HashMap::new(),
            pending: BTreeMap::new(),
        }
    }

    /// Emit an instruction, adding it to the listing. Jumps to labels that are already bound
    /// are resolved immediately.
    pub fn emit(&mut self, mut instr: TacInstr) -> Position {
        let at = self.listing.next_position();

        if let Some(target) = instr.target_mut() {
            match *target {
                JumpTarget::Resolved(position) => assert!(
                    self.listing.contains(position),
                    "Internal compiler error! Jump at {} to {}, which has not been emitted",
                    at,
                    position
                ),
                JumpTarget::Pending(label) => match self.bound.get(&label) {
                    Some(position) => *target = JumpTarget::Resolved(*position),
                    None => self.pending.entry(label).or_default().push(at),
                },
            }
        }

        trace!("{}: {}", at, instr);
        self.listing.push(instr)
    }

    /// Emit a label that later instructions can jump back to.
    pub fn label(&mut self) -> Position {
        self.emit(TacInstr::label())
    }

    /// Reserve a label that will be bound further down the stream.
    pub fn forward_label(&mut self) -> ForwardLabel {
        self.labels.next_label()
    }

    /// Emit the label instruction for `label` and patch every jump already waiting for it.
    pub fn bind(&mut self, label: ForwardLabel) -> Position {
        assert!(
            !self.bound.contains_key(&label),
            "Internal compiler error! Label {} is bound twice",
            label
        );

        let position = self.label();
        self.bound.insert(label, position);

        if let Some(uses) = self.pending.remove(&label) {
            debug!("Patching {} jump(s) to {} with {}", uses.len(), label, position);
            for at in uses {
                if let Some(target) = self.listing.get_mut(at).and_then(TacInstr::target_mut) {
                    *target = JumpTarget::Resolved(position);
                }
            }
        }

        position
    }

    /// The position a label was bound to.
    pub fn position_of(&self, label: ForwardLabel) -> Option<Position> {
        self.bound.get(&label).copied()
    }

    /// Whether every jump emitted so far has a resolved target.
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn listing(&self) -> &TacListing {
        &self.listing
    }

    pub fn len(&self) -> usize {
        self.listing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listing.is_empty()
    }

    /// Close the stream. Fails if any jump still waits for its label, or if the stream is
    /// otherwise ill-formed.
    pub fn finish(self) -> Result<TacFunction, IrError> {
        if let Some((label, uses)) = self.pending.into_iter().next() {
            error!("Label {} is used at {} place(s) but was never bound", label, uses.len());
            return Err(IrError::UnresolvedJump { label, uses });
        }

        verify::verify(&self.listing)?;
        debug!("Finished stream of {} instructions", self.listing.len());
        Ok(TacFunction::new(self.listing))
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::{
        ast::{CType, Literal, Object},
        il::{OperandPool, Operator, Slot},
    };

    #[test]
    fn simple_assignment_generates_tac() {
        // x = 1 + 2, with x an int at fp-4
        let mut pool = OperandPool::new();
        let mut tac = TacBuilder::new();
        let x = pool.variable(&Object::local("x", CType::Int, -4));
        let one = pool.constant(&Literal::int(1));
        let two = pool.constant(&Literal::int(2));

        let t1 = pool.temporary(&CType::Int);
        tac.emit(TacInstr::binary(Operator::Add, t1.clone(), one, two));
        tac.emit(TacInstr::assign(x.clone(), t1.clone()));
        let function = tac.finish().unwrap();

        let lines: Vec<_> = function.instructions().map(ToString::to_string).collect();
        assert_eq!(vec!["t1 = 1 + 2", "fp-4 = t1"], lines);

        let add = function.get(Position(0)).unwrap();
        assert_eq!(Operator::Add, add.operator());
        assert_eq!(Some(1), add.lhs().and_then(|l| l.as_i64()));
        assert!(matches!(add.slot(), Slot::Right(r) if r.as_i64() == Some(2)));

        let assign = function.get(Position(1)).unwrap();
        assert_eq!(Operator::Assign, assign.operator());
        assert!(Rc::ptr_eq(assign.dest().unwrap(), &x));
        assert!(Rc::ptr_eq(assign.lhs().unwrap(), &t1));
    }

    #[test]
    fn forward_jump_is_patched_when_label_is_bound() {
        // if (a < b) goto L; x = 0; L:
        let mut pool = OperandPool::new();
        let mut tac = TacBuilder::new();
        let a = pool.variable(&Object::local("a", CType::Int, -4));
        let b = pool.variable(&Object::local("b", CType::Int, -8));
        let x = pool.variable(&Object::local("x", CType::Int, -12));
        let end = tac.forward_label();

        let cond = pool.temporary(&CType::Int);
        tac.emit(TacInstr::binary(Operator::Less, cond.clone(), a, b));
        let jump = tac.emit(TacInstr::if_false(cond.clone(), end));
        tac.emit(TacInstr::assign(x, pool.zero()));
        assert!(!tac.is_complete());

        let label = tac.bind(end);
        assert!(tac.is_complete());
        let function = tac.finish().unwrap();

        let instr = function.get(jump).unwrap();
        assert_eq!(Operator::IfFalse, instr.operator());
        assert!(Rc::ptr_eq(instr.lhs().unwrap(), &cond));
        assert_eq!(Some(label), instr.target().and_then(JumpTarget::position));
        assert!(function.get(label).unwrap().is_label());
        assert_eq!(
            "t1 = fp-4 < fp-8\nif_false t1 goto L3\nfp-12 = 0\nlabel\n",
            function.listing().to_string()
        );
    }

    #[test]
    fn jumps_to_bound_labels_resolve_immediately() {
        // while (1) {}
        let pool = OperandPool::new();
        let mut tac = TacBuilder::new();
        let top = tac.forward_label();
        let top_pos = tac.bind(top);
        let jump = tac.emit(TacInstr::if_true(pool.one(), top));
        let back = tac.emit(TacInstr::jump(top_pos));

        assert!(tac.is_complete());
        assert_eq!(Some(top_pos), tac.position_of(top));
        let function = tac.finish().unwrap();
        for at in [jump, back] {
            assert_eq!(
                Some(top_pos),
                function.get(at).unwrap().target().and_then(JumpTarget::position)
            );
        }
    }

    #[test]
    fn post_increment_yields_previous_value() {
        // t1 = x++, with x an int at fp-8
        let mut pool = OperandPool::new();
        let mut tac = TacBuilder::new();
        let x = pool.variable(&Object::local("x", CType::Int, -8));

        let t1 = pool.temporary(&CType::Int);
        let at = tac.emit(TacInstr::unary(Operator::PostInc, t1.clone(), x.clone()));
        let function = tac.finish().unwrap();

        let instr = function.get(at).unwrap();
        assert_eq!(Operator::PostInc, instr.operator());
        assert!(Rc::ptr_eq(instr.dest().unwrap(), &t1));
        assert!(Rc::ptr_eq(instr.lhs().unwrap(), &x));
        assert!(instr.writes().iter().any(|w| Rc::ptr_eq(w, &x)));
        assert_eq!(Some(-8), x.as_variable().and_then(|v| v.offset()));
        assert_eq!(4, x.width());
    }

    #[test]
    fn call_is_preceded_by_its_parameters() {
        // f(a, b)
        let mut pool = OperandPool::new();
        let mut tac = TacBuilder::new();
        let f = pool.variable(&Object::global(
            "f",
            CType::Function {
                ret: Some(Box::new(CType::Int)),
                params: vec![CType::Int, CType::Int],
            },
        ));
        let a = pool.variable(&Object::local("a", CType::Int, -4));
        let b = pool.variable(&Object::local("b", CType::Int, -8));

        tac.emit(TacInstr::param(a.clone()));
        tac.emit(TacInstr::param(b.clone()));
        let result = pool.temporary(&CType::Int);
        tac.emit(TacInstr::call(Some(result.clone()), f.clone(), 2));
        let function = tac.finish().unwrap();

        let ops: Vec<_> = function.instructions().map(TacInstr::operator).collect();
        assert_eq!(vec![Operator::Param, Operator::Param, Operator::Call], ops);
        assert!(Rc::ptr_eq(function.get(Position(0)).unwrap().lhs().unwrap(), &a));
        assert!(Rc::ptr_eq(function.get(Position(1)).unwrap().lhs().unwrap(), &b));

        let call = function.get(Position(2)).unwrap();
        assert_eq!(Slot::Offset(2), call.slot());
        assert!(Rc::ptr_eq(call.lhs().unwrap(), &f));
        assert!(Rc::ptr_eq(call.dest().unwrap(), &result));
    }

    #[test]
    fn unbound_label_fails_finish() {
        let mut tac = TacBuilder::new();
        let lbl = tac.forward_label();
        tac.emit(TacInstr::jump(lbl));
        tac.emit(TacInstr::jump(lbl));

        assert_eq!(
            Err(IrError::UnresolvedJump {
                label: lbl,
                uses: vec![Position(0), Position(1)],
            }),
            tac.finish().map(|_| ())
        );
    }

    #[test]
    fn unused_forward_labels_are_harmless() {
        let mut tac = TacBuilder::new();
        tac.forward_label();
        tac.label();

        assert_eq!(1, tac.finish().unwrap().len());
    }

    #[test]
    #[should_panic(expected = "bound twice")]
    fn labels_cannot_be_bound_twice() {
        let mut tac = TacBuilder::new();
        let lbl = tac.forward_label();
        tac.bind(lbl);
        tac.bind(lbl);
    }

    #[test]
    #[should_panic(expected = "which has not been emitted")]
    fn resolved_targets_must_exist() {
        let mut tac = TacBuilder::new();
        tac.emit(TacInstr::jump(Position(5)));
    }
}
