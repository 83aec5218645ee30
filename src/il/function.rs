use std::{
    fmt::{self, Display, Formatter},
    slice::Iter,
};

use crate::listing::{LinesIter, Position};

use super::{JumpTarget, MatchInstruction, TacInstr, TacListing};

/// The finished instruction stream of one function. Every jump target is resolved and lies
/// within the stream.
#[derive(Debug, Clone)]
pub struct TacFunction {
    listing: TacListing,
}
impl TacFunction {
    pub(super) fn new(listing: TacListing) -> Self {
        Self { listing }
    }

    /// Instructions in emission order, with their positions.
    pub fn iter_lines(&self) -> LinesIter<TacInstr> {
        self.listing.iter_lines()
    }

    pub fn instructions(&self) -> Iter<TacInstr> {
        self.listing.iter_instructions()
    }

    pub fn get(&self, position: Position) -> Option<&TacInstr> {
        self.listing.get(position)
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

    /// Positions of all jumps that transfer control to `target`.
    pub fn jumps_to(&self, target: Position) -> Vec<Position> {
        self.iter_lines()
            .match_instruction(TacInstr::target)
            .filter(|(_, t)| t.position() == Some(target))
            .map(|(at, _)| at)
            .collect()
    }

    /// Positions that are the target of at least one jump.
    pub fn jump_targets(&self) -> Vec<Position> {
        let mut targets: Vec<_> = self
            .instructions()
            .filter_map(TacInstr::target)
            .filter_map(JumpTarget::position)
            .collect();
        targets.sort_unstable();
        targets.dedup();
        targets
    }
}
impl Display for TacFunction {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for (position, instr) in self.iter_lines() {
            if instr.is_label() {
                writeln!(f, "    L{}:", position)?;
            } else {
                writeln!(f, "        {}", instr)?;
            }
        }
        Ok(())
    }
}
