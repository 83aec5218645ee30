//! Well-formedness checks over a complete instruction stream.

use crate::{error::IrError, listing::Position};

use super::{JumpTarget, TacInstr, TacListing};

/// Verify that every jump lands inside the stream, that each call is directly preceded by
/// exactly as many parameters as it declares, and that every instruction's operands fit its
/// operator.
pub fn verify(listing: &TacListing) -> Result<(), IrError> {
    // First parameter of the current run, and the run's length.
    let mut params: Option<(Position, usize)> = None;

    for (at, instr) in listing.iter_lines() {
        instr
            .check_operands()
            .map_err(|message| IrError::IllegalOperand { at, message })?;

        match instr.target() {
            Some(JumpTarget::Resolved(target)) if !listing.contains(*target) => {
                return Err(IrError::TargetOutOfRange {
                    at,
                    target: *target,
                })
            }
            Some(JumpTarget::Pending(label)) => {
                return Err(IrError::UnresolvedJump {
                    label: *label,
                    uses: vec![at],
                })
            }
            _ => (),
        }

        match instr {
            TacInstr::Param(_) => params.get_or_insert((at, 0)).1 += 1,
            TacInstr::Call { argc, .. } => {
                let found = params.take().map_or(0, |(_, count)| count);
                if found != *argc {
                    return Err(IrError::ParamCount {
                        at,
                        expected: *argc,
                        found,
                    });
                }
            }
            _ => {
                if let Some((first, _)) = params {
                    return Err(IrError::DanglingParam(first));
                }
            }
        }
    }

    match params {
        Some((first, _)) => Err(IrError::DanglingParam(first)),
        None => Ok(()),
    }
}
