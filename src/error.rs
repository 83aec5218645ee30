use thiserror::Error;

use crate::{il::ForwardLabel, listing::Position};

/// An ill-formed instruction stream. These are internal compiler errors: the front end is
/// responsible for only emitting well-typed code, so none of them can be caused by user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IrError {
    #[error("internal compiler error: label {label} was never bound (used at {})", join(.uses))]
    UnresolvedJump {
        label: ForwardLabel,
        uses: Vec<Position>,
    },
    #[error("internal compiler error: jump at {at} targets {target}, past the end of the stream")]
    TargetOutOfRange { at: Position, target: Position },
    #[error("internal compiler error: call at {at} expects {expected} parameters, found {found}")]
    ParamCount {
        at: Position,
        expected: usize,
        found: usize,
    },
    #[error("internal compiler error: parameter at {0} is not followed by a call")]
    DanglingParam(Position),
    #[error("internal compiler error: {message} at {at}")]
    IllegalOperand { at: Position, message: String },
}

fn join(positions: &[Position]) -> String {
    positions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_jump_lists_every_use() {
        let err = IrError::UnresolvedJump {
            label: ForwardLabel::new(3),
            uses: vec![Position(1), Position(4)],
        };

        assert_eq!(
            "internal compiler error: label F3 was never bound (used at 1, 4)",
            err.to_string()
        );
    }
}
