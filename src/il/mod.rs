//! Intermediate code: operands, operators and three-address instructions.

mod builder;
mod function;
mod label_generator;
mod operand;
mod operand_type;
mod operator;
mod program;
mod tac;
mod temp_generator;
pub mod verify;

pub use builder::TacBuilder;
pub use function::TacFunction;
pub use label_generator::ForwardLabel;
pub use operand::*;
pub use operand_type::OperandType;
pub use operator::*;
pub use program::TacProgram;
pub use tac::*;
