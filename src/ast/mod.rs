//! The parts of the front end's syntax tree and symbol table that are lowered into TAC.
mod literal;
mod object;
mod type_spec;

pub use literal::*;
pub use object::*;
pub use type_spec::*;
