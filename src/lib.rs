//! Three-address code for a C compiler.
//!
//! The front end lowers parsed expressions and statements into a linear stream of
//! [`il::TacInstr`]s using the factories in [`il`]; the back end walks the finished
//! [`il::TacFunction`]s to allocate registers and emit machine code.

pub mod ast;
pub mod error;
pub mod il;
pub mod listing;
mod prelude;
