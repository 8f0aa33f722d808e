//! Grammar productions, one module per syntactic family.

mod expressions;
pub(crate) mod items;
mod lookahead;
mod statements;
mod types;
