//! Arena-backed Java syntax tree with role-aware editing and light semantics.
//!
//! - [`SyntaxTree`] owns every node of a parsed file and hands out [`NodeId`]
//!   handles. Children know their [`Role`] in the parent, computed on demand.
//! - Edits (`add`, `add_before`, `add_after`, `delete`, `replace`) keep the
//!   text well-formed by inserting or removing companion tokens: commas in
//!   lists, `extends`/`implements` keywords, braces around bodies, the `.` of
//!   a qualifier.
//! - Semantic helpers answer the questions an editor asks of a single file:
//!   the type of an expression, the value of a literal or constant, the
//!   statement a `break` exits, and what a reference resolves to.
//!
//! [`LazyJavaFile`] keeps only the green tree until a caller needs the arena.

pub mod assertions;
mod behavior;
mod constant;
mod diagnostics;
mod dump;
mod edit;
mod error;
mod events;
pub mod factory;
mod jump;
mod lazy;
mod literal;
mod nodes;
mod resolve;
mod role;
mod tree;
mod types;

pub use assertions::AssertionMode;
pub use constant::ConstValue;
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use dump::DumpNode;
pub use edit::EditSettings;
pub use error::EditError;
pub use events::{TreeEvent, TreeListener};
pub use lazy::{ClassSummary, ImportSummary, LazyJavaFile};
pub use psi_parse::ParseError;
pub use psi_syntax::{SyntaxKind, TextRange, TextSize};
pub use resolve::ResolvedElement;
pub use role::Role;
pub use tree::{NodeId, SyntaxTree};
pub use types::{
    binary_numeric_promotion, unary_numeric_promotion, ClassType, JavaType, PrimitiveType,
};
