//! Java token vocabulary shared by the parser and the PSI tree.
//!
//! - [`SyntaxKind`]: one kind per token and per composite Java construct.
//! - [`TokenSet`] and [`tables`]: closed classification sets.
//! - [`lex`]: a lossless lexer.
//! - [`literals`]: decoding of literal token text.

pub mod literals;
pub mod tables;

mod lexer;
mod syntax_kind;
mod token_set;

pub use lexer::{lex, Lexer, Token};
pub use literals::{IntegerParse, LiteralError};
pub use syntax_kind::{JavaLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
pub use text_size::{TextRange, TextSize};
pub use token_set::TokenSet;
