//! Lossless Java parser producing rowan green trees in the shape the PSI layer
//! expects.
//!
//! - [`parse_java`] parses a compilation unit; the root is a `JavaFile`.
//! - [`parse_fragment`] parses a single construct (expression, statement,
//!   members, type, ...) under a `DummyHolder` root. The element factory in
//!   `psi-java` builds synthesized nodes through this entry point.
//!
//! Parsing never fails: every input byte ends up in the tree, malformed
//! regions inside `ErrorElement` nodes, and problems are reported as
//! [`ParseError`]s alongside the tree.

mod grammar;
mod parser;

use std::fmt::Write;

use psi_syntax::{SyntaxNode, TextRange};
use rowan::NodeOrToken;

pub use parser::{parse_fragment, parse_java, FragmentKind, Parse};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub range: TextRange,
}

/// Indented `Kind@range` dump of a rowan tree, tokens with their text.
pub fn debug_dump(node: &SyntaxNode) -> String {
    fn go(node: &SyntaxNode, indent: usize, out: &mut String) {
        let _ = writeln!(
            out,
            "{:indent$}{:?}@{:?}",
            "",
            node.kind(),
            node.text_range(),
            indent = indent
        );
        for child in node.children_with_tokens() {
            match child {
                NodeOrToken::Node(n) => go(&n, indent + 2, out),
                NodeOrToken::Token(t) => {
                    let _ = writeln!(
                        out,
                        "{:indent$}{:?}@{:?} {:?}",
                        "",
                        t.kind(),
                        t.text_range(),
                        t.text(),
                        indent = indent + 2
                    );
                }
            }
        }
    }

    let mut out = String::new();
    go(node, 0, &mut out);
    out
}
