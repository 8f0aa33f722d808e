//! Textual and structured dumps of an arena subtree.

use std::fmt::Write;

use psi_syntax::TextRange;
use serde::Serialize;

use crate::role::Role;
use crate::{NodeId, SyntaxTree};

/// One node of a structured dump; leaves carry their text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpNode {
    pub kind: String,
    pub start: u32,
    pub end: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DumpNode>,
}

impl SyntaxTree {
    /// Indented `Kind@start..end` lines, leaves followed by their quoted
    /// text. With `with_roles`, every non-root node also shows its role in
    /// its parent.
    pub fn dump(&self, id: NodeId, with_roles: bool) -> String {
        let mut out = String::new();
        self.dump_into(id, 0, with_roles, &mut out);
        out
    }

    fn dump_into(&self, id: NodeId, depth: usize, with_roles: bool, out: &mut String) {
        let _ = write!(
            out,
            "{:indent$}{:?}@{:?}",
            "",
            self.kind(id),
            self.text_range(id),
            indent = depth * 2
        );
        if with_roles {
            if let Some(parent) = self.parent(id) {
                let _ = write!(out, " [{:?}]", self.role_of(parent, id));
            }
        }
        if self.kind(id).is_token() {
            let _ = write!(out, " {:?}", self.leaf_text(id));
        }
        out.push('\n');
        for &child in self.children(id) {
            self.dump_into(child, depth + 1, with_roles, out);
        }
    }

    pub fn dump_node(&self, id: NodeId, with_roles: bool) -> DumpNode {
        let range: TextRange = self.text_range(id);
        let is_token = self.kind(id).is_token();
        DumpNode {
            kind: format!("{:?}", self.kind(id)),
            start: range.start().into(),
            end: range.end().into(),
            role: match self.parent(id) {
                Some(parent) if with_roles => Some(self.role_of(parent, id)),
                _ => None,
            },
            text: is_token.then(|| self.leaf_text(id).to_string()),
            children: self
                .children(id)
                .iter()
                .map(|&child| self.dump_node(child, with_roles))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn class_shape() {
        let tree = SyntaxTree::parse("class A {}");
        assert_snapshot!(tree.dump(tree.root(), false), @r###"
JavaFile@0..10
  Class@0..10
    ModifierList@0..0
    ClassKw@0..5 "class"
    Whitespace@5..6 " "
    Identifier@6..7 "A"
    TypeParameterList@7..7
    ExtendsList@7..7
    ImplementsList@7..7
    Whitespace@7..8 " "
    LBrace@8..9 "{"
    RBrace@9..10 "}"
"###);
    }

    #[test]
    fn roles_and_structure() {
        let tree = SyntaxTree::parse("class A {}");
        let dump = tree.dump(tree.root(), true);
        assert!(dump.contains("Identifier@6..7 [Name] \"A\""), "{dump}");
        assert!(dump.contains("LBrace@8..9 [LBrace] \"{\""), "{dump}");
        assert!(dump.lines().next().is_some_and(|l| !l.contains('[')));

        let node = tree.dump_node(tree.root(), true);
        assert_eq!(node.kind, "JavaFile");
        assert_eq!(node.role, None);
        let class = &node.children[0];
        assert_eq!((class.start, class.end), (0, 10));
        let name = &class.children[3];
        assert_eq!(name.role, Some(Role::Name));
        assert_eq!(name.text.as_deref(), Some("A"));
        assert!(name.children.is_empty());
    }
}
