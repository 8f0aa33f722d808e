//! Declaration statements and the variable groups they (and field
//! declarations) hold.
//!
//! In `int a = 1, b;` the first variable owns the modifier list and the type,
//! commas sit between the variables, and the closing `;` lives in the last
//! one. Deleting a member repairs whichever of those it carried.

use psi_syntax::SyntaxKind;

use crate::behavior::{Behavior, DEFAULT};
use crate::edit;
use crate::error::EditError;
use crate::nodes::trivia_role;
use crate::role::Role;
use crate::{NodeId, SyntaxTree};

pub(crate) const DECLARATION_STATEMENT: Behavior = Behavior {
    role_of: declaration_role,
    accepts: |_, _, kind| matches!(kind, SyntaxKind::LocalVariable | SyntaxKind::Class),
    insert: declaration_insert,
    delete: declaration_delete,
    ..DEFAULT
};

fn declaration_role(tree: &SyntaxTree, stmt: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, stmt, child) {
        return role;
    }
    match tree.kind(child) {
        SyntaxKind::LocalVariable | SyntaxKind::Class => Role::DeclaredElement,
        SyntaxKind::Comma => Role::Comma,
        _ => Role::None,
    }
}

/// A new variable joins the end of the group and takes over the `;`.
fn declaration_insert(
    tree: &mut SyntaxTree,
    stmt: NodeId,
    run: &[NodeId],
    anchor: Option<NodeId>,
    before: bool,
) -> Result<NodeId, EditError> {
    let last = tree.last_child_of_kind(stmt, SyntaxKind::LocalVariable);
    let appending_variable = anchor.is_none()
        && before
        && matches!(run, [single] if tree.kind(*single) == SyntaxKind::LocalVariable);
    let (true, Some(last)) = (appending_variable, last) else {
        return crate::behavior::default_insert(tree, stmt, run, anchor, before);
    };
    let var = run[0];
    if let Some(semi) = tree.child_of_kind(last, SyntaxKind::Semicolon) {
        edit::detach(tree, semi);
        if tree.child_of_kind(var, SyntaxKind::Semicolon).is_none() {
            let end = tree.children(var).len();
            tree.raw_insert(var, end, &[semi]);
        } else {
            tree.destroy(semi);
        }
    }
    let at = tree.index_in_parent(last).map_or(0, |idx| idx + 1);
    edit::insert_token(tree, stmt, at, SyntaxKind::Comma);
    edit::insert_whitespace(tree, stmt, at + 1, " ");
    edit::splice(tree, stmt, at + 2, run);
    Ok(var)
}

fn declaration_delete(tree: &mut SyntaxTree, stmt: NodeId, child: NodeId) -> Result<(), EditError> {
    match tree.kind(child) {
        SyntaxKind::LocalVariable => delete_variable(tree, stmt, child),
        SyntaxKind::Comma => Err(EditError::CannotDeleteRequired {
            kind: SyntaxKind::Comma,
        }),
        _ => {
            edit::remove(tree, child);
            Ok(())
        }
    }
}

/// The comma-joined run of same-kind variables starting at `head`.
pub(crate) fn group_members(tree: &SyntaxTree, head: NodeId) -> Vec<NodeId> {
    let kind = tree.kind(head);
    let mut members = vec![head];
    let mut current = head;
    while let Some(comma) = tree.next_non_trivia_sibling(current) {
        if tree.kind(comma) != SyntaxKind::Comma {
            break;
        }
        match tree.next_non_trivia_sibling(comma) {
            Some(next) if tree.kind(next) == kind && tree.child_of_kind(next, SyntaxKind::Type).is_none() => {
                members.push(next);
                current = next;
            }
            _ => break,
        }
    }
    members
}

fn comma_between(tree: &SyntaxTree, left: NodeId) -> Option<NodeId> {
    tree.next_non_trivia_sibling(left)
        .filter(|&n| tree.kind(n) == SyntaxKind::Comma)
}

/// Delete one variable of a group (a local in a declaration statement, or a
/// field in a class body), keeping the rest of the group well formed.
pub(crate) fn delete_variable(
    tree: &mut SyntaxTree,
    parent: NodeId,
    var: NodeId,
) -> Result<(), EditError> {
    let head = tree.group_head(var);
    let members = group_members(tree, head);
    let position = members.iter().position(|&m| m == var).unwrap_or(0);

    if members.len() == 1 {
        // Sole variable: the whole declaration goes.
        return if tree.kind(parent) == SyntaxKind::DeclarationStatement {
            tree.delete(parent)
        } else {
            edit::remove(tree, var);
            Ok(())
        };
    }

    if position + 1 == members.len() {
        // Last: the previous variable takes over the `;`.
        let prev = members[position - 1];
        let semi = tree.child_of_kind(var, SyntaxKind::Semicolon);
        if let Some(semi) = semi {
            edit::detach(tree, semi);
        }
        let comma = comma_between(tree, prev);
        edit::remove(tree, var);
        if let Some(comma) = comma {
            edit::remove(tree, comma);
        }
        if let Some(semi) = semi {
            let end = tree.children(prev).len();
            edit::splice(tree, prev, end, &[semi]);
        }
        return Ok(());
    }

    if position == 0 {
        // First: the next variable takes over modifiers and type.
        let next = members[1];
        let name_index = tree
            .find_child_by_role(var, Role::Name)
            .and_then(|n| tree.index_in_parent(n))
            .unwrap_or(0);
        let prefix: Vec<NodeId> = tree.children(var)[..name_index].to_vec();
        for &node in &prefix {
            edit::detach(tree, node);
        }
        tree.raw_insert(next, 0, &prefix);
        let comma = comma_between(tree, var);
        edit::remove(tree, var);
        if let Some(comma) = comma {
            edit::remove(tree, comma);
        }
        return Ok(());
    }

    let comma = comma_between(tree, var);
    edit::remove(tree, var);
    if let Some(comma) = comma {
        edit::remove(tree, comma);
    }
    Ok(())
}

impl SyntaxTree {
    /// Variables declared by a declaration statement, or by the field
    /// declaration `field` belongs to.
    pub fn declared_variables(&self, decl: NodeId) -> Vec<NodeId> {
        match self.kind(decl) {
            SyntaxKind::DeclarationStatement => self
                .children(decl)
                .iter()
                .copied()
                .filter(|&c| matches!(self.kind(c), SyntaxKind::LocalVariable | SyntaxKind::Class))
                .collect(),
            SyntaxKind::Field => group_members(self, self.group_head(decl)),
            _ => Vec::new(),
        }
    }

    /// Split a multi-variable declaration so every variable gets its own
    /// statement (or field declaration) with a copy of the modifiers and type.
    pub fn normalize_declaration(&mut self, decl: NodeId) -> Result<(), EditError> {
        let (head, unit_of) = match self.kind(decl) {
            SyntaxKind::DeclarationStatement => {
                let outer = self.parent(decl).ok_or(EditError::Detached(decl))?;
                if self.kind(outer) != SyntaxKind::CodeBlock {
                    return Err(EditError::NotAccepted {
                        parent: self.kind(outer),
                        child: SyntaxKind::DeclarationStatement,
                    });
                }
                match self.child_of_kind(decl, SyntaxKind::LocalVariable) {
                    Some(head) => (head, Some(decl)),
                    None => return Ok(()),
                }
            }
            SyntaxKind::Field => (self.group_head(decl), None),
            kind => {
                return Err(EditError::NotAccepted {
                    parent: kind,
                    child: SyntaxKind::Field,
                })
            }
        };
        let members = group_members(self, head);
        let Some(&last) = members.last() else {
            return Ok(());
        };
        if members.len() < 2 {
            return Ok(());
        }
        let container = self.parent(head).ok_or(EditError::Detached(head))?;
        tracing::debug!(kind = ?self.kind(decl), variables = members.len(), "normalizing declaration");

        let (start, end) = (
            self.index_in_parent(head).unwrap_or(0),
            self.index_in_parent(last).unwrap_or(0),
        );
        let separators: Vec<NodeId> = self.children(container)[start..end]
            .iter()
            .copied()
            .filter(|&c| matches!(self.kind(c), SyntaxKind::Comma | SyntaxKind::Whitespace))
            .collect();
        for node in separators {
            if self.raw_remove(node).is_some() {
                self.destroy(node);
            }
        }

        let name_index = self
            .find_child_by_role(head, Role::Name)
            .and_then(|n| self.index_in_parent(n))
            .unwrap_or(0);
        let prefix: Vec<NodeId> = self.children(head)[..name_index]
            .iter()
            .copied()
            .filter(|&c| !self.kind(c).is_comment())
            .collect();

        let rest = members[1..].to_vec();
        for &member in &rest {
            self.raw_remove(member);
        }
        if self.child_of_kind(head, SyntaxKind::Semicolon).is_none() {
            let end = self.children(head).len();
            edit::insert_token(self, head, end, SyntaxKind::Semicolon);
        }

        let mut previous = unit_of.unwrap_or(head);
        let outer = self.parent(previous).ok_or(EditError::Detached(previous))?;
        for member in rest {
            let copies: Vec<NodeId> = prefix.iter().map(|&p| self.copy_subtree(p)).collect();
            self.raw_insert(member, 0, &copies);
            if self.child_of_kind(member, SyntaxKind::Semicolon).is_none() {
                let end = self.children(member).len();
                edit::insert_token(self, member, end, SyntaxKind::Semicolon);
            }
            let unit = match unit_of {
                Some(_) => self.alloc_node(SyntaxKind::DeclarationStatement, vec![member]),
                None => member,
            };
            let at = self.index_in_parent(previous).map_or(0, |idx| idx + 1);
            edit::insert_line(self, outer, at, &[unit]);
            previous = unit;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn locals(tree: &SyntaxTree) -> Vec<NodeId> {
        tree.descendants(tree.root())
            .filter(|&n| tree.kind(n) == SyntaxKind::LocalVariable)
            .collect()
    }

    fn in_method(body: &str) -> SyntaxTree {
        SyntaxTree::parse(&format!("class A {{ void m() {{ {body} }} }}"))
    }

    fn body_text(tree: &SyntaxTree) -> String {
        let block = tree
            .descendants(tree.root())
            .find(|&n| tree.kind(n) == SyntaxKind::CodeBlock)
            .unwrap();
        let text = tree.text(block);
        text[2..text.len() - 2].to_string()
    }

    #[test]
    fn deleting_the_only_variable_deletes_the_statement() {
        let mut tree = in_method("int a = 1; b();");
        let var = locals(&tree)[0];
        tree.delete(var).unwrap();
        assert_eq!(body_text(&tree), "b();");
    }

    #[test]
    fn deleting_the_last_variable_moves_the_semicolon() {
        let mut tree = in_method("int a, b;");
        let b = locals(&tree)[1];
        tree.delete(b).unwrap();
        assert_eq!(body_text(&tree), "int a;");
        let a = locals(&tree)[0];
        assert!(tree.find_child_by_role(a, Role::ClosingSemicolon).is_some());
    }

    #[test]
    fn deleting_the_first_variable_moves_the_type() {
        let mut tree = in_method("final int a = 1, b = 2;");
        let a = locals(&tree)[0];
        tree.delete(a).unwrap();
        assert_eq!(body_text(&tree), "final int b = 2;");
        let b = locals(&tree)[0];
        assert_eq!(tree.text(tree.variable_type(b).unwrap()), "int");
        assert!(tree.is_final(b));
    }

    #[test]
    fn deleting_a_middle_variable_drops_one_comma() {
        let mut tree = in_method("int a, b, c;");
        let b = locals(&tree)[1];
        tree.delete(b).unwrap();
        assert_eq!(body_text(&tree), "int a, c;");
    }

    #[test]
    fn for_initialization_becomes_empty() {
        let mut tree = in_method("for (int i = 0; i < n; i++) ;");
        let i = locals(&tree)[0];
        tree.delete(i).unwrap();
        assert_eq!(body_text(&tree), "for (; i < n; i++) ;");
    }

    #[test]
    fn normalize_splits_locals_and_fields() {
        let mut tree = SyntaxTree::parse(
            "class A {\n    private int x, y = 2;\n    void m() {\n        final int a = 1, b;\n    }\n}",
        );
        let decl = tree
            .descendants(tree.root())
            .find(|&n| tree.kind(n) == SyntaxKind::DeclarationStatement)
            .unwrap();
        tree.normalize_declaration(decl).unwrap();
        let field = tree
            .descendants(tree.root())
            .find(|&n| tree.kind(n) == SyntaxKind::Field)
            .unwrap();
        tree.normalize_declaration(field).unwrap();
        assert_eq!(
            tree.text(tree.root()),
            "class A {\n    private int x;\n    private int y = 2;\n    void m() {\n        final int a = 1;\n        final int b;\n    }\n}"
        );
    }
}
