use psi_syntax::{tables, SyntaxKind};

use crate::behavior::{Behavior, DEFAULT};
use crate::edit;
use crate::error::EditError;
use crate::nodes::{delete_unless_required, trivia_role};
use crate::role::Role;
use crate::{NodeId, SyntaxTree};

pub(crate) const CODE_BLOCK: Behavior = Behavior {
    role_of: code_block_role,
    accepts: |_, _, kind| tables::STATEMENTS.contains(kind),
    insert: code_block_insert,
    delete: |tree, parent, child| {
        delete_unless_required(tree, parent, child, &[Role::LBrace, Role::RBrace])
    },
    ..DEFAULT
};

pub(crate) const BLOCK_STATEMENT: Behavior = Behavior {
    role_of: |tree, parent, child| {
        if let Some(role) = trivia_role(tree, parent, child) {
            return role;
        }
        match tree.kind(child) {
            SyntaxKind::CodeBlock => Role::Block,
            _ => Role::None,
        }
    },
    delete: |tree, parent, child| delete_unless_required(tree, parent, child, &[Role::Block]),
    ..DEFAULT
};

fn code_block_role(tree: &SyntaxTree, block: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, block, child) {
        return role;
    }
    match tree.kind(child) {
        SyntaxKind::LBrace => Role::LBrace,
        SyntaxKind::RBrace => Role::RBrace,
        kind if tables::STATEMENTS.contains(kind) => Role::Statement,
        _ => Role::None,
    }
}

fn code_block_insert(
    tree: &mut SyntaxTree,
    block: NodeId,
    run: &[NodeId],
    anchor: Option<NodeId>,
    before: bool,
) -> Result<NodeId, EditError> {
    let index = edit::bracketed_index(
        tree,
        block,
        anchor,
        before,
        SyntaxKind::LBrace,
        SyntaxKind::RBrace,
    );
    edit::insert_line(tree, block, index, run);
    Ok(run[0])
}

impl SyntaxTree {
    pub fn statements(&self, block: NodeId) -> Vec<NodeId> {
        self.children(block)
            .iter()
            .copied()
            .filter(|&c| tables::STATEMENTS.contains(self.kind(c)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::factory::create_statement_from_text;

    fn body(tree: &SyntaxTree) -> NodeId {
        tree.descendants(tree.root())
            .find(|&n| tree.kind(n) == SyntaxKind::CodeBlock)
            .unwrap()
    }

    #[test]
    fn statements_go_on_their_own_lines() {
        let mut tree = SyntaxTree::parse("class A {\n    void m() {\n        a();\n    }\n}");
        let block = body(&tree);
        let stmt = create_statement_from_text(&mut tree, "b();").unwrap();
        tree.add(block, stmt).unwrap();
        let first = create_statement_from_text(&mut tree, "c();").unwrap();
        tree.insert(block, first, first, None, false).unwrap();
        assert_eq!(
            tree.text(tree.root()),
            "class A {\n    void m() {\n        c();\n        a();\n        b();\n    }\n}"
        );
        assert_eq!(tree.statements(block).len(), 3);
    }

    #[test]
    fn braces_are_required_and_members_are_not_statements() {
        let mut tree = SyntaxTree::parse("class A { void m() { a(); } }");
        let block = body(&tree);
        let open = tree.find_child_by_role(block, Role::LBrace).unwrap();
        assert!(matches!(
            tree.delete_child(block, open),
            Err(EditError::CannotDeleteRequired { .. })
        ));
        let stmt = tree.statements(block)[0];
        tree.delete_child(block, stmt).unwrap();
        assert_eq!(tree.text(tree.root()), "class A { void m() { } }");
    }
}
