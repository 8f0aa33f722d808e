//! Fields, locals, parameters and resource variables.
//!
//! A declaration like `int a = 1, b;` is a run of sibling variables in which
//! only the first owns the modifier list and the type. The lookups here walk
//! back through such a group so every variable answers for its own type.

use psi_syntax::{tables, SyntaxKind, TokenSet};
use smol_str::SmolStr;

use crate::behavior::{name_text_offset, Behavior, DEFAULT};
use crate::edit;
use crate::error::EditError;
use crate::nodes::{delete_unless_required, last_in, trivia_role};
use crate::role::Role;
use crate::{NodeId, SyntaxTree};

pub(crate) const VARIABLE: Behavior = Behavior {
    role_of: variable_role,
    insert: variable_insert,
    delete: variable_delete,
    text_offset: name_text_offset,
    ..DEFAULT
};

const INITIALIZERS: TokenSet = tables::EXPRESSIONS;

fn variable_role(tree: &SyntaxTree, var: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, var, child) {
        return role;
    }
    match tree.kind(child) {
        SyntaxKind::ModifierList => Role::ModifierList,
        SyntaxKind::Type => Role::Type,
        SyntaxKind::Identifier => Role::Name,
        SyntaxKind::LBracket => Role::LBracket,
        SyntaxKind::RBracket => Role::RBracket,
        SyntaxKind::Eq => Role::InitializerEq,
        SyntaxKind::Semicolon => Role::ClosingSemicolon,
        kind if INITIALIZERS.contains(kind) => Role::Initializer,
        _ => Role::None,
    }
}

/// `=` after the name and dimensions, with a space on either side.
fn synthesize_eq(tree: &mut SyntaxTree, var: NodeId) -> NodeId {
    let at = last_in(
        tree,
        var,
        TokenSet::new([SyntaxKind::Identifier, SyntaxKind::RBracket]),
    )
    .and_then(|n| tree.index_in_parent(n))
    .map_or(tree.children(var).len(), |idx| idx + 1);
    edit::insert_whitespace(tree, var, at, " ");
    let eq = edit::insert_token(tree, var, at + 1, SyntaxKind::Eq);
    edit::insert_whitespace(tree, var, at + 2, " ");
    eq
}

fn variable_insert(
    tree: &mut SyntaxTree,
    var: NodeId,
    run: &[NodeId],
    anchor: Option<NodeId>,
    before: bool,
) -> Result<NodeId, EditError> {
    let is_initializer = matches!(run, [single] if INITIALIZERS.contains(tree.kind(*single)));
    if anchor.is_none() && is_initializer {
        if let Some(old) = tree.find_child_by_role(var, Role::Initializer) {
            edit::remove(tree, old);
        }
        let eq = match tree.child_of_kind(var, SyntaxKind::Eq) {
            Some(eq) => eq,
            None => synthesize_eq(tree, var),
        };
        let at = tree.index_in_parent(eq).map_or(0, |idx| idx + 1);
        let spaced = tree
            .children(var)
            .get(at)
            .map_or(false, |&n| edit::is_whitespace(tree, n));
        if !spaced {
            edit::insert_whitespace(tree, var, at, " ");
        }
        edit::splice(tree, var, at + 1, run);
        return Ok(run[0]);
    }

    let index = match (anchor, tree.child_of_kind(var, SyntaxKind::Semicolon)) {
        (None, Some(semi)) if before => tree.index_in_parent(semi).unwrap_or(0),
        _ => edit::anchor_index(tree, var, anchor, before),
    };
    edit::splice(tree, var, index, run);
    Ok(run[0])
}

fn variable_delete(tree: &mut SyntaxTree, var: NodeId, child: NodeId) -> Result<(), EditError> {
    match tree.role_of(var, child) {
        Role::Initializer | Role::InitializerEq => {
            let initializer = tree.find_child_by_role(var, Role::Initializer);
            let eq = tree.find_child_by_role(var, Role::InitializerEq);
            for node in [initializer, eq].into_iter().flatten() {
                edit::remove(tree, node);
            }
            Ok(())
        }
        _ => delete_unless_required(
            tree,
            var,
            child,
            &[Role::Name, Role::Type, Role::ModifierList],
        ),
    }
}

impl SyntaxTree {
    /// Name identifier text of a named declaration.
    pub fn name(&self, id: NodeId) -> Option<SmolStr> {
        self.cache(id)
            .name
            .get_or_init(|| {
                let name = self.find_child_by_role(id, Role::Name)?;
                Some(SmolStr::new(self.leaf_text(name)))
            })
            .clone()
    }

    /// The variable that owns the modifier list and type shared by `var`'s
    /// declaration group.
    pub(crate) fn group_head(&self, var: NodeId) -> NodeId {
        let kind = self.kind(var);
        let mut head = var;
        while self.child_of_kind(head, SyntaxKind::Type).is_none() {
            let Some(comma) = self.prev_non_trivia_sibling(head) else {
                break;
            };
            if self.kind(comma) != SyntaxKind::Comma {
                break;
            }
            match self.prev_non_trivia_sibling(comma) {
                Some(prev) if self.kind(prev) == kind => head = prev,
                _ => break,
            }
        }
        head
    }

    /// Declared type of a variable, shared with the rest of its group.
    pub fn variable_type(&self, var: NodeId) -> Option<NodeId> {
        self.child_of_kind(self.group_head(var), SyntaxKind::Type)
    }

    pub fn variable_modifier_list(&self, var: NodeId) -> Option<NodeId> {
        self.child_of_kind(self.group_head(var), SyntaxKind::ModifierList)
    }

    pub fn variable_initializer(&self, var: NodeId) -> Option<NodeId> {
        self.find_child_by_role(var, Role::Initializer)
    }

    /// Dimensions written after the name, as in `int a[]`.
    pub fn name_dimensions(&self, var: NodeId) -> usize {
        self.children_of_kind(var, SyntaxKind::LBracket).count()
    }

    /// Replace, add or (with `None`) remove a variable's initializer.
    pub fn set_initializer(
        &mut self,
        var: NodeId,
        initializer: Option<NodeId>,
    ) -> Result<(), EditError> {
        match initializer {
            Some(expr) => self.add(var, expr).map(|_| ()),
            None => match self.variable_initializer(var) {
                Some(old) => self.delete_child(var, old),
                None => Ok(()),
            },
        }
    }

    pub fn is_final(&self, var: NodeId) -> bool {
        self.variable_modifier_list(var)
            .map_or(false, |list| self.has_modifier(list, SyntaxKind::FinalKw))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::factory::create_expression_from_text;

    fn fields(tree: &SyntaxTree) -> Vec<NodeId> {
        tree.descendants(tree.root())
            .filter(|&n| tree.kind(n) == SyntaxKind::Field)
            .collect()
    }

    #[test]
    fn grouped_fields_share_type_and_modifiers() {
        let tree = SyntaxTree::parse("class A { private static int a = 1, b[], c; }");
        let fields = fields(&tree);
        assert_eq!(fields.len(), 3);
        for &field in &fields {
            let ty = tree.variable_type(field).unwrap();
            assert_eq!(tree.text(ty), "int");
            assert!(tree.variable_modifier_list(field).is_some());
        }
        assert_eq!(tree.name(fields[1]).as_deref(), Some("b"));
        assert_eq!(tree.name_dimensions(fields[1]), 1);
        let last = tree.find_child_by_role(fields[2], Role::ClosingSemicolon);
        assert!(last.is_some());
        assert!(tree.find_child_by_role(fields[0], Role::ClosingSemicolon).is_none());
    }

    #[test]
    fn initializer_brings_and_takes_its_equals_sign() {
        let mut tree = SyntaxTree::parse("class A { int x; }");
        let field = fields(&tree)[0];
        let value = create_expression_from_text(&mut tree, "42").unwrap();
        tree.set_initializer(field, Some(value)).unwrap();
        assert_eq!(tree.text(tree.root()), "class A { int x = 42; }");
        assert!(tree.find_child_by_role(field, Role::InitializerEq).is_some());

        let other = create_expression_from_text(&mut tree, "a + b").unwrap();
        tree.set_initializer(field, Some(other)).unwrap();
        assert_eq!(tree.text(tree.root()), "class A { int x = a + b; }");

        tree.set_initializer(field, None).unwrap();
        assert_eq!(tree.text(tree.root()), "class A { int x; }");
    }

    #[test]
    fn name_is_required() {
        let mut tree = SyntaxTree::parse("class A { int x; }");
        let field = fields(&tree)[0];
        let name = tree.find_child_by_role(field, Role::Name).unwrap();
        assert_eq!(
            tree.delete_child(field, name),
            Err(EditError::CannotDeleteRequired {
                kind: SyntaxKind::Identifier
            })
        );
    }
}
