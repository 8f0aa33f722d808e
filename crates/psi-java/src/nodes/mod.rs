//! Construct-specific behaviour: role tables, default anchors and the
//! companion-token repair each construct performs around edits.

pub(crate) mod annotation;
pub(crate) mod block;
pub(crate) mod class;
pub(crate) mod declaration;
pub(crate) mod expressions;
pub(crate) mod file;
pub(crate) mod lists;
pub(crate) mod method;
pub(crate) mod reference;
pub(crate) mod statements;
pub(crate) mod variable;

use psi_syntax::{SyntaxKind, TokenSet};

use crate::role::Role;
use crate::{NodeId, SyntaxTree};

/// Roles shared by every construct: whitespace and error nodes have none,
/// a comment is a doc comment when it opens a declaration and a preceding
/// comment when nothing but trivia comes before it.
pub(crate) fn trivia_role(tree: &SyntaxTree, parent: NodeId, child: NodeId) -> Option<Role> {
    let kind = tree.kind(child);
    match kind {
        SyntaxKind::Whitespace | SyntaxKind::ErrorElement | SyntaxKind::BadCharacter => {
            Some(Role::None)
        }
        _ if kind.is_comment() => {
            if kind == SyntaxKind::DocComment
                && psi_syntax::tables::DOC_COMMENT_OWNERS.contains(tree.kind(parent))
                && tree.first_child(parent) == Some(child)
            {
                return Some(Role::DocComment);
            }
            let idx = tree.index_in_parent(child).unwrap_or(0);
            let preceded = tree.children(parent)[..idx]
                .iter()
                .any(|&c| !tree.is_trivia(c));
            Some(if preceded { Role::None } else { Role::PrecedingComment })
        }
        _ => None,
    }
}

pub(crate) fn first_in(tree: &SyntaxTree, parent: NodeId, set: TokenSet) -> Option<NodeId> {
    tree.children(parent)
        .iter()
        .copied()
        .find(|&c| set.contains(tree.kind(c)))
}

pub(crate) fn last_in(tree: &SyntaxTree, parent: NodeId, set: TokenSet) -> Option<NodeId> {
    tree.children(parent)
        .iter()
        .rev()
        .copied()
        .find(|&c| set.contains(tree.kind(c)))
}

/// First child in `set` that comes after `after`.
pub(crate) fn first_in_after(
    tree: &SyntaxTree,
    parent: NodeId,
    after: NodeId,
    set: TokenSet,
) -> Option<NodeId> {
    let start = tree.index_in_parent(after)? + 1;
    tree.children(parent)[start..]
        .iter()
        .copied()
        .find(|&c| set.contains(tree.kind(c)))
}

/// First child in `set` that comes after the first `marker` token.
pub(crate) fn first_in_after_kind(
    tree: &SyntaxTree,
    parent: NodeId,
    marker: SyntaxKind,
    set: TokenSet,
) -> Option<NodeId> {
    let marker = tree.child_of_kind(parent, marker)?;
    first_in_after(tree, parent, marker, set)
}

pub(crate) fn position(tree: &SyntaxTree, id: NodeId) -> usize {
    tree.index_in_parent(id).unwrap_or(0)
}

/// `a` comes before `b` among their common parent's children.
pub(crate) fn precedes(tree: &SyntaxTree, a: NodeId, b: NodeId) -> bool {
    position(tree, a) < position(tree, b)
}

pub(crate) const fn single(kind: SyntaxKind) -> TokenSet {
    TokenSet::new([kind])
}

/// Remove `child` unless its role is one the parent cannot do without.
pub(crate) fn delete_unless_required(
    tree: &mut SyntaxTree,
    parent: NodeId,
    child: NodeId,
    required: &[Role],
) -> Result<(), crate::EditError> {
    let role = tree.role_of(parent, child);
    if role != Role::None && required.contains(&role) {
        return Err(crate::EditError::CannotDeleteRequired {
            kind: tree.kind(child),
        });
    }
    crate::edit::remove(tree, child);
    Ok(())
}
