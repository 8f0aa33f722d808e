//! Modifier lists, annotations and annotation name/value pairs.

use psi_syntax::{tables, SyntaxKind, TokenSet};

use crate::behavior::{Behavior, DEFAULT};
use crate::edit;
use crate::error::EditError;
use crate::nodes::{delete_unless_required, last_in, single, trivia_role};
use crate::role::Role;
use crate::{NodeId, SyntaxTree};

pub(crate) const MODIFIER_LIST: Behavior = Behavior {
    role_of: modifier_list_role,
    accepts: |_, _, kind| kind == SyntaxKind::Annotation || tables::MODIFIER_KEYWORDS.contains(kind),
    insert: modifier_list_insert,
    ..DEFAULT
};

pub(crate) const ANNOTATION: Behavior = Behavior {
    role_of: annotation_role,
    delete: |tree, parent, child| {
        delete_unless_required(
            tree,
            parent,
            child,
            &[Role::At, Role::ClassReference, Role::AnnotationParameterList],
        )
    },
    ..DEFAULT
};

pub(crate) const NAME_VALUE_PAIR: Behavior = Behavior {
    role_of: name_value_pair_role,
    ..DEFAULT
};

const ACCESS_MODIFIERS: TokenSet = TokenSet::new([
    SyntaxKind::PublicKw,
    SyntaxKind::ProtectedKw,
    SyntaxKind::PrivateKw,
]);

const ANNOTATION_VALUES: TokenSet = tables::EXPRESSIONS.union(TokenSet::new([
    SyntaxKind::Annotation,
    SyntaxKind::AnnotationArrayInitializer,
]));

fn modifier_list_role(tree: &SyntaxTree, list: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, list, child) {
        return role;
    }
    match tree.kind(child) {
        SyntaxKind::Annotation => Role::Annotation,
        kind if tables::MODIFIER_KEYWORDS.contains(kind) => Role::Modifier,
        _ => Role::None,
    }
}

fn modifier_rank(kind: SyntaxKind) -> usize {
    tables::MODIFIER_ORDER
        .iter()
        .position(|&k| k == kind)
        .unwrap_or(tables::MODIFIER_ORDER.len())
}

/// Where a keyword goes so that the list stays in canonical order.
fn canonical_index(tree: &SyntaxTree, list: NodeId, keyword: SyntaxKind) -> usize {
    let rank = modifier_rank(keyword);
    let children = tree.children(list);
    if let Some(idx) = children.iter().position(|&c| {
        let kind = tree.kind(c);
        tables::MODIFIER_KEYWORDS.contains(kind) && modifier_rank(kind) > rank
    }) {
        return idx;
    }
    match last_in(tree, list, tables::MODIFIER_KEYWORDS.union(single(SyntaxKind::Annotation))) {
        Some(last) => tree.index_in_parent(last).map_or(0, |idx| idx + 1),
        None => 0,
    }
}

fn modifier_list_insert(
    tree: &mut SyntaxTree,
    list: NodeId,
    run: &[NodeId],
    anchor: Option<NodeId>,
    before: bool,
) -> Result<NodeId, EditError> {
    let index = match (anchor, run) {
        (Some(_), _) => edit::anchor_index(tree, list, anchor, before),
        (None, [single]) if tables::MODIFIER_KEYWORDS.contains(tree.kind(*single)) => {
            canonical_index(tree, list, tree.kind(*single))
        }
        (None, _) => match last_in(tree, list, single(SyntaxKind::Annotation)) {
            Some(last) => tree.index_in_parent(last).map_or(0, |idx| idx + 1),
            None => 0,
        },
    };
    edit::splice(tree, list, index, run);
    Ok(run[0])
}

impl SyntaxTree {
    pub fn has_modifier(&self, list: NodeId, keyword: SyntaxKind) -> bool {
        self.child_of_kind(list, keyword).is_some()
    }

    /// Add or remove a modifier keyword, keeping canonical modifier order.
    /// Adding an access modifier replaces any other access modifier.
    pub fn set_modifier_property(
        &mut self,
        list: NodeId,
        keyword: SyntaxKind,
        present: bool,
    ) -> Result<(), EditError> {
        if self.kind(list) != SyntaxKind::ModifierList || !tables::MODIFIER_KEYWORDS.contains(keyword)
        {
            return Err(EditError::NotAccepted {
                parent: self.kind(list),
                child: keyword,
            });
        }
        let existing = self.child_of_kind(list, keyword);
        match (present, existing) {
            (true, None) => {
                if ACCESS_MODIFIERS.contains(keyword) {
                    let others: Vec<NodeId> = self
                        .children(list)
                        .iter()
                        .copied()
                        .filter(|&c| ACCESS_MODIFIERS.contains(self.kind(c)))
                        .collect();
                    for other in others {
                        self.delete_child(list, other)?;
                    }
                }
                let text = keyword.fixed_text().unwrap_or_default();
                let leaf = self.alloc_leaf(keyword, text);
                self.insert(list, leaf, leaf, None, true)?;
            }
            (false, Some(node)) => self.delete_child(list, node)?,
            _ => {}
        }
        Ok(())
    }

    /// Dotted name of an annotation's type, as written.
    pub fn annotation_name(&self, annotation: NodeId) -> Option<String> {
        let reference = self.find_child_by_role(annotation, Role::ClassReference)?;
        Some(self.qualified_name(reference))
    }
}

fn annotation_role(tree: &SyntaxTree, annotation: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, annotation, child) {
        return role;
    }
    match tree.kind(child) {
        SyntaxKind::At => Role::At,
        SyntaxKind::JavaCodeReference => Role::ClassReference,
        SyntaxKind::AnnotationParameterList => Role::AnnotationParameterList,
        _ => Role::None,
    }
}

fn name_value_pair_role(tree: &SyntaxTree, pair: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, pair, child) {
        return role;
    }
    match tree.kind(child) {
        SyntaxKind::Identifier => Role::Name,
        SyntaxKind::Eq => Role::InitializerEq,
        kind if ANNOTATION_VALUES.contains(kind) => Role::Initializer,
        _ => Role::None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn first_modifier_list(tree: &SyntaxTree, owner: SyntaxKind) -> NodeId {
        let owner = tree
            .descendants(tree.root())
            .find(|&n| tree.kind(n) == owner)
            .unwrap();
        tree.child_of_kind(owner, SyntaxKind::ModifierList).unwrap()
    }

    #[test]
    fn modifiers_are_kept_in_canonical_order() {
        let mut tree = SyntaxTree::parse("class A { @Deprecated public void m() {} }");
        let list = first_modifier_list(&tree, SyntaxKind::Method);
        tree.set_modifier_property(list, SyntaxKind::FinalKw, true).unwrap();
        tree.set_modifier_property(list, SyntaxKind::StaticKw, true).unwrap();
        assert_eq!(tree.text(list), "@Deprecated public static final");
        tree.set_modifier_property(list, SyntaxKind::PrivateKw, true).unwrap();
        assert_eq!(tree.text(list), "@Deprecated private static final");
    }

    #[test]
    fn removing_the_last_modifier_leaves_clean_text() {
        let mut tree = SyntaxTree::parse("class A { public void m() {} }");
        let list = first_modifier_list(&tree, SyntaxKind::Method);
        tree.set_modifier_property(list, SyntaxKind::PublicKw, false).unwrap();
        assert_eq!(tree.text(tree.root()), "class A { void m() {} }");
        tree.set_modifier_property(list, SyntaxKind::StaticKw, true).unwrap();
        assert_eq!(tree.text(tree.root()), "class A { static void m() {} }");
    }

    #[test]
    fn annotation_roles() {
        let tree = SyntaxTree::parse("@java.lang.SuppressWarnings(value = \"x\") class A {}");
        let annotation = tree
            .descendants(tree.root())
            .find(|&n| tree.kind(n) == SyntaxKind::Annotation)
            .unwrap();
        assert_eq!(tree.annotation_name(annotation).as_deref(), Some("java.lang.SuppressWarnings"));
        let pair = tree
            .descendants(annotation)
            .find(|&n| tree.kind(n) == SyntaxKind::NameValuePair)
            .unwrap();
        let value = tree.find_child_by_role(pair, Role::Initializer).unwrap();
        assert_eq!(tree.text(value), "\"x\"");
    }
}
