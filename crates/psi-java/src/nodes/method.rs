//! Methods, constructors and annotation methods.

use psi_syntax::{tables, SyntaxKind};

use crate::behavior::{name_text_offset, Behavior, DEFAULT};
use crate::edit;
use crate::error::EditError;
use crate::nodes::{delete_unless_required, trivia_role};
use crate::role::Role;
use crate::{NodeId, SyntaxTree};

pub(crate) const METHOD: Behavior = Behavior {
    role_of: method_role,
    insert: method_insert,
    delete: method_delete,
    text_offset: name_text_offset,
    ..DEFAULT
};

fn method_role(tree: &SyntaxTree, method: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, method, child) {
        return role;
    }
    match tree.kind(child) {
        SyntaxKind::ModifierList => Role::ModifierList,
        SyntaxKind::TypeParameterList => Role::TypeParameterList,
        SyntaxKind::Type => Role::Type,
        SyntaxKind::Identifier => Role::Name,
        SyntaxKind::ParameterList => Role::ParameterList,
        SyntaxKind::LBracket => Role::LBracket,
        SyntaxKind::RBracket => Role::RBracket,
        SyntaxKind::ThrowsList => Role::ThrowsList,
        SyntaxKind::DefaultKw => Role::DefaultKeyword,
        SyntaxKind::CodeBlock => Role::MethodBody,
        SyntaxKind::Semicolon => Role::ClosingSemicolon,
        kind if tables::EXPRESSIONS.contains(kind)
            || matches!(
                kind,
                SyntaxKind::Annotation | SyntaxKind::AnnotationArrayInitializer
            ) =>
        {
            if tree.child_of_kind(method, SyntaxKind::DefaultKw).is_some() {
                Role::AnnotationDefaultValue
            } else {
                Role::None
            }
        }
        _ => Role::None,
    }
}

fn method_insert(
    tree: &mut SyntaxTree,
    method: NodeId,
    run: &[NodeId],
    anchor: Option<NodeId>,
    before: bool,
) -> Result<NodeId, EditError> {
    if anchor.is_none() && matches!(run, [body] if tree.kind(*body) == SyntaxKind::CodeBlock) {
        if let Some(old) = tree.child_of_kind(method, SyntaxKind::CodeBlock) {
            edit::remove(tree, old);
        }
        if let Some(semi) = tree.child_of_kind(method, SyntaxKind::Semicolon) {
            edit::remove(tree, semi);
        }
        let end = tree.children(method).len();
        edit::splice(tree, method, end, run);
        return Ok(run[0]);
    }
    let index = edit::anchor_index(tree, method, anchor, before);
    edit::splice(tree, method, index, run);
    Ok(run[0])
}

fn method_delete(tree: &mut SyntaxTree, method: NodeId, child: NodeId) -> Result<(), EditError> {
    match tree.role_of(method, child) {
        Role::MethodBody => {
            edit::remove(tree, child);
            if tree.child_of_kind(method, SyntaxKind::Semicolon).is_none() {
                let end = tree.children(method).len();
                edit::insert_token(tree, method, end, SyntaxKind::Semicolon);
            }
            Ok(())
        }
        Role::DefaultKeyword | Role::AnnotationDefaultValue => {
            let keyword = tree.find_child_by_role(method, Role::DefaultKeyword);
            let value = tree.find_child_by_role(method, Role::AnnotationDefaultValue);
            for node in [value, keyword].into_iter().flatten() {
                edit::remove(tree, node);
            }
            Ok(())
        }
        _ => delete_unless_required(
            tree,
            method,
            child,
            &[
                Role::Name,
                Role::ParameterList,
                Role::ModifierList,
                Role::TypeParameterList,
                Role::ThrowsList,
            ],
        ),
    }
}

impl SyntaxTree {
    /// A method without a return type.
    pub fn is_constructor(&self, method: NodeId) -> bool {
        self.kind(method) == SyntaxKind::Method && self.child_of_kind(method, SyntaxKind::Type).is_none()
    }

    pub fn method_body(&self, method: NodeId) -> Option<NodeId> {
        self.find_child_by_role(method, Role::MethodBody)
    }

    pub fn return_type(&self, method: NodeId) -> Option<NodeId> {
        self.find_child_by_role(method, Role::Type)
    }

    pub fn parameters(&self, method: NodeId) -> Vec<NodeId> {
        self.find_child_by_role(method, Role::ParameterList)
            .map(|list| self.children_of_kind(list, SyntaxKind::Parameter).collect())
            .unwrap_or_default()
    }

    /// Whether the last parameter is declared with `...`.
    pub fn is_varargs(&self, method: NodeId) -> bool {
        self.parameters(method)
            .last()
            .and_then(|&p| self.child_of_kind(p, SyntaxKind::Type))
            .map_or(false, |ty| self.child_of_kind(ty, SyntaxKind::Ellipsis).is_some())
    }

    /// Give the method a body, or with `None` turn it into a declaration
    /// ending in `;`.
    pub fn set_method_body(&mut self, method: NodeId, body: Option<NodeId>) -> Result<(), EditError> {
        match body {
            Some(body) => self.add(method, body).map(|_| ()),
            None => match self.method_body(method) {
                Some(old) => self.delete_child(method, old),
                None => Ok(()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::factory::create_code_block_from_text;

    fn method(tree: &SyntaxTree) -> NodeId {
        tree.descendants(tree.root())
            .find(|&n| matches!(tree.kind(n), SyntaxKind::Method | SyntaxKind::AnnotationMethod))
            .unwrap()
    }

    #[test]
    fn body_and_semicolon_are_exclusive() {
        let mut tree = SyntaxTree::parse("abstract class A { abstract void m(); }");
        let m = method(&tree);
        assert!(tree.method_body(m).is_none());
        let body = create_code_block_from_text(&mut tree, "{}").unwrap();
        tree.set_method_body(m, Some(body)).unwrap();
        assert_eq!(tree.text(tree.root()), "abstract class A { abstract void m() {} }");
        assert!(tree.find_child_by_role(m, Role::ClosingSemicolon).is_none());

        tree.set_method_body(m, None).unwrap();
        assert_eq!(tree.text(tree.root()), "abstract class A { abstract void m(); }");
    }

    #[test]
    fn constructors_and_varargs() {
        let tree = SyntaxTree::parse("class A { A(int... xs) {} }");
        let m = method(&tree);
        assert!(tree.is_constructor(m));
        assert!(tree.is_varargs(m));
        assert!(tree.return_type(m).is_none());
        assert_eq!(tree.name(m).as_deref(), Some("A"));
        let name = tree.find_child_by_role(m, Role::Name).unwrap();
        assert_eq!(tree.text_offset(m), tree.start_offset(name));
    }

    #[test]
    fn annotation_method_default_value() {
        let mut tree = SyntaxTree::parse("@interface A { int value() default 1; }");
        let m = method(&tree);
        let value = tree.find_child_by_role(m, Role::AnnotationDefaultValue).unwrap();
        assert_eq!(tree.text(value), "1");
        tree.delete_child(m, value).unwrap();
        assert_eq!(tree.text(tree.root()), "@interface A { int value(); }");
    }
}
