//! Code references, type elements and type parameters.

use psi_syntax::{tables, SyntaxKind};
use smol_str::SmolStr;

use crate::behavior::{name_text_offset, Behavior, DEFAULT};
use crate::nodes::{delete_unless_required, trivia_role};
use crate::role::Role;
use crate::{NodeId, SyntaxTree};

pub(crate) const CODE_REFERENCE: Behavior = Behavior {
    role_of: code_reference_role,
    delete: |tree, parent, child| {
        delete_unless_required(
            tree,
            parent,
            child,
            &[Role::ReferenceName, Role::ReferenceParameterList],
        )
    },
    text_offset: |tree, id| match tree.find_child_by_role(id, Role::ReferenceName) {
        Some(name) => tree.start_offset(name),
        None => tree.start_offset(id),
    },
    ..DEFAULT
};

pub(crate) const TYPE: Behavior = Behavior {
    role_of: type_role,
    ..DEFAULT
};

pub(crate) const TYPE_PARAMETER: Behavior = Behavior {
    role_of: type_parameter_role,
    delete: |tree, parent, child| {
        delete_unless_required(tree, parent, child, &[Role::Name, Role::ExtendsList])
    },
    text_offset: name_text_offset,
    ..DEFAULT
};

fn code_reference_role(tree: &SyntaxTree, reference: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, reference, child) {
        return role;
    }
    match tree.kind(child) {
        SyntaxKind::JavaCodeReference => Role::Qualifier,
        SyntaxKind::Dot => Role::Dot,
        SyntaxKind::Identifier => Role::ReferenceName,
        SyntaxKind::ReferenceParameterList => Role::ReferenceParameterList,
        _ => Role::None,
    }
}

fn type_role(tree: &SyntaxTree, ty: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, ty, child) {
        return role;
    }
    match tree.kind(child) {
        kind if tables::PRIMITIVE_TYPE_KEYWORDS.contains(kind) => Role::TypeKeyword,
        SyntaxKind::JavaCodeReference => Role::ClassReference,
        SyntaxKind::Type => {
            if tree.child_of_kind(ty, SyntaxKind::Question).is_some() {
                Role::Type
            } else {
                Role::TypeAlternative
            }
        }
        SyntaxKind::Question => Role::Quest,
        SyntaxKind::ExtendsKw | SyntaxKind::SuperKw => Role::WildcardBoundKeyword,
        SyntaxKind::LBracket => Role::LBracket,
        SyntaxKind::RBracket => Role::RBracket,
        SyntaxKind::Ellipsis => Role::Ellipsis,
        SyntaxKind::Pipe => Role::OperationSign,
        _ => Role::None,
    }
}

fn type_parameter_role(tree: &SyntaxTree, param: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, param, child) {
        return role;
    }
    match tree.kind(child) {
        SyntaxKind::Identifier => Role::Name,
        SyntaxKind::ExtendsBoundList => Role::ExtendsList,
        _ => Role::None,
    }
}

impl SyntaxTree {
    /// Last identifier of a code reference or reference expression.
    pub fn reference_name(&self, reference: NodeId) -> Option<SmolStr> {
        let name = self.find_child_by_role(reference, Role::ReferenceName)?;
        Some(SmolStr::new(self.leaf_text(name)))
    }

    /// Dotted name of a code reference, reference expression or class type,
    /// without type arguments, whitespace or comments.
    pub fn qualified_name(&self, reference: NodeId) -> String {
        match self.kind(reference) {
            SyntaxKind::Type => match self.find_child_by_role(reference, Role::ClassReference) {
                Some(class) => self.qualified_name(class),
                None => self
                    .find_child_by_role(reference, Role::TypeKeyword)
                    .map(|k| self.leaf_text(k).to_string())
                    .unwrap_or_default(),
            },
            SyntaxKind::JavaCodeReference | SyntaxKind::ReferenceExpression => {
                let name = self.reference_name(reference).unwrap_or_default();
                match self.find_child_by_role(reference, Role::Qualifier) {
                    Some(qualifier)
                        if matches!(
                            self.kind(qualifier),
                            SyntaxKind::JavaCodeReference | SyntaxKind::ReferenceExpression
                        ) =>
                    {
                        format!("{}.{}", self.qualified_name(qualifier), name)
                    }
                    Some(qualifier) => format!("{}.{}", self.text(qualifier).trim(), name),
                    None => name.to_string(),
                }
            }
            _ => self.text(reference).trim().to_string(),
        }
    }

    /// Number of `[]` pairs directly on a type element.
    pub fn array_dimensions(&self, ty: NodeId) -> usize {
        self.children_of_kind(ty, SyntaxKind::LBracket).count()
            + usize::from(self.child_of_kind(ty, SyntaxKind::Ellipsis).is_some())
    }

    /// Type arguments of a code reference.
    pub fn type_arguments(&self, reference: NodeId) -> Vec<NodeId> {
        self.find_child_by_role(reference, Role::ReferenceParameterList)
            .map(|list| self.children_of_kind(list, SyntaxKind::Type).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(tree: &SyntaxTree, kind: SyntaxKind) -> NodeId {
        tree.descendants(tree.root()).find(|&n| tree.kind(n) == kind).unwrap()
    }

    #[test]
    fn nested_references_expose_qualifier_and_name() {
        let tree = SyntaxTree::parse("class A extends java.util.List<String> {}");
        let list = first(&tree, SyntaxKind::ExtendsList);
        let reference = tree.child_of_kind(list, SyntaxKind::JavaCodeReference).unwrap();
        assert_eq!(tree.qualified_name(reference), "java.util.List");
        assert_eq!(tree.reference_name(reference).as_deref(), Some("List"));
        assert_eq!(tree.type_arguments(reference).len(), 1);
        let qualifier = tree.find_child_by_role(reference, Role::Qualifier).unwrap();
        assert_eq!(tree.qualified_name(qualifier), "java.util");
        let name = tree.find_child_by_role(reference, Role::ReferenceName).unwrap();
        assert_eq!(tree.text_offset(reference), tree.start_offset(name));
    }

    #[test]
    fn wildcard_and_alternatives() {
        let tree = SyntaxTree::parse(
            "class A { void m(java.util.List<? extends Number> l) { try {} catch (A | B e) {} } }",
        );
        let wildcard = tree
            .descendants(tree.root())
            .find(|&n| tree.kind(n) == SyntaxKind::Type && tree.child_of_kind(n, SyntaxKind::Question).is_some())
            .unwrap();
        let bound = tree.find_child_by_role(wildcard, Role::Type).unwrap();
        assert_eq!(tree.text(bound), "Number");
        assert!(tree.find_child_by_role(wildcard, Role::WildcardBoundKeyword).is_some());

        let catch = first(&tree, SyntaxKind::CatchSection);
        let param = tree.child_of_kind(catch, SyntaxKind::Parameter).unwrap();
        let union = tree.child_of_kind(param, SyntaxKind::Type).unwrap();
        let alternatives: Vec<_> = tree
            .children(union)
            .iter()
            .filter(|&&c| tree.role_of(union, c) == Role::TypeAlternative)
            .map(|&c| tree.text(c))
            .collect();
        assert_eq!(alternatives, vec!["A", "B"]);
    }
}
