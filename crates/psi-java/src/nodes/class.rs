//! Class-like declarations and the other constructs that own a member body:
//! anonymous classes, enum constants with a body, and class initializers.
//!
//! Member insertion without an anchor follows the usual member order: fields
//! after the last field, methods after the last method, everything else in
//! front of the closing brace. Enum bodies keep the constant list and its
//! delimiting `;` consistent, and members inserted into enums or interfaces
//! lose the modifiers that are implicit there.

use psi_syntax::{tables, SyntaxKind, TokenSet};

use crate::behavior::{find_by_scanning, name_text_offset, Behavior, DEFAULT};
use crate::edit;
use crate::error::EditError;
use crate::nodes::lists::adjacent_separator;
use crate::nodes::{declaration, delete_unless_required, last_in, single, trivia_role};
use crate::role::Role;
use crate::{NodeId, SyntaxTree};

pub(crate) const CLASS: Behavior = Behavior {
    role_of: class_role,
    find_child_by_role: class_find,
    accepts: accepts_member,
    insert: member_insert,
    delete: class_delete,
    text_offset: name_text_offset,
};

pub(crate) const ANONYMOUS_CLASS: Behavior = Behavior {
    role_of: anonymous_class_role,
    accepts: accepts_member,
    insert: member_insert,
    delete: |tree, parent, child| {
        delete_unless_required(
            tree,
            parent,
            child,
            &[
                Role::BaseClassReference,
                Role::ArgumentList,
                Role::LBrace,
                Role::RBrace,
            ],
        )
    },
    ..DEFAULT
};

pub(crate) const ENUM_CONSTANT_INITIALIZER: Behavior = Behavior {
    role_of: |tree, parent, child| {
        if let Some(role) = trivia_role(tree, parent, child) {
            return role;
        }
        match tree.kind(child) {
            SyntaxKind::LBrace => Role::LBrace,
            SyntaxKind::RBrace => Role::RBrace,
            kind => member_role(kind),
        }
    },
    accepts: accepts_member,
    insert: member_insert,
    delete: body_delete,
    ..DEFAULT
};

pub(crate) const ENUM_CONSTANT: Behavior = Behavior {
    role_of: |tree, parent, child| {
        if let Some(role) = trivia_role(tree, parent, child) {
            return role;
        }
        match tree.kind(child) {
            SyntaxKind::ModifierList => Role::ModifierList,
            SyntaxKind::Identifier => Role::Name,
            SyntaxKind::ExpressionList => Role::ArgumentList,
            SyntaxKind::EnumConstantInitializer => Role::AnonymousClass,
            _ => Role::None,
        }
    },
    delete: |tree, parent, child| {
        delete_unless_required(tree, parent, child, &[Role::Name, Role::ModifierList])
    },
    text_offset: name_text_offset,
    ..DEFAULT
};

pub(crate) const CLASS_INITIALIZER: Behavior = Behavior {
    role_of: |tree, parent, child| {
        if let Some(role) = trivia_role(tree, parent, child) {
            return role;
        }
        match tree.kind(child) {
            SyntaxKind::ModifierList => Role::ModifierList,
            SyntaxKind::CodeBlock => Role::MethodBody,
            _ => Role::None,
        }
    },
    delete: |tree, parent, child| {
        delete_unless_required(tree, parent, child, &[Role::ModifierList, Role::MethodBody])
    },
    ..DEFAULT
};

const METHODS: TokenSet = TokenSet::new([SyntaxKind::Method, SyntaxKind::AnnotationMethod]);

const ENUM_IMPLICIT: TokenSet = TokenSet::new([SyntaxKind::PublicKw, SyntaxKind::FinalKw]);

const INTERFACE_IMPLICIT: TokenSet = TokenSet::new([
    SyntaxKind::PublicKw,
    SyntaxKind::AbstractKw,
    SyntaxKind::StaticKw,
    SyntaxKind::FinalKw,
    SyntaxKind::NativeKw,
]);

fn member_role(kind: SyntaxKind) -> Role {
    match kind {
        SyntaxKind::Method | SyntaxKind::AnnotationMethod => Role::Method,
        SyntaxKind::Field => Role::Field,
        SyntaxKind::Class => Role::Class,
        SyntaxKind::ClassInitializer => Role::ClassInitializer,
        _ => Role::None,
    }
}

fn accepts_member(tree: &SyntaxTree, owner: NodeId, kind: SyntaxKind) -> bool {
    match kind {
        SyntaxKind::EnumConstant => tree.kind(owner) == SyntaxKind::Class && tree.is_enum(owner),
        _ => tables::CLASS_MEMBERS.contains(kind),
    }
}

fn class_role(tree: &SyntaxTree, class: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, class, child) {
        return role;
    }
    match tree.kind(child) {
        SyntaxKind::ModifierList => Role::ModifierList,
        kind if tables::CLASS_KEYWORDS.contains(kind) => Role::ClassOrInterfaceKeyword,
        SyntaxKind::At => Role::At,
        SyntaxKind::Identifier => Role::Name,
        SyntaxKind::TypeParameterList => Role::TypeParameterList,
        SyntaxKind::ExtendsList => Role::ExtendsList,
        SyntaxKind::ImplementsList => Role::ImplementsList,
        SyntaxKind::LBrace => Role::LBrace,
        SyntaxKind::RBrace => Role::RBrace,
        SyntaxKind::EnumConstant => Role::EnumConstant,
        SyntaxKind::Comma => Role::Comma,
        SyntaxKind::Semicolon => {
            if enum_delimiter(tree, class) == Some(child) {
                Role::EnumConstantListDelimiter
            } else {
                Role::None
            }
        }
        kind => member_role(kind),
    }
}

fn class_find(tree: &SyntaxTree, class: NodeId, role: Role) -> Option<NodeId> {
    match role {
        Role::ClassOrInterfaceKeyword => {
            let keyword = tree
                .children(class)
                .iter()
                .copied()
                .find(|&c| tables::CLASS_KEYWORDS.contains(tree.kind(c)));
            crate::psi_assert!(keyword.is_some(), "class without a class keyword");
            keyword
        }
        Role::EnumConstantListDelimiter => enum_delimiter(tree, class),
        _ => find_by_scanning(tree, class, role),
    }
}

/// The first `;` after `{` that only skippable nodes, constants and commas
/// precede.
fn enum_delimiter(tree: &SyntaxTree, class: NodeId) -> Option<NodeId> {
    if !tree.is_enum(class) {
        return None;
    }
    let lbrace = tree.child_of_kind(class, SyntaxKind::LBrace)?;
    let mut current = tree.next_sibling(lbrace);
    while let Some(node) = current {
        match tree.kind(node) {
            SyntaxKind::Semicolon => return Some(node),
            SyntaxKind::EnumConstant | SyntaxKind::Comma => {}
            _ if tree.is_skippable(node) => {}
            _ => return None,
        }
        current = tree.next_sibling(node);
    }
    None
}

fn anonymous_class_role(tree: &SyntaxTree, class: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, class, child) {
        return role;
    }
    match tree.kind(child) {
        SyntaxKind::JavaCodeReference => Role::BaseClassReference,
        SyntaxKind::ExpressionList => Role::ArgumentList,
        SyntaxKind::LBrace => Role::LBrace,
        SyntaxKind::RBrace => Role::RBrace,
        kind => member_role(kind),
    }
}

fn index_after(tree: &SyntaxTree, node: NodeId) -> usize {
    tree.index_in_parent(node).map_or(0, |idx| idx + 1)
}

/// Conventional position for a new member of kind `kind`.
fn default_member_index(tree: &SyntaxTree, owner: NodeId, kind: SyntaxKind, body_start: usize) -> usize {
    let close = tree
        .last_child_of_kind(owner, SyntaxKind::RBrace)
        .and_then(|c| tree.index_in_parent(c))
        .unwrap_or(tree.children(owner).len());
    let after_last = |set: TokenSet| {
        last_in(tree, owner, set)
            .map(|n| index_after(tree, n))
            .filter(|&idx| idx > body_start)
    };
    let before_first = |set: TokenSet| {
        tree.children(owner)[body_start.min(close)..close]
            .iter()
            .find(|&&c| set.contains(tree.kind(c)))
            .and_then(|&c| tree.index_in_parent(c))
    };
    let later_members = METHODS.union(TokenSet::new([SyntaxKind::Class, SyntaxKind::ClassInitializer]));
    match kind {
        SyntaxKind::Field => after_last(single(SyntaxKind::Field))
            .or_else(|| before_first(later_members))
            .unwrap_or(close),
        SyntaxKind::Method | SyntaxKind::AnnotationMethod => {
            after_last(METHODS).unwrap_or(close)
        }
        SyntaxKind::ClassInitializer => {
            after_last(TokenSet::new([SyntaxKind::Field, SyntaxKind::ClassInitializer]))
                .or_else(|| before_first(METHODS.union(single(SyntaxKind::Class))))
                .unwrap_or(close)
        }
        _ => close,
    }
}

fn member_insert(
    tree: &mut SyntaxTree,
    owner: NodeId,
    run: &[NodeId],
    anchor: Option<NodeId>,
    before: bool,
) -> Result<NodeId, EditError> {
    let is_enum_class = tree.kind(owner) == SyntaxKind::Class && tree.is_enum(owner);
    if is_enum_class && run.iter().any(|&n| tree.kind(n) == SyntaxKind::EnumConstant) {
        return insert_enum_constants(tree, owner, run, anchor, before);
    }

    let mut body_start = tree
        .child_of_kind(owner, SyntaxKind::LBrace)
        .map_or(0, |b| index_after(tree, b));
    if is_enum_class {
        let delimiter = match enum_delimiter(tree, owner) {
            Some(delimiter) => delimiter,
            None => {
                let at = match tree.last_child_of_kind(owner, SyntaxKind::EnumConstant) {
                    Some(last) => index_after(tree, last),
                    None => body_start,
                };
                tracing::debug!("synthesizing enum constant list delimiter");
                edit::insert_token(tree, owner, at, SyntaxKind::Semicolon)
            }
        };
        body_start = index_after(tree, delimiter);
    }

    let index = match (anchor, run) {
        (Some(_), _) => edit::anchor_index(tree, owner, anchor, before),
        (None, [member]) if before => default_member_index(tree, owner, tree.kind(*member), body_start),
        (None, _) if before => tree
            .last_child_of_kind(owner, SyntaxKind::RBrace)
            .and_then(|c| tree.index_in_parent(c))
            .unwrap_or(tree.children(owner).len()),
        (None, _) => body_start,
    };
    let index = index.max(body_start);
    edit::insert_line(tree, owner, index, run);

    for &member in run {
        strip_implicit_modifiers(tree, owner, member);
    }
    Ok(run[0])
}

fn insert_enum_constants(
    tree: &mut SyntaxTree,
    class: NodeId,
    run: &[NodeId],
    anchor: Option<NodeId>,
    before: bool,
) -> Result<NodeId, EditError> {
    let index = match anchor {
        Some(_) => edit::anchor_index(tree, class, anchor, before),
        None => {
            let last = tree.last_child_of_kind(class, SyntaxKind::EnumConstant);
            match (last, before) {
                (Some(last), true) => index_after(tree, last),
                _ => tree
                    .child_of_kind(class, SyntaxKind::LBrace)
                    .map_or(0, |b| index_after(tree, b)),
            }
        }
    };
    edit::splice(tree, class, index, run);
    if let Some(prev) = tree.prev_sibling(run[0]) {
        if tree.kind(prev) == SyntaxKind::LBrace {
            edit::insert_whitespace(tree, class, index, " ");
        }
    }
    for &constant in run {
        join_constant(tree, class, constant);
        strip_implicit_modifiers(tree, class, constant);
    }
    Ok(run[0])
}

/// Give a newly placed constant one comma towards each neighbouring constant
/// that is not already separated from it.
fn join_constant(tree: &mut SyntaxTree, class: NodeId, constant: NodeId) {
    let neighbour = |tree: &SyntaxTree, mut current: Option<NodeId>, forward: bool| {
        while let Some(node) = current {
            if !tree.is_skippable(node) {
                return Some(node);
            }
            current = if forward {
                tree.next_sibling(node)
            } else {
                tree.prev_sibling(node)
            };
        }
        None
    };
    let prev = neighbour(tree, tree.prev_sibling(constant), false);
    if let Some(prev) = prev.filter(|&p| tree.kind(p) == SyntaxKind::EnumConstant) {
        edit::insert_token(tree, class, index_after(tree, prev), SyntaxKind::Comma);
    }
    let next = neighbour(tree, tree.next_sibling(constant), true);
    if next.map_or(false, |n| tree.kind(n) == SyntaxKind::EnumConstant) {
        edit::insert_token(tree, class, index_after(tree, constant), SyntaxKind::Comma);
    }
}

fn strip_implicit_modifiers(tree: &mut SyntaxTree, owner: NodeId, member: NodeId) {
    if tree.kind(owner) != SyntaxKind::Class {
        return;
    }
    let implicit = match tree.kind(member) {
        SyntaxKind::EnumConstant => ENUM_IMPLICIT,
        SyntaxKind::Method if tree.is_enum(owner) && tree.is_constructor(member) => ENUM_IMPLICIT,
        SyntaxKind::Method | SyntaxKind::AnnotationMethod | SyntaxKind::Field
            if tree.is_interface(owner) =>
        {
            INTERFACE_IMPLICIT
        }
        _ => return,
    };
    let Some(list) = tree.child_of_kind(member, SyntaxKind::ModifierList) else {
        return;
    };
    let doomed: Vec<NodeId> = tree
        .children(list)
        .iter()
        .copied()
        .filter(|&c| implicit.contains(tree.kind(c)))
        .collect();
    if !doomed.is_empty() {
        tracing::debug!(member = ?tree.kind(member), count = doomed.len(), "stripping implicit modifiers");
    }
    for keyword in doomed {
        edit::remove(tree, keyword);
    }
}

fn class_delete(tree: &mut SyntaxTree, class: NodeId, child: NodeId) -> Result<(), EditError> {
    match tree.kind(child) {
        SyntaxKind::EnumConstant => {
            let comma = adjacent_separator(tree, child, SyntaxKind::Comma);
            edit::remove(tree, child);
            if let Some(comma) = comma {
                edit::remove(tree, comma);
            }
            Ok(())
        }
        SyntaxKind::Field => declaration::delete_variable(tree, class, child),
        _ => delete_unless_required(
            tree,
            class,
            child,
            &[
                Role::ModifierList,
                Role::ClassOrInterfaceKeyword,
                Role::At,
                Role::Name,
                Role::TypeParameterList,
                Role::ExtendsList,
                Role::ImplementsList,
                Role::LBrace,
                Role::RBrace,
            ],
        ),
    }
}

fn body_delete(tree: &mut SyntaxTree, owner: NodeId, child: NodeId) -> Result<(), EditError> {
    match tree.kind(child) {
        SyntaxKind::Field => declaration::delete_variable(tree, owner, child),
        _ => delete_unless_required(tree, owner, child, &[Role::LBrace, Role::RBrace]),
    }
}

impl SyntaxTree {
    pub fn is_enum(&self, class: NodeId) -> bool {
        self.child_of_kind(class, SyntaxKind::EnumKw).is_some()
    }

    /// Interfaces and annotation types.
    pub fn is_interface(&self, class: NodeId) -> bool {
        self.child_of_kind(class, SyntaxKind::InterfaceKw).is_some()
    }

    pub fn is_annotation_type(&self, class: NodeId) -> bool {
        self.kind(class) == SyntaxKind::Class && self.child_of_kind(class, SyntaxKind::At).is_some()
    }

    /// Members between the braces of a class, anonymous class or enum
    /// constant body.
    pub fn members(&self, owner: NodeId) -> Vec<NodeId> {
        self.children(owner)
            .iter()
            .copied()
            .filter(|&c| tables::CLASS_MEMBERS.contains(self.kind(c)))
            .collect()
    }

    pub fn fields(&self, owner: NodeId) -> Vec<NodeId> {
        self.children_of_kind(owner, SyntaxKind::Field).collect()
    }

    pub fn methods(&self, owner: NodeId) -> Vec<NodeId> {
        self.children(owner)
            .iter()
            .copied()
            .filter(|&c| METHODS.contains(self.kind(c)))
            .collect()
    }

    pub fn inner_classes(&self, owner: NodeId) -> Vec<NodeId> {
        self.children_of_kind(owner, SyntaxKind::Class).collect()
    }

    pub fn enum_constants(&self, class: NodeId) -> Vec<NodeId> {
        self.children_of_kind(class, SyntaxKind::EnumConstant).collect()
    }

    pub fn find_field(&self, owner: NodeId, name: &str) -> Option<NodeId> {
        self.children(owner)
            .iter()
            .copied()
            .filter(|&c| matches!(self.kind(c), SyntaxKind::Field | SyntaxKind::EnumConstant))
            .find(|&c| self.name(c).as_deref() == Some(name))
    }

    pub fn find_methods(&self, owner: NodeId, name: &str) -> Vec<NodeId> {
        self.methods(owner)
            .into_iter()
            .filter(|&m| self.name(m).as_deref() == Some(name))
            .collect()
    }

    pub fn find_inner_class(&self, owner: NodeId, name: &str) -> Option<NodeId> {
        self.inner_classes(owner)
            .into_iter()
            .find(|&c| self.name(c).as_deref() == Some(name))
    }

    /// Dotted name of a top-level or member class, including the package.
    /// `None` for local and anonymous classes.
    pub fn class_qualified_name(&self, class: NodeId) -> Option<String> {
        let name = self.name(class)?;
        let parent = self.parent(class)?;
        match self.kind(parent) {
            SyntaxKind::JavaFile => {
                let package = self.package_name(parent);
                Some(if package.is_empty() {
                    name.to_string()
                } else {
                    format!("{package}.{name}")
                })
            }
            SyntaxKind::Class => Some(format!("{}.{}", self.class_qualified_name(parent)?, name)),
            _ => None,
        }
    }

    /// The class-like declaration a node belongs to.
    pub fn containing_class(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id)
            .skip(1)
            .find(|&n| tables::CLASS_BODIES.contains(self.kind(n)))
    }
}
