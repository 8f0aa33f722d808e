//! Per-kind behaviour records.
//!
//! Every composite kind maps to one [`Behavior`]: how it classifies its
//! children into roles, how it finds a child by role, how it repairs itself
//! around inserted and deleted children, and where its navigation offset is.
//! Constructs only override the entries they need; everything else comes from
//! [`DEFAULT`].

use psi_syntax::{SyntaxKind, TextSize};

use crate::edit;
use crate::error::EditError;
use crate::nodes::{
    annotation, block, class, declaration, expressions, file, lists, method, reference,
    statements, trivia_role, variable,
};
use crate::role::Role;
use crate::{NodeId, SyntaxTree};

pub(crate) type RoleOf = fn(&SyntaxTree, NodeId, NodeId) -> Role;
pub(crate) type FindChild = fn(&SyntaxTree, NodeId, Role) -> Option<NodeId>;
pub(crate) type Insert =
    fn(&mut SyntaxTree, NodeId, &[NodeId], Option<NodeId>, bool) -> Result<NodeId, EditError>;
pub(crate) type Delete = fn(&mut SyntaxTree, NodeId, NodeId) -> Result<(), EditError>;
pub(crate) type TextOffset = fn(&SyntaxTree, NodeId) -> TextSize;
pub(crate) type Accepts = fn(&SyntaxTree, NodeId, SyntaxKind) -> bool;

pub(crate) struct Behavior {
    pub(crate) role_of: RoleOf,
    pub(crate) find_child_by_role: FindChild,
    pub(crate) accepts: Accepts,
    pub(crate) insert: Insert,
    pub(crate) delete: Delete,
    pub(crate) text_offset: TextOffset,
}

pub(crate) const DEFAULT: Behavior = Behavior {
    role_of: default_role_of,
    find_child_by_role: find_by_scanning,
    accepts: accept_any,
    insert: default_insert,
    delete: default_delete,
    text_offset: default_text_offset,
};

pub(crate) fn default_role_of(tree: &SyntaxTree, parent: NodeId, child: NodeId) -> Role {
    trivia_role(tree, parent, child).unwrap_or(Role::None)
}

/// The first child the kind's `role_of` classifies as `role`.
pub(crate) fn find_by_scanning(tree: &SyntaxTree, parent: NodeId, role: Role) -> Option<NodeId> {
    let role_of = behavior(tree.kind(parent)).role_of;
    tree.children(parent)
        .iter()
        .copied()
        .find(|&child| role_of(tree, parent, child) == role)
}

pub(crate) fn accept_any(_: &SyntaxTree, _: NodeId, _: SyntaxKind) -> bool {
    true
}

pub(crate) fn default_insert(
    tree: &mut SyntaxTree,
    parent: NodeId,
    run: &[NodeId],
    anchor: Option<NodeId>,
    before: bool,
) -> Result<NodeId, EditError> {
    let index = edit::anchor_index(tree, parent, anchor, before);
    edit::splice(tree, parent, index, run);
    Ok(run[0])
}

pub(crate) fn default_delete(
    tree: &mut SyntaxTree,
    _parent: NodeId,
    child: NodeId,
) -> Result<(), EditError> {
    edit::remove(tree, child);
    Ok(())
}

pub(crate) fn default_text_offset(tree: &SyntaxTree, id: NodeId) -> TextSize {
    tree.start_offset(id)
}

/// Offset of the node's name identifier, falling back to its start.
pub(crate) fn name_text_offset(tree: &SyntaxTree, id: NodeId) -> TextSize {
    match tree.find_child_by_role(id, Role::Name) {
        Some(name) => tree.start_offset(name),
        None => tree.start_offset(id),
    }
}

pub(crate) fn behavior(kind: SyntaxKind) -> &'static Behavior {
    use SyntaxKind as K;
    match kind {
        K::JavaFile => &file::JAVA_FILE,
        K::PackageStatement => &file::PACKAGE_STATEMENT,
        K::ImportList => &file::IMPORT_LIST,
        K::ImportStatement | K::ImportStaticStatement => &file::IMPORT_STATEMENT,

        K::Class => &class::CLASS,
        K::AnonymousClass => &class::ANONYMOUS_CLASS,
        K::EnumConstantInitializer => &class::ENUM_CONSTANT_INITIALIZER,
        K::EnumConstant => &class::ENUM_CONSTANT,
        K::ClassInitializer => &class::CLASS_INITIALIZER,

        K::Method | K::AnnotationMethod => &method::METHOD,

        K::Field | K::LocalVariable | K::Parameter | K::ResourceVariable => &variable::VARIABLE,

        K::ParameterList
        | K::ExpressionList
        | K::TypeParameterList
        | K::ReferenceParameterList
        | K::ExtendsList
        | K::ImplementsList
        | K::ThrowsList
        | K::ExtendsBoundList
        | K::AnnotationParameterList
        | K::AnnotationArrayInitializer
        | K::ArrayInitializerExpression
        | K::ResourceList => &lists::LIST,

        K::ModifierList => &annotation::MODIFIER_LIST,
        K::Annotation => &annotation::ANNOTATION,
        K::NameValuePair => &annotation::NAME_VALUE_PAIR,

        K::JavaCodeReference => &reference::CODE_REFERENCE,
        K::Type => &reference::TYPE,
        K::TypeParameter => &reference::TYPE_PARAMETER,

        K::CodeBlock => &block::CODE_BLOCK,
        K::BlockStatement => &block::BLOCK_STATEMENT,
        K::DeclarationStatement => &declaration::DECLARATION_STATEMENT,

        K::EmptyStatement
        | K::ExpressionStatement
        | K::ExpressionListStatement
        | K::BreakStatement
        | K::ContinueStatement
        | K::ReturnStatement
        | K::ThrowStatement => &statements::SIMPLE_STATEMENT,
        K::IfStatement => &statements::IF_STATEMENT,
        K::WhileStatement | K::DoWhileStatement => &statements::WHILE_STATEMENT,
        K::ForStatement => &statements::FOR_STATEMENT,
        K::ForeachStatement => &statements::FOREACH_STATEMENT,
        K::SwitchStatement => &statements::SWITCH_STATEMENT,
        K::SwitchLabelStatement => &statements::SWITCH_LABEL_STATEMENT,
        K::LabeledStatement => &statements::LABELED_STATEMENT,
        K::SynchronizedStatement => &statements::SYNCHRONIZED_STATEMENT,
        K::TryStatement => &statements::TRY_STATEMENT,
        K::CatchSection => &statements::CATCH_SECTION,
        K::AssertStatement => &statements::ASSERT_STATEMENT,

        K::LiteralExpression
        | K::ThisExpression
        | K::SuperExpression
        | K::ParenthesizedExpression
        | K::ClassObjectAccessExpression
        | K::InstanceOfExpression
        | K::TypeCastExpression => &expressions::SIMPLE_EXPRESSION,
        K::ReferenceExpression => &expressions::REFERENCE_EXPRESSION,
        K::MethodCallExpression => &expressions::METHOD_CALL,
        K::NewExpression => &expressions::NEW_EXPRESSION,
        K::ArrayAccessExpression => &expressions::ARRAY_ACCESS,
        K::PrefixExpression | K::PostfixExpression => &expressions::UNARY,
        K::BinaryExpression | K::AssignmentExpression => &expressions::BINARY,
        K::ConditionalExpression => &expressions::CONDITIONAL,

        _ => &DEFAULT,
    }
}

impl SyntaxTree {
    /// Role of `child` within `parent`.
    ///
    /// For unique roles the answer agrees with [`SyntaxTree::find_child_by_role`]:
    /// a child that would share a unique role with an earlier sibling gets
    /// [`Role::None`].
    pub fn role_of(&self, parent: NodeId, child: NodeId) -> Role {
        if self.parent(child) != Some(parent) {
            crate::psi_assert!(false, "{child:?} is not a child of {parent:?}");
            return Role::None;
        }
        let behavior = behavior(self.kind(parent));
        let role = (behavior.role_of)(self, parent, child);
        if role.is_unique() && (behavior.find_child_by_role)(self, parent, role) != Some(child) {
            return Role::None;
        }
        role
    }

    /// The unique child of `parent` with `role`.
    pub fn find_child_by_role(&self, parent: NodeId, role: Role) -> Option<NodeId> {
        if !crate::psi_assert!(role.is_unique(), "{role:?} is not a unique role") {
            return None;
        }
        (behavior(self.kind(parent)).find_child_by_role)(self, parent, role)
    }

    /// Offset navigation should land on: the name for named declarations,
    /// the node start otherwise.
    pub fn text_offset(&self, id: NodeId) -> TextSize {
        (behavior(self.kind(id)).text_offset)(self, id)
    }
}
