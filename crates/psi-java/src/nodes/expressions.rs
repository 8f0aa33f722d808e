//! Expression constructs.
//!
//! Operand roles are positional: the first expression child of a binary or
//! assignment expression is its left operand and the last one its right
//! operand. The parser always puts the operator token between them, so no
//! construct has to look for the operator to decide sidedness.

use psi_syntax::{tables, SyntaxKind, TokenSet};

use crate::behavior::{Behavior, DEFAULT};
use crate::edit;
use crate::error::EditError;
use crate::nodes::{delete_unless_required, first_in, last_in, precedes, trivia_role};
use crate::role::Role;
use crate::{NodeId, SyntaxTree};

pub(crate) const SIMPLE_EXPRESSION: Behavior = Behavior {
    role_of: simple_role,
    insert: simple_insert,
    delete: |tree, parent, child| {
        delete_unless_required(
            tree,
            parent,
            child,
            &[
                Role::Literal,
                Role::ThisKeyword,
                Role::SuperKeyword,
                Role::ClassKeyword,
                Role::InstanceofKeyword,
                Role::LParenth,
                Role::RParenth,
                Role::CastType,
            ],
        )
    },
    ..DEFAULT
};

pub(crate) const REFERENCE_EXPRESSION: Behavior = Behavior {
    role_of: reference_role,
    insert: qualifier_insert,
    delete: qualified_delete,
    text_offset: |tree, id| match tree.find_child_by_role(id, Role::ReferenceName) {
        Some(name) => tree.start_offset(name),
        None => tree.start_offset(id),
    },
    ..DEFAULT
};

pub(crate) const METHOD_CALL: Behavior = Behavior {
    role_of: |tree, parent, child| {
        if let Some(role) = trivia_role(tree, parent, child) {
            return role;
        }
        match tree.kind(child) {
            SyntaxKind::ReferenceExpression => Role::MethodExpression,
            SyntaxKind::ExpressionList => Role::ArgumentList,
            _ => Role::None,
        }
    },
    delete: |tree, parent, child| {
        delete_unless_required(
            tree,
            parent,
            child,
            &[Role::MethodExpression, Role::ArgumentList],
        )
    },
    ..DEFAULT
};

pub(crate) const NEW_EXPRESSION: Behavior = Behavior {
    role_of: new_role,
    insert: qualifier_insert,
    delete: qualified_delete,
    ..DEFAULT
};

pub(crate) const ARRAY_ACCESS: Behavior = Behavior {
    role_of: |tree, parent, child| {
        if let Some(role) = trivia_role(tree, parent, child) {
            return role;
        }
        match tree.kind(child) {
            SyntaxKind::LBracket => Role::LBracket,
            SyntaxKind::RBracket => Role::RBracket,
            kind if tables::EXPRESSIONS.contains(kind) => {
                match tree.child_of_kind(parent, SyntaxKind::LBracket) {
                    Some(bracket) if precedes(tree, bracket, child) => Role::IndexExpression,
                    _ => Role::ArrayExpression,
                }
            }
            _ => Role::None,
        }
    },
    delete: |tree, parent, child| {
        delete_unless_required(
            tree,
            parent,
            child,
            &[Role::ArrayExpression, Role::LBracket, Role::RBracket],
        )
    },
    ..DEFAULT
};

pub(crate) const UNARY: Behavior = Behavior {
    role_of: |tree, parent, child| {
        if let Some(role) = trivia_role(tree, parent, child) {
            return role;
        }
        match tree.kind(child) {
            kind if tables::PREFIX_OPERATORS.contains(kind) => Role::OperationSign,
            kind if tables::EXPRESSIONS.contains(kind) => Role::Operand,
            _ => Role::None,
        }
    },
    delete: |tree, parent, child| {
        delete_unless_required(tree, parent, child, &[Role::OperationSign])
    },
    ..DEFAULT
};

const BINARY_SIGNS: TokenSet = tables::BINARY_OPERATORS.union(tables::ASSIGNMENT_OPERATORS);

pub(crate) const BINARY: Behavior = Behavior {
    role_of: binary_role,
    delete: |tree, parent, child| {
        delete_unless_required(tree, parent, child, &[Role::LOperand, Role::OperationSign])
    },
    ..DEFAULT
};

pub(crate) const CONDITIONAL: Behavior = Behavior {
    role_of: conditional_role,
    delete: |tree, parent, child| {
        delete_unless_required(tree, parent, child, &[Role::Condition, Role::Quest])
    },
    ..DEFAULT
};

fn simple_role(tree: &SyntaxTree, expr: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, expr, child) {
        return role;
    }
    let kind = tree.kind(child);
    match (tree.kind(expr), kind) {
        (SyntaxKind::LiteralExpression, k) if tables::LITERAL_TOKENS.contains(k) => Role::Literal,
        (SyntaxKind::ThisExpression | SyntaxKind::SuperExpression, SyntaxKind::JavaCodeReference) => {
            Role::Qualifier
        }
        (_, SyntaxKind::ThisKw) => Role::ThisKeyword,
        (_, SyntaxKind::SuperKw) => Role::SuperKeyword,
        (_, SyntaxKind::Dot) => Role::Dot,
        (_, SyntaxKind::LParen) => Role::LParenth,
        (_, SyntaxKind::RParen) => Role::RParenth,
        (SyntaxKind::ClassObjectAccessExpression | SyntaxKind::InstanceOfExpression, SyntaxKind::Type) => {
            Role::Type
        }
        (SyntaxKind::ClassObjectAccessExpression, SyntaxKind::ClassKw) => Role::ClassKeyword,
        (SyntaxKind::InstanceOfExpression, SyntaxKind::InstanceofKw) => Role::InstanceofKeyword,
        (SyntaxKind::TypeCastExpression, SyntaxKind::Type) => Role::CastType,
        (SyntaxKind::ParenthesizedExpression, k) if tables::EXPRESSIONS.contains(k) => {
            Role::Expression
        }
        (SyntaxKind::InstanceOfExpression | SyntaxKind::TypeCastExpression, k)
            if tables::EXPRESSIONS.contains(k) =>
        {
            Role::Operand
        }
        _ => Role::None,
    }
}

fn simple_insert(
    tree: &mut SyntaxTree,
    expr: NodeId,
    run: &[NodeId],
    anchor: Option<NodeId>,
    before: bool,
) -> Result<NodeId, EditError> {
    let index = if tree.kind(expr) == SyntaxKind::ParenthesizedExpression {
        edit::bracketed_index(tree, expr, anchor, before, SyntaxKind::LParen, SyntaxKind::RParen)
    } else {
        edit::anchor_index(tree, expr, anchor, before)
    };
    edit::splice(tree, expr, index, run);
    Ok(run[0])
}

fn reference_role(tree: &SyntaxTree, reference: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, reference, child) {
        return role;
    }
    match tree.kind(child) {
        SyntaxKind::Dot => Role::Dot,
        SyntaxKind::ReferenceParameterList => Role::ReferenceParameterList,
        SyntaxKind::Identifier | SyntaxKind::ThisKw | SyntaxKind::SuperKw => Role::ReferenceName,
        kind if tables::EXPRESSIONS.contains(kind) => Role::Qualifier,
        _ => Role::None,
    }
}

fn new_role(tree: &SyntaxTree, expr: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, expr, child) {
        return role;
    }
    let new_kw = tree.child_of_kind(expr, SyntaxKind::NewKw);
    let after_new = new_kw.is_some_and(|kw| precedes(tree, kw, child));
    match tree.kind(child) {
        SyntaxKind::NewKw => Role::NewKeyword,
        SyntaxKind::Dot if !after_new => Role::Dot,
        SyntaxKind::JavaCodeReference => Role::ClassReference,
        kind if tables::PRIMITIVE_TYPE_KEYWORDS.contains(kind) => Role::TypeKeyword,
        SyntaxKind::LBracket => Role::LBracket,
        SyntaxKind::RBracket => Role::RBracket,
        SyntaxKind::ExpressionList => Role::ArgumentList,
        SyntaxKind::AnonymousClass => Role::AnonymousClass,
        SyntaxKind::ArrayInitializerExpression if after_new => Role::ArrayInitializer,
        kind if tables::EXPRESSIONS.contains(kind) => {
            if after_new {
                Role::ArrayDimension
            } else {
                Role::Qualifier
            }
        }
        _ => Role::None,
    }
}

/// Inserting a qualifier in front of an unqualified reference or `new`
/// synthesizes the `.` after it.
fn qualifier_insert(
    tree: &mut SyntaxTree,
    expr: NodeId,
    run: &[NodeId],
    anchor: Option<NodeId>,
    before: bool,
) -> Result<NodeId, EditError> {
    let qualifies = run.len() == 1
        && tables::EXPRESSIONS.contains(tree.kind(run[0]))
        && tree.kind(run[0]) != SyntaxKind::ArrayInitializerExpression
        && anchor.is_none()
        && !before
        && tree.find_child_by_role(expr, Role::Qualifier).is_none();
    if !qualifies {
        let index = edit::anchor_index(tree, expr, anchor, before);
        edit::splice(tree, expr, index, run);
        return Ok(run[0]);
    }
    edit::insert_token(tree, expr, 0, SyntaxKind::Dot);
    edit::splice(tree, expr, 0, run);
    Ok(run[0])
}

/// Removing the qualifier takes its `.` along.
fn qualified_delete(tree: &mut SyntaxTree, expr: NodeId, child: NodeId) -> Result<(), EditError> {
    let role = tree.role_of(expr, child);
    match role {
        Role::Qualifier | Role::Dot => {
            let qualifier = tree.find_child_by_role(expr, Role::Qualifier);
            let dot = tree.find_child_by_role(expr, Role::Dot);
            for id in [qualifier, dot].into_iter().flatten() {
                edit::remove(tree, id);
            }
            Ok(())
        }
        _ => delete_unless_required(
            tree,
            expr,
            child,
            &[
                Role::ReferenceName,
                Role::ReferenceParameterList,
                Role::NewKeyword,
                Role::ClassReference,
                Role::TypeKeyword,
            ],
        ),
    }
}

fn binary_role(tree: &SyntaxTree, expr: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, expr, child) {
        return role;
    }
    let kind = tree.kind(child);
    if BINARY_SIGNS.contains(kind) {
        return Role::OperationSign;
    }
    if !tables::EXPRESSIONS.contains(kind) {
        return Role::None;
    }
    if first_in(tree, expr, tables::EXPRESSIONS) == Some(child) {
        Role::LOperand
    } else if last_in(tree, expr, tables::EXPRESSIONS) == Some(child) {
        Role::ROperand
    } else {
        Role::None
    }
}

fn conditional_role(tree: &SyntaxTree, expr: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, expr, child) {
        return role;
    }
    let quest = tree.child_of_kind(expr, SyntaxKind::Question);
    let colon = tree.child_of_kind(expr, SyntaxKind::Colon);
    match tree.kind(child) {
        SyntaxKind::Question => Role::Quest,
        SyntaxKind::Colon => Role::Colon,
        kind if tables::EXPRESSIONS.contains(kind) => {
            match (quest, colon) {
                (Some(q), _) if precedes(tree, child, q) => Role::Condition,
                (None, _) => Role::Condition,
                (Some(_), Some(c)) if precedes(tree, c, child) => Role::ElseExpression,
                (Some(_), _) => Role::ThenExpression,
            }
        }
        _ => Role::None,
    }
}

impl SyntaxTree {
    pub fn l_operand(&self, expr: NodeId) -> Option<NodeId> {
        self.find_child_by_role(expr, Role::LOperand)
    }

    pub fn r_operand(&self, expr: NodeId) -> Option<NodeId> {
        self.find_child_by_role(expr, Role::ROperand)
    }

    /// Operand of a prefix, postfix, cast or instanceof expression.
    pub fn operand(&self, expr: NodeId) -> Option<NodeId> {
        self.find_child_by_role(expr, Role::Operand)
    }

    /// Operator token kind of a binary, assignment, prefix or postfix
    /// expression.
    pub fn operation_sign(&self, expr: NodeId) -> Option<SyntaxKind> {
        self.find_child_by_role(expr, Role::OperationSign)
            .map(|sign| self.kind(sign))
    }

    pub fn method_expression(&self, call: NodeId) -> Option<NodeId> {
        self.find_child_by_role(call, Role::MethodExpression)
    }

    /// Argument expressions of a method call or `new` expression.
    pub fn arguments(&self, call: NodeId) -> Vec<NodeId> {
        let list = match self.kind(call) {
            SyntaxKind::NewExpression => self
                .find_child_by_role(call, Role::ArgumentList)
                .or_else(|| {
                    self.find_child_by_role(call, Role::AnonymousClass)
                        .and_then(|class| self.child_of_kind(class, SyntaxKind::ExpressionList))
                }),
            _ => self.find_child_by_role(call, Role::ArgumentList),
        };
        list.map(|list| crate::nodes::lists::elements(self, list))
            .unwrap_or_default()
    }

    /// Qualifier of a reference expression, `new` expression or qualified
    /// `this`/`super`.
    pub fn qualifier(&self, expr: NodeId) -> Option<NodeId> {
        self.find_child_by_role(expr, Role::Qualifier)
    }

    /// The expression inside any number of parentheses.
    pub fn unparenthesize(&self, mut expr: NodeId) -> Option<NodeId> {
        while self.kind(expr) == SyntaxKind::ParenthesizedExpression {
            expr = self.find_child_by_role(expr, Role::Expression)?;
        }
        Some(expr)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::factory::create_expression_from_text;

    fn expression(tree: &mut SyntaxTree, text: &str) -> NodeId {
        create_expression_from_text(tree, text).unwrap()
    }

    #[test]
    fn binary_operands_are_positional() {
        let mut tree = SyntaxTree::parse("");
        let expr = expression(&mut tree, "a + b * c");
        let left = tree.l_operand(expr).unwrap();
        let right = tree.r_operand(expr).unwrap();
        assert_eq!(tree.text(left), "a");
        assert_eq!(tree.text(right), "b * c");
        assert_eq!(tree.operation_sign(expr), Some(SyntaxKind::Plus));
        assert_eq!(tree.role_of(expr, left), Role::LOperand);
        assert_eq!(tree.role_of(expr, right), Role::ROperand);
    }

    #[test]
    fn shifts_are_single_signs() {
        let mut tree = SyntaxTree::parse("");
        let expr = expression(&mut tree, "x >>>= 2");
        assert_eq!(tree.operation_sign(expr), Some(SyntaxKind::UnsignedRightShiftEq));
        assert_eq!(tree.text(tree.r_operand(expr).unwrap()), "2");
    }

    #[test]
    fn conditional_branches() {
        let mut tree = SyntaxTree::parse("");
        let expr = expression(&mut tree, "c ? 1 : 2");
        let then = tree.find_child_by_role(expr, Role::ThenExpression).unwrap();
        let otherwise = tree.find_child_by_role(expr, Role::ElseExpression).unwrap();
        assert_eq!(tree.text(then), "1");
        assert_eq!(tree.text(otherwise), "2");
        assert_eq!(tree.text(tree.find_child_by_role(expr, Role::Condition).unwrap()), "c");
    }

    #[test]
    fn new_expression_roles() {
        let mut tree = SyntaxTree::parse("");
        let array = expression(&mut tree, "new int[n] {}");
        let dims: Vec<_> = tree
            .children(array)
            .iter()
            .filter(|&&c| tree.role_of(array, c) == Role::ArrayDimension)
            .map(|&c| tree.text(c))
            .collect();
        assert_eq!(dims, vec!["n"]);
        assert!(tree.find_child_by_role(array, Role::TypeKeyword).is_some());
        assert!(tree.find_child_by_role(array, Role::ArrayInitializer).is_some());

        let inner = expression(&mut tree, "outer.new Inner(1, 2)");
        assert_eq!(tree.text(tree.qualifier(inner).unwrap()), "outer");
        assert_eq!(tree.arguments(inner).len(), 2);
    }

    #[test]
    fn qualifier_comes_with_its_dot() {
        let mut tree = SyntaxTree::parse("");
        let call = expression(&mut tree, "foo()");
        let reference = tree.method_expression(call).unwrap();
        let qualifier = expression(&mut tree, "this");
        tree.insert(reference, qualifier, qualifier, None, false).unwrap();
        assert_eq!(tree.text(call), "this.foo()");

        tree.delete(qualifier).unwrap();
        assert_eq!(tree.text(call), "foo()");
        assert!(tree.qualifier(reference).is_none());
    }

    #[test]
    fn unparenthesize_strips_every_level() {
        let mut tree = SyntaxTree::parse("");
        let expr = expression(&mut tree, "((x))");
        assert_eq!(tree.text(tree.unparenthesize(expr).unwrap()), "x");
        assert_eq!(
            tree.role_of(expr, tree.find_child_by_role(expr, Role::Expression).unwrap()),
            Role::Expression
        );
    }
}
