//! Shared classification sets.
//!
//! Every predicate of the form "is this kind an expression / statement /
//! modifier ..." is answered by exactly one set defined here. Callers must not
//! keep private copies with divergent membership.

use crate::{SyntaxKind as K, TokenSet};

pub const WHITESPACE_OR_COMMENT: TokenSet = TokenSet::new([
    K::Whitespace,
    K::EndOfLineComment,
    K::CStyleComment,
    K::DocComment,
]);

pub const COMMENTS: TokenSet =
    TokenSet::new([K::EndOfLineComment, K::CStyleComment, K::DocComment]);

/// Skipped by scans that look for the next "real" sibling.
pub const WHITESPACE_COMMENT_OR_ERROR: TokenSet =
    WHITESPACE_OR_COMMENT.union(TokenSet::new([K::ErrorElement, K::BadCharacter]));

pub const MODIFIER_KEYWORDS: TokenSet = TokenSet::new([
    K::PublicKw,
    K::ProtectedKw,
    K::PrivateKw,
    K::AbstractKw,
    K::StaticKw,
    K::FinalKw,
    K::TransientKw,
    K::VolatileKw,
    K::SynchronizedKw,
    K::NativeKw,
    K::StrictfpKw,
]);

/// Modifier order used when a modifier is added programmatically.
pub const MODIFIER_ORDER: [K; 11] = [
    K::PublicKw,
    K::ProtectedKw,
    K::PrivateKw,
    K::AbstractKw,
    K::StaticKw,
    K::FinalKw,
    K::TransientKw,
    K::VolatileKw,
    K::SynchronizedKw,
    K::NativeKw,
    K::StrictfpKw,
];

pub const CLASS_KEYWORDS: TokenSet = TokenSet::new([K::ClassKw, K::InterfaceKw, K::EnumKw]);

pub const PRIMITIVE_TYPE_KEYWORDS: TokenSet = TokenSet::new([
    K::BooleanKw,
    K::ByteKw,
    K::ShortKw,
    K::IntKw,
    K::LongKw,
    K::CharKw,
    K::FloatKw,
    K::DoubleKw,
    K::VoidKw,
]);

pub const LITERAL_TOKENS: TokenSet = TokenSet::new([
    K::IntegerLiteral,
    K::LongLiteral,
    K::FloatLiteral,
    K::DoubleLiteral,
    K::CharacterLiteral,
    K::StringLiteral,
    K::TrueKw,
    K::FalseKw,
    K::NullKw,
]);

pub const INTEGER_LITERALS: TokenSet = TokenSet::new([K::IntegerLiteral, K::LongLiteral]);

pub const EXPRESSIONS: TokenSet = TokenSet::new([
    K::LiteralExpression,
    K::ReferenceExpression,
    K::MethodCallExpression,
    K::ThisExpression,
    K::SuperExpression,
    K::ParenthesizedExpression,
    K::NewExpression,
    K::ArrayInitializerExpression,
    K::ArrayAccessExpression,
    K::PrefixExpression,
    K::PostfixExpression,
    K::BinaryExpression,
    K::AssignmentExpression,
    K::ConditionalExpression,
    K::TypeCastExpression,
    K::InstanceOfExpression,
    K::ClassObjectAccessExpression,
]);

pub const STATEMENTS: TokenSet = TokenSet::new([
    K::BlockStatement,
    K::EmptyStatement,
    K::ExpressionStatement,
    K::ExpressionListStatement,
    K::DeclarationStatement,
    K::IfStatement,
    K::WhileStatement,
    K::DoWhileStatement,
    K::ForStatement,
    K::ForeachStatement,
    K::SwitchStatement,
    K::SwitchLabelStatement,
    K::LabeledStatement,
    K::BreakStatement,
    K::ContinueStatement,
    K::ReturnStatement,
    K::ThrowStatement,
    K::SynchronizedStatement,
    K::TryStatement,
    K::AssertStatement,
]);

pub const LOOPS: TokenSet = TokenSet::new([
    K::WhileStatement,
    K::DoWhileStatement,
    K::ForStatement,
    K::ForeachStatement,
]);

pub const CLASS_MEMBERS: TokenSet = TokenSet::new([
    K::Class,
    K::Method,
    K::AnnotationMethod,
    K::Field,
    K::ClassInitializer,
    K::EnumConstant,
]);

/// Nodes that own class members between a `{` `}` pair.
pub const CLASS_BODIES: TokenSet =
    TokenSet::new([K::Class, K::AnonymousClass, K::EnumConstantInitializer]);

/// Nodes that start a new declaration context for jumps and locals.
pub const MEMBER_BOUNDARIES: TokenSet = TokenSet::new([
    K::Method,
    K::AnnotationMethod,
    K::ClassInitializer,
    K::Class,
    K::AnonymousClass,
    K::EnumConstantInitializer,
]);

pub const VARIABLES: TokenSet = TokenSet::new([
    K::Field,
    K::LocalVariable,
    K::Parameter,
    K::EnumConstant,
    K::ResourceVariable,
]);

/// Declarations that may carry a leading doc comment as their first child.
pub const DOC_COMMENT_OWNERS: TokenSet = TokenSet::new([
    K::Class,
    K::Method,
    K::AnnotationMethod,
    K::Field,
    K::EnumConstant,
    K::ClassInitializer,
]);

pub const ASSIGNMENT_OPERATORS: TokenSet = TokenSet::new([
    K::Eq,
    K::PlusEq,
    K::MinusEq,
    K::StarEq,
    K::SlashEq,
    K::PercentEq,
    K::AmpEq,
    K::PipeEq,
    K::CaretEq,
    K::LeftShiftEq,
    K::RightShiftEq,
    K::UnsignedRightShiftEq,
]);

pub const SHIFT_OPERATORS: TokenSet =
    TokenSet::new([K::LeftShift, K::RightShift, K::UnsignedRightShift]);

pub const ADDITIVE_OPERATORS: TokenSet = TokenSet::new([K::Plus, K::Minus]);

pub const MULTIPLICATIVE_OPERATORS: TokenSet = TokenSet::new([K::Star, K::Slash, K::Percent]);

pub const EQUALITY_OPERATORS: TokenSet = TokenSet::new([K::EqEq, K::BangEq]);

pub const RELATIONAL_OPERATORS: TokenSet =
    TokenSet::new([K::Less, K::LessEq, K::Greater, K::GreaterEq]);

pub const BITWISE_OPERATORS: TokenSet = TokenSet::new([K::Amp, K::Pipe, K::Caret]);

pub const CONDITIONAL_OPERATORS: TokenSet = TokenSet::new([K::AmpAmp, K::PipePipe]);

pub const BINARY_OPERATORS: TokenSet = SHIFT_OPERATORS
    .union(ADDITIVE_OPERATORS)
    .union(MULTIPLICATIVE_OPERATORS)
    .union(EQUALITY_OPERATORS)
    .union(RELATIONAL_OPERATORS)
    .union(BITWISE_OPERATORS)
    .union(CONDITIONAL_OPERATORS);

pub const PREFIX_OPERATORS: TokenSet = TokenSet::new([
    K::Plus,
    K::Minus,
    K::PlusPlus,
    K::MinusMinus,
    K::Bang,
    K::Tilde,
]);

pub const POSTFIX_OPERATORS: TokenSet = TokenSet::new([K::PlusPlus, K::MinusMinus]);

/// Composite nodes whose real elements are separated by commas.
pub const COMMA_LISTS: TokenSet = TokenSet::new([
    K::ParameterList,
    K::ExpressionList,
    K::ExtendsList,
    K::ImplementsList,
    K::ThrowsList,
    K::TypeParameterList,
    K::ReferenceParameterList,
    K::AnnotationParameterList,
    K::AnnotationArrayInitializer,
    K::ArrayInitializerExpression,
]);

/// Reference lists introduced by a keyword that disappears with the last entry.
pub const REFERENCE_LISTS: TokenSet =
    TokenSet::new([K::ExtendsList, K::ImplementsList, K::ThrowsList]);

/// Tokens that never want whitespace in front of them.
pub const CLOSING_PUNCTUATION: TokenSet = TokenSet::new([
    K::Comma,
    K::Semicolon,
    K::RParen,
    K::RBracket,
    K::Greater,
    K::Dot,
]);

/// Tokens that never want whitespace after them.
pub const OPENING_PUNCTUATION: TokenSet =
    TokenSet::new([K::LParen, K::LBracket, K::Less, K::Dot, K::At]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expression_and_statement_sets_are_disjoint() {
        for kind in EXPRESSIONS.iter() {
            assert!(!STATEMENTS.contains(kind), "{kind:?}");
        }
        assert!(LOOPS.iter().all(|kind| STATEMENTS.contains(kind)));
    }

    #[test]
    fn binary_operators_exclude_assignments() {
        for kind in ASSIGNMENT_OPERATORS.iter() {
            assert!(!BINARY_OPERATORS.contains(kind), "{kind:?}");
        }
        assert!(BINARY_OPERATORS.contains(K::UnsignedRightShift));
        assert!(BINARY_OPERATORS.contains(K::PipePipe));
    }

    #[test]
    fn modifier_order_matches_modifier_set() {
        assert_eq!(MODIFIER_KEYWORDS.iter().count(), MODIFIER_ORDER.len());
        assert!(MODIFIER_ORDER.iter().all(|kind| MODIFIER_KEYWORDS.contains(*kind)));
    }
}
