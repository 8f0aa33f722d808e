use rowan::Language;
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Unified syntax kind for both tokens and composite Java nodes.
///
/// Token kinds come first; every kind at or after [`SyntaxKind::JavaFile`] is a
/// composite node kind. The composite kinds mirror the shapes produced by the
/// parser: one kind per Java construct, with punctuation and keywords kept as
/// direct children so that every byte of the source is owned by exactly one
/// leaf.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize_repr, Deserialize_repr,
)]
#[repr(u16)]
pub enum SyntaxKind {
    // --- Trivia ---
    Whitespace,
    EndOfLineComment,
    CStyleComment,
    DocComment,

    // --- Identifiers & literals ---
    Identifier,
    IntegerLiteral,
    LongLiteral,
    FloatLiteral,
    DoubleLiteral,
    CharacterLiteral,
    StringLiteral,

    // --- Keywords ---
    AbstractKw,
    AssertKw,
    BooleanKw,
    BreakKw,
    ByteKw,
    CaseKw,
    CatchKw,
    CharKw,
    ClassKw,
    ConstKw,
    ContinueKw,
    DefaultKw,
    DoKw,
    DoubleKw,
    ElseKw,
    EnumKw,
    ExtendsKw,
    FinalKw,
    FinallyKw,
    FloatKw,
    ForKw,
    GotoKw,
    IfKw,
    ImplementsKw,
    ImportKw,
    InstanceofKw,
    IntKw,
    InterfaceKw,
    LongKw,
    NativeKw,
    NewKw,
    PackageKw,
    PrivateKw,
    ProtectedKw,
    PublicKw,
    ReturnKw,
    ShortKw,
    StaticKw,
    StrictfpKw,
    SuperKw,
    SwitchKw,
    SynchronizedKw,
    ThisKw,
    ThrowKw,
    ThrowsKw,
    TransientKw,
    TryKw,
    VoidKw,
    VolatileKw,
    WhileKw,
    TrueKw,
    FalseKw,
    NullKw,

    // --- Operators / punctuation ---
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Ellipsis,
    At,
    Question,
    Colon,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Tilde,
    Bang,

    Eq,
    EqEq,
    BangEq,

    Less,
    LessEq,
    Greater,
    GreaterEq,

    Amp,
    AmpAmp,
    AmpEq,
    Pipe,
    PipePipe,
    PipeEq,
    Caret,
    CaretEq,

    PlusPlus,
    MinusMinus,

    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,

    // The lexer only produces `>` and `>=`; the expression grammar joins
    // adjacent tokens into the shift kinds below.
    LeftShift,
    RightShift,
    UnsignedRightShift,
    LeftShiftEq,
    RightShiftEq,
    UnsignedRightShiftEq,

    // --- Special ---
    BadCharacter,
    Eof,

    // --- Files & fragments ---
    JavaFile,
    DummyHolder,
    ErrorElement,

    // --- Package & imports ---
    PackageStatement,
    ImportList,
    ImportStatement,
    ImportStaticStatement,

    // --- Declarations ---
    Class,
    AnonymousClass,
    EnumConstant,
    EnumConstantInitializer,
    ClassInitializer,
    Method,
    AnnotationMethod,
    Field,
    ModifierList,
    Annotation,
    AnnotationParameterList,
    NameValuePair,
    AnnotationArrayInitializer,
    TypeParameterList,
    TypeParameter,
    ExtendsBoundList,
    ExtendsList,
    ImplementsList,
    ThrowsList,
    ParameterList,
    Parameter,
    LocalVariable,
    ResourceList,
    ResourceVariable,

    // --- Types & references ---
    Type,
    JavaCodeReference,
    ReferenceParameterList,

    // --- Statements ---
    CodeBlock,
    BlockStatement,
    EmptyStatement,
    ExpressionStatement,
    ExpressionListStatement,
    DeclarationStatement,
    IfStatement,
    WhileStatement,
    DoWhileStatement,
    ForStatement,
    ForeachStatement,
    SwitchStatement,
    SwitchLabelStatement,
    LabeledStatement,
    BreakStatement,
    ContinueStatement,
    ReturnStatement,
    ThrowStatement,
    SynchronizedStatement,
    TryStatement,
    CatchSection,
    AssertStatement,

    // --- Expressions ---
    LiteralExpression,
    ReferenceExpression,
    MethodCallExpression,
    ExpressionList,
    ThisExpression,
    SuperExpression,
    ParenthesizedExpression,
    NewExpression,
    ArrayInitializerExpression,
    ArrayAccessExpression,
    PrefixExpression,
    PostfixExpression,
    BinaryExpression,
    AssignmentExpression,
    ConditionalExpression,
    TypeCastExpression,
    InstanceOfExpression,
    ClassObjectAccessExpression,

    __Last,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::Whitespace
                | SyntaxKind::EndOfLineComment
                | SyntaxKind::CStyleComment
                | SyntaxKind::DocComment
        )
    }

    pub fn is_comment(self) -> bool {
        self.is_trivia() && self != SyntaxKind::Whitespace
    }

    /// `true` for token kinds (leaves), `false` for composite node kinds.
    pub fn is_token(self) -> bool {
        (self as u16) < (SyntaxKind::JavaFile as u16)
    }

    pub fn is_keyword(self) -> bool {
        (self as u16) >= (SyntaxKind::AbstractKw as u16) && (self as u16) <= (SyntaxKind::NullKw as u16)
    }

    pub fn from_raw(raw: u16) -> SyntaxKind {
        if raw < SyntaxKind::__Last as u16 {
            // SAFETY: We've verified the numeric value is within the enum range.
            unsafe { std::mem::transmute::<u16, SyntaxKind>(raw) }
        } else {
            SyntaxKind::ErrorElement
        }
    }

    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        Some(match text {
            "abstract" => SyntaxKind::AbstractKw,
            "assert" => SyntaxKind::AssertKw,
            "boolean" => SyntaxKind::BooleanKw,
            "break" => SyntaxKind::BreakKw,
            "byte" => SyntaxKind::ByteKw,
            "case" => SyntaxKind::CaseKw,
            "catch" => SyntaxKind::CatchKw,
            "char" => SyntaxKind::CharKw,
            "class" => SyntaxKind::ClassKw,
            "const" => SyntaxKind::ConstKw,
            "continue" => SyntaxKind::ContinueKw,
            "default" => SyntaxKind::DefaultKw,
            "do" => SyntaxKind::DoKw,
            "double" => SyntaxKind::DoubleKw,
            "else" => SyntaxKind::ElseKw,
            "enum" => SyntaxKind::EnumKw,
            "extends" => SyntaxKind::ExtendsKw,
            "final" => SyntaxKind::FinalKw,
            "finally" => SyntaxKind::FinallyKw,
            "float" => SyntaxKind::FloatKw,
            "for" => SyntaxKind::ForKw,
            "goto" => SyntaxKind::GotoKw,
            "if" => SyntaxKind::IfKw,
            "implements" => SyntaxKind::ImplementsKw,
            "import" => SyntaxKind::ImportKw,
            "instanceof" => SyntaxKind::InstanceofKw,
            "int" => SyntaxKind::IntKw,
            "interface" => SyntaxKind::InterfaceKw,
            "long" => SyntaxKind::LongKw,
            "native" => SyntaxKind::NativeKw,
            "new" => SyntaxKind::NewKw,
            "package" => SyntaxKind::PackageKw,
            "private" => SyntaxKind::PrivateKw,
            "protected" => SyntaxKind::ProtectedKw,
            "public" => SyntaxKind::PublicKw,
            "return" => SyntaxKind::ReturnKw,
            "short" => SyntaxKind::ShortKw,
            "static" => SyntaxKind::StaticKw,
            "strictfp" => SyntaxKind::StrictfpKw,
            "super" => SyntaxKind::SuperKw,
            "switch" => SyntaxKind::SwitchKw,
            "synchronized" => SyntaxKind::SynchronizedKw,
            "this" => SyntaxKind::ThisKw,
            "throw" => SyntaxKind::ThrowKw,
            "throws" => SyntaxKind::ThrowsKw,
            "transient" => SyntaxKind::TransientKw,
            "try" => SyntaxKind::TryKw,
            "void" => SyntaxKind::VoidKw,
            "volatile" => SyntaxKind::VolatileKw,
            "while" => SyntaxKind::WhileKw,
            "true" => SyntaxKind::TrueKw,
            "false" => SyntaxKind::FalseKw,
            "null" => SyntaxKind::NullKw,
            _ => return None,
        })
    }

    /// Fixed source text of keyword and punctuation kinds.
    pub fn fixed_text(self) -> Option<&'static str> {
        Some(match self {
            SyntaxKind::AbstractKw => "abstract",
            SyntaxKind::AssertKw => "assert",
            SyntaxKind::BooleanKw => "boolean",
            SyntaxKind::BreakKw => "break",
            SyntaxKind::ByteKw => "byte",
            SyntaxKind::CaseKw => "case",
            SyntaxKind::CatchKw => "catch",
            SyntaxKind::CharKw => "char",
            SyntaxKind::ClassKw => "class",
            SyntaxKind::ConstKw => "const",
            SyntaxKind::ContinueKw => "continue",
            SyntaxKind::DefaultKw => "default",
            SyntaxKind::DoKw => "do",
            SyntaxKind::DoubleKw => "double",
            SyntaxKind::ElseKw => "else",
            SyntaxKind::EnumKw => "enum",
            SyntaxKind::ExtendsKw => "extends",
            SyntaxKind::FinalKw => "final",
            SyntaxKind::FinallyKw => "finally",
            SyntaxKind::FloatKw => "float",
            SyntaxKind::ForKw => "for",
            SyntaxKind::GotoKw => "goto",
            SyntaxKind::IfKw => "if",
            SyntaxKind::ImplementsKw => "implements",
            SyntaxKind::ImportKw => "import",
            SyntaxKind::InstanceofKw => "instanceof",
            SyntaxKind::IntKw => "int",
            SyntaxKind::InterfaceKw => "interface",
            SyntaxKind::LongKw => "long",
            SyntaxKind::NativeKw => "native",
            SyntaxKind::NewKw => "new",
            SyntaxKind::PackageKw => "package",
            SyntaxKind::PrivateKw => "private",
            SyntaxKind::ProtectedKw => "protected",
            SyntaxKind::PublicKw => "public",
            SyntaxKind::ReturnKw => "return",
            SyntaxKind::ShortKw => "short",
            SyntaxKind::StaticKw => "static",
            SyntaxKind::StrictfpKw => "strictfp",
            SyntaxKind::SuperKw => "super",
            SyntaxKind::SwitchKw => "switch",
            SyntaxKind::SynchronizedKw => "synchronized",
            SyntaxKind::ThisKw => "this",
            SyntaxKind::ThrowKw => "throw",
            SyntaxKind::ThrowsKw => "throws",
            SyntaxKind::TransientKw => "transient",
            SyntaxKind::TryKw => "try",
            SyntaxKind::VoidKw => "void",
            SyntaxKind::VolatileKw => "volatile",
            SyntaxKind::WhileKw => "while",
            SyntaxKind::TrueKw => "true",
            SyntaxKind::FalseKw => "false",
            SyntaxKind::NullKw => "null",
            SyntaxKind::LParen => "(",
            SyntaxKind::RParen => ")",
            SyntaxKind::LBrace => "{",
            SyntaxKind::RBrace => "}",
            SyntaxKind::LBracket => "[",
            SyntaxKind::RBracket => "]",
            SyntaxKind::Semicolon => ";",
            SyntaxKind::Comma => ",",
            SyntaxKind::Dot => ".",
            SyntaxKind::Ellipsis => "...",
            SyntaxKind::At => "@",
            SyntaxKind::Question => "?",
            SyntaxKind::Colon => ":",
            SyntaxKind::Plus => "+",
            SyntaxKind::Minus => "-",
            SyntaxKind::Star => "*",
            SyntaxKind::Slash => "/",
            SyntaxKind::Percent => "%",
            SyntaxKind::Tilde => "~",
            SyntaxKind::Bang => "!",
            SyntaxKind::Eq => "=",
            SyntaxKind::EqEq => "==",
            SyntaxKind::BangEq => "!=",
            SyntaxKind::Less => "<",
            SyntaxKind::LessEq => "<=",
            SyntaxKind::Greater => ">",
            SyntaxKind::GreaterEq => ">=",
            SyntaxKind::Amp => "&",
            SyntaxKind::AmpAmp => "&&",
            SyntaxKind::AmpEq => "&=",
            SyntaxKind::Pipe => "|",
            SyntaxKind::PipePipe => "||",
            SyntaxKind::PipeEq => "|=",
            SyntaxKind::Caret => "^",
            SyntaxKind::CaretEq => "^=",
            SyntaxKind::PlusPlus => "++",
            SyntaxKind::MinusMinus => "--",
            SyntaxKind::PlusEq => "+=",
            SyntaxKind::MinusEq => "-=",
            SyntaxKind::StarEq => "*=",
            SyntaxKind::SlashEq => "/=",
            SyntaxKind::PercentEq => "%=",
            SyntaxKind::LeftShift => "<<",
            SyntaxKind::RightShift => ">>",
            SyntaxKind::UnsignedRightShift => ">>>",
            SyntaxKind::LeftShiftEq => "<<=",
            SyntaxKind::RightShiftEq => ">>=",
            SyntaxKind::UnsignedRightShiftEq => ">>>=",
            _ => return None,
        })
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(value: SyntaxKind) -> Self {
        rowan::SyntaxKind(value as u16)
    }
}

/// Rowan language marker for Java.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JavaLanguage {}

impl Language for JavaLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        SyntaxKind::from_raw(raw.0)
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<JavaLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<JavaLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<JavaLanguage>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_round_trip_through_fixed_text() {
        for raw in 0..SyntaxKind::__Last as u16 {
            let kind = SyntaxKind::from_raw(raw);
            if kind.is_keyword() {
                let text = kind.fixed_text().expect("keywords have fixed text");
                assert_eq!(SyntaxKind::from_keyword(text), Some(kind));
            }
        }
    }

    #[test]
    fn token_and_node_kinds_are_partitioned() {
        assert!(SyntaxKind::Semicolon.is_token());
        assert!(SyntaxKind::Eof.is_token());
        assert!(!SyntaxKind::JavaFile.is_token());
        assert!(!SyntaxKind::ClassObjectAccessExpression.is_token());
        assert_eq!(SyntaxKind::from_raw(u16::MAX), SyntaxKind::ErrorElement);
    }
}
