use serde::Serialize;

/// The relationship of a child to its parent construct.
///
/// Roles are computed on demand from the parent's kind and the child's kind
/// and position; they are never stored on the child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    None,
    PrecedingComment,
    DocComment,

    // punctuation
    LBrace,
    RBrace,
    LParenth,
    RParenth,
    LBracket,
    RBracket,
    LAngle,
    RAngle,
    Comma,
    Dot,
    Colon,
    Quest,
    At,
    Ellipsis,
    ClosingSemicolon,
    /// Separator between resources of a `try`.
    Semicolon,
    OperationSign,
    /// `=` introducing an initializer or an annotation value.
    InitializerEq,

    // declarations
    Name,
    ModifierList,
    Modifier,
    Annotation,
    TypeParameterList,
    TypeParameter,
    ExtendsList,
    ImplementsList,
    ThrowsList,
    ParameterList,
    Parameter,
    Type,
    TypeAlternative,
    ClassOrInterfaceKeyword,
    EnumConstantListDelimiter,
    EnumConstant,
    Field,
    Method,
    Class,
    ClassInitializer,
    AnonymousClass,
    MethodBody,
    DefaultKeyword,
    AnnotationDefaultValue,
    Initializer,
    ArgumentList,
    ExtendsKeyword,
    ImplementsKeyword,
    ThrowsKeyword,
    ReferenceInList,
    AmpersandInBoundsList,
    BaseClassReference,

    // file
    PackageStatement,
    ImportList,
    ImportStatement,
    PackageKeyword,
    ImportKeyword,
    StaticKeyword,
    PackageReference,
    ImportReference,
    ImportOnDemandDot,
    ImportOnDemandAsterisk,

    // annotations
    ClassReference,
    AnnotationParameterList,
    NameValuePair,
    AnnotationValue,

    // references and types
    Qualifier,
    ReferenceName,
    ReferenceParameterList,
    TypeArgument,
    TypeKeyword,
    WildcardBoundKeyword,

    // statements
    Statement,
    Block,
    DeclaredElement,
    Expression,
    ExpressionList,
    Condition,
    IfKeyword,
    ElseKeyword,
    ThenBranch,
    ElseBranch,
    ForKeyword,
    WhileKeyword,
    DoKeyword,
    LoopBody,
    ForInitialization,
    ForSemicolon,
    ForUpdate,
    ForIterationParameter,
    IteratedValue,
    SwitchKeyword,
    SwitchBody,
    CaseKeyword,
    CaseExpression,
    LabelName,
    Label,
    BreakKeyword,
    ContinueKeyword,
    ReturnKeyword,
    ReturnValue,
    ThrowKeyword,
    Exception,
    SynchronizedKeyword,
    Lock,
    TryKeyword,
    TryBlock,
    ResourceList,
    ResourceVariable,
    CatchSection,
    CatchKeyword,
    CatchBlockParameter,
    CatchBlock,
    FinallyKeyword,
    FinallyBlock,
    AssertKeyword,
    AssertDescription,

    // expressions
    Literal,
    LOperand,
    ROperand,
    Operand,
    MethodExpression,
    ExpressionInList,
    ThisKeyword,
    SuperKeyword,
    NewKeyword,
    ClassKeyword,
    InstanceofKeyword,
    ArrayDimension,
    ArrayInitializer,
    ArrayExpression,
    IndexExpression,
    ThenExpression,
    ElseExpression,
    CastType,
}

impl Role {
    /// Whether a parent can have at most one child with this role.
    pub fn is_unique(self) -> bool {
        !matches!(
            self,
            Role::None
                | Role::PrecedingComment
                | Role::Comma
                | Role::Semicolon
                | Role::LBracket
                | Role::RBracket
                | Role::Modifier
                | Role::Annotation
                | Role::TypeParameter
                | Role::Parameter
                | Role::TypeAlternative
                | Role::EnumConstant
                | Role::Field
                | Role::Method
                | Role::Class
                | Role::ClassInitializer
                | Role::ReferenceInList
                | Role::AmpersandInBoundsList
                | Role::ImportStatement
                | Role::NameValuePair
                | Role::AnnotationValue
                | Role::TypeArgument
                | Role::Statement
                | Role::DeclaredElement
                | Role::ResourceVariable
                | Role::CatchSection
                | Role::ExpressionInList
                | Role::ArrayDimension
        )
    }
}
