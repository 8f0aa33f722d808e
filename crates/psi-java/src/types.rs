//! Java types of declarations and expressions.
//!
//! Expression typing is a pure function of the tree: literal kinds, the
//! operator tables of JLS 15 with binary numeric promotion, and declared
//! types of whatever a reference resolves to. Types the tree cannot see
//! (library classes) are kept by name.

use std::fmt;

use psi_syntax::{tables, SyntaxKind};
use serde::Serialize;

use crate::resolve::ResolvedElement;
use crate::role::Role;
use crate::{NodeId, SyntaxTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl PrimitiveType {
    pub fn from_keyword(kind: SyntaxKind) -> Option<PrimitiveType> {
        Some(match kind {
            SyntaxKind::BooleanKw => PrimitiveType::Boolean,
            SyntaxKind::ByteKw => PrimitiveType::Byte,
            SyntaxKind::ShortKw => PrimitiveType::Short,
            SyntaxKind::CharKw => PrimitiveType::Char,
            SyntaxKind::IntKw => PrimitiveType::Int,
            SyntaxKind::LongKw => PrimitiveType::Long,
            SyntaxKind::FloatKw => PrimitiveType::Float,
            SyntaxKind::DoubleKw => PrimitiveType::Double,
            SyntaxKind::VoidKw => PrimitiveType::Void,
            _ => return None,
        })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Void => "void",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveType::Boolean | PrimitiveType::Void)
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            PrimitiveType::Byte
                | PrimitiveType::Short
                | PrimitiveType::Char
                | PrimitiveType::Int
                | PrimitiveType::Long
        )
    }

    /// Simple name of the wrapper class in `java.lang`.
    fn wrapper(self) -> Option<&'static str> {
        Some(match self {
            PrimitiveType::Boolean => "Boolean",
            PrimitiveType::Byte => "Byte",
            PrimitiveType::Short => "Short",
            PrimitiveType::Char => "Character",
            PrimitiveType::Int => "Integer",
            PrimitiveType::Long => "Long",
            PrimitiveType::Float => "Float",
            PrimitiveType::Double => "Double",
            PrimitiveType::Void => return None,
        })
    }
}

pub fn unary_numeric_promotion(p: PrimitiveType) -> PrimitiveType {
    match p {
        PrimitiveType::Byte | PrimitiveType::Short | PrimitiveType::Char => PrimitiveType::Int,
        other => other,
    }
}

/// JLS 5.6.2. `None` unless both operands are numeric.
pub fn binary_numeric_promotion(a: PrimitiveType, b: PrimitiveType) -> Option<PrimitiveType> {
    if !a.is_numeric() || !b.is_numeric() {
        return None;
    }
    Some(if a == PrimitiveType::Double || b == PrimitiveType::Double {
        PrimitiveType::Double
    } else if a == PrimitiveType::Float || b == PrimitiveType::Float {
        PrimitiveType::Float
    } else if a == PrimitiveType::Long || b == PrimitiveType::Long {
        PrimitiveType::Long
    } else {
        PrimitiveType::Int
    })
}

/// A class or interface type, by qualified name when the declaration is
/// known and by the name as written otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ClassType {
    pub name: String,
    pub declaration: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum JavaType {
    Primitive(PrimitiveType),
    /// The type of `null`.
    Null,
    Class(ClassType),
    Array(Box<JavaType>),
}

const JAVA_LANG: &[&str] = &[
    "Object",
    "String",
    "Class",
    "Boolean",
    "Byte",
    "Short",
    "Character",
    "Integer",
    "Long",
    "Float",
    "Double",
    "Number",
    "Throwable",
    "Exception",
    "RuntimeException",
    "Error",
    "Enum",
    "Iterable",
    "StringBuilder",
    "StringBuffer",
    "CharSequence",
    "Comparable",
    "Cloneable",
    "AutoCloseable",
    "Runnable",
    "Thread",
    "System",
    "Math",
    "Void",
    "Override",
    "Deprecated",
    "SuppressWarnings",
    "SafeVarargs",
    "FunctionalInterface",
    "IllegalArgumentException",
    "IllegalStateException",
    "NullPointerException",
    "UnsupportedOperationException",
    "IndexOutOfBoundsException",
    "ClassCastException",
    "ArithmeticException",
    "InterruptedException",
    "CloneNotSupportedException",
];

/// A simple name every compilation unit imports implicitly.
pub(crate) fn is_java_lang(name: &str) -> bool {
    JAVA_LANG.contains(&name)
}

impl JavaType {
    pub fn named(name: impl Into<String>) -> JavaType {
        JavaType::Class(ClassType {
            name: name.into(),
            declaration: None,
        })
    }

    pub fn string() -> JavaType {
        JavaType::named("java.lang.String")
    }

    pub fn object() -> JavaType {
        JavaType::named("java.lang.Object")
    }

    pub fn int() -> JavaType {
        JavaType::Primitive(PrimitiveType::Int)
    }

    pub fn boolean() -> JavaType {
        JavaType::Primitive(PrimitiveType::Boolean)
    }

    pub fn primitive(&self) -> Option<PrimitiveType> {
        match self {
            JavaType::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    pub fn class(&self) -> Option<&ClassType> {
        match self {
            JavaType::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, JavaType::Class(c) if c.name == "java.lang.String")
    }

    /// The primitive type of a primitive or of a `java.lang` wrapper class.
    pub fn unboxed(&self) -> Option<PrimitiveType> {
        match self {
            JavaType::Primitive(p) => Some(*p),
            JavaType::Class(class) => {
                let simple = class.name.strip_prefix("java.lang.")?;
                [
                    PrimitiveType::Boolean,
                    PrimitiveType::Byte,
                    PrimitiveType::Short,
                    PrimitiveType::Char,
                    PrimitiveType::Int,
                    PrimitiveType::Long,
                    PrimitiveType::Float,
                    PrimitiveType::Double,
                ]
                .into_iter()
                .find(|p| p.wrapper() == Some(simple))
            }
            _ => None,
        }
    }

    pub fn array_of(self, dimensions: usize) -> JavaType {
        (0..dimensions).fold(self, |ty, _| JavaType::Array(Box::new(ty)))
    }

    pub fn component(&self) -> Option<&JavaType> {
        match self {
            JavaType::Array(component) => Some(component),
            _ => None,
        }
    }

    /// Short form for messages: simple class names.
    pub fn presentable_text(&self) -> String {
        match self {
            JavaType::Primitive(p) => p.keyword().to_string(),
            JavaType::Null => "null".to_string(),
            JavaType::Class(class) => class
                .name
                .rsplit('.')
                .next()
                .unwrap_or(&class.name)
                .to_string(),
            JavaType::Array(component) => format!("{}[]", component.presentable_text()),
        }
    }
}

impl fmt::Display for JavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JavaType::Primitive(p) => f.write_str(p.keyword()),
            JavaType::Null => f.write_str("null"),
            JavaType::Class(class) => f.write_str(&class.name),
            JavaType::Array(component) => write!(f, "{component}[]"),
        }
    }
}

impl SyntaxTree {
    /// The type of a class declaration as seen from its own body. Anonymous
    /// classes are named after their base class.
    pub fn class_type(&self, class: NodeId) -> JavaType {
        let name = match self.kind(class) {
            SyntaxKind::AnonymousClass => self.super_class_type(class).to_string(),
            _ => self
                .class_qualified_name(class)
                .or_else(|| self.name(class).map(|n| n.to_string()))
                .unwrap_or_default(),
        };
        JavaType::Class(ClassType {
            name,
            declaration: Some(class),
        })
    }

    /// Type written by a `Type` element, array dimensions and `...` included.
    pub fn type_of_type_element(&self, ty: NodeId) -> Option<JavaType> {
        let base = if let Some(keyword) = self.find_child_by_role(ty, Role::TypeKeyword) {
            JavaType::Primitive(PrimitiveType::from_keyword(self.kind(keyword))?)
        } else if let Some(reference) = self.find_child_by_role(ty, Role::ClassReference) {
            self.type_of_class_reference(reference)
        } else if self.child_of_kind(ty, SyntaxKind::Question).is_some() {
            match self.find_child_by_role(ty, Role::Type) {
                Some(bound) if self.child_of_kind(ty, SyntaxKind::ExtendsKw).is_some() => {
                    self.type_of_type_element(bound)?
                }
                _ => JavaType::object(),
            }
        } else {
            // `A | B` in a catch parameter: the first alternative stands in
            // for the union.
            let first = self.child_of_kind(ty, SyntaxKind::Type)?;
            self.type_of_type_element(first)?
        };
        Some(base.array_of(self.array_dimensions(ty)))
    }

    pub(crate) fn type_of_class_reference(&self, reference: NodeId) -> JavaType {
        if let Some(class) = self.resolve_class_reference(reference) {
            return self.class_type(class);
        }
        let written = self.qualified_name(reference);
        if is_java_lang(&written) {
            JavaType::named(format!("java.lang.{written}"))
        } else {
            JavaType::named(written)
        }
    }

    /// Declared type of a field, local, parameter or enum constant.
    pub fn variable_java_type(&self, var: NodeId) -> Option<JavaType> {
        if self.kind(var) == SyntaxKind::EnumConstant {
            return self.parent(var).map(|class| self.class_type(class));
        }
        let ty = self.type_of_type_element(self.variable_type(var)?)?;
        Some(ty.array_of(self.name_dimensions(var)))
    }

    /// Declared return type of a method, `None` for constructors.
    pub fn method_return_type(&self, method: NodeId) -> Option<JavaType> {
        let ty = self.type_of_type_element(self.return_type(method)?)?;
        Some(ty.array_of(self.children_of_kind(method, SyntaxKind::LBracket).count()))
    }

    /// Static type of an expression, `None` when it cannot be determined.
    pub fn expression_type(&self, expr: NodeId) -> Option<JavaType> {
        use SyntaxKind as K;
        match self.kind(expr) {
            K::LiteralExpression => {
                let literal = self.find_child_by_role(expr, Role::Literal)?;
                Some(match self.kind(literal) {
                    K::IntegerLiteral => JavaType::int(),
                    K::LongLiteral => JavaType::Primitive(PrimitiveType::Long),
                    K::FloatLiteral => JavaType::Primitive(PrimitiveType::Float),
                    K::DoubleLiteral => JavaType::Primitive(PrimitiveType::Double),
                    K::CharacterLiteral => JavaType::Primitive(PrimitiveType::Char),
                    K::StringLiteral => JavaType::string(),
                    K::TrueKw | K::FalseKw => JavaType::boolean(),
                    K::NullKw => JavaType::Null,
                    _ => return None,
                })
            }
            K::ParenthesizedExpression => {
                self.expression_type(self.find_child_by_role(expr, Role::Expression)?)
            }
            K::BinaryExpression => {
                let sign = self.operation_sign(expr)?;
                let left = self.expression_type(self.l_operand(expr)?);
                let right = self.r_operand(expr).and_then(|r| self.expression_type(r));
                binary_type(sign, left.as_ref(), right.as_ref())
            }
            K::AssignmentExpression => self.expression_type(self.l_operand(expr)?),
            K::PrefixExpression => {
                let sign = self.operation_sign(expr)?;
                let operand = self.expression_type(self.operand(expr)?)?;
                match sign {
                    K::Bang => Some(JavaType::boolean()),
                    K::PlusPlus | K::MinusMinus => Some(operand),
                    _ => {
                        let p = operand.unboxed()?;
                        p.is_numeric()
                            .then(|| JavaType::Primitive(unary_numeric_promotion(p)))
                    }
                }
            }
            K::PostfixExpression => self.expression_type(self.operand(expr)?),
            K::ConditionalExpression => {
                let then = self
                    .find_child_by_role(expr, Role::ThenExpression)
                    .and_then(|e| self.expression_type(e));
                let otherwise = self
                    .find_child_by_role(expr, Role::ElseExpression)
                    .and_then(|e| self.expression_type(e));
                conditional_type(then, otherwise)
            }
            K::TypeCastExpression => {
                self.type_of_type_element(self.find_child_by_role(expr, Role::CastType)?)
            }
            K::InstanceOfExpression => Some(JavaType::boolean()),
            K::ClassObjectAccessExpression => Some(JavaType::named("java.lang.Class")),
            K::ThisExpression => match self.find_child_by_role(expr, Role::Qualifier) {
                Some(qualifier) => Some(self.type_of_class_reference(qualifier)),
                None => self.this_class(expr).map(|class| self.class_type(class)),
            },
            K::SuperExpression => {
                let class = match self.find_child_by_role(expr, Role::Qualifier) {
                    Some(qualifier) => self.resolve_class_reference(qualifier)?,
                    None => self.this_class(expr)?,
                };
                Some(self.super_class_type(class))
            }
            K::NewExpression => self.new_expression_type(expr),
            K::ArrayInitializerExpression => self.array_initializer_type(expr),
            K::ArrayAccessExpression => {
                let array = self.find_child_by_role(expr, Role::ArrayExpression)?;
                self.expression_type(array)?.component().cloned()
            }
            K::ReferenceExpression => self.reference_expression_type(expr),
            K::MethodCallExpression => match self.resolve(self.method_expression(expr)?)? {
                ResolvedElement::Method(method) if self.is_constructor(method) => {
                    Some(JavaType::Primitive(PrimitiveType::Void))
                }
                ResolvedElement::Method(method) => self.method_return_type(method),
                _ => None,
            },
            _ => None,
        }
    }

    /// The class `this` refers to at `id`: the innermost named or anonymous
    /// class body around it.
    fn this_class(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id)
            .skip(1)
            .find(|&n| matches!(self.kind(n), SyntaxKind::Class | SyntaxKind::AnonymousClass))
    }

    /// Direct superclass of a class, `java.lang.Object` when none is written.
    pub fn super_class_type(&self, class: NodeId) -> JavaType {
        let reference = match self.kind(class) {
            SyntaxKind::AnonymousClass => self.find_child_by_role(class, Role::BaseClassReference),
            _ => self
                .find_child_by_role(class, Role::ExtendsList)
                .and_then(|list| self.child_of_kind(list, SyntaxKind::JavaCodeReference)),
        };
        reference.map_or_else(JavaType::object, |r| self.type_of_class_reference(r))
    }

    fn new_expression_type(&self, expr: NodeId) -> Option<JavaType> {
        let dimensions = self.children_of_kind(expr, SyntaxKind::LBracket).count();
        let base = if let Some(keyword) = self.find_child_by_role(expr, Role::TypeKeyword) {
            JavaType::Primitive(PrimitiveType::from_keyword(self.kind(keyword))?)
        } else if let Some(reference) = self.find_child_by_role(expr, Role::ClassReference) {
            self.type_of_class_reference(reference)
        } else {
            let anonymous = self.find_child_by_role(expr, Role::AnonymousClass)?;
            let reference = self.find_child_by_role(anonymous, Role::BaseClassReference)?;
            self.type_of_class_reference(reference)
        };
        Some(base.array_of(dimensions))
    }

    fn array_initializer_type(&self, expr: NodeId) -> Option<JavaType> {
        let parent = self.parent(expr)?;
        match self.kind(parent) {
            SyntaxKind::NewExpression => self.expression_type(parent),
            kind if tables::VARIABLES.contains(kind) => self.variable_java_type(parent),
            SyntaxKind::ArrayInitializerExpression => {
                self.array_initializer_type(parent)?.component().cloned()
            }
            _ => None,
        }
    }

    fn reference_expression_type(&self, expr: NodeId) -> Option<JavaType> {
        match self.resolve(expr) {
            Some(ResolvedElement::Variable(var)) => self.variable_java_type(var),
            Some(_) => None,
            None => {
                let qualifier = self.qualifier(expr)?;
                let is_length = self.reference_name(expr).as_deref() == Some("length");
                let qualifier_is_array =
                    matches!(self.expression_type(qualifier), Some(JavaType::Array(_)));
                (is_length && qualifier_is_array).then(JavaType::int)
            }
        }
    }
}

fn binary_type(
    sign: SyntaxKind,
    left: Option<&JavaType>,
    right: Option<&JavaType>,
) -> Option<JavaType> {
    use SyntaxKind as K;
    if tables::RELATIONAL_OPERATORS.contains(sign)
        || tables::EQUALITY_OPERATORS.contains(sign)
        || tables::CONDITIONAL_OPERATORS.contains(sign)
    {
        return Some(JavaType::boolean());
    }
    // One known side decides these two, whatever the other side is.
    let either = |pred: fn(&JavaType) -> bool| left.is_some_and(pred) || right.is_some_and(pred);
    match sign {
        K::Plus if either(JavaType::is_string) => return Some(JavaType::string()),
        K::Amp | K::Pipe | K::Caret
            if either(|t| t.unboxed() == Some(PrimitiveType::Boolean)) =>
        {
            return Some(JavaType::boolean())
        }
        _ => {}
    }
    let (left, right) = (left?.unboxed()?, right?.unboxed()?);
    match sign {
        K::Plus | K::Minus | K::Star | K::Slash | K::Percent => {
            binary_numeric_promotion(left, right).map(JavaType::Primitive)
        }
        _ if !left.is_integral() || !right.is_integral() => None,
        _ if tables::SHIFT_OPERATORS.contains(sign) => {
            Some(JavaType::Primitive(unary_numeric_promotion(left)))
        }
        K::Amp | K::Pipe | K::Caret => {
            binary_numeric_promotion(left, right).map(JavaType::Primitive)
        }
        _ => None,
    }
}

fn conditional_type(then: Option<JavaType>, otherwise: Option<JavaType>) -> Option<JavaType> {
    match (then, otherwise) {
        (Some(a), Some(b)) if a == b => Some(a),
        (Some(JavaType::Null), Some(other)) | (Some(other), Some(JavaType::Null)) => {
            match other {
                JavaType::Primitive(p) => p.wrapper().map(|w| JavaType::named(format!("java.lang.{w}"))),
                other => Some(other),
            }
        }
        (Some(a), Some(b)) => match (a.unboxed(), b.unboxed()) {
            (Some(pa), Some(pb)) if pa.is_numeric() && pb.is_numeric() => {
                binary_numeric_promotion(pa, pb).map(JavaType::Primitive)
            }
            (Some(PrimitiveType::Boolean), Some(PrimitiveType::Boolean)) => {
                Some(JavaType::boolean())
            }
            _ => Some(a),
        },
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn typed(source: &str, expr_text: &str) -> Option<JavaType> {
        let tree = SyntaxTree::parse(source);
        let expr = tree
            .descendants(tree.root())
            .find(|&n| tables::EXPRESSIONS.contains(tree.kind(n)) && tree.text(n) == expr_text)
            .unwrap_or_else(|| panic!("no expression `{expr_text}`"));
        tree.expression_type(expr)
    }

    fn in_method(body: &str, expr_text: &str) -> Option<JavaType> {
        typed(&format!("class A {{ void m() {{ {body} }} }}"), expr_text)
    }

    #[test]
    fn promotion_ladder() {
        use PrimitiveType::*;
        assert_eq!(binary_numeric_promotion(Byte, Short), Some(Int));
        assert_eq!(binary_numeric_promotion(Char, Char), Some(Int));
        assert_eq!(binary_numeric_promotion(Int, Long), Some(Long));
        assert_eq!(binary_numeric_promotion(Long, Float), Some(Float));
        assert_eq!(binary_numeric_promotion(Float, Double), Some(Double));
        assert_eq!(binary_numeric_promotion(Boolean, Int), None);
        assert_eq!(unary_numeric_promotion(Byte), Int);
        assert_eq!(unary_numeric_promotion(Long), Long);
    }

    #[test]
    fn int_plus_long_is_long() {
        assert_eq!(
            in_method("int i = 0; long l = 0; Object o = i + l;", "i + l"),
            Some(JavaType::Primitive(PrimitiveType::Long))
        );
    }

    #[test]
    fn string_plus_int_is_string() {
        assert_eq!(
            in_method("String s = null; int i = 0; Object o = s + i;", "s + i"),
            Some(JavaType::string())
        );
        assert_eq!(in_method("Object o = \"a\" + 1;", "\"a\" + 1"), Some(JavaType::string()));
    }

    #[test]
    fn operator_table() {
        let long = Some(JavaType::Primitive(PrimitiveType::Long));
        assert_eq!(in_method("Object o = 1 < 2;", "1 < 2"), Some(JavaType::boolean()));
        assert_eq!(in_method("Object o = 1L << 2;", "1L << 2"), long);
        assert_eq!(
            in_method("byte b = 0; Object o = b >> 1L;", "b >> 1L"),
            Some(JavaType::int())
        );
        assert_eq!(in_method("Object o = true & false;", "true & false"), Some(JavaType::boolean()));
        assert_eq!(in_method("Object o = 3 ^ 5L;", "3 ^ 5L"), long);
        assert_eq!(
            in_method("char c = 'a'; Object o = -c;", "-c"),
            Some(JavaType::int())
        );
        assert_eq!(
            in_method("Object o = 1.5f * 2;", "1.5f * 2"),
            Some(JavaType::Primitive(PrimitiveType::Float))
        );
        assert_eq!(
            in_method("Integer x = null; Object o = x + 1L;", "x + 1L"),
            long
        );
    }

    #[test]
    fn binary_operator_rows() {
        use PrimitiveType::*;
        let locals = "String s = null; byte b = 0; char c = 'a'; Integer boxed = 0; \
                      Boolean flag = true; double d = 0;";
        let cases: &[(&str, Option<JavaType>)] = &[
            // concatenation
            ("s + zzz", Some(JavaType::string())),
            ("zzz + s", Some(JavaType::string())),
            ("zzz + 1", None),
            ("c + c", Some(JavaType::Primitive(Int))),
            ("1 + 2.0", Some(JavaType::Primitive(Double))),
            ("flag + 1", None),
            // arithmetic
            ("5 % 2L", Some(JavaType::Primitive(Long))),
            ("b * b", Some(JavaType::Primitive(Int))),
            ("boxed / d", Some(JavaType::Primitive(Double))),
            // shifts take the promoted left operand
            ("b << 2L", Some(JavaType::Primitive(Int))),
            ("1L >>> 3", Some(JavaType::Primitive(Long))),
            ("c >> b", Some(JavaType::Primitive(Int))),
            ("d << 1", None),
            ("1 << d", None),
            // bitwise and logical
            ("3 & 5", Some(JavaType::Primitive(Int))),
            ("3 | 5L", Some(JavaType::Primitive(Long))),
            ("c ^ b", Some(JavaType::Primitive(Int))),
            ("boxed & 1L", Some(JavaType::Primitive(Long))),
            ("boxed | b", Some(JavaType::Primitive(Int))),
            ("1.5 & 2", None),
            ("d ^ d", None),
            ("flag & true", Some(JavaType::boolean())),
            ("true | zzz", Some(JavaType::boolean())),
            // comparisons are boolean whatever the operands
            ("zzz == 1", Some(JavaType::boolean())),
            ("d >= b", Some(JavaType::boolean())),
            ("flag && zzz", Some(JavaType::boolean())),
        ];
        for (text, expected) in cases {
            let body = format!("{locals} Object o = {text};");
            assert_eq!(&in_method(&body, text), expected, "{text}");
        }
    }

    #[test]
    fn structural_expressions() {
        assert_eq!(
            in_method("int[] a = new int[3]; Object o = a[0];", "a[0]"),
            Some(JavaType::int())
        );
        assert_eq!(
            in_method("int[] a = null; Object o = a.length;", "a.length"),
            Some(JavaType::int())
        );
        assert_eq!(
            in_method("Object o = new String[2][];", "new String[2][]"),
            Some(JavaType::string().array_of(2))
        );
        assert_eq!(
            in_method("Object o = (long) 1;", "(long) 1"),
            Some(JavaType::Primitive(PrimitiveType::Long))
        );
        assert_eq!(
            in_method("Object o = true ? 1 : 2L;", "true ? 1 : 2L"),
            Some(JavaType::Primitive(PrimitiveType::Long))
        );
        assert_eq!(in_method("Object o = null;", "null"), Some(JavaType::Null));
    }

    #[test]
    fn this_and_method_calls() {
        let source = "package p; class A { long f() { return 0; } void m() { Object o = this.f(); } }";
        assert_eq!(
            typed(source, "this.f()"),
            Some(JavaType::Primitive(PrimitiveType::Long))
        );
        let this = typed(source, "this").unwrap();
        assert_eq!(this.to_string(), "p.A");
        assert_eq!(this.presentable_text(), "A");
    }
}
