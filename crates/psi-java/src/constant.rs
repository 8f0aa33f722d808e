//! Compile-time constant evaluation.
//!
//! Follows JLS 15.28: literals, unary and binary operators over primitives
//! and strings, casts to primitive types and `String`, conditionals, and
//! simple or qualified names of `final` variables with constant
//! initializers. Integer arithmetic wraps; integer division by zero is not a
//! constant.

use std::cmp::Ordering;

use psi_syntax::SyntaxKind;
use serde::Serialize;

use crate::resolve::ResolvedElement;
use crate::role::Role;
use crate::types::{binary_numeric_promotion, JavaType, PrimitiveType};
use crate::{NodeId, SyntaxTree};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ConstValue {
    Boolean(bool),
    Byte(i8),
    Short(i16),
    /// A UTF-16 code unit.
    Char(u16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
}

/// A value after numeric promotion.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Num {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Num {
    fn to_i32(self) -> i32 {
        match self {
            Num::Int(v) => v,
            Num::Long(v) => v as i32,
            Num::Float(v) => v as i32,
            Num::Double(v) => v as i32,
        }
    }

    fn to_i64(self) -> i64 {
        match self {
            Num::Int(v) => i64::from(v),
            Num::Long(v) => v,
            Num::Float(v) => v as i64,
            Num::Double(v) => v as i64,
        }
    }

    fn to_f32(self) -> f32 {
        match self {
            Num::Int(v) => v as f32,
            Num::Long(v) => v as f32,
            Num::Float(v) => v,
            Num::Double(v) => v as f32,
        }
    }

    fn to_f64(self) -> f64 {
        match self {
            Num::Int(v) => f64::from(v),
            Num::Long(v) => v as f64,
            Num::Float(v) => f64::from(v),
            Num::Double(v) => v,
        }
    }

    fn convert(self, to: PrimitiveType) -> Option<Num> {
        Some(match to {
            PrimitiveType::Int => Num::Int(self.to_i32()),
            PrimitiveType::Long => Num::Long(self.to_i64()),
            PrimitiveType::Float => Num::Float(self.to_f32()),
            PrimitiveType::Double => Num::Double(self.to_f64()),
            _ => return None,
        })
    }

    fn into_value(self) -> ConstValue {
        match self {
            Num::Int(v) => ConstValue::Int(v),
            Num::Long(v) => ConstValue::Long(v),
            Num::Float(v) => ConstValue::Float(v),
            Num::Double(v) => ConstValue::Double(v),
        }
    }
}

impl ConstValue {
    pub fn primitive_type(&self) -> Option<PrimitiveType> {
        Some(match self {
            ConstValue::Boolean(_) => PrimitiveType::Boolean,
            ConstValue::Byte(_) => PrimitiveType::Byte,
            ConstValue::Short(_) => PrimitiveType::Short,
            ConstValue::Char(_) => PrimitiveType::Char,
            ConstValue::Int(_) => PrimitiveType::Int,
            ConstValue::Long(_) => PrimitiveType::Long,
            ConstValue::Float(_) => PrimitiveType::Float,
            ConstValue::Double(_) => PrimitiveType::Double,
            ConstValue::String(_) => return None,
        })
    }

    pub fn java_type(&self) -> JavaType {
        match self.primitive_type() {
            Some(p) => JavaType::Primitive(p),
            None => JavaType::string(),
        }
    }

    /// Unary numeric promotion of a numeric value.
    fn promoted(&self) -> Option<Num> {
        Some(match *self {
            ConstValue::Byte(v) => Num::Int(i32::from(v)),
            ConstValue::Short(v) => Num::Int(i32::from(v)),
            ConstValue::Char(v) => Num::Int(i32::from(v)),
            ConstValue::Int(v) => Num::Int(v),
            ConstValue::Long(v) => Num::Long(v),
            ConstValue::Float(v) => Num::Float(v),
            ConstValue::Double(v) => Num::Double(v),
            ConstValue::Boolean(_) | ConstValue::String(_) => return None,
        })
    }

    /// Casting conversion to a primitive type or `String`.
    pub fn cast_to(&self, ty: &JavaType) -> Option<ConstValue> {
        if ty.is_string() {
            return matches!(self, ConstValue::String(_)).then(|| self.clone());
        }
        let target = ty.primitive()?;
        if let ConstValue::Boolean(b) = self {
            return (target == PrimitiveType::Boolean).then_some(ConstValue::Boolean(*b));
        }
        let n = self.promoted()?;
        Some(match target {
            PrimitiveType::Byte => ConstValue::Byte(n.to_i32() as i8),
            PrimitiveType::Short => ConstValue::Short(n.to_i32() as i16),
            PrimitiveType::Char => ConstValue::Char(n.to_i32() as u16),
            PrimitiveType::Boolean | PrimitiveType::Void => return None,
            numeric => n.convert(numeric)?.into_value(),
        })
    }

    /// The text string concatenation appends for this value.
    pub fn to_java_string(&self) -> String {
        match self {
            ConstValue::Boolean(b) => b.to_string(),
            ConstValue::Byte(v) => v.to_string(),
            ConstValue::Short(v) => v.to_string(),
            ConstValue::Char(v) => String::from_utf16_lossy(&[*v]),
            ConstValue::Int(v) => v.to_string(),
            ConstValue::Long(v) => v.to_string(),
            ConstValue::Float(v) => java_floating(f64::from(*v), format!("{v}"), format!("{v:e}")),
            ConstValue::Double(v) => java_floating(*v, format!("{v}"), format!("{v:e}")),
            ConstValue::String(s) => s.clone(),
        }
    }
}

/// `Double.toString` layout: plain between 10^-3 and 10^7, otherwise
/// computerized scientific notation.
fn java_floating(value: f64, plain: String, scientific: String) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        return if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        };
    }
    match scientific.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => format!("{mantissa}E{exponent}"),
        Some((mantissa, exponent)) => format!("{mantissa}.0E{exponent}"),
        None => scientific,
    }
}

impl SyntaxTree {
    /// Value of a constant expression, `None` when the expression is not one.
    pub fn compute_constant(&self, expr: NodeId) -> Option<ConstValue> {
        let mut visiting = Vec::new();
        self.constant_value(expr, &mut visiting)
    }

    fn constant_value(&self, expr: NodeId, visiting: &mut Vec<NodeId>) -> Option<ConstValue> {
        match self.kind(expr) {
            SyntaxKind::LiteralExpression => self.literal_value(expr),
            SyntaxKind::ParenthesizedExpression => {
                let inner = self.find_child_by_role(expr, Role::Expression)?;
                self.constant_value(inner, visiting)
            }
            SyntaxKind::PrefixExpression => {
                let sign = self.operation_sign(expr)?;
                let operand = self.constant_value(self.operand(expr)?, visiting)?;
                unary(sign, &operand)
            }
            SyntaxKind::BinaryExpression => {
                let sign = self.operation_sign(expr)?;
                let left = self.constant_value(self.l_operand(expr)?, visiting)?;
                match (sign, &left) {
                    (SyntaxKind::AmpAmp, ConstValue::Boolean(false)) => {
                        return Some(ConstValue::Boolean(false))
                    }
                    (SyntaxKind::PipePipe, ConstValue::Boolean(true)) => {
                        return Some(ConstValue::Boolean(true))
                    }
                    _ => {}
                }
                let right = self.constant_value(self.r_operand(expr)?, visiting)?;
                binary(sign, &left, &right)
            }
            SyntaxKind::ConditionalExpression => {
                let condition = self.find_child_by_role(expr, Role::Condition)?;
                let ConstValue::Boolean(condition) = self.constant_value(condition, visiting)?
                else {
                    return None;
                };
                let then = self.find_child_by_role(expr, Role::ThenExpression)?;
                let otherwise = self.find_child_by_role(expr, Role::ElseExpression)?;
                let then = self.constant_value(then, visiting)?;
                let otherwise = self.constant_value(otherwise, visiting)?;
                let chosen = if condition { &then } else { &otherwise };
                match (then.primitive_type(), otherwise.primitive_type()) {
                    (Some(a), Some(b)) if a != b => {
                        let common = binary_numeric_promotion(a, b)?;
                        chosen.cast_to(&JavaType::Primitive(common))
                    }
                    _ => Some(chosen.clone()),
                }
            }
            SyntaxKind::TypeCastExpression => {
                let ty = self.type_of_type_element(self.find_child_by_role(expr, Role::CastType)?)?;
                let operand = self.find_child_by_role(expr, Role::Operand)?;
                self.constant_value(operand, visiting)?.cast_to(&ty)
            }
            SyntaxKind::ReferenceExpression => {
                let Some(ResolvedElement::Variable(var)) = self.resolve(expr) else {
                    return None;
                };
                self.constant_variable_value(var, visiting)
            }
            _ => None,
        }
    }

    fn constant_variable_value(&self, var: NodeId, visiting: &mut Vec<NodeId>) -> Option<ConstValue> {
        if !matches!(self.kind(var), SyntaxKind::Field | SyntaxKind::LocalVariable) {
            return None;
        }
        let implicitly_final = self.kind(var) == SyntaxKind::Field
            && self.parent(var).map_or(false, |class| self.is_interface(class));
        if !(self.is_final(var) || implicitly_final) {
            return None;
        }
        if visiting.contains(&var) {
            tracing::debug!(?var, "constant initializer refers to itself");
            return None;
        }
        let initializer = self.variable_initializer(var)?;
        visiting.push(var);
        let value = self.constant_value(initializer, visiting);
        visiting.pop();
        value?.cast_to(&self.variable_java_type(var)?)
    }
}

fn unary(sign: SyntaxKind, operand: &ConstValue) -> Option<ConstValue> {
    if let ConstValue::Boolean(b) = operand {
        return (sign == SyntaxKind::Bang).then_some(ConstValue::Boolean(!b));
    }
    let n = operand.promoted()?;
    let result = match (sign, n) {
        (SyntaxKind::Plus, n) => n,
        (SyntaxKind::Minus, Num::Int(v)) => Num::Int(v.wrapping_neg()),
        (SyntaxKind::Minus, Num::Long(v)) => Num::Long(v.wrapping_neg()),
        (SyntaxKind::Minus, Num::Float(v)) => Num::Float(-v),
        (SyntaxKind::Minus, Num::Double(v)) => Num::Double(-v),
        (SyntaxKind::Tilde, Num::Int(v)) => Num::Int(!v),
        (SyntaxKind::Tilde, Num::Long(v)) => Num::Long(!v),
        _ => return None,
    };
    Some(result.into_value())
}

fn binary(sign: SyntaxKind, left: &ConstValue, right: &ConstValue) -> Option<ConstValue> {
    use SyntaxKind as K;
    if sign == K::Plus
        && (matches!(left, ConstValue::String(_)) || matches!(right, ConstValue::String(_)))
    {
        return Some(ConstValue::String(left.to_java_string() + &right.to_java_string()));
    }
    match (left, right) {
        (ConstValue::Boolean(a), ConstValue::Boolean(b)) => {
            let (a, b) = (*a, *b);
            return Some(ConstValue::Boolean(match sign {
                K::Amp | K::AmpAmp => a & b,
                K::Pipe | K::PipePipe => a | b,
                K::Caret | K::BangEq => a ^ b,
                K::EqEq => a == b,
                _ => return None,
            }));
        }
        (ConstValue::String(a), ConstValue::String(b)) => {
            return match sign {
                K::EqEq => Some(ConstValue::Boolean(a == b)),
                K::BangEq => Some(ConstValue::Boolean(a != b)),
                _ => None,
            };
        }
        _ => {}
    }
    if matches!(sign, K::LeftShift | K::RightShift | K::UnsignedRightShift) {
        return shift(sign, left.promoted()?, right.promoted()?);
    }
    let common = binary_numeric_promotion(left.primitive_type()?, right.primitive_type()?)?;
    let a = left.promoted()?.convert(common)?;
    let b = right.promoted()?.convert(common)?;
    match sign {
        K::Plus | K::Minus | K::Star | K::Slash | K::Percent => arithmetic(sign, a, b),
        K::Less | K::LessEq | K::Greater | K::GreaterEq | K::EqEq | K::BangEq => {
            compare(sign, a, b).map(ConstValue::Boolean)
        }
        K::Amp | K::Pipe | K::Caret => bitwise(sign, a, b),
        _ => None,
    }
}

fn arithmetic(sign: SyntaxKind, a: Num, b: Num) -> Option<ConstValue> {
    use SyntaxKind as K;
    let result = match (a, b) {
        (Num::Int(x), Num::Int(y)) => Num::Int(match sign {
            K::Plus => x.wrapping_add(y),
            K::Minus => x.wrapping_sub(y),
            K::Star => x.wrapping_mul(y),
            K::Slash if y != 0 => x.wrapping_div(y),
            K::Percent if y != 0 => x.wrapping_rem(y),
            _ => return None,
        }),
        (Num::Long(x), Num::Long(y)) => Num::Long(match sign {
            K::Plus => x.wrapping_add(y),
            K::Minus => x.wrapping_sub(y),
            K::Star => x.wrapping_mul(y),
            K::Slash if y != 0 => x.wrapping_div(y),
            K::Percent if y != 0 => x.wrapping_rem(y),
            _ => return None,
        }),
        (Num::Float(x), Num::Float(y)) => Num::Float(match sign {
            K::Plus => x + y,
            K::Minus => x - y,
            K::Star => x * y,
            K::Slash => x / y,
            K::Percent => x % y,
            _ => return None,
        }),
        (Num::Double(x), Num::Double(y)) => Num::Double(match sign {
            K::Plus => x + y,
            K::Minus => x - y,
            K::Star => x * y,
            K::Slash => x / y,
            K::Percent => x % y,
            _ => return None,
        }),
        _ => return None,
    };
    Some(result.into_value())
}

fn compare(sign: SyntaxKind, a: Num, b: Num) -> Option<bool> {
    use SyntaxKind as K;
    let ordering = match (a, b) {
        (Num::Int(x), Num::Int(y)) => Some(x.cmp(&y)),
        (Num::Long(x), Num::Long(y)) => Some(x.cmp(&y)),
        (Num::Float(x), Num::Float(y)) => x.partial_cmp(&y),
        (Num::Double(x), Num::Double(y)) => x.partial_cmp(&y),
        _ => return None,
    };
    Some(match sign {
        K::Less => ordering == Some(Ordering::Less),
        K::LessEq => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        K::Greater => ordering == Some(Ordering::Greater),
        K::GreaterEq => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        K::EqEq => ordering == Some(Ordering::Equal),
        K::BangEq => ordering != Some(Ordering::Equal),
        _ => return None,
    })
}

fn bitwise(sign: SyntaxKind, a: Num, b: Num) -> Option<ConstValue> {
    use SyntaxKind as K;
    let result = match (a, b) {
        (Num::Int(x), Num::Int(y)) => Num::Int(match sign {
            K::Amp => x & y,
            K::Pipe => x | y,
            K::Caret => x ^ y,
            _ => return None,
        }),
        (Num::Long(x), Num::Long(y)) => Num::Long(match sign {
            K::Amp => x & y,
            K::Pipe => x | y,
            K::Caret => x ^ y,
            _ => return None,
        }),
        _ => return None,
    };
    Some(result.into_value())
}

/// The left operand alone decides the result type; the distance is masked
/// to the width of that type.
fn shift(sign: SyntaxKind, left: Num, right: Num) -> Option<ConstValue> {
    use SyntaxKind as K;
    let distance = match right {
        Num::Int(v) => i64::from(v),
        Num::Long(v) => v,
        _ => return None,
    };
    let result = match left {
        Num::Int(x) => {
            let n = (distance & 0x1f) as u32;
            Num::Int(match sign {
                K::LeftShift => x.wrapping_shl(n),
                K::RightShift => x >> n,
                K::UnsignedRightShift => ((x as u32) >> n) as i32,
                _ => return None,
            })
        }
        Num::Long(x) => {
            let n = (distance & 0x3f) as u32;
            Num::Long(match sign {
                K::LeftShift => x.wrapping_shl(n),
                K::RightShift => x >> n,
                K::UnsignedRightShift => ((x as u64) >> n) as i64,
                _ => return None,
            })
        }
        _ => return None,
    };
    Some(result.into_value())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::factory::create_expression_from_text;

    fn eval(text: &str) -> Option<ConstValue> {
        let mut tree = SyntaxTree::parse("");
        let expr = create_expression_from_text(&mut tree, text).unwrap();
        tree.compute_constant(expr)
    }

    #[test]
    fn integer_arithmetic_wraps() {
        assert_eq!(eval("2147483647 + 1"), Some(ConstValue::Int(i32::MIN)));
        assert_eq!(eval("-2147483648"), Some(ConstValue::Int(i32::MIN)));
        assert_eq!(eval("(-2147483648) / -1"), Some(ConstValue::Int(i32::MIN)));
        assert_eq!(eval("7 % -3"), Some(ConstValue::Int(1)));
        assert_eq!(eval("1 / 0"), None);
        assert_eq!(eval("1.0 / 0"), Some(ConstValue::Double(f64::INFINITY)));
        assert_eq!(eval("'a' + 1"), Some(ConstValue::Int(98)));
        assert_eq!(eval("1 + 2L"), Some(ConstValue::Long(3)));
    }

    #[test]
    fn shifts_mask_their_distance() {
        assert_eq!(eval("1 << 33"), Some(ConstValue::Int(2)));
        assert_eq!(eval("-1 >>> 28"), Some(ConstValue::Int(15)));
        assert_eq!(eval("-16 >> 2"), Some(ConstValue::Int(-4)));
        assert_eq!(eval("1L << 33"), Some(ConstValue::Long(8_589_934_592)));
        assert_eq!(eval("1 << 2L"), Some(ConstValue::Int(4)));
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(eval("\"a\" + 1 + 2"), Some(ConstValue::String("a12".into())));
        assert_eq!(eval("1 + 2 + \"a\""), Some(ConstValue::String("3a".into())));
        assert_eq!(eval("\"x\" + 1.0"), Some(ConstValue::String("x1.0".into())));
        assert_eq!(eval("\"x\" + 1e10"), Some(ConstValue::String("x1.0E10".into())));
        assert_eq!(eval("\"c\" + 'd'"), Some(ConstValue::String("cd".into())));
        assert_eq!(eval("\"b\" + true"), Some(ConstValue::String("btrue".into())));
        assert_eq!(eval("\"a\" == \"a\""), Some(ConstValue::Boolean(true)));
    }

    #[test]
    fn logic_comparison_and_conditionals() {
        assert_eq!(eval("1 < 2L"), Some(ConstValue::Boolean(true)));
        assert_eq!(eval("!(1 == 1)"), Some(ConstValue::Boolean(false)));
        assert_eq!(eval("false && x"), Some(ConstValue::Boolean(false)));
        assert_eq!(eval("true && x"), None);
        assert_eq!(eval("true ^ true"), Some(ConstValue::Boolean(false)));
        assert_eq!(eval("6 & 3 | 8"), Some(ConstValue::Int(10)));
        assert_eq!(eval("~0L"), Some(ConstValue::Long(-1)));
        assert_eq!(eval("true ? 1 : 2L"), Some(ConstValue::Long(1)));
        assert_eq!(eval("false ? \"a\" : \"b\""), Some(ConstValue::String("b".into())));
    }

    #[test]
    fn casts_narrow_like_java() {
        assert_eq!(eval("(byte) 300"), Some(ConstValue::Byte(44)));
        assert_eq!(eval("(int) 3.9"), Some(ConstValue::Int(3)));
        assert_eq!(eval("(int) (-3.9)"), Some(ConstValue::Int(-3)));
        assert_eq!(eval("(char) 65"), Some(ConstValue::Char(65)));
        assert_eq!(eval("(long) 1e30"), Some(ConstValue::Long(i64::MAX)));
        assert_eq!(eval("(short) 70000L"), Some(ConstValue::Short(4464)));
        assert_eq!(eval("(boolean) 1"), None);
        assert_eq!(eval("(String) \"s\""), Some(ConstValue::String("s".into())));
    }

    #[test]
    fn final_variables_fold_and_cycles_stop() {
        let tree = SyntaxTree::parse(
            "interface I { int K = 7; }\n\
             class A { static final int X = 2; static final long Y = X * 3; final int Z = Z + 1; int w = 1;\n\
             static final byte B = 10;\n\
             void m() { final int local = 4; long a = Y; int b = Z; int c = w; int d = I.K; int e = local; int f = B; } }",
        );
        let value_of = |name: &str| {
            let var = tree
                .descendants(tree.root())
                .find(|&n| tree.kind(n) == SyntaxKind::LocalVariable && tree.name(n).as_deref() == Some(name))
                .unwrap();
            tree.compute_constant(tree.variable_initializer(var).unwrap())
        };
        assert_eq!(value_of("a"), Some(ConstValue::Long(6)));
        assert_eq!(value_of("b"), None);
        assert_eq!(value_of("c"), None);
        assert_eq!(value_of("d"), Some(ConstValue::Int(7)));
        assert_eq!(value_of("e"), Some(ConstValue::Int(4)));
        assert_eq!(value_of("f"), Some(ConstValue::Byte(10)));
    }
}
