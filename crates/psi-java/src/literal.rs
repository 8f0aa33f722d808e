//! Values and diagnostics of literal expressions.

use psi_syntax::literals::{self, IntegerParse, LiteralError};
use psi_syntax::SyntaxKind;

use crate::constant::ConstValue;
use crate::role::Role;
use crate::{NodeId, SyntaxTree};

fn error(message: &str, text: &str) -> LiteralError {
    LiteralError {
        message: message.to_string(),
        span: 0..text.len(),
    }
}

impl SyntaxTree {
    /// The value a literal expression denotes. `None` for `null`, for
    /// non-literals and for literals whose text does not decode.
    pub fn literal_value(&self, expr: NodeId) -> Option<ConstValue> {
        self.decode_literal(expr).ok().flatten()
    }

    /// Why a literal's text does not decode, as shown to the user.
    pub fn literal_parsing_error(&self, expr: NodeId) -> Option<String> {
        self.decode_literal(expr).err().map(|e| e.message)
    }

    fn decode_literal(&self, expr: NodeId) -> Result<Option<ConstValue>, LiteralError> {
        if self.kind(expr) != SyntaxKind::LiteralExpression {
            return Ok(None);
        }
        let Some(token) = self.find_child_by_role(expr, Role::Literal) else {
            return Ok(None);
        };
        let text = self.leaf_text(token);
        let value = match self.kind(token) {
            SyntaxKind::IntegerLiteral => match literals::parse_int_literal(text)? {
                IntegerParse::Value(value) => ConstValue::Int(value as i32),
                IntegerParse::MinValueMagnitude if self.is_negated(expr) => {
                    ConstValue::Int(i32::MIN)
                }
                IntegerParse::MinValueMagnitude => {
                    return Err(error(literals::INTEGER_TOO_LARGE, text))
                }
            },
            SyntaxKind::LongLiteral => match literals::parse_long_literal(text)? {
                IntegerParse::Value(value) => ConstValue::Long(value),
                IntegerParse::MinValueMagnitude if self.is_negated(expr) => {
                    ConstValue::Long(i64::MIN)
                }
                IntegerParse::MinValueMagnitude => {
                    return Err(error(literals::LONG_TOO_LARGE, text))
                }
            },
            SyntaxKind::FloatLiteral => {
                let value = literals::parse_float_literal(text)?;
                check_floating(value.is_infinite(), value == 0.0, text)?;
                ConstValue::Float(value)
            }
            SyntaxKind::DoubleLiteral => {
                let value = literals::parse_double_literal(text)?;
                check_floating(value.is_infinite(), value == 0.0, text)?;
                ConstValue::Double(value)
            }
            SyntaxKind::CharacterLiteral => {
                ConstValue::Char(literals::unescape_char_literal(text)?)
            }
            SyntaxKind::StringLiteral => {
                let units = literals::unescape_string_literal(text)?;
                ConstValue::String(String::from_utf16_lossy(&units))
            }
            SyntaxKind::TrueKw => ConstValue::Boolean(true),
            SyntaxKind::FalseKw => ConstValue::Boolean(false),
            _ => return Ok(None),
        };
        Ok(Some(value))
    }

    /// The literal is the operand of a unary minus.
    fn is_negated(&self, literal: NodeId) -> bool {
        self.parent(literal).map_or(false, |parent| {
            self.kind(parent) == SyntaxKind::PrefixExpression
                && self.operation_sign(parent) == Some(SyntaxKind::Minus)
        })
    }
}

/// A finite non-zero literal must not round to infinity or to zero.
fn check_floating(infinite: bool, zero: bool, text: &str) -> Result<(), LiteralError> {
    if infinite {
        return Err(error(literals::FLOAT_TOO_LARGE, text));
    }
    if zero && !literals::is_fp_zero(text) {
        return Err(error(literals::FLOAT_TOO_SMALL, text));
    }
    Ok(())
}
