use psi_syntax::{tables, SyntaxKind};
use rowan::Checkpoint;

use super::items::ClassFlavor;
use super::lookahead;
use crate::parser::Parser;

const ASSIGNMENT_BP: u8 = 1;
const CONDITIONAL_BP: u8 = 10;
const INSTANCEOF_BP: u8 = 50;

fn infix_binding_power(op: SyntaxKind) -> Option<u8> {
    use SyntaxKind::*;
    let bp = match op {
        PipePipe => 20,
        AmpAmp => 30,
        Pipe => 38,
        Caret => 39,
        Amp => 40,
        EqEq | BangEq => 45,
        Less | LessEq | Greater | GreaterEq => 50,
        LeftShift | RightShift | UnsignedRightShift => 55,
        Plus | Minus => 60,
        Star | Slash | Percent => 70,
        _ => return None,
    };
    Some(bp)
}

impl Parser<'_> {
    /// Parse an expression whose operators bind at least as tightly as `min_bp`.
    ///
    /// Returns `false` without consuming anything when no expression starts here.
    pub(crate) fn expression(&mut self, min_bp: u8) -> bool {
        let checkpoint = self.checkpoint();
        if !self.unary() {
            return false;
        }

        loop {
            let (op, width) = self.peek_operator();

            if tables::ASSIGNMENT_OPERATORS.contains(op) {
                if min_bp > ASSIGNMENT_BP {
                    break;
                }
                self.start_at(checkpoint, SyntaxKind::AssignmentExpression);
                self.bump_operator(op, width);
                if !self.expression(ASSIGNMENT_BP) {
                    self.error_here("expected expression");
                }
                self.finish_node();
                continue;
            }

            if op == SyntaxKind::Question {
                if min_bp > CONDITIONAL_BP {
                    break;
                }
                self.start_at(checkpoint, SyntaxKind::ConditionalExpression);
                self.bump();
                if !self.expression(ASSIGNMENT_BP) {
                    self.error_here("expected expression");
                }
                if self.expect(SyntaxKind::Colon, "expected `:`") && !self.expression(CONDITIONAL_BP) {
                    self.error_here("expected expression");
                }
                self.finish_node();
                continue;
            }

            if op == SyntaxKind::InstanceofKw {
                if min_bp > INSTANCEOF_BP {
                    break;
                }
                self.start_at(checkpoint, SyntaxKind::InstanceOfExpression);
                self.bump();
                self.type_element(false);
                self.finish_node();
                continue;
            }

            let Some(bp) = infix_binding_power(op) else {
                break;
            };
            if bp < min_bp {
                break;
            }
            self.start_at(checkpoint, SyntaxKind::BinaryExpression);
            self.bump_operator(op, width);
            if !self.expression(bp + 1) {
                self.error_here("expected expression");
            }
            self.finish_node();
        }
        true
    }

    /// Expression without a top-level assignment.
    pub(crate) fn conditional_expression(&mut self) -> bool {
        self.expression(CONDITIONAL_BP)
    }

    /// The operator at the cursor, joining adjacent `>` tokens into shifts.
    fn peek_operator(&mut self) -> (SyntaxKind, usize) {
        let first = self.current();
        if first != SyntaxKind::Greater {
            return (first, 1);
        }
        let second = self.nth(1);
        let third = self.nth(2);
        if second == SyntaxKind::Greater && self.adjacent(2) {
            if third == SyntaxKind::GreaterEq && self.adjacent(3) {
                return (SyntaxKind::UnsignedRightShiftEq, 3);
            }
            if third == SyntaxKind::Greater && self.adjacent(3) {
                return (SyntaxKind::UnsignedRightShift, 3);
            }
            return (SyntaxKind::RightShift, 2);
        }
        if second == SyntaxKind::GreaterEq && self.adjacent(2) {
            return (SyntaxKind::RightShiftEq, 2);
        }
        (SyntaxKind::Greater, 1)
    }

    fn bump_operator(&mut self, op: SyntaxKind, width: usize) {
        if width > 1 {
            self.bump_joined(op, width);
        } else {
            self.bump();
        }
    }

    fn unary(&mut self) -> bool {
        let kind = self.current();
        if tables::PREFIX_OPERATORS.contains(kind) {
            self.start(SyntaxKind::PrefixExpression);
            self.bump();
            if !self.unary() {
                self.error_here("expected expression");
            }
            self.finish_node();
            return true;
        }

        if kind == SyntaxKind::LParen && lookahead::at_cast(self.tokens()) {
            self.start(SyntaxKind::TypeCastExpression);
            self.bump();
            self.type_element(false);
            self.expect(SyntaxKind::RParen, "expected `)`");
            if !self.unary() {
                self.error_here("expected expression");
            }
            self.finish_node();
            return true;
        }

        let checkpoint = self.checkpoint();
        if !self.primary(checkpoint) {
            return false;
        }
        self.postfix(checkpoint);
        true
    }

    fn primary(&mut self, checkpoint: Checkpoint) -> bool {
        let kind = self.current();
        match kind {
            _ if tables::LITERAL_TOKENS.contains(kind) => {
                self.start(SyntaxKind::LiteralExpression);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::LParen => {
                self.start(SyntaxKind::ParenthesizedExpression);
                self.bump();
                if !self.expression(0) {
                    self.error_here("expected expression");
                }
                self.expect(SyntaxKind::RParen, "expected `)`");
                self.finish_node();
            }
            SyntaxKind::ThisKw | SyntaxKind::SuperKw if self.nth(1) == SyntaxKind::LParen => {
                self.start(SyntaxKind::MethodCallExpression);
                self.start(SyntaxKind::ReferenceExpression);
                self.empty_node(SyntaxKind::ReferenceParameterList);
                self.bump();
                self.finish_node();
                self.expression_list();
                self.finish_node();
            }
            SyntaxKind::ThisKw => {
                self.start(SyntaxKind::ThisExpression);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::SuperKw => {
                self.start(SyntaxKind::SuperExpression);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::NewKw => {
                self.start(SyntaxKind::NewExpression);
                self.new_expression_rest();
                self.finish_node();
            }
            _ if tables::PRIMITIVE_TYPE_KEYWORDS.contains(kind) => {
                self.class_object_access();
            }
            SyntaxKind::Identifier => match lookahead::qualified_name_suffix(self.tokens()) {
                Some(SyntaxKind::ClassKw) => self.class_object_access(),
                Some(keyword) => {
                    let node = if keyword == SyntaxKind::ThisKw {
                        SyntaxKind::ThisExpression
                    } else {
                        SyntaxKind::SuperExpression
                    };
                    self.start(node);
                    self.code_reference(false);
                    self.bump();
                    self.bump();
                    self.finish_node();
                }
                None => {
                    self.start(SyntaxKind::ReferenceExpression);
                    self.empty_node(SyntaxKind::ReferenceParameterList);
                    self.bump();
                    self.finish_node();
                    self.call_arguments(checkpoint);
                }
            },
            _ => return false,
        }
        true
    }

    /// `Type.class`, the type possibly an array of a primitive.
    fn class_object_access(&mut self) {
        self.start(SyntaxKind::ClassObjectAccessExpression);
        self.type_element(false);
        self.expect(SyntaxKind::Dot, "expected `.`");
        self.expect(SyntaxKind::ClassKw, "expected `class`");
        self.finish_node();
    }

    /// Turn the reference just emitted after `checkpoint` into a call when `(` follows.
    fn call_arguments(&mut self, checkpoint: Checkpoint) {
        if self.at(SyntaxKind::LParen) {
            self.start_at(checkpoint, SyntaxKind::MethodCallExpression);
            self.expression_list();
            self.finish_node();
        }
    }

    fn postfix(&mut self, checkpoint: Checkpoint) {
        loop {
            match self.current() {
                SyntaxKind::Dot if self.nth(1) == SyntaxKind::NewKw => {
                    self.start_at(checkpoint, SyntaxKind::NewExpression);
                    self.bump();
                    self.new_expression_rest();
                    self.finish_node();
                }
                SyntaxKind::Dot => {
                    self.start_at(checkpoint, SyntaxKind::ReferenceExpression);
                    self.bump();
                    self.reference_parameter_list(true);
                    self.expect(SyntaxKind::Identifier, "expected identifier");
                    self.finish_node();
                    self.call_arguments(checkpoint);
                }
                SyntaxKind::LBracket => {
                    self.start_at(checkpoint, SyntaxKind::ArrayAccessExpression);
                    self.bump();
                    if !self.expression(0) {
                        self.error_here("expected index expression");
                    }
                    self.expect(SyntaxKind::RBracket, "expected `]`");
                    self.finish_node();
                }
                SyntaxKind::PlusPlus | SyntaxKind::MinusMinus => {
                    self.start_at(checkpoint, SyntaxKind::PostfixExpression);
                    self.bump();
                    self.finish_node();
                }
                _ => break,
            }
        }
    }

    /// Everything of a `new` expression from the `new` keyword on; the caller
    /// owns the `NewExpression` node.
    fn new_expression_rest(&mut self) {
        self.expect(SyntaxKind::NewKw, "expected `new`");
        let class_checkpoint = self.checkpoint();
        let kind = self.current();
        if tables::PRIMITIVE_TYPE_KEYWORDS.contains(kind) {
            self.bump();
        } else if kind == SyntaxKind::Identifier {
            self.code_reference(true);
        } else {
            self.error_here("expected type after `new`");
            return;
        }

        if self.at(SyntaxKind::LBracket) {
            while self.at(SyntaxKind::LBracket) {
                self.bump();
                if !self.at(SyntaxKind::RBracket) && !self.expression(0) {
                    self.error_here("expected array dimension");
                }
                self.expect(SyntaxKind::RBracket, "expected `]`");
            }
            if self.at(SyntaxKind::LBrace) {
                self.array_initializer();
            }
            return;
        }

        if self.at(SyntaxKind::LParen) {
            self.expression_list();
            if self.at(SyntaxKind::LBrace) {
                self.start_at(class_checkpoint, SyntaxKind::AnonymousClass);
                self.class_body(ClassFlavor::Class);
                self.finish_node();
            }
            return;
        }

        self.error_here("expected `(` or `[`");
    }

    pub(crate) fn array_initializer(&mut self) {
        self.start(SyntaxKind::ArrayInitializerExpression);
        self.expect(SyntaxKind::LBrace, "expected `{`");
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            self.variable_initializer();
            if !self.at(SyntaxKind::Comma) {
                break;
            }
            self.bump();
        }
        self.expect(SyntaxKind::RBrace, "expected `}`");
        self.finish_node();
    }

    pub(crate) fn variable_initializer(&mut self) {
        if self.at(SyntaxKind::LBrace) {
            self.array_initializer();
        } else if !self.expression(0) {
            self.error_token("expected expression");
        }
    }

    /// Parenthesized, comma separated argument list.
    pub(crate) fn expression_list(&mut self) {
        self.start(SyntaxKind::ExpressionList);
        if self.expect(SyntaxKind::LParen, "expected `(`") {
            while !self.at(SyntaxKind::RParen) && !self.at(SyntaxKind::Eof) {
                if !self.expression(0) {
                    if matches!(self.current(), SyntaxKind::Semicolon | SyntaxKind::RBrace) {
                        self.error_here("expected `)`");
                        break;
                    }
                    self.error_token("expected expression");
                }
                if !self.at(SyntaxKind::Comma) {
                    break;
                }
                self.bump();
            }
            self.expect(SyntaxKind::RParen, "expected `)`");
        }
        self.finish_node();
    }
}
