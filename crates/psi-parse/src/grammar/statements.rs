use psi_syntax::SyntaxKind;

use super::lookahead;
use crate::parser::Parser;

impl Parser<'_> {
    pub(crate) fn code_block(&mut self) {
        self.start(SyntaxKind::CodeBlock);
        if self.expect(SyntaxKind::LBrace, "expected `{`") {
            while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
                self.statement();
            }
            self.expect(SyntaxKind::RBrace, "expected `}`");
        }
        self.finish_node();
    }

    /// One statement. Always consumes at least one token unless at end of input.
    pub(crate) fn statement(&mut self) {
        match self.current() {
            SyntaxKind::LBrace => {
                self.start(SyntaxKind::BlockStatement);
                self.code_block();
                self.finish_node();
            }
            SyntaxKind::Semicolon => {
                self.start(SyntaxKind::EmptyStatement);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::IfKw => self.if_statement(),
            SyntaxKind::WhileKw => {
                self.start(SyntaxKind::WhileStatement);
                self.bump();
                self.parenthesized_condition();
                self.statement_body();
                self.finish_node();
            }
            SyntaxKind::DoKw => {
                self.start(SyntaxKind::DoWhileStatement);
                self.bump();
                self.statement_body();
                self.expect(SyntaxKind::WhileKw, "expected `while`");
                self.parenthesized_condition();
                self.expect(SyntaxKind::Semicolon, "expected `;`");
                self.finish_node();
            }
            SyntaxKind::ForKw => self.for_statement(),
            SyntaxKind::SwitchKw => {
                self.start(SyntaxKind::SwitchStatement);
                self.bump();
                self.parenthesized_condition();
                self.code_block();
                self.finish_node();
            }
            SyntaxKind::CaseKw => {
                self.start(SyntaxKind::SwitchLabelStatement);
                self.bump();
                if !self.expression(0) {
                    self.error_here("expected case label");
                }
                self.expect(SyntaxKind::Colon, "expected `:`");
                self.finish_node();
            }
            SyntaxKind::DefaultKw => {
                self.start(SyntaxKind::SwitchLabelStatement);
                self.bump();
                self.expect(SyntaxKind::Colon, "expected `:`");
                self.finish_node();
            }
            SyntaxKind::Identifier if self.nth(1) == SyntaxKind::Colon => {
                self.start(SyntaxKind::LabeledStatement);
                self.bump();
                self.bump();
                self.statement_body();
                self.finish_node();
            }
            kind @ (SyntaxKind::BreakKw | SyntaxKind::ContinueKw) => {
                let node = if kind == SyntaxKind::BreakKw {
                    SyntaxKind::BreakStatement
                } else {
                    SyntaxKind::ContinueStatement
                };
                self.start(node);
                self.bump();
                if self.at(SyntaxKind::Identifier) {
                    self.bump();
                }
                self.expect(SyntaxKind::Semicolon, "expected `;`");
                self.finish_node();
            }
            SyntaxKind::ReturnKw => {
                self.start(SyntaxKind::ReturnStatement);
                self.bump();
                if !self.at(SyntaxKind::Semicolon) {
                    self.expression(0);
                }
                self.expect(SyntaxKind::Semicolon, "expected `;`");
                self.finish_node();
            }
            SyntaxKind::ThrowKw => {
                self.start(SyntaxKind::ThrowStatement);
                self.bump();
                if !self.expression(0) {
                    self.error_here("expected expression");
                }
                self.expect(SyntaxKind::Semicolon, "expected `;`");
                self.finish_node();
            }
            SyntaxKind::SynchronizedKw if self.nth(1) == SyntaxKind::LParen => {
                self.start(SyntaxKind::SynchronizedStatement);
                self.bump();
                self.parenthesized_condition();
                self.code_block();
                self.finish_node();
            }
            SyntaxKind::TryKw => self.try_statement(),
            SyntaxKind::AssertKw => {
                self.start(SyntaxKind::AssertStatement);
                self.bump();
                if !self.expression(0) {
                    self.error_here("expected condition");
                }
                if self.at(SyntaxKind::Colon) {
                    self.bump();
                    if !self.expression(0) {
                        self.error_here("expected detail message");
                    }
                }
                self.expect(SyntaxKind::Semicolon, "expected `;`");
                self.finish_node();
            }
            _ if lookahead::at_local_class(self.tokens()) => {
                self.start(SyntaxKind::DeclarationStatement);
                let checkpoint = self.declaration_checkpoint();
                self.modifier_list();
                self.class_declaration(checkpoint);
                self.finish_node();
            }
            _ if lookahead::at_typed_declaration(self.tokens(), &[]) => {
                self.start(SyntaxKind::DeclarationStatement);
                self.local_variables();
                self.finish_node();
            }
            _ => {
                let checkpoint = self.checkpoint();
                if self.expression(0) {
                    self.start_at(checkpoint, SyntaxKind::ExpressionStatement);
                    self.expect(SyntaxKind::Semicolon, "expected `;`");
                    self.finish_node();
                } else {
                    self.error_token("expected statement");
                }
            }
        }
    }

    /// The body of a loop, label or `if` branch.
    fn statement_body(&mut self) {
        if self.at(SyntaxKind::Eof) || self.at(SyntaxKind::RBrace) {
            self.error_here("expected statement");
            return;
        }
        self.statement();
    }

    fn parenthesized_condition(&mut self) {
        if self.expect(SyntaxKind::LParen, "expected `(`") {
            if !self.expression(0) {
                self.error_here("expected expression");
            }
            self.expect(SyntaxKind::RParen, "expected `)`");
        }
    }

    fn if_statement(&mut self) {
        self.start(SyntaxKind::IfStatement);
        self.bump();
        self.parenthesized_condition();
        self.statement_body();
        if self.at(SyntaxKind::ElseKw) {
            self.bump();
            self.statement_body();
        }
        self.finish_node();
    }

    /// `[modifiers] Type a [= x], b [= y];` as consecutive `LocalVariable`
    /// nodes; the caller owns the enclosing node.
    fn local_variables(&mut self) {
        self.start(SyntaxKind::LocalVariable);
        self.modifier_list();
        self.type_element(false);
        loop {
            self.expect(SyntaxKind::Identifier, "expected variable name");
            self.array_dimensions();
            if self.at(SyntaxKind::Eq) {
                self.bump();
                self.variable_initializer();
            }
            if self.at(SyntaxKind::Comma) {
                self.finish_node();
                self.bump();
                self.start(SyntaxKind::LocalVariable);
                continue;
            }
            self.expect(SyntaxKind::Semicolon, "expected `;`");
            self.finish_node();
            break;
        }
    }

    fn for_statement(&mut self) {
        let checkpoint = self.checkpoint();
        self.bump();
        if !self.expect(SyntaxKind::LParen, "expected `(`") {
            self.start_at(checkpoint, SyntaxKind::ForStatement);
            self.finish_node();
            return;
        }

        if lookahead::at_typed_declaration(self.tokens(), &[SyntaxKind::Colon]) {
            self.start_at(checkpoint, SyntaxKind::ForeachStatement);
            self.parameter();
            self.expect(SyntaxKind::Colon, "expected `:`");
            if !self.expression(0) {
                self.error_here("expected expression");
            }
            self.expect(SyntaxKind::RParen, "expected `)`");
            self.statement_body();
            self.finish_node();
            return;
        }

        self.start_at(checkpoint, SyntaxKind::ForStatement);
        // Initialization always produces a statement that owns the first `;`.
        if self.at(SyntaxKind::Semicolon) {
            self.start(SyntaxKind::EmptyStatement);
            self.bump();
            self.finish_node();
        } else if lookahead::at_typed_declaration(self.tokens(), &[]) {
            self.start(SyntaxKind::DeclarationStatement);
            self.local_variables();
            self.finish_node();
        } else {
            self.expression_statement_list(true);
        }

        if !self.at(SyntaxKind::Semicolon) && !self.expression(0) {
            self.error_here("expected condition");
        }
        self.expect(SyntaxKind::Semicolon, "expected `;`");

        if !self.at(SyntaxKind::RParen) {
            self.expression_statement_list(false);
        }
        self.expect(SyntaxKind::RParen, "expected `)`");
        self.statement_body();
        self.finish_node();
    }

    /// `a, b, c` as an `ExpressionListStatement`, or a single expression as an
    /// `ExpressionStatement`.
    fn expression_statement_list(&mut self, with_semicolon: bool) {
        let checkpoint = self.checkpoint();
        if !self.expression(0) {
            self.error_here("expected expression");
        }
        if self.at(SyntaxKind::Comma) {
            self.start_at(checkpoint, SyntaxKind::ExpressionList);
            while self.at(SyntaxKind::Comma) {
                self.bump();
                if !self.expression(0) {
                    self.error_here("expected expression");
                }
            }
            self.finish_node();
            self.start_at(checkpoint, SyntaxKind::ExpressionListStatement);
        } else {
            self.start_at(checkpoint, SyntaxKind::ExpressionStatement);
        }
        if with_semicolon {
            self.expect(SyntaxKind::Semicolon, "expected `;`");
        }
        self.finish_node();
    }

    fn try_statement(&mut self) {
        self.start(SyntaxKind::TryStatement);
        self.bump();
        if self.at(SyntaxKind::LParen) {
            self.start(SyntaxKind::ResourceList);
            self.bump();
            while !self.at(SyntaxKind::RParen) && !self.at(SyntaxKind::Eof) {
                self.start(SyntaxKind::ResourceVariable);
                self.modifier_list();
                self.type_element(false);
                self.expect(SyntaxKind::Identifier, "expected resource name");
                if self.expect(SyntaxKind::Eq, "expected `=`") && !self.expression(0) {
                    self.error_here("expected expression");
                }
                self.finish_node();
                if !self.at(SyntaxKind::Semicolon) {
                    break;
                }
                self.bump();
            }
            self.expect(SyntaxKind::RParen, "expected `)`");
            self.finish_node();
        }
        self.code_block();
        while self.at(SyntaxKind::CatchKw) {
            self.start(SyntaxKind::CatchSection);
            self.bump();
            if self.expect(SyntaxKind::LParen, "expected `(`") {
                self.start(SyntaxKind::Parameter);
                self.modifier_list();
                self.catch_type();
                self.expect(SyntaxKind::Identifier, "expected parameter name");
                self.finish_node();
                self.expect(SyntaxKind::RParen, "expected `)`");
            }
            self.code_block();
            self.finish_node();
        }
        if self.at(SyntaxKind::FinallyKw) {
            self.bump();
            self.code_block();
        }
        self.finish_node();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use psi_syntax::SyntaxKind;

    use crate::{parse_fragment, FragmentKind};

    fn statement_kind(text: &str) -> SyntaxKind {
        let parse = parse_fragment(text, FragmentKind::Statement);
        assert!(parse.errors.is_empty(), "{text}: {:?}", parse.errors);
        assert_eq!(parse.syntax().to_string(), text);
        parse.syntax().first_child().unwrap().kind()
    }

    #[test]
    fn statement_kinds() {
        assert_eq!(statement_kind("x = 1;"), SyntaxKind::ExpressionStatement);
        assert_eq!(statement_kind("int a = 1, b;"), SyntaxKind::DeclarationStatement);
        assert_eq!(statement_kind("List<String> xs;"), SyntaxKind::DeclarationStatement);
        assert_eq!(statement_kind("for (int i = 0; i < n; i++) {}"), SyntaxKind::ForStatement);
        assert_eq!(statement_kind("for (;;) ;"), SyntaxKind::ForStatement);
        assert_eq!(statement_kind("for (String s : xs) {}"), SyntaxKind::ForeachStatement);
        assert_eq!(statement_kind("outer: while (true) break outer;"), SyntaxKind::LabeledStatement);
        assert_eq!(statement_kind("do x++; while (x < 3);"), SyntaxKind::DoWhileStatement);
        assert_eq!(statement_kind("switch (x) { case 1: break; default: }"), SyntaxKind::SwitchStatement);
        assert_eq!(statement_kind("synchronized (this) {}"), SyntaxKind::SynchronizedStatement);
        assert_eq!(statement_kind("assert x : \"msg\";"), SyntaxKind::AssertStatement);
        assert_eq!(statement_kind("final class Local {}"), SyntaxKind::DeclarationStatement);
        assert_eq!(
            statement_kind("try (Reader r = open()) {} catch (IOException | RuntimeException e) {} finally {}"),
            SyntaxKind::TryStatement
        );
    }

    #[test]
    fn declaration_statement_holds_one_variable_per_name() {
        let parse = parse_fragment("int a, b, c;", FragmentKind::Statement);
        let decl = parse.syntax().first_child().unwrap();
        let names: Vec<_> = decl
            .children()
            .filter(|n| n.kind() == SyntaxKind::LocalVariable)
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["int a", "b", "c;"]);
    }

    #[test]
    fn garbage_always_makes_progress() {
        let parse = parse_fragment(") ) )", FragmentKind::CodeBlock);
        assert!(!parse.errors.is_empty());
        assert_eq!(parse.syntax().to_string(), ") ) )");
    }
}
