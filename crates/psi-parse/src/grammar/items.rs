use psi_syntax::{tables, SyntaxKind};
use rowan::Checkpoint;

use super::lookahead;
use crate::parser::Parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClassFlavor {
    Class,
    Interface,
    Enum,
    Annotation,
}

impl Parser<'_> {
    pub(crate) fn file_contents(&mut self) {
        if self.at(SyntaxKind::PackageKw) {
            self.package_statement();
        }

        self.start(SyntaxKind::ImportList);
        while self.at(SyntaxKind::ImportKw) {
            self.import_statement();
        }
        self.finish_node();

        while !self.at(SyntaxKind::Eof) {
            if self.at(SyntaxKind::Semicolon) {
                self.bump();
                continue;
            }
            let checkpoint = self.declaration_checkpoint();
            self.modifier_list();
            if self.at_class_start() {
                self.class_declaration(checkpoint);
            } else {
                self.start_at(checkpoint, SyntaxKind::ErrorElement);
                self.error_here("expected class or interface declaration");
                self.recover_to(&[
                    SyntaxKind::ClassKw,
                    SyntaxKind::InterfaceKw,
                    SyntaxKind::EnumKw,
                    SyntaxKind::PublicKw,
                    SyntaxKind::At,
                ]);
                self.finish_node();
            }
        }
    }

    fn package_statement(&mut self) {
        self.start(SyntaxKind::PackageStatement);
        self.expect(SyntaxKind::PackageKw, "expected `package`");
        self.code_reference(false);
        self.expect(SyntaxKind::Semicolon, "expected `;` after package statement");
        self.finish_node();
    }

    pub(crate) fn import_statement(&mut self) {
        let kind = if self.nth(1) == SyntaxKind::StaticKw {
            SyntaxKind::ImportStaticStatement
        } else {
            SyntaxKind::ImportStatement
        };
        self.start(kind);
        self.expect(SyntaxKind::ImportKw, "expected `import`");
        if kind == SyntaxKind::ImportStaticStatement {
            self.bump();
        }
        self.code_reference(false);
        if self.at(SyntaxKind::Dot) && self.nth(1) == SyntaxKind::Star {
            self.bump();
            self.bump();
        }
        self.expect(SyntaxKind::Semicolon, "expected `;` after import");
        self.finish_node();
    }

    fn at_class_start(&mut self) -> bool {
        matches!(
            self.current(),
            SyntaxKind::ClassKw | SyntaxKind::InterfaceKw | SyntaxKind::EnumKw
        ) || (self.at(SyntaxKind::At) && self.nth(1) == SyntaxKind::InterfaceKw)
    }

    /// Class-like declaration; the modifier list was already emitted after `checkpoint`.
    pub(crate) fn class_declaration(&mut self, checkpoint: Checkpoint) {
        self.start_at(checkpoint, SyntaxKind::Class);
        let flavor = match self.current() {
            SyntaxKind::InterfaceKw => ClassFlavor::Interface,
            SyntaxKind::EnumKw => ClassFlavor::Enum,
            SyntaxKind::At => ClassFlavor::Annotation,
            _ => ClassFlavor::Class,
        };
        if flavor == ClassFlavor::Annotation {
            self.bump();
        }
        self.bump();
        self.expect(SyntaxKind::Identifier, "expected class name");

        match flavor {
            ClassFlavor::Class | ClassFlavor::Interface => {
                self.type_parameter_list();
                self.reference_list(SyntaxKind::ExtendsList, SyntaxKind::ExtendsKw);
                self.reference_list(SyntaxKind::ImplementsList, SyntaxKind::ImplementsKw);
            }
            ClassFlavor::Enum => {
                self.reference_list(SyntaxKind::ImplementsList, SyntaxKind::ImplementsKw);
            }
            ClassFlavor::Annotation => {}
        }

        self.class_body(flavor);
        self.finish_node();
    }

    /// `{ members }`, emitted into the currently open node.
    pub(crate) fn class_body(&mut self, flavor: ClassFlavor) {
        if !self.expect(SyntaxKind::LBrace, "expected `{`") {
            return;
        }

        if flavor == ClassFlavor::Enum {
            while lookahead::at_enum_constant(self.tokens()) {
                self.enum_constant();
                if self.at(SyntaxKind::Comma) {
                    self.bump();
                } else {
                    break;
                }
            }
            if self.at(SyntaxKind::Semicolon) {
                self.bump();
            }
        }

        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            self.member(flavor == ClassFlavor::Annotation);
        }
        self.expect(SyntaxKind::RBrace, "expected `}`");
    }

    pub(crate) fn enum_constant(&mut self) {
        let checkpoint = self.declaration_checkpoint();
        self.modifier_list();
        self.start_at(checkpoint, SyntaxKind::EnumConstant);
        self.expect(SyntaxKind::Identifier, "expected enum constant name");
        if self.at(SyntaxKind::LParen) {
            self.expression_list();
        }
        if self.at(SyntaxKind::LBrace) {
            self.start(SyntaxKind::EnumConstantInitializer);
            self.class_body(ClassFlavor::Class);
            self.finish_node();
        }
        self.finish_node();
    }

    pub(crate) fn member(&mut self, in_annotation: bool) {
        if self.at(SyntaxKind::Semicolon) {
            self.bump();
            return;
        }

        let checkpoint = self.declaration_checkpoint();
        self.modifier_list();

        if self.at(SyntaxKind::LBrace) {
            self.start_at(checkpoint, SyntaxKind::ClassInitializer);
            self.code_block();
            self.finish_node();
            return;
        }

        if self.at_class_start() {
            self.class_declaration(checkpoint);
            return;
        }

        if self.at(SyntaxKind::Less) {
            self.type_parameter_list();
            self.method_rest(checkpoint, in_annotation);
            return;
        }

        if lookahead::at_method_header(self.tokens()) {
            self.empty_node(SyntaxKind::TypeParameterList);
            self.method_rest(checkpoint, in_annotation);
            return;
        }

        if lookahead::skip_type(self.tokens(), 0).is_some() {
            self.field_group(checkpoint);
            return;
        }

        self.start_at(checkpoint, SyntaxKind::ErrorElement);
        self.error_here("unexpected token in class body");
        self.recover_to(&[SyntaxKind::Semicolon, SyntaxKind::RBrace, SyntaxKind::LBrace]);
        if self.at(SyntaxKind::Semicolon) {
            self.bump();
        } else if self.at(SyntaxKind::LBrace) {
            self.code_block();
        }
        self.finish_node();
    }

    fn method_rest(&mut self, checkpoint: Checkpoint, in_annotation: bool) {
        let kind = if in_annotation {
            SyntaxKind::AnnotationMethod
        } else {
            SyntaxKind::Method
        };
        self.start_at(checkpoint, kind);
        let constructor = self.at(SyntaxKind::Identifier) && self.nth(1) == SyntaxKind::LParen;
        if !constructor {
            self.type_element(false);
        }
        self.expect(SyntaxKind::Identifier, "expected method name");
        self.parameter_list();
        self.array_dimensions();
        self.reference_list(SyntaxKind::ThrowsList, SyntaxKind::ThrowsKw);
        if kind == SyntaxKind::AnnotationMethod && self.at(SyntaxKind::DefaultKw) {
            self.bump();
            self.annotation_value();
        }
        if self.at(SyntaxKind::LBrace) {
            self.code_block();
        } else {
            self.expect(SyntaxKind::Semicolon, "expected `;` or method body");
        }
        self.finish_node();
    }

    /// `Type a [= x], b [= y];` as consecutive `Field` nodes.
    ///
    /// Only the first field owns the modifier list and type. Separating commas
    /// sit between the fields; the closing `;` belongs to the last one.
    fn field_group(&mut self, checkpoint: Checkpoint) {
        self.start_at(checkpoint, SyntaxKind::Field);
        self.type_element(false);
        loop {
            self.expect(SyntaxKind::Identifier, "expected field name");
            self.array_dimensions();
            if self.at(SyntaxKind::Eq) {
                self.bump();
                self.variable_initializer();
            }
            if self.at(SyntaxKind::Comma) {
                self.finish_node();
                self.bump();
                self.start(SyntaxKind::Field);
                continue;
            }
            self.expect(SyntaxKind::Semicolon, "expected `;` after field declaration");
            self.finish_node();
            break;
        }
    }

    pub(crate) fn array_dimensions(&mut self) {
        while self.at(SyntaxKind::LBracket) && self.nth(1) == SyntaxKind::RBracket {
            self.bump();
            self.bump();
        }
    }

    pub(crate) fn modifier_list(&mut self) {
        self.start(SyntaxKind::ModifierList);
        loop {
            let kind = self.current();
            if kind == SyntaxKind::At && self.nth(1) != SyntaxKind::InterfaceKw {
                self.annotation();
                continue;
            }
            if tables::MODIFIER_KEYWORDS.contains(kind) {
                // `synchronized (x)` starts a statement, not a modifier.
                if kind == SyntaxKind::SynchronizedKw && self.nth(1) == SyntaxKind::LParen {
                    break;
                }
                self.bump();
                continue;
            }
            break;
        }
        self.finish_node();
    }

    pub(crate) fn annotation(&mut self) {
        self.start(SyntaxKind::Annotation);
        self.expect(SyntaxKind::At, "expected `@`");
        self.code_reference(false);
        self.start(SyntaxKind::AnnotationParameterList);
        if self.at(SyntaxKind::LParen) {
            self.bump();
            while !self.at(SyntaxKind::RParen) && !self.at(SyntaxKind::Eof) {
                self.name_value_pair();
                if !self.at(SyntaxKind::Comma) {
                    break;
                }
                self.bump();
            }
            self.expect(SyntaxKind::RParen, "expected `)`");
        }
        self.finish_node();
        self.finish_node();
    }

    fn name_value_pair(&mut self) {
        self.start(SyntaxKind::NameValuePair);
        if self.at(SyntaxKind::Identifier) && self.nth(1) == SyntaxKind::Eq {
            self.bump();
            self.bump();
        }
        self.annotation_value();
        self.finish_node();
    }

    pub(crate) fn annotation_value(&mut self) {
        match self.current() {
            SyntaxKind::At => self.annotation(),
            SyntaxKind::LBrace => {
                self.start(SyntaxKind::AnnotationArrayInitializer);
                self.bump();
                while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
                    self.annotation_value();
                    if !self.at(SyntaxKind::Comma) {
                        break;
                    }
                    self.bump();
                }
                self.expect(SyntaxKind::RBrace, "expected `}`");
                self.finish_node();
            }
            _ => {
                if !self.conditional_expression() {
                    self.error_token("expected annotation value");
                }
            }
        }
    }

    /// Always emits a `TypeParameterList`, empty when no `<` follows.
    pub(crate) fn type_parameter_list(&mut self) {
        self.start(SyntaxKind::TypeParameterList);
        if self.at(SyntaxKind::Less) {
            self.bump();
            while !self.at_closing_angle() && !self.at(SyntaxKind::Eof) {
                self.type_parameter();
                if !self.at(SyntaxKind::Comma) {
                    break;
                }
                self.bump();
            }
            self.expect_greater();
        }
        self.finish_node();
    }

    pub(crate) fn type_parameter(&mut self) {
        self.start(SyntaxKind::TypeParameter);
        self.expect(SyntaxKind::Identifier, "expected type parameter name");
        self.start(SyntaxKind::ExtendsBoundList);
        if self.at(SyntaxKind::ExtendsKw) {
            self.bump();
            self.code_reference(true);
            while self.at(SyntaxKind::Amp) {
                self.bump();
                self.code_reference(true);
            }
        }
        self.finish_node();
        self.finish_node();
    }

    /// `extends` / `implements` / `throws` list; always emitted, possibly empty.
    pub(crate) fn reference_list(&mut self, kind: SyntaxKind, keyword: SyntaxKind) {
        self.start(kind);
        if self.at(keyword) {
            self.bump();
            self.code_reference(true);
            while self.at(SyntaxKind::Comma) {
                self.bump();
                self.code_reference(true);
            }
        }
        self.finish_node();
    }

    pub(crate) fn parameter_list(&mut self) {
        self.start(SyntaxKind::ParameterList);
        if self.expect(SyntaxKind::LParen, "expected `(`") {
            while !self.at(SyntaxKind::RParen) && !self.at(SyntaxKind::Eof) {
                self.parameter();
                if !self.at(SyntaxKind::Comma) {
                    break;
                }
                self.bump();
            }
            self.expect(SyntaxKind::RParen, "expected `)`");
        }
        self.finish_node();
    }

    pub(crate) fn parameter(&mut self) {
        self.start(SyntaxKind::Parameter);
        self.modifier_list();
        self.type_element(true);
        self.expect(SyntaxKind::Identifier, "expected parameter name");
        self.array_dimensions();
        self.finish_node();
    }
}
