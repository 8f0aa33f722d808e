use psi_syntax::{tables, SyntaxKind};

use crate::parser::Parser;

impl Parser<'_> {
    /// A `Type` node: primitive keyword, class reference or wildcard, followed
    /// by array dimensions and (for parameters) `...`.
    pub(crate) fn type_element(&mut self, allow_varargs: bool) {
        self.start(SyntaxKind::Type);
        let kind = self.current();
        if kind == SyntaxKind::Question {
            self.bump();
            if self.at(SyntaxKind::ExtendsKw) || self.at(SyntaxKind::SuperKw) {
                self.bump();
                self.type_element(false);
            }
            self.finish_node();
            return;
        }

        if tables::PRIMITIVE_TYPE_KEYWORDS.contains(kind) {
            self.bump();
        } else if kind == SyntaxKind::Identifier {
            self.code_reference(true);
        } else {
            self.error_here("expected type");
        }

        self.array_dimensions();
        if allow_varargs && self.at(SyntaxKind::Ellipsis) {
            self.bump();
        }
        self.finish_node();
    }

    /// Catch parameter type; `A | B` becomes a `Type` wrapping the alternatives.
    pub(crate) fn catch_type(&mut self) {
        let checkpoint = self.checkpoint();
        self.type_element(false);
        if self.at(SyntaxKind::Pipe) {
            self.start_at(checkpoint, SyntaxKind::Type);
            while self.at(SyntaxKind::Pipe) {
                self.bump();
                self.type_element(false);
            }
            self.finish_node();
        }
    }

    /// Qualified name as nested `JavaCodeReference` nodes, innermost first.
    ///
    /// Every segment carries a `ReferenceParameterList`, empty unless type
    /// arguments are allowed and present.
    pub(crate) fn code_reference(&mut self, type_args: bool) {
        let checkpoint = self.checkpoint();
        self.start(SyntaxKind::JavaCodeReference);
        self.expect(SyntaxKind::Identifier, "expected identifier");
        self.reference_parameter_list(type_args);
        self.finish_node();

        while self.at(SyntaxKind::Dot) && self.nth(1) == SyntaxKind::Identifier {
            self.start_at(checkpoint, SyntaxKind::JavaCodeReference);
            self.bump();
            self.bump();
            self.reference_parameter_list(type_args);
            self.finish_node();
        }
    }

    pub(crate) fn reference_parameter_list(&mut self, type_args: bool) {
        self.start(SyntaxKind::ReferenceParameterList);
        if type_args && self.at(SyntaxKind::Less) {
            self.bump();
            while !self.at_closing_angle() && !self.at(SyntaxKind::Eof) {
                self.type_element(false);
                if !self.at(SyntaxKind::Comma) {
                    break;
                }
                self.bump();
            }
            self.expect_greater();
        }
        self.finish_node();
    }

    pub(crate) fn at_closing_angle(&mut self) -> bool {
        matches!(self.current(), SyntaxKind::Greater | SyntaxKind::GreaterEq)
    }

    /// Consume one `>`, splitting `>=` when it closes a type argument list.
    pub(crate) fn expect_greater(&mut self) -> bool {
        self.split_greater_eq();
        self.expect(SyntaxKind::Greater, "expected `>`")
    }
}

#[cfg(test)]
mod tests {
    use crate::{debug_dump, parse_fragment, FragmentKind};

    #[test]
    fn nested_generic_closes_each_list() {
        let parse = parse_fragment("Map<String, List<int[]>>", FragmentKind::Type);
        assert!(parse.errors.is_empty(), "{:?}", parse.errors);
        let dump = debug_dump(&parse.syntax());
        assert_eq!(dump.matches("ReferenceParameterList").count(), 3);
        assert_eq!(parse.syntax().to_string(), "Map<String, List<int[]>>");
    }

    #[test]
    fn wildcard_bounds() {
        let parse = parse_fragment("List<? extends Number>", FragmentKind::Type);
        assert!(parse.errors.is_empty(), "{:?}", parse.errors);
        assert!(debug_dump(&parse.syntax()).contains("Question"));
    }

    #[test]
    fn qualified_reference_nests_left() {
        let parse = parse_fragment("java.util.List", FragmentKind::Reference);
        let root = parse.syntax();
        let outer = root.first_child().unwrap();
        assert_eq!(outer.to_string(), "java.util.List");
        let inner = outer.first_child().unwrap();
        assert_eq!(inner.to_string(), "java.util");
    }
}
