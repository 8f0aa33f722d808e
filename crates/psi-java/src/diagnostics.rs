//! File-local problems: parse errors, malformed literals and references that
//! resolve to nothing.
//!
//! Only declarations inside the tree are visible to resolution, so a
//! reference is reported as unresolved only where the tree can answer for
//! its whole scope: names that an import or `java.lang` might supply, members
//! of classes with a supertype outside the tree and anything qualified by a
//! package or an unknown type are left alone.

use psi_syntax::{tables, SyntaxKind};
use serde::Serialize;

use crate::resolve::ResolvedElement;
use crate::role::Role;
use crate::types::is_java_lang;
use crate::{NodeId, SyntaxTree};

/// Members of `java.lang.Object` every class inherits.
const OBJECT_METHODS: &[&str] = &[
    "clone",
    "equals",
    "finalize",
    "getClass",
    "hashCode",
    "notify",
    "notifyAll",
    "toString",
    "wait",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    ParseError,
    LiteralError,
    UnresolvedReference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub start: u32,
    pub end: u32,
}

impl SyntaxTree {
    /// Every problem in the file, ordered by position.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut out: Vec<Diagnostic> = self
            .parse_errors()
            .iter()
            .map(|error| Diagnostic {
                kind: DiagnosticKind::ParseError,
                message: error.message.clone(),
                start: error.range.start().into(),
                end: error.range.end().into(),
            })
            .collect();
        let root = self.root();
        for node in self.descendants(root) {
            match self.kind(node) {
                SyntaxKind::LiteralExpression => {
                    if let Some(message) = self.literal_parsing_error(node) {
                        out.push(self.diagnostic(node, DiagnosticKind::LiteralError, message));
                    }
                }
                SyntaxKind::ReferenceExpression | SyntaxKind::JavaCodeReference => {
                    if self.is_reportable_reference(node) && self.multi_resolve(node).is_empty() {
                        let message = format!("cannot resolve symbol `{}`", self.text(node).trim());
                        out.push(self.diagnostic(node, DiagnosticKind::UnresolvedReference, message));
                    }
                }
                _ => {}
            }
        }
        out.sort_by_key(|d| (d.start, d.end));
        tracing::debug!(count = out.len(), "diagnostics computed");
        out
    }

    fn diagnostic(&self, node: NodeId, kind: DiagnosticKind, message: String) -> Diagnostic {
        let range = self.text_range(node);
        Diagnostic {
            kind,
            message,
            start: range.start().into(),
            end: range.end().into(),
        }
    }

    fn is_reportable_reference(&self, reference: NodeId) -> bool {
        let Some(name) = self.reference_name(reference) else {
            return false;
        };
        if self.ancestors(reference).any(|n| {
            matches!(
                self.kind(n),
                SyntaxKind::ImportList | SyntaxKind::PackageStatement
            )
        }) {
            return false;
        }
        let is_call = self.parent(reference).is_some_and(|parent| {
            self.kind(parent) == SyntaxKind::MethodCallExpression
                && self.method_expression(parent) == Some(reference)
        });
        if is_call && (OBJECT_METHODS.contains(&name.as_str()) || name == "this" || name == "super") {
            return false;
        }
        match self.qualifier(reference) {
            Some(qualifier) => match self.resolve(qualifier) {
                Some(ResolvedElement::Class(class)) => self.is_closed_class(class),
                Some(ResolvedElement::Package(_)) => false,
                _ if self.kind(reference) == SyntaxKind::JavaCodeReference => false,
                _ => self
                    .expression_type(qualifier)
                    .and_then(|ty| ty.class()?.declaration)
                    .is_some_and(|class| self.is_closed_class(class)),
            },
            None => {
                !is_java_lang(&name)
                    && !self.imports_could_supply(&name)
                    && !self.in_open_case_label(reference)
                    && self
                        .ancestors(reference)
                        .skip(1)
                        .filter(|&n| tables::CLASS_BODIES.contains(self.kind(n)))
                        .all(|class| self.is_closed_class(class))
            }
        }
    }

    fn imports_could_supply(&self, name: &str) -> bool {
        let root = self.root();
        self.imports(root).into_iter().any(|import| {
            self.is_on_demand(import)
                || self.import_name(import).rsplit('.').next() == Some(name)
        })
    }

    /// A `case` label of a switch whose selector type is not declared here.
    fn in_open_case_label(&self, reference: NodeId) -> bool {
        let Some(label) = self
            .parent(reference)
            .filter(|&p| self.kind(p) == SyntaxKind::SwitchLabelStatement)
        else {
            return false;
        };
        let selector_class = self
            .ancestors(label)
            .find(|&n| self.kind(n) == SyntaxKind::SwitchStatement)
            .and_then(|switch| self.condition(switch))
            .and_then(|selector| self.expression_type(selector))
            .and_then(|ty| ty.class()?.declaration);
        selector_class.is_none()
    }

    /// Every member of `class` is declared in the tree: no enum, type
    /// parameter or supertype outside it anywhere in the hierarchy.
    fn is_closed_class(&self, class: NodeId) -> bool {
        self.hierarchy(class).into_iter().all(|c| match self.kind(c) {
            SyntaxKind::Class => {
                let declared = [Role::ExtendsList, Role::ImplementsList]
                    .into_iter()
                    .filter_map(|role| self.find_child_by_role(c, role))
                    .flat_map(|list| self.children_of_kind(list, SyntaxKind::JavaCodeReference))
                    .count();
                !self.is_enum(c) && declared == self.direct_supertypes(c).len()
            }
            SyntaxKind::AnonymousClass => self.direct_supertypes(c).len() == 1,
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn unresolved(source: &str) -> Vec<String> {
        let tree = SyntaxTree::parse(source);
        tree.diagnostics()
            .into_iter()
            .filter(|d| d.kind == DiagnosticKind::UnresolvedReference)
            .map(|d| source[d.start as usize..d.end as usize].to_string())
            .collect()
    }

    #[test]
    fn reports_names_the_file_must_declare() {
        let source = "class A { int x; void m() { x = y; helper(); this.missing(); } }";
        assert_eq!(unresolved(source), ["y", "helper", "this.missing"]);
    }

    #[test]
    fn library_scopes_are_not_reported() {
        let source = "import java.util.*;\nclass A extends Base { void m(String s) { System.out.println(s.length()); inherited(); toString(); List l; } }";
        assert_eq!(unresolved(source), Vec::<String>::new());
        let source = "import java.util.List;\nclass A { List<String> l; Map m; }";
        assert_eq!(unresolved(source), ["Map"]);
    }

    #[test]
    fn literal_and_parse_errors() {
        let tree = SyntaxTree::parse("class A { int i = 2147483648; long l = -9223372036854775808L; }");
        let kinds: Vec<DiagnosticKind> = tree.diagnostics().into_iter().map(|d| d.kind).collect();
        assert_eq!(kinds, [DiagnosticKind::LiteralError]);

        let tree = SyntaxTree::parse("class A { void m() { int = ; } }");
        assert!(tree
            .diagnostics()
            .iter()
            .any(|d| d.kind == DiagnosticKind::ParseError));
    }
}
