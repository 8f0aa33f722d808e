//! A parsed file that materializes its arena tree on first structural use.
//!
//! Summary queries (package, imports, top-level classes) are answered from
//! the immutable green tree until the arena exists; afterwards they read the
//! arena so edits are visible.

use std::cell::OnceCell;

use psi_parse::{parse_java, ParseError};
use psi_syntax::{SyntaxKind, SyntaxNode};
use rowan::GreenNode;
use serde::Serialize;

use crate::role::Role;
use crate::SyntaxTree;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub name: String,
    pub is_static: bool,
    pub on_demand: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassSummary {
    pub name: String,
    pub type_parameters: Vec<String>,
}

pub struct LazyJavaFile {
    green: GreenNode,
    errors: Vec<ParseError>,
    tree: OnceCell<SyntaxTree>,
}

impl LazyJavaFile {
    pub fn parse(text: &str) -> LazyJavaFile {
        let parse = parse_java(text);
        LazyJavaFile {
            green: parse.green,
            errors: parse.errors,
            tree: OnceCell::new(),
        }
    }

    pub fn is_materialized(&self) -> bool {
        self.tree.get().is_some()
    }

    /// The arena tree, built on first call.
    pub fn tree(&self) -> &SyntaxTree {
        self.tree.get_or_init(|| {
            tracing::debug!(len = u32::from(self.green.text_len()), "materializing lazy file");
            SyntaxTree::from_green(&self.green, self.errors.clone())
        })
    }

    pub fn tree_mut(&mut self) -> &mut SyntaxTree {
        self.tree();
        self.tree.get_mut().expect("tree initialized above")
    }

    pub fn into_tree(self) -> SyntaxTree {
        let LazyJavaFile { green, errors, tree } = self;
        tree.into_inner()
            .unwrap_or_else(|| SyntaxTree::from_green(&green, errors))
    }

    pub fn parse_errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn text(&self) -> String {
        match self.tree.get() {
            Some(tree) => tree.text(tree.root()),
            None => self.syntax().to_string(),
        }
    }

    pub fn package_name(&self) -> String {
        if let Some(tree) = self.tree.get() {
            return tree.package_name(tree.root());
        }
        self.syntax()
            .children()
            .find(|n| n.kind() == SyntaxKind::PackageStatement)
            .and_then(|stmt| reference_child(&stmt))
            .map(|reference| dotted_name(&reference))
            .unwrap_or_default()
    }

    pub fn imports(&self) -> Vec<ImportSummary> {
        if let Some(tree) = self.tree.get() {
            return tree
                .imports(tree.root())
                .into_iter()
                .map(|import| ImportSummary {
                    name: tree.import_name(import),
                    is_static: tree.is_static_import(import),
                    on_demand: tree.is_on_demand(import),
                })
                .collect();
        }
        let Some(list) = self
            .syntax()
            .children()
            .find(|n| n.kind() == SyntaxKind::ImportList)
        else {
            return Vec::new();
        };
        list.children()
            .filter(|n| {
                matches!(
                    n.kind(),
                    SyntaxKind::ImportStatement | SyntaxKind::ImportStaticStatement
                )
            })
            .map(|import| ImportSummary {
                name: reference_child(&import)
                    .map(|reference| dotted_name(&reference))
                    .unwrap_or_default(),
                is_static: import.kind() == SyntaxKind::ImportStaticStatement,
                on_demand: has_token(&import, SyntaxKind::Star),
            })
            .collect()
    }

    /// Top-level classes with the names of their type parameters.
    pub fn classes(&self) -> Vec<ClassSummary> {
        if let Some(tree) = self.tree.get() {
            return tree
                .classes(tree.root())
                .into_iter()
                .map(|class| ClassSummary {
                    name: tree.name(class).map(|n| n.to_string()).unwrap_or_default(),
                    type_parameters: tree
                        .find_child_by_role(class, Role::TypeParameterList)
                        .map(|list| {
                            tree.children_of_kind(list, SyntaxKind::TypeParameter)
                                .filter_map(|param| tree.name(param).map(|n| n.to_string()))
                                .collect()
                        })
                        .unwrap_or_default(),
                })
                .collect();
        }
        self.syntax()
            .children()
            .filter(|n| n.kind() == SyntaxKind::Class)
            .map(|class| ClassSummary {
                name: identifier(&class).unwrap_or_default(),
                type_parameters: class
                    .children()
                    .find(|n| n.kind() == SyntaxKind::TypeParameterList)
                    .map(|list| {
                        list.children()
                            .filter(|n| n.kind() == SyntaxKind::TypeParameter)
                            .filter_map(|param| identifier(&param))
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect()
    }

    fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }
}

fn reference_child(node: &SyntaxNode) -> Option<SyntaxNode> {
    node.children()
        .find(|n| n.kind() == SyntaxKind::JavaCodeReference)
}

/// Identifiers of a code reference joined by dots, type arguments skipped.
fn dotted_name(reference: &SyntaxNode) -> String {
    let name = identifier(reference).unwrap_or_default();
    match reference_child(reference) {
        Some(qualifier) => format!("{}.{name}", dotted_name(&qualifier)),
        None => name,
    }
}

fn identifier(node: &SyntaxNode) -> Option<String> {
    node.children_with_tokens()
        .filter_map(|element| element.into_token())
        .find(|token| token.kind() == SyntaxKind::Identifier)
        .map(|token| token.text().to_string())
}

fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    node.children_with_tokens()
        .filter_map(|element| element.into_token())
        .any(|token| token.kind() == kind)
}
