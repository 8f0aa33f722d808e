//! Building detached elements from text.
//!
//! Every `create_*` function parses its text as a fragment, materializes the
//! result inside the target tree under a detached `DummyHolder`, and returns
//! the construct node. The node (or the run returned by
//! [`create_members_from_text`]) can then be handed to
//! [`SyntaxTree::insert`], [`SyntaxTree::add`] or [`SyntaxTree::replace`].

use psi_parse::{parse_fragment, FragmentKind};
use psi_syntax::{tables, SyntaxKind, TokenSet};

use crate::error::EditError;
use crate::{NodeId, SyntaxTree};

/// Parse `text` as `fragment` and import it into a fresh holder. Returns the
/// holder.
fn holder_from_text(
    tree: &mut SyntaxTree,
    text: &str,
    fragment: FragmentKind,
) -> Result<NodeId, EditError> {
    let parse = parse_fragment(text, fragment);
    if let Some(error) = parse.errors.first() {
        tracing::debug!(?fragment, text, error = %error.message, "invalid fragment");
        return Err(EditError::InvalidFragment {
            message: format!("{} in `{text}`", error.message),
        });
    }
    let mut holder = None;
    for id in tree.import_green(&parse.green) {
        if holder.is_none() && tree.kind(id) == SyntaxKind::DummyHolder {
            holder = Some(id);
        } else {
            tree.destroy(id);
        }
    }
    holder.ok_or_else(|| EditError::InvalidFragment {
        message: format!("no element in `{text}`"),
    })
}

/// The non-trivia children of the holder, all of which must be in `accepted`.
fn elements_from_text(
    tree: &mut SyntaxTree,
    text: &str,
    fragment: FragmentKind,
    accepted: TokenSet,
) -> Result<Vec<NodeId>, EditError> {
    let holder = holder_from_text(tree, text, fragment)?;
    let elements: Vec<NodeId> = tree
        .children(holder)
        .iter()
        .copied()
        .filter(|&c| !tree.is_trivia(c))
        .collect();
    if elements.is_empty() {
        return Err(EditError::InvalidFragment {
            message: format!("no element in `{text}`"),
        });
    }
    if let Some(&wrong) = elements.iter().find(|&&e| !accepted.contains(tree.kind(e))) {
        return Err(EditError::InvalidFragment {
            message: format!("unexpected {:?} in `{text}`", tree.kind(wrong)),
        });
    }
    Ok(elements)
}

fn element_from_text(
    tree: &mut SyntaxTree,
    text: &str,
    fragment: FragmentKind,
    accepted: TokenSet,
) -> Result<NodeId, EditError> {
    let elements = elements_from_text(tree, text, fragment, accepted)?;
    match elements.as_slice() {
        [single] => Ok(*single),
        _ => Err(EditError::InvalidFragment {
            message: format!("expected a single element in `{text}`"),
        }),
    }
}

pub fn create_expression_from_text(tree: &mut SyntaxTree, text: &str) -> Result<NodeId, EditError> {
    element_from_text(tree, text, FragmentKind::Expression, tables::EXPRESSIONS)
}

pub fn create_statement_from_text(tree: &mut SyntaxTree, text: &str) -> Result<NodeId, EditError> {
    element_from_text(tree, text, FragmentKind::Statement, tables::STATEMENTS)
}

pub fn create_code_block_from_text(tree: &mut SyntaxTree, text: &str) -> Result<NodeId, EditError> {
    element_from_text(
        tree,
        text,
        FragmentKind::CodeBlock,
        TokenSet::new([SyntaxKind::CodeBlock]),
    )
}

/// A single class member: field, method, constructor, initializer or
/// nested type.
pub fn create_member_from_text(tree: &mut SyntaxTree, text: &str) -> Result<NodeId, EditError> {
    element_from_text(tree, text, FragmentKind::Member, tables::CLASS_MEMBERS)
}

/// Several members, or a field group, as a sibling run `(first, last)`.
pub fn create_members_from_text(
    tree: &mut SyntaxTree,
    text: &str,
) -> Result<(NodeId, NodeId), EditError> {
    let holder = holder_from_text(tree, text, FragmentKind::Member)?;
    let children = tree.children(holder);
    match (children.first(), children.last()) {
        (Some(&first), Some(&last)) if tables::CLASS_MEMBERS.contains(tree.kind(first)) => {
            Ok((first, last))
        }
        _ => Err(EditError::InvalidFragment {
            message: format!("no member in `{text}`"),
        }),
    }
}

pub fn create_class_from_text(tree: &mut SyntaxTree, text: &str) -> Result<NodeId, EditError> {
    element_from_text(
        tree,
        text,
        FragmentKind::Member,
        TokenSet::new([SyntaxKind::Class]),
    )
}

pub fn create_enum_constant_from_text(
    tree: &mut SyntaxTree,
    text: &str,
) -> Result<NodeId, EditError> {
    element_from_text(
        tree,
        text,
        FragmentKind::EnumConstant,
        TokenSet::new([SyntaxKind::EnumConstant]),
    )
}

pub fn create_type_from_text(tree: &mut SyntaxTree, text: &str) -> Result<NodeId, EditError> {
    element_from_text(tree, text, FragmentKind::Type, TokenSet::new([SyntaxKind::Type]))
}

pub fn create_reference_from_text(tree: &mut SyntaxTree, text: &str) -> Result<NodeId, EditError> {
    element_from_text(
        tree,
        text,
        FragmentKind::Reference,
        TokenSet::new([SyntaxKind::JavaCodeReference]),
    )
}

pub fn create_annotation_from_text(
    tree: &mut SyntaxTree,
    text: &str,
) -> Result<NodeId, EditError> {
    element_from_text(
        tree,
        text,
        FragmentKind::Annotation,
        TokenSet::new([SyntaxKind::Annotation]),
    )
}

pub fn create_parameter_from_text(tree: &mut SyntaxTree, text: &str) -> Result<NodeId, EditError> {
    element_from_text(
        tree,
        text,
        FragmentKind::Parameter,
        TokenSet::new([SyntaxKind::Parameter]),
    )
}

pub fn create_type_parameter_from_text(
    tree: &mut SyntaxTree,
    text: &str,
) -> Result<NodeId, EditError> {
    element_from_text(
        tree,
        text,
        FragmentKind::TypeParameter,
        TokenSet::new([SyntaxKind::TypeParameter]),
    )
}

pub fn create_import_from_text(tree: &mut SyntaxTree, text: &str) -> Result<NodeId, EditError> {
    element_from_text(
        tree,
        text,
        FragmentKind::Import,
        TokenSet::new([SyntaxKind::ImportStatement, SyntaxKind::ImportStaticStatement]),
    )
}

/// A detached keyword or punctuation token.
pub fn create_token(tree: &mut SyntaxTree, kind: SyntaxKind) -> Result<NodeId, EditError> {
    let text = kind.fixed_text().ok_or_else(|| EditError::InvalidFragment {
        message: format!("{kind:?} has no fixed text"),
    })?;
    Ok(tree.alloc_leaf(kind, text))
}

/// A detached identifier token. Keywords and non-identifiers are rejected.
pub fn create_identifier(tree: &mut SyntaxTree, name: &str) -> Result<NodeId, EditError> {
    let tokens = psi_syntax::lex(name);
    let is_identifier = matches!(
        tokens.as_slice(),
        [token] if token.kind == SyntaxKind::Identifier
    );
    if !is_identifier {
        return Err(EditError::InvalidFragment {
            message: format!("`{name}` is not an identifier"),
        });
    }
    Ok(tree.alloc_leaf(SyntaxKind::Identifier, name))
}

/// A detached whitespace token.
pub fn create_whitespace(tree: &mut SyntaxTree, text: &str) -> Result<NodeId, EditError> {
    if text.is_empty() || !text.chars().all(char::is_whitespace) {
        return Err(EditError::InvalidFragment {
            message: format!("{text:?} is not whitespace"),
        });
    }
    Ok(tree.alloc_leaf(SyntaxKind::Whitespace, text))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::Role;

    #[test]
    fn created_elements_are_detached_and_insertable() {
        let mut tree = SyntaxTree::parse("class A {\n    void m() {\n    }\n}");
        let statement = create_statement_from_text(&mut tree, "return;").unwrap();
        assert_eq!(tree.kind(statement), SyntaxKind::ReturnStatement);
        assert!(!tree.is_attached(statement));

        let block = tree
            .descendants(tree.root())
            .find(|&n| tree.kind(n) == SyntaxKind::CodeBlock)
            .unwrap();
        tree.add(block, statement).unwrap();
        assert_eq!(tree.role_of(block, statement), Role::Statement);
        assert_eq!(
            tree.text(tree.root()),
            "class A {\n    void m() {\n        return;\n    }\n}"
        );
    }

    #[test]
    fn malformed_or_mismatched_text_is_rejected() {
        let mut tree = SyntaxTree::parse("");
        assert!(matches!(
            create_expression_from_text(&mut tree, "a +"),
            Err(EditError::InvalidFragment { .. })
        ));
        assert!(matches!(
            create_expression_from_text(&mut tree, "a b"),
            Err(EditError::InvalidFragment { .. })
        ));
        assert!(matches!(
            create_class_from_text(&mut tree, "int x;"),
            Err(EditError::InvalidFragment { .. })
        ));
        assert!(create_identifier(&mut tree, "class").is_err());
        assert!(create_identifier(&mut tree, "a.b").is_err());
        assert!(create_whitespace(&mut tree, " x").is_err());
    }

    #[test]
    fn field_groups_come_back_as_a_run() {
        let mut tree = SyntaxTree::parse("");
        let (first, last) = create_members_from_text(&mut tree, "int a, b;").unwrap();
        assert_ne!(first, last);
        assert_eq!(tree.kind(first), SyntaxKind::Field);
        assert_eq!(tree.kind(last), SyntaxKind::Field);
        assert_eq!(tree.name(last).as_deref(), Some("b"));
    }

    #[test]
    fn tokens_carry_their_fixed_text() {
        let mut tree = SyntaxTree::parse("");
        let comma = create_token(&mut tree, SyntaxKind::Comma).unwrap();
        assert_eq!(tree.text(comma), ",");
        assert!(create_token(&mut tree, SyntaxKind::Identifier).is_err());
        let name = create_identifier(&mut tree, "value").unwrap();
        assert_eq!(tree.leaf_text(name), "value");
    }
}
