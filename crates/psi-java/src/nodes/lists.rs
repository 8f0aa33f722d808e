//! Separator-delimited lists: parameters, arguments, type parameters and
//! arguments, `extends`/`implements`/`throws` and bound lists, annotation
//! parameters, array initializers and `try` resources.
//!
//! All of them share one algorithm. Brackets and the introducing keyword are
//! synthesized lazily when the first element arrives. A single inserted
//! element gets exactly one separator towards its nearest neighbour of the
//! same kind. A deleted element takes one adjacent separator with it,
//! preferring the following one. Optional brackets and keywords disappear
//! with the last element.

use psi_syntax::{tables, SyntaxKind, TokenSet};

use crate::behavior::{find_by_scanning, Behavior, DEFAULT};
use crate::edit;
use crate::error::EditError;
use crate::nodes::{single, trivia_role};
use crate::role::Role;
use crate::{NodeId, SyntaxTree};

pub(crate) const LIST: Behavior = Behavior {
    role_of,
    find_child_by_role: find_by_scanning,
    accepts,
    insert,
    delete,
    ..DEFAULT
};

const ANNOTATION_VALUES: TokenSet = tables::EXPRESSIONS.union(TokenSet::new([
    SyntaxKind::Annotation,
    SyntaxKind::AnnotationArrayInitializer,
]));

#[derive(Debug, Clone, Copy)]
pub(crate) struct ListSpec {
    pub(crate) elements: TokenSet,
    pub(crate) element_role: Role,
    pub(crate) brackets: Option<(SyntaxKind, SyntaxKind)>,
    /// Brackets disappear together with the last element.
    pub(crate) optional_brackets: bool,
    pub(crate) separator: SyntaxKind,
    pub(crate) keyword: Option<(SyntaxKind, Role)>,
}

pub(crate) fn list_spec(tree: &SyntaxTree, list: NodeId) -> ListSpec {
    use SyntaxKind as K;
    let parens = Some((K::LParen, K::RParen));
    let angles = Some((K::Less, K::Greater));
    let braces = Some((K::LBrace, K::RBrace));
    let base = ListSpec {
        elements: TokenSet::EMPTY,
        element_role: Role::None,
        brackets: None,
        optional_brackets: false,
        separator: K::Comma,
        keyword: None,
    };
    match tree.kind(list) {
        K::ParameterList => ListSpec {
            elements: single(K::Parameter),
            element_role: Role::Parameter,
            brackets: parens,
            ..base
        },
        K::ExpressionList => {
            let in_statement = tree
                .parent(list)
                .map_or(false, |p| tree.kind(p) == K::ExpressionListStatement);
            ListSpec {
                elements: tables::EXPRESSIONS,
                element_role: Role::ExpressionInList,
                brackets: if in_statement { None } else { parens },
                ..base
            }
        }
        K::TypeParameterList => ListSpec {
            elements: single(K::TypeParameter),
            element_role: Role::TypeParameter,
            brackets: angles,
            optional_brackets: true,
            ..base
        },
        K::ReferenceParameterList => ListSpec {
            elements: single(K::Type),
            element_role: Role::TypeArgument,
            brackets: angles,
            optional_brackets: true,
            ..base
        },
        K::ExtendsList => ListSpec {
            elements: single(K::JavaCodeReference),
            element_role: Role::ReferenceInList,
            keyword: Some((K::ExtendsKw, Role::ExtendsKeyword)),
            ..base
        },
        K::ImplementsList => ListSpec {
            elements: single(K::JavaCodeReference),
            element_role: Role::ReferenceInList,
            keyword: Some((K::ImplementsKw, Role::ImplementsKeyword)),
            ..base
        },
        K::ThrowsList => ListSpec {
            elements: single(K::JavaCodeReference),
            element_role: Role::ReferenceInList,
            keyword: Some((K::ThrowsKw, Role::ThrowsKeyword)),
            ..base
        },
        K::ExtendsBoundList => ListSpec {
            elements: single(K::JavaCodeReference),
            element_role: Role::ReferenceInList,
            separator: K::Amp,
            keyword: Some((K::ExtendsKw, Role::ExtendsKeyword)),
            ..base
        },
        K::AnnotationParameterList => ListSpec {
            elements: single(K::NameValuePair),
            element_role: Role::NameValuePair,
            brackets: parens,
            optional_brackets: true,
            ..base
        },
        K::AnnotationArrayInitializer => ListSpec {
            elements: ANNOTATION_VALUES,
            element_role: Role::AnnotationValue,
            brackets: braces,
            ..base
        },
        K::ArrayInitializerExpression => ListSpec {
            elements: tables::EXPRESSIONS,
            element_role: Role::ExpressionInList,
            brackets: braces,
            ..base
        },
        K::ResourceList => ListSpec {
            elements: single(K::ResourceVariable),
            element_role: Role::ResourceVariable,
            brackets: parens,
            separator: K::Semicolon,
            ..base
        },
        _ => base,
    }
}

fn separator_role(separator: SyntaxKind) -> Role {
    match separator {
        SyntaxKind::Amp => Role::AmpersandInBoundsList,
        SyntaxKind::Semicolon => Role::Semicolon,
        _ => Role::Comma,
    }
}

fn bracket_roles(open: SyntaxKind) -> (Role, Role) {
    match open {
        SyntaxKind::Less => (Role::LAngle, Role::RAngle),
        SyntaxKind::LBrace => (Role::LBrace, Role::RBrace),
        _ => (Role::LParenth, Role::RParenth),
    }
}

fn role_of(tree: &SyntaxTree, list: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, list, child) {
        return role;
    }
    let spec = list_spec(tree, list);
    let kind = tree.kind(child);
    if spec.elements.contains(kind) {
        return spec.element_role;
    }
    if kind == spec.separator {
        return separator_role(kind);
    }
    if let Some((open, close)) = spec.brackets {
        let (open_role, close_role) = bracket_roles(open);
        if kind == open {
            return open_role;
        }
        if kind == close {
            return close_role;
        }
    }
    match spec.keyword {
        Some((keyword, role)) if keyword == kind => role,
        _ => Role::None,
    }
}

fn accepts(tree: &SyntaxTree, list: NodeId, kind: SyntaxKind) -> bool {
    let spec = list_spec(tree, list);
    spec.elements.contains(kind) || kind == spec.separator
}

pub(crate) fn elements(tree: &SyntaxTree, list: NodeId) -> Vec<NodeId> {
    let spec = list_spec(tree, list);
    tree.children(list)
        .iter()
        .copied()
        .filter(|&c| spec.elements.contains(tree.kind(c)))
        .collect()
}

fn insert(
    tree: &mut SyntaxTree,
    list: NodeId,
    run: &[NodeId],
    anchor: Option<NodeId>,
    before: bool,
) -> Result<NodeId, EditError> {
    let spec = list_spec(tree, list);
    if let Some((keyword, _)) = spec.keyword {
        if tree.child_of_kind(list, keyword).is_none() {
            edit::insert_token(tree, list, 0, keyword);
        }
    }
    if let Some((open, close)) = spec.brackets {
        if tree.child_of_kind(list, open).is_none() {
            let at = match anchor {
                Some(anchor) => edit::anchor_index(tree, list, Some(anchor), before),
                None => tree.children(list).len(),
            };
            edit::insert_tokens(tree, list, at, &[open, close]);
        }
    }

    let index = match (anchor, spec.brackets) {
        (None, Some((open, close))) => edit::bracketed_index(tree, list, None, before, open, close),
        (None, None) if !before => spec
            .keyword
            .and_then(|(keyword, _)| tree.child_of_kind(list, keyword))
            .and_then(|k| tree.index_in_parent(k))
            .map_or(0, |idx| idx + 1),
        _ => edit::anchor_index(tree, list, anchor, before),
    };
    edit::splice(tree, list, index, run);

    if let [element] = run {
        if spec.elements.contains(tree.kind(*element)) {
            add_separator(tree, list, *element, spec);
        }
    }
    Ok(run[0])
}

/// Give a freshly inserted `element` one separator towards its nearest
/// same-kind neighbour: forward first, then backward. A separator met before
/// any neighbour means the element is already separated on that side.
fn add_separator(tree: &mut SyntaxTree, list: NodeId, element: NodeId, spec: ListSpec) {
    let mut current = tree.next_sibling(element);
    while let Some(node) = current {
        let kind = tree.kind(node);
        if tree.is_skippable(node) {
            current = tree.next_sibling(node);
            continue;
        }
        if kind == spec.separator {
            break;
        }
        if spec.elements.contains(kind) {
            let at = tree.index_in_parent(element).map_or(0, |idx| idx + 1);
            synthesize_separator(tree, list, at, spec.separator);
            return;
        }
        break;
    }

    let mut current = tree.prev_sibling(element);
    while let Some(node) = current {
        let kind = tree.kind(node);
        if tree.is_skippable(node) {
            current = tree.prev_sibling(node);
            continue;
        }
        if kind == spec.separator {
            return;
        }
        if spec.elements.contains(kind) {
            let at = tree.index_in_parent(node).map_or(0, |idx| idx + 1);
            synthesize_separator(tree, list, at, spec.separator);
        }
        return;
    }
}

fn synthesize_separator(tree: &mut SyntaxTree, list: NodeId, at: usize, separator: SyntaxKind) {
    let sep = edit::insert_token(tree, list, at, separator);
    let at = tree.index_in_parent(sep).unwrap_or(at);
    if separator == SyntaxKind::Amp {
        let before_is_space = tree
            .prev_sibling(sep)
            .map_or(true, |p| edit::is_whitespace(tree, p));
        if !before_is_space {
            edit::insert_whitespace(tree, list, at, " ");
        }
    }
    let sep_at = tree.index_in_parent(sep).unwrap_or(at);
    let follows_space = tree
        .next_sibling(sep)
        .map_or(true, |n| edit::is_whitespace(tree, n) || tables::CLOSING_PUNCTUATION.contains(tree.kind(n)));
    if !follows_space {
        edit::insert_whitespace(tree, list, sep_at + 1, " ");
    }
}

/// The separator an element leaves behind: the next one if the element is
/// followed by a separator, otherwise the previous one.
pub(crate) fn adjacent_separator(
    tree: &SyntaxTree,
    element: NodeId,
    separator: SyntaxKind,
) -> Option<NodeId> {
    let mut current = tree.next_sibling(element);
    while let Some(node) = current {
        if tree.is_skippable(node) {
            current = tree.next_sibling(node);
            continue;
        }
        if tree.kind(node) == separator {
            return Some(node);
        }
        break;
    }
    let mut current = tree.prev_sibling(element);
    while let Some(node) = current {
        if tree.is_skippable(node) {
            current = tree.prev_sibling(node);
            continue;
        }
        if tree.kind(node) == separator {
            return Some(node);
        }
        break;
    }
    None
}

fn delete(tree: &mut SyntaxTree, list: NodeId, child: NodeId) -> Result<(), EditError> {
    let spec = list_spec(tree, list);
    let kind = tree.kind(child);

    if spec.elements.contains(kind) {
        let separator = adjacent_separator(tree, child, spec.separator);
        edit::remove(tree, child);
        if let Some(separator) = separator {
            edit::remove(tree, separator);
        }
        if elements(tree, list).is_empty() {
            drop_empty_decorations(tree, list, spec);
        }
        return Ok(());
    }

    let is_bracket = spec
        .brackets
        .map_or(false, |(open, close)| kind == open || kind == close);
    let is_keyword = spec.keyword.map_or(false, |(keyword, _)| keyword == kind);
    if (is_bracket || is_keyword) && !elements(tree, list).is_empty() {
        return Err(EditError::CannotDeleteRequired { kind });
    }
    edit::remove(tree, child);
    Ok(())
}

fn drop_empty_decorations(tree: &mut SyntaxTree, list: NodeId, spec: ListSpec) {
    let mut doomed: Vec<NodeId> = tree
        .children(list)
        .iter()
        .copied()
        .filter(|&c| tree.kind(c) == spec.separator)
        .collect();
    if let Some((keyword, _)) = spec.keyword {
        doomed.extend(tree.child_of_kind(list, keyword));
    }
    if spec.optional_brackets {
        if let Some((open, close)) = spec.brackets {
            doomed.extend(tree.child_of_kind(list, open));
            doomed.extend(tree.last_child_of_kind(list, close));
        }
    }
    if !doomed.is_empty() {
        tracing::debug!(list = ?tree.kind(list), removed = doomed.len(), "dropping list decorations");
    }
    for node in doomed {
        edit::remove(tree, node);
    }
    let leftover: Vec<NodeId> = tree
        .children(list)
        .iter()
        .copied()
        .filter(|&c| edit::is_whitespace(tree, c))
        .collect();
    if tree.children(list).len() == leftover.len() {
        for ws in leftover {
            edit::remove(tree, ws);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::factory;

    fn method_list(tree: &SyntaxTree, kind: SyntaxKind) -> NodeId {
        tree.descendants(tree.root())
            .find(|&n| tree.kind(n) == kind)
            .unwrap()
    }

    #[test]
    fn appended_parameter_gets_one_comma() {
        let mut tree = SyntaxTree::parse("class A { void m(int a) {} }");
        let list = method_list(&tree, SyntaxKind::ParameterList);
        let param = factory::create_parameter_from_text(&mut tree, "String b").unwrap();
        tree.add(list, param).unwrap();
        assert_eq!(tree.text(list), "(int a, String b)");
    }

    #[test]
    fn prepended_argument_is_separated_forward() {
        let mut tree = SyntaxTree::parse("class A { void m() { f(a); } }");
        let list = method_list(&tree, SyntaxKind::ExpressionList);
        let arg = factory::create_expression_from_text(&mut tree, "b").unwrap();
        tree.insert(list, arg, arg, None, false).unwrap();
        assert_eq!(tree.text(list), "(b, a)");
    }

    #[test]
    fn deleting_middle_parameter_keeps_one_comma() {
        let mut tree = SyntaxTree::parse("class A { void m(int a, int b, int c) {} }");
        let list = method_list(&tree, SyntaxKind::ParameterList);
        let b = elements(&tree, list)[1];
        tree.delete(b).unwrap();
        assert_eq!(tree.text(list), "(int a, int c)");
        let last = elements(&tree, list)[1];
        tree.delete(last).unwrap();
        assert_eq!(tree.text(list), "(int a)");
    }

    #[test]
    fn type_parameter_brackets_come_and_go() {
        let mut tree = SyntaxTree::parse("class A {}");
        let list = method_list(&tree, SyntaxKind::TypeParameterList);
        let param = factory::create_type_parameter_from_text(&mut tree, "T").unwrap();
        tree.add(list, param).unwrap();
        assert_eq!(tree.text(tree.root()), "class A<T> {}");
        tree.delete(param).unwrap();
        assert_eq!(tree.text(tree.root()), "class A {}");
    }

    #[test]
    fn throws_keyword_is_synthesized_and_dropped() {
        let mut tree = SyntaxTree::parse("class A { void m() {} }");
        let list = method_list(&tree, SyntaxKind::ThrowsList);
        let reference = factory::create_reference_from_text(&mut tree, "IOException").unwrap();
        tree.add(list, reference).unwrap();
        assert_eq!(tree.text(tree.root()), "class A { void m() throws IOException {} }");
        tree.delete(reference).unwrap();
        assert_eq!(tree.text(tree.root()), "class A { void m() {} }");
    }

    #[test]
    fn bounds_are_joined_with_ampersand() {
        let mut tree = SyntaxTree::parse("class A<T extends Number> {}");
        let list = method_list(&tree, SyntaxKind::ExtendsBoundList);
        let reference = factory::create_reference_from_text(&mut tree, "Runnable").unwrap();
        tree.add(list, reference).unwrap();
        assert_eq!(tree.text(list), "extends Number & Runnable");
    }
}
