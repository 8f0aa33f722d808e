//! The mutation choke point.
//!
//! Every structural edit goes through [`SyntaxTree::insert`],
//! [`SyntaxTree::delete_child`] or [`SyntaxTree::replace`]. Each call validates
//! its arguments, hands the raw splice to the parent kind's behaviour, lets the
//! behaviour repair companion tokens, and returns only once the tree is
//! consistent again. The helpers in this module are the building blocks those
//! behaviours use: positional splices that keep tokens from gluing together,
//! line-oriented member insertion, and whitespace cleanup after removals.

use psi_syntax::{tables, SyntaxKind, TextSize};
use serde::{Deserialize, Serialize};

use crate::behavior::behavior;
use crate::error::EditError;
use crate::{NodeId, SyntaxTree};

/// Whitespace policy applied to synthesized layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditSettings {
    /// One level of indentation.
    pub indent: String,
}

impl Default for EditSettings {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
        }
    }
}

impl SyntaxTree {
    /// Insert the sibling run `first..=last` into `parent`.
    ///
    /// The run must be detached: either a single parentless node, or children
    /// of a detached `DummyHolder` (what the element factory produces). With
    /// an `anchor` the run goes before or after it; without one the parent
    /// picks a default position (`before == true` appends, usually in front
    /// of a closing bracket; `before == false` prepends). Returns the first
    /// inserted node.
    pub fn insert(
        &mut self,
        parent: NodeId,
        first: NodeId,
        last: NodeId,
        anchor: Option<NodeId>,
        before: bool,
    ) -> Result<NodeId, EditError> {
        self.check_live(parent)?;
        if self.is_leaf(parent) {
            return Err(EditError::NotAccepted {
                parent: self.kind(parent),
                child: self.kind(first),
            });
        }
        if let Some(anchor) = anchor {
            if self.parent(anchor) != Some(parent) {
                return Err(EditError::AnchorNotAChild { parent, anchor });
            }
        }
        let run = self.collect_run(first, last)?;
        if let Some(&node) = run.iter().find(|&&n| self.is_ancestor_of(n, parent)) {
            return Err(EditError::AlreadyAttached(node));
        }
        self.check_accepts(parent, &run)?;
        let behavior = behavior(self.kind(parent));
        for &node in &run {
            self.raw_remove(node);
        }
        tracing::trace!(
            parent = ?self.kind(parent),
            children = ?run.iter().map(|&n| self.kind(n)).collect::<Vec<_>>(),
            ?anchor,
            before,
            "insert"
        );
        (behavior.insert)(self, parent, &run, anchor, before)
    }

    /// Append `child` at the parent's default position.
    pub fn add(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, EditError> {
        self.insert(parent, child, child, None, true)
    }

    pub fn add_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        anchor: NodeId,
    ) -> Result<NodeId, EditError> {
        self.insert(parent, child, child, Some(anchor), true)
    }

    pub fn add_after(
        &mut self,
        parent: NodeId,
        child: NodeId,
        anchor: NodeId,
    ) -> Result<NodeId, EditError> {
        self.insert(parent, child, child, Some(anchor), false)
    }

    /// Remove `child` from `parent`, repairing companion tokens.
    pub fn delete_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), EditError> {
        self.check_live(parent)?;
        self.check_live(child)?;
        if self.parent(child) != Some(parent) {
            return Err(EditError::NotAChild { parent, child });
        }
        tracing::trace!(parent = ?self.kind(parent), child = ?self.kind(child), "delete");
        (behavior(self.kind(parent)).delete)(self, parent, child)
    }

    /// Remove `child` from whatever parent it has.
    pub fn delete(&mut self, child: NodeId) -> Result<(), EditError> {
        self.check_live(child)?;
        let parent = self.parent(child).ok_or(EditError::Detached(child))?;
        self.delete_child(parent, child)
    }

    /// Put the detached node `new` where `old` is. No companion repair is
    /// needed: the slot keeps its role.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> Result<NodeId, EditError> {
        self.check_live(old)?;
        let parent = self.parent(old).ok_or(EditError::Detached(old))?;
        let run = self.collect_run(new, new)?;
        if self.is_ancestor_of(new, parent) {
            return Err(EditError::AlreadyAttached(new));
        }
        self.check_accepts(parent, &run)?;
        let index = self.index_in_parent(old).unwrap_or(0);
        for &node in &run {
            self.raw_remove(node);
        }
        tracing::trace!(parent = ?self.kind(parent), old = ?self.kind(old), new = ?self.kind(new), "replace");
        self.raw_remove(old);
        self.destroy(old);
        splice(self, parent, index, &run);
        Ok(new)
    }

    fn check_accepts(&self, parent: NodeId, run: &[NodeId]) -> Result<(), EditError> {
        let accepts = behavior(self.kind(parent)).accepts;
        match run
            .iter()
            .map(|&n| self.kind(n))
            .find(|&kind| !kind.is_trivia() && !accepts(self, parent, kind))
        {
            Some(child) => Err(EditError::NotAccepted {
                parent: self.kind(parent),
                child,
            }),
            None => Ok(()),
        }
    }

    fn check_live(&self, id: NodeId) -> Result<(), EditError> {
        if self.is_alive(id) {
            Ok(())
        } else {
            Err(EditError::Detached(id))
        }
    }

    fn collect_run(&self, first: NodeId, last: NodeId) -> Result<Vec<NodeId>, EditError> {
        self.check_live(first)?;
        self.check_live(last)?;
        match self.parent(first) {
            None => {
                if first == self.root() {
                    return Err(EditError::AlreadyAttached(first));
                }
                if first != last {
                    return Err(EditError::EmptyRange);
                }
                Ok(vec![first])
            }
            Some(holder) => {
                let detached_holder = self.kind(holder) == SyntaxKind::DummyHolder
                    && self.parent(holder).is_none()
                    && holder != self.root();
                if !detached_holder {
                    return Err(EditError::AlreadyAttached(first));
                }
                if self.parent(last) != Some(holder) {
                    return Err(EditError::EmptyRange);
                }
                let (start, end) = match (self.index_in_parent(first), self.index_in_parent(last)) {
                    (Some(start), Some(end)) if start <= end => (start, end),
                    _ => return Err(EditError::EmptyRange),
                };
                Ok(self.children(holder)[start..=end].to_vec())
            }
        }
    }
}

/// Position an insertion lands at for `anchor`/`before`, with no brackets to
/// respect.
pub(crate) fn anchor_index(
    tree: &SyntaxTree,
    parent: NodeId,
    anchor: Option<NodeId>,
    before: bool,
) -> usize {
    match anchor {
        Some(anchor) => match tree.index_in_parent(anchor) {
            Some(idx) if before => idx,
            Some(idx) => idx + 1,
            None => tree.children(parent).len(),
        },
        None if before => tree.children(parent).len(),
        None => 0,
    }
}

/// Position before `anchor`, after it, or relative to a bracket pair when
/// there is no anchor.
pub(crate) fn bracketed_index(
    tree: &SyntaxTree,
    parent: NodeId,
    anchor: Option<NodeId>,
    before: bool,
    open: SyntaxKind,
    close: SyntaxKind,
) -> usize {
    if anchor.is_some() {
        return anchor_index(tree, parent, anchor, before);
    }
    if before {
        match tree.last_child_of_kind(parent, close) {
            Some(close) => tree.index_in_parent(close).unwrap_or(0),
            None => tree.children(parent).len(),
        }
    } else {
        match tree.child_of_kind(parent, open) {
            Some(open) => tree.index_in_parent(open).map_or(0, |idx| idx + 1),
            None => 0,
        }
    }
}

/// Raw insertion followed by token separation at both edges of the run.
pub(crate) fn splice(tree: &mut SyntaxTree, parent: NodeId, index: usize, run: &[NodeId]) {
    let index = index.min(tree.children(parent).len());
    tree.raw_insert(parent, index, run);
    if let (Some(&first), Some(&last)) = (run.first(), run.last()) {
        separate(tree, first, last);
    }
}

/// Detach `child` and destroy it, then tidy the whitespace around the gap.
pub(crate) fn remove(tree: &mut SyntaxTree, child: NodeId) {
    if let Some((parent, index)) = detach(tree, child) {
        tree.destroy(child);
        tidy(tree, parent, index);
    }
}

/// Detach `child` for reuse elsewhere. The caller tidies.
pub(crate) fn detach(tree: &mut SyntaxTree, child: NodeId) -> Option<(NodeId, usize)> {
    tracing::trace!(kind = ?tree.kind(child), "detach");
    tree.raw_remove(child)
}

/// Synthesize a fixed-text token and splice it in.
pub(crate) fn insert_token(
    tree: &mut SyntaxTree,
    parent: NodeId,
    index: usize,
    kind: SyntaxKind,
) -> NodeId {
    insert_tokens(tree, parent, index, &[kind])[0]
}

/// Synthesize adjacent fixed-text tokens as one run.
pub(crate) fn insert_tokens(
    tree: &mut SyntaxTree,
    parent: NodeId,
    index: usize,
    kinds: &[SyntaxKind],
) -> Vec<NodeId> {
    let leaves: Vec<NodeId> = kinds
        .iter()
        .map(|&kind| tree.alloc_leaf(kind, kind.fixed_text().unwrap_or_default()))
        .collect();
    tracing::debug!(parent = ?tree.kind(parent), ?kinds, "synthesized tokens");
    splice(tree, parent, index, &leaves);
    leaves
}

pub(crate) fn insert_whitespace(
    tree: &mut SyntaxTree,
    parent: NodeId,
    index: usize,
    text: &str,
) -> NodeId {
    let leaf = tree.alloc_leaf(SyntaxKind::Whitespace, text);
    let index = index.min(tree.children(parent).len());
    tree.raw_insert(parent, index, &[leaf]);
    leaf
}

pub(crate) fn is_whitespace(tree: &SyntaxTree, id: NodeId) -> bool {
    tree.kind(id) == SyntaxKind::Whitespace
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '"' || c == '\''
}

/// Operator characters that lex into a different token when adjacent.
fn glues(l: char, r: char) -> bool {
    (r == '=' && "+-*/%&|^!=<>".contains(l))
        || (l == r && "+-&|<=".contains(l))
        || (l == '/' && (r == '/' || r == '*'))
}

/// Whether `left` immediately followed by `right` would lex differently or
/// read badly without a space between them.
fn needs_space(tree: &SyntaxTree, left: NodeId, right: NodeId) -> bool {
    use SyntaxKind as K;
    let (lk, rk) = (tree.kind(left), tree.kind(right));
    if lk == K::Whitespace || rk == K::Whitespace {
        return false;
    }
    if lk == K::EndOfLineComment {
        return true;
    }
    let (Some(l), Some(r)) = (tree.leaf_text(left).chars().last(), tree.leaf_text(right).chars().next())
    else {
        return false;
    };
    if (is_word_char(l) && is_word_char(r)) || glues(l, r) {
        return true;
    }
    if lk.is_comment() || rk.is_comment() {
        return false;
    }
    if matches!(rk, K::LBrace | K::At) && (is_word_char(l) || matches!(lk, K::RParen | K::RBracket)) {
        return true;
    }
    matches!(
        lk,
        K::RParen | K::RBracket | K::Greater | K::Comma | K::RBrace | K::Semicolon
    ) && is_word_char(r)
}

/// Insert a space between the edges of `first..=last` and their neighbours
/// where the tokens would otherwise run together.
pub(crate) fn separate(tree: &mut SyntaxTree, first: NodeId, last: NodeId) {
    if let (Some(prev), Some(head)) = (tree.prev_token(first), tree.first_token(first)) {
        if needs_space(tree, prev, head) {
            space_between(tree, prev, head);
        }
    }
    if let (Some(tail), Some(next)) = (tree.last_token(last), tree.next_token(last)) {
        if needs_space(tree, tail, next) {
            space_between(tree, tail, next);
        }
    }
}

/// Insert `" "` between two adjacent tokens, at the level of their lowest
/// common ancestor so that no composite gains edge whitespace.
fn space_between(tree: &mut SyntaxTree, left: NodeId, right: NodeId) {
    let left_path: Vec<NodeId> = tree.ancestors(left).collect();
    let Some(lca) = tree.ancestors(right).skip(1).find(|n| left_path.contains(n)) else {
        return;
    };
    let Some(&left_child) = left_path.iter().find(|&&n| tree.parent(n) == Some(lca)) else {
        return;
    };
    let index = tree.index_in_parent(left_child).map_or(0, |idx| idx + 1);
    insert_whitespace(tree, lca, index, " ");
}

fn has_text(tree: &SyntaxTree, id: NodeId) -> bool {
    tree.text_len(id) > TextSize::from(0)
}

/// Nearest sibling with text before position `index`.
fn visible_before(tree: &SyntaxTree, parent: NodeId, index: usize) -> Option<NodeId> {
    let children = tree.children(parent);
    children[..index.min(children.len())]
        .iter()
        .rev()
        .copied()
        .find(|&c| has_text(tree, c))
}

/// Nearest sibling with text at or after position `index`.
fn visible_from(tree: &SyntaxTree, parent: NodeId, index: usize) -> Option<NodeId> {
    let children = tree.children(parent);
    children[index.min(children.len())..]
        .iter()
        .copied()
        .find(|&c| has_text(tree, c))
}

fn drop_node(tree: &mut SyntaxTree, id: NodeId) {
    if tree.raw_remove(id).is_some() {
        tree.destroy(id);
    }
}

/// Whitespace cleanup around the gap left at `parent[index]`.
pub(crate) fn tidy(tree: &mut SyntaxTree, parent: NodeId, mut index: usize) {
    let before = visible_before(tree, parent, index);
    let after = visible_from(tree, parent, index);

    match (before, after) {
        (Some(b), Some(a)) if is_whitespace(tree, b) && is_whitespace(tree, a) => {
            if tree.leaf_text(a).contains('\n') {
                drop_node(tree, b);
                index -= 1;
            } else {
                drop_node(tree, a);
            }
        }
        (Some(b), Some(a)) if !is_whitespace(tree, b) && !is_whitespace(tree, a) => {
            if let (Some(tail), Some(head)) = (tree.last_token(b), tree.first_token(a)) {
                if needs_space(tree, tail, head) {
                    let at = tree.index_in_parent(b).map_or(index, |idx| idx + 1);
                    insert_whitespace(tree, parent, at, " ");
                }
            }
        }
        _ => {}
    }

    let before = visible_before(tree, parent, index);
    let after = visible_from(tree, parent, index);
    let nested = tree.parent(parent).is_some();
    match (before, after) {
        (None, Some(a)) if nested && is_whitespace(tree, a) => drop_node(tree, a),
        (Some(b), None) if nested && is_whitespace(tree, b) => drop_node(tree, b),
        (Some(b), Some(a)) if is_whitespace(tree, b) && !tree.leaf_text(b).contains('\n') => {
            if tables::CLOSING_PUNCTUATION.contains(tree.kind(a)) {
                drop_node(tree, b);
            }
        }
        (Some(b), Some(a)) if is_whitespace(tree, a) && !tree.leaf_text(a).contains('\n') => {
            if tables::OPENING_PUNCTUATION.contains(tree.kind(b)) {
                drop_node(tree, a);
            }
        }
        _ => {}
    }

    if !has_text(tree, parent) {
        if let (Some(grand), Some(idx)) = (tree.parent(parent), tree.index_in_parent(parent)) {
            tidy(tree, grand, idx);
        }
    }
}

/// Whether a line-oriented container puts each element on its own line.
fn is_multiline(tree: &SyntaxTree, container: NodeId) -> bool {
    if matches!(tree.kind(container), SyntaxKind::JavaFile | SyntaxKind::ImportList) {
        return true;
    }
    let children = tree.children(container);
    let start = tree
        .child_of_kind(container, SyntaxKind::LBrace)
        .and_then(|b| tree.index_in_parent(b))
        .map_or(0, |idx| idx + 1);
    let inner = &children[start.min(children.len())..];
    let has_elements = inner
        .iter()
        .any(|&c| !tree.is_trivia(c) && tree.kind(c) != SyntaxKind::RBrace);
    !has_elements || inner.iter().any(|&c| tree.text(c).contains('\n'))
}

/// Leading whitespace of the line `node` starts on.
pub(crate) fn line_indent(tree: &SyntaxTree, node: NodeId) -> String {
    let text = tree.text(tree.root_of(node));
    let offset = usize::from(tree.start_offset(node)).min(text.len());
    let line_start = text[..offset].rfind('\n').map_or(0, |idx| idx + 1);
    text[line_start..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}

fn indent_after_newline(text: &str) -> Option<&str> {
    text.rfind('\n').map(|idx| &text[idx + 1..])
}

/// Indentation in front of the container's closing brace.
fn closing_indent(tree: &SyntaxTree, container: NodeId) -> String {
    if let Some(close) = tree.last_child_of_kind(container, SyntaxKind::RBrace) {
        if let Some(prev) = tree.prev_sibling(close) {
            if is_whitespace(tree, prev) {
                if let Some(indent) = indent_after_newline(tree.leaf_text(prev)) {
                    return indent.to_string();
                }
            }
        }
    }
    line_indent(tree, container)
}

/// Indentation used by the container's existing elements, or one level
/// deeper than its closing brace.
fn member_indent(tree: &SyntaxTree, container: NodeId) -> String {
    if matches!(tree.kind(container), SyntaxKind::JavaFile | SyntaxKind::ImportList) {
        return String::new();
    }
    let children = tree.children(container);
    let start = tree
        .child_of_kind(container, SyntaxKind::LBrace)
        .and_then(|b| tree.index_in_parent(b))
        .map_or(0, |idx| idx + 1);
    for &child in &children[start.min(children.len())..] {
        if tree.is_trivia(child) || tree.kind(child) == SyntaxKind::RBrace {
            continue;
        }
        if let Some(prev) = tree.prev_sibling(child) {
            if is_whitespace(tree, prev) {
                if let Some(indent) = indent_after_newline(tree.leaf_text(prev)) {
                    return indent.to_string();
                }
            }
        }
    }
    format!("{}{}", closing_indent(tree, container), tree.settings().indent)
}

/// Insert a run of members or statements into a line-oriented container
/// (code block, class body, import list, file) at `index`, giving it a line
/// of its own when the container is laid out over several lines.
pub(crate) fn insert_line(tree: &mut SyntaxTree, container: NodeId, index: usize, run: &[NodeId]) {
    let (Some(&first), Some(&last)) = (run.first(), run.last()) else {
        return;
    };
    let multiline = is_multiline(tree, container);
    let indent = member_indent(tree, container);
    let closing = closing_indent(tree, container);

    let mut index = index.min(tree.children(container).len());
    if index > 0 && index < tree.children(container).len() {
        let prev = tree.children(container)[index - 1];
        if is_whitespace(tree, prev) {
            index -= 1;
        }
    }
    tree.raw_insert(container, index, run);

    let line = |closing_next: bool| -> String {
        if multiline {
            format!("\n{}", if closing_next { &closing } else { &indent })
        } else {
            " ".to_string()
        }
    };

    match tree.prev_sibling(first) {
        Some(prev) if is_whitespace(tree, prev) => {
            if multiline && !tree.leaf_text(prev).contains('\n') {
                let text = line(false);
                tree.raw_set_leaf_text(prev, &text);
            }
        }
        Some(_) => {
            let text = line(false);
            insert_whitespace(tree, container, index, &text);
        }
        None => {}
    }

    match tree.next_sibling(last) {
        Some(next) if is_whitespace(tree, next) => {
            if multiline && !tree.leaf_text(next).contains('\n') {
                let closing_next = tree
                    .next_sibling(next)
                    .map_or(true, |n| tree.kind(n) == SyntaxKind::RBrace);
                let text = line(closing_next);
                tree.raw_set_leaf_text(next, &text);
            }
        }
        Some(next) => {
            let text = line(tree.kind(next) == SyntaxKind::RBrace);
            let at = tree.index_in_parent(last).map_or(0, |idx| idx + 1);
            insert_whitespace(tree, container, at, &text);
        }
        None => {}
    }
    separate(tree, first, last);
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn class_of(tree: &SyntaxTree) -> NodeId {
        tree.child_of_kind(tree.root(), SyntaxKind::Class).unwrap()
    }

    #[test]
    fn separated_tokens_get_a_space() {
        let mut tree = SyntaxTree::parse("class A { int x; }");
        let class = class_of(&tree);
        let list = tree.child_of_kind(class, SyntaxKind::ModifierList).unwrap();
        let public = tree.alloc_leaf(SyntaxKind::PublicKw, "public");
        splice(&mut tree, list, 0, &[public]);
        assert_eq!(tree.text(tree.root()), "public class A { int x; }");
    }

    #[test]
    fn removal_collapses_whitespace() {
        let mut tree = SyntaxTree::parse("class A {\n    int x;\n    int y;\n}");
        let class = class_of(&tree);
        let field = tree.child_of_kind(class, SyntaxKind::Field).unwrap();
        remove(&mut tree, field);
        assert_eq!(tree.text(tree.root()), "class A {\n    int y;\n}");
    }

    #[test]
    fn line_insertion_follows_existing_indentation() {
        let mut tree = SyntaxTree::parse("class A {\n  void m() {\n    a();\n  }\n}");
        let block = tree
            .descendants(tree.root())
            .find(|&n| tree.kind(n) == SyntaxKind::CodeBlock)
            .unwrap();
        let stmt = tree.children(block)[2];
        let copy = tree.copy_subtree(stmt);
        let close = tree.last_child_of_kind(block, SyntaxKind::RBrace).unwrap();
        let index = tree.index_in_parent(close).unwrap();
        insert_line(&mut tree, block, index, &[copy]);
        assert_eq!(
            tree.text(tree.root()),
            "class A {\n  void m() {\n    a();\n    a();\n  }\n}"
        );
    }

    #[test]
    fn empty_body_opens_up() {
        let mut tree = SyntaxTree::parse("class A {}");
        let class = class_of(&tree);
        let semi = tree.alloc_leaf(SyntaxKind::Semicolon, ";");
        let close = tree.last_child_of_kind(class, SyntaxKind::RBrace).unwrap();
        let index = tree.index_in_parent(close).unwrap();
        insert_line(&mut tree, class, index, &[semi]);
        assert_eq!(tree.text(tree.root()), "class A {\n    ;\n}");
    }
}
