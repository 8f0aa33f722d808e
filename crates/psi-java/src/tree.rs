//! Arena-backed mutable syntax tree.
//!
//! All nodes live in one `Vec` owned by the [`SyntaxTree`] and are addressed
//! by [`NodeId`]. A node stores its parent handle, its ordered children and
//! its position among its siblings, so every navigation step is O(1).
//! Destroyed slots are never reused: a stale id keeps pointing at a dead node
//! instead of silently aliasing a new one.

use std::cell::{Cell, OnceCell};
use std::fmt;

use psi_parse::{parse_java, ParseError};
use psi_syntax::{tables, SyntaxKind, TextRange, TextSize};
use rowan::{GreenNodeData, NodeOrToken};
use serde::Serialize;
use smol_str::SmolStr;

use crate::edit::EditSettings;
use crate::events::{TreeEvent, TreeListener};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Per-node memoized data, reset by every edit below the node.
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeCache {
    text_len: Cell<Option<u32>>,
    pub(crate) name: OnceCell<Option<SmolStr>>,
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: SyntaxKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    index_in_parent: u32,
    text: SmolStr,
    alive: bool,
    cache: NodeCache,
}

pub struct SyntaxTree {
    nodes: Vec<NodeData>,
    root: NodeId,
    settings: EditSettings,
    listeners: Vec<Box<dyn TreeListener>>,
    parse_errors: Vec<ParseError>,
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("nodes", &self.nodes.len())
            .field("root", &self.root)
            .field("parse_errors", &self.parse_errors)
            .finish()
    }
}

impl SyntaxTree {
    /// Parse a compilation unit into a fresh tree rooted at a `JavaFile`.
    pub fn parse(text: &str) -> SyntaxTree {
        let parse = parse_java(text);
        SyntaxTree::from_green(&parse.green, parse.errors)
    }

    pub fn from_green(green: &GreenNodeData, parse_errors: Vec<ParseError>) -> SyntaxTree {
        let mut tree = SyntaxTree {
            nodes: Vec::new(),
            root: NodeId(0),
            settings: EditSettings::default(),
            listeners: Vec::new(),
            parse_errors,
        };
        tree.root = tree.import_root(green);
        tracing::debug!(nodes = tree.nodes.len(), "materialized syntax tree");
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn parse_errors(&self) -> &[ParseError] {
        &self.parse_errors
    }

    pub fn settings(&self) -> &EditSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: EditSettings) {
        self.settings = settings;
    }

    pub fn add_listener(&mut self, listener: impl TreeListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    // --- navigation ---

    pub fn kind(&self, id: NodeId) -> SyntaxKind {
        self.data(id).kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.data(id).children
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).children.first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).children.last().copied()
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let data = self.data(id);
        let parent = data.parent?;
        self.data(parent)
            .children
            .get(data.index_in_parent as usize + 1)
            .copied()
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let data = self.data(id);
        let parent = data.parent?;
        let idx = (data.index_in_parent as usize).checked_sub(1)?;
        self.data(parent).children.get(idx).copied()
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let data = self.data(id);
        data.parent.map(|_| data.index_in_parent as usize)
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.kind(id).is_token()
    }

    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes.get(id.index()).map_or(false, |d| d.alive)
    }

    /// Token text of a leaf; empty for composites.
    pub fn leaf_text(&self, id: NodeId) -> &str {
        &self.data(id).text
    }

    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_text(id, &mut out);
        out
    }

    pub fn write_text(&self, id: NodeId, out: &mut String) {
        let data = self.data(id);
        if data.kind.is_token() {
            out.push_str(&data.text);
            return;
        }
        for &child in &data.children {
            self.write_text(child, out);
        }
    }

    pub fn text_len(&self, id: NodeId) -> TextSize {
        let data = self.data(id);
        if let Some(len) = data.cache.text_len.get() {
            return TextSize::from(len);
        }
        let len: u32 = if data.kind.is_token() {
            data.text.len() as u32
        } else {
            data.children.iter().map(|&c| u32::from(self.text_len(c))).sum()
        };
        data.cache.text_len.set(Some(len));
        TextSize::from(len)
    }

    /// Offset of the node's first character within its root.
    pub fn start_offset(&self, id: NodeId) -> TextSize {
        let mut offset = TextSize::from(0);
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            let idx = self.data(current).index_in_parent as usize;
            for &sibling in &self.data(parent).children[..idx] {
                offset += self.text_len(sibling);
            }
            current = parent;
        }
        offset
    }

    pub fn text_range(&self, id: NodeId) -> TextRange {
        TextRange::at(self.start_offset(id), self.text_len(id))
    }

    /// `id` followed by its parent, grandparent, ... up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |&n| self.parent(n))
    }

    /// Pre-order walk of the subtree rooted at `id`, `id` included.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![id];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(self.children(next).iter().rev().copied());
            Some(next)
        })
    }

    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// `true` when `id` belongs to the tree under [`SyntaxTree::root`].
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.root_of(id) == self.root
    }

    pub fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|n| n == ancestor)
    }

    pub fn child_of_kind(&self, parent: NodeId, kind: SyntaxKind) -> Option<NodeId> {
        self.children(parent).iter().copied().find(|&c| self.kind(c) == kind)
    }

    pub fn children_of_kind(&self, parent: NodeId, kind: SyntaxKind) -> impl Iterator<Item = NodeId> + '_ {
        self.children(parent).iter().copied().filter(move |&c| self.kind(c) == kind)
    }

    pub fn last_child_of_kind(&self, parent: NodeId, kind: SyntaxKind) -> Option<NodeId> {
        self.children(parent).iter().rev().copied().find(|&c| self.kind(c) == kind)
    }

    pub fn is_trivia(&self, id: NodeId) -> bool {
        self.kind(id).is_trivia()
    }

    /// Whitespace, comments and error nodes.
    pub(crate) fn is_skippable(&self, id: NodeId) -> bool {
        tables::WHITESPACE_COMMENT_OR_ERROR.contains(self.kind(id))
    }

    /// Next sibling that is neither whitespace nor a comment.
    pub fn next_non_trivia_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.next_sibling(id);
        while let Some(n) = current {
            if !self.is_trivia(n) {
                return Some(n);
            }
            current = self.next_sibling(n);
        }
        None
    }

    pub fn prev_non_trivia_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.prev_sibling(id);
        while let Some(n) = current {
            if !self.is_trivia(n) {
                return Some(n);
            }
            current = self.prev_sibling(n);
        }
        None
    }

    /// First leaf with text inside `id`.
    pub fn first_token(&self, id: NodeId) -> Option<NodeId> {
        if self.is_leaf(id) {
            return (self.text_len(id) > TextSize::from(0)).then_some(id);
        }
        self.children(id).iter().find_map(|&c| self.first_token(c))
    }

    pub fn last_token(&self, id: NodeId) -> Option<NodeId> {
        if self.is_leaf(id) {
            return (self.text_len(id) > TextSize::from(0)).then_some(id);
        }
        self.children(id).iter().rev().find_map(|&c| self.last_token(c))
    }

    /// Leaf with text that follows the subtree `id` in document order.
    pub fn next_token(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            let mut sibling = self.next_sibling(current);
            while let Some(s) = sibling {
                if let Some(token) = self.first_token(s) {
                    return Some(token);
                }
                sibling = self.next_sibling(s);
            }
            current = self.parent(current)?;
        }
    }

    pub fn prev_token(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            let mut sibling = self.prev_sibling(current);
            while let Some(s) = sibling {
                if let Some(token) = self.last_token(s) {
                    return Some(token);
                }
                sibling = self.prev_sibling(s);
            }
            current = self.parent(current)?;
        }
    }

    pub(crate) fn cache(&self, id: NodeId) -> &NodeCache {
        &self.data(id).cache
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    // --- construction ---

    pub(crate) fn alloc_leaf(&mut self, kind: SyntaxKind, text: &str) -> NodeId {
        self.alloc(kind, SmolStr::new(text), Vec::new())
    }

    pub(crate) fn alloc_node(&mut self, kind: SyntaxKind, children: Vec<NodeId>) -> NodeId {
        self.alloc(kind, SmolStr::default(), children)
    }

    fn alloc(&mut self, kind: SyntaxKind, text: SmolStr, children: Vec<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for (idx, &child) in children.iter().enumerate() {
            let data = self.data_mut(child);
            data.parent = Some(id);
            data.index_in_parent = idx as u32;
        }
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children,
            index_in_parent: 0,
            text,
            alive: true,
            cache: NodeCache::default(),
        });
        id
    }

    fn import_root(&mut self, green: &GreenNodeData) -> NodeId {
        let kind = SyntaxKind::from_raw(green.kind().0);
        let children = self.import_children(green);
        self.alloc_node(kind, children)
    }

    /// Import a green subtree as detached nodes. The returned sequence holds
    /// the node itself plus any edge trivia hoisted out of it.
    pub(crate) fn import_green(&mut self, green: &GreenNodeData) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.import_node(green, &mut out);
        out
    }

    fn import_children(&mut self, green: &GreenNodeData) -> Vec<NodeId> {
        let mut children = Vec::new();
        for child in green.children() {
            match child {
                NodeOrToken::Node(node) => self.import_node(node, &mut children),
                NodeOrToken::Token(token) => {
                    let kind = SyntaxKind::from_raw(token.kind().0);
                    children.push(self.alloc_leaf(kind, token.text()));
                }
            }
        }
        self.sink_empty_nodes(&mut children);
        children
    }

    /// Composites never begin or end with trivia: edge trivia is moved up to
    /// the parent, except that a declaration keeps its own doc comment.
    fn import_node(&mut self, green: &GreenNodeData, out: &mut Vec<NodeId>) {
        let kind = SyntaxKind::from_raw(green.kind().0);
        let mut children = self.import_children(green);

        let leading_run = children.iter().take_while(|&&c| self.is_trivia(c)).count();
        let mut leading = leading_run;
        if tables::DOC_COMMENT_OWNERS.contains(kind) {
            if let Some(doc) = children[..leading_run]
                .iter()
                .rposition(|&c| self.kind(c) == SyntaxKind::DocComment)
            {
                leading = doc;
            }
        }
        let trailing = if leading_run == children.len() {
            0
        } else {
            children.iter().rev().take_while(|&&c| self.is_trivia(c)).count()
        };

        let tail = children.split_off(children.len() - trailing);
        let head: Vec<NodeId> = children.drain(..leading).collect();
        out.extend(head);
        let id = self.alloc_node(kind, children);
        out.push(id);
        out.extend(tail);
    }

    /// Move empty composites in front of the whitespace that precedes them, so
    /// that they stay attached to the element they follow.
    fn sink_empty_nodes(&self, children: &mut [NodeId]) {
        for idx in 1..children.len() {
            let node = children[idx];
            if self.is_leaf(node) || !self.children(node).is_empty() {
                continue;
            }
            let mut pos = idx;
            while pos > 0 && self.kind(children[pos - 1]) == SyntaxKind::Whitespace {
                children.swap(pos - 1, pos);
                pos -= 1;
            }
        }
    }

    /// Deep copy of `id` as a detached subtree.
    pub fn copy_subtree(&mut self, id: NodeId) -> NodeId {
        let kind = self.kind(id);
        if self.is_leaf(id) {
            let text = self.data(id).text.clone();
            return self.alloc(kind, text, Vec::new());
        }
        let children: Vec<NodeId> = self.children(id).to_vec();
        let copies = children.into_iter().map(|c| self.copy_subtree(c)).collect();
        self.alloc_node(kind, copies)
    }

    // --- raw mutation, used only by the edit choke point ---

    pub(crate) fn raw_insert(&mut self, parent: NodeId, index: usize, nodes: &[NodeId]) {
        for &node in nodes {
            self.data_mut(node).parent = Some(parent);
        }
        let data = self.data_mut(parent);
        data.children.splice(index..index, nodes.iter().copied());
        self.reindex(parent, index);
        self.invalidate(parent);
        self.notify(TreeEvent::ChildrenAdded {
            parent,
            index,
            count: nodes.len(),
        });
    }

    /// Detach `child` from its parent, returning the parent and old position.
    pub(crate) fn raw_remove(&mut self, child: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(child)?;
        let index = self.data(child).index_in_parent as usize;
        self.data_mut(parent).children.remove(index);
        let data = self.data_mut(child);
        data.parent = None;
        data.index_in_parent = 0;
        self.reindex(parent, index);
        self.invalidate(parent);
        self.notify(TreeEvent::ChildRemoved { parent, child });
        Some((parent, index))
    }

    pub(crate) fn raw_set_leaf_text(&mut self, leaf: NodeId, text: &str) {
        self.data_mut(leaf).text = SmolStr::new(text);
        self.invalidate(leaf);
        self.notify(TreeEvent::LeafChanged { leaf });
    }

    /// Mark a detached subtree as destroyed.
    pub(crate) fn destroy(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.data_mut(id).children);
        for child in children {
            self.destroy(child);
        }
        let data = self.data_mut(id);
        data.alive = false;
        data.parent = None;
    }

    fn reindex(&mut self, parent: NodeId, from: usize) {
        let children = self.data(parent).children[from..].to_vec();
        for (offset, child) in children.into_iter().enumerate() {
            self.data_mut(child).index_in_parent = (from + offset) as u32;
        }
    }

    fn invalidate(&mut self, from: NodeId) {
        let mut current = Some(from);
        while let Some(id) = current {
            let data = self.data_mut(id);
            data.cache = NodeCache::default();
            current = data.parent;
        }
    }

    fn notify(&mut self, event: TreeEvent) {
        for listener in &mut self.listeners {
            listener.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn round_trips_and_navigates() {
        let text = "class A {\n    int x;\n}\n";
        let tree = SyntaxTree::parse(text);
        assert_eq!(tree.text(tree.root()), text);

        let class = tree.child_of_kind(tree.root(), SyntaxKind::Class).unwrap();
        let field = tree.child_of_kind(class, SyntaxKind::Field).unwrap();
        assert_eq!(tree.text(field), "int x;");
        assert_eq!(u32::from(tree.start_offset(field)), 14);
        assert_eq!(tree.parent(field), Some(class));
        let prev = tree.prev_sibling(field).unwrap();
        assert_eq!(tree.kind(prev), SyntaxKind::Whitespace);
        assert_eq!(tree.next_sibling(prev), Some(field));
    }

    #[test]
    fn edge_trivia_is_hoisted_but_doc_comments_stay() {
        let tree = SyntaxTree::parse("class A {\n  /** doc */\n  void m() {}\n  int x;\n}");
        let class = tree.child_of_kind(tree.root(), SyntaxKind::Class).unwrap();
        let method = tree.child_of_kind(class, SyntaxKind::Method).unwrap();
        assert_eq!(tree.kind(tree.first_child(method).unwrap()), SyntaxKind::DocComment);
        for id in tree.descendants(tree.root()) {
            if tree.is_leaf(id) || id == tree.root() {
                continue;
            }
            if let Some(last) = tree.last_child(id) {
                assert!(!tree.is_trivia(last), "{:?} ends with trivia", tree.kind(id));
            }
        }
    }

    #[test]
    fn empty_lists_follow_the_name() {
        let tree = SyntaxTree::parse("class A {}");
        let class = tree.child_of_kind(tree.root(), SyntaxKind::Class).unwrap();
        let kinds: Vec<_> = tree.children(class).iter().map(|&c| tree.kind(c)).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::ModifierList,
                SyntaxKind::ClassKw,
                SyntaxKind::Whitespace,
                SyntaxKind::Identifier,
                SyntaxKind::TypeParameterList,
                SyntaxKind::ExtendsList,
                SyntaxKind::ImplementsList,
                SyntaxKind::Whitespace,
                SyntaxKind::LBrace,
                SyntaxKind::RBrace,
            ]
        );
    }

    #[test]
    fn copies_are_detached() {
        let mut tree = SyntaxTree::parse("class A { int x; }");
        let class = tree.child_of_kind(tree.root(), SyntaxKind::Class).unwrap();
        let copy = tree.copy_subtree(class);
        assert_eq!(tree.parent(copy), None);
        assert!(!tree.is_attached(copy));
        assert_eq!(tree.text(copy), tree.text(class));
    }
}
