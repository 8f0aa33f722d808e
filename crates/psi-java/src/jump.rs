//! Targets of `break` and `continue`.

use psi_syntax::{tables, SyntaxKind};

use crate::nodes::first_in;
use crate::{NodeId, SyntaxTree};

impl SyntaxTree {
    /// The statement a `break` or `continue` leaves.
    ///
    /// Unlabeled: the nearest enclosing loop or `switch` for `break`, the
    /// nearest loop for `continue`. Labeled: the statement under the matching
    /// label, which for `continue` must be a loop. The search never leaves
    /// the enclosing method, initializer or class body.
    pub fn exited_statement(&self, jump: NodeId) -> Option<NodeId> {
        let is_break = match self.kind(jump) {
            SyntaxKind::BreakStatement => true,
            SyntaxKind::ContinueStatement => false,
            _ => return None,
        };
        let target = match self.label_name(jump) {
            None => self.enclosing_jump_targets(jump).find(|&n| {
                let kind = self.kind(n);
                tables::LOOPS.contains(kind) || (is_break && kind == SyntaxKind::SwitchStatement)
            }),
            Some(label) => {
                let labeled = self.labeled_statement(jump, label)?;
                let statement = first_in(self, labeled, tables::STATEMENTS)?;
                (is_break || tables::LOOPS.contains(self.kind(statement))).then_some(statement)
            }
        };
        if target.is_none() {
            tracing::trace!(?jump, "jump without target");
        }
        target
    }

    /// The labeled statement a labeled `break`/`continue` names.
    pub fn labeled_statement(&self, jump: NodeId, label: &str) -> Option<NodeId> {
        self.enclosing_jump_targets(jump).find(|&n| {
            self.kind(n) == SyntaxKind::LabeledStatement && self.label_name(n) == Some(label)
        })
    }

    fn enclosing_jump_targets(&self, jump: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.ancestors(jump)
            .skip(1)
            .take_while(|&n| !tables::MEMBER_BOUNDARIES.contains(self.kind(n)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn in_method(body: &str) -> SyntaxTree {
        SyntaxTree::parse(&format!("class A {{ void m() {{ {body} }} }}"))
    }

    fn all(tree: &SyntaxTree, kind: SyntaxKind) -> Vec<NodeId> {
        tree.descendants(tree.root()).filter(|&n| tree.kind(n) == kind).collect()
    }

    #[test]
    fn unlabeled_targets() {
        let tree = in_method("while (a) { switch (b) { case 1: break; } continue; }");
        let switch = all(&tree, SyntaxKind::SwitchStatement)[0];
        let lp = all(&tree, SyntaxKind::WhileStatement)[0];
        assert_eq!(tree.exited_statement(all(&tree, SyntaxKind::BreakStatement)[0]), Some(switch));
        assert_eq!(tree.exited_statement(all(&tree, SyntaxKind::ContinueStatement)[0]), Some(lp));
    }

    #[test]
    fn continue_skips_switches() {
        let tree = in_method("for (;;) { switch (b) { default: continue; } }");
        let lp = all(&tree, SyntaxKind::ForStatement)[0];
        assert_eq!(tree.exited_statement(all(&tree, SyntaxKind::ContinueStatement)[0]), Some(lp));
    }

    #[test]
    fn labeled_targets() {
        let tree = in_method("outer: for (;;) { inner: while (x) { break outer; } } done: { continue done; }");
        let for_loop = all(&tree, SyntaxKind::ForStatement)[0];
        assert_eq!(tree.exited_statement(all(&tree, SyntaxKind::BreakStatement)[0]), Some(for_loop));
        // `done` labels a block, which `continue` cannot target.
        assert_eq!(tree.exited_statement(all(&tree, SyntaxKind::ContinueStatement)[0]), None);
    }

    #[test]
    fn class_boundaries_stop_the_search() {
        let tree = in_method("while (a) { new Runnable() { public void run() { break; } }; }");
        assert_eq!(tree.exited_statement(all(&tree, SyntaxKind::BreakStatement)[0]), None);
        let labeled = in_method("l: while (a) { new Runnable() { public void run() { break l; } }; }");
        assert_eq!(
            labeled.exited_statement(all(&labeled, SyntaxKind::BreakStatement)[0]),
            None
        );
    }
}
