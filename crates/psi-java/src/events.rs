//! Synchronous notifications fired by the mutation choke point.

use crate::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEvent {
    /// `count` children were inserted into `parent` starting at `index`.
    ChildrenAdded { parent: NodeId, index: usize, count: usize },
    /// `child` was detached from `parent`.
    ChildRemoved { parent: NodeId, child: NodeId },
    /// The text of leaf `leaf` was replaced.
    LeafChanged { leaf: NodeId },
}

/// Observer of structural edits. Called after the tree has been updated and
/// node caches along the edited path have been invalidated.
pub trait TreeListener {
    fn on_event(&mut self, event: &TreeEvent);
}

impl<F> TreeListener for F
where
    F: FnMut(&TreeEvent),
{
    fn on_event(&mut self, event: &TreeEvent) {
        self(event)
    }
}
