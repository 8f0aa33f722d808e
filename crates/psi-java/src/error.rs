use psi_syntax::SyntaxKind;
use thiserror::Error;

use crate::NodeId;

/// A structural edit the caller asked for cannot be performed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("{child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
    #[error("{parent:?} does not accept a {child:?} child")]
    NotAccepted { parent: SyntaxKind, child: SyntaxKind },
    #[error("anchor {anchor:?} is not a child of {parent:?}")]
    AnchorNotAChild { parent: NodeId, anchor: NodeId },
    #[error("{0:?} is already attached to a tree")]
    AlreadyAttached(NodeId),
    #[error("the node range to insert is empty or not a contiguous sibling run")]
    EmptyRange,
    #[error("{0:?} has been destroyed or detached")]
    Detached(NodeId),
    #[error("{kind:?} is a required part of its parent and cannot be deleted")]
    CannotDeleteRequired { kind: SyntaxKind },
    #[error("cannot build element from text: {message}")]
    InvalidFragment { message: String },
}
