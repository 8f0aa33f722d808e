//! Statement constructs other than blocks and declarations.
//!
//! Most statements only classify their children. The ones that own optional
//! companion tokens repair them on edit: `if` synthesizes and drops `else`,
//! `try` does the same for `finally`, `assert` for the `:` before its
//! description, and `for` keeps an initialization statement in place so the
//! header always has both of its semicolons.

use psi_syntax::{tables, SyntaxKind};

use crate::behavior::{Behavior, DEFAULT};
use crate::edit;
use crate::error::EditError;
use crate::nodes::{delete_unless_required, first_in_after_kind, precedes, trivia_role};
use crate::role::Role;
use crate::{NodeId, SyntaxTree};

pub(crate) const SIMPLE_STATEMENT: Behavior = Behavior {
    role_of: simple_statement_role,
    insert: before_semicolon_insert,
    delete: |tree, parent, child| {
        delete_unless_required(
            tree,
            parent,
            child,
            &[
                Role::BreakKeyword,
                Role::ContinueKeyword,
                Role::ReturnKeyword,
                Role::ThrowKeyword,
                Role::Expression,
                Role::ExpressionList,
            ],
        )
    },
    ..DEFAULT
};

pub(crate) const IF_STATEMENT: Behavior = Behavior {
    role_of: if_role,
    insert: if_insert,
    delete: if_delete,
    ..DEFAULT
};

pub(crate) const WHILE_STATEMENT: Behavior = Behavior {
    role_of: while_role,
    insert: while_insert,
    delete: |tree, parent, child| {
        delete_unless_required(
            tree,
            parent,
            child,
            &[
                Role::WhileKeyword,
                Role::DoKeyword,
                Role::LParenth,
                Role::RParenth,
            ],
        )
    },
    ..DEFAULT
};

pub(crate) const FOR_STATEMENT: Behavior = Behavior {
    role_of: for_role,
    insert: for_insert,
    delete: for_delete,
    ..DEFAULT
};

pub(crate) const FOREACH_STATEMENT: Behavior = Behavior {
    role_of: foreach_role,
    delete: |tree, parent, child| {
        delete_unless_required(
            tree,
            parent,
            child,
            &[
                Role::ForKeyword,
                Role::LParenth,
                Role::ForIterationParameter,
                Role::Colon,
                Role::RParenth,
            ],
        )
    },
    ..DEFAULT
};

pub(crate) const SWITCH_STATEMENT: Behavior = Behavior {
    role_of: switch_role,
    delete: |tree, parent, child| {
        delete_unless_required(
            tree,
            parent,
            child,
            &[
                Role::SwitchKeyword,
                Role::LParenth,
                Role::RParenth,
                Role::SwitchBody,
            ],
        )
    },
    ..DEFAULT
};

pub(crate) const SWITCH_LABEL_STATEMENT: Behavior = Behavior {
    role_of: switch_label_role,
    ..DEFAULT
};

pub(crate) const LABELED_STATEMENT: Behavior = Behavior {
    role_of: |tree, parent, child| {
        if let Some(role) = trivia_role(tree, parent, child) {
            return role;
        }
        match tree.kind(child) {
            SyntaxKind::Identifier => Role::LabelName,
            SyntaxKind::Colon => Role::Colon,
            kind if tables::STATEMENTS.contains(kind) => Role::Statement,
            _ => Role::None,
        }
    },
    delete: |tree, parent, child| {
        delete_unless_required(tree, parent, child, &[Role::LabelName, Role::Colon])
    },
    ..DEFAULT
};

pub(crate) const SYNCHRONIZED_STATEMENT: Behavior = Behavior {
    role_of: |tree, parent, child| {
        if let Some(role) = trivia_role(tree, parent, child) {
            return role;
        }
        match tree.kind(child) {
            SyntaxKind::SynchronizedKw => Role::SynchronizedKeyword,
            SyntaxKind::LParen => Role::LParenth,
            SyntaxKind::RParen => Role::RParenth,
            SyntaxKind::CodeBlock => Role::Block,
            kind if tables::EXPRESSIONS.contains(kind) => Role::Lock,
            _ => Role::None,
        }
    },
    delete: |tree, parent, child| {
        delete_unless_required(
            tree,
            parent,
            child,
            &[
                Role::SynchronizedKeyword,
                Role::LParenth,
                Role::RParenth,
                Role::Block,
            ],
        )
    },
    ..DEFAULT
};

pub(crate) const TRY_STATEMENT: Behavior = Behavior {
    role_of: try_role,
    insert: try_insert,
    delete: try_delete,
    ..DEFAULT
};

pub(crate) const CATCH_SECTION: Behavior = Behavior {
    role_of: |tree, parent, child| {
        if let Some(role) = trivia_role(tree, parent, child) {
            return role;
        }
        match tree.kind(child) {
            SyntaxKind::CatchKw => Role::CatchKeyword,
            SyntaxKind::LParen => Role::LParenth,
            SyntaxKind::RParen => Role::RParenth,
            SyntaxKind::Parameter => Role::CatchBlockParameter,
            SyntaxKind::CodeBlock => Role::CatchBlock,
            _ => Role::None,
        }
    },
    delete: |tree, parent, child| {
        delete_unless_required(
            tree,
            parent,
            child,
            &[
                Role::CatchKeyword,
                Role::LParenth,
                Role::RParenth,
                Role::CatchBlockParameter,
                Role::CatchBlock,
            ],
        )
    },
    ..DEFAULT
};

pub(crate) const ASSERT_STATEMENT: Behavior = Behavior {
    role_of: assert_role,
    insert: assert_insert,
    delete: assert_delete,
    ..DEFAULT
};

fn is_statement(tree: &SyntaxTree, id: NodeId) -> bool {
    tables::STATEMENTS.contains(tree.kind(id))
}

fn is_expression(tree: &SyntaxTree, id: NodeId) -> bool {
    tables::EXPRESSIONS.contains(tree.kind(id))
}

fn index_after(tree: &SyntaxTree, node: NodeId) -> usize {
    tree.index_in_parent(node).map_or(0, |idx| idx + 1)
}

fn index_of(tree: &SyntaxTree, node: NodeId) -> usize {
    tree.index_in_parent(node).unwrap_or(0)
}

fn simple_statement_role(tree: &SyntaxTree, stmt: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, stmt, child) {
        return role;
    }
    let kind = tree.kind(child);
    match (tree.kind(stmt), kind) {
        (_, SyntaxKind::Semicolon) => Role::ClosingSemicolon,
        (SyntaxKind::ExpressionStatement, _) if tables::EXPRESSIONS.contains(kind) => {
            Role::Expression
        }
        (SyntaxKind::ExpressionListStatement, SyntaxKind::ExpressionList) => Role::ExpressionList,
        (SyntaxKind::BreakStatement, SyntaxKind::BreakKw) => Role::BreakKeyword,
        (SyntaxKind::ContinueStatement, SyntaxKind::ContinueKw) => Role::ContinueKeyword,
        (SyntaxKind::BreakStatement | SyntaxKind::ContinueStatement, SyntaxKind::Identifier) => {
            Role::Label
        }
        (SyntaxKind::ReturnStatement, SyntaxKind::ReturnKw) => Role::ReturnKeyword,
        (SyntaxKind::ReturnStatement, _) if tables::EXPRESSIONS.contains(kind) => Role::ReturnValue,
        (SyntaxKind::ThrowStatement, SyntaxKind::ThrowKw) => Role::ThrowKeyword,
        (SyntaxKind::ThrowStatement, _) if tables::EXPRESSIONS.contains(kind) => Role::Exception,
        _ => Role::None,
    }
}

/// Default position is in front of the closing `;`.
fn before_semicolon_insert(
    tree: &mut SyntaxTree,
    stmt: NodeId,
    run: &[NodeId],
    anchor: Option<NodeId>,
    before: bool,
) -> Result<NodeId, EditError> {
    let index = match (anchor, tree.child_of_kind(stmt, SyntaxKind::Semicolon)) {
        (None, Some(semi)) if before => index_of(tree, semi),
        _ => edit::anchor_index(tree, stmt, anchor, before),
    };
    edit::splice(tree, stmt, index, run);
    Ok(run[0])
}

fn if_role(tree: &SyntaxTree, stmt: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, stmt, child) {
        return role;
    }
    match tree.kind(child) {
        SyntaxKind::IfKw => Role::IfKeyword,
        SyntaxKind::LParen => Role::LParenth,
        SyntaxKind::RParen => Role::RParenth,
        SyntaxKind::ElseKw => Role::ElseKeyword,
        kind if tables::EXPRESSIONS.contains(kind) => Role::Condition,
        kind if tables::STATEMENTS.contains(kind) => {
            match tree.child_of_kind(stmt, SyntaxKind::ElseKw) {
                Some(else_kw) if precedes(tree, else_kw, child) => Role::ElseBranch,
                _ => Role::ThenBranch,
            }
        }
        _ => Role::None,
    }
}

fn if_insert(
    tree: &mut SyntaxTree,
    stmt: NodeId,
    run: &[NodeId],
    anchor: Option<NodeId>,
    before: bool,
) -> Result<NodeId, EditError> {
    if anchor.is_some() || !matches!(run, [single] if is_statement(tree, *single)) {
        return crate::behavior::default_insert(tree, stmt, run, anchor, before);
    }
    let then = tree.find_child_by_role(stmt, Role::ThenBranch);
    let index = match then {
        None => match tree.child_of_kind(stmt, SyntaxKind::RParen) {
            Some(rparen) => index_after(tree, rparen),
            None => tree.children(stmt).len(),
        },
        Some(then) => {
            if let Some(old) = tree.find_child_by_role(stmt, Role::ElseBranch) {
                edit::remove(tree, old);
            }
            let else_kw = match tree.child_of_kind(stmt, SyntaxKind::ElseKw) {
                Some(kw) => kw,
                None => edit::insert_token(tree, stmt, index_after(tree, then), SyntaxKind::ElseKw),
            };
            index_after(tree, else_kw)
        }
    };
    edit::splice(tree, stmt, index, run);
    Ok(run[0])
}

fn if_delete(tree: &mut SyntaxTree, stmt: NodeId, child: NodeId) -> Result<(), EditError> {
    match tree.role_of(stmt, child) {
        Role::ElseBranch | Role::ElseKeyword => {
            let branch = tree.find_child_by_role(stmt, Role::ElseBranch);
            let keyword = tree.find_child_by_role(stmt, Role::ElseKeyword);
            for node in [branch, keyword].into_iter().flatten() {
                edit::remove(tree, node);
            }
            Ok(())
        }
        _ => delete_unless_required(
            tree,
            stmt,
            child,
            &[Role::IfKeyword, Role::LParenth, Role::RParenth],
        ),
    }
}

fn while_role(tree: &SyntaxTree, stmt: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, stmt, child) {
        return role;
    }
    match tree.kind(child) {
        SyntaxKind::WhileKw => Role::WhileKeyword,
        SyntaxKind::DoKw => Role::DoKeyword,
        SyntaxKind::LParen => Role::LParenth,
        SyntaxKind::RParen => Role::RParenth,
        SyntaxKind::Semicolon => Role::ClosingSemicolon,
        kind if tables::EXPRESSIONS.contains(kind) => Role::Condition,
        kind if tables::STATEMENTS.contains(kind) => Role::LoopBody,
        _ => Role::None,
    }
}

fn while_insert(
    tree: &mut SyntaxTree,
    stmt: NodeId,
    run: &[NodeId],
    anchor: Option<NodeId>,
    before: bool,
) -> Result<NodeId, EditError> {
    let index = match (anchor, run) {
        (None, [single]) if is_statement(tree, *single) => {
            match tree.child_of_kind(stmt, SyntaxKind::DoKw) {
                Some(do_kw) => index_after(tree, do_kw),
                None => tree.children(stmt).len(),
            }
        }
        (None, [single]) if is_expression(tree, *single) => {
            match tree.child_of_kind(stmt, SyntaxKind::LParen) {
                Some(lparen) => index_after(tree, lparen),
                None => tree.children(stmt).len(),
            }
        }
        _ => edit::anchor_index(tree, stmt, anchor, before),
    };
    edit::splice(tree, stmt, index, run);
    Ok(run[0])
}

fn for_role(tree: &SyntaxTree, stmt: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, stmt, child) {
        return role;
    }
    match tree.kind(child) {
        SyntaxKind::ForKw => Role::ForKeyword,
        SyntaxKind::LParen => Role::LParenth,
        SyntaxKind::RParen => Role::RParenth,
        SyntaxKind::Semicolon => Role::ForSemicolon,
        kind if tables::EXPRESSIONS.contains(kind) => Role::Condition,
        kind if tables::STATEMENTS.contains(kind) => {
            let after = |marker: SyntaxKind| {
                tree.child_of_kind(stmt, marker)
                    .map_or(false, |m| precedes(tree, m, child))
            };
            if after(SyntaxKind::RParen) {
                Role::LoopBody
            } else if after(SyntaxKind::Semicolon) {
                Role::ForUpdate
            } else {
                Role::ForInitialization
            }
        }
        _ => Role::None,
    }
}

fn for_insert(
    tree: &mut SyntaxTree,
    stmt: NodeId,
    run: &[NodeId],
    anchor: Option<NodeId>,
    before: bool,
) -> Result<NodeId, EditError> {
    let after_kind = |tree: &SyntaxTree, kind: SyntaxKind| {
        tree.child_of_kind(stmt, kind)
            .map_or(tree.children(stmt).len(), |n| index_after(tree, n))
    };
    let index = match (anchor, run) {
        (None, [single]) if is_expression(tree, *single) => {
            match tree.child_of_kind(stmt, SyntaxKind::Semicolon) {
                Some(semi) => index_of(tree, semi),
                None => tree.children(stmt).len(),
            }
        }
        (None, [single]) if is_statement(tree, *single) => {
            if tree.find_child_by_role(stmt, Role::LoopBody).is_none() {
                tree.children(stmt).len()
            } else if tree.find_child_by_role(stmt, Role::ForInitialization).is_none() {
                after_kind(tree, SyntaxKind::LParen)
            } else {
                after_kind(tree, SyntaxKind::Semicolon)
            }
        }
        _ => edit::anchor_index(tree, stmt, anchor, before),
    };
    edit::splice(tree, stmt, index, run);
    Ok(run[0])
}

/// Build a detached `;` empty statement.
pub(crate) fn empty_statement(tree: &mut SyntaxTree) -> NodeId {
    let semi = tree.alloc_leaf(SyntaxKind::Semicolon, ";");
    tree.alloc_node(SyntaxKind::EmptyStatement, vec![semi])
}

fn for_delete(tree: &mut SyntaxTree, stmt: NodeId, child: NodeId) -> Result<(), EditError> {
    match tree.role_of(stmt, child) {
        Role::ForInitialization if tree.kind(child) != SyntaxKind::EmptyStatement => {
            // The initialization owns the first `;` of the header.
            let index = index_of(tree, child);
            let empty = empty_statement(tree);
            if tree.raw_remove(child).is_some() {
                tree.destroy(child);
            }
            edit::splice(tree, stmt, index, &[empty]);
            edit::tidy(tree, stmt, index + 1);
            Ok(())
        }
        Role::ForInitialization => Err(EditError::CannotDeleteRequired {
            kind: SyntaxKind::EmptyStatement,
        }),
        _ => delete_unless_required(
            tree,
            stmt,
            child,
            &[
                Role::ForKeyword,
                Role::LParenth,
                Role::RParenth,
                Role::ForSemicolon,
            ],
        ),
    }
}

fn foreach_role(tree: &SyntaxTree, stmt: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, stmt, child) {
        return role;
    }
    match tree.kind(child) {
        SyntaxKind::ForKw => Role::ForKeyword,
        SyntaxKind::LParen => Role::LParenth,
        SyntaxKind::RParen => Role::RParenth,
        SyntaxKind::Parameter => Role::ForIterationParameter,
        SyntaxKind::Colon => Role::Colon,
        kind if tables::EXPRESSIONS.contains(kind) => Role::IteratedValue,
        kind if tables::STATEMENTS.contains(kind) => Role::LoopBody,
        _ => Role::None,
    }
}

fn switch_role(tree: &SyntaxTree, stmt: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, stmt, child) {
        return role;
    }
    match tree.kind(child) {
        SyntaxKind::SwitchKw => Role::SwitchKeyword,
        SyntaxKind::LParen => Role::LParenth,
        SyntaxKind::RParen => Role::RParenth,
        SyntaxKind::CodeBlock => Role::SwitchBody,
        kind if tables::EXPRESSIONS.contains(kind) => Role::Condition,
        _ => Role::None,
    }
}

fn switch_label_role(tree: &SyntaxTree, stmt: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, stmt, child) {
        return role;
    }
    match tree.kind(child) {
        SyntaxKind::CaseKw => Role::CaseKeyword,
        SyntaxKind::DefaultKw => Role::DefaultKeyword,
        SyntaxKind::Colon => Role::Colon,
        kind if tables::EXPRESSIONS.contains(kind) => Role::CaseExpression,
        _ => Role::None,
    }
}

fn try_role(tree: &SyntaxTree, stmt: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, stmt, child) {
        return role;
    }
    match tree.kind(child) {
        SyntaxKind::TryKw => Role::TryKeyword,
        SyntaxKind::ResourceList => Role::ResourceList,
        SyntaxKind::CatchSection => Role::CatchSection,
        SyntaxKind::FinallyKw => Role::FinallyKeyword,
        SyntaxKind::CodeBlock => match tree.child_of_kind(stmt, SyntaxKind::FinallyKw) {
            Some(finally) if precedes(tree, finally, child) => Role::FinallyBlock,
            _ => Role::TryBlock,
        },
        _ => Role::None,
    }
}

fn try_insert(
    tree: &mut SyntaxTree,
    stmt: NodeId,
    run: &[NodeId],
    anchor: Option<NodeId>,
    before: bool,
) -> Result<NodeId, EditError> {
    if anchor.is_some() || run.len() != 1 {
        return crate::behavior::default_insert(tree, stmt, run, anchor, before);
    }
    let node = run[0];
    let index = match tree.kind(node) {
        SyntaxKind::CatchSection => {
            let last = tree
                .last_child_of_kind(stmt, SyntaxKind::CatchSection)
                .or_else(|| tree.find_child_by_role(stmt, Role::TryBlock));
            match last {
                Some(last) => index_after(tree, last),
                None => tree.children(stmt).len(),
            }
        }
        SyntaxKind::ResourceList => match tree.child_of_kind(stmt, SyntaxKind::TryKw) {
            Some(kw) => index_after(tree, kw),
            None => 0,
        },
        SyntaxKind::CodeBlock if tree.find_child_by_role(stmt, Role::TryBlock).is_some() => {
            if let Some(old) = tree.find_child_by_role(stmt, Role::FinallyBlock) {
                edit::remove(tree, old);
            }
            let finally = match tree.child_of_kind(stmt, SyntaxKind::FinallyKw) {
                Some(kw) => kw,
                None => {
                    let end = tree.children(stmt).len();
                    edit::insert_token(tree, stmt, end, SyntaxKind::FinallyKw)
                }
            };
            index_after(tree, finally)
        }
        _ => edit::anchor_index(tree, stmt, anchor, before),
    };
    edit::splice(tree, stmt, index, run);
    Ok(node)
}

fn try_delete(tree: &mut SyntaxTree, stmt: NodeId, child: NodeId) -> Result<(), EditError> {
    match tree.role_of(stmt, child) {
        Role::FinallyBlock | Role::FinallyKeyword => {
            let block = tree.find_child_by_role(stmt, Role::FinallyBlock);
            let keyword = tree.find_child_by_role(stmt, Role::FinallyKeyword);
            for node in [block, keyword].into_iter().flatten() {
                edit::remove(tree, node);
            }
            Ok(())
        }
        _ => delete_unless_required(tree, stmt, child, &[Role::TryKeyword, Role::TryBlock]),
    }
}

fn assert_role(tree: &SyntaxTree, stmt: NodeId, child: NodeId) -> Role {
    if let Some(role) = trivia_role(tree, stmt, child) {
        return role;
    }
    match tree.kind(child) {
        SyntaxKind::AssertKw => Role::AssertKeyword,
        SyntaxKind::Colon => Role::Colon,
        SyntaxKind::Semicolon => Role::ClosingSemicolon,
        kind if tables::EXPRESSIONS.contains(kind) => {
            match tree.child_of_kind(stmt, SyntaxKind::Colon) {
                Some(colon) if precedes(tree, colon, child) => Role::AssertDescription,
                _ => Role::Condition,
            }
        }
        _ => Role::None,
    }
}

fn assert_insert(
    tree: &mut SyntaxTree,
    stmt: NodeId,
    run: &[NodeId],
    anchor: Option<NodeId>,
    before: bool,
) -> Result<NodeId, EditError> {
    if anchor.is_some() || !matches!(run, [single] if is_expression(tree, *single)) {
        return before_semicolon_insert(tree, stmt, run, anchor, before);
    }
    let index = if tree.find_child_by_role(stmt, Role::Condition).is_none() {
        match tree.child_of_kind(stmt, SyntaxKind::AssertKw) {
            Some(kw) => index_after(tree, kw),
            None => 0,
        }
    } else {
        if let Some(old) = tree.find_child_by_role(stmt, Role::AssertDescription) {
            edit::remove(tree, old);
        }
        let colon = match tree.child_of_kind(stmt, SyntaxKind::Colon) {
            Some(colon) => colon,
            None => {
                let at = match tree.find_child_by_role(stmt, Role::Condition) {
                    Some(condition) => index_after(tree, condition),
                    None => tree.children(stmt).len(),
                };
                edit::insert_whitespace(tree, stmt, at, " ");
                edit::insert_token(tree, stmt, at + 1, SyntaxKind::Colon)
            }
        };
        let at = index_after(tree, colon);
        let spaced = tree
            .children(stmt)
            .get(at)
            .map_or(false, |&n| edit::is_whitespace(tree, n));
        if !spaced {
            edit::insert_whitespace(tree, stmt, at, " ");
        }
        at + 1
    };
    edit::splice(tree, stmt, index, run);
    Ok(run[0])
}

fn assert_delete(tree: &mut SyntaxTree, stmt: NodeId, child: NodeId) -> Result<(), EditError> {
    match tree.role_of(stmt, child) {
        Role::AssertDescription | Role::Colon => {
            let description = tree.find_child_by_role(stmt, Role::AssertDescription);
            let colon = tree.find_child_by_role(stmt, Role::Colon);
            for node in [description, colon].into_iter().flatten() {
                edit::remove(tree, node);
            }
            Ok(())
        }
        _ => delete_unless_required(tree, stmt, child, &[Role::AssertKeyword]),
    }
}

impl SyntaxTree {
    /// Condition of an `if`, loop, `switch` or `assert`.
    pub fn condition(&self, stmt: NodeId) -> Option<NodeId> {
        self.find_child_by_role(stmt, Role::Condition)
    }

    pub fn then_branch(&self, stmt: NodeId) -> Option<NodeId> {
        self.find_child_by_role(stmt, Role::ThenBranch)
    }

    pub fn else_branch(&self, stmt: NodeId) -> Option<NodeId> {
        self.find_child_by_role(stmt, Role::ElseBranch)
    }

    /// Replace or add the `else` branch, or with `None` remove it together
    /// with its keyword.
    pub fn set_else_branch(&mut self, stmt: NodeId, branch: Option<NodeId>) -> Result<(), EditError> {
        match branch {
            Some(branch) if self.then_branch(stmt).is_some() => self.add(stmt, branch).map(|_| ()),
            Some(branch) => Err(EditError::NotAccepted {
                parent: self.kind(stmt),
                child: self.kind(branch),
            }),
            None => match self.else_branch(stmt) {
                Some(old) => self.delete_child(stmt, old),
                None => Ok(()),
            },
        }
    }

    pub fn loop_body(&self, stmt: NodeId) -> Option<NodeId> {
        self.find_child_by_role(stmt, Role::LoopBody)
    }

    pub fn finally_block(&self, stmt: NodeId) -> Option<NodeId> {
        self.find_child_by_role(stmt, Role::FinallyBlock)
    }

    /// Replace or add the `finally` block, or with `None` remove it together
    /// with its keyword.
    pub fn set_finally_block(&mut self, stmt: NodeId, block: Option<NodeId>) -> Result<(), EditError> {
        match block {
            Some(block) => self.add(stmt, block).map(|_| ()),
            None => match self.finally_block(stmt) {
                Some(old) => self.delete_child(stmt, old),
                None => Ok(()),
            },
        }
    }

    pub fn catch_sections(&self, stmt: NodeId) -> Vec<NodeId> {
        self.children_of_kind(stmt, SyntaxKind::CatchSection).collect()
    }

    /// The label of a `break`/`continue`, or of a labeled statement.
    pub fn label_name(&self, stmt: NodeId) -> Option<&str> {
        let role = if self.kind(stmt) == SyntaxKind::LabeledStatement {
            Role::LabelName
        } else {
            Role::Label
        };
        self.find_child_by_role(stmt, role).map(|id| self.leaf_text(id))
    }

    /// The `case` expression of a switch label, `None` for `default:`.
    pub fn case_expression(&self, label: NodeId) -> Option<NodeId> {
        first_in_after_kind(self, label, SyntaxKind::CaseKw, tables::EXPRESSIONS)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::factory::{
        create_code_block_from_text, create_expression_from_text, create_statement_from_text,
    };

    fn first(tree: &SyntaxTree, kind: SyntaxKind) -> NodeId {
        tree.descendants(tree.root()).find(|&n| tree.kind(n) == kind).unwrap()
    }

    fn in_method(body: &str) -> SyntaxTree {
        SyntaxTree::parse(&format!("class A {{ void m() {{ {body} }} }}"))
    }

    fn method_body_text(tree: &SyntaxTree) -> String {
        let block = first(tree, SyntaxKind::CodeBlock);
        let text = tree.text(block);
        text[2..text.len() - 2].to_string()
    }

    #[test]
    fn else_is_synthesized_and_dropped() {
        let mut tree = in_method("if (c) a();");
        let stmt = first(&tree, SyntaxKind::IfStatement);
        let branch = create_statement_from_text(&mut tree, "b();").unwrap();
        tree.set_else_branch(stmt, Some(branch)).unwrap();
        assert_eq!(method_body_text(&tree), "if (c) a(); else b();");
        assert_eq!(tree.role_of(stmt, branch), Role::ElseBranch);
        let then = tree.then_branch(stmt).unwrap();
        assert_eq!(tree.text(then), "a();");

        tree.set_else_branch(stmt, None).unwrap();
        assert_eq!(method_body_text(&tree), "if (c) a();");
    }

    #[test]
    fn for_header_roles() {
        let tree = in_method("for (int i = 0; i < n; i++) x();");
        let stmt = first(&tree, SyntaxKind::ForStatement);
        let text_of = |role| tree.text(tree.find_child_by_role(stmt, role).unwrap());
        assert_eq!(text_of(Role::ForInitialization), "int i = 0;");
        assert_eq!(text_of(Role::Condition), "i < n");
        assert_eq!(text_of(Role::ForSemicolon), ";");
        assert_eq!(text_of(Role::ForUpdate), "i++");
        assert_eq!(text_of(Role::LoopBody), "x();");
    }

    #[test]
    fn deleting_for_initialization_keeps_the_header_semicolon() {
        let mut tree = in_method("for (i = 0; i < n; i++) x();");
        let stmt = first(&tree, SyntaxKind::ForStatement);
        let init = tree.find_child_by_role(stmt, Role::ForInitialization).unwrap();
        tree.delete_child(stmt, init).unwrap();
        assert_eq!(method_body_text(&tree), "for (; i < n; i++) x();");
    }

    #[test]
    fn finally_comes_and_goes() {
        let mut tree = in_method("try { a(); } catch (E e) { }");
        let stmt = first(&tree, SyntaxKind::TryStatement);
        let block = create_code_block_from_text(&mut tree, "{ b(); }").unwrap();
        tree.set_finally_block(stmt, Some(block)).unwrap();
        assert_eq!(
            method_body_text(&tree),
            "try { a(); } catch (E e) { } finally { b(); }"
        );
        assert_eq!(tree.role_of(stmt, block), Role::FinallyBlock);
        tree.set_finally_block(stmt, None).unwrap();
        assert_eq!(method_body_text(&tree), "try { a(); } catch (E e) { }");
    }

    #[test]
    fn assert_description_brings_its_colon() {
        let mut tree = in_method("assert ok;");
        let stmt = first(&tree, SyntaxKind::AssertStatement);
        let message = create_expression_from_text(&mut tree, "\"broken\"").unwrap();
        tree.add(stmt, message).unwrap();
        assert_eq!(method_body_text(&tree), "assert ok : \"broken\";");
        tree.delete_child(stmt, message).unwrap();
        assert_eq!(method_body_text(&tree), "assert ok;");
    }

    #[test]
    fn labels_and_case_expressions() {
        let tree = in_method("outer: for (;;) { switch (x) { case 1: break outer; default: } }");
        let labeled = first(&tree, SyntaxKind::LabeledStatement);
        assert_eq!(tree.label_name(labeled), Some("outer"));
        let brk = first(&tree, SyntaxKind::BreakStatement);
        assert_eq!(tree.label_name(brk), Some("outer"));
        let labels: Vec<_> = tree
            .descendants(tree.root())
            .filter(|&n| tree.kind(n) == SyntaxKind::SwitchLabelStatement)
            .collect();
        assert_eq!(tree.text(tree.case_expression(labels[0]).unwrap()), "1");
        assert!(tree.case_expression(labels[1]).is_none());
    }
}
