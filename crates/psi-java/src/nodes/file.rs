//! Compilation units, package statements and imports.

use psi_syntax::SyntaxKind;

use crate::behavior::{Behavior, DEFAULT};
use crate::edit;
use crate::error::EditError;
use crate::nodes::{delete_unless_required, trivia_role};
use crate::role::Role;
use crate::{NodeId, SyntaxTree};

pub(crate) const JAVA_FILE: Behavior = Behavior {
    role_of: |tree, parent, child| {
        if let Some(role) = trivia_role(tree, parent, child) {
            return role;
        }
        match tree.kind(child) {
            SyntaxKind::PackageStatement => Role::PackageStatement,
            SyntaxKind::ImportList => Role::ImportList,
            SyntaxKind::Class => Role::Class,
            _ => Role::None,
        }
    },
    accepts: |_, _, kind| {
        matches!(
            kind,
            SyntaxKind::Class | SyntaxKind::PackageStatement | SyntaxKind::ImportList
        )
    },
    insert: file_insert,
    ..DEFAULT
};

pub(crate) const IMPORT_LIST: Behavior = Behavior {
    role_of: |tree, parent, child| {
        if let Some(role) = trivia_role(tree, parent, child) {
            return role;
        }
        match tree.kind(child) {
            SyntaxKind::ImportStatement | SyntaxKind::ImportStaticStatement => Role::ImportStatement,
            _ => Role::None,
        }
    },
    accepts: |_, _, kind| {
        matches!(
            kind,
            SyntaxKind::ImportStatement | SyntaxKind::ImportStaticStatement
        )
    },
    insert: import_list_insert,
    ..DEFAULT
};

pub(crate) const IMPORT_STATEMENT: Behavior = Behavior {
    role_of: |tree, parent, child| {
        if let Some(role) = trivia_role(tree, parent, child) {
            return role;
        }
        match tree.kind(child) {
            SyntaxKind::ImportKw => Role::ImportKeyword,
            SyntaxKind::StaticKw => Role::StaticKeyword,
            SyntaxKind::JavaCodeReference => Role::ImportReference,
            SyntaxKind::Dot => Role::ImportOnDemandDot,
            SyntaxKind::Star => Role::ImportOnDemandAsterisk,
            SyntaxKind::Semicolon => Role::ClosingSemicolon,
            _ => Role::None,
        }
    },
    delete: |tree, parent, child| {
        delete_unless_required(tree, parent, child, &[Role::ImportKeyword, Role::ImportReference])
    },
    ..DEFAULT
};

pub(crate) const PACKAGE_STATEMENT: Behavior = Behavior {
    role_of: |tree, parent, child| {
        if let Some(role) = trivia_role(tree, parent, child) {
            return role;
        }
        match tree.kind(child) {
            SyntaxKind::PackageKw => Role::PackageKeyword,
            SyntaxKind::JavaCodeReference => Role::PackageReference,
            SyntaxKind::Semicolon => Role::ClosingSemicolon,
            _ => Role::None,
        }
    },
    delete: |tree, parent, child| {
        delete_unless_required(tree, parent, child, &[Role::PackageKeyword, Role::PackageReference])
    },
    ..DEFAULT
};

fn file_insert(
    tree: &mut SyntaxTree,
    file: NodeId,
    run: &[NodeId],
    anchor: Option<NodeId>,
    before: bool,
) -> Result<NodeId, EditError> {
    let index = match (anchor, tree.kind(run[0])) {
        (Some(_), _) => edit::anchor_index(tree, file, anchor, before),
        (None, SyntaxKind::PackageStatement) => 0,
        (None, _) if before => tree.children(file).len(),
        (None, _) => tree
            .child_of_kind(file, SyntaxKind::ImportList)
            .or_else(|| tree.child_of_kind(file, SyntaxKind::PackageStatement))
            .map_or(0, |n| tree.index_in_parent(n).map_or(0, |idx| idx + 1)),
    };
    edit::insert_line(tree, file, index, run);
    Ok(run[0])
}

fn import_list_insert(
    tree: &mut SyntaxTree,
    list: NodeId,
    run: &[NodeId],
    anchor: Option<NodeId>,
    before: bool,
) -> Result<NodeId, EditError> {
    let was_empty = tree.text_len(list) == 0.into();
    let index = edit::anchor_index(tree, list, anchor, before);
    edit::insert_line(tree, list, index, run);
    if was_empty {
        open_up_import_list(tree, list);
    }
    Ok(run[0])
}

/// Put the first import on a line of its own, a blank line away from the
/// package statement and the first class.
fn open_up_import_list(tree: &mut SyntaxTree, list: NodeId) {
    let Some((file, index)) = tree.parent(list).zip(tree.index_in_parent(list)) else {
        return;
    };
    match tree.next_sibling(list) {
        Some(next) if edit::is_whitespace(tree, next) => {
            if !tree.leaf_text(next).contains('\n') {
                tree.raw_set_leaf_text(next, "\n\n");
            }
        }
        Some(_) => {
            edit::insert_whitespace(tree, file, index + 1, "\n\n");
        }
        None => {}
    }
    match tree.prev_sibling(list) {
        Some(prev) if edit::is_whitespace(tree, prev) => {
            if !tree.leaf_text(prev).contains('\n') {
                tree.raw_set_leaf_text(prev, "\n\n");
            }
        }
        Some(_) => {
            edit::insert_whitespace(tree, file, index, "\n\n");
        }
        None => {}
    }
}

impl SyntaxTree {
    /// Package of a file as written, `""` for the default package.
    pub fn package_name(&self, file: NodeId) -> String {
        self.find_child_by_role(file, Role::PackageStatement)
            .and_then(|stmt| self.find_child_by_role(stmt, Role::PackageReference))
            .map(|reference| self.qualified_name(reference))
            .unwrap_or_default()
    }

    pub fn import_list(&self, file: NodeId) -> Option<NodeId> {
        self.find_child_by_role(file, Role::ImportList)
    }

    pub fn imports(&self, file: NodeId) -> Vec<NodeId> {
        self.import_list(file)
            .map(|list| {
                self.children(list)
                    .iter()
                    .copied()
                    .filter(|&c| {
                        matches!(
                            self.kind(c),
                            SyntaxKind::ImportStatement | SyntaxKind::ImportStaticStatement
                        )
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Imported name without the on-demand `.*`.
    pub fn import_name(&self, import: NodeId) -> String {
        self.find_child_by_role(import, Role::ImportReference)
            .map(|reference| self.qualified_name(reference))
            .unwrap_or_default()
    }

    pub fn is_on_demand(&self, import: NodeId) -> bool {
        self.find_child_by_role(import, Role::ImportOnDemandAsterisk).is_some()
    }

    pub fn is_static_import(&self, import: NodeId) -> bool {
        self.kind(import) == SyntaxKind::ImportStaticStatement
    }

    pub fn classes(&self, file: NodeId) -> Vec<NodeId> {
        self.children_of_kind(file, SyntaxKind::Class).collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::factory::create_import_from_text;

    #[test]
    fn file_queries() {
        let tree = SyntaxTree::parse(
            "package com.example;\n\nimport java.util.*;\nimport static java.lang.Math.max;\n\nclass A {}\nclass B {}\n",
        );
        let file = tree.root();
        assert_eq!(tree.package_name(file), "com.example");
        let imports = tree.imports(file);
        assert_eq!(imports.len(), 2);
        assert_eq!(tree.import_name(imports[0]), "java.util");
        assert!(tree.is_on_demand(imports[0]));
        assert!(tree.is_static_import(imports[1]));
        assert_eq!(tree.import_name(imports[1]), "java.lang.Math.max");
        assert_eq!(tree.classes(file).len(), 2);
    }

    #[test]
    fn first_import_gets_its_own_block() {
        let mut tree = SyntaxTree::parse("package p;\n\nclass A {}");
        let list = tree.import_list(tree.root()).unwrap();
        let import = create_import_from_text(&mut tree, "import java.util.List;").unwrap();
        tree.add(list, import).unwrap();
        assert_eq!(
            tree.text(tree.root()),
            "package p;\n\nimport java.util.List;\n\nclass A {}"
        );
        let second = create_import_from_text(&mut tree, "import java.util.Map;").unwrap();
        tree.add(list, second).unwrap();
        assert_eq!(
            tree.text(tree.root()),
            "package p;\n\nimport java.util.List;\nimport java.util.Map;\n\nclass A {}"
        );
    }
}
