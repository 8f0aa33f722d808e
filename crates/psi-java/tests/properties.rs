use pretty_assertions::assert_eq;
use proptest::prelude::*;
use psi_java::factory;
use psi_java::{NodeId, SyntaxKind, SyntaxTree};

const CORPUS: &str = r#"package com.example.shapes;

import java.util.List;
import static java.lang.Math.max;

/** Shapes. */
@SuppressWarnings("unchecked")
public abstract class Shape<T extends Comparable<T>> extends Base implements Cloneable, Runnable {
    private static final int SIDES = 0x1F, EDGES = 2;
    protected List<? super T> items;
    int[] grid = {1, 2, 3};

    static {
        init();
    }

    public abstract double area();

    public <R> R accept(Visitor<R> visitor, int... extra) throws IOException {
        outer:
        for (int i = 0; i < 10; i++) {
            if (i % 2 == 0) continue outer; else if (i > 5) break;
        }
        for (String s : names) {
            switch (s.length()) {
                case 0:
                    break;
                default:
                    return null;
            }
        }
        try (Reader r = open()) {
            synchronized (this) { items.clear(); }
        } catch (IOException e) {
            throw new RuntimeException(e);
        } finally {
            done = true;
        }
        int x = (int) (a + b * c), y = a > b ? a : b;
        assert x > 0 : "positive";
        Object o = new Object() { public String toString() { return "anon"; } };
        long[] arr = new long[3];
        arr[0] = -x << 2;
        do { x--; } while (x > 0);
        return visitor.visit(this, extra.length);
    }

    enum Color { RED, GREEN; Color() {} }

    @interface Marker { int value() default 1; }
}
"#;

fn all_nodes(tree: &SyntaxTree) -> Vec<NodeId> {
    tree.descendants(tree.root()).collect()
}

#[test]
fn corpus_round_trips() {
    let tree = SyntaxTree::parse(CORPUS);
    assert!(tree.parse_errors().is_empty(), "{:?}", tree.parse_errors());
    assert_eq!(tree.text(tree.root()), CORPUS);
}

#[test]
fn unique_roles_find_their_child() {
    let tree = SyntaxTree::parse(CORPUS);
    let mut checked = 0;
    for parent in all_nodes(&tree) {
        for &child in tree.children(parent) {
            let role = tree.role_of(parent, child);
            if !role.is_unique() {
                continue;
            }
            assert_eq!(
                tree.find_child_by_role(parent, role),
                Some(child),
                "{role:?} of {:?} in {:?} `{}`",
                tree.kind(child),
                tree.kind(parent),
                tree.text(parent)
            );
            checked += 1;
        }
    }
    assert!(checked > 100, "only {checked} unique roles seen");
}

#[derive(Debug, Clone)]
enum Op {
    Append,
    Prepend,
    InsertAfter(usize),
    InsertBefore(usize),
    Delete(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Append),
        Just(Op::Prepend),
        any::<usize>().prop_map(Op::InsertAfter),
        any::<usize>().prop_map(Op::InsertBefore),
        any::<usize>().prop_map(Op::Delete),
    ]
}

fn list_of(tree: &SyntaxTree, kind: SyntaxKind) -> NodeId {
    tree.descendants(tree.root())
        .find(|&n| tree.kind(n) == kind)
        .unwrap()
}

fn elements(tree: &SyntaxTree, list: NodeId, element: SyntaxKind) -> Vec<NodeId> {
    tree.children_of_kind(list, element).collect()
}

/// Kinds of the non-trivia children of `list`.
fn shape(tree: &SyntaxTree, list: NodeId) -> Vec<SyntaxKind> {
    tree.children(list)
        .iter()
        .filter(|&&c| !tree.is_trivia(c))
        .map(|&c| tree.kind(c))
        .collect()
}

fn expected_shape(
    n: usize,
    element: SyntaxKind,
    brackets: (SyntaxKind, SyntaxKind),
    optional: bool,
) -> Vec<SyntaxKind> {
    if n == 0 && optional {
        return Vec::new();
    }
    let mut kinds = vec![brackets.0];
    for i in 0..n {
        if i > 0 {
            kinds.push(SyntaxKind::Comma);
        }
        kinds.push(element);
    }
    kinds.push(brackets.1);
    kinds
}

fn apply(
    tree: &mut SyntaxTree,
    list: NodeId,
    element: SyntaxKind,
    op: &Op,
    fresh: &mut dyn FnMut(&mut SyntaxTree) -> NodeId,
) {
    let current = elements(tree, list, element);
    match *op {
        Op::Append => {
            let node = fresh(tree);
            tree.add(list, node).unwrap();
        }
        Op::Prepend => {
            let node = fresh(tree);
            tree.insert(list, node, node, None, false).unwrap();
        }
        Op::InsertAfter(i) if !current.is_empty() => {
            let node = fresh(tree);
            tree.add_after(list, node, current[i % current.len()]).unwrap();
        }
        Op::InsertBefore(i) if !current.is_empty() => {
            let node = fresh(tree);
            tree.add_before(list, node, current[i % current.len()]).unwrap();
        }
        Op::Delete(i) if !current.is_empty() => {
            tree.delete(current[i % current.len()]).unwrap();
        }
        _ => {}
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn parameter_lists_keep_one_comma_between_elements(ops in proptest::collection::vec(op(), 1..12)) {
        let mut tree = SyntaxTree::parse("class A { void m() {} }");
        let list = list_of(&tree, SyntaxKind::ParameterList);
        let mut counter = 0;
        let mut fresh = |tree: &mut SyntaxTree| {
            counter += 1;
            factory::create_parameter_from_text(tree, &format!("int p{counter}")).unwrap()
        };
        for op in &ops {
            apply(&mut tree, list, SyntaxKind::Parameter, op, &mut fresh);
            let n = elements(&tree, list, SyntaxKind::Parameter).len();
            prop_assert_eq!(
                shape(&tree, list),
                expected_shape(n, SyntaxKind::Parameter, (SyntaxKind::LParen, SyntaxKind::RParen), false)
            );
            let text = tree.text(tree.root());
            let reparsed = SyntaxTree::parse(&text);
            prop_assert!(reparsed.parse_errors().is_empty(), "{}", text);
            let reparsed_list = list_of(&reparsed, SyntaxKind::ParameterList);
            prop_assert_eq!(elements(&reparsed, reparsed_list, SyntaxKind::Parameter).len(), n);
        }
    }

    #[test]
    fn type_parameter_brackets_come_in_pairs(ops in proptest::collection::vec(op(), 1..12)) {
        let mut tree = SyntaxTree::parse("class A {}");
        let list = list_of(&tree, SyntaxKind::TypeParameterList);
        let mut counter = 0;
        let mut fresh = |tree: &mut SyntaxTree| {
            counter += 1;
            factory::create_type_parameter_from_text(tree, &format!("T{counter}")).unwrap()
        };
        for op in &ops {
            apply(&mut tree, list, SyntaxKind::TypeParameter, op, &mut fresh);
            let n = elements(&tree, list, SyntaxKind::TypeParameter).len();
            prop_assert_eq!(
                shape(&tree, list),
                expected_shape(n, SyntaxKind::TypeParameter, (SyntaxKind::Less, SyntaxKind::Greater), true)
            );
            let text = tree.text(tree.root());
            prop_assert!(SyntaxTree::parse(&text).parse_errors().is_empty(), "{}", text);
        }
    }

    #[test]
    fn arbitrary_text_round_trips(text in "[a-zA-Z0-9_ \n{}()\\[\\];,.=+\\-*/<>?:!&|\"'@]{0,80}") {
        let tree = SyntaxTree::parse(&text);
        prop_assert_eq!(tree.text(tree.root()), text);
    }
}

#[test]
fn default_anchor_lands_next_to_its_kind() {
    let mut tree = SyntaxTree::parse("enum E { A, B; void m() {} }");
    let class = tree.child_of_kind(tree.root(), SyntaxKind::Class).unwrap();
    let c = factory::create_enum_constant_from_text(&mut tree, "C").unwrap();
    tree.add(class, c).unwrap();
    assert_eq!(tree.text(tree.root()), "enum E { A, B, C; void m() {} }");

    let mut tree = SyntaxTree::parse("class A { void m() { f(a, b); } }");
    let list = list_of(&tree, SyntaxKind::ExpressionList);
    let arg = factory::create_expression_from_text(&mut tree, "c").unwrap();
    tree.add(list, arg).unwrap();
    assert_eq!(tree.text(list), "(a, b, c)");
}
