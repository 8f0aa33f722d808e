use pretty_assertions::assert_eq;
use psi_java::factory;
use psi_java::{
    ConstValue, EditError, JavaType, LazyJavaFile, NodeId, ResolvedElement, Role, SyntaxKind,
    SyntaxTree, TreeEvent,
};

fn first(tree: &SyntaxTree, kind: SyntaxKind) -> NodeId {
    tree.descendants(tree.root())
        .find(|&n| tree.kind(n) == kind)
        .unwrap_or_else(|| panic!("no {kind:?}"))
}

fn all(tree: &SyntaxTree, kind: SyntaxKind) -> Vec<NodeId> {
    tree.descendants(tree.root())
        .filter(|&n| tree.kind(n) == kind)
        .collect()
}

fn in_method(body: &str) -> SyntaxTree {
    SyntaxTree::parse(&format!("class A {{ void m() {{ {body} }} }}"))
}

#[test]
fn enum_body_gets_its_delimiter() {
    let mut tree = SyntaxTree::parse("enum E { A, B }");
    let class = first(&tree, SyntaxKind::Class);
    let method = factory::create_member_from_text(&mut tree, "void m() {}").unwrap();
    tree.add(class, method).unwrap();
    assert_eq!(tree.text(tree.root()), "enum E { A, B; void m() {} }");
}

#[test]
fn binary_expressions_are_typed() {
    let tree = SyntaxTree::parse(
        "class A { void m(int i, long l, String s) { Object a = i + l; Object b = s + i; } }",
    );
    let sums = all(&tree, SyntaxKind::BinaryExpression);
    assert_eq!(
        tree.expression_type(sums[0]),
        Some(JavaType::Primitive(psi_java::PrimitiveType::Long))
    );
    assert_eq!(tree.expression_type(sums[1]), Some(JavaType::string()));
}

#[test]
fn break_targets_stop_at_class_boundaries() {
    let tree = in_method("for (;;) { break; }");
    let jump = first(&tree, SyntaxKind::BreakStatement);
    assert_eq!(tree.exited_statement(jump), Some(first(&tree, SyntaxKind::ForStatement)));

    let tree = in_method("for (;;) { class X { void m() { break; } } }");
    let jump = first(&tree, SyntaxKind::BreakStatement);
    assert_eq!(tree.exited_statement(jump), None);
}

#[test]
fn integer_overflow_depends_on_the_minus() {
    let mut tree = SyntaxTree::parse("");
    let standalone = factory::create_expression_from_text(&mut tree, "2147483648").unwrap();
    assert_eq!(tree.literal_value(standalone), None);
    assert_eq!(
        tree.literal_parsing_error(standalone).as_deref(),
        Some("Integer number too large")
    );

    let negated = factory::create_expression_from_text(&mut tree, "-2147483648").unwrap();
    let literal = tree
        .descendants(negated)
        .find(|&n| tree.kind(n) == SyntaxKind::LiteralExpression)
        .unwrap();
    assert_eq!(tree.literal_value(literal), Some(ConstValue::Int(i32::MIN)));
    assert_eq!(tree.literal_parsing_error(literal), None);
    assert_eq!(tree.compute_constant(negated), Some(ConstValue::Int(i32::MIN)));
}

#[test]
fn multi_variable_declarations_shrink_cleanly() {
    for (victim, expected) in [(1, "int a, c;"), (2, "int a, b;"), (0, "int b, c;")] {
        let mut tree = in_method("int a, b, c;");
        let vars = all(&tree, SyntaxKind::LocalVariable);
        tree.delete(vars[victim]).unwrap();
        let statement = first(&tree, SyntaxKind::DeclarationStatement);
        assert_eq!(tree.text(statement), expected);
        let remaining = all(&tree, SyntaxKind::LocalVariable);
        assert_eq!(remaining.len(), 2);
        for var in remaining {
            assert_eq!(tree.text(tree.variable_type(var).unwrap()), "int");
        }
    }
}

#[test]
fn illegal_edits_are_reported() {
    let mut tree = SyntaxTree::parse("class A { void m(int a) {} } class B {}");
    let classes = all(&tree, SyntaxKind::Class);
    let param = first(&tree, SyntaxKind::Parameter);
    assert!(matches!(
        tree.delete_child(classes[1], param),
        Err(EditError::NotAChild { .. })
    ));

    let statement = factory::create_statement_from_text(&mut tree, "x++;").unwrap();
    let list = first(&tree, SyntaxKind::ParameterList);
    assert!(matches!(
        tree.add(list, statement),
        Err(EditError::NotAccepted { .. })
    ));
    assert_eq!(tree.text(tree.root()), "class A { void m(int a) {} } class B {}");

    let statement = factory::create_statement_from_text(&mut tree, "y--;").unwrap();
    assert!(matches!(
        tree.replace(param, statement),
        Err(EditError::NotAccepted {
            parent: SyntaxKind::ParameterList,
            child: SyntaxKind::ExpressionStatement,
        })
    ));
    assert_eq!(tree.text(tree.root()), "class A { void m(int a) {} } class B {}");
    assert_eq!(tree.parent(param), Some(list));
}

#[test]
fn replaced_children_keep_their_slot() {
    let mut tree = in_method("if (a) x(); int v = i + j;");
    let stmt = first(&tree, SyntaxKind::IfStatement);
    let condition = tree.find_child_by_role(stmt, Role::Condition).unwrap();
    let fresh = factory::create_expression_from_text(&mut tree, "b > 0").unwrap();
    assert_eq!(tree.replace(condition, fresh), Ok(fresh));
    assert_eq!(tree.text(stmt), "if (b > 0) x();");
    assert_eq!(tree.role_of(stmt, fresh), Role::Condition);
    assert_eq!(tree.find_child_by_role(stmt, Role::Condition), Some(fresh));

    let sum = all(&tree, SyntaxKind::BinaryExpression)
        .into_iter()
        .find(|&n| tree.text(n) == "i + j")
        .unwrap();
    let right = tree.find_child_by_role(sum, Role::ROperand).unwrap();
    let fresh = factory::create_expression_from_text(&mut tree, "k").unwrap();
    tree.replace(right, fresh).unwrap();
    assert_eq!(tree.text(sum), "i + k");
    assert_eq!(tree.role_of(sum, fresh), Role::ROperand);
    assert_eq!(tree.find_child_by_role(sum, Role::ROperand), Some(fresh));
    assert_eq!(
        tree.find_child_by_role(sum, Role::LOperand).map(|n| tree.text(n)),
        Some("i".to_string())
    );
}

#[test]
fn listeners_see_every_structural_change() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let mut tree = in_method("int a, b;");
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    tree.add_listener(move |event: &TreeEvent| sink.borrow_mut().push(event.clone()));
    let b = all(&tree, SyntaxKind::LocalVariable)[1];
    tree.delete(b).unwrap();
    assert!(!seen.borrow().is_empty());
}

#[test]
fn resolution_prefers_variables_over_classes() {
    let tree = SyntaxTree::parse(
        "class A { static class B {} void m() { int B = 1; int v = B; Object o = java; } }",
    );
    let uses: Vec<NodeId> = all(&tree, SyntaxKind::ReferenceExpression);
    let local = all(&tree, SyntaxKind::LocalVariable)[0];
    assert_eq!(tree.resolve(uses[0]), Some(ResolvedElement::Variable(local)));
    assert_eq!(
        tree.resolve(uses[1]),
        Some(ResolvedElement::Package("java".to_string()))
    );
}

#[test]
fn lazy_file_materializes_on_demand() {
    let file = LazyJavaFile::parse("package p;\nclass A { int x = 1 + 2; }\n");
    assert_eq!(file.package_name(), "p");
    assert!(!file.is_materialized());
    let tree = file.tree();
    let sum = first(tree, SyntaxKind::BinaryExpression);
    assert_eq!(tree.compute_constant(sum), Some(ConstValue::Int(3)));
    assert!(file.is_materialized());
}
