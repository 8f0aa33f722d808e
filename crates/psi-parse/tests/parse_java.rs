use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use psi_parse::{debug_dump, parse_fragment, parse_java, FragmentKind};
use psi_syntax::SyntaxKind;

const CORPUS: &str = r#"package com.example.shapes;

import java.util.*;
import java.util.List;
import static java.lang.Math.max;

/**
 * Shapes.
 */
@SuppressWarnings({"unchecked", "rawtypes"})
public abstract class Shape<T extends Comparable<T> & java.io.Serializable> extends Base implements Cloneable, Runnable {
    private static final int SIDES = 0x1F, EDGES[] = {1, 2,};
    protected List<? super T> items = new ArrayList<>();

    static {
        System.out.println("init");
    }

    /** Area. */
    public abstract double area();

    @Override
    public <R> R accept(Visitor<R> visitor, int... extra) throws IOException, RuntimeException {
        outer:
        for (int i = 0, j = 10; i < j; i++, j--) {
            if (i % 2 == 0) continue outer; else if (i > 5) break;
        }
        for (String s : names) {
            switch (s.length()) {
                case 0:
                case 1: break;
                default: return null;
            }
        }
        try (Reader r = open(); Writer w = create()) {
            synchronized (this) { items.clear(); }
        } catch (IOException | IllegalStateException e) {
            throw new RuntimeException(e);
        } finally {
            assert items != null : "items";
        }
        int x = (int) 3.5f + -SIDES >>> 2;
        x >>= 1;
        long mask = ~0L << 3 >> 1;
        boolean b = this instanceof Cloneable && !false || x >= 3 ? true : false;
        Object o = new Object() {
            @Override public String toString() { return Shape.this.toString() + int[].class; }
        };
        char c = '\n';
        do { x--; } while (x > 0);
        while (true) ;
    }

    enum Color { RED, GREEN("g") { void m() {} }, BLUE; Color() {} Color(String s) {} void m() {} }

    @interface Marker { String value() default "x"; int[] ids() default {}; }
}

interface Visitor<R> extends java.util.EventListener {
    R visit(Shape<?> shape);
}
"#;

#[test]
fn corpus_round_trips_without_errors() {
    let parse = parse_java(CORPUS);
    assert!(parse.errors.is_empty(), "{:#?}", parse.errors);
    assert_eq!(parse.syntax().to_string(), CORPUS);
}

#[test]
fn doc_comment_is_first_child_of_its_declaration() {
    let parse = parse_java(CORPUS);
    let method = parse
        .syntax()
        .descendants()
        .find(|n| n.kind() == SyntaxKind::Method && n.to_string().contains("area"))
        .unwrap();
    let first = method.first_child_or_token().unwrap();
    assert_eq!(first.kind(), SyntaxKind::DocComment);
}

#[test]
fn field_group_shares_leading_type() {
    let parse = parse_java("class A { int a = 1, b; }");
    let class = parse.syntax().children().find(|n| n.kind() == SyntaxKind::Class).unwrap();
    let fields: Vec<_> = class
        .children()
        .filter(|n| n.kind() == SyntaxKind::Field)
        .map(|n| n.to_string())
        .collect();
    assert_eq!(fields, vec!["int a = 1", "b;"]);
}

#[test]
fn enum_constants_and_delimiter() {
    let parse = parse_java("enum E { A, B; void m() {} }");
    assert!(parse.errors.is_empty(), "{:?}", parse.errors);
    let class = parse.syntax().children().find(|n| n.kind() == SyntaxKind::Class).unwrap();
    let kinds: Vec<_> = class.children().map(|n| n.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::ModifierList,
            SyntaxKind::ImplementsList,
            SyntaxKind::EnumConstant,
            SyntaxKind::EnumConstant,
            SyntaxKind::Method,
        ]
    );
}

#[test]
fn broken_input_is_still_lossless() {
    let text = "class A { void m( { int = ; } } }} @";
    let parse = parse_java(text);
    assert!(!parse.errors.is_empty());
    assert_eq!(parse.syntax().to_string(), text);
}

#[test]
fn trailing_fragment_garbage_is_wrapped() {
    let parse = parse_fragment("a + b )", FragmentKind::Expression);
    assert_eq!(parse.errors.len(), 1);
    let last = parse.syntax().last_child().unwrap();
    assert_eq!(last.kind(), SyntaxKind::ErrorElement);
}

#[test]
fn binary_expression_dump() {
    let parse = parse_fragment("a + 1", FragmentKind::Expression);
    assert_snapshot!(debug_dump(&parse.syntax()), @r###"
DummyHolder@0..5
  BinaryExpression@0..5
    ReferenceExpression@0..1
      ReferenceParameterList@0..0
      Identifier@0..1 "a"
    Whitespace@1..2 " "
    Plus@2..3 "+"
    Whitespace@3..4 " "
    LiteralExpression@4..5
      IntegerLiteral@4..5 "1"
"###);
}

fn fragment() -> impl Strategy<Value = String> {
    const PIECES: &[&str] = &[
        "class", "A", "{", "}", "(", ")", "<", ">", ">>", ">=", ";", ",", "int", "x", "=", "+",
        "new", "[", "]", ".", "@", "enum", "if", "else", "\"s\"", "'c'", "1L", "0x1F", " ",
        "\n", "/* c */", "// c\n", "/** d */", "?", ":", "&", "|", "...", "->", "for", "try",
    ];
    proptest::sample::select(PIECES).prop_map(ToString::to_string)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn arbitrary_token_soup_round_trips(pieces in proptest::collection::vec(fragment(), 0..64)) {
        let text: String = pieces.concat();
        let parse = parse_java(&text);
        prop_assert_eq!(parse.syntax().to_string(), text);
    }
}
