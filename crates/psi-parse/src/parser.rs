use std::collections::VecDeque;

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder};
use psi_syntax::{lex, SyntaxKind, SyntaxNode, TextRange, TextSize, Token};

use crate::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<ParseError>,
}

impl Parse {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }
}

/// The construct a fragment parse expects to find in its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    Expression,
    Statement,
    CodeBlock,
    /// One or more class members (fields, methods, initializers, nested types).
    Member,
    EnumConstant,
    Type,
    Reference,
    Annotation,
    Parameter,
    TypeParameter,
    Import,
}

/// Parse a complete compilation unit. The root is a [`SyntaxKind::JavaFile`].
pub fn parse_java(input: &str) -> Parse {
    let mut p = Parser::new(input);
    p.builder.start_node(SyntaxKind::JavaFile.into());
    p.file_contents();
    p.finish()
}

/// Parse a fragment. The root is a [`SyntaxKind::DummyHolder`] holding the
/// parsed construct plus surrounding trivia; trailing garbage is wrapped in an
/// [`SyntaxKind::ErrorElement`].
pub fn parse_fragment(input: &str, kind: FragmentKind) -> Parse {
    let mut p = Parser::new(input);
    p.builder.start_node(SyntaxKind::DummyHolder.into());
    match kind {
        FragmentKind::Expression => {
            p.expression(0);
        }
        FragmentKind::Statement => p.statement(),
        FragmentKind::CodeBlock => p.code_block(),
        FragmentKind::Member => {
            while !p.at(SyntaxKind::Eof) && !p.at(SyntaxKind::RBrace) {
                p.member(false);
            }
        }
        FragmentKind::EnumConstant => p.enum_constant(),
        FragmentKind::Type => p.type_element(true),
        FragmentKind::Reference => p.code_reference(true),
        FragmentKind::Annotation => p.annotation(),
        FragmentKind::Parameter => p.parameter(),
        FragmentKind::TypeParameter => p.type_parameter(),
        FragmentKind::Import => p.import_statement(),
    }
    if !p.at(SyntaxKind::Eof) {
        p.builder.start_node(SyntaxKind::ErrorElement.into());
        p.error_here("unexpected tokens after fragment");
        while !p.at(SyntaxKind::Eof) {
            p.bump_any();
        }
        p.builder.finish_node();
    }
    p.finish()
}

pub(crate) struct Parser<'a> {
    input: &'a str,
    tokens: VecDeque<Token>,
    pub(crate) builder: GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            tokens: VecDeque::from(lex(input)),
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(mut self) -> Parse {
        self.eat_trivia();
        self.builder.finish_node();
        tracing::trace!(errors = self.errors.len(), "parsed java source");
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    pub(crate) fn checkpoint(&mut self) -> Checkpoint {
        self.eat_trivia();
        self.builder.checkpoint()
    }

    /// Like [`Parser::checkpoint`], but leaves a doc comment directly ahead of
    /// a declaration unconsumed so that it becomes the declaration's first child.
    pub(crate) fn declaration_checkpoint(&mut self) -> Checkpoint {
        let run = self.tokens.iter().take_while(|t| t.kind.is_trivia()).count();
        let doc = self
            .tokens
            .iter()
            .take(run)
            .rposition(|t| t.kind == SyntaxKind::DocComment);
        match doc {
            Some(doc) => {
                for _ in 0..doc {
                    self.bump_any();
                }
            }
            None => self.eat_trivia(),
        }
        self.builder.checkpoint()
    }

    /// Open a node after the pending trivia, which stays with the parent.
    pub(crate) fn start(&mut self, kind: SyntaxKind) {
        self.eat_trivia();
        self.builder.start_node(kind.into());
    }

    pub(crate) fn start_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    pub(crate) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    /// Emit an empty composite node.
    pub(crate) fn empty_node(&mut self, kind: SyntaxKind) {
        self.eat_trivia();
        self.builder.start_node(kind.into());
        self.builder.finish_node();
    }

    pub(crate) fn current(&mut self) -> SyntaxKind {
        self.eat_trivia();
        self.tokens.front().map(|t| t.kind).unwrap_or(SyntaxKind::Eof)
    }

    /// Kind of the `n`-th non-trivia token ahead, without consuming anything.
    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_index(n)
            .and_then(|idx| self.tokens.get(idx))
            .map_or(SyntaxKind::Eof, |t| t.kind)
    }

    fn nth_index(&self, n: usize) -> Option<usize> {
        let mut idx = skip_trivia(&self.tokens, 0);
        for _ in 0..n {
            if idx >= self.tokens.len() {
                return None;
            }
            idx = skip_trivia(&self.tokens, idx + 1);
        }
        (idx < self.tokens.len()).then_some(idx)
    }

    pub(crate) fn at(&mut self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn tokens(&self) -> &VecDeque<Token> {
        &self.tokens
    }

    pub(crate) fn eat_trivia(&mut self) {
        while self.tokens.front().map_or(false, |t| t.kind.is_trivia()) {
            self.bump_any();
        }
    }

    pub(crate) fn bump(&mut self) {
        self.eat_trivia();
        self.bump_any();
    }

    pub(crate) fn bump_any(&mut self) {
        if let Some(tok) = self.tokens.pop_front() {
            let text = tok.text(self.input);
            self.builder.token(tok.kind.into(), text);
        }
    }

    /// Consume `count` adjacent tokens and emit them as a single `kind` token.
    pub(crate) fn bump_joined(&mut self, kind: SyntaxKind, count: usize) {
        self.eat_trivia();
        let mut text = String::new();
        for _ in 0..count {
            if let Some(tok) = self.tokens.pop_front() {
                text.push_str(tok.text(self.input));
            }
        }
        self.builder.token(kind.into(), &text);
    }

    /// Split a leading `>=` into `>` followed by `=`.
    pub(crate) fn split_greater_eq(&mut self) {
        self.eat_trivia();
        let Some(tok) = self.tokens.front().copied() else {
            return;
        };
        if tok.kind != SyntaxKind::GreaterEq {
            return;
        }
        self.tokens.pop_front();
        let mid = tok.range.start() + TextSize::from(1);
        self.tokens.push_front(Token {
            kind: SyntaxKind::Eq,
            range: TextRange::new(mid, tok.range.end()),
        });
        self.tokens.push_front(Token {
            kind: SyntaxKind::Greater,
            range: TextRange::new(tok.range.start(), mid),
        });
    }

    /// `true` when the first `count` non-trivia tokens are directly adjacent.
    pub(crate) fn adjacent(&self, count: usize) -> bool {
        let start = skip_trivia(&self.tokens, 0);
        (start..start + count).collect::<Vec<_>>().windows(2).all(|w| {
            match (self.tokens.get(w[0]), self.tokens.get(w[1])) {
                (Some(a), Some(b)) => !b.kind.is_trivia() && a.range.end() == b.range.start(),
                _ => false,
            }
        })
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind, message: &str) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            self.error_here(message);
            false
        }
    }

    pub(crate) fn error_here(&mut self, message: &str) {
        let range = self.current_range();
        self.errors.push(ParseError {
            message: message.to_string(),
            range,
        });
    }

    fn current_range(&mut self) -> TextRange {
        self.eat_trivia();
        self.tokens.front().map(|t| t.range).unwrap_or_else(|| {
            let end = TextSize::from(self.input.len() as u32);
            TextRange::empty(end)
        })
    }

    /// Wrap the current token in an error node so that progress is guaranteed.
    pub(crate) fn error_token(&mut self, message: &str) {
        self.error_here(message);
        if self.at(SyntaxKind::Eof) {
            return;
        }
        self.start(SyntaxKind::ErrorElement);
        self.bump();
        self.finish_node();
    }

    pub(crate) fn recover_to(&mut self, recovery: &[SyntaxKind]) {
        while !self.at(SyntaxKind::Eof) {
            if recovery.contains(&self.current()) {
                break;
            }
            self.bump_any();
        }
    }
}

pub(crate) fn skip_trivia(tokens: &VecDeque<Token>, mut idx: usize) -> usize {
    while tokens.get(idx).map_or(false, |t| t.kind.is_trivia()) {
        idx += 1;
    }
    idx
}

pub(crate) fn kind_at(tokens: &VecDeque<Token>, idx: usize) -> SyntaxKind {
    tokens.get(idx).map_or(SyntaxKind::Eof, |t| t.kind)
}
