//! Token-level lookahead used to disambiguate declarations from expressions.
//!
//! All helpers take an index into the token queue and return the index just
//! past the construct they skipped, or `None` if the tokens cannot form it.

use std::collections::VecDeque;

use psi_syntax::{tables, SyntaxKind, Token};

use crate::parser::{kind_at, skip_trivia};

pub(crate) fn skip_modifiers(tokens: &VecDeque<Token>, mut idx: usize) -> usize {
    loop {
        let i = skip_trivia(tokens, idx);
        let kind = kind_at(tokens, i);
        if tables::MODIFIER_KEYWORDS.contains(kind) {
            idx = i + 1;
            continue;
        }
        if kind == SyntaxKind::At && kind_at(tokens, skip_trivia(tokens, i + 1)) != SyntaxKind::InterfaceKw {
            match skip_annotation(tokens, i) {
                Some(next) => {
                    idx = next;
                    continue;
                }
                None => return i,
            }
        }
        return i;
    }
}

fn skip_annotation(tokens: &VecDeque<Token>, idx: usize) -> Option<usize> {
    let mut i = skip_qualified_name(tokens, idx + 1)?;
    let next = skip_trivia(tokens, i);
    if kind_at(tokens, next) == SyntaxKind::LParen {
        i = skip_balanced(tokens, next, SyntaxKind::LParen, SyntaxKind::RParen)?;
    }
    Some(i)
}

fn skip_qualified_name(tokens: &VecDeque<Token>, idx: usize) -> Option<usize> {
    let mut i = skip_trivia(tokens, idx);
    if kind_at(tokens, i) != SyntaxKind::Identifier {
        return None;
    }
    i += 1;
    loop {
        let dot = skip_trivia(tokens, i);
        if kind_at(tokens, dot) != SyntaxKind::Dot {
            return Some(i);
        }
        let seg = skip_trivia(tokens, dot + 1);
        if kind_at(tokens, seg) != SyntaxKind::Identifier {
            return Some(i);
        }
        i = seg + 1;
    }
}

pub(crate) fn skip_balanced(
    tokens: &VecDeque<Token>,
    idx: usize,
    open: SyntaxKind,
    close: SyntaxKind,
) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = idx;
    while i < tokens.len() {
        let kind = tokens[i].kind;
        if kind == open {
            depth += 1;
        } else if kind == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(i + 1);
            }
        }
        i += 1;
    }
    None
}

/// Skip a type: primitive or qualified reference with type arguments, then
/// array dimensions and an optional `...`.
pub(crate) fn skip_type(tokens: &VecDeque<Token>, idx: usize) -> Option<usize> {
    let mut i = skip_trivia(tokens, idx);
    let first = kind_at(tokens, i);
    if tables::PRIMITIVE_TYPE_KEYWORDS.contains(first) {
        i += 1;
    } else if first == SyntaxKind::Identifier {
        i += 1;
        loop {
            let next = skip_trivia(tokens, i);
            match kind_at(tokens, next) {
                SyntaxKind::Less => i = skip_type_arguments(tokens, next)?,
                SyntaxKind::Dot
                    if kind_at(tokens, skip_trivia(tokens, next + 1)) == SyntaxKind::Identifier =>
                {
                    i = skip_trivia(tokens, next + 1) + 1;
                }
                _ => break,
            }
        }
    } else {
        return None;
    }

    loop {
        let open = skip_trivia(tokens, i);
        if kind_at(tokens, open) != SyntaxKind::LBracket {
            break;
        }
        let close = skip_trivia(tokens, open + 1);
        if kind_at(tokens, close) != SyntaxKind::RBracket {
            break;
        }
        i = close + 1;
    }

    let ellipsis = skip_trivia(tokens, i);
    if kind_at(tokens, ellipsis) == SyntaxKind::Ellipsis {
        i = ellipsis + 1;
    }
    Some(i)
}

/// Skip `<...>` made only of tokens that may appear inside type arguments.
pub(crate) fn skip_type_arguments(tokens: &VecDeque<Token>, idx: usize) -> Option<usize> {
    let mut depth = 0i32;
    let mut i = idx;
    while i < tokens.len() {
        let kind = tokens[i].kind;
        match kind {
            SyntaxKind::Less => depth += 1,
            SyntaxKind::Greater | SyntaxKind::GreaterEq => depth -= 1,
            SyntaxKind::Identifier
            | SyntaxKind::Dot
            | SyntaxKind::Comma
            | SyntaxKind::Question
            | SyntaxKind::Amp
            | SyntaxKind::LBracket
            | SyntaxKind::RBracket
            | SyntaxKind::ExtendsKw
            | SyntaxKind::SuperKw
            | SyntaxKind::At => {}
            _ if kind.is_trivia() || tables::PRIMITIVE_TYPE_KEYWORDS.contains(kind) => {}
            _ => return None,
        }
        i += 1;
        if depth == 0 {
            return Some(i);
        }
    }
    None
}

/// `[modifiers] Type Identifier` followed by one of `follow`.
pub(crate) fn at_typed_declaration(tokens: &VecDeque<Token>, follow: &[SyntaxKind]) -> bool {
    let i = skip_modifiers(tokens, 0);
    let Some(after_type) = skip_type(tokens, i) else {
        return false;
    };
    let name = skip_trivia(tokens, after_type);
    if kind_at(tokens, name) != SyntaxKind::Identifier {
        return false;
    }
    follow.is_empty() || follow.contains(&kind_at(tokens, skip_trivia(tokens, name + 1)))
}

pub(crate) fn at_local_class(tokens: &VecDeque<Token>) -> bool {
    let i = skip_modifiers(tokens, 0);
    tables::CLASS_KEYWORDS.contains(kind_at(tokens, i))
}

/// Method or constructor header ahead (after modifiers and type parameters).
pub(crate) fn at_method_header(tokens: &VecDeque<Token>) -> bool {
    let i = skip_trivia(tokens, 0);
    if kind_at(tokens, i) == SyntaxKind::Identifier
        && kind_at(tokens, skip_trivia(tokens, i + 1)) == SyntaxKind::LParen
    {
        return true;
    }
    let Some(after_type) = skip_type(tokens, i) else {
        return false;
    };
    let name = skip_trivia(tokens, after_type);
    kind_at(tokens, name) == SyntaxKind::Identifier
        && kind_at(tokens, skip_trivia(tokens, name + 1)) == SyntaxKind::LParen
}

/// `( Type )` followed by something that can only be a cast operand.
pub(crate) fn at_cast(tokens: &VecDeque<Token>) -> bool {
    let open = skip_trivia(tokens, 0);
    if kind_at(tokens, open) != SyntaxKind::LParen {
        return false;
    }
    let first = kind_at(tokens, skip_trivia(tokens, open + 1));
    let primitive = tables::PRIMITIVE_TYPE_KEYWORDS.contains(first);
    let Some(after_type) = skip_type(tokens, open + 1) else {
        return false;
    };
    let close = skip_trivia(tokens, after_type);
    if kind_at(tokens, close) != SyntaxKind::RParen {
        return false;
    }
    if primitive {
        return true;
    }
    let next = kind_at(tokens, skip_trivia(tokens, close + 1));
    matches!(
        next,
        SyntaxKind::Identifier
            | SyntaxKind::LParen
            | SyntaxKind::Bang
            | SyntaxKind::Tilde
            | SyntaxKind::ThisKw
            | SyntaxKind::SuperKw
            | SyntaxKind::NewKw
    ) || tables::LITERAL_TOKENS.contains(next)
        || tables::PRIMITIVE_TYPE_KEYWORDS.contains(next)
}

/// `Name(.Name)*` followed by `.this`, `.super` or `([])*.class`.
pub(crate) fn qualified_name_suffix(tokens: &VecDeque<Token>) -> Option<SyntaxKind> {
    let start = skip_trivia(tokens, 0);
    let end = skip_qualified_name(tokens, start)?;
    let mut i = skip_trivia(tokens, end);
    let mut dims = false;
    while kind_at(tokens, i) == SyntaxKind::LBracket
        && kind_at(tokens, skip_trivia(tokens, i + 1)) == SyntaxKind::RBracket
    {
        dims = true;
        i = skip_trivia(tokens, skip_trivia(tokens, i + 1) + 1);
    }
    if kind_at(tokens, i) != SyntaxKind::Dot {
        return None;
    }
    match kind_at(tokens, skip_trivia(tokens, i + 1)) {
        SyntaxKind::ClassKw => Some(SyntaxKind::ClassKw),
        kind @ (SyntaxKind::ThisKw | SyntaxKind::SuperKw) if !dims => Some(kind),
        _ => None,
    }
}

/// `[annotations] Identifier` followed by a token that can end an enum constant.
pub(crate) fn at_enum_constant(tokens: &VecDeque<Token>) -> bool {
    let i = skip_modifiers(tokens, 0);
    if kind_at(tokens, i) != SyntaxKind::Identifier {
        return false;
    }
    matches!(
        kind_at(tokens, skip_trivia(tokens, i + 1)),
        SyntaxKind::Comma
            | SyntaxKind::Semicolon
            | SyntaxKind::LParen
            | SyntaxKind::LBrace
            | SyntaxKind::RBrace
            | SyntaxKind::Eof
    )
}
