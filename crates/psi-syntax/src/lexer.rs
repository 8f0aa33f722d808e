use text_size::{TextRange, TextSize};

use crate::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub range: TextRange,
}

impl Token {
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        &input[self.range]
    }
}

/// Lex `input` into a lossless token stream.
///
/// Every byte of `input` is covered by exactly one token. Malformed literals
/// (unterminated strings, bad escapes) still produce a literal token; their
/// problems are reported later by the literal decoder. `>>`-style operators
/// are never produced here: the lexer emits a run of `>` (and a final `>=`)
/// so that nested type argument lists close naturally.
pub fn lex(input: &str) -> Vec<Token> {
    Lexer::new(input).collect()
}

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self, n: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + n).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn eat_while(&mut self, mut pred: impl FnMut(u8) -> bool) {
        while let Some(b) = self.peek(0) {
            if !pred(b) {
                break;
            }
            self.pos += 1;
        }
    }

    fn next_kind(&mut self) -> SyntaxKind {
        let Some(b) = self.peek(0) else {
            return SyntaxKind::Eof;
        };

        match b {
            b' ' | b'\t' | b'\n' | b'\r' | b'\x0C' => {
                self.eat_while(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0C'));
                SyntaxKind::Whitespace
            }
            b'/' if self.peek(1) == Some(b'/') => {
                self.eat_while(|b| b != b'\n' && b != b'\r');
                SyntaxKind::EndOfLineComment
            }
            b'/' if self.peek(1) == Some(b'*') => self.block_comment(),
            b'\'' => {
                self.quoted(b'\'');
                SyntaxKind::CharacterLiteral
            }
            b'"' => {
                self.quoted(b'"');
                SyntaxKind::StringLiteral
            }
            b'0'..=b'9' => self.number(),
            b'.' if self.peek(1).map_or(false, |b| b.is_ascii_digit()) => self.number(),
            _ if self.at_identifier_start() => {
                let start = self.pos;
                self.identifier();
                SyntaxKind::from_keyword(&self.input[start..self.pos]).unwrap_or(SyntaxKind::Identifier)
            }
            _ => self.punctuation(),
        }
    }

    fn block_comment(&mut self) -> SyntaxKind {
        // `/**/` is an empty C-style comment, not a doc comment.
        let doc = self.peek(2) == Some(b'*') && self.peek(3) != Some(b'/');
        self.pos += 2;
        loop {
            match self.peek(0) {
                None => break,
                Some(b'*') if self.peek(1) == Some(b'/') => {
                    self.pos += 2;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        if doc {
            SyntaxKind::DocComment
        } else {
            SyntaxKind::CStyleComment
        }
    }

    fn quoted(&mut self, quote: u8) {
        self.pos += 1;
        while let Some(b) = self.peek(0) {
            match b {
                b'\\' => {
                    self.pos += 1;
                    if matches!(self.peek(0), Some(b) if b != b'\n' && b != b'\r') {
                        self.advance_char();
                    }
                }
                b'\n' | b'\r' => return,
                _ if b == quote => {
                    self.pos += 1;
                    return;
                }
                _ => self.advance_char(),
            }
        }
    }

    fn advance_char(&mut self) {
        let len = self.peek_char().map_or(1, char::len_utf8);
        self.pos += len;
    }

    fn number(&mut self) -> SyntaxKind {
        let mut floating = false;

        if self.peek(0) == Some(b'0') && matches!(self.peek(1), Some(b'x' | b'X')) {
            self.pos += 2;
            self.eat_while(|b| b.is_ascii_hexdigit() || b == b'_');
            if self.peek(0) == Some(b'.') {
                floating = true;
                self.pos += 1;
                self.eat_while(|b| b.is_ascii_hexdigit() || b == b'_');
            }
            if matches!(self.peek(0), Some(b'p' | b'P')) {
                floating = true;
                self.exponent();
            }
        } else if self.peek(0) == Some(b'0') && matches!(self.peek(1), Some(b'b' | b'B')) {
            self.pos += 2;
            self.eat_while(|b| b == b'0' || b == b'1' || b == b'_');
        } else {
            self.eat_while(|b| b.is_ascii_digit() || b == b'_');
            if self.peek(0) == Some(b'.') && self.peek(1) != Some(b'.') {
                floating = true;
                self.pos += 1;
                self.eat_while(|b| b.is_ascii_digit() || b == b'_');
            }
            if matches!(self.peek(0), Some(b'e' | b'E')) {
                floating = true;
                self.exponent();
            }
        }

        match self.peek(0) {
            Some(b'f' | b'F') => {
                self.pos += 1;
                SyntaxKind::FloatLiteral
            }
            Some(b'd' | b'D') => {
                self.pos += 1;
                SyntaxKind::DoubleLiteral
            }
            Some(b'l' | b'L') if !floating => {
                self.pos += 1;
                SyntaxKind::LongLiteral
            }
            _ if floating => SyntaxKind::DoubleLiteral,
            _ => SyntaxKind::IntegerLiteral,
        }
    }

    fn exponent(&mut self) {
        self.pos += 1;
        if matches!(self.peek(0), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        self.eat_while(|b| b.is_ascii_digit() || b == b'_');
    }

    fn at_identifier_start(&self) -> bool {
        match self.peek_char() {
            Some(ch) => ch == '$' || ch == '_' || unicode_ident::is_xid_start(ch),
            None => false,
        }
    }

    fn identifier(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch == '$' || unicode_ident::is_xid_continue(ch) {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
    }

    fn punctuation(&mut self) -> SyntaxKind {
        let rest = &self.input.as_bytes()[self.pos..];
        let (kind, len) = match rest {
            [b'.', b'.', b'.', ..] => (SyntaxKind::Ellipsis, 3),
            [b'<', b'<', b'=', ..] => (SyntaxKind::LeftShiftEq, 3),
            [b'<', b'<', ..] => (SyntaxKind::LeftShift, 2),
            [b'<', b'=', ..] => (SyntaxKind::LessEq, 2),
            [b'>', b'=', ..] => (SyntaxKind::GreaterEq, 2),
            [b'=', b'=', ..] => (SyntaxKind::EqEq, 2),
            [b'!', b'=', ..] => (SyntaxKind::BangEq, 2),
            [b'&', b'&', ..] => (SyntaxKind::AmpAmp, 2),
            [b'&', b'=', ..] => (SyntaxKind::AmpEq, 2),
            [b'|', b'|', ..] => (SyntaxKind::PipePipe, 2),
            [b'|', b'=', ..] => (SyntaxKind::PipeEq, 2),
            [b'^', b'=', ..] => (SyntaxKind::CaretEq, 2),
            [b'+', b'+', ..] => (SyntaxKind::PlusPlus, 2),
            [b'-', b'-', ..] => (SyntaxKind::MinusMinus, 2),
            [b'+', b'=', ..] => (SyntaxKind::PlusEq, 2),
            [b'-', b'=', ..] => (SyntaxKind::MinusEq, 2),
            [b'*', b'=', ..] => (SyntaxKind::StarEq, 2),
            [b'/', b'=', ..] => (SyntaxKind::SlashEq, 2),
            [b'%', b'=', ..] => (SyntaxKind::PercentEq, 2),
            [b'(', ..] => (SyntaxKind::LParen, 1),
            [b')', ..] => (SyntaxKind::RParen, 1),
            [b'{', ..] => (SyntaxKind::LBrace, 1),
            [b'}', ..] => (SyntaxKind::RBrace, 1),
            [b'[', ..] => (SyntaxKind::LBracket, 1),
            [b']', ..] => (SyntaxKind::RBracket, 1),
            [b';', ..] => (SyntaxKind::Semicolon, 1),
            [b',', ..] => (SyntaxKind::Comma, 1),
            [b'.', ..] => (SyntaxKind::Dot, 1),
            [b'@', ..] => (SyntaxKind::At, 1),
            [b'?', ..] => (SyntaxKind::Question, 1),
            [b':', ..] => (SyntaxKind::Colon, 1),
            [b'+', ..] => (SyntaxKind::Plus, 1),
            [b'-', ..] => (SyntaxKind::Minus, 1),
            [b'*', ..] => (SyntaxKind::Star, 1),
            [b'/', ..] => (SyntaxKind::Slash, 1),
            [b'%', ..] => (SyntaxKind::Percent, 1),
            [b'~', ..] => (SyntaxKind::Tilde, 1),
            [b'!', ..] => (SyntaxKind::Bang, 1),
            [b'=', ..] => (SyntaxKind::Eq, 1),
            [b'<', ..] => (SyntaxKind::Less, 1),
            [b'>', ..] => (SyntaxKind::Greater, 1),
            [b'&', ..] => (SyntaxKind::Amp, 1),
            [b'|', ..] => (SyntaxKind::Pipe, 1),
            [b'^', ..] => (SyntaxKind::Caret, 1),
            _ => {
                self.advance_char();
                return SyntaxKind::BadCharacter;
            }
        };
        self.pos += len;
        kind
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.pos >= self.input.len() {
            return None;
        }
        let start = self.pos;
        let kind = self.next_kind();
        let range = TextRange::new(TextSize::from(start as u32), TextSize::from(self.pos as u32));
        Some(Token { kind, range })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<(SyntaxKind, &str)> {
        lex(input).into_iter().map(|t| (t.kind, t.text(input))).collect()
    }

    #[test]
    fn lexes_shift_as_greater_runs() {
        assert_eq!(
            kinds("a>>>=b"),
            vec![
                (SyntaxKind::Identifier, "a"),
                (SyntaxKind::Greater, ">"),
                (SyntaxKind::Greater, ">"),
                (SyntaxKind::GreaterEq, ">="),
                (SyntaxKind::Identifier, "b"),
            ]
        );
    }

    #[test]
    fn lexes_numbers() {
        assert_eq!(
            kinds("1 2L 3.0 4f .5 0x1p3 0b101 1e10 07"),
            vec![
                (SyntaxKind::IntegerLiteral, "1"),
                (SyntaxKind::Whitespace, " "),
                (SyntaxKind::LongLiteral, "2L"),
                (SyntaxKind::Whitespace, " "),
                (SyntaxKind::DoubleLiteral, "3.0"),
                (SyntaxKind::Whitespace, " "),
                (SyntaxKind::FloatLiteral, "4f"),
                (SyntaxKind::Whitespace, " "),
                (SyntaxKind::DoubleLiteral, ".5"),
                (SyntaxKind::Whitespace, " "),
                (SyntaxKind::DoubleLiteral, "0x1p3"),
                (SyntaxKind::Whitespace, " "),
                (SyntaxKind::IntegerLiteral, "0b101"),
                (SyntaxKind::Whitespace, " "),
                (SyntaxKind::DoubleLiteral, "1e10"),
                (SyntaxKind::Whitespace, " "),
                (SyntaxKind::IntegerLiteral, "07"),
            ]
        );
    }

    #[test]
    fn lexes_comments_and_literals() {
        assert_eq!(
            kinds("/** d */ /**/ // x\n'\\'' \"a\\\"b\""),
            vec![
                (SyntaxKind::DocComment, "/** d */"),
                (SyntaxKind::Whitespace, " "),
                (SyntaxKind::CStyleComment, "/**/"),
                (SyntaxKind::Whitespace, " "),
                (SyntaxKind::EndOfLineComment, "// x"),
                (SyntaxKind::Whitespace, "\n"),
                (SyntaxKind::CharacterLiteral, "'\\''"),
                (SyntaxKind::Whitespace, " "),
                (SyntaxKind::StringLiteral, "\"a\\\"b\""),
            ]
        );
    }

    #[test]
    fn unterminated_string_stops_at_line_end() {
        assert_eq!(
            kinds("\"abc\nx"),
            vec![
                (SyntaxKind::StringLiteral, "\"abc"),
                (SyntaxKind::Whitespace, "\n"),
                (SyntaxKind::Identifier, "x"),
            ]
        );
    }

    #[test]
    fn covers_every_byte() {
        let input = "class A { int x = 1 # 2; }";
        let total: u32 = lex(input).iter().map(|t| u32::from(t.range.len())).sum();
        assert_eq!(total as usize, input.len());
    }
}
