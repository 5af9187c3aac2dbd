// ABOUTME: Scanner module turning source text into a token sequence

use crate::error::Diagnostics;
use crate::token::{keyword_kind, Token, TokenKind};
use crate::value::Value;

pub struct Scanner<'a> {
    source: &'a [u8],
    start: usize,
    current: usize,
    line: usize,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner {
            source: source.as_bytes(),
            start: 0,
            current: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    /// Consumes the source, emitting tokens terminated by exactly one `EndOfFile`.
    pub fn scan_tokens(mut self, diagnostics: &mut Diagnostics) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token(diagnostics);
        }

        self.tokens
            .push(Token::new(TokenKind::EndOfFile, "", None, self.line));
        self.tokens
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current] as char;
        self.current += 1;
        c
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.source[self.current] as char
        }
    }

    fn peek_next(&self) -> char {
        if self.current + 1 >= self.source.len() {
            '\0'
        } else {
            self.source[self.current + 1] as char
        }
    }

    fn matches(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.source[self.current] as char != expected {
            return false;
        }
        self.current += 1;
        true
    }

    fn lexeme(&self) -> String {
        String::from_utf8_lossy(&self.source[self.start..self.current]).into_owned()
    }

    fn add_token(&mut self, kind: TokenKind) {
        self.add_token_with_literal(kind, None);
    }

    fn add_token_with_literal(&mut self, kind: TokenKind, literal: Option<Value>) {
        let lexeme = self.lexeme();
        self.tokens.push(Token::new(kind, lexeme, literal, self.line));
    }

    fn scan_token(&mut self, diagnostics: &mut Diagnostics) {
        use TokenKind::*;

        let c = self.advance();
        match c {
            '(' => self.add_token(LeftParen),
            ')' => self.add_token(RightParen),
            '{' => self.add_token(LeftBrace),
            '}' => self.add_token(RightBrace),
            ',' => self.add_token(Comma),
            '.' => self.add_token(Dot),
            '-' => self.add_token(Minus),
            '+' => self.add_token(Plus),
            ';' => self.add_token(SemiColon),
            '*' => self.add_token(Star),
            '!' => {
                let kind = if self.matches('=') { BangEqual } else { Bang };
                self.add_token(kind);
            }
            '=' => {
                let kind = if self.matches('=') { EqualEqual } else { Equal };
                self.add_token(kind);
            }
            '<' => {
                let kind = if self.matches('=') { LessEqual } else { Less };
                self.add_token(kind);
            }
            '>' => {
                let kind = if self.matches('=') { GreaterEqual } else { Greater };
                self.add_token(kind);
            }
            '/' => {
                if self.matches('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(Slash);
                }
            }
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,
            '"' => self.string(diagnostics),
            c if c.is_ascii_digit() => self.number(),
            c if c.is_alphabetic() || c == '_' => self.identifier(),
            _ => diagnostics.error(self.line, "Unexpected character."),
        }
    }

    fn string(&mut self, diagnostics: &mut Diagnostics) {
        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            diagnostics.error(self.line, "Unterminated string.");
            return;
        }

        // Consume the closing quote.
        self.advance();

        let value = String::from_utf8_lossy(&self.source[self.start + 1..self.current - 1]).into_owned();
        self.add_token_with_literal(TokenKind::String, Some(Value::String(value)));
    }

    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let text = self.lexeme();
        let value: f64 = text.parse().expect("scanner only admits valid number lexemes");
        self.add_token_with_literal(TokenKind::Number, Some(Value::Number(value)));
    }

    fn identifier(&mut self) {
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let text = self.lexeme();
        let kind = keyword_kind(&text).unwrap_or(TokenKind::Identifier);
        self.add_token(kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(src: &str) -> (Vec<Token>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new(src).scan_tokens(&mut diagnostics);
        (tokens, diagnostics)
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_ends_with_single_eof() {
        let (tokens, _) = scan("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::EndOfFile);
    }

    #[test]
    fn test_single_char_tokens_distinguish_braces() {
        let (tokens, _) = scan("(){}");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_two_char_operators_max_munch() {
        let (tokens, _) = scan("! != = == < <= > >=");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Bang,
                TokenKind::BangEqual,
                TokenKind::Equal,
                TokenKind::EqualEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_line_comment_skipped() {
        let (tokens, _) = scan("1 // this is a comment\n2");
        assert_eq!(kinds(&tokens), vec![TokenKind::Number, TokenKind::Number, TokenKind::EndOfFile]);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_string_literal() {
        let (tokens, _) = scan(r#""hello world""#);
        match &tokens[0].literal {
            Some(Value::String(s)) => assert_eq!(s, "hello world"),
            other => panic!("expected string literal, got {:?}", other),
        }
    }

    #[test]
    fn test_multiline_string_tracks_line() {
        let (tokens, _) = scan("\"line1\nline2\"\n1");
        assert_eq!(tokens[1].line, 3);
    }

    #[test]
    fn test_unterminated_string_reports_error() {
        let (_, diagnostics) = scan("\"unterminated");
        assert!(diagnostics.had_error);
    }

    #[test]
    fn test_number_literal() {
        let (tokens, _) = scan("123.456");
        match &tokens[0].literal {
            Some(Value::Number(n)) => assert!((n - 123.456).abs() < 1e-9),
            other => panic!("expected number literal, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_dot_not_consumed() {
        let (tokens, _) = scan("42.");
        assert_eq!(kinds(&tokens), vec![TokenKind::Number, TokenKind::Dot, TokenKind::EndOfFile]);
    }

    #[test]
    fn test_identifier_vs_keyword() {
        let (tokens, _) = scan("foo and bar");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Identifier, TokenKind::And, TokenKind::Identifier, TokenKind::EndOfFile]
        );
    }

    #[test]
    fn test_unexpected_character_reports_error_and_continues() {
        let (tokens, diagnostics) = scan("1 @ 2");
        assert!(diagnostics.had_error);
        assert_eq!(kinds(&tokens), vec![TokenKind::Number, TokenKind::Number, TokenKind::EndOfFile]);
    }

    #[test]
    fn test_whitespace_skipped_and_lines_counted() {
        let (tokens, _) = scan("1\n2\n3");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[2].line, 3);
    }
}
