//! T-SQL tokenizer implementation.

use super::{Keyword, Span, Token, TokenKind};

/// Tokens of one input, with trivia split from significant tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    /// Significant tokens in source order.
    pub tokens: Vec<Token>,
    /// Whitespace and comment tokens in source order.
    pub whitespace: Vec<Token>,
}

impl TokenStream {
    /// Returns the first lexing error token, if any.
    #[must_use]
    pub fn first_error(&self) -> Option<&Token> {
        self.tokens
            .iter()
            .find(|token| matches!(token.kind, TokenKind::Error(_)))
    }
}

/// A lexer that tokenizes T-SQL input.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&predicate) {
            self.advance();
        }
    }

    /// Creates a token spanning from start to the current position.
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(
            kind,
            &self.input[self.start..self.pos],
            Span::new(self.start, self.pos),
        )
    }

    fn scan_whitespace(&mut self) -> Token {
        self.advance_while(char::is_whitespace);
        self.make_token(TokenKind::Whitespace)
    }

    /// Scans `-- ...` up to (not including) the newline.
    fn scan_line_comment(&mut self) -> Token {
        self.advance_while(|c| c != '\n');
        self.make_token(TokenKind::Comment)
    }

    /// Scans `/* ... */`.
    fn scan_block_comment(&mut self) -> Token {
        self.advance(); // *
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    return self.make_token(TokenKind::Comment);
                }
                Some(_) => {}
                None => {
                    return self.make_token(TokenKind::Error(String::from(
                        "Unterminated block comment",
                    )));
                }
            }
        }
    }

    /// Scans an identifier or keyword.
    fn scan_identifier(&mut self) -> Token {
        self.advance_while(|c| c.is_alphanumeric() || matches!(c, '_' | '#' | '$' | '@'));

        let text = &self.input[self.start..self.pos];
        Keyword::from_str(text).map_or_else(
            || self.make_token(TokenKind::Identifier(String::from(text))),
            |keyword| self.make_token(TokenKind::Keyword(keyword)),
        )
    }

    /// Scans a variable (`@name`, `@@name`); the leading `@` is consumed.
    fn scan_variable(&mut self) -> Token {
        if self.peek() == Some('@') {
            self.advance();
        }
        self.advance_while(|c| c.is_alphanumeric() || matches!(c, '_' | '#' | '$' | '@'));
        let text = &self.input[self.start..self.pos];
        if text.trim_start_matches('@').is_empty() {
            let message = String::from("Expected variable name after @");
            return self.make_token(TokenKind::Error(message));
        }
        self.make_token(TokenKind::Variable(String::from(text)))
    }

    /// Scans text enclosed by `close`, where a doubled `close` is an escape.
    /// The opening character must already be consumed.
    fn scan_enclosed(&mut self, close: char) -> Option<String> {
        let mut value = String::new();
        loop {
            match self.advance() {
                Some(c) if c == close => {
                    if self.peek() == Some(close) {
                        value.push(close);
                        self.advance();
                    } else {
                        return Some(value);
                    }
                }
                Some(c) => value.push(c),
                None => return None,
            }
        }
    }

    /// Scans a delimited identifier (`[name]` or `"name"`).
    fn scan_delimited_identifier(&mut self, close: char) -> Token {
        match self.scan_enclosed(close) {
            Some(name) => self.make_token(TokenKind::DelimitedIdentifier(name)),
            None => self.make_token(TokenKind::Error(String::from(
                "Unterminated delimited identifier",
            ))),
        }
    }

    /// Scans a string literal; `national` marks an `N'...'` prefix.
    fn scan_string(&mut self, national: bool) -> Token {
        match self.scan_enclosed('\'') {
            Some(value) if national => self.make_token(TokenKind::NationalString(value)),
            Some(value) => self.make_token(TokenKind::String(value)),
            None => self.make_token(TokenKind::Error(String::from(
                "Unterminated string literal",
            ))),
        }
    }

    /// Scans a number (integer or decimal).
    fn scan_number(&mut self) -> Token {
        let mut is_decimal = false;

        self.advance_while(|c| c.is_ascii_digit());

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_decimal = true;
            self.advance(); // consume .
            self.advance_while(|c| c.is_ascii_digit());
        }

        if self.peek().is_some_and(|c| c == 'e' || c == 'E')
            && self
                .peek_next()
                .is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-')
        {
            is_decimal = true;
            self.advance(); // consume e/E
            if self.peek().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            self.advance_while(|c| c.is_ascii_digit());
        }

        let text = self.input[self.start..self.pos].to_owned();

        if is_decimal {
            match text.parse::<f64>() {
                Ok(_) => self.make_token(TokenKind::Decimal(text)),
                Err(e) => self.make_token(TokenKind::Error(format!("Invalid number: {e}"))),
            }
        } else {
            // Digit runs past i64 are exact numerics, as in T-SQL.
            match text.parse::<i64>() {
                Ok(value) => self.make_token(TokenKind::Integer(value)),
                Err(_) => self.make_token(TokenKind::Decimal(text)),
            }
        }
    }

    /// Scans the next token, trivia included. Returns `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token> {
        self.start = self.pos;
        let c = self.advance()?;

        let token = match c {
            c if c.is_whitespace() => self.scan_whitespace(),
            '-' if self.peek() == Some('-') => self.scan_line_comment(),
            '/' if self.peek() == Some('*') => self.scan_block_comment(),

            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            '{' => self.make_token(TokenKind::LeftBrace),
            '}' => self.make_token(TokenKind::RightBrace),
            ',' => self.make_token(TokenKind::Comma),
            ';' => self.make_token(TokenKind::Semicolon),
            '.' => self.make_token(TokenKind::Dot),
            '+' => self.make_token(TokenKind::Plus),
            '-' => self.make_token(TokenKind::Minus),
            '*' => self.make_token(TokenKind::Star),
            '/' => self.make_token(TokenKind::Slash),
            '%' => self.make_token(TokenKind::Percent),
            '=' => self.make_token(TokenKind::Eq),
            '<' => match self.peek() {
                Some('=') => {
                    self.advance();
                    self.make_token(TokenKind::LtEq)
                }
                Some('>') => {
                    self.advance();
                    self.make_token(TokenKind::NotEq)
                }
                _ => self.make_token(TokenKind::Lt),
            },
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::GtEq)
                } else {
                    self.make_token(TokenKind::Gt)
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::NotEq)
                } else {
                    self.make_token(TokenKind::Error(String::from("Unexpected character: !")))
                }
            }
            '|' => {
                if self.peek() == Some('|') {
                    self.advance();
                    self.make_token(TokenKind::Concat)
                } else {
                    self.make_token(TokenKind::Error(String::from("Unexpected character: |")))
                }
            }

            '\'' => self.scan_string(false),
            'N' | 'n' if self.peek() == Some('\'') => {
                self.advance();
                self.scan_string(true)
            }
            '[' => self.scan_delimited_identifier(']'),
            '"' => self.scan_delimited_identifier('"'),
            '@' => self.scan_variable(),

            c if c.is_ascii_digit() => self.scan_number(),
            c if c.is_alphabetic() || c == '_' || c == '#' => self.scan_identifier(),

            c => self.make_token(TokenKind::Error(format!("Unexpected character: {c}"))),
        };
        Some(token)
    }

    /// Tokenizes the entire input.
    #[must_use]
    pub fn tokenize(mut self) -> TokenStream {
        let mut stream = TokenStream::default();
        while let Some(token) = self.next_token() {
            match token.kind {
                TokenKind::Whitespace | TokenKind::Comment => stream.whitespace.push(token),
                _ => stream.tokens.push(token),
            }
        }
        stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .tokens
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let stream = Lexer::new("").tokenize();
        assert!(stream.tokens.is_empty());
        assert!(stream.whitespace.is_empty());
    }

    #[test]
    fn test_whitespace_is_kept_apart() {
        let stream = Lexer::new("SELECT\n  1").tokenize();
        assert_eq!(stream.tokens.len(), 2);
        assert_eq!(stream.whitespace.len(), 1);
        assert_eq!(stream.whitespace[0].text, "\n  ");
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            token_kinds("SELECT -- comment\n1 /* block */ FROM"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Integer(1),
                TokenKind::Keyword(Keyword::From),
            ]
        );
        let stream = Lexer::new("SELECT /* a\nb */ 1").tokenize();
        assert!(stream.whitespace.iter().any(|t| t.kind == TokenKind::Comment));
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            token_kinds("select FROM wHeRe"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Keyword(Keyword::Where),
            ]
        );
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(
            token_kinds("foo bar_baz #tmp [order id] \"quoted\"\"name\""),
            vec![
                TokenKind::Identifier(String::from("foo")),
                TokenKind::Identifier(String::from("bar_baz")),
                TokenKind::Identifier(String::from("#tmp")),
                TokenKind::DelimitedIdentifier(String::from("order id")),
                TokenKind::DelimitedIdentifier(String::from("quoted\"name")),
            ]
        );
    }

    #[test]
    fn test_bracketed_keyword_is_an_identifier() {
        assert_eq!(
            token_kinds("[DELETE]"),
            vec![TokenKind::DelimitedIdentifier(String::from("DELETE"))]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            token_kinds("42 3.5 1e3"),
            vec![
                TokenKind::Integer(42),
                TokenKind::Decimal(String::from("3.5")),
                TokenKind::Decimal(String::from("1e3")),
            ]
        );
    }

    #[test]
    fn test_numbers_keep_their_source_text() {
        assert_eq!(
            token_kinds("123456789012345678.9 99999999999999999999"),
            vec![
                TokenKind::Decimal(String::from("123456789012345678.9")),
                TokenKind::Decimal(String::from("99999999999999999999")),
            ]
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            token_kinds("'it''s' N'unicode'"),
            vec![
                TokenKind::String(String::from("it's")),
                TokenKind::NationalString(String::from("unicode")),
            ]
        );
    }

    #[test]
    fn test_variables() {
        assert_eq!(
            token_kinds("@id @@ROWCOUNT"),
            vec![
                TokenKind::Variable(String::from("@id")),
                TokenKind::Variable(String::from("@@ROWCOUNT")),
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            token_kinds("+ - * / % || = != <> < <= > >="),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::Concat,
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::NotEq,
                TokenKind::Lt,
                TokenKind::LtEq,
                TokenKind::Gt,
                TokenKind::GtEq,
            ]
        );
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            token_kinds("( ) { } , ; ."),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Dot,
            ]
        );
    }

    #[test]
    fn test_errors() {
        let stream = Lexer::new("SELECT 'open").tokenize();
        let error = stream.first_error().expect("error token");
        assert!(matches!(&error.kind, TokenKind::Error(m) if m.contains("Unterminated")));

        let stream = Lexer::new("SELECT ^").tokenize();
        assert_eq!(stream.first_error().map(|t| t.text.as_str()), Some("^"));
    }

    #[test]
    fn test_span_and_text_tracking() {
        let stream = Lexer::new("SELECT [id]").tokenize();
        assert_eq!(stream.tokens[0].span, Span::new(0, 6));
        assert_eq!(stream.tokens[1].span, Span::new(7, 11));
        assert_eq!(stream.tokens[1].text, "[id]");
    }
}
