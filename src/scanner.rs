use crate::prelude::*;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("[line {line}] Error: {message}")]
pub struct ScannerError {
    pub line: usize,
    pub message: String,
}

#[derive(Debug)]
pub struct Scanner {
    source_chars: Vec<char>,
    tokens: Vec<Token>,
    errors: Vec<ScannerError>,
    start: usize,
    current: usize,
    line: usize,
}

impl Scanner {
    pub fn new(source: &str) -> Self {
        Self {
            source_chars: source.chars().collect(),
            tokens: Vec::new(),
            errors: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
        }
    }

    /// Scan the whole source. Errors never stop the scan; they are returned
    /// next to whatever tokens could be produced.
    pub fn scan_tokens(&mut self) -> (Vec<Token>, Vec<ScannerError>) {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }

        self.tokens.push(Token::new(TokenType::EOF, "", None, self.line));

        tracing::debug!(
            tokens = self.tokens.len(),
            errors = self.errors.len(),
            "scanned source"
        );

        (std::mem::take(&mut self.tokens), std::mem::take(&mut self.errors))
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source_chars.len()
    }

    fn scan_token(&mut self) {
        let c = self.advance();

        match c {
            '(' => self.add_token(TokenType::LeftParen),
            ')' => self.add_token(TokenType::RightParen),
            '{' => self.add_token(TokenType::LeftBrace),
            '}' => self.add_token(TokenType::RightBrace),
            ',' => self.add_token(TokenType::Comma),
            '.' => self.add_token(TokenType::Dot),
            '-' => self.add_token(TokenType::Minus),
            '+' => self.add_token(TokenType::Plus),
            ';' => self.add_token(TokenType::Semicolon),
            '*' => self.add_token(TokenType::Star),
            '!' => self.add_either('=', TokenType::BangEqual, TokenType::Bang),
            '=' => self.add_either('=', TokenType::EqualEqual, TokenType::Equal),
            '<' => self.add_either('=', TokenType::LessEqual, TokenType::Less),
            '>' => self.add_either('=', TokenType::GreaterEqual, TokenType::Greater),
            '/' => {
                if self.match_next('/') {
                    // Go until end of the commented line
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(TokenType::Slash);
                }
            }
            ' ' | '\r' | '\t' => {}
            '\n' => {
                self.line += 1;
            }
            '"' => self.string(),
            c if c.is_ascii_digit() => self.number(),
            c if is_alpha(c) => self.identifier(),
            _ => self.error("Unexpected character."),
        }
    }

    fn error(&mut self, message: &str) {
        self.errors.push(ScannerError { line: self.line, message: message.to_owned() });
    }

    fn advance(&mut self) -> char {
        let c = self.peek();
        self.current += 1;
        c
    }

    fn add_token(&mut self, token_type: TokenType) {
        self.add_token_with_literal(token_type, None);
    }

    fn add_either(&mut self, expected: char, matched: TokenType, single: TokenType) {
        let token_type = if self.match_next(expected) { matched } else { single };
        self.add_token(token_type);
    }

    fn source_substring(&self, start: usize, end: usize) -> String {
        self.source_chars[start..end].iter().collect()
    }

    fn add_token_with_literal(&mut self, token_type: TokenType, literal: Option<Value>) {
        let text = self.source_substring(self.start, self.current);
        self.tokens.push(Token::new(token_type, &text, literal, self.line));
    }

    fn match_next(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.source_chars[self.current] != expected {
            return false;
        }

        self.current += 1;
        true
    }

    fn peek(&self) -> char {
        self.source_chars.get(self.current).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.source_chars.get(self.current + 1).copied().unwrap_or('\0')
    }

    fn string(&mut self) {
        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            self.error("Unterminated string.");
            return;
        }

        // The closing "
        self.advance();

        // Skip the quote marks
        let text = self.source_substring(self.start + 1, self.current - 1);
        self.add_token_with_literal(TokenType::StringLiteral, Some(Value::String(text)));
    }

    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            // Consume '.'
            self.advance();

            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let text = self.source_substring(self.start, self.current);
        // A digit run with an optional fraction always parses.
        let value = text.parse::<f64>().unwrap_or_default();
        self.add_token_with_literal(TokenType::Number, Some(Value::Number(value)));
    }

    fn identifier(&mut self) {
        while is_alpha_numeric(self.peek()) {
            self.advance();
        }

        let text = self.source_substring(self.start, self.current);
        let token_type = TokenType::keyword(&text).unwrap_or(TokenType::Identifier);
        self.add_token(token_type);
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_alpha_numeric(c: char) -> bool {
    is_alpha(c) || c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn token_types(source: &str) -> Vec<TokenType> {
        let (tokens, errors) = Scanner::new(source).scan_tokens();
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        tokens.into_iter().map(|t| t.token_type).collect()
    }

    #[test]
    fn single_characters() {
        assert_eq!(
            token_types("(){},.-+;*"),
            vec![
                TokenType::LeftParen,
                TokenType::RightParen,
                TokenType::LeftBrace,
                TokenType::RightBrace,
                TokenType::Comma,
                TokenType::Dot,
                TokenType::Minus,
                TokenType::Plus,
                TokenType::Semicolon,
                TokenType::Star,
                TokenType::EOF,
            ]
        );
    }

    #[test]
    fn two_character_operators() {
        assert_eq!(
            token_types("! != = == < <= > >= /"),
            vec![
                TokenType::Bang,
                TokenType::BangEqual,
                TokenType::Equal,
                TokenType::EqualEqual,
                TokenType::Less,
                TokenType::LessEqual,
                TokenType::Greater,
                TokenType::GreaterEqual,
                TokenType::Slash,
                TokenType::EOF,
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        let (tokens, _) = Scanner::new("// nothing here\n1 // trailing").scan_tokens();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].token_type, TokenType::Number);
        assert_eq!(tokens[0].line, 2);
    }

    #[test]
    fn string_literal_excludes_quotes() {
        let (tokens, _) = Scanner::new("\"hello\nworld\" x").scan_tokens();
        assert_eq!(tokens[0].token_type, TokenType::StringLiteral);
        assert_eq!(tokens[0].lexeme, "\"hello\nworld\"");
        assert_eq!(tokens[0].literal, Some(Value::String("hello\nworld".to_owned())));
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn unterminated_string() {
        let (tokens, errors) = Scanner::new("\"abc").scan_tokens();
        assert_eq!(tokens.len(), 1);
        assert_eq!(
            errors,
            vec![ScannerError { line: 1, message: "Unterminated string.".to_owned() }]
        );
    }

    #[test]
    fn numbers() {
        let (tokens, _) = Scanner::new("123 45.67 8.").scan_tokens();
        assert_eq!(tokens[0].literal, Some(Value::Number(123.0)));
        assert_eq!(tokens[1].literal, Some(Value::Number(45.67)));
        // Trailing dot is not part of the number
        assert_eq!(tokens[2].lexeme, "8");
        assert_eq!(tokens[3].token_type, TokenType::Dot);
    }

    #[test]
    fn leading_zeros_are_plain_digits() {
        let (tokens, errors) = Scanner::new("007.50").scan_tokens();
        assert!(errors.is_empty());
        assert_eq!(tokens[0].literal, Some(Value::Number(7.5)));
        assert_eq!(tokens[1].token_type, TokenType::EOF);
    }

    #[test]
    fn unexpected_character_does_not_stop_scanning() {
        let (tokens, errors) = Scanner::new("1 @ 2\n#").scan_tokens();
        assert_eq!(tokens.len(), 3);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].line, 1);
        assert_eq!(errors[1].line, 2);
        assert_eq!(errors[1].message, "Unexpected character.");
    }

    #[test]
    fn eof_carries_last_line() {
        let (tokens, _) = Scanner::new("a\nb\n").scan_tokens();
        assert_eq!(tokens.last().map(|t| (t.token_type, t.line)), Some((TokenType::EOF, 3)));
    }
}
