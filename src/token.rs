use crate::prelude::*;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens.
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals.
    Identifier,
    StringLiteral,
    Number,

    // Keywords.
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    EOF,
}

impl TokenType {
    /// Maps reserved words to their token type.
    pub fn keyword(text: &str) -> Option<TokenType> {
        match text {
            "and" => Some(TokenType::And),
            "class" => Some(TokenType::Class),
            "else" => Some(TokenType::Else),
            "false" => Some(TokenType::False),
            "for" => Some(TokenType::For),
            "fun" => Some(TokenType::Fun),
            "if" => Some(TokenType::If),
            "nil" => Some(TokenType::Nil),
            "or" => Some(TokenType::Or),
            "print" => Some(TokenType::Print),
            "return" => Some(TokenType::Return),
            "super" => Some(TokenType::Super),
            "this" => Some(TokenType::This),
            "true" => Some(TokenType::True),
            "var" => Some(TokenType::Var),
            "while" => Some(TokenType::While),
            _ => None,
        }
    }

    /// Token types that can only appear at the start of a statement.
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            TokenType::Class
                | TokenType::Fun
                | TokenType::Var
                | TokenType::For
                | TokenType::If
                | TokenType::While
                | TokenType::Print
                | TokenType::Return
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub literal: Option<Value>,
    pub line: usize,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: &str, literal: Option<Value>, line: usize) -> Self {
        Self { token_type, lexeme: lexeme.to_owned(), literal, line }
    }

    /// Where the token sits, as used in diagnostics.
    pub fn location(&self) -> String {
        if self.token_type == TokenType::EOF {
            "at end".to_owned()
        } else {
            format!("at '{}'", self.lexeme)
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.literal {
            Some(literal) => write!(f, "{:?} {} {}", self.token_type, self.lexeme, literal),
            None => write!(f, "{:?} {} null", self.token_type, self.lexeme),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_recognized() {
        for word in [
            "and", "class", "else", "false", "for", "fun", "if", "nil", "or", "print", "return",
            "super", "this", "true", "var", "while",
        ] {
            assert!(TokenType::keyword(word).is_some(), "{word} should be a keyword");
        }

        assert_eq!(TokenType::keyword("break"), None);
        assert_eq!(TokenType::keyword("While"), None);
    }

    #[test]
    fn location_of_eof() {
        let eof = Token::new(TokenType::EOF, "", None, 3);
        assert_eq!(eof.location(), "at end");

        let semi = Token::new(TokenType::Semicolon, ";", None, 3);
        assert_eq!(semi.location(), "at ';'");
    }

    #[test]
    fn display_includes_literal() {
        let token = Token::new(TokenType::Number, "1.5", Some(Value::Number(1.5)), 1);
        assert_eq!(token.to_string(), "Number 1.5 1.5");

        let token = Token::new(TokenType::Plus, "+", None, 1);
        assert_eq!(token.to_string(), "Plus + null");
    }
}
