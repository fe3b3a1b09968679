use crate::prelude::*;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("[line {}] Error {}: {message}", .token.line, .token.location())]
pub struct ParserError {
    pub token: Token,
    pub message: String,
}

type ParseResult<T> = Result<T, ParserError>;

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    errors: Vec<ParserError>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0, errors: Vec::new() }
    }

    /// Parse the whole program. Every malformed statement contributes one
    /// diagnostic; if there is at least one, no statements are returned.
    pub fn parse(&mut self) -> Result<Vec<Stmt>, Vec<ParserError>> {
        let mut statements = vec![];
        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        tracing::debug!(
            statements = statements.len(),
            errors = self.errors.len(),
            "parsed program"
        );

        if self.errors.is_empty() {
            Ok(statements)
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }

    fn declaration(&mut self) -> Option<Stmt> {
        let result = if self.match_tt(&[TokenType::Var]) {
            self.var_declaration()
        } else {
            self.statement()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(e) => {
                tracing::trace!(line = e.token.line, "synchronizing after parse error");
                self.errors.push(e);
                self.synchronize();
                None
            }
        }
    }

    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(TokenType::Identifier, "Expect variable name.")?;

        let initializer =
            if self.match_tt(&[TokenType::Equal]) { Some(self.expression()?) } else { None };

        self.consume(TokenType::Semicolon, "Expect ';' after variable declaration.")?;

        Ok(Stmt::Var { name, initializer })
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        if self.match_tt(&[TokenType::If]) {
            self.if_statement()
        } else if self.match_tt(&[TokenType::While]) {
            self.while_statement()
        } else if self.match_tt(&[TokenType::For]) {
            self.for_statement()
        } else if self.match_tt(&[TokenType::Print]) {
            self.print_statement()
        } else if self.match_tt(&[TokenType::LeftBrace]) {
            Ok(Stmt::Block { statements: self.block()? })
        } else {
            self.expression_statement()
        }
    }

    fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenType::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(TokenType::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch =
            if self.match_tt(&[TokenType::Else]) { Some(Box::new(self.statement()?)) } else { None };

        Ok(Stmt::If { condition, then_branch, else_branch })
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenType::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(TokenType::RightParen, "Expect ')' after condition.")?;

        let body = Box::new(self.statement()?);
        Ok(Stmt::While { condition, body })
    }

    fn for_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenType::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if self.match_tt(&[TokenType::Semicolon]) {
            None
        } else if self.match_tt(&[TokenType::Var]) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if !self.check(TokenType::Semicolon) {
            self.expression()?
        } else {
            Expr::bool_literal(true)
        };
        self.consume(TokenType::Semicolon, "Expect ';' after loop condition.")?;

        let increment =
            if !self.check(TokenType::RightParen) { Some(self.expression()?) } else { None };
        self.consume(TokenType::RightParen, "Expect ')' after for clauses.")?;

        let mut body = self.statement()?;

        // Now reconstruct all those parts as a while loop
        if let Some(increment) = increment {
            body = Stmt::Block { statements: vec![body, Stmt::Expression { expr: increment }] };
        }

        body = Stmt::While { condition, body: Box::new(body) };

        if let Some(initializer) = initializer {
            body = Stmt::Block { statements: vec![initializer, body] };
        }

        Ok(body)
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(TokenType::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print { expr })
    }

    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = vec![];

        while !self.check(TokenType::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        self.consume(TokenType::RightBrace, "Expect '}' after block.")?;
        Ok(statements)
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(TokenType::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression { expr })
    }

    fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.or()?;

        if self.match_tt(&[TokenType::Equal]) {
            let equals = self.previous().clone();
            let value = self.assignment()?;
            if let Expr::Variable { name } = expr {
                return Ok(Expr::Assignment { name, value: Box::new(value) });
            }

            // Report it, but keep parsing with what we have
            self.errors
                .push(ParserError { token: equals, message: "Invalid assignment target.".to_owned() });
        }

        Ok(expr)
    }

    fn or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.and()?;

        while self.match_tt(&[TokenType::Or]) {
            let operator = self.previous().clone();
            let right = self.and()?;
            expr = Expr::Logical { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;

        while self.match_tt(&[TokenType::And]) {
            let operator = self.previous().clone();
            let right = self.equality()?;
            expr = Expr::Logical { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        self.binary(&[TokenType::BangEqual, TokenType::EqualEqual], Self::comparison)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        self.binary(
            &[TokenType::GreaterEqual, TokenType::Greater, TokenType::LessEqual, TokenType::Less],
            Self::term,
        )
    }

    fn term(&mut self) -> ParseResult<Expr> {
        self.binary(&[TokenType::Minus, TokenType::Plus], Self::factor)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        self.binary(&[TokenType::Slash, TokenType::Star], Self::unary)
    }

    /// A left-associative binary level: `operand ( op operand )*`.
    fn binary(
        &mut self,
        operators: &[TokenType],
        operand: fn(&mut Self) -> ParseResult<Expr>,
    ) -> ParseResult<Expr> {
        let mut expr = operand(self)?;

        while self.match_tt(operators) {
            let operator = self.previous().clone();
            let right = operand(self)?;
            expr = Expr::Binary { left: Box::new(expr), operator, right: Box::new(right) };
        }

        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if self.match_tt(&[TokenType::Bang, TokenType::Minus]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            return Ok(Expr::Unary { operator, right: Box::new(right) });
        }

        self.primary()
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        if self.match_tt(&[TokenType::False]) {
            return Ok(Expr::bool_literal(false));
        }
        if self.match_tt(&[TokenType::True]) {
            return Ok(Expr::bool_literal(true));
        }
        if self.match_tt(&[TokenType::Nil]) {
            return Ok(Expr::Literal { value: Value::Nil });
        }
        if self.match_tt(&[TokenType::Number, TokenType::StringLiteral]) {
            let value = self.previous().literal.clone().unwrap_or_default();
            return Ok(Expr::Literal { value });
        }
        if self.match_tt(&[TokenType::Identifier]) {
            return Ok(Expr::Variable { name: self.previous().clone() });
        }
        if self.match_tt(&[TokenType::LeftParen]) {
            let expr = self.expression()?;
            self.consume(TokenType::RightParen, "Expect ')' after expression.")?;
            return Ok(Expr::Grouping { expr: Box::new(expr) });
        }

        Err(self.error("Expect expression."))
    }

    /// Return the next token if its `token_type` matches the given type.
    /// Otherwise, return an error pointing at the next token.
    fn consume(&mut self, token_type: TokenType, message: &str) -> ParseResult<Token> {
        if self.check(token_type) {
            return Ok(self.advance().clone());
        }

        Err(self.error(message))
    }

    fn error(&self, message: &str) -> ParserError {
        ParserError { token: self.peek().clone(), message: message.to_owned() }
    }

    fn match_tt(&mut self, types: &[TokenType]) -> bool {
        for &tt in types {
            if self.check(tt) {
                self.advance();
                return true;
            }
        }

        false
    }

    /// Check to see if the next token's type matches the given `token_type`.
    fn check(&self, token_type: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().token_type == token_type
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().token_type == TokenType::EOF
    }

    fn peek(&self) -> &Token {
        // The scanner always terminates the stream with EOF; clamp to it.
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.current.min(last)]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn synchronize(&mut self) {
        self.advance();

        // Move and discard tokens until we find a statement boundary
        while !self.is_at_end() {
            if self.previous().token_type == TokenType::Semicolon {
                return;
            }

            if self.peek().token_type.starts_statement() {
                return;
            }

            self.advance();
        }
    }
}
