//! Recursive-descent parser with the fixed precedence ladder.
//!
//! Precedence, lowest to highest: `let` declarations, lambdas, comparison
//! (non-associative), additive, multiplicative, exponent (right-associative),
//! unary minus, postfix call, primary. `;` sequences are the outermost
//! construct. The first error terminates the parse; there is no recovery.

use std::rc::Rc;

use crate::{
    error::{Error, EvalResult},
    expressions::{BinOp, Expr, UnOp},
    lexer::{tokenize, Token, TokenKind},
};

/// Parses a whole program: `expr (';' expr)*` with an optional trailing `;`.
pub(crate) fn parse(source: &str) -> EvalResult<Expr> {
    let tokens = tokenize(source)?;
    let mut parser = Parser { tokens, current: 0 };
    parser.program()
}

struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.tokens[self.current].kind
    }

    /// Kind of the token `n` places ahead, clamped to the trailing `End`.
    fn peek_ahead(&self, n: usize) -> &TokenKind {
        let idx = (self.current + n).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn advance(&mut self) -> &Token {
        let token = &self.tokens[self.current];
        if !matches!(token.kind, TokenKind::End) {
            self.current += 1;
        }
        token
    }

    /// Consumes the next token if its kind matches (ignoring payloads).
    fn eat(&mut self, kind: &TokenKind) -> bool {
        if std::mem::discriminant(self.peek_kind()) == std::mem::discriminant(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> EvalResult<()> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &str) -> Error {
        let token = self.peek();
        Error::Parse {
            position: token.position,
            expected: expected.to_owned(),
            found: token.kind.to_string(),
        }
    }

    fn program(&mut self) -> EvalResult<Expr> {
        let mut exprs = vec![self.expression()?];
        while self.eat(&TokenKind::Semicolon) {
            if matches!(self.peek_kind(), TokenKind::End) {
                break;
            }
            exprs.push(self.expression()?);
        }
        self.expect(&TokenKind::End, "`;` or end of input")?;
        if exprs.len() == 1 {
            Ok(exprs.pop().expect("one expression"))
        } else {
            Ok(Expr::Sequence(exprs))
        }
    }

    fn expression(&mut self) -> EvalResult<Expr> {
        if self.eat(&TokenKind::Let) {
            return self.declaration();
        }
        if let Some(lambda) = self.lambda()? {
            return Ok(lambda);
        }
        self.comparison()
    }

    /// `let name = expr`; the initializer is a full expression, so
    /// declarations chain right-associatively.
    fn declaration(&mut self) -> EvalResult<Expr> {
        let name = self.identifier("variable name after `let`")?;
        self.expect(&TokenKind::Equals, "`=` after variable name")?;
        let init = self.expression()?;
        Ok(Expr::Decl {
            name,
            init: Box::new(init),
        })
    }

    fn identifier(&mut self, expected: &str) -> EvalResult<String> {
        if let TokenKind::Identifier(name) = self.peek_kind() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Tries to parse a lambda head at the current position.
    ///
    /// Returns `None` without consuming anything when the lookahead does not
    /// match `ident =>` or `( [ident {, ident}] ) =>`.
    fn lambda(&mut self) -> EvalResult<Option<Expr>> {
        let params = if matches!(self.peek_kind(), TokenKind::Identifier(_))
            && matches!(self.peek_ahead(1), TokenKind::Arrow)
        {
            let name = self.identifier("parameter name")?;
            self.advance(); // =>
            vec![name]
        } else if matches!(self.peek_kind(), TokenKind::LParen) {
            let Some(params) = self.parenthesized_params() else {
                return Ok(None);
            };
            params
        } else {
            return Ok(None);
        };

        for (i, name) in params.iter().enumerate() {
            if params[..i].contains(name) {
                return Err(Error::Parse {
                    position: self.peek().position,
                    expected: "distinct parameter names".to_owned(),
                    found: format!("duplicate parameter `{name}`"),
                });
            }
        }

        let body = self.expression()?;
        Ok(Some(Expr::Lambda {
            params,
            body: Rc::new(body),
        }))
    }

    /// Scans `( [ident {, ident}] ) =>`, consuming through the arrow on
    /// success. On any mismatch the position is restored and `None` is
    /// returned so the caller can re-parse as a parenthesized expression.
    fn parenthesized_params(&mut self) -> Option<Vec<String>> {
        let saved = self.current;
        self.advance(); // (

        let mut params = Vec::new();
        if let TokenKind::Identifier(name) = self.peek_kind() {
            params.push(name.clone());
            self.advance();
            while self.eat(&TokenKind::Comma) {
                if let TokenKind::Identifier(name) = self.peek_kind() {
                    params.push(name.clone());
                    self.advance();
                } else {
                    self.current = saved;
                    return None;
                }
            }
        }

        if self.eat(&TokenKind::RParen) && self.eat(&TokenKind::Arrow) {
            Some(params)
        } else {
            self.current = saved;
            None
        }
    }

    /// `additive ((< | <= | > | >= | == | !=) additive)?`, non-associative:
    /// a second comparison operator in a row is rejected.
    fn comparison(&mut self) -> EvalResult<Expr> {
        let left = self.additive()?;
        let Some(op) = self.comparison_op() else {
            return Ok(left);
        };
        self.advance();
        let right = self.additive()?;
        if self.comparison_op().is_some() {
            return Err(self.unexpected("no further comparison (comparisons do not chain)"));
        }
        Ok(Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn comparison_op(&self) -> Option<BinOp> {
        match self.peek_kind() {
            TokenKind::Lt => Some(BinOp::Lt),
            TokenKind::Le => Some(BinOp::Le),
            TokenKind::Gt => Some(BinOp::Gt),
            TokenKind::Ge => Some(BinOp::Ge),
            TokenKind::Eq => Some(BinOp::Eq),
            TokenKind::Ne => Some(BinOp::Ne),
            _ => None,
        }
    }

    fn additive(&mut self) -> EvalResult<Expr> {
        let mut node = self.term()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.term()?;
            node = Expr::Binary {
                op,
                left: Box::new(node),
                right: Box::new(right),
            };
        }
        Ok(node)
    }

    fn term(&mut self) -> EvalResult<Expr> {
        let mut node = self.power()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Rem,
                _ => break,
            };
            self.advance();
            let right = self.power()?;
            node = Expr::Binary {
                op,
                left: Box::new(node),
                right: Box::new(right),
            };
        }
        Ok(node)
    }

    /// `unary (^ power)?`; the recursion on the right side makes `^`
    /// right-associative.
    fn power(&mut self) -> EvalResult<Expr> {
        let base = self.unary()?;
        if self.eat(&TokenKind::Caret) {
            let exponent = self.power()?;
            return Ok(Expr::Binary {
                op: BinOp::Pow,
                left: Box::new(base),
                right: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn unary(&mut self) -> EvalResult<Expr> {
        if self.eat(&TokenKind::Minus) {
            let operand = self.unary()?;
            return Ok(Expr::Unary {
                op: UnOp::Neg,
                operand: Box::new(operand),
            });
        }
        self.call()
    }

    /// Postfix call: any primary may be followed by argument lists.
    fn call(&mut self) -> EvalResult<Expr> {
        let mut node = self.primary()?;
        while self.eat(&TokenKind::LParen) {
            let mut args = Vec::new();
            if !matches!(self.peek_kind(), TokenKind::RParen) {
                loop {
                    args.push(self.expression()?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.expect(&TokenKind::RParen, "`)` after arguments")?;
            node = Expr::Call {
                callee: Box::new(node),
                args,
            };
        }
        Ok(node)
    }

    fn primary(&mut self) -> EvalResult<Expr> {
        match self.peek_kind() {
            TokenKind::Number(value) => {
                let value = *value;
                self.advance();
                // `3i` lexes as a number followed by the identifier `i`.
                if matches!(self.peek_kind(), TokenKind::Identifier(name) if name == "i") {
                    self.advance();
                    return Ok(Expr::Imag(value));
                }
                Ok(Expr::Number(value))
            }
            TokenKind::Identifier(name) => {
                // A standalone `i` is the imaginary unit.
                let node = if name == "i" {
                    Expr::Imag(1.0)
                } else {
                    Expr::Var(name.clone())
                };
                self.advance();
                Ok(node)
            }
            TokenKind::LParen => {
                self.advance();
                let node = self.expression()?;
                self.expect(&TokenKind::RParen, "`)` after expression")?;
                Ok(node)
            }
            TokenKind::LBracket => self.bracket(),
            _ => Err(self.unexpected("an expression")),
        }
    }

    /// Parses `[...]` as a vector literal, or as a matrix literal when every
    /// element is itself a vector literal. Matrix rows are validated to equal
    /// length here, at parse time.
    fn bracket(&mut self) -> EvalResult<Expr> {
        self.advance(); // [
        let mut elements = Vec::new();
        let mut positions = Vec::new();
        if !matches!(self.peek_kind(), TokenKind::RBracket) {
            loop {
                positions.push(self.peek().position);
                elements.push(self.expression()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RBracket, "`]` after elements")?;

        if !elements.is_empty() && elements.iter().all(|e| matches!(e, Expr::Vector(_))) {
            let mut rows = Vec::with_capacity(elements.len());
            for element in elements {
                match element {
                    Expr::Vector(row) => rows.push(row),
                    _ => unreachable!("all elements checked to be vector literals"),
                }
            }
            let width = rows[0].len();
            for (row, position) in rows.iter().zip(&positions) {
                if row.len() != width {
                    return Err(Error::Parse {
                        position: *position,
                        expected: format!("matrix row of length {width}"),
                        found: format!("row of length {}", row.len()),
                    });
                }
            }
            return Ok(Expr::Matrix(rows));
        }
        Ok(Expr::Vector(elements))
    }
}
