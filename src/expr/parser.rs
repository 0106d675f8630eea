//! Recursive-descent parser for the custom-function expression language.
//!
//! Grammar (highest precedence last):
//!
//! ```text
//! expr   := term { ('+' | '-') term }
//! term   := factor { ('*' | '/') factor }
//! factor := ('+' | '-') factor | power
//! power  := atom [ '^' factor ]          (right associative)
//! atom   := NUMBER | IDENT | IDENT '(' expr { ',' expr } ')' | '(' expr ')'
//! ```
//!
//! Identifier resolution happens here: `x` is the bound variable, `pi` and
//! `e` are constants, and call targets must appear in the [`Func`]
//! allow-list. Anything else is rejected, so no ambient symbol is reachable
//! from user input.

use super::lexer::Token;
use super::{BinOp, Expr, ExprError, Func, UnaryOp};

/// Parse a token stream into an expression tree.
///
/// # Errors
///
/// Returns a typed [`ExprError`] on any syntax or symbol problem.
pub fn parse(tokens: &[(Token, usize)]) -> Result<Expr, ExprError> {
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.expr()?;
    if parser.pos < parser.tokens.len() {
        return Err(ExprError::UnexpectedToken(parser.tokens[parser.pos].1));
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [(Token, usize)],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ExprError> {
        match self.advance() {
            Some(ref token) if token == expected => Ok(()),
            Some(_) => Err(ExprError::UnexpectedToken(self.tokens[self.pos - 1].1)),
            None => Err(ExprError::UnexpectedEnd),
        }
    }

    fn expr(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.factor()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> Result<Expr, ExprError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                let operand = self.factor()?;
                Ok(Expr::unary(UnaryOp::Neg, operand))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.factor()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr, ExprError> {
        let base = self.atom()?;
        if self.peek() == Some(&Token::Caret) {
            self.pos += 1;
            // Right associative; the exponent may carry its own unary sign
            let exponent = self.factor()?;
            return Ok(Expr::binary(BinOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Expr, ExprError> {
        match self.advance() {
            Some(Token::Number(value)) => Ok(Expr::Literal(value)),
            Some(Token::Ident(name)) => self.resolve_ident(&name),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(_) => Err(ExprError::UnexpectedToken(self.tokens[self.pos - 1].1)),
            None => Err(ExprError::UnexpectedEnd),
        }
    }

    fn resolve_ident(&mut self, name: &str) -> Result<Expr, ExprError> {
        if self.peek() == Some(&Token::LParen) {
            self.pos += 1;
            let func = Func::from_name(name)
                .ok_or_else(|| ExprError::UnknownFunction(name.to_string()))?;
            let args = self.call_args()?;
            if args.len() != func.arity() {
                return Err(ExprError::WrongArity {
                    name: name.to_string(),
                    expected: func.arity(),
                    got: args.len(),
                });
            }
            return Ok(Expr::Call { func, args });
        }

        match name {
            "x" => Ok(Expr::Variable),
            "pi" => Ok(Expr::Literal(std::f64::consts::PI)),
            "e" => Ok(Expr::Literal(std::f64::consts::E)),
            _ => Err(ExprError::UnknownSymbol(name.to_string())),
        }
    }

    fn call_args(&mut self) -> Result<Vec<Expr>, ExprError> {
        let mut args = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            match self.advance() {
                Some(Token::Comma) => {}
                Some(Token::RParen) => return Ok(args),
                Some(_) => {
                    return Err(ExprError::UnexpectedToken(self.tokens[self.pos - 1].1))
                }
                None => return Err(ExprError::UnexpectedEnd),
            }
        }
    }
}
