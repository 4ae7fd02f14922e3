use crate::ast::*;
use crate::lexeme::Lexeme;
use crate::span::Spanned;

use super::Parser;

impl Parser {
    pub(super) fn parse_expr(&mut self) -> Spanned<Expr> {
        if !self.enter_nesting() {
            let span = self.current_span();
            self.skip_to_eof();
            return Spanned::new(Expr::Ident("_error_".to_string()), span);
        }
        let expr = self.parse_binary(1);
        self.exit_nesting();
        expr
    }

    pub(super) fn parse_expr_list(&mut self) -> Vec<Spanned<Expr>> {
        let mut exprs = vec![self.parse_expr()];
        while self.eat(&Lexeme::Comma) {
            exprs.push(self.parse_expr());
        }
        exprs
    }

    /// Precedence climbing over Go's five binary levels.
    fn parse_binary(&mut self, min_prec: u8) -> Spanned<Expr> {
        let mut lhs = self.parse_unary();

        loop {
            let op = match binary_op(self.peek()) {
                Some(op) => op,
                None => break,
            };
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }

            self.advance(); // consume operator
            let rhs = self.parse_binary(prec + 1);
            let span = lhs.span.merge(rhs.span);
            lhs = Spanned::new(
                Expr::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }

        lhs
    }

    fn parse_unary(&mut self) -> Spanned<Expr> {
        let op = match self.peek() {
            Lexeme::Minus => UnaryOp::Neg,
            Lexeme::Plus => UnaryOp::Plus,
            Lexeme::Not => UnaryOp::Not,
            Lexeme::Caret => UnaryOp::BitNot,
            Lexeme::Amp => UnaryOp::Addr,
            Lexeme::Star => UnaryOp::Deref,
            _ => {
                let operand = self.parse_operand();
                return self.parse_postfix(operand);
            }
        };

        let start = self.current_span();
        if !self.enter_nesting() {
            self.skip_to_eof();
            return Spanned::new(Expr::Ident("_error_".to_string()), start);
        }
        self.advance();
        let operand = self.parse_unary();
        self.exit_nesting();

        let span = start.merge(operand.span);
        Spanned::new(
            Expr::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    }

    /// Selectors, calls and index expressions, left to right.
    fn parse_postfix(&mut self, mut expr: Spanned<Expr>) -> Spanned<Expr> {
        loop {
            if self.at(&Lexeme::Dot) {
                self.advance();
                let field = self.expect_ident();
                let span = expr.span.merge(field.span);
                expr = Spanned::new(
                    Expr::Selector {
                        base: Box::new(expr),
                        field,
                    },
                    span,
                );
            } else if self.at(&Lexeme::LParen) {
                self.advance();
                let mut args = Vec::new();
                while !self.at(&Lexeme::RParen) && !self.at(&Lexeme::Eof) {
                    args.push(self.parse_expr());
                    if !self.eat(&Lexeme::Comma) {
                        break;
                    }
                }
                self.expect(&Lexeme::RParen);
                let span = expr.span.merge(self.prev_span());
                expr = Spanned::new(
                    Expr::Call {
                        callee: Box::new(expr),
                        args,
                    },
                    span,
                );
            } else if self.at(&Lexeme::LBracket) {
                self.advance();
                let index = self.parse_expr();
                if self.at(&Lexeme::Colon) {
                    self.error_unsupported("slice expressions are");
                }
                self.expect(&Lexeme::RBracket);
                let span = expr.span.merge(self.prev_span());
                expr = Spanned::new(
                    Expr::Index {
                        base: Box::new(expr),
                        index: Box::new(index),
                    },
                    span,
                );
            } else {
                break;
            }
        }
        expr
    }

    fn parse_operand(&mut self) -> Spanned<Expr> {
        let start = self.current_span();

        let lit = |kind, text: String| Expr::Lit(BasicLit { kind, text });
        match self.peek().clone() {
            Lexeme::Int(text) => {
                self.advance();
                Spanned::new(lit(LitKind::Int, text), start)
            }
            Lexeme::Float(text) => {
                self.advance();
                Spanned::new(lit(LitKind::Float, text), start)
            }
            Lexeme::Str(text) => {
                self.advance();
                Spanned::new(lit(LitKind::Str, text), start)
            }
            Lexeme::Char(text) => {
                self.advance();
                Spanned::new(lit(LitKind::Char, text), start)
            }
            Lexeme::Ident(name) => {
                self.advance();
                Spanned::new(Expr::Ident(name), start)
            }
            Lexeme::LParen => {
                self.advance();
                let inner = self.parse_expr();
                self.expect(&Lexeme::RParen);
                let span = start.merge(self.prev_span());
                Spanned::new(Expr::Paren(Box::new(inner)), span)
            }
            Lexeme::Func => {
                self.error_unsupported("function literals are");
                Spanned::new(Expr::Ident("_error_".to_string()), start)
            }
            other => {
                self.error_at_current(&format!(
                    "expected expression, found {}",
                    other.description()
                ));
                Spanned::new(Expr::Ident("_error_".to_string()), start)
            }
        }
    }
}

fn binary_op(lexeme: &Lexeme) -> Option<BinOp> {
    let op = match lexeme {
        Lexeme::OrOr => BinOp::OrOr,
        Lexeme::AndAnd => BinOp::AndAnd,
        Lexeme::EqEq => BinOp::Eq,
        Lexeme::NotEq => BinOp::NotEq,
        Lexeme::Lt => BinOp::Lt,
        Lexeme::LtEq => BinOp::LtEq,
        Lexeme::Gt => BinOp::Gt,
        Lexeme::GtEq => BinOp::GtEq,
        Lexeme::Plus => BinOp::Add,
        Lexeme::Minus => BinOp::Sub,
        Lexeme::Pipe => BinOp::Or,
        Lexeme::Caret => BinOp::Xor,
        Lexeme::Star => BinOp::Mul,
        Lexeme::Slash => BinOp::Quo,
        Lexeme::Percent => BinOp::Rem,
        Lexeme::Shl => BinOp::Shl,
        Lexeme::Shr => BinOp::Shr,
        Lexeme::Amp => BinOp::And,
        Lexeme::AndNot => BinOp::AndNot,
        _ => return None,
    };
    Some(op)
}
