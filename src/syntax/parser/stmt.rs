use crate::ast::*;
use crate::diagnostic::Diagnostic;
use crate::lexeme::Lexeme;
use crate::span::{Span, Spanned};

use super::Parser;

impl Parser {
    pub(super) fn parse_block(&mut self) -> Spanned<Block> {
        if !self.enter_nesting() {
            let span = self.current_span();
            // The depth error is already recorded; stop parsing.
            self.skip_to_eof();
            return Spanned::new(Block::default(), span);
        }

        let start = self.current_span();
        self.expect(&Lexeme::LBrace);

        let mut stmts = Vec::new();
        loop {
            self.skip_semicolons();
            if self.at(&Lexeme::RBrace) || self.at(&Lexeme::Eof) {
                break;
            }
            let before = self.pos;
            let errors_before = self.diagnostics.len();
            if let Some(stmt) = self.parse_stmt() {
                stmts.push(stmt);
            }
            if self.diagnostics.len() > errors_before {
                self.synchronize_stmt(before);
            } else {
                self.expect_terminator();
            }
        }

        self.expect(&Lexeme::RBrace);
        self.exit_nesting();
        Spanned::new(Block { stmts }, start.merge(self.prev_span()))
    }

    /// Skip the rest of a broken statement, stopping before the `}` that
    /// closes the enclosing block.
    fn synchronize_stmt(&mut self, started_at: usize) {
        if self.pos == started_at && !self.at(&Lexeme::RBrace) && !self.at(&Lexeme::Eof) {
            self.advance();
        }
        while !matches!(
            self.peek(),
            Lexeme::Semicolon | Lexeme::RBrace | Lexeme::Eof
        ) {
            self.advance();
        }
    }

    fn parse_stmt(&mut self) -> Option<Spanned<Stmt>> {
        let start = self.current_span();
        let stmt = match self.peek().clone() {
            Lexeme::Const | Lexeme::Var => Stmt::Decl(Decl::Value(self.parse_value_decl())),
            Lexeme::Type => Stmt::Decl(Decl::Type(self.parse_type_decl())),
            Lexeme::Return => {
                self.advance();
                if matches!(self.peek(), Lexeme::Semicolon | Lexeme::RBrace) {
                    Stmt::Return(Vec::new())
                } else {
                    Stmt::Return(self.parse_expr_list())
                }
            }
            Lexeme::If => return Some(self.parse_if_stmt()),
            Lexeme::For => return Some(self.parse_for_stmt()),
            Lexeme::Break => {
                self.advance();
                Stmt::Branch(BranchKind::Break)
            }
            Lexeme::Continue => {
                self.advance();
                Stmt::Branch(BranchKind::Continue)
            }
            Lexeme::LBrace => {
                let block = self.parse_block();
                return Some(Spanned::new(Stmt::Block(block.node), block.span));
            }
            Lexeme::Reserved(word) => {
                self.error_unsupported(&format!("`{}` statements are", word));
                return None;
            }
            _ => return self.parse_simple_stmt(),
        };
        Some(Spanned::new(stmt, start.merge(self.prev_span())))
    }

    /// Expression, inc/dec or assignment statement.
    pub(super) fn parse_simple_stmt(&mut self) -> Option<Spanned<Stmt>> {
        let start = self.current_span();
        let mut lhs = self.parse_expr_list();

        let stmt = match self.peek().clone() {
            Lexeme::PlusPlus | Lexeme::MinusMinus => {
                let op = if self.at(&Lexeme::PlusPlus) {
                    IncDecOp::Inc
                } else {
                    IncDecOp::Dec
                };
                if lhs.len() != 1 {
                    self.error_at_current(&format!(
                        "{} applies to exactly one operand",
                        self.peek().description()
                    ));
                    return None;
                }
                self.advance();
                Stmt::IncDec {
                    operand: lhs.swap_remove(0),
                    op,
                }
            }
            Lexeme::Assign | Lexeme::Define | Lexeme::OpAssign(_) => {
                let op = match self.advance().node.clone() {
                    Lexeme::Assign => AssignOp::Assign,
                    Lexeme::Define => AssignOp::Define,
                    Lexeme::OpAssign(text) => AssignOp::from_compound(&text)?,
                    _ => return None,
                };
                let rhs = self.parse_expr_list();
                if op != AssignOp::Assign && op != AssignOp::Define && lhs.len() != 1 {
                    self.error_at_current(&format!(
                        "'{}' assigns to exactly one operand",
                        op.as_str()
                    ));
                }
                Stmt::Assign { lhs, op, rhs }
            }
            _ => {
                if lhs.len() != 1 {
                    self.error_with_help(
                        &format!(
                            "expected assignment after expression list, found {}",
                            self.peek().description()
                        ),
                        "use `a, b = x, y` or `a, b := x, y`",
                    );
                    return None;
                }
                Stmt::Expr(lhs.swap_remove(0))
            }
        };
        Some(Spanned::new(stmt, start.merge(self.prev_span())))
    }

    fn parse_if_stmt(&mut self) -> Spanned<Stmt> {
        let start = self.current_span();
        self.expect(&Lexeme::If);

        let (init, cond) = self.parse_if_header();
        let then_block = self.parse_block();

        let else_branch = if self.eat(&Lexeme::Else) {
            if self.at(&Lexeme::If) {
                Some(Box::new(self.parse_if_stmt()))
            } else if self.at(&Lexeme::LBrace) {
                let block = self.parse_block();
                Some(Box::new(Spanned::new(Stmt::Block(block.node), block.span)))
            } else {
                self.error_at_current(&format!(
                    "expected 'if' or block after 'else', found {}",
                    self.peek().description()
                ));
                None
            }
        } else {
            None
        };

        Spanned::new(
            Stmt::If {
                init,
                cond,
                then_block,
                else_branch,
            },
            start.merge(self.prev_span()),
        )
    }

    /// `if cond {` or `if init; cond {`.
    fn parse_if_header(&mut self) -> (Option<Box<Spanned<Stmt>>>, Spanned<Expr>) {
        let first = if self.at(&Lexeme::Semicolon) {
            None
        } else {
            self.parse_simple_stmt()
        };

        if self.eat(&Lexeme::Semicolon) {
            let cond = self.parse_expr();
            return (first.map(Box::new), cond);
        }

        match first {
            Some(Spanned {
                node: Stmt::Expr(cond),
                ..
            }) => (None, cond),
            Some(other) => {
                self.diagnostics.push(Diagnostic::error(
                    "expected condition after 'if', found a statement".to_string(),
                    other.span,
                ));
                (None, error_expr(other.span))
            }
            None => {
                self.error_at_current("missing condition in 'if' statement");
                (None, error_expr(self.current_span()))
            }
        }
    }

    /// `for {`, `for cond {` or `for init; cond; post {`.
    fn parse_for_stmt(&mut self) -> Spanned<Stmt> {
        let start = self.current_span();
        self.expect(&Lexeme::For);

        let mut init = None;
        let mut cond = None;
        let mut post = None;

        if !self.at(&Lexeme::LBrace) {
            let first = if self.at(&Lexeme::Semicolon) {
                None
            } else {
                self.parse_simple_stmt()
            };

            if self.eat(&Lexeme::Semicolon) {
                init = first.map(Box::new);
                if !self.at(&Lexeme::Semicolon) {
                    cond = Some(self.parse_expr());
                }
                self.expect(&Lexeme::Semicolon);
                if !self.at(&Lexeme::LBrace) {
                    post = self.parse_simple_stmt().map(Box::new);
                }
            } else {
                match first {
                    Some(Spanned {
                        node: Stmt::Expr(expr),
                        ..
                    }) => cond = Some(expr),
                    Some(other) => {
                        self.diagnostics.push(Diagnostic::error(
                            "expected loop condition or three-clause header".to_string(),
                            other.span,
                        ));
                    }
                    None => {}
                }
            }
        }

        let body = self.parse_block();
        Spanned::new(
            Stmt::For {
                init,
                cond,
                post,
                body,
            },
            start.merge(self.prev_span()),
        )
    }
}

fn error_expr(span: Span) -> Spanned<Expr> {
    Spanned::new(Expr::Ident("_error_".to_string()), span)
}
