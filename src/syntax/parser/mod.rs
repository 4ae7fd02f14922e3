mod expr;
mod items;
mod stmt;
#[cfg(test)]
mod tests;

use crate::ast::*;
use crate::diagnostic::Diagnostic;
use crate::lexeme::Lexeme;
use crate::span::{Span, Spanned};

const MAX_NESTING_DEPTH: u32 = 256;

pub(crate) struct Parser {
    tokens: Vec<Spanned<Lexeme>>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    depth: u32,
}

impl Parser {
    /// `tokens` must end with `Lexeme::Eof`, as produced by the lexer.
    pub(crate) fn new(tokens: Vec<Spanned<Lexeme>>) -> Self {
        let mut tokens = tokens;
        if !matches!(tokens.last().map(|t| &t.node), Some(Lexeme::Eof)) {
            let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
            tokens.push(Spanned::new(Lexeme::Eof, Span::new(end, end)));
        }
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
            depth: 0,
        }
    }

    fn enter_nesting(&mut self) -> bool {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            self.error_with_help(
                "nesting depth exceeded (maximum 256 levels)",
                "extract deeply nested code into separate functions",
            );
            return false;
        }
        true
    }

    fn exit_nesting(&mut self) {
        self.depth -= 1;
    }

    /// Abandon the rest of the input after an unrecoverable error.
    fn skip_to_eof(&mut self) {
        while !self.at(&Lexeme::Eof) {
            self.advance();
        }
    }

    pub(crate) fn parse_file(mut self) -> Result<File, Vec<Diagnostic>> {
        self.skip_semicolons();
        if !self.at(&Lexeme::Package) {
            self.error_with_help(
                &format!(
                    "expected 'package' clause at the start of file, found {}",
                    self.peek().description()
                ),
                "every Go source file begins with `package <name>`",
            );
            return Err(self.diagnostics);
        }
        self.advance();
        let package = self.expect_ident();
        self.expect_terminator();

        let mut decls = Vec::new();
        loop {
            self.skip_semicolons();
            if self.at(&Lexeme::Eof) {
                break;
            }
            let before = self.pos;
            let errors_before = self.diagnostics.len();
            if let Some(decl) = self.parse_top_level_decl() {
                decls.push(decl);
            }
            if self.diagnostics.len() > errors_before {
                self.synchronize_top_level(before);
            } else {
                self.expect_terminator();
            }
        }

        if !self.diagnostics.is_empty() {
            return Err(self.diagnostics);
        }
        Ok(File { package, decls })
    }

    /// After an error inside a declaration, skip ahead to the next
    /// top-level keyword so later declarations still get checked.
    fn synchronize_top_level(&mut self, started_at: usize) {
        if self.pos == started_at && !self.at(&Lexeme::Eof) {
            self.advance();
        }
        while !self.at(&Lexeme::Eof) {
            let at_decl = matches!(
                self.peek(),
                Lexeme::Const | Lexeme::Var | Lexeme::Type | Lexeme::Func | Lexeme::Import
            );
            if at_decl && matches!(self.prev(), Lexeme::Semicolon) {
                break;
            }
            self.advance();
        }
    }

    // --- Token helpers ---

    fn peek(&self) -> &Lexeme {
        &self.tokens[self.pos].node
    }

    /// Look `n` tokens past the current one, saturating at `Eof`.
    fn peek_nth(&self, n: usize) -> &Lexeme {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[idx].node
    }

    fn prev(&self) -> &Lexeme {
        if self.pos > 0 {
            &self.tokens[self.pos - 1].node
        } else {
            &Lexeme::Semicolon
        }
    }

    fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn prev_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            self.current_span()
        }
    }

    fn advance(&mut self) -> &Spanned<Lexeme> {
        let idx = self.pos;
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        &self.tokens[idx]
    }

    fn at(&self, token: &Lexeme) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    fn eat(&mut self, token: &Lexeme) -> bool {
        if self.at(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Lexeme) -> Span {
        if self.at(token) {
            let span = self.current_span();
            self.advance();
            span
        } else {
            self.error_at_current(&format!(
                "expected {}, found {}",
                token.description(),
                self.peek().description()
            ));
            self.current_span()
        }
    }

    fn expect_ident(&mut self) -> Spanned<String> {
        if let Lexeme::Ident(name) = self.peek().clone() {
            let span = self.current_span();
            self.advance();
            Spanned::new(name, span)
        } else {
            self.error_at_current(&format!(
                "expected identifier, found {}",
                self.peek().description()
            ));
            Spanned::new("_error_".to_string(), self.current_span())
        }
    }

    /// A statement or declaration ends with `;` (often inserted at a
    /// newline), or directly before a closing `)`/`}` or end of file.
    fn expect_terminator(&mut self) {
        if self.eat(&Lexeme::Semicolon) {
            return;
        }
        if matches!(self.peek(), Lexeme::RParen | Lexeme::RBrace | Lexeme::Eof) {
            return;
        }
        self.error_at_current(&format!(
            "expected ';' or newline, found {}",
            self.peek().description()
        ));
    }

    fn skip_semicolons(&mut self) {
        while self.eat(&Lexeme::Semicolon) {}
    }

    fn error_at_current(&mut self, msg: &str) {
        self.diagnostics
            .push(Diagnostic::error(msg.to_string(), self.current_span()));
    }

    fn error_with_help(&mut self, msg: &str, help: &str) {
        self.diagnostics.push(
            Diagnostic::error(msg.to_string(), self.current_span()).with_help(help.to_string()),
        );
    }

    fn error_unsupported(&mut self, what: &str) {
        self.error_with_help(
            &format!("{} not supported", what),
            "goquiche accepts package-level const, var, type and func \
             declarations with simple statements inside function bodies",
        );
    }
}
