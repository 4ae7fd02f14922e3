pub mod api;
pub mod ast;
pub mod config;
pub mod diagnostic;
pub mod godel;
pub mod syntax;

// Re-exports: `goquiche::span`, `goquiche::lexer`, ...
pub use syntax::lexeme;
pub use syntax::lexer;
pub use syntax::parser;
pub use syntax::span;

// Re-export public API: `goquiche::encode_program()` etc.
pub use api::*;

use diagnostic::{render_diagnostics, Diagnostic};
use lexer::Lexer;
use parser::Parser;

/// Lex and parse Go source, rendering any diagnostics to stderr.
pub fn parse_source(source: &str, filename: &str) -> Result<ast::File, Vec<Diagnostic>> {
    let (tokens, lex_errors) = Lexer::new(source).tokenize();
    if !lex_errors.is_empty() {
        render_diagnostics(&lex_errors, filename, source);
        return Err(lex_errors);
    }

    match Parser::new(tokens).parse_file() {
        Ok(file) => Ok(file),
        Err(errors) => {
            render_diagnostics(&errors, filename, source);
            Err(errors)
        }
    }
}

/// Lex and parse Go source without rendering diagnostics.
pub fn parse_source_silent(source: &str, _filename: &str) -> Result<ast::File, Vec<Diagnostic>> {
    let (tokens, lex_errors) = Lexer::new(source).tokenize();
    if !lex_errors.is_empty() {
        return Err(lex_errors);
    }
    Parser::new(tokens).parse_file()
}
