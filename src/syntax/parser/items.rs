use crate::ast::*;
use crate::diagnostic::Diagnostic;
use crate::lexeme::Lexeme;
use crate::span::{Span, Spanned};

use super::Parser;

/// One comma-separated entry of a parameter list before Go's grouping
/// rule decides whether it is a name, a type, or both.
struct ParamEntry {
    name: Option<Spanned<String>>,
    ty: Option<Spanned<Type>>,
}

impl Parser {
    pub(super) fn parse_top_level_decl(&mut self) -> Option<Spanned<Decl>> {
        let start = self.current_span();
        let decl = match self.peek() {
            Lexeme::Import => self.parse_import_decl(),
            Lexeme::Const | Lexeme::Var => Decl::Value(self.parse_value_decl()),
            Lexeme::Type => Decl::Type(self.parse_type_decl()),
            Lexeme::Func => Decl::Func(self.parse_func_decl()),
            _ => {
                self.error_with_help(
                    &format!("expected declaration, found {}", self.peek().description()),
                    "top-level items are `import`, `const`, `var`, `type` or `func`",
                );
                return None;
            }
        };
        Some(Spanned::new(decl, start.merge(self.prev_span())))
    }

    fn parse_import_decl(&mut self) -> Decl {
        self.expect(&Lexeme::Import);
        let mut paths = Vec::new();
        if self.eat(&Lexeme::LParen) {
            self.skip_semicolons();
            while !self.at(&Lexeme::RParen) && !self.at(&Lexeme::Eof) {
                paths.push(self.parse_import_spec());
                self.expect_terminator();
                self.skip_semicolons();
            }
            self.expect(&Lexeme::RParen);
        } else {
            paths.push(self.parse_import_spec());
        }
        Decl::Import(paths)
    }

    fn parse_import_spec(&mut self) -> Spanned<String> {
        // Aliases (`f "fmt"`, `. "fmt"`) are accepted and dropped.
        if matches!(self.peek(), Lexeme::Ident(_) | Lexeme::Dot) {
            self.advance();
        }
        if let Lexeme::Str(path) = self.peek().clone() {
            let span = self.current_span();
            self.advance();
            Spanned::new(path, span)
        } else {
            self.error_at_current(&format!(
                "expected import path, found {}",
                self.peek().description()
            ));
            Spanned::new(String::new(), self.current_span())
        }
    }

    /// `const x = 5`, `var a, b int`, or a parenthesized group of specs.
    pub(super) fn parse_value_decl(&mut self) -> ValueDecl {
        let keyword = if self.eat(&Lexeme::Const) {
            ValueKeyword::Const
        } else {
            self.expect(&Lexeme::Var);
            ValueKeyword::Var
        };

        let mut specs = Vec::new();
        if self.eat(&Lexeme::LParen) {
            self.skip_semicolons();
            while !self.at(&Lexeme::RParen) && !self.at(&Lexeme::Eof) {
                let before = self.pos;
                specs.push(self.parse_value_spec(keyword));
                self.expect_terminator();
                self.skip_semicolons();
                if self.pos == before {
                    break;
                }
            }
            self.expect(&Lexeme::RParen);
        } else {
            specs.push(self.parse_value_spec(keyword));
        }
        ValueDecl { keyword, specs }
    }

    fn parse_value_spec(&mut self, keyword: ValueKeyword) -> Spanned<ValueSpec> {
        let start = self.current_span();
        let mut names = vec![self.expect_ident()];
        while self.eat(&Lexeme::Comma) {
            names.push(self.expect_ident());
        }

        let ty = if self.at_type_start() {
            Some(self.parse_type())
        } else {
            None
        };

        let values = if self.eat(&Lexeme::Assign) {
            self.parse_expr_list()
        } else {
            Vec::new()
        };

        if keyword == ValueKeyword::Var && ty.is_none() && values.is_empty() {
            self.error_with_help(
                "missing variable type or initialization",
                "write `var x T` or `var x = value`",
            );
        }
        if !values.is_empty() && values.len() != names.len() {
            self.error_at_current(&format!(
                "assignment mismatch: {} name(s) but {} value(s)",
                names.len(),
                values.len()
            ));
        }

        let span = start.merge(self.prev_span());
        Spanned::new(ValueSpec { names, ty, values }, span)
    }

    pub(super) fn parse_type_decl(&mut self) -> TypeDecl {
        self.expect(&Lexeme::Type);
        if self.at(&Lexeme::LParen) {
            self.error_unsupported("grouped type declarations are");
            return TypeDecl {
                name: Spanned::new("_error_".to_string(), self.current_span()),
                ty: Spanned::new(
                    Type::Named(QualifiedName::single("_error_".to_string())),
                    self.current_span(),
                ),
            };
        }
        let name = self.expect_ident();
        // Alias declarations (`type A = B`) read the same as definitions.
        self.eat(&Lexeme::Assign);
        let ty = self.parse_type();
        TypeDecl { name, ty }
    }

    fn parse_func_decl(&mut self) -> FuncDecl {
        self.expect(&Lexeme::Func);

        let receiver = if self.at(&Lexeme::LParen) {
            let open = self.current_span();
            let mut fields = self.parse_parameters();
            if fields.len() > 1 || fields.first().is_some_and(|f| f.node.names.len() > 1) {
                self.diagnostics.push(Diagnostic::error(
                    "method has multiple receivers".to_string(),
                    open.merge(self.prev_span()),
                ));
            }
            if fields.is_empty() {
                self.diagnostics.push(Diagnostic::error(
                    "method has no receiver".to_string(),
                    open.merge(self.prev_span()),
                ));
                None
            } else {
                Some(fields.swap_remove(0))
            }
        } else {
            None
        };

        let name = self.expect_ident();
        let signature = self.parse_signature();

        let body = if self.at(&Lexeme::LBrace) {
            Some(self.parse_block())
        } else {
            None
        };

        FuncDecl {
            receiver,
            name,
            signature,
            body,
        }
    }

    /// Parameters, then an optional result: a parenthesized list or a
    /// single bare type.
    pub(super) fn parse_signature(&mut self) -> Signature {
        let params = self.parse_parameters();
        let results = if self.at(&Lexeme::LParen) {
            self.parse_parameters()
        } else if self.at_type_start() {
            let ty = self.parse_type();
            let span = ty.span;
            vec![Spanned::new(
                Field {
                    names: Vec::new(),
                    ty,
                },
                span,
            )]
        } else {
            Vec::new()
        };
        Signature { params, results }
    }

    /// A parenthesized parameter list, resolved with Go's grouping rule:
    /// if any entry is `name Type`, every bare identifier is a name that
    /// shares the type of the next typed entry (`a, b int`); otherwise
    /// every entry is a type (`(int, string)`).
    pub(super) fn parse_parameters(&mut self) -> Vec<Spanned<Field>> {
        self.expect(&Lexeme::LParen);
        let mut entries = Vec::new();
        while !self.at(&Lexeme::RParen) && !self.at(&Lexeme::Eof) {
            let before = self.pos;
            entries.push(self.parse_param_entry());
            if !self.eat(&Lexeme::Comma) || self.pos == before {
                break;
            }
        }
        self.expect(&Lexeme::RParen);

        let named = entries.iter().any(|e| e.name.is_some() && e.ty.is_some());
        if !named {
            return entries
                .into_iter()
                .filter_map(|entry| {
                    let ty = match (entry.name, entry.ty) {
                        (_, Some(ty)) => ty,
                        (Some(name), None) => {
                            Spanned::new(Type::Named(QualifiedName::single(name.node)), name.span)
                        }
                        (None, None) => return None,
                    };
                    let span = ty.span;
                    Some(Spanned::new(
                        Field {
                            names: Vec::new(),
                            ty,
                        },
                        span,
                    ))
                })
                .collect();
        }

        let mut fields = Vec::new();
        let mut pending: Vec<Spanned<String>> = Vec::new();
        for entry in entries {
            match (entry.name, entry.ty) {
                (Some(name), None) => pending.push(name),
                (Some(name), Some(ty)) => {
                    pending.push(name);
                    let names = std::mem::take(&mut pending);
                    let field = Field { names, ty };
                    let span = field.span();
                    fields.push(Spanned::new(field, span));
                }
                (None, Some(ty)) => {
                    self.diagnostics.push(Diagnostic::error(
                        "mixed named and unnamed parameters".to_string(),
                        ty.span,
                    ));
                }
                (None, None) => {}
            }
        }
        if let Some(last) = pending.last() {
            self.diagnostics.push(Diagnostic::error(
                "missing parameter type".to_string(),
                last.span,
            ));
        }
        fields
    }

    fn parse_param_entry(&mut self) -> ParamEntry {
        if let Lexeme::Ident(name) = self.peek().clone() {
            // `pkg.Type` is a qualified type, never a name.
            if matches!(self.peek_nth(1), Lexeme::Dot) {
                return ParamEntry {
                    name: None,
                    ty: Some(self.parse_type()),
                };
            }
            let span = self.current_span();
            self.advance();
            let name = Spanned::new(name, span);
            if matches!(self.peek(), Lexeme::Comma | Lexeme::RParen) {
                return ParamEntry {
                    name: Some(name),
                    ty: None,
                };
            }
            return ParamEntry {
                name: Some(name),
                ty: Some(self.parse_type()),
            };
        }
        ParamEntry {
            name: None,
            ty: Some(self.parse_type()),
        }
    }

    // --- Types ---

    pub(super) fn at_type_start(&self) -> bool {
        matches!(
            self.peek(),
            Lexeme::Ident(_)
                | Lexeme::Star
                | Lexeme::LBracket
                | Lexeme::Map
                | Lexeme::Func
                | Lexeme::LParen
        ) || matches!(self.peek(), Lexeme::Reserved(word) if is_type_keyword(word))
    }

    pub(super) fn parse_type(&mut self) -> Spanned<Type> {
        let start = self.current_span();
        if !self.enter_nesting() {
            self.skip_to_eof();
            return error_type(start);
        }

        let ty = match self.peek().clone() {
            Lexeme::Ident(_) => Type::Named(self.parse_qualified_name()),
            Lexeme::Star => {
                self.advance();
                Type::Pointer(Box::new(self.parse_type()))
            }
            Lexeme::LBracket => {
                self.advance();
                if self.eat(&Lexeme::RBracket) {
                    Type::Slice(Box::new(self.parse_type()))
                } else {
                    let len = self.parse_expr();
                    self.expect(&Lexeme::RBracket);
                    let elem = self.parse_type();
                    Type::Array {
                        len: Box::new(len),
                        elem: Box::new(elem),
                    }
                }
            }
            Lexeme::Map => {
                self.advance();
                self.expect(&Lexeme::LBracket);
                let key = self.parse_type();
                self.expect(&Lexeme::RBracket);
                let value = self.parse_type();
                Type::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                }
            }
            Lexeme::Func => {
                self.advance();
                Type::Func(self.parse_signature())
            }
            Lexeme::LParen => {
                self.advance();
                let inner = self.parse_type();
                self.expect(&Lexeme::RParen);
                self.exit_nesting();
                return Spanned::new(inner.node, start.merge(self.prev_span()));
            }
            Lexeme::Reserved(word) if is_type_keyword(&word) => {
                self.error_unsupported(&format!("`{}` types are", word));
                self.advance();
                self.exit_nesting();
                return error_type(start);
            }
            other => {
                self.error_at_current(&format!("expected type, found {}", other.description()));
                self.exit_nesting();
                return error_type(start);
            }
        };

        self.exit_nesting();
        Spanned::new(ty, start.merge(self.prev_span()))
    }

    fn parse_qualified_name(&mut self) -> QualifiedName {
        let first = self.expect_ident();
        let mut parts = vec![first.node];
        if self.at(&Lexeme::Dot) && matches!(self.peek_nth(1), Lexeme::Ident(_)) {
            self.advance();
            parts.push(self.expect_ident().node);
        }
        QualifiedName(parts)
    }
}

fn is_type_keyword(word: &str) -> bool {
    matches!(word, "struct" | "interface" | "chan")
}

fn error_type(span: Span) -> Spanned<Type> {
    Spanned::new(
        Type::Named(QualifiedName::single("_error_".to_string())),
        span,
    )
}
