//! Node encoder: turns AST subtrees into Gödel numbers.
//!
//! Each node's number is its own keyword/operator term times the numbers
//! of its children, all resolved through one shared [`SymbolRegistry`].
//! Terms are resolved in the order they are multiplied, so the first
//! symbol of a fresh registry gets the smallest prime.

use num_bigint::BigUint;

use super::aggregate::Product;
use super::error::{GodelError, Result};
use super::registry::SymbolRegistry;
use crate::ast::display::format_expr;
use crate::ast::*;
use crate::diagnostic::Diagnostic;
use crate::span::{Span, Spanned};

/// A node's contribution to the program number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Encoded {
    Number(BigUint),
    /// The node kind is not encoded. Multiplying by this is a no-op.
    NoContribution,
}

impl Encoded {
    pub fn number(&self) -> Option<&BigUint> {
        match self {
            Encoded::Number(n) => Some(n),
            Encoded::NoContribution => None,
        }
    }

    pub fn is_contribution(&self) -> bool {
        matches!(self, Encoded::Number(_))
    }
}

impl From<Product> for Encoded {
    fn from(product: Product) -> Self {
        Encoded::Number(product.finish())
    }
}

/// A node the encoder skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unsupported {
    pub kind: NodeKind,
    pub span: Span,
}

impl Unsupported {
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::warning(format!("{} is not encoded", self.kind), self.span);
        match self.kind {
            NodeKind::Receiver => diag.with_note(
                "the method is encoded as a plain function without its receiver".to_string(),
            ),
            _ => diag.with_note("it contributes nothing to the program number".to_string()),
        }
    }
}

pub struct Encoder<'r> {
    registry: &'r SymbolRegistry,
    unsupported: Vec<Unsupported>,
}

impl<'r> Encoder<'r> {
    pub fn new(registry: &'r SymbolRegistry) -> Self {
        Self {
            registry,
            unsupported: Vec::new(),
        }
    }

    /// Nodes skipped so far, in encounter order.
    pub fn unsupported(&self) -> &[Unsupported] {
        &self.unsupported
    }

    pub fn into_unsupported(self) -> Vec<Unsupported> {
        self.unsupported
    }

    fn mul_symbol(&self, product: &mut Product, symbol: &str) -> Result<()> {
        let entry = self.registry.resolve(symbol)?;
        product.mul_term(&entry.term);
        Ok(())
    }

    fn skip(&mut self, kind: NodeKind, span: Span) -> Encoded {
        tracing::warn!(
            kind = %kind,
            start = span.start,
            end = span.end,
            "node kind is not encoded"
        );
        self.unsupported.push(Unsupported { kind, span });
        Encoded::NoContribution
    }

    // --- Declarations ---

    pub fn encode_decl(&mut self, decl: &Spanned<Decl>) -> Result<Encoded> {
        self.encode_decl_at(&decl.node, decl.span)
    }

    fn encode_decl_at(&mut self, decl: &Decl, span: Span) -> Result<Encoded> {
        match decl {
            Decl::Value(value) => self.encode_value_decl(value),
            Decl::Func(func) => self.encode_func_decl(func),
            Decl::Type(_) | Decl::Import(_) => Ok(self.skip(decl.kind(), span)),
        }
    }

    /// keyword × names × type × values, once per spec.
    fn encode_value_decl(&mut self, decl: &ValueDecl) -> Result<Encoded> {
        let mut product = Product::new();
        for spec in &decl.specs {
            if spec.node.names.is_empty() {
                return Err(GodelError::MalformedNode {
                    kind: NodeKind::ValueDecl,
                    reason: format!("`{}` spec declares no names", decl.keyword.as_str()),
                    span: spec.span,
                });
            }
            self.mul_symbol(&mut product, decl.keyword.as_str())?;
            for name in &spec.node.names {
                self.mul_symbol(&mut product, &name.node)?;
            }
            if let Some(ty) = &spec.node.ty {
                let encoded = self.encode_type(ty)?;
                product.mul_encoded(&encoded);
            }
            for value in &spec.node.values {
                let encoded = self.encode_expr(value)?;
                product.mul_encoded(&encoded);
            }
        }
        Ok(product.into())
    }

    /// func × name × params × body statements.
    fn encode_func_decl(&mut self, func: &FuncDecl) -> Result<Encoded> {
        if let Some(receiver) = &func.receiver {
            self.skip(NodeKind::Receiver, receiver.span);
        }

        let mut product = Product::new();
        self.mul_symbol(&mut product, "func")?;
        self.mul_symbol(&mut product, &func.name.node)?;
        for param in &func.signature.params {
            let encoded = self.encode_field(param)?;
            product.mul_encoded(&encoded);
        }
        if let Some(body) = &func.body {
            for stmt in &body.node.stmts {
                let encoded = self.encode_stmt(stmt)?;
                product.mul_encoded(&encoded);
            }
        }
        Ok(product.into())
    }

    /// Named fields contribute their names, unnamed ones their type.
    pub fn encode_field(&mut self, field: &Spanned<Field>) -> Result<Encoded> {
        if field.node.names.is_empty() {
            return self.encode_type(&field.node.ty);
        }
        let mut product = Product::new();
        for name in &field.node.names {
            self.mul_symbol(&mut product, &name.node)?;
        }
        Ok(product.into())
    }

    // --- Statements ---

    pub fn encode_block(&mut self, block: &Block) -> Result<Encoded> {
        let mut product = Product::new();
        for stmt in &block.stmts {
            let encoded = self.encode_stmt(stmt)?;
            product.mul_encoded(&encoded);
        }
        Ok(product.into())
    }

    pub fn encode_stmt(&mut self, stmt: &Spanned<Stmt>) -> Result<Encoded> {
        match &stmt.node {
            Stmt::Decl(decl) => self.encode_decl_at(decl, stmt.span),
            Stmt::Expr(expr) => self.encode_expr(expr),
            Stmt::IncDec { operand, op } => {
                let mut product = Product::new();
                self.mul_symbol(&mut product, op.as_str())?;
                let encoded = self.encode_expr(operand)?;
                product.mul_encoded(&encoded);
                // Registered so repeated `i++` statements share one entry;
                // the compound itself is not part of the number.
                self.registry
                    .register_compound(&format_expr(&operand.node), op.as_str())?;
                Ok(product.into())
            }
            Stmt::Assign { lhs, op, rhs } => {
                let mut product = Product::new();
                self.mul_symbol(&mut product, op.as_str())?;
                for expr in lhs.iter().chain(rhs) {
                    let encoded = self.encode_expr(expr)?;
                    product.mul_encoded(&encoded);
                }
                Ok(product.into())
            }
            Stmt::Return(results) => {
                let mut product = Product::new();
                self.mul_symbol(&mut product, "return")?;
                for expr in results {
                    let encoded = self.encode_expr(expr)?;
                    product.mul_encoded(&encoded);
                }
                Ok(product.into())
            }
            Stmt::Block(block) => self.encode_block(block),
            Stmt::If { .. } | Stmt::For { .. } | Stmt::Branch(_) => {
                Ok(self.skip(stmt.node.kind(), stmt.span))
            }
        }
    }

    // --- Expressions ---

    pub fn encode_expr(&mut self, expr: &Spanned<Expr>) -> Result<Encoded> {
        match &expr.node {
            Expr::Ident(name) => self.encode_leaf(name),
            Expr::Lit(lit) => self.encode_leaf(&lit.text),
            Expr::Binary { op, lhs, rhs } => {
                let mut product = Product::new();
                self.mul_symbol(&mut product, op.as_str())?;
                let lhs = self.encode_expr(lhs)?;
                product.mul_encoded(&lhs);
                let rhs = self.encode_expr(rhs)?;
                product.mul_encoded(&rhs);
                Ok(product.into())
            }
            Expr::Unary { op, operand } => {
                let mut product = Product::new();
                self.mul_symbol(&mut product, op.as_str())?;
                let operand = self.encode_expr(operand)?;
                product.mul_encoded(&operand);
                Ok(product.into())
            }
            Expr::Paren(inner) => self.encode_expr(inner),
            Expr::Call { callee, args } => {
                let Some(name) = callee.node.qualified_name() else {
                    return Err(GodelError::MalformedNode {
                        kind: NodeKind::CallExpr,
                        reason: format!(
                            "callee must be an identifier or qualified name, found {}",
                            callee.node.kind()
                        ),
                        span: callee.span,
                    });
                };
                let mut product = Product::new();
                self.mul_symbol(&mut product, &name.as_dotted())?;
                for arg in args {
                    let encoded = self.encode_expr(arg)?;
                    product.mul_encoded(&encoded);
                }
                Ok(product.into())
            }
            Expr::Selector { .. } => match expr.node.qualified_name() {
                Some(name) => self.encode_leaf(&name.as_dotted()),
                None => Ok(self.skip(NodeKind::SelectorExpr, expr.span)),
            },
            Expr::Index { .. } => Ok(self.skip(NodeKind::IndexExpr, expr.span)),
        }
    }

    fn encode_leaf(&mut self, symbol: &str) -> Result<Encoded> {
        let entry = self.registry.resolve(symbol)?;
        Ok(Encoded::Number(entry.term.clone()))
    }

    // --- Types ---

    pub fn encode_type(&mut self, ty: &Spanned<Type>) -> Result<Encoded> {
        match &ty.node {
            Type::Named(name) => self.encode_leaf(&name.as_dotted()),
            Type::Func(sig) => {
                let mut product = Product::new();
                self.mul_symbol(&mut product, "func")?;
                for field in sig.params.iter().chain(&sig.results) {
                    let encoded = self.encode_field(field)?;
                    product.mul_encoded(&encoded);
                }
                Ok(product.into())
            }
            Type::Pointer(_) | Type::Slice(_) | Type::Array { .. } | Type::Map { .. } => {
                Ok(self.skip(ty.node.kind(), ty.span))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_source_silent;

    fn decls(source: &str) -> Vec<Spanned<Decl>> {
        match parse_source_silent(source, "test.go") {
            Ok(file) => file.decls,
            Err(errors) => panic!("parse errors: {:?}", errors),
        }
    }

    fn encode_all(source: &str, registry: &SymbolRegistry) -> (Vec<Encoded>, Vec<Unsupported>) {
        let mut encoder = Encoder::new(registry);
        let encoded = decls(source)
            .iter()
            .map(|d| encoder.encode_decl(d).unwrap())
            .collect();
        (encoded, encoder.into_unsupported())
    }

    fn term(registry: &SymbolRegistry, symbol: &str) -> BigUint {
        match registry.get(symbol) {
            Some(entry) => entry.term.clone(),
            None => panic!("`{}` was never registered", symbol),
        }
    }

    fn product_of(registry: &SymbolRegistry, symbols: &[&str]) -> BigUint {
        symbols
            .iter()
            .fold(BigUint::from(1u32), |acc, s| acc * term(registry, s))
    }

    #[test]
    fn test_const_scenario() {
        let registry = SymbolRegistry::new();
        let (encoded, unsupported) = encode_all("package main\nconst x = 5\n", &registry);
        assert_eq!(encoded, vec![Encoded::Number(BigUint::from(2_701_125u32))]);
        assert!(unsupported.is_empty());
        let symbols: Vec<String> = registry.entries().iter().map(|e| e.symbol.clone()).collect();
        assert_eq!(symbols, vec!["const", "x", "5"]);
    }

    #[test]
    fn test_binary_expression_value() {
        let registry = SymbolRegistry::new();
        let (encoded, _) = encode_all("package p\nconst y = a + b * c\n", &registry);
        let expected = product_of(&registry, &["const", "y", "+", "a", "*", "b", "c"]);
        assert_eq!(encoded[0], Encoded::Number(expected));
    }

    #[test]
    fn test_typed_var_and_grouped_specs() {
        let registry = SymbolRegistry::new();
        let (encoded, _) = encode_all("package p\nvar (\n\tx int = 1\n\ty = -x\n)\n", &registry);
        let expected = product_of(&registry, &["var", "x", "int", "1", "var", "y", "-", "x"]);
        assert_eq!(encoded[0], Encoded::Number(expected));
    }

    #[test]
    fn test_parenthesized_expression_is_transparent() {
        let registry = SymbolRegistry::new();
        let (with_parens, _) = encode_all("package p\nconst z = (a)\n", &registry);
        let (without, _) = encode_all("package p\nconst z = a\n", &registry);
        assert_eq!(with_parens, without);
    }

    #[test]
    fn test_function_with_params_and_body() {
        let registry = SymbolRegistry::new();
        let (encoded, _) = encode_all(
            "package p\nfunc add(a, b int) int {\n\treturn a + b\n}\n",
            &registry,
        );
        let expected = product_of(
            &registry,
            &["func", "add", "a", "b", "return", "+", "a", "b"],
        );
        assert_eq!(encoded[0], Encoded::Number(expected));
        // Named parameters contribute names only.
        assert!(registry.get("int").is_none());
    }

    #[test]
    fn test_unnamed_params_contribute_types() {
        let registry = SymbolRegistry::new();
        let (encoded, _) = encode_all("package p\nfunc f(int, string)\n", &registry);
        let expected = product_of(&registry, &["func", "f", "int", "string"]);
        assert_eq!(encoded[0], Encoded::Number(expected));
    }

    #[test]
    fn test_call_with_qualified_callee() {
        let registry = SymbolRegistry::new();
        let (encoded, _) = encode_all(
            "package p\nfunc main() {\n\tfmt.Println(x, 1)\n}\n",
            &registry,
        );
        let expected = product_of(&registry, &["func", "main", "fmt.Println", "x", "1"]);
        assert_eq!(encoded[0], Encoded::Number(expected));
        assert!(registry.get("fmt").is_none());
    }

    #[test]
    fn test_call_with_computed_callee_is_malformed() {
        let registry = SymbolRegistry::new();
        let file = decls("package p\nfunc main() {\n\tg()(1)\n}\n");
        let mut encoder = Encoder::new(&registry);
        match encoder.encode_decl(&file[0]) {
            Err(GodelError::MalformedNode { kind, .. }) => assert_eq!(kind, NodeKind::CallExpr),
            other => panic!("expected malformed call, got {:?}", other),
        }
    }

    #[test]
    fn test_inc_dec_registers_compound() {
        let registry = SymbolRegistry::new();
        let (encoded, _) = encode_all(
            "package p\nfunc f() {\n\ti++\n\ti++\n\tj--\n}\n",
            &registry,
        );
        let expected = product_of(
            &registry,
            &["func", "f", "++", "i", "++", "i", "--", "j"],
        );
        assert_eq!(encoded[0], Encoded::Number(expected));
        let i_inc = registry.get("i++").unwrap();
        assert!(registry.get("j--").is_some());
        // The compound is registered once and not multiplied in.
        let number = encoded[0].number().unwrap();
        assert_ne!(number % &i_inc.term, BigUint::from(0u32));
    }

    #[test]
    fn test_assignment_forms() {
        let registry = SymbolRegistry::new();
        let (encoded, _) = encode_all(
            "package p\nfunc f() {\n\tx := 1\n\tx += y\n\ta, b = b, a\n}\n",
            &registry,
        );
        let expected = product_of(
            &registry,
            &[
                "func", "f", ":=", "x", "1", "+=", "x", "y", "=", "a", "b", "b", "a",
            ],
        );
        assert_eq!(encoded[0], Encoded::Number(expected));
    }

    #[test]
    fn test_unsupported_statement_does_not_zero() {
        let registry = SymbolRegistry::new();
        let (encoded, unsupported) = encode_all(
            "package p\nfunc f(x int) int {\n\tif x > 0 {\n\t\tx--\n\t}\n\tfor {\n\t}\n\treturn x\n}\n",
            &registry,
        );
        let expected = product_of(&registry, &["func", "f", "x", "return", "x"]);
        assert_eq!(encoded[0], Encoded::Number(expected));
        let kinds: Vec<NodeKind> = unsupported.iter().map(|u| u.kind).collect();
        assert_eq!(kinds, vec![NodeKind::IfStmt, NodeKind::ForStmt]);
        // Skipped subtrees register nothing.
        assert!(registry.get("x--").is_none());
        assert!(registry.get(">").is_none());
    }

    #[test]
    fn test_type_and_import_declarations_contribute_nothing() {
        let registry = SymbolRegistry::new();
        let (encoded, unsupported) =
            encode_all("package p\nimport \"fmt\"\ntype T int\n", &registry);
        assert_eq!(
            encoded,
            vec![Encoded::NoContribution, Encoded::NoContribution]
        );
        assert_eq!(unsupported.len(), 2);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_composite_type_skipped_inside_value_decl() {
        let registry = SymbolRegistry::new();
        let (encoded, unsupported) = encode_all("package p\nvar xs []int\n", &registry);
        let expected = product_of(&registry, &["var", "xs"]);
        assert_eq!(encoded[0], Encoded::Number(expected));
        assert_eq!(unsupported[0].kind, NodeKind::SliceType);
    }

    #[test]
    fn test_func_type() {
        let registry = SymbolRegistry::new();
        let (encoded, _) = encode_all("package p\nvar f func(int) bool\n", &registry);
        let expected = product_of(&registry, &["var", "f", "func", "int", "bool"]);
        assert_eq!(encoded[0], Encoded::Number(expected));
    }

    #[test]
    fn test_receiver_recorded_not_encoded() {
        let registry = SymbolRegistry::new();
        let (encoded, unsupported) =
            encode_all("package p\nfunc (s *Stack) Len() int {\n\treturn n\n}\n", &registry);
        let expected = product_of(&registry, &["func", "Len", "return", "n"]);
        assert_eq!(encoded[0], Encoded::Number(expected));
        assert_eq!(unsupported[0].kind, NodeKind::Receiver);
        assert!(registry.get("s").is_none());
        let diag = unsupported[0].to_diagnostic();
        assert!(!diag.is_error());
        assert!(diag.message.contains("method receiver"));
    }

    #[test]
    fn test_nested_block_and_local_decl() {
        let registry = SymbolRegistry::new();
        let (encoded, unsupported) = encode_all(
            "package p\nfunc f() {\n\t{\n\t\tconst k = 2\n\t}\n\ttype L int\n}\n",
            &registry,
        );
        let expected = product_of(&registry, &["func", "f", "const", "k", "2"]);
        assert_eq!(encoded[0], Encoded::Number(expected));
        assert_eq!(unsupported[0].kind, NodeKind::TypeDecl);
    }

    #[test]
    fn test_empty_function_body() {
        let registry = SymbolRegistry::new();
        let (encoded, _) = encode_all("package p\nfunc f() {}\n", &registry);
        let expected = product_of(&registry, &["func", "f"]);
        assert_eq!(encoded[0], Encoded::Number(expected));
    }
}
