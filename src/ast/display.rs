//! Canonical Go rendering of AST expressions and types.
//!
//! This is the single source of truth for turning a subtree back into
//! text: compound symbols (`i++`) and diagnostics both go through it.

use super::{Expr, Field, Signature, Type};

/// Render an expression as Go source, normalizing whitespace.
pub fn format_expr(expr: &Expr) -> String {
    match expr {
        Expr::Ident(name) => name.clone(),
        Expr::Lit(lit) => lit.text.clone(),
        Expr::Binary { op, lhs, rhs } => format!(
            "{} {} {}",
            format_expr(&lhs.node),
            op.as_str(),
            format_expr(&rhs.node)
        ),
        Expr::Unary { op, operand } => format!("{}{}", op.as_str(), format_expr(&operand.node)),
        Expr::Call { callee, args } => {
            let args: Vec<_> = args.iter().map(|a| format_expr(&a.node)).collect();
            format!("{}({})", format_expr(&callee.node), args.join(", "))
        }
        Expr::Selector { base, field } => format!("{}.{}", format_expr(&base.node), field.node),
        Expr::Index { base, index } => {
            format!("{}[{}]", format_expr(&base.node), format_expr(&index.node))
        }
        Expr::Paren(inner) => format!("({})", format_expr(&inner.node)),
    }
}

/// Render a type as Go source.
pub fn format_type(ty: &Type) -> String {
    match ty {
        Type::Named(name) => name.as_dotted(),
        Type::Pointer(inner) => format!("*{}", format_type(&inner.node)),
        Type::Slice(elem) => format!("[]{}", format_type(&elem.node)),
        Type::Array { len, elem } => {
            format!("[{}]{}", format_expr(&len.node), format_type(&elem.node))
        }
        Type::Map { key, value } => {
            format!("map[{}]{}", format_type(&key.node), format_type(&value.node))
        }
        Type::Func(sig) => format!("func{}", format_signature(sig)),
    }
}

/// `(a, b int, s string) (int, error)`; a single unnamed result is
/// written without parentheses.
pub fn format_signature(sig: &Signature) -> String {
    let params: Vec<_> = sig.params.iter().map(|p| format_field(&p.node)).collect();
    let mut out = format!("({})", params.join(", "));
    match sig.results.as_slice() {
        [] => {}
        [only] if only.node.names.is_empty() => {
            out.push(' ');
            out.push_str(&format_type(&only.node.ty.node));
        }
        results => {
            let results: Vec<_> = results.iter().map(|r| format_field(&r.node)).collect();
            out.push_str(&format!(" ({})", results.join(", ")));
        }
    }
    out
}

pub fn format_field(field: &Field) -> String {
    let ty = format_type(&field.ty.node);
    if field.names.is_empty() {
        return ty;
    }
    let names: Vec<_> = field.names.iter().map(|n| n.node.as_str()).collect();
    format!("{} {}", names.join(", "), ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BasicLit, BinOp, LitKind, QualifiedName, UnaryOp};
    use crate::span::Spanned;

    fn ident(name: &str) -> Spanned<Expr> {
        Spanned::dummy(Expr::Ident(name.to_string()))
    }

    fn named(name: &str) -> Spanned<Type> {
        Spanned::dummy(Type::Named(QualifiedName::single(name.to_string())))
    }

    #[test]
    fn test_format_binary_and_unary() {
        let expr = Expr::Binary {
            op: BinOp::Add,
            lhs: Box::new(ident("a")),
            rhs: Box::new(Spanned::dummy(Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(Spanned::dummy(Expr::Lit(BasicLit {
                    kind: LitKind::Int,
                    text: "0x1F".to_string(),
                }))),
            })),
        };
        assert_eq!(format_expr(&expr), "a + -0x1F");
    }

    #[test]
    fn test_format_selector_index_call() {
        let expr = Expr::Call {
            callee: Box::new(Spanned::dummy(Expr::Selector {
                base: Box::new(ident("fmt")),
                field: Spanned::dummy("Println".to_string()),
            })),
            args: vec![
                Spanned::dummy(Expr::Index {
                    base: Box::new(ident("xs")),
                    index: Box::new(ident("i")),
                }),
                ident("y"),
            ],
        };
        assert_eq!(format_expr(&expr), "fmt.Println(xs[i], y)");
    }

    #[test]
    fn test_format_types() {
        let ty = Type::Map {
            key: Box::new(named("string")),
            value: Box::new(Spanned::dummy(Type::Slice(Box::new(Spanned::dummy(
                Type::Pointer(Box::new(named("int"))),
            ))))),
        };
        assert_eq!(format_type(&ty), "map[string][]*int");
    }

    #[test]
    fn test_format_func_type() {
        let sig = Signature {
            params: vec![Spanned::dummy(Field {
                names: vec![Spanned::dummy("a".to_string()), Spanned::dummy("b".to_string())],
                ty: named("int"),
            })],
            results: vec![Spanned::dummy(Field {
                names: Vec::new(),
                ty: named("bool"),
            })],
        };
        assert_eq!(format_type(&Type::Func(sig)), "func(a, b int) bool");
    }
}
