use super::*;
use crate::lexer::Lexer;

fn parse(source: &str) -> File {
    let (tokens, lex_errors) = Lexer::new(source).tokenize();
    assert!(lex_errors.is_empty(), "lex errors: {:?}", lex_errors);
    match Parser::new(tokens).parse_file() {
        Ok(file) => file,
        Err(errors) => panic!("parse errors: {:?}", errors),
    }
}

fn parse_err(source: &str) -> Vec<Diagnostic> {
    let (tokens, lex_errors) = Lexer::new(source).tokenize();
    assert!(lex_errors.is_empty(), "lex errors: {:?}", lex_errors);
    match Parser::new(tokens).parse_file() {
        Ok(_) => panic!("expected parse errors for {:?}", source),
        Err(errors) => errors,
    }
}

fn only_func(file: &File) -> &FuncDecl {
    match file.decls.iter().find_map(|d| match &d.node {
        Decl::Func(f) => Some(f),
        _ => None,
    }) {
        Some(f) => f,
        None => panic!("no function in file"),
    }
}

fn body_stmts(file: &File) -> &[Spanned<Stmt>] {
    let func = only_func(file);
    match &func.body {
        Some(body) => &body.node.stmts,
        None => panic!("function has no body"),
    }
}

#[test]
fn test_package_and_const() {
    let file = parse("package main\n\nconst x = 5\n");
    assert_eq!(file.package.node, "main");
    assert_eq!(file.decls.len(), 1);
    match &file.decls[0].node {
        Decl::Value(decl) => {
            assert_eq!(decl.keyword, ValueKeyword::Const);
            assert_eq!(decl.specs.len(), 1);
            let spec = &decl.specs[0].node;
            assert_eq!(spec.names[0].node, "x");
            assert!(spec.ty.is_none());
            match &spec.values[0].node {
                Expr::Lit(lit) => {
                    assert_eq!(lit.kind, LitKind::Int);
                    assert_eq!(lit.text, "5");
                }
                other => panic!("expected literal, got {:?}", other),
            }
        }
        other => panic!("expected value decl, got {:?}", other),
    }
}

#[test]
fn test_imports_single_and_grouped() {
    let file = parse("package main\nimport \"fmt\"\nimport (\n\t\"os\"\n\tstr \"strings\"\n)\n");
    let paths: Vec<&str> = file
        .decls
        .iter()
        .flat_map(|d| match &d.node {
            Decl::Import(paths) => paths.iter().map(|p| p.node.as_str()).collect::<Vec<_>>(),
            _ => Vec::new(),
        })
        .collect();
    assert_eq!(paths, vec!["\"fmt\"", "\"os\"", "\"strings\""]);
}

#[test]
fn test_grouped_var_with_type() {
    let file = parse("package p\nvar (\n\ta, b int = 1, 2\n\tc = \"s\"\n)\n");
    match &file.decls[0].node {
        Decl::Value(decl) => {
            assert_eq!(decl.keyword, ValueKeyword::Var);
            assert_eq!(decl.specs.len(), 2);
            let first = &decl.specs[0].node;
            assert_eq!(first.names.len(), 2);
            assert!(matches!(
                first.ty.as_ref().map(|t| &t.node),
                Some(Type::Named(name)) if name.as_dotted() == "int"
            ));
            assert_eq!(first.values.len(), 2);
        }
        other => panic!("expected value decl, got {:?}", other),
    }
}

#[test]
fn test_func_params_grouping() {
    let file = parse("package p\nfunc add(a, b int, s string) (int, error) {\n\treturn a + b, nil\n}\n");
    let func = only_func(&file);
    assert_eq!(func.name.node, "add");
    let params = &func.signature.params;
    assert_eq!(params.len(), 2);
    let names: Vec<&str> = params[0].node.names.iter().map(|n| n.node.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(params[1].node.names[0].node, "s");

    let results = &func.signature.results;
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.node.names.is_empty()));
}

#[test]
fn test_unnamed_params_are_types() {
    let file = parse("package p\nfunc f(int, pkg.T) {}\n");
    let params = &only_func(&file).signature.params;
    assert_eq!(params.len(), 2);
    assert!(params.iter().all(|p| p.node.names.is_empty()));
    match &params[1].node.ty.node {
        Type::Named(name) => assert_eq!(name.as_dotted(), "pkg.T"),
        other => panic!("expected named type, got {:?}", other),
    }
}

#[test]
fn test_single_result_type() {
    let file = parse("package p\nfunc f() int { return 1 }\n");
    let results = &only_func(&file).signature.results;
    assert_eq!(results.len(), 1);
    assert!(results[0].node.names.is_empty());
}

#[test]
fn test_method_receiver() {
    let file = parse("package p\nfunc (s *Stack) Push(v int) {}\n");
    let func = only_func(&file);
    let recv = func.receiver.as_ref().map(|r| &r.node);
    assert!(matches!(recv, Some(Field { names, ty }) if names[0].node == "s"
        && matches!(ty.node, Type::Pointer(_))));
}

#[test]
fn test_func_without_body() {
    let file = parse("package p\nfunc external(x int) int\n");
    assert!(only_func(&file).body.is_none());
}

#[test]
fn test_precedence() {
    let file = parse("package p\nconst x = 1 + 2 * 3\n");
    let Decl::Value(decl) = &file.decls[0].node else {
        panic!("expected value decl");
    };
    match &decl.specs[0].node.values[0].node {
        Expr::Binary { op, rhs, .. } => {
            assert_eq!(*op, BinOp::Add);
            assert!(matches!(rhs.node, Expr::Binary { op: BinOp::Mul, .. }));
        }
        other => panic!("expected binary, got {:?}", other),
    }
}

#[test]
fn test_left_associative() {
    let file = parse("package p\nconst x = a - b - c\n");
    let Decl::Value(decl) = &file.decls[0].node else {
        panic!("expected value decl");
    };
    match &decl.specs[0].node.values[0].node {
        Expr::Binary { op, lhs, .. } => {
            assert_eq!(*op, BinOp::Sub);
            assert!(matches!(lhs.node, Expr::Binary { op: BinOp::Sub, .. }));
        }
        other => panic!("expected binary, got {:?}", other),
    }
}

#[test]
fn test_statements() {
    let file = parse(
        "package p\nfunc f() {\n\tx := 1\n\tx += 2\n\tx++\n\tfmt.Println(x)\n\t{\n\t}\n\treturn\n}\n",
    );
    let kinds: Vec<NodeKind> = body_stmts(&file).iter().map(|s| s.node.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::AssignStmt,
            NodeKind::AssignStmt,
            NodeKind::IncDecStmt,
            NodeKind::ExprStmt,
            NodeKind::Block,
            NodeKind::ReturnStmt,
        ]
    );
    match &body_stmts(&file)[1].node {
        Stmt::Assign { op, .. } => assert_eq!(*op, AssignOp::Add),
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn test_if_else_chain() {
    let file = parse(
        "package p\nfunc f(x int) {\n\tif y := x; y > 0 {\n\t} else if x < 0 {\n\t} else {\n\t}\n}\n",
    );
    match &body_stmts(&file)[0].node {
        Stmt::If {
            init, else_branch, ..
        } => {
            assert!(init.is_some());
            let Some(else_branch) = else_branch else {
                panic!("expected else branch");
            };
            match &else_branch.node {
                Stmt::If { else_branch, .. } => assert!(matches!(
                    else_branch.as_ref().map(|b| &b.node),
                    Some(Stmt::Block(_))
                )),
                other => panic!("expected else-if, got {:?}", other),
            }
        }
        other => panic!("expected if, got {:?}", other),
    }
}

#[test]
fn test_for_forms() {
    let file = parse(
        "package p\nfunc f() {\n\tfor {\n\t\tbreak\n\t}\n\tfor i < 3 {\n\t}\n\tfor i := 0; i < 10; i++ {\n\t\tcontinue\n\t}\n}\n",
    );
    let stmts = body_stmts(&file);
    assert!(matches!(&stmts[0].node, Stmt::For { init: None, cond: None, post: None, .. }));
    assert!(matches!(&stmts[1].node, Stmt::For { init: None, cond: Some(_), post: None, .. }));
    assert!(matches!(&stmts[2].node, Stmt::For { init: Some(_), cond: Some(_), post: Some(_), .. }));
}

#[test]
fn test_types() {
    let file = parse("package p\nvar m map[string][]*int\nvar a [4]byte\nvar f func(int) bool\n");
    let types: Vec<NodeKind> = file
        .decls
        .iter()
        .filter_map(|d| match &d.node {
            Decl::Value(v) => v.specs[0].node.ty.as_ref().map(|t| t.node.kind()),
            _ => None,
        })
        .collect();
    assert_eq!(
        types,
        vec![NodeKind::MapType, NodeKind::ArrayType, NodeKind::FuncType]
    );
}

#[test]
fn test_type_decl() {
    let file = parse("package p\ntype Celsius float64\ntype Alias = int\n");
    let names: Vec<&str> = file.decls.iter().filter_map(|d| d.node.name()).collect();
    assert_eq!(names, vec!["Celsius", "Alias"]);
}

#[test]
fn test_selector_call_and_index() {
    let file = parse("package p\nfunc f() {\n\ta.b.c(xs[0])\n}\n");
    match &body_stmts(&file)[0].node {
        Stmt::Expr(expr) => match &expr.node {
            Expr::Call { callee, args } => {
                assert_eq!(
                    callee.node.qualified_name().map(|q| q.as_dotted()),
                    Some("a.b.c".to_string())
                );
                assert!(matches!(args[0].node, Expr::Index { .. }));
            }
            other => panic!("expected call, got {:?}", other),
        },
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn test_semicolons_on_one_line() {
    let file = parse("package p; const a = 1; var b = 2");
    assert_eq!(file.decls.len(), 2);
}

// --- Error cases ---

#[test]
fn test_error_missing_package() {
    let diags = parse_err("func main() {}");
    assert!(diags[0].message.contains("expected 'package'"));
    assert!(diags[0].help.is_some());
}

#[test]
fn test_error_missing_closing_brace() {
    let diags = parse_err("package p\nfunc main() {\n\tx := 1\n");
    assert!(diags.iter().any(|d| d.message.contains("expected '}'")));
}

#[test]
fn test_error_expected_expression() {
    let diags = parse_err("package p\nconst x = )\n");
    assert!(diags[0].message.contains("expected expression"));
}

#[test]
fn test_error_unsupported_statement() {
    let diags = parse_err("package p\nfunc f() {\n\tswitch x {\n\t}\n}\n");
    assert!(diags[0].message.contains("`switch` statements are not supported"));
}

#[test]
fn test_error_struct_type() {
    let diags = parse_err("package p\ntype T struct {}\n");
    assert!(diags[0].message.contains("`struct` types are not supported"));
}

#[test]
fn test_error_var_without_type_or_value() {
    let diags = parse_err("package p\nvar x\n");
    assert!(diags[0].message.contains("missing variable type or initialization"));
}

#[test]
fn test_error_missing_parameter_type() {
    let diags = parse_err("package p\nfunc f(a, b int, c) {}\n");
    assert!(diags.iter().any(|d| d.message.contains("missing parameter type")));
}

#[test]
fn test_error_recovery_reports_later_declarations() {
    let diags = parse_err("package p\nconst a = )\nconst b = ]\n");
    assert_eq!(diags.len(), 2);
}

#[test]
fn test_error_nesting_depth() {
    let mut source = String::from("package p\nconst x = ");
    source.push_str(&"(".repeat(300));
    source.push('1');
    source.push_str(&")".repeat(300));
    let diags = parse_err(&source);
    assert!(diags.iter().any(|d| d.message.contains("nesting depth exceeded")));
}
