pub mod display;

use crate::span::{Span, Spanned};

/// A parsed Go source file.
#[derive(Clone, Debug)]
pub struct File {
    pub package: Spanned<String>,
    /// Top-level declarations in source order, imports included.
    pub decls: Vec<Spanned<Decl>>,
}

/// A dotted name, e.g. `fmt.Println` → `["fmt", "Println"]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QualifiedName(pub Vec<String>);

impl QualifiedName {
    pub fn single(name: String) -> Self {
        Self(vec![name])
    }

    pub fn as_dotted(&self) -> String {
        self.0.join(".")
    }
}

impl std::fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_dotted())
    }
}

/// Top-level (and statement-level) declarations.
#[derive(Clone, Debug)]
pub enum Decl {
    Value(ValueDecl),
    Type(TypeDecl),
    /// Import paths, with their quotes.
    Import(Vec<Spanned<String>>),
    Func(FuncDecl),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKeyword {
    Const,
    Var,
}

impl ValueKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKeyword::Const => "const",
            ValueKeyword::Var => "var",
        }
    }
}

/// `const x = 5`, `var a, b int = 1, 2`, or a parenthesized group.
#[derive(Clone, Debug)]
pub struct ValueDecl {
    pub keyword: ValueKeyword,
    pub specs: Vec<Spanned<ValueSpec>>,
}

#[derive(Clone, Debug)]
pub struct ValueSpec {
    pub names: Vec<Spanned<String>>,
    pub ty: Option<Spanned<Type>>,
    pub values: Vec<Spanned<Expr>>,
}

#[derive(Clone, Debug)]
pub struct TypeDecl {
    pub name: Spanned<String>,
    pub ty: Spanned<Type>,
}

#[derive(Clone, Debug)]
pub struct FuncDecl {
    pub receiver: Option<Spanned<Field>>,
    pub name: Spanned<String>,
    pub signature: Signature,
    /// `None` for a declaration without a body (implemented elsewhere).
    pub body: Option<Spanned<Block>>,
}

#[derive(Clone, Debug, Default)]
pub struct Signature {
    pub params: Vec<Spanned<Field>>,
    pub results: Vec<Spanned<Field>>,
}

/// One parameter, result or receiver group: `a, b int` or just `int`.
#[derive(Clone, Debug)]
pub struct Field {
    pub names: Vec<Spanned<String>>,
    pub ty: Spanned<Type>,
}

/// Syntactic types (as written in source).
#[derive(Clone, Debug)]
pub enum Type {
    Named(QualifiedName),
    Pointer(Box<Spanned<Type>>),
    Slice(Box<Spanned<Type>>),
    Array {
        len: Box<Spanned<Expr>>,
        elem: Box<Spanned<Type>>,
    },
    Map {
        key: Box<Spanned<Type>>,
        value: Box<Spanned<Type>>,
    },
    Func(Signature),
}

#[derive(Clone, Debug, Default)]
pub struct Block {
    pub stmts: Vec<Spanned<Stmt>>,
}

/// Statements.
#[derive(Clone, Debug)]
pub enum Stmt {
    Decl(Decl),
    Expr(Spanned<Expr>),
    IncDec {
        operand: Spanned<Expr>,
        op: IncDecOp,
    },
    Assign {
        lhs: Vec<Spanned<Expr>>,
        op: AssignOp,
        rhs: Vec<Spanned<Expr>>,
    },
    Return(Vec<Spanned<Expr>>),
    Block(Block),
    If {
        init: Option<Box<Spanned<Stmt>>>,
        cond: Spanned<Expr>,
        then_block: Spanned<Block>,
        /// Either another `If` or a `Block`.
        else_branch: Option<Box<Spanned<Stmt>>>,
    },
    For {
        init: Option<Box<Spanned<Stmt>>>,
        cond: Option<Spanned<Expr>>,
        post: Option<Box<Spanned<Stmt>>>,
        body: Spanned<Block>,
    },
    Branch(BranchKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchKind {
    Break,
    Continue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IncDecOp {
    Inc,
    Dec,
}

impl IncDecOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncDecOp::Inc => "++",
            IncDecOp::Dec => "--",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignOp {
    Assign,    // =
    Define,    // :=
    Add,       // +=
    Sub,       // -=
    Mul,       // *=
    Quo,       // /=
    Rem,       // %=
    And,       // &=
    Or,        // |=
    Xor,       // ^=
    Shl,       // <<=
    Shr,       // >>=
    AndNot,    // &^=
}

impl AssignOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Define => ":=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Quo => "/=",
            AssignOp::Rem => "%=",
            AssignOp::And => "&=",
            AssignOp::Or => "|=",
            AssignOp::Xor => "^=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::AndNot => "&^=",
        }
    }

    pub fn from_compound(text: &str) -> Option<AssignOp> {
        let op = match text {
            "+=" => AssignOp::Add,
            "-=" => AssignOp::Sub,
            "*=" => AssignOp::Mul,
            "/=" => AssignOp::Quo,
            "%=" => AssignOp::Rem,
            "&=" => AssignOp::And,
            "|=" => AssignOp::Or,
            "^=" => AssignOp::Xor,
            "<<=" => AssignOp::Shl,
            ">>=" => AssignOp::Shr,
            "&^=" => AssignOp::AndNot,
            _ => return None,
        };
        Some(op)
    }
}

/// Expressions.
#[derive(Clone, Debug)]
pub enum Expr {
    Ident(String),
    Lit(BasicLit),
    Binary {
        op: BinOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Spanned<Expr>>,
    },
    Call {
        callee: Box<Spanned<Expr>>,
        args: Vec<Spanned<Expr>>,
    },
    Selector {
        base: Box<Spanned<Expr>>,
        field: Spanned<String>,
    },
    Index {
        base: Box<Spanned<Expr>>,
        index: Box<Spanned<Expr>>,
    },
    Paren(Box<Spanned<Expr>>),
}

impl Expr {
    /// The dotted name this expression spells, if it is an identifier or
    /// a chain of selectors on one (`x`, `fmt.Println`, `a.b.c`).
    pub fn qualified_name(&self) -> Option<QualifiedName> {
        match self {
            Expr::Ident(name) => Some(QualifiedName::single(name.clone())),
            Expr::Selector { base, field } => {
                let mut path = base.node.qualified_name()?;
                path.0.push(field.node.clone());
                Some(path)
            }
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    Str,
    Char,
}

/// A literal, kept as written: `5`, `0x1F`, `"hi"`, `'a'`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicLit {
    pub kind: LitKind,
    pub text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    OrOr,   // ||
    AndAnd, // &&
    Eq,     // ==
    NotEq,  // !=
    Lt,     // <
    LtEq,   // <=
    Gt,     // >
    GtEq,   // >=
    Add,    // +
    Sub,    // -
    Or,     // |
    Xor,    // ^
    Mul,    // *
    Quo,    // /
    Rem,    // %
    Shl,    // <<
    Shr,    // >>
    And,    // &
    AndNot, // &^
}

impl BinOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::OrOr => "||",
            BinOp::AndAnd => "&&",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Lt => "<",
            BinOp::LtEq => "<=",
            BinOp::Gt => ">",
            BinOp::GtEq => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Or => "|",
            BinOp::Xor => "^",
            BinOp::Mul => "*",
            BinOp::Quo => "/",
            BinOp::Rem => "%",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::And => "&",
            BinOp::AndNot => "&^",
        }
    }

    /// Go's five binary precedence levels; all are left-associative.
    pub fn precedence(&self) -> u8 {
        match self {
            BinOp::OrOr => 1,
            BinOp::AndAnd => 2,
            BinOp::Eq | BinOp::NotEq | BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq => 3,
            BinOp::Add | BinOp::Sub | BinOp::Or | BinOp::Xor => 4,
            BinOp::Mul
            | BinOp::Quo
            | BinOp::Rem
            | BinOp::Shl
            | BinOp::Shr
            | BinOp::And
            | BinOp::AndNot => 5,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,    // -
    Plus,   // +
    Not,    // !
    BitNot, // ^
    Addr,   // &
    Deref,  // *
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "^",
            UnaryOp::Addr => "&",
            UnaryOp::Deref => "*",
        }
    }
}

// ─── Node kinds ────────────────────────────────────────────────────

/// The grammatical kind of a node, independent of its payload.
///
/// Encoding rules and diagnostics are keyed on this discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    ValueDecl,
    TypeDecl,
    ImportDecl,
    FuncDecl,
    Receiver,
    Field,
    Block,
    DeclStmt,
    ExprStmt,
    IncDecStmt,
    AssignStmt,
    ReturnStmt,
    IfStmt,
    ForStmt,
    BranchStmt,
    Ident,
    BasicLit,
    BinaryExpr,
    UnaryExpr,
    CallExpr,
    SelectorExpr,
    IndexExpr,
    ParenExpr,
    NamedType,
    PointerType,
    SliceType,
    ArrayType,
    MapType,
    FuncType,
}

impl NodeKind {
    pub fn description(&self) -> &'static str {
        match self {
            NodeKind::ValueDecl => "value declaration",
            NodeKind::TypeDecl => "type declaration",
            NodeKind::ImportDecl => "import declaration",
            NodeKind::FuncDecl => "function declaration",
            NodeKind::Receiver => "method receiver",
            NodeKind::Field => "field",
            NodeKind::Block => "block",
            NodeKind::DeclStmt => "declaration statement",
            NodeKind::ExprStmt => "expression statement",
            NodeKind::IncDecStmt => "increment/decrement statement",
            NodeKind::AssignStmt => "assignment",
            NodeKind::ReturnStmt => "return statement",
            NodeKind::IfStmt => "`if` statement",
            NodeKind::ForStmt => "`for` statement",
            NodeKind::BranchStmt => "branch statement",
            NodeKind::Ident => "identifier",
            NodeKind::BasicLit => "literal",
            NodeKind::BinaryExpr => "binary expression",
            NodeKind::UnaryExpr => "unary expression",
            NodeKind::CallExpr => "call expression",
            NodeKind::SelectorExpr => "selector expression",
            NodeKind::IndexExpr => "index expression",
            NodeKind::ParenExpr => "parenthesized expression",
            NodeKind::NamedType => "named type",
            NodeKind::PointerType => "pointer type",
            NodeKind::SliceType => "slice type",
            NodeKind::ArrayType => "array type",
            NodeKind::MapType => "map type",
            NodeKind::FuncType => "function type",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

impl Decl {
    pub fn kind(&self) -> NodeKind {
        match self {
            Decl::Value(_) => NodeKind::ValueDecl,
            Decl::Type(_) => NodeKind::TypeDecl,
            Decl::Import(_) => NodeKind::ImportDecl,
            Decl::Func(_) => NodeKind::FuncDecl,
        }
    }

    /// The name a declaration introduces, for reporting.
    pub fn name(&self) -> Option<&str> {
        match self {
            Decl::Value(decl) => decl
                .specs
                .first()
                .and_then(|spec| spec.node.names.first())
                .map(|name| name.node.as_str()),
            Decl::Type(decl) => Some(&decl.name.node),
            Decl::Import(_) => None,
            Decl::Func(decl) => Some(&decl.name.node),
        }
    }
}

impl Stmt {
    pub fn kind(&self) -> NodeKind {
        match self {
            Stmt::Decl(_) => NodeKind::DeclStmt,
            Stmt::Expr(_) => NodeKind::ExprStmt,
            Stmt::IncDec { .. } => NodeKind::IncDecStmt,
            Stmt::Assign { .. } => NodeKind::AssignStmt,
            Stmt::Return(_) => NodeKind::ReturnStmt,
            Stmt::Block(_) => NodeKind::Block,
            Stmt::If { .. } => NodeKind::IfStmt,
            Stmt::For { .. } => NodeKind::ForStmt,
            Stmt::Branch(_) => NodeKind::BranchStmt,
        }
    }
}

impl Expr {
    pub fn kind(&self) -> NodeKind {
        match self {
            Expr::Ident(_) => NodeKind::Ident,
            Expr::Lit(_) => NodeKind::BasicLit,
            Expr::Binary { .. } => NodeKind::BinaryExpr,
            Expr::Unary { .. } => NodeKind::UnaryExpr,
            Expr::Call { .. } => NodeKind::CallExpr,
            Expr::Selector { .. } => NodeKind::SelectorExpr,
            Expr::Index { .. } => NodeKind::IndexExpr,
            Expr::Paren(_) => NodeKind::ParenExpr,
        }
    }
}

impl Type {
    pub fn kind(&self) -> NodeKind {
        match self {
            Type::Named(_) => NodeKind::NamedType,
            Type::Pointer(_) => NodeKind::PointerType,
            Type::Slice(_) => NodeKind::SliceType,
            Type::Array { .. } => NodeKind::ArrayType,
            Type::Map { .. } => NodeKind::MapType,
            Type::Func(_) => NodeKind::FuncType,
        }
    }
}

impl Field {
    /// Span covering the names and the type.
    pub fn span(&self) -> Span {
        self.names
            .iter()
            .fold(self.ty.span, |span, name| span.merge(name.span))
    }
}
