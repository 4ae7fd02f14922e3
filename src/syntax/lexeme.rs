/// All lexemes of the accepted Go subset.
#[derive(Clone, Debug, PartialEq)]
pub enum Lexeme {
    // Keywords
    Package,
    Import,
    Const,
    Var,
    Type,
    Func,
    Return,
    If,
    Else,
    For,
    Break,
    Continue,
    Map,
    /// A Go keyword outside the accepted subset (`switch`, `struct`, ...).
    Reserved(String),

    // Delimiters
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Comma,     // ,
    Semicolon, // ; (written or inserted at a newline)
    Dot,       // .
    Colon,     // :

    // Operators
    Assign,     // =
    Define,     // :=
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Percent,    // %
    Amp,        // &
    Pipe,       // |
    Caret,      // ^
    Shl,        // <<
    Shr,        // >>
    AndNot,     // &^
    OpAssign(String), // +=, -=, <<=, &^=, ...
    AndAnd,     // &&
    OrOr,       // ||
    Not,        // !
    EqEq,       // ==
    NotEq,      // !=
    Lt,         // <
    LtEq,       // <=
    Gt,         // >
    GtEq,       // >=
    PlusPlus,   // ++
    MinusMinus, // --

    // Literals keep their source text: it is the symbol that gets encoded.
    Int(String),
    Float(String),
    Str(String),
    Char(String),
    Ident(String),

    Eof,
}

const RESERVED: &[&str] = &[
    "case", "chan", "default", "defer", "fallthrough", "go", "goto", "interface",
    "range", "select", "struct", "switch",
];

impl Lexeme {
    /// Try to match an identifier string to a keyword lexeme.
    pub fn from_keyword(s: &str) -> Option<Lexeme> {
        let lexeme = match s {
            "package" => Lexeme::Package,
            "import" => Lexeme::Import,
            "const" => Lexeme::Const,
            "var" => Lexeme::Var,
            "type" => Lexeme::Type,
            "func" => Lexeme::Func,
            "return" => Lexeme::Return,
            "if" => Lexeme::If,
            "else" => Lexeme::Else,
            "for" => Lexeme::For,
            "break" => Lexeme::Break,
            "continue" => Lexeme::Continue,
            "map" => Lexeme::Map,
            other if RESERVED.contains(&other) => Lexeme::Reserved(other.to_string()),
            _ => return None,
        };
        Some(lexeme)
    }

    /// Go's automatic semicolon rule: a newline after one of these ends
    /// the statement.
    pub fn ends_statement(&self) -> bool {
        matches!(
            self,
            Lexeme::Ident(_)
                | Lexeme::Int(_)
                | Lexeme::Float(_)
                | Lexeme::Str(_)
                | Lexeme::Char(_)
                | Lexeme::Return
                | Lexeme::Break
                | Lexeme::Continue
                | Lexeme::PlusPlus
                | Lexeme::MinusMinus
                | Lexeme::RParen
                | Lexeme::RBracket
                | Lexeme::RBrace
        )
    }

    pub fn description(&self) -> String {
        let fixed = match self {
            Lexeme::Package => "'package'",
            Lexeme::Import => "'import'",
            Lexeme::Const => "'const'",
            Lexeme::Var => "'var'",
            Lexeme::Type => "'type'",
            Lexeme::Func => "'func'",
            Lexeme::Return => "'return'",
            Lexeme::If => "'if'",
            Lexeme::Else => "'else'",
            Lexeme::For => "'for'",
            Lexeme::Break => "'break'",
            Lexeme::Continue => "'continue'",
            Lexeme::Map => "'map'",
            Lexeme::Reserved(word) => return format!("'{}'", word),
            Lexeme::LParen => "'('",
            Lexeme::RParen => "')'",
            Lexeme::LBrace => "'{'",
            Lexeme::RBrace => "'}'",
            Lexeme::LBracket => "'['",
            Lexeme::RBracket => "']'",
            Lexeme::Comma => "','",
            Lexeme::Semicolon => "';' or newline",
            Lexeme::Dot => "'.'",
            Lexeme::Colon => "':'",
            Lexeme::Assign => "'='",
            Lexeme::Define => "':='",
            Lexeme::Plus => "'+'",
            Lexeme::Minus => "'-'",
            Lexeme::Star => "'*'",
            Lexeme::Slash => "'/'",
            Lexeme::Percent => "'%'",
            Lexeme::Amp => "'&'",
            Lexeme::Pipe => "'|'",
            Lexeme::Caret => "'^'",
            Lexeme::Shl => "'<<'",
            Lexeme::Shr => "'>>'",
            Lexeme::AndNot => "'&^'",
            Lexeme::OpAssign(op) => return format!("'{}'", op),
            Lexeme::AndAnd => "'&&'",
            Lexeme::OrOr => "'||'",
            Lexeme::Not => "'!'",
            Lexeme::EqEq => "'=='",
            Lexeme::NotEq => "'!='",
            Lexeme::Lt => "'<'",
            Lexeme::LtEq => "'<='",
            Lexeme::Gt => "'>'",
            Lexeme::GtEq => "'>='",
            Lexeme::PlusPlus => "'++'",
            Lexeme::MinusMinus => "'--'",
            Lexeme::Int(_) => "integer literal",
            Lexeme::Float(_) => "float literal",
            Lexeme::Str(_) => "string literal",
            Lexeme::Char(_) => "rune literal",
            Lexeme::Ident(_) => "identifier",
            Lexeme::Eof => "end of file",
        };
        fixed.to_string()
    }
}
