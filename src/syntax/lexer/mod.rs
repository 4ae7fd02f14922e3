use crate::diagnostic::Diagnostic;
use crate::lexeme::Lexeme;
use crate::span::{Span, Spanned};

pub struct Lexer<'src> {
    source: &'src [u8],
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    /// The last token emitted ends a statement if a newline follows it.
    semi_pending: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source: source.as_bytes(),
            pos: 0,
            diagnostics: Vec::new(),
            semi_pending: false,
        }
    }

    pub fn tokenize(mut self) -> (Vec<Spanned<Lexeme>>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = tok.node == Lexeme::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        (tokens, self.diagnostics)
    }

    fn next_token(&mut self) -> Spanned<Lexeme> {
        loop {
            let newline = self.skip_whitespace_and_comments();

            if self.semi_pending {
                if let Some(at) = newline {
                    self.semi_pending = false;
                    return Spanned::new(Lexeme::Semicolon, Span::new(at as u32, at as u32 + 1));
                }
                if self.pos >= self.source.len() {
                    self.semi_pending = false;
                    return Spanned::new(
                        Lexeme::Semicolon,
                        Span::new(self.pos as u32, self.pos as u32),
                    );
                }
            }

            if self.pos >= self.source.len() {
                return self.make_token(Lexeme::Eof, self.pos, self.pos);
            }

            let start = self.pos;
            let ch = self.source[self.pos];

            if self.char_at(self.pos).is_some_and(is_ident_start) {
                return self.scan_ident_or_keyword();
            }

            if ch.is_ascii_digit()
                || (ch == b'.' && self.peek_byte(1).is_some_and(|c| c.is_ascii_digit()))
            {
                return self.scan_number();
            }

            match ch {
                b'"' => {
                    if let Some(tok) = self.scan_interpreted_string(start) {
                        return tok;
                    }
                    continue;
                }
                b'`' => {
                    if let Some(tok) = self.scan_raw_string(start) {
                        return tok;
                    }
                    continue;
                }
                b'\'' => {
                    if let Some(tok) = self.scan_rune(start) {
                        return tok;
                    }
                    continue;
                }
                _ => {}
            }

            if let Some(tok) = self.scan_symbol(start) {
                return tok;
            }
            // scan_symbol returned None → error was recorded, try again
        }
    }

    /// Skip whitespace and comments. Returns the offset of the first
    /// newline crossed, if any (newlines inside block comments count).
    fn skip_whitespace_and_comments(&mut self) -> Option<usize> {
        let mut newline = None;
        loop {
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
                if self.source[self.pos] == b'\n' && newline.is_none() {
                    newline = Some(self.pos);
                }
                self.pos += 1;
            }

            if self.starts_with(b"//") {
                while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }

            if self.starts_with(b"/*") {
                let start = self.pos;
                self.pos += 2;
                loop {
                    if self.pos >= self.source.len() {
                        self.diagnostics.push(
                            Diagnostic::error(
                                "unterminated block comment".to_string(),
                                Span::new(start as u32, self.pos as u32),
                            )
                            .with_help("close the comment with `*/`".to_string()),
                        );
                        break;
                    }
                    if self.starts_with(b"*/") {
                        self.pos += 2;
                        break;
                    }
                    if self.source[self.pos] == b'\n' && newline.is_none() {
                        newline = Some(self.pos);
                    }
                    self.pos += 1;
                }
                continue;
            }

            break;
        }
        newline
    }

    fn scan_ident_or_keyword(&mut self) -> Spanned<Lexeme> {
        let start = self.pos;
        while let Some(c) = self.char_at(self.pos) {
            if !is_ident_continue(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        let text = self.text(start, self.pos);
        let token = Lexeme::from_keyword(&text).unwrap_or(Lexeme::Ident(text));
        self.make_token(token, start, self.pos)
    }

    /// Decimal, hex, octal and binary integers (with `_` separators) and
    /// decimal floats. The literal's source text is kept verbatim.
    fn scan_number(&mut self) -> Spanned<Lexeme> {
        let start = self.pos;

        if self.source[self.pos] == b'0'
            && matches!(self.peek_byte(1), Some(b'x' | b'X' | b'b' | b'B' | b'o' | b'O'))
        {
            self.pos += 2;
            let digits_start = self.pos;
            while self.pos < self.source.len()
                && (self.source[self.pos].is_ascii_hexdigit() || self.source[self.pos] == b'_')
            {
                self.pos += 1;
            }
            if self.pos == digits_start {
                self.diagnostics.push(
                    Diagnostic::error(
                        format!("integer literal '{}' has no digits", self.text(start, self.pos)),
                        Span::new(start as u32, self.pos as u32),
                    )
                    .with_help("write at least one digit after the base prefix".to_string()),
                );
            }
            let text = self.text(start, self.pos);
            return self.make_token(Lexeme::Int(text), start, self.pos);
        }

        let mut is_float = false;
        self.skip_decimal_digits();
        if self.pos < self.source.len() && self.source[self.pos] == b'.' {
            is_float = true;
            self.pos += 1;
            self.skip_decimal_digits();
        }
        if self.pos < self.source.len() && matches!(self.source[self.pos], b'e' | b'E') {
            let save = self.pos;
            self.pos += 1;
            if self.pos < self.source.len() && matches!(self.source[self.pos], b'+' | b'-') {
                self.pos += 1;
            }
            if self.pos < self.source.len() && self.source[self.pos].is_ascii_digit() {
                is_float = true;
                self.skip_decimal_digits();
            } else {
                self.pos = save;
            }
        }

        let text = self.text(start, self.pos);
        let token = if is_float {
            Lexeme::Float(text)
        } else {
            Lexeme::Int(text)
        };
        self.make_token(token, start, self.pos)
    }

    fn skip_decimal_digits(&mut self) {
        while self.pos < self.source.len()
            && (self.source[self.pos].is_ascii_digit() || self.source[self.pos] == b'_')
        {
            self.pos += 1;
        }
    }

    fn scan_interpreted_string(&mut self, start: usize) -> Option<Spanned<Lexeme>> {
        self.pos += 1; // opening quote
        while self.pos < self.source.len() {
            match self.source[self.pos] {
                b'\\' => self.pos += 2,
                b'"' => {
                    self.pos += 1;
                    let text = self.text(start, self.pos);
                    return Some(self.make_token(Lexeme::Str(text), start, self.pos));
                }
                b'\n' => break,
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.source.len());
        self.diagnostics.push(
            Diagnostic::error(
                "unterminated string literal".to_string(),
                Span::new(start as u32, self.pos as u32),
            )
            .with_help(
                "interpreted strings end on the same line; use a `raw string` for multi-line text"
                    .to_string(),
            ),
        );
        None
    }

    fn scan_raw_string(&mut self, start: usize) -> Option<Spanned<Lexeme>> {
        self.pos += 1;
        while self.pos < self.source.len() {
            if self.source[self.pos] == b'`' {
                self.pos += 1;
                let text = self.text(start, self.pos);
                return Some(self.make_token(Lexeme::Str(text), start, self.pos));
            }
            self.pos += 1;
        }
        self.diagnostics.push(
            Diagnostic::error(
                "unterminated raw string literal".to_string(),
                Span::new(start as u32, self.pos as u32),
            )
            .with_help("close the raw string with a backquote".to_string()),
        );
        None
    }

    fn scan_rune(&mut self, start: usize) -> Option<Spanned<Lexeme>> {
        self.pos += 1;
        while self.pos < self.source.len() {
            match self.source[self.pos] {
                b'\\' => self.pos += 2,
                b'\'' => {
                    self.pos += 1;
                    if self.pos - start <= 2 {
                        self.diagnostics.push(Diagnostic::error(
                            "empty rune literal".to_string(),
                            Span::new(start as u32, self.pos as u32),
                        ));
                        return None;
                    }
                    let text = self.text(start, self.pos);
                    if !is_single_rune(&text[1..text.len() - 1]) {
                        self.diagnostics.push(
                            Diagnostic::error(
                                "more than one character in rune literal".to_string(),
                                Span::new(start as u32, self.pos as u32),
                            )
                            .with_help("use a double-quoted string for text".to_string()),
                        );
                        return None;
                    }
                    return Some(self.make_token(Lexeme::Char(text), start, self.pos));
                }
                b'\n' => break,
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(self.source.len());
        self.diagnostics.push(Diagnostic::error(
            "unterminated rune literal".to_string(),
            Span::new(start as u32, self.pos as u32),
        ));
        None
    }

    fn scan_symbol(&mut self, start: usize) -> Option<Spanned<Lexeme>> {
        // Longest match first.
        const OPERATORS: &[&str] = &[
            "&^=", "<<=", ">>=", "&^", "<<", ">>", "&&", "||", "++", "--", "==", "!=", "<=",
            ">=", ":=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=",
        ];

        if let Some(text) = OPERATORS.iter().find(|op| self.starts_with(op.as_bytes())) {
            self.pos += text.len();
            let tok = match *text {
                "&^" => Lexeme::AndNot,
                "<<" => Lexeme::Shl,
                ">>" => Lexeme::Shr,
                "&&" => Lexeme::AndAnd,
                "||" => Lexeme::OrOr,
                "++" => Lexeme::PlusPlus,
                "--" => Lexeme::MinusMinus,
                "==" => Lexeme::EqEq,
                "!=" => Lexeme::NotEq,
                "<=" => Lexeme::LtEq,
                ">=" => Lexeme::GtEq,
                ":=" => Lexeme::Define,
                compound => Lexeme::OpAssign(compound.to_string()),
            };
            return Some(self.make_token(tok, start, self.pos));
        }

        let ch = self.source[self.pos];
        let tok = match ch {
            b'(' => Lexeme::LParen,
            b')' => Lexeme::RParen,
            b'{' => Lexeme::LBrace,
            b'}' => Lexeme::RBrace,
            b'[' => Lexeme::LBracket,
            b']' => Lexeme::RBracket,
            b',' => Lexeme::Comma,
            b';' => Lexeme::Semicolon,
            b'.' => Lexeme::Dot,
            b':' => Lexeme::Colon,
            b'=' => Lexeme::Assign,
            b'+' => Lexeme::Plus,
            b'-' => Lexeme::Minus,
            b'*' => Lexeme::Star,
            b'/' => Lexeme::Slash,
            b'%' => Lexeme::Percent,
            b'&' => Lexeme::Amp,
            b'|' => Lexeme::Pipe,
            b'^' => Lexeme::Caret,
            b'!' => Lexeme::Not,
            b'<' => Lexeme::Lt,
            b'>' => Lexeme::Gt,
            _ => {
                // Step over the whole UTF-8 sequence so the message names
                // the real character.
                let width = utf8_width(ch);
                let end = (self.pos + width).min(self.source.len());
                let shown = self.text(self.pos, end);
                self.diagnostics.push(
                    Diagnostic::error(
                        format!("unexpected character '{}'", shown),
                        Span::new(start as u32, end as u32),
                    )
                    .with_help(
                        "this character is not part of any token in the accepted Go subset"
                            .to_string(),
                    ),
                );
                self.pos = end;
                return None;
            }
        };
        self.pos += 1;
        Some(self.make_token(tok, start, self.pos))
    }

    fn make_token(&mut self, token: Lexeme, start: usize, end: usize) -> Spanned<Lexeme> {
        self.semi_pending = token.ends_statement();
        Spanned::new(token, Span::new(start as u32, end as u32))
    }

    fn starts_with(&self, prefix: &[u8]) -> bool {
        self.source[self.pos.min(self.source.len())..].starts_with(prefix)
    }

    fn peek_byte(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    /// The character starting at byte `pos`.
    fn char_at(&self, pos: usize) -> Option<char> {
        let width = utf8_width(*self.source.get(pos)?);
        std::str::from_utf8(self.source.get(pos..pos + width)?)
            .ok()?
            .chars()
            .next()
    }

    fn text(&self, start: usize, end: usize) -> String {
        String::from_utf8_lossy(&self.source[start..end.min(self.source.len())]).into_owned()
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Whether the body of a rune literal (between the quotes) is exactly
/// one character or one escape sequence.
fn is_single_rune(body: &str) -> bool {
    let Some(escape) = body.strip_prefix('\\') else {
        return body.chars().count() == 1;
    };
    let expected = match escape.chars().next() {
        Some('x') => 3,
        Some('u') => 5,
        Some('U') => 9,
        Some('0'..='7') => 3,
        Some(_) => 1,
        None => return false,
    };
    escape.len() == expected
}

fn utf8_width(first: u8) -> usize {
    match first {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}
